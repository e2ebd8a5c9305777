use grubdash_types::domain::dish::{Dish, DishDraft};
use serde_json::Value;

use super::{body_id_matches_route, located, required_text, required_value, Chain, Request};
use crate::errors::AppError;

/// Values the dish chains hand on to the handlers.
#[derive(Debug, Default)]
pub struct DishLocals {
    pub dish: Option<Dish>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub image_url: Option<String>,
}

impl DishLocals {
    pub fn into_draft(self) -> Result<DishDraft, AppError> {
        match (self.name, self.description, self.price, self.image_url) {
            (Some(name), Some(description), Some(price), Some(image_url)) => Ok(DishDraft {
                name,
                description,
                price,
                image_url,
            }),
            _ => Err(AppError::Internal(anyhow::anyhow!(
                "dish chain finished without capturing every field"
            ))),
        }
    }
}

pub fn dish_exists(req: &Request<'_, Dish>, locals: &mut DishLocals) -> Result<(), AppError> {
    locals.dish = Some(located(req, "Dish")?.clone());
    Ok(())
}

pub fn id_matches_route(req: &Request<'_, Dish>, _: &mut DishLocals) -> Result<(), AppError> {
    body_id_matches_route(req, "dishId")
}

pub fn has_name(req: &Request<'_, Dish>, locals: &mut DishLocals) -> Result<(), AppError> {
    locals.name = Some(required_text(req, "name")?);
    Ok(())
}

pub fn has_description(req: &Request<'_, Dish>, locals: &mut DishLocals) -> Result<(), AppError> {
    locals.description = Some(required_text(req, "description")?);
    Ok(())
}

pub fn has_price(req: &Request<'_, Dish>, _: &mut DishLocals) -> Result<(), AppError> {
    required_value(req, "price").map(|_| ())
}

pub fn has_image_url(req: &Request<'_, Dish>, locals: &mut DishLocals) -> Result<(), AppError> {
    locals.image_url = Some(required_text(req, "image_url")?);
    Ok(())
}

/// Re-reads `price` from the body on every run.
pub fn price_is_valid(req: &Request<'_, Dish>, locals: &mut DishLocals) -> Result<(), AppError> {
    match req.field("price").and_then(Value::as_f64) {
        Some(price) if price > 0.0 && price.is_finite() => {
            locals.price = Some(price);
            Ok(())
        }
        _ => Err(AppError::Validation(
            "price must be a number greater than 0".into(),
        )),
    }
}

pub fn read_chain() -> Chain<Dish, DishLocals> {
    Chain::new("dish.read").step("dish_exists", dish_exists)
}

pub fn create_chain() -> Chain<Dish, DishLocals> {
    Chain::new("dish.create")
        .step("has_name", has_name)
        .step("has_description", has_description)
        .step("has_price", has_price)
        .step("has_image_url", has_image_url)
        .step("price_is_valid", price_is_valid)
}

pub fn update_chain() -> Chain<Dish, DishLocals> {
    Chain::new("dish.update")
        .step("dish_exists", dish_exists)
        .step("id_matches_route", id_matches_route)
        .step("has_name", has_name)
        .step("has_description", has_description)
        .step("has_price", has_price)
        .step("has_image_url", has_image_url)
        .step("price_is_valid", price_is_valid)
}
