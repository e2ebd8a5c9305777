use grubdash_types::domain::order::{Order, OrderDraft, OrderLine, OrderStatus};
use serde_json::Value;

use super::{body_id_matches_route, located, required_text, required_value, Chain, Request};
use crate::errors::AppError;

const INVALID_STATUS: &str = "status property must be valid string: 'pending', 'preparing', 'out-for-delivery', or 'delivered'";
const EMPTY_DISHES: &str = "invalid dishes property: dishes property must be non-empty array";

#[derive(Debug, Default)]
pub struct OrderLocals {
    pub order: Option<Order>,
    pub deliver_to: Option<String>,
    pub mobile_number: Option<String>,
    pub status: Option<OrderStatus>,
    pub dishes: Option<Vec<OrderLine>>,
}

impl OrderLocals {
    /// `status` stays optional: the create chain never looks at it.
    pub fn into_draft(self) -> Result<OrderDraft, AppError> {
        match (self.deliver_to, self.mobile_number, self.dishes) {
            (Some(deliver_to), Some(mobile_number), Some(dishes)) => Ok(OrderDraft {
                deliver_to,
                mobile_number,
                status: self.status,
                dishes,
            }),
            _ => Err(AppError::Internal(anyhow::anyhow!(
                "order chain finished without capturing every field"
            ))),
        }
    }
}

pub fn order_exists(req: &Request<'_, Order>, locals: &mut OrderLocals) -> Result<(), AppError> {
    locals.order = Some(located(req, "Order")?.clone());
    Ok(())
}

pub fn id_matches_route(req: &Request<'_, Order>, _: &mut OrderLocals) -> Result<(), AppError> {
    body_id_matches_route(req, "orderId")
}

pub fn has_deliver_to(req: &Request<'_, Order>, locals: &mut OrderLocals) -> Result<(), AppError> {
    locals.deliver_to = Some(required_text(req, "deliverTo")?);
    Ok(())
}

pub fn has_mobile_number(
    req: &Request<'_, Order>,
    locals: &mut OrderLocals,
) -> Result<(), AppError> {
    locals.mobile_number = Some(required_text(req, "mobileNumber")?);
    Ok(())
}

pub fn has_dishes(req: &Request<'_, Order>, _: &mut OrderLocals) -> Result<(), AppError> {
    required_value(req, "dishes").map(|_| ())
}

pub fn has_status(req: &Request<'_, Order>, _: &mut OrderLocals) -> Result<(), AppError> {
    required_text(req, "status").map(|_| ())
}

pub fn status_is_valid(req: &Request<'_, Order>, locals: &mut OrderLocals) -> Result<(), AppError> {
    let status = req
        .field("status")
        .and_then(Value::as_str)
        .and_then(|s| s.parse::<OrderStatus>().ok())
        .ok_or_else(|| AppError::Validation(INVALID_STATUS.into()))?;
    locals.status = Some(status);
    Ok(())
}

pub fn dishes_not_empty(req: &Request<'_, Order>, _: &mut OrderLocals) -> Result<(), AppError> {
    match req.field("dishes").and_then(Value::as_array) {
        Some(items) if !items.is_empty() => Ok(()),
        _ => Err(AppError::Validation(EMPTY_DISHES.into())),
    }
}

/// Halts on the first line whose quantity is not a positive integer or that
/// names no dish. Lines are identified by dish id, or by index without one.
pub fn quantities_are_valid(
    req: &Request<'_, Order>,
    locals: &mut OrderLocals,
) -> Result<(), AppError> {
    let items = req
        .field("dishes")
        .and_then(Value::as_array)
        .ok_or_else(|| AppError::Validation(EMPTY_DISHES.into()))?;

    let mut lines = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let dish_id = item
            .get("id")
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty());
        let label = dish_id.map_or_else(|| index.to_string(), str::to_string);

        let quantity_ok = item
            .get("quantity")
            .and_then(Value::as_u64)
            .is_some_and(|q| q > 0 && q <= u64::from(u32::MAX));
        if !quantity_ok {
            return Err(AppError::Validation(format!(
                "dish {label} must have quantity property, quantity must be an integer, and it must not be equal to or less than 0"
            )));
        }
        if dish_id.is_none() {
            return Err(AppError::Validation(format!(
                "dish {label} must have an id property"
            )));
        }
        let line: OrderLine = serde_json::from_value(item.clone())
            .map_err(|e| AppError::Validation(format!("dish {label} is malformed: {e}")))?;
        lines.push(line);
    }
    locals.dishes = Some(lines);
    Ok(())
}

pub fn read_chain() -> Chain<Order, OrderLocals> {
    Chain::new("order.read").step("order_exists", order_exists)
}

pub fn create_chain() -> Chain<Order, OrderLocals> {
    Chain::new("order.create")
        .step("has_deliver_to", has_deliver_to)
        .step("has_mobile_number", has_mobile_number)
        .step("has_dishes", has_dishes)
        .step("dishes_not_empty", dishes_not_empty)
        .step("quantities_are_valid", quantities_are_valid)
}

pub fn update_chain() -> Chain<Order, OrderLocals> {
    Chain::new("order.update")
        .step("order_exists", order_exists)
        .step("id_matches_route", id_matches_route)
        .step("has_deliver_to", has_deliver_to)
        .step("has_mobile_number", has_mobile_number)
        .step("has_dishes", has_dishes)
        .step("has_status", has_status)
        .step("status_is_valid", status_is_valid)
        .step("dishes_not_empty", dishes_not_empty)
        .step("quantities_are_valid", quantities_are_valid)
}

pub fn delete_chain() -> Chain<Order, OrderLocals> {
    Chain::new("order.delete").step("order_exists", order_exists)
}
