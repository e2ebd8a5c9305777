use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Dish {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub image_url: String,
}

/// The mutable fields of a dish, as accepted from a validated payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DishDraft {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub image_url: String,
}

impl Dish {
    pub fn new(id: impl Into<String>, draft: DishDraft) -> Self {
        Self {
            id: id.into(),
            name: draft.name,
            description: draft.description,
            price: draft.price,
            image_url: draft.image_url,
        }
    }

    /// Overwrites every mutable field. The id is left alone.
    pub fn apply(&mut self, draft: DishDraft) {
        self.name = draft.name;
        self.description = draft.description;
        self.price = draft.price;
        self.image_url = draft.image_url;
    }
}
