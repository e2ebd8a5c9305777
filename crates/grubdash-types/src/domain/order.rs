use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum OrderStatus {
    Pending,
    Preparing,
    OutForDelivery,
    Delivered,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 4] = [
        OrderStatus::Pending,
        OrderStatus::Preparing,
        OrderStatus::OutForDelivery,
        OrderStatus::Delivered,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Preparing => "preparing",
            OrderStatus::OutForDelivery => "out-for-delivery",
            OrderStatus::Delivered => "delivered",
        }
    }

    /// Status every newly placed order is given.
    pub const INITIAL: OrderStatus = OrderStatus::OutForDelivery;

    /// Only orders that have not started preparation may be removed.
    pub fn is_deletable(self) -> bool {
        self == OrderStatus::Pending
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown order status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for OrderStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// One line of an order: a dish reference plus quantity. Any other dish
/// fields sent by the client (name, price, ...) ride along in `details`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderLine {
    pub id: String,
    pub quantity: u32,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl OrderLine {
    pub fn new(dish_id: impl Into<String>, quantity: u32) -> Self {
        Self {
            id: dish_id.into(),
            quantity,
            details: Map::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub deliver_to: String,
    pub mobile_number: String,
    pub status: OrderStatus,
    pub dishes: Vec<OrderLine>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderDraft {
    pub deliver_to: String,
    pub mobile_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
    pub dishes: Vec<OrderLine>,
}

impl Order {
    /// New orders always start out as [`OrderStatus::INITIAL`], whatever the draft says.
    pub fn new(id: impl Into<String>, draft: OrderDraft) -> Self {
        Self {
            id: id.into(),
            deliver_to: draft.deliver_to,
            mobile_number: draft.mobile_number,
            status: OrderStatus::INITIAL,
            dishes: draft.dishes,
        }
    }

    pub fn apply(&mut self, draft: OrderDraft) {
        self.deliver_to = draft.deliver_to;
        self.mobile_number = draft.mobile_number;
        if let Some(status) = draft.status {
            self.status = status;
        }
        self.dishes = draft.dishes;
    }
}
