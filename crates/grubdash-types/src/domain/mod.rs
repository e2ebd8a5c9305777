pub mod dish;
pub mod order;
