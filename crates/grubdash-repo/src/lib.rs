//! Outbound adapters for GrubDash: in-memory collections, id generation and
//! seed loading.

use std::path::Path;
use std::sync::Arc;

use grubdash_types::domain::dish::Dish;
use grubdash_types::domain::order::Order;
use grubdash_types::ports::id_generator::IdGenerator;

pub mod ids;
pub mod memory;
pub mod seed;

pub type DishRepo = memory::MemoryCollection<Dish>;
pub type OrderRepo = memory::MemoryCollection<Order>;

/// Everything the services need from the outbound side.
pub struct Repos {
    pub dishes: DishRepo,
    pub orders: OrderRepo,
    pub ids: Arc<dyn IdGenerator>,
}

pub async fn build_repos(seed_path: Option<&Path>) -> anyhow::Result<Repos> {
    let seed = match seed_path {
        Some(path) => seed::load_seed(path).await?,
        None => seed::Seed::default(),
    };
    tracing::info!(
        dishes = seed.dishes.len(),
        orders = seed.orders.len(),
        "collections initialised"
    );
    Ok(Repos {
        dishes: memory::MemoryCollection::with_records(seed.dishes),
        orders: memory::MemoryCollection::with_records(seed.orders),
        ids: Arc::new(ids::UuidIdGenerator),
    })
}
