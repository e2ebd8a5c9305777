use async_trait::async_trait;

use super::RepoError;
use crate::domain::dish::Dish;

#[async_trait]
pub trait DishRepository: Send + Sync + 'static {
    async fn list(&self) -> Result<Vec<Dish>, RepoError>;
    async fn get(&self, id: &str) -> Result<Option<Dish>, RepoError>;
    /// Appends to the end of the collection.
    async fn create(&self, dish: Dish) -> Result<Dish, RepoError>;
    /// Replaces the record with the same id in place; `None` when absent.
    async fn update(&self, dish: Dish) -> Result<Option<Dish>, RepoError>;
}
