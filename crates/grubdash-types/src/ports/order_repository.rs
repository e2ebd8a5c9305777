use async_trait::async_trait;

use super::RepoError;
use crate::domain::order::Order;

#[async_trait]
pub trait OrderRepository: Send + Sync + 'static {
    async fn list(&self) -> Result<Vec<Order>, RepoError>;
    async fn get(&self, id: &str) -> Result<Option<Order>, RepoError>;
    async fn create(&self, order: Order) -> Result<Order, RepoError>;
    async fn update(&self, order: Order) -> Result<Option<Order>, RepoError>;
    async fn delete(&self, id: &str) -> Result<bool, RepoError>;
}
