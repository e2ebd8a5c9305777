use async_trait::async_trait;
use grubdash_types::domain::dish::Dish;
use grubdash_types::domain::order::Order;
use grubdash_types::ports::dish_repository::DishRepository;
use grubdash_types::ports::order_repository::OrderRepository;
use grubdash_types::ports::RepoError;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Anything stored in a [`MemoryCollection`] is looked up by its string id.
pub trait Record: Clone + Send + Sync + 'static {
    fn id(&self) -> &str;
}

impl Record for Dish {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for Order {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Ordered list of records. Lookups are a linear scan; insertion order is
/// the listing order.
#[derive(Clone)]
pub struct MemoryCollection<T> {
    items: Arc<RwLock<Vec<T>>>,
}

impl<T: Record> MemoryCollection<T> {
    pub fn new() -> Self {
        Self::with_records(Vec::new())
    }

    pub fn with_records(records: Vec<T>) -> Self {
        Self {
            items: Arc::new(RwLock::new(records)),
        }
    }

    async fn list_all(&self) -> Vec<T> {
        self.items.read().await.clone()
    }

    async fn find(&self, id: &str) -> Option<T> {
        self.items.read().await.iter().find(|r| r.id() == id).cloned()
    }

    async fn push(&self, record: T) -> T {
        self.items.write().await.push(record.clone());
        record
    }

    async fn replace(&self, record: T) -> Option<T> {
        let mut items = self.items.write().await;
        let slot = items.iter_mut().find(|r| r.id() == record.id())?;
        *slot = record;
        Some(slot.clone())
    }

    async fn remove(&self, id: &str) -> bool {
        let mut items = self.items.write().await;
        match items.iter().position(|r| r.id() == id) {
            Some(index) => {
                items.remove(index);
                true
            }
            None => false,
        }
    }
}

impl<T: Record> Default for MemoryCollection<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DishRepository for MemoryCollection<Dish> {
    async fn list(&self) -> Result<Vec<Dish>, RepoError> {
        Ok(self.list_all().await)
    }

    async fn get(&self, id: &str) -> Result<Option<Dish>, RepoError> {
        Ok(self.find(id).await)
    }

    async fn create(&self, dish: Dish) -> Result<Dish, RepoError> {
        Ok(self.push(dish).await)
    }

    async fn update(&self, dish: Dish) -> Result<Option<Dish>, RepoError> {
        Ok(self.replace(dish).await)
    }
}

#[async_trait]
impl OrderRepository for MemoryCollection<Order> {
    async fn list(&self) -> Result<Vec<Order>, RepoError> {
        Ok(self.list_all().await)
    }

    async fn get(&self, id: &str) -> Result<Option<Order>, RepoError> {
        Ok(self.find(id).await)
    }

    async fn create(&self, order: Order) -> Result<Order, RepoError> {
        Ok(self.push(order).await)
    }

    async fn update(&self, order: Order) -> Result<Option<Order>, RepoError> {
        Ok(self.replace(order).await)
    }

    async fn delete(&self, id: &str) -> Result<bool, RepoError> {
        Ok(self.remove(id).await)
    }
}
