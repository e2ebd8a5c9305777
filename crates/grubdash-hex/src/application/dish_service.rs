use std::sync::Arc;

use crate::application::validation::dish::{self, DishLocals};
use crate::application::validation::{Chain, Request};
use crate::errors::AppError;
use grubdash_types::domain::dish::Dish;
use grubdash_types::ports::dish_repository::DishRepository;
use grubdash_types::ports::id_generator::IdGenerator;
use serde_json::Value;
use tokio::sync::Mutex;

pub struct DishService<R: DishRepository> {
    repo: R,
    ids: Arc<dyn IdGenerator>,
    // Held across chain + handler so mutations never interleave.
    writer: Mutex<()>,
    read_chain: Chain<Dish, DishLocals>,
    create_chain: Chain<Dish, DishLocals>,
    update_chain: Chain<Dish, DishLocals>,
}

impl<R: DishRepository> DishService<R> {
    pub fn new(repo: R, ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            repo,
            ids,
            writer: Mutex::new(()),
            read_chain: dish::read_chain(),
            create_chain: dish::create_chain(),
            update_chain: dish::update_chain(),
        }
    }

    async fn lookup(&self, id: &str) -> Result<Option<Dish>, AppError> {
        self.repo
            .get(id)
            .await
            .map_err(|e| AppError::Internal(e.into()))
    }

    pub async fn list_dishes(&self) -> Result<Vec<Dish>, AppError> {
        self.repo
            .list()
            .await
            .map_err(|e| AppError::Internal(e.into()))
    }

    pub async fn get_dish(&self, id: &str) -> Result<Dish, AppError> {
        let found = self.lookup(id).await?;
        let mut locals = DishLocals::default();
        self.read_chain
            .run(&Request::new(Some(id), &Value::Null, found.as_ref()), &mut locals)?;
        locals
            .dish
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("read chain located no dish")))
    }

    /// `body` is the raw request body, `{"data": {...}}`.
    pub async fn create_dish(&self, body: &Value) -> Result<Dish, AppError> {
        let _writer = self.writer.lock().await;
        let mut locals = DishLocals::default();
        self.create_chain
            .run(&Request::new(None, body, None), &mut locals)?;

        let dish = Dish::new(self.ids.next_id(), locals.into_draft()?);
        let created = self
            .repo
            .create(dish)
            .await
            .map_err(|e| AppError::Internal(e.into()))?;
        tracing::info!(dish_id = %created.id, "dish created");
        Ok(created)
    }

    pub async fn update_dish(&self, id: &str, body: &Value) -> Result<Dish, AppError> {
        let _writer = self.writer.lock().await;
        let found = self.lookup(id).await?;
        let mut locals = DishLocals::default();
        self.update_chain
            .run(&Request::new(Some(id), body, found.as_ref()), &mut locals)?;

        let mut dish = locals
            .dish
            .take()
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("update chain located no dish")))?;
        dish.apply(locals.into_draft()?);
        let updated = self
            .repo
            .update(dish)
            .await
            .map_err(|e| AppError::Internal(e.into()))?
            .ok_or_else(|| AppError::NotFound(format!("Dish id not found: {id}")))?;
        tracing::info!(dish_id = %updated.id, "dish updated");
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grubdash_repo::ids::UuidIdGenerator;
    use grubdash_repo::memory::MemoryCollection;
    use serde_json::json;

    fn service() -> (MemoryCollection<Dish>, DishService<MemoryCollection<Dish>>) {
        let repo = MemoryCollection::new();
        let svc = DishService::new(repo.clone(), Arc::new(UuidIdGenerator));
        (repo, svc)
    }

    fn pasta() -> Value {
        json!({ "data": { "name": "Pasta", "description": "x", "price": 12, "image_url": "http://x" } })
    }

    #[tokio::test]
    async fn create_then_read_dish() {
        let (_, svc) = service();
        let created = svc.create_dish(&pasta()).await.unwrap();
        assert!(!created.id.is_empty());
        assert_eq!(created.price, 12.0);

        let first = svc.get_dish(&created.id).await.unwrap();
        let second = svc.get_dish(&created.id).await.unwrap();
        assert_eq!(first, created);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn rejected_create_leaves_collection_untouched() {
        let (repo, svc) = service();
        for price in [json!(0), json!(-3)] {
            let body = json!({ "data": { "name": "P", "description": "x", "price": price, "image_url": "i" } });
            let res = svc.create_dish(&body).await;
            assert!(matches!(res, Err(AppError::Validation(_))));
        }
        assert!(repo.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_overwrites_fields_but_not_id() {
        let (_, svc) = service();
        let created = svc.create_dish(&pasta()).await.unwrap();
        let body = json!({ "data": {
            "id": created.id, "name": "Soup", "description": "hot", "price": 7.5, "image_url": "http://y"
        }});
        let updated = svc.update_dish(&created.id, &body).await.unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.name, "Soup");
        assert_eq!(svc.get_dish(&created.id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn mismatched_id_leaves_record_unchanged() {
        let (_, svc) = service();
        let created = svc.create_dish(&pasta()).await.unwrap();
        let body = json!({ "data": {
            "id": "someone-else", "name": "Soup", "description": "hot", "price": 7.5, "image_url": "i"
        }});
        let res = svc.update_dish(&created.id, &body).await;
        assert!(matches!(res, Err(AppError::Validation(_))));
        assert_eq!(svc.get_dish(&created.id).await.unwrap(), created);
    }

    #[tokio::test]
    async fn not_found_paths() {
        let (_, svc) = service();
        assert!(matches!(svc.get_dish("nope").await, Err(AppError::NotFound(_))));
        assert!(matches!(
            svc.update_dish("nope", &pasta()).await,
            Err(AppError::NotFound(_))
        ));
    }
}
