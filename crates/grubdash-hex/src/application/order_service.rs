use std::sync::Arc;

use crate::application::validation::order::{self, OrderLocals};
use crate::application::validation::{Chain, Request};
use crate::errors::AppError;
use grubdash_types::domain::order::Order;
use grubdash_types::ports::id_generator::IdGenerator;
use grubdash_types::ports::order_repository::OrderRepository;
use serde_json::Value;
use tokio::sync::Mutex;

pub struct OrderService<R: OrderRepository> {
    repo: R,
    ids: Arc<dyn IdGenerator>,
    writer: Mutex<()>,
    read_chain: Chain<Order, OrderLocals>,
    create_chain: Chain<Order, OrderLocals>,
    update_chain: Chain<Order, OrderLocals>,
    delete_chain: Chain<Order, OrderLocals>,
}

impl<R: OrderRepository> OrderService<R> {
    pub fn new(repo: R, ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            repo,
            ids,
            writer: Mutex::new(()),
            read_chain: order::read_chain(),
            create_chain: order::create_chain(),
            update_chain: order::update_chain(),
            delete_chain: order::delete_chain(),
        }
    }

    async fn lookup(&self, id: &str) -> Result<Option<Order>, AppError> {
        self.repo
            .get(id)
            .await
            .map_err(|e| AppError::Internal(e.into()))
    }

    fn take_located(locals: &mut OrderLocals) -> Result<Order, AppError> {
        locals
            .order
            .take()
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("chain located no order")))
    }

    pub async fn list_orders(&self) -> Result<Vec<Order>, AppError> {
        self.repo
            .list()
            .await
            .map_err(|e| AppError::Internal(e.into()))
    }

    pub async fn get_order(&self, id: &str) -> Result<Order, AppError> {
        let found = self.lookup(id).await?;
        let mut locals = OrderLocals::default();
        self.read_chain
            .run(&Request::new(Some(id), &Value::Null, found.as_ref()), &mut locals)?;
        Self::take_located(&mut locals)
    }

    pub async fn create_order(&self, body: &Value) -> Result<Order, AppError> {
        let _writer = self.writer.lock().await;
        let mut locals = OrderLocals::default();
        self.create_chain
            .run(&Request::new(None, body, None), &mut locals)?;

        let order = Order::new(self.ids.next_id(), locals.into_draft()?);
        let created = self
            .repo
            .create(order)
            .await
            .map_err(|e| AppError::Internal(e.into()))?;
        tracing::info!(order_id = %created.id, "order created");
        Ok(created)
    }

    pub async fn update_order(&self, id: &str, body: &Value) -> Result<Order, AppError> {
        let _writer = self.writer.lock().await;
        let found = self.lookup(id).await?;
        let mut locals = OrderLocals::default();
        self.update_chain
            .run(&Request::new(Some(id), body, found.as_ref()), &mut locals)?;

        let mut order = Self::take_located(&mut locals)?;
        order.apply(locals.into_draft()?);
        let updated = self
            .repo
            .update(order)
            .await
            .map_err(|e| AppError::Internal(e.into()))?
            .ok_or_else(|| AppError::NotFound(format!("Order id not found: {id}")))?;
        tracing::info!(order_id = %updated.id, status = %updated.status, "order updated");
        Ok(updated)
    }

    pub async fn delete_order(&self, id: &str) -> Result<(), AppError> {
        let _writer = self.writer.lock().await;
        let found = self.lookup(id).await?;
        let mut locals = OrderLocals::default();
        self.delete_chain
            .run(&Request::new(Some(id), &Value::Null, found.as_ref()), &mut locals)?;

        let order = Self::take_located(&mut locals)?;
        if !order.status.is_deletable() {
            return Err(AppError::Validation(
                "order cannot be deleted unless order status = 'pending'".into(),
            ));
        }
        let deleted = self
            .repo
            .delete(id)
            .await
            .map_err(|e| AppError::Internal(e.into()))?;
        if !deleted {
            return Err(AppError::NotFound(format!("Order id not found: {id}")));
        }
        tracing::info!(order_id = %id, "order deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grubdash_repo::ids::UuidIdGenerator;
    use grubdash_repo::memory::MemoryCollection;
    use grubdash_types::domain::order::OrderStatus;
    use serde_json::json;

    fn service() -> (MemoryCollection<Order>, OrderService<MemoryCollection<Order>>) {
        let repo = MemoryCollection::new();
        let svc = OrderService::new(repo.clone(), Arc::new(UuidIdGenerator));
        (repo, svc)
    }

    fn new_order() -> Value {
        json!({ "data": {
            "deliverTo": "A", "mobileNumber": "555",
            "dishes": [{ "id": "d1", "quantity": 2 }]
        }})
    }

    fn with_status(id: &str, status: &str) -> Value {
        json!({ "data": {
            "id": id, "deliverTo": "B", "mobileNumber": "556", "status": status,
            "dishes": [{ "id": "d1", "quantity": 3 }]
        }})
    }

    #[tokio::test]
    async fn create_forces_initial_status() {
        let (_, svc) = service();
        let mut body = new_order();
        body["data"]["status"] = json!("pending");
        let created = svc.create_order(&body).await.unwrap();
        assert_eq!(created.status, OrderStatus::OutForDelivery);
        assert!(matches!(
            svc.delete_order(&created.id).await,
            Err(AppError::Validation(_))
        ));
        assert_eq!(svc.get_order(&created.id).await.unwrap(), created);
    }

    #[tokio::test]
    async fn empty_dishes_are_rejected() {
        let (repo, svc) = service();
        let body = json!({ "data": { "deliverTo": "A", "mobileNumber": "555", "dishes": [] } });
        assert!(matches!(
            svc.create_order(&body).await,
            Err(AppError::Validation(_))
        ));
        assert!(repo.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_then_delete_only_when_pending() {
        let (repo, svc) = service();
        let created = svc.create_order(&new_order()).await.unwrap();

        let updated = svc
            .update_order(&created.id, &with_status(&created.id, "preparing"))
            .await
            .unwrap();
        assert_eq!(updated.status, OrderStatus::Preparing);
        assert_eq!(updated.deliver_to, "B");

        let refused = svc.delete_order(&created.id).await;
        assert!(matches!(refused, Err(AppError::Validation(ref m)) if m.contains("pending")));
        assert_eq!(repo.list().await.unwrap().len(), 1);

        svc.update_order(&created.id, &with_status("", "pending"))
            .await
            .unwrap();
        svc.delete_order(&created.id).await.unwrap();
        assert!(repo.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn line_without_dish_reference_is_rejected() {
        let (repo, svc) = service();
        let body = json!({ "data": { "deliverTo": "A", "mobileNumber": "555", "dishes": [{ "quantity": 1 }] } });
        assert!(matches!(
            svc.create_order(&body).await,
            Err(AppError::Validation(_))
        ));
        assert!(repo.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn mismatched_id_leaves_order_unchanged() {
        let (_, svc) = service();
        let created = svc.create_order(&new_order()).await.unwrap();
        let res = svc
            .update_order(&created.id, &with_status("someone-else", "preparing"))
            .await;
        assert!(matches!(res, Err(AppError::Validation(ref m)) if m.contains("someone-else")));
        assert_eq!(svc.get_order(&created.id).await.unwrap(), created);
    }

    #[tokio::test]
    async fn invalid_status_leaves_order_unchanged() {
        let (_, svc) = service();
        let created = svc.create_order(&new_order()).await.unwrap();
        let res = svc
            .update_order(&created.id, &with_status(&created.id, "lost"))
            .await;
        assert!(matches!(res, Err(AppError::Validation(_))));
        assert_eq!(svc.get_order(&created.id).await.unwrap(), created);
    }

    #[tokio::test]
    async fn not_found_paths() {
        let (_, svc) = service();
        assert!(matches!(svc.get_order("x").await, Err(AppError::NotFound(_))));
        assert!(matches!(
            svc.update_order("x", &with_status("x", "pending")).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(svc.delete_order("x").await, Err(AppError::NotFound(_))));
    }
}
