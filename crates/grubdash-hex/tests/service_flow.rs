use std::sync::Arc;

use grubdash_hex::application::dish_service::DishService;
use grubdash_hex::application::order_service::OrderService;
use grubdash_hex::errors::AppError;
use grubdash_repo::build_repos;
use grubdash_types::domain::order::OrderStatus;
use serde_json::json;

// End-to-end service flow against the in-memory collections.
#[tokio::test]
async fn dish_and_order_lifecycle() {
    let repos = build_repos(None).await.unwrap();
    let dishes = DishService::new(repos.dishes.clone(), Arc::clone(&repos.ids));
    let orders = OrderService::new(repos.orders.clone(), Arc::clone(&repos.ids));

    let dish = dishes
        .create_dish(&json!({ "data": {
            "name": "Pasta", "description": "x", "price": 12, "image_url": "http://x"
        }}))
        .await
        .unwrap();
    assert_eq!(dishes.list_dishes().await.unwrap(), vec![dish.clone()]);

    let order = orders
        .create_order(&json!({ "data": {
            "deliverTo": "A", "mobileNumber": "555",
            "dishes": [{ "id": dish.id, "name": dish.name, "quantity": 1 }]
        }}))
        .await
        .unwrap();
    assert_eq!(order.status, OrderStatus::OutForDelivery);
    assert_eq!(order.dishes[0].id, dish.id);
    assert_ne!(order.id, dish.id);

    let updated = orders
        .update_order(
            &order.id,
            &json!({ "data": {
                "deliverTo": "A", "mobileNumber": "555", "status": "preparing",
                "dishes": [{ "id": dish.id, "quantity": 4 }]
            }}),
        )
        .await
        .unwrap();
    assert_eq!(updated.status, OrderStatus::Preparing);
    assert_eq!(updated.dishes[0].quantity, 4);

    let refused = orders.delete_order(&order.id).await;
    assert!(matches!(refused, Err(AppError::Validation(_))));
    assert_eq!(orders.list_orders().await.unwrap().len(), 1);
}

#[tokio::test]
async fn services_are_isolated_per_repository() {
    let first = build_repos(None).await.unwrap();
    let second = build_repos(None).await.unwrap();
    let a = DishService::new(first.dishes, first.ids);
    let b = DishService::new(second.dishes, second.ids);

    a.create_dish(&json!({ "data": {
        "name": "Soup", "description": "hot", "price": 3.5, "image_url": "i"
    }}))
    .await
    .unwrap();

    assert_eq!(a.list_dishes().await.unwrap().len(), 1);
    assert!(b.list_dishes().await.unwrap().is_empty());
}
