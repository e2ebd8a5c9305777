///  To run :
///  cargo r --example client_example
use grubdash_client::GrubDashClient;
use grubdash_hex::application::dish_service::DishService;
use grubdash_hex::application::order_service::OrderService;
use grubdash_hex::inbound::http::{HttpServer, HttpServerConfig};
use grubdash_repo::build_repos;
use grubdash_types::domain::dish::DishDraft;
use grubdash_types::domain::order::{OrderDraft, OrderLine, OrderStatus};
use std::sync::Arc;

fn find_free_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Start server on ephemeral port with empty in-memory collections.
    let port = find_free_port();
    let addr = format!("http://127.0.0.1:{port}/");

    let repos = build_repos(None).await?;
    let server = HttpServer::new(
        DishService::new(repos.dishes, Arc::clone(&repos.ids)),
        OrderService::new(repos.orders, repos.ids),
        HttpServerConfig {
            port: port.to_string(),
        },
    )
    .await?;

    let handle = tokio::spawn(async move {
        server.run().await.expect("server run");
    });
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    // Use client against the running server.
    let client = GrubDashClient::new(&addr)?;
    let dish = client
        .create_dish(&DishDraft {
            name: "Falafel".into(),
            description: "Chickpea fritters".into(),
            price: 9.0,
            image_url: "https://images.example/falafel.jpg".into(),
        })
        .await?;
    println!("Created dish id={}", dish.id);

    let order = client
        .create_order(&OrderDraft {
            deliver_to: "221B Baker St".into(),
            mobile_number: "555-0199".into(),
            status: None,
            dishes: vec![OrderLine::new(dish.id.clone(), 2)],
        })
        .await?;
    println!("Created order id={} status={}", order.id, order.status);
    assert_eq!(order.status, OrderStatus::OutForDelivery);

    let mut draft = OrderDraft {
        deliver_to: order.deliver_to.clone(),
        mobile_number: order.mobile_number.clone(),
        status: Some(OrderStatus::Preparing),
        dishes: order.dishes.clone(),
    };
    let updated = client.update_order(&order.id, &draft).await?;
    println!("Updated status={} for id {}", updated.status, updated.id);

    // Preparing orders cannot be deleted; put it back to pending first.
    if client.delete_order(&order.id).await.is_err() {
        println!("Delete refused while preparing; reverting to pending...");
        draft.status = Some(OrderStatus::Pending);
        client.update_order(&order.id, &draft).await?;
        client.delete_order(&order.id).await?;
        println!("Deleted order id={}", order.id);
    }

    handle.abort();
    Ok(())
}
