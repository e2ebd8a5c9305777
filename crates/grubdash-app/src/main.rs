use grubdash_hex::application::dish_service::DishService;
use grubdash_hex::application::order_service::OrderService;
use grubdash_hex::config::Config;
use grubdash_hex::inbound::http::{HttpServer, HttpServerConfig};
use grubdash_repo::{build_repos, Repos};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env for SERVER_PORT / GRUBDASH_SEED when present.
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "debug".to_string()))
        .init();

    let config = Config::from_env()?;
    let repos: Repos = build_repos(config.seed_path.as_deref()).await?;
    let dishes = DishService::new(repos.dishes, Arc::clone(&repos.ids));
    let orders = OrderService::new(repos.orders, repos.ids);

    let server_cfg = HttpServerConfig {
        port: config.server_port.clone(),
    };

    let http = HttpServer::new(dishes, orders, server_cfg).await?;
    http.run().await
}
