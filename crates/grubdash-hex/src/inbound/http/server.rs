use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{Method, StatusCode, Uri},
    routing::get,
    serve, Json, Router,
};
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::application::dish_service::DishService;
use crate::application::order_service::OrderService;
use crate::errors::AppError;
use grubdash_types::domain::dish::Dish;
use grubdash_types::domain::order::Order;
use grubdash_types::envelope::Envelope;
use grubdash_types::ports::dish_repository::DishRepository;
use grubdash_types::ports::order_repository::OrderRepository;

#[derive(Clone)]
pub struct HttpServerConfig {
    pub port: String,
}

pub struct HttpServer<D, O>
where
    D: DishRepository,
    O: OrderRepository,
{
    pub dishes: Arc<DishService<D>>,
    pub orders: Arc<OrderService<O>>,
    pub config: HttpServerConfig,
}

impl<D, O> HttpServer<D, O>
where
    D: DishRepository,
    O: OrderRepository,
{
    pub async fn new(
        dishes: DishService<D>,
        orders: OrderService<O>,
        config: HttpServerConfig,
    ) -> anyhow::Result<Self> {
        Ok(Self {
            dishes: Arc::new(dishes),
            orders: Arc::new(orders),
            config,
        })
    }

    /// All routes plus the unknown-path fallback, without tracing.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/health", get(health))
            .merge(dish_routes(self.dishes.clone()))
            .merge(order_routes(self.orders.clone()))
            .fallback(path_not_found)
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let trace_layer = TraceLayer::new_for_http()
            .make_span_with(|request: &axum::extract::Request<_>| {
                let uri = request.uri().to_string();
                let request_id = Uuid::new_v4();
                tracing::info_span!(
                    "http_request",
                    %request_id,
                    method = %request.method(),
                    uri
                )
            })
            .on_request(
                |request: &axum::extract::Request<_>, span: &tracing::Span| {
                    tracing::info!(
                        parent: span,
                        method = %request.method(),
                        uri = %request.uri(),
                        "request"
                    );
                },
            )
            .on_response(
                |response: &axum::response::Response, latency: Duration, span: &tracing::Span| {
                    tracing::info!(
                        parent: span,
                        status = %response.status(),
                        latency_ms = %latency.as_millis(),
                        "response"
                    );
                },
            );

        let app = self.router().layer(trace_layer);

        let addr: SocketAddr = format!("0.0.0.0:{}", self.config.port).parse()?;
        tracing::info!("starting server on {}", addr);
        let listener = tokio::net::TcpListener::bind(addr).await?;
        serve(listener, app.into_make_service()).await?;
        Ok(())
    }
}

fn dish_routes<D: DishRepository>(service: Arc<DishService<D>>) -> Router {
    Router::new()
        .route(
            "/dishes",
            get(list_dishes::<D>)
                .post(create_dish::<D>)
                .fallback(method_not_allowed),
        )
        .route(
            "/dishes/{dish_id}",
            get(get_dish::<D>)
                .put(update_dish::<D>)
                .fallback(method_not_allowed),
        )
        .with_state(service)
}

fn order_routes<O: OrderRepository>(service: Arc<OrderService<O>>) -> Router {
    Router::new()
        .route(
            "/orders",
            get(list_orders::<O>)
                .post(create_order::<O>)
                .fallback(method_not_allowed),
        )
        .route(
            "/orders/{order_id}",
            get(get_order::<O>)
                .put(update_order::<O>)
                .delete(delete_order::<O>)
                .fallback(method_not_allowed),
        )
        .with_state(service)
}

async fn health() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(serde_json::json!({ "status": "ok" })))
}

async fn path_not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("Path not found: {}", uri.path()))
}

async fn method_not_allowed(method: Method, uri: Uri) -> AppError {
    AppError::MethodNotAllowed(format!("{} not allowed for {}", method, uri.path()))
}

fn json_body(payload: Result<Json<Value>, JsonRejection>) -> Result<Value, AppError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| AppError::Validation(rejection.body_text()))
}

async fn list_dishes<D: DishRepository>(
    State(service): State<Arc<DishService<D>>>,
) -> Result<Json<Envelope<Vec<Dish>>>, AppError> {
    let list = service.list_dishes().await?;
    Ok(Json(Envelope::new(list)))
}

async fn get_dish<D: DishRepository>(
    State(service): State<Arc<DishService<D>>>,
    Path(dish_id): Path<String>,
) -> Result<Json<Envelope<Dish>>, AppError> {
    let dish = service.get_dish(&dish_id).await?;
    Ok(Json(Envelope::new(dish)))
}

async fn create_dish<D: DishRepository>(
    State(service): State<Arc<DishService<D>>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Envelope<Dish>>), AppError> {
    let body = json_body(payload)?;
    let dish = service.create_dish(&body).await?;
    Ok((StatusCode::CREATED, Json(Envelope::new(dish))))
}

async fn update_dish<D: DishRepository>(
    State(service): State<Arc<DishService<D>>>,
    Path(dish_id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Envelope<Dish>>, AppError> {
    let body = json_body(payload)?;
    let dish = service.update_dish(&dish_id, &body).await?;
    Ok(Json(Envelope::new(dish)))
}

async fn list_orders<O: OrderRepository>(
    State(service): State<Arc<OrderService<O>>>,
) -> Result<Json<Envelope<Vec<Order>>>, AppError> {
    let list = service.list_orders().await?;
    Ok(Json(Envelope::new(list)))
}

async fn get_order<O: OrderRepository>(
    State(service): State<Arc<OrderService<O>>>,
    Path(order_id): Path<String>,
) -> Result<Json<Envelope<Order>>, AppError> {
    let order = service.get_order(&order_id).await?;
    Ok(Json(Envelope::new(order)))
}

async fn create_order<O: OrderRepository>(
    State(service): State<Arc<OrderService<O>>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Envelope<Order>>), AppError> {
    let body = json_body(payload)?;
    let order = service.create_order(&body).await?;
    Ok((StatusCode::CREATED, Json(Envelope::new(order))))
}

async fn update_order<O: OrderRepository>(
    State(service): State<Arc<OrderService<O>>>,
    Path(order_id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Envelope<Order>>, AppError> {
    let body = json_body(payload)?;
    let order = service.update_order(&order_id, &body).await?;
    Ok(Json(Envelope::new(order)))
}

async fn delete_order<O: OrderRepository>(
    State(service): State<Arc<OrderService<O>>>,
    Path(order_id): Path<String>,
) -> Result<StatusCode, AppError> {
    service.delete_order(&order_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
