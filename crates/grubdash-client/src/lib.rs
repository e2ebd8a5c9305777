use std::time::Duration;

use anyhow::Context;
use grubdash_types::domain::dish::{Dish, DishDraft};
use grubdash_types::domain::order::{Order, OrderDraft};
use grubdash_types::envelope::Envelope;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Response, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

#[derive(Clone)]
pub struct GrubDashClientBuilder {
    base: Url,
    headers: HeaderMap,
    timeout: Option<Duration>,
    client: Option<reqwest::Client>,
}

#[derive(Clone)]
pub struct GrubDashClient {
    base: Url,
    client: reqwest::Client,
}

/// Error body returned by the server on any failed request.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{status}: {message}")]
pub struct ApiError {
    pub status: u16,
    pub message: String,
}

/// Update bodies carry the route id alongside the draft fields.
#[derive(Serialize)]
struct WithId<'a, T> {
    id: &'a str,
    #[serde(flatten)]
    fields: &'a T,
}

impl GrubDashClient {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        Self::builder(base_url)?.build()
    }

    pub fn builder(base_url: &str) -> anyhow::Result<GrubDashClientBuilder> {
        let base = Url::parse(base_url).context("invalid base url")?;
        Ok(GrubDashClientBuilder {
            base,
            headers: HeaderMap::new(),
            timeout: None,
            client: None,
        })
    }

    fn url(&self, path: &str) -> anyhow::Result<Url> {
        self.base.join(path).context("failed to join url")
    }

    /// Turns a non-2xx response into an [`ApiError`] when the body has one.
    async fn check(res: Response) -> anyhow::Result<Response> {
        let status = res.status();
        if status.is_success() {
            return Ok(res);
        }
        let text = res.text().await.unwrap_or_default();
        match serde_json::from_str::<ApiError>(&text) {
            Ok(api) => Err(api.into()),
            Err(_) => Err(anyhow::anyhow!("request failed with {status}: {text}")),
        }
    }

    async fn data<T: DeserializeOwned>(res: Response) -> anyhow::Result<T> {
        let envelope: Envelope<T> = Self::check(res).await?.json().await?;
        Ok(envelope.into_inner())
    }

    pub async fn list_dishes(&self) -> anyhow::Result<Vec<Dish>> {
        let res = self.client.get(self.url("dishes")?).send().await?;
        Self::data(res).await
    }

    pub async fn get_dish(&self, id: &str) -> anyhow::Result<Dish> {
        let res = self
            .client
            .get(self.url(&format!("dishes/{id}"))?)
            .send()
            .await?;
        Self::data(res).await
    }

    pub async fn create_dish(&self, draft: &DishDraft) -> anyhow::Result<Dish> {
        let res = self
            .client
            .post(self.url("dishes")?)
            .json(&Envelope::new(draft))
            .send()
            .await?;
        Self::data(res).await
    }

    pub async fn update_dish(&self, id: &str, draft: &DishDraft) -> anyhow::Result<Dish> {
        let res = self
            .client
            .put(self.url(&format!("dishes/{id}"))?)
            .json(&Envelope::new(WithId { id, fields: draft }))
            .send()
            .await?;
        Self::data(res).await
    }

    pub async fn list_orders(&self) -> anyhow::Result<Vec<Order>> {
        let res = self.client.get(self.url("orders")?).send().await?;
        Self::data(res).await
    }

    pub async fn get_order(&self, id: &str) -> anyhow::Result<Order> {
        let res = self
            .client
            .get(self.url(&format!("orders/{id}"))?)
            .send()
            .await?;
        Self::data(res).await
    }

    pub async fn create_order(&self, draft: &OrderDraft) -> anyhow::Result<Order> {
        let res = self
            .client
            .post(self.url("orders")?)
            .json(&Envelope::new(draft))
            .send()
            .await?;
        Self::data(res).await
    }

    pub async fn update_order(&self, id: &str, draft: &OrderDraft) -> anyhow::Result<Order> {
        let res = self
            .client
            .put(self.url(&format!("orders/{id}"))?)
            .json(&Envelope::new(WithId { id, fields: draft }))
            .send()
            .await?;
        Self::data(res).await
    }

    pub async fn delete_order(&self, id: &str) -> anyhow::Result<()> {
        let res = self
            .client
            .delete(self.url(&format!("orders/{id}"))?)
            .send()
            .await?;
        Self::check(res).await?;
        tracing::debug!(order_id = id, "order deleted");
        Ok(())
    }
}

impl GrubDashClientBuilder {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_header(
        mut self,
        key: impl AsRef<str>,
        value: impl AsRef<str>,
    ) -> anyhow::Result<Self> {
        let header_name =
            HeaderName::from_bytes(key.as_ref().as_bytes()).context("invalid header name")?;
        let header_value = HeaderValue::from_str(value.as_ref()).context("invalid header value")?;
        self.headers.insert(header_name, header_value);
        Ok(self)
    }

    pub fn with_reqwest_client(mut self, client: reqwest::Client) -> Self {
        self.client = Some(client);
        self
    }

    pub fn build(self) -> anyhow::Result<GrubDashClient> {
        if let Some(client) = self.client {
            return Ok(GrubDashClient {
                base: self.base,
                client,
            });
        }

        let mut builder = reqwest::Client::builder();
        if !self.headers.is_empty() {
            builder = builder.default_headers(self.headers);
        }
        if let Some(t) = self.timeout {
            builder = builder.timeout(t);
        }
        let client = builder.build()?;
        Ok(GrubDashClient {
            base: self.base,
            client,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grubdash_types::domain::order::{OrderLine, OrderStatus};
    use httpmock::prelude::*;
    use serde_json::json;

    fn sample_dish() -> Dish {
        Dish::new(
            "d1",
            DishDraft {
                name: "Pasta".into(),
                description: "x".into(),
                price: 12.0,
                image_url: "http://x".into(),
            },
        )
    }

    fn sample_order() -> Order {
        Order::new(
            "o1",
            OrderDraft {
                deliver_to: "A".into(),
                mobile_number: "555".into(),
                status: None,
                dishes: vec![OrderLine::new("d1", 2)],
            },
        )
    }

    #[tokio::test]
    async fn create_and_get_dish() {
        let server = MockServer::start();
        let dish = sample_dish();
        let draft = DishDraft {
            name: dish.name.clone(),
            description: dish.description.clone(),
            price: dish.price,
            image_url: dish.image_url.clone(),
        };

        let create_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/dishes")
                .json_body_obj(&Envelope::new(draft.clone()));
            then.status(201).json_body_obj(&Envelope::new(&dish));
        });

        let get_mock = server.mock(|when, then| {
            when.method(GET).path("/dishes/d1");
            then.status(200).json_body_obj(&Envelope::new(&dish));
        });

        let client = GrubDashClient::new(&server.base_url()).unwrap();
        let created = client.create_dish(&draft).await.unwrap();
        assert_eq!(created, dish);
        let fetched = client.get_dish("d1").await.unwrap();
        assert_eq!(fetched.name, "Pasta");

        create_mock.assert();
        get_mock.assert();
    }

    #[tokio::test]
    async fn update_sends_route_id_in_body() {
        let server = MockServer::start();
        let dish = sample_dish();
        let update_mock = server.mock(|when, then| {
            when.method(httpmock::Method::PUT).path("/dishes/d1").json_body(json!({ "data": {
                "id": "d1", "name": "Pasta", "description": "x", "price": 12.0, "image_url": "http://x"
            }}));
            then.status(200).json_body_obj(&Envelope::new(&dish));
        });

        let client = GrubDashClient::new(&server.base_url()).unwrap();
        let draft = DishDraft {
            name: "Pasta".into(),
            description: "x".into(),
            price: 12.0,
            image_url: "http://x".into(),
        };
        client.update_dish("d1", &draft).await.unwrap();
        update_mock.assert();
    }

    #[tokio::test]
    async fn list_update_delete_orders() {
        let server = MockServer::start();
        let order = sample_order();

        let list_mock = server.mock(|when, then| {
            when.method(GET).path("/orders");
            then.status(200).json_body_obj(&Envelope::new(vec![order.clone()]));
        });

        let mut updated = order.clone();
        updated.status = OrderStatus::Preparing;
        let update_mock = server.mock(|when, then| {
            when.method(httpmock::Method::PUT).path("/orders/o1");
            then.status(200).json_body_obj(&Envelope::new(&updated));
        });

        let delete_mock = server.mock(|when, then| {
            when.method(DELETE).path("/orders/o1");
            then.status(204);
        });

        let client = GrubDashClient::new(&server.base_url()).unwrap();
        let listed = client.list_orders().await.unwrap();
        assert_eq!(listed.len(), 1);

        let draft = OrderDraft {
            deliver_to: order.deliver_to.clone(),
            mobile_number: order.mobile_number.clone(),
            status: Some(OrderStatus::Preparing),
            dishes: order.dishes.clone(),
        };
        let got = client.update_order("o1", &draft).await.unwrap();
        assert_eq!(got.status, OrderStatus::Preparing);

        client.delete_order("o1").await.unwrap();

        list_mock.assert();
        update_mock.assert();
        delete_mock.assert();
    }

    #[tokio::test]
    async fn error_body_becomes_api_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(DELETE).path("/orders/o1");
            then.status(400).json_body(json!({
                "status": 400,
                "message": "order cannot be deleted unless order status = 'pending'"
            }));
        });

        let client = GrubDashClient::new(&server.base_url()).unwrap();
        let err = client.delete_order("o1").await.unwrap_err();
        let api = err.downcast_ref::<ApiError>().expect("api error");
        assert_eq!(api.status, 400);
        assert!(api.message.contains("pending"));
    }
}
