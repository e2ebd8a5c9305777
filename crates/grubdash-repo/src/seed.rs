use std::path::Path;

use anyhow::Context;
use grubdash_types::domain::dish::Dish;
use grubdash_types::domain::order::Order;
use serde::Deserialize;

/// Initial contents of the collections, e.g.
/// `{"dishes": [...], "orders": [...]}`. Missing keys mean empty.
#[derive(Debug, Default, Deserialize)]
pub struct Seed {
    #[serde(default)]
    pub dishes: Vec<Dish>,
    #[serde(default)]
    pub orders: Vec<Order>,
}

pub async fn load_seed(path: &Path) -> anyhow::Result<Seed> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading seed file {}", path.display()))?;
    let seed: Seed = serde_json::from_str(&raw)
        .with_context(|| format!("parsing seed file {}", path.display()))?;
    Ok(seed)
}
