use serde::Deserialize;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server_port: String,
    pub seed_path: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let server_port = env::var("SERVER_PORT").unwrap_or_else(|_| "5000".into());
        server_port
            .parse::<u16>()
            .map_err(|e| anyhow::anyhow!("invalid SERVER_PORT {server_port:?}: {e}"))?;
        let seed_path = env::var("GRUBDASH_SEED").ok().map(PathBuf::from);
        Ok(Self {
            server_port,
            seed_path,
        })
    }
}
