use anyhow::{bail, Context, Result};
use std::{env, net::SocketAddr};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Postgres,
    Memory,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub store: StoreKind,
    pub database_url: Option<String>,
    pub bind_addr: SocketAddr,
    pub max_connections: u32,
    /// How many recent periods feed the phase computation.
    pub phase_history_limit: i64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let store = match lookup("STORE").as_deref() {
            None | Some("postgres") => StoreKind::Postgres,
            Some("memory") => StoreKind::Memory,
            Some(other) => bail!("STORE must be 'postgres' or 'memory', got '{}'", other),
        };

        let database_url = lookup("DATABASE_URL");
        if store == StoreKind::Postgres && database_url.is_none() {
            bail!("DATABASE_URL must be set when STORE=postgres");
        }

        let bind_addr = lookup("BIND_ADDR")
            .map(|v| v.parse::<SocketAddr>().with_context(|| format!("invalid BIND_ADDR '{}'", v)))
            .transpose()?
            .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3050)));

        let max_connections = lookup("DB_MAX_CONNECTIONS")
            .map(|v| v.parse::<u32>().with_context(|| format!("invalid DB_MAX_CONNECTIONS '{}'", v)))
            .transpose()?
            .unwrap_or(5);

        let phase_history_limit = lookup("PHASE_HISTORY_LIMIT")
            .map(|v| v.parse::<i64>().with_context(|| format!("invalid PHASE_HISTORY_LIMIT '{}'", v)))
            .transpose()?
            .unwrap_or(10);
        if phase_history_limit < 1 {
            bail!("PHASE_HISTORY_LIMIT must be at least 1");
        }

        Ok(Self {
            store,
            database_url,
            bind_addr,
            max_connections,
            phase_history_limit,
        })
    }
}
