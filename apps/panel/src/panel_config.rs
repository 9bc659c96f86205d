use std::env;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use hearthware_application::AliasTable;
use hearthware_core::AppError;
use tracing_subscriber::EnvFilter;

/// Where identity, roles and blogs live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendConfig {
    /// Everything in process memory; for local development.
    Memory {
        /// Account seeded as admin at startup, if both values are set.
        dev_admin: Option<(String, String)>,
    },
    /// Hosted auth and REST endpoints.
    Remote { url: String, anon_key: String },
}

#[derive(Debug, Clone)]
pub struct PanelConfig {
    pub panel_host: String,
    pub panel_port: u16,
    pub frontend_url: String,
    pub backend: BackendConfig,
    pub storage_dir: Option<PathBuf>,
    pub redis_url: Option<String>,
    pub bootstrap_admin_email: Option<String>,
    pub aliases: AliasTable,
}

impl PanelConfig {
    pub fn load() -> Result<Self, AppError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from any variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };
        let required = |name: &str| {
            optional(name).ok_or_else(|| AppError::Validation(format!("{name} is required")))
        };

        let panel_host = optional("PANEL_HOST").unwrap_or_else(|| "127.0.0.1".to_owned());
        let panel_port = match optional("PANEL_PORT") {
            Some(value) => value
                .parse::<u16>()
                .map_err(|error| AppError::Validation(format!("invalid PANEL_PORT: {error}")))?,
            None => 3002,
        };
        let frontend_url =
            optional("FRONTEND_URL").unwrap_or_else(|| "http://localhost:3000".to_owned());

        let backend = match optional("BACKEND").as_deref().unwrap_or("memory") {
            "memory" => BackendConfig::Memory {
                dev_admin: optional("DEV_ADMIN_EMAIL").zip(optional("DEV_ADMIN_PASSWORD")),
            },
            "remote" => BackendConfig::Remote {
                url: required("REMOTE_URL")?,
                anon_key: required("REMOTE_ANON_KEY")?,
            },
            other => {
                return Err(AppError::Validation(format!(
                    "BACKEND must be either 'memory' or 'remote', got '{other}'"
                )));
            }
        };

        let aliases = match optional("AUTH_ALIASES") {
            Some(value) => AliasTable::from_str(&value)?,
            None => AliasTable::new(),
        };

        Ok(Self {
            panel_host,
            panel_port,
            frontend_url,
            backend,
            storage_dir: optional("STORAGE_DIR").map(PathBuf::from),
            redis_url: optional("REDIS_URL"),
            bootstrap_admin_email: optional("BOOTSTRAP_ADMIN_EMAIL"),
            aliases,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.panel_host).map_err(|error| {
            AppError::Validation(format!("invalid PANEL_HOST '{}': {error}", self.panel_host))
        })?;
        Ok(SocketAddr::from((host, self.panel_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}
