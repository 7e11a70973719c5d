use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use mes_core::{AppError, TenantId};
use tracing_subscriber::EnvFilter;

/// Where roles, permissions and sessions are stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    /// PostgreSQL with embedded migrations.
    Postgres {
        /// Connection string.
        database_url: String,
    },
    /// Process-local maps; state is lost on restart.
    Memory,
}

impl StorageBackend {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Postgres { .. } => "postgres",
            Self::Memory => "memory",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub migrate_only: bool,
    pub storage: StorageBackend,
    pub frontend_url: String,
    pub bootstrap_token: String,
    pub api_host: String,
    pub api_port: u16,
    pub cookie_secure: bool,
    pub tenant_id: TenantId,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        let migrate_only = env::args().nth(1).as_deref() == Some("migrate");
        let mut config = Self::from_lookup(|name| env::var(name).ok())?;
        config.migrate_only = migrate_only;

        if config.migrate_only && config.storage == StorageBackend::Memory {
            return Err(AppError::Validation(
                "migrate requires STORAGE_BACKEND=postgres".to_owned(),
            ));
        }

        Ok(config)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let storage = match lookup("STORAGE_BACKEND")
            .unwrap_or_else(|| "postgres".to_owned())
            .to_ascii_lowercase()
            .as_str()
        {
            "postgres" => StorageBackend::Postgres {
                database_url: required_non_empty(&lookup, "DATABASE_URL")?,
            },
            "memory" => StorageBackend::Memory,
            other => {
                return Err(AppError::Validation(format!(
                    "STORAGE_BACKEND must be either 'postgres' or 'memory', got '{other}'"
                )));
            }
        };

        let frontend_url =
            lookup("FRONTEND_URL").unwrap_or_else(|| "http://localhost:3000".to_owned());
        let bootstrap_token = required_non_empty(&lookup, "AUTH_BOOTSTRAP_TOKEN")?;

        let api_host = lookup("API_HOST").unwrap_or_else(|| "127.0.0.1".to_owned());
        let api_port = match lookup("API_PORT") {
            Some(value) => value.parse::<u16>().map_err(|error| {
                AppError::Validation(format!("invalid API_PORT '{value}': {error}"))
            })?,
            None => 3001,
        };

        let cookie_secure = lookup("SESSION_COOKIE_SECURE")
            .unwrap_or_else(|| "false".to_owned())
            .eq_ignore_ascii_case("true");

        let tenant_id = lookup("DEFAULT_TENANT_ID")
            .filter(|value| !value.trim().is_empty())
            .map(|value| {
                uuid::Uuid::parse_str(value.trim())
                    .map(TenantId::from_uuid)
                    .map_err(|error| {
                        AppError::Validation(format!("invalid DEFAULT_TENANT_ID: {error}"))
                    })
            })
            .transpose()?
            .unwrap_or_else(TenantId::default_plant);

        Ok(Self {
            migrate_only: false,
            storage,
            frontend_url,
            bootstrap_token,
            api_host,
            api_port,
            cookie_secure,
            tenant_id,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Internal(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
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

fn required_non_empty(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
) -> Result<String, AppError> {
    let value = lookup(name).ok_or_else(|| AppError::Validation(format!("{name} is required")))?;
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{name} must not be empty")));
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use mes_core::{AppError, TenantId};

    use super::{ApiConfig, StorageBackend};

    fn load(pairs: &[(&str, &str)]) -> Result<ApiConfig, AppError> {
        let values: HashMap<String, String> = pairs
            .iter()
            .map(|(name, value)| ((*name).to_owned(), (*value).to_owned()))
            .collect();
        ApiConfig::from_lookup(|name| values.get(name).cloned())
    }

    #[test]
    fn postgres_backend_requires_database_url() {
        let result = load(&[("AUTH_BOOTSTRAP_TOKEN", "secret")]);
        assert!(matches!(result, Err(AppError::Validation(message)) if message == "DATABASE_URL is required"));
    }

    #[test]
    fn memory_backend_uses_defaults() {
        let config = load(&[
            ("STORAGE_BACKEND", "memory"),
            ("AUTH_BOOTSTRAP_TOKEN", "secret"),
        ]);

        assert!(config.is_ok());
        let config = config.unwrap_or_else(|_| unreachable!());
        assert_eq!(config.storage, StorageBackend::Memory);
        assert_eq!(config.api_port, 3001);
        assert_eq!(config.tenant_id, TenantId::default_plant());
        assert!(!config.cookie_secure);
        assert!(config.socket_address().is_ok());
    }

    #[test]
    fn unknown_backend_and_bad_port_are_rejected() {
        let backend = load(&[
            ("STORAGE_BACKEND", "redis"),
            ("AUTH_BOOTSTRAP_TOKEN", "secret"),
        ]);
        let port = load(&[
            ("STORAGE_BACKEND", "memory"),
            ("AUTH_BOOTSTRAP_TOKEN", "secret"),
            ("API_PORT", "http"),
        ]);

        assert!(matches!(backend, Err(AppError::Validation(_))));
        assert!(matches!(port, Err(AppError::Validation(_))));
    }

    #[test]
    fn blank_bootstrap_token_is_rejected() {
        let result = load(&[("STORAGE_BACKEND", "memory"), ("AUTH_BOOTSTRAP_TOKEN", " ")]);
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
