use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, SET_COOKIE};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::{ClientError, ClientResult};

/// Name of the session cookie issued by the API.
pub const SESSION_COOKIE_NAME: &str = "mes_session";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PersistedSession {
    cookie: String,
    saved_at: DateTime<Utc>,
}

/// Authentication session shared by every request a client makes.
///
/// Holds the session cookie in memory and optionally mirrors it to a file so a
/// later process can [`hydrate`](Self::hydrate) it. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    store: Option<PathBuf>,
    cookie: Arc<RwLock<Option<String>>>,
}

impl SessionContext {
    /// Creates a session that lives only as long as the process.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Creates a session mirrored to `path`.
    #[must_use]
    pub fn persisted(path: impl Into<PathBuf>) -> Self {
        Self {
            store: Some(path.into()),
            cookie: Arc::default(),
        }
    }

    /// Returns the backing file, if any.
    #[must_use]
    pub fn store_path(&self) -> Option<&Path> {
        self.store.as_deref()
    }

    /// Loads a persisted session. Returns whether one was found.
    pub async fn hydrate(&self) -> ClientResult<bool> {
        let Some(path) = self.store.as_deref() else {
            return Ok(self.is_authenticated().await);
        };

        let contents = match tokio::fs::read_to_string(path).await {
            Ok(contents) => contents,
            Err(error) if error.kind() == ErrorKind::NotFound => return Ok(false),
            Err(error) => {
                return Err(ClientError::Session(format!(
                    "failed to read session file '{}': {error}",
                    path.display()
                )));
            }
        };

        let persisted = serde_json::from_str::<PersistedSession>(contents.as_str()).map_err(|error| {
            ClientError::Session(format!(
                "failed to parse session file '{}': {error}",
                path.display()
            ))
        })?;

        debug!(saved_at = %persisted.saved_at, "hydrated session");
        *self.cookie.write().await = Some(persisted.cookie);
        Ok(true)
    }

    /// Stores a freshly issued session cookie.
    pub async fn establish(&self, cookie: String) -> ClientResult<()> {
        if let Some(path) = self.store.as_deref() {
            let persisted = PersistedSession {
                cookie: cookie.clone(),
                saved_at: Utc::now(),
            };
            let contents = serde_json::to_string_pretty(&persisted).map_err(|error| {
                ClientError::Session(format!("failed to encode session: {error}"))
            })?;

            if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
                tokio::fs::create_dir_all(parent).await.map_err(|error| {
                    ClientError::Session(format!(
                        "failed to create session directory '{}': {error}",
                        parent.display()
                    ))
                })?;
            }

            tokio::fs::write(path, contents).await.map_err(|error| {
                ClientError::Session(format!(
                    "failed to write session file '{}': {error}",
                    path.display()
                ))
            })?;
        }

        *self.cookie.write().await = Some(cookie);
        Ok(())
    }

    /// Clears the session in memory and on disk.
    pub async fn teardown(&self) -> ClientResult<()> {
        *self.cookie.write().await = None;

        let Some(path) = self.store.as_deref() else {
            return Ok(());
        };

        match tokio::fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(()),
            Err(error) => Err(ClientError::Session(format!(
                "failed to remove session file '{}': {error}",
                path.display()
            ))),
        }
    }

    /// Returns whether a session cookie is held.
    pub async fn is_authenticated(&self) -> bool {
        self.cookie.read().await.is_some()
    }

    /// Returns the `Cookie` header value for outgoing requests.
    pub(crate) async fn cookie_header(&self) -> Option<String> {
        self.cookie.read().await.clone()
    }
}

/// Extracts `name=value` of the session cookie from response headers.
pub(crate) fn session_cookie_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|value| value.split(';').next())
        .map(str::trim)
        .find(|pair| {
            pair.split_once('=')
                .is_some_and(|(name, value)| name == SESSION_COOKIE_NAME && !value.is_empty())
        })
        .map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use reqwest::header::{HeaderMap, HeaderValue, SET_COOKIE};

    use super::{SessionContext, session_cookie_from_headers};

    fn temp_session_path() -> std::path::PathBuf {
        std::env::temp_dir()
            .join("mes-client-tests")
            .join(format!("{}.json", uuid::Uuid::new_v4()))
    }

    #[tokio::test]
    async fn hydrate_without_file_reports_no_session() {
        let session = SessionContext::persisted(temp_session_path());

        assert!(matches!(session.hydrate().await, Ok(false)));
        assert!(!session.is_authenticated().await);
    }

    #[tokio::test]
    async fn established_session_survives_a_new_process() {
        let path = temp_session_path();
        let first = SessionContext::persisted(path.clone());
        assert!(first.establish("mes_session=abc".to_owned()).await.is_ok());

        let second = SessionContext::persisted(path);
        assert!(matches!(second.hydrate().await, Ok(true)));
        assert_eq!(
            second.cookie_header().await.as_deref(),
            Some("mes_session=abc")
        );
    }

    #[tokio::test]
    async fn teardown_clears_memory_and_file() {
        let path = temp_session_path();
        let session = SessionContext::persisted(path.clone());
        assert!(session.establish("mes_session=abc".to_owned()).await.is_ok());

        assert!(session.teardown().await.is_ok());
        assert!(!session.is_authenticated().await);
        assert!(!path.exists());

        let rehydrated = SessionContext::persisted(path);
        assert!(matches!(rehydrated.hydrate().await, Ok(false)));
    }

    #[tokio::test]
    async fn clones_share_state() {
        let session = SessionContext::in_memory();
        let clone = session.clone();
        assert!(session.establish("mes_session=abc".to_owned()).await.is_ok());

        assert!(clone.is_authenticated().await);
    }

    #[test]
    fn session_cookie_is_picked_from_set_cookie_headers() {
        let mut headers = HeaderMap::new();
        headers.append(SET_COOKIE, HeaderValue::from_static("other=1; Path=/"));
        headers.append(
            SET_COOKIE,
            HeaderValue::from_static("mes_session=xyz; HttpOnly; SameSite=Lax; Path=/"),
        );

        assert_eq!(
            session_cookie_from_headers(&headers).as_deref(),
            Some("mes_session=xyz")
        );
    }
}
