use std::time::Duration;

use reqwest::header::COOKIE;
use reqwest::{Method, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::{ClientError, ClientResult};
use crate::session::SessionContext;

/// Shared HTTP plumbing: base URL, session cookie and status handling.
#[derive(Debug, Clone)]
pub(crate) struct Transport {
    http: reqwest::Client,
    base_url: Url,
    session: SessionContext,
}

impl Transport {
    pub(crate) fn new(base_url: &str, session: SessionContext, timeout: Duration) -> ClientResult<Self> {
        let base_url = Url::parse(base_url).map_err(|error| {
            ClientError::Validation(format!("invalid API base URL '{base_url}': {error}"))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::Validation(format!(
                "API base URL '{base_url}' cannot carry a path"
            )));
        }

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| ClientError::Transport(format!("failed to build HTTP client: {error}")))?;

        Ok(Self {
            http,
            base_url,
            session,
        })
    }

    pub(crate) fn session(&self) -> &SessionContext {
        &self.session
    }

    /// Builds an endpoint URL. Segments are percent-encoded individually.
    pub(crate) fn endpoint(&self, segments: &[&str], query: &[(&str, String)]) -> ClientResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                ClientError::Validation(format!(
                    "API base URL '{}' cannot carry a path",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend(segments);

        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (name, value) in query {
                pairs.append_pair(name, value.as_str());
            }
        }

        Ok(url)
    }

    pub(crate) async fn send_empty(&self, method: Method, url: Url) -> ClientResult<Response> {
        self.execute(self.http.request(method, url)).await
    }

    pub(crate) async fn send_json<B>(&self, method: Method, url: Url, body: &B) -> ClientResult<Response>
    where
        B: Serialize + ?Sized,
    {
        self.execute(self.http.request(method, url).json(body)).await
    }

    pub(crate) async fn decode<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
        response
            .json::<T>()
            .await
            .map_err(|error| ClientError::Decode(error.to_string()))
    }

    async fn execute(&self, request: RequestBuilder) -> ClientResult<Response> {
        let request = match self.session.cookie_header().await {
            Some(cookie) => request.header(COOKIE, cookie),
            None => request,
        };

        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let url = response.url().clone();
        let error = ClientError::from_response(response).await;
        debug!(
            status = status.as_u16(),
            url = %url,
            error = %error.display_message(),
            "request rejected"
        );
        Err(error)
    }
}
