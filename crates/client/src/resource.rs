use std::fmt::Display;
use std::marker::PhantomData;

use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;

use mes_domain::Page;

use crate::error::ClientResult;
use crate::transport::Transport;
use crate::wire::PageQuery;

/// Converts list filters into query parameters.
pub trait QueryFilter {
    /// Returns `(name, value)` pairs; absent filters are omitted.
    fn query_pairs(&self) -> Vec<(&'static str, String)>;
}

impl QueryFilter for () {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }
}

/// Status transition endpoints shared by every resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTransition {
    /// `POST /{resource}/{id}/activate`
    Activate,
    /// `POST /{resource}/{id}/deactivate`
    Deactivate,
    /// `POST /{resource}/{id}/toggle-active`
    ToggleActive,
}

impl StatusTransition {
    fn segment(self) -> &'static str {
        match self {
            Self::Activate => "activate",
            Self::Deactivate => "deactivate",
            Self::ToggleActive => "toggle-active",
        }
    }
}

/// Client for one REST resource following the shared CRUD contract.
///
/// `T` is the entity shape the server returns and `F` the list filter type.
pub struct ResourceClient<T, F = ()> {
    transport: Transport,
    segments: &'static [&'static str],
    marker: PhantomData<fn() -> (T, F)>,
}

impl<T, F> Clone for ResourceClient<T, F> {
    fn clone(&self) -> Self {
        Self {
            transport: self.transport.clone(),
            segments: self.segments,
            marker: PhantomData,
        }
    }
}

impl<T, F> ResourceClient<T, F>
where
    T: DeserializeOwned,
    F: QueryFilter,
{
    pub(crate) fn new(transport: Transport, segments: &'static [&'static str]) -> Self {
        Self {
            transport,
            segments,
            marker: PhantomData,
        }
    }

    /// `GET /{resource}`
    pub async fn list(&self, filter: &F) -> ClientResult<Vec<T>> {
        let url = self.transport.endpoint(self.segments, &filter.query_pairs())?;
        let response = self.transport.send_empty(Method::GET, url).await?;
        Transport::decode(response).await
    }

    /// `GET /{resource}?page=..&size=..`
    pub async fn list_page(&self, page: PageQuery, filter: &F) -> ClientResult<Page<T>> {
        let mut query = page.query_pairs();
        query.extend(filter.query_pairs());
        let url = self.transport.endpoint(self.segments, &query)?;
        let response = self.transport.send_empty(Method::GET, url).await?;
        Transport::decode(response).await
    }

    /// `GET /{resource}/{id}`
    pub async fn get(&self, id: impl Display) -> ClientResult<T> {
        let url = self.member(&id.to_string(), &[])?;
        let response = self.transport.send_empty(Method::GET, url).await?;
        Transport::decode(response).await
    }

    /// `POST /{resource}`
    pub async fn create<B>(&self, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
    {
        let url = self.transport.endpoint(self.segments, &[])?;
        let response = self.transport.send_json(Method::POST, url, body).await?;
        Transport::decode(response).await
    }

    /// `PUT /{resource}/{id}`
    pub async fn update<B>(&self, id: impl Display, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
    {
        let url = self.member(&id.to_string(), &[])?;
        let response = self.transport.send_json(Method::PUT, url, body).await?;
        Transport::decode(response).await
    }

    /// `DELETE /{resource}/{id}`
    pub async fn delete(&self, id: impl Display) -> ClientResult<()> {
        let url = self.member(&id.to_string(), &[])?;
        self.transport.send_empty(Method::DELETE, url).await?;
        Ok(())
    }

    /// `POST /{resource}/{id}/{activate|deactivate|toggle-active}`
    pub async fn transition(&self, id: impl Display, transition: StatusTransition) -> ClientResult<T> {
        let url = self.member(&id.to_string(), &[transition.segment()])?;
        let response = self.transport.send_empty(Method::POST, url).await?;
        Transport::decode(response).await
    }

    /// Shorthand for [`StatusTransition::Activate`].
    pub async fn activate(&self, id: impl Display) -> ClientResult<T> {
        self.transition(id, StatusTransition::Activate).await
    }

    /// Shorthand for [`StatusTransition::Deactivate`].
    pub async fn deactivate(&self, id: impl Display) -> ClientResult<T> {
        self.transition(id, StatusTransition::Deactivate).await
    }

    /// Shorthand for [`StatusTransition::ToggleActive`].
    pub async fn toggle_active(&self, id: impl Display) -> ClientResult<T> {
        self.transition(id, StatusTransition::ToggleActive).await
    }

    /// `GET /{resource}/{id}/{child}`
    pub(crate) async fn list_children<U: DeserializeOwned>(
        &self,
        id: impl Display,
        child: &str,
    ) -> ClientResult<Vec<U>> {
        let url = self.member(&id.to_string(), &[child])?;
        let response = self.transport.send_empty(Method::GET, url).await?;
        Transport::decode(response).await
    }

    /// `POST|DELETE /{resource}/{id}/{child}/{child_id}`
    pub(crate) async fn edit_child(
        &self,
        method: Method,
        id: impl Display,
        child: &str,
        child_id: impl Display,
    ) -> ClientResult<()> {
        let child_id = child_id.to_string();
        let url = self.member(&id.to_string(), &[child, child_id.as_str()])?;
        self.transport.send_empty(method, url).await?;
        Ok(())
    }

    fn member(&self, id: &str, rest: &[&str]) -> ClientResult<url::Url> {
        let mut segments: Vec<&str> = self.segments.to_vec();
        segments.push(id);
        segments.extend_from_slice(rest);
        self.transport.endpoint(&segments, &[])
    }
}
