//! HTTP Resource Client
//!
//! One function per CRUD operation per resource, each issuing exactly one
//! request against the configured base endpoint.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::marker::PhantomData;
use std::sync::Arc;

use super::error::{ApiError, ApiResult};
use crate::config::ApiConfig;
use crate::models::{Client, DailyEntry, Id, Invoice, Resource, UploadedDocument, WeeklyTimesheet};

/// REST client shared by every page. Cloning is cheap.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Arc<str>,
}

impl ApiClient {
    /// Create a client for the configured endpoint
    pub fn new(config: &ApiConfig) -> ApiResult<Self> {
        let base_url = config.normalized_base_url();
        reqwest::Url::parse(base_url)
            .map_err(|e| ApiError::Config(format!("invalid base URL {:?}: {}", base_url, e)))?;

        // Upload overrides Content-Type per request; defaults only fill gaps
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let mut builder = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(config.user_agent.clone());
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(|e| ApiError::Config(e.to_string()))?;

        Ok(Self {
            http,
            base_url: Arc::from(base_url),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Typed handle on any resource collection
    pub fn resource<R: Resource>(&self) -> Endpoint<'_, R> {
        Endpoint {
            client: self,
            _resource: PhantomData,
        }
    }

    pub fn clients(&self) -> Endpoint<'_, Client> {
        self.resource()
    }

    pub fn documents(&self) -> Endpoint<'_, UploadedDocument> {
        self.resource()
    }

    pub fn timesheets(&self) -> Endpoint<'_, WeeklyTimesheet> {
        self.resource()
    }

    pub fn entries(&self) -> Endpoint<'_, DailyEntry> {
        self.resource()
    }

    pub fn invoices(&self) -> Endpoint<'_, Invoice> {
        self.resource()
    }

    pub(crate) fn collection_url<R: Resource>(&self) -> String {
        format!("{}/{}/", self.base_url, R::COLLECTION)
    }

    pub(crate) fn item_url<R: Resource>(&self, id: Id) -> String {
        format!("{}/{}/{}/", self.base_url, R::COLLECTION, id)
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Send a request and turn any non-success status into an [`ApiError`]
    pub(crate) async fn execute<R: Resource>(
        &self,
        request: RequestBuilder,
        id: Option<Id>,
    ) -> ApiResult<Response> {
        let response = request.send().await.map_err(ApiError::from_send)?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let err = ApiError::from_status(status.as_u16(), body, R::LABEL, id);
        tracing::warn!(
            resource = R::LABEL,
            status = status.as_u16(),
            error = %err,
            "API request rejected"
        );
        Err(err)
    }

    pub(crate) async fn decode<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
        let bytes = response.bytes().await.map_err(ApiError::from_send)?;
        serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

/// CRUD operations on one resource collection
pub struct Endpoint<'a, R> {
    pub(crate) client: &'a ApiClient,
    _resource: PhantomData<R>,
}

impl<'a, R: Resource> Endpoint<'a, R> {
    /// Fetch the whole collection; no paging, filtering or ordering
    pub async fn list(&self) -> ApiResult<Vec<R>> {
        let url = self.client.collection_url::<R>();
        tracing::debug!(method = "GET", %url, "list {}", R::COLLECTION);

        let response = self
            .client
            .execute::<R>(self.client.http().get(&url), None)
            .await?;
        ApiClient::decode(response).await
    }

    pub async fn get(&self, id: Id) -> ApiResult<R> {
        let url = self.client.item_url::<R>(id);
        tracing::debug!(method = "GET", %url, "get {}", R::LABEL);

        let response = self
            .client
            .execute::<R>(self.client.http().get(&url), Some(id))
            .await?;
        ApiClient::decode(response).await
    }

    /// Create a record; the server assigns the id and returns the full record
    pub async fn create(&self, draft: &R::Draft) -> ApiResult<R> {
        let url = self.client.collection_url::<R>();
        tracing::debug!(method = "POST", %url, "create {}", R::LABEL);

        let response = self
            .client
            .execute::<R>(self.client.http().post(&url).json(draft), None)
            .await?;
        ApiClient::decode(response).await
    }

    /// Partial update: only the fields present in `patch` are sent
    pub async fn update(&self, id: Id, patch: &R::Patch) -> ApiResult<R> {
        let url = self.client.item_url::<R>(id);
        tracing::debug!(method = "PUT", %url, "update {}", R::LABEL);

        let response = self
            .client
            .execute::<R>(self.client.http().put(&url).json(patch), Some(id))
            .await?;
        ApiClient::decode(response).await
    }

    /// Delete a record. Repeating the call for the same id is not
    /// guaranteed to succeed.
    pub async fn delete(&self, id: Id) -> ApiResult<()> {
        let url = self.client.item_url::<R>(id);
        tracing::debug!(method = "DELETE", %url, "delete {}", R::LABEL);

        self.client
            .execute::<R>(self.client.http().delete(&url), Some(id))
            .await?;
        Ok(())
    }
}

/// Data access seam used by page controllers
#[async_trait]
pub trait ResourceApi<R: Resource>: Send + Sync {
    async fn list(&self) -> ApiResult<Vec<R>>;

    async fn get(&self, id: Id) -> ApiResult<R>;

    async fn create(&self, draft: &R::Draft) -> ApiResult<R>;

    async fn update(&self, id: Id, patch: &R::Patch) -> ApiResult<R>;

    async fn delete(&self, id: Id) -> ApiResult<()>;
}

#[async_trait]
impl<R: Resource> ResourceApi<R> for ApiClient {
    async fn list(&self) -> ApiResult<Vec<R>> {
        self.resource::<R>().list().await
    }

    async fn get(&self, id: Id) -> ApiResult<R> {
        self.resource::<R>().get(id).await
    }

    async fn create(&self, draft: &R::Draft) -> ApiResult<R> {
        self.resource::<R>().create(draft).await
    }

    async fn update(&self, id: Id, patch: &R::Patch) -> ApiResult<R> {
        self.resource::<R>().update(id, patch).await
    }

    async fn delete(&self, id: Id) -> ApiResult<()> {
        self.resource::<R>().delete(id).await
    }
}
