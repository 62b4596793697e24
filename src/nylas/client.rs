//! Nylas API client
//!
//! Generic CRUD dispatcher shared by every resource type, plus entry points
//! for the typed collections.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde_json::{json, Map, Value};
use tokio::sync::RwLock;
use tracing::debug;

use crate::config::nylas::{API_ROOT, WRAPPER_HEADER, WRAPPER_NAME};
use crate::config::Config;
use crate::error::{ApiError, AuthError, NylasError, Result, ValidationError};
use crate::nylas::collection::Collection;
use crate::nylas::resource::{BodyKind, Resource};
use crate::nylas::types::*;
use crate::nylas::utils::{basic_auth_header, resource_url, with_query, Filters};

/// Nylas API client
pub struct NylasClient {
    /// HTTP client
    http_client: reqwest::Client,

    /// Application credentials and server
    config: Config,

    /// Account access token; installed later by the OAuth code exchange
    access_token: RwLock<Option<String>>,
}

impl NylasClient {
    /// Create a new client
    pub fn new(config: Config) -> Self {
        let access_token = RwLock::new(config.access_token.clone());
        Self {
            http_client: reqwest::Client::new(),
            config,
            access_token,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub(crate) fn http_client(&self) -> &reqwest::Client {
        &self.http_client
    }

    /// Current access token, if any
    pub async fn access_token(&self) -> Option<String> {
        self.access_token.read().await.clone()
    }

    /// Replace the access token used for subsequent requests
    pub async fn set_access_token(&self, token: impl Into<String>) {
        *self.access_token.write().await = Some(token.into());
    }

    // ==================== Collections ====================

    pub fn threads(&self) -> Collection<'_, Thread> {
        Collection::new(self)
    }

    pub fn messages(&self) -> Collection<'_, Message> {
        Collection::new(self)
    }

    pub fn drafts(&self) -> Collection<'_, Draft> {
        Collection::new(self)
    }

    pub fn labels(&self) -> Collection<'_, Label> {
        Collection::new(self)
    }

    pub fn files(&self) -> Collection<'_, File> {
        Collection::new(self)
    }

    pub fn contacts(&self) -> Collection<'_, Contact> {
        Collection::new(self)
    }

    pub fn calendars(&self) -> Collection<'_, Calendar> {
        Collection::new(self)
    }

    pub fn events(&self) -> Collection<'_, Event> {
        Collection::new(self)
    }

    /// Fetch the account the access token belongs to
    pub async fn account(&self) -> Result<Account> {
        let raw = self
            .get_resource_raw::<Account>(None, None, None, &Filters::new())
            .await?;
        Ok(serde_json::from_value(raw)?)
    }

    // ==================== Dispatcher ====================

    /// List a collection
    pub async fn get_resources<T: Resource>(
        &self,
        namespace: Option<&str>,
        filters: &Filters,
    ) -> Result<Vec<T>> {
        let url = with_query(self.url_for::<T>(namespace, None, None), filters);

        let response = self.request(Method::GET, &url, &[]).await?.send().await?;
        let response = check_response(response, "list", T::COLLECTION, None).await?;

        let items: Vec<T> = response.json().await?;
        debug!("Nylas: got {} {}", items.len(), T::COLLECTION);
        Ok(items)
    }

    /// Fetch and decode a single object, or one of its sub-resources
    pub async fn get_resource<T: Resource>(
        &self,
        namespace: Option<&str>,
        id: &str,
        extra: Option<&str>,
        filters: &Filters,
    ) -> Result<T> {
        let raw = self
            .get_resource_raw::<T>(namespace, Some(id), extra, filters)
            .await?;
        Ok(serde_json::from_value(raw)?)
    }

    /// Fetch a single object as undecoded JSON.
    ///
    /// `id = None` addresses a singleton resource such as `/account`.
    pub async fn get_resource_raw<T: Resource>(
        &self,
        namespace: Option<&str>,
        id: Option<&str>,
        extra: Option<&str>,
        filters: &Filters,
    ) -> Result<Value> {
        if let Some(id) = id {
            require_id(id)?;
        }
        let url = with_query(self.url_for::<T>(namespace, id, extra), filters);

        let response = self.request(Method::GET, &url, &[]).await?.send().await?;
        let response = check_response(response, "get", T::COLLECTION, id).await?;

        Ok(response.json().await?)
    }

    /// Fetch a single object (or sub-resource) as raw bytes.
    ///
    /// `headers` are applied over the defaults, replacing any with the same name.
    pub async fn get_resource_data<T: Resource>(
        &self,
        namespace: Option<&str>,
        id: &str,
        extra: Option<&str>,
        filters: &Filters,
        headers: &[(&str, &str)],
    ) -> Result<Vec<u8>> {
        require_id(id)?;
        let url = with_query(self.url_for::<T>(namespace, Some(id), extra), filters);

        let response = self
            .request(Method::GET, &url, headers)
            .await?
            .send()
            .await?;
        let response = check_response(response, "download", T::COLLECTION, Some(id)).await?;

        Ok(response.bytes().await?.to_vec())
    }

    /// Create an object from already-sanitized attributes
    pub async fn create_resource<T: Resource>(
        &self,
        namespace: Option<&str>,
        data: Map<String, Value>,
    ) -> Result<T> {
        if T::BODY == BodyKind::Multipart {
            return Err(unsupported::<T>("create"));
        }

        let url = self.url_for::<T>(namespace, None, None);

        let response = self
            .request(Method::POST, &url, &[])
            .await?
            .json(&data)
            .send()
            .await?;
        let response = check_response(response, "create", T::COLLECTION, None).await?;

        Ok(response.json().await?)
    }

    /// Upload a file as multipart form data
    pub async fn upload_file(
        &self,
        namespace: Option<&str>,
        filename: &str,
        content_type: &str,
        contents: Vec<u8>,
    ) -> Result<Vec<File>> {
        let url = self.url_for::<File>(namespace, None, None);

        let part = reqwest::multipart::Part::bytes(contents)
            .file_name(filename.to_string())
            .mime_str(content_type)?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .request(Method::POST, &url, &[])
            .await?
            .multipart(form)
            .send()
            .await?;
        let response = check_response(response, "upload", File::COLLECTION, None).await?;

        Ok(response.json().await?)
    }

    /// Update an object from already-sanitized attributes
    pub async fn update_resource<T: Resource>(
        &self,
        namespace: Option<&str>,
        id: &str,
        data: Map<String, Value>,
    ) -> Result<T> {
        if !T::UPDATABLE {
            return Err(unsupported::<T>("update"));
        }
        require_id(id)?;

        let url = self.url_for::<T>(namespace, Some(id), None);

        let response = self
            .request(Method::PUT, &url, &[])
            .await?
            .json(&data)
            .send()
            .await?;
        let response = check_response(response, "update", T::COLLECTION, Some(id)).await?;

        Ok(response.json().await?)
    }

    /// Delete an object; returns the decoded response body, if any
    pub async fn delete_resource<T: Resource>(
        &self,
        namespace: Option<&str>,
        id: &str,
    ) -> Result<Option<Value>> {
        require_id(id)?;
        let url = self.url_for::<T>(namespace, Some(id), None);

        let response = self.request(Method::DELETE, &url, &[]).await?.send().await?;
        let response = check_response(response, "delete", T::COLLECTION, Some(id)).await?;

        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(&text)?))
    }

    /// Send a saved draft
    pub async fn send_draft(
        &self,
        namespace: Option<&str>,
        draft_id: &str,
        version: i64,
    ) -> Result<Message> {
        require_id(draft_id)?;
        let url = resource_url(&self.config.api_server, namespace, API_ROOT, "send", None, None);
        let body = json!({ "draft_id": draft_id, "version": version });

        let response = self
            .request(Method::POST, &url, &[])
            .await?
            .json(&body)
            .send()
            .await?;
        let response = check_response(response, "send", Draft::COLLECTION, Some(draft_id)).await?;

        Ok(response.json().await?)
    }

    // ==================== Helpers ====================

    fn url_for<T: Resource>(
        &self,
        namespace: Option<&str>,
        id: Option<&str>,
        extra: Option<&str>,
    ) -> String {
        resource_url(
            &self.config.api_server,
            namespace,
            T::API_ROOT,
            T::COLLECTION,
            id,
            extra,
        )
    }

    /// Default headers for an authenticated request
    pub(crate) async fn default_headers(&self) -> Result<HeaderMap> {
        let token = self
            .access_token()
            .await
            .ok_or(NylasError::Auth(AuthError::MissingAccessToken))?;

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, header_value("access token", &basic_auth_header(&token))?);
        headers.insert(header_name(WRAPPER_HEADER)?, HeaderValue::from_static(WRAPPER_NAME));
        Ok(headers)
    }

    async fn request(
        &self,
        method: Method,
        url: &str,
        extra_headers: &[(&str, &str)],
    ) -> Result<RequestBuilder> {
        let mut headers = self.default_headers().await?;
        for (name, value) in extra_headers {
            headers.insert(header_name(name)?, header_value(name, value)?);
        }

        debug!("Nylas: {} {}", method, url);
        Ok(self.http_client.request(method, url).headers(headers))
    }
}

fn header_name(name: &str) -> Result<HeaderName> {
    HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
        NylasError::Validation(ValidationError::InvalidParameter {
            name: name.to_string(),
            message: e.to_string(),
        })
    })
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value).map_err(|e| {
        NylasError::Validation(ValidationError::InvalidParameter {
            name: name.to_string(),
            message: e.to_string(),
        })
    })
}

/// Object ids must name exactly one path segment
fn require_id(id: &str) -> Result<()> {
    if id.is_empty() {
        return Err(NylasError::Validation(ValidationError::MissingField {
            field: "id".to_string(),
        }));
    }
    if id == "." || id == ".." {
        return Err(NylasError::Validation(ValidationError::InvalidParameter {
            name: "id".to_string(),
            message: format!("'{}' is not a valid object id", id),
        }));
    }
    Ok(())
}

fn unsupported<T: Resource>(operation: &str) -> NylasError {
    NylasError::Api(ApiError::UnsupportedOperation {
        collection: T::COLLECTION.to_string(),
        operation: operation.to_string(),
    })
}

/// Map a non-2xx response onto an API error
async fn check_response(
    response: Response,
    action: &str,
    collection: &str,
    id: Option<&str>,
) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    if status == StatusCode::NOT_FOUND {
        if let Some(id) = id {
            return Err(NylasError::Api(ApiError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            }));
        }
    }

    let text = response.text().await.unwrap_or_default();
    Err(NylasError::Api(ApiError::RequestFailed {
        status: status.as_u16(),
        message: format!("Failed to {} {} ({}): {}", action, collection, status, text),
    }))
}
