//! Typed resource collections
//!
//! A [`Collection`] is a lightweight handle over one resource type. It
//! accumulates pass-through filters and forwards to the dispatcher on
//! [`NylasClient`].

use std::marker::PhantomData;

use serde_json::{Map, Value};

use crate::error::{NylasError, Result, ValidationError};
use crate::nylas::client::NylasClient;
use crate::nylas::resource::{Parent, Resource};
use crate::nylas::types::{Calendar, Draft, Event, File, Message, Thread};
use crate::nylas::utils::{sanitize_attributes, Filters};

/// Handle over one resource collection
pub struct Collection<'a, T: Resource> {
    client: &'a NylasClient,
    namespace: Option<String>,
    parent: Option<Parent>,
    filters: Filters,
    _resource: PhantomData<fn() -> T>,
}

impl<'a, T: Resource> Collection<'a, T> {
    pub(crate) fn new(client: &'a NylasClient) -> Self {
        Self {
            client,
            namespace: None,
            parent: None,
            filters: Filters::new(),
            _resource: PhantomData,
        }
    }

    /// Scope requests to a namespace (`/n/{namespace}/...`)
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Add a filter passed through as a query parameter
    pub fn filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.insert(key.into(), value.into());
        self
    }

    fn with_parent(mut self, parent: Parent) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn filters(&self) -> &Filters {
        &self.filters
    }

    pub fn parent(&self) -> Option<&Parent> {
        self.parent.as_ref()
    }

    /// Fetch objects matching the current filters
    pub async fn items(&self) -> Result<Vec<T>> {
        self.client
            .get_resources(self.namespace.as_deref(), &self.filters)
            .await
    }

    /// Fetch objects, optionally capped at `limit`.
    ///
    /// Starts at offset 0 unless an `offset` filter was set.
    pub async fn all(&self, limit: Option<u32>) -> Result<Vec<T>> {
        let mut filters = self.filters.clone();
        filters
            .entry("offset".to_string())
            .or_insert_with(|| "0".to_string());
        if let Some(limit) = limit {
            filters.insert("limit".to_string(), limit.to_string());
        }

        self.client
            .get_resources(self.namespace.as_deref(), &filters)
            .await
    }

    /// Fetch the first matching object
    pub async fn first(&self) -> Result<Option<T>> {
        let mut filters = self.filters.clone();
        filters.insert("limit".to_string(), "1".to_string());

        let items: Vec<T> = self
            .client
            .get_resources(self.namespace.as_deref(), &filters)
            .await?;
        Ok(items.into_iter().next())
    }

    /// Fetch one object by ID
    pub async fn find(&self, id: &str) -> Result<T> {
        self.client
            .get_resource(self.namespace.as_deref(), id, None, &self.filters)
            .await
    }

    /// Create an object. Attributes outside the resource whitelist are dropped.
    pub async fn create(&self, data: Value) -> Result<T> {
        let mut sanitized = self.sanitize(data)?;
        T::prepare_create(&mut sanitized, self.parent.as_ref())?;

        self.client
            .create_resource(self.namespace.as_deref(), sanitized)
            .await
    }

    /// Update an object. Attributes outside the resource whitelist are dropped.
    pub async fn update(&self, id: &str, data: Value) -> Result<T> {
        let sanitized = self.sanitize(data)?;

        self.client
            .update_resource(self.namespace.as_deref(), id, sanitized)
            .await
    }

    pub async fn delete(&self, id: &str) -> Result<Option<Value>> {
        self.client
            .delete_resource::<T>(self.namespace.as_deref(), id)
            .await
    }

    fn sanitize(&self, data: Value) -> Result<Map<String, Value>> {
        match data {
            Value::Object(object) => Ok(sanitize_attributes(T::ATTRS, &object)),
            other => Err(NylasError::Validation(ValidationError::InvalidParameter {
                name: "data".to_string(),
                message: format!("expected a JSON object, got {}", other),
            })),
        }
    }

    fn child<C: Resource>(&self) -> Collection<'a, C> {
        let mut child = Collection::new(self.client);
        child.namespace = self.namespace.clone();
        child
    }
}

impl<'a> Collection<'a, Calendar> {
    /// Events of one calendar; `create` fills in `calendar_id`
    pub fn events(&self, calendar_id: &str) -> Collection<'a, Event> {
        self.child::<Event>()
            .filter("calendar_id", calendar_id)
            .with_parent(Parent::new(Calendar::COLLECTION, calendar_id))
    }
}

impl<'a> Collection<'a, Thread> {
    /// Messages of one thread
    pub fn messages(&self, thread_id: &str) -> Collection<'a, Message> {
        self.child::<Message>()
            .filter("thread_id", thread_id)
            .with_parent(Parent::new(Thread::COLLECTION, thread_id))
    }
}

impl<'a> Collection<'a, Message> {
    /// Raw RFC 2822 source of a message
    pub async fn raw(&self, id: &str) -> Result<Vec<u8>> {
        self.client
            .get_resource_data::<Message>(
                self.namespace.as_deref(),
                id,
                None,
                &Filters::new(),
                &[("Accept", "message/rfc822")],
            )
            .await
    }
}

impl<'a> Collection<'a, Draft> {
    /// Send a saved draft; `version` must match the server's copy
    pub async fn send(&self, draft_id: &str, version: i64) -> Result<Message> {
        self.client
            .send_draft(self.namespace.as_deref(), draft_id, version)
            .await
    }
}

impl<'a> Collection<'a, File> {
    pub async fn upload(
        &self,
        filename: &str,
        content_type: &str,
        contents: Vec<u8>,
    ) -> Result<Vec<File>> {
        self.client
            .upload_file(self.namespace.as_deref(), filename, content_type, contents)
            .await
    }

    pub async fn download(&self, id: &str) -> Result<Vec<u8>> {
        self.client
            .get_resource_data::<File>(
                self.namespace.as_deref(),
                id,
                Some("download"),
                &Filters::new(),
                &[],
            )
            .await
    }
}
