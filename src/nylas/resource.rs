//! Resource kinds
//!
//! Every API object type describes where it lives and which attributes the
//! client is allowed to send for it. The dispatcher in `client` is generic
//! over this trait.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::config::nylas::API_ROOT;
use crate::error::Result;

/// How a resource's create/update body is encoded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Json,
    Multipart,
}

/// The object a collection was opened from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parent {
    /// Collection name of the parent, e.g. `calendars`
    pub collection: &'static str,

    /// Parent object ID
    pub id: String,
}

impl Parent {
    pub fn new(collection: &'static str, id: impl Into<String>) -> Self {
        Self {
            collection,
            id: id.into(),
        }
    }
}

/// An API object type reachable through the generic dispatcher
pub trait Resource: DeserializeOwned + Serialize + Send {
    /// URL segment of the collection, e.g. `events`
    const COLLECTION: &'static str;

    /// Attributes accepted on create/update; everything else is dropped
    const ATTRS: &'static [&'static str];

    /// Root placed in front of a namespace in the URL
    const API_ROOT: &'static str = API_ROOT;

    const BODY: BodyKind = BodyKind::Json;

    const UPDATABLE: bool = true;

    /// Adjust sanitized create data before it is sent.
    fn prepare_create(_data: &mut Map<String, Value>, _parent: Option<&Parent>) -> Result<()> {
        Ok(())
    }
}
