//! Nylas API Client Library
//!
//! A client for the Nylas email and calendar REST API. Resource handles for
//! threads, messages, drafts, labels, files, contacts, calendars and events
//! share one generic CRUD dispatcher.

pub mod config;
pub mod error;
pub mod nylas;

pub use config::Config;
pub use error::{NylasError, Result};
pub use nylas::client::NylasClient;
pub use nylas::collection::Collection;
pub use nylas::resource::{Parent, Resource};
