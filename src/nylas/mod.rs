//! Nylas API module
//!
//! Contains the typed resources, the generic dispatcher and OAuth helpers.

pub mod auth;
pub mod client;
pub mod collection;
pub mod resource;
pub mod types;
pub mod utils;
