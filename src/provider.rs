//! Per-provider service configuration expressed purely as data.
//!
//! A [`ServiceConfig`] carries the endpoints, ordered scopes and their delimiter, the credential
//! injection strategy, extra header maps, exchange quirks, and the response-normalization aliases
//! that together describe one provider dialect. Everything is validated once, either through
//! [`ServiceConfigBuilder::build`] or while deserializing with [`ServiceConfig::from_json`].

pub mod config;

pub use config::*;
