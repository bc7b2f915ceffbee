// alfen-api: Async Rust client for the Alfen wallbox property API

pub mod auth;
pub mod client;
pub mod error;
pub mod models;
pub mod properties;
pub mod session;
pub mod transport;

pub use auth::{Credentials, SessionState};
pub use client::AlfenClient;
pub use error::Error;
pub use models::{Info, Properties, Property, PropertyValue};
