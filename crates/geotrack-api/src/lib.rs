//! HTTP client for the GEO Tracker backend.
//!
//! Wire bodies are snake_case JSON; [`types`] mirrors them and [`normalize`]
//! turns them into the `geotrack-core` domain types so nothing above this
//! crate sees the wire shapes.

pub mod admin;
pub mod client;
pub mod content;
pub mod error;
pub mod normalize;
pub mod runs;
pub mod types;

pub use client::ApiClient;
pub use content::{QueryGenerationRequest, ReportRequest};
pub use error::ApiError;
