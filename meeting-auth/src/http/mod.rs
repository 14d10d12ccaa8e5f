//! Outbound HTTP client construction.

mod client;

pub use client::{HttpClientBuilder, HttpClientConfig};
