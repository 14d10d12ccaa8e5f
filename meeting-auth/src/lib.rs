//! # meeting-auth
//!
//! Provider authentication plumbing shared by the DealFlow gateways:
//! - a coalescing access-token cache generic over its token source and clock
//! - token sources for Zoom Server-to-Server OAuth and Google service accounts
//! - outbound HTTP client construction with mandatory timeouts
//! - webhook signature validation and Zoom's URL-validation challenge
//!
//! ```rust,ignore
//! use meeting_auth::{
//!     http::HttpClientBuilder,
//!     oauth::{providers::zoom::AccountCredentialsSource, token::TokenCache},
//! };
//! ```

pub mod error;
pub mod http;
pub mod oauth;
pub mod webhook;

pub use error::{Error, ErrorKind};
