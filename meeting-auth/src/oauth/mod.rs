//! OAuth 2.0 client-side infrastructure: cached access tokens and the grants that mint them.

pub mod providers;
pub mod token;
