//! Token sources for the providers DealFlow talks to.

pub mod google;
pub mod zoom;
