#![warn(missing_docs)]

//! HTTP edge configuration for the liveclass backend.

mod cors;

pub use cors::{CorsPolicy, LIVE_AUTHORIZATION};
