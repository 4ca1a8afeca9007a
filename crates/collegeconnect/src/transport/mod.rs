//! HTTP transport: the shared client and its navigation seam.

mod client;
mod navigator;

pub use client::ApiClient;
pub use navigator::{LOGIN_ROUTE, Navigator, RecordingNavigator, TracingNavigator};
