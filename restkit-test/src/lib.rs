//! In-process HTTP test client for restkit applications.
//!
//! Dispatches requests straight into an `axum::Router` without binding a
//! TCP port, so integration tests stay fast and hermetic.

mod app;

pub use app::{TestApp, TestRequest, TestResponse};
