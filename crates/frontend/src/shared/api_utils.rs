//! API utilities for frontend-backend communication
//!
//! Provides helper functions for constructing API URLs and resource paths.

use crate::shared::config::config;

/// Get the base URL for API requests
///
/// Uses `api.base_url` from the configuration when set, otherwise builds it
/// from the current window location and `api.port`.
///
/// # Returns
/// - API base URL like "http://localhost:3003" or "https://example.com:3003"
/// - Empty string if window is not available
pub fn api_base() -> String {
    let api = &config().api;
    if let Some(base) = api.base_url.as_deref().filter(|b| !b.trim().is_empty()) {
        return base.trim_end_matches('/').to_string();
    }

    if cfg!(not(target_arch = "wasm32")) {
        return String::new();
    }
    let window = match web_sys::window() {
        Some(w) => w,
        None => return String::new(),
    };
    let location = window.location();
    let protocol = location.protocol().unwrap_or_else(|_| "http:".to_string());
    let hostname = location
        .hostname()
        .unwrap_or_else(|_| "127.0.0.1".to_string());
    format!("{}//{}:{}", protocol, hostname, api.port)
}

/// `/api/{resource}`
pub fn resource_path(resource: &str) -> String {
    format!("/api/{}", resource)
}

/// `/api/{resource}/{id}`
pub fn record_path(resource: &str, id: impl std::fmt::Display) -> String {
    format!("/api/{}/{}", resource, id)
}

/// `/api/{resource}/search?termo=<term>`
pub fn search_path(resource: &str, term: &str) -> String {
    format!("/api/{}/search?termo={}", resource, urlencoding::encode(term))
}
