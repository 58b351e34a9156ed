//! Shared HTTP client for all upstream calls.
//!
//! Every workspace fetch in every job goes through one `reqwest::Client` so
//! connection pooling spans the whole process and timeouts are applied
//! uniformly. Instantly rate-limits per workspace key, but the transport
//! budget (sockets, DNS, TLS sessions) is per process.

use once_cell::sync::Lazy;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

/// HTTP connect timeout (seconds) - time to establish the TCP connection.
const HTTP_CONNECT_TIMEOUT_SECS: u64 = 10;
/// HTTP request timeout (seconds) - overall time for one request.
const HTTP_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Global HTTP client shared by every fetcher instance.
///
/// Configured with explicit timeouts so a hung upstream request can never
/// stall a batch wave indefinitely.
pub static GLOBAL_HTTP_CLIENT: Lazy<Arc<Client>> = Lazy::new(|| {
    Arc::new(
        Client::builder()
            .connect_timeout(Duration::from_secs(HTTP_CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(HTTP_REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|e| {
                panic!("FATAL: failed to build HTTP client: {e}. Check system TLS configuration.");
            }),
    )
});

/// Get the global HTTP client.
///
/// Returns a clone of the Arc, which only bumps a reference count.
pub fn global_http_client() -> Arc<Client> {
    GLOBAL_HTTP_CLIENT.clone()
}
