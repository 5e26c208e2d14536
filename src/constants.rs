//! Constants

/// Stored for new skins created without an `image_url`.
pub(crate) const PLACEHOLDER_IMAGE_URL: &str = "/placeholder.svg";

// for the HTTP surface
pub(crate) const DEFAULT_ADDR: &str = "0.0.0.0:3000";
pub(crate) const DEFAULT_LOG_FILTER: &str = "skins=info,tower_http=info";

// for CORS preflight responses
pub(crate) const CORS_ALLOW_ORIGIN: &str = "*";
pub(crate) const CORS_ALLOW_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS";
pub(crate) const CORS_ALLOW_HEADERS: &str = "Content-Type";
pub(crate) const CORS_MAX_AGE_SECONDS: usize = 86400;
