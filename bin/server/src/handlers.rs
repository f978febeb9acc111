pub mod error;
pub mod exists;
pub mod fetch;
pub mod health;
pub mod meta;
pub mod upload;

use actix_web::HttpRequest;

/// Header value as a &str, empty when absent or not valid UTF-8.
pub(crate) fn header<'a>(req: &'a HttpRequest, name: &str) -> &'a str {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
}

/// Response language for a request: the client's Accept-Language
/// preference, else the configured UI language.
pub(crate) fn request_language(req: &HttpRequest, default: &str) -> String {
    common::lang::parse_accept_language(header(req, "Accept-Language"), default)
}
