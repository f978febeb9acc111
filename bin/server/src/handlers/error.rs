use storage::DocError;
use tracing::{error, warn};

/// Map a document store error onto the HTTP taxonomy: conflicts and
/// not-found are client errors, malformed input is a bad request, and
/// I/O failures are server errors logged with context.
pub fn doc_error(msg: &str, e: DocError) -> actix_web::Error {
    match &e {
        DocError::AlreadyExists => {
            warn!("{}: {}", msg, e);
            actix_web::error::ErrorConflict(format!("{}: {}", msg, e))
        }
        DocError::NotFound(_) => {
            warn!("{}: {}", msg, e);
            actix_web::error::ErrorNotFound(format!("{}: {}", msg, e))
        }
        DocError::InvalidId(_) | DocError::InvalidYear(_) | DocError::Meta(_) => {
            warn!("{}: {}", msg, e);
            actix_web::error::ErrorBadRequest(format!("{}: {}", msg, e))
        }
        DocError::InvalidConfig(_) | DocError::Io(_) => {
            error!("{}: {}", msg, e);
            actix_web::error::ErrorInternalServerError(msg.to_string())
        }
    }
}

/// Helper for bad request errors
pub fn handle_error<E: std::fmt::Display>(msg: &str, e: E) -> actix_web::Error {
    warn!("{}: {}", msg, e);
    actix_web::error::ErrorBadRequest(format!("{}: {}", msg, e))
}
