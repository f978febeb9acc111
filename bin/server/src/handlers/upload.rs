use crate::handlers::error::doc_error;
use crate::handlers::{header, request_language};
use crate::state::AppState;
use actix_web::{post, web, HttpRequest, HttpResponse, Result as ActixResult};
use common::StoreDocResponse;
use storage::BaseMeta;
use tracing::info;

/// Handle document upload. The payload is the raw request body; its
/// hash becomes the document id, and the descriptive headers seed the
/// default metadata.
#[post("/api/document")]
pub async fn upload_document(
    req: HttpRequest,
    body: web::Bytes,
    state: web::Data<AppState>,
) -> ActixResult<HttpResponse> {
    if body.len() > state.max_file_size {
        return Err(actix_web::error::ErrorPayloadTooLarge("File size exceeds limit"));
    }

    let content_type = match header(&req, "Content-Type") {
        "" => "application/octet-stream",
        ct => ct,
    };

    let doc_id = common::hash::digest_hex(&body);

    info!(did = %doc_id, size = body.len(), "POST /api/document - Request received");

    // Default metadata from the upload itself; richer versions can be
    // uploaded later per language.
    let mut meta = (state.meta_creator)(BaseMeta::default());
    meta.set_doc_type(content_type);
    meta.set_title(header(&req, "X-Document-Title"));
    meta.set_summary(header(&req, "X-Document-Summary"));
    meta.set_uploader(header(&req, "X-Document-Uploader"));
    meta.set_upload_time(chrono::Utc::now().timestamp());
    meta.set_size(body.len() as u64);

    let year = state
        .store
        .store("", &doc_id, &body, meta.as_ref())
        .await
        .map_err(|e| doc_error("Failed to store document", e))?;

    info!(did = %doc_id, year = %year, "POST /api/document - Document stored");

    let lang = request_language(&req, &state.ui_language);
    Ok(HttpResponse::Ok().json(StoreDocResponse {
        document_id: doc_id,
        year,
        doc_size: body.len().to_string(),
        message: state.catalog.text(&lang, "Document stored successfully"),
    }))
}
