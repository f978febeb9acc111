use crate::handlers::error::doc_error;
use crate::state::AppState;
use actix_web::{get, web, HttpResponse, Result as ActixResult};
use common::YearQuery;
use storage::{DocumentMeta, Metadata};
use tracing::info;

/// Fetch a document at an exact year, default metadata.
#[get("/document/{year:\\d{4}}/{id:[0-9a-fA-F]{64}}")]
pub async fn fetch_document_exact(
    path: web::Path<(String, String)>,
    state: web::Data<AppState>,
) -> ActixResult<HttpResponse> {
    let (year, doc_id) = path.into_inner();
    fetch_exact(year, doc_id, String::new(), state).await
}

/// Fetch a document at an exact year with language-specific metadata.
#[get("/document/{year:\\d{4}}/{id:[0-9a-fA-F]{64}}/{lang}")]
pub async fn fetch_document_exact_lang(
    path: web::Path<(String, String, String)>,
    state: web::Data<AppState>,
) -> ActixResult<HttpResponse> {
    let (year, doc_id, lang) = path.into_inner();
    fetch_exact(year, doc_id, lang, state).await
}

async fn fetch_exact(
    year: String,
    doc_id: String,
    lang: String,
    state: web::Data<AppState>,
) -> ActixResult<HttpResponse> {
    let (data, meta) = state
        .store
        .get(&year, &doc_id, &lang)
        .await
        .map_err(|e| doc_error("Failed to retrieve document", e))?;

    info!(did = %doc_id, year = %year, "GET /document - Document served");
    Ok(respond_document(data, &meta, &doc_id, &year))
}

/// Fetch a document searching backward from a start year (the current
/// year when none is given), default metadata.
#[get("/document/{id:[0-9a-fA-F]{64}}")]
pub async fn fetch_document_lookback(
    path: web::Path<String>,
    query: web::Query<YearQuery>,
    state: web::Data<AppState>,
) -> ActixResult<HttpResponse> {
    fetch_lookback(path.into_inner(), String::new(), query.into_inner(), state).await
}

/// Backward-searching fetch with language-specific metadata.
#[get("/document/{id:[0-9a-fA-F]{64}}/{lang}")]
pub async fn fetch_document_lookback_lang(
    path: web::Path<(String, String)>,
    query: web::Query<YearQuery>,
    state: web::Data<AppState>,
) -> ActixResult<HttpResponse> {
    let (doc_id, lang) = path.into_inner();
    fetch_lookback(doc_id, lang, query.into_inner(), state).await
}

async fn fetch_lookback(
    doc_id: String,
    lang: String,
    query: YearQuery,
    state: web::Data<AppState>,
) -> ActixResult<HttpResponse> {
    let (data, meta, year) = state
        .store
        .get_from_year(&query.year, &doc_id, &lang)
        .await
        .map_err(|e| doc_error("Failed to retrieve document", e))?;

    info!(did = %doc_id, year = %year, "GET /document - Document served");
    Ok(respond_document(data, &meta, &doc_id, &year))
}

/// Payload response with the metadata field set mirrored into headers;
/// the year header carries the resolved archive year.
fn respond_document(data: Vec<u8>, meta: &DocumentMeta, doc_id: &str, year: &str) -> HttpResponse {
    let content_type = match meta.doc_type() {
        "" => "application/octet-stream",
        t => t,
    };

    let mut resp = HttpResponse::Ok();
    resp.insert_header(("Content-Type", content_type))
        .insert_header(("X-Document-ID", doc_id))
        .insert_header(("X-Document-Year", year))
        .insert_header(("X-Document-Title", meta.title()))
        .insert_header(("X-Document-Uploader", meta.uploader()))
        .insert_header(("X-Document-UploadTime", meta.upload_time().to_string()));

    if !meta.summary().is_empty() {
        resp.insert_header(("X-Document-Summary", meta.summary()));
    }
    resp.body(data)
}
