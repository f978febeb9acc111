use crate::handlers::error::{doc_error, handle_error};
use crate::handlers::request_language;
use crate::state::AppState;
use actix_web::{get, put, web, HttpRequest, HttpResponse, Result as ActixResult};
use common::{StoreMetaResponse, YearQuery};
use storage::BaseMeta;
use tracing::info;

/// Store the default (language-less) metadata document, overwriting the
/// version created at upload time.
#[put("/api/meta/{id:[0-9a-fA-F]{64}}")]
pub async fn upload_meta_default(
    req: HttpRequest,
    path: web::Path<String>,
    body: web::Bytes,
    state: web::Data<AppState>,
) -> ActixResult<HttpResponse> {
    store_meta(req, path.into_inner(), String::new(), body, state).await
}

/// Store one language variant of a document's metadata.
#[put("/api/meta/{id:[0-9a-fA-F]{64}}/{lang}")]
pub async fn upload_meta_lang(
    req: HttpRequest,
    path: web::Path<(String, String)>,
    body: web::Bytes,
    state: web::Data<AppState>,
) -> ActixResult<HttpResponse> {
    let (doc_id, lang) = path.into_inner();
    store_meta(req, doc_id, lang, body, state).await
}

async fn store_meta(
    req: HttpRequest,
    doc_id: String,
    lang: String,
    body: web::Bytes,
    state: web::Data<AppState>,
) -> ActixResult<HttpResponse> {
    if body.len() > state.max_meta_size {
        return Err(actix_web::error::ErrorPayloadTooLarge("Metadata size exceeds limit"));
    }

    let mut meta = (state.meta_creator)(BaseMeta::default());
    meta.unmarshal(&body)
        .map_err(|e| handle_error("Error decoding metadata", e))?;

    let year = state
        .store
        .store_meta("", &doc_id, meta.as_ref(), &lang)
        .await
        .map_err(|e| doc_error("Failed to store document metadata", e))?;

    info!(did = %doc_id, year = %year, lang = %lang, "PUT /api/meta - Metadata stored");

    let reply_lang = request_language(&req, &state.ui_language);
    Ok(HttpResponse::Ok().json(StoreMetaResponse {
        document_id: doc_id,
        year,
        message: state
            .catalog
            .text(&reply_lang, "Document metadata stored successfully"),
    }))
}

/// Fetch metadata at an exact year, default language.
#[get("/meta/{year:\\d{4}}/{id:[0-9a-fA-F]{64}}")]
pub async fn fetch_meta_exact(
    path: web::Path<(String, String)>,
    state: web::Data<AppState>,
) -> ActixResult<HttpResponse> {
    let (year, doc_id) = path.into_inner();
    fetch_exact(year, doc_id, String::new(), state).await
}

/// Fetch metadata at an exact year in a specific language, falling back
/// to the default variant.
#[get("/meta/{year:\\d{4}}/{id:[0-9a-fA-F]{64}}/{lang}")]
pub async fn fetch_meta_exact_lang(
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
    let meta = state
        .store
        .get_meta(&year, &doc_id, &lang)
        .await
        .map_err(|e| doc_error("Failed to retrieve document metadata", e))?;
    Ok(HttpResponse::Ok().json(meta))
}

/// Fetch metadata with backward year search, default language.
#[get("/meta/{id:[0-9a-fA-F]{64}}")]
pub async fn fetch_meta_lookback(
    path: web::Path<String>,
    query: web::Query<YearQuery>,
    state: web::Data<AppState>,
) -> ActixResult<HttpResponse> {
    fetch_lookback(path.into_inner(), String::new(), query.into_inner(), state).await
}

/// Fetch metadata with backward year search in a specific language.
#[get("/meta/{id:[0-9a-fA-F]{64}}/{lang}")]
pub async fn fetch_meta_lookback_lang(
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
    let (meta, year) = state
        .store
        .get_meta_from_year(&query.year, &doc_id, &lang)
        .await
        .map_err(|e| doc_error("Failed to retrieve document metadata", e))?;

    Ok(HttpResponse::Ok()
        .insert_header(("X-Document-Year", year))
        .json(meta))
}
