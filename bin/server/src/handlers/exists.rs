use crate::state::AppState;
use actix_web::{head, web, HttpResponse, Result as ActixResult};
use common::YearQuery;

/// Existence probe at an exact year: 200 when the document is archived
/// there, 404 otherwise.
#[head("/document/{year:\\d{4}}/{id:[0-9a-fA-F]{64}}")]
pub async fn exists_exact(
    path: web::Path<(String, String)>,
    state: web::Data<AppState>,
) -> ActixResult<HttpResponse> {
    let (year, doc_id) = path.into_inner();
    if state.store.exists(&year, &doc_id).await {
        Ok(HttpResponse::Ok().finish())
    } else {
        Ok(HttpResponse::NotFound().finish())
    }
}

/// Existence probe with the long backward search; the resolved year is
/// reported in a header since a HEAD response has no body.
#[head("/document/{id:[0-9a-fA-F]{64}}")]
pub async fn exists_lookback(
    path: web::Path<String>,
    query: web::Query<YearQuery>,
    state: web::Data<AppState>,
) -> ActixResult<HttpResponse> {
    let doc_id = path.into_inner();
    match state.store.exists_from_year(&query.year, &doc_id).await {
        Some(year) => Ok(HttpResponse::Ok()
            .insert_header(("X-Document-Year", year))
            .finish()),
        None => Ok(HttpResponse::NotFound().finish()),
    }
}
