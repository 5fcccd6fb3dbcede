//! HTTP handlers for the Books module, mounted under `/api/books`.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    routing::get,
    Json, Router,
};
use booktracker_http::error::AppError;
use serde::Deserialize;

use super::models::BookDto;
use super::service::{BookError, BookService};

/// Optional tri-state filter: `?read=true`, `?read=false`, or absent.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub read: Option<bool>,
}

impl From<BookError> for AppError {
    fn from(err: BookError) -> Self {
        match err {
            BookError::Repository(e) => AppError::Internal(anyhow::Error::new(e)),
            not_found @ BookError::NotFound { .. } => AppError::not_found(not_found.to_string()),
        }
    }
}

/// Build the Books router bound to `service`.
pub fn router(service: BookService) -> Router {
    Router::new()
        .route("/", get(list_books).post(create_book))
        .route("/health", get(health_check))
        .route(
            "/{id}",
            get(get_book).put(update_book).delete(delete_book),
        )
        .with_state(service)
}

fn validated(dto: BookDto) -> Result<BookDto, AppError> {
    let details = dto.validate();
    if details.is_empty() {
        Ok(dto)
    } else {
        Err(AppError::validation(details, "book payload is invalid"))
    }
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "books module is healthy"
}

// Extractor rejections are converted into `AppError`; every failure uses the
// JSON error envelope.

async fn list_books(
    State(service): State<BookService>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<Vec<BookDto>>, AppError> {
    let Query(query) = query?;
    Ok(Json(service.list(query.read).await?))
}

async fn create_book(
    State(service): State<BookService>,
    payload: Result<Json<BookDto>, JsonRejection>,
) -> Result<(StatusCode, Json<BookDto>), AppError> {
    let Json(dto) = payload?;
    let created = service.create(validated(dto)?).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn get_book(
    State(service): State<BookService>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<BookDto>, AppError> {
    let Path(id) = id?;
    Ok(Json(service.get_by_id(id).await?))
}

async fn update_book(
    State(service): State<BookService>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<BookDto>, JsonRejection>,
) -> Result<Json<BookDto>, AppError> {
    let Path(id) = id?;
    let Json(dto) = payload?;
    Ok(Json(service.update(id, validated(dto)?).await?))
}

async fn delete_book(
    State(service): State<BookService>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let Path(id) = id?;
    service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
