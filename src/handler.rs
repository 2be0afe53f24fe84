use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde_json::{Value, json};
use tracing::info;

use crate::db::Database;
use crate::error::AppError;
use crate::model::{Book, BookPayload};

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
}

pub async fn healthcheck() -> Json<Value> {
    info!("got healthcheck request");
    Json(json!({ "status": "ok" }))
}

pub async fn list_books(State(state): State<AppState>) -> Result<Json<Vec<Book>>, AppError> {
    let books = state.db.list_books().await?;
    Ok(Json(books))
}

pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Book>, AppError> {
    let book = state
        .db
        .get_book(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Book not found".to_string()))?;

    Ok(Json(book))
}

pub async fn create_book(
    State(state): State<AppState>,
    Json(payload): Json<BookPayload>,
) -> Result<(StatusCode, Json<Book>), AppError> {
    let book = state.db.create_book(&payload).await?;
    info!(id = book.id, "book created");

    Ok((StatusCode::CREATED, Json(book)))
}

pub async fn update_book(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<BookPayload>,
) -> Result<Json<Book>, AppError> {
    let book = state
        .db
        .update_book(id, &payload)
        .await?
        .ok_or_else(|| AppError::NotFound("Book not found".to_string()))?;

    Ok(Json(book))
}

pub async fn delete_book(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Value>, AppError> {
    if !state.db.delete_book(id).await? {
        return Err(AppError::NotFound("Book not found".to_string()));
    }
    info!(id = id, "book deleted");

    Ok(Json(json!({ "message": "Book deleted successfully" })))
}
