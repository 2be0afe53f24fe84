use std::sync::Arc;

use axum::http::Method;
use axum::{Router, routing::get};
use bookshelf::assets::serve_embedded;
use bookshelf::config::{Cli, Config};
use bookshelf::db::Database;
use bookshelf::handler::{
    AppState, create_book, delete_book, get_book, healthcheck, list_books, update_book,
};
use clap::Parser;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing;

#[tokio::main]
async fn main() {
    let args = Cli::parse();

    dotenvy::dotenv().ok();
    tracing_subscriber::fmt().json().init();
    tracing::info!("bookshelf.svc starting");

    let cfg = Config::from_env().unwrap_or_else(|e| {
        tracing::error!(error = %e, "failed to load configuration");
        std::process::exit(1);
    });

    // Bootstrap failures are fatal; serving requests against a database that
    // does not exist would just fail every one of them.
    if let Err(e) = Database::ensure_database_exists(&cfg).await {
        tracing::error!(error = %e, db = %cfg.db_name, "failed to ensure database exists");
        std::process::exit(1);
    }

    let db = Arc::new(Database::connect(&cfg).await.unwrap_or_else(|e| {
        tracing::error!(error = %e, "failed to connect to database");
        std::process::exit(1);
    }));

    if let Err(e) = db.migrate().await {
        tracing::error!(error = %e, "failed to run schema migration");
        std::process::exit(1);
    }

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    let app = Router::new()
        .route("/healthz", get(healthcheck))
        .route("/api/books", get(list_books).post(create_book))
        .route(
            "/api/books/:id",
            get(get_book).put(update_book).delete(delete_book),
        )
        .fallback(serve_embedded)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { db });

    let address = format!("0.0.0.0:{}", args.port);
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .unwrap_or_else(|e| {
            tracing::error!(error = %e, "failed to setup tcp listener");
            std::process::exit(1);
        });

    tracing::info!("bookshelf.svc running on {}", &address);
    tokio::select! {
        result = axum::serve(listener, app) => {
            if let Err(err) = result {
                tracing::error!(error = %err, "server exited with error");
                std::process::exit(1);
            }
        }
        _ = signal::ctrl_c() => {
            tracing::info!("ctrl+c signal received, shutting down");
        }
    }

    tracing::info!("bookshelf.svc going off");
}
