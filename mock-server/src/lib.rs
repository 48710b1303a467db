//! In-memory stand-in for the myrunes `/api` surface.
//!
//! Implements the endpoints the client gateway talks to, with cookie-based
//! sessions and the `{code, message}` error bodies of the real backend.
//! Nothing is persisted, and mail delivery is replaced by tokens readable
//! through [`Store`].

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tokio::{net::TcpListener, sync::RwLock};

pub mod error;
mod handlers;
pub mod models;
pub mod store;

pub use error::ApiFailure;
pub use models::{ApiToken, Page, Share, User};
pub use store::{Db, Store};

pub fn new_db() -> Db {
    Arc::new(RwLock::new(Store::default()))
}

pub fn app() -> Router {
    app_with_db(new_db())
}

pub fn app_with_db(db: Db) -> Router {
    Router::new()
        .route("/api/login", post(handlers::login))
        .route("/api/logout", post(handlers::logout))
        .route("/api/version", get(handlers::version))
        .route("/api/resources/champions", get(handlers::champions))
        .route("/api/resources/runes", get(handlers::runes))
        .route("/api/users", post(handlers::create_user))
        .route(
            "/api/users/me",
            get(handlers::get_me).post(handlers::post_me).delete(handlers::delete_me),
        )
        .route("/api/users/{uname}", get(handlers::check_username))
        .route("/api/users/me/pageorder", post(handlers::post_page_order))
        .route("/api/users/me/mail", post(handlers::post_mail))
        .route("/api/users/me/mail/confirm", post(handlers::confirm_mail))
        .route("/api/users/me/passwordreset", post(handlers::password_reset))
        .route("/api/users/me/passwordreset/confirm", post(handlers::password_reset_confirm))
        .route("/api/pages", get(handlers::list_pages).post(handlers::create_page))
        .route(
            "/api/pages/{uid}",
            get(handlers::get_page).post(handlers::edit_page).delete(handlers::delete_page),
        )
        .route("/api/sessions", get(handlers::sessions_gone))
        .route("/api/sessions/{id}", axum::routing::delete(handlers::sessions_gone))
        .route("/api/favorites", get(handlers::get_favorites).post(handlers::post_favorites))
        .route("/api/shares", post(handlers::create_share))
        .route(
            "/api/shares/{ident}",
            get(handlers::get_share).post(handlers::post_share).delete(handlers::delete_share),
        )
        .route(
            "/api/apitoken",
            get(handlers::get_api_token)
                .post(handlers::post_api_token)
                .delete(handlers::delete_api_token),
        )
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

pub async fn run_with_db(listener: TcpListener, db: Db) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_db(db)).await
}
