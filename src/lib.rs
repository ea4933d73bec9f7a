pub mod cli;
pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod models;
pub mod password;
pub mod routes;
pub mod session;
pub mod store;
pub mod templates;

use std::sync::Arc;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use sea_orm::DatabaseConnection;
use tower_http::trace::TraceLayer;
use tower_sessions::{
    Expiry, MemoryStore, SessionManagerLayer,
    cookie::{Key, SameSite},
};

use crate::{config::Config, store::Store};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Store,
    key: Key,
}

impl AppState {
    pub fn new(config: Config, db: DatabaseConnection) -> anyhow::Result<Self> {
        let key = session::derive_key(&config.secret_key)?;
        Ok(Self { config: Arc::new(config), store: Store::new(db), key })
    }
}

pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/movie/edit/{id}", get(routes::edit_page).post(routes::update_movie))
        .route("/movie/delete/{id}", post(routes::delete_movie))
        .route("/settings", get(routes::settings_page).post(routes::update_settings))
        .route("/logout", get(routes::logout))
        .route_layer(middleware::from_fn(session::require_login));

    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_name(session::SESSION_COOKIE)
        .with_secure(false)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::minutes(
            state.config.session_idle_minutes,
        )))
        .with_signed(state.key.clone());

    Router::new()
        .route("/", get(routes::index).post(routes::create_movie))
        .route("/about", get(routes::about))
        .route("/login", get(routes::login_page).post(routes::login))
        .merge(protected)
        .fallback(routes::not_found)
        .layer(middleware::from_fn_with_state(state.clone(), session::resolve_identity))
        .layer(session_layer)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
