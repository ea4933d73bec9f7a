//! Server-side sessions: who is logged in, plus one-shot flash messages.
//!
//! The browser only holds a signed session id; the data lives in the session store,
//! so flushing a session on logout revokes every copy of its cookie.

use argon2::Argon2;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::cookie::Key;
use tower_sessions::Session;

use crate::{AppState, entities::user, error::AppResult};

pub const SESSION_COOKIE: &str = "session";
const USER_KEY: &str = "user_id";
const FLASH_KEY: &str = "_flashes";
const KEY_SALT: &[u8] = b"watchlist.session-key";

pub const LOGIN_REQUIRED: &str = "Please log in to access this page.";

/// Stretch the configured secret into the 64 bytes a signing key needs.
pub fn derive_key(secret: &str) -> anyhow::Result<Key> {
    let mut material = [0u8; 64];
    Argon2::default()
        .hash_password_into(secret.as_bytes(), KEY_SALT, &mut material)
        .map_err(|e| anyhow::anyhow!("failed to derive session key: {e}"))?;
    Ok(Key::from(&material))
}

/// The user behind the current request, if any. Resolved once per request.
#[derive(Clone, Debug, Default)]
pub struct Identity(Option<user::Model>);

impl Identity {
    pub fn user(&self) -> Option<&user::Model> {
        self.0.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.0.is_some()
    }
}

/// A session whose user row is gone counts as anonymous.
pub async fn resolve_identity(
    State(state): State<AppState>,
    session: Session,
    mut request: Request,
    next: Next,
) -> AppResult<Response> {
    let user = match session.get::<i32>(USER_KEY).await? {
        Some(id) => state.store.find_user(id).await?,
        None => None,
    };

    request.extensions_mut().insert(Identity(user));
    Ok(next.run(request).await)
}

/// Guard for protected routes: anonymous visitors are sent to the login page.
pub async fn require_login(session: Session, request: Request, next: Next) -> AppResult<Response> {
    let authenticated =
        request.extensions().get::<Identity>().is_some_and(Identity::is_authenticated);

    if authenticated {
        return Ok(next.run(request).await);
    }

    push_flash(&session, LOGIN_REQUIRED).await?;
    Ok(Redirect::to("/login").into_response())
}

pub async fn login(session: &Session, user: &user::Model) -> AppResult<()> {
    session.cycle_id().await?;
    session.insert(USER_KEY, user.id).await?;
    Ok(())
}

pub async fn logout(session: &Session) -> AppResult<()> {
    session.flush().await?;
    Ok(())
}

pub async fn push_flash(session: &Session, message: &str) -> AppResult<()> {
    let mut messages: Vec<String> = session.get(FLASH_KEY).await?.unwrap_or_default();
    messages.push(message.to_string());
    session.insert(FLASH_KEY, messages).await?;
    Ok(())
}

/// Pending messages, removed from the session so they render once.
pub async fn take_flashes(session: &Session) -> AppResult<Vec<String>> {
    Ok(session.remove::<Vec<String>>(FLASH_KEY).await?.unwrap_or_default())
}
