use axum::{
    Extension,
    extract::{Form, Path, State, rejection::FormRejection},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use tracing::{info, warn};

use crate::{
    AppState,
    entities::movie,
    error::{AppError, AppResult},
    models::{LoginForm, MovieForm, SettingsForm},
    session::{self, Identity},
    templates::{self, PageContext},
};

/// Gathers the layout data and consumes pending flash messages.
async fn page_context(
    state: &AppState,
    identity: &Identity,
    session: &Session,
) -> AppResult<PageContext> {
    let owner = state.store.first_user().await?.map(|u| u.name);
    let flashes = session::take_flashes(session).await?;
    Ok(PageContext { owner, signed_in: identity.is_authenticated(), flashes })
}

async fn flash_redirect(session: &Session, message: &str, to: &str) -> AppResult<Response> {
    session::push_flash(session, message).await?;
    Ok(Redirect::to(to).into_response())
}

/// Integer ids only; anything else is as missing as an unknown id.
async fn load_movie(state: &AppState, raw_id: &str) -> AppResult<movie::Model> {
    let id: i32 = raw_id.parse().map_err(|_| AppError::NotFound)?;
    state.store.find_movie(id).await?.ok_or(AppError::NotFound)
}

/// An unreadable body counts as empty fields.
fn movie_form(form: Result<Form<MovieForm>, FormRejection>) -> MovieForm {
    form.map(|Form(form)| form).unwrap_or_default()
}

pub async fn index(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    session: Session,
) -> AppResult<Html<String>> {
    let movies = state.store.list_movies().await?;
    let ctx = page_context(&state, &identity, &session).await?;
    Ok(Html(templates::index_page(&ctx, &movies)))
}

pub async fn create_movie(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    session: Session,
    form: Result<Form<MovieForm>, FormRejection>,
) -> AppResult<Response> {
    if !identity.is_authenticated() {
        return Ok(Redirect::to("/").into_response());
    }

    let form = movie_form(form);
    if !form.is_valid() {
        return flash_redirect(&session, "Invalid input.", "/").await;
    }

    let movie = state.store.create_movie(&form.title, &form.year).await?;
    info!(id = movie.id, title = %movie.title, "movie created");

    flash_redirect(&session, "Item created.", "/").await
}

pub async fn edit_page(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
    session: Session,
) -> AppResult<Html<String>> {
    let movie = load_movie(&state, &id).await?;
    let ctx = page_context(&state, &identity, &session).await?;
    Ok(Html(templates::edit_page(&ctx, &movie)))
}

pub async fn update_movie(
    State(state): State<AppState>,
    Path(id): Path<String>,
    session: Session,
    form: Result<Form<MovieForm>, FormRejection>,
) -> AppResult<Response> {
    let movie = load_movie(&state, &id).await?;

    let form = movie_form(form);
    if !form.is_valid() {
        let back = format!("/movie/edit/{}", movie.id);
        return flash_redirect(&session, "Invalid input.", &back).await;
    }

    let movie = state.store.update_movie(movie, &form.title, &form.year).await?;
    info!(id = movie.id, title = %movie.title, "movie updated");

    flash_redirect(&session, "Edit item.", "/").await
}

pub async fn delete_movie(
    State(state): State<AppState>,
    Path(id): Path<String>,
    session: Session,
) -> AppResult<Response> {
    let movie = load_movie(&state, &id).await?;
    let id = movie.id;
    state.store.delete_movie(movie).await?;
    info!(id, "movie deleted");

    flash_redirect(&session, "Delete item.", "/").await
}

pub async fn login_page(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    session: Session,
) -> AppResult<Html<String>> {
    let ctx = page_context(&state, &identity, &session).await?;
    Ok(Html(templates::login_page(&ctx)))
}

pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> AppResult<Response> {
    if !form.is_complete() {
        return flash_redirect(&session, "Invalid input.", "/login").await;
    }

    let Some(user) = state.store.authenticate(&form.username, &form.password).await? else {
        warn!(username = %form.username, "login rejected");
        return flash_redirect(&session, "Invalid username or password.", "/login").await;
    };

    info!(user_id = user.id, "login");
    session::login(&session, &user).await?;
    flash_redirect(&session, "Login Success.", "/").await
}

pub async fn logout(
    Extension(identity): Extension<Identity>,
    session: Session,
) -> AppResult<Response> {
    if let Some(user) = identity.user() {
        info!(user_id = user.id, "logout");
    }
    session::logout(&session).await?;
    flash_redirect(&session, "has logout.", "/").await
}

pub async fn settings_page(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    session: Session,
) -> AppResult<Html<String>> {
    let name = identity.user().map(|u| u.name.clone()).unwrap_or_default();
    let ctx = page_context(&state, &identity, &session).await?;
    Ok(Html(templates::settings_page(&ctx, &name)))
}

pub async fn update_settings(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    session: Session,
    Form(form): Form<SettingsForm>,
) -> AppResult<Response> {
    if !form.is_valid() {
        return flash_redirect(&session, "Invalid input", "/settings").await;
    }

    let Some(user) = identity.user().cloned() else {
        return Ok(Redirect::to("/login").into_response());
    };

    let user = state.store.rename_user(user, &form.name).await?;
    info!(user_id = user.id, name = %user.name, "settings updated");

    flash_redirect(&session, "settings update", "/").await
}

pub async fn about(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    session: Session,
) -> AppResult<Html<String>> {
    let ctx = page_context(&state, &identity, &session).await?;
    Ok(Html(templates::about_page(&ctx)))
}

pub async fn not_found() -> (StatusCode, Html<String>) {
    (StatusCode::NOT_FOUND, Html(templates::not_found_page()))
}
