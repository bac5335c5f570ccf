//! The five board handlers plus backup sync.
//!
//! Outcome policy: authorization failures, not-found ids and validation
//! misses all resolve to a flash notice and a redirect, never an HTTP error
//! status. Ownership is enforced here, before the store is touched; the
//! store itself writes unconditionally.

use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use axum_extra::extract::cookie::CookieJar;
use chrono::Utc;
use serde::Deserialize;
use tracing::{info, warn};

use service::domain::{Update, UpdateInput};

use crate::errors::AppError;
use crate::routes::AppState;
use crate::session;
use crate::views;

pub async fn home(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Html<String>) {
    let (jar, flash) = session::take_flash(jar);
    (jar, views::home(&state.app_name, flash.as_deref()))
}

pub async fn list_updates(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Html<String>), AppError> {
    let updates = state.store.list_all().await?;
    let current = session::current_username(&jar);
    let (jar, flash) = session::take_flash(jar);
    let html = views::list(&state.app_name, flash.as_deref(), &updates, current.as_deref());
    Ok((jar, html))
}

pub async fn post_form(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Html<String>) {
    let current = session::current_username(&jar);
    let (jar, flash) = session::take_flash(jar);
    let html = views::post_form(
        &state.app_name,
        flash.as_deref(),
        &state.authorized_posters,
        current.as_deref(),
    );
    (jar, html)
}

pub async fn post_submit(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(input): Form<UpdateInput>,
) -> Result<Response, AppError> {
    if !state.identity.is_authorized_poster(&input.name) {
        warn!(name = %input.name, "unauthorized post attempt");
        let jar = session::flash(jar, "You are not authorized to post updates.");
        return Ok((jar, Redirect::to("/post")).into_response());
    }

    let message = match input.validated_message() {
        Ok(m) => m,
        Err(_) => {
            let jar = session::flash(jar, "Message cannot be empty.");
            return Ok((jar, Redirect::to("/post")).into_response());
        }
    };

    // remember who's posting
    let jar = session::remember_username(jar, &input.name);

    let update = Update::new(&input.name, &message);
    info!(id = %update.id, name = %update.name, "posting update");
    state.store.insert(update).await?;

    let jar = session::flash(jar, "Update posted.");
    Ok((jar, Redirect::to("/updates")).into_response())
}

#[derive(Debug, Deserialize)]
pub struct EditForm {
    pub message: String,
}

/// Look up an update and check ownership; on any miss, queue the uniform
/// notice and redirect to the list.
async fn owned_update(
    state: &AppState,
    jar: CookieJar,
    id: &str,
    action: &str,
) -> Result<Result<(CookieJar, Update), Response>, AppError> {
    let Some(update) = state.store.get(id).await? else {
        let jar = session::flash(jar, "Update not found.");
        return Ok(Err((jar, Redirect::to("/updates")).into_response()));
    };
    let current = session::current_username(&jar);
    if !state.identity.is_owner(&update.name, current.as_deref()) {
        warn!(id = %id, author = %update.name, "rejected {} by non-owner", action);
        let jar = session::flash(jar, &format!("You can only {} your own updates.", action));
        return Ok(Err((jar, Redirect::to("/updates")).into_response()));
    }
    Ok(Ok((jar, update)))
}

pub async fn edit_form(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let (jar, update) = match owned_update(&state, jar, &id, "edit").await? {
        Ok(found) => found,
        Err(redirect) => return Ok(redirect),
    };
    let (jar, flash) = session::take_flash(jar);
    let html = views::edit_form(&state.app_name, flash.as_deref(), &update);
    Ok((jar, html).into_response())
}

pub async fn edit_submit(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<String>,
    Form(form): Form<EditForm>,
) -> Result<Response, AppError> {
    let (jar, update) = match owned_update(&state, jar, &id, "edit").await? {
        Ok(found) => found,
        Err(redirect) => return Ok(redirect),
    };

    let message = form.message.trim();
    if message.is_empty() {
        let jar = session::flash(jar, "Message cannot be empty.");
        return Ok((jar, Redirect::to(&format!("/edit/{}", update.id))).into_response());
    }

    // author stays untouched; only message and timestamp move
    if !state.store.update_fields(&update.id, message, Utc::now()).await? {
        let jar = session::flash(jar, "Update not found.");
        return Ok((jar, Redirect::to("/updates")).into_response());
    }

    let jar = session::flash(jar, "Update edited.");
    Ok((jar, Redirect::to("/updates")).into_response())
}

pub async fn delete_update(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let (jar, update) = match owned_update(&state, jar, &id, "delete").await? {
        Ok(found) => found,
        Err(redirect) => return Ok(redirect),
    };

    if !state.store.delete(&update.id).await? {
        let jar = session::flash(jar, "Update not found.");
        return Ok((jar, Redirect::to("/updates")).into_response());
    }

    info!(id = %update.id, "update deleted");
    let jar = session::flash(jar, "Update deleted.");
    Ok((jar, Redirect::to("/updates")).into_response())
}

/// File backend only. The sole endpoint that reports failure as plain text
/// instead of the flash/redirect flow.
pub async fn sync_backup(State(state): State<AppState>) -> String {
    let Some(store) = state.json_store.as_ref() else {
        return "Backup unavailable: database backend.".to_string();
    };
    match store.sync_backup().await {
        Ok(()) => "Backup synced successfully.".to_string(),
        Err(e) => format!("Backup failed: {}", e),
    }
}
