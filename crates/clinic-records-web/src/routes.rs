//! HTTP controller: list/search, create, edit and delete routes.
//!
//! State-changing routes are POST-only and always answer with a
//! `303 See Other` redirect carrying status messages in the flash cookie.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header::SET_COOKIE, HeaderMap},
    response::{AppendHeaders, Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use clinic_records_core::db::Database;
use clinic_records_core::models::SearchFilters;
use clinic_records_core::service::{RecordError, RecordService};
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::AppError;
use crate::flash::{self, Flash, FlashError, FlashSigner};
use crate::views::{self, EditContext, IndexContext};

pub const CREATED: &str = "Patient created successfully.";
pub const UPDATED: &str = "Patient updated successfully.";
pub const DELETED: &str = "Patient deleted successfully.";
pub const DUPLICATE: &str = "Patient ID must be unique.";
pub const NOT_FOUND: &str = "Patient not found.";

/// Shared, read-only application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub signer: FlashSigner,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, FlashError> {
        let signer = FlashSigner::new(&config.secret_key)?;
        Ok(Self {
            config: Arc::new(config),
            signer,
        })
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index).post(submit))
        .route("/patients/:id/edit", get(edit_form).post(update))
        .route("/patients/:id/delete", post(delete))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run `f` against a freshly opened database on the blocking pool. The
/// connection is closed when the task returns, whatever the outcome.
async fn with_service<T, F>(state: &AppState, f: F) -> Result<T, AppError>
where
    F: FnOnce(&RecordService<'_>) -> T + Send + 'static,
    T: Send + 'static,
{
    let path = state.config.db_path.clone();
    tokio::task::spawn_blocking(move || -> Result<T, AppError> {
        let db = Database::open(&path)?;
        let service = RecordService::new(&db);
        Ok(f(&service))
    })
    .await?
}

/// Turn a recoverable outcome into status messages; storage failures
/// propagate.
fn recover(err: RecordError) -> Result<Flash, AppError> {
    match err {
        RecordError::Validation(messages) => {
            debug!(?messages, "validation failed");
            Ok(Flash::errors(messages))
        }
        RecordError::DuplicateKey(detail) => {
            warn!(%detail, "duplicate patient id");
            Ok(Flash::new().error(DUPLICATE))
        }
        RecordError::NotFound(id) => {
            debug!(id, "patient not found");
            Ok(Flash::new().error(NOT_FOUND))
        }
        RecordError::Storage(e) => Err(e.into()),
    }
}

fn redirect(state: &AppState, to: &str, flash: &Flash) -> Result<Response, AppError> {
    let cookie = state.signer.set_cookie(flash)?;
    Ok((AppendHeaders([(SET_COOKIE, cookie)]), Redirect::to(to)).into_response())
}

/// Render a page, clearing the flash cookie if the request carried one.
fn page(html: String, clear_flash: bool) -> Response {
    if clear_flash {
        (AppendHeaders([(SET_COOKIE, flash::clear_cookie())]), Html(html)).into_response()
    } else {
        Html(html).into_response()
    }
}

fn edit_path(id: i64) -> String {
    format!("/patients/{id}/edit")
}

/// GET /: search and list.
async fn index(
    State(state): State<AppState>,
    Query(filters): Query<SearchFilters>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    render_index(&state, filters, &headers).await
}

/// POST /: create when `form_type=create`, otherwise behave like GET.
/// A missing or non-form body lists like GET.
async fn submit(
    State(state): State<AppState>,
    Query(filters): Query<SearchFilters>,
    headers: HeaderMap,
    form: Option<Form<HashMap<String, String>>>,
) -> Result<Response, AppError> {
    let form = form.map(|Form(form)| form).unwrap_or_default();
    if form.get("form_type").map(String::as_str) != Some("create") {
        return render_index(&state, filters, &headers).await;
    }

    let flash = match with_service(&state, move |s| s.create(&form)).await? {
        Ok(id) => {
            info!(id, "patient created");
            Flash::new().success(CREATED)
        }
        Err(err) => recover(err)?,
    };
    redirect(&state, "/", &flash)
}

async fn render_index(
    state: &AppState,
    filters: SearchFilters,
    headers: &HeaderMap,
) -> Result<Response, AppError> {
    let search = filters.trimmed();
    let query = search.clone();
    let patients = with_service(state, move |s| s.search(&query)).await??;

    let (flash, had_cookie) = state.signer.take(headers);
    let today = chrono::Local::now().format("%Y-%m-%d").to_string();

    let html = views::index(&IndexContext {
        patients: &patients,
        search: &search,
        today: &today,
        flash: &flash,
    });
    Ok(page(html, had_cookie))
}

/// GET /patients/{id}/edit
async fn edit_form(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let Some(patient) = with_service(&state, move |s| s.get(id)).await?? else {
        return redirect(&state, "/", &recover(RecordError::NotFound(id))?);
    };

    let (flash, had_cookie) = state.signer.take(&headers);
    let html = views::edit(&EditContext {
        patient: &patient,
        flash: &flash,
    });
    Ok(page(html, had_cookie))
}

/// POST /patients/{id}/edit
async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Form(form): Form<HashMap<String, String>>,
) -> Result<Response, AppError> {
    match with_service(&state, move |s| s.update(id, &form)).await? {
        Ok(()) => {
            info!(id, "patient updated");
            redirect(&state, "/", &Flash::new().success(UPDATED))
        }
        Err(err @ RecordError::Validation(_)) => redirect(&state, &edit_path(id), &recover(err)?),
        Err(err) => redirect(&state, "/", &recover(err)?),
    }
}

/// POST /patients/{id}/delete
async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    let flash = match with_service(&state, move |s| s.delete(id)).await? {
        Ok(()) => {
            info!(id, "patient deleted");
            Flash::new().success(DELETED)
        }
        Err(err) => recover(err)?,
    };
    redirect(&state, "/", &flash)
}
