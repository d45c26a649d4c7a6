//! Browser front end: one page, an upload form and a regenerate button.

use axum::{
    extract::{multipart::MultipartError, DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Json, Router,
};
use minijinja::Environment;
use serde::Serialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::error::CaptionError;
use crate::image::ImageUpload;
use crate::parser::CaptionSet;
use crate::session::{Generation, Session, Snapshot};
use crate::CaptionMaker;

const INDEX_TEMPLATE: &str = include_str!("../templates/index.html");
const UPLOAD_FIELD: &str = "image";
pub const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub maker: CaptionMaker,
    pub session: Arc<Session>,
    templates: Arc<Environment<'static>>,
    upload_limit: usize,
}

impl AppState {
    pub fn new(maker: CaptionMaker) -> Result<Self, CaptionError> {
        let mut templates = Environment::new();
        templates.add_template("index.html", INDEX_TEMPLATE)?;

        Ok(Self {
            maker,
            session: Session::new(),
            templates: Arc::new(templates),
            upload_limit: MAX_UPLOAD_BYTES,
        })
    }

    /// Largest request body `/upload` accepts, in bytes.
    pub fn with_upload_limit(mut self, bytes: usize) -> Self {
        self.upload_limit = bytes;
        self
    }
}

pub fn create_router(state: AppState) -> Router {
    let upload_limit = state.upload_limit;
    Router::new()
        .route("/", get(index))
        .route("/upload", post(upload))
        .route("/regenerate", post(regenerate))
        .route("/api/result", get(last_result))
        .route("/health", get(|| async { "ok" }))
        .layer(DefaultBodyLimit::max(upload_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

impl IntoResponse for CaptionError {
    fn into_response(self) -> Response {
        let status = match &self {
            CaptionError::InvalidUpload(_) => StatusCode::BAD_REQUEST,
            CaptionError::UnsupportedFormat(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            CaptionError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            CaptionError::Transport(_) => StatusCode::BAD_GATEWAY,
            CaptionError::Config(_)
            | CaptionError::Store(_)
            | CaptionError::Io(_)
            | CaptionError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, self.to_string()).into_response()
    }
}

#[derive(Serialize)]
struct CaptionView {
    number: usize,
    text: String,
    copy: String,
}

#[derive(Serialize)]
struct ResultView {
    description: String,
    main_caption: Option<String>,
    columns: [Vec<CaptionView>; 2],
}

impl From<&CaptionSet> for ResultView {
    fn from(set: &CaptionSet) -> Self {
        let (first, _) = set.columns();
        let split = first.len();
        let mut columns = [Vec::new(), Vec::new()];
        for (idx, caption) in set.captions.iter().enumerate() {
            columns[usize::from(idx >= split)].push(CaptionView {
                number: idx + 1,
                text: caption.clone(),
                copy: set.copy_text(idx).unwrap_or_default(),
            });
        }

        Self {
            description: set.description.clone(),
            main_caption: set.main_caption.clone(),
            columns,
        }
    }
}

#[derive(Serialize)]
struct PageView {
    image_uri: Option<String>,
    file_name: Option<String>,
    result: Option<ResultView>,
    error: Option<String>,
    busy: bool,
}

impl PageView {
    fn new(snapshot: &Snapshot) -> Self {
        let (result, error) = match &snapshot.generation {
            Some(Generation::Ready(set)) => (Some(ResultView::from(set)), None),
            Some(Generation::Failed { message }) => (None, Some(message.clone())),
            None => (None, None),
        };

        Self {
            image_uri: snapshot.upload.as_ref().map(ImageUpload::data_uri),
            file_name: snapshot.upload.as_ref().map(|u| u.file_name.clone()),
            result,
            error,
            busy: snapshot.busy,
        }
    }
}

async fn index(State(state): State<AppState>) -> Result<Html<String>, CaptionError> {
    let snapshot = state.session.snapshot().await;
    let view = PageView::new(&snapshot);
    let page = state.templates.get_template("index.html")?.render(&view)?;
    Ok(Html(page))
}

async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Redirect, CaptionError> {
    let mut image = None;
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or("upload").to_string();
        let data = field.bytes().await.map_err(multipart_error)?;
        image = Some(ImageUpload::new(&file_name, data)?);
        break;
    }

    let image = image.ok_or_else(|| {
        CaptionError::InvalidUpload(format!("missing '{}' file field", UPLOAD_FIELD))
    })?;

    let outcome = state.session.upload(&state.maker, image).await;
    show_page_after(outcome)
}

fn multipart_error(error: MultipartError) -> CaptionError {
    if error.status() == StatusCode::PAYLOAD_TOO_LARGE {
        CaptionError::PayloadTooLarge(error.body_text())
    } else {
        CaptionError::InvalidUpload(error.body_text())
    }
}

async fn regenerate(State(state): State<AppState>) -> Result<Redirect, CaptionError> {
    let outcome = state.session.regenerate(&state.maker).await;
    show_page_after(outcome)
}

/// Generation failures are recorded in the session and shown on the page;
/// everything else is reported to the caller directly.
fn show_page_after(outcome: Result<CaptionSet, CaptionError>) -> Result<Redirect, CaptionError> {
    match outcome {
        Ok(_) | Err(CaptionError::Transport(_)) => Ok(Redirect::to("/")),
        Err(e) => Err(e),
    }
}

async fn last_result(State(state): State<AppState>) -> Response {
    match state.session.snapshot().await.generation {
        Some(generation @ Generation::Ready(_)) => Json(generation).into_response(),
        Some(generation @ Generation::Failed { .. }) => {
            (StatusCode::BAD_GATEWAY, Json(generation)).into_response()
        }
        None => (StatusCode::NOT_FOUND, "no captions generated yet").into_response(),
    }
}
