//! HTTP routes for the splash page, the form, and health checks.

use crate::animation::AnimationSet;
use crate::form::FormSubmission;
use crate::loader::ModelStatus;
use crate::predictor::estimate;
use crate::record::PropertyRecord;
use crate::render::{main_page, splash_page};
use crate::session::{session_cookie, session_from_cookie_header, SessionId, SessionStore, UiMode};
use crate::variant::{Variant, VariantProfile};
use axum::extract::State;
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

/// Shared, read-only state plus the session store.
#[derive(Clone)]
pub struct AppState {
    profile: Arc<VariantProfile>,
    model: ModelStatus,
    animations: Arc<AnimationSet>,
    sessions: SessionStore,
}

impl AppState {
    /// Bundles everything the handlers need.
    pub fn new(
        profile: VariantProfile,
        model: ModelStatus,
        animations: AnimationSet,
        sessions: SessionStore,
    ) -> Self {
        Self {
            profile: Arc::new(profile),
            model,
            animations: Arc::new(animations),
            sessions,
        }
    }

    /// The session store, shared with callers that inspect session state.
    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }
}

#[derive(Debug, Serialize)]
struct Health {
    model_loaded: bool,
    variant: Variant,
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/enter", post(enter))
        .route("/predict", post(predict))
        .route("/healthz", get(healthz))
        .with_state(state)
}

async fn index(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let mode = state.sessions.resolve(session_id(&headers).as_ref()).await;
    let html = match mode {
        UiMode::Splash => splash_page(&state.profile, &state.animations),
        UiMode::Main => main_page(
            &state.profile,
            &state.animations,
            &PropertyRecord::default(),
            None,
        ),
    };
    Html(html).into_response()
}

async fn enter(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let (id, created) = state.sessions.enter(session_id(&headers)).await;
    debug!(session = id.as_str(), created, "entry action applied");
    with_session(Redirect::to("/").into_response(), &id, created)
}

async fn predict(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(submission): Form<FormSubmission>,
) -> Response {
    let mode = state.sessions.resolve(session_id(&headers).as_ref()).await;
    if mode == UiMode::Splash {
        return Redirect::to("/").into_response();
    }
    let record = submission.into_record();
    let outcome = estimate(&record, &state.model, &state.profile);
    let html = main_page(&state.profile, &state.animations, &record, Some(&outcome));
    Html(html).into_response()
}

async fn healthz(State(state): State<AppState>) -> Json<Health> {
    Json(Health {
        model_loaded: state.model.is_loaded(),
        variant: state.profile.variant,
    })
}

fn session_id(headers: &HeaderMap) -> Option<SessionId> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(session_from_cookie_header)
}

fn with_session(mut response: Response, id: &SessionId, created: bool) -> Response {
    if created {
        match HeaderValue::from_str(&session_cookie(id)) {
            Ok(value) => {
                response.headers_mut().append(SET_COOKIE, value);
            }
            Err(err) => warn!(error = %err, "failed to encode session cookie"),
        }
    }
    response
}
