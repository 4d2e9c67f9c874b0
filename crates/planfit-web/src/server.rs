//! HTTP server and survey flow.
//!
//! The flow is a short page sequence: `landing → survey → choice →
//! {lifting | meals} → generate`. Each handler opens the caller's session
//! from the cookie (issuing a fresh one when absent or tampered), reads or
//! writes the survey state, and either renders a page or redirects to the
//! step the session is actually ready for.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::State;
use axum::http::{header, HeaderMap, HeaderValue};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use tokio::net::TcpListener;

use planfit_core::{
    estimate_daily_calories, ActivityLevel, Gender, MealPreferences, PlanPreferences, SurveyData,
    WorkoutPreferences,
};
use planfit_providers::TextGenerator;

use crate::config::ServerConfig;
use crate::error::WebError;
use crate::forms::FormData;
use crate::plan::generate_plan;
use crate::session::{self, SessionState, SessionStore, SESSION_COOKIE};
use crate::templates::Pages;

const STYLESHEET: &str = include_str!("../templates/style.css");

struct AppState {
    store: Arc<dyn SessionStore>,
    generator: Arc<dyn TextGenerator>,
    pages: Pages,
    config: ServerConfig,
    start_time: Instant,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    uptime_secs: u64,
    active_sessions: usize,
    version: &'static str,
}

/// The planfit HTTP server.
pub struct PlanServer {
    config: ServerConfig,
    store: Arc<dyn SessionStore>,
    generator: Arc<dyn TextGenerator>,
}

impl PlanServer {
    pub fn new(
        config: ServerConfig,
        store: Arc<dyn SessionStore>,
        generator: Arc<dyn TextGenerator>,
    ) -> Self {
        Self {
            config,
            store,
            generator,
        }
    }

    pub fn router(&self) -> Result<Router, WebError> {
        let state = Arc::new(AppState {
            store: self.store.clone(),
            generator: self.generator.clone(),
            pages: Pages::new()?,
            config: self.config.clone(),
            start_time: Instant::now(),
        });
        Ok(Router::new()
            .route("/", get(landing))
            .route("/survey", get(survey_page))
            .route("/lifting", get(lifting_page))
            .route("/meals", get(meals_page))
            .route("/choice", get(choice))
            .route("/generate", get(generate))
            .route("/select-plan", post(select_plan))
            .route("/submit-survey", post(submit_survey))
            .route("/submit-lifting", post(submit_lifting))
            .route("/submit-meals", post(submit_meals))
            .route("/health", get(health))
            .route("/static/style.css", get(stylesheet))
            .with_state(state))
    }

    pub async fn start(&self) -> Result<(), WebError> {
        let app = self.router()?;
        let addr = self.config.bind_addr();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| WebError::Server(e.to_string()))?;

        tracing::info!("planfit server listening on http://{}", addr);

        axum::serve(listener, app)
            .await
            .map_err(|e| WebError::Server(e.to_string()))?;

        Ok(())
    }
}

// -- Session plumbing ------------------------------------------------------

struct RequestSession {
    token: String,
    state: SessionState,
    /// A token was just issued; the response must set the cookie.
    fresh: bool,
}

fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    let raw = headers.get(header::COOKIE)?.to_str().ok()?;
    raw.split(';').map(str::trim).find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        (key == name).then_some(value)
    })
}

/// Load the caller's session, creating one on first contact. Sessions are
/// created eagerly (before any survey answer arrives) so every later POST
/// lands in an existing entry.
async fn open_session(state: &AppState, headers: &HeaderMap) -> RequestSession {
    let presented = cookie_value(headers, SESSION_COOKIE)
        .and_then(|token| session::verify_token(&state.config.secret_key, token))
        .map(str::to_string);

    if let Some(token) = presented {
        if let Some(existing) = state.store.load(&token).await {
            return RequestSession {
                token,
                state: existing,
                fresh: false,
            };
        }
        // Signature checks out but the entry expired; reuse the token.
        state.store.store(&token, SessionState::default()).await;
        return RequestSession {
            token,
            state: SessionState::default(),
            fresh: false,
        };
    }

    let token = session::issue_token(&state.config.secret_key);
    state.store.store(&token, SessionState::default()).await;
    RequestSession {
        token,
        state: SessionState::default(),
        fresh: true,
    }
}

fn with_session_cookie(mut response: Response, session: &RequestSession) -> Response {
    if session.fresh {
        let cookie = format!("{}={}; Path=/; HttpOnly", SESSION_COOKIE, session.token);
        if let Ok(value) = HeaderValue::from_str(&cookie) {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
    }
    response
}

// -- Page handlers ---------------------------------------------------------

async fn landing(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, WebError> {
    render_static_page(&state, &headers, "landing").await
}

async fn survey_page(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, WebError> {
    render_static_page(&state, &headers, "survey").await
}

async fn lifting_page(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, WebError> {
    render_static_page(&state, &headers, "lifting").await
}

async fn meals_page(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, WebError> {
    render_static_page(&state, &headers, "meals").await
}

async fn render_static_page(
    state: &AppState,
    headers: &HeaderMap,
    page: &str,
) -> Result<Response, WebError> {
    let session = open_session(state, headers).await;
    let html = state.pages.render(page, &serde_json::json!({}))?;
    Ok(with_session_cookie(Html(html).into_response(), &session))
}

async fn choice(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, WebError> {
    let session = open_session(&state, &headers).await;

    let Some(survey) = session.state.survey.clone() else {
        return Ok(with_session_cookie(
            Redirect::to("/").into_response(),
            &session,
        ));
    };

    let calories = estimate_daily_calories(&survey);
    let html = state.pages.render(
        "choice",
        &serde_json::json!({
            "calories": calories,
            "gender": survey.gender.as_str(),
            "goal": survey.goal,
        }),
    )?;
    Ok(with_session_cookie(Html(html).into_response(), &session))
}

async fn generate(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, WebError> {
    let session = open_session(&state, &headers).await;

    let Some(preferences) = session.state.preferences.clone() else {
        return Ok(with_session_cookie(
            Redirect::to("/survey").into_response(),
            &session,
        ));
    };
    let Some(survey) = session.state.survey.clone() else {
        return Ok(with_session_cookie(
            Redirect::to("/survey").into_response(),
            &session,
        ));
    };

    let kind = preferences.kind();
    let plan = generate_plan(state.generator.as_ref(), kind, &survey, &preferences).await?;

    let html = state.pages.render(
        "generate",
        &serde_json::json!({
            "surveyType": plan.kind.as_str(),
            "plan": plan.plan_html,
        }),
    )?;
    Ok(with_session_cookie(Html(html).into_response(), &session))
}

// -- Form handlers ---------------------------------------------------------

async fn select_plan(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: String,
) -> Result<Response, WebError> {
    let session = open_session(&state, &headers).await;
    let form = FormData::parse(&body);

    let target = match form.first("planType") {
        "workout" => "/lifting",
        "meal" => "/meals",
        other => return Err(WebError::InvalidPlanSelection(other.to_string())),
    };
    Ok(with_session_cookie(
        Redirect::to(target).into_response(),
        &session,
    ))
}

async fn submit_survey(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: String,
) -> Result<Response, WebError> {
    let mut session = open_session(&state, &headers).await;
    let form = FormData::parse(&body);

    session.state.survey = Some(SurveyData {
        gender: Gender::parse(form.first("gender")),
        height: form.float("height"),
        weight: form.float("weight"),
        age: form.int("age"),
        activity_level: ActivityLevel::parse(form.first("activityLevel")),
        goal: form.first("goal").to_string(),
    });
    state.store.store(&session.token, session.state.clone()).await;

    Ok(with_session_cookie(
        Redirect::to("/choice").into_response(),
        &session,
    ))
}

async fn submit_lifting(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: String,
) -> Result<Response, WebError> {
    let mut session = open_session(&state, &headers).await;
    let form = FormData::parse(&body);

    session.state.preferences = Some(PlanPreferences::Workout(WorkoutPreferences {
        days: form.int("days"),
        time_per_day: form.int("timePerDay"),
        exercise_type: form.all("exerciseType"),
    }));
    state.store.store(&session.token, session.state.clone()).await;

    Ok(with_session_cookie(
        Redirect::to("/generate").into_response(),
        &session,
    ))
}

async fn submit_meals(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: String,
) -> Result<Response, WebError> {
    let mut session = open_session(&state, &headers).await;
    let form = FormData::parse(&body);

    session.state.preferences = Some(PlanPreferences::Meal(MealPreferences {
        meals_per_day: form.int("mealsPerDay"),
        snacks_per_day: form.int("snacksPerDay"),
        packed_lunch: form.first("packedLunch").to_string(),
        dietary_restrictions: form.all("dietaryRestrictions"),
    }));
    state.store.store(&session.token, session.state.clone()).await;

    Ok(with_session_cookie(
        Redirect::to("/generate").into_response(),
        &session,
    ))
}

// -- Service handlers ------------------------------------------------------

async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let active_sessions = state.store.session_count().await;
    let uptime_secs = state.start_time.elapsed().as_secs();
    Json(HealthResponse {
        status: "ok",
        uptime_secs,
        active_sessions,
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn stylesheet() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css")], STYLESHEET)
}
