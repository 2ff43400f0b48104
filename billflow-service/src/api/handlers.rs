use axum::{
    extract::State,
    http::header::SET_COOKIE,
    response::{IntoResponse, Redirect, Response},
    Form, Json,
};
use billflow_core::billing::{cycle_breakdown, daily_usage};

use super::{
    models::{
        ChartData, Dashboard, LatestReadings, LoginForm, LoginPrompt, NewReadingForm, SettingsForm, SettingsView,
    },
    ApiError, AppState,
};
use crate::{
    auth::{password_matches, Authenticated, SessionKeys},
    validation::parse_reading,
};

pub async fn healthz() -> &'static str {
    "ok"
}

/// Target of the unauthenticated redirect. Describes the form to submit.
pub async fn login_page() -> Json<LoginPrompt> {
    Json(LoginPrompt::default())
}

pub async fn login(State(state): State<AppState>, Form(form): Form<LoginForm>) -> Result<Response, ApiError> {
    if !password_matches(&state.password, &form.password) {
        metrics::counter!("login_failures_total").increment(1);
        tracing::warn!("rejected login with incorrect password");
        return Err(ApiError::Unauthorized("incorrect password".to_string()));
    }

    let token = state.sessions.issue(state.clock.now());
    Ok(([(SET_COOKIE, state.sessions.set_cookie(&token))], Redirect::to("/")).into_response())
}

pub async fn logout() -> Response {
    ([(SET_COOKIE, SessionKeys::clear_cookie())], Redirect::to("/login")).into_response()
}

pub async fn dashboard(_auth: Authenticated, State(state): State<AppState>) -> Result<Json<Dashboard>, ApiError> {
    let dataset = state.store.load_or_empty().await?;
    let cycle = cycle_breakdown(&dataset, state.clock.now());

    Ok(Json(Dashboard {
        latest: LatestReadings::from(&dataset),
        total_cost: format!("{:.2}", cycle.total),
        chart: ChartData::from(daily_usage(&dataset.electricity)),
        cycle,
    }))
}

pub async fn new_reading(
    _auth: Authenticated,
    State(state): State<AppState>,
    Form(form): Form<NewReadingForm>,
) -> Result<Redirect, ApiError> {
    let (kind, reading) = parse_reading(
        form.kind.as_deref(),
        form.reading.as_deref(),
        form.timestamp.as_deref(),
        state.clock.offset(),
    )?;

    state
        .store
        .update(|ds| {
            ds.record(kind, reading);
            Ok::<_, ApiError>(())
        })
        .await?;

    metrics::counter!("readings_recorded_total", "resource" => kind.as_str()).increment(1);
    tracing::info!(resource = %kind, reading = reading.reading, "reading recorded");

    Ok(Redirect::to("/"))
}

pub async fn settings(_auth: Authenticated, State(state): State<AppState>) -> Result<Json<SettingsView>, ApiError> {
    let dataset = state.store.load_or_empty().await?;
    Ok(Json(SettingsView::of(&dataset)))
}

pub async fn update_settings(
    _auth: Authenticated,
    State(state): State<AppState>,
    Form(form): Form<SettingsForm>,
) -> Result<Json<SettingsView>, ApiError> {
    let (prices, settlement_day) = form.parse()?;

    let mut view = state
        .store
        .update(|ds| {
            ds.set_settlement_day(settlement_day)?;
            ds.prices = prices;
            Ok::<_, ApiError>(SettingsView::of(ds))
        })
        .await?;

    tracing::info!(settlement_day, "settings updated");
    view.message = Some("settings updated".to_string());

    Ok(Json(view))
}
