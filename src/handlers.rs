use crate::errors::AppError;
use crate::models::{
    ConfigResponse, CreateEntryRequest, DashboardResponse, EnergyData, TimePeriod, Toast,
};
use crate::state::AppState;
use crate::stats::build_dashboard;
use crate::submission::{DialogState, SubmitOutcome};
use crate::ui::{render_index, render_load_error};
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::Html,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Default)]
pub struct PeriodQuery {
    pub period: Option<String>,
}

impl PeriodQuery {
    fn resolve(&self) -> Result<TimePeriod, AppError> {
        match self.period.as_deref() {
            None | Some("") => Ok(TimePeriod::default()),
            Some(value) => value
                .parse()
                .map_err(|err: crate::models::UnknownPeriod| AppError::bad_request(err.to_string())),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub toast: Option<Toast>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub dialog: DialogState,
}

pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<PeriodQuery>,
) -> Result<(StatusCode, Html<String>), AppError> {
    let period = query.resolve()?;
    match state.cache.get().await {
        Ok(data) => {
            let dashboard = build_dashboard(
                &data,
                period,
                state.config.is_using_default_read_only_endpoint,
            );
            Ok((StatusCode::OK, Html(render_index(&dashboard))))
        }
        Err(err) => {
            tracing::error!(error = ?err, "rendering dashboard without data");
            Ok((StatusCode::BAD_GATEWAY, Html(render_load_error(&err.to_string()))))
        }
    }
}

pub async fn get_energy(State(state): State<AppState>) -> Result<Json<EnergyData>, AppError> {
    let data = state.cache.get().await?;
    Ok(Json(EnergyData::clone(&data)))
}

pub async fn get_dashboard(
    State(state): State<AppState>,
    Query(query): Query<PeriodQuery>,
) -> Result<Json<DashboardResponse>, AppError> {
    let period = query.resolve()?;
    let data = state.cache.get().await?;
    Ok(Json(build_dashboard(
        &data,
        period,
        state.config.is_using_default_read_only_endpoint,
    )))
}

pub async fn refresh(
    State(state): State<AppState>,
    Query(query): Query<PeriodQuery>,
) -> Result<Json<DashboardResponse>, AppError> {
    let period = query.resolve()?;
    let data = state.cache.refetch().await?;
    Ok(Json(build_dashboard(
        &data,
        period,
        state.config.is_using_default_read_only_endpoint,
    )))
}

pub async fn create_entry(
    State(state): State<AppState>,
    Json(payload): Json<CreateEntryRequest>,
) -> (StatusCode, Json<SubmitResponse>) {
    let mut dialog = DialogState::opened_with(payload.score, payload.thoughts);
    let outcome = state.submissions.submit(&mut dialog).await;

    let (status, toast, error) = match outcome {
        SubmitOutcome::Invalid(err) => (StatusCode::UNPROCESSABLE_ENTITY, None, Some(err.to_string())),
        SubmitOutcome::Busy => (
            StatusCode::CONFLICT,
            None,
            Some("An entry is already being saved".to_string()),
        ),
        SubmitOutcome::Saved(toast) => (StatusCode::CREATED, Some(toast), None),
        SubmitOutcome::Failed { toast, error } => {
            (StatusCode::BAD_GATEWAY, Some(toast), Some(error.to_string()))
        }
    };

    (status, Json(SubmitResponse { toast, error, dialog }))
}

pub async fn get_config(State(state): State<AppState>) -> Json<ConfigResponse> {
    Json(ConfigResponse {
        read_url: state.config.read_url.clone(),
        write_url: state.config.write_url.clone(),
        is_using_default_read_only_endpoint: state.config.is_using_default_read_only_endpoint,
    })
}
