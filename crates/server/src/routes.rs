//! API route handlers

use std::num::NonZeroUsize;

use axum::extract::{FromRequest, Query, Request, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{async_trait, Form, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use airquality_facade::{parse_timestamp, Pollutant, QueryOutcome, Reading, UnavailableReason};

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<UnavailableReason>,
}

/// Error half of every handler
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorResponse,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            body: ErrorResponse {
                error: message.into(),
                reason: None,
            },
        }
    }

    fn unavailable(reason: UnavailableReason) -> Self {
        let error = match reason {
            UnavailableReason::InvalidFormat => "Timestamp must look like YYYY-MM-DD HH:MM",
            UnavailableReason::NoDataAtTimestamp => "Date not found in dataset.",
        };
        Self {
            status: StatusCode::NOT_FOUND,
            body: ErrorResponse {
                error: error.to_string(),
                reason: Some(reason),
            },
        }
    }

    fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: ErrorResponse {
                error: message.into(),
                reason: None,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// Either `datetime` or the `date_input`/`hour_input`/`minute_input` triple
fn requested_timestamp(
    datetime: Option<&str>,
    date: Option<&str>,
    hour: Option<u32>,
    minute: Option<u32>,
) -> Result<String, ApiError> {
    if let Some(datetime) = datetime {
        return Ok(datetime.to_string());
    }
    match (date, hour, minute) {
        (Some(date), Some(hour), Some(minute)) => Ok(format!("{} {:02}:{:02}", date, hour, minute)),
        _ => Err(ApiError::bad_request("Missing parameters")),
    }
}

fn resolve(state: &AppState, input: &str, horizon: Option<usize>) -> Result<QueryOutcome, ApiError> {
    let context = state.context();
    let horizon = match horizon {
        Some(h) => NonZeroUsize::new(h).ok_or_else(|| ApiError::bad_request("horizon must be positive"))?,
        None => context.horizon(),
    };

    let outcome = context.resolve_with_horizon(input, horizon).map_err(|e| {
        error!(input, error = %e, "query failed");
        ApiError::internal(e.to_string())
    })?;

    match outcome.unavailable_reason() {
        Some(reason) => Err(ApiError::unavailable(reason)),
        None => Ok(outcome),
    }
}

#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    pub datetime: Option<String>,
    pub date_input: Option<String>,
    pub hour_input: Option<u32>,
    pub minute_input: Option<u32>,
    pub horizon: Option<usize>,
}

/// Predict parameters from a form-encoded or JSON body
///
/// Form bodies are read when the content type says so; anything else goes
/// through the JSON extractor and its rejections.
#[derive(Debug)]
pub struct PredictBody(pub PredictRequest);

#[async_trait]
impl<S> FromRequest<S> for PredictBody
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with("application/x-www-form-urlencoded"));

        if is_form {
            let Form(body) = Form::<PredictRequest>::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;
            Ok(Self(body))
        } else {
            let Json(body) = Json::<PredictRequest>::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;
            Ok(Self(body))
        }
    }
}

pub async fn predict(
    State(state): State<AppState>,
    PredictBody(req): PredictBody,
) -> Result<Json<QueryOutcome>, ApiError> {
    let input = requested_timestamp(
        req.datetime.as_deref(),
        req.date_input.as_deref(),
        req.hour_input,
        req.minute_input,
    )?;
    let outcome = resolve(&state, &input, req.horizon)?;
    info!(input = %input, exact = outcome.is_exact_match(), "predict");
    Ok(Json(outcome))
}

pub async fn data(State(state): State<AppState>) -> Json<Vec<Reading>> {
    Json(state.context().dataset().readings().to_vec())
}

#[derive(Debug, Deserialize)]
pub struct AnalysisQuery {
    /// Pollutant name or `aqi`
    pub gas_selection: Option<String>,
    pub datetime: Option<String>,
    pub date_input: Option<String>,
    pub hour_input: Option<u32>,
    pub minute_input: Option<u32>,
    pub horizon: Option<usize>,
}

/// Series plotted by the analysis view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Selection {
    Aqi,
    Pollutant(Pollutant),
}

impl Selection {
    fn parse(name: &str) -> Result<Self, ApiError> {
        if name.eq_ignore_ascii_case("aqi") {
            return Ok(Selection::Aqi);
        }
        name.parse()
            .map(Selection::Pollutant)
            .map_err(ApiError::bad_request)
    }

    fn name(&self) -> &'static str {
        match self {
            Selection::Aqi => "aqi",
            Selection::Pollutant(p) => p.as_str(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HistoryPoint {
    pub date: DateTime<Utc>,
    pub value: f64,
}

#[derive(Debug, Serialize)]
pub struct ResolvedPoint {
    pub date: DateTime<Utc>,
    pub value: f64,
    /// `exact_match` or `forecast`
    pub kind: &'static str,
}

#[derive(Debug, Serialize)]
pub struct AnalysisResponse {
    pub series: &'static str,
    pub history: Vec<HistoryPoint>,
    pub point: ResolvedPoint,
}

pub async fn analysis(
    State(state): State<AppState>,
    Query(query): Query<AnalysisQuery>,
) -> Result<Json<AnalysisResponse>, ApiError> {
    let selection = Selection::parse(
        query
            .gas_selection
            .as_deref()
            .ok_or_else(|| ApiError::bad_request("Missing parameters"))?,
    )?;
    let input = requested_timestamp(
        query.datetime.as_deref(),
        query.date_input.as_deref(),
        query.hour_input,
        query.minute_input,
    )?;

    let outcome = resolve(&state, &input, query.horizon)?;
    let date = parse_timestamp(&input)
        .ok_or_else(|| ApiError::unavailable(UnavailableReason::InvalidFormat))?;
    let (value, kind) = match selection {
        Selection::Aqi => (outcome.aqi(), outcome_kind(&outcome)),
        Selection::Pollutant(p) => (outcome.value(p), outcome_kind(&outcome)),
    };
    let value = value.ok_or_else(|| ApiError::internal("resolved outcome carries no value"))?;

    let dataset = state.context().dataset();
    let history: Vec<HistoryPoint> = match selection {
        Selection::Aqi => dataset
            .aqi_series()
            .into_iter()
            .map(|(date, value)| HistoryPoint { date, value })
            .collect(),
        Selection::Pollutant(p) => dataset
            .series_for(p)
            .iter()
            .map(|(date, value)| HistoryPoint { date, value })
            .collect(),
    };

    Ok(Json(AnalysisResponse {
        series: selection.name(),
        history,
        point: ResolvedPoint { date, value, kind },
    }))
}

fn outcome_kind(outcome: &QueryOutcome) -> &'static str {
    if outcome.is_exact_match() {
        "exact_match"
    } else {
        "forecast"
    }
}
