//! HTTP route handlers.

use std::time::Duration;

use axum::{
    Json, Router,
    extract::{OriginalUri, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, warn};

use crate::departures::{ClosestDeparturesRequest, DepartureFinder, QueryError, TracingObserver};
use crate::domain::{StartTime, TripId};
use crate::gtfs::DataError;
use crate::trips::trip_details;

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route(
            "/public_transport/city/:city/closest_departures",
            get(closest_departures),
        )
        .route("/public_transport/city/:city/trip/:trip_id", get(trip))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

async fn index(State(state): State<AppState>) -> String {
    format!("Welcome to the Public Transport API for {}!", state.city)
}

/// Departures near the origin on trips heading toward the destination.
async fn closest_departures(
    State(state): State<AppState>,
    Path(city): Path<String>,
    OriginalUri(uri): OriginalUri,
    Query(params): Query<ClosestDeparturesParams>,
) -> Result<Json<ClosestDeparturesResponse>, AppError> {
    check_city(&state, &city)?;

    let request = ClosestDeparturesRequest::from(params);
    let store = state.store.clone();
    let config = state.config.clone();
    let outcome = run_blocking(state.timeout, move || {
        DepartureFinder::new(store.as_ref(), config.as_ref(), &TracingObserver)
            .handle(&request)
    })
    .await??;

    debug!(%city, returned = outcome.departures.len(), "closest departures served");

    Ok(Json(ClosestDeparturesResponse {
        metadata: Metadata {
            self_link: uri.to_string(),
            city,
            query_parameters: DepartureQueryParameters::from(&outcome.query),
        },
        departures: outcome.departures.into_iter().map(DepartureDto::from).collect(),
    }))
}

/// All calls of one trip.
async fn trip(
    State(state): State<AppState>,
    Path((city, trip_id)): Path<(String, String)>,
    OriginalUri(uri): OriginalUri,
) -> Result<Json<TripDetailsResponse>, AppError> {
    check_city(&state, &city)?;

    let date = fallback_date(&state)?;
    let store = state.store.clone();
    let id = TripId::new(trip_id.clone());
    let details = run_blocking(state.timeout, move || {
        trip_details(store.as_ref(), &id, &date)
    })
    .await??
    .ok_or_else(|| AppError::NotFound {
        message: format!("Trip '{trip_id}' not found for city: {city}"),
    })?;

    Ok(Json(TripDetailsResponse {
        metadata: Metadata {
            self_link: uri.path().to_string(),
            city,
            query_parameters: TripQueryParameters { trip_id },
        },
        trip_details: details.into(),
    }))
}

fn check_city(state: &AppState, city: &str) -> Result<(), AppError> {
    if city == &*state.city {
        Ok(())
    } else {
        Err(AppError::NotFound {
            message: format!("City '{city}' is not supported."),
        })
    }
}

/// Date onto which trip-detail times are stitched.
fn fallback_date(state: &AppState) -> Result<StartTime, AppError> {
    StartTime::parse(&state.config.fallback_start_time).map_err(|e| AppError::Internal {
        message: format!("bad fallback start time: {e}"),
    })
}

/// Run dataset work off the async runtime, bounded by `timeout`.
///
/// On timeout the blocking task is left to finish on its own; its read
/// handle is released when it does.
async fn run_blocking<T, F>(timeout: Duration, work: F) -> Result<T, AppError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    match tokio::time::timeout(timeout, tokio::task::spawn_blocking(work)).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(AppError::Internal {
            message: format!("query task failed: {e}"),
        }),
        Err(_) => Err(AppError::Unavailable {
            message: format!("query exceeded {}ms deadline", timeout.as_millis()),
        }),
    }
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Internal { message: String },
    Unavailable { message: String },
}

impl From<DataError> for AppError {
    fn from(e: DataError) -> Self {
        AppError::Internal {
            message: e.to_string(),
        }
    }
}

impl From<QueryError> for AppError {
    fn from(e: QueryError) -> Self {
        match e {
            QueryError::DataAccess(inner) => inner.into(),
            _ => AppError::BadRequest {
                message: e.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
            AppError::Unavailable { message } => (StatusCode::SERVICE_UNAVAILABLE, message),
        };

        if status.is_server_error() {
            warn!(%status, %message, "request failed");
        } else {
            debug!(%status, %message, "request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
