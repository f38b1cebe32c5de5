use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use usage_client::classify::LookupKeyError;

use crate::{
    accessor::DataAccessor,
    events::{self, DashboardState, DateBounds, UiEvent},
    view::{self, DashboardView},
};

#[derive(Clone)]
pub struct AppState {
    accessor: DataAccessor,
    home_ids: Arc<[String]>,
    min_date: Date,
}

impl AppState {
    pub fn new(accessor: DataAccessor, home_ids: Vec<String>, min_date: Date) -> Self {
        Self {
            accessor,
            home_ids: home_ids.into(),
            min_date,
        }
    }

    fn bounds(&self) -> DateBounds {
        DateBounds {
            min: self.min_date,
            max: today(),
        }
    }
}

fn today() -> Date {
    OffsetDateTime::now_utc().date()
}

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("classification failed: {0}")]
    Classification(#[from] LookupKeyError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "dashboard request failed");
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct HomesResponse {
    pub home_ids: Vec<String>,
    pub default: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    pub date: Option<Date>,
    pub home_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EventRequest {
    pub state: DashboardState,
    pub event: UiEvent,
}

#[derive(Debug, Serialize)]
pub struct EventResponse {
    pub state: DashboardState,
    /// Absent when the event only changed layout.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view: Option<DashboardView>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/homes", get(list_homes))
        .route("/api/dashboard", get(dashboard))
        .route("/api/session", get(session))
        .route("/api/events", post(handle_event))
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

pub async fn list_homes(State(app): State<AppState>) -> Json<HomesResponse> {
    Json(HomesResponse {
        home_ids: app.home_ids.to_vec(),
        default: app.home_ids.first().cloned(),
    })
}

pub async fn dashboard(
    State(app): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<DashboardView>, ApiError> {
    let Some(date) = query.date else {
        return Ok(Json(DashboardView::empty()));
    };
    let view = view::render(&app.accessor, date, query.home_id.as_deref()).await?;
    Ok(Json(view))
}

pub async fn session(State(app): State<AppState>) -> Result<Json<EventResponse>, ApiError> {
    let state = DashboardState::initial(today(), &app.home_ids, &app.bounds());
    let view = view::render(&app.accessor, state.date, state.home_id.as_deref()).await?;
    Ok(Json(EventResponse {
        state,
        view: Some(view),
    }))
}

pub async fn handle_event(
    State(app): State<AppState>,
    Json(req): Json<EventRequest>,
) -> Result<Json<EventResponse>, ApiError> {
    let outcome = events::dispatch(req.state, req.event, &app.bounds());

    let view = if outcome.refresh {
        let state = &outcome.state;
        Some(view::render(&app.accessor, state.date, state.home_id.as_deref()).await?)
    } else {
        None
    };

    Ok(Json(EventResponse {
        state: outcome.state,
        view,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryMetricStore;
    use time::macros::date;
    use usage_client::domain::{ColorTag, DailyMetricRecord};

    fn record(date: Date, active_score: f64) -> DailyMetricRecord {
        DailyMetricRecord {
            date,
            home_id: "home-1".to_string(),
            water_consumption: vec![2.0, 3.0],
            usage: vec![1.0, 0.0],
            four_week_usage_norm: vec![30.0, 70.0],
            active_score,
            correlation_coefficient: 0.85,
            low_norm: 10.0,
            norm_active_score: 50.0,
            high_norm: 90.0,
        }
    }

    async fn app_state(records: Vec<DailyMetricRecord>) -> AppState {
        let store = Arc::new(InMemoryMetricStore::new());
        for r in records {
            store.insert(r).await;
        }
        let accessor = DataAccessor::new(store);
        let home_ids = accessor.home_ids().await.unwrap();
        AppState::new(accessor, home_ids, date!(2020 - 01 - 01))
    }

    #[tokio::test]
    async fn lists_homes_with_first_as_default() {
        let app = app_state(vec![record(date!(2024 - 07 - 01), 70.0)]).await;
        let Json(homes) = list_homes(State(app)).await;
        assert_eq!(homes.home_ids, vec!["home-1".to_string()]);
        assert_eq!(homes.default.as_deref(), Some("home-1"));
    }

    #[tokio::test]
    async fn dashboard_renders_stored_day() {
        let app = app_state(vec![record(date!(2024 - 07 - 01), 70.0)]).await;
        let query = DashboardQuery {
            date: Some(date!(2024 - 07 - 01)),
            home_id: Some("home-1".to_string()),
        };

        let Json(view) = dashboard(State(app), Query(query)).await.unwrap();
        let status = view.status.unwrap();
        assert_eq!(status.text, "Active");
        assert_eq!(status.color, ColorTag::Blue);
    }

    #[tokio::test]
    async fn dashboard_without_data_is_empty() {
        let app = app_state(vec![record(date!(2024 - 07 - 01), 70.0)]).await;
        let query = DashboardQuery {
            date: Some(date!(2024 - 07 - 02)),
            home_id: Some("home-1".to_string()),
        };
        let Json(view) = dashboard(State(app.clone()), Query(query)).await.unwrap();
        assert!(view.is_empty());

        let query = DashboardQuery {
            date: None,
            home_id: Some("home-1".to_string()),
        };
        let Json(view) = dashboard(State(app), Query(query)).await.unwrap();
        assert!(view.is_empty());
    }

    #[tokio::test]
    async fn unknown_level_returns_server_error() {
        let app = app_state(vec![record(date!(2024 - 07 - 01), f64::NAN)]).await;
        let query = DashboardQuery {
            date: Some(date!(2024 - 07 - 01)),
            home_id: Some("home-1".to_string()),
        };

        let err = dashboard(State(app), Query(query)).await.unwrap_err();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn previous_day_event_rerenders() {
        let app = app_state(vec![
            record(date!(2024 - 07 - 01), 70.0),
            record(date!(2024 - 06 - 30), 5.0),
        ])
        .await;
        let req = EventRequest {
            state: DashboardState {
                date: date!(2024 - 07 - 01),
                home_id: Some("home-1".to_string()),
                sidebar_open: true,
                content_width: 9,
            },
            event: UiEvent::PreviousDay,
        };

        let Json(resp) = handle_event(State(app), Json(req)).await.unwrap();
        assert_eq!(resp.state.date, date!(2024 - 06 - 30));
        let status = resp.view.unwrap().status.unwrap();
        assert_eq!(status.text, "Attention");
        assert_eq!(status.color, ColorTag::Red);
    }

    #[tokio::test]
    async fn toggle_event_skips_render() {
        let app = app_state(vec![]).await;
        let req = EventRequest {
            state: DashboardState {
                date: date!(2024 - 07 - 01),
                home_id: None,
                sidebar_open: true,
                content_width: 9,
            },
            event: UiEvent::ToggleSidebar,
        };

        let Json(resp) = handle_event(State(app), Json(req)).await.unwrap();
        assert!(!resp.state.sidebar_open);
        assert_eq!(resp.state.content_width, 12);
        assert!(resp.view.is_none());
    }

    #[tokio::test]
    async fn session_starts_on_yesterday() {
        let app = app_state(vec![]).await;
        let Json(resp) = session(State(app)).await.unwrap();
        assert_eq!(Some(resp.state.date), today().previous_day());
        assert!(resp.state.home_id.is_none());
        assert!(resp.view.unwrap().is_empty());
    }
}
