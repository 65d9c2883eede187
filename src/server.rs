use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tracing::{debug, info};

use crate::dashboard::{DashboardView, Theme};
use crate::filter::{FilterOptions, FilterSelection, FilterSpec};
use crate::insights::{self, Insight};
use crate::models::{Dataset, Record};
use crate::stats::Summary;

/// Shared, read-only state. Every request recomputes from the dataset.
#[derive(Clone)]
pub struct AppState {
    dataset: Arc<Dataset>,
}

impl AppState {
    pub fn new(dataset: Dataset) -> Self {
        Self {
            dataset: Arc::new(dataset),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    #[serde(flatten)]
    pub selection: FilterSelection,
    pub theme: Option<String>,
}

type ApiError = (StatusCode, String);

fn bad_request(err: anyhow::Error) -> ApiError {
    (StatusCode::BAD_REQUEST, format!("{err:#}"))
}

fn filter_spec(selection: &FilterSelection) -> Result<FilterSpec, ApiError> {
    let spec = FilterSpec::from_selection(selection).map_err(bad_request)?;
    debug!(filters = %spec.describe(), "filter request");
    Ok(spec)
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/filters", get(filters))
        .route("/api/summary", get(summary))
        .route("/api/insights", get(insights))
        .route("/api/records", get(records))
        .route("/api/dashboard", get(dashboard))
        .with_state(state)
}

pub async fn serve(state: AppState, addr: SocketAddr) -> anyhow::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("listening on http://{addr}");
    axum::serve(listener, app).await?;
    Ok(())
}

async fn health() -> &'static str {
    "ok"
}

async fn filters(State(state): State<AppState>) -> Json<FilterOptions> {
    Json(FilterOptions::from_dataset(&state.dataset))
}

async fn summary(
    State(state): State<AppState>,
    Query(selection): Query<FilterSelection>,
) -> Result<Json<Summary>, ApiError> {
    let spec = filter_spec(&selection)?;
    Ok(Json(Summary::compute(&spec.apply(&state.dataset))))
}

async fn insights(
    State(state): State<AppState>,
    Query(selection): Query<FilterSelection>,
) -> Result<Json<Vec<Insight>>, ApiError> {
    let spec = filter_spec(&selection)?;
    let summary = Summary::compute(&spec.apply(&state.dataset));
    Ok(Json(insights::classify(&summary)))
}

async fn records(
    State(state): State<AppState>,
    Query(selection): Query<FilterSelection>,
) -> Result<Json<Vec<Record>>, ApiError> {
    let spec = filter_spec(&selection)?;
    let rows = spec.apply(&state.dataset).into_iter().cloned().collect();
    Ok(Json(rows))
}

async fn dashboard(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<DashboardView>, ApiError> {
    let spec = filter_spec(&query.selection)?;
    let theme = match query.theme.as_deref() {
        None | Some("") => Theme::default(),
        Some(name) => name.parse().map_err(bad_request)?,
    };
    Ok(Json(DashboardView::build(&state.dataset, &spec, theme)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insights::Tier;
    use crate::models::sample_record;
    use crate::stats::GroupComparison;

    fn state() -> AppState {
        AppState::new(Dataset::new(vec![
            sample_record(25, "Male", 5.0, 3, 9, 20, "Insomnia"),
            sample_record(35, "Female", 8.0, 8, 2, 80, "None"),
            sample_record(45, "Male", 6.5, 6, 6, 40, "None"),
        ]))
    }

    fn male() -> FilterSelection {
        FilterSelection {
            gender: Some("Male".to_string()),
            ..FilterSelection::default()
        }
    }

    #[tokio::test]
    async fn summary_endpoint_filters_rows() {
        let Json(summary) = summary(State(state()), Query(male())).await.unwrap();
        assert_eq!(summary.count, 2);
        assert_eq!(summary.mean_sleep_duration, Some(5.75));
    }

    #[tokio::test]
    async fn insights_endpoint_classifies_subset() {
        let Json(list) = insights(State(state()), Query(male())).await.unwrap();
        assert_eq!(list[0].tier, Tier::Alert);
        assert_eq!(list[1].tier, Tier::Poor);
    }

    #[tokio::test]
    async fn invalid_age_group_is_bad_request() {
        let selection = FilterSelection {
            age_group: Some("teenagers".to_string()),
            ..FilterSelection::default()
        };
        let (status, message) = records(State(state()), Query(selection)).await.unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(message.contains("teenagers"));
    }

    #[tokio::test]
    async fn dashboard_rejects_unknown_theme_and_accepts_dark() {
        let query = DashboardQuery {
            selection: male(),
            theme: Some("sepia".to_string()),
        };
        let err = dashboard(State(state()), Query(query)).await.unwrap_err();
        assert_eq!(err.0, StatusCode::BAD_REQUEST);

        let query = DashboardQuery {
            selection: FilterSelection::default(),
            theme: Some("dark".to_string()),
        };
        let Json(view) = dashboard(State(state()), Query(query)).await.unwrap();
        assert_eq!(view.chart_template, "plotly_dark");
        assert_eq!(view.summary.count, 3);
        assert!(matches!(view.occupations, GroupComparison::SingleVsOverall { .. }));
    }

    #[tokio::test]
    async fn filters_endpoint_lists_options() {
        let Json(options) = filters(State(state())).await;
        assert_eq!(options.gender.len(), 3);
        assert_eq!(options.age_group.len(), 4);
    }

    #[tokio::test]
    async fn health_is_ok() {
        assert_eq!(health().await, "ok");
    }
}
