use std::collections::BTreeMap;

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::stats::{CountryCount, DisasterStats, MonthCount, RecentDisaster, TypeCount};
use crate::presentation::AppState;
use crate::presentation::http::app_error::AppResult;

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct DisasterStatsDto {
    pub(crate) total: u64,
    pub(crate) active_count: u64,
    pub(crate) recent_disaster: RecentDisasterDto,
    pub(crate) common_type: String,
    pub(crate) common_count: u64,
    pub(crate) top_countries: Vec<CountryCountDto>,
    pub(crate) status_list: BTreeMap<String, u64>,
    pub(crate) disasters_overtime: Vec<MonthCountDto>,
    pub(crate) type_list: Vec<TypeCountDto>,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct RecentDisasterDto {
    pub(crate) id: Option<String>,
    pub(crate) name: String,
    #[serde(rename = "type")]
    pub(crate) category: String,
    pub(crate) country: String,
    pub(crate) status: String,
    pub(crate) date: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct CountryCountDto {
    pub(crate) code: String,
    pub(crate) name: String,
    pub(crate) count: u64,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct MonthCountDto {
    pub(crate) month: String,
    pub(crate) count: u64,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct TypeCountDto {
    pub(crate) name: String,
    pub(crate) count: u64,
}

impl From<DisasterStats> for DisasterStatsDto {
    fn from(stats: DisasterStats) -> Self {
        Self {
            total: stats.total,
            active_count: stats.active_count,
            recent_disaster: stats.recent_disaster.into(),
            common_type: stats.common_type,
            common_count: stats.common_count,
            top_countries: stats.top_countries.into_iter().map(Into::into).collect(),
            status_list: stats.status_list,
            disasters_overtime: stats
                .disasters_overtime
                .into_iter()
                .map(Into::into)
                .collect(),
            type_list: stats.type_list.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<RecentDisaster> for RecentDisasterDto {
    fn from(recent: RecentDisaster) -> Self {
        Self {
            id: recent.id,
            name: recent.name,
            category: recent.category,
            country: recent.country,
            status: recent.status,
            date: recent.date,
        }
    }
}

impl From<CountryCount> for CountryCountDto {
    fn from(entry: CountryCount) -> Self {
        Self {
            code: entry.code,
            name: entry.name,
            count: entry.count,
        }
    }
}

impl From<MonthCount> for MonthCountDto {
    fn from(entry: MonthCount) -> Self {
        Self {
            month: entry.month,
            count: entry.count,
        }
    }
}

impl From<TypeCount> for TypeCountDto {
    fn from(entry: TypeCount) -> Self {
        Self {
            name: entry.name,
            count: entry.count,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/disasters",
    tag = "disasters",
    responses(
        (status = 200, description = "ReliefWeb response, passed through unchanged"),
        (status = 502, description = "ReliefWeb unavailable")
    )
)]
pub(crate) async fn list_disasters(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    let body = state.disaster_service.search(params).await?;
    Ok((StatusCode::OK, Json(body)))
}

#[utoipa::path(
    get,
    path = "/api/stats",
    tag = "disasters",
    responses(
        (status = 200, description = "Aggregated stats over the recent window", body = DisasterStatsDto)
    )
)]
pub(crate) async fn get_stats(State(state): State<AppState>) -> Json<DisasterStatsDto> {
    Json(state.disaster_service.stats().await.into())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::DisasterStatsDto;
    use crate::domain::stats::compute_stats;

    #[test]
    fn empty_stats_serialize_with_expected_shape() {
        let dto = DisasterStatsDto::from(compute_stats(&[]));
        let value = serde_json::to_value(dto).expect("stats must serialize");

        assert_eq!(
            value,
            json!({
                "total": 0,
                "active_count": 0,
                "recent_disaster": {
                    "id": null,
                    "name": "No recent disasters",
                    "type": "N/A",
                    "country": "N/A",
                    "status": "N/A",
                    "date": "N/A"
                },
                "common_type": "N/A",
                "common_count": 0,
                "top_countries": [],
                "status_list": {},
                "disasters_overtime": [],
                "type_list": []
            })
        );
    }
}
