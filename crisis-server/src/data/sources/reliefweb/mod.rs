//! Reqwest-backed ReliefWeb adapter.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::data::disaster_source::{DisasterSource, UpstreamError};
use crate::domain::disaster::{DisasterRecord, DisasterWindow};

mod dto;

use dto::{DisasterItemDto, FieldSelectionDto, ListRequestDto, ListResponseDto};

const APPNAME_PARAM: &str = "appname";

const PROJECTED_FIELDS: &[&str] = &[
    "id",
    "name",
    "type.name",
    "country.iso3",
    "country.name",
    "primary_country.iso3",
    "primary_country.name",
    "status",
    "date.created",
];

const RECENT_FIRST: &[&str] = &["date.created:desc"];

#[derive(Debug, Clone)]
pub(crate) struct ReliefWebSource {
    client: Client,
    base_url: String,
    appname: String,
}

impl ReliefWebSource {
    pub(crate) fn new(
        base_url: impl Into<String>,
        appname: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5).min(timeout))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            appname: appname.into(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/disasters", self.base_url.trim_end_matches('/'))
    }

    /// Caller-supplied `appname` is replaced by the configured one.
    fn passthrough_params(&self, params: Vec<(String, String)>) -> Vec<(String, String)> {
        let mut params: Vec<_> = params
            .into_iter()
            .filter(|(key, _)| key != APPNAME_PARAM)
            .collect();
        params.push((APPNAME_PARAM.to_string(), self.appname.clone()));
        params
    }
}

#[async_trait]
impl DisasterSource for ReliefWebSource {
    async fn fetch_recent(&self, limit: u32) -> Result<DisasterWindow, UpstreamError> {
        let body = ListRequestDto {
            limit,
            fields: FieldSelectionDto {
                include: PROJECTED_FIELDS,
            },
            sort: RECENT_FIRST,
        };

        let response = self
            .client
            .post(self.endpoint())
            .query(&[(APPNAME_PARAM, self.appname.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status(status.as_u16()));
        }

        let bytes = response.bytes().await.map_err(map_transport_error)?;
        parse_window(&bytes)
    }

    async fn search_raw(
        &self,
        params: Vec<(String, String)>,
    ) -> Result<serde_json::Value, UpstreamError> {
        let params = self.passthrough_params(params);

        let response = self
            .client
            .get(self.endpoint())
            .query(&params)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status(status.as_u16()));
        }

        response
            .json::<serde_json::Value>()
            .await
            .map_err(|err| UpstreamError::Decode(err.to_string()))
    }
}

fn parse_window(body: &[u8]) -> Result<DisasterWindow, UpstreamError> {
    let decoded: ListResponseDto =
        serde_json::from_slice(body).map_err(|err| UpstreamError::Decode(err.to_string()))?;

    let records: Vec<DisasterRecord> = decoded
        .data
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<DisasterItemDto>(item) {
            Ok(item) => Some(item.into_domain()),
            Err(err) => {
                debug!(error = %err, "skipping undecodable ReliefWeb record");
                None
            }
        })
        .collect();

    Ok(DisasterWindow {
        records,
        total_count: decoded.total_count,
    })
}

fn map_transport_error(err: reqwest::Error) -> UpstreamError {
    if let Some(status) = err.status() {
        return UpstreamError::Status(status.as_u16());
    }
    UpstreamError::Transport(err.to_string())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{ReliefWebSource, parse_window};
    use crate::data::disaster_source::UpstreamError;
    use crate::domain::disaster::Country;

    fn source(base_url: &str) -> ReliefWebSource {
        ReliefWebSource::new(base_url, "CrisisMap", Duration::from_secs(15))
            .expect("client must build")
    }

    #[test]
    fn endpoint_normalizes_slashes() {
        let source = source("https://api.reliefweb.int/v1/");
        assert_eq!(source.endpoint(), "https://api.reliefweb.int/v1/disasters");
    }

    #[test]
    fn passthrough_params_override_appname() {
        let source = source("https://api.reliefweb.int/v1");
        let params = source.passthrough_params(vec![
            ("limit".to_string(), "5".to_string()),
            ("appname".to_string(), "spoofed".to_string()),
        ]);

        assert_eq!(
            params,
            vec![
                ("limit".to_string(), "5".to_string()),
                ("appname".to_string(), "CrisisMap".to_string()),
            ]
        );
    }

    #[test]
    fn parse_window_maps_projected_fields() {
        let body = br#"{
            "totalCount": 3412,
            "data": [{
                "id": "52144",
                "fields": {
                    "name": "Philippines: Floods - Sep 2024",
                    "type": [{"name": "Flood"}, {"name": "Flash Flood"}],
                    "country": [{"iso3": "phl", "name": "Philippines"}],
                    "status": "alert",
                    "date": {"created": "2024-09-02T00:00:00+00:00"}
                }
            }]
        }"#;

        let window = parse_window(body).expect("payload must decode");
        assert_eq!(window.total_count, 3412);
        assert_eq!(window.records.len(), 1);

        let record = &window.records[0];
        assert_eq!(record.id.as_deref(), Some("52144"));
        assert_eq!(record.category.as_deref(), Some("Flood"));
        assert_eq!(
            record.country,
            Some(Country {
                code: Some("phl".to_string()),
                name: Some("Philippines".to_string()),
            })
        );
        assert_eq!(record.status.as_deref(), Some("alert"));
        assert_eq!(
            record.created.as_deref(),
            Some("2024-09-02T00:00:00+00:00")
        );
    }

    #[test]
    fn parse_window_prefers_primary_country() {
        let body = br#"{"data": [{"id": 7, "fields": {
            "country": [{"iso3": "tur", "name": "Turkey"}, {"iso3": "syr", "name": "Syria"}],
            "primary_country": {"iso3": "syr", "name": "Syria"}
        }}]}"#;

        let window = parse_window(body).expect("payload must decode");
        let record = &window.records[0];
        assert_eq!(record.id.as_deref(), Some("7"));
        assert_eq!(
            record.country.as_ref().and_then(|c| c.code.as_deref()),
            Some("syr")
        );
        assert_eq!(window.total_count, 0);
    }

    #[test]
    fn parse_window_skips_primary_country_without_code() {
        let body = br#"{"data": [
            {"id": "1", "fields": {
                "country": [{"iso3": "hti", "name": "Haiti"}],
                "primary_country": {"name": "Haiti"}
            }},
            {"id": "2", "fields": {
                "primary_country": {"iso3": "", "name": "Unknown region"}
            }}
        ]}"#;

        let window = parse_window(body).expect("payload must decode");
        assert_eq!(
            window.records[0].country,
            Some(Country {
                code: Some("hti".to_string()),
                name: Some("Haiti".to_string()),
            })
        );
        // без списка стран остаётся primary_country, пусть и без кода
        assert_eq!(
            window.records[1]
                .country
                .as_ref()
                .and_then(|c| c.name.as_deref()),
            Some("Unknown region")
        );
    }

    #[test]
    fn parse_window_tolerates_missing_and_malformed_records() {
        let body = br#"{"totalCount": 2, "data": [
            {"id": "1"},
            {"id": "2", "fields": {"type": "not-a-list"}},
            {"id": "3", "fields": {"status": "past"}}
        ]}"#;

        let window = parse_window(body).expect("payload must decode");
        let ids: Vec<_> = window
            .records
            .iter()
            .map(|r| r.id.as_deref().unwrap_or_default())
            .collect();
        assert_eq!(ids, vec!["1", "3"]);
        assert!(window.records[0].category.is_none());
    }

    #[test]
    fn parse_window_rejects_non_json_body() {
        let err = parse_window(b"<html>maintenance</html>").expect_err("must fail");
        assert!(matches!(err, UpstreamError::Decode(_)));
    }
}
