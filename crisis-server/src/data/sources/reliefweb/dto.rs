//! Transport DTOs for the ReliefWeb `disasters` endpoint.

use serde::{Deserialize, Serialize};

use crate::domain::disaster::{Country, DisasterRecord};

#[derive(Debug, Serialize)]
pub(super) struct ListRequestDto<'a> {
    pub(super) limit: u32,
    pub(super) fields: FieldSelectionDto<'a>,
    pub(super) sort: &'a [&'a str],
}

#[derive(Debug, Serialize)]
pub(super) struct FieldSelectionDto<'a> {
    pub(super) include: &'a [&'a str],
}

#[derive(Debug, Deserialize)]
pub(super) struct ListResponseDto {
    #[serde(rename = "totalCount", default)]
    pub(super) total_count: u64,
    /// Kept raw so one malformed element does not sink the whole window.
    #[serde(default)]
    pub(super) data: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub(super) struct DisasterItemDto {
    #[serde(default)]
    id: Option<ItemIdDto>,
    #[serde(default)]
    fields: DisasterFieldsDto,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ItemIdDto {
    Text(String),
    Number(i64),
}

#[derive(Debug, Default, Deserialize)]
struct DisasterFieldsDto {
    name: Option<String>,
    #[serde(rename = "type", default)]
    types: Vec<NamedDto>,
    #[serde(default)]
    country: Vec<CountryDto>,
    primary_country: Option<CountryDto>,
    status: Option<String>,
    date: Option<DateDto>,
}

#[derive(Debug, Deserialize)]
struct NamedDto {
    name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct CountryDto {
    iso3: Option<String>,
    name: Option<String>,
}

impl CountryDto {
    fn has_code(&self) -> bool {
        self.iso3
            .as_deref()
            .is_some_and(|code| !code.trim().is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct DateDto {
    created: Option<String>,
}

impl DisasterItemDto {
    pub(super) fn into_domain(self) -> DisasterRecord {
        let fields = self.fields;
        let id = self.id.map(|id| match id {
            ItemIdDto::Text(text) => text,
            ItemIdDto::Number(number) => number.to_string(),
        });
        // primary_country точнее, но только если у него есть код
        let first_listed = fields.country.into_iter().next();
        let country = match fields.primary_country {
            Some(primary) if primary.has_code() => Some(primary),
            primary => first_listed.or(primary),
        }
        .map(|country| Country {
            code: country.iso3,
            name: country.name,
        });

        DisasterRecord {
            id,
            name: fields.name,
            category: fields.types.into_iter().next().and_then(|t| t.name),
            country,
            status: fields.status,
            created: fields.date.and_then(|date| date.created),
        }
    }
}
