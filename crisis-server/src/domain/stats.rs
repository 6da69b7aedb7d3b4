use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

use super::disaster::{Country, DisasterRecord};

pub(crate) const ACTIVE_STATUS: &str = "alert";
pub(crate) const UNKNOWN_STATUS: &str = "Unknown";
pub(crate) const NOT_AVAILABLE: &str = "N/A";
pub(crate) const NO_RECENT_DISASTER: &str = "No recent disasters";
pub(crate) const TOP_COUNTRIES_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DisasterStats {
    pub(crate) total: u64,
    pub(crate) active_count: u64,
    pub(crate) recent_disaster: RecentDisaster,
    pub(crate) common_type: String,
    pub(crate) common_count: u64,
    pub(crate) top_countries: Vec<CountryCount>,
    pub(crate) status_list: BTreeMap<String, u64>,
    pub(crate) disasters_overtime: Vec<MonthCount>,
    pub(crate) type_list: Vec<TypeCount>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RecentDisaster {
    pub(crate) id: Option<String>,
    pub(crate) name: String,
    pub(crate) category: String,
    pub(crate) country: String,
    pub(crate) status: String,
    pub(crate) date: String,
}

impl RecentDisaster {
    pub(crate) fn placeholder() -> Self {
        Self {
            id: None,
            name: NO_RECENT_DISASTER.to_string(),
            category: NOT_AVAILABLE.to_string(),
            country: NOT_AVAILABLE.to_string(),
            status: NOT_AVAILABLE.to_string(),
            date: NOT_AVAILABLE.to_string(),
        }
    }

    fn from_record(record: &DisasterRecord) -> Self {
        let country = record
            .country
            .as_ref()
            .and_then(|country| non_blank(&country.name).or_else(|| non_blank(&country.code)));

        Self {
            id: record.id.clone(),
            name: or_not_available(non_blank(&record.name)),
            category: or_not_available(non_blank(&record.category)),
            country: or_not_available(country),
            status: or_not_available(non_blank(&record.status)),
            date: or_not_available(non_blank(&record.created)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CountryCount {
    pub(crate) code: String,
    pub(crate) name: String,
    pub(crate) count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MonthCount {
    pub(crate) month: String,
    pub(crate) count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TypeCount {
    pub(crate) name: String,
    pub(crate) count: u64,
}

/// Reduces a window of records (newest first) into summary statistics.
///
/// Counts are derived from the window itself, so every figure in the snapshot
/// describes the same set of records.
pub(crate) fn compute_stats(records: &[DisasterRecord]) -> DisasterStats {
    let mut types = FrequencyTable::new();
    let mut countries = FrequencyTable::new();
    let mut statuses: BTreeMap<String, u64> = BTreeMap::new();
    let mut months: BTreeMap<String, u64> = BTreeMap::new();
    let mut active_count = 0;

    for record in records {
        if let Some(category) = non_blank(&record.category) {
            types.add(category);
        }

        if let Some(key) = record.country.as_ref().and_then(country_key) {
            countries.add(key);
        }

        let status = non_blank(&record.status).unwrap_or_else(|| UNKNOWN_STATUS.to_string());
        if status.eq_ignore_ascii_case(ACTIVE_STATUS) {
            active_count += 1;
        }
        *statuses.entry(status).or_insert(0) += 1;

        if let Some(month) = record.created.as_deref().and_then(month_bucket) {
            *months.entry(month).or_insert(0) += 1;
        }
    }

    let (common_type, common_count) = types
        .most_common()
        .map(|(name, count)| (name.clone(), count))
        .unwrap_or_else(|| (NOT_AVAILABLE.to_string(), 0));

    let top_countries = countries
        .into_ranked()
        .into_iter()
        .take(TOP_COUNTRIES_LIMIT)
        .map(|((code, name), count)| CountryCount { code, name, count })
        .collect();

    let recent_disaster = records
        .first()
        .map(RecentDisaster::from_record)
        .unwrap_or_else(RecentDisaster::placeholder);

    DisasterStats {
        total: records.len() as u64,
        active_count,
        recent_disaster,
        common_type,
        common_count,
        top_countries,
        status_list: statuses,
        disasters_overtime: months
            .into_iter()
            .map(|(month, count)| MonthCount { month, count })
            .collect(),
        type_list: types
            .into_ranked()
            .into_iter()
            .map(|(name, count)| TypeCount { name, count })
            .collect(),
    }
}

/// `YYYY-MM` from the first two hyphen-delimited components of a timestamp.
pub(crate) fn month_bucket(created: &str) -> Option<String> {
    let mut parts = created.trim().split('-');
    let year = parts.next()?;
    let month = parts.next()?;

    if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if month.len() != 2 || !month.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let month_number: u8 = month.parse().ok()?;
    if !(1..=12).contains(&month_number) {
        return None;
    }

    Some(format!("{year}-{month}"))
}

fn country_key(country: &Country) -> Option<(String, String)> {
    let code = non_blank(&country.code)?.to_uppercase();
    let name = non_blank(&country.name).unwrap_or_else(|| code.clone());
    Some((code, name))
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn or_not_available(value: Option<String>) -> String {
    value.unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// Frequency counter that remembers first-seen order for tie-breaking.
struct FrequencyTable<K> {
    entries: Vec<(K, u64)>,
    index: HashMap<K, usize>,
}

impl<K: Eq + Hash + Clone> FrequencyTable<K> {
    fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    fn add(&mut self, key: K) {
        if let Some(entry) = self
            .index
            .get(&key)
            .and_then(|&position| self.entries.get_mut(position))
        {
            entry.1 += 1;
            return;
        }
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push((key, 1));
    }

    fn most_common(&self) -> Option<(&K, u64)> {
        let mut best: Option<(&K, u64)> = None;
        for (key, count) in &self.entries {
            if best.is_none_or(|(_, best_count)| *count > best_count) {
                best = Some((key, *count));
            }
        }
        best
    }

    /// Descending by count; the sort is stable so ties keep first-seen order.
    fn into_ranked(self) -> Vec<(K, u64)> {
        let mut entries = self.entries;
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::{
        Country, DisasterRecord, NOT_AVAILABLE, RecentDisaster, TOP_COUNTRIES_LIMIT,
        UNKNOWN_STATUS, compute_stats, month_bucket,
    };

    fn record(
        category: Option<&str>,
        country: Option<(&str, &str)>,
        status: Option<&str>,
        created: Option<&str>,
    ) -> DisasterRecord {
        DisasterRecord {
            id: Some("1".to_string()),
            name: Some("Event".to_string()),
            category: category.map(str::to_string),
            country: country.map(|(code, name)| Country {
                code: Some(code.to_string()),
                name: Some(name.to_string()),
            }),
            status: status.map(str::to_string),
            created: created.map(str::to_string),
        }
    }

    #[test]
    fn empty_window_yields_placeholders() {
        let stats = compute_stats(&[]);

        assert_eq!(stats.total, 0);
        assert_eq!(stats.active_count, 0);
        assert_eq!(stats.recent_disaster, RecentDisaster::placeholder());
        assert_eq!(stats.common_type, NOT_AVAILABLE);
        assert_eq!(stats.common_count, 0);
        assert!(stats.top_countries.is_empty());
        assert!(stats.status_list.is_empty());
        assert!(stats.disasters_overtime.is_empty());
        assert!(stats.type_list.is_empty());
    }

    #[test]
    fn counts_total_and_alert_records() {
        let records = vec![
            record(Some("Flood"), None, Some("alert"), None),
            record(Some("Flood"), None, Some("current"), None),
            record(Some("Flood"), None, Some("Alert"), None),
            record(Some("Flood"), None, Some("past"), None),
        ];

        let stats = compute_stats(&records);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.active_count, 2);
    }

    #[test]
    fn most_common_type_prefers_first_seen_on_tie() {
        let records = vec![
            record(Some("Earthquake"), None, None, None),
            record(Some("Flood"), None, None, None),
            record(Some("Flood"), None, None, None),
            record(Some("Earthquake"), None, None, None),
            record(None, None, None, None),
        ];

        let stats = compute_stats(&records);
        assert_eq!(stats.common_type, "Earthquake");
        assert_eq!(stats.common_count, 2);

        let names: Vec<_> = stats.type_list.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Earthquake", "Flood"]);
    }

    #[test]
    fn type_list_is_sorted_by_count() {
        let records = vec![
            record(Some("Epidemic"), None, None, None),
            record(Some("Flood"), None, None, None),
            record(Some("Flood"), None, None, None),
        ];

        let stats = compute_stats(&records);
        assert_eq!(stats.type_list[0].name, "Flood");
        assert_eq!(stats.type_list[0].count, 2);
        assert_eq!(stats.type_list[1].name, "Epidemic");
        assert_eq!(stats.common_type, "Flood");
    }

    #[test]
    fn top_countries_are_truncated_and_sorted() {
        let mut records = Vec::new();
        for i in 0..15u64 {
            let code = format!("c{i:02}");
            for _ in 0..=(i % 4) {
                records.push(record(None, Some((&code, "Somewhere")), None, None));
            }
        }
        records.push(record(None, None, None, None));

        let stats = compute_stats(&records);
        assert_eq!(stats.top_countries.len(), TOP_COUNTRIES_LIMIT);
        assert!(
            stats
                .top_countries
                .windows(2)
                .all(|pair| pair[0].count >= pair[1].count)
        );
        assert_eq!(stats.top_countries[0].code, "C03");
        assert_eq!(stats.top_countries[0].count, 4);
    }

    #[test]
    fn country_code_is_uppercased_and_name_defaults_to_code() {
        let records = vec![DisasterRecord {
            country: Some(Country {
                code: Some("phl".to_string()),
                name: None,
            }),
            ..Default::default()
        }];

        let stats = compute_stats(&records);
        assert_eq!(stats.top_countries.len(), 1);
        assert_eq!(stats.top_countries[0].code, "PHL");
        assert_eq!(stats.top_countries[0].name, "PHL");
    }

    #[test]
    fn missing_status_goes_to_unknown_bucket() {
        let records = vec![
            record(None, None, Some("past"), None),
            record(None, None, None, None),
            record(None, None, Some("  "), None),
        ];

        let stats = compute_stats(&records);
        assert_eq!(stats.status_list.get("past"), Some(&1));
        assert_eq!(stats.status_list.get(UNKNOWN_STATUS), Some(&2));
    }

    #[test]
    fn monthly_series_is_sorted_and_skips_malformed_dates() {
        let records = vec![
            record(None, None, None, Some("2024-03-15T00:00:00+00:00")),
            record(None, None, None, Some("2023-12-01T00:00:00+00:00")),
            record(None, None, None, Some("2024-03-02T10:00:00+00:00")),
            record(None, None, None, Some("not-a-date")),
            record(None, None, None, Some("2024")),
            record(None, None, None, None),
        ];

        let stats = compute_stats(&records);
        let months: Vec<_> = stats
            .disasters_overtime
            .iter()
            .map(|m| (m.month.as_str(), m.count))
            .collect();
        assert_eq!(months, vec![("2023-12", 1), ("2024-03", 2)]);

        let summed: u64 = stats.disasters_overtime.iter().map(|m| m.count).sum();
        assert_eq!(summed, 3);
    }

    #[test]
    fn month_bucket_rules() {
        assert_eq!(month_bucket("2024-07-01").as_deref(), Some("2024-07"));
        assert_eq!(month_bucket("2024-07").as_deref(), Some("2024-07"));
        assert_eq!(month_bucket("2024-13-01"), None);
        assert_eq!(month_bucket("24-07-01"), None);
        assert_eq!(month_bucket("2024-7-01"), None);
        assert_eq!(month_bucket(""), None);
    }

    #[test]
    fn recent_disaster_is_first_record_with_defaults() {
        let records = vec![
            DisasterRecord {
                id: Some("52001".to_string()),
                name: Some("Tropical Cyclone Test - Sep 2024".to_string()),
                category: Some("Tropical Cyclone".to_string()),
                country: Some(Country {
                    code: Some("phl".to_string()),
                    name: Some("Philippines".to_string()),
                }),
                status: None,
                created: Some("2024-09-01T00:00:00+00:00".to_string()),
            },
            record(Some("Flood"), None, Some("past"), Some("2024-08-01")),
        ];

        let stats = compute_stats(&records);
        let recent = stats.recent_disaster;
        assert_eq!(recent.id.as_deref(), Some("52001"));
        assert_eq!(recent.category, "Tropical Cyclone");
        assert_eq!(recent.country, "Philippines");
        assert_eq!(recent.status, NOT_AVAILABLE);
        assert_eq!(recent.date, "2024-09-01T00:00:00+00:00");
    }
}
