/// One upstream disaster record, reduced to the projected fields.
///
/// Every field is optional: upstream records are not guaranteed to carry the
/// full projection and a missing key only excludes the record from the
/// statistics that need it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct DisasterRecord {
    pub(crate) id: Option<String>,
    pub(crate) name: Option<String>,
    pub(crate) category: Option<String>,
    pub(crate) country: Option<Country>,
    pub(crate) status: Option<String>,
    /// Raw creation timestamp, `YYYY-MM-DDThh:mm:ss+00:00`.
    pub(crate) created: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Country {
    pub(crate) code: Option<String>,
    pub(crate) name: Option<String>,
}

/// The most recent slice of upstream records, newest first.
#[derive(Debug, Clone, Default)]
pub(crate) struct DisasterWindow {
    pub(crate) records: Vec<DisasterRecord>,
    /// Total reported by upstream for the whole collection.
    pub(crate) total_count: u64,
}

impl DisasterWindow {
    pub(crate) fn empty() -> Self {
        Self::default()
    }
}
