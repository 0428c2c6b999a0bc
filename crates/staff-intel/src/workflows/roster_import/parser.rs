use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer};
use std::io::Read;

/// One CSV row with trimmed cells, before validation.
#[derive(Debug, Deserialize)]
pub(crate) struct ShiftRow {
    #[serde(rename = "Shift ID", default, deserialize_with = "empty_string_as_none")]
    pub(crate) shift_id: Option<String>,
    #[serde(rename = "Guard ID", default, deserialize_with = "empty_string_as_none")]
    pub(crate) guard_id: Option<String>,
    #[serde(rename = "Site ID", default, deserialize_with = "empty_string_as_none")]
    pub(crate) site_id: Option<String>,
    #[serde(rename = "Date", default, deserialize_with = "empty_string_as_none")]
    pub(crate) date: Option<String>,
    #[serde(rename = "Start", default)]
    pub(crate) start: String,
    #[serde(rename = "End", default)]
    pub(crate) end: String,
    #[serde(rename = "Status", default)]
    pub(crate) status: String,
    #[serde(rename = "Late", default, deserialize_with = "empty_string_as_none")]
    pub(crate) late: Option<String>,
}

impl ShiftRow {
    pub(crate) fn shift_date(&self) -> Option<NaiveDate> {
        self.date.as_deref().and_then(parse_date)
    }

    pub(crate) fn was_late(&self) -> bool {
        matches!(
            self.late
                .as_deref()
                .map(|value| value.to_ascii_lowercase())
                .as_deref(),
            Some("true" | "yes" | "y" | "1")
        )
    }
}

pub(crate) fn parse_rows<R: Read>(reader: R) -> Result<Vec<ShiftRow>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    csv_reader.deserialize::<ShiftRow>().collect()
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

pub(crate) fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }

    DateTime::parse_from_rfc3339(trimmed)
        .ok()
        .map(|dt| dt.naive_utc().date())
}
