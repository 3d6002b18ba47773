use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use crate::movie::MovieSummary;

/// A movie saved to the watchlist.
///
/// Serializes flat: the movie's own fields plus `dateAdded`, which is set once
/// on insertion and never changed afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WatchlistItem {
    #[serde(flatten)]
    pub movie: MovieSummary,
    #[serde(rename = "dateAdded")]
    pub date_added: DateAdded,
}

impl WatchlistItem {
    pub fn new(movie: MovieSummary, date_added: impl Into<DateAdded>) -> Self {
        Self {
            movie,
            date_added: date_added.into(),
        }
    }

    pub fn id(&self) -> u64 {
        self.movie.id
    }

    pub fn title(&self) -> &str {
        &self.movie.title
    }
}

/// When an item was saved.
///
/// Holds the stored text as-is so a timestamp that cannot be parsed is
/// written back unchanged. Accepts RFC 3339, a bare `YYYY-MM-DD` date and a
/// date-time without offset (taken as UTC).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateAdded {
    raw: String,
    parsed: Option<DateTime<Utc>>,
}

impl DateAdded {
    pub fn parse(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let parsed = parse_timestamp(&raw);
        Self { raw, parsed }
    }

    /// `None` when the stored text is not a recognizable timestamp
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.parsed
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// `YYYY-MM-DD`, or the stored text if it could not be parsed
    pub fn display_date(&self) -> String {
        match self.parsed {
            Some(at) => at.format("%Y-%m-%d").to_string(),
            None => self.raw.clone(),
        }
    }
}

impl From<DateTime<Utc>> for DateAdded {
    fn from(at: DateTime<Utc>) -> Self {
        Self {
            raw: at.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            parsed: Some(at),
        }
    }
}

impl Serialize for DateAdded {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for DateAdded {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(DateAdded::parse)
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Some(at.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(Utc.from_utc_datetime(&naive));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_flat_with_date_added() {
        let movie = MovieSummary {
            id: 603,
            title: "The Matrix".to_string(),
            ..MovieSummary::default()
        };
        let added = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let value = serde_json::to_value(WatchlistItem::new(movie, added)).unwrap();

        assert_eq!(value["id"], 603);
        assert_eq!(value["title"], "The Matrix");
        assert_eq!(value["dateAdded"], "2024-03-01T12:00:00Z");
        assert!(value.get("movie").is_none());
    }

    #[test]
    fn test_date_added_accepts_common_forms() {
        let midnight = Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap();
        assert_eq!(DateAdded::parse("2024-01-15T00:00:00.000Z").timestamp(), Some(midnight));
        assert_eq!(DateAdded::parse("2024-01-15T01:00:00+01:00").timestamp(), Some(midnight));
        assert_eq!(DateAdded::parse("2024-01-15T00:00:00").timestamp(), Some(midnight));
        assert_eq!(DateAdded::parse("2024-01-15").timestamp(), Some(midnight));
        assert_eq!(DateAdded::parse("2024-01-15").display_date(), "2024-01-15");
    }

    #[test]
    fn test_unparsable_date_added_is_written_back_verbatim() {
        let item: WatchlistItem =
            serde_json::from_str(r#"{"id": 1, "title": "One", "dateAdded": "last tuesday"}"#).unwrap();
        assert_eq!(item.date_added.timestamp(), None);
        assert_eq!(item.date_added.display_date(), "last tuesday");

        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["dateAdded"], "last tuesday");
    }
}
