use serde::{Deserialize, Deserializer, Serializer};
use time::{
    OffsetDateTime, PrimitiveDateTime,
    format_description::{BorrowedFormatItem, well_known::Rfc3339},
    macros::format_description,
};

/// Serde helpers for `OffsetDateTime` as used by the repository API.
///
/// Input format: ISO 8601 / RFC 3339 (e.g. `2024-01-02T10:00:00Z`), with a
/// tolerant fallback for `YYYY-mm-dd HH:MM:SS` which is read as UTC.
/// Output format: RFC 3339.
pub mod offset_datetime {

    use super::*;

    pub(super) const FALLBACK_FORMAT: &[BorrowedFormatItem] = format_description!(
        "[year]-[month padding:zero]-[day padding:zero] [hour padding:zero]:[minute padding:zero]:[second padding:zero]"
    );

    pub fn serialize<S>(dt: &OffsetDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&dt.format(&Rfc3339).map_err(serde::ser::Error::custom)?)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<OffsetDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        OffsetDateTime::parse(&raw, &Rfc3339)
            .or_else(|_| PrimitiveDateTime::parse(&raw, FALLBACK_FORMAT).map(|p| p.assume_utc()))
            .map_err(serde::de::Error::custom)
    }
}
