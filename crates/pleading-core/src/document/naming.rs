//! File naming for saved documents.

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};

/// `YYYYMMDD_HHMMSS`, the stamp embedded in canonical filenames.
pub const STAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Clock format shown as "last saved" in the editor.
pub const LAST_SAVED_FORMAT: &str = "%-I:%M:%S %p";

/// `Eman Youssef` becomes `eman_youssef`.
pub fn client_key(client_name: &str) -> String {
    client_name.replace(' ', "_").to_lowercase()
}

/// Whether `part` can be embedded in a filename inside the save directory.
pub fn is_safe_component(part: &str) -> bool {
    !part.is_empty()
        && !part.contains(['/', '\\', '\0'])
        && !part.contains("..")
}

pub fn stamp(now: DateTime<Local>) -> String {
    now.format(STAMP_FORMAT).to_string()
}

pub fn canonical_name(document_type: &str, key: &str, stamp: &str) -> String {
    format!("{}_{}_{}.html", document_type, key, stamp)
}

pub fn alias_name(document_type: &str, key: &str) -> String {
    format!("{}_{}_latest.html", document_type, key)
}

/// Suggested filename for downloading the document right now.
pub fn download_filename(key: &str, now: DateTime<Local>) -> String {
    canonical_name("complaint", key, &stamp(now))
}

/// Reads the trailing `YYYYMMDD_HHMMSS` stamp out of a canonical filename.
pub fn parse_stamp(file_name: &str) -> Option<DateTime<Local>> {
    let stem = file_name.strip_suffix(".html")?;
    let split = stem.len().checked_sub(15)?;
    let raw = stem.get(split..)?;
    let naive = NaiveDateTime::parse_from_str(raw, STAMP_FORMAT).ok()?;
    Local.from_local_datetime(&naive).earliest()
}

/// Parses `rest` only when it is exactly `YYYYMMDD_HHMMSS.html`.
pub fn exact_stamp(rest: &str) -> Option<DateTime<Local>> {
    if rest.len() != "YYYYMMDD_HHMMSS.html".len() {
        return None;
    }
    parse_stamp(rest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn key_lowercases_and_underscores() {
        assert_eq!(client_key("Eman Youssef"), "eman_youssef");
        assert_eq!(client_key("A B  C"), "a_b__c");
    }

    #[test]
    fn names_follow_pattern() {
        assert_eq!(
            canonical_name("complaint", "eman_youssef", "20250605_010420"),
            "complaint_eman_youssef_20250605_010420.html"
        );
        assert_eq!(
            alias_name("complaint", "eman_youssef"),
            "complaint_eman_youssef_latest.html"
        );
    }

    #[test]
    fn stamp_round_trips_through_filename() {
        let parsed = parse_stamp("complaint_eman_youssef_20250605_134420.html").unwrap();
        assert_eq!(parsed.format(LAST_SAVED_FORMAT).to_string(), "1:44:20 PM");
        assert_eq!(parsed.hour(), 13);
    }

    #[test]
    fn unsafe_components_are_refused() {
        assert!(is_safe_component("complaint"));
        assert!(is_safe_component("eman_youssef"));
        for bad in ["", "../x", "a/b", "a\\b", "..", "a\0b"] {
            assert!(!is_safe_component(bad), "{bad:?}");
        }
    }

    #[test]
    fn exact_stamp_rejects_longer_remainders() {
        assert!(exact_stamp("20250605_134420.html").is_some());
        assert!(exact_stamp("smith_20250605_134420.html").is_none());
        assert!(exact_stamp("latest.html").is_none());
    }

    #[test]
    fn alias_has_no_stamp() {
        assert!(parse_stamp("complaint_eman_youssef_latest.html").is_none());
        assert!(parse_stamp("short.html").is_none());
    }
}
