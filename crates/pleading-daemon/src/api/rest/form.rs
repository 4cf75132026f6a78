//! URL-encoded form bodies with repeated keys
//!
//! HTMX posts one `selectedDocs` pair per checked box, which serde-based
//! form extractors collapse; this keeps every pair in order.

use axum::body::Bytes;

#[derive(Debug, Clone, Default)]
pub struct FormFields {
    pairs: Vec<(String, String)>,
}

impl FormFields {
    pub fn parse(body: &[u8]) -> Self {
        Self {
            pairs: url::form_urlencoded::parse(body).into_owned().collect(),
        }
    }

    /// First value for `key`, if present and not blank.
    pub fn first(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .filter(|v| !v.trim().is_empty())
    }

    /// Every non-blank value for `key`, in submission order.
    pub fn all(&self, key: &str) -> Vec<String> {
        self.pairs
            .iter()
            .filter(|(k, v)| k == key && !v.trim().is_empty())
            .map(|(_, v)| v.clone())
            .collect()
    }
}

impl From<Bytes> for FormFields {
    fn from(body: Bytes) -> Self {
        Self::parse(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_keys_are_kept_in_order() {
        let form = FormFields::parse(
            b"selectedDocs=%2FCases%2FSmith%2Fb.pdf&caseFolder=%2FCases%2FSmith&selectedDocs=%2FCases%2FSmith%2Fa.txt&selectedDocs=",
        );
        assert_eq!(form.all("selectedDocs"), ["/Cases/Smith/b.pdf", "/Cases/Smith/a.txt"]);
        assert_eq!(form.first("caseFolder"), Some("/Cases/Smith"));
        assert_eq!(form.first("selectedTemplate"), None);
    }

    #[test]
    fn test_plus_decodes_to_space() {
        let form = FormFields::parse(b"folderPath=%2FLegal+Cases");
        assert_eq!(form.first("folderPath"), Some("/Legal Cases"));
    }
}
