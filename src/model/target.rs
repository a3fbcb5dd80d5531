use serde::{Deserialize, Deserializer, Serialize};

use crate::model::column;

/// Status bucket used when the backend sends no status at all.
pub const DEFAULT_STATUS: &str = "Not Contacted";

/// An organization tracked through the outreach workflow.
///
/// `organization` is the sole identity key; everything else is descriptive.
/// The backend is loose about numeric fields (absent, `null`, or a numeric
/// string depending on how the row was imported), so those all deserialize
/// leniently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub organization: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub population: Option<i64>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub median_income: Option<i64>,
    #[serde(default)]
    pub grade: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

impl Target {
    /// Create a target with just the identity fields, everything else empty.
    pub fn new(organization: impl Into<String>, status: impl Into<String>) -> Self {
        Target {
            organization: organization.into(),
            status: Some(status.into()),
            address: None,
            phone: None,
            website: None,
            population: None,
            median_income: None,
            grade: None,
            latitude: None,
            longitude: None,
        }
    }

    /// The effective status, falling back to [`DEFAULT_STATUS`].
    pub fn status_str(&self) -> &str {
        match self.status.as_deref() {
            Some(s) if !s.trim().is_empty() => s,
            _ => DEFAULT_STATUS,
        }
    }

    /// Column slug this target belongs to.
    pub fn column_slug(&self) -> String {
        column::slug(self.status_str())
    }

    /// Stable identifier safe for widget ids and test selectors:
    /// every non-alphanumeric character becomes `-`.
    pub fn card_id(&self) -> String {
        sanitize_id(&self.organization)
    }

    /// The fixed field set the search filter matches against.
    pub fn searchable_text(&self) -> String {
        let mut text = String::new();
        for field in [
            Some(self.organization.as_str()),
            self.address.as_deref(),
            self.phone.as_deref(),
            self.grade.as_deref(),
            Some(self.status_str()),
        ]
        .into_iter()
        .flatten()
        {
            if !text.is_empty() {
                text.push(' ');
            }
            text.push_str(field);
        }
        text.to_lowercase()
    }
}

/// Sanitize a free-form string into an identifier: non-alphanumeric → `-`.
pub fn sanitize_id(raw: &str) -> String {
    raw.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect()
}

/// Accept `12345`, `12345.0`, `"12345"`, `null`, or nothing.
/// Anything unparseable becomes `None` rather than a deserialize error.
fn lenient_int<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Some(serde_json::Value::String(s)) => s.trim().parse::<i64>().ok(),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitizes_non_alphanumeric_to_hyphens() {
        assert_eq!(sanitize_id("Acme Corp. #1"), "Acme-Corp---1");
        assert_eq!(sanitize_id("plain"), "plain");
    }

    #[test]
    fn status_falls_back_when_missing_or_blank() {
        let mut t = Target::new("Acme", "Contacted");
        assert_eq!(t.status_str(), "Contacted");
        t.status = None;
        assert_eq!(t.status_str(), DEFAULT_STATUS);
        t.status = Some("  ".into());
        assert_eq!(t.status_str(), DEFAULT_STATUS);
    }

    #[test]
    fn lenient_numeric_fields() {
        let t: Target = serde_json::from_str(
            r#"{"organization":"Acme","population":"12500","median_income":null}"#,
        )
        .unwrap();
        assert_eq!(t.population, Some(12500));
        assert_eq!(t.median_income, None);

        let t: Target =
            serde_json::from_str(r#"{"organization":"Beta","population":"n/a"}"#).unwrap();
        assert_eq!(t.population, None);
    }

    #[test]
    fn searchable_text_covers_the_fixed_field_set() {
        let mut t = Target::new("Acme", "Not Contacted");
        t.address = Some("12 Main St".into());
        t.phone = Some("555-0100".into());
        t.grade = Some("A".into());
        t.website = Some("https://should-not-match.example".into());
        let text = t.searchable_text();
        assert!(text.contains("acme"));
        assert!(text.contains("12 main st"));
        assert!(text.contains("555-0100"));
        assert!(text.contains("a"));
        assert!(text.contains("not contacted"));
        assert!(!text.contains("should-not-match"));
    }
}
