use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// A registered child. Owned by the backend; the client keeps a transient copy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Child {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub birth_date: Option<String>,
}

/// A school subject. Read-only reference data, loaded once per session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// A learning goal for a child in a given subject.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: String,
    pub subject_id: String,
    pub description: String,
    pub status: String,
}

/// A logged activity. `activity_date` is kept verbatim as the backend sent it
/// (ISO 8601, naive or with offset) and only parsed for sorting and display.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: String,
    pub subject_id: String,
    pub description: String,
    #[serde(default)]
    pub observations: Option<String>,
    pub activity_date: String,
}

impl Activity {
    /// Parse the activity date, tolerating RFC 3339, naive datetimes, and
    /// date-only strings. Returns `None` for anything else.
    pub fn parsed_date(&self) -> Option<NaiveDateTime> {
        let raw = self.activity_date.as_str();
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.naive_utc());
        }
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
            return Some(dt);
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .map(|d| d.and_time(NaiveTime::MIN))
    }

    /// Display date in pt-BR format (DD/MM/YYYY), falling back to the raw
    /// string when the date cannot be parsed.
    pub fn formatted_date(&self) -> String {
        match self.parsed_date() {
            Some(dt) => dt.format("%d/%m/%Y").to_string(),
            None => self.activity_date.clone(),
        }
    }
}

/// Result of the simulated AI analysis. Ephemeral: replaced on every request,
/// cleared on child selection, never cached.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub analysis_id: String,
    pub summary: String,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub areas_for_attention: Vec<String>,
    #[serde(default)]
    pub suggestions: Vec<String>,
}

/// Payload for registering a child.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewChild {
    pub name: String,
    pub birth_date: Option<String>,
}

/// Payload for creating a learning goal.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGoal {
    pub subject_id: String,
    pub description: String,
}

/// Payload for logging an activity.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewActivity {
    pub subject_id: String,
    pub description: String,
    pub observations: Option<String>,
}

/// Look up a subject name by id, falling back to "Desconhecida" when the
/// subject is not in the loaded reference data.
pub fn subject_name<'a>(subjects: &'a [Subject], subject_id: &str) -> &'a str {
    subjects
        .iter()
        .find(|s| s.id == subject_id)
        .map(|s| s.name.as_str())
        .unwrap_or("Desconhecida")
}
