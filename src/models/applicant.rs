use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;

/// Recruitment pipeline stage. Any stage may follow any other; none is final.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ApplicationStatus {
    #[default]
    New,
    Applied,
    Shortlisted,
    #[serde(rename = "Interview Scheduled")]
    InterviewScheduled,
    Hired,
    Rejected,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 6] = [
        ApplicationStatus::New,
        ApplicationStatus::Applied,
        ApplicationStatus::Shortlisted,
        ApplicationStatus::InterviewScheduled,
        ApplicationStatus::Hired,
        ApplicationStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::New => "New",
            ApplicationStatus::Applied => "Applied",
            ApplicationStatus::Shortlisted => "Shortlisted",
            ApplicationStatus::InterviewScheduled => "Interview Scheduled",
            ApplicationStatus::Hired => "Hired",
            ApplicationStatus::Rejected => "Rejected",
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("unknown status: {}", s))
    }
}

// Legacy records are not uniform: fields may be missing, null or of another
// JSON type. Reads fall back to the field's default instead of failing.

/// Stored status as read back: absent, null and unrecognised values all read
/// as `New`.
fn status_on_read<'de, D>(deserializer: D) -> Result<ApplicationStatus, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match JsonValue::deserialize(deserializer)? {
        JsonValue::Null => ApplicationStatus::New,
        JsonValue::String(s) => s.parse().unwrap_or_else(|_| {
            tracing::warn!(status = %s, "unrecognised applicant status, reading as New");
            ApplicationStatus::New
        }),
        other => {
            tracing::warn!(status = %other, "unrecognised applicant status, reading as New");
            ApplicationStatus::New
        }
    })
}

/// Strings as stored; numbers and booleans are rendered, anything else is empty.
fn text_on_read<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match JsonValue::deserialize(deserializer)? {
        JsonValue::String(s) => s,
        JsonValue::Number(n) => n.to_string(),
        JsonValue::Bool(b) => b.to_string(),
        _ => String::new(),
    })
}

fn flag_on_read<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match JsonValue::deserialize(deserializer)? {
        JsonValue::Bool(b) => b,
        JsonValue::String(s) => s.trim().eq_ignore_ascii_case("true"),
        JsonValue::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
        _ => false,
    })
}

fn count_on_read<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match JsonValue::deserialize(deserializer)? {
        JsonValue::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|v| v as i64))
            .unwrap_or_default(),
        JsonValue::String(s) => s.trim().parse().unwrap_or_default(),
        _ => 0,
    })
}

/// RFC 3339 strings, or `{ "seconds": .. }` objects as written by document
/// database exports. Anything else reads as absent.
fn timestamp_on_read<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match JsonValue::deserialize(deserializer)? {
        JsonValue::String(s) => DateTime::parse_from_rfc3339(&s)
            .ok()
            .map(|at| at.with_timezone(&Utc)),
        JsonValue::Object(map) => map
            .get("seconds")
            .or_else(|| map.get("_seconds"))
            .and_then(JsonValue::as_i64)
            .and_then(|secs| DateTime::from_timestamp(secs, 0)),
        _ => None,
    })
}

/// An application record as stored in the `applicants` collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Applicant {
    pub id: String,
    #[serde(deserialize_with = "text_on_read")]
    pub full_name: String,
    #[serde(deserialize_with = "text_on_read")]
    pub email: String,
    #[serde(deserialize_with = "text_on_read")]
    pub phone: String,
    #[serde(deserialize_with = "text_on_read")]
    pub age: String,
    #[serde(deserialize_with = "text_on_read")]
    pub gender: String,
    #[serde(deserialize_with = "text_on_read")]
    pub education: String,
    #[serde(deserialize_with = "text_on_read")]
    pub city: String,
    #[serde(deserialize_with = "text_on_read")]
    pub current_position: String,
    #[serde(deserialize_with = "text_on_read")]
    pub working_hours: String,
    #[serde(deserialize_with = "text_on_read")]
    pub why_this_role: String,
    #[serde(deserialize_with = "text_on_read")]
    pub reference_id: String,
    /// Reference display name captured at submission time. Not refreshed when
    /// the reference is renamed later.
    #[serde(deserialize_with = "text_on_read")]
    pub reference_name: String,
    #[serde(deserialize_with = "status_on_read")]
    pub status: ApplicationStatus,
    #[serde(deserialize_with = "flag_on_read")]
    pub registration_completed: bool,
    #[serde(deserialize_with = "count_on_read")]
    pub sales_completed: i64,
    #[serde(deserialize_with = "timestamp_on_read")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "timestamp_on_read")]
    pub submitted_at: Option<DateTime<Utc>>,
}

/// Fields written when the public form creates an applicant.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewApplicant {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub age: String,
    pub gender: String,
    pub education: String,
    pub city: String,
    pub current_position: String,
    pub working_hours: String,
    pub why_this_role: String,
    pub reference: String,
    pub reference_id: String,
    pub reference_name: String,
    pub status: ApplicationStatus,
    pub sales_completed: i64,
    pub registration_completed: bool,
    pub created_at: DateTime<Utc>,
    pub submitted_at: DateTime<Utc>,
}
