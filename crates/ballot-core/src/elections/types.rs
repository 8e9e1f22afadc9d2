use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Lifecycle status of an election as reported by the election service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ElectionStatus {
    #[default]
    Active,
    Ended,
    /// Any status this client does not model (e.g. an upcoming election).
    #[serde(other)]
    Unknown,
}

impl ElectionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ElectionStatus::Active => "active",
            ElectionStatus::Ended => "ended",
            ElectionStatus::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for ElectionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read-only snapshot of an election owned by the election service.
///
/// The snapshot may be stale; the status field is never updated locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Election {
    #[serde(
        default,
        deserialize_with = "deserialize_optional_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub election_id: Option<String>,
    #[serde(default)]
    pub election_name: String,
    #[serde(default)]
    pub faculty_name: String,
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    /// Duration in minutes.
    #[serde(default)]
    pub duration: Option<u32>,
    #[serde(default)]
    pub status: ElectionStatus,
}

impl Election {
    /// Deadline of the election, `start_date + duration`.
    ///
    /// Returns `None` when the start date is missing or the duration is
    /// missing or zero, or when the deadline falls outside the
    /// representable date range; no countdown is armed for such an election.
    pub fn end_time(&self) -> Option<DateTime<Utc>> {
        let start = self.start_date?;
        let minutes = self.duration.filter(|d| *d > 0)?;
        start.checked_add_signed(Duration::minutes(i64::from(minutes)))
    }

    /// Inputs that, when changed, require the countdown to be re-armed.
    pub fn timing(&self) -> (Option<DateTime<Utc>>, Option<u32>) {
        (self.start_date, self.duration)
    }
}

/// A person eligible to receive votes in an election.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    #[serde(deserialize_with = "deserialize_id")]
    pub candidate_id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    /// Fields the service sends that this client does not interpret.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Candidate {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// The authenticated user acting on the election screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Voter {
    #[serde(deserialize_with = "deserialize_id")]
    pub userid: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// The requesting user together with the approved candidates of an election.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateRoster {
    pub user: Voter,
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

/// Identifiers arrive as JSON numbers or strings depending on the endpoint.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Int(i64),
    Text(String),
}

impl From<RawId> for String {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Int(n) => n.to_string(),
            RawId::Text(s) => s,
        }
    }
}

fn deserialize_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    RawId::deserialize(deserializer).map(String::from)
}

fn deserialize_optional_id<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Ok(Option::<RawId>::deserialize(deserializer)?.map(String::from))
}
