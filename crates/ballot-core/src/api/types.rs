//! Request and response bodies exchanged with the election service.

use serde::{Deserialize, Serialize};

use crate::elections::{Election, ElectionStatus};

/// Role that the election service forbids from voting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RestrictedRole {
    Admin,
    Lecturer,
}

impl std::fmt::Display for RestrictedRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RestrictedRole::Admin => write!(f, "admin"),
            RestrictedRole::Lecturer => write!(f, "lecturer"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ElectionEnvelope {
    pub election: Election,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct VoteStatusResponse {
    #[serde(rename = "hasVoted", default)]
    pub has_voted: bool,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct StatusUpdateRequest {
    pub status: ElectionStatus,
}

/// Body of the broadcast sent after an election changes status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusNotification {
    pub faculty_name: String,
    pub election_name: String,
    pub election_id: String,
    pub new_status: ElectionStatus,
}

impl StatusNotification {
    pub fn for_election(election_id: &str, election: &Election, new_status: ElectionStatus) -> Self {
        Self {
            faculty_name: election.faculty_name.clone(),
            election_name: election.election_name.clone(),
            election_id: election_id.to_string(),
            new_status,
        }
    }
}

/// Error body the service sends with 401/403 responses.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct FailureBody {
    #[serde(rename = "isAdmin", default)]
    pub is_admin: bool,
    #[serde(rename = "isLecturer", default)]
    pub is_lecturer: bool,
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_wire_format() {
        let election: Election = serde_json::from_value(serde_json::json!({
            "election_name": "SRC 2025",
            "faculty_name": "Engineering"
        }))
        .unwrap();

        let notification =
            StatusNotification::for_election("12", &election, ElectionStatus::Ended);
        assert_eq!(
            serde_json::to_value(&notification).unwrap(),
            serde_json::json!({
                "faculty_name": "Engineering",
                "election_name": "SRC 2025",
                "election_id": "12",
                "new_status": "ended"
            })
        );
    }

    #[test]
    fn test_status_update_body() {
        let body = StatusUpdateRequest {
            status: ElectionStatus::Ended,
        };
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"status":"ended"}"#
        );
    }

    #[test]
    fn test_vote_status_missing_field_is_false() {
        let status: VoteStatusResponse = serde_json::from_str("{}").unwrap();
        assert!(!status.has_voted);
    }
}
