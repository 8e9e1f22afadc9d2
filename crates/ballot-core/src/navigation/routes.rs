use serde::{Deserialize, Serialize};

/// Destinations the election screen can send the viewer to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "route", rename_all = "snake_case")]
pub enum Route {
    Login,
    Home,
    News,
    /// Results of an election that has ended.
    Results { election_id: String },
    /// First verification step after choosing a candidate.
    Otp {
        election_id: String,
        candidate_id: String,
    },
    /// Candidate profile page.
    Profile {
        election_id: String,
        candidate_id: String,
    },
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Login => "/login".to_string(),
            Route::Home => "/home".to_string(),
            Route::News => "/news".to_string(),
            Route::Results { election_id } => format!("/elections/{}/results", election_id),
            Route::Otp {
                election_id,
                candidate_id,
            } => format!("/elections/{}/otp?candidate={}", election_id, candidate_id),
            Route::Profile {
                election_id,
                candidate_id,
            } => format!("/elections/{}/candidates/{}", election_id, candidate_id),
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_paths() {
        assert_eq!(Route::Login.path(), "/login");
        assert_eq!(
            Route::Results {
                election_id: "12".to_string()
            }
            .path(),
            "/elections/12/results"
        );
        assert_eq!(
            Route::Otp {
                election_id: "12".to_string(),
                candidate_id: "8".to_string()
            }
            .to_string(),
            "/elections/12/otp?candidate=8"
        );
    }

    #[test]
    fn test_route_json_is_tagged() {
        let json = serde_json::to_value(Route::Profile {
            election_id: "1".to_string(),
            candidate_id: "2".to_string(),
        })
        .unwrap();
        assert_eq!(
            json,
            serde_json::json!({"route": "profile", "election_id": "1", "candidate_id": "2"})
        );
    }
}
