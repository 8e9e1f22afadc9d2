use serde::{Deserialize, Serialize};

use super::routes::Route;
use crate::api::RestrictedRole;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    AlreadyVoted,
    RoleNotAllowed,
    SelfVote,
    ElectionEnded,
    StatusUnavailable,
}

/// A blocking message the viewer must acknowledge.
///
/// `redirect` is where acknowledging it takes the viewer; `None` keeps them
/// on the screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub message: String,
    pub redirect: Option<Route>,
}

impl Notice {
    fn new(kind: NoticeKind, title: &str, message: &str, redirect: Option<Route>) -> Self {
        Self {
            kind,
            title: title.to_string(),
            message: message.to_string(),
            redirect,
        }
    }

    pub fn already_voted() -> Self {
        Self::new(
            NoticeKind::AlreadyVoted,
            "Already Voted",
            "You have already voted in this election.",
            Some(Route::Home),
        )
    }

    pub fn role_not_allowed(role: RestrictedRole) -> Self {
        let message = match role {
            RestrictedRole::Admin => "Admins are not allowed to vote in elections.",
            RestrictedRole::Lecturer => "Lecturers are not allowed to take part in elections.",
        };
        Self::new(
            NoticeKind::RoleNotAllowed,
            "Not Allowed",
            message,
            Some(Route::News),
        )
    }

    pub fn self_vote() -> Self {
        Self::new(
            NoticeKind::SelfVote,
            "Invalid Vote",
            "You cannot vote for yourself.",
            None,
        )
    }

    pub fn election_ended(election_id: &str) -> Self {
        Self::new(
            NoticeKind::ElectionEnded,
            "Election Ended",
            "This election has ended. Redirecting to results page...",
            Some(Route::Results {
                election_id: election_id.to_string(),
            }),
        )
    }

    pub fn status_unavailable() -> Self {
        Self::new(
            NoticeKind::StatusUnavailable,
            "Vote Status Unavailable",
            "Your vote status could not be verified. Please try again.",
            None,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_notices_redirect_to_news() {
        let admin = Notice::role_not_allowed(RestrictedRole::Admin);
        assert_eq!(admin.title, "Not Allowed");
        assert_eq!(admin.message, "Admins are not allowed to vote in elections.");
        assert_eq!(admin.redirect, Some(Route::News));

        let lecturer = Notice::role_not_allowed(RestrictedRole::Lecturer);
        assert_eq!(
            lecturer.message,
            "Lecturers are not allowed to take part in elections."
        );
    }

    #[test]
    fn test_self_vote_notice_stays_on_screen() {
        let notice = Notice::self_vote();
        assert_eq!(notice.kind, NoticeKind::SelfVote);
        assert_eq!(notice.redirect, None);
    }
}
