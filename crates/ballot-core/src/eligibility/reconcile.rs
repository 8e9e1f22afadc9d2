/// Change to apply to the local "voted" flag after consulting the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileAction {
    None,
    /// The service recorded a vote the local cache did not know about.
    MarkVoted,
    /// The local flag claims a vote the service has no record of.
    ClearStale,
}

/// Reconcile the local voted flag with the authoritative remote status.
///
/// Returns the corrected local value (always equal to `remote`) and the
/// write needed to get there.
pub fn reconcile(local: bool, remote: bool) -> (bool, ReconcileAction) {
    let action = match (local, remote) {
        (false, true) => ReconcileAction::MarkVoted,
        (true, false) => ReconcileAction::ClearStale,
        _ => ReconcileAction::None,
    };
    (remote, action)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_wins_in_every_combination() {
        assert_eq!(reconcile(false, false), (false, ReconcileAction::None));
        assert_eq!(reconcile(false, true), (true, ReconcileAction::MarkVoted));
        assert_eq!(reconcile(true, false), (false, ReconcileAction::ClearStale));
        assert_eq!(reconcile(true, true), (true, ReconcileAction::None));
    }
}
