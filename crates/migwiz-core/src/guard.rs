use crate::diagnostics;
use crate::session::SessionState;
use crate::steps::{StepId, StepRouteData};

pub const MISSING_ARCHIVE_NOTICE: &str = "Choose an archive file before continuing";
pub const MISSING_CREDENTIALS_NOTICE: &str = "Enter a username and password before continuing";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionKind {
    ToPrevious,
    ToNext,
    Other,
}

pub fn classify_transition(data: &StepRouteData, to_path: &str) -> TransitionKind {
    if let Some(previous) = data.previous
        && to_path.contains(previous.segment())
    {
        return TransitionKind::ToPrevious;
    }

    if let Some(next) = data.next
        && to_path.contains(next.segment())
    {
        return TransitionKind::ToNext;
    }

    TransitionKind::Other
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForwardPrecondition {
    None,
    ArchiveStaged,
    Authenticated,
}

pub fn forward_precondition(step: StepId) -> ForwardPrecondition {
    match step {
        StepId::Upload => ForwardPrecondition::ArchiveStaged,
        StepId::Auth => ForwardPrecondition::Authenticated,
        StepId::Config | StepId::Migrate | StepId::Complete => ForwardPrecondition::None,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeaveVerdict {
    Permit,
    Deny { notice: String },
    RunAuth,
}

/// Decides whether the user may leave `from` toward `to_path`. Backward and
/// unrelated destinations always pass; only forward progress is gated.
/// `RunAuth` asks the caller to settle the authentication precondition with
/// the stored credentials, which is the only asynchronous case.
pub fn evaluate_leave(
    from: StepId,
    data: &StepRouteData,
    to_path: &str,
    session: &SessionState,
) -> LeaveVerdict {
    match classify_transition(data, to_path) {
        TransitionKind::ToPrevious => {
            diagnostics::record(format!("guard: permit backward {from} -> {to_path}"));
            LeaveVerdict::Permit
        }
        TransitionKind::Other => {
            diagnostics::record(format!("guard: permit unrelated {from} -> {to_path}"));
            LeaveVerdict::Permit
        }
        TransitionKind::ToNext => match forward_precondition(from) {
            ForwardPrecondition::None => {
                diagnostics::record(format!("guard: permit forward {from} -> {to_path}"));
                LeaveVerdict::Permit
            }
            ForwardPrecondition::ArchiveStaged => {
                if session.archive().is_some() {
                    diagnostics::record(format!("guard: permit forward {from} (archive staged)"));
                    LeaveVerdict::Permit
                } else {
                    diagnostics::record(format!("guard: deny forward {from} (no archive)"));
                    LeaveVerdict::Deny {
                        notice: MISSING_ARCHIVE_NOTICE.to_string(),
                    }
                }
            }
            ForwardPrecondition::Authenticated => {
                if session.is_authenticated() {
                    diagnostics::record(format!("guard: permit forward {from} (authenticated)"));
                    LeaveVerdict::Permit
                } else if session.credentials().is_none() {
                    diagnostics::record(format!("guard: deny forward {from} (no credentials)"));
                    LeaveVerdict::Deny {
                        notice: MISSING_CREDENTIALS_NOTICE.to_string(),
                    }
                } else {
                    diagnostics::record(format!("guard: forward {from} requires authentication"));
                    LeaveVerdict::RunAuth
                }
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Credentials;
    use crate::steps::route_data;
    use std::path::PathBuf;

    fn session_with_credentials() -> SessionState {
        let mut session = SessionState::new();
        session.set_credentials(Credentials {
            username: "admin".to_string(),
            password: "changeme1".to_string(),
        });
        session
    }

    #[test]
    fn destination_containing_previous_segment_classifies_backward() {
        let data = route_data(StepId::Config);
        assert_eq!(
            classify_transition(&data, "wizard/auth"),
            TransitionKind::ToPrevious
        );
    }

    #[test]
    fn destination_containing_next_segment_classifies_forward() {
        let data = route_data(StepId::Config);
        assert_eq!(
            classify_transition(&data, "wizard/migrate"),
            TransitionKind::ToNext
        );
    }

    #[test]
    fn unrelated_destination_classifies_other() {
        let data = route_data(StepId::Config);
        assert_eq!(classify_transition(&data, "help"), TransitionKind::Other);
        assert_eq!(classify_transition(&data, ""), TransitionKind::Other);
    }

    #[test]
    fn first_and_last_steps_classify_without_neighbors() {
        let first = route_data(StepId::Upload);
        assert_eq!(
            classify_transition(&first, "wizard/auth"),
            TransitionKind::ToNext
        );

        let last = route_data(StepId::Complete);
        assert_eq!(
            classify_transition(&last, "wizard/migrate"),
            TransitionKind::ToPrevious
        );
        assert_eq!(classify_transition(&last, "wizard/auth"), TransitionKind::Other);
    }

    #[test]
    fn backward_navigation_is_never_blocked() {
        let session = SessionState::new();
        let data = route_data(StepId::Auth);
        assert_eq!(
            evaluate_leave(StepId::Auth, &data, "wizard/upload", &session),
            LeaveVerdict::Permit
        );
    }

    #[test]
    fn unrelated_navigation_is_never_blocked() {
        let session = SessionState::new();
        let data = route_data(StepId::Auth);
        assert_eq!(
            evaluate_leave(StepId::Auth, &data, "home", &session),
            LeaveVerdict::Permit
        );
    }

    #[test]
    fn forward_from_upload_requires_a_staged_archive() {
        let mut session = SessionState::new();
        let data = route_data(StepId::Upload);

        assert_eq!(
            evaluate_leave(StepId::Upload, &data, "wizard/auth", &session),
            LeaveVerdict::Deny {
                notice: MISSING_ARCHIVE_NOTICE.to_string()
            }
        );

        session.stage_archive(PathBuf::from("/tmp/export.zip"));
        assert_eq!(
            evaluate_leave(StepId::Upload, &data, "wizard/auth", &session),
            LeaveVerdict::Permit
        );
    }

    #[test]
    fn forward_from_auth_without_credentials_denies_without_backend_work() {
        let session = SessionState::new();
        let data = route_data(StepId::Auth);
        assert_eq!(
            evaluate_leave(StepId::Auth, &data, "wizard/config", &session),
            LeaveVerdict::Deny {
                notice: MISSING_CREDENTIALS_NOTICE.to_string()
            }
        );
    }

    #[test]
    fn repeated_denied_attempts_stay_denied() {
        let session = SessionState::new();
        let data = route_data(StepId::Auth);
        for _ in 0..2 {
            assert!(matches!(
                evaluate_leave(StepId::Auth, &data, "wizard/config", &session),
                LeaveVerdict::Deny { .. }
            ));
        }
    }

    #[test]
    fn forward_from_auth_with_credentials_requests_authentication() {
        let session = session_with_credentials();
        let data = route_data(StepId::Auth);
        assert_eq!(
            evaluate_leave(StepId::Auth, &data, "wizard/config", &session),
            LeaveVerdict::RunAuth
        );
    }

    #[test]
    fn forward_from_auth_when_already_authenticated_permits_synchronously() {
        let mut session = session_with_credentials();
        session.set_authenticated(true);
        let data = route_data(StepId::Auth);
        assert_eq!(
            evaluate_leave(StepId::Auth, &data, "wizard/config", &session),
            LeaveVerdict::Permit
        );
    }

    #[test]
    fn forward_from_config_has_no_precondition() {
        let session = SessionState::new();
        let data = route_data(StepId::Config);
        assert_eq!(
            evaluate_leave(StepId::Config, &data, "wizard/migrate", &session),
            LeaveVerdict::Permit
        );
    }
}
