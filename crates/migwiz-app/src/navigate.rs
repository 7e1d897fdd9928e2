use std::path::PathBuf;

use migwiz_core::guard::{LeaveVerdict, MISSING_ARCHIVE_NOTICE, MISSING_CREDENTIALS_NOTICE, evaluate_leave};
use migwiz_core::resolver::{
    AUTH_LOADING_MESSAGE, EXTRACT_LOADING_MESSAGE, ResolveOutcome, auth_settlement,
    extraction_settlement,
};
use migwiz_core::session::SessionState;
use migwiz_core::steps::{StepId, route_data};

use crate::App;

/// UI-facing callbacks for one guard or resolver run. The wizard backs these
/// with the overlay coordinator and a toast; the headless path prints to
/// stderr.
pub trait WizardOps {
    fn notify(&mut self, message: &str);
    fn loading_started(&mut self, message: &str, step: Option<StepId>);
    fn loading_finished(&mut self);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationIntent {
    pub from: StepId,
    pub to_path: String,
}

impl NavigationIntent {
    pub fn forward(from: StepId, to: StepId) -> Self {
        Self {
            from,
            to_path: to.path(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionOutcome {
    Permitted,
    Denied,
    Redirected { to: StepId },
}

impl TransitionOutcome {
    pub fn permitted(self) -> bool {
        self == Self::Permitted
    }
}

fn into_transition(outcome: ResolveOutcome) -> TransitionOutcome {
    if outcome.permit {
        TransitionOutcome::Permitted
    } else if let Some(to) = outcome.redirect {
        TransitionOutcome::Redirected { to }
    } else {
        TransitionOutcome::Denied
    }
}

impl<'a> App<'a> {
    /// Guard for leaving the intent's step. Backward and unrelated
    /// destinations permit synchronously; forward progress may run the
    /// authentication precondition inline.
    pub fn attempt_leave(
        &self,
        intent: &NavigationIntent,
        session: &mut SessionState,
        ops: &mut dyn WizardOps,
    ) -> TransitionOutcome {
        let data = route_data(intent.from);
        match evaluate_leave(intent.from, &data, &intent.to_path, session) {
            LeaveVerdict::Permit => TransitionOutcome::Permitted,
            LeaveVerdict::Deny { notice } => {
                ops.notify(&notice);
                TransitionOutcome::Denied
            }
            LeaveVerdict::RunAuth => self.run_authentication(session, ops),
        }
    }

    /// Entry resolver for a step: entering `config` requires authentication
    /// and entering `migrate` requires the staged archive to extract. Other
    /// steps have no entry precondition.
    pub fn resolve_entry(
        &self,
        entering: StepId,
        session: &mut SessionState,
        ops: &mut dyn WizardOps,
    ) -> TransitionOutcome {
        match entering {
            StepId::Config => {
                if session.is_authenticated() {
                    return TransitionOutcome::Permitted;
                }
                self.run_authentication(session, ops)
            }
            StepId::Migrate => self.run_extraction(session, ops),
            StepId::Upload | StepId::Auth | StepId::Complete => TransitionOutcome::Permitted,
        }
    }

    fn run_authentication(
        &self,
        session: &mut SessionState,
        ops: &mut dyn WizardOps,
    ) -> TransitionOutcome {
        let Some(credentials) = session.credentials().cloned() else {
            ops.notify(MISSING_CREDENTIALS_NOTICE);
            return TransitionOutcome::Denied;
        };

        ops.loading_started(AUTH_LOADING_MESSAGE, Some(StepId::Auth));
        let settled = self.authenticator.authenticate(&credentials);
        let outcome = auth_settlement(settled);

        if outcome.permit {
            session.set_authenticated(true);
        }
        if let Some(notice) = &outcome.notice {
            ops.notify(notice);
        }
        // Cleanup runs last, after the outcome is fixed and surfaced, so a
        // caller never observes a settled transition with the overlay up.
        ops.loading_finished();
        into_transition(outcome)
    }

    fn run_extraction(
        &self,
        session: &mut SessionState,
        ops: &mut dyn WizardOps,
    ) -> TransitionOutcome {
        let Some(archive) = session.archive().map(PathBuf::from) else {
            ops.notify(MISSING_ARCHIVE_NOTICE);
            return TransitionOutcome::Denied;
        };

        if session.extracted_to().is_some() {
            return TransitionOutcome::Permitted;
        }

        ops.loading_started(EXTRACT_LOADING_MESSAGE, Some(StepId::Migrate));
        let settled = self.extractor.extract(&archive);
        let destination = settled
            .as_ref()
            .ok()
            .and_then(|extraction| extraction.destination.clone());
        let outcome = extraction_settlement(settled.map(|extraction| extraction.completed));

        if outcome.permit
            && let Some(destination) = destination
        {
            session.mark_extracted(destination);
        }
        if let Some(notice) = &outcome.notice {
            ops.notify(notice);
        }
        ops.loading_finished();
        into_transition(outcome)
    }

    /// Walks the wizard forward from `from`, running the leave guard and the
    /// entry resolver for each hop. Stops at the first step that refuses,
    /// returning where the walk ended up.
    pub fn advance_to_completion(
        &self,
        from: StepId,
        session: &mut SessionState,
        ops: &mut dyn WizardOps,
    ) -> StepId {
        let mut current = from;
        while let Some(next) = route_data(current).next {
            let intent = NavigationIntent::forward(current, next);
            if !self.attempt_leave(&intent, session, ops).permitted() {
                return current;
            }
            match self.resolve_entry(next, session, ops) {
                TransitionOutcome::Permitted => current = next,
                TransitionOutcome::Redirected { to } => return to,
                TransitionOutcome::Denied => return current,
            }
        }
        current
    }
}
