use crate::backend::{AuthResult, BackendError};
use crate::diagnostics;
use crate::steps::StepId;

pub const AUTH_LOADING_MESSAGE: &str = "Signing in to the migration service...";
pub const EXTRACT_LOADING_MESSAGE: &str = "Extracting archive...";

pub const AUTH_FALLBACK_NOTICE: &str = "Authentication failed";
pub const EXTRACT_FALLBACK_NOTICE: &str = "Archive extraction failed";

/// Literal, case-sensitive markers that classify an extraction error as an
/// upload problem; such errors send the user back to the upload step.
pub const UPLOAD_ERROR_MARKERS: [&str; 5] = [
    "File too large",
    "Upload failed",
    "Invalid file format",
    "Network error",
    "Server error",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveOutcome {
    pub permit: bool,
    pub notice: Option<String>,
    pub redirect: Option<StepId>,
}

impl ResolveOutcome {
    pub fn permitted() -> Self {
        Self {
            permit: true,
            notice: None,
            redirect: None,
        }
    }

    fn denied(notice: Option<String>, redirect: Option<StepId>) -> Self {
        Self {
            permit: false,
            notice,
            redirect,
        }
    }
}

pub fn auth_settlement(settled: Result<AuthResult, BackendError>) -> ResolveOutcome {
    match settled {
        Ok(result) if result.success => {
            diagnostics::record("resolver: authentication succeeded");
            ResolveOutcome::permitted()
        }
        Ok(result) => {
            let notice = displayed_message(non_empty(&result.message), AUTH_FALLBACK_NOTICE);
            diagnostics::record(format!("resolver: authentication rejected: {notice}"));
            ResolveOutcome::denied(Some(notice), None)
        }
        Err(error) => {
            let notice = displayed_message(error.message(), AUTH_FALLBACK_NOTICE);
            diagnostics::record(format!("resolver: authentication errored: {notice}"));
            ResolveOutcome::denied(Some(notice), None)
        }
    }
}

pub fn extraction_settlement(settled: Result<bool, BackendError>) -> ResolveOutcome {
    match settled {
        Ok(extracted) => {
            diagnostics::record(format!("resolver: extraction settled extracted={extracted}"));
            if extracted {
                ResolveOutcome::permitted()
            } else {
                ResolveOutcome::denied(None, None)
            }
        }
        Err(error) => {
            let notice = displayed_message(error.message(), EXTRACT_FALLBACK_NOTICE);
            let redirect = UPLOAD_ERROR_MARKERS
                .iter()
                .any(|marker| notice.contains(marker))
                .then_some(StepId::Upload);
            diagnostics::record(format!(
                "resolver: extraction errored: {notice} (redirect={})",
                redirect.is_some()
            ));
            ResolveOutcome::denied(Some(notice), redirect)
        }
    }
}

fn non_empty(message: &str) -> Option<&str> {
    if message.is_empty() { None } else { Some(message) }
}

fn displayed_message(message: Option<&str>, fallback: &str) -> String {
    message.unwrap_or(fallback).to_string()
}
