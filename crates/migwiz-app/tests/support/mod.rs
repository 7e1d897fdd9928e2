use std::collections::VecDeque;
use std::path::Path;
use std::sync::Mutex;

use migwiz_core::backend::{
    ArchiveExtractor, AuthResult, Authenticator, BackendError, Extraction,
};
use migwiz_core::session::Credentials;
use migwiz_core::steps::StepId;
use migwiz_app::navigate::WizardOps;

#[derive(Default)]
pub struct ScriptedAuthenticator {
    settlements: Mutex<VecDeque<Result<AuthResult, BackendError>>>,
    calls: Mutex<usize>,
}

impl ScriptedAuthenticator {
    pub fn new(settlements: Vec<Result<AuthResult, BackendError>>) -> Self {
        Self {
            settlements: Mutex::new(settlements.into()),
            calls: Mutex::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        *self.calls.lock().expect("calls lock")
    }
}

impl Authenticator for ScriptedAuthenticator {
    fn authenticate(&self, _credentials: &Credentials) -> Result<AuthResult, BackendError> {
        *self.calls.lock().expect("calls lock") += 1;
        self.settlements
            .lock()
            .expect("settlements lock")
            .pop_front()
            .unwrap_or_else(|| Err(BackendError::new("missing scripted auth settlement")))
    }
}

#[derive(Default)]
pub struct ScriptedExtractor {
    settlements: Mutex<VecDeque<Result<Extraction, BackendError>>>,
    calls: Mutex<usize>,
}

impl ScriptedExtractor {
    pub fn new(settlements: Vec<Result<Extraction, BackendError>>) -> Self {
        Self {
            settlements: Mutex::new(settlements.into()),
            calls: Mutex::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        *self.calls.lock().expect("calls lock")
    }
}

impl ArchiveExtractor for ScriptedExtractor {
    fn extract(&self, _archive: &Path) -> Result<Extraction, BackendError> {
        *self.calls.lock().expect("calls lock") += 1;
        self.settlements
            .lock()
            .expect("settlements lock")
            .pop_front()
            .unwrap_or_else(|| Err(BackendError::new("missing scripted extraction settlement")))
    }
}

/// Records every UI callback in order so tests can assert both counts and
/// the notify-before-finalize ordering.
#[derive(Default)]
pub struct RecordingOps {
    pub events: Vec<String>,
}

impl RecordingOps {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|event| event.strip_prefix("notify:"))
            .collect()
    }

    pub fn finalizer_runs(&self) -> usize {
        self.events
            .iter()
            .filter(|event| event.as_str() == "loading_finished")
            .count()
    }
}

impl WizardOps for RecordingOps {
    fn notify(&mut self, message: &str) {
        self.events.push(format!("notify:{message}"));
    }

    fn loading_started(&mut self, message: &str, _step: Option<StepId>) {
        self.events.push(format!("loading_started:{message}"));
    }

    fn loading_finished(&mut self) {
        self.events.push("loading_finished".to_string());
    }
}

pub fn success(message: &str) -> Result<AuthResult, BackendError> {
    Ok(AuthResult {
        success: true,
        message: message.to_string(),
    })
}

pub fn failure(message: &str) -> Result<AuthResult, BackendError> {
    Ok(AuthResult {
        success: false,
        message: message.to_string(),
    })
}

pub fn extracted(destination: &Path) -> Result<Extraction, BackendError> {
    Ok(Extraction {
        completed: true,
        destination: Some(destination.to_path_buf()),
    })
}

pub fn credentials() -> Credentials {
    Credentials {
        username: "admin".to_string(),
        password: "changeme1".to_string(),
    }
}
