use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver};

use migwiz_app::App;
use migwiz_app::migrate::{MigrationOptions, MigrationReport};
use migwiz_core::backend::{
    ArchiveExtractor, ArchiveFileExtractor, AuthResult, Authenticator, BackendError, Extraction,
    SimulatedAuthenticator,
};
use migwiz_core::config::MigwizConfig;
use migwiz_core::session::{Credentials, SessionState};

#[derive(Debug)]
pub(crate) enum JobEvent {
    AuthSettled {
        token: u64,
        result: Result<AuthResult, BackendError>,
    },
    ExtractionSettled {
        token: u64,
        result: Result<Extraction, BackendError>,
    },
    MigrationProgress {
        token: u64,
        entries: usize,
    },
    MigrationSettled {
        token: u64,
        result: Result<MigrationReport, String>,
    },
}

/// Runs backend work off the render loop. Every spawned job carries the
/// caller's token; settlements are matched against the current token on
/// drain so superseded jobs cannot affect a newer navigation intent.
pub(crate) trait JobLoader: Send + Sync {
    fn spawn_auth(&self, credentials: Credentials, token: u64) -> Receiver<JobEvent>;

    fn spawn_extraction(&self, archive: PathBuf, token: u64) -> Receiver<JobEvent>;

    fn spawn_migration(
        &self,
        staging: PathBuf,
        options: MigrationOptions,
        token: u64,
    ) -> Receiver<JobEvent>;
}

pub(crate) struct SystemJobLoader {
    config: MigwizConfig,
}

impl SystemJobLoader {
    pub(crate) fn new(config: MigwizConfig) -> Self {
        Self { config }
    }
}

impl JobLoader for SystemJobLoader {
    fn spawn_auth(&self, credentials: Credentials, token: u64) -> Receiver<JobEvent> {
        let (sender, receiver) = mpsc::channel();
        let service = self.config.service.clone();
        std::thread::spawn(move || {
            let authenticator = SimulatedAuthenticator::from_config(&service);
            let result = authenticator.authenticate(&credentials);
            let _ = sender.send(JobEvent::AuthSettled { token, result });
        });
        receiver
    }

    fn spawn_extraction(&self, archive: PathBuf, token: u64) -> Receiver<JobEvent> {
        let (sender, receiver) = mpsc::channel();
        let archive_config = self.config.archive.clone();
        std::thread::spawn(move || {
            let extractor = ArchiveFileExtractor::from_config(&archive_config);
            let result = extractor.extract(&archive);
            let _ = sender.send(JobEvent::ExtractionSettled { token, result });
        });
        receiver
    }

    fn spawn_migration(
        &self,
        staging: PathBuf,
        options: MigrationOptions,
        token: u64,
    ) -> Receiver<JobEvent> {
        let (sender, receiver) = mpsc::channel();
        let config = self.config.clone();
        std::thread::spawn(move || {
            let authenticator = SimulatedAuthenticator::from_config(&config.service);
            let extractor = ArchiveFileExtractor::from_config(&config.archive);
            let app = App::new(&authenticator, &extractor);

            let mut session = SessionState::new();
            session.mark_extracted(staging);

            let mut entries = 0usize;
            let progress_sender = sender.clone();
            let result = app
                .run_migration(&session, &options, &mut |_| {
                    entries += 1;
                    let _ = progress_sender.send(JobEvent::MigrationProgress { token, entries });
                })
                .map_err(|error| format!("{error:#}"));

            let _ = sender.send(JobEvent::MigrationSettled { token, result });
        });
        receiver
    }
}
