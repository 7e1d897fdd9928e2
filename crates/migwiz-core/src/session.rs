use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    credentials: Option<Credentials>,
    authenticated: bool,
    archive: Option<PathBuf>,
    extracted_to: Option<PathBuf>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    pub fn set_credentials(&mut self, credentials: Credentials) {
        self.credentials = Some(credentials);
        self.authenticated = false;
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn set_authenticated(&mut self, value: bool) {
        self.authenticated = value;
    }

    pub fn archive(&self) -> Option<&Path> {
        self.archive.as_deref()
    }

    pub fn stage_archive(&mut self, path: PathBuf) {
        self.archive = Some(path);
        self.extracted_to = None;
    }

    pub fn extracted_to(&self) -> Option<&Path> {
        self.extracted_to.as_deref()
    }

    pub fn mark_extracted(&mut self, staging_dir: PathBuf) {
        self.extracted_to = Some(staging_dir);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn setting_credentials_invalidates_prior_authentication() {
        let mut session = SessionState::new();
        session.set_credentials(Credentials {
            username: "admin".to_string(),
            password: "changeme1".to_string(),
        });
        session.set_authenticated(true);

        session.set_credentials(Credentials {
            username: "operator".to_string(),
            password: "changeme2".to_string(),
        });
        assert!(!session.is_authenticated());
    }

    #[test]
    fn staging_a_new_archive_clears_the_extraction_marker() {
        let mut session = SessionState::new();
        session.stage_archive(PathBuf::from("/tmp/export.zip"));
        session.mark_extracted(PathBuf::from("/tmp/staging"));
        assert!(session.extracted_to().is_some());

        session.stage_archive(PathBuf::from("/tmp/other.zip"));
        assert!(session.extracted_to().is_none());
    }

    #[test]
    fn reset_clears_every_field() {
        let mut session = SessionState::new();
        session.set_credentials(Credentials {
            username: "admin".to_string(),
            password: "changeme1".to_string(),
        });
        session.set_authenticated(true);
        session.stage_archive(PathBuf::from("/tmp/export.zip"));

        session.reset();
        assert_eq!(session, SessionState::default());
    }
}
