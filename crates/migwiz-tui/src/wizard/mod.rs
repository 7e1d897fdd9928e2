mod forms;

use std::path::PathBuf;
use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::Instant;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::text::{Line, Span, Text};

use migwiz_app::migrate::{MigrationOptions, MigrationReport};
use migwiz_core::backend::{AuthResult, BackendError, Extraction};
use migwiz_core::cache::StepCache;
use migwiz_core::credentials::{validate_password, validate_username};
use migwiz_core::diagnostics;
use migwiz_core::guard::{
    LeaveVerdict, MISSING_ARCHIVE_NOTICE, MISSING_CREDENTIALS_NOTICE, evaluate_leave,
};
use migwiz_core::overlay::{LoadingState, OverlayCoordinator};
use migwiz_core::resolver::{
    AUTH_LOADING_MESSAGE, EXTRACT_LOADING_MESSAGE, auth_settlement, extraction_settlement,
};
use migwiz_core::session::{Credentials, SessionState};
use migwiz_core::steps::{RouteNode, StepId, WIZARD_STEPS, route_data};

use crate::WizardExit;
use crate::keymap;
use crate::loader::{JobEvent, JobLoader};
use crate::theme;
use crate::ui::modal::render_notice_modal;
use crate::ui::overlay::{SpinnerState, render_loading_overlay};
use crate::ui::text::{compact_hint, key_hint_paragraph, wrapped_paragraph};
use forms::{ConfigForm, StepForm};

pub(crate) const MIGRATE_LOADING_MESSAGE: &str = "Running migration...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PendingKind {
    Auth { target: StepId },
    Extraction { target: StepId },
    Migration,
}

struct PendingJob {
    kind: PendingKind,
    token: u64,
    receiver: Receiver<JobEvent>,
}

enum Settled {
    Auth(Result<AuthResult, BackendError>),
    Extraction(Result<Extraction, BackendError>),
    Migration(Result<MigrationReport, String>),
}

/// The wizard proper: one live step form, the reuse cache for parked forms,
/// the session, and the bookkeeping for at most one in-flight backend job.
pub(crate) struct WizardScreen {
    session: SessionState,
    current: StepId,
    form: StepForm,
    cache: StepCache<StepForm>,
    overlay: OverlayCoordinator,
    loading: LoadingState,
    spinner: SpinnerState,
    toast: Option<String>,
    report: Option<MigrationReport>,
    migration_entries: usize,
    loader: Box<dyn JobLoader>,
    pending: Option<PendingJob>,
    last_job_token: u64,
}

impl WizardScreen {
    pub(crate) fn new(loader: Box<dyn JobLoader>) -> Self {
        Self {
            session: SessionState::new(),
            current: StepId::Upload,
            form: StepForm::for_step(StepId::Upload),
            cache: StepCache::new(),
            overlay: OverlayCoordinator::new(),
            loading: LoadingState::default(),
            spinner: SpinnerState::default(),
            toast: None,
            report: None,
            migration_entries: 0,
            loader,
            pending: None,
            last_job_token: 0,
        }
    }

    fn next_job_token(&mut self) -> u64 {
        self.last_job_token += 1;
        self.last_job_token
    }

    pub(crate) fn on_tick(&mut self, now: Instant) {
        self.spinner.next_frame();
        self.drain_settlements(now);
        self.overlay.poll(now);
    }

    pub(crate) fn handle_key(&mut self, key: KeyEvent, now: Instant) -> Option<WizardExit> {
        if self.toast.is_some() {
            if keymap::is_confirm(key) || keymap::is_back(key) {
                self.toast = None;
            }
            return None;
        }

        // One job at a time; input resumes once the settlement drains.
        if self.pending.is_some() {
            return None;
        }

        match self.current {
            StepId::Upload => self.handle_upload_key(key, now),
            StepId::Auth => self.handle_auth_key(key, now),
            StepId::Config => self.handle_config_key(key, now),
            StepId::Migrate => self.handle_migrate_key(key, now),
            StepId::Complete => return self.handle_complete_key(key, now),
        }
        None
    }

    fn handle_upload_key(&mut self, key: KeyEvent, now: Instant) {
        if keymap::is_back(key) {
            return;
        }
        if keymap::is_confirm(key) {
            if let StepForm::Upload(form) = &self.form {
                let text = form.path.value().trim().to_string();
                if !text.is_empty() {
                    self.session.stage_archive(PathBuf::from(text));
                }
            }
            self.request_forward(now);
            return;
        }
        self.form.handle_input(key);
    }

    fn handle_auth_key(&mut self, key: KeyEvent, now: Instant) {
        if keymap::is_back(key) {
            self.request_backward(now);
            return;
        }
        if keymap::is_field_switch(key) {
            if let StepForm::Auth(form) = &mut self.form {
                form.switch_focus();
            }
            return;
        }
        if keymap::is_confirm(key) {
            self.submit_credentials(now);
            return;
        }
        self.form.handle_input(key);
    }

    fn handle_config_key(&mut self, key: KeyEvent, now: Instant) {
        if keymap::is_back(key) {
            self.request_backward(now);
            return;
        }
        if let StepForm::Config(form) = &mut self.form {
            if keymap::is_up(key) {
                form.selected = form.selected.saturating_sub(1);
                return;
            }
            if keymap::is_down(key) {
                if form.selected + 1 < ConfigForm::OPTION_COUNT {
                    form.selected += 1;
                }
                return;
            }
            if keymap::is_toggle(key) {
                form.toggle_selected();
                return;
            }
        }
        if keymap::is_confirm(key) {
            self.request_forward(now);
        }
    }

    fn handle_migrate_key(&mut self, key: KeyEvent, now: Instant) {
        if keymap::is_back(key) {
            self.request_backward(now);
            return;
        }
        if keymap::is_confirm(key) {
            self.start_migration(now);
        }
    }

    fn handle_complete_key(&mut self, key: KeyEvent, now: Instant) -> Option<WizardExit> {
        if keymap::is_quit(key) || keymap::is_confirm(key) {
            return Some(WizardExit::Completed);
        }
        if keymap::is_back(key) {
            self.request_backward(now);
        }
        None
    }

    fn submit_credentials(&mut self, now: Instant) {
        let StepForm::Auth(form) = &self.form else {
            return;
        };
        let username = form.username.value().trim().to_string();
        let password = form.password.value().to_string();

        if username.is_empty() || password.is_empty() {
            self.toast = Some(MISSING_CREDENTIALS_NOTICE.to_string());
            return;
        }
        if let Err(error) = validate_username(&username) {
            self.toast = Some(error.to_string());
            return;
        }
        if let Err(error) = validate_password(&password) {
            self.toast = Some(error.to_string());
            return;
        }

        self.session.set_credentials(Credentials { username, password });
        self.request_forward(now);
    }

    /// Leave guard for the current step's forward edge. The navigation
    /// event stream sees the attempt start here and end when the intent
    /// settles, so aborted attempts never flash the overlay.
    fn request_forward(&mut self, now: Instant) {
        let data = route_data(self.current);
        let Some(next) = data.next else {
            return;
        };

        self.overlay.note_navigation(true, now);
        match evaluate_leave(self.current, &data, &next.path(), &self.session) {
            LeaveVerdict::Permit => self.enter_step(next, now),
            LeaveVerdict::Deny { notice } => {
                self.toast = Some(notice);
                self.overlay.note_navigation(false, now);
            }
            LeaveVerdict::RunAuth => self.start_auth(next, now),
        }
    }

    fn request_backward(&mut self, now: Instant) {
        let data = route_data(self.current);
        let Some(previous) = data.previous else {
            return;
        };

        self.overlay.note_navigation(true, now);
        match evaluate_leave(self.current, &data, &previous.path(), &self.session) {
            LeaveVerdict::Permit => self.complete_navigation(previous, now),
            LeaveVerdict::Deny { notice } => {
                self.toast = Some(notice);
                self.overlay.note_navigation(false, now);
            }
            LeaveVerdict::RunAuth => self.start_auth(previous, now),
        }
    }

    /// Entry resolvers: `config` wants authentication, `migrate` wants the
    /// archive extracted. Satisfied preconditions settle synchronously.
    fn enter_step(&mut self, next: StepId, now: Instant) {
        match next {
            StepId::Config if !self.session.is_authenticated() => self.start_auth(next, now),
            StepId::Migrate if self.session.extracted_to().is_none() => {
                self.start_extraction(next, now)
            }
            _ => self.complete_navigation(next, now),
        }
    }

    fn start_auth(&mut self, target: StepId, now: Instant) {
        let Some(credentials) = self.session.credentials().cloned() else {
            self.toast = Some(MISSING_CREDENTIALS_NOTICE.to_string());
            self.overlay.note_navigation(false, now);
            return;
        };

        let token = self.next_job_token();
        self.loading.begin(AUTH_LOADING_MESSAGE, Some(StepId::Auth));
        self.overlay.set_loading(true, now);
        let receiver = self.loader.spawn_auth(credentials, token);
        self.pending = Some(PendingJob {
            kind: PendingKind::Auth { target },
            token,
            receiver,
        });
    }

    fn start_extraction(&mut self, target: StepId, now: Instant) {
        let Some(archive) = self.session.archive().map(PathBuf::from) else {
            self.toast = Some(MISSING_ARCHIVE_NOTICE.to_string());
            self.overlay.note_navigation(false, now);
            return;
        };

        let token = self.next_job_token();
        self.loading
            .begin(EXTRACT_LOADING_MESSAGE, Some(StepId::Migrate));
        self.overlay.set_loading(true, now);
        let receiver = self.loader.spawn_extraction(archive, token);
        self.pending = Some(PendingJob {
            kind: PendingKind::Extraction { target },
            token,
            receiver,
        });
    }

    fn start_migration(&mut self, now: Instant) {
        let Some(staging) = self.session.extracted_to().map(PathBuf::from) else {
            self.toast = Some("Nothing extracted to migrate".to_string());
            return;
        };

        let options = match &self.form {
            StepForm::Config(form) => MigrationOptions {
                verify: form.verify,
                keep_going: form.keep_going,
            },
            _ => self.migration_options_from_cache(),
        };

        let token = self.next_job_token();
        self.migration_entries = 0;
        self.loading
            .begin(MIGRATE_LOADING_MESSAGE, Some(StepId::Migrate));
        self.overlay.set_loading(true, now);
        let receiver = self.loader.spawn_migration(staging, options, token);
        self.pending = Some(PendingJob {
            kind: PendingKind::Migration,
            token,
            receiver,
        });
    }

    fn migration_options_from_cache(&self) -> MigrationOptions {
        let config_route = RouteNode::for_step(StepId::Config);
        match self.cache.retrieve(&config_route) {
            Some(StepForm::Config(form)) => MigrationOptions {
                verify: form.verify,
                keep_going: form.keep_going,
            },
            _ => MigrationOptions::default(),
        }
    }

    fn drain_settlements(&mut self, now: Instant) {
        let Some(job) = self.pending.take() else {
            return;
        };

        let mut settled = None;
        let disconnected = loop {
            match job.receiver.try_recv() {
                Ok(JobEvent::MigrationProgress { token, entries }) if token == job.token => {
                    self.migration_entries = entries;
                }
                Ok(JobEvent::AuthSettled { token, result }) if token == job.token => {
                    settled = Some(Settled::Auth(result));
                }
                Ok(JobEvent::ExtractionSettled { token, result }) if token == job.token => {
                    settled = Some(Settled::Extraction(result));
                }
                Ok(JobEvent::MigrationSettled { token, result }) if token == job.token => {
                    settled = Some(Settled::Migration(result));
                }
                Ok(stale) => {
                    diagnostics::record(format!("wizard: ignoring stale settlement {stale:?}"));
                }
                Err(TryRecvError::Empty) => break false,
                Err(TryRecvError::Disconnected) => break true,
            }
        };

        match settled {
            // The worker hung up without a usable settlement (its only
            // events carried a token we no longer wait for); drop the job
            // so input does not stay blocked on a channel that is closed.
            None if disconnected => {
                diagnostics::record("wizard: job channel closed without a settlement");
                self.loading.finish();
                self.overlay.set_loading(false, now);
                self.overlay.note_navigation(false, now);
            }
            None => self.pending = Some(job),
            Some(Settled::Auth(result)) => {
                let target = match job.kind {
                    PendingKind::Auth { target } => target,
                    _ => self.current,
                };
                self.settle_auth(target, result, now);
            }
            Some(Settled::Extraction(result)) => {
                let target = match job.kind {
                    PendingKind::Extraction { target } => target,
                    _ => self.current,
                };
                self.settle_extraction(target, result, now);
            }
            Some(Settled::Migration(result)) => self.settle_migration(result, now),
        }
    }

    fn settle_auth(&mut self, target: StepId, result: Result<AuthResult, BackendError>, now: Instant) {
        let outcome = auth_settlement(result);
        if outcome.permit {
            self.session.set_authenticated(true);
        }
        if let Some(notice) = outcome.notice {
            self.toast = Some(notice);
        }
        // Finalizer: the loading trigger drops only after the outcome has
        // been applied and surfaced.
        self.loading.finish();
        self.overlay.set_loading(false, now);

        if outcome.permit {
            self.enter_step(target, now);
        } else {
            self.overlay.note_navigation(false, now);
        }
    }

    fn settle_extraction(
        &mut self,
        target: StepId,
        result: Result<Extraction, BackendError>,
        now: Instant,
    ) {
        let destination = result
            .as_ref()
            .ok()
            .and_then(|extraction| extraction.destination.clone());
        let outcome = extraction_settlement(result.map(|extraction| extraction.completed));

        if outcome.permit
            && let Some(destination) = destination
        {
            self.session.mark_extracted(destination);
        }
        if let Some(notice) = outcome.notice {
            self.toast = Some(notice);
        }
        self.loading.finish();
        self.overlay.set_loading(false, now);

        if outcome.permit {
            self.complete_navigation(target, now);
        } else if let Some(redirect) = outcome.redirect {
            self.complete_navigation(redirect, now);
        } else {
            self.overlay.note_navigation(false, now);
        }
    }

    fn settle_migration(&mut self, result: Result<MigrationReport, String>, now: Instant) {
        let navigate = match result {
            Ok(report) => {
                self.report = Some(report);
                true
            }
            Err(message) => {
                self.toast = Some(message);
                false
            }
        };
        self.loading.finish();
        self.overlay.set_loading(false, now);

        if navigate {
            self.request_forward(now);
        }
    }

    /// Switches the live step, parking the outgoing form in the reuse cache
    /// and restoring a previously parked form for the destination.
    fn complete_navigation(&mut self, next: StepId, now: Instant) {
        let leaving = RouteNode::for_step(self.current);
        let entering = RouteNode::for_step(next);

        if self.cache.should_reuse(&entering, &leaving) {
            self.overlay.note_navigation(false, now);
            return;
        }

        let incoming = if self.cache.should_attach(&entering) {
            self.cache.take(&entering)
        } else {
            None
        };

        if self.cache.should_detach(&leaving) {
            let parked = std::mem::replace(
                &mut self.form,
                incoming.unwrap_or_else(|| StepForm::for_step(next)),
            );
            self.cache.store(&leaving, parked);
        } else if let Some(form) = incoming {
            self.form = form;
        }

        self.current = next;
        self.overlay.note_navigation(false, now);
        diagnostics::record(format!("wizard: now at {next}"));
    }

    pub(crate) fn render(&self, frame: &mut Frame<'_>) {
        let area = frame.area();
        let key_text = compact_hint(
            area.width,
            "Enter: continue    Tab: switch field    Space: toggle    Esc: back    Ctrl-C: quit",
            "Enter: continue    Tab: field    Esc: back",
            "Enter continue | Esc back",
        );
        let [header, body, footer] = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Min(8),
                Constraint::Length(3),
            ])
            .areas(area);

        let header_text = Text::from(vec![
            Line::from("migwiz"),
            self.step_ribbon(),
            Line::from(route_data(self.current).description),
        ]);
        frame.render_widget(
            wrapped_paragraph(header_text).block(theme::chrome(self.current.title())),
            header,
        );

        self.form.render(
            frame,
            body,
            &self.session,
            self.report.as_ref(),
            self.migration_entries,
        );

        frame.render_widget(key_hint_paragraph(key_text).block(theme::key_block()), footer);

        if let Some(message) = self.toast.as_deref() {
            render_notice_modal(frame, "Notice", message, "Enter/Esc: continue");
        }

        if self.overlay.visible() {
            render_loading_overlay(frame, &self.loading.message, &self.spinner);
        }
    }

    fn step_ribbon(&self) -> Line<'static> {
        let mut spans = Vec::new();
        let current_index = WIZARD_STEPS
            .iter()
            .position(|step| *step == self.current)
            .unwrap_or(0);

        for (index, step) in WIZARD_STEPS.into_iter().enumerate() {
            if index > 0 {
                spans.push(Span::raw(" > "));
            }
            let style = if index < current_index {
                theme::step_done()
            } else if index == current_index {
                theme::step_current()
            } else {
                theme::step_pending()
            };
            spans.push(Span::styled(step.segment().to_string(), style));
        }

        Line::from(spans)
    }
}
