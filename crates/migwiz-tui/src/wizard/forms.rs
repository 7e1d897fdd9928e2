use crossterm::event::{Event, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span, Text};
use tui_input::Input;
use tui_input::backend::crossterm::EventHandler;

use migwiz_app::migrate::MigrationReport;
use migwiz_core::session::SessionState;
use migwiz_core::steps::StepId;

use crate::theme;
use crate::ui::text::{focus_line, label_value_line, wrapped_paragraph, yes_no};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AuthField {
    Username,
    Password,
}

#[derive(Debug, Default)]
pub(crate) struct UploadForm {
    pub(crate) path: Input,
}

impl Default for AuthField {
    fn default() -> Self {
        Self::Username
    }
}

#[derive(Debug, Default)]
pub(crate) struct AuthForm {
    pub(crate) username: Input,
    pub(crate) password: Input,
    pub(crate) focus: AuthField,
}

impl AuthForm {
    pub(crate) fn switch_focus(&mut self) {
        self.focus = match self.focus {
            AuthField::Username => AuthField::Password,
            AuthField::Password => AuthField::Username,
        };
    }
}

#[derive(Debug, Default)]
pub(crate) struct ConfigForm {
    pub(crate) verify: bool,
    pub(crate) keep_going: bool,
    pub(crate) selected: usize,
}

impl ConfigForm {
    pub(crate) const OPTION_COUNT: usize = 2;

    pub(crate) fn toggle_selected(&mut self) {
        match self.selected {
            0 => self.verify = !self.verify,
            _ => self.keep_going = !self.keep_going,
        }
    }
}

#[derive(Debug)]
pub(crate) enum StepForm {
    Upload(UploadForm),
    Auth(AuthForm),
    Config(ConfigForm),
    Migrate,
    Complete,
}

impl StepForm {
    pub(crate) fn for_step(step: StepId) -> Self {
        match step {
            StepId::Upload => Self::Upload(UploadForm::default()),
            StepId::Auth => Self::Auth(AuthForm::default()),
            StepId::Config => Self::Config(ConfigForm::default()),
            StepId::Migrate => Self::Migrate,
            StepId::Complete => Self::Complete,
        }
    }

    pub(crate) fn handle_input(&mut self, key: KeyEvent) {
        match self {
            Self::Upload(form) => {
                form.path.handle_event(&Event::Key(key));
            }
            Self::Auth(form) => match form.focus {
                AuthField::Username => {
                    form.username.handle_event(&Event::Key(key));
                }
                AuthField::Password => {
                    form.password.handle_event(&Event::Key(key));
                }
            },
            Self::Config(_) | Self::Migrate | Self::Complete => {}
        }
    }

    pub(crate) fn render(
        &self,
        frame: &mut Frame<'_>,
        area: Rect,
        session: &SessionState,
        report: Option<&MigrationReport>,
        migration_entries: usize,
    ) {
        match self {
            Self::Upload(form) => render_upload(frame, area, form, session),
            Self::Auth(form) => render_auth(frame, area, form),
            Self::Config(form) => render_config(frame, area, form),
            Self::Migrate => render_migrate(frame, area, session, migration_entries),
            Self::Complete => render_complete(frame, area, report),
        }
    }
}

fn render_upload(frame: &mut Frame<'_>, area: Rect, form: &UploadForm, session: &SessionState) {
    let [prompt, input, status] = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(3),
            Constraint::Min(2),
        ])
        .areas(area);

    frame.render_widget(
        wrapped_paragraph(focus_line("Path to the archive to migrate")),
        prompt,
    );
    frame.render_widget(
        wrapped_paragraph(form.path.value().to_string()).block(theme::chrome("Archive")),
        input,
    );

    let staged = match session.archive() {
        Some(path) => label_value_line("staged", path.display().to_string()),
        None => label_value_line("staged", "nothing yet"),
    };
    frame.render_widget(wrapped_paragraph(Text::from(vec![staged])), status);
}

fn render_auth(frame: &mut Frame<'_>, area: Rect, form: &AuthForm) {
    let [prompt, username, password] = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(3),
            Constraint::Min(3),
        ])
        .areas(area);

    frame.render_widget(
        wrapped_paragraph(focus_line("Sign in to the migration service")),
        prompt,
    );

    let username_title = match form.focus {
        AuthField::Username => focus_line("Username"),
        AuthField::Password => Line::from("Username"),
    };
    frame.render_widget(
        wrapped_paragraph(form.username.value().to_string()).block(theme::chrome(username_title)),
        username,
    );

    let password_title = match form.focus {
        AuthField::Password => focus_line("Password"),
        AuthField::Username => Line::from("Password"),
    };
    let masked = "*".repeat(form.password.value().chars().count());
    frame.render_widget(
        wrapped_paragraph(masked).block(theme::chrome(password_title)),
        password,
    );
}

fn render_config(frame: &mut Frame<'_>, area: Rect, form: &ConfigForm) {
    let selected_marker = |index: usize| if form.selected == index { "> " } else { "  " };
    let body = Text::from(vec![
        focus_line("Migration options"),
        Line::from(""),
        Line::from(format!(
            "{}Verify entries after migration: {}",
            selected_marker(0),
            yes_no(form.verify)
        )),
        Line::from(format!(
            "{}Keep going past broken entries: {}",
            selected_marker(1),
            yes_no(form.keep_going)
        )),
    ]);
    frame.render_widget(wrapped_paragraph(body), area);
}

fn render_migrate(
    frame: &mut Frame<'_>,
    area: Rect,
    session: &SessionState,
    migration_entries: usize,
) {
    let staging = session
        .extracted_to()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "UNCONFIRMED".to_string());
    let body = Text::from(vec![
        focus_line("Run the migration job"),
        Line::from(""),
        label_value_line("staging", staging),
        label_value_line("entries migrated so far", migration_entries.to_string()),
        Line::from(""),
        Line::from("Press Enter to start."),
    ]);
    frame.render_widget(wrapped_paragraph(body), area);
}

fn render_complete(frame: &mut Frame<'_>, area: Rect, report: Option<&MigrationReport>) {
    let heading = match report {
        Some(_) => Line::from(Span::styled(
            "Migration complete".to_string(),
            theme::success_prompt(),
        )),
        None => focus_line("Migration results"),
    };
    let mut lines = vec![heading, Line::from("")];
    match report {
        Some(report) => {
            lines.push(label_value_line("started", report.started_at.clone()));
            lines.push(label_value_line("finished", report.finished_at.clone()));
            lines.push(label_value_line(
                "entries",
                report.entries_migrated.to_string(),
            ));
            lines.push(label_value_line("bytes", report.bytes_migrated.to_string()));
            if report.warnings.is_empty() {
                lines.push(label_value_line("warnings", "none"));
            } else {
                lines.push(label_value_line("warnings", report.warnings.len().to_string()));
                for warning in &report.warnings {
                    lines.push(Line::from(format!("  {warning}")));
                }
            }
        }
        None => lines.push(Line::from("No migration has run yet.")),
    }
    frame.render_widget(wrapped_paragraph(Text::from(lines)), area);
}
