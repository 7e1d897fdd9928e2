use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Style;
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::Clear;

use crate::centered_rect;
use crate::theme;
use crate::ui::text::{key_hint_paragraph, wrapped_paragraph};

pub(crate) struct ModalSpec<'a> {
    pub(crate) title: &'a str,
    pub(crate) title_style: Option<Style>,
    pub(crate) body: Text<'a>,
    pub(crate) key_hint: Option<&'a str>,
    pub(crate) width_pct: u16,
    pub(crate) height_pct: u16,
}

pub(crate) fn render_modal(frame: &mut Frame<'_>, spec: ModalSpec<'_>) {
    let area = centered_rect(spec.width_pct, spec.height_pct, frame.area());
    let title = if let Some(style) = spec.title_style {
        Line::from(Span::styled(spec.title.to_string(), style))
    } else {
        Line::from(spec.title.to_string())
    };

    frame.render_widget(Clear, area);

    match spec.key_hint {
        Some(key_hint) => {
            let [body_area, key_area] = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(3), Constraint::Length(3)])
                .areas(area);
            frame.render_widget(
                wrapped_paragraph(spec.body).block(theme::chrome(title)),
                body_area,
            );
            frame.render_widget(
                key_hint_paragraph(key_hint).block(theme::key_block()),
                key_area,
            );
        }
        None => {
            frame.render_widget(wrapped_paragraph(spec.body).block(theme::chrome(title)), area);
        }
    }
}

pub(crate) fn render_notice_modal(frame: &mut Frame<'_>, title: &str, message: &str, footer: &str) {
    render_modal(
        frame,
        ModalSpec {
            title,
            title_style: Some(theme::focus_prompt()),
            body: text_from_message(message),
            key_hint: Some(footer),
            width_pct: 72,
            height_pct: 42,
        },
    );
}

fn text_from_message(message: &str) -> Text<'static> {
    let base = message.trim_end();
    let lines: Vec<Line<'static>> = if base.is_empty() {
        vec![Line::from("")]
    } else {
        base.lines().map(|line| Line::from(line.to_string())).collect()
    };
    Text::from(lines)
}
