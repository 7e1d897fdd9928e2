use ratatui::Frame;
use ratatui::text::{Line, Text};

use crate::theme;
use crate::ui::modal::{ModalSpec, render_modal};

const FRAMES: [&str; 8] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧"];

#[derive(Debug, Clone, Default)]
pub(crate) struct SpinnerState {
    frame_index: usize,
}

impl SpinnerState {
    pub(crate) fn next_frame(&mut self) {
        self.frame_index = (self.frame_index + 1) % FRAMES.len();
    }

    fn current_frame(&self) -> &'static str {
        FRAMES[self.frame_index]
    }
}

/// Full-screen busy indicator; shown whenever the overlay coordinator
/// reports visible. The message comes from the shared loading state and
/// falls back to a generic line while a navigation settles.
pub(crate) fn render_loading_overlay(frame: &mut Frame<'_>, message: &str, spinner: &SpinnerState) {
    let shown = if message.is_empty() {
        "Working..."
    } else {
        message
    };
    let body = Text::from(vec![
        Line::from(""),
        Line::from(format!("{} {}", spinner.current_frame(), shown)),
    ]);
    render_modal(
        frame,
        ModalSpec {
            title: "Please wait",
            title_style: Some(theme::focus_prompt()),
            body,
            key_hint: None,
            width_pct: 60,
            height_pct: 30,
        },
    );
}

#[cfg(test)]
mod tests {
    use super::{FRAMES, SpinnerState};

    #[test]
    fn spinner_wraps_around_the_frame_set() {
        let mut spinner = SpinnerState::default();
        for _ in 0..FRAMES.len() {
            spinner.next_frame();
        }
        assert_eq!(spinner.current_frame(), FRAMES[0]);
    }
}
