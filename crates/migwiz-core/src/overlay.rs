use std::time::{Duration, Instant};

use crate::steps::StepId;

/// Raw navigation events are held back this long so aborted or instant
/// transitions never reach the overlay.
pub const NAVIGATION_EVENT_DELAY: Duration = Duration::from_millis(100);

/// Once shown, the overlay stays visible at least this long after the last
/// trigger clears, so fast operations do not flash a one-frame spinner.
pub const MINIMUM_VISIBLE: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadingState {
    pub is_loading: bool,
    pub message: String,
    pub associated_step: Option<StepId>,
}

impl LoadingState {
    pub fn begin(&mut self, message: &str, associated_step: Option<StepId>) {
        self.is_loading = true;
        self.message = message.to_string();
        self.associated_step = associated_step;
    }

    pub fn finish(&mut self) {
        self.is_loading = false;
        self.message.clear();
        self.associated_step = None;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OverlayPhase {
    Hidden,
    Showing,
    HidingPending { deadline: Instant },
}

/// Merges router activity and the explicit loading flag into one visibility
/// signal: show at once when either source is active, hide only after
/// `MINIMUM_VISIBLE` has elapsed with both sources quiet. A trigger that
/// returns during the hide window abandons the pending hide.
#[derive(Debug)]
pub struct OverlayCoordinator {
    phase: OverlayPhase,
    navigating: bool,
    loading: bool,
    pending_navigation: Option<(bool, Instant)>,
}

impl OverlayCoordinator {
    pub fn new() -> Self {
        Self {
            phase: OverlayPhase::Hidden,
            navigating: false,
            loading: false,
            pending_navigation: None,
        }
    }

    pub fn note_navigation(&mut self, active: bool, now: Instant) {
        if self.pending_navigation.is_none() && active == self.navigating {
            self.apply(now);
            return;
        }
        self.pending_navigation = Some((active, now));
        self.apply(now);
    }

    pub fn set_loading(&mut self, active: bool, now: Instant) {
        self.loading = active;
        self.apply(now);
    }

    pub fn poll(&mut self, now: Instant) -> bool {
        self.apply(now);
        self.visible()
    }

    pub fn visible(&self) -> bool {
        !matches!(self.phase, OverlayPhase::Hidden)
    }

    fn apply(&mut self, now: Instant) {
        if let Some((value, at)) = self.pending_navigation
            && now >= at + NAVIGATION_EVENT_DELAY
        {
            self.navigating = value;
            self.pending_navigation = None;
        }

        let trigger = self.navigating || self.loading;
        self.phase = match (self.phase, trigger) {
            (OverlayPhase::Hidden, true) => OverlayPhase::Showing,
            (OverlayPhase::Showing, false) => OverlayPhase::HidingPending {
                deadline: now + MINIMUM_VISIBLE,
            },
            (OverlayPhase::HidingPending { .. }, true) => OverlayPhase::Showing,
            (OverlayPhase::HidingPending { deadline }, false) if now >= deadline => {
                OverlayPhase::Hidden
            }
            (phase, _) => phase,
        };
    }
}

impl Default for OverlayCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(base: Instant, millis: u64) -> Instant {
        base + Duration::from_millis(millis)
    }

    #[test]
    fn explicit_loading_shows_immediately() {
        let base = Instant::now();
        let mut overlay = OverlayCoordinator::new();

        assert!(!overlay.poll(base));
        overlay.set_loading(true, base);
        assert!(overlay.visible());
    }

    #[test]
    fn hide_waits_for_the_minimum_dwell() {
        let base = Instant::now();
        let mut overlay = OverlayCoordinator::new();

        overlay.set_loading(true, base);
        overlay.set_loading(false, base);

        assert!(overlay.poll(at(base, 100)));
        assert!(overlay.poll(at(base, 499)));
        assert!(!overlay.poll(at(base, 500)));
    }

    #[test]
    fn retrigger_during_the_hide_window_abandons_the_pending_hide() {
        let base = Instant::now();
        let mut overlay = OverlayCoordinator::new();

        overlay.set_loading(true, base);
        overlay.set_loading(false, base);
        overlay.set_loading(true, at(base, 200));

        assert!(overlay.poll(at(base, 450)));
        assert!(overlay.poll(at(base, 700)));
        assert!(overlay.poll(at(base, 5_000)));
    }

    #[test]
    fn each_hide_episode_gets_a_fresh_deadline() {
        let base = Instant::now();
        let mut overlay = OverlayCoordinator::new();

        overlay.set_loading(true, base);
        overlay.set_loading(false, base);
        overlay.set_loading(true, at(base, 200));
        overlay.set_loading(false, at(base, 300));

        assert!(overlay.poll(at(base, 600)));
        assert!(!overlay.poll(at(base, 800)));
    }

    #[test]
    fn navigation_events_are_delayed_before_showing() {
        let base = Instant::now();
        let mut overlay = OverlayCoordinator::new();

        overlay.note_navigation(true, base);
        assert!(!overlay.poll(at(base, 50)));
        assert!(overlay.poll(at(base, 100)));
    }

    #[test]
    fn a_navigation_aborted_within_the_delay_never_shows() {
        let base = Instant::now();
        let mut overlay = OverlayCoordinator::new();

        overlay.note_navigation(true, base);
        overlay.note_navigation(false, at(base, 50));

        assert!(!overlay.poll(at(base, 80)));
        assert!(!overlay.poll(at(base, 200)));
        assert!(!overlay.poll(at(base, 1_000)));
    }

    #[test]
    fn navigation_end_still_respects_the_minimum_dwell() {
        let base = Instant::now();
        let mut overlay = OverlayCoordinator::new();

        overlay.note_navigation(true, base);
        assert!(overlay.poll(at(base, 150)));

        overlay.note_navigation(false, at(base, 150));
        assert!(overlay.poll(at(base, 300)));

        // Nav-end lands at t=250; the dwell runs from the moment the
        // combined trigger actually turned false.
        assert!(overlay.poll(at(base, 700)));
        assert!(!overlay.poll(at(base, 800)));
    }

    #[test]
    fn sources_interleave_without_flicker() {
        let base = Instant::now();
        let mut overlay = OverlayCoordinator::new();

        overlay.note_navigation(true, base);
        overlay.set_loading(true, at(base, 20));
        assert!(overlay.visible());

        overlay.note_navigation(false, at(base, 120));
        assert!(overlay.poll(at(base, 260)));

        overlay.set_loading(false, at(base, 300));
        assert!(overlay.poll(at(base, 790)));
        assert!(!overlay.poll(at(base, 800)));
    }

    #[test]
    fn duplicate_navigation_values_are_suppressed() {
        let base = Instant::now();
        let mut overlay = OverlayCoordinator::new();

        overlay.note_navigation(false, base);
        assert_eq!(overlay.pending_navigation, None);

        overlay.note_navigation(true, base);
        overlay.poll(at(base, 100));
        overlay.note_navigation(true, at(base, 150));
        assert_eq!(overlay.pending_navigation, None);
        assert!(overlay.visible());
    }
}
