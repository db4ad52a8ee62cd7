use std::time::Duration;
use tracing::{debug, trace};

use crate::platform::{ControlSurface, Scheduler, TimerId, VisualFlag};

/// Control visibility state machine states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlState {
    /// Controls are hidden until the next qualifying input
    Hidden,
    /// Controls are visible; the hide timer runs when `timer` is set
    Visible { timer: Option<TimerId> },
}

/// Tracks input recency and drives auto-hide of the control surface.
#[derive(Debug)]
pub struct ActivityMonitor {
    state: ControlState,
    hide_delay: Duration,
}

impl ActivityMonitor {
    pub fn new(hide_delay: Duration) -> Self {
        Self {
            state: ControlState::Visible { timer: None },
            hide_delay,
        }
    }

    pub fn state(&self) -> ControlState {
        self.state
    }

    pub fn controls_visible(&self) -> bool {
        !matches!(self.state, ControlState::Hidden)
    }

    pub fn pending_timer(&self) -> Option<TimerId> {
        match self.state {
            ControlState::Visible { timer } => timer,
            ControlState::Hidden => None,
        }
    }

    /// Show the controls and restart the inactivity deadline
    pub fn reveal(&mut self, scheduler: &mut dyn Scheduler, surface: &mut dyn ControlSurface) {
        // Cancel any existing timer first so only one fire is ever pending
        self.cancel_timer(scheduler);

        if !self.controls_visible() {
            debug!("Revealing controls");
        }
        surface.set_flag(VisualFlag::HideControls, false);

        let timer = scheduler.schedule(self.hide_delay);
        trace!("Hide timer {:?} scheduled in {:?}", timer, self.hide_delay);
        self.state = ControlState::Visible { timer: Some(timer) };
    }

    /// Handle a fired timer. `can_hide` is true when the resource is playing
    /// and no scrub is in progress. Returns true if the controls were hidden.
    pub fn on_timer(
        &mut self,
        id: TimerId,
        can_hide: bool,
        surface: &mut dyn ControlSurface,
    ) -> bool {
        if self.pending_timer() != Some(id) {
            return false;
        }

        if !can_hide {
            // Not rescheduled; the next qualifying input restarts the deadline
            trace!("Hide timer fired while paused or scrubbing, keeping controls");
            self.state = ControlState::Visible { timer: None };
            return false;
        }

        debug!("Hiding controls after inactivity");
        self.state = ControlState::Hidden;
        surface.set_flag(VisualFlag::HideControls, true);
        true
    }

    pub fn cancel_timer(&mut self, scheduler: &mut dyn Scheduler) {
        if let ControlState::Visible { timer } = &mut self.state
            && let Some(id) = timer.take()
        {
            scheduler.cancel(id);
        }
    }
}
