use tracing::debug;

use crate::platform::TimelineBounds;

/// Drag-to-seek state
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrubState {
    Idle,
    Scrubbing {
        was_paused_before_scrub: bool,
        /// Projected position in `[0, 1]`
        position: f64,
    },
}

/// Result of releasing a drag: where to seek and whether to resume
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrubCommit {
    pub position: f64,
    pub resume: bool,
}

/// Project a pointer x position onto the timeline, as a fraction in `[0, 1]`
pub fn project(pointer_x: f64, bounds: TimelineBounds) -> f64 {
    if !bounds.width.is_finite()
        || bounds.width <= 0.0
        || !bounds.left.is_finite()
        || !pointer_x.is_finite()
    {
        return 0.0;
    }
    (pointer_x - bounds.left).clamp(0.0, bounds.width) / bounds.width
}

/// Owns the timeline drag. While scrubbing, only the projected position
/// moves; the resource's time is written once, on release.
#[derive(Debug)]
pub struct ScrubController {
    state: ScrubState,
}

impl Default for ScrubController {
    fn default() -> Self {
        Self {
            state: ScrubState::Idle,
        }
    }
}

impl ScrubController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ScrubState {
        self.state
    }

    pub fn is_scrubbing(&self) -> bool {
        matches!(self.state, ScrubState::Scrubbing { .. })
    }

    pub fn position(&self) -> Option<f64> {
        match self.state {
            ScrubState::Scrubbing { position, .. } => Some(position),
            ScrubState::Idle => None,
        }
    }

    /// Play state captured when the drag started
    pub fn was_paused_before_scrub(&self) -> Option<bool> {
        match self.state {
            ScrubState::Scrubbing {
                was_paused_before_scrub,
                ..
            } => Some(was_paused_before_scrub),
            ScrubState::Idle => None,
        }
    }

    /// Start a drag. Returns false if one is already in progress.
    pub fn begin(&mut self, position: f64, was_paused: bool) -> bool {
        if self.is_scrubbing() {
            return false;
        }
        debug!("Scrub started at {:.3} (was paused: {})", position, was_paused);
        self.state = ScrubState::Scrubbing {
            was_paused_before_scrub: was_paused,
            position: position.clamp(0.0, 1.0),
        };
        true
    }

    /// Move the projected position. Returns the new position while scrubbing.
    pub fn update(&mut self, new_position: f64) -> Option<f64> {
        if let ScrubState::Scrubbing { position, .. } = &mut self.state {
            *position = new_position.clamp(0.0, 1.0);
            return Some(*position);
        }
        None
    }

    /// Release the drag. Only the first release of a drag yields a commit.
    pub fn finish(&mut self) -> Option<ScrubCommit> {
        match std::mem::replace(&mut self.state, ScrubState::Idle) {
            ScrubState::Scrubbing {
                was_paused_before_scrub,
                position,
            } => {
                debug!("Scrub committed at {:.3}", position);
                Some(ScrubCommit {
                    position,
                    resume: !was_paused_before_scrub,
                })
            }
            ScrubState::Idle => None,
        }
    }

    /// Abandon the drag without committing. Returns the captured play state.
    pub fn cancel(&mut self) -> Option<bool> {
        let was_paused = self.was_paused_before_scrub();
        if was_paused.is_some() {
            debug!("Scrub cancelled");
        }
        self.state = ScrubState::Idle;
        was_paused
    }
}
