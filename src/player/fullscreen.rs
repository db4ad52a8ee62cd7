use std::time::Duration;
use tracing::{debug, info, warn};

use crate::platform::{
    ControlSurface, FullscreenStrategy, Platform, Scheduler, TimerId, VisualFlag,
};

/// Fullscreen state machine states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FullscreenState {
    Windowed,
    /// A native request was accepted; waiting to confirm it took effect
    Requested { confirm: TimerId },
    Native,
    /// Full-viewport layout emulation
    Manual,
}

/// Inputs to the fullscreen state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FullscreenEvent {
    /// Fullscreen control pressed
    Toggle,
    /// Escape pressed or explicit exit
    Exit,
    /// Native fullscreen change notification
    NativeChange,
    /// A timer fired
    Timer(TimerId),
}

/// Mutable ports a transition may touch
pub struct FullscreenContext<'a> {
    pub platform: &'a mut dyn Platform,
    pub scheduler: &'a mut dyn Scheduler,
    pub surface: &'a mut dyn ControlSurface,
}

/// Normalizes entering and leaving fullscreen across native APIs and the
/// manual fallback, and keeps the container's full-screen flag equal to
/// "native element present OR manual fallback engaged".
pub struct FullscreenCoordinator {
    strategy: Box<dyn FullscreenStrategy>,
    state: FullscreenState,
    manual: bool,
    flag: bool,
    confirm_delay: Duration,
}

impl FullscreenCoordinator {
    pub fn new(strategy: Box<dyn FullscreenStrategy>, confirm_delay: Duration) -> Self {
        Self {
            strategy,
            state: FullscreenState::Windowed,
            manual: false,
            flag: false,
            confirm_delay,
        }
    }

    pub fn state(&self) -> FullscreenState {
        self.state
    }

    /// Current value of the visual full-screen flag
    pub fn visual_flag(&self) -> bool {
        self.flag
    }

    pub fn manual_engaged(&self) -> bool {
        self.manual
    }

    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    /// Whether either fullscreen path is active or being entered.
    ///
    /// Follows the state only: after `exit` the flag may lag until the
    /// platform reports the native change, and an Escape echoed in that
    /// window must not start another exit.
    pub fn is_fullscreen(&self) -> bool {
        self.state != FullscreenState::Windowed
    }

    /// The single transition function
    pub fn handle(&mut self, event: FullscreenEvent, ctx: &mut FullscreenContext<'_>) {
        match event {
            FullscreenEvent::Toggle => {
                if self.is_fullscreen() {
                    self.exit(ctx);
                } else {
                    self.enter(ctx);
                }
            }
            FullscreenEvent::Exit => {
                if self.is_fullscreen() {
                    self.exit(ctx);
                }
            }
            FullscreenEvent::NativeChange => self.on_native_change(ctx),
            FullscreenEvent::Timer(id) => self.on_confirm_timer(id, ctx),
        }
    }

    /// Whether a fired timer belongs to this coordinator
    pub fn owns_timer(&self, id: TimerId) -> bool {
        matches!(self.state, FullscreenState::Requested { confirm } if confirm == id)
    }

    /// Cancel the confirmation timer, if any (detach)
    pub fn cancel_timer(&mut self, scheduler: &mut dyn Scheduler) {
        if let FullscreenState::Requested { confirm } = self.state {
            scheduler.cancel(confirm);
            self.state = FullscreenState::Windowed;
        }
    }

    fn enter(&mut self, ctx: &mut FullscreenContext<'_>) {
        match self.strategy.request(&mut *ctx.platform) {
            Ok(()) => {
                let confirm = ctx.scheduler.schedule(self.confirm_delay);
                debug!(
                    "Native fullscreen requested via {}, confirming in {:?}",
                    self.strategy.name(),
                    self.confirm_delay
                );
                self.state = FullscreenState::Requested { confirm };
            }
            Err(e) => {
                info!("Native fullscreen unavailable ({}), using manual fallback", e);
                self.engage_manual(ctx);
            }
        }
        self.sync_flag(ctx);
    }

    fn exit(&mut self, ctx: &mut FullscreenContext<'_>) {
        if let FullscreenState::Requested { confirm } = self.state {
            ctx.scheduler.cancel(confirm);
        }
        // Windowed before the synthetic Escape so a re-entrant Escape is a no-op
        self.state = FullscreenState::Windowed;

        // All three unconditionally; only one path is active and each is idempotent
        ctx.platform.dispatch_escape_key();
        if let Err(e) = self.strategy.exit(&mut *ctx.platform) {
            debug!("Native fullscreen exit failed: {}", e);
        }
        ctx.platform.set_manual_fullscreen(false);
        self.manual = false;

        debug!("Left fullscreen");
        self.sync_flag(ctx);
    }

    fn on_native_change(&mut self, ctx: &mut FullscreenContext<'_>) {
        let native = self.strategy.is_active(&*ctx.platform);
        self.state = match (self.state, native) {
            (FullscreenState::Requested { confirm }, true) => {
                ctx.scheduler.cancel(confirm);
                FullscreenState::Native
            }
            // Still waiting; the confirmation timer decides
            (requested @ FullscreenState::Requested { .. }, false) => requested,
            (_, true) => FullscreenState::Native,
            (_, false) if self.manual => FullscreenState::Manual,
            (_, false) => FullscreenState::Windowed,
        };
        debug!("Native fullscreen change, state now {:?}", self.state);
        self.sync_flag(ctx);
    }

    fn on_confirm_timer(&mut self, id: TimerId, ctx: &mut FullscreenContext<'_>) {
        if !self.owns_timer(id) {
            return;
        }
        if self.strategy.is_active(&*ctx.platform) {
            self.state = FullscreenState::Native;
        } else {
            warn!("Native fullscreen request had no effect, engaging manual fallback");
            self.engage_manual(ctx);
        }
        self.sync_flag(ctx);
    }

    fn engage_manual(&mut self, ctx: &mut FullscreenContext<'_>) {
        ctx.platform.set_manual_fullscreen(true);
        self.manual = true;
        self.state = FullscreenState::Manual;
    }

    fn sync_flag(&mut self, ctx: &mut FullscreenContext<'_>) {
        let on = self.strategy.is_active(&*ctx.platform) || self.manual;
        self.flag = on;
        ctx.surface.set_flag(VisualFlag::FullScreen, on);
    }
}
