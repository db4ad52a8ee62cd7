use tracing::{debug, info, trace, warn};

use super::activity::ActivityMonitor;
use super::duration::DurationResolver;
use super::events::{ControlAction, InputEvent, Key, MediaEvent, SessionEvent, Target};
use super::fullscreen::{FullscreenContext, FullscreenCoordinator, FullscreenEvent, FullscreenState};
use super::probe::{DurationProbe, NullProbe};
use super::scrub::{self, ScrubController};
use super::settings::{SettingsEffect, SettingsPanelController};
use super::source::SourceDescriptor;
use super::volume::VolumeControl;
use crate::config::Config;
use crate::platform::{
    CapabilityProbe, ControlSurface, MediaElement, MiniPlayerStrategy, Notice, Platform,
    Scheduler, TimeLabel, TimerId, VisualFlag,
};
use crate::utils::format_duration;

/// Everything the page hands over when the controls attach
pub struct SessionPorts {
    pub media: Box<dyn MediaElement>,
    pub surface: Box<dyn ControlSurface>,
    pub platform: Box<dyn Platform>,
    pub scheduler: Box<dyn Scheduler>,
    pub probe: Box<dyn DurationProbe>,
}

/// Position and play state to restore once a reloaded source is ready
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RestorePoint {
    pub seek_to: f64,
    pub was_playing: bool,
}

/// Top-level playback controller for one attached player.
///
/// Owns every piece of mutable control state (scrub, hide timer, header
/// duration, fullscreen, pending restore) so several players can live on
/// one page. It is the only component that drives the media element's
/// play/pause/seek on behalf of the user.
pub struct PlayerSession {
    media: Box<dyn MediaElement>,
    surface: Box<dyn ControlSurface>,
    platform: Box<dyn Platform>,
    scheduler: Box<dyn Scheduler>,
    probe: Box<dyn DurationProbe>,

    activity: ActivityMonitor,
    scrub: ScrubController,
    fullscreen: FullscreenCoordinator,
    duration: DurationResolver,
    settings: SettingsPanelController,
    volume: VolumeControl,
    mini_player: Box<dyn MiniPlayerStrategy>,

    touch: bool,
    seek_step: f64,
    loading: bool,
    fatal_error: bool,
    mini_player_active: bool,
    /// Whether the controls were hidden when the current pointer gesture began
    hidden_at_gesture_start: bool,
    pending_restore: Option<RestorePoint>,
    attached: bool,
}

impl PlayerSession {
    /// Attach to an already-present media element and UI.
    pub fn attach(ports: SessionPorts, config: &Config) -> Self {
        let SessionPorts {
            media,
            surface,
            platform,
            scheduler,
            probe,
        } = ports;

        let capabilities = CapabilityProbe::detect(platform.as_ref());
        let probe: Box<dyn DurationProbe> = if capabilities.header_probe {
            probe
        } else {
            Box::new(NullProbe)
        };

        let mut session = Self {
            media,
            surface,
            platform,
            scheduler,
            probe,
            activity: ActivityMonitor::new(config.controls.hide_delay()),
            scrub: ScrubController::new(),
            fullscreen: FullscreenCoordinator::new(
                capabilities.fullscreen,
                config.controls.fullscreen_confirm_delay(),
            ),
            duration: DurationResolver::new(),
            settings: SettingsPanelController::new(&config.playback),
            volume: VolumeControl::new(config.playback.low_volume_threshold),
            mini_player: capabilities.mini_player,
            touch: capabilities.touch,
            seek_step: config.controls.seek_step_secs,
            loading: false,
            fatal_error: false,
            mini_player_active: false,
            hidden_at_gesture_start: false,
            pending_restore: None,
            attached: true,
        };

        session.sync_all();

        let src = session.media.src();
        if !src.trim().is_empty() {
            session.probe.request(&src, session.duration.generation());
        }
        session.reveal_controls();

        info!(
            "Player session attached (fullscreen: {}, touch: {})",
            session.fullscreen.strategy_name(),
            session.touch
        );
        session
    }

    /// Cancel every timer and pending one-shot; later events are ignored.
    pub fn detach(&mut self) {
        if !self.attached {
            return;
        }
        self.activity.cancel_timer(self.scheduler.as_mut());
        self.fullscreen.cancel_timer(self.scheduler.as_mut());
        if self.scrub.cancel().is_some() {
            self.surface.set_flag(VisualFlag::Scrubbing, false);
        }
        self.pending_restore = None;
        self.probe.cancel();
        self.duration.invalidate();
        self.attached = false;
        info!("Player session detached");
    }

    /// Single entry point for every notification and input
    pub fn dispatch(&mut self, event: SessionEvent) {
        if !self.attached {
            trace!("Ignoring {:?} on detached session", event);
            return;
        }
        match event {
            SessionEvent::Media(event) => self.handle_media_event(event),
            SessionEvent::Input(input) => {
                self.handle_input(input);
            }
            SessionEvent::Control(action) => self.handle_control(action),
            SessionEvent::FullscreenChanged => self.drive_fullscreen(FullscreenEvent::NativeChange),
            SessionEvent::TimerFired(id) => self.handle_timer(id),
            SessionEvent::DurationProbed {
                generation,
                seconds,
            } => self.handle_probe_result(generation, seconds),
            SessionEvent::Detach => self.detach(),
        }
    }

    // === Accessors ===

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn media(&self) -> &dyn MediaElement {
        self.media.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_scrubbing(&self) -> bool {
        self.scrub.is_scrubbing()
    }

    pub fn controls_visible(&self) -> bool {
        self.activity.controls_visible()
    }

    pub fn fullscreen_state(&self) -> FullscreenState {
        self.fullscreen.state()
    }

    pub fn fullscreen_flag(&self) -> bool {
        self.fullscreen.visual_flag()
    }

    pub fn mini_player_active(&self) -> bool {
        self.mini_player_active
    }

    pub fn pending_restore(&self) -> Option<RestorePoint> {
        self.pending_restore
    }

    pub fn settings(&self) -> &SettingsPanelController {
        &self.settings
    }

    /// Duration currently shown as the total time, if known
    pub fn known_duration(&self) -> Option<f64> {
        self.duration.peek(self.media.duration())
    }

    // === Playback ===

    /// Flip between playing and paused.
    ///
    /// Does nothing without a usable source or after a fatal resource error.
    pub fn toggle_play(&mut self) {
        if !self.can_control_playback() {
            debug!("Ignoring play toggle: no playable source");
            return;
        }
        if self.media.is_paused() {
            self.start_playback();
        } else {
            self.media.pause();
            self.sync_paused_flag();
        }
    }

    /// A click or tap on the video surface.
    ///
    /// On touch devices, or when the controls were hidden, the tap only
    /// brings the controls back.
    pub fn handle_tap(&mut self, target: Target) {
        if target != Target::Video {
            return;
        }
        let was_hidden = self.hidden_at_gesture_start || !self.activity.controls_visible();
        self.hidden_at_gesture_start = false;

        if self.touch || was_hidden {
            self.reveal_controls();
            return;
        }
        self.toggle_play();
    }

    /// Route raw input. Returns true when a key was consumed and its default
    /// browser action should be suppressed.
    pub fn handle_input(&mut self, input: InputEvent) -> bool {
        if matches!(input, InputEvent::PointerDown { .. } | InputEvent::Touch { .. }) {
            self.hidden_at_gesture_start = !self.activity.controls_visible();
        }
        if input.is_activity() {
            self.reveal_controls();
        }

        match input {
            InputEvent::PointerDown { x, target } => {
                self.settings.on_pointer_down(target, self.surface.as_mut());
                if target == Target::Timeline {
                    self.begin_scrub(x);
                }
                false
            }
            InputEvent::PointerMove { x, .. } => {
                if self.scrub.is_scrubbing() {
                    self.update_scrub(x);
                }
                false
            }
            InputEvent::PointerUp { x, .. } => {
                self.finish_scrub(x);
                false
            }
            InputEvent::Touch { .. } | InputEvent::Wheel { .. } => false,
            InputEvent::Key { key, target } => self.handle_key(key, target),
            InputEvent::Tap { target } => {
                self.handle_tap(target);
                false
            }
        }
    }

    fn handle_key(&mut self, key: Key, target: Target) -> bool {
        if key == Key::Escape {
            if self.fullscreen.is_fullscreen() {
                self.drive_fullscreen(FullscreenEvent::Exit);
                return true;
            }
            return false;
        }
        if target == Target::EditableField {
            return false;
        }

        match key {
            Key::Space => {
                self.toggle_play();
                true
            }
            Key::ArrowLeft => {
                self.seek_by(-self.seek_step);
                true
            }
            Key::ArrowRight => {
                self.seek_by(self.seek_step);
                true
            }
            Key::Character('f' | 'F') => {
                // Some engines refuse fullscreen requests not triggered by a user gesture
                self.platform.click_fullscreen_control();
                true
            }
            _ => false,
        }
    }

    fn handle_control(&mut self, action: ControlAction) {
        match action {
            ControlAction::PlayPause => {
                if self.loading {
                    debug!("Play control disabled while loading");
                } else {
                    self.toggle_play();
                }
            }
            ControlAction::Fullscreen => self.drive_fullscreen(FullscreenEvent::Toggle),
            ControlAction::MiniPlayer => self.toggle_mini_player(),
            ControlAction::Mute => {
                self.volume.toggle_mute(self.media.as_mut());
                self.sync_volume();
            }
            ControlAction::Volume(volume) => {
                self.volume.set_volume(self.media.as_mut(), volume);
                self.sync_volume();
            }
            ControlAction::SettingsTrigger => self.settings.toggle(self.surface.as_mut()),
            ControlAction::Settings(choice) => {
                match self.settings.select(choice, self.surface.as_mut()) {
                    SettingsEffect::SetRate(rate) => self.media.set_playback_rate(rate),
                    SettingsEffect::Reload => self.reload_source(),
                    SettingsEffect::ShowAnnotations(on) => {
                        self.surface.set_flag(VisualFlag::AnnotationsHidden, !on)
                    }
                    SettingsEffect::Unchanged => {}
                }
            }
        }
    }

    fn handle_media_event(&mut self, event: MediaEvent) {
        trace!("Media event {:?}", event);
        match event {
            MediaEvent::LoadStart => {
                self.fatal_error = false;
                self.set_loading(true);
            }
            MediaEvent::Waiting | MediaEvent::Stalled => self.set_loading(true),
            MediaEvent::CanPlay => {
                self.set_loading(false);
                self.restore_position();
            }
            MediaEvent::CanPlayThrough => self.set_loading(false),
            MediaEvent::Play => self.sync_paused_flag(),
            MediaEvent::Playing => {
                self.set_loading(false);
                self.sync_paused_flag();
                self.reveal_controls();
            }
            MediaEvent::Pause | MediaEvent::Ended => {
                self.sync_paused_flag();
                self.reveal_controls();
            }
            MediaEvent::LoadedMetadata => {
                self.refresh_duration_display();
                self.restore_position();
            }
            MediaEvent::DurationChange => self.refresh_duration_display(),
            MediaEvent::TimeUpdate => {
                // The drag position is authoritative while scrubbing
                if !self.scrub.is_scrubbing() {
                    self.refresh_time_display();
                }
            }
            MediaEvent::VolumeChange => self.sync_volume(),
            MediaEvent::Error => {
                let code = self.media.error();
                let fatal = code.is_none_or(|code| code.is_fatal());
                warn!("Media error {:?} (fatal: {})", code, fatal);
                if fatal {
                    self.fatal_error = true;
                    self.pending_restore = None;
                }
                self.set_loading(false);
                self.sync_paused_flag();
                self.reveal_controls();
            }
            MediaEvent::EnterPictureInPicture => self.set_mini_player_active(true),
            MediaEvent::LeavePictureInPicture => self.set_mini_player_active(false),
            MediaEvent::PlayRejected => {
                warn!("Playback was rejected by the platform");
                self.sync_paused_flag();
                self.reveal_controls();
            }
        }
    }

    fn handle_timer(&mut self, id: TimerId) {
        if self.fullscreen.owns_timer(id) {
            self.drive_fullscreen(FullscreenEvent::Timer(id));
            return;
        }
        // Also kept visible while the settings popover is open
        let can_hide =
            !self.media.is_paused() && !self.scrub.is_scrubbing() && !self.settings.is_open();
        self.activity.on_timer(id, can_hide, self.surface.as_mut());
    }

    fn handle_probe_result(&mut self, generation: u64, seconds: Option<f64>) {
        if self.duration.accept_probe(generation, seconds) {
            debug!("Header duration {:?} accepted", seconds);
            self.refresh_duration_display();
        }
    }

    fn can_control_playback(&self) -> bool {
        if self.media.src().trim().is_empty() || self.fatal_error {
            return false;
        }
        !matches!(self.media.error(), Some(code) if code.is_fatal())
    }

    fn start_playback(&mut self) {
        if let Err(e) = self.media.play() {
            // Autoplay policies and the like; let the user retry by hand
            warn!("Failed to start playback: {}", e);
            self.reveal_controls();
        }
        self.sync_paused_flag();
    }

    fn seek_by(&mut self, delta: f64) {
        if self.scrub.is_scrubbing() {
            return;
        }
        let mut target = (self.media.current_time() + delta).max(0.0);
        if let Some(duration) = self.duration.resolve(self.media.duration()) {
            target = target.min(duration);
        }
        debug!("Keyboard seek to {:.2}s", target);
        self.media.set_current_time(target);
        self.refresh_time_display();
    }

    // === Scrubbing ===

    fn begin_scrub(&mut self, x: f64) {
        let Some(duration) = self.duration.resolve(self.media.duration()) else {
            debug!("Duration unknown, not starting scrub");
            return;
        };
        let position = scrub::project(x, self.surface.timeline_bounds());
        let was_paused = self.media.is_paused();
        if !self.scrub.begin(position, was_paused) {
            return;
        }
        self.media.pause();
        self.surface.set_flag(VisualFlag::Scrubbing, true);
        self.show_scrub_position(position, duration);
    }

    fn update_scrub(&mut self, x: f64) {
        let position = scrub::project(x, self.surface.timeline_bounds());
        if let Some(position) = self.scrub.update(position)
            && let Some(duration) = self.duration.resolve(self.media.duration())
        {
            self.show_scrub_position(position, duration);
        }
    }

    fn finish_scrub(&mut self, x: f64) {
        if !self.scrub.is_scrubbing() {
            return;
        }
        self.scrub.update(scrub::project(x, self.surface.timeline_bounds()));
        let Some(commit) = self.scrub.finish() else {
            return;
        };
        self.surface.set_flag(VisualFlag::Scrubbing, false);

        match self.duration.resolve(self.media.duration()) {
            Some(duration) => {
                self.media.set_current_time(commit.position * duration);
                self.refresh_time_display();
            }
            None => debug!("Duration lost during scrub, not seeking"),
        }
        if commit.resume {
            self.start_playback();
        }
        self.reveal_controls();
    }

    fn show_scrub_position(&mut self, position: f64, duration: f64) {
        self.surface
            .set_time_label(TimeLabel::Current, &format_duration(position * duration));
        self.surface.set_progress(position);
    }

    // === Source reload ===

    /// Rebuild the source for the selected quality/codec and reload it,
    /// restoring position and play state once the new source is ready.
    fn reload_source(&mut self) {
        let src = self.media.src();
        if src.trim().is_empty() {
            debug!("No source to reload");
            return;
        }

        let was_paused = match self.scrub.cancel() {
            Some(was_paused) => {
                self.surface.set_flag(VisualFlag::Scrubbing, false);
                was_paused
            }
            None => self.media.is_paused(),
        };
        // A reload before the previous one restored keeps the original target
        let restore = self.pending_restore.take().unwrap_or(RestorePoint {
            seek_to: self.media.current_time(),
            was_playing: !was_paused,
        });

        let new_src =
            SourceDescriptor::rebuild(&src, self.settings.quality(), self.settings.codec());
        info!("Reloading source {} -> {} ({:?})", src, new_src, restore);

        self.duration.invalidate();
        self.fatal_error = false;
        self.media.set_src(&new_src);
        self.media.load();
        self.probe.request(&new_src, self.duration.generation());
        self.pending_restore = Some(restore);
        self.refresh_duration_display();
    }

    fn restore_position(&mut self) {
        let Some(restore) = self.pending_restore.take() else {
            return;
        };
        debug!("Restoring position {:?}", restore);
        self.media.set_current_time(restore.seek_to);
        if restore.was_playing {
            self.start_playback();
        }
        self.refresh_time_display();
    }

    // === Mini-player ===

    fn toggle_mini_player(&mut self) {
        if !self.mini_player.is_supported() {
            self.surface.show_notice(Notice::MiniPlayerUnsupported);
            return;
        }
        let result = if self.mini_player_active {
            self.mini_player.exit(self.platform.as_mut())
        } else {
            self.mini_player.enter(self.platform.as_mut())
        };
        if let Err(e) = result {
            warn!("Mini-player request failed: {}", e);
        }
    }

    fn set_mini_player_active(&mut self, active: bool) {
        self.mini_player_active = active;
        self.surface.set_flag(VisualFlag::MiniPlayerActive, active);
    }

    // === Visual state ===

    fn drive_fullscreen(&mut self, event: FullscreenEvent) {
        let mut ctx = FullscreenContext {
            platform: self.platform.as_mut(),
            scheduler: self.scheduler.as_mut(),
            surface: self.surface.as_mut(),
        };
        self.fullscreen.handle(event, &mut ctx);
    }

    fn reveal_controls(&mut self) {
        self.activity
            .reveal(self.scheduler.as_mut(), self.surface.as_mut());
    }

    fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
        self.surface.set_flag(VisualFlag::Loading, loading);
        self.surface.set_play_enabled(!loading);
    }

    fn sync_paused_flag(&mut self) {
        let paused = self.media.is_paused();
        self.surface.set_flag(VisualFlag::Paused, paused);
    }

    fn sync_volume(&mut self) {
        let level = self.volume.level(self.media.as_ref());
        self.surface.set_volume_level(level);
    }

    fn refresh_duration_display(&mut self) {
        let total = self.duration.resolve(self.media.duration());
        self.surface
            .set_time_label(TimeLabel::Total, &format_duration(total.unwrap_or(f64::NAN)));
    }

    fn refresh_time_display(&mut self) {
        let current = self.media.current_time();
        self.surface
            .set_time_label(TimeLabel::Current, &format_duration(current));

        let progress = match self.duration.resolve(self.media.duration()) {
            Some(duration) if duration > 0.0 => (current / duration).clamp(0.0, 1.0),
            _ => 0.0,
        };
        self.surface.set_progress(progress);
        self.refresh_duration_display();
    }

    fn sync_all(&mut self) {
        self.sync_paused_flag();
        self.set_loading(false);
        for flag in [
            VisualFlag::Scrubbing,
            VisualFlag::FullScreen,
            VisualFlag::MiniPlayerActive,
            VisualFlag::SettingsOpen,
            VisualFlag::AnnotationsHidden,
        ] {
            self.surface.set_flag(flag, false);
        }
        self.sync_volume();
        self.settings.sync_markers(self.surface.as_mut());
        self.refresh_time_display();
    }
}

impl Drop for PlayerSession {
    fn drop(&mut self) {
        self.detach();
    }
}
