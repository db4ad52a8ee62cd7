#![cfg(test)]

use std::collections::HashMap;
use std::time::Duration;

use crate::platform::{
    ControlSurface, HostApi, MediaElement, MediaErrorCode, Notice, PipApi, Platform, Scheduler,
    TimeLabel, TimelineBounds, TimerId, Vendor, VisualFlag, VolumeLevel,
};
use crate::player::settings::SettingsChoice;
use crate::utils::{PlayerError, PlayerResult};

/// In-memory media element
#[derive(Debug, Clone)]
pub struct FakeMedia {
    pub current_time: f64,
    pub duration: f64,
    pub paused: bool,
    pub muted: bool,
    pub volume: f64,
    pub rate: f64,
    pub src: String,
    pub error: Option<MediaErrorCode>,
    pub reject_play: bool,
}

impl FakeMedia {
    pub fn paused(duration: f64) -> Self {
        Self {
            current_time: 0.0,
            duration,
            paused: true,
            muted: false,
            volume: 1.0,
            rate: 1.0,
            src: "/direct_url?video_id=abc".to_string(),
            error: None,
            reject_play: false,
        }
    }

    pub fn playing(duration: f64) -> Self {
        Self {
            paused: false,
            ..Self::paused(duration)
        }
    }
}

impl MediaElement for FakeMedia {
    fn current_time(&self) -> f64 {
        self.current_time
    }

    fn set_current_time(&mut self, seconds: f64) {
        self.current_time = seconds;
    }

    fn duration(&self) -> f64 {
        self.duration
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn play(&mut self) -> PlayerResult<()> {
        if self.reject_play {
            return Err(PlayerError::Rejected("autoplay blocked".to_string()));
        }
        self.paused = false;
        Ok(())
    }

    fn pause(&mut self) {
        self.paused = true;
    }

    fn is_muted(&self) -> bool {
        self.muted
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn volume(&self) -> f64 {
        self.volume
    }

    fn set_volume(&mut self, volume: f64) {
        self.volume = volume;
    }

    fn playback_rate(&self) -> f64 {
        self.rate
    }

    fn set_playback_rate(&mut self, rate: f64) {
        self.rate = rate;
    }

    fn src(&self) -> String {
        self.src.clone()
    }

    fn set_src(&mut self, src: &str) {
        self.src = src.to_string();
    }

    fn load(&mut self) {
        self.paused = true;
        self.current_time = 0.0;
    }

    fn error(&self) -> Option<MediaErrorCode> {
        self.error
    }
}

/// Scheduler that only records what was asked of it
#[derive(Debug, Default)]
pub struct RecordingScheduler {
    next_id: u64,
    pub scheduled: Vec<(TimerId, Duration)>,
    pub cancelled: Vec<TimerId>,
}

impl RecordingScheduler {
    /// Timers scheduled and not cancelled
    pub fn pending(&self) -> Vec<TimerId> {
        self.scheduled
            .iter()
            .map(|(id, _)| *id)
            .filter(|id| !self.cancelled.contains(id))
            .collect()
    }

    pub fn delay_of(&self, id: TimerId) -> Option<Duration> {
        self.scheduled
            .iter()
            .find(|(timer, _)| *timer == id)
            .map(|(_, delay)| *delay)
    }
}

impl Scheduler for RecordingScheduler {
    fn schedule(&mut self, delay: Duration) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        self.scheduled.push((id, delay));
        id
    }

    fn cancel(&mut self, id: TimerId) {
        self.cancelled.push(id);
    }
}

/// Surface that keeps the last value written for everything
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub flags: HashMap<VisualFlag, bool>,
    pub markers: HashMap<String, bool>,
    pub labels: HashMap<&'static str, String>,
    pub progress: f64,
    pub play_enabled: Option<bool>,
    pub volume_level: Option<VolumeLevel>,
    pub notices: Vec<Notice>,
}

impl RecordingSurface {
    pub fn flag(&self, flag: VisualFlag) -> Option<bool> {
        self.flags.get(&flag).copied()
    }

    pub fn marker(&self, label: &str) -> Option<bool> {
        self.markers.get(label).copied()
    }
}

impl ControlSurface for RecordingSurface {
    fn set_flag(&mut self, flag: VisualFlag, on: bool) {
        self.flags.insert(flag, on);
    }

    fn set_volume_level(&mut self, level: VolumeLevel) {
        self.volume_level = Some(level);
    }

    fn set_time_label(&mut self, label: TimeLabel, text: &str) {
        let key = match label {
            TimeLabel::Current => "current",
            TimeLabel::Total => "total",
        };
        self.labels.insert(key, text.to_string());
    }

    fn set_progress(&mut self, fraction: f64) {
        self.progress = fraction;
    }

    fn set_play_enabled(&mut self, enabled: bool) {
        self.play_enabled = Some(enabled);
    }

    fn set_choice_marker(&mut self, choice: &SettingsChoice, active: bool) {
        self.markers.insert(choice.label(), active);
    }

    fn timeline_bounds(&self) -> TimelineBounds {
        TimelineBounds {
            left: 0.0,
            width: 100.0,
        }
    }

    fn show_notice(&mut self, notice: Notice) {
        self.notices.push(notice);
    }
}

/// Page with a configurable set of APIs. Accepted fullscreen requests take
/// effect immediately unless `ignore_fullscreen_requests` is set.
#[derive(Debug, Default)]
pub struct FakePlatform {
    apis: Vec<HostApi>,
    pub native_element: bool,
    pub manual_layout: bool,
    pub ignore_fullscreen_requests: bool,
    /// Native exit completes later; the element stays until the test clears it
    pub deferred_exit: bool,
    pub escapes_dispatched: u32,
    pub exit_calls: u32,
    pub fullscreen_clicks: u32,
}

impl FakePlatform {
    pub fn with_apis(apis: &[HostApi]) -> Self {
        Self {
            apis: apis.to_vec(),
            ..Default::default()
        }
    }
}

impl Platform for FakePlatform {
    fn has_api(&self, api: HostApi) -> bool {
        self.apis.contains(&api)
    }

    fn request_fullscreen(&mut self, vendor: Vendor) -> PlayerResult<()> {
        if !self.has_api(HostApi::Fullscreen(vendor)) {
            return Err(PlayerError::Unsupported("fullscreen"));
        }
        if !self.ignore_fullscreen_requests {
            self.native_element = true;
        }
        Ok(())
    }

    fn exit_fullscreen(&mut self, _vendor: Vendor) -> PlayerResult<()> {
        self.exit_calls += 1;
        if !self.deferred_exit {
            self.native_element = false;
        }
        Ok(())
    }

    fn fullscreen_element_present(&self, _vendor: Vendor) -> bool {
        self.native_element
    }

    fn set_manual_fullscreen(&mut self, engaged: bool) {
        self.manual_layout = engaged;
    }

    fn dispatch_escape_key(&mut self) {
        self.escapes_dispatched += 1;
    }

    fn click_fullscreen_control(&mut self) {
        self.fullscreen_clicks += 1;
    }

    fn request_picture_in_picture(&mut self, api: PipApi) -> PlayerResult<()> {
        if self.has_api(HostApi::PictureInPicture(api)) {
            Ok(())
        } else {
            Err(PlayerError::Unsupported("picture-in-picture"))
        }
    }

    fn exit_picture_in_picture(&mut self, _api: PipApi) -> PlayerResult<()> {
        Ok(())
    }
}
