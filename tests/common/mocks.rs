use retroplayer::platform::{
    ControlSurface, HostApi, MediaElement, MediaErrorCode, Notice, PipApi, Platform, Scheduler,
    TimeLabel, TimelineBounds, TimerId, Vendor, VisualFlag, VolumeLevel,
};
use retroplayer::player::{DurationProbe, SettingsChoice};
use retroplayer::utils::{PlayerError, PlayerResult};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct MediaState {
    pub current_time: f64,
    pub duration: f64,
    pub paused: bool,
    pub muted: bool,
    pub volume: f64,
    pub rate: f64,
    pub src: String,
    pub error: Option<MediaErrorCode>,
    pub reject_play: bool,
    pub loads: u32,
    pub play_calls: u32,
}

impl Default for MediaState {
    fn default() -> Self {
        Self {
            current_time: 0.0,
            duration: 120.0,
            paused: true,
            muted: false,
            volume: 1.0,
            rate: 1.0,
            src: "/direct_url?video_id=dQw4w9WgXcQ".to_string(),
            error: None,
            reject_play: false,
            loads: 0,
            play_calls: 0,
        }
    }
}

/// Media element whose state stays inspectable after the session takes ownership
#[derive(Clone, Default)]
pub struct MockMedia {
    pub state: Arc<Mutex<MediaState>>,
}

impl MockMedia {
    pub fn new(state: MediaState) -> Self {
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    pub fn with<R>(&self, f: impl FnOnce(&mut MediaState) -> R) -> R {
        f(&mut self.state.lock().unwrap())
    }
}

impl MediaElement for MockMedia {
    fn current_time(&self) -> f64 {
        self.with(|s| s.current_time)
    }

    fn set_current_time(&mut self, seconds: f64) {
        self.with(|s| s.current_time = seconds)
    }

    fn duration(&self) -> f64 {
        self.with(|s| s.duration)
    }

    fn is_paused(&self) -> bool {
        self.with(|s| s.paused)
    }

    fn play(&mut self) -> PlayerResult<()> {
        self.with(|s| {
            s.play_calls += 1;
            if s.reject_play {
                return Err(PlayerError::Rejected("NotAllowedError".to_string()));
            }
            s.paused = false;
            Ok(())
        })
    }

    fn pause(&mut self) {
        self.with(|s| s.paused = true)
    }

    fn is_muted(&self) -> bool {
        self.with(|s| s.muted)
    }

    fn set_muted(&mut self, muted: bool) {
        self.with(|s| s.muted = muted)
    }

    fn volume(&self) -> f64 {
        self.with(|s| s.volume)
    }

    fn set_volume(&mut self, volume: f64) {
        self.with(|s| s.volume = volume)
    }

    fn playback_rate(&self) -> f64 {
        self.with(|s| s.rate)
    }

    fn set_playback_rate(&mut self, rate: f64) {
        self.with(|s| s.rate = rate)
    }

    fn src(&self) -> String {
        self.with(|s| s.src.clone())
    }

    fn set_src(&mut self, src: &str) {
        self.with(|s| s.src = src.to_string())
    }

    fn load(&mut self) {
        // A fresh load starts paused at zero with unknown duration
        self.with(|s| {
            s.loads += 1;
            s.paused = true;
            s.current_time = 0.0;
            s.duration = f64::NAN;
            s.error = None;
        })
    }

    fn error(&self) -> Option<MediaErrorCode> {
        self.with(|s| s.error)
    }
}

#[derive(Debug, Default)]
pub struct SurfaceState {
    pub flags: HashMap<VisualFlag, bool>,
    pub markers: HashMap<String, bool>,
    pub current_label: String,
    pub total_label: String,
    pub progress: f64,
    pub play_enabled: bool,
    pub volume_level: Option<VolumeLevel>,
    pub notices: Vec<Notice>,
}

#[derive(Clone, Default)]
pub struct MockSurface {
    pub state: Arc<Mutex<SurfaceState>>,
}

impl MockSurface {
    pub fn flag(&self, flag: VisualFlag) -> bool {
        self.state
            .lock()
            .unwrap()
            .flags
            .get(&flag)
            .copied()
            .unwrap_or(false)
    }

    pub fn total_label(&self) -> String {
        self.state.lock().unwrap().total_label.clone()
    }

    pub fn current_label(&self) -> String {
        self.state.lock().unwrap().current_label.clone()
    }

    pub fn progress(&self) -> f64 {
        self.state.lock().unwrap().progress
    }

    pub fn play_enabled(&self) -> bool {
        self.state.lock().unwrap().play_enabled
    }

    pub fn volume_level(&self) -> Option<VolumeLevel> {
        self.state.lock().unwrap().volume_level
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.state.lock().unwrap().notices.clone()
    }

    pub fn marker(&self, label: &str) -> Option<bool> {
        self.state.lock().unwrap().markers.get(label).copied()
    }
}

impl ControlSurface for MockSurface {
    fn set_flag(&mut self, flag: VisualFlag, on: bool) {
        self.state.lock().unwrap().flags.insert(flag, on);
    }

    fn set_volume_level(&mut self, level: VolumeLevel) {
        self.state.lock().unwrap().volume_level = Some(level);
    }

    fn set_time_label(&mut self, label: TimeLabel, text: &str) {
        let mut state = self.state.lock().unwrap();
        match label {
            TimeLabel::Current => state.current_label = text.to_string(),
            TimeLabel::Total => state.total_label = text.to_string(),
        }
    }

    fn set_progress(&mut self, fraction: f64) {
        self.state.lock().unwrap().progress = fraction;
    }

    fn set_play_enabled(&mut self, enabled: bool) {
        self.state.lock().unwrap().play_enabled = enabled;
    }

    fn set_choice_marker(&mut self, choice: &SettingsChoice, active: bool) {
        self.state
            .lock()
            .unwrap()
            .markers
            .insert(choice.label(), active);
    }

    // Timeline spans x = 100..500
    fn timeline_bounds(&self) -> TimelineBounds {
        TimelineBounds {
            left: 100.0,
            width: 400.0,
        }
    }

    fn show_notice(&mut self, notice: Notice) {
        self.state.lock().unwrap().notices.push(notice);
    }
}

#[derive(Debug, Default)]
pub struct PlatformState {
    pub apis: Vec<HostApi>,
    pub native_element: bool,
    pub manual_layout: bool,
    pub ignore_fullscreen_requests: bool,
    /// Native exit finishes asynchronously; the element stays until cleared
    pub deferred_exit: bool,
    pub escapes_dispatched: u32,
    pub exit_calls: u32,
    pub fullscreen_clicks: u32,
    pub pip_requests: u32,
}

#[derive(Clone, Default)]
pub struct MockPlatform {
    pub state: Arc<Mutex<PlatformState>>,
}

impl MockPlatform {
    pub fn with_apis(apis: &[HostApi]) -> Self {
        let platform = Self::default();
        platform.state.lock().unwrap().apis = apis.to_vec();
        platform
    }

    pub fn with<R>(&self, f: impl FnOnce(&mut PlatformState) -> R) -> R {
        f(&mut self.state.lock().unwrap())
    }
}

impl Platform for MockPlatform {
    fn has_api(&self, api: HostApi) -> bool {
        self.with(|s| s.apis.contains(&api))
    }

    fn request_fullscreen(&mut self, vendor: Vendor) -> PlayerResult<()> {
        self.with(|s| {
            if !s.apis.contains(&HostApi::Fullscreen(vendor)) {
                return Err(PlayerError::Unsupported("fullscreen"));
            }
            if !s.ignore_fullscreen_requests {
                s.native_element = true;
            }
            Ok(())
        })
    }

    fn exit_fullscreen(&mut self, _vendor: Vendor) -> PlayerResult<()> {
        self.with(|s| {
            s.exit_calls += 1;
            if !s.deferred_exit {
                s.native_element = false;
            }
        });
        Ok(())
    }

    fn fullscreen_element_present(&self, _vendor: Vendor) -> bool {
        self.with(|s| s.native_element)
    }

    fn set_manual_fullscreen(&mut self, engaged: bool) {
        self.with(|s| s.manual_layout = engaged)
    }

    fn dispatch_escape_key(&mut self) {
        self.with(|s| s.escapes_dispatched += 1)
    }

    fn click_fullscreen_control(&mut self) {
        self.with(|s| s.fullscreen_clicks += 1)
    }

    fn request_picture_in_picture(&mut self, api: PipApi) -> PlayerResult<()> {
        self.with(|s| {
            if !s.apis.contains(&HostApi::PictureInPicture(api)) {
                return Err(PlayerError::Unsupported("picture-in-picture"));
            }
            s.pip_requests += 1;
            Ok(())
        })
    }

    fn exit_picture_in_picture(&mut self, _api: PipApi) -> PlayerResult<()> {
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct SchedulerState {
    pub now: Duration,
    next_id: u64,
    /// (id, deadline)
    pub pending: Vec<(TimerId, Duration)>,
}

/// Virtual clock; timers fire only when the test advances it
#[derive(Clone, Default)]
pub struct ManualScheduler {
    pub state: Arc<Mutex<SchedulerState>>,
}

impl ManualScheduler {
    pub fn pending_count(&self) -> usize {
        self.state.lock().unwrap().pending.len()
    }

    /// Remove and return the earliest timer due at or before `until`,
    /// moving the clock to its deadline
    pub fn pop_due(&self, until: Duration) -> Option<TimerId> {
        let mut state = self.state.lock().unwrap();
        let (index, &(id, deadline)) = state
            .pending
            .iter()
            .enumerate()
            .filter(|(_, (_, deadline))| *deadline <= until)
            .min_by_key(|(_, (_, deadline))| *deadline)?;
        state.pending.remove(index);
        state.now = deadline;
        Some(id)
    }

    pub fn set_now(&self, now: Duration) {
        self.state.lock().unwrap().now = now;
    }

    pub fn now(&self) -> Duration {
        self.state.lock().unwrap().now
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&mut self, delay: Duration) -> TimerId {
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let id = TimerId(state.next_id);
        let deadline = state.now + delay;
        state.pending.push((id, deadline));
        id
    }

    fn cancel(&mut self, id: TimerId) {
        self.state
            .lock()
            .unwrap()
            .pending
            .retain(|(timer, _)| *timer != id);
    }
}

#[derive(Debug, Default)]
pub struct ProbeState {
    pub requests: Vec<(String, u64)>,
    pub cancels: u32,
}

/// Records probe requests; tests answer them by dispatching `DurationProbed`
#[derive(Clone, Default)]
pub struct MockProbe {
    pub state: Arc<Mutex<ProbeState>>,
}

impl MockProbe {
    pub fn last_request(&self) -> Option<(String, u64)> {
        self.state.lock().unwrap().requests.last().cloned()
    }

    pub fn request_count(&self) -> usize {
        self.state.lock().unwrap().requests.len()
    }
}

impl DurationProbe for MockProbe {
    fn request(&mut self, src: &str, generation: u64) {
        self.state
            .lock()
            .unwrap()
            .requests
            .push((src.to_string(), generation));
    }

    fn cancel(&mut self) {
        self.state.lock().unwrap().cancels += 1;
    }
}
