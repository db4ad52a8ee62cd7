// Host seams for the control surface.
//
// The page that embeds the player implements these traits (wasm glue in a
// browser, fakes in tests). Everything runs on the page's single UI thread,
// so none of them require `Send`.

pub mod capabilities;

use std::time::Duration;

use crate::player::settings::SettingsChoice;
use crate::utils::PlayerResult;

pub use capabilities::{
    Capabilities, CapabilityProbe, FullscreenStrategy, MiniPlayerStrategy, NativeFullscreen,
    PictureInPictureMiniPlayer, UnsupportedFullscreen, UnsupportedMiniPlayer,
};

/// Fatal error codes a media resource can report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaErrorCode {
    /// Fetching was aborted by the user agent; not fatal
    Aborted,
    Network,
    Decode,
    SrcNotSupported,
}

impl MediaErrorCode {
    pub fn is_fatal(self) -> bool {
        !matches!(self, MediaErrorCode::Aborted)
    }
}

/// The single video element under control.
///
/// The session holds it but never constructs or destroys the underlying
/// element. `duration` may be NaN (no metadata yet) or infinite (live).
pub trait MediaElement {
    fn current_time(&self) -> f64;
    fn set_current_time(&mut self, seconds: f64);
    fn duration(&self) -> f64;
    fn is_paused(&self) -> bool;
    /// Start playback. An immediate platform rejection is returned as an error;
    /// a later rejection arrives as `MediaEvent::PlayRejected`.
    fn play(&mut self) -> PlayerResult<()>;
    fn pause(&mut self);
    fn is_muted(&self) -> bool;
    fn set_muted(&mut self, muted: bool);
    fn volume(&self) -> f64;
    fn set_volume(&mut self, volume: f64);
    fn playback_rate(&self) -> f64;
    fn set_playback_rate(&mut self, rate: f64);
    fn src(&self) -> String;
    fn set_src(&mut self, src: &str);
    fn load(&mut self);
    fn error(&self) -> Option<MediaErrorCode>;
}

/// Boolean state classes applied to the player's UI elements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VisualFlag {
    Paused,
    Loading,
    Scrubbing,
    FullScreen,
    HideControls,
    MiniPlayerActive,
    SettingsOpen,
    AnnotationsHidden,
}

/// Speaker icon state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeLevel {
    Muted,
    Low,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeLabel {
    Current,
    Total,
}

/// User-facing notices for capabilities the page lacks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    MiniPlayerUnsupported,
}

/// Horizontal extent of the timeline in page coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimelineBounds {
    pub left: f64,
    pub width: f64,
}

/// The designated UI elements: container, timeline, buttons, labels, panel.
pub trait ControlSurface {
    fn set_flag(&mut self, flag: VisualFlag, on: bool);
    fn set_volume_level(&mut self, level: VolumeLevel);
    fn set_time_label(&mut self, label: TimeLabel, text: &str);
    /// Timeline fill, in `[0, 1]`
    fn set_progress(&mut self, fraction: f64);
    fn set_play_enabled(&mut self, enabled: bool);
    fn set_choice_marker(&mut self, choice: &SettingsChoice, active: bool);
    fn timeline_bounds(&self) -> TimelineBounds;
    fn show_notice(&mut self, notice: Notice);
}

/// Vendor prefix of a fullscreen API family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vendor {
    Standard,
    Webkit,
    Moz,
    Ms,
}

impl Vendor {
    pub const ALL: [Vendor; 4] = [Vendor::Standard, Vendor::Webkit, Vendor::Moz, Vendor::Ms];
}

/// Picture-in-Picture API families
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipApi {
    Standard,
    WebkitPresentationMode,
}

/// Page APIs the capability probe asks about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostApi {
    Fullscreen(Vendor),
    PictureInPicture(PipApi),
    TouchEvents,
    TouchPoints,
    HeaderRequests,
}

/// Document-level browser APIs.
pub trait Platform {
    fn has_api(&self, api: HostApi) -> bool;
    /// Request fullscreen on the player container
    fn request_fullscreen(&mut self, vendor: Vendor) -> PlayerResult<()>;
    fn exit_fullscreen(&mut self, vendor: Vendor) -> PlayerResult<()>;
    /// Whether the document currently has a native fullscreen element
    fn fullscreen_element_present(&self, vendor: Vendor) -> bool;
    /// Apply or clear full-viewport sizing on the document root, body and container
    fn set_manual_fullscreen(&mut self, engaged: bool);
    /// Synthesize an Escape key input for listeners that key off it
    fn dispatch_escape_key(&mut self);
    /// Synthesize a user click on the fullscreen control
    fn click_fullscreen_control(&mut self);
    fn request_picture_in_picture(&mut self, api: PipApi) -> PlayerResult<()>;
    fn exit_picture_in_picture(&mut self, api: PipApi) -> PlayerResult<()>;
}

/// Opaque handle of a pending deferred callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(pub u64);

/// Deferred callbacks. A fired timer comes back to the session as
/// `SessionEvent::TimerFired` carrying the id returned here.
pub trait Scheduler {
    fn schedule(&mut self, delay: Duration) -> TimerId;
    fn cancel(&mut self, id: TimerId);
}
