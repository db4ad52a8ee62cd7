use crate::platform::TimerId;

use super::settings::SettingsChoice;

/// Lifecycle notifications from the media resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaEvent {
    LoadStart,
    Waiting,
    Stalled,
    CanPlay,
    CanPlayThrough,
    Play,
    Playing,
    Pause,
    LoadedMetadata,
    DurationChange,
    TimeUpdate,
    VolumeChange,
    Ended,
    Error,
    EnterPictureInPicture,
    LeavePictureInPicture,
    /// The play promise was rejected after `play()` returned
    PlayRejected,
}

/// Where an input landed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// The video surface itself
    Video,
    Timeline,
    /// Buttons and sliders of the control bar
    Controls,
    SettingsPanel,
    SettingsTrigger,
    /// A text input, textarea, select or content-editable element
    EditableField,
    /// Anywhere outside the player
    Outside,
}

impl Target {
    /// Whether input on this target counts as activity on the player
    pub fn is_player_relevant(self) -> bool {
        !matches!(self, Target::Outside | Target::EditableField)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Space,
    ArrowLeft,
    ArrowRight,
    Escape,
    Character(char),
    Other,
}

/// Raw pointer, touch, wheel and keyboard input. Pointer coordinates are
/// page x positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDown { x: f64, target: Target },
    PointerMove { x: f64, target: Target },
    PointerUp { x: f64, target: Target },
    Touch { target: Target },
    Wheel { target: Target },
    Key { key: Key, target: Target },
    /// A click or tap completed on `target`
    Tap { target: Target },
}

impl InputEvent {
    pub fn target(&self) -> Target {
        match *self {
            InputEvent::PointerDown { target, .. }
            | InputEvent::PointerMove { target, .. }
            | InputEvent::PointerUp { target, .. }
            | InputEvent::Touch { target }
            | InputEvent::Wheel { target }
            | InputEvent::Key { target, .. }
            | InputEvent::Tap { target } => target,
        }
    }

    /// Inputs that reset the inactivity timer
    pub fn is_activity(&self) -> bool {
        !matches!(self, InputEvent::PointerUp { .. } | InputEvent::Tap { .. })
            && self.target().is_player_relevant()
    }
}

/// Presses on the player's own controls
#[derive(Debug, Clone, PartialEq)]
pub enum ControlAction {
    PlayPause,
    Fullscreen,
    MiniPlayer,
    Mute,
    Volume(f64),
    SettingsTrigger,
    Settings(SettingsChoice),
}

/// Everything the session reacts to, in one stream
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Media(MediaEvent),
    Input(InputEvent),
    Control(ControlAction),
    /// A native fullscreen change notification from the document
    FullscreenChanged,
    TimerFired(TimerId),
    DurationProbed {
        generation: u64,
        seconds: Option<f64>,
    },
    /// Tear the session down; only meaningful to `SessionDriver`
    Detach,
}
