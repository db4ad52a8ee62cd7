pub mod activity;
pub mod controller;
pub mod duration;
pub mod events;
pub mod fullscreen;
pub mod probe;
pub mod scrub;
pub mod settings;
pub mod source;
pub mod volume;

pub use activity::{ActivityMonitor, ControlState};
pub use controller::{PlayerSession, RestorePoint, SessionPorts};
pub use duration::DurationResolver;
pub use events::{ControlAction, InputEvent, Key, MediaEvent, SessionEvent, Target};
pub use fullscreen::{FullscreenCoordinator, FullscreenEvent, FullscreenState};
pub use probe::{DurationProbe, HttpHeaderProbe, NullProbe};
pub use scrub::{ScrubController, ScrubState};
pub use settings::{ChoiceGroup, SettingsChoice, SettingsEffect, SettingsPanelController};
pub use source::{Codec, Quality, SourceDescriptor};
