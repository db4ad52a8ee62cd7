use tracing::debug;

use super::events::Target;
use super::source::{Codec, Quality};
use crate::config::PlaybackConfig;
use crate::platform::{ControlSurface, VisualFlag};

/// An entry of the settings popover
#[derive(Debug, Clone, PartialEq)]
pub enum SettingsChoice {
    Speed(f64),
    Quality(Quality),
    Codec(Codec),
    Annotations(bool),
}

/// Mutually exclusive group a choice belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChoiceGroup {
    Speed,
    Quality,
    Codec,
    Annotations,
}

impl SettingsChoice {
    pub fn group(&self) -> ChoiceGroup {
        match self {
            SettingsChoice::Speed(_) => ChoiceGroup::Speed,
            SettingsChoice::Quality(_) => ChoiceGroup::Quality,
            SettingsChoice::Codec(_) => ChoiceGroup::Codec,
            SettingsChoice::Annotations(_) => ChoiceGroup::Annotations,
        }
    }

    /// Text shown in the panel
    pub fn label(&self) -> String {
        match self {
            SettingsChoice::Speed(rate) if *rate == 1.0 => "Normal".to_string(),
            SettingsChoice::Speed(rate) => format!("{}x", rate),
            SettingsChoice::Quality(quality) => match quality.height() {
                Some(height) => format!("{}p", height),
                None => quality.label().to_string(),
            },
            SettingsChoice::Codec(Codec::Default) => "Auto".to_string(),
            SettingsChoice::Codec(codec) => codec.to_string().to_uppercase(),
            SettingsChoice::Annotations(true) => "On".to_string(),
            SettingsChoice::Annotations(false) => "Off".to_string(),
        }
    }
}

/// What the session must do after a choice is applied
#[derive(Debug, Clone, PartialEq)]
pub enum SettingsEffect {
    /// Set the playback rate directly, no reload
    SetRate(f64),
    /// The source must be rebuilt and reloaded
    Reload,
    ShowAnnotations(bool),
    /// The choice was already active or is not offered
    Unchanged,
}

/// Owns the settings popover and the current speed/quality/codec/annotation selection.
pub struct SettingsPanelController {
    open: bool,
    speeds: Vec<f64>,
    qualities: Vec<Quality>,
    speed: f64,
    quality: Quality,
    codec: Codec,
    annotations: bool,
}

impl SettingsPanelController {
    pub fn new(config: &PlaybackConfig) -> Self {
        Self {
            open: false,
            speeds: config.speeds.clone(),
            qualities: config.qualities.iter().map(Quality::new).collect(),
            speed: 1.0,
            quality: Quality::new(config.default_quality.as_str()),
            codec: Codec::Default,
            annotations: true,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn quality(&self) -> &Quality {
        &self.quality
    }

    pub fn codec(&self) -> Codec {
        self.codec
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn annotations(&self) -> bool {
        self.annotations
    }

    /// Every choice of a group, in panel order
    pub fn options(&self, group: ChoiceGroup) -> Vec<SettingsChoice> {
        match group {
            ChoiceGroup::Speed => self.speeds.iter().copied().map(SettingsChoice::Speed).collect(),
            ChoiceGroup::Quality => self
                .qualities
                .iter()
                .cloned()
                .map(SettingsChoice::Quality)
                .collect(),
            ChoiceGroup::Codec => Codec::ALL.into_iter().map(SettingsChoice::Codec).collect(),
            ChoiceGroup::Annotations => vec![
                SettingsChoice::Annotations(true),
                SettingsChoice::Annotations(false),
            ],
        }
    }

    /// The active choice of a group
    pub fn active(&self, group: ChoiceGroup) -> SettingsChoice {
        match group {
            ChoiceGroup::Speed => SettingsChoice::Speed(self.speed),
            ChoiceGroup::Quality => SettingsChoice::Quality(self.quality.clone()),
            ChoiceGroup::Codec => SettingsChoice::Codec(self.codec),
            ChoiceGroup::Annotations => SettingsChoice::Annotations(self.annotations),
        }
    }

    /// Paint the active markers of every group
    pub fn sync_markers(&self, surface: &mut dyn ControlSurface) {
        for group in [
            ChoiceGroup::Speed,
            ChoiceGroup::Quality,
            ChoiceGroup::Codec,
            ChoiceGroup::Annotations,
        ] {
            self.mark_group(group, surface);
        }
    }

    /// Trigger pressed
    pub fn toggle(&mut self, surface: &mut dyn ControlSurface) {
        self.set_open(!self.open, surface);
    }

    /// Close when a pointer lands outside both the panel and its trigger
    pub fn on_pointer_down(&mut self, target: Target, surface: &mut dyn ControlSurface) {
        if self.open && !matches!(target, Target::SettingsPanel | Target::SettingsTrigger) {
            self.set_open(false, surface);
        }
    }

    pub fn close(&mut self, surface: &mut dyn ControlSurface) {
        if self.open {
            self.set_open(false, surface);
        }
    }

    /// Apply a choice: update selection and sibling markers, report the effect
    pub fn select(
        &mut self,
        choice: SettingsChoice,
        surface: &mut dyn ControlSurface,
    ) -> SettingsEffect {
        if self.active(choice.group()) == choice {
            return SettingsEffect::Unchanged;
        }

        let effect = match &choice {
            SettingsChoice::Speed(rate) => {
                if !rate.is_finite() || *rate <= 0.0 {
                    debug!("Ignoring invalid playback rate {}", rate);
                    return SettingsEffect::Unchanged;
                }
                self.speed = *rate;
                SettingsEffect::SetRate(*rate)
            }
            SettingsChoice::Quality(quality) => {
                if !self.qualities.contains(quality) {
                    debug!("Quality {} is not offered", quality);
                    return SettingsEffect::Unchanged;
                }
                self.quality = quality.clone();
                SettingsEffect::Reload
            }
            SettingsChoice::Codec(codec) => {
                self.codec = *codec;
                SettingsEffect::Reload
            }
            SettingsChoice::Annotations(on) => {
                self.annotations = *on;
                SettingsEffect::ShowAnnotations(*on)
            }
        };

        debug!("Settings choice {:?} applied", choice);
        self.mark_group(choice.group(), surface);
        effect
    }

    fn mark_group(&self, group: ChoiceGroup, surface: &mut dyn ControlSurface) {
        let active = self.active(group);
        for option in self.options(group) {
            let is_active = option == active;
            surface.set_choice_marker(&option, is_active);
        }
    }

    fn set_open(&mut self, open: bool, surface: &mut dyn ControlSurface) {
        self.open = open;
        surface.set_flag(VisualFlag::SettingsOpen, open);
    }
}
