use crate::platform::{MediaElement, VolumeLevel};

/// Speaker icon for a volume/mute combination
pub fn volume_level(volume: f64, muted: bool, low_threshold: f64) -> VolumeLevel {
    if muted || volume <= 0.0 {
        VolumeLevel::Muted
    } else if volume < low_threshold {
        VolumeLevel::Low
    } else {
        VolumeLevel::High
    }
}

/// Volume and mute handling on top of the media element
#[derive(Debug)]
pub struct VolumeControl {
    low_threshold: f64,
}

impl VolumeControl {
    pub fn new(low_threshold: f64) -> Self {
        Self { low_threshold }
    }

    pub fn level(&self, media: &dyn MediaElement) -> VolumeLevel {
        volume_level(media.volume(), media.is_muted(), self.low_threshold)
    }

    /// Set volume (0.0 - 1.0). Raising the volume above zero unmutes.
    pub fn set_volume(&self, media: &mut dyn MediaElement, volume: f64) {
        let volume = if volume.is_finite() {
            volume.clamp(0.0, 1.0)
        } else {
            return;
        };
        media.set_volume(volume);
        if volume > 0.0 && media.is_muted() {
            media.set_muted(false);
        }
    }

    pub fn toggle_mute(&self, media: &mut dyn MediaElement) {
        let muted = media.is_muted();
        media.set_muted(!muted);
    }
}
