use tracing::debug;

use super::{HostApi, PipApi, Platform, Vendor};
use crate::utils::{PlayerError, PlayerResult};

/// How fullscreen is entered and left on this page.
///
/// Selected once at attach time so the coordinator never re-tests
/// vendor prefixes on each call.
pub trait FullscreenStrategy {
    fn name(&self) -> &'static str;
    fn request(&self, platform: &mut dyn Platform) -> PlayerResult<()>;
    fn exit(&self, platform: &mut dyn Platform) -> PlayerResult<()>;
    /// Whether a native fullscreen element is present
    fn is_active(&self, platform: &dyn Platform) -> bool;
}

/// Native fullscreen through one vendor's API family
pub struct NativeFullscreen {
    vendor: Vendor,
}

impl NativeFullscreen {
    pub fn new(vendor: Vendor) -> Self {
        Self { vendor }
    }

    pub fn vendor(&self) -> Vendor {
        self.vendor
    }
}

impl FullscreenStrategy for NativeFullscreen {
    fn name(&self) -> &'static str {
        match self.vendor {
            Vendor::Standard => "native",
            Vendor::Webkit => "native-webkit",
            Vendor::Moz => "native-moz",
            Vendor::Ms => "native-ms",
        }
    }

    fn request(&self, platform: &mut dyn Platform) -> PlayerResult<()> {
        platform.request_fullscreen(self.vendor)
    }

    fn exit(&self, platform: &mut dyn Platform) -> PlayerResult<()> {
        platform.exit_fullscreen(self.vendor)
    }

    fn is_active(&self, platform: &dyn Platform) -> bool {
        platform.fullscreen_element_present(self.vendor)
    }
}

/// No native API at all; every request fails so the manual fallback engages
pub struct UnsupportedFullscreen;

impl FullscreenStrategy for UnsupportedFullscreen {
    fn name(&self) -> &'static str {
        "unsupported"
    }

    fn request(&self, _platform: &mut dyn Platform) -> PlayerResult<()> {
        Err(PlayerError::Unsupported("fullscreen"))
    }

    fn exit(&self, _platform: &mut dyn Platform) -> PlayerResult<()> {
        Ok(())
    }

    fn is_active(&self, _platform: &dyn Platform) -> bool {
        false
    }
}

/// How the mini-player (Picture-in-Picture) is toggled
pub trait MiniPlayerStrategy {
    fn is_supported(&self) -> bool;
    fn enter(&self, platform: &mut dyn Platform) -> PlayerResult<()>;
    fn exit(&self, platform: &mut dyn Platform) -> PlayerResult<()>;
}

pub struct PictureInPictureMiniPlayer {
    api: PipApi,
}

impl PictureInPictureMiniPlayer {
    pub fn new(api: PipApi) -> Self {
        Self { api }
    }
}

impl MiniPlayerStrategy for PictureInPictureMiniPlayer {
    fn is_supported(&self) -> bool {
        true
    }

    fn enter(&self, platform: &mut dyn Platform) -> PlayerResult<()> {
        platform.request_picture_in_picture(self.api)
    }

    fn exit(&self, platform: &mut dyn Platform) -> PlayerResult<()> {
        platform.exit_picture_in_picture(self.api)
    }
}

pub struct UnsupportedMiniPlayer;

impl MiniPlayerStrategy for UnsupportedMiniPlayer {
    fn is_supported(&self) -> bool {
        false
    }

    fn enter(&self, _platform: &mut dyn Platform) -> PlayerResult<()> {
        Err(PlayerError::Unsupported("picture-in-picture"))
    }

    fn exit(&self, _platform: &mut dyn Platform) -> PlayerResult<()> {
        Ok(())
    }
}

/// Uniform capability surface handed to the other components
pub struct Capabilities {
    pub fullscreen: Box<dyn FullscreenStrategy>,
    pub mini_player: Box<dyn MiniPlayerStrategy>,
    pub touch: bool,
    pub header_probe: bool,
}

pub struct CapabilityProbe;

impl CapabilityProbe {
    pub fn detect(platform: &dyn Platform) -> Capabilities {
        let fullscreen: Box<dyn FullscreenStrategy> = match Vendor::ALL
            .into_iter()
            .find(|vendor| platform.has_api(HostApi::Fullscreen(*vendor)))
        {
            Some(vendor) => Box::new(NativeFullscreen::new(vendor)),
            None => Box::new(UnsupportedFullscreen),
        };

        let mini_player: Box<dyn MiniPlayerStrategy> =
            match [PipApi::Standard, PipApi::WebkitPresentationMode]
                .into_iter()
                .find(|api| platform.has_api(HostApi::PictureInPicture(*api)))
            {
                Some(api) => Box::new(PictureInPictureMiniPlayer::new(api)),
                None => Box::new(UnsupportedMiniPlayer),
            };

        let touch =
            platform.has_api(HostApi::TouchEvents) || platform.has_api(HostApi::TouchPoints);
        let header_probe = platform.has_api(HostApi::HeaderRequests);

        debug!(
            "Detected capabilities: fullscreen={}, mini_player={}, touch={}, header_probe={}",
            fullscreen.name(),
            mini_player.is_supported(),
            touch,
            header_probe
        );

        Capabilities {
            fullscreen,
            mini_player,
            touch,
            header_probe,
        }
    }
}
