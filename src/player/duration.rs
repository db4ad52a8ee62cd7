use tracing::debug;

/// Whether a duration reported by the media resource can be trusted
pub fn is_valid_duration(seconds: f64) -> bool {
    seconds.is_finite() && seconds >= 0.0
}

/// Determines the authoritative media duration.
///
/// Native duration wins as soon as it is valid, and from then on the
/// header-derived value is discarded so the display cannot regress to it.
/// Until then, the value recovered by the header-duration probe fills in.
/// Every reload bumps the generation; probe answers tagged with an older
/// generation are dropped.
#[derive(Debug, Default)]
pub struct DurationResolver {
    from_header: Option<f64>,
    generation: u64,
}

impl DurationResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generation that newly issued probes must carry
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn header_duration(&self) -> Option<f64> {
        self.from_header
    }

    /// Forget the header value and start a new generation (source reload, detach)
    pub fn invalidate(&mut self) {
        self.from_header = None;
        self.generation += 1;
        debug!("Duration resolver invalidated, generation {}", self.generation);
    }

    /// Record a probe answer. Returns true when it changed the header value.
    pub fn accept_probe(&mut self, generation: u64, seconds: Option<f64>) -> bool {
        if generation != self.generation {
            debug!(
                "Dropping stale duration probe (generation {}, current {})",
                generation, self.generation
            );
            return false;
        }
        match seconds {
            Some(value) if value.is_finite() && value > 0.0 => {
                self.from_header = Some(value);
                true
            }
            _ => false,
        }
    }

    /// Resolve against the resource's current native duration.
    pub fn resolve(&mut self, native: f64) -> Option<f64> {
        if is_valid_duration(native) {
            if self.from_header.take().is_some() {
                debug!("Native duration {:.2}s available, dropping header value", native);
            }
            return Some(native);
        }
        self.from_header
    }

    /// Same as `resolve` without converging; for read-only callers
    pub fn peek(&self, native: f64) -> Option<f64> {
        if is_valid_duration(native) {
            Some(native)
        } else {
            self.from_header
        }
    }
}
