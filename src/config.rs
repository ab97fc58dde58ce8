//! Display configuration types and builder

use alloc::vec::Vec;
use core::time::Duration;

use crate::digit::CODE_WIDTH;
pub use crate::error::BuilderError;

/// Default refresh rate: one sector pulse per millisecond
pub const DEFAULT_FPS: u32 = 1000;

const NANOS_PER_SECOND: u32 = 1_000_000_000;

/// GPIO pin numbers wired to the display
///
/// Pin numbers are whatever the GPIO backend understands (BCM numbers on a
/// Raspberry Pi).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PinAssignment {
    /// Anode-enable pins, least significant sector first
    pub sector_pins: Vec<u8>,
    /// Decoder inputs A, B, C, D (least significant bit first)
    pub input_pins: [u8; CODE_WIDTH],
    /// Decimal point pin, shared by all sectors
    pub dp_pin: Option<u8>,
}

impl PinAssignment {
    /// Create a validated pin assignment
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::NoSectors` if `sector_pins` is empty, and
    /// `BuilderError::PinConflict` if any pin number is used twice.
    pub fn new(
        sector_pins: &[u8],
        input_pins: [u8; CODE_WIDTH],
        dp_pin: Option<u8>,
    ) -> Result<Self, BuilderError> {
        let assignment = Self {
            sector_pins: sector_pins.to_vec(),
            input_pins,
            dp_pin,
        };
        assignment.validate()?;
        Ok(assignment)
    }

    /// Number of sectors (digits) on the display
    pub fn sector_count(&self) -> usize {
        self.sector_pins.len()
    }

    /// Whether a decimal point pin is wired
    pub fn has_dot(&self) -> bool {
        self.dp_pin.is_some()
    }

    /// Every pin in the assignment: sectors, inputs, then the dot pin
    pub fn pins(&self) -> impl Iterator<Item = u8> + '_ {
        self.sector_pins
            .iter()
            .chain(self.input_pins.iter())
            .copied()
            .chain(self.dp_pin)
    }

    pub(crate) fn validate(&self) -> Result<(), BuilderError> {
        if self.sector_pins.is_empty() {
            return Err(BuilderError::NoSectors);
        }
        let mut seen = [false; 256];
        for pin in self.pins() {
            let slot = &mut seen[pin as usize];
            if *slot {
                return Err(BuilderError::PinConflict { pin });
            }
            *slot = true;
        }
        Ok(())
    }
}

/// Display configuration
///
/// Use `Builder` to create a Config.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Pin wiring
    pub pins: PinAssignment,
    /// Sector pulses per second
    pub fps: u32,
    /// Anode line level that lights a sector
    pub sector_active_high: bool,
}

impl Config {
    /// Time a sector stays lit before the cycle moves on
    ///
    /// One pulse per frame: `fps = 1000` gives 1 ms, whatever the number of
    /// sectors.
    pub fn dwell(&self) -> Duration {
        Duration::from_nanos(u64::from(self.dwell_ns()))
    }

    /// [`dwell`](Self::dwell) in nanoseconds, for `DelayNs`
    pub fn dwell_ns(&self) -> u32 {
        NANOS_PER_SECOND / self.fps.max(1)
    }

    /// Number of sectors (digits) on the display
    pub fn sector_count(&self) -> usize {
        self.pins.sector_count()
    }

    /// Check a config that did not come from [`Builder`]
    pub(crate) fn validate(&self) -> Result<(), BuilderError> {
        self.pins.validate()?;
        if self.fps == 0 {
            return Err(BuilderError::InvalidRefreshRate { fps: self.fps });
        }
        Ok(())
    }
}

/// Builder for constructing display configuration
///
/// # Example
///
/// ```rust
/// use numeric_display::Builder;
///
/// let config = match Builder::new()
///     .sector_pins(&[27, 22, 10, 9]) // least significant first
///     .input_pins([2, 3, 4, 17])     // A, B, C, D
///     .dp_pin(11)
///     .fps(500)
///     .build()
/// {
///     Ok(config) => config,
///     Err(_) => return,
/// };
/// assert_eq!(config.sector_count(), 4);
/// assert_eq!(config.dwell().as_micros(), 2_000);
/// ```
#[must_use]
pub struct Builder {
    /// Anode-enable pins (required)
    sector_pins: Vec<u8>,
    /// Decoder input pins (required)
    input_pins: Option<[u8; CODE_WIDTH]>,
    /// Decimal point pin
    dp_pin: Option<u8>,
    /// Sector pulses per second
    fps: u32,
    /// Anode line level that lights a sector
    sector_active_high: bool,
}

impl Default for Builder {
    fn default() -> Self {
        Self {
            sector_pins: Vec::new(),
            input_pins: None,
            dp_pin: None,
            fps: DEFAULT_FPS,
            // NPN low-side switching: HIGH turns the sector on
            sector_active_high: true,
        }
    }
}

impl Builder {
    /// Create a new Builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the anode-enable pins, least significant sector first (required)
    pub fn sector_pins(mut self, pins: &[u8]) -> Self {
        self.sector_pins = pins.to_vec();
        self
    }

    /// Set the decoder input pins A, B, C, D (required)
    pub fn input_pins(mut self, pins: [u8; CODE_WIDTH]) -> Self {
        self.input_pins = Some(pins);
        self
    }

    /// Set the decimal point pin
    pub fn dp_pin(mut self, pin: u8) -> Self {
        self.dp_pin = Some(pin);
        self
    }

    /// Use an already validated pin assignment
    pub fn pins(mut self, pins: PinAssignment) -> Self {
        self.sector_pins = pins.sector_pins;
        self.input_pins = Some(pins.input_pins);
        self.dp_pin = pins.dp_pin;
        self
    }

    /// Set the refresh rate in sector pulses per second
    pub fn fps(mut self, fps: u32) -> Self {
        self.fps = fps;
        self
    }

    /// Set the anode line level that lights a sector
    ///
    /// Default is active-high. Set to false for high-side (PNP) drivers.
    pub fn sector_active_high(mut self, active_high: bool) -> Self {
        self.sector_active_high = active_high;
        self
    }

    /// Build the configuration
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::MissingInputPins` if input pins were not set,
    /// `BuilderError::InvalidRefreshRate` for `fps == 0`, and the
    /// [`PinAssignment::new`] errors for the pins.
    pub fn build(self) -> Result<Config, BuilderError> {
        let input_pins = self.input_pins.ok_or(BuilderError::MissingInputPins)?;
        let pins = PinAssignment::new(&self.sector_pins, input_pins, self.dp_pin)?;
        if self.fps == 0 {
            return Err(BuilderError::InvalidRefreshRate { fps: self.fps });
        }
        Ok(Config {
            pins,
            fps: self.fps,
            sector_active_high: self.sector_active_high,
        })
    }
}
