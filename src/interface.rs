//! Hardware interface abstraction
//!
//! This module provides the [`BcdInterface`] trait and the [`Interface`] struct
//! for driving a BCD decoder and the sector anodes over GPIO.
//!
//! ## Hardware Requirements
//!
//! A display with `N` sectors requires:
//! - 4 output pins to the decoder inputs A, B, C, D (shared by all sectors)
//! - `N` output pins, one per sector anode (through a transistor)
//! - 1 optional output pin for the decimal point
//!
//! A 4-sector display with a dot therefore uses 4 + 4 + 1 = 9 pins.
//!
//! ## Example
//!
//! ```rust,no_run
//! use numeric_display::{BcdInterface, Digit, Interface};
//! # use core::convert::Infallible;
//! # use embedded_hal::digital::OutputPin;
//! # struct MockPin;
//! # impl embedded_hal::digital::ErrorType for MockPin { type Error = Infallible; }
//! # impl OutputPin for MockPin {
//! #     fn set_low(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! #     fn set_high(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! // Two sectors, no dot
//! let mut interface = Interface::new(
//!     vec![MockPin, MockPin],
//!     [MockPin, MockPin, MockPin, MockPin],
//!     None,
//! );
//!
//! // Show 5 on the rightmost sector
//! # let Some(five) = Digit::new(5) else { return };
//! let _ = interface.set_code(five.code());
//! let _ = interface.set_sector(0, true);
//! ```

use alloc::vec::Vec;
use core::fmt::Debug;

use embedded_hal::digital::{OutputPin, PinState};

use crate::config::Config;
use crate::digit::{BinaryCode, CODE_WIDTH};

type InterfaceResult<T, E> = core::result::Result<T, E>;

/// Trait for the pin-level interface to a BCD-decoded display
///
/// This trait abstracts over the wiring so that the
/// [`Display`](crate::display::Display) controller can run on any GPIO
/// implementation. Sector indices are 0-based, index 0 being the least
/// significant sector.
pub trait BcdInterface {
    /// Error type for interface operations
    ///
    /// Must implement [`Debug`] for error reporting.
    type Error: Debug;

    /// Number of sector anode lines
    fn sector_count(&self) -> usize;

    /// Whether a decimal point line is wired
    fn has_dot(&self) -> bool;

    /// Light or darken one sector
    ///
    /// # Errors
    ///
    /// Returns an error if the GPIO write fails.
    #[allow(clippy::type_complexity)]
    fn set_sector(&mut self, index: usize, on: bool) -> InterfaceResult<(), Self::Error>;

    /// Drive the four decoder inputs
    ///
    /// # Errors
    ///
    /// Returns an error if the GPIO write fails.
    #[allow(clippy::type_complexity)]
    fn set_code(&mut self, code: BinaryCode) -> InterfaceResult<(), Self::Error>;

    /// Drive the decimal point line (no-op without one)
    ///
    /// # Errors
    ///
    /// Returns an error if the GPIO write fails.
    #[allow(clippy::type_complexity)]
    fn set_dot(&mut self, on: bool) -> InterfaceResult<(), Self::Error>;

    /// Darken every sector and pull the decoder inputs and dot line low
    ///
    /// All lines are driven even if one of them fails; the first error is
    /// returned.
    ///
    /// # Errors
    ///
    /// Returns the first GPIO error encountered.
    #[allow(clippy::type_complexity)]
    fn deactivate(&mut self) -> InterfaceResult<(), Self::Error> {
        let mut result = Ok(());
        for index in 0..self.sector_count() {
            result = result.and(self.set_sector(index, false));
        }
        result = result.and(self.set_code(BinaryCode::OFF));
        result.and(self.set_dot(false))
    }
}

/// GPIO implementation of [`BcdInterface`]
///
/// Implements [`BcdInterface`] for embedded-hal v1.0 output pins. All pins
/// share one type; use a type-erased pin (such as a HAL's `AnyPin` /
/// `Flex` / `rppal::gpio::OutputPin`) for mixed wiring.
///
/// ## Type Parameters
///
/// * `P` - Output pin implementing [`OutputPin`]
pub struct Interface<P> {
    /// Anode-enable pins, least significant sector first
    sectors: Vec<P>,
    /// Decoder inputs A, B, C, D
    inputs: [P; CODE_WIDTH],
    /// Decimal point pin
    dp: Option<P>,
    /// Sector polarity (true = HIGH lights the sector)
    sector_active_high: bool,
}

impl<P: OutputPin> Interface<P> {
    /// Create a new Interface
    ///
    /// # Arguments
    ///
    /// * `sectors` - Anode-enable pins, least significant sector first
    /// * `inputs` - Decoder inputs A, B, C, D (least significant bit first)
    /// * `dp` - Decimal point pin
    pub fn new(sectors: Vec<P>, inputs: [P; CODE_WIDTH], dp: Option<P>) -> Self {
        Self {
            sectors,
            inputs,
            dp,
            sector_active_high: true,
        }
    }

    /// Open every pin of `config` through `open`
    ///
    /// `open` receives each pin number from the configured
    /// [`PinAssignment`](crate::config::PinAssignment) and returns the
    /// corresponding output pin. Sector polarity is taken from the config.
    ///
    /// # Errors
    ///
    /// Returns the first error produced by `open`.
    pub fn open<F, E>(config: &Config, mut open: F) -> Result<Self, E>
    where
        F: FnMut(u8) -> Result<P, E>,
    {
        let pins = &config.pins;
        let sectors = pins
            .sector_pins
            .iter()
            .map(|&pin| open(pin))
            .collect::<Result<Vec<_>, _>>()?;
        let [a, b, c, d] = pins.input_pins;
        let inputs = [open(a)?, open(b)?, open(c)?, open(d)?];
        let dp = pins.dp_pin.map(&mut open).transpose()?;

        let mut interface = Self::new(sectors, inputs, dp);
        interface.set_sector_active_high(config.sector_active_high);
        Ok(interface)
    }

    /// Set sector polarity
    ///
    /// Default is active-high. Set to false for high-side (PNP) drivers.
    pub fn set_sector_active_high(&mut self, active_high: bool) -> &mut Self {
        self.sector_active_high = active_high;
        self
    }

    /// Get sector polarity (true = active high)
    pub fn sector_active_high(&self) -> bool {
        self.sector_active_high
    }

    /// Give the pins back
    pub fn release(self) -> (Vec<P>, [P; CODE_WIDTH], Option<P>) {
        (self.sectors, self.inputs, self.dp)
    }
}

impl<P: OutputPin> BcdInterface for Interface<P> {
    type Error = P::Error;

    fn sector_count(&self) -> usize {
        self.sectors.len()
    }

    fn has_dot(&self) -> bool {
        self.dp.is_some()
    }

    fn set_sector(&mut self, index: usize, on: bool) -> InterfaceResult<(), Self::Error> {
        let level = PinState::from(on == self.sector_active_high);
        match self.sectors.get_mut(index) {
            Some(pin) => pin.set_state(level),
            None => Ok(()),
        }
    }

    fn set_code(&mut self, code: BinaryCode) -> InterfaceResult<(), Self::Error> {
        for (pin, level) in self.inputs.iter_mut().zip(code.levels()) {
            pin.set_state(PinState::from(level))?;
        }
        Ok(())
    }

    fn set_dot(&mut self, on: bool) -> InterfaceResult<(), Self::Error> {
        match self.dp.as_mut() {
            Some(pin) => pin.set_state(PinState::from(on)),
            None => Ok(()),
        }
    }
}
