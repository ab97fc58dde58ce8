//! Common interface of numeric display controllers
//!
//! [`NumericDisplay`] is implemented by the single-owner [`Display`] and by
//! the threaded [`DisplayBcd`](crate::bcd::DisplayBcd), so application code
//! can be written once against either.
//!
//! ## Example
//!
//! ```
//! use numeric_display::{Digit, NumericDisplay};
//!
//! fn countdown<D: NumericDisplay>(display: &mut D, from: u64) -> Result<(), D::Error> {
//!     for n in (0..=from).rev() {
//!         display.write_number(n, None)?;
//!     }
//!     display.write_digit(Digit::BLANK, 1)
//! }
//! ```

use crate::digit::Digit;
use crate::display::Display;
use crate::error::Error;
use crate::interface::BcdInterface;

/// Operations every numeric display controller supports
///
/// Positions are 1-based; position 1 is the least significant sector.
pub trait NumericDisplay {
    /// Error returned by every operation
    type Error;

    /// Number of sectors (digits)
    fn sector_count(&self) -> usize;

    /// Write one digit
    fn write_digit(&mut self, digit: Digit, position: usize) -> Result<(), Self::Error>;

    /// Switch one dot on or off
    fn write_dp(&mut self, on: bool, position: usize) -> Result<(), Self::Error>;

    /// Write a decimal number, keeping sectors above its width
    fn write_number(&mut self, number: u64, dot: Option<usize>) -> Result<(), Self::Error>;

    /// Overwrite every sector, least significant first
    fn write_digits(&mut self, digits: &[Digit], dot: Option<usize>) -> Result<(), Self::Error>;

    /// Re-drive the pins from the buffer
    fn update(&mut self) -> Result<(), Self::Error>;

    /// Blank every sector and dot
    fn clean(&mut self) -> Result<(), Self::Error>;

    /// Stop for good and darken the display
    fn stop(&mut self) -> Result<(), Self::Error>;
}

impl<I: BcdInterface> NumericDisplay for Display<I> {
    type Error = Error<I::Error>;

    fn sector_count(&self) -> usize {
        Display::sector_count(self)
    }

    fn write_digit(&mut self, digit: Digit, position: usize) -> Result<(), Self::Error> {
        Display::write_digit(self, digit, position)
    }

    fn write_dp(&mut self, on: bool, position: usize) -> Result<(), Self::Error> {
        Display::write_dp(self, on, position)
    }

    fn write_number(&mut self, number: u64, dot: Option<usize>) -> Result<(), Self::Error> {
        Display::write_number(self, number, dot)
    }

    fn write_digits(&mut self, digits: &[Digit], dot: Option<usize>) -> Result<(), Self::Error> {
        Display::write_digits(self, digits, dot)
    }

    fn update(&mut self) -> Result<(), Self::Error> {
        Display::update(self)
    }

    fn clean(&mut self) -> Result<(), Self::Error> {
        Display::clean(self)
    }

    fn stop(&mut self) -> Result<(), Self::Error> {
        Display::stop(self)
    }
}
