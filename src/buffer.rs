//! Per-sector digit and dot storage
//!
//! [`DigitBuffer`] holds what the refresh cycle shows. Positions are 1-based
//! and position 1 is the least significant (rightmost) sector.
//!
//! Every write validates all of its arguments before touching the buffer, so
//! a rejected call leaves digits and dots exactly as they were.
//!
//! ## Example
//!
//! ```
//! use numeric_display::{DigitBuffer, Error};
//!
//! let mut buffer = DigitBuffer::new(4, true);
//! let _ = buffer.set_number::<()>(666, Some(2));
//! assert_eq!(buffer.to_string(), "_66.6");
//!
//! let result = buffer.set_number::<()>(12345, None);
//! assert!(matches!(result, Err(Error::Overflow { .. })));
//! ```

use alloc::vec;
use alloc::vec::Vec;

use crate::digit::Digit;
use crate::error::Error;

/// Number of decimal digits needed to print `number` (at least 1)
pub fn decimal_width(number: u64) -> usize {
    number.checked_ilog10().map_or(1, |log| log as usize + 1)
}

/// Digit and dot state for every sector of a display
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DigitBuffer {
    digits: Vec<Digit>,
    dots: Option<Vec<bool>>,
}

impl DigitBuffer {
    /// Create an all-blank buffer
    ///
    /// The dot buffer only exists when `with_dot` is set.
    pub fn new(sectors: usize, with_dot: bool) -> Self {
        Self {
            digits: vec![Digit::BLANK; sectors],
            dots: with_dot.then(|| vec![false; sectors]),
        }
    }

    /// Number of sectors
    pub fn sector_count(&self) -> usize {
        self.digits.len()
    }

    /// Whether dots can be written
    pub fn has_dot(&self) -> bool {
        self.dots.is_some()
    }

    /// Digits, least significant first
    pub fn digits(&self) -> &[Digit] {
        &self.digits
    }

    /// Dot flags, least significant first
    pub fn dots(&self) -> Option<&[bool]> {
        self.dots.as_deref()
    }

    /// Digit at 1-based `position`
    pub fn digit(&self, position: usize) -> Option<Digit> {
        position
            .checked_sub(1)
            .and_then(|index| self.digits.get(index))
            .copied()
    }

    /// Dot at 1-based `position` (false without a dot pin)
    pub fn dot(&self, position: usize) -> bool {
        position
            .checked_sub(1)
            .and_then(|index| self.dots.as_ref()?.get(index))
            .copied()
            .unwrap_or(false)
    }

    /// Digit and dot shown by the sector at 0-based `index`
    pub(crate) fn sector(&self, index: usize) -> (Digit, bool) {
        let digit = self.digits.get(index).copied().unwrap_or(Digit::BLANK);
        let dot = self.dot(index + 1);
        (digit, dot)
    }

    fn index<E>(&self, position: usize) -> Result<usize, Error<E>> {
        if (1..=self.sector_count()).contains(&position) {
            Ok(position - 1)
        } else {
            Err(Error::OutOfRange {
                position,
                sectors: self.sector_count(),
            })
        }
    }

    fn dot_index<E>(&self, position: usize) -> Result<usize, Error<E>> {
        if !self.has_dot() {
            return Err(Error::UnsupportedDot);
        }
        self.index(position)
    }

    fn check_dot<E>(&self, position: Option<usize>) -> Result<Option<usize>, Error<E>> {
        position.map(|position| self.dot_index(position)).transpose()
    }

    fn light_dot(&mut self, index: Option<usize>) {
        if let (Some(index), Some(dots)) = (index, self.dots.as_mut()) {
            dots[index] = true;
        }
    }

    /// Write one digit
    ///
    /// # Errors
    ///
    /// Returns `Error::OutOfRange` if `position` is not in `1..=sectors`.
    pub fn set_digit<E>(&mut self, digit: Digit, position: usize) -> Result<(), Error<E>> {
        let index = self.index(position)?;
        self.digits[index] = digit;
        Ok(())
    }

    /// Switch one dot on or off
    ///
    /// # Errors
    ///
    /// Returns `Error::UnsupportedDot` without a dot buffer, then
    /// `Error::OutOfRange` for a bad position.
    pub fn set_dot<E>(&mut self, on: bool, position: usize) -> Result<(), Error<E>> {
        let index = self.dot_index(position)?;
        if let Some(dots) = self.dots.as_mut() {
            dots[index] = on;
        }
        Ok(())
    }

    /// Write the decimal digits of `number`, least significant at position 1
    ///
    /// Sectors above the number's width keep their contents. When `dot` is
    /// given that dot is switched on as well.
    ///
    /// # Errors
    ///
    /// Returns `Error::Overflow` if the number needs more digits than there
    /// are sectors, and the [`set_dot`](Self::set_dot) errors for `dot`.
    pub fn set_number<E>(&mut self, number: u64, dot: Option<usize>) -> Result<(), Error<E>> {
        let width = decimal_width(number);
        if width > self.sector_count() {
            return Err(Error::Overflow {
                number,
                sectors: self.sector_count(),
            });
        }
        let dot = self.check_dot(dot)?;

        let mut rest = number;
        for slot in self.digits.iter_mut().take(width) {
            *slot = Digit::from_decimal(rest);
            rest /= 10;
        }
        self.light_dot(dot);
        Ok(())
    }

    /// Overwrite every sector from `digits`, least significant first
    ///
    /// Sectors past the end of `digits` are blanked; entries past the last
    /// sector are dropped.
    ///
    /// # Errors
    ///
    /// Returns the [`set_dot`](Self::set_dot) errors for `dot`.
    pub fn set_digits<E>(&mut self, digits: &[Digit], dot: Option<usize>) -> Result<(), Error<E>> {
        let dot = self.check_dot(dot)?;

        let mut source = digits.iter().copied();
        for slot in &mut self.digits {
            *slot = source.next().unwrap_or(Digit::BLANK);
        }
        self.light_dot(dot);
        Ok(())
    }

    /// Blank every digit and switch every dot off
    pub fn clear(&mut self) {
        self.digits.fill(Digit::BLANK);
        if let Some(dots) = self.dots.as_mut() {
            dots.fill(false);
        }
    }
}

impl core::fmt::Display for DigitBuffer {
    /// Most significant sector first, `_` for blank, `.` after a lit dot
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for index in (0..self.sector_count()).rev() {
            let (digit, dot) = self.sector(index);
            write!(f, "{digit}")?;
            if dot {
                f.write_str(".")?;
            }
        }
        Ok(())
    }
}
