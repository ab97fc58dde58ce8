//! BCD digit codec
//!
//! This module translates the value held by a sector into the 4-bit code that
//! is latched onto the decoder inputs (A, B, C, D).
//!
//! ## Code Table
//!
//! | Value  | Meaning                          | D C B A |
//! |--------|----------------------------------|---------|
//! | 0 - 9  | Decimal digit                    | value   |
//! | 10 - 14| Chip-specific symbol (undefined) | value   |
//! | 15     | Blank sector ([`Digit::BLANK`])  | 1 1 1 1 |
//!
//! ## Example
//!
//! ```
//! use numeric_display::Digit;
//!
//! let Some(six) = Digit::new(6) else { return };
//! let code = six.code();
//! assert_eq!(code.levels(), [false, true, true, false]); // A, B, C, D
//!
//! assert!(Digit::BLANK.is_blank());
//! assert_eq!(Digit::from(None), Digit::BLANK);
//! ```

/// Largest value representable on the four decoder inputs
pub const MAX_CODE: u8 = 0x0F;

/// Number of decoder input lines
pub const CODE_WIDTH: usize = 4;

/// Value of a single display sector
///
/// Wraps a raw 4-bit code. Values 10 to 14 are accepted and passed through to
/// the decoder unchanged; what the chip lights for them is not defined.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Digit(u8);

impl Digit {
    /// Sector switched off
    pub const BLANK: Self = Self(MAX_CODE);

    /// Decimal zero
    pub const ZERO: Self = Self(0);

    /// Create a digit from a raw 4-bit value
    ///
    /// Returns `None` for values above [`MAX_CODE`].
    pub const fn new(value: u8) -> Option<Self> {
        if value <= MAX_CODE {
            Some(Self(value))
        } else {
            None
        }
    }

    /// Least significant decimal digit of `value`
    pub const fn from_decimal(value: u64) -> Self {
        Self((value % 10) as u8)
    }

    /// Raw 4-bit value
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Whether the sector is switched off
    pub const fn is_blank(self) -> bool {
        self.0 == MAX_CODE
    }

    /// Whether the value is a decimal digit (0 to 9)
    pub const fn is_decimal(self) -> bool {
        self.0 <= 9
    }

    /// Code latched onto the decoder inputs for this digit
    ///
    /// For [`Digit::BLANK`] the code does not matter, since the sector's
    /// anode line is held inactive.
    pub const fn code(self) -> BinaryCode {
        BinaryCode(self.0)
    }
}

impl Default for Digit {
    fn default() -> Self {
        Self::BLANK
    }
}

impl TryFrom<u8> for Digit {
    type Error = DigitError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(DigitError { value })
    }
}

impl TryFrom<Option<u8>> for Digit {
    type Error = DigitError;

    fn try_from(value: Option<u8>) -> Result<Self, Self::Error> {
        value.map_or(Ok(Self::BLANK), Self::try_from)
    }
}

impl From<Option<Digit>> for Digit {
    fn from(value: Option<Digit>) -> Self {
        value.unwrap_or(Self::BLANK)
    }
}

impl core::fmt::Display for Digit {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        use core::fmt::Write;

        let symbol = match self.0 {
            value @ 0..=9 => char::from(b'0' + value),
            MAX_CODE => '_',
            _ => '?',
        };
        f.write_char(symbol)
    }
}

/// Digit value that does not fit in four bits
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DigitError {
    /// Rejected value
    pub value: u8,
}

impl core::fmt::Display for DigitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Digit value {} exceeds {MAX_CODE}", self.value)
    }
}

impl core::error::Error for DigitError {}

/// Levels of the four decoder input lines
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BinaryCode(u8);

impl BinaryCode {
    /// All input lines low
    pub const OFF: Self = Self(0);

    /// Raw code, bit 0 is input A
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Level of input line `line` (0 = A, least significant)
    pub const fn bit(self, line: usize) -> bool {
        line < CODE_WIDTH && (self.0 >> line) & 1 == 1
    }

    /// Levels of inputs A, B, C, D in that order
    pub const fn levels(self) -> [bool; CODE_WIDTH] {
        [self.bit(0), self.bit(1), self.bit(2), self.bit(3)]
    }
}
