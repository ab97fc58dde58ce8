//! Error types for the driver
//!
//! This module defines error types for configuration building ([`BuilderError`])
//! and display operations ([`Error`]).
//!
//! ## Error Types
//!
//! - [`BuilderError`] - Invalid pin assignment or refresh rate
//! - [`Error`] - Runtime errors returned by write, update and lifecycle operations
//! - [`DigitError`](crate::digit::DigitError) - Value that does not fit the decoder inputs
//!
//! Every runtime error except [`Error::Interface`] is raised before the digit
//! buffer is touched, so a rejected call leaves the display unchanged.
//!
//! ## Example
//!
//! ```
//! use numeric_display::{Builder, BuilderError};
//!
//! // Missing decoder inputs
//! let result = Builder::new().sector_pins(&[27, 22, 10, 9]).build();
//! assert!(matches!(result, Err(BuilderError::MissingInputPins)));
//!
//! // Same pin used twice
//! let result = Builder::new()
//!     .sector_pins(&[27, 22, 10, 9])
//!     .input_pins([2, 3, 4, 2])
//!     .build();
//! assert!(matches!(result, Err(BuilderError::PinConflict { pin: 2 })));
//! ```

/// Errors that can occur when building configuration
///
/// These errors occur before the display is created; a controller never
/// starts running with an invalid configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuilderError {
    /// Decoder input pins were not specified
    ///
    /// [`Builder::input_pins()`](crate::config::Builder::input_pins) must be called before building.
    MissingInputPins,
    /// No sector (anode-enable) pins were specified
    NoSectors,
    /// Refresh rate must be at least 1 frame per second
    InvalidRefreshRate {
        /// Requested frames per second
        fps: u32,
    },
    /// The same pin number appears more than once in the assignment
    PinConflict {
        /// Pin number used twice
        pin: u8,
    },
    /// The hardware interface does not match the configured pin assignment
    SectorMismatch {
        /// Sectors (and dot line) in the configuration
        expected: usize,
        /// Sectors (and dot line) offered by the interface
        provided: usize,
    },
}

impl core::fmt::Display for BuilderError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::MissingInputPins => write!(f, "Decoder input pins must be specified"),
            Self::NoSectors => write!(f, "At least one sector pin is required"),
            Self::InvalidRefreshRate { fps } => {
                write!(f, "Invalid refresh rate {fps} fps (must be at least 1)")
            }
            Self::PinConflict { pin } => write!(f, "Pin {pin} is assigned more than once"),
            Self::SectorMismatch { expected, provided } => write!(
                f,
                "Interface does not match configuration: expected {expected} lines, provided {provided}"
            ),
        }
    }
}

impl core::error::Error for BuilderError {}

/// Errors that can occur when interacting with the display
///
/// Generic over the pin error type to preserve the specific hardware error.
#[derive(Debug)]
pub enum Error<E> {
    /// Interface error (GPIO)
    ///
    /// Pin failures are fatal: the controller is stopped when one is returned.
    Interface(E),
    /// Invalid configuration at construction
    Config(BuilderError),
    /// Sector position outside `1..=sectors`
    OutOfRange {
        /// Requested position
        position: usize,
        /// Number of sectors on the display
        sectors: usize,
    },
    /// Number needs more digits than the display has sectors
    Overflow {
        /// Rejected number
        number: u64,
        /// Number of sectors on the display
        sectors: usize,
    },
    /// Dot write without a configured dot pin
    UnsupportedDot,
    /// The controller has been stopped
    Closed,
    /// The refresh thread could not be started
    #[cfg(feature = "std")]
    Spawn(std::io::Error),
}

impl<E: core::fmt::Debug> core::fmt::Display for Error<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Interface(e) => write!(f, "Interface error: {e:?}"),
            Self::Config(e) => write!(f, "Configuration error: {e}"),
            Self::OutOfRange { position, sectors } => {
                write!(f, "Position {position} out of range 1..={sectors}")
            }
            Self::Overflow { number, sectors } => {
                write!(f, "Number {number} does not fit in {sectors} sectors")
            }
            Self::UnsupportedDot => write!(f, "No dot pin configured"),
            Self::Closed => write!(f, "Display has been stopped"),
            #[cfg(feature = "std")]
            Self::Spawn(e) => write!(f, "Failed to start refresh thread: {e}"),
        }
    }
}

impl<E: core::fmt::Debug> core::error::Error for Error<E> {}

impl<E> From<BuilderError> for Error<E> {
    fn from(error: BuilderError) -> Self {
        Self::Config(error)
    }
}
