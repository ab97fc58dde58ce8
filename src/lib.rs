//! Multiplexed 7-Segment Numeric Display Driver
//!
//! A driver for multi-digit 7-segment displays whose digits share one BCD
//! decoder chip (74LS247 and friends) and are switched through one anode
//! line per digit ("sector").
//!
//! ## Features
//!
//! - `no_std` + `alloc` compatible (disable default features)
//! - `embedded-hal` v1.0 support
//! - Background refresh thread with `std` (default feature)
//! - Raspberry Pi backend with `rppal`
//! - Optional decimal point line
//! - Configurable refresh rate and sector polarity
//!
//! ## Wiring
//!
//! The decoder needs 4 pins (A, B, C, D) and each sector one more, so a
//! 4-sector display takes 4 + 4 = 8 GPIO pins, 9 with the dot.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use core::convert::Infallible;
//! use embedded_hal::digital::OutputPin;
//! use numeric_display::{Builder, DisplayBcd, Interface};
//!
//! # struct MockPin;
//! # impl embedded_hal::digital::ErrorType for MockPin { type Error = Infallible; }
//! # impl OutputPin for MockPin {
//! #     fn set_low(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! #     fn set_high(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! let config = match Builder::new()
//!     .sector_pins(&[27, 22, 10, 9]) // least significant digit first
//!     .input_pins([2, 3, 4, 17])     // A (least significant bit) .. D
//!     .dp_pin(11)
//!     .build()
//! {
//!     Ok(config) => config,
//!     Err(_) => return,
//! };
//! let interface = match Interface::open(&config, |_pin| Ok::<_, Infallible>(MockPin)) {
//!     Ok(interface) => interface,
//!     Err(_) => return,
//! };
//! let Ok(display) = DisplayBcd::new(interface, config) else { return };
//!
//! let _ = display.write_number(666, None);    // _666
//! let _ = display.write_number(666, Some(2)); // _66.6
//! let _ = display.stop();                     // dark
//! ```

#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![cfg_attr(docsrs, feature(doc_cfg))]

extern crate alloc;

/// Per-sector digit and dot storage
pub mod buffer;
/// Display configuration types and builder
pub mod config;
/// Common controller trait
pub mod device;
/// BCD digit codec
pub mod digit;
/// Multiplexing controller
pub mod display;
/// Error types for the driver
pub mod error;
/// Hardware interface abstraction
pub mod interface;

/// Background refresh thread (requires `std` feature)
#[cfg(feature = "std")]
pub mod bcd;

/// Raspberry Pi backend (requires `rppal` feature)
#[cfg(feature = "rppal")]
pub mod rpi;

#[cfg(test)]
mod mock;

pub use buffer::{DigitBuffer, decimal_width};
pub use config::{Builder, Config, DEFAULT_FPS, PinAssignment};
pub use device::NumericDisplay;
pub use digit::{BinaryCode, CODE_WIDTH, Digit, DigitError, MAX_CODE};
pub use display::{Display, State};
pub use error::{BuilderError, Error};
pub use interface::{BcdInterface, Interface};

#[cfg(feature = "std")]
pub use bcd::{DisplayBcd, REFRESH_THREAD_NAME};

#[cfg(feature = "rppal")]
pub use rpi::RpiInterface;
