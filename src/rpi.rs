//! Raspberry Pi GPIO backend (requires `rppal` feature)
//!
//! Opens the BCM pin numbers of a [`Config`] through `rppal`.
//!
//! ## Example
//!
//! ```rust,no_run
//! use numeric_display::{Builder, DisplayBcd, RpiInterface};
//!
//! let config = Builder::new()
//!     .sector_pins(&[27, 22, 10, 9])
//!     .input_pins([2, 3, 4, 17])
//!     .build()?;
//! let interface = RpiInterface::from_gpio(&config)?;
//! let display = DisplayBcd::new(interface, config)?;
//!
//! display.write_number(666, None)?; // _666
//! std::thread::sleep(std::time::Duration::from_secs(1));
//! display.stop()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use rppal::gpio::{Gpio, OutputPin};

use crate::config::Config;
use crate::interface::Interface;

/// [`Interface`] over Raspberry Pi output pins
pub type RpiInterface = Interface<OutputPin>;

impl Interface<OutputPin> {
    /// Claim every configured pin as an output, driven low
    ///
    /// # Errors
    ///
    /// Returns the `rppal` error if the GPIO peripheral cannot be opened or a
    /// pin is unavailable.
    pub fn from_gpio(config: &Config) -> Result<Self, rppal::gpio::Error> {
        let gpio = Gpio::new()?;
        log::debug!("opening BCM pins {:?}", config.pins);
        Self::open(config, |pin| gpio.get(pin).map(|pin| pin.into_output_low()))
    }
}
