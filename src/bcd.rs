//! Display with a background refresh thread (requires `std` feature)
//!
//! [`DisplayBcd`] wraps a [`Display`] in a mutex and steps it from a
//! dedicated thread, one sector per dwell period. Writes from any thread take
//! the same lock, so a refresh step never sees half of a bulk write.
//!
//! The refresher sleeps on a condition variable rather than a plain sleep, so
//! [`DisplayBcd::stop`] wakes it immediately instead of waiting out the dwell.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::thread;
//! use std::time::Duration;
//!
//! use numeric_display::{Builder, DisplayBcd, Interface};
//! # use core::convert::Infallible;
//! # use embedded_hal::digital::OutputPin;
//! # struct MockPin;
//! # impl embedded_hal::digital::ErrorType for MockPin { type Error = Infallible; }
//! # impl OutputPin for MockPin {
//! #     fn set_low(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! #     fn set_high(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! let config = Builder::new()
//!     .sector_pins(&[27, 22, 10, 9])
//!     .input_pins([2, 3, 4, 17])
//!     .dp_pin(11)
//!     .build()?;
//! let interface = Interface::open(&config, |_pin| Ok::<_, Infallible>(MockPin))?;
//! let display = Arc::new(DisplayBcd::new(interface, config)?);
//!
//! let writer = Arc::clone(&display);
//! thread::spawn(move || {
//!     for n in 0..=9999 {
//!         let _ = writer.write_number(n, None);
//!         thread::sleep(Duration::from_millis(10));
//!     }
//! });
//!
//! thread::sleep(Duration::from_secs(1));
//! display.write_number(666, Some(2))?; // _66.6
//! thread::sleep(Duration::from_secs(1));
//! display.stop()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

use crate::buffer::DigitBuffer;
use crate::config::Config;
use crate::device::NumericDisplay;
use crate::digit::Digit;
use crate::display::{Display, State};
use crate::error::Error;
use crate::interface::BcdInterface;

type BcdResult<I> = Result<(), Error<<I as BcdInterface>::Error>>;

/// Name of the refresh thread
pub const REFRESH_THREAD_NAME: &str = "numeric-display";

struct Shared<I: BcdInterface> {
    display: Mutex<Display<I>>,
    wake: Condvar,
}

impl<I: BcdInterface> Shared<I> {
    fn lock(&self) -> MutexGuard<'_, Display<I>> {
        self.display.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Refresh loop; returns when the display stops
    fn run(&self) -> BcdResult<I> {
        let mut display = self.lock();
        log::debug!("refresh thread started, dwell {:?}", display.config().dwell());
        while display.is_running() {
            display.step()?;
            let dwell = display.config().dwell();
            display = match self
                .wake
                .wait_timeout_while(display, dwell, |display| display.is_running())
            {
                Ok((display, _)) => display,
                Err(poisoned) => poisoned.into_inner().0,
            };
        }
        log::debug!("refresh thread finished");
        Ok(())
    }
}

/// BCD-decoded numeric display refreshed by a background thread
///
/// Every method takes `&self`; share the display between threads with an
/// [`Arc`]. Dropping the display stops it.
pub struct DisplayBcd<I>
where
    I: BcdInterface + Send + 'static,
    I::Error: Send + 'static,
{
    shared: Arc<Shared<I>>,
    refresher: Mutex<Option<JoinHandle<BcdResult<I>>>>,
}

impl<I> DisplayBcd<I>
where
    I: BcdInterface + Send + 'static,
    I::Error: Send + 'static,
{
    /// Take over `interface` and start refreshing
    ///
    /// # Errors
    ///
    /// Returns the [`Display::new`] errors, or `Error::Spawn` if the refresh
    /// thread cannot be started.
    pub fn new(interface: I, config: Config) -> Result<Self, Error<I::Error>> {
        let display = Display::new(interface, config)?;
        let shared = Arc::new(Shared {
            display: Mutex::new(display),
            wake: Condvar::new(),
        });

        let worker = Arc::clone(&shared);
        let refresher = thread::Builder::new()
            .name(REFRESH_THREAD_NAME.into())
            .spawn(move || {
                let result = worker.run();
                if let Err(e) = &result {
                    log::error!("refresh thread failed: {e}");
                }
                result
            })
            .map_err(Error::Spawn)?;

        Ok(Self {
            shared,
            refresher: Mutex::new(Some(refresher)),
        })
    }

    fn lock(&self) -> MutexGuard<'_, Display<I>> {
        self.shared.lock()
    }

    /// Write one digit to 1-based `position` (1 = least significant)
    pub fn write_digit(&self, digit: Digit, position: usize) -> BcdResult<I> {
        self.lock().write_digit(digit, position)
    }

    /// Switch the dot at 1-based `position` on or off
    pub fn write_dp(&self, on: bool, position: usize) -> BcdResult<I> {
        self.lock().write_dp(on, position)
    }

    /// Write a decimal number, optionally lighting the dot at `dot`
    ///
    /// Sectors above the number's width keep what they showed.
    pub fn write_number(&self, number: u64, dot: Option<usize>) -> BcdResult<I> {
        self.lock().write_number(number, dot)
    }

    /// Replace every sector with `digits` (least significant first)
    pub fn write_digits(&self, digits: &[Digit], dot: Option<usize>) -> BcdResult<I> {
        self.lock().write_digits(digits, dot)
    }

    /// Re-drive the sector currently shown from the buffer
    pub fn update(&self) -> BcdResult<I> {
        self.lock().update()
    }

    /// Blank every sector and dot; refreshing continues
    pub fn clean(&self) -> BcdResult<I> {
        self.lock().clean()
    }

    /// Stop refreshing, darken every line and wait for the refresh thread
    ///
    /// After this returns no pin is touched again.
    ///
    /// # Errors
    ///
    /// Returns the GPIO error that killed the refresh thread if there was
    /// one, otherwise `Error::Closed` if the display was already stopped.
    pub fn stop(&self) -> BcdResult<I> {
        let stopped = self.lock().stop();
        self.shared.wake.notify_all();

        let refresher = self
            .refresher
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = refresher {
            match handle.join() {
                Ok(Err(e)) => return Err(e),
                Ok(Ok(())) => {}
                Err(_) => log::error!("refresh thread panicked"),
            }
        }
        stopped
    }

    /// Copy of the buffer as the refresher currently sees it
    ///
    /// ```rust,ignore
    /// display.write_number(42, None)?;
    /// let shown = display.snapshot();
    /// assert_eq!(shown.digit(1), Some(Digit::from_decimal(2)));
    /// assert_eq!(shown.digit(5), None);
    /// ```
    pub fn snapshot(&self) -> DigitBuffer {
        self.lock().buffer().clone()
    }

    /// Lifecycle state
    pub fn state(&self) -> State {
        self.lock().state()
    }

    /// Whether writes are still accepted
    pub fn is_running(&self) -> bool {
        self.lock().is_running()
    }

    /// Number of sectors
    pub fn sector_count(&self) -> usize {
        self.lock().sector_count()
    }

    /// Get the display configuration
    pub fn config(&self) -> Config {
        self.lock().config().clone()
    }
}

impl<I> Drop for DisplayBcd<I>
where
    I: BcdInterface + Send + 'static,
    I::Error: Send + 'static,
{
    fn drop(&mut self) {
        let _ = self.stop();
    }
}

impl<I> NumericDisplay for DisplayBcd<I>
where
    I: BcdInterface + Send + 'static,
    I::Error: Send + 'static,
{
    type Error = Error<I::Error>;

    fn sector_count(&self) -> usize {
        DisplayBcd::sector_count(self)
    }

    fn write_digit(&mut self, digit: Digit, position: usize) -> Result<(), Self::Error> {
        DisplayBcd::write_digit(self, digit, position)
    }

    fn write_dp(&mut self, on: bool, position: usize) -> Result<(), Self::Error> {
        DisplayBcd::write_dp(self, on, position)
    }

    fn write_number(&mut self, number: u64, dot: Option<usize>) -> Result<(), Self::Error> {
        DisplayBcd::write_number(self, number, dot)
    }

    fn write_digits(&mut self, digits: &[Digit], dot: Option<usize>) -> Result<(), Self::Error> {
        DisplayBcd::write_digits(self, digits, dot)
    }

    fn update(&mut self) -> Result<(), Self::Error> {
        DisplayBcd::update(self)
    }

    fn clean(&mut self) -> Result<(), Self::Error> {
        DisplayBcd::clean(self)
    }

    fn stop(&mut self) -> Result<(), Self::Error> {
        DisplayBcd::stop(self)
    }
}
