//! Core display operations
//!
//! [`Display`] owns the digit buffer and the pins, and multiplexes the
//! sectors one dwell period at a time. It does not sleep on its own: call
//! [`Display::step`] from a timer, or [`Display::refresh`] with a delay, or use
//! [`DisplayBcd`](crate::bcd::DisplayBcd) for a background refresh thread.
//!
//! ## Refresh Step
//!
//! Each step drives the lines in this order:
//! 1. Darken the previously lit sector
//! 2. Latch the next sector's code onto the decoder inputs
//! 3. Set the dot line from the sector's dot flag
//! 4. Light the sector, unless its digit is blank
//!
//! Lighting last keeps the decoder from showing one sector's digit on its
//! neighbour.
//!
//! ## Example
//!
//! ```rust,no_run
//! use numeric_display::{Builder, Display, Interface};
//! # use core::convert::Infallible;
//! # use embedded_hal::delay::DelayNs;
//! # use embedded_hal::digital::OutputPin;
//! # struct MockPin;
//! # impl embedded_hal::digital::ErrorType for MockPin { type Error = Infallible; }
//! # impl OutputPin for MockPin {
//! #     fn set_low(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! #     fn set_high(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # struct MockDelay;
//! # impl DelayNs for MockDelay { fn delay_ns(&mut self, _ns: u32) {} }
//! # let mut delay = MockDelay;
//! let config = match Builder::new()
//!     .sector_pins(&[27, 22, 10, 9])
//!     .input_pins([2, 3, 4, 17])
//!     .build()
//! {
//!     Ok(config) => config,
//!     Err(_) => return,
//! };
//! let interface = match Interface::open(&config, |_pin| Ok::<_, Infallible>(MockPin)) {
//!     Ok(interface) => interface,
//!     Err(_) => return,
//! };
//! let Ok(mut display) = Display::new(interface, config) else { return };
//!
//! let _ = display.write_number(666, None);
//! loop {
//!     let _ = display.refresh(&mut delay);
//! }
//! ```

use embedded_hal::delay::DelayNs;

use crate::buffer::DigitBuffer;
use crate::config::Config;
use crate::digit::Digit;
use crate::error::{BuilderError, Error};
use crate::interface::BcdInterface;

type DisplayResult<I> = core::result::Result<(), Error<<I as BcdInterface>::Error>>;

/// Controller lifecycle
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum State {
    /// Refreshing and accepting writes
    #[default]
    Running,
    /// Stopped for good; every line is inactive
    Stopped,
}

/// Multiplexing controller for a BCD-decoded display
///
/// This is the main driver struct. It accepts writes into its
/// [`DigitBuffer`] and shows one sector per [`step`](Self::step).
pub struct Display<I>
where
    I: BcdInterface,
{
    /// Hardware interface
    interface: I,
    /// Display configuration
    config: Config,
    /// What the sectors show
    buffer: DigitBuffer,
    /// Sector selected by the refresh cycle (0-based)
    current: Option<usize>,
    /// Lifecycle state
    state: State,
}

impl<I> Display<I>
where
    I: BcdInterface,
{
    /// Create a new Display and drive every line inactive
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if `config` is invalid or the interface does
    /// not have the sectors and dot line it describes, or `Error::Interface`
    /// if the pins cannot be reset.
    pub fn new(mut interface: I, config: Config) -> Result<Self, Error<I::Error>> {
        config.validate()?;
        let lines = |sectors: usize, dot: bool| sectors + usize::from(dot);
        let expected = lines(config.sector_count(), config.pins.has_dot());
        let provided = lines(interface.sector_count(), interface.has_dot());
        if expected != provided || interface.sector_count() != config.sector_count() {
            return Err(BuilderError::SectorMismatch { expected, provided }.into());
        }

        interface.deactivate().map_err(Error::Interface)?;
        log::debug!(
            "numeric display ready: {} sectors, dot={}, dwell={:?}",
            config.sector_count(),
            config.pins.has_dot(),
            config.dwell()
        );

        Ok(Self {
            buffer: DigitBuffer::new(config.sector_count(), config.pins.has_dot()),
            interface,
            config,
            current: None,
            state: State::Running,
        })
    }

    /// Write one digit to 1-based `position` (1 = least significant)
    pub fn write_digit(&mut self, digit: Digit, position: usize) -> DisplayResult<I> {
        self.ensure_running()?;
        self.buffer.set_digit::<I::Error>(digit, position)?;
        log::trace!("digit {digit} at {position}");
        self.update()
    }

    /// Switch the dot at 1-based `position` on or off
    pub fn write_dp(&mut self, on: bool, position: usize) -> DisplayResult<I> {
        self.ensure_running()?;
        self.buffer.set_dot::<I::Error>(on, position)?;
        log::trace!("dot {on} at {position}");
        self.update()
    }

    /// Write a decimal number, optionally lighting the dot at `dot`
    ///
    /// Sectors above the number's width keep what they showed.
    pub fn write_number(&mut self, number: u64, dot: Option<usize>) -> DisplayResult<I> {
        self.ensure_running()?;
        self.buffer.set_number::<I::Error>(number, dot)?;
        log::trace!("number {number}, dot {dot:?}");
        self.update()
    }

    /// Replace every sector with `digits` (least significant first)
    ///
    /// Missing high sectors are blanked; extra digits are dropped.
    pub fn write_digits(&mut self, digits: &[Digit], dot: Option<usize>) -> DisplayResult<I> {
        self.ensure_running()?;
        self.buffer.set_digits::<I::Error>(digits, dot)?;
        log::trace!("{} digits, dot {dot:?}", digits.len());
        self.update()
    }

    /// Re-drive the selected sector from the buffer right away
    pub fn update(&mut self) -> DisplayResult<I> {
        self.ensure_running()?;
        let index = self.current.unwrap_or(0);
        self.show(index)
    }

    /// Move the refresh cycle to the next sector and show it
    pub fn step(&mut self) -> DisplayResult<I> {
        self.ensure_running()?;
        let next = self
            .current
            .map_or(0, |index| (index + 1) % self.buffer.sector_count());
        self.show(next)
    }

    /// Run one full frame: every sector for one dwell period
    pub fn refresh<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        let dwell = self.config.dwell_ns();
        for _ in 0..self.buffer.sector_count() {
            self.step()?;
            delay.delay_ns(dwell);
        }
        Ok(())
    }

    /// Blank every sector and dot; the refresh cycle keeps going
    pub fn clean(&mut self) -> DisplayResult<I> {
        self.ensure_running()?;
        self.buffer.clear();
        self.update()
    }

    /// Stop for good and drive every line inactive
    ///
    /// # Errors
    ///
    /// Returns `Error::Closed` if already stopped.
    pub fn stop(&mut self) -> DisplayResult<I> {
        self.ensure_running()?;
        self.state = State::Stopped;
        self.current = None;
        self.buffer.clear();
        log::info!("numeric display stopped");
        self.interface.deactivate().map_err(Error::Interface)
    }

    /// Stop (if still running) and give back the interface
    ///
    /// # Errors
    ///
    /// If the lines cannot be driven inactive the interface is handed back
    /// together with the `Error::Interface` that occurred.
    ///
    /// ```rust,ignore
    /// let (sectors, inputs, dp) = match display.release() {
    ///     Ok(interface) => interface.release(),
    ///     Err((interface, error)) => {
    ///         log::warn!("pins may still be lit: {error}");
    ///         interface.release()
    ///     }
    /// };
    /// ```
    pub fn release(mut self) -> Result<I, (I, Error<I::Error>)> {
        let stopped = if self.is_running() { self.stop() } else { Ok(()) };
        match stopped {
            Ok(()) => Ok(self.interface),
            Err(error) => {
                log::error!("failed to darken display on release: {error:?}");
                Err((self.interface, error))
            }
        }
    }

    /// Current buffer contents
    pub fn buffer(&self) -> &DigitBuffer {
        &self.buffer
    }

    /// Get the display configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Lifecycle state
    pub fn state(&self) -> State {
        self.state
    }

    /// Whether writes are still accepted
    pub fn is_running(&self) -> bool {
        self.state == State::Running
    }

    /// Number of sectors
    pub fn sector_count(&self) -> usize {
        self.buffer.sector_count()
    }

    fn ensure_running(&self) -> DisplayResult<I> {
        match self.state {
            State::Running => Ok(()),
            State::Stopped => Err(Error::Closed),
        }
    }

    fn show(&mut self, index: usize) -> DisplayResult<I> {
        let (digit, dot) = self.buffer.sector(index);
        let result = self.drive(index, digit, dot);
        if let Err(e) = &result {
            self.fault(e);
        }
        result.map_err(Error::Interface)
    }

    fn drive(&mut self, index: usize, digit: Digit, dot: bool) -> Result<(), I::Error> {
        if let Some(previous) = self.current {
            self.interface.set_sector(previous, false)?;
        }
        self.current = Some(index);
        self.interface.set_code(digit.code())?;
        self.interface.set_dot(dot)?;
        if !digit.is_blank() {
            self.interface.set_sector(index, true)?;
        }
        Ok(())
    }

    fn fault(&mut self, error: &I::Error) {
        log::error!("GPIO failure, stopping display: {error:?}");
        self.state = State::Stopped;
        self.current = None;
        self.buffer.clear();
        let _ = self.interface.deactivate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Builder, PinAssignment};
    use crate::interface::Interface;
    use crate::mock::{INPUTS, MockDelay, MockError, MockPin, PinBank};
    use alloc::string::ToString;
    use alloc::vec::Vec;

    const SECTORS: [u8; 4] = [27, 22, 10, 9];
    const DP: u8 = 11;

    fn test_display(dot: bool) -> (Display<Interface<MockPin>>, PinBank) {
        let bank = PinBank::new();
        let config = bank.config(&SECTORS, dot.then_some(DP));
        let display = Display::new(bank.interface(&config), config).unwrap();
        (display, bank)
    }

    fn lit_sectors(bank: &PinBank) -> Vec<u8> {
        SECTORS
            .iter()
            .copied()
            .filter(|&pin| bank.level(pin))
            .collect()
    }

    #[test]
    fn test_new_starts_blank_and_dark() {
        let (display, bank) = test_display(true);
        assert_eq!(display.state(), State::Running);
        assert_eq!(display.buffer().to_string(), "____");
        assert_eq!(bank.levels(&[27, 22, 10, 9, 2, 3, 4, 17, DP]), [false; 9]);
        assert!(bank.events().iter().all(|&(_, level)| !level));
    }

    #[test]
    fn test_new_rejects_mismatched_interface() {
        let bank = PinBank::new();
        let config = bank.config(&SECTORS, None);
        let interface = bank.interface(&bank.config(&SECTORS[..2], None));
        let result = Display::new(interface, config);
        assert!(matches!(
            result,
            Err(Error::Config(BuilderError::SectorMismatch {
                expected: 4,
                provided: 2
            }))
        ));

        let config = bank.config(&SECTORS, Some(DP));
        let interface = bank.interface(&bank.config(&SECTORS, None));
        assert!(Display::new(interface, config).is_err());
    }

    #[test]
    fn test_step_sets_code_before_lighting_sector() {
        let (mut display, bank) = test_display(true);
        display.write_number(42, Some(2)).unwrap();
        bank.take_events();

        display.step().unwrap();
        let events = bank.take_events();
        assert_eq!(events.first(), Some(&(27, false)));
        assert_eq!(events.last(), Some(&(22, true)));
        let inputs_and_dot = &events[1..events.len() - 1];
        let pins: Vec<u8> = inputs_and_dot.iter().map(|&(pin, _)| pin).collect();
        assert_eq!(pins, [2, 3, 4, 17, DP]);
        assert_eq!(bank.code(), 4);
        assert!(bank.level(DP));
    }

    #[test]
    fn test_each_sector_shows_its_own_digit() {
        let (mut display, bank) = test_display(false);
        let digits: Vec<Digit> = [5, 0, 9, 3]
            .iter()
            .map(|&v| Digit::new(v).unwrap())
            .collect();
        display.write_digits(&digits, None).unwrap();

        // write_digits already showed sector 0
        for step in 1..=8 {
            display.step().unwrap();
            let index = step % SECTORS.len();
            assert_eq!(bank.code(), digits[index].code().bits(), "step {step}");
            assert_eq!(lit_sectors(&bank), [SECTORS[index]]);
        }
    }

    #[test]
    fn test_write_digit_is_visible_after_update() {
        for position in 1..=SECTORS.len() {
            let (mut display, bank) = test_display(false);
            let digit = Digit::new(position as u8 + 4).unwrap();
            display.write_digit(digit, position).unwrap();
            for _ in 1..position {
                display.step().unwrap();
            }
            display.update().unwrap();
            assert_eq!(bank.code(), digit.code().bits());
            assert_eq!(lit_sectors(&bank), [SECTORS[position - 1]]);
        }
    }

    #[test]
    fn test_blank_sector_is_never_lit() {
        let (mut display, bank) = test_display(false);
        display.write_number(7, None).unwrap();
        bank.take_events();

        for _ in 0..8 {
            display.step().unwrap();
        }
        let events = bank.take_events();
        for pin in &SECTORS[1..] {
            assert!(!events.contains(&(*pin, true)), "pin {pin} lit");
        }
        assert!(events.contains(&(27, true)));
    }

    #[test]
    fn test_refresh_dwells_once_per_sector() {
        let (mut display, _bank) = test_display(false);
        let mut delay = MockDelay::default();
        display.refresh(&mut delay).unwrap();
        assert_eq!(delay.calls, [display.config().dwell_ns(); 4]);
    }

    #[test]
    fn test_write_errors_leave_buffer_unchanged() {
        let (mut display, _bank) = test_display(false);
        display.write_number(1234, None).unwrap();

        assert!(matches!(
            display.write_digit(Digit::ZERO, 5),
            Err(Error::OutOfRange { position: 5, .. })
        ));
        assert!(matches!(
            display.write_dp(true, 1),
            Err(Error::UnsupportedDot)
        ));
        assert!(matches!(
            display.write_number(12345, None),
            Err(Error::Overflow { .. })
        ));
        assert_eq!(display.buffer().to_string(), "1234");
        assert!(display.is_running());
    }

    #[test]
    fn test_clean_twice_matches_clean_once() {
        let (mut display, bank) = test_display(true);
        display.write_number(88, Some(1)).unwrap();
        display.clean().unwrap();
        let once = (display.buffer().clone(), bank.levels(&[27, 22, 10, 9, DP]));
        display.clean().unwrap();
        let twice = (display.buffer().clone(), bank.levels(&[27, 22, 10, 9, DP]));
        assert_eq!(once, twice);
        assert_eq!(display.buffer().to_string(), "____");
        assert!(lit_sectors(&bank).is_empty());
        assert!(display.is_running());
    }

    #[test]
    fn test_stop_darkens_everything_and_closes() {
        let (mut display, bank) = test_display(true);
        display.write_number(9999, Some(3)).unwrap();
        display.step().unwrap();
        display.stop().unwrap();

        let mut all = SECTORS.to_vec();
        all.extend(INPUTS);
        all.push(DP);
        assert!(bank.levels(&all).iter().all(|&level| !level));
        assert_eq!(display.buffer().to_string(), "____");

        assert!(matches!(display.write_number(1, None), Err(Error::Closed)));
        assert!(matches!(display.write_digit(Digit::ZERO, 1), Err(Error::Closed)));
        assert!(matches!(display.write_dp(true, 1), Err(Error::Closed)));
        assert!(matches!(display.update(), Err(Error::Closed)));
        assert!(matches!(display.clean(), Err(Error::Closed)));
        assert!(matches!(display.stop(), Err(Error::Closed)));
        assert!(matches!(display.step(), Err(Error::Closed)));
    }

    #[test]
    fn test_pin_failure_stops_display() {
        let (mut display, bank) = test_display(false);
        display.write_number(5, None).unwrap();
        bank.fail_on(3);

        let result = display.step();
        assert!(matches!(result, Err(Error::Interface(MockError { pin: 3 }))));
        assert_eq!(display.state(), State::Stopped);
        assert!(lit_sectors(&bank).is_empty());
        assert!(matches!(display.write_number(1, None), Err(Error::Closed)));
    }

    #[test]
    fn test_release_returns_dark_interface() {
        let bank = PinBank::new();
        let config = Builder::new()
            .sector_pins(&[27])
            .input_pins(INPUTS)
            .build()
            .unwrap();
        let mut display = Display::new(bank.interface(&config), config).unwrap();
        display.write_number(8, None).unwrap();
        assert!(bank.level(27));

        let released = display.release();
        assert!(!bank.level(27));
        assert!(matches!(released, Ok(interface) if interface.sector_count() == 1));
    }

    #[test]
    fn test_release_reports_failed_deactivation() {
        let (mut display, bank) = test_display(false);
        display.write_number(8, None).unwrap();
        bank.fail_on(27);

        let released = display.release();
        assert!(matches!(
            released,
            Err((interface, Error::Interface(MockError { pin: 27 })))
                if interface.sector_count() == 4
        ));
    }

    #[test]
    fn test_release_after_stop_succeeds() {
        let (mut display, bank) = test_display(false);
        display.stop().unwrap();
        bank.fail_on(27);
        assert!(display.release().is_ok());
    }

    #[test]
    fn test_new_rejects_hand_built_config() {
        let bank = PinBank::new();
        let empty = Config {
            pins: PinAssignment {
                sector_pins: Vec::new(),
                input_pins: INPUTS,
                dp_pin: None,
            },
            fps: 1000,
            sector_active_high: true,
        };
        let interface = Interface::new(Vec::new(), INPUTS.map(|id| bank.pin(id)), None);
        assert!(matches!(
            Display::new(interface, empty),
            Err(Error::Config(BuilderError::NoSectors))
        ));

        let mut stalled = bank.config(&SECTORS, None);
        stalled.fps = 0;
        assert!(matches!(
            Display::new(bank.interface(&stalled), stalled),
            Err(Error::Config(BuilderError::InvalidRefreshRate { fps: 0 }))
        ));

        let mut clashing = bank.config(&SECTORS, None);
        clashing.pins.sector_pins[1] = INPUTS[0];
        let interface = Interface::new(
            SECTORS.iter().map(|&id| bank.pin(id)).collect(),
            INPUTS.map(|id| bank.pin(id)),
            None,
        );
        assert!(matches!(
            Display::new(interface, clashing),
            Err(Error::Config(BuilderError::PinConflict { pin: 2 }))
        ));
        assert!(bank.events().is_empty());
    }

    #[test]
    fn test_active_low_sectors_stop_high() {
        let bank = PinBank::new();
        let config = Builder::new()
            .sector_pins(&SECTORS)
            .input_pins(INPUTS)
            .dp_pin(DP)
            .sector_active_high(false)
            .build()
            .unwrap();
        let mut display = Display::new(bank.interface(&config), config).unwrap();
        assert!(bank.levels(&SECTORS).iter().all(|&level| level));

        display.write_number(8888, Some(1)).unwrap();
        for _ in 0..SECTORS.len() {
            display.step().unwrap();
            let lit = SECTORS.iter().filter(|&&pin| !bank.level(pin)).count();
            assert_eq!(lit, 1);
        }

        display.stop().unwrap();
        assert!(bank.levels(&SECTORS).iter().all(|&level| level));
        assert!(bank.levels(&INPUTS).iter().all(|&level| !level));
        assert!(!bank.level(DP));
    }
}
