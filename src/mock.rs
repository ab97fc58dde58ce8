//! Recording GPIO pins shared by the unit tests

use alloc::vec::Vec;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError};

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, OutputPin};

use crate::config::{Builder, Config};
use crate::interface::Interface;

/// Decoder inputs used by [`PinBank::config`]
pub const INPUTS: [u8; 4] = [2, 3, 4, 17];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockError {
    pub pin: u8,
}

impl embedded_hal::digital::Error for MockError {
    fn kind(&self) -> embedded_hal::digital::ErrorKind {
        embedded_hal::digital::ErrorKind::Other
    }
}

#[derive(Debug, Default)]
struct Bank {
    levels: BTreeMap<u8, bool>,
    events: Vec<(u8, bool)>,
    failing: Option<u8>,
}

/// Shared state of every pin handed out by the bank
#[derive(Debug, Clone, Default)]
pub struct PinBank {
    inner: Arc<Mutex<Bank>>,
}

impl PinBank {
    pub fn new() -> Self {
        Self::default()
    }

    fn with<T>(&self, f: impl FnOnce(&mut Bank) -> T) -> T {
        f(&mut self.inner.lock().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn pin(&self, id: u8) -> MockPin {
        MockPin {
            id,
            bank: self.clone(),
        }
    }

    /// Four-input config with the given sectors and dot pin
    pub fn config(&self, sectors: &[u8], dp: Option<u8>) -> Config {
        let mut builder = Builder::new()
            .sector_pins(sectors)
            .input_pins(INPUTS)
            .fps(100_000);
        if let Some(pin) = dp {
            builder = builder.dp_pin(pin);
        }
        builder.build().unwrap()
    }

    pub fn interface(&self, config: &Config) -> Interface<MockPin> {
        Interface::open(config, |id| Ok::<_, MockError>(self.pin(id))).unwrap()
    }

    /// Current level, low if never driven
    pub fn level(&self, id: u8) -> bool {
        self.with(|bank| bank.levels.get(&id).copied().unwrap_or(false))
    }

    pub fn levels(&self, ids: &[u8]) -> Vec<bool> {
        ids.iter().map(|&id| self.level(id)).collect()
    }

    /// Decoder input value currently latched
    pub fn code(&self) -> u8 {
        INPUTS
            .iter()
            .enumerate()
            .map(|(bit, &id)| u8::from(self.level(id)) << bit)
            .sum()
    }

    pub fn events(&self) -> Vec<(u8, bool)> {
        self.with(|bank| bank.events.clone())
    }

    pub fn take_events(&self) -> Vec<(u8, bool)> {
        self.with(|bank| core::mem::take(&mut bank.events))
    }

    /// Make every write to `id` fail from now on
    pub fn fail_on(&self, id: u8) {
        self.with(|bank| bank.failing = Some(id));
    }
}

#[derive(Debug)]
pub struct MockPin {
    id: u8,
    bank: PinBank,
}

impl MockPin {
    pub fn id(&self) -> u8 {
        self.id
    }

    fn drive(&mut self, level: bool) -> Result<(), MockError> {
        let id = self.id;
        self.bank.with(|bank| {
            if bank.failing == Some(id) {
                return Err(MockError { pin: id });
            }
            bank.levels.insert(id, level);
            bank.events.push((id, level));
            Ok(())
        })
    }
}

impl ErrorType for MockPin {
    type Error = MockError;
}

impl OutputPin for MockPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.drive(false)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.drive(true)
    }
}

/// Delay that only records what was requested
#[derive(Debug, Default)]
pub struct MockDelay {
    pub calls: Vec<u32>,
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.calls.push(ns);
    }
}
