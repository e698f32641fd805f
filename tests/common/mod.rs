//! Shared test infrastructure for the integration tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use std::sync::Mutex;

use embedded_hal::blocking::spi::Write;
use embedded_hal::spi::FullDuplex;

// ============================================================================
// Mock SPI
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockError;

/// Blocking spi that records every transfer
#[derive(Default)]
pub struct MockSpi {
    pub transfers: Vec<Vec<u8>>,
    pub fail: bool,
}

impl MockSpi {
    pub fn failing() -> Self {
        Self {
            transfers: Vec::new(),
            fail: true,
        }
    }
}

impl Write<u8> for MockSpi {
    type Error = MockError;

    fn write(&mut self, words: &[u8]) -> Result<(), MockError> {
        if self.fail {
            return Err(MockError);
        }
        self.transfers.push(words.to_vec());
        Ok(())
    }
}

/// Full duplex spi with a two byte fifo, stalling every other send
#[derive(Default)]
pub struct MockFullDuplex {
    pub sent: Vec<u8>,
    pub in_flight: usize,
    pub max_in_flight: usize,
    stall: bool,
}

impl FullDuplex<u8> for MockFullDuplex {
    type Error = MockError;

    fn read(&mut self) -> nb::Result<u8, MockError> {
        if self.in_flight == 0 {
            return Err(nb::Error::Other(MockError));
        }
        self.in_flight -= 1;
        Ok(0)
    }

    fn send(&mut self, word: u8) -> nb::Result<(), MockError> {
        self.stall = !self.stall;
        if self.stall {
            return Err(nb::Error::WouldBlock);
        }
        if self.in_flight == 2 {
            return Err(nb::Error::Other(MockError));
        }
        self.sent.push(word);
        self.in_flight += 1;
        self.max_in_flight = self.max_in_flight.max(self.in_flight);
        Ok(())
    }
}

// ============================================================================
// Capturing logger
// ============================================================================

struct CaptureLogger {
    warnings: Mutex<Vec<String>>,
}

impl log::Log for CaptureLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::Level::Warn
    }

    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            self.warnings
                .lock()
                .unwrap()
                .push(record.args().to_string());
        }
    }

    fn flush(&self) {}
}

static LOGGER: CaptureLogger = CaptureLogger {
    warnings: Mutex::new(Vec::new()),
};

/// Install the capturing logger, safe to call from every test
pub fn init_logger() {
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(log::LevelFilter::Warn);
    }
}

/// Warnings logged so far that mention `needle`
pub fn warnings_containing(needle: &str) -> Vec<String> {
    LOGGER
        .warnings
        .lock()
        .unwrap()
        .iter()
        .filter(|w| w.contains(needle))
        .cloned()
        .collect()
}
