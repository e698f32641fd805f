//! Driver settings

use crate::timing::{DEFAULT_BAUD_RATE_HZ, LATCH_BYTES};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Clock rate the spi runs at
    pub baud_rate_hz: u32,
    /// Length of the strip
    pub led_count: usize,
    /// Zero bytes before and after every frame
    pub latch_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub const fn new() -> Self {
        Self {
            baud_rate_hz: DEFAULT_BAUD_RATE_HZ,
            led_count: 0,
            latch_bytes: LATCH_BYTES,
        }
    }

    pub const fn with_baud_rate(mut self, baud_rate_hz: u32) -> Self {
        self.baud_rate_hz = baud_rate_hz;
        self
    }

    pub const fn with_led_count(mut self, led_count: usize) -> Self {
        self.led_count = led_count;
        self
    }

    pub const fn with_latch_bytes(mut self, latch_bytes: usize) -> Self {
        self.latch_bytes = latch_bytes;
        self
    }

    /// Size the latch so the line stays low for at least `reset_ns`
    pub const fn with_reset_time(self, reset_ns: u32) -> Self {
        let latch_bytes = latch_bytes_for_reset(reset_ns, self.baud_rate_hz);
        self.with_latch_bytes(latch_bytes)
    }
}

/// Number of zero bytes that hold the line low for at least `reset_ns` at
/// `baud_rate_hz`.
///
/// Datasheet reset times:
///
/// | chip   | reset      | bytes at 3MHz |
/// |--------|------------|---------------|
/// | ws2812 | 50,000ns   | 19            |
/// | ws2813 | 300,000ns  | 113           |
/// | sk6812 | 80,000ns   | 30            |
pub const fn latch_bytes_for_reset(reset_ns: u32, baud_rate_hz: u32) -> usize {
    let cells = (reset_ns as u64 * baud_rate_hz as u64 + 999_999_999) / 1_000_000_000;
    ((cells + 7) / 8) as usize
}
