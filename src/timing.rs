//! Protocol timing for driving ws2812 chips from an SPI bus.
//!
//! From the ws2812 datasheet typical values:
//!
//! - a `0` is a high/low pulse of 350ns/800ns
//! - a `1` is a high/low pulse of 700ns/600ns
//! - a reset (latch) is the line held low for 50,000ns
//!
//! At 3,000,000 bit/s every SPI bit is a 333ns cell, so a `0` becomes `1000`
//! (333ns high, 999ns low) and a `1` becomes `1100` (666ns high, 666ns low).
//! One SPI byte therefore carries two LED bits.

use core::ops::RangeInclusive;

use log::warn;

/// Maps a pair of LED bits to the SPI byte that clocks them out.
///
/// The high nibble carries the more significant LED bit.
pub const BITPAIR_TO_BYTE: [u8; 4] = [0b1000_1000, 0b1000_1100, 0b1100_1000, 0b1100_1100];

/// SPI bytes needed for one 8 bit colour channel
pub const SPI_BYTES_PER_COLOUR: usize = 4;

/// SPI bytes needed for one RGB led
pub const SPI_BYTES_PER_LED: usize = 3 * SPI_BYTES_PER_COLOUR;

/// Zero bytes sent before and after a frame.
///
/// 24 low bits at 3MHz is 8,000ns. That's well below the datasheet reset time,
/// but ws2812 and sk6812 parts latch reliably with it. Use
/// [`latch_bytes_for_reset`](crate::config::latch_bytes_for_reset) to stay
/// within the datasheet timing.
pub const LATCH_BYTES: usize = 3;

/// The clock rate [`BITPAIR_TO_BYTE`] is tuned for
pub const DEFAULT_BAUD_RATE_HZ: u32 = 3_000_000;

/// Clock rates at which the table still produces valid `0`/`1` pulses
pub const RECOMMENDED_BAUD_RATE_HZ: RangeInclusive<u32> = 2_050_000..=4_000_000;

/// SPI cells making up one LED bit
const CELLS_PER_SYMBOL: u32 = 4;

/// Warns if `baud_rate_hz` is outside [`RECOMMENDED_BAUD_RATE_HZ`].
///
/// This is advisory only, some strips tolerate wider margins. Returns whether
/// the rate is within the recommended range.
pub fn check_baud_rate(baud_rate_hz: u32) -> bool {
    let in_range = RECOMMENDED_BAUD_RATE_HZ.contains(&baud_rate_hz);
    if !in_range {
        warn!(
            "SPI rate {} outside recommended range ({} -> {})",
            baud_rate_hz,
            RECOMMENDED_BAUD_RATE_HZ.start(),
            RECOMMENDED_BAUD_RATE_HZ.end()
        );
    }
    in_range
}

/// Duration of a single SPI bit cell in nanoseconds, rounded to nearest
pub fn cell_duration_ns(baud_rate_hz: u32) -> u32 {
    if baud_rate_hz == 0 {
        return 0;
    }
    ((1_000_000_000u64 + baud_rate_hz as u64 / 2) / baud_rate_hz as u64) as u32
}

/// High and low time of a 4 cell symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pulse {
    pub high_cells: u32,
    pub low_cells: u32,
}

impl Pulse {
    pub fn high_ns(&self, baud_rate_hz: u32) -> u32 {
        self.high_cells * cell_duration_ns(baud_rate_hz)
    }

    pub fn low_ns(&self, baud_rate_hz: u32) -> u32 {
        self.low_cells * cell_duration_ns(baud_rate_hz)
    }
}

/// Splits the low 4 bits of `nibble` into the pulse they produce on the wire.
///
/// Returns `None` unless the cells are a run of ones followed by zeros.
pub fn pulse(nibble: u8) -> Option<Pulse> {
    let cells = nibble & 0b1111;
    // Shift the cells to the top of the byte so leading_ones counts from the first cell
    let high_cells = (cells << 4).leading_ones();
    let low_cells = CELLS_PER_SYMBOL - high_cells;
    if cells.count_ones() != high_cells {
        return None;
    }
    Some(Pulse {
        high_cells,
        low_cells,
    })
}

/// Reads the LED bit a 4 cell symbol stands for.
///
/// Two or more high cells is a `1`, a single one is a `0`. A symbol with no
/// high time or with gaps isn't a valid bit.
pub fn decode_symbol(nibble: u8) -> Option<bool> {
    match pulse(nibble)?.high_cells {
        0 => None,
        1 => Some(false),
        _ => Some(true),
    }
}

/// Recovers the bit pair an SPI byte encodes, the inverse of [`BITPAIR_TO_BYTE`]
pub fn decode_pattern(byte: u8) -> Option<u8> {
    let high = decode_symbol(byte >> 4)?;
    let low = decode_symbol(byte)?;
    Some((high as u8) << 1 | low as u8)
}
