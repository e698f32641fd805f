//! Prerenders whole frames into one buffer, so a frame goes out in a single
//! SPI transfer without any work while the bus is running.
//!
//! The buffer is laid out as
//!
//! ```text
//! [latch zeros][12 bytes per led ...][latch zeros]
//! ```
//!
//! The leading latch also resets the strip before the frame, which matters
//! when the line idles high between transfers.

use alloc::vec::Vec;

use core::fmt;
use core::marker::PhantomData;

use smart_leds_trait::RGB8;

use crate::devices::{ChannelOrder, Ws2812Rgb};
use crate::timing::{BITPAIR_TO_BYTE, SPI_BYTES_PER_LED};

/// The frame buffer couldn't be allocated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocError;

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("failed to allocate the led frame buffer")
    }
}

pub struct Encoder<ORDER = Ws2812Rgb> {
    buffer: Vec<u8>,
    led_count: usize,
    latch_bytes: usize,
    order: PhantomData<ORDER>,
}

impl<ORDER> Encoder<ORDER>
where
    ORDER: ChannelOrder,
{
    /// Allocate a zeroed frame for `led_count` leds, framed by `latch_bytes`
    /// zero bytes on both sides
    pub fn new(led_count: usize, latch_bytes: usize) -> Result<Self, AllocError> {
        Ok(Self {
            buffer: allocate(led_count, latch_bytes)?,
            led_count,
            latch_bytes,
            order: PhantomData {},
        })
    }

    /// Render `colours` into the frame and return it, ready to be sent.
    ///
    /// Exactly `led_count` leds are rendered. Colours past that are ignored,
    /// leds without a colour are switched off.
    pub fn encode<T, I>(&mut self, colours: T) -> &[u8]
    where
        T: IntoIterator<Item = I>,
        I: Into<RGB8>,
    {
        let data_end = self.latch_bytes + self.led_count * SPI_BYTES_PER_LED;
        let mut colours = colours.into_iter().map(Into::into);

        for led in self.buffer[self.latch_bytes..data_end].chunks_exact_mut(SPI_BYTES_PER_LED) {
            let colour = colours.next().unwrap_or_default();
            render(ORDER::pack(colour), led);
        }

        // Trailing latch, never written otherwise
        for byte in &mut self.buffer[data_end..] {
            *byte = 0;
        }

        &self.buffer
    }

    /// Drop the current frame and allocate a blank one for `led_count` leds
    pub fn set_led_count(&mut self, led_count: usize) -> Result<(), AllocError> {
        self.buffer = allocate(led_count, self.latch_bytes)?;
        self.led_count = led_count;
        Ok(())
    }

    /// The frame as last rendered
    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    pub fn led_count(&self) -> usize {
        self.led_count
    }

    pub fn latch_bytes(&self) -> usize {
        self.latch_bytes
    }

    /// Total frame length in bytes, latches included
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

fn allocate(led_count: usize, latch_bytes: usize) -> Result<Vec<u8>, AllocError> {
    // 2 * latch_bytes because we also reset at the start
    let len = led_count
        .checked_mul(SPI_BYTES_PER_LED)
        .and_then(|data| latch_bytes.checked_mul(2)?.checked_add(data))
        .ok_or(AllocError)?;

    let mut buffer = Vec::new();
    buffer.try_reserve_exact(len).map_err(|_| AllocError)?;
    buffer.resize(len, 0);
    Ok(buffer)
}

/// Expand a 24 bit colour into `led`, two bits per byte.
///
/// Bits are taken from the least significant end and stored from the back, so
/// the most significant bits go out first.
fn render(mut bits: u32, led: &mut [u8]) {
    for byte in led.iter_mut().rev() {
        *byte = BITPAIR_TO_BYTE[(bits & 0b11) as usize];
        bits >>= 2;
    }
}
