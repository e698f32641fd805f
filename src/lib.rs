//! # Use ws2812 leds via spi, one transfer per frame
//!
//! - For usage with `smart-leds`
//! - Implements the `SmartLedsWrite` trait
//!
//! Every frame is prerendered into a buffer owned by the driver and handed to
//! the spi in a single blocking write, so a dma capable spi can send it in
//! one hit. Needs a type implementing the `blocking::spi::Write<u8>` trait, see
//! [`transport::FullDuplexWriter`] for spi peripherals that only implement
//! `spi::FullDuplex`.
//!
//! The spi peripheral should run at 3 MHz, anything within 2.05 MHz to 4 MHz
//! works. A stable spi clock is needed (on the Raspberry Pi that requires a
//! stable core clock).

#![no_std]

extern crate alloc;

use embedded_hal as hal;

pub mod config;
pub mod encoder;
pub mod timing;
pub mod transport;

use hal::blocking::spi::Write;
use hal::spi::{Mode, Phase, Polarity};

use smart_leds_trait::{SmartLedsWrite, RGB8};

pub use config::Config;
pub use encoder::{AllocError, Encoder};

/// SPI mode that can be used for this crate
///
/// Provided for convenience
///
/// If you have strange issues, like the first led always running, you should
/// verify that the spi is idle low
pub const MODE: Mode = Mode {
    polarity: Polarity::IdleLow,
    phase: Phase::CaptureOnFirstTransition,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error<E> {
    /// The frame buffer couldn't be allocated, the device isn't usable
    Allocation,
    Spi(E),
}

impl<E> From<AllocError> for Error<E> {
    fn from(_: AllocError) -> Self {
        Error::Allocation
    }
}

pub mod devices {
    use smart_leds_trait::RGB8;

    /// Order in which a chip expects the colour channels on the wire
    pub trait ChannelOrder {
        /// Pack a colour into the 24 bit word sent to the chip, first channel
        /// most significant
        fn pack(color: RGB8) -> u32;
    }

    pub struct Ws2812Rgb;
    pub struct Ws2812Grb;

    impl ChannelOrder for Ws2812Rgb {
        fn pack(color: RGB8) -> u32 {
            (color.r as u32) << 16 | (color.g as u32) << 8 | color.b as u32
        }
    }

    impl ChannelOrder for Ws2812Grb {
        fn pack(color: RGB8) -> u32 {
            (color.g as u32) << 16 | (color.r as u32) << 8 | color.b as u32
        }
    }
}

use devices::ChannelOrder;

pub struct Ws2812<SPI, DEVICE = devices::Ws2812Rgb> {
    spi: SPI,
    encoder: Encoder<DEVICE>,
    baud_rate_hz: u32,
}

impl<SPI, E> Ws2812<SPI>
where
    SPI: Write<u8, Error = E>,
{
    /// Use ws2812 devices via spi, red sent first
    ///
    /// `config.baud_rate_hz` must match the rate the spi was set up with. A
    /// rate outside 2.05 MHz to 4 MHz is logged as a warning but accepted.
    ///
    /// The frame buffer is allocated here, `12 * config.led_count + 2 *
    /// config.latch_bytes` bytes.
    pub fn new(spi: SPI, config: Config) -> Result<Self, Error<E>> {
        Self::with_order(spi, config)
    }
}

impl<SPI, E> Ws2812<SPI, devices::Ws2812Grb>
where
    SPI: Write<u8, Error = E>,
{
    /// Use ws2812 devices via spi, green sent first
    ///
    /// Same requirements as [`Ws2812::new`].
    pub fn new_grb(spi: SPI, config: Config) -> Result<Self, Error<E>> {
        Self::with_order(spi, config)
    }
}

impl<SPI, D, E> Ws2812<SPI, D>
where
    SPI: Write<u8, Error = E>,
    D: ChannelOrder,
{
    fn with_order(spi: SPI, config: Config) -> Result<Self, Error<E>> {
        timing::check_baud_rate(config.baud_rate_hz);
        let encoder = Encoder::new(config.led_count, config.latch_bytes)?;
        Ok(Self {
            spi,
            encoder,
            baud_rate_hz: config.baud_rate_hz,
        })
    }

    /// The last frame rendered, latches included
    pub fn frame(&self) -> &[u8] {
        self.encoder.buffer()
    }

    pub fn led_count(&self) -> usize {
        self.encoder.led_count()
    }

    pub fn baud_rate_hz(&self) -> u32 {
        self.baud_rate_hz
    }

    /// Reallocate the frame for a strip of a different length
    pub fn set_led_count(&mut self, led_count: usize) -> Result<(), Error<E>> {
        self.encoder.set_led_count(led_count)?;
        Ok(())
    }

    /// Give back the spi
    pub fn release(self) -> SPI {
        self.spi
    }
}

impl<SPI, D, E> SmartLedsWrite for Ws2812<SPI, D>
where
    SPI: Write<u8, Error = E>,
    D: ChannelOrder,
{
    type Error = Error<E>;
    type Color = RGB8;
    /// Write all the items of an iterator to a ws2812 strip
    fn write<T, I>(&mut self, iterator: T) -> Result<(), Error<E>>
    where
        T: Iterator<Item = I>,
        I: Into<Self::Color>,
    {
        let frame = self.encoder.encode(iterator);
        self.spi.write(frame).map_err(Error::Spi)
    }
}
