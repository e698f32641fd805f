//! Blocking frame writes over a byte-at-a-time spi

use embedded_hal as hal;

use hal::blocking::spi::Write;
use hal::spi::FullDuplex;

use nb::block;

/// Sends whole frames through a `FullDuplex` spi.
///
/// Keeps exactly one byte in the fifo ahead of the reads. Some MCUs (like the
/// stm32f1) only have a one byte fifo, which would result in an overrun error
/// if two bytes need to be stored.
pub struct FullDuplexWriter<SPI> {
    spi: SPI,
}

impl<SPI, E> FullDuplexWriter<SPI>
where
    SPI: FullDuplex<u8, Error = E>,
{
    pub fn new(spi: SPI) -> Self {
        Self { spi }
    }

    pub fn release(self) -> SPI {
        self.spi
    }
}

impl<SPI, E> Write<u8> for FullDuplexWriter<SPI>
where
    SPI: FullDuplex<u8, Error = E>,
{
    type Error = E;

    /// Writes `words`, preceded by a single zero byte that holds the offset
    fn write(&mut self, words: &[u8]) -> Result<(), E> {
        // Line is low while idle, so the extra byte just lengthens the reset
        block!(self.spi.send(0))?;
        for &word in words {
            block!(self.spi.send(word))?;
            block!(self.spi.read()).ok();
        }
        // Now, resolve the offset we introduced at the beginning
        block!(self.spi.read())?;
        Ok(())
    }
}
