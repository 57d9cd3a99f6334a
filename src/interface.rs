//! The display interface for TFT controllers.
//!
//! A controller is driven through a MIPI DBI style bus: a command (register
//! index) phase followed by a data phase, told apart by the D/C (RS) line on
//! 4-wire SPI and parallel buses, or by a 9th leading bit on 3-wire SPI.

use embedded_hal::delay::DelayNs;
use thiserror::Error;

mod parallel;
mod spi;
mod spi3wire;

pub use self::parallel::{BusWidth, GpioBus, GpioBus16, GpioBus8, ParallelBus, ParallelInterface};
pub use self::spi::SpiInterface;
pub use self::spi3wire::Spi3WireInterface;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    #[error("bus write failed")]
    BusWriteError,
    #[error("bus read failed")]
    BusReadError,
    #[error("data/command pin error")]
    DCError,
    #[error("chip select pin error")]
    CSError,
    #[error("read/write strobe pin error")]
    StrobeError,
    /// The probed id matches none of the tables of the driver.
    #[error("unknown device id {0:#06x}")]
    UnknownDevice(u16),
    #[error("window outside of the panel")]
    OutOfBounds,
}

/// Physical bus behind a [`DisplayInterface`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InterfaceKind {
    /// 8080 parallel bus, 8 data lines
    Parallel8,
    /// 8080 parallel bus, 16 data lines
    Parallel16,
    /// SPI with a dedicated D/C line
    Spi4Wire,
    /// SPI with D/C sent as a 9th bit
    Spi3Wire,
}

impl InterfaceKind {
    pub fn is_serial(self) -> bool {
        matches!(self, InterfaceKind::Spi4Wire | InterfaceKind::Spi3Wire)
    }
}

/// Command or register index.
///
/// `U16` goes out as two transfers, high byte first, on anything narrower
/// than a 16-bit bus.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    U8(u8),
    U16(u16),
}

/// Payload of a data phase.
///
/// Every `U8` byte is one bus word. Every `U16` word is two transfers, high
/// byte first, unless the bus is 16 bits wide.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Data<'a> {
    U8(&'a [u8]),
    U16(&'a [u16]),
}

/// Trait implemented by buses to provide the controller transactions.
pub trait DisplayInterface {
    fn kind(&self) -> InterfaceKind;

    /// Send a command to the controller.
    fn send_command(&mut self, command: Command) -> Result<(), DisplayError>;

    /// Send data for a command.
    fn send_data(&mut self, data: Data<'_>) -> Result<(), DisplayError>;

    /// Stream RGB565 words into GRAM, after the memory write command.
    ///
    /// Returns the number of words sent.
    fn send_pixels<I>(&mut self, pixels: I) -> Result<usize, DisplayError>
    where
        I: IntoIterator<Item = u16>;

    /// Issue `command` and clock `buf.len()` words back, chip selected throughout.
    ///
    /// Each word is one bus read (a byte on 8-bit and serial buses). Dummy
    /// reads are part of `buf`; skipping them is up to the driver.
    fn read(&mut self, command: Command, buf: &mut [u16]) -> Result<(), DisplayError>;

    /// Hard reset, all delays in microseconds.
    fn reset<D>(&mut self, delay: &mut D, initial_delay: u32, duration: u32, settle: u32)
    where
        D: DelayNs;

    fn send_command_data(&mut self, command: u8, data: &[u8]) -> Result<(), DisplayError> {
        self.send_command(Command::U8(command))?;
        if !data.is_empty() {
            self.send_data(Data::U8(data))?;
        }
        Ok(())
    }

    /// Index register write, as used by the ILI932x/SSD1289 class of controllers.
    fn write_register(&mut self, index: u16, value: u16) -> Result<(), DisplayError> {
        self.send_command(Command::U16(index))?;
        self.send_data(Data::U16(&[value]))
    }
}

/// Drive the reset line: high, low, high, with the given waits in between.
pub(crate) fn pulse_reset<RST, D>(
    rst: &mut RST,
    delay: &mut D,
    initial_delay: u32,
    duration: u32,
    settle: u32,
) where
    RST: embedded_hal::digital::OutputPin,
    D: DelayNs,
{
    let _ = rst.set_high();
    delay.delay_us(initial_delay);

    let _ = rst.set_low();
    delay.delay_us(duration);
    let _ = rst.set_high();
    delay.delay_us(settle);
}
