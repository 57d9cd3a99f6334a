//! Bit-banged 3-wire SPI (MIPI DBI type C, option 1).
//!
//! Every byte is a 9-bit frame whose leading bit is the D/C flag. SDA is
//! half-duplex: the pin drives writes and is released for the controller to
//! answer reads.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

use super::{pulse_reset, Command, Data, DisplayError, DisplayInterface, InterfaceKind};

/// Half SCL period used unless overridden, ns.
const DEFAULT_HALF_PERIOD: u32 = 100;

/// 3-wire SPI display interface.
///
/// `SDA` must be open-drain (or an `InputPin` that reads the line while
/// released): setting it high hands the line to the controller.
pub struct Spi3WireInterface<SCK, SDA, CS, RST, DELAY> {
    sck: SCK,
    sda: SDA,
    cs: CS,
    rst: RST,
    delay: DELAY,
    half_period: u32,
}

impl<SCK, SDA, CS, RST, DELAY> Spi3WireInterface<SCK, SDA, CS, RST, DELAY>
where
    SCK: OutputPin,
    SDA: OutputPin + InputPin,
    CS: OutputPin,
    RST: OutputPin,
    DELAY: DelayNs,
{
    pub fn new(sck: SCK, sda: SDA, cs: CS, rst: RST, delay: DELAY) -> Self {
        Spi3WireInterface {
            sck,
            sda,
            cs,
            rst,
            delay,
            half_period: DEFAULT_HALF_PERIOD,
        }
    }

    /// Half of the SCL period in nanoseconds.
    pub fn with_half_period(mut self, ns: u32) -> Self {
        self.half_period = ns;
        self
    }

    pub fn release(self) -> (SCK, SDA, CS, RST, DELAY) {
        (self.sck, self.sda, self.cs, self.rst, self.delay)
    }

    fn transaction<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, DisplayError>,
    ) -> Result<T, DisplayError> {
        self.cs.set_low().map_err(|_| DisplayError::CSError)?;
        let ret = f(self);
        self.cs.set_high().ok();
        ret
    }

    /// Controller samples SDA on the rising edge of SCL.
    fn clock_out(&mut self, bit: bool) -> Result<(), DisplayError> {
        self.sck.set_low().map_err(|_| DisplayError::BusWriteError)?;
        let ret = if bit {
            self.sda.set_high()
        } else {
            self.sda.set_low()
        };
        ret.map_err(|_| DisplayError::BusWriteError)?;
        self.delay.delay_ns(self.half_period);
        self.sck.set_high().map_err(|_| DisplayError::BusWriteError)?;
        self.delay.delay_ns(self.half_period);
        Ok(())
    }

    fn clock_in(&mut self) -> Result<bool, DisplayError> {
        self.sck.set_low().map_err(|_| DisplayError::BusReadError)?;
        self.delay.delay_ns(self.half_period);
        self.sck.set_high().map_err(|_| DisplayError::BusReadError)?;
        let bit = self.sda.is_high().map_err(|_| DisplayError::BusReadError)?;
        self.delay.delay_ns(self.half_period);
        Ok(bit)
    }

    fn write_frame(&mut self, is_data: bool, byte: u8) -> Result<(), DisplayError> {
        self.clock_out(is_data)?;
        for i in (0..8).rev() {
            self.clock_out(byte & (1 << i) != 0)?;
        }
        Ok(())
    }

    fn read_byte(&mut self) -> Result<u8, DisplayError> {
        let mut byte = 0;
        for _ in 0..8 {
            byte = (byte << 1) | self.clock_in()? as u8;
        }
        Ok(byte)
    }

    fn command_phase(&mut self, command: Command) -> Result<(), DisplayError> {
        match command {
            Command::U8(cmd) => self.write_frame(false, cmd),
            Command::U16(cmd) => {
                let [hi, lo] = cmd.to_be_bytes();
                self.write_frame(false, hi)?;
                self.write_frame(false, lo)
            }
        }
    }

    fn data_word(&mut self, word: u16) -> Result<(), DisplayError> {
        let [hi, lo] = word.to_be_bytes();
        self.write_frame(true, hi)?;
        self.write_frame(true, lo)
    }
}

impl<SCK, SDA, CS, RST, DELAY> DisplayInterface for Spi3WireInterface<SCK, SDA, CS, RST, DELAY>
where
    SCK: OutputPin,
    SDA: OutputPin + InputPin,
    CS: OutputPin,
    RST: OutputPin,
    DELAY: DelayNs,
{
    fn kind(&self) -> InterfaceKind {
        InterfaceKind::Spi3Wire
    }

    fn send_command(&mut self, command: Command) -> Result<(), DisplayError> {
        self.transaction(|this| this.command_phase(command))
    }

    fn send_data(&mut self, data: Data<'_>) -> Result<(), DisplayError> {
        self.transaction(|this| match data {
            Data::U8(bytes) => bytes.iter().try_for_each(|&b| this.write_frame(true, b)),
            Data::U16(words) => words.iter().try_for_each(|&w| this.data_word(w)),
        })
    }

    fn send_pixels<I>(&mut self, pixels: I) -> Result<usize, DisplayError>
    where
        I: IntoIterator<Item = u16>,
    {
        self.transaction(|this| {
            let mut n = 0;
            for word in pixels {
                this.data_word(word)?;
                n += 1;
            }
            Ok(n)
        })
    }

    /// Reads longer than one byte start with a dummy clock.
    fn read(&mut self, command: Command, buf: &mut [u16]) -> Result<(), DisplayError> {
        self.transaction(|this| {
            this.command_phase(command)?;
            this.sda.set_high().map_err(|_| DisplayError::BusReadError)?;
            if buf.len() > 1 {
                this.clock_in()?;
            }
            for word in buf.iter_mut() {
                *word = this.read_byte()? as u16;
            }
            Ok(())
        })
    }

    fn reset<D>(&mut self, delay: &mut D, initial_delay: u32, duration: u32, settle: u32)
    where
        D: DelayNs,
    {
        let _ = self.cs.set_high();
        pulse_reset(&mut self.rst, delay, initial_delay, duration, settle);
    }
}
