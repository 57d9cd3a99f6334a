//! 4-wire SPI interface.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;

use super::{pulse_reset, Command, Data, DisplayError, DisplayInterface, InterfaceKind};

/// SPI display interface with a dedicated D/C line.
///
/// Chip select is driven here rather than by an `SpiDevice` so that a read
/// can switch D/C between the command byte and the response.
pub struct SpiInterface<SPI, CS, DC, RST> {
    spi: SPI,
    cs: CS,
    dc: DC,
    rst: RST,
}

impl<SPI, CS, DC, RST> SpiInterface<SPI, CS, DC, RST>
where
    SPI: SpiBus<u8>,
    CS: OutputPin,
    DC: OutputPin,
    RST: OutputPin,
{
    pub fn new(spi: SPI, cs: CS, dc: DC, rst: RST) -> Self {
        SpiInterface { spi, cs, dc, rst }
    }

    /// Consume the display interface and return
    /// the underlying peripherial driver and GPIO pins used by it
    pub fn release(self) -> (SPI, CS, DC, RST) {
        (self.spi, self.cs, self.dc, self.rst)
    }

    fn transaction<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, DisplayError>,
    ) -> Result<T, DisplayError> {
        // Assert chip select pin
        self.cs.set_low().map_err(|_| DisplayError::CSError)?;

        let ret = f(self);
        let flushed = self.spi.flush().map_err(|_| DisplayError::BusWriteError);

        // Deassert chip select pin
        self.cs.set_high().ok();

        let value = ret?;
        flushed?;
        Ok(value)
    }

    fn command_phase(&mut self, command: Command) -> Result<(), DisplayError> {
        // 1 = data, 0 = command
        self.dc.set_low().map_err(|_| DisplayError::DCError)?;
        match command {
            Command::U8(cmd) => self.write_bytes(&[cmd]),
            Command::U16(cmd) => self.write_bytes(&cmd.to_be_bytes()),
        }
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), DisplayError> {
        self.spi
            .write(bytes)
            .map_err(|_| DisplayError::BusWriteError)
    }

    fn write_words<I>(&mut self, words: I) -> Result<usize, DisplayError>
    where
        I: IntoIterator<Item = u16>,
    {
        let mut buf = [0u8; 64];
        let mut len = 0;
        let mut n = 0;
        for word in words {
            buf[len..len + 2].copy_from_slice(&word.to_be_bytes());
            len += 2;
            n += 1;
            if len == buf.len() {
                self.write_bytes(&buf)?;
                len = 0;
            }
        }
        if len > 0 {
            self.write_bytes(&buf[..len])?;
        }
        Ok(n)
    }
}

impl<SPI, CS, DC, RST> DisplayInterface for SpiInterface<SPI, CS, DC, RST>
where
    SPI: SpiBus<u8>,
    CS: OutputPin,
    DC: OutputPin,
    RST: OutputPin,
{
    fn kind(&self) -> InterfaceKind {
        InterfaceKind::Spi4Wire
    }

    fn send_command(&mut self, command: Command) -> Result<(), DisplayError> {
        self.transaction(|this| this.command_phase(command))
    }

    fn send_data(&mut self, data: Data<'_>) -> Result<(), DisplayError> {
        self.transaction(|this| {
            this.dc.set_high().map_err(|_| DisplayError::DCError)?;
            match data {
                Data::U8(bytes) => this.write_bytes(bytes),
                Data::U16(words) => this.write_words(words.iter().copied()).map(|_| ()),
            }
        })
    }

    fn send_pixels<I>(&mut self, pixels: I) -> Result<usize, DisplayError>
    where
        I: IntoIterator<Item = u16>,
    {
        self.transaction(|this| {
            this.dc.set_high().map_err(|_| DisplayError::DCError)?;
            this.write_words(pixels)
        })
    }

    fn read(&mut self, command: Command, buf: &mut [u16]) -> Result<(), DisplayError> {
        self.transaction(|this| {
            this.command_phase(command)?;
            // D/C must not change while the command byte is still shifting out
            this.spi.flush().map_err(|_| DisplayError::BusWriteError)?;
            this.dc.set_high().map_err(|_| DisplayError::DCError)?;

            for word in buf.iter_mut() {
                let mut byte = [0u8];
                this.spi
                    .read(&mut byte)
                    .map_err(|_| DisplayError::BusReadError)?;
                *word = byte[0] as u16;
            }
            Ok(())
        })
    }

    fn reset<D>(&mut self, delay: &mut D, initial_delay: u32, duration: u32, settle: u32)
    where
        D: DelayNs,
    {
        pulse_reset(&mut self.rst, delay, initial_delay, duration, settle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::eh1::delay::NoopDelay;
    use embedded_hal_mock::eh1::digital::{
        Mock as PinMock, State as PinState, Transaction as PinTransaction,
    };
    use embedded_hal_mock::eh1::spi::{Mock as SpiMock, Transaction as SpiTransaction};
    use embedded_hal_mock::eh1::MockError;
    use std::io::ErrorKind;

    fn done(di: SpiInterface<SpiMock<u8>, PinMock, PinMock, PinMock>) {
        let (mut spi, mut cs, mut dc, mut rst) = di.release();
        spi.done();
        cs.done();
        dc.done();
        rst.done();
    }

    #[test]
    fn command_then_parameters() {
        let spi = SpiMock::new(&[
            SpiTransaction::write_vec(vec![0x3a]),
            SpiTransaction::flush(),
            SpiTransaction::write_vec(vec![0x55]),
            SpiTransaction::flush(),
        ]);
        let cs = PinMock::new(&[
            PinTransaction::set(PinState::Low),
            PinTransaction::set(PinState::High),
            PinTransaction::set(PinState::Low),
            PinTransaction::set(PinState::High),
        ]);
        let dc = PinMock::new(&[
            PinTransaction::set(PinState::Low),
            PinTransaction::set(PinState::High),
        ]);
        let rst = PinMock::new(&[]);

        let mut di = SpiInterface::new(spi, cs, dc, rst);
        di.send_command_data(0x3a, &[0x55]).unwrap();
        done(di);
    }

    #[test]
    fn wide_words_are_big_endian() {
        let spi = SpiMock::new(&[
            SpiTransaction::write_vec(vec![0xf0, 0x00]),
            SpiTransaction::flush(),
            SpiTransaction::write_vec(vec![0x00, 0x55]),
            SpiTransaction::flush(),
        ]);
        let cs = PinMock::new(&[
            PinTransaction::set(PinState::Low),
            PinTransaction::set(PinState::High),
            PinTransaction::set(PinState::Low),
            PinTransaction::set(PinState::High),
        ]);
        let dc = PinMock::new(&[
            PinTransaction::set(PinState::Low),
            PinTransaction::set(PinState::High),
        ]);
        let rst = PinMock::new(&[]);

        let mut di = SpiInterface::new(spi, cs, dc, rst);
        di.write_register(0xf000, 0x0055).unwrap();
        done(di);
    }

    #[test]
    fn read_keeps_chip_selected() {
        let spi = SpiMock::new(&[
            SpiTransaction::write_vec(vec![0x04]),
            SpiTransaction::flush(),
            SpiTransaction::read(0x85),
            SpiTransaction::read(0x85),
            SpiTransaction::read(0x52),
            SpiTransaction::flush(),
        ]);
        let cs = PinMock::new(&[
            PinTransaction::set(PinState::Low),
            PinTransaction::set(PinState::High),
        ]);
        let dc = PinMock::new(&[
            PinTransaction::set(PinState::Low),
            PinTransaction::set(PinState::High),
        ]);
        let rst = PinMock::new(&[]);

        let mut di = SpiInterface::new(spi, cs, dc, rst);
        let mut id = [0u16; 3];
        di.read(Command::U8(0x04), &mut id).unwrap();
        assert_eq!(id, [0x85, 0x85, 0x52]);
        done(di);
    }

    #[test]
    fn pixels_are_batched() {
        let mut first = vec![];
        for _ in 0..32 {
            first.extend_from_slice(&[0xf8, 0x00]);
        }
        let spi = SpiMock::new(&[
            SpiTransaction::write_vec(first),
            SpiTransaction::write_vec(vec![0xf8, 0x00, 0xf8, 0x00]),
            SpiTransaction::flush(),
        ]);
        let cs = PinMock::new(&[
            PinTransaction::set(PinState::Low),
            PinTransaction::set(PinState::High),
        ]);
        let dc = PinMock::new(&[PinTransaction::set(PinState::High)]);
        let rst = PinMock::new(&[]);

        let mut di = SpiInterface::new(spi, cs, dc, rst);
        let n = di.send_pixels(core::iter::repeat(0xf800).take(34)).unwrap();
        assert_eq!(n, 34);
        done(di);
    }

    #[test]
    fn reset_pulses_low() {
        let spi = SpiMock::new(&[]);
        let cs = PinMock::new(&[]);
        let dc = PinMock::new(&[]);
        let rst = PinMock::new(&[
            PinTransaction::set(PinState::High),
            PinTransaction::set(PinState::Low),
            PinTransaction::set(PinState::High),
        ]);

        let mut di = SpiInterface::new(spi, cs, dc, rst);
        di.reset(&mut NoopDelay::new(), 1_000, 10_000, 120_000);
        done(di);
    }

    #[test]
    fn chip_select_failure_sends_nothing() {
        let spi = SpiMock::new(&[]);
        let cs = PinMock::new(&[
            PinTransaction::set(PinState::Low).with_error(MockError::Io(ErrorKind::Other)),
        ]);
        let dc = PinMock::new(&[]);
        let rst = PinMock::new(&[]);

        let mut di = SpiInterface::new(spi, cs, dc, rst);
        assert_eq!(
            di.send_command(Command::U8(0x29)),
            Err(DisplayError::CSError)
        );
        done(di);
    }

    #[test]
    fn dc_failure_still_releases_chip_select() {
        let spi = SpiMock::new(&[SpiTransaction::flush()]);
        let cs = PinMock::new(&[
            PinTransaction::set(PinState::Low),
            PinTransaction::set(PinState::High),
        ]);
        let dc = PinMock::new(&[
            PinTransaction::set(PinState::Low).with_error(MockError::Io(ErrorKind::Other)),
        ]);
        let rst = PinMock::new(&[]);

        let mut di = SpiInterface::new(spi, cs, dc, rst);
        let mut id = [0u16; 4];
        assert_eq!(
            di.read(Command::U8(0xd3), &mut id),
            Err(DisplayError::DCError)
        );
        assert_eq!(id, [0; 4]);
        done(di);
    }
}
