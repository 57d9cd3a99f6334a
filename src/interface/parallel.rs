//! 8080-style parallel interface, 8 or 16 data lines.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

use super::{pulse_reset, Command, Data, DisplayError, DisplayInterface, InterfaceKind};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusWidth {
    Bits8,
    Bits16,
}

/// Data lines D0..D7 or D0..D15.
///
/// Implement this directly on a GPIO port register for speed; [`GpioBus`]
/// drives one `embedded-hal` pin per bit.
pub trait ParallelBus {
    const WIDTH: BusWidth;

    /// Put `word` on the data lines. Only the low byte matters on an 8-bit bus.
    fn write(&mut self, word: u16) -> Result<(), DisplayError>;

    /// Release the data lines and sample them.
    fn read(&mut self) -> Result<u16, DisplayError>;
}

/// Data bus made of individual pins, pin `i` carrying bit `i`.
///
/// Pins must be open-drain (or otherwise readable while driven high) for
/// reads to work: releasing the bus is done by setting every line high.
pub struct GpioBus<P, const N: usize> {
    pins: [P; N],
}

pub type GpioBus8<P> = GpioBus<P, 8>;
pub type GpioBus16<P> = GpioBus<P, 16>;

impl<P, const N: usize> GpioBus<P, N>
where
    P: OutputPin + InputPin,
{
    pub fn new(pins: [P; N]) -> Self {
        GpioBus { pins }
    }

    pub fn release(self) -> [P; N] {
        self.pins
    }

    fn set_bits(&mut self, word: u16) -> Result<(), DisplayError> {
        for (i, pin) in self.pins.iter_mut().enumerate() {
            let ret = if word & (1 << i) != 0 {
                pin.set_high()
            } else {
                pin.set_low()
            };
            ret.map_err(|_| DisplayError::BusWriteError)?;
        }
        Ok(())
    }

    fn get_bits(&mut self) -> Result<u16, DisplayError> {
        for pin in self.pins.iter_mut() {
            pin.set_high().map_err(|_| DisplayError::BusReadError)?;
        }
        let mut word = 0;
        for (i, pin) in self.pins.iter_mut().enumerate() {
            if pin.is_high().map_err(|_| DisplayError::BusReadError)? {
                word |= 1 << i;
            }
        }
        Ok(word)
    }
}

impl<P> ParallelBus for GpioBus<P, 8>
where
    P: OutputPin + InputPin,
{
    const WIDTH: BusWidth = BusWidth::Bits8;

    fn write(&mut self, word: u16) -> Result<(), DisplayError> {
        self.set_bits(word & 0xff)
    }

    fn read(&mut self) -> Result<u16, DisplayError> {
        self.get_bits()
    }
}

impl<P> ParallelBus for GpioBus<P, 16>
where
    P: OutputPin + InputPin,
{
    const WIDTH: BusWidth = BusWidth::Bits16;

    fn write(&mut self, word: u16) -> Result<(), DisplayError> {
        self.set_bits(word)
    }

    fn read(&mut self) -> Result<u16, DisplayError> {
        self.get_bits()
    }
}

/// Intel 8080 MCU interface: CS, RS (D/C), WR and RD strobes plus the data bus.
pub struct ParallelInterface<BUS, CS, RS, WR, RD, RST> {
    bus: BUS,
    cs: CS,
    rs: RS,
    wr: WR,
    rd: RD,
    rst: RST,
}

impl<BUS, CS, RS, WR, RD, RST> ParallelInterface<BUS, CS, RS, WR, RD, RST>
where
    BUS: ParallelBus,
    CS: OutputPin,
    RS: OutputPin,
    WR: OutputPin,
    RD: OutputPin,
    RST: OutputPin,
{
    pub fn new(bus: BUS, cs: CS, rs: RS, wr: WR, rd: RD, rst: RST) -> Self {
        ParallelInterface {
            bus,
            cs,
            rs,
            wr,
            rd,
            rst,
        }
    }

    pub fn release(self) -> (BUS, CS, RS, WR, RD, RST) {
        (self.bus, self.cs, self.rs, self.wr, self.rd, self.rst)
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

    /// One WR strobe, data latched on the rising edge.
    fn strobe(&mut self, word: u16) -> Result<(), DisplayError> {
        self.bus.write(word)?;
        self.wr.set_low().map_err(|_| DisplayError::StrobeError)?;
        self.wr.set_high().map_err(|_| DisplayError::StrobeError)
    }

    fn strobe_wide(&mut self, word: u16) -> Result<(), DisplayError> {
        match BUS::WIDTH {
            BusWidth::Bits8 => {
                self.strobe(word >> 8)?;
                self.strobe(word & 0xff)
            }
            BusWidth::Bits16 => self.strobe(word),
        }
    }

    fn command_phase(&mut self, command: Command) -> Result<(), DisplayError> {
        // 1 = data, 0 = command
        self.rs.set_low().map_err(|_| DisplayError::DCError)?;
        match command {
            Command::U8(cmd) => self.strobe(cmd as u16),
            Command::U16(cmd) => self.strobe_wide(cmd),
        }
    }

    fn read_strobe(&mut self) -> Result<u16, DisplayError> {
        self.rd.set_low().map_err(|_| DisplayError::StrobeError)?;
        let word = self.bus.read();
        self.rd.set_high().map_err(|_| DisplayError::StrobeError)?;
        match BUS::WIDTH {
            BusWidth::Bits8 => word.map(|w| w & 0xff),
            BusWidth::Bits16 => word,
        }
    }
}

impl<BUS, CS, RS, WR, RD, RST> DisplayInterface for ParallelInterface<BUS, CS, RS, WR, RD, RST>
where
    BUS: ParallelBus,
    CS: OutputPin,
    RS: OutputPin,
    WR: OutputPin,
    RD: OutputPin,
    RST: OutputPin,
{
    fn kind(&self) -> InterfaceKind {
        match BUS::WIDTH {
            BusWidth::Bits8 => InterfaceKind::Parallel8,
            BusWidth::Bits16 => InterfaceKind::Parallel16,
        }
    }

    fn send_command(&mut self, command: Command) -> Result<(), DisplayError> {
        self.transaction(|this| this.command_phase(command))
    }

    fn send_data(&mut self, data: Data<'_>) -> Result<(), DisplayError> {
        self.transaction(|this| {
            this.rs.set_high().map_err(|_| DisplayError::DCError)?;
            match data {
                Data::U8(bytes) => bytes.iter().try_for_each(|&b| this.strobe(b as u16)),
                Data::U16(words) => words.iter().try_for_each(|&w| this.strobe_wide(w)),
            }
        })
    }

    fn send_pixels<I>(&mut self, pixels: I) -> Result<usize, DisplayError>
    where
        I: IntoIterator<Item = u16>,
    {
        self.transaction(|this| {
            this.rs.set_high().map_err(|_| DisplayError::DCError)?;
            let mut n = 0;
            for word in pixels {
                this.strobe_wide(word)?;
                n += 1;
            }
            Ok(n)
        })
    }

    fn read(&mut self, command: Command, buf: &mut [u16]) -> Result<(), DisplayError> {
        self.transaction(|this| {
            this.command_phase(command)?;
            this.rs.set_high().map_err(|_| DisplayError::DCError)?;
            for word in buf.iter_mut() {
                *word = this.read_strobe()?;
            }
            Ok(())
        })
    }

    fn reset<D>(&mut self, delay: &mut D, initial_delay: u32, duration: u32, settle: u32)
    where
        D: DelayNs,
    {
        // idle levels of the control lines before RES is pulsed
        let _ = self.cs.set_high();
        let _ = self.wr.set_high();
        let _ = self.rd.set_high();
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
    use embedded_hal_mock::eh1::MockError;
    use std::io::ErrorKind;

    /// Records the words latched by the interface.
    #[derive(Default)]
    struct FakeBus<const WIDE: bool> {
        written: Vec<u16>,
        to_read: Vec<u16>,
    }

    impl ParallelBus for FakeBus<false> {
        const WIDTH: BusWidth = BusWidth::Bits8;

        fn write(&mut self, word: u16) -> Result<(), DisplayError> {
            self.written.push(word);
            Ok(())
        }

        fn read(&mut self) -> Result<u16, DisplayError> {
            Ok(self.to_read.remove(0))
        }
    }

    impl ParallelBus for FakeBus<true> {
        const WIDTH: BusWidth = BusWidth::Bits16;

        fn write(&mut self, word: u16) -> Result<(), DisplayError> {
            self.written.push(word);
            Ok(())
        }

        fn read(&mut self) -> Result<u16, DisplayError> {
            Ok(self.to_read.remove(0))
        }
    }

    fn strobes(n: usize) -> Vec<PinTransaction> {
        (0..n)
            .flat_map(|_| {
                [
                    PinTransaction::set(PinState::Low),
                    PinTransaction::set(PinState::High),
                ]
            })
            .collect()
    }

    #[test]
    fn eight_bit_bus_splits_wide_words() {
        let cs = PinMock::new(&strobes(2));
        let rs = PinMock::new(&[
            PinTransaction::set(PinState::Low),
            PinTransaction::set(PinState::High),
        ]);
        let wr = PinMock::new(&strobes(4));
        let rd = PinMock::new(&[]);
        let rst = PinMock::new(&[]);

        let mut di = ParallelInterface::new(FakeBus::<false>::default(), cs, rs, wr, rd, rst);
        assert_eq!(di.kind(), InterfaceKind::Parallel8);
        di.write_register(0x0003, 0x1030).unwrap();

        let (bus, mut cs, mut rs, mut wr, mut rd, mut rst) = di.release();
        assert_eq!(bus.written, [0x00, 0x03, 0x10, 0x30]);
        cs.done();
        rs.done();
        wr.done();
        rd.done();
        rst.done();
    }

    #[test]
    fn sixteen_bit_bus_reads_after_command() {
        let cs = PinMock::new(&strobes(1));
        let rs = PinMock::new(&[
            PinTransaction::set(PinState::Low),
            PinTransaction::set(PinState::High),
        ]);
        let wr = PinMock::new(&strobes(1));
        let rd = PinMock::new(&strobes(2));
        let rst = PinMock::new(&[]);

        let bus = FakeBus::<true> {
            written: Vec::new(),
            to_read: vec![0x0000, 0x9325],
        };
        let mut di = ParallelInterface::new(bus, cs, rs, wr, rd, rst);
        let mut id = [0u16; 2];
        di.read(Command::U16(0x0000), &mut id).unwrap();
        assert_eq!(id, [0x0000, 0x9325]);

        let (bus, mut cs, mut rs, mut wr, mut rd, mut rst) = di.release();
        assert_eq!(bus.written, [0x0000]);
        cs.done();
        rs.done();
        wr.done();
        rd.done();
        rst.done();
    }

    #[test]
    fn reset_idles_strobes_high() {
        let cs = PinMock::new(&[PinTransaction::set(PinState::High)]);
        let rs = PinMock::new(&[]);
        let wr = PinMock::new(&[PinTransaction::set(PinState::High)]);
        let rd = PinMock::new(&[PinTransaction::set(PinState::High)]);
        let rst = PinMock::new(&[
            PinTransaction::set(PinState::High),
            PinTransaction::set(PinState::Low),
            PinTransaction::set(PinState::High),
        ]);

        let mut di = ParallelInterface::new(FakeBus::<true>::default(), cs, rs, wr, rd, rst);
        di.reset(&mut NoopDelay::new(), 1_000, 10_000, 50_000);

        let (_, mut cs, mut rs, mut wr, mut rd, mut rst) = di.release();
        cs.done();
        rs.done();
        wr.done();
        rd.done();
        rst.done();
    }

    #[test]
    fn gpio_bus_sets_one_pin_per_bit() {
        let pins: [PinMock; 8] = core::array::from_fn(|i| {
            let state = if 0xa5u16 & (1 << i) != 0 {
                PinState::High
            } else {
                PinState::Low
            };
            PinMock::new(&[PinTransaction::set(state)])
        });
        let mut bus = GpioBus8::new(pins);
        ParallelBus::write(&mut bus, 0x12a5).unwrap();
        for mut pin in bus.release() {
            pin.done();
        }
    }

    fn level(high: bool) -> PinState {
        if high {
            PinState::High
        } else {
            PinState::Low
        }
    }

    fn io_error() -> MockError {
        MockError::Io(ErrorKind::Other)
    }

    #[test]
    fn gpio_bus_releases_lines_then_samples() {
        let pins: [PinMock; 16] = core::array::from_fn(|i| {
            PinMock::new(&[
                PinTransaction::set(PinState::High),
                PinTransaction::get(level(0x9325u16 & (1 << i) != 0)),
            ])
        });
        let mut bus = GpioBus16::new(pins);
        assert_eq!(ParallelBus::read(&mut bus), Ok(0x9325));
        for mut pin in bus.release() {
            pin.done();
        }
    }

    #[test]
    fn gpio_bus_read_failure() {
        let pins: [PinMock; 8] = core::array::from_fn(|i| {
            let mut expected = vec![PinTransaction::set(PinState::High)];
            match i {
                0..=2 => expected.push(PinTransaction::get(PinState::Low)),
                3 => expected.push(PinTransaction::get(PinState::Low).with_error(io_error())),
                _ => {}
            }
            PinMock::new(&expected)
        });
        let mut bus = GpioBus8::new(pins);
        assert_eq!(ParallelBus::read(&mut bus), Err(DisplayError::BusReadError));
        for mut pin in bus.release() {
            pin.done();
        }
    }

    #[test]
    fn write_strobe_failure_releases_chip_select() {
        let cs = PinMock::new(&strobes(1));
        let rs = PinMock::new(&[PinTransaction::set(PinState::Low)]);
        let wr = PinMock::new(&[PinTransaction::set(PinState::Low).with_error(io_error())]);
        let rd = PinMock::new(&[]);
        let rst = PinMock::new(&[]);

        let mut di = ParallelInterface::new(FakeBus::<true>::default(), cs, rs, wr, rd, rst);
        assert_eq!(
            di.send_command(Command::U8(0x2c)),
            Err(DisplayError::StrobeError)
        );

        let (bus, mut cs, mut rs, mut wr, mut rd, mut rst) = di.release();
        assert_eq!(bus.written, [0x2c]);
        cs.done();
        rs.done();
        wr.done();
        rd.done();
        rst.done();
    }

    #[test]
    fn register_select_failure() {
        let cs = PinMock::new(&strobes(1));
        let rs = PinMock::new(&[PinTransaction::set(PinState::High).with_error(io_error())]);
        let wr = PinMock::new(&[]);
        let rd = PinMock::new(&[]);
        let rst = PinMock::new(&[]);

        let mut di = ParallelInterface::new(FakeBus::<false>::default(), cs, rs, wr, rd, rst);
        assert_eq!(
            di.send_pixels([0xffff, 0x0000]),
            Err(DisplayError::DCError)
        );

        let (bus, mut cs, mut rs, mut wr, mut rd, mut rst) = di.release();
        assert!(bus.written.is_empty());
        cs.done();
        rs.done();
        wr.done();
        rd.done();
        rst.done();
    }
}
