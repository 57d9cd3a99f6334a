//! ILI9320 / ILI9325 / ILI9328 driver
//!
//! For:
//! - 2.4"/2.8" 240x320 modules on the 8080 bus

use embedded_hal::delay::DelayNs;

use super::{read_register, run_sequence, unknown_device, Driver, Step};
use crate::interface::{Command, DisplayError, DisplayInterface};

const ID_ILI9320: u16 = 0x9320;
const ID_ILI9325: u16 = 0x9325;
const ID_ILI9328: u16 = 0x9328;

#[rustfmt::skip]
const INIT_ILI9320: &[Step] = &[
    Step::Reg(0x00e5, 0x8000), // set the Vcore voltage
    Step::Reg(0x0000, 0x0001), // start oscillation
    Step::Delay(50),
    Step::Reg(0x0001, 0x0100), // SS: S720 to S1
    Step::Reg(0x0002, 0x0700), // line inversion
    Step::Reg(0x0003, 0x1030), // BGR, I/D = 11
    Step::Reg(0x0004, 0x0000),
    Step::Reg(0x0008, 0x0202), // porches
    Step::Reg(0x0009, 0x0000),
    Step::Reg(0x000a, 0x0000),
    Step::Reg(0x000c, 0x0000), // 16-bit system interface
    Step::Reg(0x000d, 0x0000),
    Step::Reg(0x000f, 0x0000),
    // power on sequence
    Step::Reg(0x0010, 0x0000),
    Step::Reg(0x0011, 0x0007),
    Step::Reg(0x0012, 0x0000),
    Step::Reg(0x0013, 0x0000),
    Step::Delay(200),
    Step::Reg(0x0010, 0x17b0),
    Step::Reg(0x0011, 0x0037),
    Step::Delay(50),
    Step::Reg(0x0012, 0x013e),
    Step::Delay(50),
    Step::Reg(0x0013, 0x1f00),
    Step::Reg(0x0029, 0x000f),
    Step::Delay(50),
    Step::Reg(0x0020, 0x0000),
    Step::Reg(0x0021, 0x0000),
    // gamma
    Step::Reg(0x0030, 0x0204),
    Step::Reg(0x0031, 0x0001),
    Step::Reg(0x0032, 0x0000),
    Step::Reg(0x0035, 0x0206),
    Step::Reg(0x0036, 0x0600),
    Step::Reg(0x0037, 0x0500),
    Step::Reg(0x0038, 0x0505),
    Step::Reg(0x0039, 0x0407),
    Step::Reg(0x003c, 0x0500),
    Step::Reg(0x003d, 0x0503),
    // GRAM area
    Step::Reg(0x0050, 0x0000),
    Step::Reg(0x0051, 0x00ef),
    Step::Reg(0x0052, 0x0000),
    Step::Reg(0x0053, 0x013f),
    Step::Reg(0x0060, 0x2700), // 320 gate lines
    Step::Reg(0x0061, 0x0001),
    Step::Reg(0x006a, 0x0000),
    // partial display off
    Step::Reg(0x0080, 0x0000),
    Step::Reg(0x0081, 0x0000),
    Step::Reg(0x0082, 0x0000),
    Step::Reg(0x0083, 0x0000),
    Step::Reg(0x0084, 0x0000),
    Step::Reg(0x0085, 0x0000),
    // panel interface
    Step::Reg(0x0090, 0x0010),
    Step::Reg(0x0092, 0x0000),
    Step::Reg(0x0093, 0x0001),
    Step::Reg(0x0095, 0x0110),
    Step::Reg(0x0097, 0x0000),
    Step::Reg(0x0098, 0x0000),
    Step::Reg(0x0007, 0x0173), // display on
    Step::Delay(50),
];

/// Also loaded for the register compatible ILI9328.
#[rustfmt::skip]
const INIT_ILI9325: &[Step] = &[
    Step::Reg(0x00e5, 0x78f0), // internal timing
    Step::Reg(0x0001, 0x0100),
    Step::Reg(0x0002, 0x0700),
    Step::Reg(0x0003, 0x1030),
    Step::Reg(0x0004, 0x0000),
    Step::Reg(0x0008, 0x0207),
    Step::Reg(0x0009, 0x0000),
    Step::Reg(0x000a, 0x0000),
    Step::Reg(0x000c, 0x0000),
    Step::Reg(0x000d, 0x0000),
    Step::Reg(0x000f, 0x0000),
    // power on sequence
    Step::Reg(0x0010, 0x0000), // SAP, BT, AP, DSTB, SLP, STB
    Step::Reg(0x0011, 0x0007), // DC1, DC0, VC
    Step::Reg(0x0012, 0x0000), // VREG1OUT
    Step::Reg(0x0013, 0x0000), // VDV for VCOM amplitude
    Step::Reg(0x0007, 0x0001),
    Step::Delay(200),
    Step::Reg(0x0010, 0x1690),
    Step::Reg(0x0011, 0x0227),
    Step::Delay(50),
    Step::Reg(0x0012, 0x009d),
    Step::Delay(50),
    Step::Reg(0x0013, 0x1900),
    Step::Reg(0x0029, 0x0025), // VCM
    Step::Reg(0x002b, 0x000d), // frame rate
    Step::Delay(50),
    Step::Reg(0x0020, 0x0000),
    Step::Reg(0x0021, 0x0000),
    // gamma
    Step::Reg(0x0030, 0x0007),
    Step::Reg(0x0031, 0x0303),
    Step::Reg(0x0032, 0x0003),
    Step::Reg(0x0035, 0x0206),
    Step::Reg(0x0036, 0x0008),
    Step::Reg(0x0037, 0x0406),
    Step::Reg(0x0038, 0x0304),
    Step::Reg(0x0039, 0x0007),
    Step::Reg(0x003c, 0x0602),
    Step::Reg(0x003d, 0x0008),
    // GRAM area
    Step::Reg(0x0050, 0x0000),
    Step::Reg(0x0051, 0x00ef),
    Step::Reg(0x0052, 0x0000),
    Step::Reg(0x0053, 0x013f),
    Step::Reg(0x0060, 0xa700), // GS, 320 gate lines
    Step::Reg(0x0061, 0x0001),
    Step::Reg(0x006a, 0x0000),
    Step::Reg(0x0080, 0x0000),
    Step::Reg(0x0081, 0x0000),
    Step::Reg(0x0082, 0x0000),
    Step::Reg(0x0083, 0x0000),
    Step::Reg(0x0084, 0x0000),
    Step::Reg(0x0085, 0x0000),
    Step::Reg(0x0090, 0x0010),
    Step::Reg(0x0092, 0x0600),
    Step::Reg(0x0007, 0x0133), // display on
];

#[rustfmt::skip]
const SLEEP: &[Step] = &[
    Step::Reg(0x0007, 0x0131),
    Step::Delay(10),
    Step::Reg(0x0007, 0x0130),
    Step::Delay(10),
    Step::Reg(0x0007, 0x0000), // display off
    Step::Reg(0x0010, 0x0002), // SLP
];

/// R10h back to the power-on value with SLP and STB clear.
#[rustfmt::skip]
const WAKE_UP_ILI9320: &[Step] = &[
    Step::Reg(0x0010, 0x17b0),
    Step::Delay(50),
    Step::Reg(0x0007, 0x0173),
];

#[rustfmt::skip]
const WAKE_UP_ILI9325: &[Step] = &[
    Step::Reg(0x0010, 0x1690),
    Step::Delay(50),
    Step::Reg(0x0007, 0x0133),
];

/// 720 Source x 320 Gate, 262K color
pub struct ILI932X;

impl Driver for ILI932X {
    const NAME: &'static str = "ILI932x";
    const WIDTH: u16 = 240;
    const HEIGHT: u16 = 320;

    fn reset<DI: DisplayInterface, DELAY: DelayNs>(di: &mut DI, delay: &mut DELAY) {
        di.reset(delay, 1_000, 10_000, 50_000);
    }

    fn read_id<DI: DisplayInterface>(di: &mut DI) -> Result<u16, DisplayError> {
        read_register(di, 0x0000)
    }

    fn init<DI: DisplayInterface, DELAY: DelayNs>(
        di: &mut DI,
        delay: &mut DELAY,
    ) -> Result<(), DisplayError> {
        Self::reset(di, delay);

        let id = Self::read_id(di)?;
        debug!("ILI932x id {:#x}", id);
        match id {
            ID_ILI9320 => {
                info!("ILI9320 table");
                run_sequence(di, delay, INIT_ILI9320)?;
            }
            ID_ILI9325 | ID_ILI9328 => {
                info!("ILI9325 table");
                run_sequence(di, delay, INIT_ILI9325)?;
            }
            _ => return Err(unknown_device(Self::NAME, id)),
        }

        Self::clear(di)
    }

    fn write_window<DI: DisplayInterface>(
        di: &mut DI,
        x0: u16,
        y0: u16,
        x1: u16,
        y1: u16,
    ) -> Result<(), DisplayError> {
        di.write_register(0x0050, x0)?; // horizontal start
        di.write_register(0x0051, x1)?; // horizontal end
        di.write_register(0x0052, y0)?; // vertical start
        di.write_register(0x0053, y1)?; // vertical end
        di.write_register(0x0020, x0)?; // GRAM x
        di.write_register(0x0021, y0)?; // GRAM y
        di.send_command(Command::U16(0x0022))
    }

    fn sleep<DI: DisplayInterface, DELAY: DelayNs>(
        di: &mut DI,
        delay: &mut DELAY,
    ) -> Result<(), DisplayError> {
        run_sequence(di, delay, SLEEP)
    }

    /// The power setting differs per chip, so R00h is read again. GRAM is kept.
    fn wake_up<DI: DisplayInterface, DELAY: DelayNs>(
        di: &mut DI,
        delay: &mut DELAY,
    ) -> Result<(), DisplayError> {
        let steps = match Self::read_id(di)? {
            ID_ILI9320 => WAKE_UP_ILI9320,
            ID_ILI9325 | ID_ILI9328 => WAKE_UP_ILI9325,
            id => return Err(unknown_device(Self::NAME, id)),
        };
        run_sequence(di, delay, steps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Op, Recorder};
    use embedded_hal_mock::eh1::delay::NoopDelay;

    fn registers(di: &Recorder) -> Vec<u16> {
        di.commands()
            .into_iter()
            .filter_map(|c| match c {
                Command::U16(r) => Some(r),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn ili9325_table_is_picked_by_id() {
        let mut di = Recorder::parallel16().respond(Command::U16(0x0000), &[0x9325]);
        ILI932X::init(&mut di, &mut NoopDelay::new()).unwrap();

        assert_eq!(di.ops[0], Op::Reset);
        assert_eq!(di.ops[1], Op::Read(Command::U16(0x0000), 1));
        assert_eq!(di.ops[2], Op::Command(Command::U16(0x00e5)));
        assert_eq!(di.ops[3], Op::Data16(vec![0x78f0]));
        assert_eq!(di.pixel_count(), 240 * 320);
    }

    #[test]
    fn ili9328_shares_the_ili9325_table() {
        let mut di = Recorder::parallel16().respond(Command::U16(0x0000), &[0x9328]);
        ILI932X::init(&mut di, &mut NoopDelay::new()).unwrap();
        assert_eq!(di.ops[3], Op::Data16(vec![0x78f0]));
    }

    #[test]
    fn ili9320_over_8bit_bus() {
        let mut di = Recorder::parallel8().respond(Command::U16(0x0000), &[0x93, 0x20]);
        ILI932X::init(&mut di, &mut NoopDelay::new()).unwrap();

        assert_eq!(di.ops[1], Op::Read(Command::U16(0x0000), 2));
        assert_eq!(di.ops[3], Op::Data16(vec![0x8000]));
        assert!(registers(&di).contains(&0x0029));
    }

    #[test]
    fn unknown_id_is_an_error() {
        let mut di = Recorder::parallel16().respond(Command::U16(0x0000), &[0x1505]);
        assert_eq!(
            ILI932X::init(&mut di, &mut NoopDelay::new()),
            Err(DisplayError::UnknownDevice(0x1505))
        );
        assert_eq!(di.ops.len(), 2);
    }

    #[test]
    fn window_registers_then_gram() {
        let mut di = Recorder::parallel16();
        ILI932X::set_window(&mut di, 10, 20, 30, 40).unwrap();

        assert_eq!(
            di.ops,
            [
                Op::Command(Command::U16(0x50)),
                Op::Data16(vec![10]),
                Op::Command(Command::U16(0x51)),
                Op::Data16(vec![29]),
                Op::Command(Command::U16(0x52)),
                Op::Data16(vec![30]),
                Op::Command(Command::U16(0x53)),
                Op::Data16(vec![69]),
                Op::Command(Command::U16(0x20)),
                Op::Data16(vec![10]),
                Op::Command(Command::U16(0x21)),
                Op::Data16(vec![30]),
                Op::Command(Command::U16(0x22)),
            ]
        );
    }

    #[test]
    fn window_outside_panel_emits_nothing() {
        let mut di = Recorder::parallel16();
        assert_eq!(
            ILI932X::set_window(&mut di, 200, 41, 0, 1),
            Err(DisplayError::OutOfBounds)
        );
        assert!(di.ops.is_empty());
    }

    #[test]
    fn wake_up_keeps_gram() {
        let mut di = Recorder::parallel16().respond(Command::U16(0x0000), &[0x9325]);
        let mut delay = NoopDelay::new();
        ILI932X::sleep(&mut di, &mut delay).unwrap();
        assert_eq!(di.ops.last(), Some(&Op::Data16(vec![0x0002])));

        ILI932X::wake_up(&mut di, &mut delay).unwrap();
        assert!(!di.ops.contains(&Op::Reset));
        assert_eq!(di.pixel_count(), 0);
        assert_eq!(
            di.after_last(Command::U16(0x0010)),
            [
                Op::Command(Command::U16(0x0010)),
                Op::Data16(vec![0x1690]),
                Op::Command(Command::U16(0x0007)),
                Op::Data16(vec![0x0133]),
            ]
        );
    }

    #[test]
    fn ili9320_wakes_with_its_own_power_setting() {
        let mut di = Recorder::parallel8().respond(Command::U16(0x0000), &[0x93, 0x20]);
        ILI932X::wake_up(&mut di, &mut NoopDelay::new()).unwrap();

        assert_eq!(di.ops[2], Op::Data16(vec![0x17b0]));
        assert_eq!(di.ops.last(), Some(&Op::Data16(vec![0x0173])));
    }
}
