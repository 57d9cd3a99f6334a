//! ILI9225 driver
//!
//! For:
//! - 2.0"/2.2" 176x220 modules

use embedded_hal::delay::DelayNs;

use super::{read_register, run_sequence, unknown_device, Driver, Step};
use crate::interface::{Command, DisplayError, DisplayInterface};

const ID_ILI9225: u16 = 0x9225;

#[rustfmt::skip]
const INIT: &[Step] = &[
    // power off
    Step::Reg(0x0010, 0x0000),
    Step::Reg(0x0011, 0x0000),
    Step::Reg(0x0012, 0x0000),
    Step::Reg(0x0013, 0x0000),
    Step::Reg(0x0014, 0x0000),
    Step::Delay(40),
    // power on
    Step::Reg(0x0011, 0x0018), // APON, PON, AON, VCI1EN, VC
    Step::Reg(0x0012, 0x6121), // BT, DC1, DC2, DC3
    Step::Reg(0x0013, 0x006f), // GVDD
    Step::Reg(0x0014, 0x495f), // VCOMH, VML
    Step::Reg(0x0010, 0x0800), // SAP
    Step::Delay(10),
    Step::Reg(0x0011, 0x103b),
    Step::Delay(50),
    Step::Reg(0x0001, 0x011c), // SS, 220 lines
    Step::Reg(0x0002, 0x0100), // line inversion
    Step::Reg(0x0003, 0x1030), // BGR, I/D = 11
    Step::Reg(0x0007, 0x0000), // display off
    Step::Reg(0x0008, 0x0808), // porches
    Step::Reg(0x000b, 0x1100), // frame cycle
    Step::Reg(0x000c, 0x0000), // RGB interface off
    Step::Reg(0x000f, 0x0d01), // oscillator
    Step::Reg(0x0015, 0x0020),
    Step::Reg(0x0020, 0x0000), // GRAM x
    Step::Reg(0x0021, 0x0000), // GRAM y
    // scroll and window
    Step::Reg(0x0030, 0x0000),
    Step::Reg(0x0031, 0x00db),
    Step::Reg(0x0032, 0x0000),
    Step::Reg(0x0033, 0x0000),
    Step::Reg(0x0034, 0x00db),
    Step::Reg(0x0035, 0x0000),
    Step::Reg(0x0036, 0x00af),
    Step::Reg(0x0037, 0x0000),
    Step::Reg(0x0038, 0x00db),
    Step::Reg(0x0039, 0x0000),
    // gamma
    Step::Reg(0x0050, 0x0000),
    Step::Reg(0x0051, 0x0808),
    Step::Reg(0x0052, 0x080a),
    Step::Reg(0x0053, 0x000a),
    Step::Reg(0x0054, 0x0a08),
    Step::Reg(0x0055, 0x0808),
    Step::Reg(0x0056, 0x0000),
    Step::Reg(0x0057, 0x0a00),
    Step::Reg(0x0058, 0x0710),
    Step::Reg(0x0059, 0x0710),
    Step::Reg(0x0007, 0x0012),
    Step::Delay(50),
    Step::Reg(0x0007, 0x1017), // display on
];

#[rustfmt::skip]
const SLEEP: &[Step] = &[
    Step::Reg(0x0007, 0x0000), // display off
    Step::Delay(50),
    Step::Reg(0x0011, 0x0007),
    Step::Delay(50),
    Step::Reg(0x0010, 0x0a01), // SAP, standby
];

#[rustfmt::skip]
const WAKE_UP: &[Step] = &[
    Step::Reg(0x0010, 0x0800), // standby off
    Step::Reg(0x0011, 0x103b),
    Step::Delay(50),
    Step::Reg(0x0007, 0x0012),
    Step::Delay(50),
    Step::Reg(0x0007, 0x1017), // display on
];

/// 176RGB x 220 dot, 262K color
pub struct ILI9225;

impl Driver for ILI9225 {
    const NAME: &'static str = "ILI9225";
    const WIDTH: u16 = 176;
    const HEIGHT: u16 = 220;

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
        debug!("ILI9225 id {:#x}", id);
        if id != ID_ILI9225 {
            return Err(unknown_device(Self::NAME, id));
        }
        run_sequence(di, delay, INIT)?;

        Self::clear(di)
    }

    fn write_window<DI: DisplayInterface>(
        di: &mut DI,
        x0: u16,
        y0: u16,
        x1: u16,
        y1: u16,
    ) -> Result<(), DisplayError> {
        di.write_register(0x0036, x1)?; // horizontal end
        di.write_register(0x0037, x0)?; // horizontal start
        di.write_register(0x0038, y1)?; // vertical end
        di.write_register(0x0039, y0)?; // vertical start
        di.write_register(0x0020, x0)?;
        di.write_register(0x0021, y0)?;
        di.send_command(Command::U16(0x0022))
    }

    fn sleep<DI: DisplayInterface, DELAY: DelayNs>(
        di: &mut DI,
        delay: &mut DELAY,
    ) -> Result<(), DisplayError> {
        run_sequence(di, delay, SLEEP)
    }

    fn wake_up<DI: DisplayInterface, DELAY: DelayNs>(
        di: &mut DI,
        delay: &mut DELAY,
    ) -> Result<(), DisplayError> {
        run_sequence(di, delay, WAKE_UP)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Op, Recorder};
    use embedded_hal_mock::eh1::delay::NoopDelay;

    #[test]
    fn init_probes_then_clears() {
        let mut di = Recorder::spi().respond(Command::U16(0x0000), &[0x92, 0x25]);
        ILI9225::init(&mut di, &mut NoopDelay::new()).unwrap();

        assert_eq!(di.ops[0], Op::Reset);
        assert_eq!(di.ops[1], Op::Read(Command::U16(0x0000), 2));
        assert_eq!(di.ops[2], Op::Command(Command::U16(0x0010)));
        assert_eq!(di.after_last(Command::U16(0x0022)).len(), 2);
        assert_eq!(di.pixel_count(), 176 * 220);
    }

    #[test]
    fn unknown_id_is_an_error() {
        let mut di = Recorder::spi();
        assert_eq!(
            ILI9225::init(&mut di, &mut NoopDelay::new()),
            Err(DisplayError::UnknownDevice(0))
        );
    }

    #[test]
    fn full_window() {
        let mut di = Recorder::parallel16();
        ILI9225::set_window(&mut di, 0, 176, 0, 220).unwrap();

        let regs: Vec<_> = di.commands();
        assert_eq!(
            regs,
            [0x36, 0x37, 0x38, 0x39, 0x20, 0x21, 0x22].map(Command::U16)
        );
        assert_eq!(di.ops[1], Op::Data16(vec![175]));
        assert_eq!(di.ops[5], Op::Data16(vec![219]));
    }

    #[test]
    fn sleep_then_wake_up() {
        let mut di = Recorder::spi();
        let mut delay = NoopDelay::new();
        ILI9225::sleep(&mut di, &mut delay).unwrap();
        assert_eq!(di.ops[5], Op::Data16(vec![0x0a01]));

        ILI9225::wake_up(&mut di, &mut delay).unwrap();
        assert!(!di
            .ops
            .iter()
            .any(|op| matches!(op, Op::Reset | Op::Read(..))));
        assert_eq!(di.pixel_count(), 0);
        assert_eq!(di.ops[6], Op::Command(Command::U16(0x0010)));
        assert_eq!(di.ops[7], Op::Data16(vec![0x0800]));
        assert_eq!(di.ops.last(), Some(&Op::Data16(vec![0x1017])));
    }
}
