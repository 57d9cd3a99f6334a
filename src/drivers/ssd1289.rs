//! SSD1289 driver
//!
//! For:
//! - 3.2" 240x320 modules on the 16-bit 8080 bus

use embedded_hal::delay::DelayNs;

use super::{read_register, run_sequence, unknown_device, Driver, Step};
use crate::interface::{Command, DisplayError, DisplayInterface};

const ID_SSD1289: u16 = 0x8989;

#[rustfmt::skip]
const INIT: &[Step] = &[
    Step::Reg(0x0000, 0x0001), // oscillator on
    Step::Reg(0x0003, 0xa8a4), // power control 1
    Step::Reg(0x000c, 0x0000), // power control 2
    Step::Reg(0x000d, 0x080c), // power control 3
    Step::Reg(0x000e, 0x2b00), // power control 4
    Step::Reg(0x001e, 0x00b7), // power control 5
    Step::Reg(0x0001, 0x2b3f), // RL, REV, BGR, TB, 320 lines
    Step::Reg(0x0002, 0x0600), // LCD drive AC
    Step::Reg(0x0010, 0x0000), // sleep out
    Step::Reg(0x0011, 0x6070), // 65K color, ID = 11, AM = 0
    Step::Reg(0x0005, 0x0000), // compare registers
    Step::Reg(0x0006, 0x0000),
    Step::Reg(0x0016, 0xef1c), // horizontal porch
    Step::Reg(0x0017, 0x0003), // vertical porch
    Step::Reg(0x0007, 0x0233), // display control
    Step::Reg(0x000b, 0x0000), // frame cycle
    Step::Reg(0x000f, 0x0000), // gate scan start
    Step::Reg(0x0041, 0x0000), // vertical scroll
    Step::Reg(0x0042, 0x0000),
    Step::Reg(0x0048, 0x0000), // first screen
    Step::Reg(0x0049, 0x013f),
    Step::Reg(0x004a, 0x0000), // second screen
    Step::Reg(0x004b, 0x0000),
    Step::Reg(0x0044, 0xef00), // horizontal RAM window
    Step::Reg(0x0045, 0x0000), // vertical RAM window
    Step::Reg(0x0046, 0x013f),
    // gamma
    Step::Reg(0x0030, 0x0707),
    Step::Reg(0x0031, 0x0204),
    Step::Reg(0x0032, 0x0204),
    Step::Reg(0x0033, 0x0502),
    Step::Reg(0x0034, 0x0507),
    Step::Reg(0x0035, 0x0204),
    Step::Reg(0x0036, 0x0204),
    Step::Reg(0x0037, 0x0502),
    Step::Reg(0x003a, 0x0302),
    Step::Reg(0x003b, 0x0302),
    Step::Reg(0x0023, 0x0000), // RAM write data mask
    Step::Reg(0x0024, 0x0000),
    Step::Reg(0x0025, 0x8000), // frame frequency
    Step::Reg(0x004e, 0x0000), // GDDRAM x
    Step::Reg(0x004f, 0x0000), // GDDRAM y
];

#[rustfmt::skip]
const SLEEP: &[Step] = &[
    Step::Reg(0x0007, 0x0000), // display off
    Step::Reg(0x0010, 0x0001), // sleep mode
    Step::Delay(30),
];

/// 240RGB x 320, 262K color
pub struct SSD1289;

impl Driver for SSD1289 {
    const NAME: &'static str = "SSD1289";
    const WIDTH: u16 = 240;
    const HEIGHT: u16 = 320;

    fn read_id<DI: DisplayInterface>(di: &mut DI) -> Result<u16, DisplayError> {
        read_register(di, 0x0000)
    }

    fn init<DI: DisplayInterface, DELAY: DelayNs>(
        di: &mut DI,
        delay: &mut DELAY,
    ) -> Result<(), DisplayError> {
        Self::reset(di, delay);

        let id = Self::read_id(di)?;
        debug!("SSD1289 id {:#x}", id);
        if id != ID_SSD1289 {
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
        // HEA in the high byte, HSA in the low byte
        di.write_register(0x0044, (x1 << 8) | x0)?;
        di.write_register(0x0045, y0)?;
        di.write_register(0x0046, y1)?;
        di.write_register(0x004e, x0)?;
        di.write_register(0x004f, y0)?;
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
        di.write_register(0x0010, 0x0000)?;
        delay.delay_ms(30);
        di.write_register(0x0007, 0x0233)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Op, Recorder};
    use embedded_hal_mock::eh1::delay::NoopDelay;

    #[test]
    fn init_then_clear() {
        let mut di = Recorder::parallel16().respond(Command::U16(0x0000), &[0x8989]);
        SSD1289::init(&mut di, &mut NoopDelay::new()).unwrap();

        assert_eq!(di.ops[2], Op::Command(Command::U16(0x0000)));
        assert_eq!(di.ops[3], Op::Data16(vec![0x0001]));
        assert_eq!(di.pixel_count(), 240 * 320);
        assert!(matches!(di.ops.last(), Some(Op::Pixels(_))));
    }

    #[test]
    fn other_id_is_rejected() {
        let mut di = Recorder::parallel16().respond(Command::U16(0x0000), &[0x9325]);
        assert_eq!(
            SSD1289::init(&mut di, &mut NoopDelay::new()),
            Err(DisplayError::UnknownDevice(0x9325))
        );
    }

    #[test]
    fn horizontal_window_is_packed() {
        let mut di = Recorder::parallel16();
        SSD1289::set_window(&mut di, 16, 32, 100, 10).unwrap();

        assert_eq!(di.ops[0], Op::Command(Command::U16(0x0044)));
        assert_eq!(di.ops[1], Op::Data16(vec![(47 << 8) | 16]));
        assert_eq!(di.ops[3], Op::Data16(vec![100]));
        assert_eq!(di.ops[5], Op::Data16(vec![109]));
        assert_eq!(di.ops[10], Op::Command(Command::U16(0x0022)));
    }

    #[test]
    fn sleep_mode_round_trip() {
        let mut di = Recorder::parallel16();
        let mut delay = NoopDelay::new();
        SSD1289::sleep(&mut di, &mut delay).unwrap();
        SSD1289::wake_up(&mut di, &mut delay).unwrap();

        assert_eq!(
            di.ops,
            [
                Op::Command(Command::U16(0x0007)),
                Op::Data16(vec![0x0000]),
                Op::Command(Command::U16(0x0010)),
                Op::Data16(vec![0x0001]),
                Op::Command(Command::U16(0x0010)),
                Op::Data16(vec![0x0000]),
                Op::Command(Command::U16(0x0007)),
                Op::Data16(vec![0x0233]),
            ]
        );
    }
}
