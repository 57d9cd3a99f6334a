//! ST7796S driver
//!
//! For:
//! - 3.5"/4.0" 320x480 modules

use embedded_hal::delay::DelayNs;

use super::{dcs_sleep, dcs_wake_up, dcs_window, read_id4, run_sequence, unknown_device, Driver, Step};
use crate::interface::{DisplayError, DisplayInterface};

const ID_ST7796: u16 = 0x7796;

#[rustfmt::skip]
const INIT: &[Step] = &[
    Step::Cmd(0xf0, &[0xc3]),                   // command set control, part 1
    Step::Cmd(0xf0, &[0x96]),                   // part 2
    Step::Cmd(0x36, &[0x48]),                   // MX, BGR
    Step::Cmd(0x3a, &[0x55]),                   // 16-bit/pixel
    Step::Cmd(0xb4, &[0x01]),                   // 1-dot inversion
    Step::Cmd(0xb6, &[0x80, 0x02, 0x3b]),       // display function
    Step::Cmd(0xe8, &[0x40, 0x8a, 0x00, 0x00, 0x29, 0x19, 0xa5, 0x33]),
    Step::Cmd(0xc1, &[0x06]),                   // power control 2
    Step::Cmd(0xc2, &[0xa7]),                   // power control 3
    Step::Cmd(0xc5, &[0x18]),                   // VCOM
    Step::Delay(120),
    Step::Cmd(0xe0, &[
        0xf0, 0x09, 0x0b, 0x06, 0x04, 0x15, 0x2f,
        0x54, 0x42, 0x3c, 0x17, 0x14, 0x18, 0x1b,
    ]),
    Step::Cmd(0xe1, &[
        0xe0, 0x09, 0x0b, 0x06, 0x04, 0x03, 0x2b,
        0x43, 0x42, 0x3b, 0x16, 0x14, 0x17, 0x1b,
    ]),
    Step::Delay(120),
    Step::Cmd(0xf0, &[0x3c]),                   // command set locked again
    Step::Cmd(0xf0, &[0x69]),
    Step::Delay(120),
    Step::Cmd(0x11, &[]),
    Step::Delay(120),
    Step::Cmd(0x29, &[]),
];

/// 320RGB x 480, 262K color
pub struct ST7796S;

impl Driver for ST7796S {
    const NAME: &'static str = "ST7796S";
    const WIDTH: u16 = 320;
    const HEIGHT: u16 = 480;

    fn read_id<DI: DisplayInterface>(di: &mut DI) -> Result<u16, DisplayError> {
        read_id4(di)
    }

    fn init<DI: DisplayInterface, DELAY: DelayNs>(
        di: &mut DI,
        delay: &mut DELAY,
    ) -> Result<(), DisplayError> {
        Self::reset(di, delay);

        let id = Self::read_id(di)?;
        debug!("ST7796S id {:#x}", id);
        if id != ID_ST7796 {
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
        dcs_window(di, x0, y0, x1, y1)
    }

    fn sleep<DI: DisplayInterface, DELAY: DelayNs>(
        di: &mut DI,
        delay: &mut DELAY,
    ) -> Result<(), DisplayError> {
        dcs_sleep(di, delay)
    }

    fn wake_up<DI: DisplayInterface, DELAY: DelayNs>(
        di: &mut DI,
        delay: &mut DELAY,
    ) -> Result<(), DisplayError> {
        dcs_wake_up(di, delay)
    }
}
