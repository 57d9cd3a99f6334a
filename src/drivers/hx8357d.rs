//! HX8357D driver
//!
//! For:
//! - 3.5" 320x480 modules

use embedded_hal::delay::DelayNs;

use super::{dcs_sleep, dcs_wake_up, dcs_window, read_display_id, run_sequence, Driver, Step};
use crate::interface::{DisplayError, DisplayInterface};

#[rustfmt::skip]
const INIT: &[Step] = &[
    Step::Cmd(0x01, &[]),                                     // SWRESET
    Step::Delay(10),
    Step::Cmd(0xb9, &[0xff, 0x83, 0x57]),                     // SETEXTC, enable extended commands
    Step::Delay(300),
    Step::Cmd(0xb3, &[0x80, 0x00, 0x06, 0x06]),               // SETRGB
    Step::Cmd(0xb6, &[0x25]),                                 // SETCOM, -1.52V
    Step::Cmd(0xb0, &[0x68]),                                 // SETOSC, normal mode 70Hz
    Step::Cmd(0xcc, &[0x05]),                                 // SETPANEL, BGR, gate direction swapped
    Step::Cmd(0xb1, &[0x00, 0x15, 0x1c, 0x1c, 0x83, 0xaa]),   // SETPWR1
    Step::Cmd(0xc0, &[0x50, 0x50, 0x01, 0x3c, 0x1e, 0x08]),   // SETSTBA
    Step::Cmd(0xb4, &[0x02, 0x40, 0x00, 0x2a, 0x2a, 0x0d, 0x78]), // SETCYC
    Step::Cmd(0xe0, &[
        0x02, 0x0a, 0x11, 0x1d, 0x23, 0x35, 0x41, 0x4b,
        0x4b, 0x42, 0x3a, 0x27, 0x1b, 0x08, 0x09, 0x03,
        0x02, 0x0a, 0x11, 0x1d, 0x23, 0x35, 0x41, 0x4b,
        0x4b, 0x42, 0x3a, 0x27, 0x1b, 0x08, 0x09, 0x03,
        0x00, 0x01,
    ]),
    Step::Cmd(0x3a, &[0x55]),                                 // 16-bit/pixel
    Step::Cmd(0x36, &[0xc0]),                                 // MY, MX
    Step::Cmd(0x35, &[0x00]),                                 // tearing effect on
    Step::Cmd(0x44, &[0x00, 0x02]),                           // tear scanline
    Step::Cmd(0x11, &[]),
    Step::Delay(150),
    Step::Cmd(0x29, &[]),
    Step::Delay(50),
];

/// 320RGB x 480, 262K color
pub struct HX8357D;

impl Driver for HX8357D {
    const NAME: &'static str = "HX8357D";
    const WIDTH: u16 = 320;
    const HEIGHT: u16 = 480;

    fn read_id<DI: DisplayInterface>(di: &mut DI) -> Result<u16, DisplayError> {
        let [_, id2, id3] = read_display_id(di)?;
        Ok(u16::from_be_bytes([id2, id3]))
    }

    fn init<DI: DisplayInterface, DELAY: DelayNs>(
        di: &mut DI,
        delay: &mut DELAY,
    ) -> Result<(), DisplayError> {
        Self::reset(di, delay);
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
