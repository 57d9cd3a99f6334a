//! ST7735R driver
//!
//! For:
//! - 1.8" 128x160 modules, red tab

use embedded_hal::delay::DelayNs;

use super::{dcs_sleep, dcs_wake_up, dcs_window, read_display_id, run_sequence, Driver, Step};
use crate::interface::{DisplayError, DisplayInterface};

#[rustfmt::skip]
const INIT: &[Step] = &[
    Step::Cmd(0x01, &[]),                               // SWRESET
    Step::Delay(150),
    Step::Cmd(0x11, &[]),                               // SLPOUT
    Step::Delay(255),
    Step::Cmd(0xb1, &[0x01, 0x2c, 0x2d]),               // frame rate, normal mode
    Step::Cmd(0xb2, &[0x01, 0x2c, 0x2d]),               // idle mode
    Step::Cmd(0xb3, &[0x01, 0x2c, 0x2d, 0x01, 0x2c, 0x2d]), // partial mode
    Step::Cmd(0xb4, &[0x07]),                           // no inversion
    Step::Cmd(0xc0, &[0xa2, 0x02, 0x84]),               // -4.6V, auto mode
    Step::Cmd(0xc1, &[0xc5]),                           // VGH25 2.4V, VGSEL -10, VGH = 3 * AVDD
    Step::Cmd(0xc2, &[0x0a, 0x00]),                     // opamp current small
    Step::Cmd(0xc3, &[0x8a, 0x2a]),
    Step::Cmd(0xc4, &[0x8a, 0xee]),
    Step::Cmd(0xc5, &[0x0e]),                           // VCOM
    Step::Cmd(0x20, &[]),                               // inversion off
    Step::Cmd(0x36, &[0xc8]),                           // MY, MX, BGR
    Step::Cmd(0x3a, &[0x05]),                           // 16-bit/pixel
    Step::Cmd(0xe0, &[
        0x02, 0x1c, 0x07, 0x12, 0x37, 0x32, 0x29, 0x2d,
        0x29, 0x25, 0x2b, 0x39, 0x00, 0x01, 0x03, 0x10,
    ]),
    Step::Cmd(0xe1, &[
        0x03, 0x1d, 0x07, 0x06, 0x2e, 0x2c, 0x29, 0x2d,
        0x2e, 0x2e, 0x37, 0x3f, 0x00, 0x00, 0x02, 0x10,
    ]),
    Step::Cmd(0x13, &[]),                               // normal display on
    Step::Delay(10),
    Step::Cmd(0x29, &[]),
    Step::Delay(100),
];

/// 132RGB x 162 GRAM, 128x160 panel
pub struct ST7735R;

impl Driver for ST7735R {
    const NAME: &'static str = "ST7735R";
    const WIDTH: u16 = 128;
    const HEIGHT: u16 = 160;

    /// ID2, ID3 of RDDID, 0x89f0 on genuine parts.
    fn read_id<DI: DisplayInterface>(di: &mut DI) -> Result<u16, DisplayError> {
        let [_, id2, id3] = read_display_id(di)?;
        Ok(u16::from_be_bytes([id2, id3]))
    }

    /// No probe, clones answer with anything.
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
