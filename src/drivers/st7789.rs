//! ST7789V driver
//!
//! For:
//! - ST7789V, 2.0"/2.4" 240x320
//! - ST7789V2, 1.69" 240x280, rows 20..300 of the 320 line GRAM

use embedded_hal::delay::DelayNs;

use super::{
    dcs_sleep, dcs_wake_up, dcs_window, read_display_id, run_sequence, unknown_device, Driver,
    Step,
};
use crate::interface::{DisplayError, DisplayInterface};

/// ID2, ID3 of RDDID
const ID_ST7789: u16 = 0x8552;

#[rustfmt::skip]
const INIT_ST7789V: &[Step] = &[
    Step::Cmd(0x36, &[0x00]),
    Step::Cmd(0x3a, &[0x05]),                         // 16-bit/pixel
    Step::Cmd(0xb2, &[0x0c, 0x0c, 0x00, 0x33, 0x33]), // porch
    Step::Cmd(0xb7, &[0x35]),                         // gate control
    Step::Cmd(0xbb, &[0x19]),                         // VCOM
    Step::Cmd(0xc0, &[0x2c]),                         // LCM control
    Step::Cmd(0xc2, &[0x01]),                         // VDV and VRH enable
    Step::Cmd(0xc3, &[0x12]),                         // VRH
    Step::Cmd(0xc4, &[0x20]),                         // VDV
    Step::Cmd(0xc6, &[0x0f]),                         // 60Hz
    Step::Cmd(0xd0, &[0xa4, 0xa1]),                   // power control 1
    Step::Cmd(0xe0, &[
        0xd0, 0x04, 0x0d, 0x11, 0x13, 0x2b, 0x3f,
        0x54, 0x4c, 0x18, 0x0d, 0x0b, 0x1f, 0x23,
    ]),
    Step::Cmd(0xe1, &[
        0xd0, 0x04, 0x0c, 0x11, 0x13, 0x2c, 0x3f,
        0x44, 0x51, 0x2f, 0x1f, 0x1f, 0x20, 0x23,
    ]),
    Step::Cmd(0x21, &[]),                             // inversion on
    Step::Cmd(0x11, &[]),
    Step::Delay(120),
    Step::Cmd(0x29, &[]),
];

#[rustfmt::skip]
const INIT_ST7789V2: &[Step] = &[
    Step::Cmd(0x36, &[0x00]),
    Step::Cmd(0x3a, &[0x05]),
    Step::Cmd(0xb2, &[0x0b, 0x0b, 0x00, 0x33, 0x35]),
    Step::Cmd(0xb7, &[0x11]),
    Step::Cmd(0xbb, &[0x35]),
    Step::Cmd(0xc0, &[0x2c]),
    Step::Cmd(0xc2, &[0x01]),
    Step::Cmd(0xc3, &[0x0d]),
    Step::Cmd(0xc4, &[0x20]),
    Step::Cmd(0xc6, &[0x13]),
    Step::Cmd(0xd0, &[0xa4, 0xa1]),
    Step::Cmd(0xd6, &[0xa1]),
    Step::Cmd(0xe0, &[
        0xf0, 0x06, 0x0b, 0x0a, 0x09, 0x26, 0x29,
        0x33, 0x41, 0x18, 0x16, 0x15, 0x29, 0x2d,
    ]),
    Step::Cmd(0xe1, &[
        0xf0, 0x04, 0x08, 0x08, 0x07, 0x03, 0x28,
        0x32, 0x40, 0x3b, 0x19, 0x18, 0x2a, 0x2e,
    ]),
    Step::Cmd(0xe4, &[0x25, 0x00, 0x00]),             // gate scan
    Step::Cmd(0x21, &[]),
    Step::Cmd(0x11, &[]),
    Step::Delay(120),
    Step::Cmd(0x29, &[]),
];

fn rddid<DI: DisplayInterface>(di: &mut DI) -> Result<u16, DisplayError> {
    let [_, id2, id3] = read_display_id(di)?;
    Ok(u16::from_be_bytes([id2, id3]))
}

fn probe<DI: DisplayInterface>(name: &str, di: &mut DI) -> Result<(), DisplayError> {
    let id = rddid(di)?;
    debug!("{} id {:#x}", name, id);
    if id != ID_ST7789 {
        return Err(unknown_device(name, id));
    }
    Ok(())
}

/// 240RGB x 320, 262K color
pub struct ST7789V;

impl Driver for ST7789V {
    const NAME: &'static str = "ST7789V";
    const WIDTH: u16 = 240;
    const HEIGHT: u16 = 320;

    fn read_id<DI: DisplayInterface>(di: &mut DI) -> Result<u16, DisplayError> {
        rddid(di)
    }

    fn init<DI: DisplayInterface, DELAY: DelayNs>(
        di: &mut DI,
        delay: &mut DELAY,
    ) -> Result<(), DisplayError> {
        Self::reset(di, delay);
        probe(Self::NAME, di)?;
        run_sequence(di, delay, INIT_ST7789V)?;

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

/// 240RGB x 280 visible, round corners
pub struct ST7789V2;

impl ST7789V2 {
    /// First visible GRAM row.
    const ROW_OFFSET: u16 = 20;
}

impl Driver for ST7789V2 {
    const NAME: &'static str = "ST7789V2";
    const WIDTH: u16 = 240;
    const HEIGHT: u16 = 280;

    fn read_id<DI: DisplayInterface>(di: &mut DI) -> Result<u16, DisplayError> {
        rddid(di)
    }

    fn init<DI: DisplayInterface, DELAY: DelayNs>(
        di: &mut DI,
        delay: &mut DELAY,
    ) -> Result<(), DisplayError> {
        Self::reset(di, delay);
        probe(Self::NAME, di)?;
        run_sequence(di, delay, INIT_ST7789V2)?;

        Self::clear(di)
    }

    fn write_window<DI: DisplayInterface>(
        di: &mut DI,
        x0: u16,
        y0: u16,
        x1: u16,
        y1: u16,
    ) -> Result<(), DisplayError> {
        let (Some(y0), Some(y1)) = (
            y0.checked_add(Self::ROW_OFFSET),
            y1.checked_add(Self::ROW_OFFSET),
        ) else {
            return Err(DisplayError::OutOfBounds);
        };
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
