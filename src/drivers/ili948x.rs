//! ILI9486 / ILI9488 driver
//!
//! For:
//! - 3.5" 320x480 modules
//!
//! Serial buses only carry 18-bit pixels on these controllers, RGB565 words
//! are widened to three bytes on the way out.

use embedded_hal::delay::DelayNs;

use super::{
    dcs_sleep, dcs_wake_up, dcs_window, read_id4, run_sequence, unknown_device, Driver, Step,
};
use crate::command::Dcs;
use crate::interface::{Data, DisplayError, DisplayInterface};

const ID_ILI9486: u16 = 0x9486;
const ID_ILI9488: u16 = 0x9488;

#[rustfmt::skip]
const INIT_ILI9486: &[Step] = &[
    Step::Cmd(0xf1, &[0x36, 0x04, 0x00, 0x3c, 0x0f, 0x8f]),
    Step::Cmd(0xf2, &[0x18, 0xa3, 0x12, 0x02, 0xb2, 0x12, 0xff, 0x10, 0x00]),
    Step::Cmd(0xf8, &[0x21, 0x04]),
    Step::Cmd(0xf9, &[0x00, 0x08]),
    Step::Cmd(0x36, &[0x08]),       // BGR
    Step::Cmd(0xb4, &[0x00]),       // column inversion
    Step::Cmd(0xc1, &[0x41]),       // power control 2
    Step::Cmd(0xc5, &[0x00, 0x91, 0x80, 0x00]), // VCOM
    Step::Cmd(0xe0, &[
        0x0f, 0x1f, 0x1c, 0x0c, 0x0f, 0x08, 0x48, 0x98,
        0x37, 0x0a, 0x13, 0x04, 0x11, 0x0d, 0x00,
    ]),
    Step::Cmd(0xe1, &[
        0x0f, 0x32, 0x2e, 0x0b, 0x0d, 0x05, 0x47, 0x75,
        0x37, 0x06, 0x10, 0x03, 0x24, 0x20, 0x00,
    ]),
];

#[rustfmt::skip]
const INIT_ILI9488: &[Step] = &[
    Step::Cmd(0xe0, &[
        0x00, 0x07, 0x0f, 0x0d, 0x1b, 0x0a, 0x3c, 0x78,
        0x4a, 0x07, 0x0e, 0x09, 0x1b, 0x1e, 0x0f,
    ]),
    Step::Cmd(0xe1, &[
        0x00, 0x22, 0x24, 0x06, 0x12, 0x07, 0x36, 0x47,
        0x47, 0x06, 0x0a, 0x07, 0x30, 0x37, 0x0f,
    ]),
    Step::Cmd(0xc0, &[0x10, 0x10]), // power control 1
    Step::Cmd(0xc1, &[0x41]),       // power control 2
    Step::Cmd(0xc5, &[0x00, 0x22, 0x80]), // VCOM
    Step::Cmd(0x36, &[0x48]),       // MX, BGR
    Step::Cmd(0xb0, &[0x00]),       // interface mode
    Step::Cmd(0xb1, &[0xb0, 0x11]), // 70Hz frame
    Step::Cmd(0xb4, &[0x02]),       // 2-dot inversion
    Step::Cmd(0xb6, &[0x02, 0x02, 0x3b]), // display function
    Step::Cmd(0xb7, &[0xc6]),       // entry mode
    Step::Cmd(0xf7, &[0xa9, 0x51, 0x2c, 0x82]), // adjust control 3
];

#[rustfmt::skip]
const DISPLAY_ON: &[Step] = &[
    Step::Cmd(0x11, &[]),
    Step::Delay(120),
    Step::Cmd(0x29, &[]),
];

/// RGB565 to the 6-bit-per-channel layout, left aligned.
fn rgb666(pixel: u16) -> [u8; 3] {
    [
        (pixel >> 8) as u8 & 0xf8,
        (pixel >> 3) as u8 & 0xfc,
        (pixel << 3) as u8 & 0xf8,
    ]
}

/// 320RGB x 480, 262K color
pub struct ILI948X;

impl Driver for ILI948X {
    const NAME: &'static str = "ILI948x";
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
        debug!("ILI948x id {:#x}", id);
        match id {
            ID_ILI9486 => {
                info!("ILI9486 table");
                run_sequence(di, delay, INIT_ILI9486)?;
            }
            ID_ILI9488 => {
                info!("ILI9488 table");
                run_sequence(di, delay, INIT_ILI9488)?;
            }
            _ => return Err(unknown_device(Self::NAME, id)),
        }
        let colmod = if di.kind().is_serial() { 0x66 } else { 0x55 };
        di.send_command_data(Dcs::SetPixelFormat.into(), &[colmod])?;
        run_sequence(di, delay, DISPLAY_ON)?;

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

    fn write_pixels<DI, I>(di: &mut DI, pixels: I) -> Result<usize, DisplayError>
    where
        DI: DisplayInterface,
        I: IntoIterator<Item = u16>,
    {
        if !di.kind().is_serial() {
            return di.send_pixels(pixels);
        }
        let mut buf = [0u8; 48];
        let mut len = 0;
        let mut n = 0;
        for pixel in pixels {
            buf[len..len + 3].copy_from_slice(&rgb666(pixel));
            len += 3;
            n += 1;
            if len == buf.len() {
                di.send_data(Data::U8(&buf))?;
                len = 0;
            }
        }
        if len > 0 {
            di.send_data(Data::U8(&buf[..len]))?;
        }
        Ok(n)
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
