//! ILI9341 driver
//!
//! For:
//! - 2.4"/2.8"/3.2" 240x320 modules, SPI or 8080

use embedded_hal::delay::DelayNs;

use super::{dcs_sleep, dcs_wake_up, dcs_window, read_id4, run_sequence, unknown_device, Driver, Step};
use crate::command::Dcs;
use crate::interface::{Command, DisplayError, DisplayInterface, InterfaceKind};

const ID_ILI9341: u16 = 0x9341;

#[rustfmt::skip]
const INIT: &[Step] = &[
    Step::Cmd(0xef, &[0x03, 0x80, 0x02]),
    Step::Cmd(0xcf, &[0x00, 0xc1, 0x30]),             // power control B
    Step::Cmd(0xed, &[0x64, 0x03, 0x12, 0x81]),       // power on sequence
    Step::Cmd(0xe8, &[0x85, 0x00, 0x78]),             // driver timing A
    Step::Cmd(0xcb, &[0x39, 0x2c, 0x00, 0x34, 0x02]), // power control A
    Step::Cmd(0xf7, &[0x20]),                         // pump ratio
    Step::Cmd(0xea, &[0x00, 0x00]),                   // driver timing B
    Step::Cmd(0xc0, &[0x23]),                         // VRH
    Step::Cmd(0xc1, &[0x10]),                         // SAP, BT
    Step::Cmd(0xc5, &[0x3e, 0x28]),                   // VCOM 1
    Step::Cmd(0xc7, &[0x86]),                         // VCOM 2
    Step::Cmd(0x36, &[0x48]),                         // MX, BGR
    Step::Cmd(0x37, &[0x00]),                         // vertical scroll start
    Step::Cmd(0x3a, &[0x55]),                         // 16-bit/pixel
    Step::Cmd(0xb1, &[0x00, 0x18]),                   // 79Hz frame
    Step::Cmd(0xb6, &[0x08, 0x82, 0x27]),             // display function
    Step::Cmd(0xf2, &[0x00]),                         // 3 gamma off
    Step::Cmd(0x26, &[0x01]),                         // gamma curve 1
    Step::Cmd(0xe0, &[
        0x0f, 0x31, 0x2b, 0x0c, 0x0e, 0x08, 0x4e, 0xf1,
        0x37, 0x07, 0x10, 0x03, 0x0e, 0x09, 0x00,
    ]),
    Step::Cmd(0xe1, &[
        0x00, 0x0e, 0x14, 0x03, 0x11, 0x07, 0x31, 0xc1,
        0x48, 0x08, 0x0f, 0x0c, 0x31, 0x36, 0x0f,
    ]),
    Step::Cmd(0x11, &[]),
    Step::Delay(120),
    Step::Cmd(0x29, &[]),
];

/// 240RGB x 320, 262K color
pub struct ILI9341;

impl Driver for ILI9341 {
    const NAME: &'static str = "ILI9341";
    const WIDTH: u16 = 240;
    const HEIGHT: u16 = 320;

    /// The serial interface only answers `D3h` through the undocumented
    /// `D9h` index register, one id byte per read.
    fn read_id<DI: DisplayInterface>(di: &mut DI) -> Result<u16, DisplayError> {
        if di.kind() != InterfaceKind::Spi4Wire {
            return read_id4(di);
        }
        let mut id = [0u8; 4];
        for (i, byte) in id.iter_mut().enumerate().skip(1) {
            di.send_command_data(0xd9, &[0x10 + i as u8])?;
            let mut buf = [0u16; 1];
            di.read(Command::U8(Dcs::ReadId4.into()), &mut buf)?;
            *byte = buf[0] as u8;
        }
        Ok(u16::from_be_bytes([id[2], id[3]]))
    }

    fn init<DI: DisplayInterface, DELAY: DelayNs>(
        di: &mut DI,
        delay: &mut DELAY,
    ) -> Result<(), DisplayError> {
        Self::reset(di, delay);

        let id = Self::read_id(di)?;
        debug!("ILI9341 id {:#x}", id);
        if id != ID_ILI9341 {
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
