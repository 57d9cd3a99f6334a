//! HX8347-D / HX8347-G driver
//!
//! 8-bit register indexes with one parameter byte each.

use embedded_hal::delay::DelayNs;

use super::{run_sequence, unknown_device, Driver, Step};
use crate::interface::{Command, DisplayError, DisplayInterface};

const ID_HX8347D: u16 = 0x47;
const ID_HX8347G: u16 = 0x75;

#[rustfmt::skip]
const INIT_HX8347D: &[Step] = &[
    // driving ability
    Step::Cmd(0xea, &[0x00]),
    Step::Cmd(0xeb, &[0x20]),
    Step::Cmd(0xec, &[0x0c]),
    Step::Cmd(0xed, &[0xc4]),
    Step::Cmd(0xe8, &[0x40]),
    Step::Cmd(0xe9, &[0x38]),
    Step::Cmd(0xf1, &[0x01]),
    Step::Cmd(0xf2, &[0x10]),
    Step::Cmd(0x27, &[0xa3]),
    // gamma
    Step::Cmd(0x40, &[0x01]),
    Step::Cmd(0x41, &[0x00]),
    Step::Cmd(0x42, &[0x00]),
    Step::Cmd(0x43, &[0x10]),
    Step::Cmd(0x44, &[0x0e]),
    Step::Cmd(0x45, &[0x24]),
    Step::Cmd(0x46, &[0x04]),
    Step::Cmd(0x47, &[0x50]),
    Step::Cmd(0x48, &[0x02]),
    Step::Cmd(0x49, &[0x13]),
    Step::Cmd(0x4a, &[0x19]),
    Step::Cmd(0x4b, &[0x19]),
    Step::Cmd(0x4c, &[0x16]),
    Step::Cmd(0x50, &[0x1b]),
    Step::Cmd(0x51, &[0x31]),
    Step::Cmd(0x52, &[0x2f]),
    Step::Cmd(0x53, &[0x3f]),
    Step::Cmd(0x54, &[0x3f]),
    Step::Cmd(0x55, &[0x3e]),
    Step::Cmd(0x56, &[0x2f]),
    Step::Cmd(0x57, &[0x7b]),
    Step::Cmd(0x58, &[0x09]),
    Step::Cmd(0x59, &[0x06]),
    Step::Cmd(0x5a, &[0x06]),
    Step::Cmd(0x5b, &[0x0c]),
    Step::Cmd(0x5c, &[0x1d]),
    Step::Cmd(0x5d, &[0xcc]),
    // power voltage
    Step::Cmd(0x1b, &[0x1b]), // VRH
    Step::Cmd(0x1a, &[0x01]), // BT
    Step::Cmd(0x24, &[0x2f]), // VMH
    Step::Cmd(0x25, &[0x57]), // VML
    Step::Cmd(0x23, &[0x88]), // VCOM offset
    // power on
    Step::Cmd(0x18, &[0x36]), // I/P_RADJ, N/P_RADJ
    Step::Cmd(0x19, &[0x01]), // OSC_EN
    Step::Cmd(0x01, &[0x00]), // DP_STB = 0, out of deep sleep
    Step::Cmd(0x1f, &[0x88]), // GAS = 1, VOMG = 0, PON = 0, DK = 1
    Step::Delay(5),
    Step::Cmd(0x1f, &[0x80]), // DK = 0
    Step::Delay(5),
    Step::Cmd(0x1f, &[0x90]), // PON = 1
    Step::Delay(5),
    Step::Cmd(0x1f, &[0xd0]), // VOMG = 1
    Step::Delay(5),
    Step::Cmd(0x17, &[0x05]), // 16-bit/pixel
    Step::Cmd(0x36, &[0x00]), // panel characteristic
    // display on
    Step::Cmd(0x28, &[0x38]), // GON = 1, DTE = 1, D = 10
    Step::Delay(40),
    Step::Cmd(0x28, &[0x3c]), // D = 11
    // GRAM area
    Step::Cmd(0x02, &[0x00]),
    Step::Cmd(0x03, &[0x00]),
    Step::Cmd(0x04, &[0x00]),
    Step::Cmd(0x05, &[0xef]),
    Step::Cmd(0x06, &[0x00]),
    Step::Cmd(0x07, &[0x00]),
    Step::Cmd(0x08, &[0x01]),
    Step::Cmd(0x09, &[0x3f]),
];

#[rustfmt::skip]
const INIT_HX8347G: &[Step] = &[
    Step::Cmd(0x2e, &[0x89]),
    Step::Cmd(0x29, &[0x8f]),
    Step::Cmd(0x2b, &[0x02]),
    Step::Cmd(0xe2, &[0x00]),
    Step::Cmd(0xe4, &[0x01]),
    Step::Cmd(0xe5, &[0x10]),
    Step::Cmd(0xe6, &[0x01]),
    Step::Cmd(0xe7, &[0x10]),
    Step::Cmd(0xe8, &[0x70]),
    Step::Cmd(0xf2, &[0x00]),
    Step::Cmd(0xea, &[0x00]),
    Step::Cmd(0xeb, &[0x20]),
    Step::Cmd(0xec, &[0x3c]),
    Step::Cmd(0xed, &[0xc8]),
    Step::Cmd(0xe9, &[0x38]),
    Step::Cmd(0xf1, &[0x01]),
    // gamma
    Step::Cmd(0x40, &[0x00]),
    Step::Cmd(0x41, &[0x00]),
    Step::Cmd(0x42, &[0x00]),
    Step::Cmd(0x43, &[0x15]),
    Step::Cmd(0x44, &[0x13]),
    Step::Cmd(0x45, &[0x3f]),
    Step::Cmd(0x47, &[0x00]),
    Step::Cmd(0x48, &[0x00]),
    Step::Cmd(0x49, &[0x12]),
    Step::Cmd(0x4a, &[0x19]),
    Step::Cmd(0x4b, &[0x19]),
    Step::Cmd(0x4c, &[0x16]),
    Step::Cmd(0x50, &[0x00]),
    Step::Cmd(0x51, &[0x2c]),
    Step::Cmd(0x52, &[0x2a]),
    Step::Cmd(0x53, &[0x3f]),
    Step::Cmd(0x54, &[0x3f]),
    Step::Cmd(0x55, &[0x3f]),
    Step::Cmd(0x56, &[0x2f]),
    Step::Cmd(0x57, &[0x7b]),
    Step::Cmd(0x58, &[0x09]),
    Step::Cmd(0x59, &[0x06]),
    Step::Cmd(0x5a, &[0x06]),
    Step::Cmd(0x5b, &[0x0c]),
    Step::Cmd(0x5c, &[0x1d]),
    Step::Cmd(0x5d, &[0xcc]),
    // power
    Step::Cmd(0x1b, &[0x1b]),
    Step::Cmd(0x1a, &[0x01]),
    Step::Cmd(0x24, &[0x2f]),
    Step::Cmd(0x25, &[0x57]),
    Step::Cmd(0x23, &[0x86]),
    Step::Cmd(0x18, &[0x36]), // 70Hz frame
    Step::Cmd(0x19, &[0x01]), // oscillator
    Step::Cmd(0x01, &[0x00]),
    Step::Cmd(0x1f, &[0x88]),
    Step::Delay(5),
    Step::Cmd(0x1f, &[0x80]),
    Step::Delay(5),
    Step::Cmd(0x1f, &[0x90]),
    Step::Delay(5),
    Step::Cmd(0x1f, &[0xd4]),
    Step::Delay(5),
    Step::Cmd(0x17, &[0x05]), // 16-bit/pixel
    Step::Cmd(0x36, &[0x09]), // SS, BGR
    Step::Cmd(0x28, &[0x38]),
    Step::Delay(40),
    Step::Cmd(0x28, &[0x3c]),
    Step::Cmd(0x02, &[0x00]),
    Step::Cmd(0x03, &[0x00]),
    Step::Cmd(0x04, &[0x00]),
    Step::Cmd(0x05, &[0xef]),
    Step::Cmd(0x06, &[0x00]),
    Step::Cmd(0x07, &[0x00]),
    Step::Cmd(0x08, &[0x01]),
    Step::Cmd(0x09, &[0x3f]),
];

#[rustfmt::skip]
const SLEEP: &[Step] = &[
    Step::Cmd(0x28, &[0x38]), // D = 10
    Step::Delay(40),
    Step::Cmd(0x28, &[0x04]), // GON = 0, DTE = 0, D = 01
    Step::Cmd(0x1f, &[0x89]), // VOMG = 0, PON = 0, STB = 1
    Step::Delay(5),
];

/// Power-on ramp from standby, then gate and display on.
#[rustfmt::skip]
const WAKE_UP_HX8347D: &[Step] = &[
    Step::Cmd(0x1f, &[0x88]), // STB = 0
    Step::Delay(5),
    Step::Cmd(0x1f, &[0x80]),
    Step::Delay(5),
    Step::Cmd(0x1f, &[0x90]), // PON = 1
    Step::Delay(5),
    Step::Cmd(0x1f, &[0xd0]), // VCOMG = 1
    Step::Delay(5),
    Step::Cmd(0x28, &[0x38]), // GON = 1, DTE = 1, D = 10
    Step::Delay(40),
    Step::Cmd(0x28, &[0x3c]), // D = 11
];

#[rustfmt::skip]
const WAKE_UP_HX8347G: &[Step] = &[
    Step::Cmd(0x1f, &[0x88]),
    Step::Delay(5),
    Step::Cmd(0x1f, &[0x80]),
    Step::Delay(5),
    Step::Cmd(0x1f, &[0x90]),
    Step::Delay(5),
    Step::Cmd(0x1f, &[0xd4]),
    Step::Delay(5),
    Step::Cmd(0x28, &[0x38]),
    Step::Delay(40),
    Step::Cmd(0x28, &[0x3c]),
];

/// 240RGB x 320, 262K color, D and G revisions
pub struct HX8347;

impl Driver for HX8347 {
    const NAME: &'static str = "HX8347";
    const WIDTH: u16 = 240;
    const HEIGHT: u16 = 320;

    fn reset<DI: DisplayInterface, DELAY: DelayNs>(di: &mut DI, delay: &mut DELAY) {
        di.reset(delay, 1_000, 10_000, 50_000);
    }

    /// Himax id register, R00h
    fn read_id<DI: DisplayInterface>(di: &mut DI) -> Result<u16, DisplayError> {
        let mut buf = [0u16; 1];
        di.read(Command::U8(0x00), &mut buf)?;
        Ok(buf[0] & 0xff)
    }

    fn init<DI: DisplayInterface, DELAY: DelayNs>(
        di: &mut DI,
        delay: &mut DELAY,
    ) -> Result<(), DisplayError> {
        Self::reset(di, delay);

        let id = Self::read_id(di)?;
        debug!("HX8347 id {:#x}", id);
        match id {
            ID_HX8347D => {
                info!("HX8347-D table");
                run_sequence(di, delay, INIT_HX8347D)?;
            }
            ID_HX8347G => {
                info!("HX8347-G table");
                run_sequence(di, delay, INIT_HX8347G)?;
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
        // column start/end, then row start/end, high byte first
        let regs = [(0x02, x0), (0x04, x1), (0x06, y0), (0x08, y1)];
        for (reg, value) in regs {
            let [hi, lo] = value.to_be_bytes();
            di.send_command_data(reg, &[hi])?;
            di.send_command_data(reg + 1, &[lo])?;
        }
        di.send_command(Command::U8(0x22))
    }

    fn sleep<DI: DisplayInterface, DELAY: DelayNs>(
        di: &mut DI,
        delay: &mut DELAY,
    ) -> Result<(), DisplayError> {
        run_sequence(di, delay, SLEEP)
    }

    /// The last R1Fh step differs per revision, so R00h is read again.
    fn wake_up<DI: DisplayInterface, DELAY: DelayNs>(
        di: &mut DI,
        delay: &mut DELAY,
    ) -> Result<(), DisplayError> {
        let steps = match Self::read_id(di)? {
            ID_HX8347D => WAKE_UP_HX8347D,
            ID_HX8347G => WAKE_UP_HX8347G,
            id => return Err(unknown_device(Self::NAME, id)),
        };
        run_sequence(di, delay, steps)
    }
}
