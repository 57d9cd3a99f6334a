use core::iter;

use crate::command::Dcs;
use crate::interface::{Command, DisplayError, DisplayInterface, InterfaceKind};
use embedded_hal::delay::DelayNs;

pub use self::hx8347::*;
pub use self::hx8357d::*;
pub use self::ili9225::*;
pub use self::ili932x::*;
pub use self::ili9341::*;
pub use self::ili948x::*;
pub use self::nt35510::*;
pub use self::ssd1289::*;
pub use self::st7735::*;
pub use self::st7789::*;
pub use self::st7796::*;

mod hx8347;
mod hx8357d;
mod ili9225;
mod ili932x;
mod ili9341;
mod ili948x;
mod nt35510;
mod ssd1289;
mod st7735;
mod st7789;
mod st7796;

/// One entry of an initialization table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    /// Command followed by 8-bit parameters
    Cmd(u8, &'static [u8]),
    /// 16-bit register index and 16-bit value
    Reg(u16, u16),
    /// Wait, in milliseconds
    Delay(u32),
}

/// Replay an initialization table.
pub fn run_sequence<DI, DELAY>(
    di: &mut DI,
    delay: &mut DELAY,
    steps: &[Step],
) -> Result<(), DisplayError>
where
    DI: DisplayInterface,
    DELAY: DelayNs,
{
    for step in steps {
        match *step {
            Step::Cmd(cmd, params) => di.send_command_data(cmd, params)?,
            Step::Reg(index, value) => di.write_register(index, value)?,
            Step::Delay(ms) => delay.delay_ms(ms),
        }
    }
    Ok(())
}

pub trait Driver {
    const NAME: &'static str;
    /// Native width in pixels
    const WIDTH: u16;
    /// Native height in pixels
    const HEIGHT: u16;
    /// RGB565 word written by [`Driver::clear`]
    const BLACK: u16 = 0x0000;

    /// Hard reset with the controller's timing.
    fn reset<DI: DisplayInterface, DELAY: DelayNs>(di: &mut DI, delay: &mut DELAY) {
        di.reset(delay, 1_000, 10_000, 120_000);
    }

    /// Raw id as read from the controller.
    fn read_id<DI: DisplayInterface>(di: &mut DI) -> Result<u16, DisplayError>;

    /// Reset, probe and load the register table, then clear GRAM.
    fn init<DI: DisplayInterface, DELAY: DelayNs>(
        di: &mut DI,
        delay: &mut DELAY,
    ) -> Result<(), DisplayError>;

    /// Program the inclusive GRAM window (x0, y0)..=(x1, y1) and start a memory write.
    ///
    /// Column registers go out before row registers.
    fn write_window<DI: DisplayInterface>(
        di: &mut DI,
        x0: u16,
        y0: u16,
        x1: u16,
        y1: u16,
    ) -> Result<(), DisplayError>;

    /// Rectangle `width` x `height` at (`x`, `y`), must lie inside the panel.
    fn set_window<DI: DisplayInterface>(
        di: &mut DI,
        x: u16,
        width: u16,
        y: u16,
        height: u16,
    ) -> Result<(), DisplayError> {
        let (x1, y1) = window_end(x, width, y, height, Self::WIDTH, Self::HEIGHT)?;
        Self::write_window(di, x, y, x1, y1)
    }

    /// Stream RGB565 words into the current window.
    fn write_pixels<DI, I>(di: &mut DI, pixels: I) -> Result<usize, DisplayError>
    where
        DI: DisplayInterface,
        I: IntoIterator<Item = u16>,
    {
        di.send_pixels(pixels)
    }

    fn clear<DI: DisplayInterface>(di: &mut DI) -> Result<(), DisplayError> {
        Self::set_window(di, 0, Self::WIDTH, 0, Self::HEIGHT)?;
        let n = Self::WIDTH as usize * Self::HEIGHT as usize;
        Self::write_pixels(di, iter::repeat(Self::BLACK).take(n))?;
        Ok(())
    }

    fn sleep<DI: DisplayInterface, DELAY: DelayNs>(
        _di: &mut DI,
        _delay: &mut DELAY,
    ) -> Result<(), DisplayError> {
        Ok(())
    }

    fn wake_up<DI: DisplayInterface, DELAY: DelayNs>(
        di: &mut DI,
        delay: &mut DELAY,
    ) -> Result<(), DisplayError> {
        Self::init(di, delay)
    }
}

/// Inclusive end corner of a window, if it fits a `max_x` x `max_y` panel.
pub(crate) fn window_end(
    x: u16,
    width: u16,
    y: u16,
    height: u16,
    max_x: u16,
    max_y: u16,
) -> Result<(u16, u16), DisplayError> {
    let end = |start: u16, len: u16, max: u16| {
        len.checked_sub(1)
            .and_then(|l| start.checked_add(l))
            .filter(|&e| e < max)
    };
    match (end(x, width, max_x), end(y, height, max_y)) {
        (Some(x1), Some(y1)) => Ok((x1, y1)),
        _ => {
            warn!("window {},{} {}x{} out of bounds", x, y, width, height);
            Err(DisplayError::OutOfBounds)
        }
    }
}

pub(crate) fn unknown_device(name: &str, id: u16) -> DisplayError {
    error!("{}: unknown device id {:#x}", name, id);
    DisplayError::UnknownDevice(id)
}

/// Column/page window of the MIPI DCS command set.
pub(crate) fn dcs_window<DI: DisplayInterface>(
    di: &mut DI,
    x0: u16,
    y0: u16,
    x1: u16,
    y1: u16,
) -> Result<(), DisplayError> {
    let [xs_h, xs_l] = x0.to_be_bytes();
    let [xe_h, xe_l] = x1.to_be_bytes();
    di.send_command_data(Dcs::SetColumnAddress.into(), &[xs_h, xs_l, xe_h, xe_l])?;
    let [ys_h, ys_l] = y0.to_be_bytes();
    let [ye_h, ye_l] = y1.to_be_bytes();
    di.send_command_data(Dcs::SetPageAddress.into(), &[ys_h, ys_l, ye_h, ye_l])?;
    di.send_command(Command::U8(Dcs::WriteMemoryStart.into()))
}

pub(crate) fn dcs_sleep<DI: DisplayInterface, DELAY: DelayNs>(
    di: &mut DI,
    delay: &mut DELAY,
) -> Result<(), DisplayError> {
    di.send_command(Command::U8(Dcs::SetDisplayOff.into()))?;
    di.send_command(Command::U8(Dcs::EnterSleepMode.into()))?;
    delay.delay_ms(5);
    Ok(())
}

pub(crate) fn dcs_wake_up<DI: DisplayInterface, DELAY: DelayNs>(
    di: &mut DI,
    delay: &mut DELAY,
) -> Result<(), DisplayError> {
    di.send_command(Command::U8(Dcs::ExitSleepMode.into()))?;
    delay.delay_ms(120);
    di.send_command(Command::U8(Dcs::SetDisplayOn.into()))
}

/// `D3h` of the ILI93xx/ILI94xx/ST7796 family: the last two bytes are the id.
pub(crate) fn read_id4<DI: DisplayInterface>(di: &mut DI) -> Result<u16, DisplayError> {
    let mut buf = [0u16; 4];
    match di.kind() {
        // dummy clock handled by the interface, no dummy byte
        InterfaceKind::Spi3Wire => di.read(Command::U8(Dcs::ReadId4.into()), &mut buf[1..])?,
        _ => di.read(Command::U8(Dcs::ReadId4.into()), &mut buf)?,
    }
    Ok((buf[2] & 0xff) << 8 | (buf[3] & 0xff))
}

/// `04h` RDDID: manufacturer, version and module id bytes.
pub(crate) fn read_display_id<DI: DisplayInterface>(di: &mut DI) -> Result<[u8; 3], DisplayError> {
    let cmd = Command::U8(Dcs::ReadDisplayId.into());
    let mut buf = [0u16; 4];
    match di.kind() {
        InterfaceKind::Spi3Wire => {
            di.read(cmd, &mut buf[1..])?;
        }
        InterfaceKind::Spi4Wire => {
            // a single dummy clock precedes the 24 id bits, shift it out
            di.read(cmd, &mut buf)?;
            let raw = buf.iter().fold(0u32, |acc, &b| acc << 8 | (b & 0xff) as u32) << 1;
            let [id1, id2, id3, _] = raw.to_be_bytes();
            return Ok([id1, id2, id3]);
        }
        InterfaceKind::Parallel8 | InterfaceKind::Parallel16 => {
            di.read(cmd, &mut buf)?;
        }
    }
    Ok([buf[1] as u8, buf[2] as u8, buf[3] as u8])
}

/// Read one 16-bit index register, as two bytes on narrow buses.
pub(crate) fn read_register<DI: DisplayInterface>(
    di: &mut DI,
    index: u16,
) -> Result<u16, DisplayError> {
    match di.kind() {
        InterfaceKind::Parallel16 => {
            let mut buf = [0u16; 1];
            di.read(Command::U16(index), &mut buf)?;
            Ok(buf[0])
        }
        _ => {
            let mut buf = [0u16; 2];
            di.read(Command::U16(index), &mut buf)?;
            Ok((buf[0] & 0xff) << 8 | (buf[1] & 0xff))
        }
    }
}
