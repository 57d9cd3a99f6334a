//! NT35510 driver
//!
//! For:
//! - 4.0"/4.3" 480x800 modules on the 16-bit 8080 bus
//!
//! Every DCS command takes a 16-bit address, `<cmd> << 8 | parameter index`,
//! and each parameter is its own register write.

use embedded_hal::delay::DelayNs;

use super::{run_sequence, unknown_device, Driver, Step};
use crate::interface::{Command, DisplayError, DisplayInterface};

/// RDID2 << 8 | RDID3 as shipped, no id is burnt into RDID1
const ID_NT35510: u16 = 0x8000;

#[rustfmt::skip]
const INIT: &[Step] = &[
    // manufacture command set, page 1
    Step::Reg(0xf000, 0x55),
    Step::Reg(0xf001, 0xaa),
    Step::Reg(0xf002, 0x52),
    Step::Reg(0xf003, 0x08),
    Step::Reg(0xf004, 0x01),
    // AVDD 5.2V
    Step::Reg(0xb000, 0x0d),
    Step::Reg(0xb001, 0x0d),
    Step::Reg(0xb002, 0x0d),
    Step::Reg(0xb600, 0x34),
    Step::Reg(0xb601, 0x34),
    Step::Reg(0xb602, 0x34),
    // AVEE -5.2V
    Step::Reg(0xb100, 0x0d),
    Step::Reg(0xb101, 0x0d),
    Step::Reg(0xb102, 0x0d),
    Step::Reg(0xb700, 0x34),
    Step::Reg(0xb701, 0x34),
    Step::Reg(0xb702, 0x34),
    // VCL -2.5V
    Step::Reg(0xb200, 0x00),
    Step::Reg(0xb201, 0x00),
    Step::Reg(0xb202, 0x00),
    Step::Reg(0xb800, 0x24),
    Step::Reg(0xb801, 0x24),
    Step::Reg(0xb802, 0x24),
    // VGH 15V
    Step::Reg(0xbf00, 0x01),
    Step::Reg(0xb300, 0x0f),
    Step::Reg(0xb301, 0x0f),
    Step::Reg(0xb302, 0x0f),
    Step::Reg(0xb900, 0x34),
    Step::Reg(0xb901, 0x34),
    Step::Reg(0xb902, 0x34),
    // VGL -10V
    Step::Reg(0xb500, 0x08),
    Step::Reg(0xb501, 0x08),
    Step::Reg(0xb502, 0x08),
    Step::Reg(0xc200, 0x03),
    Step::Reg(0xba00, 0x24),
    Step::Reg(0xba01, 0x24),
    Step::Reg(0xba02, 0x24),
    // VGMP / VGSP 4.5V
    Step::Reg(0xbc00, 0x00),
    Step::Reg(0xbc01, 0x78),
    Step::Reg(0xbc02, 0x00),
    // VGMN / VGSN -4.5V
    Step::Reg(0xbd00, 0x00),
    Step::Reg(0xbd01, 0x78),
    Step::Reg(0xbd02, 0x00),
    // VCOM
    Step::Reg(0xbe00, 0x00),
    Step::Reg(0xbe01, 0x64),
    // manufacture command set, page 0
    Step::Reg(0xf000, 0x55),
    Step::Reg(0xf001, 0xaa),
    Step::Reg(0xf002, 0x52),
    Step::Reg(0xf003, 0x08),
    Step::Reg(0xf004, 0x00),
    Step::Reg(0xb100, 0xcc),        // RAM keep
    Step::Reg(0xb101, 0x00),
    Step::Reg(0xb600, 0x05),        // source hold time
    Step::Reg(0xb700, 0x70),        // gate EQ
    Step::Reg(0xb701, 0x70),
    Step::Reg(0xb800, 0x01),        // source EQ
    Step::Reg(0xb801, 0x03),
    Step::Reg(0xb802, 0x03),
    Step::Reg(0xb803, 0x03),
    Step::Reg(0xbc00, 0x02),        // column inversion
    Step::Reg(0xbc01, 0x00),
    Step::Reg(0xbc02, 0x00),
    Step::Reg(0xc900, 0xd0),        // timing control
    Step::Reg(0xc901, 0x02),
    Step::Reg(0xc902, 0x50),
    Step::Reg(0xc903, 0x50),
    Step::Reg(0xc904, 0x50),
    Step::Reg(0x3500, 0x00),        // tearing effect on
    Step::Reg(0x3a00, 0x55),        // 16-bit/pixel
];

/// 480RGB x 864 GRAM, 480x800 panel
pub struct NT35510;

impl NT35510 {
    fn command<DI: DisplayInterface>(di: &mut DI, addr: u16) -> Result<(), DisplayError> {
        di.send_command(Command::U16(addr))
    }
}

impl Driver for NT35510 {
    const NAME: &'static str = "NT35510";
    const WIDTH: u16 = 480;
    const HEIGHT: u16 = 800;

    fn reset<DI: DisplayInterface, DELAY: DelayNs>(di: &mut DI, delay: &mut DELAY) {
        di.reset(delay, 1_000, 10_000, 50_000);
    }

    /// RDID2 and RDID3, RDID1 is read for the bus turnaround only
    fn read_id<DI: DisplayInterface>(di: &mut DI) -> Result<u16, DisplayError> {
        let mut id = [0u16; 3];
        for (addr, word) in [0xda00, 0xdb00, 0xdc00].into_iter().zip(id.iter_mut()) {
            let mut buf = [0u16; 1];
            di.read(Command::U16(addr), &mut buf)?;
            *word = buf[0] & 0xff;
        }
        Ok(id[1] << 8 | id[2])
    }

    fn init<DI: DisplayInterface, DELAY: DelayNs>(
        di: &mut DI,
        delay: &mut DELAY,
    ) -> Result<(), DisplayError> {
        Self::reset(di, delay);

        let id = Self::read_id(di)?;
        debug!("NT35510 id {:#x}", id);
        if id != ID_NT35510 {
            return Err(unknown_device(Self::NAME, id));
        }
        run_sequence(di, delay, INIT)?;
        Self::wake_up(di, delay)?;

        Self::clear(di)
    }

    fn write_window<DI: DisplayInterface>(
        di: &mut DI,
        x0: u16,
        y0: u16,
        x1: u16,
        y1: u16,
    ) -> Result<(), DisplayError> {
        for (base, start, end) in [(0x2a00, x0, x1), (0x2b00, y0, y1)] {
            di.write_register(base, start >> 8)?;
            di.write_register(base + 1, start & 0xff)?;
            di.write_register(base + 2, end >> 8)?;
            di.write_register(base + 3, end & 0xff)?;
        }
        Self::command(di, 0x2c00)
    }

    fn sleep<DI: DisplayInterface, DELAY: DelayNs>(
        di: &mut DI,
        delay: &mut DELAY,
    ) -> Result<(), DisplayError> {
        Self::command(di, 0x2800)?;
        Self::command(di, 0x1000)?;
        delay.delay_ms(5);
        Ok(())
    }

    fn wake_up<DI: DisplayInterface, DELAY: DelayNs>(
        di: &mut DI,
        delay: &mut DELAY,
    ) -> Result<(), DisplayError> {
        Self::command(di, 0x1100)?;
        delay.delay_ms(120);
        Self::command(di, 0x2900)
    }
}
