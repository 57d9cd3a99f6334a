//! Command Table
//!
//! MIPI DCS user commands shared by the ILI93xx/ILI94xx, ST77xx and HX8357
//! controllers. Vendor extended commands stay as literals in each driver.

#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dcs {
    Nop = 0x00,
    SoftReset = 0x01,
    /// Read display identification
    ///
    /// <<dummy:u8, ID1:u8, ID2:u8, ID3:u8>>
    ReadDisplayId = 0x04,
    ReadPowerMode = 0x0a,
    /// Stop the oscillator and DC/DC, GRAM is kept.
    EnterSleepMode = 0x10,
    /// Wait 120ms before the next Sleep In, 5ms before any other command.
    ExitSleepMode = 0x11,
    EnterNormalMode = 0x13,
    ExitInvertMode = 0x20,
    EnterInvertMode = 0x21,
    SetDisplayOff = 0x28,
    SetDisplayOn = 0x29,
    /// Column window
    ///
    /// <<SC:u16, EC:u16>>, big endian, inclusive
    SetColumnAddress = 0x2a,
    /// Page (row) window
    ///
    /// <<SP:u16, EP:u16>>, big endian, inclusive
    SetPageAddress = 0x2b,
    /// Following data go to GRAM, starting at (SC, SP)
    WriteMemoryStart = 0x2c,
    SetTearOn = 0x35,
    /// MADCTL
    ///
    /// <<MY:b1, MX:b1, MV:b1, ML:b1, BGR:b1, MH:b1, 0:b2>>
    SetAddressMode = 0x36,
    /// COLMOD
    ///
    /// - 0x55: 16 bit/pixel
    /// - 0x66: 18 bit/pixel
    SetPixelFormat = 0x3a,
    /// Vendor ID register of the ILI93xx/ILI94xx/ST7796 family
    ///
    /// <<dummy:u8, 0x00, ID_H:u8, ID_L:u8>>
    ReadId4 = 0xd3,
}

impl From<Dcs> for u8 {
    fn from(cmd: Dcs) -> u8 {
        cmd as u8
    }
}
