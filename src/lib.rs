#![cfg_attr(not(test), no_std)]

#[macro_use]
mod fmt;

pub mod command;
pub mod drivers;
pub mod interface;

#[cfg(test)]
mod testing;

use core::{iter, marker::PhantomData};

use drivers::Driver;
use embedded_graphics::{
    pixelcolor::{raw::RawU16, Rgb565},
    prelude::*,
    primitives::Rectangle,
};
use embedded_hal::delay::DelayNs;
use interface::{Command, Data, DisplayError, DisplayInterface};

pub use interface::{
    GpioBus16, GpioBus8, InterfaceKind, ParallelInterface, Spi3WireInterface, SpiInterface,
};

/// A TFT controller `D` behind the bus `DI`.
pub struct Display<DI: DisplayInterface, D: Driver> {
    interface: DI,
    _phantom: PhantomData<D>,
}

impl<DI: DisplayInterface, D: Driver> Display<DI, D> {
    pub fn new(interface: DI) -> Self {
        Self {
            interface,
            _phantom: PhantomData,
        }
    }

    /// Reset, probe, load the register table and blank the panel.
    pub fn init<DELAY: DelayNs>(&mut self, delay: &mut DELAY) -> Result<(), DisplayError> {
        D::init(&mut self.interface, delay)
    }

    pub fn clear(&mut self) -> Result<(), DisplayError> {
        D::clear(&mut self.interface)
    }

    /// Open a `width` x `height` GRAM window at (`x`, `y`) for the next writes.
    pub fn set_window(&mut self, x: u16, width: u16, y: u16, height: u16) -> Result<(), DisplayError> {
        D::set_window(&mut self.interface, x, width, y, height)
    }

    pub fn write_command(&mut self, command: Command) -> Result<(), DisplayError> {
        self.interface.send_command(command)
    }

    pub fn write_data(&mut self, data: Data<'_>) -> Result<(), DisplayError> {
        self.interface.send_data(data)
    }

    /// Write RGB565 words into the open window.
    pub fn write_block(&mut self, block: &[u16]) -> Result<(), DisplayError> {
        D::write_pixels(&mut self.interface, block.iter().copied())?;
        Ok(())
    }

    pub fn write_pixels<I>(&mut self, pixels: I) -> Result<usize, DisplayError>
    where
        I: IntoIterator<Item = u16>,
    {
        D::write_pixels(&mut self.interface, pixels)
    }

    pub fn read_id(&mut self) -> Result<u16, DisplayError> {
        D::read_id(&mut self.interface)
    }

    pub fn sleep<DELAY: DelayNs>(&mut self, delay: &mut DELAY) -> Result<(), DisplayError> {
        D::sleep(&mut self.interface, delay)
    }

    pub fn wake_up<DELAY: DelayNs>(&mut self, delay: &mut DELAY) -> Result<(), DisplayError> {
        D::wake_up(&mut self.interface, delay)
    }

    pub fn release(self) -> DI {
        self.interface
    }

    /// Part of `area` on the panel, as (x, width, y, height).
    fn clip(&self, area: &Rectangle) -> Option<(u16, u16, u16, u16)> {
        let drawable = area.intersection(&self.bounding_box());
        if drawable.is_zero_sized() {
            return None;
        }
        Some((
            drawable.top_left.x as u16,
            drawable.size.width as u16,
            drawable.top_left.y as u16,
            drawable.size.height as u16,
        ))
    }
}

impl<DI: DisplayInterface, D: Driver> OriginDimensions for Display<DI, D> {
    fn size(&self) -> Size {
        Size::new(D::WIDTH as u32, D::HEIGHT as u32)
    }
}

impl<DI: DisplayInterface, D: Driver> DrawTarget for Display<DI, D> {
    type Color = Rgb565;
    type Error = DisplayError;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let bb = self.bounding_box();
        for Pixel(point, color) in pixels {
            if !bb.contains(point) {
                continue;
            }
            D::set_window(&mut self.interface, point.x as u16, 1, point.y as u16, 1)?;
            D::write_pixels(&mut self.interface, iter::once(RawU16::from(color).into_inner()))?;
        }
        Ok(())
    }

    fn fill_contiguous<I>(&mut self, area: &Rectangle, colors: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Self::Color>,
    {
        let Some((x, width, y, height)) = self.clip(area) else {
            return Ok(());
        };
        let drawable = Rectangle::new(
            Point::new(x as i32, y as i32),
            Size::new(width as u32, height as u32),
        );
        D::set_window(&mut self.interface, x, width, y, height)?;
        D::write_pixels(
            &mut self.interface,
            area.points()
                .zip(colors)
                .filter(|(pos, _)| drawable.contains(*pos))
                .map(|(_, color)| RawU16::from(color).into_inner()),
        )?;
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let Some((x, width, y, height)) = self.clip(area) else {
            return Ok(());
        };
        let raw = RawU16::from(color).into_inner();
        D::set_window(&mut self.interface, x, width, y, height)?;
        D::write_pixels(
            &mut self.interface,
            iter::repeat(raw).take(width as usize * height as usize),
        )?;
        Ok(())
    }
}
