//! Recording display interface for driver tests.

use embedded_hal::delay::DelayNs;

use crate::interface::{Command, Data, DisplayError, DisplayInterface, InterfaceKind};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Op {
    Command(Command),
    Data8(Vec<u8>),
    Data16(Vec<u16>),
    Pixels(Vec<u16>),
    Read(Command, usize),
    Reset,
}

/// Logs every bus operation, answers reads from canned responses.
pub struct Recorder {
    kind: InterfaceKind,
    responses: Vec<(Command, Vec<u16>)>,
    pub ops: Vec<Op>,
}

impl Recorder {
    pub fn new(kind: InterfaceKind) -> Self {
        Recorder {
            kind,
            responses: Vec::new(),
            ops: Vec::new(),
        }
    }

    pub fn parallel8() -> Self {
        Self::new(InterfaceKind::Parallel8)
    }

    pub fn parallel16() -> Self {
        Self::new(InterfaceKind::Parallel16)
    }

    pub fn spi() -> Self {
        Self::new(InterfaceKind::Spi4Wire)
    }

    pub fn spi3wire() -> Self {
        Self::new(InterfaceKind::Spi3Wire)
    }

    /// Answer reads of `command` with `words`, zero padded.
    ///
    /// A later response for the same command wins; the same response can be
    /// read any number of times.
    pub fn respond(mut self, command: Command, words: &[u16]) -> Self {
        self.responses.insert(0, (command, words.to_vec()));
        self
    }

    /// Commands issued so far, in order.
    pub fn commands(&self) -> Vec<Command> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Op::Command(cmd) => Some(*cmd),
                _ => None,
            })
            .collect()
    }

    /// Total of pixel words streamed so far.
    pub fn pixel_count(&self) -> usize {
        self.ops
            .iter()
            .map(|op| match op {
                Op::Pixels(p) => p.len(),
                _ => 0,
            })
            .sum()
    }

    /// Ops after the last command equal to `cmd`.
    pub fn after_last(&self, cmd: Command) -> &[Op] {
        let pos = self
            .ops
            .iter()
            .rposition(|op| *op == Op::Command(cmd))
            .expect("command was never sent");
        &self.ops[pos..]
    }
}

impl DisplayInterface for Recorder {
    fn kind(&self) -> InterfaceKind {
        self.kind
    }

    fn send_command(&mut self, command: Command) -> Result<(), DisplayError> {
        self.ops.push(Op::Command(command));
        Ok(())
    }

    fn send_data(&mut self, data: Data<'_>) -> Result<(), DisplayError> {
        self.ops.push(match data {
            Data::U8(bytes) => Op::Data8(bytes.to_vec()),
            Data::U16(words) => Op::Data16(words.to_vec()),
        });
        Ok(())
    }

    fn send_pixels<I>(&mut self, pixels: I) -> Result<usize, DisplayError>
    where
        I: IntoIterator<Item = u16>,
    {
        let pixels: Vec<u16> = pixels.into_iter().collect();
        let n = pixels.len();
        self.ops.push(Op::Pixels(pixels));
        Ok(n)
    }

    fn read(&mut self, command: Command, buf: &mut [u16]) -> Result<(), DisplayError> {
        self.ops.push(Op::Read(command, buf.len()));
        buf.fill(0);
        if let Some((_, words)) = self.responses.iter().find(|(c, _)| *c == command) {
            for (dst, src) in buf.iter_mut().zip(words) {
                *dst = *src;
            }
        }
        Ok(())
    }

    fn reset<D>(&mut self, _delay: &mut D, _initial_delay: u32, _duration: u32, _settle: u32)
    where
        D: DelayNs,
    {
        self.ops.push(Op::Reset);
    }
}
