pub trait OpCode {
    fn op_code(&self) -> u8;
}

/// ROM commands understood by every device on the bus.
///
/// Only the broadcast variant is used: with a single sensor wired there is
/// nothing to address. More than one device on the same line is not
/// supported.
#[derive(Clone, Copy, Debug)]
#[repr(u8)]
pub enum Command {
    SkipRom = 0xCC,
}

impl OpCode for Command {
    fn op_code(&self) -> u8 {
        *self as _
    }
}
