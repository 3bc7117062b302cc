use crate::{Command, Error, IoWire, OpCode};
use core::fmt::Debug;
use embedded_hal::delay::DelayNs;
use log::trace;

// Reset and presence detection slot.
pub const RESET_LOW_US: u32 = 480;
pub const PRESENCE_WAIT_US: u32 = 70;
pub const PRESENCE_RELEASE_US: u32 = 410;

// Write slots for logic 1 and logic 0.
pub const WRITE_1_LOW_US: u32 = 6;
pub const WRITE_1_HIGH_US: u32 = 64;
pub const WRITE_0_LOW_US: u32 = 60;
pub const WRITE_0_HIGH_US: u32 = 10;

// Read slot: init pulse, sample point, recovery.
pub const READ_INIT_LOW_US: u32 = 6;
pub const READ_SAMPLE_US: u32 = 9;
pub const READ_RECOVERY_US: u32 = 55;

/// Bit-banged bus master.
///
/// Every operation leaves the line released when it returns. The timing
/// windows must not be stretched by interrupts: run with interrupts disabled
/// or unused while a sequence is on the wire.
pub struct Driver<W: IoWire> {
    io_wire: W,
}

impl<E: Debug, W: IoWire<Error = E>> Driver<W> {
    pub fn new(io_wire: W) -> Self {
        Driver { io_wire }
    }

    /// Gives the line back
    pub fn into_inner(self) -> W {
        self.io_wire
    }

    pub fn reset_skip_write_read(
        &mut self,
        delay: &mut impl DelayNs,
        write: &[u8],
        read: &mut [u8],
    ) -> Result<(), Error<E>> {
        self.ensure_presence(delay)?;
        self.skip(delay)?;
        self.write_bytes(delay, write)?;
        self.read_bytes(delay, read)?;
        Ok(())
    }

    pub fn reset_skip_write_only(
        &mut self,
        delay: &mut impl DelayNs,
        write: &[u8],
    ) -> Result<(), Error<E>> {
        self.ensure_presence(delay)?;
        self.skip(delay)?;
        self.write_bytes(delay, write)?;
        Ok(())
    }

    /// Broadcasts to every device on the bus
    pub fn skip(&mut self, delay: &mut impl DelayNs) -> Result<(), E> {
        self.write_command(delay, Command::SkipRom)
    }

    /// Performs a reset and listens for a presence pulse
    ///
    /// Returns Ok(true) if a device pulled the line low after the reset
    /// pulse. Always takes the whole 480 + 70 + 410 µs slot, whether a device
    /// answered or not.
    pub fn reset(&mut self, delay: &mut impl DelayNs) -> Result<bool, E> {
        self.io_wire.drive_low()?;
        delay.delay_us(RESET_LOW_US);

        self.io_wire.release()?;
        delay.delay_us(PRESENCE_WAIT_US);

        let presence = self.io_wire.is_low()?;
        delay.delay_us(PRESENCE_RELEASE_US);

        trace!("bus reset, presence: {}", presence);
        Ok(presence)
    }

    /// Same as [`Driver::reset`] but reports a missing device as
    /// [`Error::NoPresence`]
    pub fn ensure_presence(&mut self, delay: &mut impl DelayNs) -> Result<(), Error<E>> {
        if self.reset(delay)? {
            Ok(())
        } else {
            Err(Error::NoPresence)
        }
    }

    pub fn read_bytes(&mut self, delay: &mut impl DelayNs, dst: &mut [u8]) -> Result<(), E> {
        for d in dst {
            *d = self.read_byte(delay)?;
        }
        Ok(())
    }

    /// Reads 8 slots, least significant bit first
    pub fn read_byte(&mut self, delay: &mut impl DelayNs) -> Result<u8, E> {
        let mut byte = 0_u8;
        for _ in 0..8 {
            byte >>= 1;
            if self.read_bit(delay)? {
                byte |= 0x80;
            }
        }
        Ok(byte)
    }

    pub fn read_bit(&mut self, delay: &mut impl DelayNs) -> Result<bool, E> {
        self.io_wire.drive_low()?;
        delay.delay_us(READ_INIT_LOW_US);
        self.io_wire.release()?;
        delay.delay_us(READ_SAMPLE_US);
        let val = self.io_wire.is_high()?;
        delay.delay_us(READ_RECOVERY_US);
        Ok(val)
    }

    pub fn write_command(&mut self, delay: &mut impl DelayNs, cmd: impl OpCode) -> Result<(), E> {
        self.write_byte(delay, cmd.op_code())
    }

    pub fn write_bytes(&mut self, delay: &mut impl DelayNs, bytes: &[u8]) -> Result<(), E> {
        for b in bytes {
            self.write_byte(delay, *b)?;
        }
        Ok(())
    }

    /// Writes 8 slots, least significant bit first
    pub fn write_byte(&mut self, delay: &mut impl DelayNs, byte: u8) -> Result<(), E> {
        let mut byte = byte;
        for _ in 0..8 {
            self.write_bit(delay, (byte & 0x01) == 0x01)?;
            byte >>= 1;
        }
        Ok(())
    }

    pub fn write_bit(&mut self, delay: &mut impl DelayNs, high: bool) -> Result<(), E> {
        let (low_us, high_us) = if high {
            (WRITE_1_LOW_US, WRITE_1_HIGH_US)
        } else {
            (WRITE_0_LOW_US, WRITE_0_HIGH_US)
        };
        self.io_wire.drive_low()?;
        delay.delay_us(low_us);
        self.io_wire.release()?;
        delay.delay_us(high_us);
        Ok(())
    }
}
