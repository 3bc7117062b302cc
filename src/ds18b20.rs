//! DS18B20 digital thermometer, driven in single-sensor mode.
//!
//! Every exchange is broadcast with `Skip ROM`, so exactly one sensor may be
//! wired to the bus. With several devices present the answers collide and
//! the result is undefined.

use embedded_hal::delay::DelayNs;
use log::debug;

use crate::{check_crc8, Driver, Error, IoWire, OpCode, Sensor, Temperature};

#[derive(Clone, Copy, Debug)]
#[repr(u8)]
pub enum Command {
    Convert = 0x44,
    ReadScratchpad = 0xBE,
}

impl OpCode for Command {
    fn op_code(&self) -> u8 {
        *self as _
    }
}

/// Worst-case conversion time at the power-on 12-bit resolution
pub const CONVERSION_TIME_MS: u32 = 750;

/// Length of the scratchpad, CRC byte included
pub const SCRATCHPAD_BYTES: usize = 9;

/// How much of the scratchpad is read back after a conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScratchpadCheck {
    /// Read only the two temperature bytes and trust them
    #[default]
    None,
    /// Read all nine bytes and verify the trailing CRC-8
    Crc,
}

impl ScratchpadCheck {
    fn read_len(&self) -> usize {
        match self {
            ScratchpadCheck::None => 2,
            ScratchpadCheck::Crc => SCRATCHPAD_BYTES,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Ds18b20 {
    conversion_time_ms: u32,
    check: ScratchpadCheck,
}

impl Default for Ds18b20 {
    fn default() -> Self {
        Self::new(CONVERSION_TIME_MS, ScratchpadCheck::None)
    }
}

impl Ds18b20 {
    pub fn new(conversion_time_ms: u32, check: ScratchpadCheck) -> Self {
        Self {
            conversion_time_ms,
            check,
        }
    }

    pub fn conversion_time_ms(&self) -> u32 {
        self.conversion_time_ms
    }

    /// Resets the bus and tells the sensor to start converting
    pub fn start_conversion<W: IoWire>(
        &self,
        driver: &mut Driver<W>,
        delay: &mut impl DelayNs,
    ) -> Result<(), Error<W::Error>> {
        driver.reset_skip_write_only(delay, &[Command::Convert.op_code()])
    }

    /// Resets the bus and reads back the last conversion result
    pub fn read_scratchpad<W: IoWire>(
        &self,
        driver: &mut Driver<W>,
        delay: &mut impl DelayNs,
    ) -> Result<Temperature, Error<W::Error>> {
        let mut scratchpad = [0u8; SCRATCHPAD_BYTES];
        let len = self.check.read_len();
        driver.reset_skip_write_read(
            delay,
            &[Command::ReadScratchpad.op_code()],
            &mut scratchpad[..len],
        )?;
        if self.check == ScratchpadCheck::Crc {
            check_crc8(&scratchpad[..8], scratchpad[8])?;
        }
        let temperature = Self::read_temperature_from_scratchpad(&scratchpad);
        debug!(
            "scratchpad {:02x} {:02x} -> {}",
            scratchpad[0], scratchpad[1], temperature
        );
        Ok(temperature)
    }

    /// Full exchange: convert, wait the fixed conversion time, read.
    ///
    /// Resets the bus twice. A missing presence pulse at either reset returns
    /// [`Error::NoPresence`] right away; the sensor may have been unplugged
    /// during the conversion.
    pub fn read_temperature<W: IoWire>(
        &self,
        driver: &mut Driver<W>,
        delay: &mut impl DelayNs,
    ) -> Result<Temperature, Error<W::Error>> {
        self.measure(driver, delay)
    }

    fn read_temperature_from_scratchpad(scratchpad: &[u8]) -> Temperature {
        Temperature::from_scratchpad(scratchpad[0], scratchpad[1])
    }
}

impl Sensor for Ds18b20 {
    fn start_measurement<W: IoWire>(
        &self,
        driver: &mut Driver<W>,
        delay: &mut impl DelayNs,
    ) -> Result<u32, Error<W::Error>> {
        self.start_conversion(driver, delay)?;
        Ok(self.conversion_time_ms)
    }

    fn read_measurement<W: IoWire>(
        &self,
        driver: &mut Driver<W>,
        delay: &mut impl DelayNs,
    ) -> Result<Temperature, Error<W::Error>> {
        self.read_scratchpad(driver, delay)
    }
}
