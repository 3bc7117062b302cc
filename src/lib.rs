#![cfg_attr(not(test), no_std)]
#![doc = include_str!("../README.md")]

mod buzzer;
mod command;
mod config;
mod driver;
pub mod ds18b20;
mod iowire;
#[cfg(feature = "hd44780")]
pub mod lcd;
mod monitor;
mod reading;
mod result;
mod sensor;
mod sink;
mod temperature;

pub use buzzer::Buzzer;
pub use command::{Command, OpCode};
pub use config::{BoardPins, Config, DEFAULT_ALARM_THRESHOLD, DEFAULT_POLL_PERIOD_MS};
pub use driver::Driver;
pub use ds18b20::{Ds18b20, ScratchpadCheck};
pub use iowire::{Inverted, IoWire};
pub use monitor::{Monitor, TITLE};
pub use reading::Reading;
pub use result::Error;
pub use sensor::Sensor;
pub use sink::{AlarmSink, DisplaySink};
pub use temperature::Temperature;

use crc::{Crc, CRC_8_MAXIM_DOW};

/// Dallas/Maxim CRC-8 (x^8 + x^5 + x^4 + 1, reflected), as used by every
/// device on the bus
const CRC8: Crc<u8> = Crc::<u8>::new(&CRC_8_MAXIM_DOW);

pub fn compute_crc8(data: &[u8]) -> u8 {
    CRC8.checksum(data)
}

pub fn check_crc8<E: core::fmt::Debug>(data: &[u8], crc8: u8) -> Result<(), Error<E>> {
    let computed = compute_crc8(data);
    if computed != crc8 {
        Err(Error::CrcMismatch(computed, crc8))
    } else {
        Ok(())
    }
}
