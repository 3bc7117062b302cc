//! Simulated bus with one DS18B20 behind it.
//!
//! The line and the delay share one clock. The sensor decodes slots from the
//! low pulse widths the master produces and answers the way the datasheet
//! describes, so a master that gets the timing wrong reads garbage or trips
//! one of the assertions below.

#![allow(dead_code)]

use core::convert::Infallible;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, OutputPin};
use std::cell::RefCell;
use std::rc::Rc;
use thermoalarm::{compute_crc8, IoWire};

/// Datasheet maximum at 12-bit resolution
pub const CONVERSION_US: u64 = 750_000;

/// Temperature register content after power-up: 85.0 °C
pub const POWER_ON_RAW: i16 = 0x0550;

const PRESENCE_DELAY_US: u64 = 15;
const PRESENCE_WIDTH_US: u64 = 120;
const READ_0_HOLD_US: u64 = 30;
const SAMPLE_WINDOW_US: u64 = 15;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    Idle,
    Rom,
    Function,
    Sending,
}

struct Thermometer {
    /// What the next conversion measures
    ambient: i16,
    /// Temperature register
    register: i16,
    phase: Phase,
    rx: u8,
    rx_bits: u8,
    tx: Vec<u8>,
    tx_bit: usize,
    conversion_done_at: Option<u64>,
    vanish_on_convert: bool,
    corrupt_scratchpad: bool,
}

impl Thermometer {
    fn scratchpad(&self) -> Vec<u8> {
        let [lsb, msb] = self.register.to_le_bytes();
        // TH, TL, config (12 bit), reserved
        let mut data = vec![lsb, msb, 0x4B, 0x46, 0x7F, 0xFF, 0x0C, 0x10];
        data.push(compute_crc8(&data));
        if self.corrupt_scratchpad {
            data[0] ^= 0x04;
        }
        data
    }
}

struct State {
    now_us: u64,
    low_since: Option<u64>,
    sensor: Option<Thermometer>,
    presence: Option<(u64, u64)>,
    hold_until: u64,
    read_slot_start: Option<u64>,
    resets: usize,
    commands: Vec<u8>,
    bytes_sent: usize,
}

impl State {
    fn line_is_low(&self) -> bool {
        let now = self.now_us;
        self.low_since.is_some()
            || now < self.hold_until
            || self
                .presence
                .is_some_and(|(from, to)| (from..to).contains(&now))
    }

    fn reset_pulse(&mut self, released_at: u64) {
        self.resets += 1;
        self.hold_until = 0;
        self.presence = None;
        if let Some(sensor) = self.sensor.as_mut() {
            sensor.phase = Phase::Rom;
            sensor.rx = 0;
            sensor.rx_bits = 0;
            let from = released_at + PRESENCE_DELAY_US;
            self.presence = Some((from, from + PRESENCE_WIDTH_US));
        }
    }

    fn slot(&mut self, start: u64, width: u64) {
        let Some(sensor) = self.sensor.as_mut() else {
            return;
        };
        if sensor.phase == Phase::Sending {
            assert!(width < SAMPLE_WINDOW_US, "read slot init pulse of {width} µs");
            let bit = sensor.tx[sensor.tx_bit / 8] >> (sensor.tx_bit % 8) & 1;
            if bit == 0 {
                self.hold_until = start + READ_0_HOLD_US;
            }
            self.read_slot_start = Some(start);
            sensor.tx_bit += 1;
            if sensor.tx_bit % 8 == 0 {
                self.bytes_sent += 1;
            }
            if sensor.tx_bit == sensor.tx.len() * 8 {
                sensor.phase = Phase::Idle;
            }
            return;
        }

        let bit = match width {
            1..=15 => 1,
            60..=120 => 0,
            _ => panic!("write slot low time of {width} µs"),
        };
        sensor.rx |= bit << sensor.rx_bits;
        sensor.rx_bits += 1;
        if sensor.rx_bits == 8 {
            let byte = sensor.rx;
            sensor.rx = 0;
            sensor.rx_bits = 0;
            self.command(byte);
        }
    }

    fn command(&mut self, byte: u8) {
        self.commands.push(byte);
        let now = self.now_us;
        let Some(sensor) = self.sensor.as_mut() else {
            return;
        };
        let next = match (sensor.phase, byte) {
            (Phase::Rom, 0xCC) => Phase::Function,
            (Phase::Function, 0x44) => {
                sensor.conversion_done_at = Some(now + CONVERSION_US);
                Phase::Idle
            }
            (Phase::Function, 0xBE) => {
                if sensor.conversion_done_at.is_some_and(|done| done <= now) {
                    sensor.register = sensor.ambient;
                }
                sensor.tx = sensor.scratchpad();
                sensor.tx_bit = 0;
                Phase::Sending
            }
            _ => Phase::Idle,
        };
        sensor.phase = next;
        if byte == 0x44 && sensor.vanish_on_convert {
            self.sensor = None;
        }
    }
}

/// Handle on the simulated bus
#[derive(Clone)]
pub struct Bus {
    state: Rc<RefCell<State>>,
}

impl Bus {
    pub fn with_sensor(ambient: i16) -> Self {
        Self::new(Some(Thermometer {
            ambient,
            register: POWER_ON_RAW,
            phase: Phase::Idle,
            rx: 0,
            rx_bits: 0,
            tx: Vec::new(),
            tx_bit: 0,
            conversion_done_at: None,
            vanish_on_convert: false,
            corrupt_scratchpad: false,
        }))
    }

    pub fn empty() -> Self {
        Self::new(None)
    }

    fn new(sensor: Option<Thermometer>) -> Self {
        Bus {
            state: Rc::new(RefCell::new(State {
                now_us: 0,
                low_since: None,
                sensor,
                presence: None,
                hold_until: 0,
                read_slot_start: None,
                resets: 0,
                commands: Vec::new(),
                bytes_sent: 0,
            })),
        }
    }

    pub fn line(&self) -> Line {
        Line {
            state: self.state.clone(),
        }
    }

    pub fn delay(&self) -> Clock {
        Clock {
            state: self.state.clone(),
        }
    }

    pub fn set_ambient(&self, raw: i16) {
        if let Some(sensor) = self.state.borrow_mut().sensor.as_mut() {
            sensor.ambient = raw;
        }
    }

    /// The sensor drops off the bus as soon as it is told to convert
    pub fn vanish_on_convert(&self) {
        if let Some(sensor) = self.state.borrow_mut().sensor.as_mut() {
            sensor.vanish_on_convert = true;
        }
    }

    /// Flips a temperature bit after the CRC was computed
    pub fn corrupt_scratchpad(&self) {
        if let Some(sensor) = self.state.borrow_mut().sensor.as_mut() {
            sensor.corrupt_scratchpad = true;
        }
    }

    pub fn now_us(&self) -> u64 {
        self.state.borrow().now_us
    }

    pub fn resets(&self) -> usize {
        self.state.borrow().resets
    }

    /// Bytes the master received from the sensor
    pub fn bytes_sent(&self) -> usize {
        self.state.borrow().bytes_sent
    }

    /// Bytes the sensor received from the master
    pub fn commands(&self) -> Vec<u8> {
        self.state.borrow().commands.clone()
    }

    pub fn is_released(&self) -> bool {
        self.state.borrow().low_since.is_none()
    }
}

pub struct Line {
    state: Rc<RefCell<State>>,
}

impl IoWire for Line {
    type Error = Infallible;

    fn drive_low(&mut self) -> Result<(), Self::Error> {
        let mut state = self.state.borrow_mut();
        if state.low_since.is_none() {
            state.low_since = Some(state.now_us);
        }
        state.read_slot_start = None;
        Ok(())
    }

    fn release(&mut self) -> Result<(), Self::Error> {
        let mut state = self.state.borrow_mut();
        let now = state.now_us;
        if let Some(start) = state.low_since.take() {
            let width = now - start;
            if width >= 480 {
                state.reset_pulse(now);
            } else {
                state.slot(start, width);
            }
        }
        Ok(())
    }

    fn is_high(&mut self) -> Result<bool, Self::Error> {
        let state = self.state.borrow();
        if let Some(start) = state.read_slot_start {
            let elapsed = state.now_us - start;
            assert!(
                elapsed <= SAMPLE_WINDOW_US,
                "read slot sampled {elapsed} µs after its falling edge"
            );
        }
        Ok(!state.line_is_low())
    }
}

/// Delay provider that advances the simulated clock
pub struct Clock {
    state: Rc<RefCell<State>>,
}

impl DelayNs for Clock {
    fn delay_ns(&mut self, ns: u32) {
        self.state.borrow_mut().now_us += u64::from(ns).div_ceil(1_000);
    }

    fn delay_us(&mut self, us: u32) {
        self.state.borrow_mut().now_us += u64::from(us);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.state.borrow_mut().now_us += u64::from(ms) * 1_000;
    }
}

/// Output pin that remembers its level
#[derive(Clone, Default)]
pub struct Probe {
    levels: Rc<RefCell<Vec<bool>>>,
}

impl Probe {
    pub fn levels(&self) -> Vec<bool> {
        self.levels.borrow().clone()
    }

    pub fn is_high(&self) -> bool {
        self.levels.borrow().last().copied().unwrap_or(false)
    }
}

impl ErrorType for Probe {
    type Error = Infallible;
}

impl OutputPin for Probe {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.levels.borrow_mut().push(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.levels.borrow_mut().push(true);
        Ok(())
    }
}
