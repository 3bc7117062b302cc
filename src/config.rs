use crate::ds18b20::{ScratchpadCheck, CONVERSION_TIME_MS};
use crate::Temperature;

/// Alarm threshold out of the box: 28.0 °C
pub const DEFAULT_ALARM_THRESHOLD: Temperature = Temperature::from_degrees(28);

/// Sleep between two poll cycles, on top of the conversion wait
pub const DEFAULT_POLL_PERIOD_MS: u32 = 1000;

/// Fixed at startup, nothing changes it at runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Readings at or above sound the alarm
    pub alarm_threshold: Temperature,
    pub poll_period_ms: u32,
    /// Blocking wait between starting a conversion and reading it back
    pub conversion_wait_ms: u32,
    pub scratchpad_check: ScratchpadCheck,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            alarm_threshold: DEFAULT_ALARM_THRESHOLD,
            poll_period_ms: DEFAULT_POLL_PERIOD_MS,
            conversion_wait_ms: CONVERSION_TIME_MS,
            scratchpad_check: ScratchpadCheck::None,
        }
    }
}

impl Config {
    pub fn with_alarm_threshold(mut self, threshold: Temperature) -> Self {
        self.alarm_threshold = threshold;
        self
    }

    pub fn with_poll_period_ms(mut self, period_ms: u32) -> Self {
        self.poll_period_ms = period_ms;
        self
    }

    pub fn with_conversion_wait_ms(mut self, wait_ms: u32) -> Self {
        self.conversion_wait_ms = wait_ms;
        self
    }

    pub fn with_scratchpad_check(mut self, check: ScratchpadCheck) -> Self {
        self.scratchpad_check = check;
        self
    }
}

/// Board wiring: the bus data line, the buzzer and the display lines.
///
/// Built once by the board crate from its HAL pins and handed to
/// `Monitor::from_pins`.
pub struct BoardPins<DQ, BZ, LCD> {
    /// Bus data line, open drain with a 4.7k..10k pull-up to VCC
    pub data: DQ,
    pub buzzer: BZ,
    pub lcd: LCD,
}
