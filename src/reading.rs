use crate::Temperature;
use core::fmt::{Display, Formatter, Result as FmtResult, Write};
use heapless::String;

/// Room for one display line
pub const LINE_CAPACITY: usize = 16;

/// Outcome of one poll cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reading {
    Temperature(Temperature),
    /// No presence pulse at one of the two resets
    SensorAbsent,
}

impl Reading {
    /// Numeric stand-in for [`Reading::SensorAbsent`], far below the sensor's
    /// -55 °C operating limit
    pub const SENTINEL_CELSIUS: f32 = -127.0;

    /// Text shown instead of a temperature
    pub const ABSENT_TEXT: &'static str = "No sensor";

    pub fn temperature(&self) -> Option<Temperature> {
        match self {
            Reading::Temperature(t) => Some(*t),
            Reading::SensorAbsent => None,
        }
    }

    /// Degrees Celsius, or [`Reading::SENTINEL_CELSIUS`]
    pub fn as_celsius(&self) -> f32 {
        self.temperature()
            .map_or(Self::SENTINEL_CELSIUS, |t| t.to_celsius())
    }

    /// An unknown temperature is treated as the worst case
    pub fn alarm_active(&self, threshold: Temperature) -> bool {
        match self {
            Reading::Temperature(t) => *t >= threshold,
            Reading::SensorAbsent => true,
        }
    }

    /// The text for the display's second line
    pub fn render(&self) -> String<LINE_CAPACITY> {
        let mut line = String::new();
        // "-2048.0°C" is the longest possible line and fits
        let _ = write!(line, "{}", self);
        line
    }
}

impl From<Temperature> for Reading {
    fn from(t: Temperature) -> Self {
        Reading::Temperature(t)
    }
}

impl Display for Reading {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            Reading::Temperature(t) => Display::fmt(t, f),
            Reading::SensorAbsent => f.write_str(Self::ABSENT_TEXT),
        }
    }
}
