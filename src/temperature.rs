use byteorder::{ByteOrder, LittleEndian};
use core::fmt::{Display, Formatter, Result as FmtResult};

/// Temperature in sixteenths of a degree Celsius.
///
/// This is the sensor's native 12-bit fixed-point format: the raw scratchpad
/// word, sign included. Keeping it as an integer avoids floating point on
/// targets without an FPU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Temperature {
    raw: i16,
}

impl Temperature {
    /// Degrees Celsius per raw unit
    pub const RESOLUTION: f32 = 0.0625;

    /// Lowest temperature the sensor is specified for
    pub const MIN_OPERATING: Self = Self::from_degrees(-55);

    /// Highest temperature the sensor is specified for
    pub const MAX_OPERATING: Self = Self::from_degrees(125);

    pub const fn from_raw(raw: i16) -> Self {
        Self { raw }
    }

    /// Whole degrees Celsius
    pub const fn from_degrees(degrees: i16) -> Self {
        Self { raw: degrees * 16 }
    }

    /// Assembles the first two scratchpad bytes
    pub fn from_scratchpad(lsb: u8, msb: u8) -> Self {
        Self::from_raw(LittleEndian::read_i16(&[lsb, msb]))
    }

    pub const fn raw(&self) -> i16 {
        self.raw
    }

    /// Exact: every raw value is representable in an `f32`
    pub fn to_celsius(&self) -> f32 {
        f32::from(self.raw) * Self::RESOLUTION
    }

    /// Whole tenths of a degree, truncated toward zero
    pub fn tenths(&self) -> i32 {
        i32::from(self.raw) * 10 / 16
    }

    /// Split into integer and fraction parts.
    /// The degrees are `integer + fraction / 10000`
    pub fn split(&self) -> (i16, i16) {
        let abs = self.raw.unsigned_abs();
        let integer = (abs >> 4) as i16;
        let fraction = (abs & 0xF) as i16 * 625;
        if self.raw < 0 {
            (-integer, -fraction)
        } else {
            (integer, fraction)
        }
    }

    pub fn is_within_operating_range(&self) -> bool {
        (Self::MIN_OPERATING..=Self::MAX_OPERATING).contains(self)
    }
}

impl From<Temperature> for f32 {
    fn from(t: Temperature) -> Self {
        t.to_celsius()
    }
}

/// One decimal place, truncated, with unit: `25.0°C`, `-0.5°C`
impl Display for Temperature {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        let tenths = self.tenths();
        let sign = if self.raw < 0 && tenths != 0 { "-" } else { "" };
        let abs = tenths.unsigned_abs();
        write!(f, "{}{}.{}°C", sign, abs / 10, abs % 10)
    }
}
