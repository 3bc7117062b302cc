use crate::{Driver, Error, IoWire, Temperature};
use embedded_hal::delay::DelayNs;

/// A thermometer measured in two phases, so the caller decides what to do
/// while the conversion runs.
pub trait Sensor {
    /// returns the milliseconds required to wait until the measurement finished
    fn start_measurement<W: IoWire>(
        &self,
        driver: &mut Driver<W>,
        delay: &mut impl DelayNs,
    ) -> Result<u32, Error<W::Error>>;

    /// returns the measured value
    fn read_measurement<W: IoWire>(
        &self,
        driver: &mut Driver<W>,
        delay: &mut impl DelayNs,
    ) -> Result<Temperature, Error<W::Error>>;

    /// Both phases back to back, blocking for the whole conversion time
    fn measure<W: IoWire>(
        &self,
        driver: &mut Driver<W>,
        delay: &mut impl DelayNs,
    ) -> Result<Temperature, Error<W::Error>> {
        let wait_ms = self.start_measurement(driver, delay)?;
        delay.delay_ms(wait_ms);
        self.read_measurement(driver, delay)
    }
}
