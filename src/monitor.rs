use crate::{
    AlarmSink, Config, DisplaySink, Driver, Ds18b20, Error, IoWire, Reading, Sensor,
};
use embedded_hal::delay::DelayNs;
use log::{info, warn};

/// Caption on the first display row
pub const TITLE: &str = "Temperature:";

/// The control loop: measure, show, alarm, sleep, forever.
///
/// Each cycle lasts the conversion wait plus the poll period plus the bus
/// traffic, about 1.75 s with the defaults. No drift compensation is done.
pub struct Monitor<W: IoWire, S, L, A> {
    driver: Driver<W>,
    sensor: S,
    display: L,
    alarm: A,
    config: Config,
}

impl<W, L, A> Monitor<W, Ds18b20, L, A>
where
    W: IoWire,
    L: DisplaySink,
    A: AlarmSink,
{
    /// Single DS18B20 on `wire`, configured from `config`
    pub fn with_ds18b20(wire: W, display: L, alarm: A, config: Config) -> Self {
        let sensor = Ds18b20::new(config.conversion_wait_ms, config.scratchpad_check);
        Self::new(Driver::new(wire), sensor, display, alarm, config)
    }
}

impl<W, S, L, A> Monitor<W, S, L, A>
where
    W: IoWire,
    S: Sensor,
    L: DisplaySink,
    A: AlarmSink,
{
    pub fn new(driver: Driver<W>, sensor: S, display: L, alarm: A, config: Config) -> Self {
        Monitor {
            driver,
            sensor,
            display,
            alarm,
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn display(&self) -> &L {
        &self.display
    }

    pub fn alarm(&self) -> &A {
        &self.alarm
    }

    pub fn release(self) -> (Driver<W>, S, L, A) {
        (self.driver, self.sensor, self.display, self.alarm)
    }

    /// Silences the buzzer and writes the caption
    pub fn init(&mut self) {
        if let Err(e) = self.alarm.set_alarm(false) {
            warn!("alarm off failed: {:?}", e);
        }
        if let Err(e) = self.display.show_title(TITLE) {
            warn!("display title failed: {:?}", e);
        }
    }

    /// Takes one reading and routes it to the display and the alarm.
    ///
    /// Blocks for the whole conversion. Any failure to read the sensor is
    /// reported as [`Reading::SensorAbsent`].
    pub fn poll(&mut self, delay: &mut impl DelayNs) -> Reading {
        let reading = match self.sensor.measure(&mut self.driver, delay) {
            Ok(temperature) => {
                info!("temperature: {}", temperature);
                Reading::Temperature(temperature)
            }
            Err(Error::NoPresence) => {
                warn!("no sensor on the bus");
                Reading::SensorAbsent
            }
            Err(e) => {
                warn!("sensor read failed: {:?}", e);
                Reading::SensorAbsent
            }
        };
        self.route(&reading);
        reading
    }

    /// [`Monitor::poll`] followed by the poll period sleep
    pub fn step(&mut self, delay: &mut impl DelayNs) -> Reading {
        let reading = self.poll(delay);
        delay.delay_ms(self.config.poll_period_ms);
        reading
    }

    pub fn run(&mut self, delay: &mut impl DelayNs) -> ! {
        self.init();
        loop {
            self.step(delay);
        }
    }

    fn route(&mut self, reading: &Reading) {
        let line = reading.render();
        if let Err(e) = self.display.show_line(&line) {
            warn!("display update failed: {:?}", e);
        }

        let active = reading.alarm_active(self.config.alarm_threshold);
        if let Err(e) = self.alarm.set_alarm(active) {
            warn!("alarm update failed: {:?}", e);
        }
    }
}

#[cfg(feature = "hd44780")]
mod board {
    use super::Monitor;
    use crate::lcd::{Hd44780, LcdPins};
    use crate::{BoardPins, Buzzer, Config, Ds18b20, IoWire};
    use embedded_hal::delay::DelayNs;
    use embedded_hal::digital::OutputPin;

    impl<W, BZ, E, RS, EN, D4, D5, D6, D7, D>
        Monitor<W, Ds18b20, Hd44780<RS, EN, D4, D5, D6, D7, D>, Buzzer<BZ>>
    where
        W: IoWire,
        BZ: OutputPin,
        E: embedded_hal::digital::Error,
        RS: OutputPin<Error = E>,
        EN: OutputPin<Error = E>,
        D4: OutputPin<Error = E>,
        D5: OutputPin<Error = E>,
        D6: OutputPin<Error = E>,
        D7: OutputPin<Error = E>,
        D: DelayNs,
    {
        /// Brings up the display and wires everything together. The delay is
        /// owned by the display for its own settle times.
        pub fn from_pins(
            pins: BoardPins<W, BZ, LcdPins<RS, EN, D4, D5, D6, D7>>,
            lcd_delay: D,
            config: Config,
        ) -> Result<Self, E> {
            let display = Hd44780::init(pins.lcd, lcd_delay)?;
            Ok(Self::with_ds18b20(
                pins.data,
                display,
                Buzzer::new(pins.buzzer),
                config,
            ))
        }
    }
}
