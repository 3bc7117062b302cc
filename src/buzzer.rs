use crate::AlarmSink;
use embedded_hal::digital::OutputPin;

/// Active buzzer on a push-pull pin, sounding while the pin is high
pub struct Buzzer<P: OutputPin> {
    pin: P,
}

impl<P: OutputPin> Buzzer<P> {
    pub fn new(pin: P) -> Self {
        Buzzer { pin }
    }

    pub fn into_inner(self) -> P {
        self.pin
    }
}

impl<P: OutputPin> AlarmSink for Buzzer<P> {
    type Error = P::Error;

    fn set_alarm(&mut self, active: bool) -> Result<(), Self::Error> {
        if active {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        }
    }
}
