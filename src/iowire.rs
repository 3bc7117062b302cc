use embedded_hal::digital::{Error, ErrorType, InputPin, OutputPin};

/// The bidirectional data line of the bus.
///
/// The line idles high through a pull-up resistor. The master either pulls
/// it low or lets go of it; a device on the bus may hold it low while it is
/// released.
pub trait IoWire {
    type Error: Error;

    /// Drives the line low
    fn drive_low(&mut self) -> Result<(), Self::Error>;

    /// Stops driving the line, the pull-up floats it high unless a device
    /// keeps it low
    ///
    /// *NOTE* on AVR-like ports this means switching the pin to input with the
    /// internal pull-up enabled
    fn release(&mut self) -> Result<(), Self::Error>;

    /// Is the line high? Only meaningful while released.
    fn is_high(&mut self) -> Result<bool, Self::Error>;

    /// Is the line low? Only meaningful while released.
    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.is_high().map(|high| !high)
    }
}

/// Single open-drain line config wrapper
impl<IO> IoWire for (IO,)
where
    IO: ErrorType + OutputPin + InputPin,
{
    type Error = IO::Error;

    fn drive_low(&mut self) -> Result<(), Self::Error> {
        self.0.set_low()
    }

    fn release(&mut self) -> Result<(), Self::Error> {
        self.0.set_high()
    }

    fn is_high(&mut self) -> Result<bool, Self::Error> {
        self.0.is_high()
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.0.is_low()
    }
}

/// Dual line config wrapper
impl<E, I, O> IoWire for (I, O)
where
    E: Error,
    I: ErrorType<Error = E> + InputPin,
    O: ErrorType<Error = E> + OutputPin,
{
    type Error = E;

    fn drive_low(&mut self) -> Result<(), Self::Error> {
        self.1.set_low()
    }

    fn release(&mut self) -> Result<(), Self::Error> {
        self.1.set_high()
    }

    fn is_high(&mut self) -> Result<bool, Self::Error> {
        self.0.is_high()
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.0.is_low()
    }
}

/// Inverted wire wrapper, for lines buffered through a transistor stage
pub struct Inverted<P>(pub P);

impl<I: ErrorType> ErrorType for Inverted<I> {
    type Error = I::Error;
}

impl<I> InputPin for Inverted<I>
where
    I: InputPin,
{
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        self.0.is_low()
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.0.is_high()
    }
}

impl<O> OutputPin for Inverted<O>
where
    O: OutputPin,
{
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.0.set_high()
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.0.set_low()
    }
}
