use core::fmt::Debug;

/// Where the reading text ends up
pub trait DisplaySink {
    type Error: Debug;

    /// Static caption shown once at startup
    fn show_title(&mut self, text: &str) -> Result<(), Self::Error>;

    /// Replaces the contents of the value line
    fn show_line(&mut self, text: &str) -> Result<(), Self::Error>;
}

/// The audible alarm
pub trait AlarmSink {
    type Error: Debug;

    fn set_alarm(&mut self, active: bool) -> Result<(), Self::Error>;
}
