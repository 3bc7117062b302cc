//! HD44780 character display in 4-bit mode.
//!
//! Write-only: RW is tied to ground, so the busy flag cannot be polled and
//! every transfer is followed by a fixed settle delay instead.

use crate::DisplaySink;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

pub const COLUMNS: u8 = 16;
pub const ROWS: u8 = 2;

/// Controller glyph for the degree sign
const DEGREE_GLYPH: u8 = 0xDF;

#[derive(Clone, Copy, Debug)]
#[repr(u8)]
enum Instruction {
    Clear = 0x01,
    /// Auto-increment cursor, no shift
    EntryMode = 0x06,
    /// Display on, cursor off
    DisplayOn = 0x0C,
    /// 4-bit bus, 2 lines, 5x8 font
    FunctionSet = 0x28,
    SetDdramAddress = 0x80,
}

/// The six control lines
pub struct LcdPins<RS, EN, D4, D5, D6, D7> {
    pub rs: RS,
    pub en: EN,
    pub d4: D4,
    pub d5: D5,
    pub d6: D6,
    pub d7: D7,
}

pub struct Hd44780<RS, EN, D4, D5, D6, D7, D> {
    pins: LcdPins<RS, EN, D4, D5, D6, D7>,
    delay: D,
}

impl<E, RS, EN, D4, D5, D6, D7, D> Hd44780<RS, EN, D4, D5, D6, D7, D>
where
    E: embedded_hal::digital::Error,
    RS: OutputPin<Error = E>,
    EN: OutputPin<Error = E>,
    D4: OutputPin<Error = E>,
    D5: OutputPin<Error = E>,
    D6: OutputPin<Error = E>,
    D7: OutputPin<Error = E>,
    D: DelayNs,
{
    /// Runs the power-on sequence that forces the controller into 4-bit mode
    /// from whatever state it is in
    pub fn init(pins: LcdPins<RS, EN, D4, D5, D6, D7>, delay: D) -> Result<Self, E> {
        let mut lcd = Hd44780 { pins, delay };

        lcd.delay.delay_ms(50);
        lcd.send_nibble(0x03)?;
        lcd.delay.delay_ms(5);
        lcd.send_nibble(0x03)?;
        lcd.delay.delay_us(100);
        lcd.send_nibble(0x03)?;
        lcd.send_nibble(0x02)?;

        lcd.instruction(Instruction::FunctionSet as u8)?;
        lcd.instruction(Instruction::DisplayOn as u8)?;
        lcd.instruction(Instruction::EntryMode as u8)?;
        lcd.clear()?;
        Ok(lcd)
    }

    pub fn release(self) -> (LcdPins<RS, EN, D4, D5, D6, D7>, D) {
        (self.pins, self.delay)
    }

    pub fn clear(&mut self) -> Result<(), E> {
        self.instruction(Instruction::Clear as u8)?;
        self.delay.delay_ms(2);
        Ok(())
    }

    /// Moves the cursor, both coordinates are clamped to the panel
    pub fn set_cursor(&mut self, row: u8, col: u8) -> Result<(), E> {
        let row = row.min(ROWS - 1);
        let col = col.min(COLUMNS - 1);
        self.instruction(Instruction::SetDdramAddress as u8 | (row * 0x40 + col))
    }

    /// Writes at the cursor. `°` maps to the controller's degree glyph,
    /// anything else outside ASCII shows as `?`.
    pub fn write_str(&mut self, text: &str) -> Result<(), E> {
        for c in text.chars() {
            self.write_char(c)?;
        }
        Ok(())
    }

    pub fn write_char(&mut self, c: char) -> Result<(), E> {
        let byte = match c {
            '°' => DEGREE_GLYPH,
            c if c.is_ascii() => c as u8,
            _ => b'?',
        };
        self.data(byte)
    }

    /// Writes a whole row, padding with blanks so nothing from the previous
    /// contents survives
    pub fn write_row(&mut self, row: u8, text: &str) -> Result<(), E> {
        self.set_cursor(row, 0)?;
        let mut written = 0;
        for c in text.chars().take(COLUMNS as usize) {
            self.write_char(c)?;
            written += 1;
        }
        for _ in written..COLUMNS {
            self.data(b' ')?;
        }
        Ok(())
    }

    fn instruction(&mut self, cmd: u8) -> Result<(), E> {
        self.pins.rs.set_low()?;
        self.send_byte(cmd)
    }

    fn data(&mut self, byte: u8) -> Result<(), E> {
        self.pins.rs.set_high()?;
        self.send_byte(byte)
    }

    fn send_byte(&mut self, byte: u8) -> Result<(), E> {
        self.send_nibble(byte >> 4)?;
        self.send_nibble(byte & 0x0F)?;
        self.delay.delay_ms(2);
        Ok(())
    }

    fn send_nibble(&mut self, nibble: u8) -> Result<(), E> {
        set_level(&mut self.pins.d4, nibble & 0x01 != 0)?;
        set_level(&mut self.pins.d5, nibble & 0x02 != 0)?;
        set_level(&mut self.pins.d6, nibble & 0x04 != 0)?;
        set_level(&mut self.pins.d7, nibble & 0x08 != 0)?;
        self.pulse_enable()
    }

    fn pulse_enable(&mut self) -> Result<(), E> {
        self.pins.en.set_high()?;
        self.delay.delay_us(1);
        self.pins.en.set_low()?;
        self.delay.delay_us(100);
        Ok(())
    }
}

fn set_level<P: OutputPin>(pin: &mut P, high: bool) -> Result<(), P::Error> {
    if high {
        pin.set_high()
    } else {
        pin.set_low()
    }
}

/// Title on the first row, readings on the second
impl<E, RS, EN, D4, D5, D6, D7, D> DisplaySink for Hd44780<RS, EN, D4, D5, D6, D7, D>
where
    E: embedded_hal::digital::Error,
    RS: OutputPin<Error = E>,
    EN: OutputPin<Error = E>,
    D4: OutputPin<Error = E>,
    D5: OutputPin<Error = E>,
    D6: OutputPin<Error = E>,
    D7: OutputPin<Error = E>,
    D: DelayNs,
{
    type Error = E;

    fn show_title(&mut self, text: &str) -> Result<(), Self::Error> {
        self.write_row(0, text)
    }

    fn show_line(&mut self, text: &str) -> Result<(), Self::Error> {
        self.write_row(1, text)
    }
}
