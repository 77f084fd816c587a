use log::warn;

use crate::chip::{
    chip8::constants::{CHIP8_DISPLAY_HEIGHT, CHIP8_DISPLAY_WIDTH},
    chip8::{util, Chip8},
    Chip, ChipWithCursiveDisplay,
};

use cursive::{
    direction::Direction,
    event::{Event, EventResult},
    theme::{BaseColor, Color, ColorStyle},
    view::{CannotFocus, View},
    CbSink, Printer, Vec2,
};

const PIXEL_COUNT: usize = CHIP8_DISPLAY_WIDTH * CHIP8_DISPLAY_HEIGHT;

/// Represents the display of the Chip 8
pub struct Display {
    pixels: [bool; PIXEL_COUNT],
}

impl Display {
    /// Creates a new display from a slice of output pins. Pins beyond the size
    /// of the display are ignored, missing ones are off.
    pub fn new(pixels: &[bool]) -> Self {
        let mut tmp = [false; PIXEL_COUNT];
        let len = pixels.len().min(PIXEL_COUNT);
        tmp[..len].copy_from_slice(&pixels[..len]);
        Display { pixels: tmp }
    }

    /// Whether the pixel at (`x`, `y`) is on. Coordinates wrap around the display.
    pub fn is_lit(&self, x: usize, y: usize) -> bool {
        self.pixels[util::pixel_position(x, y)]
    }
}

impl Default for Display {
    fn default() -> Self {
        Self::new(&[false; PIXEL_COUNT])
    }
}

/// Implements cursive::view::View for Display to enable drawing it
/// as a View out of the box.
impl View for Display {
    fn draw(&self, printer: &Printer) {
        printer.with_color(
            ColorStyle::new(Color::Dark(BaseColor::Black), Color::RgbLowRes(0, 0, 0)),
            |printer| {
                for x in 0..CHIP8_DISPLAY_WIDTH {
                    for y in 0..CHIP8_DISPLAY_HEIGHT {
                        if self.is_lit(x, y) {
                            printer.print((x, y), " ");
                        }
                    }
                }
            },
        );
    }

    fn take_focus(&mut self, _: Direction) -> Result<EventResult, CannotFocus> {
        Ok(EventResult::Consumed(None))
    }

    fn on_event(&mut self, _event: Event) -> EventResult {
        EventResult::Ignored
    }

    fn required_size(&mut self, _: Vec2) -> Vec2 {
        Vec2 {
            x: CHIP8_DISPLAY_WIDTH,
            y: CHIP8_DISPLAY_HEIGHT,
        }
    }
}

impl ChipWithCursiveDisplay for Chip8 {
    fn update_ui(&mut self, gfx_sink: &CbSink) {
        if !self.take_draw_flag() {
            return;
        }

        let display = Display::new(self.read_output_pins());
        let sent = gfx_sink.send(Box::new(move |s: &mut cursive::Cursive| {
            s.pop_layer();
            s.add_layer(display);
        }));

        if sent.is_err() {
            warn!("Dropping frame, the user interface is gone");
        }
    }
}
