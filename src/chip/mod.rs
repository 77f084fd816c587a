pub mod chip8;

use std::io;

use cursive::CbSink;
use thiserror::Error;

/// A chip that can be driven one instruction at a time by an external event loop.
pub trait Chip {
    /// The type used to address a single input pin.
    type PinAddress;

    /// Loads the program stored at `path` into main memory and returns the
    /// number of bytes loaded.
    fn load_program(&mut self, path: &str) -> Result<usize, LoadProgramError>;

    /// Executes exactly one instruction.
    fn cycle(&mut self) -> Result<(), CycleError>;

    /// The current state of the output pins, i.e., the pixels of the display.
    fn read_output_pins(&self) -> &[bool];

    /// Sets a single input pin, i.e., presses or releases a key.
    fn set_input_pin(&mut self, pin: Self::PinAddress, value: bool);

    /// Releases all input pins.
    fn reset_input_pins(&mut self);
}

/// A chip that knows how to push its output pins to a cursive user interface.
pub trait ChipWithCursiveDisplay {
    /// Sends a fresh frame through `gfx_sink` if the output pins changed since the
    /// last call.
    fn update_ui(&mut self, gfx_sink: &CbSink);
}

/// Errors that occur while loading a program into memory.
#[derive(Debug, Error)]
pub enum LoadProgramError {
    #[error("could not read program file {path}: {source}")]
    CouldNotReadFile {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("program is too large ({size} bytes), at most {max} bytes fit into memory")]
    ProgramTooLarge { size: usize, max: usize },
}

/// Errors that abort the execution of a cycle. The state of the chip is left
/// untouched by the faulting instruction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CycleError {
    #[error("stack overflow executing {opcode:#06X} at {program_counter:#05X}")]
    StackOverflow { opcode: u16, program_counter: u16 },

    #[error("stack underflow executing {opcode:#06X} at {program_counter:#05X}")]
    StackUnderflow { opcode: u16, program_counter: u16 },
}
