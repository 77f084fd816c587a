/// Runtime configuration.
mod config;
/// CHIP-8 constants.
pub mod constants;
/// Cursive display output.
pub mod cursive_display;
/// Decoding of opcodes and their execution.
mod opcodes;
/// Convenience functions for modification of the CHIP-8 state.
mod util;


use std::fs;
use std::time::Duration;

use log::{debug, warn};

pub use crate::chip::chip8::config::{Chip8Config, TimerMode};
use crate::chip::{
    chip8::constants::{
        CHIP8_CHARSET, CHIP8_CHARSET_LEN, CHIP8_CHARSET_OFFSET, CHIP8_DISPLAY_HEIGHT,
        CHIP8_DISPLAY_WIDTH, CHIP8_INPUT_PIN_COUNT, CHIP8_MAX_PROGRAM_SIZE, CHIP8_MEMORY_SIZE,
        CHIP8_PROGRAM_START, CHIP8_REGISTER_COUNT, CHIP8_STACK_SIZE, CHIP8_TIMER_INTERVAL,
    },
    chip8::opcodes::{Flow, Opcode},
    Chip, CycleError, LoadProgramError,
};

/// Represents the state of the CHIP-8.
pub struct Chip8 {
    /// 4096 bytes of main memory
    memory: [u8; CHIP8_MEMORY_SIZE],

    /// 16 registers where each can store one byte
    registers: [u8; CHIP8_REGISTER_COUNT],

    /// An index register
    index: u16,

    /// A program counter
    program_counter: u16,

    /// The output pins. Note that those are usually directly wired
    /// up to the pixels of the display. However, given that this implementation
    /// considers a display as optional, we refer to them as output_pins for
    /// the sake of generality.
    output_pins: [bool; CHIP8_DISPLAY_WIDTH * CHIP8_DISPLAY_HEIGHT],

    /// The delay timer. How it is decremented depends on `config.timer_mode`.
    delay_timer: u8,

    /// The sound timer. How it is decremented depends on `config.timer_mode`.
    sound_timer: u8,

    /// The input pins. Note that those input pins are usually directly wired
    /// up to the keys. However, we do not prescribe how this is handled and
    /// hence refer to them as input pins rather than as keys.
    input_pins: [bool; CHIP8_INPUT_PIN_COUNT],

    /// A stack. Note that there are no instructions allowing to modify the
    /// stack and it is only used to store return addresses for the return
    /// opcode.
    stack: [u16; CHIP8_STACK_SIZE],

    /// A pointer, pointing to the next free slot of the stack.
    stack_pointer: u8,

    config: Chip8Config,

    /// A helper variable to properly implement the timer resolution.
    cycles_since_timer_dec: u8,

    /// Elapsed wall clock time not yet turned into timer decrements.
    timer_accumulator: Duration,

    /// Set while a blocking key read is waiting for a key press.
    awaiting_key: bool,

    /// A flag that indicates whether the output pins changed since it
    /// was last taken.
    draw: bool,
}

impl Chip for Chip8 {
    /// The CHIP-8's pins can actually be addressed by using just half a byte.
    /// However, we use a whole byte here and ignore addresses outside of the
    /// nibble range, because it is more convenient to handle.
    type PinAddress = u8;

    fn load_program(&mut self, path: &str) -> Result<usize, LoadProgramError> {
        let buffer = fs::read(path).map_err(|source| LoadProgramError::CouldNotReadFile {
            path: path.to_string(),
            source,
        })?;

        self.load_program_bytes(&buffer)
    }

    fn cycle(&mut self) -> Result<(), CycleError> {
        let opcode = self.next_instruction();

        match opcode.execute(self)? {
            Flow::AwaitingKey => {
                // the instruction did not complete; it is fetched again on the
                // next cycle and the timers stay frozen until then
                self.awaiting_key = true;
                return Ok(());
            }
            Flow::Continue => self.awaiting_key = false,
        }

        if let Some(resolution) = self.config.timer_resolution() {
            self.cycles_since_timer_dec += 1;

            if self.cycles_since_timer_dec >= resolution {
                self.decrement_timers();
                self.cycles_since_timer_dec = 0;
            }
        }

        Ok(())
    }

    fn read_output_pins(&self) -> &[bool] {
        &self.output_pins
    }

    fn set_input_pin(&mut self, pin: u8, value: bool) {
        match self.input_pins.get_mut(pin as usize) {
            Some(input_pin) => *input_pin = value,
            None => warn!("Ignoring input pin {:#x} outside of the keypad", pin),
        }
    }

    fn reset_input_pins(&mut self) {
        self.input_pins = [false; CHIP8_INPUT_PIN_COUNT];
    }
}

impl Chip8 {
    /// Constructs a new CHIP-8 and appropriately initializes all fields so that
    /// it is ready for the first execution cycle. Essentially this means that
    /// the program counter is set to 0x200 and the default CHIP-8 charset is
    /// loaded at memory address `CHIP8_CHARSET_OFFSET`. Note that no program is
    /// loaded upon initialization.
    pub fn new() -> Self {
        Chip8::with_config(Chip8Config::default())
    }

    /// Like `new`, but with an explicit configuration.
    pub fn with_config(config: Chip8Config) -> Self {
        let mut memory = [0; CHIP8_MEMORY_SIZE];
        let charset_start = CHIP8_CHARSET_OFFSET as usize;
        memory[charset_start..charset_start + CHIP8_CHARSET_LEN as usize]
            .copy_from_slice(&CHIP8_CHARSET);

        Chip8 {
            memory,
            registers: [0; CHIP8_REGISTER_COUNT],
            index: 0,
            program_counter: CHIP8_PROGRAM_START,
            output_pins: [false; CHIP8_DISPLAY_WIDTH * CHIP8_DISPLAY_HEIGHT],
            delay_timer: 0,
            sound_timer: 0,
            stack: [0; CHIP8_STACK_SIZE],
            stack_pointer: 0,
            input_pins: [false; CHIP8_INPUT_PIN_COUNT],
            config,
            cycles_since_timer_dec: 0,
            timer_accumulator: Duration::ZERO,
            awaiting_key: false,
            draw: false,
        }
    }

    /// Copies `program` verbatim into memory starting at `CHIP8_PROGRAM_START` and
    /// returns the number of bytes copied.
    ///
    /// # Errors
    /// `LoadProgramError::ProgramTooLarge` if `program` does not fit between the
    /// program start and the end of memory. Memory is left untouched in that case.
    pub fn load_program_bytes(&mut self, program: &[u8]) -> Result<usize, LoadProgramError> {
        if program.len() > CHIP8_MAX_PROGRAM_SIZE {
            return Err(LoadProgramError::ProgramTooLarge {
                size: program.len(),
                max: CHIP8_MAX_PROGRAM_SIZE,
            });
        }

        let start = CHIP8_PROGRAM_START as usize;
        self.memory[start..start + program.len()].copy_from_slice(program);
        debug!("Loaded {} byte program at {:#05x}", program.len(), start);

        Ok(program.len())
    }

    /// Feeds `elapsed` wall clock time into the timers. Every full 1/60 s
    /// decrements both timers by one, unless a blocking key read is pending.
    /// Does nothing unless the chip runs in `TimerMode::WallClock`.
    pub fn advance_timers(&mut self, elapsed: Duration) {
        if self.config.timer_mode != TimerMode::WallClock {
            return;
        }

        let accumulated = self.timer_accumulator.saturating_add(elapsed).as_nanos();
        let interval = CHIP8_TIMER_INTERVAL.as_nanos();
        let ticks = accumulated / interval;
        // the remainder is shorter than one interval, so it fits into a u64
        self.timer_accumulator = Duration::from_nanos((accumulated % interval) as u64);

        if !self.awaiting_key {
            let ticks = ticks.min(u8::MAX as u128) as u8;
            self.delay_timer = self.delay_timer.saturating_sub(ticks);
            self.sound_timer = self.sound_timer.saturating_sub(ticks);
        }
    }

    pub fn config(&self) -> &Chip8Config {
        &self.config
    }

    pub fn registers(&self) -> &[u8] {
        &self.registers
    }

    /// The value of register `Vx`. Only the low nibble of `x` is used.
    pub fn register(&self, x: u8) -> u8 {
        self.registers[(x & 0xF) as usize]
    }

    pub fn index(&self) -> u16 {
        self.index
    }

    pub fn program_counter(&self) -> u16 {
        self.program_counter
    }

    pub fn stack_pointer(&self) -> u8 {
        self.stack_pointer
    }

    pub fn delay_timer(&self) -> u8 {
        self.delay_timer
    }

    pub fn sound_timer(&self) -> u8 {
        self.sound_timer
    }

    /// Whether a tone should currently be played.
    pub fn is_sound_active(&self) -> bool {
        self.sound_timer > 0
    }

    pub fn memory(&self) -> &[u8] {
        &self.memory
    }

    /// Whether the pixel at (`x`, `y`) is on. Coordinates wrap around the display.
    pub fn pixel(&self, x: usize, y: usize) -> bool {
        self.output_pins[util::pixel_position(x, y)]
    }

    /// Whether the last cycle stopped at a blocking key read.
    pub fn is_awaiting_key(&self) -> bool {
        self.awaiting_key
    }

    /// Returns whether the output pins changed since the last call and clears
    /// the flag.
    pub fn take_draw_flag(&mut self) -> bool {
        std::mem::replace(&mut self.draw, false)
    }

    /// Fetches the next instruction based on the current state of self.program_counter.
    /// Both bytes are read modulo the memory size, so fetching never goes out of bounds.
    fn next_instruction(&self) -> Opcode {
        Opcode::new(&[
            self.memory_byte(self.program_counter),
            self.memory_byte(self.program_counter.wrapping_add(1)),
        ])
    }

    fn memory_byte(&self, address: u16) -> u8 {
        self.memory[util::memory_position(address)]
    }

    fn set_memory_byte(&mut self, address: u16, byte: u8) {
        self.memory[util::memory_position(address)] = byte;
    }

    fn decrement_timers(&mut self) {
        self.delay_timer = self.delay_timer.saturating_sub(1);
        self.sound_timer = self.sound_timer.saturating_sub(1);
    }
}

impl Default for Chip8 {
    fn default() -> Self {
        Chip8::new()
    }
}
