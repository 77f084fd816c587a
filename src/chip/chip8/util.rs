use crate::chip::chip8::{
    constants::{CHIP8_DISPLAY_HEIGHT, CHIP8_DISPLAY_WIDTH, CHIP8_MEMORY_SIZE},
    Chip8,
};

/// Skips the next instruction if `condition` holds and advances past the
/// current one in any case.
pub fn conditional_skip(state: &mut Chip8, condition: bool) {
    if condition {
        increment_program_counter(state);
    }
    increment_program_counter(state);
}

pub fn increment_program_counter(state: &mut Chip8) {
    state.program_counter = state.program_counter.wrapping_add(2);
}

/// Maps any 16 bit address onto main memory.
pub fn memory_position(address: u16) -> usize {
    address as usize % CHIP8_MEMORY_SIZE
}

/// Maps pixel coordinates onto the output pins, wrapping around both axes.
pub fn pixel_position(x: usize, y: usize) -> usize {
    (x % CHIP8_DISPLAY_WIDTH) + (y % CHIP8_DISPLAY_HEIGHT) * CHIP8_DISPLAY_WIDTH
}
