use crate::chip::{
    chip8::{constants::CHIP8_DISPLAY_HEIGHT, constants::CHIP8_DISPLAY_WIDTH, util, Chip8},
    CycleError,
};

/// 00E0: turns every pixel off.
pub(super) fn clear_display(state: &mut Chip8) {
    state.output_pins = [false; CHIP8_DISPLAY_WIDTH * CHIP8_DISPLAY_HEIGHT];
    state.draw = true;
    util::increment_program_counter(state);
}

/// 00EE: returns to the instruction after the most recent call.
pub(super) fn ret(state: &mut Chip8, opcode: u16) -> Result<(), CycleError> {
    if state.stack_pointer == 0 {
        return Err(CycleError::StackUnderflow {
            opcode,
            program_counter: state.program_counter,
        });
    }

    state.stack_pointer -= 1;
    state.program_counter = state.stack[state.stack_pointer as usize];
    util::increment_program_counter(state);
    Ok(())
}

/// 0nnn and undefined instructions.
pub(super) fn no_op(state: &mut Chip8) {
    util::increment_program_counter(state);
}
