use crate::chip::{
    chip8::{constants::CHIP8_STACK_SIZE, util, Chip8},
    CycleError,
};

/// 1nnn
pub(super) fn jump(state: &mut Chip8, address: u16) {
    state.program_counter = address;
}

/// 2nnn: pushes the address of the call itself; returning skips past it.
pub(super) fn call(state: &mut Chip8, address: u16, opcode: u16) -> Result<(), CycleError> {
    if state.stack_pointer as usize >= CHIP8_STACK_SIZE {
        return Err(CycleError::StackOverflow {
            opcode,
            program_counter: state.program_counter,
        });
    }

    state.stack[state.stack_pointer as usize] = state.program_counter;
    state.stack_pointer += 1;
    state.program_counter = address;
    Ok(())
}

/// 3xkk
pub(super) fn skip_if_equal(state: &mut Chip8, reg: u8, value: u8) {
    let condition = state.registers[reg as usize] == value;
    util::conditional_skip(state, condition);
}

/// 4xkk
pub(super) fn skip_if_not_equal(state: &mut Chip8, reg: u8, value: u8) {
    let condition = state.registers[reg as usize] != value;
    util::conditional_skip(state, condition);
}

/// 5xy0
pub(super) fn skip_if_registers_equal(state: &mut Chip8, x: u8, y: u8) {
    let condition = state.registers[x as usize] == state.registers[y as usize];
    util::conditional_skip(state, condition);
}

/// 9xy0
pub(super) fn skip_if_registers_not_equal(state: &mut Chip8, x: u8, y: u8) {
    let condition = state.registers[x as usize] != state.registers[y as usize];
    util::conditional_skip(state, condition);
}

/// Bnnn
pub(super) fn jump_with_offset(state: &mut Chip8, address: u16) {
    state.program_counter = address.wrapping_add(state.registers[0] as u16);
}

/// Ex9E
pub(super) fn skip_if_key_pressed(state: &mut Chip8, reg: u8) {
    let condition = state.input_pins[key_index(state, reg)];
    util::conditional_skip(state, condition);
}

/// ExA1
pub(super) fn skip_if_key_not_pressed(state: &mut Chip8, reg: u8) {
    let condition = !state.input_pins[key_index(state, reg)];
    util::conditional_skip(state, condition);
}

/// Only the low nibble of a register selects a key.
fn key_index(state: &Chip8, reg: u8) -> usize {
    (state.registers[reg as usize] & 0xF) as usize
}
