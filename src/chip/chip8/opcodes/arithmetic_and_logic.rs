use rand::{thread_rng, Rng};

use crate::chip::chip8::{
    constants::{
        CHIP8_CHARSET_GLYPH_LEN, CHIP8_CHARSET_OFFSET, CHIP8_FLAG_REGISTER, CHIP8_INPUT_PIN_COUNT,
    },
    opcodes::{AluOperation, Flow},
    util, Chip8,
};

/// 6xkk
pub(super) fn load_value(state: &mut Chip8, reg: u8, value: u8) {
    state.registers[reg as usize] = value;
    util::increment_program_counter(state);
}

/// 7xkk: wraps around, VF is left alone.
pub(super) fn add_value(state: &mut Chip8, reg: u8, value: u8) {
    state.registers[reg as usize] = state.registers[reg as usize].wrapping_add(value);
    util::increment_program_counter(state);
}

/// 8xyN
pub(super) fn alu(state: &mut Chip8, x: u8, y: u8, operation: AluOperation) {
    /// Computes the result from the values of both registers before anything is
    /// written, then stores the result in `r1` and finally the flag, so that the
    /// flag wins if `r1` is VF.
    fn modify_registers(
        state: &mut Chip8,
        r1: u8,
        r2: u8,
        f: fn(u8, u8) -> (u8, Option<bool>),
    ) {
        let (val, flag) = f(state.registers[r1 as usize], state.registers[r2 as usize]);
        state.registers[r1 as usize] = val;
        if let Some(flag) = flag {
            state.registers[CHIP8_FLAG_REGISTER] = flag as u8;
        }
    }

    match operation {
        AluOperation::Load => modify_registers(state, x, y, |_, v2| (v2, None)),
        AluOperation::Or => modify_registers(state, x, y, |v1, v2| (v1 | v2, None)),
        AluOperation::And => modify_registers(state, x, y, |v1, v2| (v1 & v2, None)),
        AluOperation::Xor => modify_registers(state, x, y, |v1, v2| (v1 ^ v2, None)),
        AluOperation::Add => modify_registers(state, x, y, |v1, v2| {
            let (result, overflow) = v1.overflowing_add(v2);
            (result, Some(overflow))
        }),
        // VF is "not borrow", which is only set for a strictly greater minuend
        AluOperation::Sub => {
            modify_registers(state, x, y, |v1, v2| (v1.wrapping_sub(v2), Some(v1 > v2)))
        }
        AluOperation::ShiftRight => {
            modify_registers(state, x, y, |v1, _| (v1 >> 1, Some(v1 & 1 != 0)))
        }
        AluOperation::SubReversed => {
            modify_registers(state, x, y, |v1, v2| (v2.wrapping_sub(v1), Some(v2 > v1)))
        }
        AluOperation::ShiftLeft => {
            modify_registers(state, x, y, |v1, _| (v1 << 1, Some(v1 & 0x80 != 0)))
        }
    };
    util::increment_program_counter(state);
}

/// Annn
pub(super) fn load_index(state: &mut Chip8, address: u16) {
    state.index = address;
    util::increment_program_counter(state);
}

/// Cxkk
pub(super) fn random(state: &mut Chip8, reg: u8, mask: u8) {
    let sample: u8 = thread_rng().gen();
    state.registers[reg as usize] = sample & mask;
    util::increment_program_counter(state);
}

/// Fx07
pub(super) fn load_delay_timer(state: &mut Chip8, reg: u8) {
    state.registers[reg as usize] = state.delay_timer;
    util::increment_program_counter(state);
}

/// Fx0A: the highest pressed input pin wins. If no input pin is set, the
/// program counter stays put so the instruction is fetched again.
pub(super) fn wait_for_key(state: &mut Chip8, reg: u8) -> Flow {
    let pressed = (0..CHIP8_INPUT_PIN_COUNT)
        .rev()
        .find(|&pin| state.input_pins[pin]);

    match pressed {
        Some(pin) => {
            state.registers[reg as usize] = pin as u8;
            util::increment_program_counter(state);
            Flow::Continue
        }
        None => Flow::AwaitingKey,
    }
}

/// Fx15
pub(super) fn set_delay_timer(state: &mut Chip8, reg: u8) {
    state.delay_timer = state.registers[reg as usize];
    util::increment_program_counter(state);
}

/// Fx18
pub(super) fn set_sound_timer(state: &mut Chip8, reg: u8) {
    state.sound_timer = state.registers[reg as usize];
    util::increment_program_counter(state);
}

/// Fx1E: VF is left alone.
pub(super) fn add_to_index(state: &mut Chip8, reg: u8) {
    state.index = state
        .index
        .wrapping_add(state.registers[reg as usize] as u16);
    util::increment_program_counter(state);
}

/// Fx29
pub(super) fn load_glyph(state: &mut Chip8, reg: u8) {
    let character = state.registers[reg as usize] as u16;
    state.index = CHIP8_CHARSET_OFFSET + character * CHIP8_CHARSET_GLYPH_LEN;
    util::increment_program_counter(state);
}

/// Fx33
pub(super) fn store_bcd(state: &mut Chip8, reg: u8) {
    let value = state.registers[reg as usize];
    let index = state.index;
    state.set_memory_byte(index, value / 100);
    state.set_memory_byte(index.wrapping_add(1), (value / 10) % 10);
    state.set_memory_byte(index.wrapping_add(2), value % 10);
    util::increment_program_counter(state);
}

/// Fx55
pub(super) fn store_registers(state: &mut Chip8, last: u8) {
    for reg in 0x0..=last {
        let address = state.index.wrapping_add(reg as u16);
        state.set_memory_byte(address, state.registers[reg as usize]);
    }
    util::increment_program_counter(state);
}

/// Fx65
pub(super) fn load_registers(state: &mut Chip8, last: u8) {
    for reg in 0x0..=last {
        let address = state.index.wrapping_add(reg as u16);
        state.registers[reg as usize] = state.memory_byte(address);
    }
    util::increment_program_counter(state);
}
