use crate::chip::chip8::{constants::CHIP8_FLAG_REGISTER, util, Chip8};

/// Dxyn: XORs the `height` bytes starting at the index register onto the output
/// pins with their top left corner at (Vx, Vy). Every pixel coordinate wraps
/// around the display on its own. VF is set to 1 if any pixel that was on got
/// turned off and to 0 otherwise.
pub(super) fn draw_sprite(state: &mut Chip8, x: u8, y: u8, height: u8) {
    let x = state.registers[x as usize] as usize;
    let y = state.registers[y as usize] as usize;

    state.registers[CHIP8_FLAG_REGISTER] = 0;
    let mut collision = false;

    for y_pos in 0..height as usize {
        let pixel_byte = state.memory_byte(state.index.wrapping_add(y_pos as u16));

        for x_pos in 0..8 {
            if pixel_byte & (0x80 >> x_pos) == 0 {
                continue;
            }

            let pixel_pos = util::pixel_position(x + x_pos, y + y_pos);
            if state.output_pins[pixel_pos] {
                collision = true;
            }
            state.output_pins[pixel_pos] ^= true;
            state.draw = true;
        }
    }

    if collision {
        state.registers[CHIP8_FLAG_REGISTER] = 1;
    }
    util::increment_program_counter(state);
}
