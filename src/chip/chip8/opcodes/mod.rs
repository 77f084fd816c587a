mod arithmetic_and_logic;
mod draw;
mod program_flow;
mod system;

use log::debug;

use crate::chip::{chip8::Chip8, CycleError};

/// Represents a Chip 8 opcode. A Chip 8 opcode is two bytes long.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Opcode {
    /// The instruction class is the most significant nibble of the opcode.
    /// Note that we use a u8 to represent the instruction class here for
    /// convenience, but ensure that a valid opcode can only be constructed
    /// if the four most significant bits of the u8 are 0.
    instruction_class: u8,
    /// The payload constitutes the remaining nibbles of the opcode.
    payload: OpcodePayload,
}

/// Represents the payload of a Chip 8 opcode. That is the opcode without
/// the most significant nibble.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct OpcodePayload {
    /// The nibbles representing the payload. Note that we use the u8 type
    /// here for convenience, but ensure that valid payloads can only be
    /// constructed if the four most significant bits of the u8 are 0.
    bytes: [u8; 3],
}

impl OpcodePayload {
    /// Interprets the opcode payload as an address in the range 0x000 to
    /// 0xFFF (inclusive) and returns an u16 containing this address.
    fn address(&self) -> u16 {
        (self.bytes[0] as u16) << 8 | (self.bytes[1] as u16) << 4 | self.bytes[2] as u16
    }

    /// Interprets the most significant nibble of the payload as a register
    /// address in range 0x0 - 0xF (inclusive) and the remaining nibbles
    /// as a value in range 0x00 - 0xFF (inclusive) and returns a tuple
    /// representing these values.
    fn reg_and_value(&self) -> (u8, u8) {
        (self.bytes[0], (self.bytes[1] << 4) | self.bytes[2])
    }

    /// Interprets the opcode payload as three operands, each of size
    /// one nibble, i.e., in range 0x0 - 0xF (inclusive) and returns
    /// a triple representing these values.
    fn operands(&self) -> (u8, u8, u8) {
        (self.bytes[0], self.bytes[1], self.bytes[2])
    }
}

impl Opcode {
    /// Constructs a new `Opcode` given its byte representation, most significant
    /// byte first.
    pub(super) fn new(opcode: &[u8; 2]) -> Opcode {
        Opcode {
            instruction_class: opcode[0] >> 4,
            payload: OpcodePayload {
                bytes: [opcode[0] & 0xF, opcode[1] >> 4, opcode[1] & 0xF],
            },
        }
    }

    /// The 16 bit instruction word this opcode was decoded from.
    pub(super) fn word(&self) -> u16 {
        (self.instruction_class as u16) << 12 | self.payload.address()
    }

    /// Decodes and executes `self` relative to the given state.
    ///
    /// # Errors
    /// A `CycleError` if a call or return would leave the bounds of the stack.
    /// The state is left untouched in that case.
    pub(super) fn execute(self, state: &mut Chip8) -> Result<Flow, CycleError> {
        let instruction = Instruction::from(self);

        match instruction {
            Instruction::ClearDisplay => system::clear_display(state),
            Instruction::Return => system::ret(state, self.word())?,
            Instruction::Sys { .. } | Instruction::Undefined(_) => {
                if let Instruction::Undefined(word) = instruction {
                    debug!("Skipping undefined instruction {:#06x}", word);
                }
                system::no_op(state)
            }
            Instruction::Jump { address } => program_flow::jump(state, address),
            Instruction::Call { address } => program_flow::call(state, address, self.word())?,
            Instruction::SkipIfEqual { reg, value } => {
                program_flow::skip_if_equal(state, reg, value)
            }
            Instruction::SkipIfNotEqual { reg, value } => {
                program_flow::skip_if_not_equal(state, reg, value)
            }
            Instruction::SkipIfRegistersEqual { x, y } => {
                program_flow::skip_if_registers_equal(state, x, y)
            }
            Instruction::SkipIfRegistersNotEqual { x, y } => {
                program_flow::skip_if_registers_not_equal(state, x, y)
            }
            Instruction::JumpWithOffset { address } => {
                program_flow::jump_with_offset(state, address)
            }
            Instruction::SkipIfKeyPressed { reg } => {
                program_flow::skip_if_key_pressed(state, reg)
            }
            Instruction::SkipIfKeyNotPressed { reg } => {
                program_flow::skip_if_key_not_pressed(state, reg)
            }
            Instruction::LoadValue { reg, value } => {
                arithmetic_and_logic::load_value(state, reg, value)
            }
            Instruction::AddValue { reg, value } => {
                arithmetic_and_logic::add_value(state, reg, value)
            }
            Instruction::Alu { x, y, operation } => {
                arithmetic_and_logic::alu(state, x, y, operation)
            }
            Instruction::LoadIndex { address } => arithmetic_and_logic::load_index(state, address),
            Instruction::Random { reg, mask } => arithmetic_and_logic::random(state, reg, mask),
            Instruction::Draw { x, y, height } => draw::draw_sprite(state, x, y, height),
            Instruction::LoadDelayTimer { reg } => {
                arithmetic_and_logic::load_delay_timer(state, reg)
            }
            Instruction::WaitForKey { reg } => {
                return Ok(arithmetic_and_logic::wait_for_key(state, reg));
            }
            Instruction::SetDelayTimer { reg } => {
                arithmetic_and_logic::set_delay_timer(state, reg)
            }
            Instruction::SetSoundTimer { reg } => {
                arithmetic_and_logic::set_sound_timer(state, reg)
            }
            Instruction::AddToIndex { reg } => arithmetic_and_logic::add_to_index(state, reg),
            Instruction::LoadGlyph { reg } => arithmetic_and_logic::load_glyph(state, reg),
            Instruction::StoreBcd { reg } => arithmetic_and_logic::store_bcd(state, reg),
            Instruction::StoreRegisters { last } => {
                arithmetic_and_logic::store_registers(state, last)
            }
            Instruction::LoadRegisters { last } => {
                arithmetic_and_logic::load_registers(state, last)
            }
        };

        Ok(Flow::Continue)
    }
}

/// What the cycle should do after an instruction was executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Flow {
    /// The instruction completed; the timers may be updated.
    Continue,

    /// A blocking key read found no key pressed. The program counter was not
    /// advanced and the rest of the cycle must be skipped.
    AwaitingKey,
}

/// The register-register operations of the 0x8 instruction class, keyed by the
/// least significant nibble.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum AluOperation {
    Load,
    Or,
    And,
    Xor,
    Add,
    Sub,
    ShiftRight,
    SubReversed,
    ShiftLeft,
}

/// A decoded opcode. Register operands are nibbles, values are bytes and
/// addresses are 12 bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Instruction {
    /// 00E0
    ClearDisplay,
    /// 00EE
    Return,
    /// 0nnn, a machine code routine; executed as a no-op.
    Sys { address: u16 },
    /// 1nnn
    Jump { address: u16 },
    /// 2nnn
    Call { address: u16 },
    /// 3xkk
    SkipIfEqual { reg: u8, value: u8 },
    /// 4xkk
    SkipIfNotEqual { reg: u8, value: u8 },
    /// 5xy0
    SkipIfRegistersEqual { x: u8, y: u8 },
    /// 6xkk
    LoadValue { reg: u8, value: u8 },
    /// 7xkk
    AddValue { reg: u8, value: u8 },
    /// 8xyN
    Alu { x: u8, y: u8, operation: AluOperation },
    /// 9xy0
    SkipIfRegistersNotEqual { x: u8, y: u8 },
    /// Annn
    LoadIndex { address: u16 },
    /// Bnnn
    JumpWithOffset { address: u16 },
    /// Cxkk
    Random { reg: u8, mask: u8 },
    /// Dxyn
    Draw { x: u8, y: u8, height: u8 },
    /// Ex9E
    SkipIfKeyPressed { reg: u8 },
    /// ExA1
    SkipIfKeyNotPressed { reg: u8 },
    /// Fx07
    LoadDelayTimer { reg: u8 },
    /// Fx0A
    WaitForKey { reg: u8 },
    /// Fx15
    SetDelayTimer { reg: u8 },
    /// Fx18
    SetSoundTimer { reg: u8 },
    /// Fx1E
    AddToIndex { reg: u8 },
    /// Fx29
    LoadGlyph { reg: u8 },
    /// Fx33
    StoreBcd { reg: u8 },
    /// Fx55
    StoreRegisters { last: u8 },
    /// Fx65
    LoadRegisters { last: u8 },
    /// Any instruction word outside of the instruction set; executed as a no-op.
    Undefined(u16),
}

impl From<Opcode> for Instruction {
    fn from(opcode: Opcode) -> Instruction {
        let payload = opcode.payload;
        let address = payload.address();
        let (reg, value) = payload.reg_and_value();
        let (x, y, n) = payload.operands();

        match opcode.instruction_class {
            0x0 => match address {
                0x0E0 => Instruction::ClearDisplay,
                0x0EE => Instruction::Return,
                _ => Instruction::Sys { address },
            },
            0x1 => Instruction::Jump { address },
            0x2 => Instruction::Call { address },
            0x3 => Instruction::SkipIfEqual { reg, value },
            0x4 => Instruction::SkipIfNotEqual { reg, value },
            0x5 if n == 0 => Instruction::SkipIfRegistersEqual { x, y },
            0x6 => Instruction::LoadValue { reg, value },
            0x7 => Instruction::AddValue { reg, value },
            0x8 => {
                let operation = match n {
                    0x0 => AluOperation::Load,
                    0x1 => AluOperation::Or,
                    0x2 => AluOperation::And,
                    0x3 => AluOperation::Xor,
                    0x4 => AluOperation::Add,
                    0x5 => AluOperation::Sub,
                    0x6 => AluOperation::ShiftRight,
                    0x7 => AluOperation::SubReversed,
                    0xE => AluOperation::ShiftLeft,
                    _ => return Instruction::Undefined(opcode.word()),
                };
                Instruction::Alu { x, y, operation }
            }
            0x9 if n == 0 => Instruction::SkipIfRegistersNotEqual { x, y },
            0xA => Instruction::LoadIndex { address },
            0xB => Instruction::JumpWithOffset { address },
            0xC => Instruction::Random { reg, mask: value },
            0xD => Instruction::Draw { x, y, height: n },
            0xE => match value {
                0x9E => Instruction::SkipIfKeyPressed { reg },
                0xA1 => Instruction::SkipIfKeyNotPressed { reg },
                _ => Instruction::Undefined(opcode.word()),
            },
            0xF => match value {
                0x07 => Instruction::LoadDelayTimer { reg },
                0x0A => Instruction::WaitForKey { reg },
                0x15 => Instruction::SetDelayTimer { reg },
                0x18 => Instruction::SetSoundTimer { reg },
                0x1E => Instruction::AddToIndex { reg },
                0x29 => Instruction::LoadGlyph { reg },
                0x33 => Instruction::StoreBcd { reg },
                0x55 => Instruction::StoreRegisters { last: reg },
                0x65 => Instruction::LoadRegisters { last: reg },
                _ => Instruction::Undefined(opcode.word()),
            },
            _ => Instruction::Undefined(opcode.word()),
        }
    }
}

impl std::fmt::Display for Opcode {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "Opcode with instruction_class: {} and payload: {}.",
            self.instruction_class, self.payload
        )
    }
}

impl std::fmt::Display for OpcodePayload {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "[{}, {}, {}]",
            self.bytes[0], self.bytes[1], self.bytes[2]
        )
    }
}
