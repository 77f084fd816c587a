//! A virtual machine for the CHIP-8 instruction set. The implementation follows the
//! instruction set described [here](https://en.wikipedia.org/wiki/CHIP-8#Opcode_table)
//! and only covers the base instruction set, no SUPER-CHIP extensions.
//!
//! The machine itself is driven from the outside: a driver calls
//! [`chip::Chip::cycle`] at whatever cadence it likes, injects key presses through the
//! input pins and renders the output pins. A text user interface built on cursive
//! ships as the `emulator_text_ui` binary.
pub mod chip;
