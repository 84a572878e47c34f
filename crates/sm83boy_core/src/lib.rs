//! Sharp SM83 (Game Boy DMG) CPU core.
//!
//! The crate is split the same way the hardware is: [`cpu`] holds the
//! register file and the instruction engine, [`interrupts`] the IF/IE/IME
//! controller shared by CPU and bus, and [`machine`] the memory map,
//! cartridge, timer, serial port and the [`GameBoy`] driver tying them
//! together.

pub mod cpu;
mod error;
pub mod interrupts;
pub mod machine;

pub use error::{Access, CartridgeFeature, Error, Result};
pub use machine::GameBoy;

/// Clock cycles per machine cycle. Instruction costs are in M-cycles.
pub const T_CYCLES_PER_M_CYCLE: u32 = 4;
/// DMG master clock frequency in Hz.
pub const CLOCK_HZ: u32 = 4_194_304;
