mod alu;
mod cb;
mod exec;
mod helpers;
mod init;
mod operand;
mod regs;
mod step;


pub use alu::{AluFamily, AluOp, AluOutput};
pub use cb::ShiftOp;
pub use operand::Operand8;
pub use regs::{Flags, Reg8, RegisterPair, Registers};

use crate::error::Result;
use crate::interrupts::InterruptController;

/// Abstraction over the memory bus as seen by the CPU.
///
/// Accesses are fallible: an address outside every mapped range, or a
/// cartridge feature this core does not emulate, stops emulation.
pub trait Bus {
    fn read8(&mut self, addr: u16) -> Result<u8>;
    fn write8(&mut self, addr: u16, value: u8) -> Result<()>;

    /// IF/IE/IME. Shared with the 0xFF0F/0xFFFF registers and the timer.
    fn interrupts(&self) -> &InterruptController;
    fn interrupts_mut(&mut self) -> &mut InterruptController;

    /// Advance bus-side peripherals by a number of clock (T) cycles.
    ///
    /// Does nothing by default.
    fn tick(&mut self, _cycles: u32) {}
}

/// SM83 CPU state.
///
/// Instruction costs are returned in M-cycles.
#[derive(Clone, Debug)]
pub struct Cpu {
    pub regs: Registers,
    pub halted: bool,
    /// Set by EI; IME is raised once the following instruction retires.
    ime_enable_pending: bool,
}

impl Cpu {
    #[inline]
    pub fn flag(&self, flag: Flags) -> bool {
        self.regs.f.contains(flag)
    }

    #[inline]
    pub fn set_flag(&mut self, flag: Flags, value: bool) {
        self.regs.f.set(flag, value);
    }

    /// True while an EI is waiting for the next instruction to retire.
    #[inline]
    pub fn ime_enable_pending(&self) -> bool {
        self.ime_enable_pending
    }
}
