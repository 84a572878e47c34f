use crate::cpu::{Bus, Cpu, RegisterPair};
use crate::error::Result;

impl Cpu {
    pub(super) fn exec_push<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> Result<u32> {
        debug_assert!(matches!(opcode, 0xC5 | 0xD5 | 0xE5 | 0xF5));

        let value = RegisterPair::STACK[((opcode >> 4) & 0x03) as usize].get(&self.regs);
        self.push_u16(bus, value)?;
        Ok(4)
    }

    /// POP AF drops the low nibble of F through the flag mask.
    pub(super) fn exec_pop<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> Result<u32> {
        debug_assert!(matches!(opcode, 0xC1 | 0xD1 | 0xE1 | 0xF1));

        let value = self.pop_u16(bus)?;
        RegisterPair::STACK[((opcode >> 4) & 0x03) as usize].set(&mut self.regs, value);
        Ok(3)
    }

    pub(super) fn exec_rst<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> Result<u32> {
        debug_assert!(opcode & 0xC7 == 0xC7);

        let ret = self.regs.pc;
        self.push_u16(bus, ret)?;
        self.regs.pc = (opcode & 0x38) as u16;
        Ok(4)
    }

    pub(super) fn exec_ret<B: Bus>(&mut self, bus: &mut B) -> Result<u32> {
        self.regs.pc = self.pop_u16(bus)?;
        Ok(4)
    }

    /// RETI enables interrupts immediately, without EI's delay.
    pub(super) fn exec_reti<B: Bus>(&mut self, bus: &mut B) -> Result<u32> {
        self.regs.pc = self.pop_u16(bus)?;
        bus.interrupts_mut().set_master_enable(true);
        Ok(4)
    }
}
