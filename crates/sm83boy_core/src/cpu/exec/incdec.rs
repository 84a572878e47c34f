use crate::cpu::{Bus, Cpu, Operand8, RegisterPair};
use crate::error::Result;

impl Cpu {
    /// INC r / INC (HL). The (HL) form reads and writes memory, so it pays
    /// the access cost twice.
    pub(super) fn exec_inc8<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> Result<u32> {
        let target = Operand8::from_bits(opcode >> 3);
        let value = self.read_operand(bus, target)?;
        let result = self.alu_inc8(value);
        self.write_operand(bus, target, result)?;
        Ok(1 + 2 * target.access_cost())
    }

    pub(super) fn exec_dec8<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> Result<u32> {
        let target = Operand8::from_bits(opcode >> 3);
        let value = self.read_operand(bus, target)?;
        let result = self.alu_dec8(value);
        self.write_operand(bus, target, result)?;
        Ok(1 + 2 * target.access_cost())
    }

    pub(super) fn exec_inc16(&mut self, opcode: u8) -> u32 {
        debug_assert!(matches!(opcode, 0x03 | 0x13 | 0x23 | 0x33));

        let pair = RegisterPair::RR[((opcode >> 4) & 0x03) as usize];
        let value = pair.get(&self.regs).wrapping_add(1);
        pair.set(&mut self.regs, value);
        2
    }

    pub(super) fn exec_dec16(&mut self, opcode: u8) -> u32 {
        debug_assert!(matches!(opcode, 0x0B | 0x1B | 0x2B | 0x3B));

        let pair = RegisterPair::RR[((opcode >> 4) & 0x03) as usize];
        let value = pair.get(&self.regs).wrapping_sub(1);
        pair.set(&mut self.regs, value);
        2
    }
}
