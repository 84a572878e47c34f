use crate::cpu::{Bus, Cpu};
use crate::error::Result;

impl Cpu {
    pub(super) fn exec_jr_cc<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> Result<u32> {
        debug_assert!(matches!(opcode, 0x20 | 0x28 | 0x30 | 0x38));

        let taken = self.condition(opcode >> 3);
        self.jr(bus, taken)
    }

    pub(super) fn exec_jp_cc<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> Result<u32> {
        debug_assert!(matches!(opcode, 0xC2 | 0xCA | 0xD2 | 0xDA));

        let taken = self.condition(opcode >> 3);
        self.jp_cond(bus, taken)
    }

    pub(super) fn exec_call_cc<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> Result<u32> {
        debug_assert!(matches!(opcode, 0xC4 | 0xCC | 0xD4 | 0xDC));

        let taken = self.condition(opcode >> 3);
        self.call_cond(bus, taken)
    }

    pub(super) fn exec_ret_cc<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> Result<u32> {
        debug_assert!(matches!(opcode, 0xC0 | 0xC8 | 0xD0 | 0xD8));

        let taken = self.condition(opcode >> 3);
        self.ret_cond(bus, taken)
    }

    #[inline]
    pub(super) fn exec_jp_hl(&mut self) -> u32 {
        self.regs.pc = self.regs.hl();
        1
    }
}
