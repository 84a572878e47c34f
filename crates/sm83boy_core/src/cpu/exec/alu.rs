use crate::cpu::{AluOp, Bus, Cpu, Flags, Operand8, RegisterPair, ShiftOp};
use crate::error::Result;

impl Cpu {
    pub(super) fn exec_alu_r<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> Result<u32> {
        debug_assert!((0x80..=0xBF).contains(&opcode));

        let src = Operand8::from_bits(opcode);
        let value = self.read_operand(bus, src)?;
        self.alu_apply(AluOp::from_bits(opcode >> 3), value);
        Ok(1 + src.access_cost())
    }

    pub(super) fn exec_alu_d8<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> Result<u32> {
        debug_assert!(matches!(
            opcode,
            0xC6 | 0xCE | 0xD6 | 0xDE | 0xE6 | 0xEE | 0xF6 | 0xFE
        ));

        let value = self.fetch8(bus)?;
        self.alu_apply(AluOp::from_bits(opcode >> 3), value);
        Ok(2)
    }

    pub(super) fn exec_add_hl_rr(&mut self, opcode: u8) -> u32 {
        debug_assert!(matches!(opcode, 0x09 | 0x19 | 0x29 | 0x39));

        let value = RegisterPair::RR[((opcode >> 4) & 0x03) as usize].get(&self.regs);
        self.alu_add16_hl(value);
        2
    }

    pub(super) fn exec_add_sp_r8<B: Bus>(&mut self, bus: &mut B) -> Result<u32> {
        let imm = self.fetch8(bus)?;
        self.regs.sp = self.alu_add16_signed(self.regs.sp, imm);
        Ok(4)
    }

    pub(super) fn exec_ld_hl_sp_r8<B: Bus>(&mut self, bus: &mut B) -> Result<u32> {
        let imm = self.fetch8(bus)?;
        let value = self.alu_add16_signed(self.regs.sp, imm);
        self.regs.set_hl(value);
        Ok(3)
    }

    /// RLCA, RRCA, RLA, RRA. Unlike their CB forms, Z is always cleared.
    pub(super) fn exec_rotate_a(&mut self, opcode: u8) -> u32 {
        debug_assert!(matches!(opcode, 0x07 | 0x0F | 0x17 | 0x1F));

        let op = ShiftOp::from_bits(opcode >> 3);
        let (value, carry) = op.apply(self.regs.a, self.flag(Flags::C));
        self.regs.a = value;
        self.regs.f = Flags::empty();
        self.set_flag(Flags::C, carry);
        1
    }

    pub(super) fn exec_cpl(&mut self) -> u32 {
        self.regs.a = !self.regs.a;
        self.set_flag(Flags::N, true);
        self.set_flag(Flags::H, true);
        1
    }

    pub(super) fn exec_scf(&mut self) -> u32 {
        self.set_flag(Flags::N, false);
        self.set_flag(Flags::H, false);
        self.set_flag(Flags::C, true);
        1
    }

    pub(super) fn exec_ccf(&mut self) -> u32 {
        let carry = self.flag(Flags::C);
        self.set_flag(Flags::N, false);
        self.set_flag(Flags::H, false);
        self.set_flag(Flags::C, !carry);
        1
    }
}
