use super::{Bus, Cpu, Reg8};
use crate::error::Result;

/// 8-bit operand selected by a 3-bit register field: a plain register or
/// the byte at address HL.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operand8 {
    Reg(Reg8),
    HlIndirect,
}

impl Operand8 {
    /// Register field encoding: 0=B, 1=C, 2=D, 3=E, 4=H, 5=L, 6=(HL), 7=A.
    pub const TABLE: [Operand8; 8] = [
        Operand8::Reg(Reg8::B),
        Operand8::Reg(Reg8::C),
        Operand8::Reg(Reg8::D),
        Operand8::Reg(Reg8::E),
        Operand8::Reg(Reg8::H),
        Operand8::Reg(Reg8::L),
        Operand8::HlIndirect,
        Operand8::Reg(Reg8::A),
    ];

    /// Decode the low three bits of `bits`.
    #[inline]
    pub fn from_bits(bits: u8) -> Self {
        Self::TABLE[(bits & 0x07) as usize]
    }

    /// Extra M-cycles for each access through this operand.
    #[inline]
    pub const fn access_cost(self) -> u32 {
        match self {
            Operand8::Reg(_) => 0,
            Operand8::HlIndirect => 1,
        }
    }
}

impl Cpu {
    #[inline]
    pub(super) fn read_operand<B: Bus>(&mut self, bus: &mut B, operand: Operand8) -> Result<u8> {
        match operand {
            Operand8::Reg(reg) => Ok(reg.get(&self.regs)),
            Operand8::HlIndirect => bus.read8(self.regs.hl()),
        }
    }

    #[inline]
    pub(super) fn write_operand<B: Bus>(
        &mut self,
        bus: &mut B,
        operand: Operand8,
        value: u8,
    ) -> Result<()> {
        match operand {
            Operand8::Reg(reg) => {
                reg.set(&mut self.regs, value);
                Ok(())
            }
            Operand8::HlIndirect => bus.write8(self.regs.hl(), value),
        }
    }
}
