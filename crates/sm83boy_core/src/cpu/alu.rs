use super::{Cpu, Flags};

/// Flag-derivation family shared by several operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AluFamily {
    Add,
    Sub,
    And,
    /// OR and XOR.
    Or,
}

impl AluFamily {
    pub fn half_carry(self, left: u8, right: u8, carry: u8) -> bool {
        match self {
            AluFamily::Add => ((left & 0x0F) + (right & 0x0F) + carry) & 0x10 != 0,
            AluFamily::Sub => {
                ((left & 0x0F) as i16 - (right & 0x0F) as i16 - carry as i16) & 0x10 != 0
            }
            AluFamily::And => true,
            AluFamily::Or => false,
        }
    }

    pub fn carry(self, left: u8, right: u8, carry: u8) -> bool {
        match self {
            AluFamily::Add => left as u16 + right as u16 + carry as u16 > 0xFF,
            AluFamily::Sub => right as u16 + carry as u16 > left as u16,
            AluFamily::And | AluFamily::Or => false,
        }
    }

    #[inline]
    pub fn subtract(self) -> bool {
        self == AluFamily::Sub
    }
}

/// The eight accumulator operators of `10ooo_xxx` / `11ooo_110`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AluOp {
    Add,
    Adc,
    Sub,
    Sbc,
    And,
    Xor,
    Or,
    Cp,
}

/// Result byte and complete flag set of an [`AluOp`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AluOutput {
    pub value: u8,
    pub flags: Flags,
}

impl AluOp {
    pub const TABLE: [AluOp; 8] = [
        AluOp::Add,
        AluOp::Adc,
        AluOp::Sub,
        AluOp::Sbc,
        AluOp::And,
        AluOp::Xor,
        AluOp::Or,
        AluOp::Cp,
    ];

    #[inline]
    pub fn from_bits(bits: u8) -> Self {
        Self::TABLE[(bits & 0x07) as usize]
    }

    pub fn family(self) -> AluFamily {
        match self {
            AluOp::Add | AluOp::Adc => AluFamily::Add,
            AluOp::Sub | AluOp::Sbc | AluOp::Cp => AluFamily::Sub,
            AluOp::And => AluFamily::And,
            AluOp::Xor | AluOp::Or => AluFamily::Or,
        }
    }

    #[inline]
    pub fn uses_carry(self) -> bool {
        matches!(self, AluOp::Adc | AluOp::Sbc)
    }

    /// CP only sets flags.
    #[inline]
    pub fn writes_result(self) -> bool {
        self != AluOp::Cp
    }

    /// Compute `left <op> right` with the incoming carry flag.
    pub fn apply(self, left: u8, right: u8, carry_flag: bool) -> AluOutput {
        let carry = u8::from(self.uses_carry() && carry_flag);
        let value = match self {
            AluOp::Add | AluOp::Adc => left.wrapping_add(right).wrapping_add(carry),
            AluOp::Sub | AluOp::Sbc | AluOp::Cp => left.wrapping_sub(right).wrapping_sub(carry),
            AluOp::And => left & right,
            AluOp::Xor => left ^ right,
            AluOp::Or => left | right,
        };

        let family = self.family();
        let mut flags = Flags::empty();
        flags.set(Flags::Z, value == 0);
        flags.set(Flags::N, family.subtract());
        flags.set(Flags::H, family.half_carry(left, right, carry));
        flags.set(Flags::C, family.carry(left, right, carry));
        AluOutput { value, flags }
    }
}

impl Cpu {
    /// Run an accumulator operator against `value`.
    #[inline]
    pub(super) fn alu_apply(&mut self, op: AluOp, value: u8) {
        let out = op.apply(self.regs.a, value, self.flag(Flags::C));
        if op.writes_result() {
            self.regs.a = out.value;
        }
        self.regs.f = out.flags;
    }

    /// Decimal adjust accumulator after BCD addition/subtraction.
    ///
    /// N is left unchanged and H is cleared. C is only ever set, never
    /// cleared, because a correction of the tens digit implies a carry.
    pub(super) fn alu_daa(&mut self) {
        let subtract = self.flag(Flags::N);
        let a = self.regs.a;

        let mut correction = 0u8;
        if self.flag(Flags::H) || (!subtract && (a & 0x0F) > 0x09) {
            correction |= 0x06;
        }
        if self.flag(Flags::C) || (!subtract && a > 0x99) {
            correction |= 0x60;
            self.set_flag(Flags::C, true);
        }

        let result = if subtract {
            a.wrapping_sub(correction)
        } else {
            a.wrapping_add(correction)
        };

        self.set_flag(Flags::Z, result == 0);
        self.set_flag(Flags::H, false);
        self.regs.a = result;
    }

    /// INC r / INC (HL). C is unchanged.
    #[inline]
    pub(super) fn alu_inc8(&mut self, value: u8) -> u8 {
        let result = value.wrapping_add(1);
        self.set_flag(Flags::Z, result == 0);
        self.set_flag(Flags::N, false);
        self.set_flag(Flags::H, AluFamily::Add.half_carry(value, 1, 0));
        result
    }

    /// DEC r / DEC (HL). C is unchanged.
    #[inline]
    pub(super) fn alu_dec8(&mut self, value: u8) -> u8 {
        let result = value.wrapping_sub(1);
        self.set_flag(Flags::Z, result == 0);
        self.set_flag(Flags::N, true);
        self.set_flag(Flags::H, AluFamily::Sub.half_carry(value, 1, 0));
        result
    }

    /// `ADD HL,rr`: H from bit 11, C from bit 15, Z unaffected.
    #[inline]
    pub(super) fn alu_add16_hl(&mut self, value: u16) {
        let hl = self.regs.hl();

        self.set_flag(Flags::N, false);
        self.set_flag(Flags::H, (hl & 0x0FFF) + (value & 0x0FFF) > 0x0FFF);
        self.set_flag(Flags::C, hl as u32 + value as u32 > 0xFFFF);

        self.regs.set_hl(hl.wrapping_add(value));
    }

    /// Signed 8-bit immediate added to a 16-bit base (ADD SP,e and
    /// LD HL,SP+e). Z and N are cleared; H and C come from the unsigned
    /// low-byte addition.
    #[inline]
    pub(super) fn alu_add16_signed(&mut self, base: u16, imm8: u8) -> u16 {
        let low = base as u8;
        self.set_flag(Flags::Z, false);
        self.set_flag(Flags::N, false);
        self.set_flag(Flags::H, AluFamily::Add.half_carry(low, imm8, 0));
        self.set_flag(Flags::C, AluFamily::Add.carry(low, imm8, 0));
        base.wrapping_add(imm8 as i8 as u16)
    }
}
