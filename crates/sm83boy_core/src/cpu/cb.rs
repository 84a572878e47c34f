use super::{Bus, Cpu, Flags, Operand8};
use crate::error::Result;

/// Rotate/shift family of the CB table (`00bbb_xxx`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShiftOp {
    Rlc,
    Rrc,
    Rl,
    Rr,
    Sla,
    Sra,
    Swap,
    Srl,
}

impl ShiftOp {
    pub const TABLE: [ShiftOp; 8] = [
        ShiftOp::Rlc,
        ShiftOp::Rrc,
        ShiftOp::Rl,
        ShiftOp::Rr,
        ShiftOp::Sla,
        ShiftOp::Sra,
        ShiftOp::Swap,
        ShiftOp::Srl,
    ];

    #[inline]
    pub fn from_bits(bits: u8) -> Self {
        Self::TABLE[(bits & 0x07) as usize]
    }

    /// Returns the shifted value and the carry out. RL and RR rotate
    /// through `carry_in`; SWAP always clears carry.
    pub fn apply(self, value: u8, carry_in: bool) -> (u8, bool) {
        match self {
            ShiftOp::Rlc => (value.rotate_left(1), value & 0x80 != 0),
            ShiftOp::Rrc => (value.rotate_right(1), value & 0x01 != 0),
            ShiftOp::Rl => ((value << 1) | u8::from(carry_in), value & 0x80 != 0),
            ShiftOp::Rr => ((value >> 1) | (u8::from(carry_in) << 7), value & 0x01 != 0),
            ShiftOp::Sla => (value << 1, value & 0x80 != 0),
            // Arithmetic shift keeps the sign bit.
            ShiftOp::Sra => ((value >> 1) | (value & 0x80), value & 0x01 != 0),
            ShiftOp::Swap => (value.rotate_left(4), false),
            ShiftOp::Srl => (value >> 1, value & 0x01 != 0),
        }
    }
}

impl Cpu {
    /// Handle CB-prefixed instructions (rotates, shifts and bit operations).
    ///
    /// Every second byte is defined. Read-modify-write forms on (HL) access
    /// memory twice; BIT only reads.
    pub(super) fn step_cb<B: Bus>(&mut self, bus: &mut B) -> Result<u32> {
        let cb = self.fetch8(bus)?;
        let y = (cb >> 3) & 0x07;
        let target = Operand8::from_bits(cb);
        let cost = target.access_cost();
        let value = self.read_operand(bus, target)?;

        match cb >> 6 {
            0 => {
                let (result, carry) = ShiftOp::from_bits(y).apply(value, self.flag(Flags::C));
                self.write_operand(bus, target, result)?;
                self.regs.f = Flags::empty();
                self.set_flag(Flags::Z, result == 0);
                self.set_flag(Flags::C, carry);
                Ok(2 + 2 * cost)
            }
            1 => {
                // BIT b,r: C is preserved.
                self.set_flag(Flags::Z, value & (1 << y) == 0);
                self.set_flag(Flags::N, false);
                self.set_flag(Flags::H, true);
                Ok(2 + cost)
            }
            2 => {
                self.write_operand(bus, target, value & !(1 << y))?;
                Ok(2 + 2 * cost)
            }
            _ => {
                self.write_operand(bus, target, value | (1 << y))?;
                Ok(2 + 2 * cost)
            }
        }
    }
}
