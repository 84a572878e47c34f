use super::{Bus, Cpu, Flags};
use crate::error::Result;

impl Cpu {
    #[inline]
    pub(super) fn fetch8<B: Bus>(&mut self, bus: &mut B) -> Result<u8> {
        let value = bus.read8(self.regs.pc)?;
        self.regs.pc = self.regs.pc.wrapping_add(1);
        Ok(value)
    }

    #[inline]
    pub(super) fn fetch16<B: Bus>(&mut self, bus: &mut B) -> Result<u16> {
        let lo = self.fetch8(bus)?;
        let hi = self.fetch8(bus)?;
        Ok(u16::from_le_bytes([lo, hi]))
    }

    /// Stack grows downward: high byte first, so the low byte ends up at
    /// the lower address.
    #[inline]
    pub(super) fn push_u16<B: Bus>(&mut self, bus: &mut B, value: u16) -> Result<()> {
        let [lo, hi] = value.to_le_bytes();
        self.regs.sp = self.regs.sp.wrapping_sub(1);
        bus.write8(self.regs.sp, hi)?;
        self.regs.sp = self.regs.sp.wrapping_sub(1);
        bus.write8(self.regs.sp, lo)
    }

    #[inline]
    pub(super) fn pop_u16<B: Bus>(&mut self, bus: &mut B) -> Result<u16> {
        let lo = bus.read8(self.regs.sp)?;
        self.regs.sp = self.regs.sp.wrapping_add(1);
        let hi = bus.read8(self.regs.sp)?;
        self.regs.sp = self.regs.sp.wrapping_add(1);
        Ok(u16::from_le_bytes([lo, hi]))
    }

    /// Condition field `cc`: 0=NZ, 1=Z, 2=NC, 3=C.
    #[inline]
    pub(super) fn condition(&self, cc: u8) -> bool {
        match cc & 0x03 {
            0 => !self.flag(Flags::Z),
            1 => self.flag(Flags::Z),
            2 => !self.flag(Flags::C),
            _ => self.flag(Flags::C),
        }
    }

    /// JR e / JR cc,e. The displacement is relative to the address after
    /// the operand.
    #[inline]
    pub(super) fn jr<B: Bus>(&mut self, bus: &mut B, taken: bool) -> Result<u32> {
        let offset = self.fetch8(bus)? as i8;
        if taken {
            self.regs.pc = self.regs.pc.wrapping_add(offset as u16);
            Ok(3)
        } else {
            Ok(2)
        }
    }

    #[inline]
    pub(super) fn jp_cond<B: Bus>(&mut self, bus: &mut B, taken: bool) -> Result<u32> {
        let addr = self.fetch16(bus)?;
        if taken {
            self.regs.pc = addr;
            Ok(4)
        } else {
            Ok(3)
        }
    }

    #[inline]
    pub(super) fn call_cond<B: Bus>(&mut self, bus: &mut B, taken: bool) -> Result<u32> {
        let addr = self.fetch16(bus)?;
        if taken {
            let ret = self.regs.pc;
            self.push_u16(bus, ret)?;
            self.regs.pc = addr;
            Ok(6)
        } else {
            Ok(3)
        }
    }

    #[inline]
    pub(super) fn ret_cond<B: Bus>(&mut self, bus: &mut B, taken: bool) -> Result<u32> {
        if taken {
            self.regs.pc = self.pop_u16(bus)?;
            Ok(5)
        } else {
            Ok(2)
        }
    }
}
