use crate::cpu::{Bus, Cpu, Operand8, RegisterPair};
use crate::error::Result;

impl Cpu {
    pub(super) fn exec_ld_r_d8<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> Result<u32> {
        debug_assert!(matches!(
            opcode,
            0x06 | 0x0E | 0x16 | 0x1E | 0x26 | 0x2E | 0x36 | 0x3E
        ));

        let dst = Operand8::from_bits(opcode >> 3);
        let value = self.fetch8(bus)?;
        self.write_operand(bus, dst, value)?;
        Ok(2 + dst.access_cost())
    }

    pub(super) fn exec_ld_r_r<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> Result<u32> {
        debug_assert!((0x40..=0x7F).contains(&opcode) && opcode != 0x76);

        let dst = Operand8::from_bits(opcode >> 3);
        let src = Operand8::from_bits(opcode);
        let value = self.read_operand(bus, src)?;
        self.write_operand(bus, dst, value)?;
        Ok(1 + dst.access_cost() + src.access_cost())
    }

    pub(super) fn exec_ld_rr_d16<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> Result<u32> {
        debug_assert!(matches!(opcode, 0x01 | 0x11 | 0x21 | 0x31));

        let value = self.fetch16(bus)?;
        RegisterPair::RR[((opcode >> 4) & 0x03) as usize].set(&mut self.regs, value);
        Ok(3)
    }

    /// Address for LD (rr),A / LD A,(rr): BC, DE, HL+ or HL-.
    fn indirect_addr(&mut self, opcode: u8) -> u16 {
        match (opcode >> 4) & 0x03 {
            0 => self.regs.bc(),
            1 => self.regs.de(),
            2 => {
                let hl = self.regs.hl();
                self.regs.set_hl(hl.wrapping_add(1));
                hl
            }
            _ => {
                let hl = self.regs.hl();
                self.regs.set_hl(hl.wrapping_sub(1));
                hl
            }
        }
    }

    pub(super) fn exec_ld_indirect_a<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> Result<u32> {
        debug_assert!(matches!(opcode, 0x02 | 0x12 | 0x22 | 0x32));

        let addr = self.indirect_addr(opcode);
        bus.write8(addr, self.regs.a)?;
        Ok(2)
    }

    pub(super) fn exec_ld_a_indirect<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> Result<u32> {
        debug_assert!(matches!(opcode, 0x0A | 0x1A | 0x2A | 0x3A));

        let addr = self.indirect_addr(opcode);
        self.regs.a = bus.read8(addr)?;
        Ok(2)
    }

    pub(super) fn exec_ld_a16_sp<B: Bus>(&mut self, bus: &mut B) -> Result<u32> {
        let addr = self.fetch16(bus)?;
        let [lo, hi] = self.regs.sp.to_le_bytes();
        bus.write8(addr, lo)?;
        bus.write8(addr.wrapping_add(1), hi)?;
        Ok(5)
    }

    pub(super) fn exec_ldh_a8<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> Result<u32> {
        debug_assert!(matches!(opcode, 0xE0 | 0xF0));

        let addr = 0xFF00 | self.fetch8(bus)? as u16;
        if opcode == 0xE0 {
            bus.write8(addr, self.regs.a)?;
        } else {
            self.regs.a = bus.read8(addr)?;
        }
        Ok(3)
    }

    pub(super) fn exec_ldh_c<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> Result<u32> {
        debug_assert!(matches!(opcode, 0xE2 | 0xF2));

        let addr = 0xFF00 | self.regs.c as u16;
        if opcode == 0xE2 {
            bus.write8(addr, self.regs.a)?;
        } else {
            self.regs.a = bus.read8(addr)?;
        }
        Ok(2)
    }

    pub(super) fn exec_ld_a16<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> Result<u32> {
        debug_assert!(matches!(opcode, 0xEA | 0xFA));

        let addr = self.fetch16(bus)?;
        if opcode == 0xEA {
            bus.write8(addr, self.regs.a)?;
        } else {
            self.regs.a = bus.read8(addr)?;
        }
        Ok(4)
    }

    #[inline]
    pub(super) fn exec_ld_sp_hl(&mut self) -> u32 {
        self.regs.sp = self.regs.hl();
        2
    }
}
