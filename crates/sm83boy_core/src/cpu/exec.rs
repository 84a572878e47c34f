mod alu;
mod control;
mod incdec;
mod ld;
mod stack;
mod system;

use super::{Bus, Cpu};
use crate::error::{Error, Result};

impl Cpu {
    /// Decode and execute a single (non-CB) opcode, returning its cost in
    /// M-cycles.
    ///
    /// Decoding works over the bit-field groups of the opcode map. Arms are
    /// ordered so that specific encodings (HALT inside the `01xxxyyy` load
    /// block, the CB prefix) win over the group patterns that would
    /// otherwise match them.
    pub(super) fn exec_opcode<B: Bus>(&mut self, bus: &mut B, opcode: u8) -> Result<u32> {
        match opcode {
            0x00 => Ok(1),
            0x10 => self.exec_stop(bus),
            0x76 => Ok(self.exec_halt()),
            0xF3 => self.exec_di(bus),
            0xFB => Ok(self.exec_ei()),
            0xCB => self.step_cb(bus),

            op if op & 0b1100_0111 == 0b0000_0110 => self.exec_ld_r_d8(bus, op),
            op if op & 0b1100_0000 == 0b0100_0000 => self.exec_ld_r_r(bus, op),
            op if op & 0b1100_0111 == 0b0000_0100 => self.exec_inc8(bus, op),
            op if op & 0b1100_0111 == 0b0000_0101 => self.exec_dec8(bus, op),
            op if op & 0b1100_1111 == 0b0000_0001 => self.exec_ld_rr_d16(bus, op),
            op if op & 0b1100_1111 == 0b0000_0011 => Ok(self.exec_inc16(op)),
            op if op & 0b1100_1111 == 0b0000_1011 => Ok(self.exec_dec16(op)),
            op if op & 0b1100_1111 == 0b0000_0010 => self.exec_ld_indirect_a(bus, op),
            op if op & 0b1100_1111 == 0b0000_1010 => self.exec_ld_a_indirect(bus, op),
            op if op & 0b1100_1111 == 0b1100_0001 => self.exec_pop(bus, op),
            op if op & 0b1100_1111 == 0b1100_0101 => self.exec_push(bus, op),
            op if op & 0b1100_0000 == 0b1000_0000 => self.exec_alu_r(bus, op),
            op if op & 0b1100_0111 == 0b1100_0110 => self.exec_alu_d8(bus, op),
            op if op & 0b1100_1111 == 0b0000_1001 => Ok(self.exec_add_hl_rr(op)),
            op if op & 0b1110_0111 == 0b1100_0000 => self.exec_ret_cc(bus, op),
            op if op & 0b1110_0111 == 0b1100_0010 => self.exec_jp_cc(bus, op),
            op if op & 0b1110_0111 == 0b1100_0100 => self.exec_call_cc(bus, op),
            op if op & 0b1100_0111 == 0b1100_0111 => self.exec_rst(bus, op),
            op if op & 0b1110_0111 == 0b0010_0000 => self.exec_jr_cc(bus, op),

            0x18 => self.jr(bus, true),
            0xC3 => self.jp_cond(bus, true),
            0xE9 => Ok(self.exec_jp_hl()),
            0xCD => self.call_cond(bus, true),
            0xC9 => self.exec_ret(bus),
            0xD9 => self.exec_reti(bus),

            0xE0 | 0xF0 => self.exec_ldh_a8(bus, opcode),
            0xE2 | 0xF2 => self.exec_ldh_c(bus, opcode),
            0xEA | 0xFA => self.exec_ld_a16(bus, opcode),
            0x08 => self.exec_ld_a16_sp(bus),
            0xF9 => Ok(self.exec_ld_sp_hl()),
            0xF8 => self.exec_ld_hl_sp_r8(bus),
            0xE8 => self.exec_add_sp_r8(bus),

            0x07 | 0x0F | 0x17 | 0x1F => Ok(self.exec_rotate_a(opcode)),
            0x27 => {
                self.alu_daa();
                Ok(1)
            }
            0x2F => Ok(self.exec_cpl()),
            0x37 => Ok(self.exec_scf()),
            0x3F => Ok(self.exec_ccf()),

            // 0xD3, 0xDB, 0xDD, 0xE3, 0xE4, 0xEB, 0xEC, 0xED, 0xF4, 0xFC, 0xFD.
            _ => {
                let pc = self.regs.pc.wrapping_sub(1);
                log::error!(
                    "invalid opcode 0x{:02X} at PC=0x{:04X} (SP=0x{:04X} AF=0x{:04X} BC=0x{:04X} DE=0x{:04X} HL=0x{:04X})",
                    opcode,
                    pc,
                    self.regs.sp,
                    self.regs.af(),
                    self.regs.bc(),
                    self.regs.de(),
                    self.regs.hl(),
                );
                Err(Error::InvalidOpcode { opcode, pc })
            }
        }
    }
}
