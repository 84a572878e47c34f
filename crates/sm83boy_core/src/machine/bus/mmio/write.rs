use super::super::GameBoyBus;
use crate::error::{Error, Result};
use crate::machine::serial::SerialSink;

impl<S: SerialSink> GameBoyBus<S> {
    pub(super) fn write8_mmio_impl(&mut self, addr: u16, value: u8) -> Result<()> {
        match addr {
            // Bank controller registers.
            0x0000..=0x7FFF => self.cartridge.write(addr, value),

            0xA000..=0xBFFF => self.cartridge.write_ram(addr, value),

            0xC000..=0xCFFF => {
                self.wram[0][(addr - 0xC000) as usize] = value;
                Ok(())
            }
            0xD000..=0xDFFF => {
                self.wram[1][(addr - 0xD000) as usize] = value;
                Ok(())
            }

            // VRAM and video register stubs.
            0x8000..=0x9FFF | 0xFF40..=0xFF45 | 0xFF47..=0xFF4B => Ok(()),

            0xFF4D => Ok(()),

            0xFF80..=0xFFFE => {
                self.hram[(addr - 0xFF80) as usize] = value;
                Ok(())
            }

            0xFF0F => {
                self.interrupts.set_flag(value);
                Ok(())
            }
            0xFFFF => {
                self.interrupts.set_enable(value);
                Ok(())
            }

            0xFF04 => Ok(()),
            0xFF05 => {
                self.timer.set_tima(value);
                Ok(())
            }
            0xFF06 => {
                self.timer.set_tma(value);
                Ok(())
            }
            0xFF07 => {
                self.timer.set_tac(value);
                Ok(())
            }

            0xFF01 => {
                self.serial.write_sb(value);
                Ok(())
            }
            0xFF02 => {
                self.serial.write_sc(value);
                Ok(())
            }

            // Audio stub.
            0xFF10..=0xFF3F => Ok(()),

            _ => Err(Error::unmapped_write(addr)),
        }
    }
}
