use super::super::{GameBoyBus, LY_READY};
use crate::error::{Error, Result};
use crate::machine::serial::SerialSink;

impl<S: SerialSink> GameBoyBus<S> {
    pub(super) fn read8_mmio_impl(&mut self, addr: u16) -> Result<u8> {
        match addr {
            // Cartridge ROM, bank 0 and the switchable bank.
            0x0000..=0x7FFF => self.cartridge.read(addr),

            // Cartridge RAM; rejected by the cartridge.
            0xA000..=0xBFFF => self.cartridge.read_ram(addr),

            // Work RAM, two fixed 4 KiB banks.
            0xC000..=0xCFFF => Ok(self.wram[0][(addr - 0xC000) as usize]),
            0xD000..=0xDFFF => Ok(self.wram[1][(addr - 0xD000) as usize]),

            // VRAM stub.
            0x8000..=0x9FFF => Ok(0x00),

            // Video registers. LY always reads as "in VBlank".
            0xFF44 => Ok(LY_READY),
            0xFF40..=0xFF45 | 0xFF47..=0xFF4B => Ok(0x00),

            // KEY1: no double-speed mode on DMG.
            0xFF4D => Ok(0xFF),

            // High RAM.
            0xFF80..=0xFFFE => Ok(self.hram[(addr - 0xFF80) as usize]),

            // Interrupt flag; upper three bits are unused and read as 1.
            0xFF0F => Ok(self.interrupts.flag() | 0xE0),
            0xFFFF => Ok(self.interrupts.enable()),

            // Timer. DIV is a stub.
            0xFF04 => Ok(0x00),
            0xFF05 => Ok(self.timer.tima()),
            0xFF06 => Ok(self.timer.tma()),
            0xFF07 => Ok(self.timer.tac() | 0xF8),

            // Serial transfer registers.
            0xFF01 => Ok(self.serial.sb),
            0xFF02 => Ok(self.serial.sc),

            // Audio stub.
            0xFF10..=0xFF3F => Ok(0x00),

            _ => Err(Error::unmapped_read(addr)),
        }
    }
}
