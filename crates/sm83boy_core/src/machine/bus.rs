mod mmio;

use crate::cpu::Bus;
use crate::error::Result;
use crate::interrupts::InterruptController;

use super::cartridge::Cartridge;
use super::serial::{Serial, SerialSink};
use super::timer::Timer;

pub const WRAM_BANK_SIZE: usize = 0x1000;
pub const HRAM_SIZE: usize = 0x7F;
/// LY value reported by the video register stub: inside VBlank, so code
/// polling for it never spins.
pub const LY_READY: u8 = 0x90;

/// DMG address space: cartridge, work RAM, high RAM, the interrupt
/// registers, the timer and the serial port. Video and audio are stub
/// regions.
pub struct GameBoyBus<S> {
    cartridge: Cartridge,
    /// 0xC000–0xCFFF and 0xD000–0xDFFF.
    wram: [[u8; WRAM_BANK_SIZE]; 2],
    /// 0xFF80–0xFFFE.
    hram: [u8; HRAM_SIZE],
    interrupts: InterruptController,
    timer: Timer,
    serial: Serial<S>,
}

impl<S: SerialSink> GameBoyBus<S> {
    pub fn new(cartridge: Cartridge, serial: S) -> Self {
        Self {
            cartridge,
            wram: [[0; WRAM_BANK_SIZE]; 2],
            hram: [0; HRAM_SIZE],
            interrupts: InterruptController::new(),
            timer: Timer::new(),
            serial: Serial::new(serial),
        }
    }

    pub fn cartridge(&self) -> &Cartridge {
        &self.cartridge
    }

    pub fn timer(&self) -> &Timer {
        &self.timer
    }

    pub fn timer_mut(&mut self) -> &mut Timer {
        &mut self.timer
    }

    pub fn serial_sink(&self) -> &S {
        self.serial.sink()
    }

    pub fn serial_sink_mut(&mut self) -> &mut S {
        self.serial.sink_mut()
    }
}

impl<S: SerialSink> Bus for GameBoyBus<S> {
    fn read8(&mut self, addr: u16) -> Result<u8> {
        self.read8_mmio(addr)
    }

    fn write8(&mut self, addr: u16, value: u8) -> Result<()> {
        self.write8_mmio(addr, value)
    }

    fn interrupts(&self) -> &InterruptController {
        &self.interrupts
    }

    fn interrupts_mut(&mut self) -> &mut InterruptController {
        &mut self.interrupts
    }

    fn tick(&mut self, cycles: u32) {
        self.timer.advance(cycles, &mut self.interrupts);
    }
}
