//! Interrupt controller: IF (0xFF0F), IE (0xFFFF) and the master enable.
//!
//! The controller only tracks state and resolves priority. Servicing
//! (pushing PC and jumping to the vector) is done by the CPU.

use bitflags::bitflags;

use crate::error::{Error, Result};

bitflags! {
    /// Request/enable bits, laid out as in IF and IE.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct InterruptFlags: u8 {
        const VBLANK = 1 << 0;
        const LCD_STAT = 1 << 1;
        const TIMER = 1 << 2;
        const SERIAL = 1 << 3;
        const JOYPAD = 1 << 4;
    }
}

/// The five interrupt sources, in priority order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Interrupt {
    VBlank = 0,
    LcdStat = 1,
    Timer = 2,
    Serial = 3,
    Joypad = 4,
}

impl Interrupt {
    pub const ALL: [Interrupt; 5] = [
        Interrupt::VBlank,
        Interrupt::LcdStat,
        Interrupt::Timer,
        Interrupt::Serial,
        Interrupt::Joypad,
    ];

    #[inline]
    pub const fn bit(self) -> u8 {
        self as u8
    }

    #[inline]
    pub fn mask(self) -> InterruptFlags {
        InterruptFlags::from_bits_truncate(1 << self.bit())
    }

    /// Service address: 0x40, 0x48, 0x50, 0x58, 0x60.
    #[inline]
    pub const fn vector(self) -> u16 {
        0x0040 + 8 * self as u16
    }
}

#[derive(Clone, Debug, Default)]
pub struct InterruptController {
    flag: InterruptFlags,
    enable: InterruptFlags,
    master_enable: bool,
}

impl InterruptController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw IF bits (0..=0x1F).
    #[inline]
    pub fn flag(&self) -> u8 {
        self.flag.bits()
    }

    #[inline]
    pub fn set_flag(&mut self, value: u8) {
        self.flag = InterruptFlags::from_bits_truncate(value);
    }

    /// Raw IE bits (0..=0x1F).
    #[inline]
    pub fn enable(&self) -> u8 {
        self.enable.bits()
    }

    #[inline]
    pub fn set_enable(&mut self, value: u8) {
        self.enable = InterruptFlags::from_bits_truncate(value);
    }

    #[inline]
    pub fn master_enable(&self) -> bool {
        self.master_enable
    }

    #[inline]
    pub fn set_master_enable(&mut self, enabled: bool) {
        self.master_enable = enabled;
    }

    #[inline]
    pub fn request(&mut self, interrupt: Interrupt) {
        self.flag.insert(interrupt.mask());
    }

    /// Requested and enabled sources, ignoring IME.
    #[inline]
    pub fn pending(&self) -> InterruptFlags {
        self.flag & self.enable
    }

    /// True when a source is requested and enabled. This is what wakes
    /// the CPU from HALT, whatever the state of IME.
    #[inline]
    pub fn has_pending(&self) -> bool {
        !self.pending().is_empty()
    }

    #[inline]
    pub fn interrupt_ready(&self) -> bool {
        self.master_enable && self.has_pending()
    }

    /// Highest-priority pending source (lowest bit wins), ignoring IME.
    pub fn highest_priority(&self) -> Option<Interrupt> {
        let pending = self.pending().bits();
        if pending == 0 {
            return None;
        }
        Some(Interrupt::ALL[pending.trailing_zeros() as usize])
    }

    /// Resolve the interrupt to service, acknowledge it by clearing its IF
    /// bit and return its service address.
    ///
    /// Errors when [`interrupt_ready`](Self::interrupt_ready) is false.
    pub fn highest_priority_interrupt_address(&mut self) -> Result<u16> {
        let interrupt = self
            .highest_priority()
            .filter(|_| self.master_enable)
            .ok_or(Error::InvalidInterruptQuery {
                ime: self.master_enable,
                flag: self.flag.bits(),
                enable: self.enable.bits(),
            })?;
        self.flag.remove(interrupt.mask());
        Ok(interrupt.vector())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registers_are_masked_to_five_bits() {
        let mut ic = InterruptController::new();
        ic.set_flag(0xFF);
        ic.set_enable(0xE4);
        assert_eq!(ic.flag(), 0x1F);
        assert_eq!(ic.enable(), 0x04);
    }

    #[test]
    fn vectors_follow_bit_positions() {
        let vectors: Vec<u16> = Interrupt::ALL.iter().map(|i| i.vector()).collect();
        assert_eq!(vectors, [0x40, 0x48, 0x50, 0x58, 0x60]);
    }

    #[test]
    fn lowest_pending_bit_wins_for_every_combination() {
        for flag in 0u8..0x20 {
            for enable in 0u8..0x20 {
                let mut ic = InterruptController::new();
                ic.set_master_enable(true);
                ic.set_flag(flag);
                ic.set_enable(enable);

                let pending = flag & enable;
                let result = ic.highest_priority_interrupt_address();
                if pending == 0 {
                    assert!(
                        matches!(result, Err(Error::InvalidInterruptQuery { .. })),
                        "flag={flag:#04X} enable={enable:#04X}"
                    );
                    assert_eq!(ic.flag(), flag);
                } else {
                    let bit = pending.trailing_zeros() as u16;
                    assert_eq!(result, Ok(0x40 + 8 * bit));
                    assert_eq!(ic.flag(), flag & !(1 << bit));
                }
            }
        }
    }

    #[test]
    fn query_without_master_enable_errors_and_keeps_flags() {
        let mut ic = InterruptController::new();
        ic.set_flag(0x04);
        ic.set_enable(0x04);

        assert!(ic.has_pending());
        assert!(!ic.interrupt_ready());
        assert_eq!(
            ic.highest_priority_interrupt_address(),
            Err(Error::InvalidInterruptQuery {
                ime: false,
                flag: 0x04,
                enable: 0x04,
            })
        );
        assert_eq!(ic.flag(), 0x04);
    }

    #[test]
    fn request_sets_only_its_own_bit() {
        let mut ic = InterruptController::new();
        ic.request(Interrupt::Serial);
        ic.request(Interrupt::Timer);
        assert_eq!(ic.flag(), 0b0_1100);
        assert_eq!(ic.highest_priority(), None);

        ic.set_enable(0x1F);
        assert_eq!(ic.highest_priority(), Some(Interrupt::Timer));
    }
}
