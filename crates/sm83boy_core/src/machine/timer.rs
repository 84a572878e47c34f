use crate::interrupts::{Interrupt, InterruptController};

const TAC_ENABLE: u8 = 0b100;

/// Clock cycles per TIMA increment, indexed by TAC bits 1..0.
const DIVISORS: [u32; 4] = [1024, 16, 64, 256];

/// TIMA/TMA/TAC timer.
///
/// Time advances through [`advance`](Timer::advance) with the clock cycles
/// elapsed since the previous call. Leftover cycles below one tick are
/// carried in an accumulator. DIV is not modelled.
#[derive(Clone, Debug, Default)]
pub struct Timer {
    tima: u8,
    tma: u8,
    tac: u8,
    accumulator: u32,
}

impl Timer {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn tima(&self) -> u8 {
        self.tima
    }

    #[inline]
    pub fn set_tima(&mut self, value: u8) {
        self.tima = value;
    }

    #[inline]
    pub fn tma(&self) -> u8 {
        self.tma
    }

    #[inline]
    pub fn set_tma(&mut self, value: u8) {
        self.tma = value;
    }

    /// The three implemented TAC bits.
    #[inline]
    pub fn tac(&self) -> u8 {
        self.tac
    }

    #[inline]
    pub fn set_tac(&mut self, value: u8) {
        self.tac = value & 0x07;
    }

    #[inline]
    pub fn enabled(&self) -> bool {
        self.tac & TAC_ENABLE != 0
    }

    #[inline]
    pub fn divisor(&self) -> u32 {
        DIVISORS[(self.tac & 0x03) as usize]
    }

    #[inline]
    pub fn accumulator(&self) -> u32 {
        self.accumulator
    }

    /// Advance by `cycles` clock cycles. An overflow of TIMA reloads it
    /// from TMA and requests the timer interrupt.
    pub fn advance(&mut self, cycles: u32, interrupts: &mut InterruptController) {
        if !self.enabled() {
            return;
        }

        self.accumulator += cycles;
        let divisor = self.divisor();
        while self.accumulator >= divisor {
            self.accumulator -= divisor;
            self.increment_tima(interrupts);
        }
    }

    fn increment_tima(&mut self, interrupts: &mut InterruptController) {
        let (next, overflow) = self.tima.overflowing_add(1);
        if overflow {
            self.tima = self.tma;
            interrupts.request(Interrupt::Timer);
        } else {
            self.tima = next;
        }
    }
}
