use super::{Bus, Cpu};
use crate::error::Result;
use crate::interrupts::InterruptController;

impl Cpu {
    /// Execute one instruction and return its cost in M-cycles.
    ///
    /// While halted no opcode is fetched and each call costs 1 M-cycle.
    /// A requested and enabled interrupt ends HALT even with IME clear; in
    /// that case execution resumes after HALT without servicing. With IME
    /// set the halted step still costs 1 and [`check_interrupts`] services
    /// the interrupt.
    ///
    /// [`check_interrupts`]: Self::check_interrupts
    pub fn step<B: Bus>(&mut self, bus: &mut B) -> Result<u32> {
        if self.halted {
            if Self::wakes_without_service(bus.interrupts()) {
                self.halted = false;
            } else {
                return Ok(1);
            }
        }

        let enable_after = self.ime_enable_pending;
        let opcode = self.fetch8(bus)?;
        let cycles = self.exec_opcode(bus, opcode)?;
        self.apply_ime_delay(bus, enable_after);
        Ok(cycles)
    }

    /// True when the next [`step`](Self::step) fetches an instruction:
    /// the CPU is running, or it is halted and wakes without servicing.
    pub fn will_fetch<B: Bus>(&self, bus: &B) -> bool {
        !self.halted || Self::wakes_without_service(bus.interrupts())
    }

    #[inline]
    fn wakes_without_service(interrupts: &InterruptController) -> bool {
        interrupts.has_pending() && !interrupts.master_enable()
    }

    /// EI raises IME once the instruction after it has retired. DI in
    /// between clears the pending request.
    #[inline]
    fn apply_ime_delay<B: Bus>(&mut self, bus: &mut B, enable_after: bool) {
        if enable_after && self.ime_enable_pending {
            self.ime_enable_pending = false;
            bus.interrupts_mut().set_master_enable(true);
        }
    }

    /// Service the highest-priority interrupt if one is ready.
    ///
    /// Returns the extra M-cycles spent: 5 when an interrupt was taken,
    /// 0 otherwise.
    pub fn check_interrupts<B: Bus>(&mut self, bus: &mut B) -> Result<u32> {
        if !bus.interrupts().interrupt_ready() {
            return Ok(0);
        }

        let interrupts = bus.interrupts_mut();
        let vector = interrupts.highest_priority_interrupt_address()?;
        interrupts.set_master_enable(false);
        self.halted = false;

        let pc = self.regs.pc;
        log::debug!(
            "servicing interrupt: vector=0x{:04X} pc=0x{:04X} sp=0x{:04X}",
            vector,
            pc,
            self.regs.sp
        );
        self.push_u16(bus, pc)?;
        self.regs.pc = vector;
        Ok(5)
    }
}
