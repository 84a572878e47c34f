use crate::cpu::{Bus, Cpu};
use crate::error::Result;

impl Cpu {
    /// STOP is encoded with a padding byte that is skipped. Low-power mode
    /// is not modelled; execution continues with the next instruction.
    pub(super) fn exec_stop<B: Bus>(&mut self, bus: &mut B) -> Result<u32> {
        let _padding = self.fetch8(bus)?;
        Ok(1)
    }

    pub(super) fn exec_halt(&mut self) -> u32 {
        self.halted = true;
        1
    }

    /// DI takes effect immediately and cancels an EI still in flight.
    pub(super) fn exec_di<B: Bus>(&mut self, bus: &mut B) -> Result<u32> {
        bus.interrupts_mut().set_master_enable(false);
        self.ime_enable_pending = false;
        Ok(1)
    }

    pub(super) fn exec_ei(&mut self) -> u32 {
        self.ime_enable_pending = true;
        1
    }
}
