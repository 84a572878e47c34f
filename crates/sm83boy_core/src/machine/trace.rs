use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::cpu::{Bus, Registers};

/// CPU state captured before an instruction is fetched, plus the four
/// bytes at PC.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TraceEntry {
    pub regs: Registers,
    pub pcmem: [u8; 4],
}

impl TraceEntry {
    /// Unreadable bytes at PC show up as 0xFF; the fetch itself reports
    /// the error.
    pub fn capture<B: Bus>(regs: &Registers, bus: &mut B) -> Self {
        let pc = regs.pc;
        let pcmem =
            std::array::from_fn(|i| bus.read8(pc.wrapping_add(i as u16)).unwrap_or(0xFF));
        Self { regs: *regs, pcmem }
    }
}

impl fmt::Display for TraceEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = &self.regs;
        write!(
            f,
            "A: {:02X} F: {:02X} B: {:02X} C: {:02X} D: {:02X} E: {:02X} H: {:02X} L: {:02X} SP: {:04X} PC: 00:{:04X} ({:02X} {:02X} {:02X} {:02X})",
            r.a,
            r.f(),
            r.b,
            r.c,
            r.d,
            r.e,
            r.h,
            r.l,
            r.sp,
            r.pc,
            self.pcmem[0],
            self.pcmem[1],
            self.pcmem[2],
            self.pcmem[3],
        )
    }
}

/// Receiver for per-instruction traces.
pub trait TraceSink {
    fn record(&mut self, entry: &TraceEntry);
}

/// Emits each entry through `log::trace!`.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogTrace;

impl TraceSink for LogTrace {
    fn record(&mut self, entry: &TraceEntry) {
        log::trace!("{entry}");
    }
}

impl TraceSink for Vec<TraceEntry> {
    fn record(&mut self, entry: &TraceEntry) {
        self.push(*entry);
    }
}

/// Lets the caller keep a handle on a sink owned by the machine.
impl<T: TraceSink> TraceSink for Rc<RefCell<T>> {
    fn record(&mut self, entry: &TraceEntry) {
        self.borrow_mut().record(entry);
    }
}
