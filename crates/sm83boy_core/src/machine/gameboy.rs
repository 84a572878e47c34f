use crate::cpu::{Bus, Cpu};
use crate::error::Result;
use crate::T_CYCLES_PER_M_CYCLE;

use super::cartridge::Cartridge;
use super::serial::{NullSerial, SerialSink};
use super::trace::{TraceEntry, TraceSink};
use super::GameBoyBus;

/// High-level machine: the CPU and the bus it drives.
///
/// One [`step`](GameBoy::step) executes an instruction (or one halted
/// cycle), services a ready interrupt, then advances the timer by the
/// elapsed time.
pub struct GameBoy<S: SerialSink = NullSerial> {
    pub cpu: Cpu,
    bus: GameBoyBus<S>,
    trace: Option<Box<dyn TraceSink>>,
    steps: u64,
    cycles: u64,
}

impl<S: SerialSink> GameBoy<S> {
    /// Build a machine from a ROM image. Header problems are reported
    /// here, before any instruction runs.
    pub fn new(rom: &[u8], serial: S) -> Result<Self> {
        let cartridge = Cartridge::from_rom(rom)?;
        let header = cartridge.header();
        log::info!(
            "Loaded cartridge '{}' ({:?}, {} ROM banks)",
            header.title,
            header.cartridge_type,
            header.rom_banks
        );
        Ok(Self::with_cartridge(cartridge, serial))
    }

    pub fn with_cartridge(cartridge: Cartridge, serial: S) -> Self {
        Self {
            cpu: Cpu::new(),
            bus: GameBoyBus::new(cartridge, serial),
            trace: None,
            steps: 0,
            cycles: 0,
        }
    }

    /// Install a trace sink. Tracing is off unless a sink is set.
    pub fn set_trace<T: TraceSink + 'static>(&mut self, sink: T) {
        self.trace = Some(Box::new(sink));
    }

    pub fn clear_trace(&mut self) {
        self.trace = None;
    }

    /// Run one step and return the M-cycles it took, interrupt dispatch
    /// included.
    pub fn step(&mut self) -> Result<u32> {
        if let Some(trace) = self.trace.as_mut() {
            if self.cpu.will_fetch(&self.bus) {
                let entry = TraceEntry::capture(&self.cpu.regs, &mut self.bus);
                trace.record(&entry);
            }
        }

        let mut cycles = self.cpu.step(&mut self.bus)?;
        cycles += self.cpu.check_interrupts(&mut self.bus)?;
        self.bus.tick(cycles * T_CYCLES_PER_M_CYCLE);

        self.steps += 1;
        self.cycles += u64::from(cycles);
        Ok(cycles)
    }

    pub fn run_for(&mut self, steps: u64) -> Result<()> {
        for _ in 0..steps {
            self.step()?;
        }
        Ok(())
    }

    /// Step until `done` returns true or `max_steps` steps have run.
    /// Returns whether `done` was satisfied.
    pub fn run_until<F>(&mut self, max_steps: u64, mut done: F) -> Result<bool>
    where
        F: FnMut(&Self) -> bool,
    {
        for _ in 0..max_steps {
            if done(self) {
                return Ok(true);
            }
            self.step()?;
        }
        Ok(done(self))
    }

    /// Steps executed since construction.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// M-cycles elapsed since construction.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn bus(&self) -> &GameBoyBus<S> {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut GameBoyBus<S> {
        &mut self.bus
    }

    pub fn serial(&self) -> &S {
        self.bus.serial_sink()
    }

    pub fn serial_mut(&mut self) -> &mut S {
        self.bus.serial_sink_mut()
    }
}
