mod bus;
mod cartridge;
mod gameboy;
mod serial;
mod timer;
mod trace;

pub use bus::{GameBoyBus, HRAM_SIZE, LY_READY, WRAM_BANK_SIZE};
pub use cartridge::{Cartridge, CartridgeHeader, CartridgeType, ROM_BANK_SIZE};
pub use gameboy::GameBoy;
pub use serial::{CapturedSerial, LogSerial, NullSerial, SerialSink};
pub use timer::Timer;
pub use trace::{LogTrace, TraceEntry, TraceSink};

#[cfg(test)]
mod tests;
