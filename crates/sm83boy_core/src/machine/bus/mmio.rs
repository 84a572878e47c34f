mod read;
mod write;

use super::GameBoyBus;
use crate::error::Result;
use crate::machine::serial::SerialSink;

impl<S: SerialSink> GameBoyBus<S> {
    pub(super) fn read8_mmio(&mut self, addr: u16) -> Result<u8> {
        self.read8_mmio_impl(addr)
    }

    pub(super) fn write8_mmio(&mut self, addr: u16, value: u8) -> Result<()> {
        self.write8_mmio_impl(addr, value)
    }
}
