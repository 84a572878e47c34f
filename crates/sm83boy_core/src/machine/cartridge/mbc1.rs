use crate::error::{CartridgeFeature, Error, Result};

/// MBC1 in its simple banking mode.
///
/// - 0x0000–0x1FFF: RAM enable. There is no cartridge RAM, so any write
///   is rejected.
/// - 0x2000–0x3FFF: lower 5 bits of the ROM bank number; 0 selects 1.
/// - 0x4000–0x5FFF: upper 2 bits of the ROM bank number.
/// - 0x6000–0x7FFF: banking mode select; only mode 0 is supported.
pub(super) struct Mbc1 {
    lower_bits: u8,
    higher_bits: u8,
    num_banks: usize,
    active_bank: usize,
}

impl Mbc1 {
    pub(super) fn new(num_banks: usize) -> Self {
        debug_assert!(num_banks.is_power_of_two());

        Self {
            lower_bits: 1,
            higher_bits: 0,
            num_banks,
            active_bank: 1,
        }
    }

    #[inline]
    pub(super) fn active_bank(&self) -> usize {
        self.active_bank
    }

    /// Bank lines beyond the ROM size are not connected, so the selected
    /// number is masked by the (power-of-two) bank count.
    fn update_active_bank(&mut self) {
        let selected = (self.lower_bits | (self.higher_bits << 5)) as usize;
        self.active_bank = selected & (self.num_banks - 1);
        log::trace!("MBC1 switched to ROM bank {}", self.active_bank);
    }

    pub(super) fn write(&mut self, addr: u16, value: u8) -> Result<()> {
        match addr {
            0x0000..=0x1FFF => {
                log::debug!("MBC1 RAM enable latch written with 0x{value:02X}");
                Err(CartridgeFeature::ExternalRam.into())
            }
            0x2000..=0x3FFF => {
                self.lower_bits = match value & 0x1F {
                    0 => 1,
                    bits => bits,
                };
                self.update_active_bank();
                Ok(())
            }
            0x4000..=0x5FFF => {
                self.higher_bits = value & 0x03;
                self.update_active_bank();
                Ok(())
            }
            0x6000..=0x7FFF => {
                if value & 0x01 != 0 {
                    return Err(CartridgeFeature::AdvancedBankingMode.into());
                }
                Ok(())
            }
            _ => Err(Error::unmapped_write(addr)),
        }
    }
}
