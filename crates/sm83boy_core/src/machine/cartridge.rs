mod mbc1;

use std::ops::Range;

use mbc1::Mbc1;

use crate::error::{CartridgeFeature, Error, Result};

pub const ROM_BANK_SIZE: usize = 0x4000;

const TITLE: Range<usize> = 0x0134..0x0144;
const TYPE_CODE: usize = 0x0147;
const SIZE_CODE: usize = 0x0148;
const HEADER_END: usize = 0x0150;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CartridgeType {
    /// 32 KiB of ROM, no bank controller.
    None,
    Mbc1,
}

impl CartridgeType {
    /// 0x01–0x03 are MBC1 with and without RAM/battery; only the ROM side
    /// is emulated.
    pub fn from_code(code: u8) -> Result<Self> {
        match code {
            0x00 => Ok(CartridgeType::None),
            0x01..=0x03 => Ok(CartridgeType::Mbc1),
            other => Err(CartridgeFeature::CartridgeType(other).into()),
        }
    }

    fn supports_banks(self, banks: usize) -> bool {
        match self {
            CartridgeType::None => banks == 2,
            CartridgeType::Mbc1 => (2..=128).contains(&banks),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CartridgeHeader {
    pub title: String,
    pub cartridge_type: CartridgeType,
    pub rom_size_code: u8,
    /// Total number of 16 KiB banks, bank 0 included.
    pub rom_banks: usize,
}

impl CartridgeHeader {
    pub fn parse(rom: &[u8]) -> Result<Self> {
        if rom.len() < HEADER_END {
            return Err(CartridgeFeature::TruncatedHeader(rom.len()).into());
        }

        let cartridge_type = CartridgeType::from_code(rom[TYPE_CODE])?;
        let rom_size_code = rom[SIZE_CODE];
        if rom_size_code > 0x08 {
            return Err(CartridgeFeature::RomSizeCode(rom_size_code).into());
        }

        let rom_banks = (32 * 1024usize << rom_size_code) / ROM_BANK_SIZE;
        if !cartridge_type.supports_banks(rom_banks) {
            return Err(CartridgeFeature::RomBankCount {
                kind: cartridge_type,
                banks: rom_banks,
            }
            .into());
        }

        let title = rom[TITLE]
            .iter()
            .take_while(|&&b| b != 0)
            .map(|&b| if b.is_ascii_graphic() { b as char } else { ' ' })
            .collect::<String>()
            .trim_end()
            .to_string();

        Ok(Self {
            title,
            cartridge_type,
            rom_size_code,
            rom_banks,
        })
    }
}

enum Mapper {
    RomOnly,
    Mbc1(Mbc1),
}

/// Cartridge ROM plus its bank controller.
pub struct Cartridge {
    header: CartridgeHeader,
    rom: Vec<u8>,
    mapper: Mapper,
}

impl Cartridge {
    /// Parse the header and take a copy of the ROM image, sized to the
    /// bank count the header declares.
    pub fn from_rom(rom: &[u8]) -> Result<Self> {
        let header = CartridgeHeader::parse(rom)?;

        let size = header.rom_banks * ROM_BANK_SIZE;
        if rom.len() != size {
            log::warn!(
                "ROM image is {} bytes but the header declares {} banks ({} bytes)",
                rom.len(),
                header.rom_banks,
                size
            );
        }
        let mut image = rom.to_vec();
        image.resize(size, 0xFF);

        let mapper = match header.cartridge_type {
            CartridgeType::None => Mapper::RomOnly,
            CartridgeType::Mbc1 => Mapper::Mbc1(Mbc1::new(header.rom_banks)),
        };

        Ok(Self {
            header,
            rom: image,
            mapper,
        })
    }

    pub fn header(&self) -> &CartridgeHeader {
        &self.header
    }

    /// Bank currently mapped at 0x4000–0x7FFF.
    pub fn active_bank(&self) -> usize {
        match &self.mapper {
            Mapper::RomOnly => 1,
            Mapper::Mbc1(mbc) => mbc.active_bank(),
        }
    }

    pub fn read(&self, addr: u16) -> Result<u8> {
        let offset = match addr {
            0x0000..=0x3FFF => addr as usize,
            0x4000..=0x7FFF => self.active_bank() * ROM_BANK_SIZE + (addr as usize - 0x4000),
            _ => return Err(Error::unmapped_read(addr)),
        };
        Ok(self.rom[offset])
    }

    /// Writes to 0x0000–0x7FFF drive the bank controller.
    pub fn write(&mut self, addr: u16, value: u8) -> Result<()> {
        match &mut self.mapper {
            Mapper::RomOnly => Err(CartridgeFeature::RomWrite.into()),
            Mapper::Mbc1(mbc) => mbc.write(addr, value),
        }
    }

    /// External RAM (0xA000–0xBFFF) is not emulated.
    pub fn read_ram(&self, _addr: u16) -> Result<u8> {
        Err(CartridgeFeature::ExternalRam.into())
    }

    pub fn write_ram(&mut self, _addr: u16, _value: u8) -> Result<()> {
        Err(CartridgeFeature::ExternalRam.into())
    }
}
