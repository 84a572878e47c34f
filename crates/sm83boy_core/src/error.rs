use std::fmt;

use crate::machine::CartridgeType;

pub type Result<T> = std::result::Result<T, Error>;

/// Direction of a bus access.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    Read,
    Write,
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Access::Read => f.write_str("read"),
            Access::Write => f.write_str("write"),
        }
    }
}

/// Cartridge capabilities this core rejects.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CartridgeFeature {
    #[error("cartridge type code 0x{0:02X}")]
    CartridgeType(u8),
    #[error("ROM size code 0x{0:02X}")]
    RomSizeCode(u8),
    #[error("{banks} ROM banks on a {kind:?} cartridge")]
    RomBankCount { kind: CartridgeType, banks: usize },
    #[error("ROM image of {0} bytes ends before the cartridge header")]
    TruncatedHeader(usize),
    #[error("write to a cartridge without a memory bank controller")]
    RomWrite,
    #[error("external cartridge RAM")]
    ExternalRam,
    #[error("MBC1 advanced banking mode")]
    AdvancedBankingMode,
}

/// Every error is fatal: emulation stops rather than continuing with
/// state that no longer matches the hardware.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("invalid opcode 0x{opcode:02X} at PC=0x{pc:04X}")]
    InvalidOpcode { opcode: u8, pc: u16 },
    #[error("unmapped {access} at address 0x{addr:04X}")]
    UnmappedAddress { addr: u16, access: Access },
    #[error("unsupported cartridge feature: {0}")]
    UnsupportedCartridgeFeature(#[from] CartridgeFeature),
    #[error("no interrupt is ready to be serviced (IME={ime}, IF=0x{flag:02X}, IE=0x{enable:02X})")]
    InvalidInterruptQuery { ime: bool, flag: u8, enable: u8 },
}

impl Error {
    pub(crate) fn unmapped_read(addr: u16) -> Self {
        Error::UnmappedAddress {
            addr,
            access: Access::Read,
        }
    }

    pub(crate) fn unmapped_write(addr: u16) -> Self {
        Error::UnmappedAddress {
            addr,
            access: Access::Write,
        }
    }
}
