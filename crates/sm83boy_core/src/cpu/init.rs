use super::{Cpu, Flags, Registers};

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

impl Cpu {
    /// A CPU in the state the DMG boot ROM leaves behind.
    pub fn new() -> Self {
        let mut cpu = Self {
            regs: Registers::default(),
            halted: false,
            ime_enable_pending: false,
        };
        cpu.apply_dmg_boot_state();
        cpu
    }

    pub fn reset(&mut self) {
        self.halted = false;
        self.ime_enable_pending = false;
        self.apply_dmg_boot_state();
    }

    /// Initialize registers to match the DMG boot ROM's state after it
    /// hands control to cartridge code at 0x0100.
    fn apply_dmg_boot_state(&mut self) {
        self.regs = Registers {
            a: 0x01,
            f: Flags::Z | Flags::H | Flags::C,
            b: 0x00,
            c: 0x13,
            d: 0x00,
            e: 0xD8,
            h: 0x01,
            l: 0x4D,
            sp: 0xFFFE,
            pc: 0x0100,
        };
    }
}
