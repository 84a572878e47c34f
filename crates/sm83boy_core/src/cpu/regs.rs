use bitflags::bitflags;

bitflags! {
    /// Condition flags, held in the upper nibble of F.
    ///
    /// Bits 0–3 of F do not exist in hardware; `from_bits_truncate`
    /// drops them on every raw write.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Flags: u8 {
        /// Zero.
        const Z = 0b1000_0000;
        /// Subtract.
        const N = 0b0100_0000;
        /// Half carry (bit 3 -> 4, or bit 11 -> 12 for 16-bit adds).
        const H = 0b0010_0000;
        /// Carry.
        const C = 0b0001_0000;
    }
}

/// SM83 register file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Registers {
    pub a: u8,
    pub f: Flags,
    pub b: u8,
    pub c: u8,
    pub d: u8,
    pub e: u8,
    pub h: u8,
    pub l: u8,
    pub sp: u16,
    pub pc: u16,
}

impl Registers {
    #[inline]
    pub fn f(&self) -> u8 {
        self.f.bits()
    }

    #[inline]
    pub fn set_f(&mut self, value: u8) {
        self.f = Flags::from_bits_truncate(value);
    }

    #[inline]
    pub fn af(&self) -> u16 {
        u16::from_be_bytes([self.a, self.f.bits()])
    }

    #[inline]
    pub fn set_af(&mut self, value: u16) {
        let [a, f] = value.to_be_bytes();
        self.a = a;
        self.set_f(f);
    }

    #[inline]
    pub fn bc(&self) -> u16 {
        u16::from_be_bytes([self.b, self.c])
    }

    #[inline]
    pub fn set_bc(&mut self, value: u16) {
        let [b, c] = value.to_be_bytes();
        self.b = b;
        self.c = c;
    }

    #[inline]
    pub fn de(&self) -> u16 {
        u16::from_be_bytes([self.d, self.e])
    }

    #[inline]
    pub fn set_de(&mut self, value: u16) {
        let [d, e] = value.to_be_bytes();
        self.d = d;
        self.e = e;
    }

    #[inline]
    pub fn hl(&self) -> u16 {
        u16::from_be_bytes([self.h, self.l])
    }

    #[inline]
    pub fn set_hl(&mut self, value: u16) {
        let [h, l] = value.to_be_bytes();
        self.h = h;
        self.l = l;
    }
}

/// Individually addressable 8-bit registers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reg8 {
    A,
    B,
    C,
    D,
    E,
    H,
    L,
}

impl Reg8 {
    #[inline]
    pub fn get(self, regs: &Registers) -> u8 {
        match self {
            Reg8::A => regs.a,
            Reg8::B => regs.b,
            Reg8::C => regs.c,
            Reg8::D => regs.d,
            Reg8::E => regs.e,
            Reg8::H => regs.h,
            Reg8::L => regs.l,
        }
    }

    #[inline]
    pub fn set(self, regs: &mut Registers, value: u8) {
        match self {
            Reg8::A => regs.a = value,
            Reg8::B => regs.b = value,
            Reg8::C => regs.c = value,
            Reg8::D => regs.d = value,
            Reg8::E => regs.e = value,
            Reg8::H => regs.h = value,
            Reg8::L => regs.l = value,
        }
    }
}

/// 16-bit register views.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegisterPair {
    BC,
    DE,
    HL,
    SP,
    AF,
}

impl RegisterPair {
    /// `rr` field of LD rr,nn / INC rr / DEC rr / ADD HL,rr.
    pub const RR: [RegisterPair; 4] = [
        RegisterPair::BC,
        RegisterPair::DE,
        RegisterPair::HL,
        RegisterPair::SP,
    ];

    /// `rr` field of PUSH/POP, where AF takes the place of SP.
    pub const STACK: [RegisterPair; 4] = [
        RegisterPair::BC,
        RegisterPair::DE,
        RegisterPair::HL,
        RegisterPair::AF,
    ];

    #[inline]
    pub fn get(self, regs: &Registers) -> u16 {
        match self {
            RegisterPair::BC => regs.bc(),
            RegisterPair::DE => regs.de(),
            RegisterPair::HL => regs.hl(),
            RegisterPair::SP => regs.sp,
            RegisterPair::AF => regs.af(),
        }
    }

    #[inline]
    pub fn set(self, regs: &mut Registers, value: u16) {
        match self {
            RegisterPair::BC => regs.set_bc(value),
            RegisterPair::DE => regs.set_de(value),
            RegisterPair::HL => regs.set_hl(value),
            RegisterPair::SP => regs.sp = value,
            RegisterPair::AF => regs.set_af(value),
        }
    }
}
