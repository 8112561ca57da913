use bitflags::bitflags;

use super::ops::{Index, Reg16, Reg8};

bitflags! {
    /// Flag bits in the F register.
    ///
    /// Layout (bit index in the byte, from LSB to MSB):
    /// - bit 0: C (carry)
    /// - bit 1: N (subtract)
    /// - bit 2: PV (parity / overflow)
    /// - bit 3: X (copy of bit 3 of an internal result)
    /// - bit 4: H (half carry)
    /// - bit 5: Y (copy of bit 5 of an internal result)
    /// - bit 6: Z (zero)
    /// - bit 7: S (sign)
    ///
    /// X and Y carry no architectural meaning, but some programs test them
    /// so every operation writes them exactly.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Flags: u8 {
        const C = 1 << 0;
        const N = 1 << 1;
        const PV = 1 << 2;
        const X = 1 << 3;
        const H = 1 << 4;
        const Y = 1 << 5;
        const Z = 1 << 6;
        const S = 1 << 7;
    }
}

impl Flags {
    /// X and Y copied from bits 3 and 5 of `value`.
    #[inline]
    pub fn xy(value: u8) -> Flags {
        Flags::from_bits_retain(value & (Flags::X | Flags::Y).bits())
    }

    /// S, Z, Y and X for an 8-bit result.
    #[inline]
    pub fn sz53(value: u8) -> Flags {
        let mut f = Flags::xy(value);
        f.set(Flags::S, value & 0x80 != 0);
        f.set(Flags::Z, value == 0);
        f
    }

    /// `sz53` plus PV set on even parity.
    #[inline]
    pub fn sz53p(value: u8) -> Flags {
        let mut f = Flags::sz53(value);
        f.set(Flags::PV, parity(value));
        f
    }
}

/// True when `value` has an even number of set bits.
#[inline]
pub fn parity(value: u8) -> bool {
    value.count_ones() % 2 == 0
}

/// One set of general-purpose registers.
///
/// The Z80 carries two of these (main and shadow). BC/DE/HL are always
/// derived from the 8-bit halves, never stored separately.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RegisterBank {
    pub a: u8,
    pub b: u8,
    pub c: u8,
    pub d: u8,
    pub e: u8,
    pub h: u8,
    pub l: u8,
}

impl RegisterBank {
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

macro_rules! bank_reg {
    ($get:ident, $set:ident, $field:ident, $sel:ident) => {
        #[inline]
        pub fn $get(&self) -> u8 {
            self.banks[self.$sel].$field
        }

        #[inline]
        pub fn $set(&mut self, value: u8) {
            self.banks[self.$sel].$field = value;
        }
    };
}

/// Complete Z80 register file.
///
/// `bank` selects the bank that supplies B, C, D, E, H and L; `af_bank`
/// selects the bank that supplies A together with its flag register. EXX
/// flips the first selector, EX AF,AF' flips the second, so neither
/// exchange copies any data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Registers {
    banks: [RegisterBank; 2],
    flags: [Flags; 2],
    bank: usize,
    af_bank: usize,

    pub ix: u16,
    pub iy: u16,
    pub sp: u16,
    pub pc: u16,
    /// Interrupt vector base.
    pub i: u8,
    /// Memory refresh counter. Only the low seven bits count.
    pub r: u8,
    /// Internal address latch (MEMPTR). Its high byte leaks into X/Y on
    /// `BIT n,(HL)`.
    pub wz: u16,
}

impl Default for Registers {
    fn default() -> Self {
        Self::new()
    }
}

impl Registers {
    /// Power-on register contents.
    pub fn new() -> Self {
        let bank = RegisterBank {
            a: 0xFF,
            ..RegisterBank::default()
        };
        Self {
            banks: [bank; 2],
            flags: [Flags::all(); 2],
            bank: 0,
            af_bank: 0,
            ix: 0,
            iy: 0,
            sp: 0xFFFF,
            pc: 0,
            i: 0,
            r: 0,
            wz: 0,
        }
    }

    bank_reg!(a, set_a, a, af_bank);
    bank_reg!(b, set_b, b, bank);
    bank_reg!(c, set_c, c, bank);
    bank_reg!(d, set_d, d, bank);
    bank_reg!(e, set_e, e, bank);
    bank_reg!(h, set_h, h, bank);
    bank_reg!(l, set_l, l, bank);

    #[inline]
    pub fn f(&self) -> Flags {
        self.flags[self.af_bank]
    }

    #[inline]
    pub fn set_f(&mut self, flags: Flags) {
        self.flags[self.af_bank] = flags;
    }

    #[inline]
    pub fn f_mut(&mut self) -> &mut Flags {
        &mut self.flags[self.af_bank]
    }

    #[inline]
    pub fn af(&self) -> u16 {
        u16::from_be_bytes([self.a(), self.f().bits()])
    }

    #[inline]
    pub fn set_af(&mut self, value: u16) {
        let [a, f] = value.to_be_bytes();
        self.set_a(a);
        self.set_f(Flags::from_bits_retain(f));
    }

    #[inline]
    pub fn bc(&self) -> u16 {
        self.banks[self.bank].bc()
    }

    #[inline]
    pub fn set_bc(&mut self, value: u16) {
        self.banks[self.bank].set_bc(value);
    }

    #[inline]
    pub fn de(&self) -> u16 {
        self.banks[self.bank].de()
    }

    #[inline]
    pub fn set_de(&mut self, value: u16) {
        self.banks[self.bank].set_de(value);
    }

    #[inline]
    pub fn hl(&self) -> u16 {
        self.banks[self.bank].hl()
    }

    #[inline]
    pub fn set_hl(&mut self, value: u16) {
        self.banks[self.bank].set_hl(value);
    }

    /// EXX: swap BC, DE and HL with their shadow copies.
    #[inline]
    pub fn exx(&mut self) {
        self.bank ^= 1;
    }

    /// EX AF,AF': swap the accumulator and flags with their shadow copies.
    #[inline]
    pub fn ex_af(&mut self) {
        self.af_bank ^= 1;
    }

    /// Registers as currently visible to plain load/ALU instructions.
    pub fn visible(&self) -> RegisterBank {
        let mut bank = self.banks[self.bank];
        bank.a = self.banks[self.af_bank].a;
        bank
    }

    /// Registers currently parked in the shadow set.
    pub fn shadow(&self) -> RegisterBank {
        let mut bank = self.banks[self.bank ^ 1];
        bank.a = self.banks[self.af_bank ^ 1].a;
        bank
    }

    /// Flag register currently parked in the shadow set.
    pub fn shadow_f(&self) -> Flags {
        self.flags[self.af_bank ^ 1]
    }

    pub fn get8(&self, reg: Reg8) -> u8 {
        match reg {
            Reg8::A => self.a(),
            Reg8::B => self.b(),
            Reg8::C => self.c(),
            Reg8::D => self.d(),
            Reg8::E => self.e(),
            Reg8::H => self.h(),
            Reg8::L => self.l(),
            Reg8::Ixh => (self.ix >> 8) as u8,
            Reg8::Ixl => self.ix as u8,
            Reg8::Iyh => (self.iy >> 8) as u8,
            Reg8::Iyl => self.iy as u8,
        }
    }

    pub fn set8(&mut self, reg: Reg8, value: u8) {
        match reg {
            Reg8::A => self.set_a(value),
            Reg8::B => self.set_b(value),
            Reg8::C => self.set_c(value),
            Reg8::D => self.set_d(value),
            Reg8::E => self.set_e(value),
            Reg8::H => self.set_h(value),
            Reg8::L => self.set_l(value),
            Reg8::Ixh => self.ix = (self.ix & 0x00FF) | (u16::from(value) << 8),
            Reg8::Ixl => self.ix = (self.ix & 0xFF00) | u16::from(value),
            Reg8::Iyh => self.iy = (self.iy & 0x00FF) | (u16::from(value) << 8),
            Reg8::Iyl => self.iy = (self.iy & 0xFF00) | u16::from(value),
        }
    }

    pub fn get16(&self, reg: Reg16) -> u16 {
        match reg {
            Reg16::AF => self.af(),
            Reg16::BC => self.bc(),
            Reg16::DE => self.de(),
            Reg16::HL => self.hl(),
            Reg16::SP => self.sp,
            Reg16::IX => self.ix,
            Reg16::IY => self.iy,
        }
    }

    pub fn set16(&mut self, reg: Reg16, value: u16) {
        match reg {
            Reg16::AF => self.set_af(value),
            Reg16::BC => self.set_bc(value),
            Reg16::DE => self.set_de(value),
            Reg16::HL => self.set_hl(value),
            Reg16::SP => self.sp = value,
            Reg16::IX => self.ix = value,
            Reg16::IY => self.iy = value,
        }
    }

    #[inline]
    pub fn index(&self, index: Index) -> u16 {
        match index {
            Index::Ix => self.ix,
            Index::Iy => self.iy,
        }
    }

    /// Advance the refresh counter by one opcode fetch, keeping bit 7.
    #[inline]
    pub fn bump_r(&mut self) {
        self.r = (self.r & 0x80) | (self.r.wrapping_add(1) & 0x7F);
    }
}
