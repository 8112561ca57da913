use super::{Cpu, Flags, Instruction, RegisterBank};

/// Read-only copy of every architectural register plus the engine's
/// bookkeeping, for debuggers and tests.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Snapshot {
    /// Active A, B, C, D, E, H, L.
    pub main: RegisterBank,
    /// Shadow A', B', C', D', E', H', L'.
    pub shadow: RegisterBank,
    pub f: Flags,
    pub f_shadow: Flags,
    pub ix: u16,
    pub iy: u16,
    pub sp: u16,
    pub pc: u16,
    pub i: u8,
    pub r: u8,
    pub iff1: bool,
    pub iff2: bool,
    pub im: u8,
    pub halted: bool,
    pub cycles_remaining: u32,
    pub last: Option<Instruction>,
}

impl Snapshot {
    #[inline]
    pub fn af(&self) -> u16 {
        u16::from_be_bytes([self.main.a, self.f.bits()])
    }
}

impl Cpu {
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            main: self.regs.visible(),
            shadow: self.regs.shadow(),
            f: self.regs.f(),
            f_shadow: self.regs.shadow_f(),
            ix: self.regs.ix,
            iy: self.regs.iy,
            sp: self.regs.sp,
            pc: self.regs.pc,
            i: self.regs.i,
            r: self.regs.r,
            iff1: self.iff1,
            iff2: self.iff2,
            im: self.im,
            halted: self.halted,
            cycles_remaining: self.cycles_remaining,
            last: self.last,
        }
    }
}
