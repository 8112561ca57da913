mod alu;
mod decode;
mod exec;
mod fetch;
mod helpers;
mod interrupts;
mod ops;
mod regs;
mod snapshot;

#[cfg(test)]
mod tests;

pub use crate::bus::Bus;
pub use decode::{decode, Fields};
pub use fetch::Fetched;
pub use interrupts::{IM1_VECTOR, NMI_VECTOR};
pub use ops::{
    AluOp, BlockKind, BlockOp, Cond, Index, Instruction, Op, Operand16, Operand8, Prefix, Reg16,
    Reg8, RotOp,
};
pub use regs::{parity, Flags, RegisterBank, Registers};
pub use snapshot::Snapshot;

/// Z80 processor state.
///
/// The CPU never owns its bus; every call that touches memory borrows one,
/// so a core can be stepped and inspected in isolation.
#[derive(Clone, Debug)]
pub struct Cpu {
    pub regs: Registers,
    /// Maskable interrupt enable flip-flops.
    pub iff1: bool,
    pub iff2: bool,
    /// Interrupt mode (0, 1 or 2).
    pub im: u8,
    /// Set by HALT; the CPU idles with NOP timing until an interrupt.
    pub halted: bool,
    /// EI blocks interrupt acceptance until the following instruction has
    /// executed.
    ei_delay: bool,
    /// Prefix byte already fetched by an instruction it cancelled. No
    /// interrupt is accepted until it has been executed.
    pending_prefix: Option<u8>,
    nmi_pending: bool,
    irq_line: bool,
    irq_data: u8,
    /// Clock pulses left before the next fetch.
    cycles_remaining: u32,
    /// Effective address of the current (IX+d)/(IY+d) operand.
    ea: u16,
    last: Option<Instruction>,
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

impl Cpu {
    pub fn new() -> Self {
        Self {
            regs: Registers::new(),
            iff1: false,
            iff2: false,
            im: 0,
            halted: false,
            ei_delay: false,
            pending_prefix: None,
            nmi_pending: false,
            irq_line: false,
            irq_data: 0xFF,
            cycles_remaining: 0,
            ea: 0,
            last: None,
        }
    }

    /// Reset the CPU.
    ///
    /// Clears PC, I and R, disables interrupts and drops any instruction
    /// still counting down. The general-purpose registers, SP and the index
    /// registers keep their values, as on hardware.
    pub fn reset(&mut self) {
        self.regs.pc = 0;
        self.regs.i = 0;
        self.regs.r = 0;
        self.iff1 = false;
        self.iff2 = false;
        self.im = 0;
        self.halted = false;
        self.ei_delay = false;
        self.pending_prefix = None;
        self.nmi_pending = false;
        self.cycles_remaining = 0;
        self.last = None;
        log::debug!("Z80 reset");
    }

    #[inline]
    pub fn get_flag(&self, flag: Flags) -> bool {
        self.regs.f().contains(flag)
    }

    #[inline]
    pub fn set_flag(&mut self, flag: Flags, value: bool) {
        self.regs.f_mut().set(flag, value);
    }

    #[inline]
    pub fn clear_flags(&mut self) {
        self.regs.set_f(Flags::empty());
    }

    /// Clock pulses left before the next fetch.
    #[inline]
    pub fn cycles_remaining(&self) -> u32 {
        self.cycles_remaining
    }

    /// Most recently executed instruction.
    #[inline]
    pub fn last_instruction(&self) -> Option<Instruction> {
        self.last
    }

    /// Advance by one clock pulse.
    ///
    /// When no instruction is in flight the next one is fetched, decoded and
    /// executed in full, and its cost loads the cycle counter; every pulse
    /// then counts one cycle down. Returns `true` on the pulse that started
    /// a new instruction.
    pub fn clock<B: Bus>(&mut self, bus: &mut B) -> bool {
        let started = self.cycles_remaining == 0;
        if started {
            self.cycles_remaining = self.step(bus);
        }
        self.cycles_remaining = self.cycles_remaining.saturating_sub(1);
        started
    }

    /// Execute a single instruction (or interrupt entry) and return the
    /// number of T-cycles it takes.
    ///
    /// This bypasses the cycle counter; `clock` is built on top of it.
    pub fn step<B: Bus>(&mut self, bus: &mut B) -> u32 {
        if let Some(cycles) = self.handle_interrupts(bus) {
            return cycles;
        }

        if self.halted {
            // HALT keeps issuing NOP machine cycles, which still refresh.
            self.regs.bump_r();
            return 4;
        }

        let pc = self.regs.pc;
        let fetched = self.fetch_instruction(bus);
        let instr = decode(fetched.prefix, fetched.opcode);
        log::trace!(
            "{pc:04X}: prefix={:04X} opcode={:02X} d={:?} {:?}",
            fetched.prefix.code(),
            fetched.opcode,
            fetched.displacement,
            instr.op
        );

        self.ei_delay = false;
        let cycles = self.execute(bus, &instr, fetched.displacement);
        self.last = Some(instr);
        cycles
    }
}
