use crate::cpu::Cpu;

impl Cpu {
    /// HALT: PC already points past the opcode, which is where execution
    /// resumes after the interrupt that ends the halt.
    pub(super) fn exec_halt(&mut self) -> u32 {
        self.halted = true;
        log::debug!("HALT at 0x{:04X}", self.regs.pc.wrapping_sub(1));
        4
    }

    pub(super) fn exec_di(&mut self) -> u32 {
        self.iff1 = false;
        self.iff2 = false;
        4
    }

    /// EI: interrupts stay blocked until the next instruction completes.
    pub(super) fn exec_ei(&mut self) -> u32 {
        self.iff1 = true;
        self.iff2 = true;
        self.ei_delay = true;
        4
    }

    pub(super) fn exec_im(&mut self, mode: u8) -> u32 {
        self.im = mode;
        8
    }
}
