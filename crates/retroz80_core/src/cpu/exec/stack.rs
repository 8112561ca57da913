use crate::cpu::{Bus, Cpu, Reg16};

impl Cpu {
    pub(super) fn exec_push<B: Bus>(&mut self, bus: &mut B, reg: Reg16) -> u32 {
        let value = self.regs.get16(reg);
        self.push_u16(bus, value);
        11
    }

    pub(super) fn exec_pop<B: Bus>(&mut self, bus: &mut B, reg: Reg16) -> u32 {
        let value = self.pop_u16(bus);
        self.regs.set16(reg, value);
        10
    }

    /// EX (SP),HL and its IX/IY forms.
    pub(super) fn exec_ex_sp<B: Bus>(&mut self, bus: &mut B, reg: Reg16) -> u32 {
        let sp = self.regs.sp;
        let from_stack = self.read16(bus, sp);
        let value = self.regs.get16(reg);
        self.write16(bus, sp, value);
        self.regs.set16(reg, from_stack);
        self.regs.wz = from_stack;
        19
    }

    pub(super) fn exec_ex_de_hl(&mut self) -> u32 {
        let de = self.regs.de();
        let hl = self.regs.hl();
        self.regs.set_de(hl);
        self.regs.set_hl(de);
        4
    }
}
