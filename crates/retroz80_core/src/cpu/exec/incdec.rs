use crate::cpu::{Bus, Cpu, Operand8, Reg16};

impl Cpu {
    pub(super) fn exec_inc8<B: Bus>(&mut self, bus: &mut B, target: Operand8) -> u32 {
        let value = self.read_operand8(bus, target);
        let result = self.alu_inc8(value);
        self.write_operand8(bus, target, result);
        Self::operand_cycles(target, 4, 11, 19)
    }

    pub(super) fn exec_dec8<B: Bus>(&mut self, bus: &mut B, target: Operand8) -> u32 {
        let value = self.read_operand8(bus, target);
        let result = self.alu_dec8(value);
        self.write_operand8(bus, target, result);
        Self::operand_cycles(target, 4, 11, 19)
    }

    /// 16-bit INC rr; flags unaffected.
    pub(super) fn exec_inc16(&mut self, reg: Reg16) -> u32 {
        let value = self.regs.get16(reg).wrapping_add(1);
        self.regs.set16(reg, value);
        6
    }

    /// 16-bit DEC rr; flags unaffected.
    pub(super) fn exec_dec16(&mut self, reg: Reg16) -> u32 {
        let value = self.regs.get16(reg).wrapping_sub(1);
        self.regs.set16(reg, value);
        6
    }
}
