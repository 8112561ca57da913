use crate::cpu::{AluOp, Bus, Cpu, Flags, Operand8, Reg16};

impl Cpu {
    /// ADD/ADC/SUB/SBC/AND/XOR/OR/CP A with an 8-bit operand.
    pub(super) fn exec_alu<B: Bus>(&mut self, bus: &mut B, op: AluOp, src: Operand8) -> u32 {
        let value = self.read_operand8(bus, src);
        self.alu_op(op, value);
        Self::operand_cycles(src, 4, 7, 15)
    }

    pub(super) fn exec_add16(&mut self, dst: Reg16, src: Reg16) -> u32 {
        let lhs = self.regs.get16(dst);
        let rhs = self.regs.get16(src);
        let result = self.alu_add16(lhs, rhs);
        self.regs.set16(dst, result);
        11
    }

    pub(super) fn exec_adc16(&mut self, src: Reg16) -> u32 {
        let value = self.regs.get16(src);
        self.alu_adc16(value);
        15
    }

    pub(super) fn exec_sbc16(&mut self, src: Reg16) -> u32 {
        let value = self.regs.get16(src);
        self.alu_sbc16(value);
        15
    }

    pub(super) fn exec_cpl(&mut self) -> u32 {
        let result = !self.regs.a();
        self.regs.set_a(result);
        let kept = self.regs.f() & (Flags::S | Flags::Z | Flags::PV | Flags::C);
        self.regs.set_f(kept | Flags::H | Flags::N | Flags::xy(result));
        4
    }

    pub(super) fn exec_neg(&mut self) -> u32 {
        let value = self.regs.a();
        self.regs.set_a(0);
        self.alu_sub(value, false);
        8
    }

    pub(super) fn exec_scf(&mut self) -> u32 {
        let kept = self.regs.f() & (Flags::S | Flags::Z | Flags::PV);
        let a = self.regs.a();
        self.regs.set_f(kept | Flags::C | Flags::xy(a));
        4
    }

    /// CCF: H takes the previous carry.
    pub(super) fn exec_ccf(&mut self) -> u32 {
        let carry = self.get_flag(Flags::C);
        let a = self.regs.a();
        let mut f = (self.regs.f() & (Flags::S | Flags::Z | Flags::PV)) | Flags::xy(a);
        f.set(Flags::H, carry);
        f.set(Flags::C, !carry);
        self.regs.set_f(f);
        4
    }
}
