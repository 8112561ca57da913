use crate::cpu::{Bus, Cpu, Operand8, Reg8, RotOp};

impl Cpu {
    /// CB rotate/shift. On DD-CB/FD-CB forms the result is also copied into
    /// `copy` when the opcode names a register.
    pub(super) fn exec_rot<B: Bus>(
        &mut self,
        bus: &mut B,
        op: RotOp,
        target: Operand8,
        copy: Option<Reg8>,
    ) -> u32 {
        let value = self.read_operand8(bus, target);
        let result = self.alu_rot(op, value);
        self.write_operand8(bus, target, result);
        if let Some(reg) = copy {
            self.regs.set8(reg, result);
        }
        Self::operand_cycles(target, 8, 15, 23)
    }

    pub(super) fn exec_bit<B: Bus>(&mut self, bus: &mut B, bit: u8, src: Operand8) -> u32 {
        let value = self.read_operand8(bus, src);
        let xy = match src {
            Operand8::Reg(_) => value,
            // Memory forms leak the high byte of MEMPTR.
            _ => (self.regs.wz >> 8) as u8,
        };
        self.alu_bit(bit, value, xy);
        Self::operand_cycles(src, 8, 12, 20)
    }

    /// RES (`set == false`) and SET; flags unaffected.
    pub(super) fn exec_res_set<B: Bus>(
        &mut self,
        bus: &mut B,
        bit: u8,
        target: Operand8,
        copy: Option<Reg8>,
        set: bool,
    ) -> u32 {
        let value = self.read_operand8(bus, target);
        let result = if set {
            value | (1 << bit)
        } else {
            value & !(1 << bit)
        };
        self.write_operand8(bus, target, result);
        if let Some(reg) = copy {
            self.regs.set8(reg, result);
        }
        Self::operand_cycles(target, 8, 15, 23)
    }

    /// RLD: rotate the low nibble of A and the byte at (HL) left by four
    /// bits as one 12-bit quantity.
    pub(super) fn exec_rld<B: Bus>(&mut self, bus: &mut B) -> u32 {
        let hl = self.regs.hl();
        let mem = bus.read8(hl);
        let a = self.regs.a();
        bus.write8(hl, (mem << 4) | (a & 0x0F));
        let result = (a & 0xF0) | (mem >> 4);
        self.regs.set_a(result);
        self.alu_sz53p_keep_carry(result);
        self.regs.wz = hl.wrapping_add(1);
        18
    }

    pub(super) fn exec_rrd<B: Bus>(&mut self, bus: &mut B) -> u32 {
        let hl = self.regs.hl();
        let mem = bus.read8(hl);
        let a = self.regs.a();
        bus.write8(hl, (a << 4) | (mem >> 4));
        let result = (a & 0xF0) | (mem & 0x0F);
        self.regs.set_a(result);
        self.alu_sz53p_keep_carry(result);
        self.regs.wz = hl.wrapping_add(1);
        18
    }
}
