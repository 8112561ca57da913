use crate::cpu::{Bus, Cpu, Flags, Operand16, Operand8, Prefix};

impl Cpu {
    /// LD between registers, memory and immediates.
    pub(super) fn exec_ld8<B: Bus>(&mut self, bus: &mut B, dst: Operand8, src: Operand8) -> u32 {
        let value = self.read_operand8(bus, src);
        self.write_operand8(bus, dst, value);

        match (dst, src) {
            (Operand8::Reg(_), Operand8::Reg(_)) => 4,
            (Operand8::Idx(_), _) | (_, Operand8::Idx(_)) => 15,
            (Operand8::Ind(_), Operand8::Imm) => 10,
            (Operand8::Abs, _) | (_, Operand8::Abs) => 13,
            _ => 7,
        }
    }

    /// 16-bit loads: LD rr,nn, LD (nn),rr, LD rr,(nn) and LD SP,HL.
    pub(super) fn exec_ld16<B: Bus>(
        &mut self,
        bus: &mut B,
        prefix: Prefix,
        dst: Operand16,
        src: Operand16,
    ) -> u32 {
        let value = match src {
            Operand16::Reg(reg) => self.regs.get16(reg),
            Operand16::Imm => self.fetch16(bus),
            Operand16::Abs => {
                let addr = self.fetch16(bus);
                self.regs.wz = addr.wrapping_add(1);
                self.read16(bus, addr)
            }
        };

        match dst {
            Operand16::Reg(reg) => self.regs.set16(reg, value),
            Operand16::Abs => {
                let addr = self.fetch16(bus);
                self.regs.wz = addr.wrapping_add(1);
                self.write16(bus, addr, value);
            }
            Operand16::Imm => unreachable!("immediate operand used as a destination"),
        }

        match (dst, src) {
            (Operand16::Reg(_), Operand16::Imm) => 10,
            (Operand16::Reg(_), Operand16::Reg(_)) => 6,
            // ED-prefixed LD (nn),rr / LD rr,(nn)
            _ if prefix == Prefix::Ed => 20,
            _ => 16,
        }
    }

    /// LD A,I / LD A,R: PV receives IFF2.
    pub(super) fn exec_ld_a_ir(&mut self, value: u8) -> u32 {
        self.regs.set_a(value);
        let mut f = Flags::sz53(value) | (self.regs.f() & Flags::C);
        f.set(Flags::PV, self.iff2);
        self.regs.set_f(f);
        9
    }
}
