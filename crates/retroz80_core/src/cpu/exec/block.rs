use crate::cpu::{BlockKind, BlockOp, Bus, Cpu, Flags};

#[inline]
fn advance(value: u16, decrement: bool) -> u16 {
    if decrement {
        value.wrapping_sub(1)
    } else {
        value.wrapping_add(1)
    }
}

impl Cpu {
    /// LDI/LDD/CPI/CPD/INI/IND/OUTI/OUTD and their repeating forms.
    ///
    /// A repeating form that has not finished rewinds PC onto itself, so it
    /// runs again as a fresh instruction on the next step.
    pub(super) fn exec_block<B: Bus>(&mut self, bus: &mut B, op: BlockOp) -> u32 {
        let again = match op.kind {
            BlockKind::Ld => self.block_ld(bus, op.decrement),
            BlockKind::Cp => self.block_cp(bus, op.decrement),
            BlockKind::In => self.block_in(bus, op.decrement),
            BlockKind::Out => self.block_out(bus, op.decrement),
        };

        if op.repeat && again {
            self.regs.pc = self.regs.pc.wrapping_sub(2);
            self.regs.wz = self.regs.pc.wrapping_add(1);
            21
        } else {
            16
        }
    }

    /// Returns whether BC is still non-zero.
    fn block_ld<B: Bus>(&mut self, bus: &mut B, decrement: bool) -> bool {
        let hl = self.regs.hl();
        let de = self.regs.de();
        let value = bus.read8(hl);
        bus.write8(de, value);
        self.regs.set_hl(advance(hl, decrement));
        self.regs.set_de(advance(de, decrement));
        let bc = self.regs.bc().wrapping_sub(1);
        self.regs.set_bc(bc);

        // X and Y come from bits 3 and 1 of the byte plus A.
        let n = value.wrapping_add(self.regs.a());
        let mut f = self.regs.f() & (Flags::S | Flags::Z | Flags::C);
        f.set(Flags::X, n & 0x08 != 0);
        f.set(Flags::Y, n & 0x02 != 0);
        f.set(Flags::PV, bc != 0);
        self.regs.set_f(f);
        bc != 0
    }

    /// Returns whether BC is non-zero and no match was found.
    fn block_cp<B: Bus>(&mut self, bus: &mut B, decrement: bool) -> bool {
        let hl = self.regs.hl();
        let value = bus.read8(hl);
        let a = self.regs.a();
        let result = a.wrapping_sub(value);
        let half = (a & 0x0F) < (value & 0x0F);
        self.regs.set_hl(advance(hl, decrement));
        let bc = self.regs.bc().wrapping_sub(1);
        self.regs.set_bc(bc);
        self.regs.wz = advance(self.regs.wz, decrement);

        let n = result.wrapping_sub(u8::from(half));
        let mut f = (self.regs.f() & Flags::C) | Flags::N;
        f.set(Flags::S, result & 0x80 != 0);
        f.set(Flags::Z, result == 0);
        f.set(Flags::H, half);
        f.set(Flags::X, n & 0x08 != 0);
        f.set(Flags::Y, n & 0x02 != 0);
        f.set(Flags::PV, bc != 0);
        self.regs.set_f(f);
        bc != 0 && result != 0
    }

    /// Returns whether B is still non-zero.
    fn block_in<B: Bus>(&mut self, bus: &mut B, decrement: bool) -> bool {
        let port = self.regs.bc();
        let value = bus.io_read(port);
        let hl = self.regs.hl();
        bus.write8(hl, value);
        self.regs.wz = advance(port, decrement);
        self.regs.set_b(self.regs.b().wrapping_sub(1));
        self.regs.set_hl(advance(hl, decrement));

        let c = if decrement {
            self.regs.c().wrapping_sub(1)
        } else {
            self.regs.c().wrapping_add(1)
        };
        self.alu_block_io(value, u16::from(value) + u16::from(c));
        self.regs.b() != 0
    }

    /// Returns whether B is still non-zero.
    fn block_out<B: Bus>(&mut self, bus: &mut B, decrement: bool) -> bool {
        let hl = self.regs.hl();
        let value = bus.read8(hl);
        // B is decremented before it reaches the port address.
        self.regs.set_b(self.regs.b().wrapping_sub(1));
        let port = self.regs.bc();
        bus.io_write(port, value);
        self.regs.set_hl(advance(hl, decrement));
        self.regs.wz = advance(port, decrement);

        let k = u16::from(value) + u16::from(self.regs.l());
        self.alu_block_io(value, k);
        self.regs.b() != 0
    }
}
