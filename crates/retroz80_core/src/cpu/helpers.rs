use super::{Bus, Cond, Cpu, Flags, Operand8, Reg16};

impl Cpu {
    #[inline]
    pub(super) fn fetch8<B: Bus>(&mut self, bus: &mut B) -> u8 {
        let value = bus.read8(self.regs.pc);
        self.regs.pc = self.regs.pc.wrapping_add(1);
        value
    }

    /// 16-bit immediate, low byte first.
    #[inline]
    pub(super) fn fetch16<B: Bus>(&mut self, bus: &mut B) -> u16 {
        let lo = self.fetch8(bus);
        let hi = self.fetch8(bus);
        u16::from_le_bytes([lo, hi])
    }

    #[inline]
    pub(super) fn read16<B: Bus>(&mut self, bus: &mut B, addr: u16) -> u16 {
        let lo = bus.read8(addr);
        let hi = bus.read8(addr.wrapping_add(1));
        u16::from_le_bytes([lo, hi])
    }

    #[inline]
    pub(super) fn write16<B: Bus>(&mut self, bus: &mut B, addr: u16, value: u16) {
        let [lo, hi] = value.to_le_bytes();
        bus.write8(addr, lo);
        bus.write8(addr.wrapping_add(1), hi);
    }

    #[inline]
    pub(super) fn push_u16<B: Bus>(&mut self, bus: &mut B, value: u16) {
        let [lo, hi] = value.to_le_bytes();
        // Stack grows downward: memory[SP] = low, memory[SP+1] = high.
        self.regs.sp = self.regs.sp.wrapping_sub(1);
        bus.write8(self.regs.sp, hi);
        self.regs.sp = self.regs.sp.wrapping_sub(1);
        bus.write8(self.regs.sp, lo);
    }

    #[inline]
    pub(super) fn pop_u16<B: Bus>(&mut self, bus: &mut B) -> u16 {
        let value = self.read16(bus, self.regs.sp);
        self.regs.sp = self.regs.sp.wrapping_add(2);
        value
    }

    /// Read an 8-bit operand, consuming immediate bytes as needed.
    pub(super) fn read_operand8<B: Bus>(&mut self, bus: &mut B, operand: Operand8) -> u8 {
        match operand {
            Operand8::Reg(reg) => self.regs.get8(reg),
            Operand8::Imm => self.fetch8(bus),
            Operand8::Ind(pair) => {
                let addr = self.regs.get16(pair);
                if pair != Reg16::HL {
                    self.regs.wz = addr.wrapping_add(1);
                }
                bus.read8(addr)
            }
            Operand8::Idx(_) => bus.read8(self.ea),
            Operand8::Abs => {
                let addr = self.fetch16(bus);
                self.regs.wz = addr.wrapping_add(1);
                bus.read8(addr)
            }
        }
    }

    /// Write an 8-bit operand, consuming immediate address bytes as needed.
    pub(super) fn write_operand8<B: Bus>(&mut self, bus: &mut B, operand: Operand8, value: u8) {
        match operand {
            Operand8::Reg(reg) => self.regs.set8(reg, value),
            Operand8::Ind(pair) => {
                let addr = self.regs.get16(pair);
                if pair != Reg16::HL {
                    // Only LD (BC),A / LD (DE),A get here.
                    self.regs.wz = u16::from_be_bytes([value, addr.wrapping_add(1) as u8]);
                }
                bus.write8(addr, value);
            }
            Operand8::Idx(_) => bus.write8(self.ea, value),
            Operand8::Abs => {
                let addr = self.fetch16(bus);
                self.regs.wz = u16::from_be_bytes([value, addr.wrapping_add(1) as u8]);
                bus.write8(addr, value);
            }
            Operand8::Imm => unreachable!("immediate operand used as a destination"),
        }
    }

    /// Extra T-cycles an 8-bit operand adds on top of a register form,
    /// for read-modify-write style instructions: (HL) costs `ind`, (IX+d)
    /// costs `idx`.
    #[inline]
    pub(super) fn operand_cycles(operand: Operand8, reg: u32, ind: u32, idx: u32) -> u32 {
        match operand {
            Operand8::Idx(_) => idx,
            Operand8::Ind(_) | Operand8::Imm | Operand8::Abs => ind,
            Operand8::Reg(_) => reg,
        }
    }

    pub(super) fn condition(&self, cond: Cond) -> bool {
        match cond {
            Cond::NZ => !self.get_flag(Flags::Z),
            Cond::Z => self.get_flag(Flags::Z),
            Cond::NC => !self.get_flag(Flags::C),
            Cond::C => self.get_flag(Flags::C),
            Cond::PO => !self.get_flag(Flags::PV),
            Cond::PE => self.get_flag(Flags::PV),
            Cond::P => !self.get_flag(Flags::S),
            Cond::M => self.get_flag(Flags::S),
        }
    }
}
