use crate::cpu::{Bus, Cond, Cpu};

impl Cpu {
    /// JP nn / JP cc,nn. The address is always consumed.
    pub(super) fn exec_jp<B: Bus>(&mut self, bus: &mut B, cond: Option<Cond>) -> u32 {
        let addr = self.fetch16(bus);
        self.regs.wz = addr;
        if cond.map_or(true, |c| self.condition(c)) {
            self.regs.pc = addr;
        }
        10
    }

    /// Relative jump by a signed displacement, measured from the byte after
    /// the instruction.
    #[inline]
    fn jr_to(&mut self, offset: i8) {
        self.regs.pc = self.regs.pc.wrapping_add(offset as u16);
        self.regs.wz = self.regs.pc;
    }

    pub(super) fn exec_jr<B: Bus>(&mut self, bus: &mut B, cond: Option<Cond>) -> u32 {
        let offset = self.fetch8(bus) as i8;
        if cond.map_or(true, |c| self.condition(c)) {
            self.jr_to(offset);
            12
        } else {
            7
        }
    }

    pub(super) fn exec_djnz<B: Bus>(&mut self, bus: &mut B) -> u32 {
        let offset = self.fetch8(bus) as i8;
        let b = self.regs.b().wrapping_sub(1);
        self.regs.set_b(b);
        if b != 0 {
            self.jr_to(offset);
            13
        } else {
            8
        }
    }

    pub(super) fn exec_call<B: Bus>(&mut self, bus: &mut B, cond: Option<Cond>) -> u32 {
        let addr = self.fetch16(bus);
        self.regs.wz = addr;
        if cond.map_or(true, |c| self.condition(c)) {
            let ret = self.regs.pc;
            self.push_u16(bus, ret);
            self.regs.pc = addr;
            17
        } else {
            10
        }
    }

    pub(super) fn exec_ret<B: Bus>(&mut self, bus: &mut B, cond: Option<Cond>) -> u32 {
        match cond {
            None => {
                self.regs.pc = self.pop_u16(bus);
                self.regs.wz = self.regs.pc;
                10
            }
            Some(c) if self.condition(c) => {
                self.regs.pc = self.pop_u16(bus);
                self.regs.wz = self.regs.pc;
                11
            }
            Some(_) => 5,
        }
    }

    /// RETN and RETI: return and restore IFF1 from IFF2.
    pub(super) fn exec_retn<B: Bus>(&mut self, bus: &mut B) -> u32 {
        self.regs.pc = self.pop_u16(bus);
        self.regs.wz = self.regs.pc;
        self.iff1 = self.iff2;
        14
    }

    pub(super) fn exec_rst<B: Bus>(&mut self, bus: &mut B, vector: u8) -> u32 {
        let ret = self.regs.pc;
        self.push_u16(bus, ret);
        self.regs.pc = u16::from(vector);
        self.regs.wz = self.regs.pc;
        11
    }
}
