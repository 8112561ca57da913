use crate::cpu::{Bus, Cpu, Reg8};

impl Cpu {
    /// IN A,(n): A supplies the high byte of the port address. Flags
    /// unaffected.
    pub(super) fn exec_in_a_n<B: Bus>(&mut self, bus: &mut B) -> u32 {
        let n = self.fetch8(bus);
        let port = u16::from_be_bytes([self.regs.a(), n]);
        self.regs.wz = port.wrapping_add(1);
        let value = bus.io_read(port);
        self.regs.set_a(value);
        11
    }

    pub(super) fn exec_out_n_a<B: Bus>(&mut self, bus: &mut B) -> u32 {
        let n = self.fetch8(bus);
        let a = self.regs.a();
        let port = u16::from_be_bytes([a, n]);
        bus.io_write(port, a);
        self.regs.wz = u16::from_be_bytes([a, n.wrapping_add(1)]);
        11
    }

    /// IN r,(C). With no target register only the flags change.
    pub(super) fn exec_in_c<B: Bus>(&mut self, bus: &mut B, reg: Option<Reg8>) -> u32 {
        let port = self.regs.bc();
        let value = bus.io_read(port);
        if let Some(reg) = reg {
            self.regs.set8(reg, value);
        }
        self.alu_sz53p_keep_carry(value);
        self.regs.wz = port.wrapping_add(1);
        12
    }

    /// OUT (C),r. The undocumented `OUT (C),0` form writes zero.
    pub(super) fn exec_out_c<B: Bus>(&mut self, bus: &mut B, reg: Option<Reg8>) -> u32 {
        let port = self.regs.bc();
        let value = reg.map_or(0, |reg| self.regs.get8(reg));
        bus.io_write(port, value);
        self.regs.wz = port.wrapping_add(1);
        12
    }
}
