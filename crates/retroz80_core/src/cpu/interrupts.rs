use super::{Bus, Cpu};

/// NMI entry address.
pub const NMI_VECTOR: u16 = 0x0066;
/// Interrupt mode 1 entry address.
pub const IM1_VECTOR: u16 = 0x0038;

impl Cpu {
    /// Latch a non-maskable interrupt. It is taken at the next instruction
    /// boundary regardless of IFF1.
    pub fn request_nmi(&mut self) {
        self.nmi_pending = true;
    }

    /// Drive the maskable interrupt line. `data` is the byte the interrupting
    /// device places on the data bus during acknowledge: an RST opcode in
    /// mode 0, the low byte of the vector table address in mode 2.
    pub fn set_irq(&mut self, active: bool, data: u8) {
        self.irq_line = active;
        self.irq_data = data;
    }

    /// Accept a pending interrupt at an instruction boundary. Returns the
    /// cycles spent on the acknowledge when one was taken.
    pub(super) fn handle_interrupts<B: Bus>(&mut self, bus: &mut B) -> Option<u32> {
        // Mid-instruction after a cancelled DD/FD.
        if self.pending_prefix.is_some() {
            return None;
        }

        if self.nmi_pending {
            self.nmi_pending = false;
            self.halted = false;
            self.regs.bump_r();
            // IFF2 keeps the pre-NMI state so RETN can restore it.
            self.iff1 = false;
            let ret = self.regs.pc;
            self.push_u16(bus, ret);
            self.regs.pc = NMI_VECTOR;
            self.regs.wz = NMI_VECTOR;
            log::debug!("NMI taken, return address 0x{ret:04X}");
            return Some(11);
        }

        if !self.irq_line || !self.iff1 || self.ei_delay {
            return None;
        }

        self.halted = false;
        self.regs.bump_r();
        self.iff1 = false;
        self.iff2 = false;
        let ret = self.regs.pc;
        self.push_u16(bus, ret);

        let cycles = match self.im {
            2 => {
                let table = u16::from_be_bytes([self.regs.i, self.irq_data]);
                self.regs.pc = self.read16(bus, table);
                19
            }
            1 => {
                self.regs.pc = IM1_VECTOR;
                13
            }
            // Mode 0 executes the byte on the data bus; only RST opcodes
            // are supported.
            _ => {
                self.regs.pc = u16::from(self.irq_data & 0x38);
                13
            }
        };
        self.regs.wz = self.regs.pc;
        log::debug!(
            "IRQ taken in IM {}, 0x{ret:04X} -> 0x{:04X}",
            self.im,
            self.regs.pc
        );
        Some(cycles)
    }
}
