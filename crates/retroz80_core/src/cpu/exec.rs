mod alu;
mod bits;
mod block;
mod control;
mod incdec;
mod io;
mod ld;
mod stack;
mod system;

use super::{Bus, Cpu, Instruction, Op, Prefix};

impl Cpu {
    /// Execute a decoded instruction and return the number of T-cycles.
    ///
    /// Operations that address (IX+d)/(IY+d) have their effective address
    /// resolved before dispatch: the displacement comes from the fetch stage
    /// for DD-CB/FD-CB and from the instruction stream otherwise, where it
    /// sits directly after the opcode and before any immediate.
    pub(super) fn execute<B: Bus>(
        &mut self,
        bus: &mut B,
        instr: &Instruction,
        displacement: Option<i8>,
    ) -> u32 {
        if let Some(index) = instr.op.indexed() {
            let d = match displacement {
                Some(d) => d,
                None => self.fetch8(bus) as i8,
            };
            self.ea = self.regs.index(index).wrapping_add(d as u16);
            self.regs.wz = self.ea;
        }

        let cycles = match instr.op {
            Op::Nop => 4,
            Op::IgnoredPrefix => 4,
            Op::EdNop => 8,
            Op::Halt => self.exec_halt(),

            // Loads and exchanges
            Op::Ld8 { dst, src } => self.exec_ld8(bus, dst, src),
            Op::Ld16 { dst, src } => self.exec_ld16(bus, instr.prefix, dst, src),
            Op::LdAI => self.exec_ld_a_ir(self.regs.i),
            Op::LdAR => self.exec_ld_a_ir(self.regs.r),
            Op::LdIA => {
                self.regs.i = self.regs.a();
                9
            }
            Op::LdRA => {
                self.regs.r = self.regs.a();
                9
            }
            Op::Push(reg) => self.exec_push(bus, reg),
            Op::Pop(reg) => self.exec_pop(bus, reg),
            Op::ExAf => {
                self.regs.ex_af();
                4
            }
            Op::Exx => {
                self.regs.exx();
                4
            }
            Op::ExDeHl => self.exec_ex_de_hl(),
            Op::ExSp(reg) => self.exec_ex_sp(bus, reg),

            // Arithmetic
            Op::Alu { op, src } => self.exec_alu(bus, op, src),
            Op::Inc8(target) => self.exec_inc8(bus, target),
            Op::Dec8(target) => self.exec_dec8(bus, target),
            Op::Inc16(reg) => self.exec_inc16(reg),
            Op::Dec16(reg) => self.exec_dec16(reg),
            Op::Add16 { dst, src } => self.exec_add16(dst, src),
            Op::Adc16(reg) => self.exec_adc16(reg),
            Op::Sbc16(reg) => self.exec_sbc16(reg),
            Op::Daa => {
                self.alu_daa();
                4
            }
            Op::Cpl => self.exec_cpl(),
            Op::Neg => self.exec_neg(),
            Op::Scf => self.exec_scf(),
            Op::Ccf => self.exec_ccf(),

            // Rotates and bit operations
            Op::RotA(op) => {
                self.alu_rot_a(op);
                4
            }
            Op::Rot { op, target, copy } => self.exec_rot(bus, op, target, copy),
            Op::Bit { bit, src } => self.exec_bit(bus, bit, src),
            Op::Res { bit, target, copy } => self.exec_res_set(bus, bit, target, copy, false),
            Op::Set { bit, target, copy } => self.exec_res_set(bus, bit, target, copy, true),
            Op::Rld => self.exec_rld(bus),
            Op::Rrd => self.exec_rrd(bus),

            // Control flow
            Op::Jp(cond) => self.exec_jp(bus, cond),
            Op::JpInd(reg) => {
                self.regs.pc = self.regs.get16(reg);
                4
            }
            Op::Jr(cond) => self.exec_jr(bus, cond),
            Op::Djnz => self.exec_djnz(bus),
            Op::Call(cond) => self.exec_call(bus, cond),
            Op::Ret(cond) => self.exec_ret(bus, cond),
            Op::Retn | Op::Reti => self.exec_retn(bus),
            Op::Rst(vector) => self.exec_rst(bus, vector),

            // Interrupt control
            Op::Di => self.exec_di(),
            Op::Ei => self.exec_ei(),
            Op::Im(mode) => self.exec_im(mode),

            // I/O
            Op::InAN => self.exec_in_a_n(bus),
            Op::OutNA => self.exec_out_n_a(bus),
            Op::InC(reg) => self.exec_in_c(bus, reg),
            Op::OutC(reg) => self.exec_out_c(bus, reg),
            Op::Block(op) => self.exec_block(bus, op),
        };

        // DD/FD cost one extra opcode fetch on top of the unprefixed form.
        // A cancelled prefix is already charged as a plain four-cycle fetch.
        match (instr.prefix, instr.op) {
            (_, Op::IgnoredPrefix) => cycles,
            (Prefix::Dd | Prefix::Fd, _) => cycles + 4,
            _ => cycles,
        }
    }
}
