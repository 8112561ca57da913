use super::{parity, AluOp, Cpu, Flags, RotOp};

/// Shift/rotate a byte. Returns the result and the bit shifted out.
#[inline]
fn rotate(op: RotOp, value: u8, carry_in: bool) -> (u8, bool) {
    match op {
        RotOp::Rlc => (value.rotate_left(1), value & 0x80 != 0),
        RotOp::Rrc => (value.rotate_right(1), value & 0x01 != 0),
        RotOp::Rl => ((value << 1) | u8::from(carry_in), value & 0x80 != 0),
        RotOp::Rr => ((value >> 1) | (u8::from(carry_in) << 7), value & 0x01 != 0),
        RotOp::Sla => (value << 1, value & 0x80 != 0),
        RotOp::Sra => ((value >> 1) | (value & 0x80), value & 0x01 != 0),
        // Undocumented: shifts a one into bit 0.
        RotOp::Sll => ((value << 1) | 0x01, value & 0x80 != 0),
        RotOp::Srl => (value >> 1, value & 0x01 != 0),
    }
}

impl Cpu {
    /// Core 8-bit ADD/ADC operation on A.
    ///
    /// `use_carry` selects between ADD (false) and ADC (true).
    pub(super) fn alu_add(&mut self, value: u8, use_carry: bool) {
        let a = self.regs.a();
        let carry_in = u8::from(use_carry && self.get_flag(Flags::C));

        let half = (a & 0x0F) + (value & 0x0F) + carry_in;
        let full = u16::from(a) + u16::from(value) + u16::from(carry_in);
        let result = full as u8;

        self.regs.set_a(result);

        let mut f = Flags::sz53(result);
        f.set(Flags::H, half & 0x10 != 0);
        f.set(Flags::PV, !(a ^ value) & (a ^ result) & 0x80 != 0);
        f.set(Flags::C, full > 0xFF);
        self.regs.set_f(f);
    }

    /// Flags and result of `A - value - carry`, without storing the result.
    fn sub_flags(&self, value: u8, carry_in: u8) -> (u8, Flags) {
        let a = self.regs.a();
        let full = u16::from(a)
            .wrapping_sub(u16::from(value))
            .wrapping_sub(u16::from(carry_in));
        let result = full as u8;

        let mut f = Flags::sz53(result) | Flags::N;
        f.set(Flags::H, (a & 0x0F) < (value & 0x0F) + carry_in);
        f.set(Flags::PV, (a ^ value) & (a ^ result) & 0x80 != 0);
        f.set(Flags::C, full > 0xFF);
        (result, f)
    }

    /// Core 8-bit SUB/SBC operation on A.
    ///
    /// `use_carry` selects between SUB (false) and SBC (true).
    pub(super) fn alu_sub(&mut self, value: u8, use_carry: bool) {
        let carry_in = u8::from(use_carry && self.get_flag(Flags::C));
        let (result, f) = self.sub_flags(value, carry_in);
        self.regs.set_a(result);
        self.regs.set_f(f);
    }

    /// Compare A with `value`. X and Y come from the operand, not the result.
    #[inline]
    pub(super) fn alu_cp(&mut self, value: u8) {
        let (_, f) = self.sub_flags(value, 0);
        self.regs.set_f((f - (Flags::X | Flags::Y)) | Flags::xy(value));
    }

    #[inline]
    pub(super) fn alu_and(&mut self, value: u8) {
        let result = self.regs.a() & value;
        self.regs.set_a(result);
        self.regs.set_f(Flags::sz53p(result) | Flags::H);
    }

    #[inline]
    pub(super) fn alu_or(&mut self, value: u8) {
        let result = self.regs.a() | value;
        self.regs.set_a(result);
        self.regs.set_f(Flags::sz53p(result));
    }

    #[inline]
    pub(super) fn alu_xor(&mut self, value: u8) {
        let result = self.regs.a() ^ value;
        self.regs.set_a(result);
        self.regs.set_f(Flags::sz53p(result));
    }

    pub(super) fn alu_op(&mut self, op: AluOp, value: u8) {
        match op {
            AluOp::Add => self.alu_add(value, false),
            AluOp::Adc => self.alu_add(value, true),
            AluOp::Sub => self.alu_sub(value, false),
            AluOp::Sbc => self.alu_sub(value, true),
            AluOp::And => self.alu_and(value),
            AluOp::Xor => self.alu_xor(value),
            AluOp::Or => self.alu_or(value),
            AluOp::Cp => self.alu_cp(value),
        }
    }

    /// Decimal adjust accumulator after BCD addition/subtraction.
    ///
    /// Builds the 0x06/0x60 correction from A, H and C, then adds or
    /// subtracts it depending on N. N is preserved; H reflects the low-nibble
    /// correction.
    pub(super) fn alu_daa(&mut self) {
        let a = self.regs.a();
        let subtract = self.get_flag(Flags::N);
        let mut adjust = 0u8;
        let mut carry = self.get_flag(Flags::C);

        if self.get_flag(Flags::H) || (a & 0x0F) > 0x09 {
            adjust |= 0x06;
        }
        if carry || a > 0x99 {
            adjust |= 0x60;
            carry = true;
        }

        let result = if subtract {
            a.wrapping_sub(adjust)
        } else {
            a.wrapping_add(adjust)
        };

        let half = if subtract {
            self.get_flag(Flags::H) && (a & 0x0F) < 0x06
        } else {
            (a & 0x0F) > 0x09
        };

        self.regs.set_a(result);
        let mut f = Flags::sz53p(result);
        f.set(Flags::N, subtract);
        f.set(Flags::H, half);
        f.set(Flags::C, carry);
        self.regs.set_f(f);
    }

    /// 8-bit increment used by INC r, INC (HL) and INC (IX+d).
    ///
    /// C is unchanged; PV flags the 0x7F -> 0x80 overflow.
    #[inline]
    pub(super) fn alu_inc8(&mut self, value: u8) -> u8 {
        let result = value.wrapping_add(1);
        let mut f = Flags::sz53(result) | (self.regs.f() & Flags::C);
        f.set(Flags::H, value & 0x0F == 0x0F);
        f.set(Flags::PV, value == 0x7F);
        self.regs.set_f(f);
        result
    }

    /// 8-bit decrement. C is unchanged; PV flags the 0x80 -> 0x7F overflow.
    #[inline]
    pub(super) fn alu_dec8(&mut self, value: u8) -> u8 {
        let result = value.wrapping_sub(1);
        let mut f = Flags::sz53(result) | Flags::N | (self.regs.f() & Flags::C);
        f.set(Flags::H, value & 0x0F == 0x00);
        f.set(Flags::PV, value == 0x80);
        self.regs.set_f(f);
        result
    }

    /// 16-bit add for `ADD HL,rr` and its IX/IY forms.
    ///
    /// S, Z and PV are unaffected; N is cleared; H is the carry out of bit
    /// 11; X and Y come from the high byte of the result.
    #[inline]
    pub(super) fn alu_add16(&mut self, lhs: u16, rhs: u16) -> u16 {
        let full = u32::from(lhs) + u32::from(rhs);
        let result = full as u16;

        let mut f = (self.regs.f() & (Flags::S | Flags::Z | Flags::PV))
            | Flags::xy((result >> 8) as u8);
        f.set(Flags::H, (lhs & 0x0FFF) + (rhs & 0x0FFF) > 0x0FFF);
        f.set(Flags::C, full > 0xFFFF);
        self.regs.set_f(f);
        self.regs.wz = lhs.wrapping_add(1);
        result
    }

    /// `ADC HL,rr`: full 16-bit flag set.
    pub(super) fn alu_adc16(&mut self, value: u16) {
        let hl = self.regs.hl();
        let carry_in = u32::from(self.get_flag(Flags::C));
        let full = u32::from(hl) + u32::from(value) + carry_in;
        let result = full as u16;

        let mut f = Flags::xy((result >> 8) as u8);
        f.set(Flags::S, result & 0x8000 != 0);
        f.set(Flags::Z, result == 0);
        f.set(
            Flags::H,
            u32::from(hl & 0x0FFF) + u32::from(value & 0x0FFF) + carry_in > 0x0FFF,
        );
        f.set(Flags::PV, !(hl ^ value) & (hl ^ result) & 0x8000 != 0);
        f.set(Flags::C, full > 0xFFFF);
        self.regs.set_f(f);
        self.regs.wz = hl.wrapping_add(1);
        self.regs.set_hl(result);
    }

    /// `SBC HL,rr`: full 16-bit flag set.
    pub(super) fn alu_sbc16(&mut self, value: u16) {
        let hl = self.regs.hl();
        let carry_in = u32::from(self.get_flag(Flags::C));
        let full = u32::from(hl)
            .wrapping_sub(u32::from(value))
            .wrapping_sub(carry_in);
        let result = full as u16;

        let mut f = Flags::xy((result >> 8) as u8) | Flags::N;
        f.set(Flags::S, result & 0x8000 != 0);
        f.set(Flags::Z, result == 0);
        f.set(
            Flags::H,
            u32::from(hl & 0x0FFF) < u32::from(value & 0x0FFF) + carry_in,
        );
        f.set(Flags::PV, (hl ^ value) & (hl ^ result) & 0x8000 != 0);
        f.set(Flags::C, full > 0xFFFF);
        self.regs.set_f(f);
        self.regs.wz = hl.wrapping_add(1);
        self.regs.set_hl(result);
    }

    /// CB-table rotate/shift: S, Z, PV (parity), X and Y from the result.
    pub(super) fn alu_rot(&mut self, op: RotOp, value: u8) -> u8 {
        let (result, carry) = rotate(op, value, self.get_flag(Flags::C));
        let mut f = Flags::sz53p(result);
        f.set(Flags::C, carry);
        self.regs.set_f(f);
        result
    }

    /// RLCA/RRCA/RLA/RRA: only H, N, C, X and Y change.
    pub(super) fn alu_rot_a(&mut self, op: RotOp) {
        let (result, carry) = rotate(op, self.regs.a(), self.get_flag(Flags::C));
        self.regs.set_a(result);
        let mut f = (self.regs.f() & (Flags::S | Flags::Z | Flags::PV)) | Flags::xy(result);
        f.set(Flags::C, carry);
        self.regs.set_f(f);
    }

    /// Test `bit` of `value`. X and Y come from `xy`, which is the tested
    /// register for register forms and the high byte of MEMPTR otherwise.
    pub(super) fn alu_bit(&mut self, bit: u8, value: u8, xy: u8) {
        let set = value & (1 << bit) != 0;
        let mut f = (self.regs.f() & Flags::C) | Flags::H | Flags::xy(xy);
        f.set(Flags::Z | Flags::PV, !set);
        f.set(Flags::S, bit == 7 && set);
        self.regs.set_f(f);
    }

    /// Flags for RLD/RRD and IN r,(C): sz53p of the value, C preserved.
    #[inline]
    pub(super) fn alu_sz53p_keep_carry(&mut self, value: u8) {
        let f = Flags::sz53p(value) | (self.regs.f() & Flags::C);
        self.regs.set_f(f);
    }

    /// Flags shared by INI/IND/OUTI/OUTD and their repeats. `k` is the
    /// transferred byte plus the low byte the hardware adds it to.
    pub(super) fn alu_block_io(&mut self, value: u8, k: u16) {
        let b = self.regs.b();
        let mut f = Flags::sz53(b);
        f.set(Flags::N, value & 0x80 != 0);
        f.set(Flags::H | Flags::C, k > 0xFF);
        f.set(Flags::PV, parity((k as u8 & 0x07) ^ b));
        self.regs.set_f(f);
    }
}
