use super::*;

struct TestBus {
    memory: [u8; 0x10000],
    /// Every memory read address, in order.
    reads: Vec<u16>,
    /// Value returned by every port read.
    io_value: u8,
    io_reads: Vec<u16>,
    io_writes: Vec<(u16, u8)>,
}

impl Default for TestBus {
    fn default() -> Self {
        Self {
            memory: [0; 0x10000],
            reads: Vec::new(),
            io_value: 0xFF,
            io_reads: Vec::new(),
            io_writes: Vec::new(),
        }
    }
}

impl Bus for TestBus {
    fn read8(&mut self, addr: u16) -> u8 {
        self.reads.push(addr);
        self.memory[addr as usize]
    }

    fn write8(&mut self, addr: u16, value: u8) {
        self.memory[addr as usize] = value;
    }

    fn io_read(&mut self, port: u16) -> u8 {
        self.io_reads.push(port);
        self.io_value
    }

    fn io_write(&mut self, port: u16, value: u8) {
        self.io_writes.push((port, value));
    }
}

/// CPU at PC 0 with `program` loaded there and the stack well clear of it.
fn cpu_with(program: &[u8]) -> (Cpu, TestBus) {
    let mut bus = TestBus::default();
    bus.memory[..program.len()].copy_from_slice(program);
    let mut cpu = Cpu::new();
    cpu.regs.sp = 0xFFF0;
    (cpu, bus)
}

#[test]
fn power_on_state() {
    let cpu = Cpu::new();
    let snap = cpu.snapshot();
    assert_eq!(snap.af(), 0xFFFF);
    assert_eq!(snap.shadow.a, 0xFF);
    assert_eq!(snap.f_shadow, Flags::all());
    assert_eq!(snap.sp, 0xFFFF);
    assert_eq!(snap.pc, 0x0000);
    assert!(!snap.iff1 && !snap.iff2);
    assert_eq!(snap.cycles_remaining, 0);
    assert_eq!(snap.last, None);
}

#[test]
fn reset_clears_control_state_only() {
    let mut cpu = Cpu::new();
    cpu.regs.set_bc(0x1234);
    cpu.regs.pc = 0x4000;
    cpu.regs.i = 0x05;
    cpu.regs.r = 0x07;
    cpu.iff1 = true;
    cpu.iff2 = true;
    cpu.im = 2;
    cpu.halted = true;

    cpu.reset();

    assert_eq!(cpu.regs.pc, 0);
    assert_eq!(cpu.regs.i, 0);
    assert_eq!(cpu.regs.r, 0);
    assert!(!cpu.iff1 && !cpu.iff2);
    assert_eq!(cpu.im, 0);
    assert!(!cpu.halted);
    assert_eq!(cpu.regs.bc(), 0x1234);
}

#[test]
fn flag_access_touches_one_bit_at_a_time() {
    let mut cpu = Cpu::new();
    for flag in Flags::all().iter() {
        cpu.clear_flags();
        cpu.set_flag(flag, true);
        assert_eq!(cpu.regs.f(), flag);
        assert!(cpu.get_flag(flag));

        cpu.regs.set_f(Flags::all());
        cpu.set_flag(flag, false);
        assert_eq!(cpu.regs.f(), Flags::all() - flag);
        assert!(!cpu.get_flag(flag));
    }
}

#[test]
fn jp_nn_consumes_three_bytes() {
    let (mut cpu, mut bus) = cpu_with(&[0xC3, 0x34, 0x12]);
    assert_eq!(cpu.step(&mut bus), 10);
    assert_eq!(cpu.regs.pc, 0x1234);
    assert_eq!(cpu.regs.r, 1);

    let last = cpu.last_instruction().unwrap();
    assert_eq!(last.prefix, Prefix::None);
    assert_eq!(last.opcode, 0xC3);
    assert_eq!(last.op, Op::Jp(None));
}

#[test]
fn clock_spreads_an_instruction_over_its_cycles() {
    // LD BC,0x1234 (10 cycles) then NOP.
    let (mut cpu, mut bus) = cpu_with(&[0x01, 0x34, 0x12, 0x00]);

    assert!(cpu.clock(&mut bus));
    assert_eq!(cpu.regs.bc(), 0x1234);
    assert_eq!(cpu.cycles_remaining(), 9);

    for _ in 0..9 {
        assert!(!cpu.clock(&mut bus));
        assert_eq!(cpu.regs.pc, 0x0003);
        assert_eq!(cpu.regs.r, 1);
    }
    assert_eq!(cpu.cycles_remaining(), 0);

    assert!(cpu.clock(&mut bus));
    assert_eq!(cpu.regs.pc, 0x0004);
    assert_eq!(cpu.cycles_remaining(), 3);
}

#[test]
fn indexed_bit_form_reads_displacement_before_opcode() {
    // RLC (IX-2)
    let (mut cpu, mut bus) = cpu_with(&[0xDD, 0xCB, 0xFE, 0x06]);
    cpu.regs.ix = 0x1000;
    bus.memory[0x0FFE] = 0x01;

    assert_eq!(cpu.step(&mut bus), 23);
    assert_eq!(cpu.regs.pc, 0x0004);
    assert_eq!(bus.memory[0x0FFE], 0x02);
    assert!(!cpu.get_flag(Flags::C));
    assert_eq!(cpu.regs.r, 2);

    let last = cpu.last_instruction().unwrap();
    assert_eq!(last.prefix, Prefix::DdCb);
    assert_eq!(last.opcode, 0x06);
}

#[test]
fn indexed_bit_form_copies_result_into_register() {
    // RLC (IY+1),B
    let (mut cpu, mut bus) = cpu_with(&[0xFD, 0xCB, 0x01, 0x00]);
    cpu.regs.iy = 0x2000;
    bus.memory[0x2001] = 0x80;

    assert_eq!(cpu.step(&mut bus), 23);
    assert_eq!(bus.memory[0x2001], 0x01);
    assert_eq!(cpu.regs.b(), 0x01);
    assert!(cpu.get_flag(Flags::C));
}

#[test]
fn indexed_store_reads_displacement_then_immediate() {
    // LD (IX+5),0xAB
    let (mut cpu, mut bus) = cpu_with(&[0xDD, 0x36, 0x05, 0xAB]);
    cpu.regs.ix = 0x2000;

    assert_eq!(cpu.step(&mut bus), 19);
    assert_eq!(bus.memory[0x2005], 0xAB);
    assert_eq!(cpu.regs.pc, 0x0004);
}

#[test]
fn indexed_load_with_negative_displacement() {
    // LD A,(IY-1)
    let (mut cpu, mut bus) = cpu_with(&[0xFD, 0x7E, 0xFF]);
    cpu.regs.iy = 0x3001;
    bus.memory[0x3000] = 0x77;

    assert_eq!(cpu.step(&mut bus), 19);
    assert_eq!(cpu.regs.a(), 0x77);
    assert_eq!(cpu.regs.pc, 0x0003);
}

#[test]
fn index_prefix_substitutes_halves_but_not_alongside_memory() {
    // LD IXH,0x12 ; LD B,IXH ; LD H,(IX+5)
    let (mut cpu, mut bus) = cpu_with(&[0xDD, 0x26, 0x12, 0xDD, 0x44, 0xDD, 0x66, 0x05]);
    cpu.regs.ix = 0x0034;
    cpu.regs.set_hl(0x0000);

    assert_eq!(cpu.step(&mut bus), 11);
    assert_eq!(cpu.regs.ix, 0x1234);
    assert_eq!(cpu.regs.h(), 0x00);

    assert_eq!(cpu.step(&mut bus), 8);
    assert_eq!(cpu.regs.b(), 0x12);

    bus.memory[0x1239] = 0x99;
    assert_eq!(cpu.step(&mut bus), 19);
    assert_eq!(cpu.regs.h(), 0x99);
    assert_eq!(cpu.regs.ix, 0x1234);
}

#[test]
fn index_prefix_on_plain_instruction_costs_four_cycles() {
    let (mut cpu, mut bus) = cpu_with(&[0xDD, 0x00]);
    assert_eq!(cpu.step(&mut bus), 8);
    assert_eq!(cpu.regs.pc, 0x0002);
    assert_eq!(cpu.regs.r, 2);
}

#[test]
fn chained_index_prefix_is_dropped() {
    // DD DD 21 34 12: the first DD is a no-op, then LD IX,0x1234.
    let (mut cpu, mut bus) = cpu_with(&[0xDD, 0xDD, 0x21, 0x34, 0x12]);
    assert_eq!(cpu.step(&mut bus), 4);
    // The second DD has already been fetched.
    assert_eq!(cpu.regs.pc, 0x0002);
    assert_eq!(cpu.regs.r, 2);
    assert_eq!(cpu.last_instruction().unwrap().op, Op::IgnoredPrefix);

    assert_eq!(cpu.step(&mut bus), 14);
    assert_eq!(cpu.regs.ix, 0x1234);
    assert_eq!(cpu.regs.pc, 0x0005);
    assert_eq!(cpu.regs.r, 3);
    assert_eq!(bus.reads, [0x0000, 0x0001, 0x0002, 0x0003, 0x0004]);
}

#[test]
fn prefixed_opcodes_are_read_once() {
    // RLC B ; LD IX,0x1234 ; NEG ; RLC (IX+1)
    let (mut cpu, mut bus) = cpu_with(&[
        0xCB, 0x00, //
        0xDD, 0x21, 0x34, 0x12, //
        0xED, 0x44, //
        0xDD, 0xCB, 0x01, 0x06,
    ]);
    cpu.step(&mut bus);
    assert_eq!(bus.reads, [0x0000, 0x0001]);

    bus.reads.clear();
    cpu.step(&mut bus);
    assert_eq!(bus.reads, [0x0002, 0x0003, 0x0004, 0x0005]);

    bus.reads.clear();
    cpu.step(&mut bus);
    assert_eq!(bus.reads, [0x0006, 0x0007]);

    bus.reads.clear();
    cpu.step(&mut bus);
    assert_eq!(bus.reads, [0x0008, 0x0009, 0x000A, 0x000B, 0x1235]);
}

#[test]
fn index_prefix_before_ed_defers_to_ed() {
    // FD ED 44: FD is dropped, then NEG.
    let (mut cpu, mut bus) = cpu_with(&[0xFD, 0xED, 0x44]);
    cpu.regs.set_a(0x01);
    assert_eq!(cpu.step(&mut bus), 4);
    assert_eq!(cpu.step(&mut bus), 8);
    assert_eq!(cpu.regs.a(), 0xFF);
}

#[test]
fn refresh_counter_counts_opcode_fetches() {
    let (mut cpu, mut bus) = cpu_with(&[
        0x00, // NOP
        0xCB, 0x00, // RLC B
        0xDD, 0x21, 0x00, 0x80, // LD IX,0x8000
        0xED, 0x44, // NEG
        0xDD, 0xCB, 0x00, 0x06, // RLC (IX+0)
    ]);
    cpu.regs.r = 0x80;
    let expected = [0x81, 0x83, 0x85, 0x87, 0x89];
    for r in expected {
        cpu.step(&mut bus);
        assert_eq!(cpu.regs.r, r);
    }
}

#[test]
fn exchange_opcodes_swap_register_sets() {
    // EXX ; EX AF,AF'
    let (mut cpu, mut bus) = cpu_with(&[0xD9, 0x08]);
    cpu.regs.set_af(0x1200);
    cpu.regs.set_bc(0x1111);
    cpu.regs.set_de(0x2222);
    cpu.regs.set_hl(0x3333);

    assert_eq!(cpu.step(&mut bus), 4);
    let snap = cpu.snapshot();
    assert_eq!(snap.main.bc(), 0x0000);
    assert_eq!(snap.shadow.bc(), 0x1111);
    assert_eq!(snap.shadow.de(), 0x2222);
    assert_eq!(snap.shadow.hl(), 0x3333);
    assert_eq!(snap.af(), 0x1200);

    assert_eq!(cpu.step(&mut bus), 4);
    let snap = cpu.snapshot();
    assert_eq!(snap.af(), 0xFFFF);
    assert_eq!(snap.shadow.a, 0x12);
    assert_eq!(snap.f_shadow, Flags::empty());
}

#[test]
fn ex_de_hl_and_ex_sp_hl() {
    // EX DE,HL ; EX (SP),HL
    let (mut cpu, mut bus) = cpu_with(&[0xEB, 0xE3]);
    cpu.regs.set_de(0x1234);
    cpu.regs.set_hl(0x5678);
    bus.memory[0xFFF0] = 0xCD;
    bus.memory[0xFFF1] = 0xAB;

    assert_eq!(cpu.step(&mut bus), 4);
    assert_eq!(cpu.regs.de(), 0x5678);
    assert_eq!(cpu.regs.hl(), 0x1234);

    assert_eq!(cpu.step(&mut bus), 19);
    assert_eq!(cpu.regs.hl(), 0xABCD);
    assert_eq!(bus.memory[0xFFF0], 0x34);
    assert_eq!(bus.memory[0xFFF1], 0x12);
    assert_eq!(cpu.regs.sp, 0xFFF0);
}

#[test]
fn push_stores_high_byte_above_low_byte() {
    // PUSH BC ; POP HL
    let (mut cpu, mut bus) = cpu_with(&[0xC5, 0xE1]);
    cpu.regs.set_bc(0x1234);

    assert_eq!(cpu.step(&mut bus), 11);
    assert_eq!(cpu.regs.sp, 0xFFEE);
    assert_eq!(bus.memory[0xFFEE], 0x34);
    assert_eq!(bus.memory[0xFFEF], 0x12);

    assert_eq!(cpu.step(&mut bus), 10);
    assert_eq!(cpu.regs.hl(), 0x1234);
    assert_eq!(cpu.regs.sp, 0xFFF0);
}

#[test]
fn add_sets_overflow_and_half_carry() {
    // ADD A,0x01
    let (mut cpu, mut bus) = cpu_with(&[0xC6, 0x01]);
    cpu.regs.set_a(0x7F);
    assert_eq!(cpu.step(&mut bus), 7);
    assert_eq!(cpu.regs.a(), 0x80);
    assert_eq!(cpu.regs.f(), Flags::S | Flags::H | Flags::PV);
}

#[test]
fn cp_takes_undocumented_bits_from_operand() {
    // CP 0x28
    let (mut cpu, mut bus) = cpu_with(&[0xFE, 0x28]);
    cpu.regs.set_a(0x10);
    assert_eq!(cpu.step(&mut bus), 7);
    assert_eq!(cpu.regs.a(), 0x10);
    assert_eq!(
        cpu.regs.f(),
        Flags::S | Flags::H | Flags::N | Flags::C | Flags::X | Flags::Y
    );
}

#[test]
fn adc_and_sbc_include_carry() {
    // ADC A,0x7F ; SBC A,0x01
    let (mut cpu, mut bus) = cpu_with(&[0xCE, 0x7F, 0xDE, 0x01]);
    cpu.regs.set_a(0x00);
    cpu.regs.set_f(Flags::C);
    assert_eq!(cpu.step(&mut bus), 7);
    assert_eq!(cpu.regs.a(), 0x80);
    assert_eq!(cpu.regs.f(), Flags::S | Flags::H | Flags::PV);

    cpu.regs.set_a(0x00);
    cpu.regs.set_f(Flags::C);
    assert_eq!(cpu.step(&mut bus), 7);
    assert_eq!(cpu.regs.a(), 0xFE);
    assert_eq!(
        cpu.regs.f(),
        Flags::S | Flags::Y | Flags::H | Flags::X | Flags::N | Flags::C
    );
}

#[test]
fn adc_and_sbc_without_carry() {
    // ADC A,0x01 ; SBC A,0x01
    let (mut cpu, mut bus) = cpu_with(&[0xCE, 0x01, 0xDE, 0x01]);
    cpu.regs.set_a(0xFF);
    cpu.regs.set_f(Flags::empty());
    cpu.step(&mut bus);
    assert_eq!(cpu.regs.a(), 0x00);
    assert_eq!(cpu.regs.f(), Flags::Z | Flags::H | Flags::C);

    cpu.regs.set_a(0x01);
    cpu.regs.set_f(Flags::empty());
    cpu.step(&mut bus);
    assert_eq!(cpu.regs.a(), 0x00);
    assert_eq!(cpu.regs.f(), Flags::Z | Flags::N);
}

#[test]
fn logical_ops_set_parity_and_clear_carry() {
    let cases: &[(u8, u8, u8, u8, Flags)] = &[
        // AND n: H always set
        (0xE6, 0x3C, 0x0F, 0x0C, Flags::H | Flags::PV | Flags::X),
        (0xE6, 0xF0, 0x0F, 0x00, Flags::Z | Flags::H | Flags::PV),
        (0xE6, 0x83, 0x81, 0x81, Flags::S | Flags::H | Flags::PV),
        (0xE6, 0x07, 0x03, 0x03, Flags::H | Flags::PV),
        (0xE6, 0x07, 0x07, 0x07, Flags::H),
        // OR n
        (0xF6, 0x80, 0x01, 0x81, Flags::S | Flags::PV),
        (0xF6, 0x06, 0x01, 0x07, Flags::empty()),
        (0xF6, 0x00, 0x00, 0x00, Flags::Z | Flags::PV),
        // XOR n
        (0xEE, 0x5A, 0xFF, 0xA5, Flags::S | Flags::Y | Flags::PV),
        (0xEE, 0x3C, 0x3C, 0x00, Flags::Z | Flags::PV),
        (0xEE, 0x01, 0x29, 0x28, Flags::Y | Flags::X | Flags::PV),
        (0xEE, 0x00, 0x01, 0x01, Flags::empty()),
    ];

    for &(opcode, a, n, result, flags) in cases {
        let (mut cpu, mut bus) = cpu_with(&[opcode, n]);
        cpu.regs.set_a(a);
        cpu.regs.set_f(Flags::C | Flags::N);
        assert_eq!(cpu.step(&mut bus), 7);
        assert_eq!(cpu.regs.a(), result, "{opcode:02X} {a:02X},{n:02X}");
        assert_eq!(cpu.regs.f(), flags, "{opcode:02X} {a:02X},{n:02X}");
    }
}

#[test]
fn parity_and_sign_conditions() {
    // (y, flag, taken when the flag is set): PO, PE, P, M
    let conditions = [
        (4u8, Flags::PV, false),
        (5, Flags::PV, true),
        (6, Flags::S, false),
        (7, Flags::S, true),
    ];

    for (y, flag, when_set) in conditions {
        for set in [false, true] {
            let taken = set == when_set;
            let flags = if set { flag } else { Flags::empty() };

            // JP cc,0x1234
            let (mut cpu, mut bus) = cpu_with(&[0xC2 | (y << 3), 0x34, 0x12]);
            cpu.regs.set_f(flags);
            assert_eq!(cpu.step(&mut bus), 10);
            assert_eq!(cpu.regs.pc, if taken { 0x1234 } else { 0x0003 });

            // CALL cc,0x1234
            let (mut cpu, mut bus) = cpu_with(&[0xC4 | (y << 3), 0x34, 0x12]);
            cpu.regs.set_f(flags);
            assert_eq!(cpu.step(&mut bus), if taken { 17 } else { 10 });
            assert_eq!(cpu.regs.pc, if taken { 0x1234 } else { 0x0003 });
            assert_eq!(cpu.regs.sp, if taken { 0xFFEE } else { 0xFFF0 });

            // RET cc, with 0x4000 on the stack
            let (mut cpu, mut bus) = cpu_with(&[0xC0 | (y << 3)]);
            bus.memory[0xFFF0] = 0x00;
            bus.memory[0xFFF1] = 0x40;
            cpu.regs.set_f(flags);
            assert_eq!(cpu.step(&mut bus), if taken { 11 } else { 5 });
            assert_eq!(cpu.regs.pc, if taken { 0x4000 } else { 0x0001 });
        }
    }
}

#[test]
fn inc_and_dec_keep_carry() {
    // INC A ; DEC A
    let (mut cpu, mut bus) = cpu_with(&[0x3C, 0x3D]);
    cpu.regs.set_a(0x7F);
    cpu.regs.set_f(Flags::C);

    assert_eq!(cpu.step(&mut bus), 4);
    assert_eq!(cpu.regs.a(), 0x80);
    assert_eq!(cpu.regs.f(), Flags::S | Flags::H | Flags::PV | Flags::C);

    assert_eq!(cpu.step(&mut bus), 4);
    assert_eq!(cpu.regs.a(), 0x7F);
    assert_eq!(
        cpu.regs.f(),
        Flags::H | Flags::PV | Flags::N | Flags::C | Flags::X | Flags::Y
    );
}

#[test]
fn daa_corrects_bcd_addition() {
    // ADD A,0x27 ; DAA
    let (mut cpu, mut bus) = cpu_with(&[0xC6, 0x27, 0x27]);
    cpu.regs.set_a(0x15);
    cpu.step(&mut bus);
    assert_eq!(cpu.regs.a(), 0x3C);

    assert_eq!(cpu.step(&mut bus), 4);
    assert_eq!(cpu.regs.a(), 0x42);
    assert_eq!(cpu.regs.f(), Flags::H | Flags::PV);
}

#[test]
fn neg_negates_accumulator() {
    let (mut cpu, mut bus) = cpu_with(&[0xED, 0x44]);
    cpu.regs.set_a(0x01);
    assert_eq!(cpu.step(&mut bus), 8);
    assert_eq!(cpu.regs.a(), 0xFF);
    assert_eq!(
        cpu.regs.f(),
        Flags::S | Flags::H | Flags::N | Flags::C | Flags::X | Flags::Y
    );
}

#[test]
fn add_hl_leaves_sign_zero_and_parity() {
    // ADD HL,DE
    let (mut cpu, mut bus) = cpu_with(&[0x19]);
    cpu.regs.set_f(Flags::S | Flags::Z | Flags::PV);
    cpu.regs.set_hl(0x0FFF);
    cpu.regs.set_de(0x0001);

    assert_eq!(cpu.step(&mut bus), 11);
    assert_eq!(cpu.regs.hl(), 0x1000);
    assert_eq!(cpu.regs.f(), Flags::S | Flags::Z | Flags::PV | Flags::H);
}

#[test]
fn adc_and_sbc_hl_set_sixteen_bit_flags() {
    // ADC HL,BC ; SBC HL,DE
    let (mut cpu, mut bus) = cpu_with(&[0xED, 0x4A, 0xED, 0x52]);
    cpu.regs.set_f(Flags::empty());
    cpu.regs.set_hl(0x7FFF);
    cpu.regs.set_bc(0x0001);

    assert_eq!(cpu.step(&mut bus), 15);
    assert_eq!(cpu.regs.hl(), 0x8000);
    assert_eq!(cpu.regs.f(), Flags::S | Flags::H | Flags::PV);

    cpu.regs.set_f(Flags::empty());
    cpu.regs.set_hl(0x0000);
    cpu.regs.set_de(0x0001);
    assert_eq!(cpu.step(&mut bus), 15);
    assert_eq!(cpu.regs.hl(), 0xFFFF);
    assert_eq!(
        cpu.regs.f(),
        Flags::S | Flags::H | Flags::N | Flags::C | Flags::X | Flags::Y
    );
}

#[test]
fn sll_shifts_in_a_one() {
    // SLL B
    let (mut cpu, mut bus) = cpu_with(&[0xCB, 0x30]);
    cpu.regs.set_b(0x81);
    assert_eq!(cpu.step(&mut bus), 8);
    assert_eq!(cpu.regs.b(), 0x03);
    assert_eq!(cpu.regs.f(), Flags::PV | Flags::C);
}

#[test]
fn bit_on_register_takes_undocumented_bits_from_value() {
    // BIT 7,A
    let (mut cpu, mut bus) = cpu_with(&[0xCB, 0x7F]);
    cpu.regs.set_a(0x80);
    cpu.regs.set_f(Flags::empty());
    assert_eq!(cpu.step(&mut bus), 8);
    assert_eq!(cpu.regs.f(), Flags::S | Flags::H);
}

#[test]
fn bit_on_indexed_memory_takes_undocumented_bits_from_address() {
    // BIT 0,(IX+0x10)
    let (mut cpu, mut bus) = cpu_with(&[0xDD, 0xCB, 0x10, 0x46]);
    cpu.regs.ix = 0x2800;
    cpu.regs.set_f(Flags::C);
    bus.memory[0x2810] = 0x01;

    assert_eq!(cpu.step(&mut bus), 20);
    assert_eq!(cpu.regs.f(), Flags::H | Flags::X | Flags::Y | Flags::C);
}

#[test]
fn ld_a_r_reports_iff2() {
    let (mut cpu, mut bus) = cpu_with(&[0xED, 0x5F]);
    cpu.regs.r = 0x10;
    cpu.regs.set_f(Flags::empty());
    cpu.iff2 = true;

    assert_eq!(cpu.step(&mut bus), 9);
    assert_eq!(cpu.regs.a(), 0x12);
    assert_eq!(cpu.regs.f(), Flags::PV);
}

#[test]
fn jr_is_relative_to_the_next_instruction() {
    let mut bus = TestBus::default();
    bus.memory[0x0100] = 0x18; // JR -2
    bus.memory[0x0101] = 0xFE;
    let mut cpu = Cpu::new();
    cpu.regs.pc = 0x0100;

    assert_eq!(cpu.step(&mut bus), 12);
    assert_eq!(cpu.regs.pc, 0x0100);
}

#[test]
fn ldir_repeats_until_bc_is_zero() {
    let (mut cpu, mut bus) = cpu_with(&[0xED, 0xB0]);
    bus.memory[0x4000..0x4003].copy_from_slice(&[1, 2, 3]);
    cpu.regs.set_hl(0x4000);
    cpu.regs.set_de(0x5000);
    cpu.regs.set_bc(3);
    cpu.regs.set_a(0);
    cpu.regs.set_f(Flags::empty());

    assert_eq!(cpu.step(&mut bus), 21);
    assert_eq!(cpu.regs.pc, 0x0000);
    assert_eq!(cpu.regs.bc(), 2);
    assert!(cpu.get_flag(Flags::PV));

    assert_eq!(cpu.step(&mut bus), 21);
    assert_eq!(cpu.step(&mut bus), 16);
    assert_eq!(cpu.regs.pc, 0x0002);
    assert_eq!(cpu.regs.bc(), 0);
    assert_eq!(&bus.memory[0x5000..0x5003], &[1, 2, 3]);
    assert_eq!(cpu.regs.f(), Flags::Y);
}

#[test]
fn cpir_stops_on_match() {
    let (mut cpu, mut bus) = cpu_with(&[0xED, 0xB1]);
    bus.memory[0x4000..0x4003].copy_from_slice(&[0x10, 0x20, 0x30]);
    cpu.regs.set_hl(0x4000);
    cpu.regs.set_bc(3);
    cpu.regs.set_a(0x20);

    assert_eq!(cpu.step(&mut bus), 21);
    assert_eq!(cpu.regs.pc, 0x0000);

    assert_eq!(cpu.step(&mut bus), 16);
    assert_eq!(cpu.regs.pc, 0x0002);
    assert_eq!(cpu.regs.hl(), 0x4002);
    assert_eq!(cpu.regs.bc(), 1);
    assert!(cpu.get_flag(Flags::Z));
    assert!(cpu.get_flag(Flags::PV));
    assert!(cpu.get_flag(Flags::N));
}

#[test]
fn ini_transfers_port_to_memory() {
    let (mut cpu, mut bus) = cpu_with(&[0xED, 0xA2]);
    bus.io_value = 0x80;
    cpu.regs.set_bc(0x0210);
    cpu.regs.set_hl(0x4000);

    assert_eq!(cpu.step(&mut bus), 16);
    assert_eq!(bus.io_reads, vec![0x0210]);
    assert_eq!(bus.memory[0x4000], 0x80);
    assert_eq!(cpu.regs.b(), 0x01);
    assert_eq!(cpu.regs.hl(), 0x4001);
    assert_eq!(cpu.regs.f(), Flags::N | Flags::PV);
}

#[test]
fn port_io_uses_full_sixteen_bit_address() {
    // LD A,0x12 ; OUT (0x34),A ; IN A,(0x56) ; OUT (C),0 ; IN (C)
    let (mut cpu, mut bus) = cpu_with(&[
        0x3E, 0x12, 0xD3, 0x34, 0xDB, 0x56, 0xED, 0x71, 0xED, 0x70,
    ]);
    bus.io_value = 0x5A;
    cpu.regs.set_bc(0x4321);

    cpu.step(&mut bus);
    assert_eq!(cpu.step(&mut bus), 11);
    assert_eq!(bus.io_writes, vec![(0x1234, 0x12)]);

    assert_eq!(cpu.step(&mut bus), 11);
    assert_eq!(bus.io_reads, vec![0x1256]);
    assert_eq!(cpu.regs.a(), 0x5A);

    assert_eq!(cpu.step(&mut bus), 12);
    assert_eq!(bus.io_writes[1], (0x4321, 0x00));

    cpu.regs.set_f(Flags::C);
    bus.io_value = 0x00;
    assert_eq!(cpu.step(&mut bus), 12);
    assert_eq!(cpu.regs.a(), 0x5A);
    assert_eq!(cpu.regs.f(), Flags::Z | Flags::PV | Flags::C);
}

#[test]
fn halt_idles_until_maskable_interrupt() {
    // EI ; HALT
    let (mut cpu, mut bus) = cpu_with(&[0xFB, 0x76]);
    cpu.im = 1;

    cpu.step(&mut bus);
    assert_eq!(cpu.step(&mut bus), 4);
    assert!(cpu.halted);

    let r = cpu.regs.r;
    assert_eq!(cpu.step(&mut bus), 4);
    assert_eq!(cpu.regs.pc, 0x0002);
    assert_eq!(cpu.regs.r, r + 1);

    cpu.set_irq(true, 0xFF);
    assert_eq!(cpu.step(&mut bus), 13);
    assert!(!cpu.halted);
    assert!(!cpu.iff1);
    assert_eq!(cpu.regs.pc, IM1_VECTOR);
    assert_eq!(cpu.regs.sp, 0xFFEE);
    assert_eq!(bus.memory[0xFFEE], 0x02);
    assert_eq!(bus.memory[0xFFEF], 0x00);
}

#[test]
fn ei_defers_interrupts_by_one_instruction() {
    // EI ; NOP
    let (mut cpu, mut bus) = cpu_with(&[0xFB, 0x00]);
    cpu.im = 1;
    cpu.set_irq(true, 0xFF);

    cpu.step(&mut bus);
    assert_eq!(cpu.step(&mut bus), 4);
    assert_eq!(cpu.regs.pc, 0x0002);
    assert_eq!(cpu.step(&mut bus), 13);
    assert_eq!(cpu.regs.pc, IM1_VECTOR);
}

#[test]
fn mode_zero_jumps_to_rst_vector_on_bus() {
    let (mut cpu, mut bus) = cpu_with(&[0x00]);
    cpu.iff1 = true;
    cpu.set_irq(true, 0xD7); // RST 10h

    assert_eq!(cpu.step(&mut bus), 13);
    assert_eq!(cpu.regs.pc, 0x0010);
}

#[test]
fn mode_two_reads_vector_table() {
    let (mut cpu, mut bus) = cpu_with(&[0x00]);
    cpu.im = 2;
    cpu.iff1 = true;
    cpu.regs.i = 0x80;
    bus.memory[0x8010] = 0x34;
    bus.memory[0x8011] = 0x12;
    cpu.set_irq(true, 0x10);

    assert_eq!(cpu.step(&mut bus), 19);
    assert_eq!(cpu.regs.pc, 0x1234);
}

#[test]
fn interrupts_wait_for_prefix_cancelled_by_another() {
    // FD DD 21 34 12: FD is dropped, then LD IX,0x1234.
    let (mut cpu, mut bus) = cpu_with(&[0xFD, 0xDD, 0x21, 0x34, 0x12]);
    cpu.im = 1;
    cpu.iff1 = true;
    cpu.iff2 = true;

    assert_eq!(cpu.step(&mut bus), 4);
    cpu.set_irq(true, 0xFF);
    cpu.request_nmi();

    assert_eq!(cpu.step(&mut bus), 14);
    assert_eq!(cpu.regs.ix, 0x1234);
    assert_eq!(cpu.regs.pc, 0x0005);

    assert_eq!(cpu.step(&mut bus), 11);
    assert_eq!(cpu.regs.pc, NMI_VECTOR);
    assert_eq!(bus.memory[0xFFEE], 0x05);
}

#[test]
fn reset_drops_a_fetched_prefix() {
    // DD ED: DD is dropped and ED already fetched when reset hits.
    let (mut cpu, mut bus) = cpu_with(&[0xDD, 0xED, 0x44]);
    cpu.step(&mut bus);
    cpu.reset();
    bus.memory[0x0000] = 0x00;

    assert_eq!(cpu.step(&mut bus), 4);
    assert_eq!(cpu.last_instruction().unwrap().op, Op::Nop);
    assert_eq!(cpu.regs.pc, 0x0001);
}

#[test]
fn masked_interrupt_is_ignored() {
    let (mut cpu, mut bus) = cpu_with(&[0x00]);
    cpu.set_irq(true, 0xFF);
    assert_eq!(cpu.step(&mut bus), 4);
    assert_eq!(cpu.regs.pc, 0x0001);
}

#[test]
fn nmi_and_retn_restore_interrupt_state() {
    let (mut cpu, mut bus) = cpu_with(&[0x00]);
    bus.memory[0x0066] = 0xED; // RETN
    bus.memory[0x0067] = 0x45;
    cpu.iff1 = true;
    cpu.iff2 = true;

    cpu.request_nmi();
    assert_eq!(cpu.step(&mut bus), 11);
    assert_eq!(cpu.regs.pc, NMI_VECTOR);
    assert!(!cpu.iff1);
    assert!(cpu.iff2);

    assert_eq!(cpu.step(&mut bus), 14);
    assert_eq!(cpu.regs.pc, 0x0000);
    assert!(cpu.iff1);
}

#[test]
fn cycle_counts() {
    // Power-on flags are all set, so Z and C conditions hold.
    let cases: &[(&[u8], u32)] = &[
        (&[0x00], 4),
        (&[0x01, 0x00, 0x00], 10),
        (&[0x09], 11),
        (&[0x34], 11),
        (&[0x36, 0x00], 10),
        (&[0x7E], 7),
        (&[0x22, 0x00, 0x80], 16),
        (&[0x32, 0x00, 0x80], 13),
        (&[0xE3], 19),
        (&[0xC5], 11),
        (&[0xCD, 0x00, 0x10], 17),
        (&[0x20, 0x05], 7),
        (&[0x28, 0x05], 12),
        (&[0xC0], 5),
        (&[0xC8], 11),
        (&[0xC4, 0x00, 0x10], 10),
        (&[0xCC, 0x00, 0x10], 17),
        (&[0x10, 0xFE], 13),
        (&[0xFF], 11),
        (&[0xCB, 0x06], 15),
        (&[0xCB, 0x46], 12),
        (&[0xCB, 0xC0], 8),
        (&[0xDD, 0x21, 0x00, 0x00], 14),
        (&[0xDD, 0x34, 0x00], 23),
        (&[0xDD, 0x86, 0x00], 19),
        (&[0xDD, 0x09], 15),
        (&[0xDD, 0xE5], 15),
        (&[0xDD, 0xE9], 8),
        (&[0xDD, 0x22, 0x00, 0x80], 20),
        (&[0xDD, 0xCB, 0x00, 0x46], 20),
        (&[0xFD, 0xCB, 0x00, 0xC6], 23),
        (&[0xED, 0x43, 0x00, 0x80], 20),
        (&[0xED, 0x6B, 0x00, 0x80], 20),
        (&[0xED, 0x47], 9),
        (&[0xED, 0x56], 8),
        (&[0xED, 0x6F], 18),
        (&[0xED, 0x00], 8),
        (&[0xED, 0xA0], 16),
    ];

    for &(program, expected) in cases {
        let (mut cpu, mut bus) = cpu_with(program);
        assert_eq!(cpu.step(&mut bus), expected, "cycles for {:02X?}", program);
    }
}

#[test]
fn every_table_cell_decodes_and_executes() {
    for prefix in Prefix::ALL {
        for opcode in 0..=0xFFu8 {
            let mut program = Vec::new();
            match prefix {
                Prefix::None => {}
                Prefix::Cb => program.push(0xCB),
                Prefix::Ed => program.push(0xED),
                Prefix::Dd => program.push(0xDD),
                Prefix::Fd => program.push(0xFD),
                Prefix::DdCb => program.extend([0xDD, 0xCB, 0x01]),
                Prefix::FdCb => program.extend([0xFD, 0xCB, 0x01]),
            }
            program.extend([opcode, 0x02, 0x03, 0x04]);

            let (mut cpu, mut bus) = cpu_with(&program);
            cpu.regs.set_hl(0x8000);
            cpu.regs.ix = 0x9000;
            cpu.regs.iy = 0xA000;

            let cycles = cpu.step(&mut bus);
            assert!(
                cycles >= 4,
                "{:04X}/{opcode:02X} took {cycles} cycles",
                prefix.code()
            );

            // These bytes are prefixes themselves and restart the fetch.
            let restarts = matches!(
                (prefix, opcode),
                (Prefix::None, 0xCB | 0xDD | 0xED | 0xFD) | (Prefix::Dd | Prefix::Fd, 0xCB)
            );
            if !restarts {
                let last = cpu.last_instruction().unwrap();
                assert_eq!(last.prefix, prefix);
                assert_eq!(last.opcode, opcode);
                assert_eq!(last, decode(prefix, opcode));
            }
        }
    }
}
