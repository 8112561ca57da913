//! Operation records produced by the decoder and consumed by the executor.

/// Active opcode table, selected by the prefix bytes in front of an opcode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Prefix {
    None,
    Cb,
    Ed,
    Dd,
    Fd,
    DdCb,
    FdCb,
}

impl Prefix {
    /// Every prefix the fetch stage can produce.
    pub const ALL: [Prefix; 7] = [
        Prefix::None,
        Prefix::Cb,
        Prefix::Ed,
        Prefix::Dd,
        Prefix::Fd,
        Prefix::DdCb,
        Prefix::FdCb,
    ];

    /// Prefix bytes as a 16-bit code, outer byte in the high position for
    /// the four-byte indexed-bit forms.
    pub fn code(self) -> u16 {
        match self {
            Prefix::None => 0x0000,
            Prefix::Cb => 0x00CB,
            Prefix::Ed => 0x00ED,
            Prefix::Dd => 0x00DD,
            Prefix::Fd => 0x00FD,
            Prefix::DdCb => 0xDDCB,
            Prefix::FdCb => 0xFDCB,
        }
    }

    /// Index register substituted for HL under this prefix.
    pub fn index(self) -> Option<Index> {
        match self {
            Prefix::Dd | Prefix::DdCb => Some(Index::Ix),
            Prefix::Fd | Prefix::FdCb => Some(Index::Iy),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Index {
    Ix,
    Iy,
}

/// 8-bit registers addressable by instructions. The index halves are only
/// reachable through DD/FD substitution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Reg8 {
    A,
    B,
    C,
    D,
    E,
    H,
    L,
    Ixh,
    Ixl,
    Iyh,
    Iyl,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Reg16 {
    AF,
    BC,
    DE,
    HL,
    SP,
    IX,
    IY,
}

/// Source or destination of an 8-bit operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operand8 {
    Reg(Reg8),
    /// Immediate byte from the instruction stream.
    Imm,
    /// Memory addressed by a register pair: (BC), (DE), (HL).
    Ind(Reg16),
    /// Memory at index register plus signed displacement.
    Idx(Index),
    /// Memory at a 16-bit address from the instruction stream.
    Abs,
}

/// Source or destination of a 16-bit load.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operand16 {
    Reg(Reg16),
    Imm,
    Abs,
}

/// Condition codes in the order of the `y` field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cond {
    NZ,
    Z,
    NC,
    C,
    PO,
    PE,
    P,
    M,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AluOp {
    Add,
    Adc,
    Sub,
    Sbc,
    And,
    Xor,
    Or,
    Cp,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RotOp {
    Rlc,
    Rrc,
    Rl,
    Rr,
    Sla,
    Sra,
    Sll,
    Srl,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BlockKind {
    Ld,
    Cp,
    In,
    Out,
}

/// LDI/CPI/INI/OUTI and their decrementing and repeating variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BlockOp {
    pub kind: BlockKind,
    pub decrement: bool,
    pub repeat: bool,
}

/// Operation identity plus operand descriptors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Op {
    Nop,
    /// A DD/FD prefix directly followed by another prefix: a no-op, after
    /// which the following byte starts a new instruction.
    IgnoredPrefix,
    /// Undefined ED cell.
    EdNop,
    Halt,

    Ld8 { dst: Operand8, src: Operand8 },
    Ld16 { dst: Operand16, src: Operand16 },
    LdAI,
    LdAR,
    LdIA,
    LdRA,
    Push(Reg16),
    Pop(Reg16),
    ExAf,
    Exx,
    ExDeHl,
    /// EX (SP),HL / EX (SP),IX / EX (SP),IY
    ExSp(Reg16),

    Alu { op: AluOp, src: Operand8 },
    Inc8(Operand8),
    Dec8(Operand8),
    Inc16(Reg16),
    Dec16(Reg16),
    Add16 { dst: Reg16, src: Reg16 },
    Adc16(Reg16),
    Sbc16(Reg16),
    Daa,
    Cpl,
    Neg,
    Scf,
    Ccf,

    /// RLCA / RRCA / RLA / RRA
    RotA(RotOp),
    /// CB rotates and shifts. `copy` is the register that also receives the
    /// result on the undocumented DD-CB/FD-CB forms.
    Rot { op: RotOp, target: Operand8, copy: Option<Reg8> },
    Bit { bit: u8, src: Operand8 },
    Res { bit: u8, target: Operand8, copy: Option<Reg8> },
    Set { bit: u8, target: Operand8, copy: Option<Reg8> },
    Rld,
    Rrd,

    Jp(Option<Cond>),
    /// JP (HL) / JP (IX) / JP (IY): jumps to the register value itself.
    JpInd(Reg16),
    Jr(Option<Cond>),
    Djnz,
    Call(Option<Cond>),
    Ret(Option<Cond>),
    Retn,
    Reti,
    Rst(u8),

    Di,
    Ei,
    Im(u8),

    /// IN A,(n)
    InAN,
    /// OUT (n),A
    OutNA,
    /// IN r,(C); `None` only updates the flags.
    InC(Option<Reg8>),
    /// OUT (C),r; `None` writes zero.
    OutC(Option<Reg8>),
    Block(BlockOp),
}

impl Op {
    /// Index register whose displacement this operation addresses, if any.
    pub fn indexed(&self) -> Option<Index> {
        let operand = match *self {
            Op::Ld8 { dst, src } => return idx_of(dst).or_else(|| idx_of(src)),
            Op::Alu { src, .. } | Op::Bit { src, .. } => src,
            Op::Inc8(target)
            | Op::Dec8(target)
            | Op::Rot { target, .. }
            | Op::Res { target, .. }
            | Op::Set { target, .. } => target,
            _ => return None,
        };
        idx_of(operand)
    }
}

fn idx_of(operand: Operand8) -> Option<Index> {
    match operand {
        Operand8::Idx(index) => Some(index),
        _ => None,
    }
}

/// Decoded instruction: the table it came from, its final opcode byte and
/// the operation it resolves to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Instruction {
    pub prefix: Prefix,
    pub opcode: u8,
    pub op: Op,
}
