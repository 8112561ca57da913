//! Bit-field decoder.
//!
//! Every opcode byte splits into `x` (bits 7-6), `y` (bits 5-3) and `z`
//! (bits 2-0), with `y` further split into `p` (bits 5-4) and `q` (bit 3).
//! The tables below are indexed by those fields; each opcode table is a
//! nested match over them rather than a flat 256-entry list.

use super::ops::{
    AluOp, BlockKind, BlockOp, Cond, Index, Instruction, Op, Operand16, Operand8, Prefix, Reg16,
    Reg8, RotOp,
};

/// Opcode fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Fields {
    pub x: u8,
    pub y: u8,
    pub z: u8,
    pub p: u8,
    pub q: u8,
}

impl From<u8> for Fields {
    #[inline]
    fn from(opcode: u8) -> Self {
        let y = (opcode >> 3) & 0x07;
        Self {
            x: opcode >> 6,
            y,
            z: opcode & 0x07,
            p: y >> 1,
            q: y & 0x01,
        }
    }
}

impl Fields {
    /// Rebuild the opcode byte from `x`, `p`, `q` and `z`.
    #[inline]
    pub fn to_byte(self) -> u8 {
        (self.x << 6) | (self.p << 4) | (self.q << 3) | self.z
    }
}

use Operand8::{Ind, Reg};

/// 8-bit operands indexed by `y` or `z`.
const R: [Operand8; 8] = [
    Reg(Reg8::B),
    Reg(Reg8::C),
    Reg(Reg8::D),
    Reg(Reg8::E),
    Reg(Reg8::H),
    Reg(Reg8::L),
    Ind(Reg16::HL),
    Reg(Reg8::A),
];

/// Register pairs for 16-bit loads and arithmetic, indexed by `p`.
const RP: [Reg16; 4] = [Reg16::BC, Reg16::DE, Reg16::HL, Reg16::SP];

/// Register pairs for PUSH/POP, indexed by `p`.
const RP2: [Reg16; 4] = [Reg16::BC, Reg16::DE, Reg16::HL, Reg16::AF];

const CC: [Cond; 8] = [
    Cond::NZ,
    Cond::Z,
    Cond::NC,
    Cond::C,
    Cond::PO,
    Cond::PE,
    Cond::P,
    Cond::M,
];

const ALU: [AluOp; 8] = [
    AluOp::Add,
    AluOp::Adc,
    AluOp::Sub,
    AluOp::Sbc,
    AluOp::And,
    AluOp::Xor,
    AluOp::Or,
    AluOp::Cp,
];

const ROT: [RotOp; 8] = [
    RotOp::Rlc,
    RotOp::Rrc,
    RotOp::Rl,
    RotOp::Rr,
    RotOp::Sla,
    RotOp::Sra,
    RotOp::Sll,
    RotOp::Srl,
];

/// Interrupt modes for ED x=1 z=6, indexed by `y`. The 0/1 entry at y=1
/// and y=5 is undocumented and behaves as mode 0.
const IM: [u8; 8] = [0, 0, 1, 2, 0, 0, 1, 2];

/// x=0 z=7 accumulator and flag operations, indexed by `y`.
const ACC: [Op; 8] = [
    Op::RotA(RotOp::Rlc),
    Op::RotA(RotOp::Rrc),
    Op::RotA(RotOp::Rl),
    Op::RotA(RotOp::Rr),
    Op::Daa,
    Op::Cpl,
    Op::Scf,
    Op::Ccf,
];

/// ED x=1 z=7, indexed by `y`.
const ED_MISC: [Op; 8] = [
    Op::LdIA,
    Op::LdRA,
    Op::LdAI,
    Op::LdAR,
    Op::Rrd,
    Op::Rld,
    Op::EdNop,
    Op::EdNop,
];

/// Block instruction kinds, indexed by `z`.
const BLOCK: [BlockKind; 4] = [BlockKind::Ld, BlockKind::Cp, BlockKind::In, BlockKind::Out];

/// How HL-based operands are rewritten under the active prefix.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum IndexMode {
    Hl,
    Index(Index),
}

impl IndexMode {
    fn r(self, i: u8) -> Operand8 {
        let operand = R[i as usize];
        let IndexMode::Index(index) = self else {
            return operand;
        };
        match (operand, index) {
            (Reg(Reg8::H), Index::Ix) => Reg(Reg8::Ixh),
            (Reg(Reg8::L), Index::Ix) => Reg(Reg8::Ixl),
            (Reg(Reg8::H), Index::Iy) => Reg(Reg8::Iyh),
            (Reg(Reg8::L), Index::Iy) => Reg(Reg8::Iyl),
            (Ind(Reg16::HL), _) => Operand8::Idx(index),
            _ => operand,
        }
    }

    fn pair(self, reg: Reg16) -> Reg16 {
        match (reg, self) {
            (Reg16::HL, IndexMode::Index(Index::Ix)) => Reg16::IX,
            (Reg16::HL, IndexMode::Index(Index::Iy)) => Reg16::IY,
            _ => reg,
        }
    }

    fn rp(self, p: u8) -> Reg16 {
        self.pair(RP[p as usize])
    }

    fn rp2(self, p: u8) -> Reg16 {
        self.pair(RP2[p as usize])
    }

    fn hl(self) -> Reg16 {
        self.pair(Reg16::HL)
    }
}

/// Plain register at `R[i]`; `None` for the (HL) slot.
fn reg_at(i: u8) -> Option<Reg8> {
    match R[i as usize] {
        Reg(reg) => Some(reg),
        _ => None,
    }
}

/// Map a (prefix, opcode) pair to its operation record.
///
/// This is total: every cell of every table yields a defined operation.
pub fn decode(prefix: Prefix, opcode: u8) -> Instruction {
    let f = Fields::from(opcode);
    let op = match prefix {
        Prefix::None => decode_main(f, IndexMode::Hl),
        Prefix::Cb => decode_cb(f),
        Prefix::Ed => decode_ed(f),
        Prefix::Dd => decode_indexed(f, opcode, Index::Ix),
        Prefix::Fd => decode_indexed(f, opcode, Index::Iy),
        Prefix::DdCb => decode_indexed_cb(f, Index::Ix),
        Prefix::FdCb => decode_indexed_cb(f, Index::Iy),
    };
    Instruction { prefix, opcode, op }
}

fn decode_indexed(f: Fields, opcode: u8, index: Index) -> Op {
    match opcode {
        // Another prefix: this one is dropped and the next byte restarts
        // decoding. 0xCB is normally turned into a DD-CB form by the fetch
        // stage and only lands here when decoded in isolation.
        0xCB | 0xDD | 0xED | 0xFD => Op::IgnoredPrefix,
        _ => decode_main(f, IndexMode::Index(index)),
    }
}

fn decode_main(f: Fields, m: IndexMode) -> Op {
    let Fields { x, y, z, p, q } = f;
    match x {
        0 => match z {
            0 => match y {
                0 => Op::Nop,
                1 => Op::ExAf,
                2 => Op::Djnz,
                3 => Op::Jr(None),
                _ => Op::Jr(Some(CC[(y - 4) as usize])),
            },
            1 => {
                if q == 0 {
                    Op::Ld16 {
                        dst: Operand16::Reg(m.rp(p)),
                        src: Operand16::Imm,
                    }
                } else {
                    Op::Add16 {
                        dst: m.hl(),
                        src: m.rp(p),
                    }
                }
            }
            2 => match (q, p) {
                (0, 0) => Op::Ld8 {
                    dst: Ind(Reg16::BC),
                    src: Reg(Reg8::A),
                },
                (0, 1) => Op::Ld8 {
                    dst: Ind(Reg16::DE),
                    src: Reg(Reg8::A),
                },
                (0, 2) => Op::Ld16 {
                    dst: Operand16::Abs,
                    src: Operand16::Reg(m.hl()),
                },
                (0, _) => Op::Ld8 {
                    dst: Operand8::Abs,
                    src: Reg(Reg8::A),
                },
                (_, 0) => Op::Ld8 {
                    dst: Reg(Reg8::A),
                    src: Ind(Reg16::BC),
                },
                (_, 1) => Op::Ld8 {
                    dst: Reg(Reg8::A),
                    src: Ind(Reg16::DE),
                },
                (_, 2) => Op::Ld16 {
                    dst: Operand16::Reg(m.hl()),
                    src: Operand16::Abs,
                },
                _ => Op::Ld8 {
                    dst: Reg(Reg8::A),
                    src: Operand8::Abs,
                },
            },
            3 => {
                if q == 0 {
                    Op::Inc16(m.rp(p))
                } else {
                    Op::Dec16(m.rp(p))
                }
            }
            4 => Op::Inc8(m.r(y)),
            5 => Op::Dec8(m.r(y)),
            6 => Op::Ld8 {
                dst: m.r(y),
                src: Operand8::Imm,
            },
            _ => ACC[y as usize],
        },
        1 => {
            if y == 6 && z == 6 {
                Op::Halt
            } else {
                // With (IX+d) on one side the other operand stays plain H/L.
                let dst = if z == 6 { R[y as usize] } else { m.r(y) };
                let src = if y == 6 { R[z as usize] } else { m.r(z) };
                Op::Ld8 { dst, src }
            }
        }
        2 => Op::Alu {
            op: ALU[y as usize],
            src: m.r(z),
        },
        _ => match z {
            0 => Op::Ret(Some(CC[y as usize])),
            1 => match (q, p) {
                (0, _) => Op::Pop(m.rp2(p)),
                (_, 0) => Op::Ret(None),
                (_, 1) => Op::Exx,
                (_, 2) => Op::JpInd(m.hl()),
                _ => Op::Ld16 {
                    dst: Operand16::Reg(Reg16::SP),
                    src: Operand16::Reg(m.hl()),
                },
            },
            2 => Op::Jp(Some(CC[y as usize])),
            3 => match y {
                0 => Op::Jp(None),
                // CB prefix.
                1 => Op::IgnoredPrefix,
                2 => Op::OutNA,
                3 => Op::InAN,
                4 => Op::ExSp(m.hl()),
                5 => Op::ExDeHl,
                6 => Op::Di,
                _ => Op::Ei,
            },
            4 => Op::Call(Some(CC[y as usize])),
            5 => match (q, p) {
                (0, _) => Op::Push(m.rp2(p)),
                (_, 0) => Op::Call(None),
                // DD, ED and FD prefixes.
                _ => Op::IgnoredPrefix,
            },
            6 => Op::Alu {
                op: ALU[y as usize],
                src: Operand8::Imm,
            },
            _ => Op::Rst(y * 8),
        },
    }
}

fn decode_cb(f: Fields) -> Op {
    let Fields { x, y, z, .. } = f;
    let target = R[z as usize];
    match x {
        0 => Op::Rot {
            op: ROT[y as usize],
            target,
            copy: None,
        },
        1 => Op::Bit { bit: y, src: target },
        2 => Op::Res {
            bit: y,
            target,
            copy: None,
        },
        _ => Op::Set {
            bit: y,
            target,
            copy: None,
        },
    }
}

fn decode_indexed_cb(f: Fields, index: Index) -> Op {
    let Fields { x, y, z, .. } = f;
    let target = Operand8::Idx(index);
    // Undocumented: every form except BIT also stores the result into the
    // register named by `z`.
    let copy = reg_at(z);
    match x {
        0 => Op::Rot {
            op: ROT[y as usize],
            target,
            copy,
        },
        1 => Op::Bit { bit: y, src: target },
        2 => Op::Res {
            bit: y,
            target,
            copy,
        },
        _ => Op::Set {
            bit: y,
            target,
            copy,
        },
    }
}

fn decode_ed(f: Fields) -> Op {
    let Fields { x, y, z, p, q } = f;
    match x {
        1 => match z {
            0 => Op::InC(reg_at(y)),
            1 => Op::OutC(reg_at(y)),
            2 => {
                if q == 0 {
                    Op::Sbc16(RP[p as usize])
                } else {
                    Op::Adc16(RP[p as usize])
                }
            }
            3 => {
                if q == 0 {
                    Op::Ld16 {
                        dst: Operand16::Abs,
                        src: Operand16::Reg(RP[p as usize]),
                    }
                } else {
                    Op::Ld16 {
                        dst: Operand16::Reg(RP[p as usize]),
                        src: Operand16::Abs,
                    }
                }
            }
            4 => Op::Neg,
            5 => {
                if y == 1 {
                    Op::Reti
                } else {
                    Op::Retn
                }
            }
            6 => Op::Im(IM[y as usize]),
            _ => ED_MISC[y as usize],
        },
        2 if z <= 3 && y >= 4 => Op::Block(BlockOp {
            kind: BLOCK[z as usize],
            decrement: y & 0x01 != 0,
            repeat: y >= 6,
        }),
        _ => Op::EdNop,
    }
}
