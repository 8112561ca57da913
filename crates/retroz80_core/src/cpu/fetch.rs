use super::ops::Prefix;
use super::{Bus, Cpu};

/// Output of the fetch stage: the active table, the final opcode byte and
/// the displacement when the four-byte DD-CB/FD-CB form supplied one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Fetched {
    pub prefix: Prefix,
    pub opcode: u8,
    pub displacement: Option<i8>,
}

#[derive(Clone, Copy, Debug)]
enum FetchState {
    Fetch,
    PrefixPending(u8),
    Decode(Fetched),
}

impl Cpu {
    /// Opcode fetch (M1): read at PC, advance PC and the refresh counter.
    #[inline]
    fn fetch_opcode<B: Bus>(&mut self, bus: &mut B) -> u8 {
        self.regs.bump_r();
        self.fetch8(bus)
    }

    /// Count an M1 cycle for a byte that was already read at PC.
    #[inline]
    fn consume_opcode(&mut self) {
        self.regs.bump_r();
        self.regs.pc = self.regs.pc.wrapping_add(1);
    }

    /// Consume prefix bytes and the opcode at PC.
    ///
    /// A byte following CB/ED/DD/FD is the final opcode; only DD-CB and
    /// FD-CB place a displacement between the prefix and the opcode. The
    /// displacement of the other (IX+d)/(IY+d) forms follows the opcode and
    /// is read by the executor. Each byte is read from the bus once.
    pub(super) fn fetch_instruction<B: Bus>(&mut self, bus: &mut B) -> Fetched {
        let mut state = match self.pending_prefix.take() {
            Some(prefix) => FetchState::PrefixPending(prefix),
            None => FetchState::Fetch,
        };
        loop {
            state = match state {
                FetchState::Fetch => {
                    let byte = self.fetch_opcode(bus);
                    match byte {
                        0xCB | 0xED | 0xDD | 0xFD => FetchState::PrefixPending(byte),
                        _ => FetchState::Decode(Fetched {
                            prefix: Prefix::None,
                            opcode: byte,
                            displacement: None,
                        }),
                    }
                }
                FetchState::PrefixPending(outer) => {
                    let next = bus.read8(self.regs.pc);
                    match (outer, next) {
                        (0xDD | 0xFD, 0xCB) => {
                            // The CB byte is an M1 read; displacement and
                            // opcode are plain reads.
                            self.consume_opcode();
                            let displacement = self.fetch8(bus) as i8;
                            let opcode = self.fetch8(bus);
                            let prefix = if outer == 0xDD {
                                Prefix::DdCb
                            } else {
                                Prefix::FdCb
                            };
                            FetchState::Decode(Fetched {
                                prefix,
                                opcode,
                                displacement: Some(displacement),
                            })
                        }
                        // A prefix chained onto DD/FD cancels it. The new
                        // prefix has had its M1 cycle and starts the next
                        // instruction.
                        (0xDD | 0xFD, 0xDD | 0xED | 0xFD) => {
                            self.consume_opcode();
                            self.pending_prefix = Some(next);
                            FetchState::Decode(Fetched {
                                prefix: if outer == 0xDD { Prefix::Dd } else { Prefix::Fd },
                                opcode: next,
                                displacement: None,
                            })
                        }
                        _ => {
                            self.consume_opcode();
                            let opcode = next;
                            let prefix = match outer {
                                0xCB => Prefix::Cb,
                                0xED => Prefix::Ed,
                                0xDD => Prefix::Dd,
                                _ => Prefix::Fd,
                            };
                            FetchState::Decode(Fetched {
                                prefix,
                                opcode,
                                displacement: None,
                            })
                        }
                    }
                }
                FetchState::Decode(fetched) => return fetched,
            };
        }
    }
}
