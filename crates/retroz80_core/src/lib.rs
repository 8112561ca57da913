//! Cycle-stepped Zilog Z80 emulation core.
//!
//! [`cpu::Cpu`] holds the register file and runs whole instructions against
//! any [`Bus`]; [`Z80`] wraps a CPU and a borrowed bus behind a one-pulse
//! `clock` interface. [`Memory`] is a ready-made 64 KiB bus with a
//! write-protected ROM image.

pub mod bus;
pub mod cpu;
pub mod machine;
pub mod memory;

pub use bus::Bus;
pub use cpu::{Cpu, Flags, Snapshot};
pub use machine::Z80;
pub use memory::Memory;
