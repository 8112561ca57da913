use crate::bus::Bus;
use crate::cpu::{Cpu, Flags, Snapshot};

/// A Z80 core wired to a bus it borrows for its whole lifetime.
///
/// This is the clock-driven face of the emulator: the host calls `clock`
/// once per pulse and the core executes whole instructions at pulse
/// boundaries, idling for the remaining cycles of each one.
pub struct Z80<'a, B: Bus> {
    cpu: Cpu,
    bus: &'a mut B,
}

impl<'a, B: Bus> Z80<'a, B> {
    /// Power on a core attached to `bus`.
    pub fn new(bus: &'a mut B) -> Self {
        Self {
            cpu: Cpu::new(),
            bus,
        }
    }

    pub fn reset(&mut self) {
        self.cpu.reset();
    }

    /// Advance one clock pulse. Returns `true` when this pulse began a new
    /// instruction.
    pub fn clock(&mut self) -> bool {
        self.cpu.clock(&mut *self.bus)
    }

    /// Run pulses until the instruction started by the next pulse has used
    /// up all of its cycles, then return the number of pulses consumed.
    ///
    /// Called between instructions this runs exactly one instruction.
    pub fn step(&mut self) -> u32 {
        let mut pulses = 0;
        loop {
            self.clock();
            pulses += 1;
            if self.cpu.cycles_remaining() == 0 {
                return pulses;
            }
        }
    }

    /// Pulse the clock `pulses` times.
    pub fn run(&mut self, pulses: u64) {
        for _ in 0..pulses {
            self.clock();
        }
    }

    #[inline]
    pub fn get_flag(&self, flag: Flags) -> bool {
        self.cpu.get_flag(flag)
    }

    #[inline]
    pub fn set_flag(&mut self, flag: Flags, value: bool) {
        self.cpu.set_flag(flag, value);
    }

    pub fn snapshot(&self) -> Snapshot {
        self.cpu.snapshot()
    }

    pub fn request_nmi(&mut self) {
        self.cpu.request_nmi();
    }

    pub fn set_irq(&mut self, active: bool, data: u8) {
        self.cpu.set_irq(active, data);
    }

    #[inline]
    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    #[inline]
    pub fn cpu_mut(&mut self) -> &mut Cpu {
        &mut self.cpu
    }

    #[inline]
    pub fn bus(&self) -> &B {
        &*self.bus
    }

    #[inline]
    pub fn bus_mut(&mut self) -> &mut B {
        &mut *self.bus
    }
}
