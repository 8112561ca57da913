/// Memory and I/O interface seen by the Z80.
///
/// Reads take `&mut self` so that memory-mapped devices can react to
/// accesses; the CPU itself never depends on a read having side effects.
pub trait Bus {
    fn read8(&mut self, addr: u16) -> u8;
    fn write8(&mut self, addr: u16, value: u8);

    /// Read from the 16-bit I/O port space used by IN instructions.
    ///
    /// Default implementation models a floating data bus.
    fn io_read(&mut self, _port: u16) -> u8 {
        0xFF
    }

    /// Write to the I/O port space. Default implementation discards the
    /// value.
    fn io_write(&mut self, _port: u16, _value: u8) {}
}
