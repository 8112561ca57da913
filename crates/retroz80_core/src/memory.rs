use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::bus::Bus;

/// Total addressable memory size (64 KiB).
pub const MEMORY_SIZE: usize = 0x10000;

/// Flat 64 KiB address space with a read-only ROM image at the bottom.
///
/// Addresses below the ROM length read from the image and ignore writes;
/// everything above is RAM. The I/O port space is left floating.
pub struct Memory {
    rom: Vec<u8>,
    ram: Vec<u8>,
}

impl Memory {
    /// Build a memory map around a ROM image. An empty image is accepted and
    /// leaves the whole address space writable.
    pub fn new(rom: Vec<u8>) -> Result<Self> {
        if rom.len() > MEMORY_SIZE {
            bail!(
                "ROM image is {} bytes, larger than the {} byte address space",
                rom.len(),
                MEMORY_SIZE
            );
        }
        log::info!("ROM size: {} bytes", rom.len());
        Ok(Self {
            rom,
            ram: vec![0; MEMORY_SIZE],
        })
    }

    /// Load a ROM image from disk.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let rom = std::fs::read(path)
            .with_context(|| format!("failed to read ROM image {}", path.display()))?;
        Self::new(rom).with_context(|| format!("invalid ROM image {}", path.display()))
    }

    /// First address that is not ROM.
    #[inline]
    pub fn rom_boundary(&self) -> usize {
        self.rom.len()
    }

    /// Copy `bytes` into RAM starting at `addr`, wrapping at the top of the
    /// address space. Bytes that land on ROM are dropped.
    pub fn load_ram(&mut self, addr: u16, bytes: &[u8]) {
        let mut addr = addr;
        for &byte in bytes {
            self.write8(addr, byte);
            addr = addr.wrapping_add(1);
        }
    }
}

impl Bus for Memory {
    #[inline]
    fn read8(&mut self, addr: u16) -> u8 {
        let addr = addr as usize;
        match self.rom.get(addr) {
            Some(&byte) => byte,
            None => self.ram[addr],
        }
    }

    #[inline]
    fn write8(&mut self, addr: u16, value: u8) {
        let addr = addr as usize;
        if addr < self.rom.len() {
            log::trace!("write to ROM at 0x{addr:04X} ignored");
            return;
        }
        self.ram[addr] = value;
    }
}
