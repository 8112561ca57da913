use std::path::PathBuf;

use anyhow::Result;
use typed_builder::TypedBuilder;

use retroz80_core::{Bus, Memory, Snapshot, Z80};

/// Pulses run when the command line does not give a count.
pub const DEFAULT_PULSES: u64 = 1_000_000;

#[derive(Debug, Clone, TypedBuilder)]
pub struct RunConfig {
    #[builder(setter(into))]
    pub rom_path: PathBuf,
    #[builder(default = DEFAULT_PULSES)]
    pub pulses: u64,
    /// Address execution starts from after reset.
    #[builder(default = 0x0000)]
    pub start_pc: u16,
    /// Stop early once the CPU sits in HALT with no instruction in flight.
    #[builder(default = true)]
    pub stop_on_halt: bool,
}

/// Outcome of a run.
#[derive(Debug, Clone, Copy)]
pub struct RunReport {
    pub pulses: u64,
    /// Pulses that started an instruction or interrupt acknowledge.
    pub instructions: u64,
    pub snapshot: Snapshot,
}

/// Load the configured ROM image and clock a Z80 over it.
pub fn run(config: &RunConfig) -> Result<RunReport> {
    log::info!("Loading ROM '{}'", config.rom_path.display());
    let mut memory = Memory::from_file(&config.rom_path)?;
    Ok(run_on(&mut memory, config))
}

/// Clock a freshly reset Z80 on `bus` for the configured number of pulses.
pub fn run_on<B: Bus>(bus: &mut B, config: &RunConfig) -> RunReport {
    let mut z80 = Z80::new(bus);
    z80.reset();
    z80.cpu_mut().regs.pc = config.start_pc;

    let mut pulses = 0;
    let mut instructions = 0;
    while pulses < config.pulses {
        if z80.clock() {
            instructions += 1;
        }
        pulses += 1;

        let cpu = z80.cpu();
        if config.stop_on_halt && cpu.halted && cpu.cycles_remaining() == 0 {
            log::info!("CPU halted at 0x{:04X}", cpu.regs.pc.wrapping_sub(1));
            break;
        }
    }

    let snapshot = z80.snapshot();
    log::info!(
        "Ran {} pulses, {} instructions; PC=0x{:04X} SP=0x{:04X} AF=0x{:04X}",
        pulses,
        instructions,
        snapshot.pc,
        snapshot.sp,
        snapshot.af()
    );

    RunReport {
        pulses,
        instructions,
        snapshot,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(pulses: u64, stop_on_halt: bool) -> RunConfig {
        RunConfig::builder()
            .rom_path("unused.rom")
            .pulses(pulses)
            .stop_on_halt(stop_on_halt)
            .build()
    }

    #[test]
    fn builder_defaults() {
        let config = RunConfig::builder().rom_path("program.rom").build();
        assert_eq!(config.pulses, DEFAULT_PULSES);
        assert_eq!(config.start_pc, 0x0000);
        assert!(config.stop_on_halt);
    }

    #[test]
    fn stops_once_halted() {
        // LD A,5 (7 cycles) ; HALT (4 cycles)
        let mut memory = Memory::new(vec![0x3E, 0x05, 0x76]).unwrap();
        let report = run_on(&mut memory, &config(1_000, true));
        assert_eq!(report.pulses, 11);
        assert_eq!(report.instructions, 2);
        assert!(report.snapshot.halted);
        assert_eq!(report.snapshot.main.a, 0x05);
    }

    #[test]
    fn keeps_clocking_through_halt_when_asked() {
        let mut memory = Memory::new(vec![0x3E, 0x05, 0x76]).unwrap();
        let report = run_on(&mut memory, &config(20, false));
        assert_eq!(report.pulses, 20);
        assert!(report.snapshot.halted);
        assert_eq!(report.snapshot.pc, 0x0003);
    }

    #[test]
    fn starts_at_configured_address() {
        // 0x0000: HALT, 0x0010: LD A,0x42 ; HALT
        let mut rom = vec![0x76; 0x10];
        rom.extend([0x3E, 0x42, 0x76]);
        let mut memory = Memory::new(rom).unwrap();
        let config = RunConfig::builder()
            .rom_path("unused.rom")
            .start_pc(0x0010)
            .build();
        let report = run_on(&mut memory, &config);
        assert_eq!(report.snapshot.main.a, 0x42);
        assert_eq!(report.snapshot.pc, 0x0013);
    }

    #[test]
    fn missing_rom_is_an_error() {
        let config = RunConfig::builder()
            .rom_path("/nonexistent/retroz80/missing.rom")
            .build();
        assert!(run(&config).is_err());
    }

    #[test]
    fn runs_rom_from_disk() {
        let path = std::env::temp_dir().join(format!("retroz80-{}.rom", std::process::id()));
        std::fs::write(&path, [0x3E, 0x99, 0x76]).unwrap();

        let config = RunConfig::builder().rom_path(path.clone()).build();
        let report = run(&config);
        std::fs::remove_file(&path).unwrap();

        let report = report.unwrap();
        assert_eq!(report.snapshot.main.a, 0x99);
        assert!(report.snapshot.halted);
    }
}
