use anyhow::{Context, Result};
use retroz80::RunConfig;

fn parse_address(arg: &str) -> Result<u16> {
    let digits = arg
        .strip_prefix("0x")
        .or_else(|| arg.strip_prefix("0X"))
        .unwrap_or(arg);
    u16::from_str_radix(digits, 16).with_context(|| format!("invalid start address '{arg}'"))
}

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let Some(rom_path) = args.next() else {
        eprintln!(
            "No ROM path provided.\n\
             Usage: retroz80 <rom> [pulses] [start-pc]\n\
             For example:\n\
             retroz80 path/to/program.rom 100000 0x0100"
        );
        std::process::exit(1);
    };

    let pulses = match args.next() {
        Some(arg) => arg
            .parse()
            .with_context(|| format!("invalid pulse count '{arg}'"))?,
        None => retroz80::DEFAULT_PULSES,
    };
    let start_pc = match args.next() {
        Some(arg) => parse_address(&arg)?,
        None => 0x0000,
    };

    let config = RunConfig::builder()
        .rom_path(rom_path)
        .pulses(pulses)
        .start_pc(start_pc)
        .build();

    retroz80::run(&config)?;
    Ok(())
}
