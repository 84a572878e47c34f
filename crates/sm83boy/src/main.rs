use anyhow::Context;
use sm83boy::{RunOptions, Verdict};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let (rom_path, options) = RunOptions::parse_args(std::env::args().skip(1))?;
    log::info!("Running ROM path: '{}' ({:?})", rom_path, options);

    let rom = std::fs::read(&rom_path)
        .with_context(|| format!("failed to read ROM file '{rom_path}'"))?;

    let report = sm83boy::run(&rom, &options)?;
    println!();
    match report.verdict {
        Some(Verdict::Passed) => log::info!("test ROM passed"),
        Some(Verdict::Failed) => {
            log::error!("test ROM failed after {} steps", report.steps);
            std::process::exit(1);
        }
        None => log::warn!(
            "no verdict after {} steps ({} M-cycles)",
            report.steps,
            report.cycles
        ),
    }

    Ok(())
}
