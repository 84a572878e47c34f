use std::io::Write;

use anyhow::{bail, Context, Result};
use sm83boy_core::machine::{LogTrace, SerialSink};
use sm83boy_core::{GameBoy, CLOCK_HZ, T_CYCLES_PER_M_CYCLE};

/// Step budget large enough for the full `cpu_instrs` suite.
pub const DEFAULT_MAX_STEPS: u64 = 30_000_000;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunOptions {
    pub max_steps: u64,
    /// Stop as soon as the serial output carries a verdict.
    pub stop_on_verdict: bool,
    /// Log every instruction through `log::trace!`.
    pub trace: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            max_steps: DEFAULT_MAX_STEPS,
            stop_on_verdict: true,
            trace: false,
        }
    }
}

impl RunOptions {
    /// Parse `<rom> [max-steps] [--trace] [--no-stop]`, program name
    /// already removed. Returns the ROM path and the options.
    pub fn parse_args<I>(args: I) -> Result<(String, RunOptions)>
    where
        I: IntoIterator<Item = String>,
    {
        let mut options = RunOptions::default();
        let mut rom_path = None;

        for arg in args {
            match arg.as_str() {
                "--trace" => options.trace = true,
                "--no-stop" => options.stop_on_verdict = false,
                flag if flag.starts_with("--") => bail!("unknown option '{flag}'"),
                value if rom_path.is_none() => rom_path = Some(value.to_string()),
                value => {
                    options.max_steps = value
                        .parse()
                        .with_context(|| format!("invalid step count '{value}'"))?;
                }
            }
        }

        let rom_path = rom_path
            .context("no ROM path provided. Usage: sm83boy <rom> [max-steps] [--trace] [--no-stop]")?;
        Ok((rom_path, options))
    }
}

/// Prints serial output to stdout as it arrives and keeps a copy.
///
/// After the first failed write to stdout (a closed pipe, say) echoing
/// stops and a warning is logged; the copy keeps growing.
#[derive(Debug, Default)]
pub struct EchoSerial {
    output: Vec<u8>,
    echo_failed: bool,
}

impl EchoSerial {
    pub fn output(&self) -> &[u8] {
        &self.output
    }

    /// Whether echoing to stdout has stopped because of a write error.
    pub fn echo_failed(&self) -> bool {
        self.echo_failed
    }

    fn echo<W: Write>(&mut self, out: &mut W, byte: u8) {
        if self.echo_failed {
            return;
        }
        let mut result = out.write_all(&[byte]);
        if byte == b'\n' {
            result = result.and_then(|()| out.flush());
        }
        if let Err(err) = result {
            log::warn!("serial echo to stdout failed, capturing only from now on: {err}");
            self.echo_failed = true;
        }
    }
}

impl SerialSink for EchoSerial {
    fn write_byte(&mut self, byte: u8) {
        self.output.push(byte);
        self.echo(&mut std::io::stdout().lock(), byte);
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    Passed,
    Failed,
}

/// Verdict reported by a test ROM's serial output, if any yet.
pub fn verdict(output: &[u8]) -> Option<Verdict> {
    let text = String::from_utf8_lossy(output);
    if text.contains("Failed") {
        Some(Verdict::Failed)
    } else if text.contains("Passed") {
        Some(Verdict::Passed)
    } else {
        None
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunReport {
    pub output: String,
    pub steps: u64,
    /// M-cycles.
    pub cycles: u64,
    pub verdict: Option<Verdict>,
}

/// Run `rom` until it reports a verdict or the step budget is spent.
pub fn run(rom: &[u8], options: &RunOptions) -> Result<RunReport> {
    let mut gb = GameBoy::new(rom, EchoSerial::default()).context("failed to load ROM")?;
    if options.trace {
        gb.set_trace(LogTrace);
    }

    let mut seen = 0;
    let mut current = None;
    gb.run_until(options.max_steps, |gb| {
        let output = gb.serial().output();
        // Only rescan when new output arrived.
        if output.len() != seen {
            seen = output.len();
            current = verdict(output);
        }
        options.stop_on_verdict && current.is_some()
    })
    .with_context(|| {
        format!(
            "emulation stopped after {} steps at PC=0x{:04X}",
            gb.steps(),
            gb.cpu.regs.pc
        )
    })?;

    let output = String::from_utf8_lossy(gb.serial().output()).into_owned();
    let clock_cycles = gb.cycles() * u64::from(T_CYCLES_PER_M_CYCLE);
    let seconds = clock_cycles as f64 / f64::from(CLOCK_HZ);
    log::info!(
        "finished after {} steps ({} M-cycles, {:.2}s of emulated time): {:?}",
        gb.steps(),
        gb.cycles(),
        seconds,
        current
    );

    Ok(RunReport {
        verdict: verdict(output.as_bytes()),
        output,
        steps: gb.steps(),
        cycles: gb.cycles(),
    })
}
