//! Replay a recorded sample stream through the fusion loop
//!
//! Reads one record per line (`wx, wy, wz` or `ax, ay, az, wx, wy, wz`, rates
//! in deg/s) from a file or stdin and prints the angle-axis rotation a
//! renderer would apply after every cycle.
//!
//! Run with: `cargo run --example replay -- testdata/tilted_still.txt [settings.toml]`
//!
//! Set `RUST_LOG=debug` to see skipped integration and correction steps.

use anyhow::{Context, Result};
use attitude_fusion::{FusionOutput, FusionSession, LineSource, SampleSource, load_settings};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use tracing::info;

/// Prints one line per cycle, the way the cuboid renderer consumes it
fn print_output(out: &mut impl Write, cycle: u64, output: &FusionOutput) -> io::Result<()> {
    let (theta, ax, ay, az) = output.angle_axis.as_tuple();
    let q = output.quaternion;
    writeln!(
        out,
        "{:>6}  theta {:>8.3}  axis ({:>6.3}, {:>6.3}, {:>6.3})  q ({:.4}, {:.4}, {:.4}, {:.4})",
        cycle, theta, ax, ay, az, q.w, q.i, q.j, q.k
    )
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let input = args.next();
    let settings = match args.next() {
        Some(path) => load_settings(&path).with_context(|| format!("loading {path}"))?,
        None => Default::default(),
    };

    let mut session = FusionSession::with_settings(settings)?;
    let reader: Box<dyn BufRead> = match &input {
        Some(path) if path != "-" => {
            Box::new(BufReader::new(File::open(path).with_context(|| format!("opening {path}"))?))
        }
        _ => Box::new(io::stdin().lock()),
    };

    let mut source = LineSource::new(reader);
    let mut out = io::stdout().lock();
    let mut cycles = 0;
    while let Some(record) = source.next_sample() {
        let output = session.process(record);
        cycles += 1;
        print_output(&mut out, cycles, &output).context("writing output")?;
    }

    let states = session.internal_states();
    info!(cycles, held = states.held_cycles, "replay finished");
    Ok(())
}
