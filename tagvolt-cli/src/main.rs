mod sim;

use clap::Parser;
use sim::SimulatedTag;
use std::error::Error;
use tagvolt_lib::event::RunEvent;
use tagvolt_lib::{RunConfig, Sequencer};
use tokio::sync::mpsc;
use tracing::debug;

/// Drive a measurement run against a simulated NFC-V sensor tag.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Number of measurement iterations; 0 runs until Ctrl-C
    #[arg(short, long, default_value_t = 10)]
    repeat: u32,

    /// Gain selector the simulated tag reports in its config register (0-3,
    /// for 1x/2x/4x/8x)
    #[arg(short, long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=3))]
    gain_sel: u8,

    /// Make every Nth measurement exchange fail with a transport error
    #[arg(long)]
    fail_every: Option<u32>,

    /// Print protocol log lines as well as samples
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let tag = SimulatedTag::new(cli.gain_sel, cli.fail_every);

    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut sequencer = Sequencer::new(tag, tx);

    // Ctrl-C stops an infinite run at the next iteration boundary;
    // power-off is still issued on the way out.
    let token = sequencer.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            token.cancel();
        }
    });

    let verbose = cli.verbose;
    let printer = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            match event {
                RunEvent::Log(line) => {
                    if verbose {
                        println!("  {line}");
                    } else {
                        debug!("{line}");
                    }
                }
                RunEvent::Sample(sample) => println!("{sample}"),
                RunEvent::Completed => println!("run completed"),
                RunEvent::Aborted(reason) => println!("run aborted: {reason}"),
            }
        }
    });

    sequencer.run(RunConfig { repeat_count: cli.repeat }).await;
    drop(sequencer);
    printer.await?;

    Ok(())
}
