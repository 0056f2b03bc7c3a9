mod app;
mod args;
mod constants;
mod error;
mod input;
mod latency;
mod logging;
mod probe;
mod reader;
mod shutdown;
mod ui;
mod util;
mod window;

use anyhow::Context;
use clap::Parser;
use crossbeam_channel::bounded;

use crate::app::App;
use crate::args::Args;
use crate::probe::PingProbe;
use crate::reader::spawn_reader;
use crate::shutdown::Shutdown;

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_path = args.log_path();
    let _log_guard = logging::init(&log_path);
    tracing::info!(
        host = %args.target,
        window = args.window.get(),
        stats = args.stats.label(),
        "starting"
    );

    let shutdown = Shutdown::new();
    let signal_shutdown = shutdown.clone();
    ctrlc::set_handler(move || signal_shutdown.trigger())
        .context("failed to install signal handler")?;

    let mut probe = PingProbe::spawn(&args.program, &args.target)?;
    let stdout = probe.take_stdout()?;

    // Rendezvous channel: the reader blocks until the UI takes each sample
    let (sample_tx, sample_rx) = bounded(0);
    let reader = spawn_reader(stdout, sample_tx, shutdown.clone());

    let mut app = App::new(&args.target, args.window, args.stats);
    let res = ui::run(&mut app, &sample_rx, &shutdown);

    shutdown.trigger();
    probe.stop();
    if reader.join().is_err() {
        tracing::error!("reader thread panicked");
    }

    res.context("display failed")?;
    probe.wait()?;
    let stats = app.window.aggregates();
    tracing::info!(
        replies = app.replies,
        avg_ms = stats.avg,
        max_ms = stats.max,
        min_ms = stats.min,
        "exited cleanly"
    );
    Ok(())
}
