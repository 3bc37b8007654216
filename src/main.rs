//! Binary entry point: wires the CLI, the live capture source, the
//! `Monitor` producer thread, and the terminal renderer together. Mirrors
//! the teacher's `lib.rs::run` shape (panic hook, `tracing_subscriber`
//! init, then build shared state and hand off) adapted from a Tauri
//! desktop-app entry point to a two-thread producer/consumer CLI.

mod capture;
mod terminal;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use netbwtop::cli::Cli;
use netbwtop::error::MonitorError;
use netbwtop::flowtable::FlowTable;
use netbwtop::monitor::Monitor;
use netbwtop::render::{build_rows, ColumnPlan};

use capture::CaptureSource;

fn main() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        tracing::error!("PANIC in netbwtop: {info}");
        default_hook(info);
    }));

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "netbwtop=info".into()),
        )
        .init();

    if let Err(e) = run() {
        eprintln!("netbwtop: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), MonitorError> {
    let cli = Cli::parse();

    if let Some(dir) = &cli.snapshot_dir {
        if !dir.is_dir() {
            return Err(MonitorError::Config(format!(
                "{}: not a directory",
                dir.display()
            )));
        }
    }

    let shutdown = Arc::new(AtomicBool::new(false));
    {
        let shutdown = Arc::clone(&shutdown);
        ctrlc::set_handler(move || shutdown.store(true, Ordering::Relaxed))
            .map_err(|e| MonitorError::Config(format!("failed to install SIGINT handler: {e}")))?;
    }

    let table = Arc::new(FlowTable::new(cli.sort_key.into()));
    let mut monitor = Monitor::new(Arc::clone(&table));

    let source = CaptureSource::open(&cli.interface)?;
    monitor.start(source)?;

    let mut term = terminal::init()?;
    let result = consumer_loop(&mut term, &mut monitor, &cli, &shutdown);

    monitor.stop();
    terminal::restore(&mut term)?;
    result
}

fn consumer_loop(
    term: &mut terminal::Term,
    monitor: &mut Monitor,
    cli: &Cli,
    shutdown: &AtomicBool,
) -> Result<(), MonitorError> {
    let mut tick: u64 = 0;
    while !shutdown.load(Ordering::Relaxed) {
        std::thread::sleep(Duration::from_secs(cli.refresh_secs));
        if shutdown.load(Ordering::Relaxed) {
            break;
        }

        let snapshot = monitor.snapshot();
        let rows = build_rows(&snapshot, cli.refresh_secs);
        let (width, _) = crossterm::terminal::size()?;
        let plan = ColumnPlan::for_width(width);

        let lines = terminal::draw(term, &rows, plan)?;

        if let Some(dir) = &cli.snapshot_dir {
            terminal::write_snapshot(dir, tick, &lines)?;
            tick += 1;
        }
    }
    Ok(())
}
