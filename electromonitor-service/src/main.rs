use anyhow::Result;
use electromonitor_service::{
    clock::Clock,
    config::AppConfig,
    console, observability, prometheus,
    session::Session,
    sources::{ArgsSource, StdinSource},
};
use tokio::sync::mpsc;

fn main() -> Result<()> {
    observability::init_tracing();

    // Read the local offset while the process is still single-threaded.
    let clock = Clock::local();

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(run(clock))
}

async fn run(clock: Clock) -> Result<()> {
    // Load configuration
    let cfg = AppConfig::load()?;

    if cfg.metrics.enabled {
        prometheus::init()?;
    }

    let (reminder_tx, mut reminder_rx) = mpsc::channel(16);
    let mut session = Session::new(&cfg, clock, reminder_tx)?;
    tracing::info!(
        customers = cfg.customer_directory().len(),
        reminder_interval_ms = cfg.reminder.interval_ms,
        utc_offset = %clock.offset(),
        "session started"
    );

    let mut stdout = std::io::stdout();

    // Commands given on the command line run non-interactively.
    let scripted = ArgsSource::new(std::env::args().skip(1));
    if scripted.is_empty() {
        console::run(&mut session, &StdinSource, &mut reminder_rx, &mut stdout).await?;
    } else {
        console::run(&mut session, &scripted, &mut reminder_rx, &mut stdout).await?;
    }

    Ok(())
}
