//! `k9-display`: run the status display against a simulated ledger.
//!
//! Stands in for the bot process on a bench setup. A walk is logged every
//! few seconds, with the occasional payout or credit, and each event raises
//! the same notification the chat handlers would.
//!
//! # Usage
//!
//! ```bash
//! k9-display [config.toml]
//! K9_DISPLAY_CONFIG=display.toml RUST_LOG=debug k9-display
//! ```
//!
//! With `device.kind = "preview"` and `RUST_LOG=debug`, every published
//! frame is printed to the log as ASCII art.

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use k9_display::ledger::{SimulatedLedger, WALK_PRICE};
use k9_display::{DisplayConfig, DisplayManager, NotificationKind, Result, StatsSource};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Environment variable naming the config file when no argument is given.
const CONFIG_ENV: &str = "K9_DISPLAY_CONFIG";

/// Time between simulated ledger events.
const EVENT_INTERVAL: Duration = Duration::from_secs(7);

/// Credit amount for simulated credit events, in MDL.
const CREDIT_AMOUNT: f64 = 50.0;

/// Longest wait for the shutdown popup before stopping the display.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "k9-display failed");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let config = load_config()?;
    let tick = config.tick_interval();

    let ledger = Arc::new(SimulatedLedger::new());
    let manager = DisplayManager::new(config, Arc::clone(&ledger) as Arc<dyn StatsSource>);

    let (shutdown_tx, shutdown_rx) = mpsc::channel();
    ctrlc::set_handler(move || {
        shutdown_tx.send(()).ok();
    })
    .map_err(std::io::Error::other)?;

    manager.start()?;
    manager.notify(NotificationKind::System, "Bot Starting Up!");
    info!("k9-display running, Ctrl-C to stop");

    let mut event: u64 = 0;
    loop {
        match shutdown_rx.recv_timeout(EVENT_INTERVAL) {
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            Err(RecvTimeoutError::Timeout) => {}
        }
        event += 1;
        if event == 1 {
            manager.notify(NotificationKind::System, "Bot Online!");
            continue;
        }
        simulate_event(&manager, &ledger, event);
    }

    info!("shutting down");
    manager.notify(NotificationKind::System, "Bot Shutting Down");
    thread::sleep(tick.min(SHUTDOWN_GRACE));
    manager.stop();
    Ok(())
}

/// Config from the first argument, then `K9_DISPLAY_CONFIG`, else defaults.
fn load_config() -> Result<DisplayConfig> {
    let path = env::args_os()
        .nth(1)
        .or_else(|| env::var_os(CONFIG_ENV))
        .map(PathBuf::from);

    match path {
        Some(path) => {
            info!(path = %path.display(), "loading display config");
            DisplayConfig::load(&path)
        }
        None => {
            info!("no display config given, using defaults");
            Ok(DisplayConfig::default())
        }
    }
}

/// One ledger write (or the weekly report) plus the notification the
/// matching chat handler raises.
fn simulate_event(
    manager: &DisplayManager,
    ledger: &SimulatedLedger,
    event: u64,
) {
    let (kind, detail) = match event {
        n if n % 20 == 0 => (NotificationKind::ReportSent, "Weekly Report Sent".to_string()),
        n if n % 9 == 0 => {
            let paid = ledger.pay_out();
            (NotificationKind::PaymentMade, format!("Paid Out: {paid:.0}"))
        }
        n if n % 5 == 0 => {
            ledger.give_credit(CREDIT_AMOUNT);
            (NotificationKind::CreditGiven, format!("Credit: -{CREDIT_AMOUNT:.0} MDL"))
        }
        _ => {
            let balance = ledger.add_walk();
            (
                NotificationKind::WalkAdded,
                format!("+{WALK_PRICE:.0} MDL, balance {balance:.0}"),
            )
        }
    };

    // Screens should reflect the write on their next refresh
    manager.stats().invalidate();
    info!(?kind, %detail, "ledger event");
    manager.notify(kind, &detail);
}
