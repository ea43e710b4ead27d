//! Watch command implementation.
//!
//! Runs a lifecycle session per property until Ctrl-C: new and edited
//! guests get their messages, stays past checkout are marked checked out.
//! Rendered messages are printed to stdout instead of being delivered, or
//! only logged with `--log-only`. Hotel occupancy changes are logged at info
//! level. Writes made by other `frontdesk` processes are picked up by
//! polling the database.

use crate::error::CliError;
use crate::utils::{load_configuration, open_store, parse_property, GlobalOptions};
use clap::Args;
use frontdesk::clock::{Clock, SystemClock};
use frontdesk::lifecycle::{LifecycleSession, MessagingTimings};
use frontdesk::messaging::{LogSender, MessageSender, OutgoingMessage};
use frontdesk::occupancy::OccupancyTracker;
use frontdesk::store::{self, SqliteDocumentStore};
use frontdesk::{NodeType, PropertyRef};
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

/// Serve guest messaging for one or more properties.
#[derive(Args)]
pub struct WatchCommand {
    /// Property addresses, e.g. hotels/h1; every property when omitted
    #[arg(value_parser = parse_property)]
    pub properties: Vec<PropertyRef>,

    /// Print each message as a JSON line
    #[arg(long, conflicts_with = "log_only")]
    pub json: bool,

    /// Only log messages (visible with --verbose) instead of printing them
    #[arg(long)]
    pub log_only: bool,

    /// Seconds between checks for writes by other processes
    #[arg(long, value_name = "SECONDS", default_value_t = 1)]
    pub poll_interval: u64,

    /// Stop after this many seconds instead of waiting for Ctrl-C
    #[arg(long, value_name = "SECONDS")]
    pub duration: Option<u64>,
}

/// Prints every message it is asked to deliver.
struct ConsoleSender {
    json: bool,
}

impl MessageSender for ConsoleSender {
    fn send(&self, message: &OutgoingMessage) -> frontdesk::Result<()> {
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        if self.json {
            serde_json::to_writer(&mut handle, message)?;
            writeln!(handle)?;
        } else {
            writeln!(
                handle,
                "{}\t{}\t{}\t{}\t{}",
                message.property, message.guest_id, message.key, message.mobile, message.text
            )?;
        }
        handle.flush()?;
        Ok(())
    }
}

impl WatchCommand {
    /// Execute the watch command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        if self.poll_interval == 0 {
            return Err(CliError::InvalidArguments(
                "--poll-interval must be at least 1 second".to_string(),
            ));
        }

        let config = load_configuration(global)?;
        let store = open_store(global, &config)?;

        let properties = if self.properties.is_empty() {
            let mut all = Vec::new();
            for node in NodeType::ALL {
                all.extend(
                    store::load_properties(&store, node)?
                        .iter()
                        .map(frontdesk::Property::reference),
                );
            }
            all
        } else {
            self.properties.clone()
        };
        if properties.is_empty() {
            if !global.quiet {
                eprintln!("No properties to watch");
            }
            return Ok(());
        }

        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let sender: Arc<dyn MessageSender> = if self.log_only {
            Arc::new(LogSender)
        } else {
            Arc::new(ConsoleSender { json: self.json })
        };
        let timings = MessagingTimings::from(&config.messaging());
        let recheck = config.recheck_interval();

        let mut sessions = Vec::with_capacity(properties.len());
        for property in properties {
            let session =
                LifecycleSession::new(store.clone(), property, clock.clone(), sender.clone())?
                    .with_timings(timings)
                    .with_recheck_interval(recheck);
            sessions.push(session);
        }

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;
        runtime.block_on(self.serve(store, sessions, clock, recheck, global))
    }

    async fn serve(
        &self,
        store: SqliteDocumentStore,
        sessions: Vec<LifecycleSession<SqliteDocumentStore>>,
        clock: Arc<dyn Clock>,
        recheck: Duration,
        global: &GlobalOptions,
    ) -> Result<(), CliError> {
        let cancel = CancellationToken::new();
        let mut tasks: JoinSet<frontdesk::Result<()>> = JoinSet::new();

        for mut session in sessions {
            let token = cancel.child_token();
            let property = session.property().clone();
            if !global.quiet {
                eprintln!("Watching {property}");
            }
            if property.node == NodeType::Hotels {
                let tracker =
                    OccupancyTracker::spawn(store.clone(), property, clock.clone(), recheck)?;
                tasks.spawn(log_occupancy(tracker, cancel.child_token()));
            }
            tasks.spawn(async move { session.run(token).await });
        }

        let poll = Duration::from_secs(self.poll_interval);
        let token = cancel.child_token();
        tasks.spawn(async move {
            poll_external(&store, poll, token).await;
            Ok(())
        });

        let deadline = self.duration.map(Duration::from_secs);
        tokio::select! {
            result = tokio::signal::ctrl_c() => result?,
            () = sleep_for(deadline) => {}
        }
        cancel.cancel();

        let mut first_error = None;
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    first_error.get_or_insert(CliError::from(e));
                }
                Err(e) => {
                    first_error.get_or_insert(CliError::Io(std::io::Error::new(
                        std::io::ErrorKind::Other,
                        e,
                    )));
                }
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

/// Logs a hotel's occupancy whenever the set of occupied rooms changes.
async fn log_occupancy(tracker: OccupancyTracker, cancel: CancellationToken) -> frontdesk::Result<()> {
    let mut updates = tracker.watch();
    let first = updates.borrow_and_update().clone();
    log::info!(
        "occupancy of {}: {} of {} rooms occupied",
        tracker.property(),
        first.occupied.len(),
        first.rooms.len()
    );
    let mut last = first.occupied;

    loop {
        tokio::select! {
            () = cancel.cancelled() => break,
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = updates.borrow_and_update().clone();
                if snapshot.occupied != last {
                    log::info!(
                        "occupancy of {}: {} of {} rooms occupied",
                        tracker.property(),
                        snapshot.occupied.len(),
                        snapshot.rooms.len()
                    );
                    last = snapshot.occupied;
                }
            }
        }
    }

    tracker.shutdown().await;
    Ok(())
}

/// Sleeps for `deadline`, or forever without one.
async fn sleep_for(deadline: Option<Duration>) {
    match deadline {
        Some(deadline) => tokio::time::sleep(deadline).await,
        None => std::future::pending().await,
    }
}

/// Turns commits by other connections into change notifications.
async fn poll_external(store: &SqliteDocumentStore, every: Duration, cancel: CancellationToken) {
    let mut ticker = tokio::time::interval(every);
    loop {
        tokio::select! {
            () = cancel.cancelled() => break,
            _ = ticker.tick() => {
                if let Err(e) = store.poll_external() {
                    eprintln!("Warning: failed to check the database for changes: {e}");
                }
            }
        }
    }
}
