//! Read-only view subscribers for the public site.
//!
//! Each display surface (schedule board, standings, links page, rulebook)
//! mounts one subscriber, reads its snapshot, and never mutates anything.
//! Reloads are whole-snapshot on purpose: per-key filtering buys nothing at
//! this data size and full reloads cannot half-apply an update.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast::error::RecvError, RwLock};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::models::{
    default_links, default_rules, default_schedule, default_team_records, Game, LinkCollections,
    RuleSection, TeamRecords,
};
use crate::store::{keys, StoreAccessor};

/// Render-local copy of everything the public site shows.
#[derive(Debug, Clone, PartialEq)]
pub struct SiteSnapshot {
    pub week: u32,
    pub schedule: Vec<Game>,
    pub team_records: TeamRecords,
    pub links: LinkCollections,
    pub rules: Vec<RuleSection>,
}

impl SiteSnapshot {
    /// Load a full snapshot through the accessor, substituting the seeded
    /// defaults for anything absent or malformed.
    pub async fn load(store: &StoreAccessor) -> Self {
        Self {
            week: store.load(keys::WEEK, 11).await,
            schedule: store.load(keys::SCHEDULE, default_schedule()).await,
            team_records: store.load(keys::TEAM_RECORDS, default_team_records()).await,
            links: store.load(keys::LINKS, default_links()).await,
            rules: store.load(keys::RULES, default_rules()).await,
        }
    }

    /// Record string for a team, "0-0" when none has been entered.
    pub fn record_for(&self, team_id: &str) -> &str {
        self.team_records
            .get(team_id)
            .map(String::as_str)
            .unwrap_or("0-0")
    }

    /// The highlighted game of the week, if one is flagged.
    pub fn game_of_week(&self) -> Option<&Game> {
        self.schedule.iter().find(|g| g.is_game_of_week)
    }

    /// Games shown in the "tonight" rail.
    pub fn games_tonight(&self) -> impl Iterator<Item = &Game> {
        self.schedule.iter().filter(|g| g.is_tonight())
    }
}

/// A mounted read-only view.
///
/// Holds a snapshot that a task keeps fresh from two sources: change
/// events from the notifier, and a fixed-interval poll that masks any
/// write the broadcast missed. Unmounting (or dropping) cancels the task;
/// a view must never keep polling after it is gone.
pub struct ViewSubscriber {
    snapshot: Arc<RwLock<SiteSnapshot>>,
    task: JoinHandle<()>,
}

impl ViewSubscriber {
    /// Load the initial snapshot and start the refresh task.
    pub async fn mount(store: StoreAccessor, poll_interval: Duration) -> Self {
        let snapshot = Arc::new(RwLock::new(SiteSnapshot::load(&store).await));

        let shared = Arc::clone(&snapshot);
        let mut events = store.subscribe();
        // Create the ticker here so the poll schedule is anchored at mount
        // time, not at the first poll of the spawned task.
        let mut ticker = tokio::time::interval(poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // interval fires immediately once; the mount load covered that.
        ticker.tick().await;

        let task = tokio::spawn(async move {
            loop {
                let reload = tokio::select! {
                    event = events.recv() => match event {
                        Ok(_) => true,
                        // Fell behind the hub; the snapshot reload below
                        // converges us regardless of what was missed.
                        Err(RecvError::Lagged(skipped)) => {
                            tracing::debug!("View lagged {} change events", skipped);
                            true
                        }
                        Err(RecvError::Closed) => break,
                    },
                    _ = ticker.tick() => true,
                };

                if reload {
                    let fresh = SiteSnapshot::load(&store).await;
                    *shared.write().await = fresh;
                }
            }
        });

        Self { snapshot, task }
    }

    /// Current render state.
    pub async fn snapshot(&self) -> SiteSnapshot {
        self.snapshot.read().await.clone()
    }

    /// Stop refreshing and release the timer and listener.
    pub fn unmount(self) {
        self.task.abort();
    }
}

impl Drop for ViewSubscriber {
    fn drop(&mut self) {
        self.task.abort();
    }
}
