//! RCL panel core.
//!
//! The persistence and synchronization layer behind the RCL league site and
//! its password-gated content panel. A durable key/value store is the sole
//! source of truth; an injected [`store::StoreAccessor`] is the only way to
//! touch it. Public views mount a [`view::ViewSubscriber`] that reloads on
//! change events with a polling fallback; the panel runs an
//! [`editor::EditorSession`] that commits working copies on request or via
//! debounced auto-save, gated by the [`auth`] roster.

pub mod auth;
pub mod backup;
pub mod config;
pub mod editor;
pub mod engagement;
pub mod errors;
pub mod models;
pub mod store;
pub mod view;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;
use errors::AppError;
use store::{init_store, keys, StoreAccessor};

/// Initialize logging from the configured level, unless `RUST_LOG` is set.
pub fn init_tracing(config: &Config) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Open the durable store and seed the content keys that must exist on a
/// fresh install. Seeding is strictly absent-only: existing edits are never
/// clobbered by defaults.
pub async fn bootstrap(config: &Config) -> Result<StoreAccessor, AppError> {
    tracing::info!("Opening store at {:?}", config.db_path);
    let backend = init_store(&config.db_path).await?;
    let store = StoreAccessor::new(backend);

    seed_defaults(&store).await;

    Ok(store)
}

/// Write the seeded week, schedule and records where absent. Links and
/// rules have in-code defaults at every load site instead, as the site
/// always had.
pub async fn seed_defaults(store: &StoreAccessor) {
    if !store.contains(keys::SCHEDULE).await {
        store
            .save(keys::SCHEDULE, &models::default_schedule())
            .await;
    }
    if !store.contains(keys::TEAM_RECORDS).await {
        store
            .save(keys::TEAM_RECORDS, &models::default_team_records())
            .await;
    }
    if !store.contains(keys::WEEK).await {
        store.save(keys::WEEK, &11u32).await;
    }
}

#[cfg(test)]
mod tests;
