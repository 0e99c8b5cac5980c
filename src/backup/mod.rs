//! Backup and restore: the panel's data-management surface.
//!
//! The export document is the canonical backup format; imports are
//! validated all-or-nothing at the top level before anything is written.

use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::AppError;
use crate::models::{
    default_links, default_rules, default_schedule, default_team_records, Game, LinkCollections,
    RuleSection, TeamRecords,
};
use crate::store::{keys, StoreAccessor};

/// Format version stamped into every export.
pub const EXPORT_VERSION: &str = "1.0.0";

/// The canonical backup document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupDocument {
    pub week: u32,
    pub schedule: Vec<Game>,
    pub team_records: TeamRecords,
    pub links: LinkCollections,
    pub rules: Vec<RuleSection>,
    pub export_date: String,
    pub version: String,
}

/// What an import actually applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSummary {
    pub links_applied: bool,
    pub rules_applied: bool,
}

/// Counts shown on the data-management overview.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DataStats {
    pub games_count: usize,
    pub teams_with_records: usize,
    pub total_links: usize,
    pub rules_sections: usize,
}

/// Assemble a backup of everything the panel manages.
pub async fn export_document(store: &StoreAccessor) -> BackupDocument {
    BackupDocument {
        week: store.load(keys::WEEK, 11).await,
        schedule: store.load(keys::SCHEDULE, default_schedule()).await,
        team_records: store.load(keys::TEAM_RECORDS, default_team_records()).await,
        links: store.load(keys::LINKS, default_links()).await,
        rules: store.load(keys::RULES, default_rules()).await,
        export_date: Utc::now().to_rfc3339(),
        version: EXPORT_VERSION.to_string(),
    }
}

/// Pretty-printed backup JSON, as the download produces it.
pub async fn export_json(store: &StoreAccessor) -> Result<String, AppError> {
    let document = export_document(store).await;
    Ok(serde_json::to_string_pretty(&document)?)
}

/// Write `rcl-backup-YYYY-MM-DD.json` into `dir`; returns the path.
pub async fn write_backup_file(store: &StoreAccessor, dir: &Path) -> Result<PathBuf, AppError> {
    let json = export_json(store).await?;
    let name = format!("rcl-backup-{}.json", Utc::now().format("%Y-%m-%d"));
    let path = dir.join(name);
    tokio::fs::write(&path, json)
        .await
        .map_err(|e| AppError::Storage(format!("Error writing backup file: {}", e)))?;
    Ok(path)
}

/// Restore from backup JSON.
///
/// `week`, `schedule` and `teamRecords` must be present and well-typed or
/// the whole import is rejected before any write. `links` and `rules` are
/// optional; when present but malformed they are skipped with a warning
/// rather than failing the rest (finer-grained best-effort).
pub async fn import_json(store: &StoreAccessor, json: &str) -> Result<ImportSummary, AppError> {
    let document: Value = serde_json::from_str(json)
        .map_err(|e| AppError::InvalidImport(format!("Not valid JSON: {}", e)))?;

    let Value::Object(fields) = &document else {
        return Err(AppError::InvalidImport(
            "Expected a JSON object".to_string(),
        ));
    };

    for required in ["week", "schedule", "teamRecords"] {
        if !fields.contains_key(required) {
            return Err(AppError::InvalidImport(format!(
                "Missing required field: {}",
                required
            )));
        }
    }

    // Validate all required shapes before the first write: a bad backup
    // must leave the store exactly as it was.
    let week: u32 = serde_json::from_value(fields["week"].clone())
        .map_err(|e| AppError::InvalidImport(format!("Invalid week: {}", e)))?;
    let schedule: Vec<Game> = serde_json::from_value(fields["schedule"].clone())
        .map_err(|e| AppError::InvalidImport(format!("Invalid schedule: {}", e)))?;
    let team_records: TeamRecords = serde_json::from_value(fields["teamRecords"].clone())
        .map_err(|e| AppError::InvalidImport(format!("Invalid teamRecords: {}", e)))?;

    store.save(keys::WEEK, &week).await;
    store.save(keys::SCHEDULE, &schedule).await;
    store.save(keys::TEAM_RECORDS, &team_records).await;

    let mut summary = ImportSummary {
        links_applied: false,
        rules_applied: false,
    };

    if let Some(value) = fields.get("links") {
        match serde_json::from_value::<LinkCollections>(value.clone()) {
            Ok(links) => {
                store.save(keys::LINKS, &links).await;
                summary.links_applied = true;
            }
            Err(e) => tracing::warn!("Skipping malformed links in import: {}", e),
        }
    }

    if let Some(value) = fields.get("rules") {
        match serde_json::from_value::<Vec<RuleSection>>(value.clone()) {
            Ok(rules) => {
                store.save(keys::RULES, &rules).await;
                summary.rules_applied = true;
            }
            Err(e) => tracing::warn!("Skipping malformed rules in import: {}", e),
        }
    }

    tracing::info!(
        "Import applied (links: {}, rules: {})",
        summary.links_applied,
        summary.rules_applied
    );
    Ok(summary)
}

/// Counts for the data-management overview.
pub async fn data_stats(store: &StoreAccessor) -> DataStats {
    let schedule: Vec<Game> = store.load(keys::SCHEDULE, Vec::new()).await;
    let team_records: TeamRecords = store.load(keys::TEAM_RECORDS, TeamRecords::new()).await;
    let links: LinkCollections = store.load(keys::LINKS, LinkCollections::default()).await;
    let rules: Vec<RuleSection> = store.load(keys::RULES, Vec::new()).await;

    DataStats {
        games_count: schedule.len(),
        teams_with_records: team_records.len(),
        total_links: links.total(),
        rules_sections: rules.len(),
    }
}

/// Danger zone: remove every content key. Sessions and likes survive.
pub async fn clear_all(store: &StoreAccessor) {
    for key in keys::CONTENT {
        store.remove(key).await;
    }
    tracing::info!("Cleared all panel content keys");
}
