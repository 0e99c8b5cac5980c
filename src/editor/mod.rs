//! The panel's editor session.
//!
//! Holds an in-memory working copy of every managed dataset. Mutations touch
//! only the working copies; nothing reaches the store (or the public views)
//! until a commit, either explicit via [`EditorSession::save`] or through
//! the debounced auto-save. Opening a session is gated on a valid stored
//! session token and fails closed without one.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;

use crate::errors::AppError;
use crate::models::{
    default_links, default_rules, default_schedule, default_team_records, team_by_id, Game,
    GamePatch, Link, LinkCategory, LinkCollections, LinkPatch, RuleSection, SessionToken,
    TeamRecords,
};
use crate::store::{keys, StoreAccessor};

/// What a commit writes: one dataset or all five.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveScope {
    Week,
    Schedule,
    Records,
    Links,
    Rules,
    All,
}

/// The five working copies, committed wholesale per dataset.
#[derive(Debug, Clone)]
struct WorkingCopies {
    week: u32,
    schedule: Vec<Game>,
    team_records: TeamRecords,
    links: LinkCollections,
    rules: Vec<RuleSection>,
}

struct SessionState {
    copies: WorkingCopies,
    autosave_enabled: bool,
    /// The armed debounce task, if any. Re-armed (old one aborted) on every
    /// mutation; aborted outright when auto-save is disabled or the
    /// session closes.
    pending: Option<JoinHandle<()>>,
    last_saved: Option<DateTime<Utc>>,
    /// Highest identifier handed out so far, so two creations within one
    /// millisecond tick still get distinct ids.
    last_issued_id: i64,
}

/// A live, authenticated editing session over the panel datasets.
pub struct EditorSession {
    store: StoreAccessor,
    user: SessionToken,
    debounce: Duration,
    state: Arc<Mutex<SessionState>>,
}

impl EditorSession {
    /// Open a session. Requires a valid session token in the store; absence
    /// or a malformed token fails closed with `Unauthorized`, and the
    /// caller falls back to the public site.
    pub async fn open(store: StoreAccessor, debounce: Duration) -> Result<Self, AppError> {
        let user: Option<SessionToken> = store.load(keys::SESSION, None).await;
        let Some(user) = user else {
            return Err(AppError::Unauthorized("No active session".to_string()));
        };

        let copies = WorkingCopies {
            week: store.load(keys::WEEK, 11).await,
            schedule: store.load(keys::SCHEDULE, default_schedule()).await,
            team_records: store.load(keys::TEAM_RECORDS, default_team_records()).await,
            links: store.load(keys::LINKS, default_links()).await,
            rules: store.load(keys::RULES, default_rules()).await,
        };

        tracing::info!("Editor session opened for {}", user.username);

        Ok(Self {
            store,
            user,
            debounce,
            state: Arc::new(Mutex::new(SessionState {
                copies,
                autosave_enabled: true,
                pending: None,
                last_saved: None,
                last_issued_id: 0,
            })),
        })
    }

    pub fn user(&self) -> &SessionToken {
        &self.user
    }

    pub fn autosave_enabled(&self) -> bool {
        self.lock().autosave_enabled
    }

    pub fn last_saved(&self) -> Option<DateTime<Utc>> {
        self.lock().last_saved
    }

    // ---- working-copy reads -------------------------------------------------

    pub fn week(&self) -> u32 {
        self.lock().copies.week
    }

    pub fn schedule(&self) -> Vec<Game> {
        self.lock().copies.schedule.clone()
    }

    pub fn team_records(&self) -> TeamRecords {
        self.lock().copies.team_records.clone()
    }

    pub fn links(&self) -> LinkCollections {
        self.lock().copies.links.clone()
    }

    pub fn rules(&self) -> Vec<RuleSection> {
        self.lock().copies.rules.clone()
    }

    // ---- week ---------------------------------------------------------------

    /// Set the current week, clamped to >= 1.
    pub fn set_week(&self, week: u32) {
        {
            let mut state = self.lock();
            state.copies.week = week.max(1);
        }
        self.arm_debounce();
    }

    // ---- schedule -----------------------------------------------------------

    /// Append a new game with default matchup and status; returns its id.
    pub fn add_game(&self) -> i64 {
        let id = {
            let mut state = self.lock();
            let id = next_id(&mut state);
            state.copies.schedule.push(Game::new(id));
            id
        };
        self.arm_debounce();
        id
    }

    /// Patch the named game in place. Unknown ids are ignored.
    pub fn update_game(&self, id: i64, patch: GamePatch) {
        {
            let mut state = self.lock();
            if let Some(game) = state.copies.schedule.iter_mut().find(|g| g.id == id) {
                game.apply(patch);
            }
        }
        self.arm_debounce();
    }

    /// Remove exactly the named game; the rest keep their order.
    pub fn remove_game(&self, id: i64) {
        {
            let mut state = self.lock();
            state.copies.schedule.retain(|g| g.id != id);
        }
        self.arm_debounce();
    }

    // ---- team records -------------------------------------------------------

    /// Overwrite one team's record string. The roster is closed; unknown
    /// team ids are rejected rather than silently added.
    pub fn update_team_record(&self, team_id: &str, record: &str) -> Result<(), AppError> {
        if team_by_id(team_id).is_none() {
            return Err(AppError::Validation(format!(
                "Unknown team id: {}",
                team_id
            )));
        }
        {
            let mut state = self.lock();
            state
                .copies
                .team_records
                .insert(team_id.to_string(), record.to_string());
        }
        self.arm_debounce();
        Ok(())
    }

    // ---- links --------------------------------------------------------------

    /// Append a new link to a category with that category's defaults.
    pub fn add_link(&self, category: LinkCategory) -> i64 {
        let id = {
            let mut state = self.lock();
            let id = next_id(&mut state);
            state
                .copies
                .links
                .category_mut(category)
                .push(Link::new(id, category));
            id
        };
        self.arm_debounce();
        id
    }

    /// Patch a link within its category. Unknown ids are ignored.
    pub fn update_link(&self, category: LinkCategory, id: i64, patch: LinkPatch) {
        {
            let mut state = self.lock();
            if let Some(link) = state
                .copies
                .links
                .category_mut(category)
                .iter_mut()
                .find(|l| l.id == id)
            {
                link.apply(patch);
            }
        }
        self.arm_debounce();
    }

    pub fn remove_link(&self, category: LinkCategory, id: i64) {
        {
            let mut state = self.lock();
            state
                .copies
                .links
                .category_mut(category)
                .retain(|l| l.id != id);
        }
        self.arm_debounce();
    }

    // ---- rules --------------------------------------------------------------

    pub fn add_rule_section(&self) -> i64 {
        let id = {
            let mut state = self.lock();
            let id = next_id(&mut state);
            state.copies.rules.push(RuleSection::new(id));
            id
        };
        self.arm_debounce();
        id
    }

    pub fn rename_rule_section(&self, id: i64, title: &str) {
        {
            let mut state = self.lock();
            if let Some(section) = state.copies.rules.iter_mut().find(|r| r.id == id) {
                section.title = title.to_string();
            }
        }
        self.arm_debounce();
    }

    pub fn remove_rule_section(&self, id: i64) {
        {
            let mut state = self.lock();
            state.copies.rules.retain(|r| r.id != id);
        }
        self.arm_debounce();
    }

    /// Append a placeholder item to a section. Items are addressed by index.
    pub fn add_rule_item(&self, section_id: i64) {
        {
            let mut state = self.lock();
            if let Some(section) = state.copies.rules.iter_mut().find(|r| r.id == section_id) {
                section.items.push("New rule".to_string());
            }
        }
        self.arm_debounce();
    }

    pub fn update_rule_item(&self, section_id: i64, index: usize, text: &str) {
        {
            let mut state = self.lock();
            if let Some(item) = state
                .copies
                .rules
                .iter_mut()
                .find(|r| r.id == section_id)
                .and_then(|r| r.items.get_mut(index))
            {
                *item = text.to_string();
            }
        }
        self.arm_debounce();
    }

    pub fn remove_rule_item(&self, section_id: i64, index: usize) {
        {
            let mut state = self.lock();
            if let Some(section) = state.copies.rules.iter_mut().find(|r| r.id == section_id) {
                if index < section.items.len() {
                    section.items.remove(index);
                }
            }
        }
        self.arm_debounce();
    }

    // ---- wholesale replacement (used by restore flows) ----------------------

    pub fn replace_schedule(&self, schedule: Vec<Game>) {
        {
            let mut state = self.lock();
            state.copies.schedule = schedule;
        }
        self.arm_debounce();
    }

    pub fn replace_team_records(&self, records: TeamRecords) {
        {
            let mut state = self.lock();
            state.copies.team_records = records;
        }
        self.arm_debounce();
    }

    pub fn replace_links(&self, links: LinkCollections) {
        {
            let mut state = self.lock();
            state.copies.links = links;
        }
        self.arm_debounce();
    }

    pub fn replace_rules(&self, rules: Vec<RuleSection>) {
        {
            let mut state = self.lock();
            state.copies.rules = rules;
        }
        self.arm_debounce();
    }

    // ---- commit -------------------------------------------------------------

    /// Commit working copies to the store. Idempotent: committing unchanged
    /// content rewrites the same values and re-broadcasts, which consumers
    /// absorb as a redundant (cheap) reload.
    pub async fn save(&self, scope: SaveScope) {
        let copies = self.lock().copies.clone();
        write_scope(&self.store, scope, &copies).await;
        self.lock().last_saved = Some(Utc::now());
    }

    /// Enable or disable auto-save. Disabling cancels any armed debounce
    /// timer; enabling arms one, so a quiet panel still flushes shortly
    /// after the toggle.
    pub fn set_autosave(&self, enabled: bool) {
        {
            let mut state = self.lock();
            state.autosave_enabled = enabled;
            if !enabled {
                if let Some(pending) = state.pending.take() {
                    pending.abort();
                }
            }
        }
        if enabled {
            self.arm_debounce();
        }
    }

    /// Close the session, cancelling any pending auto-save. A closed
    /// session never writes.
    pub fn close(self) {
        // Drop does the cancellation.
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        // The lock is only ever held for short, non-awaiting sections, so
        // poisoning means a panic mid-mutation; propagate it.
        self.state.lock().expect("editor session lock poisoned")
    }

    /// (Re)arm the single auto-save debounce task: every mutation to any
    /// dataset lands here, so bursts of edits coalesce into one commit that
    /// fires after the configured quiet period.
    fn arm_debounce(&self) {
        let mut state = self.lock();
        if !state.autosave_enabled {
            return;
        }

        if let Some(pending) = state.pending.take() {
            pending.abort();
        }

        let shared = Arc::clone(&self.state);
        let store = self.store.clone();
        // Anchor the quiet period at the mutation itself, not at the first
        // poll of the spawned task, so the deadline is exact under paused
        // test time as well.
        let deadline = tokio::time::Instant::now() + self.debounce;
        state.pending = Some(tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;

            let copies = {
                let mut state = shared.lock().expect("editor session lock poisoned");
                state.pending = None;
                state.copies.clone()
            };
            write_scope(&store, SaveScope::All, &copies).await;

            let mut state = shared.lock().expect("editor session lock poisoned");
            state.last_saved = Some(Utc::now());
            tracing::debug!("Auto-saved panel datasets");
        }));
    }
}

impl Drop for EditorSession {
    fn drop(&mut self) {
        // A fired timer after the session is gone must never write.
        if let Ok(mut state) = self.state.lock() {
            if let Some(pending) = state.pending.take() {
                pending.abort();
            }
        }
    }
}

/// Issue the next entry identifier: current timestamp in milliseconds, with
/// a monotonic bump so entries created within the same tick stay distinct.
fn next_id(state: &mut SessionState) -> i64 {
    let id = Utc::now().timestamp_millis().max(state.last_issued_id + 1);
    state.last_issued_id = id;
    id
}

async fn write_scope(store: &StoreAccessor, scope: SaveScope, copies: &WorkingCopies) {
    match scope {
        SaveScope::Week => store.save(keys::WEEK, &copies.week).await,
        SaveScope::Schedule => store.save(keys::SCHEDULE, &copies.schedule).await,
        SaveScope::Records => store.save(keys::TEAM_RECORDS, &copies.team_records).await,
        SaveScope::Links => store.save(keys::LINKS, &copies.links).await,
        SaveScope::Rules => store.save(keys::RULES, &copies.rules).await,
        SaveScope::All => {
            store.save(keys::WEEK, &copies.week).await;
            store.save(keys::SCHEDULE, &copies.schedule).await;
            store.save(keys::TEAM_RECORDS, &copies.team_records).await;
            store.save(keys::LINKS, &copies.links).await;
            store.save(keys::RULES, &copies.rules).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth;
    use crate::models::GameStatus;

    const DEBOUNCE: Duration = Duration::from_secs(3);

    async fn logged_in_session() -> (StoreAccessor, EditorSession) {
        let store = StoreAccessor::in_memory();
        auth::login(&store, "lackstress", "1234567").await.unwrap();
        let session = EditorSession::open(store.clone(), DEBOUNCE).await.unwrap();
        (store, session)
    }

    #[tokio::test]
    async fn test_open_without_token_fails_closed() {
        let store = StoreAccessor::in_memory();
        let result = EditorSession::open(store, DEBOUNCE).await;
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_open_with_garbage_token_fails_closed() {
        let store = StoreAccessor::in_memory();
        store.save(keys::SESSION, &vec![1, 2, 3]).await;
        let result = EditorSession::open(store, DEBOUNCE).await;
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_mutations_stay_invisible_until_commit() {
        let (store, session) = logged_in_session().await;
        session.set_week(14);

        // Nothing written yet: a fresh read still sees the default.
        assert_eq!(store.load(keys::WEEK, 11u32).await, 11);

        session.save(SaveScope::Week).await;
        assert_eq!(store.load(keys::WEEK, 0u32).await, 14);
    }

    #[tokio::test]
    async fn test_week_clamped_to_one() {
        let (_store, session) = logged_in_session().await;
        session.set_week(0);
        assert_eq!(session.week(), 1);
    }

    #[tokio::test]
    async fn test_add_games_distinct_ids_and_defaults() {
        let (_store, session) = logged_in_session().await;
        let first = session.add_game();
        let second = session.add_game();
        assert_ne!(first, second);

        let schedule = session.schedule();
        let added: Vec<&Game> = schedule.iter().filter(|g| g.id >= first).collect();
        assert_eq!(added.len(), 2);
        for game in added {
            assert_eq!(game.status, GameStatus::Scheduled);
            assert_eq!(game.home_score, 0);
            assert_eq!(game.away_score, 0);
        }
    }

    #[tokio::test]
    async fn test_remove_game_keeps_order() {
        let (_store, session) = logged_in_session().await;
        let before = session.schedule();
        let victim = before[4].id;

        session.remove_game(victim);

        let after = session.schedule();
        assert_eq!(after.len(), before.len() - 1);
        let expected: Vec<i64> = before
            .iter()
            .map(|g| g.id)
            .filter(|id| *id != victim)
            .collect();
        let actual: Vec<i64> = after.iter().map(|g| g.id).collect();
        assert_eq!(actual, expected);
    }

    #[tokio::test]
    async fn test_update_team_record_touches_one_entry() {
        let (_store, session) = logged_in_session().await;
        let before = session.team_records();

        session.update_team_record("eagles", "9-4").unwrap();

        let after = session.team_records();
        assert_eq!(after["eagles"], "9-4");
        for (team, record) in &before {
            if team != "eagles" {
                assert_eq!(&after[team], record);
            }
        }
    }

    #[tokio::test]
    async fn test_update_team_record_rejects_unknown_team() {
        let (_store, session) = logged_in_session().await;
        let result = session.update_team_record("expansion-team", "1-0");
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_link_lifecycle() {
        let (_store, session) = logged_in_session().await;
        let id = session.add_link(LinkCategory::StatLinks);

        session.update_link(
            LinkCategory::StatLinks,
            id,
            LinkPatch {
                name: Some("Season 5 Stats".to_string()),
                current: Some(true),
                ..Default::default()
            },
        );

        let links = session.links();
        let link = links.stat_links.iter().find(|l| l.id == id).unwrap();
        assert_eq!(link.name, "Season 5 Stats");
        assert_eq!(link.current, Some(true));

        session.remove_link(LinkCategory::StatLinks, id);
        assert!(!session.links().stat_links.iter().any(|l| l.id == id));
    }

    #[tokio::test]
    async fn test_rule_item_ops_by_index() {
        let (_store, session) = logged_in_session().await;
        let section = session.add_rule_section();
        session.rename_rule_section(section, "Overtime");
        session.add_rule_item(section);
        session.add_rule_item(section);
        session.update_rule_item(section, 1, "Sudden death after one period");
        session.remove_rule_item(section, 0);

        let rules = session.rules();
        let overtime = rules.iter().find(|r| r.id == section).unwrap();
        assert_eq!(overtime.title, "Overtime");
        assert_eq!(overtime.items, vec!["Sudden death after one period"]);
    }

    #[tokio::test]
    async fn test_idempotent_save_all() {
        let (store, session) = logged_in_session().await;
        session.set_week(12);
        session.save(SaveScope::All).await;
        let week: u32 = store.load(keys::WEEK, 0).await;
        let schedule: Vec<Game> = store.load(keys::SCHEDULE, Vec::new()).await;

        session.save(SaveScope::All).await;
        assert_eq!(store.load(keys::WEEK, 0u32).await, week);
        assert_eq!(store.load(keys::SCHEDULE, Vec::<Game>::new()).await, schedule);
    }

    #[tokio::test(start_paused = true)]
    async fn test_debounce_coalesces_mutation_burst() {
        let (store, session) = logged_in_session().await;
        let mut events = store.subscribe();

        // Mutations at t=0s, t=1s, t=2s; each re-arms the 3s debounce.
        session.set_week(12);
        tokio::time::advance(Duration::from_secs(1)).await;
        session.set_week(13);
        tokio::time::advance(Duration::from_secs(1)).await;
        session.set_week(14);

        // At t=4s (2s after the last mutation) nothing has fired yet.
        tokio::time::advance(Duration::from_secs(2)).await;
        tokio::task::yield_now().await;
        assert_eq!(store.load(keys::WEEK, 0u32).await, 0);

        // At t=5s the single coalesced commit lands.
        tokio::time::advance(Duration::from_secs(2)).await;
        for _ in 0..50 {
            tokio::task::yield_now().await;
        }
        assert_eq!(store.load(keys::WEEK, 0u32).await, 14);

        // Exactly one save(All): five change events, one per key.
        let mut seen = 0;
        while let Ok(event) = events.try_recv() {
            assert!(keys::CONTENT.contains(&event.key.as_str()));
            seen += 1;
        }
        assert_eq!(seen, 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_disabling_autosave_cancels_pending_timer() {
        let (store, session) = logged_in_session().await;

        session.set_week(20);
        tokio::time::advance(Duration::from_secs(1)).await;
        session.set_autosave(false);

        tokio::time::advance(Duration::from_secs(10)).await;
        for _ in 0..50 {
            tokio::task::yield_now().await;
        }
        assert_eq!(store.load(keys::WEEK, 0u32).await, 0);
        assert!(session.last_saved().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_closed_session_never_writes() {
        let (store, session) = logged_in_session().await;

        session.set_week(21);
        tokio::time::advance(Duration::from_secs(1)).await;
        session.close();

        tokio::time::advance(Duration::from_secs(10)).await;
        for _ in 0..50 {
            tokio::task::yield_now().await;
        }
        assert_eq!(store.load(keys::WEEK, 0u32).await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reenabling_autosave_arms_a_flush() {
        let (store, session) = logged_in_session().await;
        session.set_autosave(false);
        session.set_week(30);

        session.set_autosave(true);
        tokio::time::advance(Duration::from_secs(4)).await;
        for _ in 0..50 {
            tokio::task::yield_now().await;
        }
        assert_eq!(store.load(keys::WEEK, 0u32).await, 30);
    }
}
