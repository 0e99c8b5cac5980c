//! Integration tests for the RCL panel core.
//!
//! Unit tests live next to their modules; these cover the flows that cross
//! module boundaries: durable storage across reopen, editor-to-view
//! propagation, the gated panel lifecycle, and backup restore end to end.

use std::time::Duration;

use once_cell::sync::Lazy;
use tempfile::TempDir;

use crate::backup;
use crate::config::Config;
use crate::editor::{EditorSession, SaveScope};
use crate::models::{GamePatch, GameStatus};
use crate::store::{init_store, keys, StoreAccessor, StoreBackend};
use crate::view::ViewSubscriber;
use crate::{auth, bootstrap, engagement, seed_defaults};

static TRACING: Lazy<()> = Lazy::new(|| {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("warn")
        .with_test_writer()
        .try_init();
});

const DEBOUNCE: Duration = Duration::from_secs(3);
const SLOW_POLL: Duration = Duration::from_secs(3600);

/// Test fixture around a store, optionally sqlite-backed in a temp dir.
struct TestFixture {
    store: StoreAccessor,
    _temp_dir: Option<TempDir>,
}

impl TestFixture {
    fn memory() -> Self {
        Lazy::force(&TRACING);
        Self {
            store: StoreAccessor::in_memory(),
            _temp_dir: None,
        }
    }

    async fn sqlite() -> Self {
        Lazy::force(&TRACING);
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config = Config {
            db_path: temp_dir.path().join("panel.sqlite"),
            ..Config::default()
        };
        let store = bootstrap(&config).await.expect("Failed to bootstrap");
        Self {
            store,
            _temp_dir: Some(temp_dir),
        }
    }

    async fn logged_in_editor(&self) -> EditorSession {
        auth::login(&self.store, "lackstress", "1234567")
            .await
            .expect("login failed");
        EditorSession::open(self.store.clone(), DEBOUNCE)
            .await
            .expect("session open failed")
    }
}

#[tokio::test]
async fn test_sqlite_store_survives_reopen() {
    let fixture = TestFixture::sqlite().await;
    let db_path = fixture
        ._temp_dir
        .as_ref()
        .unwrap()
        .path()
        .join("panel.sqlite");

    fixture.store.save(keys::WEEK, &15u32).await;
    drop(fixture.store);

    // "Reload the page": a brand new backend over the same file.
    let backend = init_store(&db_path).await.unwrap();
    let reopened = StoreAccessor::new(backend);
    assert_eq!(reopened.load(keys::WEEK, 0u32).await, 15);
}

#[tokio::test]
async fn test_bootstrap_seeds_only_absent_keys() {
    let fixture = TestFixture::sqlite().await;

    // Seeded on first open.
    assert_eq!(fixture.store.load(keys::WEEK, 0u32).await, 11);
    let schedule: Vec<crate::models::Game> = fixture.store.load(keys::SCHEDULE, Vec::new()).await;
    assert_eq!(schedule.len(), 10);

    // An edit survives a re-seed.
    fixture.store.save(keys::WEEK, &14u32).await;
    seed_defaults(&fixture.store).await;
    assert_eq!(fixture.store.load(keys::WEEK, 0u32).await, 14);
}

#[tokio::test]
async fn test_save_fans_out_to_all_mounted_views() {
    let fixture = TestFixture::memory();
    let editor = fixture.logged_in_editor().await;

    // Poll interval is an hour: only the broadcast can refresh these.
    let schedule_board = ViewSubscriber::mount(fixture.store.clone(), SLOW_POLL).await;
    let standings_board = ViewSubscriber::mount(fixture.store.clone(), SLOW_POLL).await;

    editor.set_autosave(false);
    editor.set_week(12);
    editor.update_team_record("eagles", "9-4").unwrap();
    editor.save(SaveScope::All).await;

    for _ in 0..100 {
        tokio::task::yield_now().await;
        if schedule_board.snapshot().await.week == 12
            && standings_board.snapshot().await.week == 12
        {
            break;
        }
    }

    assert_eq!(schedule_board.snapshot().await.week, 12);
    assert_eq!(standings_board.snapshot().await.record_for("eagles"), "9-4");
    schedule_board.unmount();
    standings_board.unmount();
}

#[tokio::test(start_paused = true)]
async fn test_separate_accessor_families_converge_by_polling() {
    // Two accessor families over one backend model two tabs: no shared
    // notification hub, so only the poll can carry the update across.
    let backend = StoreBackend::memory();
    let panel_tab = StoreAccessor::new(backend.clone());
    let public_tab = StoreAccessor::new(backend);

    let view = ViewSubscriber::mount(public_tab, Duration::from_secs(2)).await;
    panel_tab.save(keys::WEEK, &16u32).await;

    tokio::time::advance(Duration::from_secs(3)).await;
    for _ in 0..100 {
        tokio::task::yield_now().await;
        if view.snapshot().await.week == 16 {
            break;
        }
    }
    assert_eq!(view.snapshot().await.week, 16);
    view.unmount();
}

#[tokio::test]
async fn test_panel_lifecycle_login_edit_logout() {
    let fixture = TestFixture::memory();
    let editor = fixture.logged_in_editor().await;
    assert_eq!(editor.user().username, "lackstress");
    assert!(editor.user().is_owner());

    editor.set_autosave(false);
    let game_id = editor.add_game();
    editor.update_game(
        game_id,
        GamePatch {
            status: Some(GameStatus::Live),
            home_score: Some(21),
            away_score: Some(14),
            ..Default::default()
        },
    );
    editor.save(SaveScope::Schedule).await;

    let view = ViewSubscriber::mount(fixture.store.clone(), SLOW_POLL).await;
    let snap = view.snapshot().await;
    let game = snap.schedule.iter().find(|g| g.id == game_id).unwrap();
    assert!(game.is_live());
    assert_eq!((game.home_score, game.away_score), (21, 14));
    view.unmount();
    editor.close();

    auth::logout(&fixture.store).await;
    let reopened = EditorSession::open(fixture.store.clone(), DEBOUNCE).await;
    let err = reopened.err().expect("open must fail after logout");
    let details = crate::errors::ErrorDetails::from(&err);
    assert_eq!(details.code, "UNAUTHORIZED");
}

#[tokio::test(start_paused = true)]
async fn test_autosave_end_to_end() {
    let fixture = TestFixture::memory();
    let editor = fixture.logged_in_editor().await;
    let view = ViewSubscriber::mount(fixture.store.clone(), SLOW_POLL).await;

    editor.set_week(18);
    assert_eq!(view.snapshot().await.week, 11);

    tokio::time::advance(Duration::from_secs(4)).await;
    for _ in 0..100 {
        tokio::task::yield_now().await;
        if view.snapshot().await.week == 18 {
            break;
        }
    }
    assert_eq!(view.snapshot().await.week, 18);
    assert!(editor.last_saved().is_some());
    view.unmount();
}

#[tokio::test]
async fn test_import_restores_and_views_see_it() {
    let source = TestFixture::memory();
    source.store.save(keys::WEEK, &17u32).await;
    seed_defaults(&source.store).await;
    let json = backup::export_json(&source.store).await.unwrap();

    let target = TestFixture::memory();
    let view = ViewSubscriber::mount(target.store.clone(), SLOW_POLL).await;
    backup::import_json(&target.store, &json).await.unwrap();

    for _ in 0..100 {
        tokio::task::yield_now().await;
        if view.snapshot().await.week == 17 {
            break;
        }
    }
    assert_eq!(view.snapshot().await.week, 17);
    view.unmount();
}

#[tokio::test]
async fn test_bad_import_leaves_sqlite_store_untouched() {
    let fixture = TestFixture::sqlite().await;
    let before = backup::data_stats(&fixture.store).await;

    let result = backup::import_json(&fixture.store, r#"{"schedule":[]}"#).await;
    assert!(result.is_err());

    assert_eq!(backup::data_stats(&fixture.store).await, before);
    assert_eq!(fixture.store.load(keys::WEEK, 0u32).await, 11);
}

#[tokio::test]
async fn test_likes_persist_in_sqlite() {
    let fixture = TestFixture::sqlite().await;
    let db_path = fixture
        ._temp_dir
        .as_ref()
        .unwrap()
        .path()
        .join("panel.sqlite");

    assert!(engagement::register_like(&fixture.store).await);
    drop(fixture.store);

    let backend = init_store(&db_path).await.unwrap();
    let reopened = StoreAccessor::new(backend);
    assert_eq!(engagement::like_count(&reopened).await, 1);
    assert!(engagement::has_liked(&reopened).await);
}

#[tokio::test]
async fn test_clear_all_resets_views_to_defaults() {
    let fixture = TestFixture::memory();
    let editor = fixture.logged_in_editor().await;
    editor.set_autosave(false);
    editor.set_week(19);
    editor.save(SaveScope::All).await;

    backup::clear_all(&fixture.store).await;

    let view = ViewSubscriber::mount(fixture.store.clone(), SLOW_POLL).await;
    assert_eq!(view.snapshot().await.week, 11);
    view.unmount();
}
