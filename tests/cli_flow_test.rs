use std::sync::Arc;

use rc_app::{LoadingIndicator, TrackerSession};
use rc_core::config::StorageBackend;
use rc_core::{Screen, TrackerConfig};
use rollcall_lib::bootstrap::start_session;
use rollcall_lib::cli::{execute, Command, StatusView};
use tempfile::TempDir;

struct NoIndicator;

impl LoadingIndicator for NoIndicator {
    fn show(&self) {}
    fn release(&self) {}
}

async fn open(dir: &TempDir) -> TrackerSession {
    let config = TrackerConfig::default();
    start_session(&config, &dir.path().join("store.json"), Arc::new(NoIndicator))
        .await
        .expect("start session")
}

#[tokio::test]
async fn counters_are_locked_until_intro_is_seen() {
    let dir = TempDir::new().unwrap();
    let session = open(&dir).await;

    let err = execute(&session, Command::Use { count: 1 })
        .await
        .unwrap_err();
    assert!(err.to_string().contains("intro"));

    execute(&session, Command::Intro).await.unwrap();
    assert_eq!(session.active_screen(), Screen::Home);
    execute(&session, Command::Use { count: 1 }).await.unwrap();
}

#[tokio::test]
async fn state_survives_between_invocations() {
    let dir = TempDir::new().unwrap();

    let first = open(&dir).await;
    execute(&first, Command::Intro).await.unwrap();
    execute(&first, Command::Rolls { count: 2 }).await.unwrap();
    execute(&first, Command::Persons { count: 3 }).await.unwrap();
    first.shutdown().await;

    let second = open(&dir).await;
    execute(&second, Command::Use { count: 5 }).await.unwrap();
    second.shutdown().await;

    let third = open(&dir).await;
    let view = StatusView::capture(&third).await;
    assert_eq!(view.screen, Screen::Home);
    // Using sheets from the second roll drops the full-roll count.
    assert_eq!(view.supply.rolls_count, 1);
    assert_eq!(view.supply.sheets_remaining, 315);
    assert_eq!(view.supply.persons_count, 3);
    // 1 roll * 160 / (3 visits * 3 persons * 7 sheets) = 2.54
    assert_eq!(view.days_remaining, 3);
}

#[tokio::test]
async fn memory_backend_starts_fresh() {
    let config = TrackerConfig {
        storage: StorageBackend::Memory,
        ..TrackerConfig::default()
    };
    let session = start_session(&config, std::path::Path::new(""), Arc::new(NoIndicator))
        .await
        .unwrap();

    let view = StatusView::capture(&session).await;
    assert_eq!(view.screen, Screen::Intro);
    assert_eq!(view.supply.sheets_remaining, 640);
    assert_eq!(view.days_remaining, 15);
}
