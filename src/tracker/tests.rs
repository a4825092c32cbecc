use std::sync::Arc;

use serde_json::json;

use super::*;
use crate::{
    calculators::calculate_bmi,
    reminder::NewReminder,
    storage::InMemoryStore,
    test_utils::{at, reminder, slot, taken, today, yesterday_at},
};

async fn tracker_with(store: Arc<InMemoryStore>) -> Tracker {
    Tracker::load(store).await
}

async fn raw(store: &InMemoryStore, key: &str) -> serde_json::Value {
    let raw = store.get(key).await.unwrap().unwrap();
    serde_json::from_str(&raw).unwrap()
}

#[tokio::test]
async fn empty_store_loads_defaults() {
    let tracker = tracker_with(Arc::new(InMemoryStore::new())).await;

    assert!(tracker.reminders().is_empty());
    assert_eq!(tracker.water_progress(at(9, 0)).target_ml, 2000);
    assert_eq!(tracker.water_progress(at(9, 0)).consumed_ml, 0);
    assert!(tracker.last_bmi().is_none());
    assert_eq!(
        tracker.notification_permission().await,
        NotificationPermission::Default
    );
}

#[tokio::test]
async fn malformed_reminders_load_as_empty() {
    let store = Arc::new(InMemoryStore::new());
    store
        .set(keys::MEDICINE_REMINDERS, "{oops".to_string())
        .await
        .unwrap();

    let tracker = tracker_with(store).await;

    assert!(tracker.reminders().is_empty());
}

#[tokio::test]
async fn added_reminder_is_written_through() {
    let store = Arc::new(InMemoryStore::new());
    let mut tracker = tracker_with(store.clone()).await;

    let new = NewReminder::parse("Paracetamol", "500mg", "08:00, 20:00").unwrap();
    tracker.add_reminder(new).await.unwrap();

    assert_eq!(
        raw(&store, keys::MEDICINE_REMINDERS).await,
        json!([{
            "name": "Paracetamol",
            "dose": "500mg",
            "schedule": ["08:00", "20:00"],
            "takenDates": []
        }])
    );
}

#[tokio::test]
async fn reset_sweep_drops_old_entries_once_per_day() {
    let store = Arc::new(InMemoryStore::new());
    let mut stale = reminder("Vitamin", &["08:00", "20:00"]);
    stale.taken_dates = vec![
        taken(yesterday_at(8, 0).date(), "08:00"),
        taken(today(), "20:00"),
    ];
    write_value(&*store, keys::MEDICINE_REMINDERS, &vec![stale])
        .await
        .unwrap();
    write_value(&*store, keys::LAST_TAKEN_RESET, &yesterday_at(7, 0))
        .await
        .unwrap();
    let mut tracker = tracker_with(store.clone()).await;

    assert!(tracker.reset_taken_if_new_day(at(9, 0)).await.unwrap());
    assert_eq!(tracker.reminders()[0].taken_dates, vec![taken(today(), "20:00")]);
    assert_eq!(
        raw(&store, keys::MEDICINE_REMINDERS).await[0]["takenDates"],
        json!([{ "date": "2025-05-31", "time": "20:00" }])
    );
    assert_eq!(
        raw(&store, keys::LAST_TAKEN_RESET).await,
        json!("2025-05-31T09:00:00")
    );

    assert!(!tracker.reset_taken_if_new_day(at(10, 0)).await.unwrap());
}

#[tokio::test]
async fn reset_sweep_runs_without_previous_marker() {
    let store = Arc::new(InMemoryStore::new());
    let mut tracker = tracker_with(store.clone()).await;

    assert!(tracker.reset_taken_if_new_day(at(9, 0)).await.unwrap());
    assert!(store.get(keys::MEDICINE_REMINDERS).await.unwrap().is_none());
    assert!(store.get(keys::LAST_TAKEN_RESET).await.unwrap().is_some());
}

#[tokio::test]
async fn take_and_remove_reminders() {
    let store = Arc::new(InMemoryStore::new());
    let mut tracker = tracker_with(store.clone()).await;
    for name in ["A", "B"] {
        let new = NewReminder::parse(name, "1", "08:00 20:00").unwrap();
        tracker.add_reminder(new).await.unwrap();
    }

    let outcome = tracker.take_reminder(1, at(19, 0)).await.unwrap();
    assert_eq!(outcome, TakeOutcome::Taken(slot("20:00")));
    assert_eq!(
        tracker.take_reminder(7, at(19, 0)).await.unwrap(),
        TakeOutcome::NoSuchReminder
    );

    let removed = tracker.remove_reminder(0).await.unwrap();
    assert_eq!(removed.map(|r| r.name), Some("A".to_string()));
    let persisted = raw(&store, keys::MEDICINE_REMINDERS).await;
    assert_eq!(persisted.as_array().unwrap().len(), 1);
    assert_eq!(persisted[0]["name"], json!("B"));
    assert_eq!(persisted[0]["takenDates"][0]["time"], json!("20:00"));
}

#[tokio::test]
async fn water_counter_and_target_persist() {
    let store = Arc::new(InMemoryStore::new());
    let mut tracker = tracker_with(store.clone()).await;

    tracker.add_water(GLASS_ML, at(8, 0)).await.unwrap();
    tracker
        .set_water_target(WaterTarget::new(500).unwrap())
        .await
        .unwrap();
    let progress = tracker.add_water(GLASS_ML, at(9, 0)).await.unwrap();

    assert_eq!(progress.consumed_ml, 500);
    assert!(progress.met);
    assert_eq!(raw(&store, keys::WATER_TARGET).await, json!(500));

    let reloaded = tracker_with(store).await;
    assert_eq!(reloaded.water_progress(at(10, 0)).consumed_ml, 500);
    assert_eq!(reloaded.water_progress(at(10, 0)).target_ml, 500);
}

#[tokio::test]
async fn moods_contacts_and_favorites_round_trip_through_store() {
    let store = Arc::new(InMemoryStore::new());
    let mut tracker = tracker_with(store.clone()).await;

    tracker
        .record_mood(MoodEntry::new(Mood::Good, "", at(8, 0)))
        .await
        .unwrap();
    tracker
        .add_contact(EmergencyContact::new("Ambulans", "118").unwrap())
        .await
        .unwrap();
    assert!(tracker.toggle_favorite("3").await.unwrap());

    let reloaded = tracker_with(store.clone()).await;
    assert_eq!(reloaded.moods()[0].notes, "Tidak ada catatan");
    assert_eq!(reloaded.contacts()[0].number, "118");
    assert!(reloaded.favorites().contains("3"));
    assert_eq!(raw(&store, keys::FAVORITE_ARTICLES).await, json!(["3"]));
}

#[tokio::test]
async fn calculator_results_are_remembered() {
    let store = Arc::new(InMemoryStore::new());
    let mut tracker = tracker_with(store.clone()).await;

    tracker
        .save_bmi(calculate_bmi(170.0, 70.0).unwrap())
        .await
        .unwrap();

    let reloaded = tracker_with(store.clone()).await;
    assert_eq!(reloaded.last_bmi().map(|r| r.category.label()), Some("Normal"));
    assert_eq!(raw(&store, keys::LAST_BMI_RESULT).await["heightCm"], json!(170.0));
}

#[tokio::test]
async fn notification_permission_is_persisted() {
    let store = Arc::new(InMemoryStore::new());
    let tracker = tracker_with(store.clone()).await;

    tracker
        .set_notification_permission(NotificationPermission::Denied)
        .await
        .unwrap();

    assert_eq!(
        raw(&store, keys::NOTIFICATION_PERMISSION).await,
        json!("denied")
    );
    assert_eq!(
        tracker.notification_permission().await,
        NotificationPermission::Denied
    );
}

#[test]
fn positions_are_one_based() {
    assert_eq!(parse_position("1"), Ok(0));
    assert_eq!(parse_position(" 3 "), Ok(2));
    assert_eq!(
        parse_position("0"),
        Err(ToolInputError::InvalidPosition("0".to_string()))
    );
    assert_eq!(
        parse_position("two"),
        Err(ToolInputError::InvalidPosition("two".to_string()))
    );
}
