use super::*;
use crate::catalog::{Mixtape, Track};

fn t(id: &str) -> Track {
    Track {
        id: id.into(),
        title: id.to_uppercase(),
        artist: None,
        duration_hint: None,
        source: format!("/music/{id}.mp3"),
        display: id.to_uppercase(),
    }
}

fn tape(id: &str, track_ids: &[&str]) -> Mixtape {
    Mixtape {
        id: id.into(),
        title: format!("Awesome Mix Vol. {id}"),
        color: "#e07a5f".into(),
        tracks: track_ids.iter().map(|i| t(i)).collect(),
    }
}

fn current_id(store: &PlayerStore) -> Option<&str> {
    store.current_track().map(|t| t.id.as_str())
}

#[test]
fn new_store_starts_empty() {
    let store = PlayerStore::new();
    let s = store.state();
    assert!(!s.is_playing);
    assert!(s.current_mixtape.is_none());
    assert!(s.current_track.is_none());
    assert_eq!(s.volume, DEFAULT_VOLUME);
    assert_eq!(s.current_time, 0.0);
    assert_eq!(s.duration, 0.0);
    assert!(s.pending_seek.is_none());
    assert!(!store.has_changes());
}

#[test]
fn load_mixtape_cues_first_track_paused() {
    let mut store = PlayerStore::new();
    store.play();
    store.set_progress(42.0, 180.0);

    store.load_mixtape(tape("1", &["a", "b", "c"]));

    assert_eq!(current_id(&store), Some("a"));
    assert!(!store.is_playing());
    assert_eq!(store.current_time(), 0.0);
    assert_eq!(store.duration(), 0.0);
    assert_eq!(store.current_mixtape().map(|m| m.id.as_str()), Some("1"));
}

#[test]
fn load_empty_mixtape_leaves_no_track_and_track_ops_are_noops() {
    let mut store = PlayerStore::new();
    store.load_mixtape(tape("1", &["a"]));
    store.load_mixtape(tape("empty", &[]));

    assert!(store.current_track().is_none());
    assert!(store.current_mixtape().is_some());

    store.next_track();
    store.prev_track();
    assert!(store.current_track().is_none());

    store.toggle_play();
    assert!(store.is_playing());
}

#[test]
fn next_track_walks_and_wraps() {
    let mut store = PlayerStore::new();
    store.load_mixtape(tape("1", &["a", "b", "c"]));
    assert_eq!(current_id(&store), Some("a"));

    store.next_track();
    store.next_track();
    assert_eq!(current_id(&store), Some("c"));

    store.next_track();
    assert_eq!(current_id(&store), Some("a"));
}

#[test]
fn prev_track_wraps_to_last() {
    let mut store = PlayerStore::new();
    store.load_mixtape(tape("1", &["a", "b", "c"]));

    store.prev_track();
    assert_eq!(current_id(&store), Some("c"));
    store.prev_track();
    assert_eq!(current_id(&store), Some("b"));
}

#[test]
fn full_cycle_returns_to_start_in_both_directions() {
    for len in 1..=5 {
        let ids: Vec<String> = (0..len).map(|i| format!("t{i}")).collect();
        let refs: Vec<&str> = ids.iter().map(String::as_str).collect();

        let mut store = PlayerStore::new();
        store.load_mixtape(tape("m", &refs));
        store.next_track();
        let start = current_id(&store).map(str::to_string);

        for _ in 0..len {
            store.next_track();
        }
        assert_eq!(current_id(&store).map(str::to_string), start);

        for _ in 0..len {
            store.prev_track();
        }
        assert_eq!(current_id(&store).map(str::to_string), start);
    }
}

#[test]
fn next_track_keeps_play_intent_and_resets_progress() {
    let mut store = PlayerStore::new();
    store.load_mixtape(tape("1", &["a", "b"]));
    store.play();
    store.set_progress(30.0, 200.0);

    store.next_track();
    assert!(store.is_playing());
    assert_eq!(store.current_time(), 0.0);
    assert_eq!(store.duration(), 0.0);

    store.pause();
    store.prev_track();
    assert!(!store.is_playing());
}

#[test]
fn next_and_prev_without_mixtape_are_noops() {
    let mut store = PlayerStore::new();
    store.play_track(t("x"));
    store.set_progress(12.0, 100.0);

    store.next_track();
    store.prev_track();
    assert_eq!(current_id(&store), Some("x"));
    assert_eq!(store.current_time(), 12.0);
}

#[test]
fn stepping_from_a_foreign_track_starts_from_the_front() {
    let mut store = PlayerStore::new();
    store.load_mixtape(tape("1", &["a", "b", "c"]));
    store.play_track(t("stranger"));
    store.next_track();
    assert_eq!(current_id(&store), Some("a"));

    store.play_track(t("stranger"));
    store.prev_track();
    assert_eq!(current_id(&store), Some("b"));
}

#[test]
fn toggle_play_twice_is_identity() {
    let mut store = PlayerStore::new();
    for start in [false, true] {
        if start {
            store.play();
        } else {
            store.pause();
        }
        store.toggle_play();
        assert_eq!(store.is_playing(), !start);
        store.toggle_play();
        assert_eq!(store.is_playing(), start);
    }
}

#[test]
fn play_track_does_not_touch_current_mixtape() {
    let mut store = PlayerStore::new();
    let first = tape("1", &["a"]);
    let second = tape("2", &["b"]);
    store.load_mixtape(first);

    store.play_track(second.tracks[0].clone());

    assert_eq!(store.current_mixtape().map(|m| m.id.as_str()), Some("1"));
    assert_eq!(current_id(&store), Some("b"));
    assert!(store.is_playing());
}

#[test]
fn seek_to_only_records_a_request() {
    let mut store = PlayerStore::new();
    store.set_progress(10.0, 100.0);

    store.seek_to(55.0);
    assert_eq!(store.pending_seek(), Some(55.0));
    assert_eq!(store.current_time(), 10.0);

    store.clear_seek_request();
    assert_eq!(store.pending_seek(), None);
}

#[test]
fn set_volume_stores_value_unclamped() {
    let mut store = PlayerStore::new();
    store.set_volume(1.7);
    assert_eq!(store.volume(), 1.7);
    store.set_volume(-0.2);
    assert_eq!(store.volume(), -0.2);
}

#[test]
fn progress_ratio_handles_unknown_duration() {
    let mut store = PlayerStore::new();
    assert_eq!(store.progress_ratio(), 0.0);
    store.set_progress(30.0, 120.0);
    assert!((store.progress_ratio() - 0.25).abs() < 1e-9);
    store.set_progress(130.0, 120.0);
    assert_eq!(store.progress_ratio(), 1.0);
}

#[test]
fn changes_record_only_real_transitions_and_coalesce() {
    let mut store = PlayerStore::new();
    store.pause();
    store.set_volume(DEFAULT_VOLUME);
    assert_eq!(store.take_changes(), Changes::default());

    store.load_mixtape(tape("1", &["a", "b"]));
    store.next_track();
    store.play();
    store.pause();
    store.play();
    let changes = store.take_changes();
    assert!(changes.track);
    assert!(changes.playing);
    assert!(!changes.volume);
    assert!(!changes.seek);

    assert!(!store.has_changes());
    store.set_progress(1.0, 2.0);
    assert!(!store.has_changes());

    store.seek_to(3.0);
    store.set_volume(0.9);
    let changes = store.take_changes();
    assert!(changes.seek && changes.volume);
    assert!(!changes.track && !changes.playing);
}

#[test]
fn with_volume_sets_initial_volume() {
    let store = PlayerStore::with_volume(0.8);
    assert_eq!(store.volume(), 0.8);
    assert!(!store.has_changes());
}
