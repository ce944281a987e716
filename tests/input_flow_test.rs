//! Key events flowing through the tracker into the engine

use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tetrion::core::Tetrion;
use tetrion::input::{map_key, KeyTracker};
use tetrion::types::{Control, Intent};

fn feed(t: &mut Tetrion, tracker: &mut KeyTracker, key: KeyEvent, at: Instant) {
    if let Some(intent) = map_key(key, 0).and_then(|i| tracker.filter(i, at)) {
        t.apply(intent);
    }
}

#[test]
fn test_tap_shifts_once_and_releases() {
    let mut t = Tetrion::with_seed(1);
    t.apply(Intent::Start(0));
    t.tick();
    let (x0, _) = t.falling_position().unwrap();

    let mut tracker = KeyTracker::new();
    let t0 = Instant::now();
    feed(&mut t, &mut tracker, KeyEvent::from(KeyCode::Left), t0);
    assert_eq!(t.falling_position().unwrap().0, x0 - 1);
    assert!(t.is_held(Control::ShiftLeft));

    // Terminal auto-repeat shows up as more presses; none reach the engine.
    feed(&mut t, &mut tracker, KeyEvent::from(KeyCode::Left), t0 + Duration::from_millis(30));
    assert_eq!(t.falling_position().unwrap().0, x0 - 1);

    for intent in tracker.expire(t0 + Duration::from_millis(500)) {
        t.apply(intent);
    }
    assert!(!t.is_held(Control::ShiftLeft));
}

#[test]
fn test_real_release_event() {
    let mut t = Tetrion::with_seed(1);
    t.apply(Intent::Start(0));
    t.tick();

    let mut tracker = KeyTracker::with_timeout(Duration::MAX);
    let now = Instant::now();
    feed(&mut t, &mut tracker, KeyEvent::from(KeyCode::Down), now);
    assert!(t.is_held(Control::SoftDrop));

    let up = KeyEvent::new_with_kind(KeyCode::Down, KeyModifiers::NONE, KeyEventKind::Release);
    feed(&mut t, &mut tracker, up, now);
    assert!(!t.is_held(Control::SoftDrop));
}

#[test]
fn test_restart_key_uses_level() {
    let mut t = Tetrion::with_seed(1);
    let mut tracker = KeyTracker::new();
    let intent = map_key(KeyEvent::from(KeyCode::Char('r')), 4)
        .and_then(|i| tracker.filter(i, Instant::now()));
    assert_eq!(intent, Some(Intent::Start(4)));

    t.apply(intent.unwrap());
    assert_eq!(t.level(), 4);
    assert!(t.started());
}
