// Integration tests (native) for the `nian-countdown` crate.
// The engine is driven through manual clock / ticker / frame doubles so the
// whole counting -> celebrating -> reset cycle runs under `cargo test`.

mod common;

use common::{Harness, NOW_MS, iso_after};
use nian_countdown::storage::KeyValueStore;
use nian_countdown::{Breakdown, Phase, Unit};

#[test]
fn counts_down_then_celebrates_once() {
    let mut h = Harness::new(NOW_MS, Some(&iso_after(NOW_MS, 3)), false);
    h.engine.start();
    assert_eq!(h.engine.phase(), Phase::Counting);
    assert_eq!(h.engine.remaining_seconds(), 3);
    {
        let log = h.display.0.borrow();
        assert_eq!(
            log.units,
            vec![
                (Unit::Days, "0".to_string()),
                (Unit::Hours, "00".to_string()),
                (Unit::Minutes, "00".to_string()),
                (Unit::Seconds, "03".to_string()),
            ]
        );
        assert_eq!(log.completed, vec![false]);
    }

    h.tick_after(1000);
    assert_eq!(h.engine.remaining_seconds(), 2);
    assert_eq!(
        h.display.0.borrow().units.last(),
        Some(&(Unit::Seconds, "02".to_string()))
    );
    assert_eq!(h.display.0.borrow().units.len(), 5);

    h.tick_after(2000);
    assert_eq!(h.engine.phase(), Phase::Finished);
    assert_eq!(h.engine.remaining_seconds(), 0);
    assert_eq!(h.last_completed(), Some(true));
    assert!(h.engine.is_celebrating());
    assert_eq!(h.frames.runs(), 1);

    // Staying at zero neither restarts the effect nor re-signals completion.
    h.tick_after(1000);
    h.tick_after(1000);
    assert_eq!(h.frames.runs(), 1);
    assert_eq!(h.display.0.borrow().completed, vec![false, true]);
}

#[test]
fn target_equal_to_now_is_finished_immediately() {
    let mut h = Harness::new(NOW_MS, Some(&iso_after(NOW_MS, 0)), false);
    assert_eq!(h.engine.phase(), Phase::Finished);
    h.engine.start();
    assert_eq!(h.engine.remaining_seconds(), 0);
    assert!(h.engine.is_celebrating());
}

#[test]
fn past_target_clamps_to_zero() {
    // No stored target: the compiled-in default is already in the past.
    let mut h = Harness::new(NOW_MS, None, false);
    h.engine.start();
    assert_eq!(h.engine.remaining_seconds(), 0);
    assert_eq!(h.engine.breakdown(), Breakdown::default());
}

#[test]
fn decomposes_one_of_each_unit() {
    let mut h = Harness::new(NOW_MS, Some(&iso_after(NOW_MS, 90_061)), false);
    h.engine.start();
    let b = h.engine.breakdown();
    assert_eq!((b.days, b.hours, b.minutes, b.seconds), (1, 1, 1, 1));
}

#[test]
fn future_target_while_finished_stops_celebration() {
    let mut h = Harness::new(NOW_MS, None, false);
    h.engine.start();
    assert_eq!(h.engine.phase(), Phase::Finished);
    assert_eq!(h.frames.active(), 1);
    h.frames.pump(16.0);
    assert!(h.surface.borrow().fills > 0);

    h.engine
        .save_settings(Some(&iso_after(NOW_MS, 3_600)), "Asia/Tokyo");
    assert_eq!(h.engine.phase(), Phase::Counting);
    assert!(!h.engine.is_celebrating());
    assert_eq!(h.frames.active(), 0);
    assert_eq!(h.last_completed(), Some(false));
    assert_eq!(h.engine.current_timezone(), "Asia/Tokyo");
    assert_eq!(h.ticker.live(), 1);
}

#[test]
fn reconfiguring_never_leaves_two_ticks_running() {
    let mut h = Harness::new(NOW_MS, Some(&iso_after(NOW_MS, 10)), false);
    h.engine.start();
    for offset in [20, 30, 40] {
        h.engine.set_target(&iso_after(NOW_MS, offset));
        assert_eq!(h.ticker.live(), 1);
    }
    h.engine.set_timezone("local");
    assert_eq!(h.ticker.live(), 1);
    // Only the live tick runs: one tick, one seconds update.
    let before = h.display.0.borrow().units.len();
    h.tick_after(1000);
    assert_eq!(h.display.0.borrow().units.len(), before + 1);
    assert_eq!(h.engine.remaining_seconds(), 39);
}

#[test]
fn unparseable_target_is_ignored_but_zone_is_saved() {
    let target = iso_after(NOW_MS, 120);
    let mut h = Harness::new(NOW_MS, Some(&target), false);
    h.engine.start();
    let before = h.engine.current_target();
    h.engine.save_settings(Some("not a date"), "Europe/Paris");
    assert_eq!(h.engine.current_target(), before);
    assert_eq!(h.store.get("cny_target").as_deref(), Some(target.as_str()));
    assert_eq!(h.store.get("cny_timezone").as_deref(), Some("Europe/Paris"));
    assert!(!h.engine.set_target("2030-02-30T00:00"));
}

#[test]
fn reset_clears_storage_and_reverts_to_defaults() {
    let mut h = Harness::new(NOW_MS, Some(&iso_after(NOW_MS, 60)), false);
    h.engine.start();
    h.engine.set_timezone("local");
    assert_eq!(h.store.len(), 2);

    h.engine.reset();
    assert!(h.store.is_empty());
    assert_eq!(h.engine.current_timezone(), "Asia/Shanghai");
    assert_eq!(
        h.engine.current_target().timestamp_millis(),
        1_739_116_800_000
    );
    // Default target is in the past, so reset lands in Finished.
    assert_eq!(h.engine.phase(), Phase::Finished);
    assert_eq!(h.last_completed(), Some(true));
}

#[test]
fn reset_restarts_celebration_from_scratch() {
    let mut h = Harness::new(NOW_MS, None, false);
    h.engine.start();
    assert_eq!(h.frames.runs(), 1);
    h.engine.reset();
    assert_eq!(h.frames.runs(), 2);
    assert_eq!(h.frames.active(), 1);
}

#[test]
fn stopped_celebration_leaves_surface_alone() {
    let mut h = Harness::new(NOW_MS, None, false);
    h.engine.start();
    h.frames.pump(16.0);
    h.frames.pump(32.0);
    let before_stop = *h.surface.borrow();
    h.engine.set_target(&iso_after(NOW_MS, 60));
    assert!(!h.engine.is_celebrating());

    // The stop itself clears once and draws nothing.
    let after_stop = *h.surface.borrow();
    assert_eq!(after_stop.frames, 2);
    assert_eq!(after_stop.clears, before_stop.clears + 1);
    assert_eq!(after_stop.fills, before_stop.fills);
    assert_eq!(after_stop.strokes, before_stop.strokes);
    for i in 0..10 {
        h.frames.pump(48.0 + 16.0 * i as f64);
    }
    assert_eq!(*h.surface.borrow(), after_stop);
    assert_eq!(h.frames.active(), 0);
}

#[test]
fn reduced_motion_never_draws() {
    let mut h = Harness::new(NOW_MS, None, true);
    h.engine.start();
    assert_eq!(h.engine.phase(), Phase::Finished);
    for i in 0..5 {
        h.frames.pump(16.0 * i as f64);
    }
    assert_eq!(h.frames.runs(), 0);
    assert_eq!(*h.surface.borrow(), Default::default());
}

#[test]
fn stop_and_drop_cancel_the_tick() {
    let mut h = Harness::new(NOW_MS, Some(&iso_after(NOW_MS, 5)), false);
    h.engine.start();
    h.engine.stop();
    assert_eq!(h.ticker.live(), 0);
    h.engine.start();
    assert_eq!(h.ticker.live(), 1);
    let ticker = h.ticker.clone();
    drop(h);
    assert_eq!(ticker.live(), 0);
}

#[test]
fn engines_are_independent() {
    let mut a = Harness::new(NOW_MS, Some(&iso_after(NOW_MS, 5)), false);
    let mut b = Harness::new(NOW_MS, None, false);
    a.engine.start();
    b.engine.start();
    assert_eq!(a.engine.phase(), Phase::Counting);
    assert_eq!(b.engine.phase(), Phase::Finished);
    assert!(!a.engine.is_celebrating());
    assert!(b.engine.is_celebrating());
}
