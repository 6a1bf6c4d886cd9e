//! End-to-end Lab sessions on the virtual clock.

use std::time::Duration;

use scalelab::core::{
    COUNTDOWN_START, FORCES_OVERWEIGHT_PHRASES, RELATIONS_OVERWEIGHT_PHRASES,
};
use scalelab::prelude::*;
use scalelab::{InstanceId, NARRATOR_SUB_ID, timer_sub_id};

const SECOND: Duration = Duration::from_secs(1);
const MS: Duration = Duration::from_millis(1);

fn session() -> ProgramSimulator<Lab> {
    let mut sim = ProgramSimulator::new(Lab::with_seed(2024));
    sim.init();
    sim
}

fn place(sim: &mut ProgramSimulator<Lab>, side: Side, id: &str) {
    sim.send(Msg::drop_factor(side, id));
}

// ── Balance scenarios ─────────────────────────────────────────────────────

#[test]
fn empty_pans_are_stagnant() {
    let sim = session();
    let lab = sim.model();
    assert_eq!(lab.difference(), 0);
    assert_eq!(lab.status(), Status::Balanced);
    assert_eq!(lab.verdict().kind, VerdictKind::AbsoluteStagnation);
    assert_eq!(lab.verdict().title, "SỰ TRÌ TRỆ TUYỆT ĐỐI");
}

#[test]
fn senior_architect_alone_makes_relations_obsolete() {
    let mut sim = session();
    place(&mut sim, Side::Left, "l-2");
    let lab = sim.model();
    assert_eq!(lab.difference(), 40);
    assert_eq!(lab.status(), Status::RelationsLagging);
    assert_eq!(lab.verdict().kind, VerdictKind::RelationsObsolete);
}

#[test]
fn ielts_against_agile_is_ideal() {
    let mut sim = session();
    place(&mut sim, Side::Left, "l-6");
    place(&mut sim, Side::Right, "q-4");
    let lab = sim.model();
    assert_eq!(lab.difference(), -5);
    assert_eq!(lab.status(), Status::Balanced);
    assert_eq!(lab.verdict().kind, VerdictKind::IdealEquilibrium);
}

#[test]
fn status_boundaries() {
    // l-5 (15) alone: exactly at the threshold.
    let mut sim = session();
    place(&mut sim, Side::Left, "l-5");
    assert_eq!(sim.model().difference(), 15);
    assert_eq!(sim.model().status(), Status::Balanced);

    // q-8 (15) alone: the other way.
    let mut sim = session();
    place(&mut sim, Side::Right, "q-8");
    assert_eq!(sim.model().difference(), -15);
    assert_eq!(sim.model().status(), Status::Balanced);

    // l-8 (18) against q-8 (15) plus q-3 (-15): 18 - 0 = 18.
    let mut sim = session();
    place(&mut sim, Side::Left, "l-8");
    place(&mut sim, Side::Right, "q-8");
    place(&mut sim, Side::Right, "q-3");
    assert_eq!(sim.model().difference(), 18);
    assert_eq!(sim.model().status(), Status::RelationsLagging);

    // l-1 (5) against q-6 (30): -25.
    let mut sim = session();
    place(&mut sim, Side::Left, "l-1");
    place(&mut sim, Side::Right, "q-6");
    assert_eq!(sim.model().status(), Status::RelationsFormalistic);
}

#[test]
fn negative_weight_counts_raw_but_tilts_floored() {
    let mut sim = session();
    place(&mut sim, Side::Right, "q-3");
    let lab = sim.model();
    assert_eq!(lab.difference(), 15);
    assert_eq!(lab.engine().visual_weights(), (0, 0));
    assert_eq!(lab.tilt_degrees(), 0.0);
}

#[test]
fn mismatched_drop_changes_nothing_but_the_timer() {
    let mut sim = session();
    sim.advance(SECOND * 5);
    assert_eq!(sim.model().remaining(), COUNTDOWN_START - 5);

    place(&mut sim, Side::Right, "l-2");
    place(&mut sim, Side::Left, "q-2");
    let lab = sim.model();
    assert!(lab.pan(Side::Left).is_empty());
    assert!(lab.pan(Side::Right).is_empty());
    assert_eq!(lab.remaining(), COUNTDOWN_START);
}

#[test]
fn same_factor_can_be_placed_twice_and_removed_individually() {
    let mut sim = session();
    place(&mut sim, Side::Left, "l-4");
    place(&mut sim, Side::Left, "l-4");
    let ids: Vec<InstanceId> = sim.model().pan(Side::Left).iter().map(|p| p.instance).collect();
    assert_eq!(ids.len(), 2);
    assert_ne!(ids[0], ids[1]);

    sim.send(Msg::Remove {
        side: Side::Left,
        instance: ids[0],
    });
    let left = sim.model().pan(Side::Left);
    assert_eq!(left.len(), 1);
    assert!(left.contains(ids[1]));
    assert_eq!(sim.model().difference(), 25);
}

#[test]
fn unknown_removal_is_a_noop() {
    let mut sim = session();
    place(&mut sim, Side::Left, "l-3");
    sim.send(Msg::Remove {
        side: Side::Right,
        instance: InstanceId::from_raw(1),
    });
    sim.send(Msg::Remove {
        side: Side::Left,
        instance: InstanceId::from_raw(999),
    });
    assert_eq!(sim.model().pan(Side::Left).len(), 1);
    assert_eq!(sim.model().difference(), 35);
}

#[test]
fn reset_clears_pans_buffer_and_timer() {
    let mut sim = session();
    place(&mut sim, Side::Left, "l-2");
    sim.advance(SECOND * 4);
    assert!(!sim.model().conflicts().is_empty());

    sim.send(Msg::Reset);
    let lab = sim.model();
    assert!(lab.engine().is_empty());
    assert!(lab.conflicts().is_empty());
    assert_eq!(lab.remaining(), COUNTDOWN_START);
    assert_eq!(sim.active_subscriptions(), vec![timer_sub_id(2)]);
}

// ── Inactivity timer ──────────────────────────────────────────────────────

#[test]
fn idle_session_expires_exactly_once() {
    let mut sim = session();
    sim.advance(SECOND * 19);
    assert_eq!(sim.model().remaining(), 1);
    assert!(!sim.model().is_result_visible());

    sim.advance(SECOND);
    assert!(sim.model().timer().is_expired());
    assert!(sim.model().is_result_visible());
    assert_eq!(sim.model().expirations(), 1);
    assert_eq!(sim.logs().len(), 1);

    assert_eq!(sim.advance(SECOND * 60), 0);
    assert_eq!(sim.model().expirations(), 1);
}

#[test]
fn action_before_expiry_restarts_without_duplicate_ticks() {
    let mut sim = session();
    sim.advance(SECOND * 19 + MS * 500);
    assert_eq!(sim.model().remaining(), 1);

    sim.send(Msg::OpenInfo(Popup::ForcesInfo));
    assert_eq!(sim.model().remaining(), COUNTDOWN_START);
    assert_eq!(sim.active_subscriptions(), vec![timer_sub_id(1)]);

    // The old sequence would have expired at 20.0s.
    sim.advance(MS * 500);
    assert_eq!(sim.model().remaining(), COUNTDOWN_START);
    assert!(!sim.model().is_result_visible());

    // One tick per second from the restart, never two.
    sim.advance(MS * 500);
    assert_eq!(sim.model().remaining(), COUNTDOWN_START - 1);
    sim.advance(SECOND * 18);
    assert_eq!(sim.model().remaining(), 1);
    sim.advance(SECOND);
    assert_eq!(sim.model().expirations(), 1);
}

#[test]
fn closing_result_restarts_countdown() {
    let mut sim = session();
    sim.advance(SECOND * 20);
    assert!(sim.model().is_result_visible());
    assert!(sim.active_subscriptions().is_empty());

    sim.send(Msg::CloseResult);
    assert!(!sim.model().is_result_visible());
    assert_eq!(sim.active_subscriptions(), vec![timer_sub_id(1)]);

    sim.advance(SECOND * 20);
    assert_eq!(sim.model().expirations(), 2);
}

#[test]
fn malformed_payload_still_counts_as_activity() {
    let mut sim = session();
    sim.advance(SECOND * 10);
    sim.send(Msg::DropPayload {
        side: Side::Left,
        payload: "<not json>".into(),
    });
    sim.send(Msg::DropPayload {
        side: Side::Left,
        payload: r#"{"id":"l-99"}"#.into(),
    });
    assert!(sim.model().engine().is_empty());
    assert_eq!(sim.model().remaining(), COUNTDOWN_START);
}

// ── Conflict narrator ─────────────────────────────────────────────────────

#[test]
fn narrator_emits_every_interval_and_caps_buffer() {
    let mut sim = session();
    place(&mut sim, Side::Left, "l-2");
    assert!(sim.active_subscriptions().contains(&NARRATOR_SUB_ID));

    sim.advance(MS * 1_499);
    assert!(sim.model().conflicts().is_empty());
    sim.advance(MS);
    assert_eq!(sim.model().conflicts().len(), 1);

    sim.advance(MS * 1_500 * 5);
    let buffer = sim.model().conflicts();
    assert_eq!(buffer.len(), 4);
    assert!(buffer.iter().all(|p| FORCES_OVERWEIGHT_PHRASES.contains(&p)));
}

#[test]
fn side_switch_keeps_narrator_phase() {
    let mut sim = session();
    place(&mut sim, Side::Left, "l-6"); // +20
    sim.advance(SECOND);
    place(&mut sim, Side::Right, "q-2"); // 20 - 45 = -25
    assert_eq!(sim.model().status(), Status::RelationsFormalistic);
    assert!(sim.active_subscriptions().contains(&NARRATOR_SUB_ID));

    // Still due at 1.5s from the first imbalance, not 1.5s from the switch.
    assert_eq!(sim.next_due(), Some(MS * 1_500));
    sim.advance(MS * 500);
    let latest = sim.model().conflicts().latest().unwrap();
    assert!(RELATIONS_OVERWEIGHT_PHRASES.contains(&latest));
}

#[test]
fn return_to_balance_clears_phrases_and_stops_narrator() {
    let mut sim = session();
    place(&mut sim, Side::Left, "l-2");
    sim.advance(SECOND * 5);
    assert!(!sim.model().conflicts().is_empty());

    place(&mut sim, Side::Right, "q-2"); // 40 - 45 = -5
    assert_eq!(sim.model().status(), Status::Balanced);
    assert!(sim.model().conflicts().is_empty());
    assert!(!sim.active_subscriptions().contains(&NARRATOR_SUB_ID));

    sim.advance(SECOND * 5);
    assert!(sim.model().conflicts().is_empty());
}

#[test]
fn same_seed_same_phrases() {
    let run = || {
        let mut sim = session();
        place(&mut sim, Side::Right, "q-6");
        let mut seen = Vec::new();
        for _ in 0..8 {
            sim.advance(MS * 1_500);
            seen.push(sim.model().conflicts().latest());
        }
        seen
    };
    assert_eq!(run(), run());
}

// ── Lifecycle ─────────────────────────────────────────────────────────────

#[test]
fn dispose_stops_all_ticks() {
    let mut sim = session();
    place(&mut sim, Side::Left, "l-2");
    sim.advance(SECOND * 2);
    let before = sim.model().snapshot();

    sim.dispose();
    assert_eq!(sim.advance(SECOND * 60), 0);
    assert_eq!(sim.model().snapshot(), before);
}

#[test]
fn snapshot_follows_session() {
    let mut sim = session();
    place(&mut sim, Side::Left, "l-3");
    sim.send(Msg::OpenInfo(Popup::RelationsInfo));
    let snap = sim.model().snapshot();
    assert_eq!(snap.left_weight, 35);
    assert_eq!(snap.right_weight, 0);
    assert_eq!(snap.status, Status::RelationsLagging);
    assert_eq!(snap.open_popups, vec![Popup::RelationsInfo]);
    assert_eq!(snap.remaining, COUNTDOWN_START);
}
