use bug_smash::GameConfig;
use bug_smash::sim::{
    Catalog, GameEvent, GameSession, PlayField, RoundPhase, Scheduler, TimerEvent, VirtualClock,
    advance,
};
use glam::Vec2;

fn start(config: GameConfig, seed: u64) -> (GameSession, VirtualClock) {
    let mut clock = VirtualClock::new();
    let session = GameSession::start(
        config,
        Catalog::builtin(),
        PlayField::new(380.0, 530.0),
        seed,
        &mut clock,
    );
    (session, clock)
}

/// Advance to an absolute time
fn run_to(session: &mut GameSession, clock: &mut VirtualClock, at_ms: u64) {
    let now = clock.now_ms();
    advance(session, clock, at_ms.saturating_sub(now));
}

// ── idle round ────────────────────────────────────────────────────────────────

#[test]
fn idle_round_scores_zero_and_ends_once() {
    let (mut s, mut clock) = start(GameConfig::default(), 2024);

    run_to(&mut s, &mut clock, 60_000);
    assert_eq!(s.round.phase, RoundPhase::Ended);
    assert_eq!(s.score.total, 0);

    let summary = s.summary.clone().expect("summary after round end");
    assert_eq!(summary.final_score, 0);
    assert_eq!(summary.spawned, 60);
    assert_eq!(summary.left_on_field, 60);

    let spawned = s.spawned;
    let positions: Vec<Vec2> = s.creatures.iter().map(|c| c.pos).collect();

    run_to(&mut s, &mut clock, 120_000);
    assert_eq!(s.spawned, spawned);
    assert_eq!(s.creatures.iter().map(|c| c.pos).collect::<Vec<_>>(), positions);

    let ended = s
        .drain_events()
        .into_iter()
        .filter(|e| matches!(e, GameEvent::RoundEnded { .. }))
        .count();
    assert_eq!(ended, 1);
    assert!(s.end_round(&mut clock).is_none());
}

#[test]
fn round_end_cancels_every_timer() {
    let config = GameConfig {
        bonus_chance: 0.0,
        ..Default::default()
    };
    let (mut s, mut clock) = start(config, 8);
    let bonus = s.catalog.bonus_index();

    run_to(&mut s, &mut clock, 55_000);
    let id = s
        .place(bonus, Vec2::new(50.0, 50.0), Vec2::ONE, &mut clock)
        .expect("room for the bonus");
    s.smash(id, &mut clock);
    assert!(s.score.expiry_pending());

    run_to(&mut s, &mut clock, 60_000);
    assert!(!s.score.expiry_pending());
    assert!(
        clock
            .pending_events()
            .all(|e| !matches!(e, TimerEvent::Move(_) | TimerEvent::MultiplierExpired))
    );
    assert_eq!(clock.pending(), 0);
    assert!(s.creatures.iter().all(|c| c.move_timer.is_none()));
}

// ── multiplier ────────────────────────────────────────────────────────────────

#[test]
fn bonus_then_standard_then_expired() {
    let config = GameConfig {
        bonus_chance: 0.0,
        ..Default::default()
    };
    let (mut s, mut clock) = start(config, 77);
    let bonus = s.catalog.bonus_index();
    let dragonfly = s.catalog.find("Dragonfly").expect("builtin dragonfly");
    let spider = s.catalog.find("Spider").expect("builtin spider");

    run_to(&mut s, &mut clock, 5_000);
    let id = s
        .place(bonus, Vec2::new(10.0, 10.0), Vec2::new(2.0, 2.0), &mut clock)
        .expect("room");
    assert_eq!(s.smash(id, &mut clock), Some(0));

    run_to(&mut s, &mut clock, 6_000);
    let id = s
        .place(dragonfly, Vec2::new(40.0, 40.0), Vec2::new(2.0, 2.0), &mut clock)
        .expect("room");
    assert_eq!(s.smash(id, &mut clock), Some(6));

    run_to(&mut s, &mut clock, 14_999);
    assert_eq!(s.score.multiplier, 2);
    run_to(&mut s, &mut clock, 15_000);
    assert_eq!(s.score.multiplier, 1);

    run_to(&mut s, &mut clock, 20_000);
    let id = s
        .place(spider, Vec2::new(90.0, 90.0), Vec2::new(2.0, 2.0), &mut clock)
        .expect("room");
    assert_eq!(s.smash(id, &mut clock), Some(5));

    assert_eq!(s.score.total, 11);
    assert!(s.drain_events().contains(&GameEvent::MultiplierExpired));
}

#[test]
fn second_bonus_restarts_window() {
    let config = GameConfig {
        bonus_chance: 0.0,
        ..Default::default()
    };
    let (mut s, mut clock) = start(config, 3);
    let bonus = s.catalog.bonus_index();

    let first = s.place(bonus, Vec2::ZERO, Vec2::ONE, &mut clock).expect("room");
    s.smash(first, &mut clock);

    run_to(&mut s, &mut clock, 8_000);
    let second = s.place(bonus, Vec2::ZERO, Vec2::ONE, &mut clock).expect("room");
    s.smash(second, &mut clock);
    assert_eq!(s.score.multiplier, 2);

    run_to(&mut s, &mut clock, 17_999);
    assert_eq!(s.score.multiplier, 2);
    run_to(&mut s, &mut clock, 18_000);
    assert_eq!(s.score.multiplier, 1);
}

// ── capacity ──────────────────────────────────────────────────────────────────

#[test]
fn tiny_field_holds_five() {
    let mut clock = VirtualClock::new();
    let mut s = GameSession::start(
        GameConfig::default(),
        Catalog::builtin(),
        PlayField::new(100.0, 100.0),
        11,
        &mut clock,
    );
    run_to(&mut s, &mut clock, 30_000);
    assert_eq!(s.field_count(), 5);
    assert_eq!(s.spawned, 5);

    // Smashing frees a slot once the creature is detached
    let id = s.creatures[0].id;
    s.smash(id, &mut clock);
    run_to(&mut s, &mut clock, 31_000);
    assert_eq!(s.spawned, 6);
    assert_eq!(s.field_count(), 5);
}
