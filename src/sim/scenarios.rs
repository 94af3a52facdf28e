//! End-to-end runs of a level session against in-memory levels

use glam::Vec2;

use super::geom::Rect;
use super::session::{LevelSession, SessionEvent, SessionPhase};
use crate::error::LevelError;
use crate::level::{
    BATTERIES_LAYER, DEATH_LAYER, END_FLAG_LAYER, LevelMap, LevelObject, RISING_ONLY_LAYER,
    START_MARKER_LAYER, StaticLevels, WALL_CONTACT_LAYER,
};
use crate::render::{DrawLayer, RecordingSink};
use crate::tuning::{MotionProfile, Tuning};

const DT: f32 = 1.0 / 60.0;

fn marker() -> Rect {
    Rect::new(128.0, 128.0, 128.0, 128.0)
}

/// Floor plus a start marker; the player spawns at (288, 260)
fn flat_level() -> LevelMap {
    LevelMap::new()
        .with_layer(WALL_CONTACT_LAYER, [Rect::new(0.0, 0.0, 2560.0, 128.0)])
        .with_layer(START_MARKER_LAYER, [marker()])
}

/// Battery overlapping the spawn point
fn pickup_at_spawn() -> Rect {
    Rect::new(270.0, 230.0, 32.0, 32.0)
}

/// End flag overlapping the spawn point
fn flag_at_spawn() -> Rect {
    Rect::new(300.0, 200.0, 64.0, 64.0)
}

fn session(tuning: &Tuning, levels: StaticLevels) -> LevelSession {
    let mut session = LevelSession::new(tuning, Box::new(levels));
    session.setup().unwrap();
    session
}

/// Run until the session goes inactive; returns the 1-based tick it happened on
fn run_until_inactive(session: &mut LevelSession, ticks: usize) -> Option<usize> {
    for tick in 1..=ticks {
        session.update(DT);
        if session.is_inactive() {
            return Some(tick);
        }
    }
    None
}

fn falling_level() -> StaticLevels {
    let map = LevelMap::new().with_layer(START_MARKER_LAYER, [Rect::new(0.0, 0.0, 128.0, 128.0)]);
    StaticLevels::new().with_level(1, map)
}

#[test]
fn test_scenario_a_fall_to_death_force_profile() {
    let mut session = session(&Tuning::default(), falling_level());
    assert_eq!(session.player().center(), Vec2::new(160.0, 132.0));

    // center_y must drop below 64 - 300; under 1500 px/s^2 that takes 42 steps,
    // and the check at the start of the next update fires
    let died_at = run_until_inactive(&mut session, 60);
    assert_eq!(died_at, Some(43));
    assert_eq!(session.phase(), SessionPhase::Dead);
    assert!(session.player().center().y < -236.0);

    let events = session.drain_events();
    assert!(events.contains(&SessionEvent::Died { level: 1 }));
}

#[test]
fn test_scenario_a_fall_to_death_direct_profile() {
    let tuning = Tuning::with_profile(MotionProfile::Direct);
    let mut session = session(&tuning, falling_level());

    // 0.7 px/frame^2 needs 32 frames to fall 368 px
    let died_at = run_until_inactive(&mut session, 60);
    assert_eq!(died_at, Some(33));
    assert_eq!(session.phase(), SessionPhase::Dead);
}

#[test]
fn test_scenario_b_pickup_then_halved_drain() {
    let map = flat_level().with_layer(BATTERIES_LAYER, [pickup_at_spawn()]);
    let mut session = session(&Tuning::default(), StaticLevels::new().with_level(1, map));
    assert!(!session.power().has_power());

    session.update(DT);
    let granted = session
        .drain_events()
        .into_iter()
        .find_map(|event| match event {
            SessionEvent::PickupCollected { granted, .. } => Some(granted),
            _ => None,
        })
        .expect("pickup collected on the first update");
    assert!((8.0..36.0).contains(&granted));
    assert_eq!(session.power().remaining(), granted);
    assert!(session.power().has_power());
    assert!(session.world().pickups.is_empty());

    let mut previous = session.power().remaining();
    for _ in 0..60 {
        session.update(DT);
        let now = session.power().remaining();
        assert!(now < previous);
        assert!((previous - now - DT * 0.5).abs() < 1e-4);
        previous = now;
    }
    assert!((granted - previous - 0.5).abs() < 1e-3);
    assert_eq!(session.phase(), SessionPhase::Active);
}

#[test]
fn test_scenario_c_level_advance_and_terminal_win() {
    let map = flat_level()
        .with_layer(BATTERIES_LAYER, [pickup_at_spawn()])
        .with_layer(END_FLAG_LAYER, [flag_at_spawn()]);
    let levels = StaticLevels::new()
        .with_level(1, map.clone())
        .with_level(2, map);
    let mut tuning = Tuning::default();
    tuning.levels.max_level = 2;
    let mut session = session(&tuning, levels);
    session.drain_events();

    // Pickup and flag on the same update: power first, so the flag counts
    session.update(DT);
    let events = session.drain_events();
    assert!(events.contains(&SessionEvent::LevelCompleted { level: 1 }));
    assert!(events.contains(&SessionEvent::LevelLoaded { level: 2 }));
    assert_eq!(session.level(), 2);
    assert_eq!(session.phase(), SessionPhase::Active);

    // Everything per level starts over
    assert!(!session.power().has_power());
    assert_eq!(session.world().pickups.len(), 1);
    assert_eq!(session.player().center(), Vec2::new(288.0, 260.0));
    assert_eq!(session.player().body.vel, Vec2::ZERO);
    assert_eq!(session.camera().view_left(), 0);

    session.update(DT);
    let events = session.drain_events();
    assert!(events.contains(&SessionEvent::LevelCompleted { level: 2 }));
    assert!(events.contains(&SessionEvent::GameWon));
    assert_eq!(session.phase(), SessionPhase::Terminal);
    assert!(session.is_inactive());
    assert_eq!(session.level(), tuning.levels.start_level);

    // Inactive sessions ignore further updates
    session.update(DT);
    assert!(session.drain_events().is_empty());
}

#[test]
fn test_flag_without_power_blocks_progress() {
    let map = flat_level().with_layer(END_FLAG_LAYER, [flag_at_spawn()]);
    let mut session = session(&Tuning::default(), StaticLevels::new().with_level(1, map));
    session.drain_events();

    session.update(DT);
    let events = session.drain_events();
    assert!(events.contains(&SessionEvent::NotEnoughPower));
    assert_eq!(session.level(), 1);
    assert_eq!(session.phase(), SessionPhase::Active);
    assert!(session.hud().not_enough_power.is_visible());

    let mut sink = RecordingSink::new();
    session.render(&mut sink);
    assert!(
        sink.texts()
            .contains(&"You do not have any power. Power is required to pass this level!")
    );
}

#[test]
fn test_scenario_d_marker_count_errors() {
    let tuning = Tuning::default();

    let none = LevelMap::new().with_layer(WALL_CONTACT_LAYER, [Rect::new(0.0, 0.0, 128.0, 128.0)]);
    let mut session = LevelSession::new(&tuning, Box::new(StaticLevels::new().with_level(1, none)));
    match session.setup() {
        Err(LevelError::InvalidMarkerCount {
            resource,
            expected,
            actual,
        }) => {
            assert_eq!(resource, "static level 1");
            assert_eq!(expected, 1);
            assert_eq!(actual, 0);
        }
        other => panic!("expected a marker count error, got {other:?}"),
    }
    assert_eq!(session.phase(), SessionPhase::Loading);
    assert!(session.is_inactive());

    let two = LevelMap::new().with_layer(START_MARKER_LAYER, [marker(), marker()]);
    let mut session = LevelSession::new(&tuning, Box::new(StaticLevels::new().with_level(1, two)));
    let err = session.setup().unwrap_err();
    assert!(matches!(
        err,
        LevelError::InvalidMarkerCount {
            expected: 1,
            actual: 2,
            ..
        }
    ));
    assert!(err.to_string().contains("found 2"));
}

#[test]
fn test_hazard_death_then_retry_same_level() {
    let map = flat_level().with_layer(DEATH_LAYER, [Rect::new(280.0, 128.0, 64.0, 32.0)]);
    let levels = StaticLevels::new()
        .with_level(1, flat_level())
        .with_level(2, map);
    let mut tuning = Tuning::default();
    tuning.levels.start_level = 2;
    let mut session = session(&tuning, levels);

    let died_at = run_until_inactive(&mut session, 120);
    assert!(died_at.is_some());
    assert_eq!(session.phase(), SessionPhase::Dead);
    assert!(session.drain_events().contains(&SessionEvent::Died { level: 2 }));

    session.setup().unwrap();
    assert_eq!(session.level(), 2);
    assert_eq!(session.phase(), SessionPhase::Active);
}

#[test]
fn test_rising_platforms_spawn_and_cull() {
    let rising = LevelObject {
        boundary_top: Some(400.0),
        ..LevelObject::from(Rect::new(512.0, -64.0, 128.0, 64.0))
    };
    let map = flat_level().with_layer(RISING_ONLY_LAYER, [rising]);
    let tuning = Tuning::with_profile(MotionProfile::Direct);
    let mut session = session(&tuning, StaticLevels::new().with_level(1, map));

    session.update(DT);
    assert_eq!(session.world().platforms.len(), 1);
    let platform = session.world().platforms[0];
    assert!(session.world().contact.contains(&platform));
    assert_eq!(session.world().rect(platform).unwrap().top(), 3.0);

    for _ in 0..150 {
        session.update(DT);
    }
    assert!(session.world().platforms.is_empty());
    assert!(!session.world().contact.contains(&platform));
}

#[test]
fn test_zero_boundary_platform_rises_until_out_of_view() {
    let rising = LevelObject {
        boundary_top: Some(0.0),
        ..LevelObject::from(Rect::new(512.0, -64.0, 128.0, 64.0))
    };
    let map = flat_level().with_layer(RISING_ONLY_LAYER, [rising]);
    let tuning = Tuning::with_profile(MotionProfile::Direct);
    let mut session = session(&tuning, StaticLevels::new().with_level(1, map));

    for _ in 0..10 {
        session.update(DT);
    }
    assert_eq!(session.world().platforms.len(), 1);
    let platform = session.world().platforms[0];
    assert!(session.world().rect(platform).unwrap().top() > 0.0);
}

#[test]
fn test_render_order_and_hud() {
    let map = flat_level()
        .with_layer(BATTERIES_LAYER, [Rect::new(900.0, 200.0, 32.0, 32.0)])
        .with_layer(END_FLAG_LAYER, [Rect::new(2000.0, 128.0, 64.0, 64.0)]);
    let session = session(&Tuning::default(), StaticLevels::new().with_level(1, map));

    let mut sink = RecordingSink::new();
    session.render(&mut sink);
    assert_eq!(
        sink.layers(),
        vec![
            DrawLayer::Platforms,
            DrawLayer::Walls,
            DrawLayer::Pickups,
            DrawLayer::Hazards,
            DrawLayer::WinMarkers,
            DrawLayer::Player,
            DrawLayer::Hud,
        ]
    );
    assert_eq!(sink.texts(), vec!["Power Expiry: No Power"]);
}
