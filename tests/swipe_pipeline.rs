//! End-to-end swipe recognition through the public pipeline API

use std::time::{Duration, Instant};

use triswipe::config::AppConfig;
use triswipe::gesture::{
    Frame, GesturePhase, RawEvent, RecordingSink, SwipeDirection, SwipePipeline, TouchCode,
};

fn pipeline() -> SwipePipeline<RecordingSink> {
    let mut config = AppConfig::default();
    config.emitter.frame_interval_ms = 0;
    SwipePipeline::new(&config, RecordingSink::new()).unwrap()
}

/// Builds timestamped input the way the kernel delivers it
struct Timeline {
    t0: Instant,
    events: Vec<RawEvent>,
}

impl Timeline {
    fn new(t0: Instant) -> Self {
        Self {
            t0,
            events: Vec::new(),
        }
    }

    fn at(&self, millis: u64) -> Instant {
        self.t0 + Duration::from_millis(millis)
    }

    fn key(mut self, millis: u64, code: TouchCode, value: i32) -> Self {
        let time = self.at(millis);
        self.events.push(RawEvent::touch(code, value, time));
        self.events.push(RawEvent::sync(time));
        self
    }

    /// One report: positions for several slots, then a sync marker
    fn report(mut self, millis: u64, code: TouchCode, positions: &[(i32, i32)]) -> Self {
        let time = self.at(millis);
        for &(slot, value) in positions {
            self.events.push(RawEvent::touch(TouchCode::Slot, slot, time));
            self.events.push(RawEvent::touch(code, value, time));
        }
        self.events.push(RawEvent::sync(time));
        self
    }
}

fn feed(pipeline: &mut SwipePipeline<RecordingSink>, events: &[RawEvent]) -> Vec<SwipeDirection> {
    events
        .iter()
        .filter_map(|event| pipeline.process(event).unwrap())
        .map(|swipe| swipe.direction)
        .collect()
}

fn slot0_x(frame: &Frame) -> Option<i32> {
    frame.slot_value(0, TouchCode::PositionX)
}

#[test]
fn test_two_finger_rightward_motion_emits_one_burst() {
    let timeline = Timeline::new(Instant::now())
        .key(0, TouchCode::ThreeFingers, 1)
        .report(0, TouchCode::PositionY, &[(0, 700), (1, 700)]);
    let timeline = [1000, 1000, 1090, 1200]
        .into_iter()
        .enumerate()
        .fold(timeline, |timeline, (step, x)| {
            timeline.report(10 * (step as u64 + 1), TouchCode::PositionX, &[(0, x), (1, x)])
        });

    let mut pipeline = pipeline();
    let fired = feed(&mut pipeline, &timeline.events);
    assert_eq!(fired, vec![SwipeDirection::Right]);
    assert_eq!(SwipeDirection::Right.unit(), (1, 0));

    let frames = pipeline.sink().frames();
    assert_eq!(frames.len(), 12);

    let setup = &frames[0];
    assert_eq!(setup.key_value(TouchCode::Touch), Some(1));
    assert_eq!(setup.key_value(TouchCode::ThreeFingers), Some(1));
    assert_eq!(slot0_x(setup), Some(5000));
    assert_eq!(setup.slot_value(2, TouchCode::PositionX), Some(5200));

    for (i, frame) in frames[1..=10].iter().enumerate() {
        let step = i as i32 + 1;
        assert_eq!(slot0_x(frame), Some(5000 + step * 50), "ramp step {step}");
        assert_eq!(frame.slot_value(0, TouchCode::PositionY), Some(5000));
        assert_eq!(frame.slot_value(1, TouchCode::PositionX), Some(5100 + step * 50));
    }

    let teardown = &frames[11];
    for slot in 0..3 {
        assert_eq!(teardown.slot_value(slot, TouchCode::TrackingId), Some(-1));
    }
    assert_eq!(teardown.key_value(TouchCode::ThreeFingers), Some(0));
    assert_eq!(teardown.key_value(TouchCode::Touch), Some(0));
}

#[test]
fn test_upward_motion_emits_positive_y_ramp() {
    let timeline = Timeline::new(Instant::now())
        .key(0, TouchCode::ThreeFingers, 1)
        .report(10, TouchCode::PositionY, &[(0, 900)])
        .report(20, TouchCode::PositionY, &[(0, 850)]);

    let mut pipeline = pipeline();
    assert_eq!(feed(&mut pipeline, &timeline.events), vec![SwipeDirection::Up]);

    let frames = pipeline.sink().frames();
    assert_eq!(frames[1].slot_value(0, TouchCode::PositionY), Some(5050));
    assert_eq!(frames[1].slot_value(0, TouchCode::PositionX), Some(5000));
}

#[test]
fn test_jitter_never_accumulates() {
    let mut timeline = Timeline::new(Instant::now()).key(0, TouchCode::ThreeFingers, 1);
    for (step, x) in [1000, 1005, 1000, 1004, 999, 1003].into_iter().enumerate() {
        timeline = timeline.report(step as u64 + 1, TouchCode::PositionX, &[(0, x)]);
    }

    let mut pipeline = pipeline();
    assert!(feed(&mut pipeline, &timeline.events).is_empty());
    assert_eq!(pipeline.accumulator().accumulated(), (0, 0));
    assert!(pipeline.sink().frames().is_empty());
}

#[test]
fn test_cooldown_blocks_second_swipe() {
    let timeline = Timeline::new(Instant::now())
        .key(0, TouchCode::ThreeFingers, 1)
        .report(10, TouchCode::PositionX, &[(0, 1000)])
        .report(20, TouchCode::PositionX, &[(0, 1100)])
        .report(30, TouchCode::PositionX, &[(0, 1200)])
        .report(200, TouchCode::PositionX, &[(0, 1300)]);

    let mut pipeline = pipeline();
    assert_eq!(feed(&mut pipeline, &timeline.events).len(), 1);
    assert!(matches!(
        pipeline.phase(timeline.at(200)),
        GesturePhase::Cooldown { .. }
    ));
    assert_eq!(pipeline.accumulator().accumulated(), (200, 0));

    // First event past the cooldown fires on what built up meanwhile
    let late = Timeline::new(timeline.t0).report(330, TouchCode::PositionX, &[(0, 1300)]);
    assert_eq!(feed(&mut pipeline, &late.events), vec![SwipeDirection::Right]);
    assert_eq!(pipeline.swipe_count(), 2);
}

#[test]
fn test_indicator_flicker_keeps_accumulation() {
    let timeline = Timeline::new(Instant::now())
        .key(0, TouchCode::ThreeFingers, 1)
        .report(10, TouchCode::PositionX, &[(0, 1000)])
        .report(20, TouchCode::PositionX, &[(0, 960)])
        .key(30, TouchCode::ThreeFingers, 0)
        .key(60, TouchCode::ThreeFingers, 1)
        .report(70, TouchCode::PositionX, &[(0, 900)]);

    let mut pipeline = pipeline();
    assert_eq!(feed(&mut pipeline, &timeline.events), vec![SwipeDirection::Left]);
}

#[test]
fn test_swipe_inside_grace_after_lift() {
    let timeline = Timeline::new(Instant::now())
        .key(0, TouchCode::ThreeFingers, 1)
        .key(10, TouchCode::ThreeFingers, 0)
        .report(100, TouchCode::PositionX, &[(0, 1000)])
        .report(150, TouchCode::PositionX, &[(0, 1090)]);

    let mut pipeline = pipeline();
    assert_eq!(feed(&mut pipeline, &timeline.events), vec![SwipeDirection::Right]);
}

#[test]
fn test_no_swipe_after_grace_expires() {
    let timeline = Timeline::new(Instant::now())
        .key(0, TouchCode::ThreeFingers, 1)
        .key(10, TouchCode::ThreeFingers, 0)
        .report(500, TouchCode::PositionX, &[(0, 1000)])
        .report(510, TouchCode::PositionX, &[(0, 1200)]);

    let mut pipeline = pipeline();
    assert!(feed(&mut pipeline, &timeline.events).is_empty());
    assert_eq!(pipeline.phase(timeline.at(510)), GesturePhase::Idle);
    assert_eq!(pipeline.accumulator().accumulated(), (200, 0));
}

#[test]
fn test_release_starts_fresh() {
    let timeline = Timeline::new(Instant::now())
        .report(0, TouchCode::PositionX, &[(0, 1000), (1, 2000)])
        .key(10, TouchCode::Touch, 0)
        .key(20, TouchCode::ThreeFingers, 1)
        // Far from the pre-release positions; only the first sample after
        // the reset may seed the slot
        .report(30, TouchCode::PositionX, &[(0, 3000), (1, 4000)])
        .report(40, TouchCode::PositionX, &[(0, 3010), (1, 4000)]);

    let mut pipeline = pipeline();
    assert!(feed(&mut pipeline, &timeline.events).is_empty());
    assert_eq!(pipeline.accumulator().accumulated(), (10, 0));
    assert_eq!(pipeline.tracker().slot(1).unwrap().last_x, Some(4000));
}

#[test]
fn test_slots_beyond_tracked_are_ignored() {
    let timeline = Timeline::new(Instant::now())
        .key(0, TouchCode::ThreeFingers, 1)
        .report(10, TouchCode::PositionX, &[(2, 1000)])
        .report(20, TouchCode::PositionX, &[(2, 1500)]);

    let mut pipeline = pipeline();
    assert!(feed(&mut pipeline, &timeline.events).is_empty());
    assert_eq!(pipeline.accumulator().accumulated(), (0, 0));
}

#[test]
fn test_diagonal_motion_is_rejected() {
    let timeline = Timeline::new(Instant::now())
        .key(0, TouchCode::ThreeFingers, 1)
        .report(10, TouchCode::PositionX, &[(0, 1000)])
        .report(10, TouchCode::PositionY, &[(0, 1000)])
        .report(20, TouchCode::PositionY, &[(0, 980)])
        .report(30, TouchCode::PositionX, &[(0, 1100)]);

    let mut pipeline = pipeline();
    assert!(feed(&mut pipeline, &timeline.events).is_empty());
    assert_eq!(pipeline.accumulator().accumulated(), (100, 20));
}
