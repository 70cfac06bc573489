//! End-to-end recognition through a view tree.

mod common;

use horizon_touch::{
    GestureConfig, GestureDetail, GestureEventKind, GestureOptions, GestureState, SwipeDirection,
    ViewHandlers,
};

use common::{Recorder, end, move_to, start, tree};

fn scale(detail: GestureDetail) -> f32 {
    match detail {
        GestureDetail::Pinch { scale, .. } => scale,
        other => panic!("unexpected detail {other:?}"),
    }
}

#[test]
fn test_pinch_in_and_out() {
    let (_, mut tree) = tree();
    let recorder = Recorder::new();
    let view = tree
        .add_view(None, recorder.handle(ViewHandlers::new(), "pinch"), GestureConfig::new())
        .unwrap();

    start(&mut tree, view, &[(0, 0.0, 100.0), (1, 100.0, 100.0)]);
    assert_eq!(tree.recognizer(view, "pinch").unwrap().state(), GestureState::Possible);

    move_to(&mut tree, view, &[(0, 50.0, 100.0)]);
    assert_eq!(tree.recognizer(view, "pinch").unwrap().state(), GestureState::Began);

    move_to(&mut tree, view, &[(0, 0.0, 100.0)]);
    assert_eq!(tree.recognizer(view, "pinch").unwrap().state(), GestureState::Changed);

    let events = recorder.events();
    assert_eq!(recorder.names(), vec!["pinchStart", "pinchChange"]);
    assert!((scale(events[0].detail) - 0.5).abs() < 1e-6);
    assert!((scale(events[1].detail) - 2.0).abs() < 1e-6);
}

#[test]
fn test_swipe_ends_during_move() {
    let (_, mut tree) = tree();
    let recorder = Recorder::new();
    let options = GestureOptions::new()
        .with_direction(SwipeDirection::RIGHT)
        .with_swipe_threshold(50.0);
    let view = tree
        .add_view(
            None,
            recorder.handle(ViewHandlers::new(), "swipe"),
            GestureConfig::new().with("swipe", options),
        )
        .unwrap();

    start(&mut tree, view, &[(1, 0.0, 10.0)]);
    move_to(&mut tree, view, &[(1, 10.0, 10.0)]);
    assert_eq!(tree.recognizer(view, "swipe").unwrap().state(), GestureState::Began);

    move_to(&mut tree, view, &[(1, 70.0, 10.0)]);
    assert_eq!(tree.recognizer(view, "swipe").unwrap().state(), GestureState::Ended);
    assert_eq!(recorder.names(), vec!["swipeStart", "swipeEnd"]);
    assert_eq!(
        recorder.events()[1].detail,
        GestureDetail::Swipe {
            direction: Some(SwipeDirection::RIGHT)
        }
    );
    assert_eq!(tree.app().active_timer_count(), 0);
}

#[test]
fn test_press_depends_on_hold_time() {
    let (clock, mut tree) = tree();
    let recorder = Recorder::new();
    let options = GestureOptions::new().with_press_period(500).with_move_threshold(10.0);
    let view = tree
        .add_view(
            None,
            recorder.handle(ViewHandlers::new(), "press"),
            GestureConfig::new().with("press", options),
        )
        .unwrap();

    start(&mut tree, view, &[(1, 0.0, 10.0)]);
    assert_eq!(tree.recognizer(view, "press").unwrap().state(), GestureState::Began);
    clock.advance_ms(500);
    end(&mut tree, view, &[(1, 0.0, 10.0)]);
    assert_eq!(tree.recognizer(view, "press").unwrap().state(), GestureState::Ended);
    assert_eq!(recorder.names(), vec!["pressEnd"]);

    recorder.clear();
    start(&mut tree, view, &[(2, 0.0, 10.0)]);
    clock.advance_ms(100);
    end(&mut tree, view, &[(2, 0.0, 10.0)]);
    assert_eq!(tree.recognizer(view, "press").unwrap().state(), GestureState::Cancelled);
    assert!(recorder.names().is_empty());
}

#[test]
fn test_continuous_phases_are_ordered() {
    let (_, mut tree) = tree();
    let recorder = Recorder::new();
    let view = tree
        .add_view(None, recorder.handle(ViewHandlers::new(), "pan"), GestureConfig::new())
        .unwrap();

    start(&mut tree, view, &[(1, 0.0, 0.0)]);
    for x in [2.0, 4.0, 10.0, 20.0, 30.0, 45.0] {
        move_to(&mut tree, view, &[(1, x, 0.0)]);
    }
    end(&mut tree, view, &[(1, 45.0, 0.0)]);

    let kinds: Vec<_> = recorder.events().iter().map(|e| e.kind).collect();
    assert_eq!(kinds.first(), Some(&GestureEventKind::Start));
    assert_eq!(kinds.last(), Some(&GestureEventKind::End));
    assert!(kinds[1..kinds.len() - 1].iter().all(|&k| k == GestureEventKind::Change));
    assert_eq!(kinds.len(), 5);
}

#[test]
fn test_discrete_gestures_never_change() {
    let (clock, mut tree) = tree();
    let recorder = Recorder::new();
    let handlers = recorder.handle(recorder.handle(ViewHandlers::new(), "press"), "tap");
    let config = GestureConfig::new().with("press", GestureOptions::new().with_press_period(100));
    let view = tree.add_view(None, handlers, config).unwrap();

    start(&mut tree, view, &[(1, 0.0, 0.0)]);
    move_to(&mut tree, view, &[(1, 1.0, 1.0)]);
    move_to(&mut tree, view, &[(1, 2.0, 1.0)]);
    clock.advance_ms(200);
    end(&mut tree, view, &[(1, 2.0, 1.0)]);

    assert!(recorder.events().iter().all(|e| e.kind != GestureEventKind::Change));
    assert_eq!(recorder.names(), vec!["pressEnd", "tapEnd"]);
}

#[test]
fn test_touches_accumulate_without_duplicates() {
    let (_, mut tree) = tree();
    let recorder = Recorder::new();
    let view = tree
        .add_view(
            None,
            recorder.handle(ViewHandlers::new(), "pan"),
            GestureConfig::new().with("pan", GestureOptions::new().with_required_touches(3)),
        )
        .unwrap();

    start(&mut tree, view, &[(1, 0.0, 0.0)]);
    start(&mut tree, view, &[(1, 0.0, 0.0), (2, 10.0, 0.0)]);
    let pan = tree.recognizer(view, "pan").unwrap();
    assert_eq!(pan.touches().len(), 2);
    assert_eq!(pan.state(), GestureState::WaitingForTouches);

    start(&mut tree, view, &[(3, 20.0, 0.0)]);
    let pan = tree.recognizer(view, "pan").unwrap();
    assert_eq!(pan.touches().len(), 3);
    assert_eq!(pan.state(), GestureState::Possible);
}

#[test]
fn test_touch_hold_completes_on_timer() {
    let (clock, mut tree) = tree();
    let recorder = Recorder::new();
    let view = tree
        .add_view(None, recorder.handle(ViewHandlers::new(), "touchHold"), GestureConfig::new())
        .unwrap();

    start(&mut tree, view, &[(1, 0.0, 0.0)]);
    assert_eq!(tree.time_until_next_timer(), Some(std::time::Duration::from_millis(2000)));

    clock.advance_ms(1999);
    assert_eq!(tree.process_timers(), 0);
    clock.advance_ms(1);
    assert_eq!(tree.process_timers(), 1);
    assert_eq!(recorder.names(), vec!["touchHoldEnd"]);
    assert!(recorder.events()[0].source.is_timeout());
    assert_eq!(tree.time_until_next_timer(), None);
}
