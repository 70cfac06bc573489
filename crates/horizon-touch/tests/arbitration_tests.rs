//! Exclusivity, the kill switch, bubbling, delegates and enablement.

mod common;

use std::sync::Arc;

use horizon_touch::{
    BoolSource, FnRule, GestureConfig, GestureError, GestureOptions, GestureState, RuleDelegate,
    TouchEvent, TouchPhase, ViewHandlers,
};
use parking_lot::Mutex;

use common::{Recorder, end, move_to, start, touches, tree};

fn exclusive_pan() -> GestureConfig {
    GestureConfig::new().with("pan", GestureOptions::new().with_simultaneously(false))
}

#[test]
fn test_exclusive_siblings() {
    let (_, mut tree) = tree();
    let recorder = Recorder::new();
    let root = tree.add_view(None, ViewHandlers::new(), GestureConfig::new()).unwrap();
    let a = tree
        .add_view(Some(root), recorder.handle(ViewHandlers::new(), "pan"), exclusive_pan())
        .unwrap();
    let b = tree
        .add_view(Some(root), recorder.handle(ViewHandlers::new(), "pan"), exclusive_pan())
        .unwrap();

    start(&mut tree, a, &[(1, 0.0, 0.0)]);
    move_to(&mut tree, a, &[(1, 10.0, 0.0)]);
    assert_eq!(tree.recognizer(a, "pan").unwrap().state(), GestureState::Began);
    assert_eq!(tree.app().blocker(), Some(a));

    start(&mut tree, b, &[(2, 100.0, 0.0)]);
    move_to(&mut tree, b, &[(2, 150.0, 0.0)]);
    assert_eq!(tree.recognizer(b, "pan").unwrap().state(), GestureState::WaitingForTouches);

    end(&mut tree, a, &[(1, 10.0, 0.0)]);
    end(&mut tree, b, &[(2, 150.0, 0.0)]);
    // Ending the gesture does not release the block.
    assert_eq!(tree.app().blocker(), Some(a));
    assert_eq!(recorder.names_for(b), Vec::<String>::new());

    assert!(matches!(
        tree.unblock_gestures(b),
        Err(GestureError::BlockerMismatch { requested, holder }) if requested == b && holder == a
    ));
    tree.unblock_gestures(a).unwrap();
    assert!(matches!(tree.unblock_gestures(a), Err(GestureError::NotBlocked)));

    start(&mut tree, b, &[(3, 0.0, 0.0)]);
    move_to(&mut tree, b, &[(3, 20.0, 0.0)]);
    assert_eq!(tree.recognizer(b, "pan").unwrap().state(), GestureState::Began);
    assert_eq!(tree.app().blocker(), Some(b));
    assert_eq!(recorder.names_for(b), vec!["panStart"]);
}

#[test]
fn test_simultaneous_gestures_share() {
    let (_, mut tree) = tree();
    let recorder = Recorder::new();
    let a = tree
        .add_view(None, recorder.handle(ViewHandlers::new(), "pan"), GestureConfig::new())
        .unwrap();
    let b = tree
        .add_view(None, recorder.handle(ViewHandlers::new(), "pan"), GestureConfig::new())
        .unwrap();

    start(&mut tree, a, &[(1, 0.0, 0.0)]);
    start(&mut tree, b, &[(2, 0.0, 0.0)]);
    move_to(&mut tree, a, &[(1, 10.0, 0.0)]);
    move_to(&mut tree, b, &[(2, 0.0, 10.0)]);

    assert!(!tree.app().is_blocked());
    assert_eq!(recorder.names_for(a), vec!["panStart"]);
    assert_eq!(recorder.names_for(b), vec!["panStart"]);
}

#[test]
fn test_events_bubble_to_ancestors() {
    let (_, mut tree) = tree();
    let recorder = Recorder::new();
    let parent = tree
        .add_view(None, recorder.handle(ViewHandlers::new(), "tap"), GestureConfig::new())
        .unwrap();
    let child = tree
        .add_view(Some(parent), recorder.handle(ViewHandlers::new(), "tap"), GestureConfig::new())
        .unwrap();

    start(&mut tree, child, &[(1, 5.0, 5.0)]);
    end(&mut tree, child, &[(1, 5.0, 5.0)]);

    let views: Vec<_> = recorder.events().iter().map(|e| e.view).collect();
    assert_eq!(views, vec![child, parent]);
    assert_eq!(recorder.names(), vec!["tapEnd", "tapEnd"]);
}

#[test]
fn test_all_blocked_stops_recognizers_and_bubbling() {
    let (_, mut tree) = tree();
    let recorder = Recorder::new();
    let direct = Arc::new(Mutex::new(Vec::new()));

    let parent_log = direct.clone();
    let parent_handlers = recorder
        .handle(ViewHandlers::new(), "tap")
        .on_touch(TouchPhase::Start, move |_| parent_log.lock().push("parent"));
    let parent = tree.add_view(None, parent_handlers, GestureConfig::new()).unwrap();

    let child_log = direct.clone();
    let child_handlers = recorder
        .handle(ViewHandlers::new(), "tap")
        .on_touch(TouchPhase::Start, move |_| child_log.lock().push("child"));
    let child = tree.add_view(Some(parent), child_handlers, GestureConfig::new()).unwrap();

    tree.app().set_all_blocked(true);
    start(&mut tree, child, &[(1, 0.0, 0.0)]);
    end(&mut tree, child, &[(1, 0.0, 0.0)]);

    assert_eq!(*direct.lock(), vec!["child"]);
    assert!(recorder.events().is_empty());
    assert_eq!(tree.recognizer(child, "tap").unwrap().state(), GestureState::WaitingForTouches);

    tree.app().set_all_blocked(false);
    start(&mut tree, child, &[(2, 0.0, 0.0)]);
    end(&mut tree, child, &[(2, 0.0, 0.0)]);
    assert_eq!(*direct.lock(), vec!["child", "child", "parent"]);
    assert_eq!(recorder.names(), vec!["tapEnd", "tapEnd"]);
}

#[test]
fn test_named_delegate_filters_recognizers() {
    let (_, mut tree) = tree();
    tree.app().add_delegate(
        RuleDelegate::new("tapsOnly")
            .with_rule(FnRule::new("no-pan", |recognizer, _, _| {
                (recognizer.name() == "pan").then_some(false)
            }))
            .build(),
    );

    let recorder = Recorder::new();
    let handlers = recorder.handle(recorder.handle(ViewHandlers::new(), "pan"), "tap");
    let config = GestureConfig::new()
        .with("pan", GestureOptions::new().with_delegate_name("tapsOnly"))
        .with("tap", GestureOptions::new().with_delegate_name("tapsOnly"));
    let view = tree.add_view(None, handlers, config).unwrap();

    start(&mut tree, view, &[(1, 0.0, 0.0)]);
    move_to(&mut tree, view, &[(1, 2.0, 0.0)]);
    end(&mut tree, view, &[(1, 2.0, 0.0)]);

    assert_eq!(tree.recognizer(view, "pan").unwrap().state(), GestureState::WaitingForTouches);
    assert_eq!(recorder.names(), vec!["tapEnd"]);
}

#[test]
fn test_missing_delegate_fails_preparation() {
    let (_, mut tree) = tree();
    let recorder = Recorder::new();
    let config = GestureConfig::new().with("tap", GestureOptions::new().with_delegate_name("ghost"));
    let view = tree
        .add_view(None, recorder.handle(ViewHandlers::new(), "tap"), config)
        .unwrap();

    let err = tree.dispatch(view, &TouchEvent::start(touches(&[(1, 0.0, 0.0)]))).unwrap_err();
    assert!(matches!(err, GestureError::UnknownDelegate { ref name } if name == "ghost"));
}

#[test]
fn test_enabled_binding_follows_source() {
    let (_, mut tree) = tree();
    let editing = BoolSource::new(false);
    tree.app().add_bool_source("editing", editing.clone());

    let recorder = Recorder::new();
    let config = GestureConfig::new().with("tap", GestureOptions::new().with_enabled_binding("editing"));
    let view = tree
        .add_view(None, recorder.handle(ViewHandlers::new(), "tap"), config)
        .unwrap();

    start(&mut tree, view, &[(1, 0.0, 0.0)]);
    end(&mut tree, view, &[(1, 0.0, 0.0)]);
    assert!(recorder.events().is_empty());

    editing.set(true);
    start(&mut tree, view, &[(2, 0.0, 0.0)]);
    end(&mut tree, view, &[(2, 0.0, 0.0)]);
    assert_eq!(recorder.names(), vec!["tapEnd"]);

    editing.set(false);
    assert!(!tree.recognizer(view, "tap").unwrap().is_enabled());
}

#[test]
fn test_rejected_start_rolls_back_translation() {
    let (_, mut tree) = tree();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let log = seen.clone();
    let handlers = ViewHandlers::new().on_change("pan", move |event| {
        log.lock().push(event.detail);
        false
    });
    let view = tree.add_view(None, handlers, GestureConfig::new()).unwrap();

    start(&mut tree, view, &[(1, 0.0, 0.0)]);
    move_to(&mut tree, view, &[(1, 10.0, 0.0)]);
    move_to(&mut tree, view, &[(1, 25.0, 0.0)]);

    assert_eq!(seen.lock().len(), 1);
    let pan = tree.recognizer(view, "pan").unwrap();
    assert_eq!(
        pan.detail(),
        horizon_touch::GestureDetail::Pan {
            translation: horizon_touch::Point::new(10.0, 0.0)
        }
    );
}
