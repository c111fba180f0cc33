use showroom::{
    Canvas, Category, Fps, FrameIndex, InputEvent, Script, Session, TimedEvent,
};

fn script(duration: u64, events: Vec<(u64, InputEvent)>) -> Script {
    Script {
        fps: Fps::new(30, 1).unwrap(),
        canvas: Canvas {
            width: 640,
            height: 360,
        },
        duration: FrameIndex(duration),
        events: events
            .into_iter()
            .map(|(at, event)| TimedEvent {
                at_frame: FrameIndex(at),
                event,
            })
            .collect(),
    }
}

#[test]
fn next_then_prev_round_trips_once_transitions_complete() {
    let mut session = Session::new(script(
        300,
        vec![(10, InputEvent::Next), (60, InputEvent::Prev)],
    ))
    .unwrap();

    session.advance_to(FrameIndex(299)).unwrap();
    let carousel = session.showroom().carousel();
    assert_eq!(carousel.current_index(), 0);
    assert!(!carousel.is_animating());
}

#[test]
fn wrapping_navigation_full_cycle() {
    // Four nexts from index 0 wrap back to 0 on a four-car catalog.
    let events = (0..4).map(|i| (i * 40, InputEvent::Next)).collect();
    let mut session = Session::new(script(400, events)).unwrap();
    session.advance_to(FrameIndex(399)).unwrap();
    assert_eq!(session.showroom().carousel().current_index(), 0);
}

#[test]
fn prev_from_zero_wraps_to_last() {
    let mut session = Session::new(script(100, vec![(5, InputEvent::Prev)])).unwrap();
    session.advance_to(FrameIndex(99)).unwrap();
    assert_eq!(session.showroom().carousel().current_index(), 3);
}

#[test]
fn details_scenario_from_index_two() {
    let mut session = Session::new(script(
        500,
        vec![
            (0, InputEvent::Next),
            (30, InputEvent::Next),
            (80, InputEvent::OpenDetails),
            (120, InputEvent::Next), // must be ignored
            (200, InputEvent::CloseDetails),
        ],
    ))
    .unwrap();

    session.advance_to(FrameIndex(150)).unwrap();
    let carousel = session.showroom().carousel();
    assert_eq!(carousel.current_index(), 2);
    assert!(carousel.details_open());

    session.advance_to(FrameIndex(499)).unwrap();
    let carousel = session.showroom().carousel();
    assert_eq!(carousel.current_index(), 2);
    assert!(!carousel.details_open());
    assert!(!carousel.is_animating());
}

#[test]
fn demo_script_runs_to_the_end() {
    let demo = Script::demo();
    let last = FrameIndex(demo.duration.0 - 1);
    let mut session = Session::new(demo).unwrap();
    session.advance_to(last).unwrap();

    // The demo ends in the master catalog, one next past the remount.
    assert_eq!(session.showroom().category(), Category::Master);
    assert_eq!(session.showroom().carousel().current_index(), 1);
    assert!(!session.showroom().carousel().is_animating());

    let scene = session.frame_scene().unwrap();
    assert!(!scene.nodes.is_empty());
}

#[test]
fn every_demo_frame_composes() {
    let demo = Script::demo();
    let duration = demo.duration.0;
    let mut session = Session::new(demo).unwrap();
    for f in 0..duration {
        session.advance_to(FrameIndex(f)).unwrap();
        session.frame_scene().unwrap();
    }
}
