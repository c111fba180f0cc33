use showroom::{
    Canvas, CpuRenderer, Fps, FrameIndex, InputEvent, Script, Session, TimedEvent,
};

fn two_event_script() -> Script {
    Script {
        fps: Fps::new(30, 1).unwrap(),
        canvas: Canvas {
            width: 320,
            height: 180,
        },
        duration: FrameIndex(90),
        events: vec![
            TimedEvent {
                at_frame: FrameIndex(5),
                event: InputEvent::Next,
            },
            TimedEvent {
                at_frame: FrameIndex(40),
                event: InputEvent::OpenDetails,
            },
        ],
    }
}

#[test]
fn idle_frame_rasterizes_with_car_pixels() {
    let session = Session::new(two_event_script()).unwrap();
    let renderer = CpuRenderer::new();
    let frame = renderer.render(&session.frame_scene().unwrap()).unwrap();

    assert_eq!(frame.width, 320);
    assert_eq!(frame.height, 180);
    assert_eq!(frame.data.len(), 320 * 180 * 4);

    // The composed frame is not a flat backdrop.
    let bg = &frame.data[0..3];
    assert!(
        frame
            .data
            .chunks_exact(4)
            .any(|px| &px[0..3] != bg)
    );
}

#[test]
fn mid_slide_and_details_frames_rasterize() {
    let mut session = Session::new(two_event_script()).unwrap();
    let renderer = CpuRenderer::new();

    session.advance_to(FrameIndex(12)).unwrap();
    let mid_slide = renderer.render(&session.frame_scene().unwrap()).unwrap();
    assert_eq!(mid_slide.data.len(), 320 * 180 * 4);

    session.advance_to(FrameIndex(60)).unwrap();
    let details = renderer.render(&session.frame_scene().unwrap()).unwrap();
    assert_eq!(details.data.len(), 320 * 180 * 4);
}
