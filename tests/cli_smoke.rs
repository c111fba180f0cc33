use std::path::PathBuf;

use showroom::{Canvas, Fps, FrameIndex, InputEvent, Script, TimedEvent};

fn showroom_exe() -> PathBuf {
    std::env::var_os("CARGO_BIN_EXE_showroom")
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            let mut p = PathBuf::from("target").join("debug");
            p.push(if cfg!(windows) {
                "showroom.exe"
            } else {
                "showroom"
            });
            p
        })
}

#[test]
fn cli_frame_writes_png() {
    let dir = PathBuf::from("target").join("cli_smoke");
    std::fs::create_dir_all(&dir).unwrap();

    let script_path = dir.join("script.json");
    let out_path = dir.join("out.png");
    let _ = std::fs::remove_file(&out_path);

    let script = Script {
        fps: Fps::new(30, 1).unwrap(),
        canvas: Canvas {
            width: 320,
            height: 180,
        },
        duration: FrameIndex(40),
        events: vec![TimedEvent {
            at_frame: FrameIndex(5),
            event: InputEvent::Next,
        }],
    };

    let f = std::fs::File::create(&script_path).unwrap();
    serde_json::to_writer_pretty(f, &script).unwrap();

    let script_arg = script_path.to_string_lossy().to_string();
    let out_arg = out_path.to_string_lossy().to_string();

    let status = std::process::Command::new(showroom_exe())
        .args(["frame", "--in", script_arg.as_str(), "--frame", "10", "--out"])
        .arg(out_arg.as_str())
        .status()
        .unwrap();

    assert!(status.success());
    assert!(out_path.exists());
}

#[test]
fn cli_script_round_trips_through_frame() {
    let dir = PathBuf::from("target").join("cli_smoke_script");
    std::fs::create_dir_all(&dir).unwrap();

    let script_path = dir.join("demo.json");
    let out_path = dir.join("demo_frame.png");
    let _ = std::fs::remove_file(&out_path);

    let script_arg = script_path.to_string_lossy().to_string();
    let status = std::process::Command::new(showroom_exe())
        .args(["script", "--out", script_arg.as_str()])
        .status()
        .unwrap();
    assert!(status.success());

    let out_arg = out_path.to_string_lossy().to_string();
    let status = std::process::Command::new(showroom_exe())
        .args(["frame", "--in", script_arg.as_str(), "--frame", "0", "--out"])
        .arg(out_arg.as_str())
        .status()
        .unwrap();
    assert!(status.success());
    assert!(out_path.exists());
}
