use std::{
    io::Write as _,
    path::PathBuf,
    process::{Child, ChildStdin, Command, Stdio},
};

use crate::{
    core::Color,
    error::{ShowroomError, ShowroomResult},
    render::FrameRgba,
    session::Script,
};

#[derive(Clone, Debug)]
pub struct EncodeConfig {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    pub out_path: PathBuf,
    pub overwrite: bool,
}

impl EncodeConfig {
    /// Encoding parameters for a whole scripted run: the script's canvas and
    /// its fps rounded to an integer frame rate.
    pub fn for_script(script: &Script, out_path: PathBuf, overwrite: bool) -> Self {
        Self {
            width: script.canvas.width,
            height: script.canvas.height,
            fps: (script.fps.as_f64().round() as u32).max(1),
            out_path,
            overwrite,
        }
    }

    pub fn validate(&self) -> ShowroomResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(ShowroomError::validation(
                "encode width/height must be non-zero",
            ));
        }
        if self.fps == 0 {
            return Err(ShowroomError::validation("encode fps must be non-zero"));
        }
        if !self.width.is_multiple_of(2) || !self.height.is_multiple_of(2) {
            // yuv420p subsamples chroma, so odd dimensions cannot encode.
            return Err(ShowroomError::validation(
                "encode width/height must be even (required for yuv420p mp4 output)",
            ));
        }
        Ok(())
    }

    fn frame_bytes(&self) -> usize {
        (self.width as usize) * (self.height as usize) * 4
    }
}

pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// MP4 sink for rendered showroom frames: streams rawvideo RGBA into a
/// system `ffmpeg` process encoding libx264 yuv420p. Frames arrive
/// premultiplied from the rasterizer and are flattened over the showroom
/// backdrop before they hit the pipe, since the container has no alpha.
///
/// Spawning the `ffmpeg` binary keeps the build free of native FFmpeg
/// headers and libraries.
pub struct FfmpegEncoder {
    cfg: EncodeConfig,
    backdrop: Color,
    child: Child,
    stdin: Option<ChildStdin>,
    scratch: Vec<u8>,
}

impl FfmpegEncoder {
    pub fn new(cfg: EncodeConfig, backdrop: Color) -> ShowroomResult<Self> {
        cfg.validate()?;

        if let Some(parent) = cfg.out_path.parent() {
            use anyhow::Context as _;
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to create output directory '{}'", parent.display())
            })?;
        }
        if !cfg.overwrite && cfg.out_path.exists() {
            return Err(ShowroomError::validation(format!(
                "output file '{}' already exists",
                cfg.out_path.display()
            )));
        }
        if !is_ffmpeg_on_path() {
            return Err(ShowroomError::render(
                "ffmpeg is required for MP4 encoding, but was not found on PATH",
            ));
        }

        let mut child = Command::new("ffmpeg")
            .arg(if cfg.overwrite { "-y" } else { "-n" })
            .args(["-loglevel", "error"])
            .args(["-f", "rawvideo", "-pix_fmt", "rgba"])
            .args(["-s", &format!("{}x{}", cfg.width, cfg.height)])
            .args(["-r", &cfg.fps.to_string()])
            .args(["-i", "pipe:0", "-an"])
            .args(["-c:v", "libx264", "-pix_fmt", "yuv420p"])
            .args(["-movflags", "+faststart"])
            .arg(&cfg.out_path)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                ShowroomError::render(format!(
                    "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
                ))
            })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| ShowroomError::render("failed to open ffmpeg stdin (unexpected)"))?;

        Ok(Self {
            scratch: vec![0u8; cfg.frame_bytes()],
            cfg,
            backdrop,
            child,
            stdin: Some(stdin),
        })
    }

    pub fn encode_frame(&mut self, frame: &FrameRgba) -> ShowroomResult<()> {
        if frame.width != self.cfg.width || frame.height != self.cfg.height {
            return Err(ShowroomError::validation(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, self.cfg.width, self.cfg.height
            )));
        }
        if frame.data.len() != self.scratch.len() {
            return Err(ShowroomError::validation(
                "frame.data size mismatch with width*height*4",
            ));
        }
        if !frame.premultiplied {
            // The rasterizer only hands out premultiplied frames; anything
            // else reaching the encoder is a pipeline bug.
            return Err(ShowroomError::render(
                "encoder expects premultiplied RGBA frames",
            ));
        }

        flatten_premultiplied(&mut self.scratch, &frame.data, self.backdrop);

        let Some(stdin) = self.stdin.as_mut() else {
            return Err(ShowroomError::render("ffmpeg encoder is already finalized"));
        };
        stdin.write_all(&self.scratch).map_err(|e| {
            ShowroomError::render(format!("failed to write frame to ffmpeg stdin: {e}"))
        })?;
        Ok(())
    }

    pub fn finish(mut self) -> ShowroomResult<()> {
        drop(self.stdin.take());

        let output = self.child.wait_with_output().map_err(|e| {
            ShowroomError::render(format!("failed to wait for ffmpeg to finish: {e}"))
        })?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ShowroomError::render(format!(
                "ffmpeg exited with status {}: {}",
                output.status,
                stderr.trim()
            )));
        }
        Ok(())
    }
}

/// Composite premultiplied RGBA over an opaque backdrop color. Premultiplied
/// source makes this a single multiply-add per channel:
/// `out = src + backdrop * (1 - alpha)`.
fn flatten_premultiplied(dst: &mut [u8], src: &[u8], backdrop: Color) {
    debug_assert_eq!(dst.len(), src.len());

    let bg = [
        u32::from(backdrop.r),
        u32::from(backdrop.g),
        u32::from(backdrop.b),
    ];

    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let a = u32::from(s[3]);
        if a == 255 {
            d[..3].copy_from_slice(&s[..3]);
        } else {
            let inv = 255 - a;
            for c in 0..3 {
                let v = u32::from(s[c]) + (bg[c] * inv + 127) / 255;
                d[c] = v.min(255) as u8;
            }
        }
        d[3] = 255;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Canvas, Fps, FrameIndex};

    fn cfg(width: u32, height: u32, fps: u32) -> EncodeConfig {
        EncodeConfig {
            width,
            height,
            fps,
            out_path: PathBuf::from("target").join("encode_tests").join("out.mp4"),
            overwrite: true,
        }
    }

    #[test]
    fn validate_rejects_zero_odd_and_unpaced() {
        assert!(cfg(0, 10, 30).validate().is_err());
        assert!(cfg(11, 10, 30).validate().is_err());
        assert!(cfg(10, 11, 30).validate().is_err());
        assert!(cfg(10, 10, 0).validate().is_err());
        assert!(cfg(10, 10, 30).validate().is_ok());
    }

    #[test]
    fn for_script_takes_canvas_and_rounds_fps() {
        let script = Script {
            fps: Fps::new(30000, 1001).unwrap(),
            canvas: Canvas {
                width: 1280,
                height: 720,
            },
            duration: FrameIndex(10),
            events: vec![],
        };
        let cfg = EncodeConfig::for_script(&script, PathBuf::from("out.mp4"), true);
        assert_eq!((cfg.width, cfg.height), (1280, 720));
        assert_eq!(cfg.fps, 30); // 29.97 rounds to 30
        cfg.validate().unwrap();
    }

    #[test]
    fn flatten_keeps_opaque_pixels_and_fills_transparent_with_backdrop() {
        let backdrop = Color::rgb(0x38, 0x38, 0x38);
        let src = [255u8, 0, 0, 255, 0, 0, 0, 0];
        let mut dst = [0u8; 8];
        flatten_premultiplied(&mut dst, &src, backdrop);
        assert_eq!(&dst[..4], &[255, 0, 0, 255]);
        assert_eq!(&dst[4..], &[0x38, 0x38, 0x38, 255]);
    }

    #[test]
    fn flatten_blends_half_covered_pixels() {
        // Premultiplied half-alpha white over black: src channel 128 stays.
        let src = [128u8, 128, 128, 128];
        let mut dst = [0u8; 4];
        flatten_premultiplied(&mut dst, &src, Color::rgb(0, 0, 0));
        assert_eq!(dst, [128, 128, 128, 255]);

        // Same pixel over white picks up the uncovered half of the backdrop.
        flatten_premultiplied(&mut dst, &src, Color::rgb(255, 255, 255));
        assert_eq!(dst, [192, 192, 192, 255]);
    }
}
