use crate::error::{ShowroomError, ShowroomResult};

pub use kurbo::{Affine, BezPath, Point, Rect};

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FrameRange {
    pub start: FrameIndex,
    pub end: FrameIndex, // exclusive
}

impl FrameRange {
    pub fn new(start: FrameIndex, end: FrameIndex) -> ShowroomResult<Self> {
        if start.0 > end.0 {
            return Err(ShowroomError::validation("FrameRange start must be <= end"));
        }
        Ok(Self { start, end })
    }

    pub fn len_frames(self) -> u64 {
        self.end.0.saturating_sub(self.start.0)
    }

    pub fn is_empty(self) -> bool {
        self.start.0 == self.end.0
    }

    pub fn contains(self, f: FrameIndex) -> bool {
        self.start.0 <= f.0 && f.0 < self.end.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    pub num: u32,
    pub den: u32, // must be > 0
}

impl Fps {
    pub fn new(num: u32, den: u32) -> ShowroomResult<Self> {
        if den == 0 {
            return Err(ShowroomError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(ShowroomError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Nearest-frame conversion, used when turning second-denominated tween
    /// durations into frame ranges. Always at least 1 for positive input so a
    /// declared tween never collapses to an empty range.
    pub fn secs_to_frames_round(self, secs: f64) -> u64 {
        let f = (secs * self.as_f64()).round().max(0.0) as u64;
        if secs > 0.0 { f.max(1) } else { f }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

/// sRGB color, serialized as a `#rrggbb` hex string.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn from_hex(s: &str) -> ShowroomResult<Self> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(ShowroomError::validation(format!(
                "color must be '#rrggbb', got '{s}'"
            )));
        }
        let byte = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| {
                ShowroomError::validation(format!("color must be '#rrggbb', got '{s}'"))
            })
        };
        Ok(Self {
            r: byte(0..2)?,
            g: byte(2..4)?,
            b: byte(4..6)?,
        })
    }

    pub fn hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl serde::Serialize for Color {
    fn serialize<S: serde::Serializer>(&self, ser: S) -> Result<S::Ok, S::Error> {
        ser.serialize_str(&self.hex())
    }
}

impl<'de> serde::Deserialize<'de> for Color {
    fn deserialize<D: serde::Deserializer<'de>>(de: D) -> Result<Self, D::Error> {
        let s = String::deserialize(de)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_range_contains_boundaries() {
        let r = FrameRange::new(FrameIndex(2), FrameIndex(5)).unwrap();
        assert!(!r.contains(FrameIndex(1)));
        assert!(r.contains(FrameIndex(2)));
        assert!(r.contains(FrameIndex(4)));
        assert!(!r.contains(FrameIndex(5)));
    }

    #[test]
    fn secs_to_frames_round_never_collapses_positive_durations() {
        let fps = Fps::new(30, 1).unwrap();
        assert_eq!(fps.secs_to_frames_round(0.7), 21);
        assert_eq!(fps.secs_to_frames_round(0.001), 1);
        assert_eq!(fps.secs_to_frames_round(0.0), 0);
    }

    #[test]
    fn color_hex_roundtrip() {
        let c = Color::from_hex("#dc2626").unwrap();
        assert_eq!(c, Color::rgb(0xdc, 0x26, 0x26));
        assert_eq!(c.hex(), "#dc2626");
        assert!(Color::from_hex("dc26").is_err());
        assert!(Color::from_hex("#zzzzzz").is_err());
    }

    #[test]
    fn color_serde_uses_hex_strings() {
        let c: Color = serde_json::from_str("\"#3b82f6\"").unwrap();
        assert_eq!(serde_json::to_string(&c).unwrap(), "\"#3b82f6\"");
    }

}
