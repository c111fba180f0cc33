use std::path::Path;

use anyhow::Context as _;

use crate::{
    core::Color,
    error::{ShowroomError, ShowroomResult},
};

/// One car as it appears in a catalog. Display fields are opaque strings;
/// the two colors drive the body gradient of the rendered illustration.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CarRecord {
    pub id: u32,
    pub make: String,
    pub model_code: String,
    pub tagline: String,
    pub price: String,
    pub engine: String,
    pub speed: String,
    pub description: String,
    pub body: Color,
    pub accent: Color,
}

/// The two built-in catalogs. Mutually exclusive; switching discards the
/// active carousel entirely.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Category {
    Collection,
    Master,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Collection => write!(f, "collection"),
            Self::Master => write!(f, "master"),
        }
    }
}

/// Named ordered list of car records. Order is significant: it defines the
/// navigation sequence and is fixed at load time.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Catalog {
    pub name: String,
    pub cars: Vec<CarRecord>,
}

impl Catalog {
    /// Empty catalogs would make the modulo index arithmetic ill-defined, so
    /// they are rejected here rather than handled anywhere downstream.
    pub fn validate(&self) -> ShowroomResult<()> {
        if self.cars.is_empty() {
            return Err(ShowroomError::validation(format!(
                "catalog '{}' must contain at least one car",
                self.name
            )));
        }
        let mut seen = std::collections::BTreeSet::new();
        for car in &self.cars {
            if !seen.insert(car.id) {
                return Err(ShowroomError::validation(format!(
                    "catalog '{}' has duplicate car id {}",
                    self.name, car.id
                )));
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.cars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cars.is_empty()
    }

    pub fn get(&self, index: usize) -> ShowroomResult<&CarRecord> {
        self.cars.get(index).ok_or_else(|| {
            ShowroomError::validation(format!(
                "index {index} out of range for catalog '{}' (len {})",
                self.name,
                self.cars.len()
            ))
        })
    }

    /// Wrap an unbounded step target back into `[0, len)`.
    pub fn wrap(&self, index: isize) -> usize {
        let len = self.cars.len() as isize;
        index.rem_euclid(len) as usize
    }

    pub fn from_json_path(path: &Path) -> ShowroomResult<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("read catalog '{}'", path.display()))?;
        let catalog: Self =
            serde_json::from_slice(&bytes).with_context(|| "parse catalog JSON")?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn builtin(category: Category) -> Self {
        match category {
            Category::Collection => collection(),
            Category::Master => master(),
        }
    }
}

fn car(
    id: u32,
    make: &str,
    model_code: &str,
    tagline: &str,
    body: Color,
    accent: Color,
    price: &str,
    engine: &str,
    speed: &str,
    description: &str,
) -> CarRecord {
    CarRecord {
        id,
        make: make.to_string(),
        model_code: model_code.to_string(),
        tagline: tagline.to_string(),
        price: price.to_string(),
        engine: engine.to_string(),
        speed: speed.to_string(),
        description: description.to_string(),
        body,
        accent,
    }
}

fn collection() -> Catalog {
    Catalog {
        name: "collection".to_string(),
        cars: vec![
            car(
                1,
                "FERRARI",
                "458",
                "Pure Italian Excellence",
                Color::rgb(0xdc, 0x26, 0x26),
                Color::rgb(0x99, 0x1b, 0x1b),
                "$280,000",
                "4.5L V8",
                "0-60 3.0s",
                "The last naturally aspirated V8. Razor-sharp handling meets iconic \
                 Italian styling in a symphony of speed.",
            ),
            car(
                2,
                "PORSCHE",
                "911",
                "Timeless Machine",
                Color::rgb(0xea, 0xb3, 0x08),
                Color::rgb(0xa1, 0x62, 0x07),
                "$140,000",
                "3.0L Twin-Turbo",
                "0-60 3.2s",
                "The benchmark for sports cars. Perfectly balanced engineering designed \
                 for both the track and the daily drive.",
            ),
            car(
                3,
                "LAMBO",
                "SVJ",
                "Raging Bull",
                Color::rgb(0x22, 0xc5, 0x5e),
                Color::rgb(0x15, 0x80, 0x3d),
                "$517,000",
                "6.5L V12",
                "0-60 2.8s",
                "Aerodinamica Lamborghini Attiva. A brutal expression of power and \
                 aggressive aerodynamics.",
            ),
            car(
                4,
                "TESLA",
                "P100",
                "Electric Future",
                Color::rgb(0x3b, 0x82, 0xf6),
                Color::rgb(0x1e, 0x3a, 0x8a),
                "$110,000",
                "Dual Electric",
                "0-60 1.99s",
                "Instant torque and silent speed. The future of automotive performance \
                 with cutting-edge autopilot tech.",
            ),
        ],
    }
}

fn master() -> Catalog {
    Catalog {
        name: "master".to_string(),
        cars: vec![
            car(
                101,
                "MCLAREN",
                "720S",
                "Relentless Performance",
                Color::rgb(0xf9, 0x73, 0x16),
                Color::rgb(0xc2, 0x41, 0x0c),
                "$310,000",
                "4.0L V8 Twin-Turbo",
                "0-60 2.8s",
                "A force of nature. Built around a carbon fibre Monocage II, offering \
                 extreme lightness and incredible strength.",
            ),
            car(
                102,
                "BUGATTI",
                "CHIRON",
                "Breaking Limits",
                Color::rgb(0x25, 0x63, 0xeb),
                Color::rgb(0x1e, 0x40, 0xaf),
                "$3,000,000",
                "8.0L W16 Quad-Turbo",
                "0-60 2.3s",
                "The fastest, most powerful, and exclusive production super sports car \
                 in BUGATTI's history.",
            ),
            car(
                103,
                "ASTON",
                "VALKYRIE",
                "F1 for the Road",
                Color::rgb(0x14, 0xb8, 0xa6),
                Color::rgb(0x0f, 0x76, 0x6e),
                "$3,200,000",
                "6.5L V12 Hybrid",
                "0-60 2.5s",
                "An incredibly special car with an otherworldly performance, developed \
                 in partnership with Red Bull Racing.",
            ),
            car(
                104,
                "KOENIGSEGG",
                "JESKO",
                "Megacar",
                Color::rgb(0xe5, 0xe7, 0xeb),
                Color::rgb(0x9c, 0xa3, 0xaf),
                "$3,000,000",
                "5.0L V8 Twin-Turbo",
                "0-60 2.5s",
                "The ultimate track weapon. Features the world's lightest V8 crankshaft \
                 and a 9-speed Light Speed Transmission.",
            ),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalogs_are_valid() {
        for category in [Category::Collection, Category::Master] {
            let catalog = Catalog::builtin(category);
            catalog.validate().unwrap();
            assert_eq!(catalog.len(), 4);
        }
    }

    #[test]
    fn builtin_ids_are_unique_within_each_list() {
        let ids: Vec<u32> = Catalog::builtin(Category::Master)
            .cars
            .iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(ids, vec![101, 102, 103, 104]);
    }

    #[test]
    fn validate_rejects_empty_catalog() {
        let catalog = Catalog {
            name: "empty".to_string(),
            cars: vec![],
        };
        assert!(catalog.validate().is_err());
    }

    #[test]
    fn validate_rejects_duplicate_ids() {
        let mut catalog = Catalog::builtin(Category::Collection);
        catalog.cars[1].id = catalog.cars[0].id;
        assert!(catalog.validate().is_err());
    }

    #[test]
    fn wrap_handles_both_ends() {
        let catalog = Catalog::builtin(Category::Collection);
        assert_eq!(catalog.wrap(4), 0);
        assert_eq!(catalog.wrap(-1), 3);
        assert_eq!(catalog.wrap(2), 2);
    }

    #[test]
    fn get_rejects_out_of_range() {
        let catalog = Catalog::builtin(Category::Collection);
        assert!(catalog.get(3).is_ok());
        assert!(catalog.get(4).is_err());
    }

    #[test]
    fn json_roundtrip_preserves_colors() {
        let catalog = Catalog::builtin(Category::Collection);
        let s = serde_json::to_string_pretty(&catalog).unwrap();
        assert!(s.contains("\"#dc2626\""));
        let de: Catalog = serde_json::from_str(&s).unwrap();
        assert_eq!(de.cars, catalog.cars);
    }

    #[test]
    fn from_json_path_validates_what_it_loads() {
        let dir = std::path::PathBuf::from("target").join("catalog_tests");
        std::fs::create_dir_all(&dir).unwrap();

        let good = dir.join("good.json");
        std::fs::write(
            &good,
            serde_json::to_vec(&Catalog::builtin(Category::Master)).unwrap(),
        )
        .unwrap();
        let loaded = Catalog::from_json_path(&good).unwrap();
        assert_eq!(loaded.len(), 4);

        let bad = dir.join("bad.json");
        std::fs::write(&bad, br#"{"name":"empty","cars":[]}"#).unwrap();
        assert!(Catalog::from_json_path(&bad).is_err());
    }
}
