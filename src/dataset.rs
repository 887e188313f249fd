use crate::error::{SlapResult, SlapSegError};
use crate::types::{CaptureTechnology, Orientation, SlapImage, SlapKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::Read;
use std::path::PathBuf;
use tracing::{debug, info};

/// Metadata describing one image on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageMetadata {
    pub width: u16,
    pub height: u16,
    pub ppi: u16,
    pub capture_technology: CaptureTechnology,
    pub orientation: Orientation,
}

#[derive(Debug, Deserialize)]
struct ManifestRow {
    name: String,
    kind: SlapKind,
    width: u16,
    height: u16,
    ppi: u16,
    #[serde(default)]
    capture_technology: CaptureTechnology,
    orientation: Orientation,
}

/// The set of test images, grouped by kind and ordered by name.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    image_dir: PathBuf,
    entries: BTreeMap<SlapKind, BTreeMap<String, ImageMetadata>>,
}

impl Dataset {
    pub fn new(image_dir: impl Into<PathBuf>) -> Self {
        Self {
            image_dir: image_dir.into(),
            entries: BTreeMap::new(),
        }
    }

    /// Load `manifest.csv` from `image_dir`.
    pub fn load(image_dir: impl Into<PathBuf>) -> SlapResult<Self> {
        let mut dataset = Self::new(image_dir);
        let manifest = dataset.image_dir.join("manifest.csv");
        info!("📂 Loading image manifest: {}", manifest.display());

        let file = fs::File::open(&manifest).map_err(|e| {
            SlapSegError::Config(format!("Cannot open {}: {}", manifest.display(), e))
        })?;
        dataset.extend_from_reader(file)?;

        debug!(
            "Manifest holds {} images across {} kinds",
            dataset.len(),
            dataset.entries.len()
        );
        Ok(dataset)
    }

    pub fn extend_from_reader<R: Read>(&mut self, reader: R) -> SlapResult<()> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        for row in rdr.deserialize() {
            let row: ManifestRow = row?;
            let md = ImageMetadata {
                width: row.width,
                height: row.height,
                ppi: row.ppi,
                capture_technology: row.capture_technology,
                orientation: row.orientation,
            };
            if self.insert(row.kind, row.name.clone(), md).is_some() {
                return Err(SlapSegError::Config(format!(
                    "Duplicate manifest entry for {} ({})",
                    row.name, row.kind
                )));
            }
        }
        Ok(())
    }

    pub fn insert(
        &mut self,
        kind: SlapKind,
        name: impl Into<String>,
        md: ImageMetadata,
    ) -> Option<ImageMetadata> {
        self.entries.entry(kind).or_default().insert(name.into(), md)
    }

    pub fn len(&self) -> usize {
        self.entries.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Image names of `kind`, sorted.
    pub fn names(&self, kind: SlapKind) -> Vec<String> {
        self.entries
            .get(&kind)
            .map(|m| m.keys().cloned().collect())
            .unwrap_or_default()
    }

    pub fn metadata(&self, kind: SlapKind, name: &str) -> SlapResult<ImageMetadata> {
        self.entries
            .get(&kind)
            .and_then(|m| m.get(name))
            .copied()
            .ok_or_else(|| {
                SlapSegError::Config(format!("No metadata for {} image {}", kind, name))
            })
    }

    pub fn read_pixels(&self, name: &str) -> SlapResult<Vec<u8>> {
        fs::read(self.image_dir.join(name)).map_err(|source| SlapSegError::ImageRead {
            image: name.to_string(),
            source,
        })
    }

    /// Build the engine input for one image. `orientation` is withheld
    /// when the engine is asked to determine it.
    pub fn slap_image(
        &self,
        kind: SlapKind,
        name: &str,
        with_orientation: bool,
    ) -> SlapResult<SlapImage> {
        let md = self.metadata(kind, name)?;
        Ok(SlapImage {
            width: md.width,
            height: md.height,
            ppi: md.ppi,
            kind,
            capture_technology: md.capture_technology,
            orientation: with_orientation.then_some(md.orientation),
            pixels: self.read_pixels(name)?,
        })
    }
}
