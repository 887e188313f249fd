#![allow(dead_code)]

use slapseg::config::HarnessConfig;
use slapseg::dataset::Dataset;
use slapseg::engine::{OrientationOutput, SegmentOutput, SegmentationEngine};
use slapseg::error::EngineError;
use slapseg::types::{
    Orientation, ReturnCode, ReturnStatus, SlapImage, SlapKind, SubmissionIdentification,
    Supported,
};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A throwaway image directory with a manifest and an output directory.
pub struct TestContext {
    _dir: TempDir,
    pub images: PathBuf,
    pub output: PathBuf,
    rows: Vec<String>,
}

impl TestContext {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let images = dir.path().join("images");
        let output = dir.path().join("output");
        fs::create_dir_all(&images).unwrap();

        Self {
            _dir: dir,
            images,
            output,
            rows: Vec::new(),
        }
    }

    /// Add a fake 100x80 image at 500 ppi.
    pub fn add_image(&mut self, name: &str, kind: SlapKind, orientation: Orientation) -> &mut Self {
        self.add_image_sized(name, kind, orientation, 100, 80)
    }

    pub fn add_image_sized(
        &mut self,
        name: &str,
        kind: SlapKind,
        orientation: Orientation,
        width: u16,
        height: u16,
    ) -> &mut Self {
        let mut f = File::create(self.images.join(name)).unwrap();
        f.write_all(&vec![0xFFu8; usize::from(width) * usize::from(height)])
            .unwrap();
        self.rows.push(format!(
            "{},{},{},{},500,optical_tir_bright,{}",
            name, kind, width, height, orientation
        ));
        self
    }

    /// List an image in the manifest without creating its file.
    pub fn add_missing_image(&mut self, name: &str, kind: SlapKind) -> &mut Self {
        self.rows
            .push(format!("{},{},100,80,500,unknown,right", name, kind));
        self
    }

    pub fn write_manifest(&self) {
        let mut f = File::create(self.images.join("manifest.csv")).unwrap();
        writeln!(
            f,
            "name,kind,width,height,ppi,capture_technology,orientation"
        )
        .unwrap();
        for row in &self.rows {
            writeln!(f, "{}", row).unwrap();
        }
    }

    pub fn dataset(&self) -> Dataset {
        self.write_manifest();
        Dataset::load(&self.images).expect("Failed to load dataset")
    }

    pub fn config(&self, engine: &str) -> HarnessConfig {
        HarnessConfig {
            images: self.images.clone(),
            output: self.output.clone(),
            engine: engine.to_string(),
            engine_config: self.images.clone(),
        }
    }

    /// Every non-header line of every log in the output directory.
    pub fn log_lines(&self, prefix: &str) -> Vec<String> {
        let mut lines = Vec::new();
        for path in self.logs(prefix) {
            let contents = fs::read_to_string(&path).unwrap();
            lines.extend(contents.lines().skip(1).map(str::to_string));
        }
        lines
    }

    pub fn logs(&self, prefix: &str) -> Vec<PathBuf> {
        if !self.output.exists() {
            return Vec::new();
        }
        let mut logs: Vec<PathBuf> = fs::read_dir(&self.output)
            .unwrap()
            .map(|e| e.unwrap().path())
            .filter(|p| file_name(p).starts_with(prefix))
            .collect();
        logs.sort();
        logs
    }
}

pub fn file_name(path: &Path) -> String {
    path.file_name().unwrap().to_string_lossy().into_owned()
}

type SegmentFn = Box<dyn FnMut(&SlapImage) -> Result<SegmentOutput, EngineError>>;

/// Engine whose answers are supplied by the test.
pub struct ScriptedEngine {
    pub supported: Supported,
    segment: SegmentFn,
    pub orientation: Option<Orientation>,
    pub seen: Vec<SlapImage>,
}

impl ScriptedEngine {
    pub fn new(
        kinds: &[SlapKind],
        segment: impl FnMut(&SlapImage) -> Result<SegmentOutput, EngineError> + 'static,
    ) -> Self {
        Self {
            supported: Supported {
                kinds: kinds.iter().copied().collect(),
                determine_orientation: false,
            },
            segment: Box::new(segment),
            orientation: None,
            seen: Vec::new(),
        }
    }

    /// Also answer orientation requests with `orientation`.
    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.supported.determine_orientation = true;
        self.orientation = Some(orientation);
        self
    }
}

impl SegmentationEngine for ScriptedEngine {
    fn identification(&self) -> SubmissionIdentification {
        SubmissionIdentification {
            library_identifier: "scripted".to_string(),
            version: 0x0100,
            marketing_identifier: "Scripted test engine".to_string(),
        }
    }

    fn supported(&self) -> Supported {
        self.supported.clone()
    }

    fn segment(&mut self, image: &SlapImage) -> Result<SegmentOutput, EngineError> {
        self.seen.push(image.clone());
        (self.segment)(image)
    }

    fn determine_orientation(
        &mut self,
        image: &SlapImage,
    ) -> Result<OrientationOutput, EngineError> {
        self.seen.push(image.clone());
        match self.orientation {
            Some(o) => Ok((ReturnStatus::default(), o)),
            None => Ok((ReturnStatus::new(ReturnCode::NotImplemented), Orientation::Right)),
        }
    }
}
