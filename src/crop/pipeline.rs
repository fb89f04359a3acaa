use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use rayon::prelude::*;

use super::AnimationCropper;
use crate::catalog::ImageJob;
use crate::cli::CompressionLevel;
use crate::error::AssetError;
use crate::output::save_png;
use crate::sprite::corner::{Channels, DEFAULT_THRESHOLD, crop_to_content};
use crate::sprite::{BoundingBox, measure_animation};

/// Marker prepended to the relative path of every processed asset
pub const DEFAULT_PREFIX: &str = "processed_";

/// How a single job ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    /// Cropped output written
    Cropped(BoundingBox),
    /// Source file was never downloaded
    MissingSource,
    /// Output exists and overriding is off
    AlreadyProcessed,
    /// Still image with no content against its background
    NothingToCrop,
    /// External tool ran and reported failure
    ToolFailed(Option<i32>),
}

/// Tally of a crop batch
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CropReport {
    pub cropped: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Crops downloaded assets into their processed location
pub struct Pipeline<'a, C: AnimationCropper> {
    pub root: PathBuf,
    pub prefix: String,
    pub override_existing: bool,
    pub threshold: u8,
    pub compress: Option<CompressionLevel>,
    cropper: &'a C,
}

impl<'a, C: AnimationCropper> Pipeline<'a, C> {
    pub fn new(root: impl Into<PathBuf>, cropper: &'a C) -> Self {
        Self {
            root: root.into(),
            prefix: DEFAULT_PREFIX.to_string(),
            override_existing: false,
            threshold: DEFAULT_THRESHOLD,
            compress: None,
            cropper,
        }
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn override_existing(mut self, override_existing: bool) -> Self {
        self.override_existing = override_existing;
        self
    }

    pub fn threshold(mut self, threshold: u8) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn compress(mut self, compress: Option<CompressionLevel>) -> Self {
        self.compress = compress;
        self
    }

    /// Crop every job in parallel. Per-asset failures are logged and counted.
    pub fn run(&self, jobs: &[ImageJob]) -> CropReport {
        info!("Cropping {} assets...", jobs.len());

        let report = jobs
            .par_iter()
            .map(|job| self.process_logged(job))
            .fold(CropReport::default, tally)
            .reduce(CropReport::default, |a, b| CropReport {
                cropped: a.cropped + b.cropped,
                skipped: a.skipped + b.skipped,
                failed: a.failed + b.failed,
            });

        info!(
            "Cropped {} assets ({} skipped, {} failed)",
            report.cropped, report.skipped, report.failed
        );
        report
    }

    fn process_logged(&self, job: &ImageJob) -> Result<JobOutcome, AssetError> {
        let outcome = self.process(job);
        match &outcome {
            Ok(JobOutcome::Cropped(bounds)) => info!("{} {}", job.target(), bounds),
            Ok(JobOutcome::ToolFailed(code)) => {
                warn!("Crop tool failed on {} (exit code {:?})", job.target(), code)
            }
            Ok(other) => debug!("Skipping {}: {:?}", job.target(), other),
            Err(e) => warn!("Failed to process {}: {}", job.target(), e),
        }
        outcome
    }

    /// Crop one job according to its media kind
    pub fn process(&self, job: &ImageJob) -> Result<JobOutcome, AssetError> {
        let input = job.local_path(&self.root);
        let output = job.processed_path(&self.root, &self.prefix);

        if !input.exists() {
            return Ok(JobOutcome::MissingSource);
        }
        if !self.override_existing && output.exists() {
            return Ok(JobOutcome::AlreadyProcessed);
        }

        match job {
            ImageJob::Static(_) => self.crop_static(&input, &output),
            ImageJob::Animation(_) => self.crop_animation(&input, &output),
        }
    }

    fn crop_static(&self, input: &Path, output: &Path) -> Result<JobOutcome, AssetError> {
        let image = image::open(input).map_err(|e| AssetError::Decode {
            path: input.to_path_buf(),
            source: e,
        })?;
        let channels = Channels::for_image(&image);
        let image = image.into_rgba8();

        let Some((cropped, bounds)) = crop_to_content(&image, self.threshold, channels) else {
            return Ok(JobOutcome::NothingToCrop);
        };

        save_png(&cropped, output, self.compress)?;
        Ok(JobOutcome::Cropped(bounds))
    }

    fn crop_animation(&self, input: &Path, output: &Path) -> Result<JobOutcome, AssetError> {
        let bounds = measure_animation(input)?;
        let outcome = self.cropper.crop(input, output, bounds)?;

        if outcome.success {
            Ok(JobOutcome::Cropped(bounds))
        } else {
            Ok(JobOutcome::ToolFailed(outcome.code))
        }
    }
}

fn tally(mut report: CropReport, outcome: Result<JobOutcome, AssetError>) -> CropReport {
    match outcome {
        Ok(JobOutcome::Cropped(_)) => report.cropped += 1,
        Ok(JobOutcome::ToolFailed(_)) | Err(_) => report.failed += 1,
        Ok(_) => report.skipped += 1,
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MediaKind;
    use crate::crop::CropOutcome;
    use image::codecs::gif::GifEncoder;
    use image::{Delay, Frame, Rgb, RgbImage, Rgba, RgbaImage};
    use std::fs;
    use std::sync::Mutex;

    /// Records requested crops and writes a placeholder output
    struct RecordingCropper {
        calls: Mutex<Vec<(PathBuf, PathBuf, BoundingBox)>>,
        succeed: bool,
    }

    impl RecordingCropper {
        fn new(succeed: bool) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                succeed,
            }
        }

        fn calls(&self) -> Vec<(PathBuf, PathBuf, BoundingBox)> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl AnimationCropper for RecordingCropper {
        fn crop(
            &self,
            input: &Path,
            output: &Path,
            bounds: BoundingBox,
        ) -> Result<CropOutcome, AssetError> {
            self.calls
                .lock()
                .unwrap()
                .push((input.to_path_buf(), output.to_path_buf(), bounds));
            if self.succeed {
                crate::output::ensure_parent_dir(output)?;
                fs::write(output, b"cropped").unwrap();
            }
            Ok(CropOutcome {
                output: output.to_path_buf(),
                success: self.succeed,
                code: Some(if self.succeed { 0 } else { 1 }),
            })
        }
    }

    fn write_gif(path: &Path, frames: &[RgbaImage]) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        let file = fs::File::create(path).unwrap();
        let mut encoder = GifEncoder::new(file);
        encoder
            .encode_frames(frames.iter().map(|f| {
                Frame::from_parts(f.clone(), 0, 0, Delay::from_numer_denom_ms(80, 1))
            }))
            .unwrap();
    }

    fn sprite_frames() -> Vec<RgbaImage> {
        let mut a = RgbaImage::new(32, 32);
        let mut b = RgbaImage::new(32, 32);
        for y in 8..12 {
            for x in 6..10 {
                a.put_pixel(x, y, Rgba([255, 255, 0, 255]));
            }
        }
        for y in 20..25 {
            for x in 14..18 {
                b.put_pixel(x, y, Rgba([0, 255, 255, 255]));
            }
        }
        vec![a, b]
    }

    fn animation_job() -> ImageJob {
        ImageJob::new(
            MediaKind::Animation,
            None,
            "pixelart_front/alice.gif".to_string(),
        )
    }

    fn static_job() -> ImageJob {
        ImageJob::new(MediaKind::Static, None, "square_0/alice.png".to_string())
    }

    #[test]
    fn test_animation_crop_uses_union_box() {
        let tmp = tempfile::TempDir::new().unwrap();
        let job = animation_job();
        write_gif(&job.local_path(tmp.path()), &sprite_frames());

        let cropper = RecordingCropper::new(true);
        let pipeline = Pipeline::new(tmp.path(), &cropper);

        let outcome = pipeline.process(&job).unwrap();
        let expected = BoundingBox::new(6, 8, 18, 25);
        assert_eq!(outcome, JobOutcome::Cropped(expected));

        let calls = cropper.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, job.local_path(tmp.path()));
        assert_eq!(
            calls[0].1,
            tmp.path().join("processed_pixelart_front/alice.gif")
        );
        assert_eq!(calls[0].2, expected);
    }

    #[test]
    fn test_missing_source_is_skipped() {
        let tmp = tempfile::TempDir::new().unwrap();
        let cropper = RecordingCropper::new(true);
        let pipeline = Pipeline::new(tmp.path(), &cropper);

        assert_eq!(
            pipeline.process(&animation_job()).unwrap(),
            JobOutcome::MissingSource
        );
        assert_eq!(
            pipeline.process(&static_job()).unwrap(),
            JobOutcome::MissingSource
        );
        assert!(cropper.calls().is_empty());
    }

    #[test]
    fn test_existing_output_respects_override() {
        let tmp = tempfile::TempDir::new().unwrap();
        let job = animation_job();
        write_gif(&job.local_path(tmp.path()), &sprite_frames());
        let processed = job.processed_path(tmp.path(), DEFAULT_PREFIX);
        fs::create_dir_all(processed.parent().unwrap()).unwrap();
        fs::write(&processed, b"old").unwrap();

        let cropper = RecordingCropper::new(true);
        let pipeline = Pipeline::new(tmp.path(), &cropper);
        assert_eq!(
            pipeline.process(&job).unwrap(),
            JobOutcome::AlreadyProcessed
        );
        assert!(cropper.calls().is_empty());

        let pipeline = pipeline.override_existing(true);
        assert!(matches!(
            pipeline.process(&job).unwrap(),
            JobOutcome::Cropped(_)
        ));
        assert_eq!(cropper.calls().len(), 1);
        assert_eq!(fs::read(&processed).unwrap(), b"cropped");
    }

    #[test]
    fn test_tool_failure_is_reported() {
        let tmp = tempfile::TempDir::new().unwrap();
        let job = animation_job();
        write_gif(&job.local_path(tmp.path()), &sprite_frames());

        let cropper = RecordingCropper::new(false);
        let pipeline = Pipeline::new(tmp.path(), &cropper);

        assert_eq!(
            pipeline.process(&job).unwrap(),
            JobOutcome::ToolFailed(Some(1))
        );
    }

    #[test]
    fn test_static_crop_writes_processed_png() {
        let tmp = tempfile::TempDir::new().unwrap();
        let job = static_job();
        let input = job.local_path(tmp.path());
        fs::create_dir_all(input.parent().unwrap()).unwrap();

        let mut img = RgbImage::from_pixel(40, 30, Rgb([250, 250, 250]));
        for y in 5..25 {
            for x in 10..20 {
                img.put_pixel(x, y, Rgb([10, 10, 10]));
            }
        }
        img.save(&input).unwrap();

        let cropper = RecordingCropper::new(true);
        let pipeline = Pipeline::new(tmp.path(), &cropper).prefix("cropped_");

        assert_eq!(
            pipeline.process(&job).unwrap(),
            JobOutcome::Cropped(BoundingBox::new(10, 5, 20, 25))
        );

        let output = tmp.path().join("cropped_square_0/alice.png");
        let cropped = image::open(&output).unwrap().into_rgba8();
        assert_eq!(cropped.dimensions(), (10, 20));
        assert!(cropper.calls().is_empty());
    }

    #[test]
    fn test_transparent_static_image_ignores_invisible_colour() {
        let tmp = tempfile::TempDir::new().unwrap();
        let job = static_job();
        let input = job.local_path(tmp.path());
        fs::create_dir_all(input.parent().unwrap()).unwrap();

        let mut img = RgbaImage::new(20, 20);
        for y in 8..12 {
            for x in 8..12 {
                img.put_pixel(x, y, Rgba([120, 60, 30, 255]));
            }
        }
        img.put_pixel(19, 19, Rgba([255, 255, 255, 0]));
        img.save(&input).unwrap();

        let cropper = RecordingCropper::new(true);
        let pipeline = Pipeline::new(tmp.path(), &cropper);

        assert_eq!(
            pipeline.process(&job).unwrap(),
            JobOutcome::Cropped(BoundingBox::new(8, 8, 12, 12))
        );
        let cropped = image::open(job.processed_path(tmp.path(), DEFAULT_PREFIX))
            .unwrap()
            .into_rgba8();
        assert_eq!(cropped.dimensions(), (4, 4));
    }

    #[test]
    fn test_uniform_static_image_is_left_alone() {
        let tmp = tempfile::TempDir::new().unwrap();
        let job = static_job();
        let input = job.local_path(tmp.path());
        fs::create_dir_all(input.parent().unwrap()).unwrap();
        RgbaImage::from_pixel(8, 8, Rgba([9, 9, 9, 255]))
            .save(&input)
            .unwrap();

        let cropper = RecordingCropper::new(true);
        let pipeline = Pipeline::new(tmp.path(), &cropper);

        assert_eq!(pipeline.process(&job).unwrap(), JobOutcome::NothingToCrop);
        assert!(!job.processed_path(tmp.path(), DEFAULT_PREFIX).exists());
    }

    #[test]
    fn test_batch_continues_past_broken_asset() {
        let tmp = tempfile::TempDir::new().unwrap();
        let good = animation_job();
        write_gif(&good.local_path(tmp.path()), &sprite_frames());

        let broken = ImageJob::new(
            MediaKind::Animation,
            None,
            "pixelart_special/alice.gif".to_string(),
        );
        let broken_path = broken.local_path(tmp.path());
        fs::create_dir_all(broken_path.parent().unwrap()).unwrap();
        fs::write(&broken_path, b"GIF89a but not really").unwrap();

        let missing = ImageJob::new(
            MediaKind::Animation,
            None,
            "pixelart_front/bob.gif".to_string(),
        );

        let cropper = RecordingCropper::new(true);
        let pipeline = Pipeline::new(tmp.path(), &cropper);
        let report = pipeline.run(&[good, broken, missing]);

        assert_eq!(
            report,
            CropReport {
                cropped: 1,
                skipped: 1,
                failed: 1,
            }
        );
    }
}
