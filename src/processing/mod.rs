pub mod classify;
pub mod palette;
pub mod raster;
pub mod smooth;
pub mod svg;
pub mod trace;
pub mod vectorize;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use walkdir::WalkDir;

use crate::annotation::{Annotation, Annotator};
use crate::archive::ArchivePackager;
use crate::cli::OutputFormat;
use crate::utils::{create_output_filename, has_valid_extension, verbose_println, warn_println};

#[derive(Debug, Clone)]
pub struct ProcessingConfig {
    pub format: OutputFormat,
    pub color_count: usize,
    pub scale: f32,
    pub quality: f32,
    pub extensions: Vec<String>,
    pub verbose: bool,
}

/// Drives a batch of conversions.
///
/// Items are processed strictly one at a time, in submission order. This is
/// deliberate: it bounds peak memory and CPU contention in constrained
/// hosts, and every item owns its pixel buffer, palette, and label map
/// exclusively until they are dropped at the end of its iteration.
pub struct ProcessingEngine {
    config: ProcessingConfig,
    annotator: Option<Box<dyn Annotator>>,
}

/// Outcome of one queue item.
#[derive(Debug)]
pub struct ItemReport {
    pub input_path: PathBuf,
    pub status: ItemStatus,
    pub elapsed: Duration,
}

#[derive(Debug)]
pub enum ItemStatus {
    Converted {
        output_path: PathBuf,
        output_bytes: u64,
        annotation: Option<Annotation>,
    },
    Failed {
        error: String,
    },
}

impl ItemReport {
    pub fn succeeded(&self) -> bool {
        matches!(self.status, ItemStatus::Converted { .. })
    }
}

struct ConvertedItem {
    output_path: PathBuf,
    output_bytes: u64,
    annotation: Option<Annotation>,
}

impl ProcessingEngine {
    pub fn new(config: ProcessingConfig) -> Self {
        Self {
            config,
            annotator: None,
        }
    }

    /// Install the external annotation collaborator. Without one, items
    /// simply carry no annotation.
    pub fn with_annotator(mut self, annotator: Box<dyn Annotator>) -> Self {
        self.annotator = Some(annotator);
        self
    }

    /// Discover all matching image files in the given files or directories.
    pub fn discover_images(&self, input_paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
        let mut image_files = Vec::new();

        for input_path in input_paths {
            if input_path.is_file() {
                if has_valid_extension(input_path, &self.config.extensions) {
                    image_files.push(input_path.clone());
                }
                continue;
            }

            verbose_println(
                self.config.verbose,
                &format!("Scanning directory: {}", input_path.display()),
            );

            let walker = WalkDir::new(input_path).follow_links(false).max_depth(10);

            for entry in walker {
                let entry = entry.context("Failed to read directory entry")?;
                let path = entry.path();

                if path.is_file() && has_valid_extension(path, &self.config.extensions) {
                    image_files.push(path.to_path_buf());
                }
            }
        }

        // Sort for consistent processing order.
        image_files.sort();

        verbose_println(
            self.config.verbose,
            &format!("Found {} image files", image_files.len()),
        );
        Ok(image_files)
    }

    /// Process a batch of images sequentially with a per-item callback.
    ///
    /// Every per-item failure is caught at the item boundary and turned
    /// into a failed report; the queue always runs to the end. Partial
    /// success is a normal terminal state, not an overall failure.
    pub fn process_batch<F>(
        &self,
        image_files: &[PathBuf],
        output_dir: &Path,
        progress_callback: F,
    ) -> Vec<ItemReport>
    where
        F: Fn(usize, &ItemReport),
    {
        let mut reports = Vec::with_capacity(image_files.len());

        for (index, input_path) in image_files.iter().enumerate() {
            let started = Instant::now();

            let status = match self.process_single_image(input_path, output_dir) {
                Ok(item) => ItemStatus::Converted {
                    output_path: item.output_path,
                    output_bytes: item.output_bytes,
                    annotation: item.annotation,
                },
                Err(error) => ItemStatus::Failed {
                    error: format!("{:#}", error),
                },
            };

            let report = ItemReport {
                input_path: input_path.clone(),
                status,
                elapsed: started.elapsed(),
            };

            progress_callback(index + 1, &report);
            reports.push(report);
        }

        reports
    }

    /// Process a single image file.
    fn process_single_image(&self, input_path: &Path, output_dir: &Path) -> Result<ConvertedItem> {
        verbose_println(
            self.config.verbose,
            &format!("Processing: {}", input_path.display()),
        );

        // Load and decode the image.
        let img = image::open(input_path)
            .with_context(|| format!("Failed to open image: {}", input_path.display()))?
            .to_rgba8();

        let bytes = self.convert(&img)?;

        let filename = create_output_filename(input_path, self.config.format.extension());
        let output_path = output_dir.join(filename);

        std::fs::write(&output_path, &bytes)
            .with_context(|| format!("Failed to write output: {}", output_path.display()))?;

        // Optional annotation step, awaited as part of this item.
        let annotation = self.annotate_output(input_path, &bytes);

        Ok(ConvertedItem {
            output_path,
            output_bytes: bytes.len() as u64,
            annotation,
        })
    }

    /// Run the configured conversion on a decoded pixel buffer.
    fn convert(&self, img: &image::RgbaImage) -> Result<Vec<u8>> {
        let scaled = raster::resize_scaled(img, self.config.scale)?;

        if self.config.format.is_vector() {
            // The dimension clamp bounds tracer runtime and applies only
            // to the vector path.
            let clamped = raster::clamp_for_tracing(&scaled)?;
            Ok(vectorize::vectorize(&clamped, self.config.color_count).into_bytes())
        } else {
            raster::encode(&scaled, self.config.format, self.config.quality)
        }
    }

    /// Call the annotation collaborator, swallowing any failure.
    fn annotate_output(&self, input_path: &Path, output_bytes: &[u8]) -> Option<Annotation> {
        let annotator = self.annotator.as_ref()?;

        match annotator.annotate(output_bytes, self.config.format.media_type()) {
            Ok(annotation) => Some(annotation),
            Err(error) => {
                if self.config.verbose {
                    warn_println(&format!(
                        "Annotation failed for {}: {:#}",
                        input_path.display(),
                        error
                    ));
                }
                None
            }
        }
    }

    /// Hand the successful items' outputs to the external archive
    /// packager as a filename-to-bytes mapping.
    pub fn package_outputs(
        &self,
        reports: &[ItemReport],
        packager: &dyn ArchivePackager,
    ) -> Result<Vec<u8>> {
        let mut entries = Vec::new();

        for report in reports {
            if let ItemStatus::Converted { output_path, .. } = &report.status {
                let bytes = std::fs::read(output_path)
                    .with_context(|| format!("Failed to read output: {}", output_path.display()))?;
                let name = output_path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or("output")
                    .to_string();
                entries.push((name, bytes));
            }
        }

        packager.package(&entries)
    }
}
