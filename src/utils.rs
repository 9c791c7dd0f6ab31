use anyhow::Result;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Duration;

use crate::cli::Args;
use crate::processing::palette::{MAX_COLORS, MIN_COLORS};
use crate::processing::raster::{MAX_QUALITY, MIN_QUALITY};

/// Create a styled progress bar
pub fn create_progress_bar(total: u64) -> ProgressBar {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.blue} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} {msg} ({eta})",
        )
        .unwrap()
        .progress_chars("#>-"),
    );
    pb
}

/// Format duration in a human-readable way
pub fn format_duration(duration: Duration) -> String {
    let total_secs = duration.as_secs();
    let millis = duration.subsec_millis();

    if total_secs >= 60 {
        let mins = total_secs / 60;
        let secs = total_secs % 60;
        format!("{}m {}s", mins, secs)
    } else if total_secs > 0 {
        format!("{}.{:03}s", total_secs, millis)
    } else {
        format!("{}ms", duration.as_millis())
    }
}

/// Validate command line arguments
pub fn validate_inputs(args: &Args) -> Result<()> {
    if args.input_paths.is_empty() {
        return Err(anyhow::anyhow!(
            "No input paths given (use -i or a config file)"
        ));
    }

    for input_path in &args.input_paths {
        if !input_path.exists() {
            return Err(anyhow::anyhow!(
                "Input path does not exist: {}",
                input_path.display()
            ));
        }
        if !input_path.is_dir() && !input_path.is_file() {
            return Err(anyhow::anyhow!(
                "Input path is neither a file nor a directory: {}",
                input_path.display()
            ));
        }
    }

    if !(MIN_COLORS..=MAX_COLORS).contains(&args.colors) {
        return Err(anyhow::anyhow!(
            "Color count must be between {} and {}, got: {}",
            MIN_COLORS,
            MAX_COLORS,
            args.colors
        ));
    }

    if !(MIN_QUALITY..=MAX_QUALITY).contains(&args.quality) {
        return Err(anyhow::anyhow!(
            "Quality must be between {} and {}, got: {}",
            MIN_QUALITY,
            MAX_QUALITY,
            args.quality
        ));
    }

    if !args.scale.is_finite() || args.scale <= 0.0 || args.scale > 10.0 {
        return Err(anyhow::anyhow!(
            "Scale must be a factor in (0, 10], got: {}",
            args.scale
        ));
    }

    if args.extensions().is_empty() {
        return Err(anyhow::anyhow!("No valid extensions specified"));
    }

    Ok(())
}

/// Get file extension in lowercase
pub fn get_file_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}

/// Check if a file has one of the specified extensions
pub fn has_valid_extension(path: &Path, extensions: &[String]) -> bool {
    if let Some(ext) = get_file_extension(path) {
        extensions.contains(&ext)
    } else {
        false
    }
}

/// Derive the output filename from the input path:
/// `<originalBaseName>_converted.<extension>`.
pub fn create_output_filename(input_path: &Path, extension: &str) -> String {
    let stem = input_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("image");

    format!("{}_converted.{}", stem, extension)
}

/// Print verbose information if verbose mode is enabled
pub fn verbose_println(verbose: bool, message: &str) {
    if verbose {
        println!("{} {}", style("[VERBOSE]").dim(), message);
    }
}

/// Print warning message
pub fn warn_println(message: &str) {
    println!("{} {}", style("[WARNING]").yellow().bold(), message);
}

/// Print error message
pub fn error_println(message: &str) {
    eprintln!("{} {}", style("[ERROR]").red().bold(), message);
}
