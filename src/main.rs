use anyhow::Result;
use clap::Parser;
use console::style;
use std::time::Instant;

mod annotation;
mod archive;
mod cli;
mod config_file;
mod processing;
mod report;
mod utils;

use cli::Args;
use processing::{ProcessingConfig, ProcessingEngine};
use report::{print_summary_table, JsonMessage};
use utils::{create_progress_bar, error_println, format_duration, validate_inputs};

fn main() -> Result<()> {
    let start_time = Instant::now();
    let mut args = Args::parse();

    args.load_and_merge_config()?;
    validate_inputs(&args)?;

    if !args.json {
        println!("{}", style("rastervec - Batch Image Converter").bold().blue());
        println!();
    }

    let config = ProcessingConfig {
        format: args.format,
        color_count: args.colors,
        scale: args.scale,
        quality: args.quality,
        extensions: args.extensions(),
        verbose: args.verbose && !args.json,
    };

    if config.verbose {
        println!("{}", style("Configuration:").bold());
        println!("  Format: {}", config.format);
        println!("  Colors: {}", config.color_count);
        println!("  Scale: {}", config.scale);
        println!("  Quality: {}", config.quality);
        println!("  Extensions: {:?}", config.extensions);
        println!("  Output dir: {}", args.output_dir.display());
        println!();
    }

    let engine = ProcessingEngine::new(config);

    let image_files = engine.discover_images(&args.input_paths)?;
    if image_files.is_empty() {
        if args.json {
            JsonMessage::Summary {
                total_files: 0,
                converted: 0,
                failed: 0,
                duration_secs: start_time.elapsed().as_secs_f64(),
            }
            .emit();
        } else {
            println!("{}", style("No matching image files found.").yellow());
        }
        return Ok(());
    }

    std::fs::create_dir_all(&args.output_dir)?;

    let total = image_files.len();
    let reports = if args.json {
        engine.process_batch(&image_files, &args.output_dir, |current, report| {
            JsonMessage::for_report(report).emit();
            JsonMessage::Progress {
                current,
                total,
                message: report
                    .input_path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or("")
                    .to_string(),
            }
            .emit();
        })
    } else {
        let progress = create_progress_bar(total as u64);
        let reports = engine.process_batch(&image_files, &args.output_dir, |_, report| {
            if let Some(name) = report.input_path.file_name().and_then(|n| n.to_str()) {
                progress.set_message(name.to_string());
            }
            progress.inc(1);
        });
        progress.finish_and_clear();
        reports
    };

    let converted = reports.iter().filter(|r| r.succeeded()).count();
    let failed = reports.len() - converted;

    if args.json {
        JsonMessage::Summary {
            total_files: reports.len(),
            converted,
            failed,
            duration_secs: start_time.elapsed().as_secs_f64(),
        }
        .emit();
    } else {
        print_summary_table(&reports);
        println!();
        println!(
            "{} {} converted, {} failed in {}",
            style("Done:").bold().green(),
            converted,
            failed,
            format_duration(start_time.elapsed())
        );

        if failed > 0 {
            // Partial success is a normal terminal state; failed items are
            // listed so they can be resubmitted.
            error_println(&format!("{} item(s) failed, see table above", failed));
        }
    }

    Ok(())
}
