//! Optional JSON configuration file.
//!
//! A batch run can load its defaults from a config file; anything given
//! explicitly on the command line takes precedence over the file.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

use crate::cli::{Args, OutputFormat};

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConfigFile {
    pub input_paths: Option<Vec<String>>,
    pub output_dir: Option<String>,
    pub format: Option<String>,
    pub colors: Option<usize>,
    pub scale: Option<f32>,
    pub quality: Option<f32>,
    pub extensions: Option<String>,
    pub verbose: Option<bool>,
}

impl Args {
    /// Load configuration from a JSON file and merge with command-line
    /// arguments. Command-line arguments take precedence.
    pub fn load_and_merge_config(&mut self) -> Result<()> {
        if let Some(config_path) = self.config_file.clone() {
            let contents = fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read config file: {:?}", config_path))?;

            let config: ConfigFile = serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse config file: {:?}", config_path))?;

            let cli_args: Vec<String> = std::env::args().collect();
            self.merge_from_config(config, &cli_args)?;

            if self.verbose {
                eprintln!("Loaded configuration from: {:?}", config_path);
            }
        }
        Ok(())
    }

    /// Apply config file values for every option the command line left at
    /// its default. `cli_args` is the raw argv, used to detect which flags
    /// were given explicitly.
    fn merge_from_config(&mut self, config: ConfigFile, cli_args: &[String]) -> Result<()> {
        let given = |short: &str, long: &str| {
            cli_args.iter().any(|a| {
                a == short || a == long || a.starts_with(&format!("{}=", long))
            })
        };

        if !given("-i", "--input") {
            if let Some(inputs) = config.input_paths {
                self.input_paths = inputs.into_iter().map(PathBuf::from).collect();
            }
        }

        if !given("-o", "--output") {
            if let Some(output) = config.output_dir {
                self.output_dir = PathBuf::from(output);
            }
        }

        if !given("-f", "--format") {
            if let Some(format) = config.format {
                self.format = OutputFormat::from_str(&format)
                    .map_err(|_| anyhow::anyhow!("Unknown format in config file: {}", format))?;
            }
        }

        if !given("-c", "--colors") {
            if let Some(colors) = config.colors {
                self.colors = colors;
            }
        }

        if !given("", "--scale") {
            if let Some(scale) = config.scale {
                self.scale = scale;
            }
        }

        if !given("-q", "--quality") {
            if let Some(quality) = config.quality {
                self.quality = quality;
            }
        }

        if !given("", "--extensions") {
            if let Some(extensions) = config.extensions {
                self.extensions_str = extensions;
            }
        }

        if let Some(true) = config.verbose {
            self.verbose = true;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn base_args() -> Args {
        Args::try_parse_from(["rastervec", "--config", "batch.json"]).unwrap()
    }

    fn owned(argv: &[&str]) -> Vec<String> {
        argv.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_config_fills_unset_options() {
        let mut args = base_args();
        let config = ConfigFile {
            input_paths: Some(vec!["./photos".to_string()]),
            format: Some("jpeg".to_string()),
            colors: Some(8),
            quality: Some(0.5),
            ..ConfigFile::default()
        };

        args.merge_from_config(config, &owned(&["rastervec", "--config", "batch.json"]))
            .unwrap();

        assert_eq!(args.input_paths, vec![PathBuf::from("./photos")]);
        assert_eq!(args.format, OutputFormat::Jpeg);
        assert_eq!(args.colors, 8);
        assert_eq!(args.quality, 0.5);
    }

    #[test]
    fn test_cli_flags_win_over_config() {
        let mut args = Args::try_parse_from([
            "rastervec",
            "--config",
            "batch.json",
            "-f",
            "png",
            "-c",
            "32",
        ])
        .unwrap();
        let config = ConfigFile {
            format: Some("jpeg".to_string()),
            colors: Some(8),
            scale: Some(0.5),
            ..ConfigFile::default()
        };

        args.merge_from_config(
            config,
            &owned(&[
                "rastervec",
                "--config",
                "batch.json",
                "-f",
                "png",
                "-c",
                "32",
            ]),
        )
        .unwrap();

        // Explicit flags keep their values; untouched options come from
        // the file.
        assert_eq!(args.format, OutputFormat::Png);
        assert_eq!(args.colors, 32);
        assert_eq!(args.scale, 0.5);
    }

    #[test]
    fn test_unknown_format_in_config_is_an_error() {
        let mut args = base_args();
        let config = ConfigFile {
            format: Some("tiff-like".to_string()),
            ..ConfigFile::default()
        };

        let result = args.merge_from_config(config, &owned(&["rastervec"]));
        assert!(result.is_err());
    }

    #[test]
    fn test_config_file_parses_camel_case_json() {
        let json = r#"{
            "inputPaths": ["a", "b"],
            "outputDir": "./out",
            "format": "webp",
            "colors": 12
        }"#;

        let config: ConfigFile = serde_json::from_str(json).unwrap();
        assert_eq!(config.input_paths.as_ref().unwrap().len(), 2);
        assert_eq!(config.output_dir.as_deref(), Some("./out"));
        assert_eq!(config.format.as_deref(), Some("webp"));
        assert_eq!(config.colors, Some(12));
    }
}
