use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use pixmed_core::consts::DEFAULT_FILTER_LENGTH;
use pixmed_core::engine::MedianStrategy;
use pixmed_core::pipeline::config::{FilterConfig, ImageSequenceFormat, Size};
use pixmed_core::pipeline::run_filter_reported;

use crate::progress::BarReporter;
use crate::summary::{print_filter_summary, print_run_result};

#[derive(Clone, Copy, ValueEnum)]
pub enum StrategyArg {
    /// Keep windows sorted; evict the darkest/brightest sample alternately
    Sorted,
    /// Linear-time partial selection; cheaper, evicts an unspecified sample
    Partial,
}

impl From<StrategyArg> for MedianStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Sorted => MedianStrategy::Sorted,
            StrategyArg::Partial => MedianStrategy::Partial,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ImageFormatArg {
    Png,
    Tiff,
}

impl From<ImageFormatArg> for ImageSequenceFormat {
    fn from(arg: ImageFormatArg) -> Self {
        match arg {
            ImageFormatArg::Png => ImageSequenceFormat::Png,
            ImageFormatArg::Tiff => ImageSequenceFormat::Tiff,
        }
    }
}

#[derive(Args)]
pub struct RunArgs {
    /// Input SER file or directory of images (optional with --config)
    pub input: Option<PathBuf>,

    /// Filter config file (TOML); replaces the filter options below, while
    /// INPUT and --output still override its paths when given
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Number of frames in each pixel's window
    #[arg(short = 'n', long, default_value_t = DEFAULT_FILTER_LENGTH)]
    pub length: usize,

    /// Median selection strategy
    #[arg(long, value_enum, default_value = "sorted")]
    pub strategy: StrategyArg,

    /// Resample every frame to WIDTHxHEIGHT before filtering (e.g. 320x240)
    #[arg(long)]
    pub resize: Option<Size>,

    /// Drop the first LENGTH-1 outputs, which still contain padding
    #[arg(long)]
    pub skip_warmup: bool,

    /// Stop after this many input frames
    #[arg(long)]
    pub max_frames: Option<usize>,

    /// Image format when the output is a directory
    #[arg(long, value_enum, default_value = "png")]
    pub format: ImageFormatArg,

    /// Output `.ser` file, or a directory for numbered frames [default: filtered.ser]
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

const DEFAULT_OUTPUT: &str = "filtered.ser";

pub fn run(args: &RunArgs) -> Result<()> {
    let config = if let Some(ref config_path) = args.config {
        let contents = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config {}", config_path.display()))?;
        let config: FilterConfig = toml::from_str(&contents).context("Invalid filter config")?;
        apply_path_overrides(config, args)
    } else {
        build_config_from_args(args)?
    };

    print_filter_summary(&config);

    let reporter = Arc::new(BarReporter::new());
    let summary = run_filter_reported(&config, reporter)
        .with_context(|| format!("Failed to filter {}", config.input.display()))?;

    print_run_result(&config, &summary);
    Ok(())
}

fn build_config_from_args(args: &RunArgs) -> Result<FilterConfig> {
    let input = args
        .input
        .as_ref()
        .context("An input path is required unless --config is given")?;
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));
    Ok(FilterConfig {
        filter_length: args.length,
        strategy: args.strategy.into(),
        resize: args.resize,
        skip_warmup: args.skip_warmup,
        max_frames: args.max_frames,
        image_format: args.format.into(),
        ..FilterConfig::new(input, output)
    })
}

/// Paths given on the command line win over the ones in a config file.
fn apply_path_overrides(mut config: FilterConfig, args: &RunArgs) -> FilterConfig {
    if let Some(ref input) = args.input {
        config.input = input.clone();
    }
    if let Some(ref output) = args.output {
        config.output = output.clone();
    }
    config
}
