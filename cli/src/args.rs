use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use corelib::{DenoiseConfig, DenoiseError, OverlapWeighting, Parallelism};
use denoise::DenoiserKind;

use crate::io::Columns;

#[derive(Debug, Parser)]
#[clap(name = "tickdenoise", version, about = "Increment-domain denoising for tick data")]
pub struct Cli {
    /// Emit logs as JSON
    #[clap(long, global = true)]
    pub log_json: bool,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Denoise a tick file and write the result next to its config
    Denoise(DenoiseArgs),
    /// Compare an original and a denoised tick file
    Evaluate(EvaluateArgs),
    /// Grid-search wavelet settings and keep the best-scoring output
    Search(SearchArgs),
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Denoise(_) => "denoise",
            Command::Evaluate(_) => "evaluate",
            Command::Search(_) => "search",
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct ColumnArgs {
    #[clap(long, default_value = "timestamp")]
    pub time_col: String,

    #[clap(long, default_value = "price")]
    pub price_col: String,
}

impl ColumnArgs {
    pub fn columns(&self) -> Columns {
        Columns {
            time: self.time_col.clone(),
            price: self.price_col.clone(),
        }
    }
}

/// Per-field overrides on top of the default or loaded config.
#[derive(Debug, Clone, Default, Args)]
pub struct ConfigArgs {
    /// JSON config to start from
    #[clap(long)]
    pub config: Option<PathBuf>,

    #[clap(long)]
    pub window: Option<usize>,

    #[clap(long)]
    pub overlap: Option<f64>,

    #[clap(long)]
    pub lambda: Option<f64>,

    #[clap(long)]
    pub max_iters: Option<usize>,

    /// Worker count, or "all"
    #[clap(long, allow_hyphen_values = true)]
    pub parallelism: Option<Parallelism>,

    /// Overlap-add weighting: flat or hann
    #[clap(long)]
    pub weighting: Option<OverlapWeighting>,

    /// Wavelet family: haar, db2, db3, db4
    #[clap(long)]
    pub wavelet: Option<String>,

    #[clap(long)]
    pub alpha: Option<f64>,

    #[clap(long)]
    pub level_reduction: Option<usize>,

    /// Apply the zero-phase low-pass after wavelet shrinkage
    #[clap(long)]
    pub lowpass: bool,

    #[clap(long)]
    pub sampling_rate_hz: Option<f64>,

    /// Denoise raw prices instead of standardised ones
    #[clap(long)]
    pub no_standardize: bool,
}

impl ConfigArgs {
    /// Loads the base config (if any), applies overrides and validates.
    pub fn resolve(&self) -> Result<DenoiseConfig, DenoiseError> {
        let mut cfg = match &self.config {
            Some(path) => DenoiseConfig::load(path)?,
            None => DenoiseConfig::default(),
        };

        if let Some(v) = self.window {
            cfg.window = v;
        }
        if let Some(v) = self.overlap {
            cfg.overlap = v;
        }
        if let Some(v) = self.lambda {
            cfg.lambda = v;
        }
        if let Some(v) = self.max_iters {
            cfg.max_iters = v;
        }
        if let Some(v) = self.parallelism {
            cfg.parallelism = v;
        }
        if let Some(v) = self.weighting {
            cfg.weighting = v;
        }
        if let Some(v) = &self.wavelet {
            cfg.wavelet = v.clone();
        }
        if let Some(v) = self.alpha {
            cfg.alpha = v;
        }
        if let Some(v) = self.level_reduction {
            cfg.level_reduction = v;
        }
        if let Some(v) = self.sampling_rate_hz {
            cfg.sampling_rate_hz = v;
        }
        if self.lowpass {
            cfg.apply_lowpass = true;
        }
        if self.no_standardize {
            cfg.standardize = false;
        }

        cfg.validate()?;
        Ok(cfg)
    }
}

#[derive(Debug, Args)]
pub struct DenoiseArgs {
    #[clap(long)]
    pub input: PathBuf,

    #[clap(long)]
    pub output: PathBuf,

    /// tv or wavelet
    #[clap(long, default_value = "tv")]
    pub strategy: DenoiserKind,

    #[clap(flatten)]
    pub columns: ColumnArgs,

    #[clap(flatten)]
    pub config: ConfigArgs,
}

#[derive(Debug, Args)]
pub struct EvaluateArgs {
    #[clap(long)]
    pub original: PathBuf,

    #[clap(long)]
    pub denoised: PathBuf,

    /// Config holding the guardrail thresholds
    #[clap(long)]
    pub config: Option<PathBuf>,

    /// Print the reports as JSON
    #[clap(long)]
    pub json: bool,

    #[clap(flatten)]
    pub columns: ColumnArgs,
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    #[clap(long)]
    pub input: PathBuf,

    #[clap(long)]
    pub output: PathBuf,

    #[clap(flatten)]
    pub columns: ColumnArgs,

    #[clap(flatten)]
    pub config: ConfigArgs,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_denoise_with_overrides() {
        let cli = Cli::try_parse_from([
            "tickdenoise",
            "denoise",
            "--input",
            "in.csv",
            "--output",
            "out.csv",
            "--strategy",
            "wavelet",
            "--window",
            "64",
            "--parallelism",
            "all",
            "--no-standardize",
        ])
        .unwrap();

        let Command::Denoise(args) = cli.command else {
            panic!("expected denoise");
        };
        assert_eq!(args.strategy, DenoiserKind::Wavelet);
        let cfg = args.config.resolve().unwrap();
        assert_eq!(cfg.window, 64);
        assert_eq!(cfg.parallelism, Parallelism::All);
        assert!(!cfg.standardize);
        assert_eq!(args.columns.time_col, "timestamp");
    }

    #[test]
    fn invalid_override_is_rejected() {
        let args = ConfigArgs {
            overlap: Some(1.0),
            ..Default::default()
        };
        assert!(matches!(args.resolve(), Err(DenoiseError::InvalidOverlap(_))));
    }

    #[test]
    fn unknown_strategy_fails_to_parse() {
        assert!(
            Cli::try_parse_from([
                "tickdenoise", "denoise", "--input", "a", "--output", "b", "--strategy", "kalman",
            ])
            .is_err()
        );
    }
}
