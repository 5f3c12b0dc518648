use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use common::logger::stage_span;
use corelib::{DenoiseConfig, GuardrailReport};
use guardrails::{
    RoughMetrics, SIGNATURE_DEPTH, SearchGrid, VariationReport, evaluate_guardrails,
    path_rough_metrics, search_params, variation_report,
};
use serde::Serialize;
use tracing::info;

use crate::args::{DenoiseArgs, EvaluateArgs, SearchArgs};
use crate::io::{Standardizer, join_on_time, read_ticks, write_ticks};

/// Where the config used for `output` is persisted.
pub fn config_path_for(output: &Path) -> PathBuf {
    output.with_extension("config.json")
}

fn standardizer(cfg: &DenoiseConfig, prices: &[f64]) -> Standardizer {
    if cfg.standardize {
        Standardizer::fit(prices)
    } else {
        Standardizer::IDENTITY
    }
}

pub fn run_denoise(args: &DenoiseArgs) -> anyhow::Result<()> {
    let cfg = args.config.resolve().context("invalid configuration")?;
    let columns = args.columns.columns();

    let ticks = {
        let _s = stage_span("read").entered();
        read_ticks(&args.input, &columns)
            .with_context(|| format!("reading {}", args.input.display()))?
    };
    let prices: Vec<f64> = ticks.iter().map(|t| t.price).collect();

    let result = {
        let _s = stage_span("denoise").entered();
        let scaler = standardizer(&cfg, &prices);
        let denoiser = args.strategy.build(&cfg)?;
        let mut result = denoiser.denoise(&scaler.apply(&prices))?;
        result.denoised = scaler.invert(&result.denoised);
        result
    };

    {
        let _s = stage_span("write").entered();
        let times: Vec<String> = ticks.iter().map(|t| t.raw_time.clone()).collect();
        write_ticks(&args.output, &columns, &times, &result.denoised)
            .with_context(|| format!("writing {}", args.output.display()))?;
        cfg.save(config_path_for(&args.output))?;
    }

    info!(
        strategy = result.diagnostics.strategy,
        windows = result.diagnostics.windows,
        workers = result.diagnostics.workers,
        rows = ticks.len(),
        "denoised series saved"
    );
    println!("Saved denoised CSV: {}", args.output.display());
    Ok(())
}

/// Everything `evaluate` reports for a joined original/denoised pair.
#[derive(Debug, Serialize)]
pub struct Evaluation {
    pub rows: usize,
    pub guardrails: GuardrailReport,
    pub variation: VariationReport,
    pub rough_original: RoughMetrics,
    pub rough_denoised: RoughMetrics,
}

impl Evaluation {
    pub fn compute(original: &[f64], denoised: &[f64], cfg: &DenoiseConfig) -> Self {
        Self {
            rows: original.len(),
            guardrails: evaluate_guardrails(original, denoised, cfg),
            variation: variation_report(original, denoised),
            rough_original: path_rough_metrics(original, SIGNATURE_DEPTH),
            rough_denoised: path_rough_metrics(denoised, SIGNATURE_DEPTH),
        }
    }
}

pub fn run_evaluate(args: &EvaluateArgs) -> anyhow::Result<()> {
    let cfg = match &args.config {
        Some(path) => DenoiseConfig::load(path)?,
        None => DenoiseConfig::default(),
    };
    let columns = args.columns.columns();

    let original = read_ticks(&args.original, &columns)
        .with_context(|| format!("reading {}", args.original.display()))?;
    let denoised = read_ticks(&args.denoised, &columns)
        .with_context(|| format!("reading {}", args.denoised.display()))?;

    let (x, y) = join_on_time(&original, &denoised);
    if x.is_empty() {
        bail!("original and denoised files share no timestamps");
    }

    let eval = Evaluation::compute(&x, &y, &cfg);
    info!(rows = eval.rows, passes = eval.guardrails.passes, "evaluation complete");

    if args.json {
        println!("{}", serde_json::to_string_pretty(&eval)?);
    } else {
        println!("{}", eval.guardrails);
        println!("{}", eval.variation);
        println!("rough original: {}", eval.rough_original);
        println!("rough denoised: {}", eval.rough_denoised);
    }
    Ok(())
}

pub fn run_search(args: &SearchArgs) -> anyhow::Result<()> {
    let cfg = args.config.resolve().context("invalid configuration")?;
    let columns = args.columns.columns();

    let ticks = read_ticks(&args.input, &columns)
        .with_context(|| format!("reading {}", args.input.display()))?;
    let prices: Vec<f64> = ticks.iter().map(|t| t.price).collect();

    let scaler = standardizer(&cfg, &prices);
    let best = {
        let _s = stage_span("search").entered();
        search_params(&scaler.apply(&prices), &cfg, &SearchGrid::default())?
    };

    let times: Vec<String> = ticks.iter().map(|t| t.raw_time.clone()).collect();
    write_ticks(&args.output, &columns, &times, &scaler.invert(&best.denoised))
        .with_context(|| format!("writing {}", args.output.display()))?;
    best.config.save(config_path_for(&args.output))?;

    println!("{}", best.report);
    println!("score: {:.6}", best.score);
    println!("Saved best candidate: {}", args.output.display());
    Ok(())
}
