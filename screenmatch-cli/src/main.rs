use clap::Parser;
use screenmatch::{
    ImageAsset, MatchConfig, MatchResult, Matcher, Metric, NeighborRule, RetryConfig,
    RetryScheduler, ScreenMatchResult, ScreenSource, SearchTemplate, DEFAULT_SIMILARITY,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "ScreenMatch CLI (JSON config driven)")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "config.json")]
    config: PathBuf,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output for performance profiling.
    #[arg(long)]
    trace: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
enum Mode {
    #[default]
    Find,
    FindAll,
    Wait,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
enum MetricConfig {
    #[default]
    Zncc,
    Ssd,
}

impl From<MetricConfig> for Metric {
    fn from(value: MetricConfig) -> Self {
        match value {
            MetricConfig::Zncc => Metric::Zncc,
            MetricConfig::Ssd => Metric::Ssd,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
enum NeighborRuleConfig {
    #[default]
    EitherAxis,
    BothAxes,
}

impl From<NeighborRuleConfig> for NeighborRule {
    fn from(value: NeighborRuleConfig) -> Self {
        match value {
            NeighborRuleConfig::EitherAxis => NeighborRule::EitherAxis,
            NeighborRuleConfig::BothAxes => NeighborRule::BothAxes,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct MatchConfigJson {
    metric: MetricConfig,
    neighbor_rule: NeighborRuleConfig,
    parallel: bool,
    min_var_i: f64,
}

impl Default for MatchConfigJson {
    fn default() -> Self {
        let cfg = MatchConfig::default();
        Self {
            metric: MetricConfig::default(),
            neighbor_rule: NeighborRuleConfig::default(),
            parallel: cfg.parallel,
            min_var_i: cfg.min_var_i,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct RetryConfigJson {
    /// Overrides the per-mode default timeout when set.
    timeout_secs: Option<f64>,
    find_timeout_secs: f64,
    wait_timeout_secs: f64,
    poll_interval_ms: u64,
}

impl Default for RetryConfigJson {
    fn default() -> Self {
        let cfg = RetryConfig::default();
        Self {
            timeout_secs: None,
            find_timeout_secs: cfg.find_timeout.as_secs_f64(),
            wait_timeout_secs: cfg.wait_timeout.as_secs_f64(),
            poll_interval_ms: cfg.poll_interval.as_millis() as u64,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct Config {
    mode: Mode,
    screen_path: String,
    template_path: String,
    similarity: f32,
    output_path: Option<String>,
    #[serde(rename = "match")]
    match_cfg: MatchConfigJson,
    retry: RetryConfigJson,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            screen_path: String::new(),
            template_path: String::new(),
            similarity: DEFAULT_SIMILARITY,
            output_path: None,
            match_cfg: MatchConfigJson::default(),
            retry: RetryConfigJson::default(),
        }
    }
}

/// Re-reads the screenshot file on every capture so an external tool can
/// keep overwriting it while we poll.
struct ScreenshotFile {
    path: PathBuf,
}

impl ScreenSource for ScreenshotFile {
    fn capture(&mut self) -> ScreenMatchResult<ImageAsset> {
        let asset = ImageAsset::from_path(&self.path);
        asset.pixels()?;
        Ok(asset)
    }
}

#[derive(Clone, Debug, Serialize)]
struct MatchRecord {
    template: String,
    x: usize,
    y: usize,
    width: usize,
    height: usize,
    score: f32,
    focus_x: i32,
    focus_y: i32,
}

impl From<MatchResult> for MatchRecord {
    fn from(value: MatchResult) -> Self {
        let focus = value.focus_point();
        Self {
            template: value.template,
            x: value.x,
            y: value.y,
            width: value.width,
            height: value.height,
            score: value.score,
            focus_x: focus.x,
            focus_y: focus.y,
        }
    }
}

#[derive(Debug, Serialize)]
struct Output {
    mode: Mode,
    found: bool,
    best: Option<MatchRecord>,
    matches: Vec<MatchRecord>,
}

/// Row-parallel scanning needs the `rayon` feature; without it the
/// `parallel` key has no effect.
fn parallel_unavailable(cfg: &MatchConfigJson) -> bool {
    cfg.parallel && !cfg!(feature = "rayon")
}

fn template_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive("screenmatch=info".parse()?),
            )
            .with_target(false)
            .init();
    }

    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let config_text = fs::read_to_string(&cli.config)?;
    let config: Config = serde_json::from_str(&config_text)?;
    if config.screen_path.is_empty() || config.template_path.is_empty() {
        return Err("screen_path and template_path must be set in the config".into());
    }

    if parallel_unavailable(&config.match_cfg) {
        eprintln!("warning: \"parallel\" ignored: rebuild with `--features rayon`");
    }

    let template_path = PathBuf::from(&config.template_path);
    let template = SearchTemplate::new(
        template_name(&template_path),
        ImageAsset::from_path(&template_path),
        config.similarity,
    )?;

    let matcher = Matcher::new().with_config(MatchConfig {
        metric: config.match_cfg.metric.into(),
        neighbor_rule: config.match_cfg.neighbor_rule.into(),
        parallel: config.match_cfg.parallel,
        min_var_i: config.match_cfg.min_var_i,
    });
    let scheduler = RetryScheduler::new(RetryConfig {
        find_timeout: Duration::try_from_secs_f64(config.retry.find_timeout_secs)?,
        wait_timeout: Duration::try_from_secs_f64(config.retry.wait_timeout_secs)?,
        poll_interval: Duration::from_millis(config.retry.poll_interval_ms),
    });
    let timeout = match config.retry.timeout_secs {
        Some(secs) => Duration::try_from_secs_f64(secs)?,
        None => match config.mode {
            Mode::Wait => scheduler.config().wait_timeout,
            Mode::Find | Mode::FindAll => scheduler.config().find_timeout,
        },
    };

    let mut screen = ScreenshotFile {
        path: PathBuf::from(&config.screen_path),
    };
    let matches = match config.mode {
        Mode::Find | Mode::Wait => {
            vec![scheduler.find(&mut screen, &matcher, &template, timeout)?]
        }
        Mode::FindAll => matcher.find_all(&screen.capture()?, &template)?,
    };
    tracing::info!(
        mode = ?config.mode,
        template = template.name(),
        matches = matches.len(),
        scans = matcher.stats().scans(),
        "search finished"
    );

    let records: Vec<MatchRecord> = matches.into_iter().map(MatchRecord::from).collect();
    let output = Output {
        mode: config.mode,
        found: !records.is_empty(),
        best: match config.mode {
            Mode::Wait => None,
            Mode::Find | Mode::FindAll => records.first().cloned(),
        },
        matches: match config.mode {
            Mode::FindAll => records,
            Mode::Find | Mode::Wait => Vec::new(),
        },
    };
    let json = serde_json::to_string_pretty(&output)?;

    match config.output_path {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }

    Ok(())
}
