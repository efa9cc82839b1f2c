use std::collections::BTreeSet;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

use crate::input::{LOG_FOLDER_NAME, RESULT_FOLDER_NAME};

/// Everything one invocation needs to locate its inputs, outputs and log.
/// Created once in `main`; lives exactly as long as the run.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub source_dir: PathBuf,
    pub out_dir: PathBuf,
    pub log_dir: PathBuf,
    pub started_at: String,
}

impl RunContext {
    pub fn new(source_dir: &Path, out_dir: Option<&Path>) -> Self {
        let started_at = chrono::Utc::now()
            .format("%Y-%m-%dT%H:%M:%S%.3fZ")
            .to_string()
            .replace(':', "_");
        Self::with_start(source_dir, out_dir, started_at)
    }

    pub fn with_start(source_dir: &Path, out_dir: Option<&Path>, started_at: String) -> Self {
        let out_dir = out_dir
            .map(Path::to_path_buf)
            .unwrap_or_else(|| source_dir.join(RESULT_FOLDER_NAME));
        Self {
            source_dir: source_dir.to_path_buf(),
            out_dir,
            log_dir: source_dir.join(LOG_FOLDER_NAME),
            started_at,
        }
    }

    pub fn log_path(&self) -> PathBuf {
        self.log_dir
            .join(format!("result_log_{}.txt", self.started_at))
    }

    pub fn stage_dir(&self, team: &str, stage: &str) -> PathBuf {
        self.source_dir.join(team).join(stage)
    }

    pub fn result_path(&self, team: &str, stage: &str, character: &str) -> PathBuf {
        self.stage_dir(team, stage).join(format!("{character}.json"))
    }

    /// Top-level folders of the source that hold this tool's own output or
    /// log, so discovery never mistakes them for teams.
    pub fn owned_folders(&self) -> BTreeSet<String> {
        [&self.out_dir, &self.log_dir]
            .into_iter()
            .filter_map(|dir| top_folder_under(&self.source_dir, dir))
            .collect()
    }
}

/// First path component of `dir` below `root`, if `dir` lies inside it.
/// Falls back to lexical comparison while `dir` does not exist yet.
fn top_folder_under(root: &Path, dir: &Path) -> Option<String> {
    let root = fs::canonicalize(root).unwrap_or_else(|_| root.to_path_buf());
    let dir = fs::canonicalize(dir).unwrap_or_else(|_| dir.to_path_buf());
    let first = dir.strip_prefix(&root).ok()?.components().next()?;
    Some(first.as_os_str().to_string_lossy().to_string())
}

pub fn console_filter(verbose: u8) -> EnvFilter {
    match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    }
}

/// Installs the console sink and the append-only run log under `logs/`.
pub fn init_logging(ctx: &RunContext, verbose: u8) -> std::io::Result<()> {
    fs::create_dir_all(&ctx.log_dir)?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(ctx.log_path())?;

    let console = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(console_filter(verbose));
    let run_log = fmt::layer()
        .with_ansi(false)
        .with_target(false)
        .with_writer(Mutex::new(file))
        .with_filter(LevelFilter::DEBUG);

    tracing_subscriber::registry()
        .with(console)
        .with(run_log)
        .try_init()
        .map_err(std::io::Error::other)?;

    tracing::info!("run log: {}", ctx.log_path().display());
    Ok(())
}

#[cfg(test)]
#[path = "../tests/src_inline/logging.rs"]
mod tests;
