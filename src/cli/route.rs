//! CLI route: single route table and run context. Dispatches to the extraction services.

use crate::config::AppConfig;
use crate::error::ExtractError;
use crate::extract::{extract_archive, CancellationToken, ExtractOptions};
use crate::pattern::PatternSet;
use crate::scan::rescan;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::info;

use crate::cli::parse::Commands;

/// Runtime context for CLI execution: loaded config and the run's cancellation token.
pub struct RunContext {
    config: AppConfig,
    cancel: CancellationToken,
}

impl RunContext {
    /// Create run context from an already loaded config.
    pub fn with_config(config: AppConfig) -> Self {
        Self {
            config,
            cancel: CancellationToken::new(),
        }
    }

    /// Token observed by extraction runs started from this context.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Execute a CLI command via the single route table.
    pub fn execute(&self, command: &Commands) -> Result<String, ExtractError> {
        let started = Instant::now();
        let result = match command {
            Commands::Extract {
                input,
                output,
                sleep,
                patterns,
            } => self.handle_extract(input, output, *sleep, patterns),
            Commands::Crc { output } => self.handle_crc(output),
        };
        info!(
            duration_ms = started.elapsed().as_millis() as u64,
            ok = result.is_ok(),
            "Command finished"
        );
        result
    }

    fn handle_extract(
        &self,
        input: &Path,
        output: &Path,
        sleep: Option<u64>,
        patterns: &[String],
    ) -> Result<String, ExtractError> {
        // Patterns are compiled before the archive is touched so a bad glob fails fast.
        let patterns = if patterns.is_empty() {
            PatternSet::new(&self.config.extract.patterns)?
        } else {
            PatternSet::new(patterns)?
        };
        let delay = sleep
            .map(Duration::from_millis)
            .unwrap_or_else(|| self.config.extract.delay());
        let options = ExtractOptions::new(output.to_path_buf()).with_delay(delay);

        let report = extract_archive(input, &patterns, options, self.cancellation_token())?;
        Ok(report.to_string())
    }

    fn handle_crc(&self, output: &Path) -> Result<String, ExtractError> {
        let report = rescan(output)?;
        Ok(report.to_string())
    }
}
