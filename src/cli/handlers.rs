//! Command handlers; each returns the process exit code

use anyhow::{Context, Result};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

use super::commands::{ConfigArgs, GenerateArgs, HealthArgs};
use super::output::{HealthStatus, OutputFormat, OutputFormatter};
use crate::config::BriefcraftConfig;
use crate::generation::{GenerationOrchestrator, GenerationRequest, GenerationResult, Round};

pub const EXIT_OK: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;
pub const EXIT_CONFIG_ERROR: i32 = 2;

/// Loads configuration, logging the error on failure
fn load_config() -> Option<BriefcraftConfig> {
    match BriefcraftConfig::from_env() {
        Ok(config) => Some(config),
        Err(e) => {
            error!("{}", e);
            None
        }
    }
}

pub fn handle_generate(args: &GenerateArgs) -> i32 {
    let Some(mut config) = load_config() else {
        return EXIT_CONFIG_ERROR;
    };
    if let Some(model) = &args.model {
        config.model = model.clone();
    }
    if let Some(timeout) = args.timeout {
        config.request_timeout_secs = timeout;
    }
    if let Some(dir) = &args.attachment_dir {
        config.attachment_dir = dir.clone();
    }

    if let Err(e) = config.validate() {
        error!("{}", e);
        return EXIT_CONFIG_ERROR;
    }

    let orchestrator = match config.create_orchestrator() {
        Ok(orchestrator) => orchestrator,
        Err(e) => {
            error!("{}", e);
            return EXIT_CONFIG_ERROR;
        }
    };

    match run_generate(args, &orchestrator) {
        Ok(()) => EXIT_OK,
        Err(e) => {
            error!("{:#}", e);
            EXIT_FAILURE
        }
    }
}

fn run_generate(
    args: &GenerateArgs,
    orchestrator: &GenerationOrchestrator,
) -> Result<()> {
    let request = load_request(args)?;
    debug!(
        "Loaded request: round {}, {} attachments, {} checks",
        request.round,
        request.attachments.len(),
        request.checks.len()
    );

    let (result, report) = orchestrator.generate_with_report(&request);

    let written = match &args.output_dir {
        Some(dir) => write_files(&result, dir)?,
        None => Vec::new(),
    };

    let formatter = OutputFormatter::new(OutputFormat::from(args.format));
    println!("{}", formatter.format_result(&result, &report, &written)?);
    Ok(())
}

/// Builds the request from `--request` JSON or from the individual flags
pub fn load_request(args: &GenerateArgs) -> Result<GenerationRequest> {
    if let Some(path) = &args.request {
        let raw = if path.as_os_str() == "-" {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read request from stdin")?;
            buf
        } else {
            fs::read_to_string(path)
                .with_context(|| format!("Failed to read request file {}", path.display()))?
        };
        return serde_json::from_str(&raw).context("Invalid generation request JSON");
    }

    let round = Round::try_from(args.round).map_err(anyhow::Error::msg)?;
    let mut request = GenerationRequest::new(args.brief.clone().unwrap_or_default())
        .with_checks(args.checks.iter().cloned())
        .with_round(round);

    if let Some(path) = &args.previous_readme {
        let readme = fs::read_to_string(path)
            .with_context(|| format!("Failed to read previous README {}", path.display()))?;
        request = request.with_previous_readme(readme);
    }

    Ok(request)
}

/// Writes `index.html` and `README.md` into `dir`, creating it if needed
pub fn write_files(result: &GenerationResult, dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;

    let mut written = Vec::new();
    for (name, contents) in result.files.entries() {
        let path = dir.join(name);
        fs::write(&path, contents)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("Wrote {}", path.display());
        written.push(path);
    }
    Ok(written)
}

pub fn handle_health(args: &HealthArgs) -> i32 {
    let Some(mut config) = load_config() else {
        return EXIT_CONFIG_ERROR;
    };
    if let Some(model) = &args.model {
        config.model = model.clone();
    }
    if let Some(timeout) = args.timeout {
        config.health_timeout_secs = timeout;
    }

    let formatter = OutputFormatter::new(OutputFormat::from(args.format));
    let mut status = HealthStatus {
        healthy: false,
        model: config.model.clone(),
        endpoint: config.endpoint_url(),
        error: None,
    };

    let checked = config
        .validate()
        .and_then(|_| config.require_api_key().map(|_| ()))
        .and_then(|_| config.create_client());

    let exit_code = match checked {
        Ok(client) => match client.health_check() {
            Ok(healthy) => {
                status.healthy = healthy;
                if healthy {
                    EXIT_OK
                } else {
                    EXIT_FAILURE
                }
            }
            Err(e) => {
                status.error = Some(e.to_string());
                EXIT_FAILURE
            }
        },
        Err(e) => {
            status.error = Some(e.to_string());
            EXIT_CONFIG_ERROR
        }
    };

    match formatter.format_health(&status) {
        Ok(out) => print!("{}", out),
        Err(e) => error!("{:#}", e),
    }
    exit_code
}

pub fn handle_config(args: &ConfigArgs) -> i32 {
    let Some(config) = load_config() else {
        return EXIT_CONFIG_ERROR;
    };
    let formatter = OutputFormatter::new(OutputFormat::from(args.format));

    match formatter.format_config(&config) {
        Ok(out) => {
            print!("{}", out);
            if let Err(e) = config.validate() {
                error!("{}", e);
                return EXIT_CONFIG_ERROR;
            }
            EXIT_OK
        }
        Err(e) => {
            error!("{:#}", e);
            EXIT_FAILURE
        }
    }
}
