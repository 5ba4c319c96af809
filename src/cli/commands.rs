use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Generates a single-file web app and README from a project brief
#[derive(Parser, Debug)]
#[command(
    name = "briefcraft",
    about = "Generate a single-file web app and README from a project brief",
    version,
    long_about = "briefcraft sends a project brief, optional data-URI attachments and evaluation \
                  checks to an LLM and turns the reply into index.html and README.md. \
                  If the LLM call fails, deterministic fallback files are produced instead."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Generate index.html and README.md",
        long_about = "Builds (round 1) or revises (round 2) a single-file web app.\n\n\
                      Examples:\n  \
                      briefcraft generate --brief 'A pomodoro timer' --check 'Has a start button'\n  \
                      briefcraft generate --request request.json --output-dir site/\n  \
                      cat request.json | briefcraft generate --request - --format json"
    )]
    Generate(GenerateArgs),

    #[command(
        about = "Check connectivity to the LLM endpoint",
        long_about = "Sends a short prompt to the configured endpoint to confirm the API key \
                      and model are usable."
    )]
    Health(HealthArgs),

    #[command(about = "Show the effective configuration")]
    Config(ConfigArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct GenerateArgs {
    #[arg(
        short = 'r',
        long,
        value_name = "FILE",
        required_unless_present = "brief",
        conflicts_with = "brief",
        help = "JSON generation request ('-' reads stdin)"
    )]
    pub request: Option<PathBuf>,

    #[arg(short = 'b', long, value_name = "TEXT", help = "Project brief")]
    pub brief: Option<String>,

    #[arg(
        short = 'c',
        long = "check",
        value_name = "CHECK",
        help = "Evaluation check (repeatable)"
    )]
    pub checks: Vec<String>,

    #[arg(
        long,
        default_value_t = 1,
        value_parser = clap::value_parser!(u8).range(1..=2),
        help = "Generation round: 1 builds, 2 revises"
    )]
    pub round: u8,

    #[arg(
        long,
        value_name = "FILE",
        help = "README from the previous round (used when --round 2)"
    )]
    pub previous_readme: Option<PathBuf>,

    #[arg(
        short = 'o',
        long,
        value_name = "DIR",
        help = "Write index.html and README.md into this directory"
    )]
    pub output_dir: Option<PathBuf>,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,

    #[arg(long, value_name = "DIR", help = "Root directory for decoded attachments")]
    pub attachment_dir: Option<PathBuf>,

    #[arg(long, value_name = "SECONDS", help = "Request timeout in seconds")]
    pub timeout: Option<u64>,

    #[arg(short = 'm', long, value_name = "MODEL", help = "Model identifier")]
    pub model: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct HealthArgs {
    #[arg(long, value_name = "SECONDS", help = "Connectivity check timeout in seconds")]
    pub timeout: Option<u64>,

    #[arg(short = 'm', long, value_name = "MODEL", help = "Model identifier")]
    pub model: Option<String>,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(Parser, Debug, Clone)]
pub struct ConfigArgs {
    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Json,
    Human,
}

impl From<OutputFormatArg> for super::output::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => super::output::OutputFormat::Json,
            OutputFormatArg::Human => super::output::OutputFormat::Human,
        }
    }
}
