pub mod commands;
pub mod handlers;
pub mod output;

pub use commands::{CliArgs, Commands, ConfigArgs, GenerateArgs, HealthArgs};
pub use handlers::{handle_config, handle_generate, handle_health};
pub use output::{HealthStatus, OutputFormat, OutputFormatter};
