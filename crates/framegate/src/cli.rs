use std::time::Duration;

use clap::Parser;
use framegate_engine::surface::GlInit;
use framegate_engine::window::{LogicalSize, RuntimeConfig};

#[derive(Debug, Parser)]
#[command(
    name = "framegate",
    about = "Play a media reference straight into an OpenGL window",
    disable_help_subcommand = true
)]
pub struct CliArgs {
    /// Media to play: a local path or a URI
    pub media: String,

    /// Initial window width in logical pixels
    #[arg(long = "width", default_value_t = 800, value_parser = parse_positive_u32)]
    pub width: u32,

    /// Initial window height in logical pixels
    #[arg(long = "height", default_value_t = 800, value_parser = parse_positive_u32)]
    pub height: u32,

    /// Render driver cadence in milliseconds
    #[arg(long = "tick-ms", default_value_t = 50, value_parser = parse_positive_u32)]
    pub tick_ms: u32,

    /// Start playback anyway if the GL context is not confirmed within this
    /// many milliseconds (0 waits indefinitely)
    #[arg(long = "startup-timeout-ms", default_value_t = 2000)]
    pub startup_timeout_ms: u64,

    /// Block buffer swaps on vertical sync
    #[arg(long = "vsync")]
    pub vsync: bool,

    /// Log filter in env_logger syntax (overrides RUST_LOG)
    #[arg(long = "log", value_name = "FILTER")]
    pub log: Option<String>,
}

impl CliArgs {
    pub fn runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            initial_size: LogicalSize::new(f64::from(self.width), f64::from(self.height)),
            tick_interval: Duration::from_millis(u64::from(self.tick_ms)),
            startup_fallback: (self.startup_timeout_ms > 0)
                .then(|| Duration::from_millis(self.startup_timeout_ms)),
            gl: GlInit {
                vsync: self.vsync,
                ..GlInit::default()
            },
            ..RuntimeConfig::default()
        }
    }
}

pub fn parse_cli() -> CliArgs {
    CliArgs::parse()
}

fn parse_positive_u32(value: &str) -> Result<u32, String> {
    match value.parse::<u32>() {
        Ok(0) => Err("value must be greater than zero".to_string()),
        Ok(parsed) => Ok(parsed),
        Err(_) => Err(format!("'{value}' is not a positive integer")),
    }
}
