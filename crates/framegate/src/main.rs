mod cli;

use anyhow::{Context, Result};
use framegate_engine::decoder::{PatternConfig, PatternDecoder};
use framegate_engine::logging::{LoggingConfig, init_logging};
use framegate_engine::media::MediaRef;
use framegate_engine::window::Runtime;

fn main() -> Result<()> {
    let args = cli::parse_cli();

    init_logging(LoggingConfig {
        env_filter: args.log.clone(),
        ..LoggingConfig::default()
    });

    // Reject a bad reference before any window or decoder exists.
    let media = MediaRef::parse(&args.media).context("invalid media reference")?;
    let config = args.runtime_config();

    log::info!("opening {media}");
    let decoder = PatternDecoder::new(PatternConfig::default());
    Runtime::run(config, media, Box::new(decoder))
}
