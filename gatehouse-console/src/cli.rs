use std::path::PathBuf;

use clap::Parser;
use gatehouse_config::ConfigLoaderOptions;

#[derive(Debug, Parser)]
#[command(
    name = "gatehouse",
    version,
    about = "Admin console for managing users and roles",
    long_about = "Admin console for managing users and roles.\n\n\
        Reads commands from stdin, one per line. Type `help` once started \
        for the command list."
)]
pub struct Args {
    /// Config file (TOML, or JSON with a .json extension)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Environment file loaded before the process environment
    #[arg(long, value_name = "PATH")]
    pub env_file: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `gatehouse_core=trace` (overrides RUST_LOG)
    #[arg(long, value_name = "FILTER")]
    pub log_level: Option<String>,

    /// Development mode: accept the placeholder password pepper
    #[arg(long)]
    pub dev: bool,
}

impl Args {
    pub fn loader_options(&self) -> ConfigLoaderOptions {
        ConfigLoaderOptions {
            config_path: self.config.clone(),
            env_file: self.env_file.clone(),
            skip_dotenv: false,
            dev_mode: self.dev.then_some(true),
        }
    }
}
