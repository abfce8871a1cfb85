use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "xidd")]
#[command(about = "Xid naming identity daemon", long_about = None)]
pub struct Cli {
    /// Path to the configuration file (defaults to xid-config.toml in the
    /// data directory)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override the data directory
    #[arg(short, long)]
    pub data_dir: Option<PathBuf>,

    /// Override the JSON-RPC listen address
    #[arg(long, value_name = "ADDR")]
    pub rpc_listen: Option<String>,

    /// Override the REST listen address
    #[arg(long, value_name = "ADDR")]
    pub rest_listen: Option<String>,

    /// Enable RPC methods that can disrupt the server (stop, getcurrentstate)
    #[arg(long)]
    pub unsafe_rpc: bool,

    /// Log filter expression (overrides the config, e.g. "debug" or
    /// "info,xid_core=debug")
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// Validate the configuration and exit
    #[arg(long)]
    pub validate_only: bool,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
