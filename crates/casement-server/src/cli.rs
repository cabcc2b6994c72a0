use std::path::PathBuf;

use clap::Parser;

/// casement: keeps managed desktop windows in sync with remote clients.
#[derive(Parser, Debug)]
#[command(name = "casement", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Port to listen on, overriding `[server].port`.
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Log level override (trace, debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Print the effective configuration as TOML and exit.
    #[arg(long)]
    pub print_config: bool,
}

pub fn parse() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_overrides() {
        let args = Args::parse_from([
            "casement",
            "--config",
            "/tmp/c.toml",
            "-p",
            "6000",
            "--log-level",
            "debug",
        ]);
        assert_eq!(args.config, Some(PathBuf::from("/tmp/c.toml")));
        assert_eq!(args.port, Some(6000));
        assert_eq!(args.log_level.as_deref(), Some("debug"));
        assert!(!args.print_config);
    }

    #[test]
    fn defaults_are_empty() {
        let args = Args::parse_from(["casement", "--print-config"]);
        assert!(args.config.is_none());
        assert!(args.port.is_none());
        assert!(args.print_config);
    }
}
