use std::path::PathBuf;

use clap::Parser;

/// Beacon: keeps a rich presence activity published while it runs.
#[derive(Parser, Debug)]
#[command(name = "beacon", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log filter override (e.g. `debug` or `beacon_presence=trace`).
    #[arg(long)]
    pub log_level: Option<String>,
}

pub fn parse() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_flags_is_valid() {
        let args = Args::try_parse_from(["beacon"]).unwrap();
        assert!(args.config.is_none());
        assert!(args.log_level.is_none());
    }

    #[test]
    fn overrides_parse() {
        let args = Args::try_parse_from([
            "beacon",
            "--config",
            "/etc/beacon.toml",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert_eq!(args.config, Some(PathBuf::from("/etc/beacon.toml")));
        assert_eq!(args.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn positional_arguments_rejected() {
        assert!(Args::try_parse_from(["beacon", "extra"]).is_err());
    }
}
