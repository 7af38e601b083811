use std::path::PathBuf;

use anyhow::{Result, bail};
use sophia_codec::default_output_path;

pub const DEFAULT_AUDIO_INPUT: &str = "hello1.mp3";
pub const DEFAULT_DB_PATH: &str = "sophia.db";

/// Paths for the `encode-audio` tool.
///
/// Resolution order per field: positional argument, environment variable,
/// default. Without an explicit output the encoded text lands next to the
/// input as `<stem>_base64.txt`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncoderConfig {
    pub input: PathBuf,
    pub output: PathBuf,
}

impl EncoderConfig {
    pub fn from_env(args: &[String]) -> Result<Self> {
        Self::resolve(args, |key| std::env::var(key).ok())
    }

    pub fn resolve<F>(args: &[String], env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if args.len() > 2 {
            bail!("usage: encode-audio [INPUT] [OUTPUT]");
        }

        let input: PathBuf = args
            .first()
            .cloned()
            .or_else(|| env("SOPHIA_AUDIO_INPUT"))
            .unwrap_or_else(|| DEFAULT_AUDIO_INPUT.into())
            .into();

        let output = args
            .get(1)
            .cloned()
            .or_else(|| env("SOPHIA_AUDIO_OUTPUT"))
            .map(PathBuf::from)
            .unwrap_or_else(|| default_output_path(&input));

        Ok(Self { input, output })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub db_path: PathBuf,
    pub print_schema: bool,
}

impl DbConfig {
    pub fn from_env(args: &[String]) -> Result<Self> {
        Self::resolve(args, |key| std::env::var(key).ok())
    }

    pub fn resolve<F>(args: &[String], env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut print_schema = false;
        let mut path = None;

        for arg in args {
            match arg.as_str() {
                "--print-schema" => print_schema = true,
                flag if flag.starts_with("--") => bail!("Unknown flag: {}", flag),
                value if path.is_none() => path = Some(value.to_string()),
                _ => bail!("usage: init-db [--print-schema] [DB_PATH]"),
            }
        }

        let db_path = path
            .or_else(|| env("SOPHIA_DB_PATH"))
            .unwrap_or_else(|| DEFAULT_DB_PATH.into())
            .into();

        Ok(Self { db_path, print_schema })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn encoder_defaults() {
        let cfg = EncoderConfig::resolve(&[], no_env).unwrap();
        assert_eq!(cfg.input, PathBuf::from("hello1.mp3"));
        assert_eq!(cfg.output, PathBuf::from("hello1_base64.txt"));
    }

    #[test]
    fn encoder_env_then_args() {
        let env = |key: &str| match key {
            "SOPHIA_AUDIO_INPUT" => Some("clips/voice.wav".to_string()),
            _ => None,
        };
        let cfg = EncoderConfig::resolve(&[], env).unwrap();
        assert_eq!(cfg.input, PathBuf::from("clips/voice.wav"));
        assert_eq!(cfg.output, PathBuf::from("clips/voice_base64.txt"));

        let cfg = EncoderConfig::resolve(&args(&["a.mp3", "out/a.txt"]), env).unwrap();
        assert_eq!(cfg.input, PathBuf::from("a.mp3"));
        assert_eq!(cfg.output, PathBuf::from("out/a.txt"));
    }

    #[test]
    fn encoder_rejects_extra_args() {
        assert!(EncoderConfig::resolve(&args(&["a", "b", "c"]), no_env).is_err());
    }

    #[test]
    fn encoder_allows_in_place_output() {
        let cfg = EncoderConfig::resolve(&args(&["a.txt", "./a.txt"]), no_env).unwrap();
        assert_eq!(cfg.input, PathBuf::from("a.txt"));
        assert_eq!(cfg.output, PathBuf::from("./a.txt"));
    }

    #[test]
    fn db_config_flags() {
        let cfg = DbConfig::resolve(&args(&["--print-schema"]), no_env).unwrap();
        assert!(cfg.print_schema);
        assert_eq!(cfg.db_path, PathBuf::from(DEFAULT_DB_PATH));

        let env = |key: &str| (key == "SOPHIA_DB_PATH").then(|| "/var/lib/sophia.db".to_string());
        let cfg = DbConfig::resolve(&[], env).unwrap();
        assert_eq!(cfg.db_path, PathBuf::from("/var/lib/sophia.db"));

        assert!(DbConfig::resolve(&args(&["--force"]), no_env).is_err());
        assert!(DbConfig::resolve(&args(&["a.db", "b.db"]), no_env).is_err());
    }
}
