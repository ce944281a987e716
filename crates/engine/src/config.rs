//! Runtime settings from the environment and the command line.
//!
//! | Variable | Meaning | Default |
//! |----------|---------|---------|
//! | `TETRION_MODE` | `classic`, `modern` or `mix` | `mix` |
//! | `TETRION_START_LEVEL` | level for new games | `0` |
//! | `TETRION_PREVIEW` | preview slots, 0 to 6 | `5` |
//! | `TETRION_QUIET` | `1`/`true`/`yes` mutes stderr logging, `0`/`false`/`no` keeps it | unset |
//!
//! Command line flags (`--mode`, `--level`, `--preview`, `--quiet`)
//! override the environment. The terminal binary also mutes logging while
//! stderr shares the screen; redirect stderr to keep the log.

use std::time::Duration;

use anyhow::{anyhow, Result};

use crate::types::{Mode, DEFAULT_PREVIEW_LEN, MAX_PREVIEW_LEN, TICKS_PER_SECOND};

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub mode: Mode,
    pub start_level: u32,
    pub preview_len: usize,
    pub quiet: bool,
    /// Interval between engine ticks.
    pub tick: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            start_level: 0,
            preview_len: DEFAULT_PREVIEW_LEN,
            quiet: false,
            tick: Duration::from_nanos(1_000_000_000 / TICKS_PER_SECOND as u64),
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key/value lookup. Unset or blank keys keep defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| {
            lookup(key)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };

        let mut settings = Self::default();
        if let Some(v) = get("TETRION_MODE") {
            settings.mode = parse_mode(&v)
                .map_err(|_| anyhow!("settings: invalid TETRION_MODE value: {}", v))?;
        }
        if let Some(v) = get("TETRION_START_LEVEL") {
            settings.start_level = v
                .parse()
                .map_err(|_| anyhow!("settings: invalid TETRION_START_LEVEL value: {}", v))?;
        }
        if let Some(v) = get("TETRION_PREVIEW") {
            settings.preview_len = parse_preview(&v)
                .map_err(|_| anyhow!("settings: invalid TETRION_PREVIEW value: {}", v))?;
        }
        if let Some(v) = get("TETRION_QUIET") {
            settings.quiet = parse_flag(&v)
                .map_err(|_| anyhow!("settings: invalid TETRION_QUIET value: {}", v))?;
        }
        Ok(settings)
    }

    /// Apply command line flags on top of the current values.
    pub fn apply_args(&mut self, args: &[String]) -> Result<()> {
        let mut i = 0usize;
        while i < args.len() {
            match args[i].as_str() {
                "--mode" => {
                    i += 1;
                    let v = args
                        .get(i)
                        .ok_or_else(|| anyhow!("settings: missing value for --mode"))?;
                    self.mode = parse_mode(v)
                        .map_err(|_| anyhow!("settings: invalid --mode value: {}", v))?;
                }
                "--level" => {
                    i += 1;
                    let v = args
                        .get(i)
                        .ok_or_else(|| anyhow!("settings: missing value for --level"))?;
                    self.start_level = v
                        .parse()
                        .map_err(|_| anyhow!("settings: invalid --level value: {}", v))?;
                }
                "--preview" => {
                    i += 1;
                    let v = args
                        .get(i)
                        .ok_or_else(|| anyhow!("settings: missing value for --preview"))?;
                    self.preview_len = parse_preview(v)
                        .map_err(|_| anyhow!("settings: invalid --preview value: {}", v))?;
                }
                "--quiet" => self.quiet = true,
                other => return Err(anyhow!("settings: unknown argument: {}", other)),
            }
            i += 1;
        }
        Ok(())
    }
}

fn parse_mode(s: &str) -> Result<Mode> {
    Mode::from_str(s).ok_or_else(|| anyhow!("unknown mode"))
}

fn parse_flag(s: &str) -> Result<bool> {
    match s.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        _ => Err(anyhow!("expected a boolean")),
    }
}

fn parse_preview(s: &str) -> Result<usize> {
    let n: usize = s.parse()?;
    if n > MAX_PREVIEW_LEN {
        return Err(anyhow!("at most {} preview slots", MAX_PREVIEW_LEN));
    }
    Ok(n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::from_lookup(|_| None).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.mode, Mode::Mix);
        assert_eq!(settings.preview_len, 5);
        assert_eq!(settings.tick.as_micros(), 16_666);
    }

    #[test]
    fn test_env_values() {
        let settings = Settings::from_lookup(lookup(&[
            ("TETRION_MODE", "Modern"),
            ("TETRION_START_LEVEL", "7"),
            ("TETRION_PREVIEW", " 3 "),
            ("TETRION_QUIET", "true"),
        ]))
        .unwrap();
        assert_eq!(settings.mode, Mode::Modern);
        assert_eq!(settings.start_level, 7);
        assert_eq!(settings.preview_len, 3);
        assert!(settings.quiet);
    }

    #[test]
    fn test_blank_env_keeps_default() {
        let settings = Settings::from_lookup(lookup(&[("TETRION_MODE", "  ")])).unwrap();
        assert_eq!(settings.mode, Mode::Mix);
    }

    #[test]
    fn test_bad_env_values() {
        let err = Settings::from_lookup(lookup(&[("TETRION_MODE", "arcade")])).unwrap_err();
        assert!(err.to_string().contains("TETRION_MODE"));
        assert!(Settings::from_lookup(lookup(&[("TETRION_PREVIEW", "9")])).is_err());
        assert!(Settings::from_lookup(lookup(&[("TETRION_START_LEVEL", "-1")])).is_err());
    }

    #[test]
    fn test_quiet_env_values() {
        let quiet = |v: &str| Settings::from_lookup(lookup(&[("TETRION_QUIET", v)])).map(|s| s.quiet);
        assert!(quiet("YES").unwrap());
        assert!(quiet("1").unwrap());
        assert!(!quiet("false").unwrap());
        assert!(!quiet("0").unwrap());

        let err = quiet("sometimes").unwrap_err();
        assert!(err.to_string().contains("TETRION_QUIET"));
    }

    #[test]
    fn test_args_override() {
        let mut settings = Settings::default();
        settings
            .apply_args(&args(&["--mode", "classic", "--level", "4", "--preview", "0", "--quiet"]))
            .unwrap();
        assert_eq!(settings.mode, Mode::Classic);
        assert_eq!(settings.start_level, 4);
        assert_eq!(settings.preview_len, 0);
        assert!(settings.quiet);
    }

    #[test]
    fn test_args_errors() {
        let mut settings = Settings::default();
        assert!(settings.apply_args(&args(&["--mode"])).is_err());
        assert!(settings.apply_args(&args(&["--level", "x"])).is_err());
        let err = settings.apply_args(&args(&["--fast"])).unwrap_err();
        assert!(err.to_string().contains("unknown argument"));
    }
}
