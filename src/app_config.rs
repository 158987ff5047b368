//! Application configuration loading for CLI defaults.

use std::env;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use url::Url;

/// File configuration for subgrab defaults.
#[derive(Debug, Clone, Default)]
pub struct FileConfig {
    /// Site origin, for mirrors.
    pub base_url: Option<String>,
    /// Default number of candidates to collect (1..=50).
    pub sub_num: Option<u8>,
    /// Connect timeout for every request, in seconds.
    pub connect_timeout_secs: Option<u64>,
    /// Total timeout for each search request, in seconds.
    pub search_timeout_secs: Option<u64>,
    /// Total timeout for the archive fetch, in seconds.
    pub fetch_timeout_secs: Option<u64>,
    /// Default output directory for downloaded archives.
    pub output_dir: Option<PathBuf>,
    /// Default verbosity mode.
    pub verbosity: Option<VerbositySetting>,
}

impl FileConfig {
    /// Validates config values against runtime and CLI constraints.
    pub fn validate(&self) -> Result<()> {
        if let Some(sub_num) = self.sub_num
            && !(1..=50).contains(&sub_num)
        {
            bail!("Invalid config value for `sub_num`: {sub_num}. Expected range: 1..=50");
        }
        if let Some(base_url) = &self.base_url {
            validate_base_url(base_url)?;
        }
        validate_timeout_secs("connect_timeout_secs", self.connect_timeout_secs)?;
        validate_timeout_secs("search_timeout_secs", self.search_timeout_secs)?;
        validate_timeout_secs("fetch_timeout_secs", self.fetch_timeout_secs)?;
        Ok(())
    }
}

fn validate_base_url(value: &str) -> Result<()> {
    let parsed = Url::parse(value)
        .with_context(|| format!("Invalid config value for `base_url`: '{value}'"))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        bail!("Invalid config value for `base_url`: '{value}'. Expected an http or https URL");
    }
    Ok(())
}

fn validate_timeout_secs(field: &str, value: Option<u64>) -> Result<()> {
    let Some(value) = value else {
        return Ok(());
    };
    if !(1..=3600).contains(&value) {
        bail!("Invalid config value for `{field}`: {value}. Expected range: 1..=3600");
    }
    Ok(())
}

/// Supported config verbosity labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerbositySetting {
    Default,
    Verbose,
    Quiet,
    Debug,
}

impl VerbositySetting {
    /// Log level this setting maps to when no flag or `RUST_LOG` overrides it.
    #[must_use]
    pub fn log_level(self) -> &'static str {
        match self {
            Self::Default => "info",
            Self::Verbose | Self::Debug => "debug",
            Self::Quiet => "error",
        }
    }
}

/// Loaded config metadata.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// Resolved config path if a base directory is known.
    pub path: Option<PathBuf>,
    /// Parsed file config when a config file exists and was valid.
    pub config: Option<FileConfig>,
}

/// Resolves default config path.
///
/// Priority:
/// 1. `$XDG_CONFIG_HOME/subgrab/config.toml`
/// 2. `$HOME/.config/subgrab/config.toml`
#[must_use]
pub fn resolve_default_config_path() -> Option<PathBuf> {
    config_path_from(
        env_var_non_empty_os("XDG_CONFIG_HOME"),
        env_var_non_empty_os("HOME"),
    )
}

fn config_path_from(xdg_config_home: Option<OsString>, home: Option<OsString>) -> Option<PathBuf> {
    if let Some(xdg_config_home) = xdg_config_home {
        return Some(
            PathBuf::from(xdg_config_home)
                .join("subgrab")
                .join("config.toml"),
        );
    }
    Some(
        PathBuf::from(home?)
            .join(".config")
            .join("subgrab")
            .join("config.toml"),
    )
}

fn env_var_non_empty_os(name: &str) -> Option<OsString> {
    let value = env::var_os(name)?;
    if value.is_empty() { None } else { Some(value) }
}

/// Loads config from default path if present.
pub fn load_default_file_config() -> Result<LoadedConfig> {
    let path = resolve_default_config_path();
    let config = match path.as_deref() {
        Some(path_ref) if path_ref.exists() => Some(load_file_config(path_ref)?),
        _ => None,
    };
    Ok(LoadedConfig { path, config })
}

fn load_file_config(path: &Path) -> Result<FileConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
    parse_config_str(&raw)
        .with_context(|| format!("Failed to parse config file '{}'", path.display()))
}

fn parse_config_str(raw: &str) -> Result<FileConfig> {
    let mut cfg = FileConfig::default();
    for (line_index, raw_line) in raw.lines().enumerate() {
        let line = strip_inline_comment(raw_line).trim();
        if line.is_empty() {
            continue;
        }
        let line_no = line_index + 1;

        let Some((raw_key, raw_value)) = line.split_once('=') else {
            bail!("Invalid config syntax on line {line_no}: expected key = value");
        };

        let key = raw_key.trim();
        let value = raw_value.trim();

        match key {
            "base_url" => {
                let parsed = parse_string_literal(value)
                    .with_context(|| format!("Invalid `base_url` value on line {line_no}"))?;
                cfg.base_url = Some(parsed);
            }
            "sub_num" => {
                let parsed = parse_integer_u8(value)
                    .with_context(|| format!("Invalid `sub_num` value on line {line_no}"))?;
                cfg.sub_num = Some(parsed);
            }
            "connect_timeout_secs" => {
                cfg.connect_timeout_secs = Some(parse_integer_u64(value).with_context(|| {
                    format!("Invalid `connect_timeout_secs` value on line {line_no}")
                })?);
            }
            "search_timeout_secs" => {
                cfg.search_timeout_secs = Some(parse_integer_u64(value).with_context(|| {
                    format!("Invalid `search_timeout_secs` value on line {line_no}")
                })?);
            }
            "fetch_timeout_secs" => {
                cfg.fetch_timeout_secs = Some(parse_integer_u64(value).with_context(|| {
                    format!("Invalid `fetch_timeout_secs` value on line {line_no}")
                })?);
            }
            "output_dir" => {
                let parsed = parse_string_literal(value)
                    .with_context(|| format!("Invalid `output_dir` value on line {line_no}"))?;
                cfg.output_dir = Some(PathBuf::from(parsed));
            }
            "verbosity" => {
                let parsed = parse_string_literal(value)
                    .with_context(|| format!("Invalid `verbosity` value on line {line_no}"))?;
                cfg.verbosity = Some(parse_verbosity(&parsed).with_context(|| {
                    format!("Invalid `verbosity` value '{parsed}' on line {line_no}")
                })?);
            }
            unknown => {
                bail!("Unknown configuration key: '{unknown}' on line {line_no}");
            }
        }
    }
    cfg.validate()?;
    Ok(cfg)
}

fn strip_inline_comment(line: &str) -> &str {
    let mut in_string = false;
    for (index, ch) in line.char_indices() {
        match ch {
            '"' => in_string = !in_string,
            '#' if !in_string => return &line[..index],
            _ => {}
        }
    }
    line
}

fn parse_string_literal(raw_value: &str) -> Result<String> {
    if raw_value.len() < 2 || !raw_value.starts_with('"') || !raw_value.ends_with('"') {
        bail!("Expected double-quoted string");
    }
    Ok(raw_value[1..raw_value.len() - 1].to_string())
}

fn parse_integer_u8(raw_value: &str) -> Result<u8> {
    let token = raw_value.trim();
    if token.is_empty() {
        bail!("Expected integer value");
    }
    let value = token.parse::<u16>()?;
    u8::try_from(value).map_err(|_| anyhow::anyhow!("Integer value out of range for u8"))
}

fn parse_integer_u64(raw_value: &str) -> Result<u64> {
    let token = raw_value.trim();
    if token.is_empty() {
        bail!("Expected integer value");
    }
    let value = token.parse::<i128>()?;
    if value < 0 {
        bail!("Expected non-negative integer");
    }
    u64::try_from(value).map_err(|_| anyhow::anyhow!("Integer value out of range for u64"))
}

fn parse_verbosity(value: &str) -> Result<VerbositySetting> {
    match value {
        "default" => Ok(VerbositySetting::Default),
        "verbose" => Ok(VerbositySetting::Verbose),
        "quiet" => Ok(VerbositySetting::Quiet),
        "debug" => Ok(VerbositySetting::Debug),
        _ => bail!("Expected one of: default, verbose, quiet, debug"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config_partial_fields() {
        let cfg = parse_config_str(
            r#"
sub_num = 8
verbosity = "verbose"
"#,
        )
        .expect("partial config should parse");
        assert_eq!(cfg.sub_num, Some(8));
        assert_eq!(cfg.verbosity, Some(VerbositySetting::Verbose));
        assert!(cfg.output_dir.is_none());
        assert!(cfg.base_url.is_none());
    }

    #[test]
    fn test_parse_config_all_fields() {
        let cfg = parse_config_str(
            r#"
base_url = "https://subhd.example"
sub_num = 10
connect_timeout_secs = 3
search_timeout_secs = 20
fetch_timeout_secs = 600
output_dir = "/tmp/subs"
verbosity = "debug"
"#,
        )
        .expect("full config should parse");
        assert_eq!(cfg.base_url.as_deref(), Some("https://subhd.example"));
        assert_eq!(cfg.sub_num, Some(10));
        assert_eq!(cfg.connect_timeout_secs, Some(3));
        assert_eq!(cfg.search_timeout_secs, Some(20));
        assert_eq!(cfg.fetch_timeout_secs, Some(600));
        assert_eq!(cfg.output_dir, Some(PathBuf::from("/tmp/subs")));
        assert_eq!(cfg.verbosity, Some(VerbositySetting::Debug));
    }

    #[test]
    fn test_parse_config_rejects_invalid_sub_num() {
        let err = parse_config_str("sub_num = 0").expect_err("invalid sub_num expected");
        assert!(err.to_string().contains("sub_num"));

        let err = parse_config_str("sub_num = 51").expect_err("invalid sub_num expected");
        assert!(err.to_string().contains("sub_num"));
    }

    #[test]
    fn test_parse_config_rejects_numeric_values_with_trailing_tokens() {
        let err =
            parse_config_str("sub_num = 4 trailing").expect_err("expected trailing token error");
        assert!(err.to_string().contains("sub_num"));
    }

    #[test]
    fn test_parse_config_rejects_invalid_timeout_value() {
        let err =
            parse_config_str("fetch_timeout_secs = 0").expect_err("invalid timeout expected");
        assert!(err.to_string().contains("fetch_timeout_secs"));

        let err = parse_config_str("connect_timeout_secs = 3601")
            .expect_err("invalid timeout expected");
        assert!(err.to_string().contains("connect_timeout_secs"));
    }

    #[test]
    fn test_parse_config_rejects_non_http_base_url() {
        let err = parse_config_str(r#"base_url = "ftp://subhd.example""#)
            .expect_err("ftp scheme should be rejected");
        assert!(err.to_string().contains("base_url"));

        let err = parse_config_str(r#"base_url = "not a url""#)
            .expect_err("unparseable URL should be rejected");
        assert!(err.to_string().contains("base_url"));
    }

    #[test]
    fn test_parse_config_supports_inline_comments() {
        let cfg = parse_config_str(
            r#"
sub_num = 4 # candidates
base_url = "http://mirror.example/#frag" # hash inside string is kept
"#,
        )
        .expect("config with comments should parse");
        assert_eq!(cfg.sub_num, Some(4));
        assert_eq!(cfg.base_url.as_deref(), Some("http://mirror.example/#frag"));
    }

    #[test]
    fn test_parse_config_rejects_unquoted_string() {
        let err = parse_config_str("output_dir = /tmp").expect_err("unquoted string");
        assert!(err.to_string().contains("output_dir"));
    }

    #[test]
    fn test_parse_config_rejects_unknown_verbosity() {
        let err = parse_config_str(r#"verbosity = "loud""#).expect_err("unknown verbosity");
        assert!(err.to_string().contains("verbosity"));
    }

    #[test]
    fn test_parse_config_rejects_unknown_keys() {
        let err = parse_config_str("unknown_key = 123").expect_err("unknown key error expected");
        assert!(err.to_string().contains("Unknown configuration key"));
        assert!(err.to_string().contains("unknown_key"));
    }

    #[test]
    fn test_parse_config_rejects_missing_equals() {
        let err = parse_config_str("sub_num 5").expect_err("syntax error expected");
        assert!(err.to_string().contains("line 1"));
    }

    #[test]
    fn test_verbosity_log_levels() {
        assert_eq!(VerbositySetting::Default.log_level(), "info");
        assert_eq!(VerbositySetting::Verbose.log_level(), "debug");
        assert_eq!(VerbositySetting::Debug.log_level(), "debug");
        assert_eq!(VerbositySetting::Quiet.log_level(), "error");
    }

    #[test]
    fn test_config_path_prefers_xdg() {
        let path = config_path_from(Some("/xdg".into()), Some("/home/u".into()));
        assert_eq!(path, Some(PathBuf::from("/xdg/subgrab/config.toml")));
    }

    #[test]
    fn test_config_path_falls_back_to_home() {
        let path = config_path_from(None, Some("/home/u".into()));
        assert_eq!(path, Some(PathBuf::from("/home/u/.config/subgrab/config.toml")));
        assert_eq!(config_path_from(None, None), None);
    }

    #[test]
    fn test_load_file_config_reports_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "sub_num = 99\n").expect("write config");
        let err = load_file_config(&path).expect_err("out of range");
        assert!(err.to_string().contains("config.toml"));
    }
}
