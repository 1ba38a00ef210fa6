use std::path::PathBuf;

use serde::Deserialize;

use crate::format::Format;

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Deserialize, Default)]
pub struct OutputConfig {
    /// Indent JSON output.
    #[serde(default)]
    pub pretty: bool,
    /// Target format of `transcode` when `--to` is not given.
    #[serde(default)]
    pub format: Format,
}

fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("graph-tool").join("config.toml"))
}

pub fn load_config() -> Config {
    let Some(path) = config_path() else {
        return Config::default();
    };

    let Ok(content) = std::fs::read_to_string(path) else {
        return Config::default();
    };

    parse_config(&content)
}

fn parse_config(content: &str) -> Config {
    match toml::from_str(content) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(error = %e, "ignoring malformed config file");
            Config::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_output_section() {
        let config = parse_config("[output]\npretty = true\nformat = \"cbor\"\n");
        assert!(config.output.pretty);
        assert_eq!(config.output.format, Format::Cbor);
    }

    #[test]
    fn missing_keys_use_defaults() {
        let config = parse_config("");
        assert!(!config.output.pretty);
        assert_eq!(config.output.format, Format::Json);
    }

    #[test]
    fn malformed_file_falls_back() {
        let config = parse_config("[output\npretty = ");
        assert_eq!(config.output.format, Format::Json);
    }
}
