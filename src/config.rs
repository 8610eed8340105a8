use crate::error::CompilerError;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Xml,
    Json,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Spaces per nesting level in XML output; 0 writes every line flush left.
    pub indent: usize,
    pub output_extension: String,
    /// Appended to the unit name for the token listing, e.g. `MainT.xml`.
    pub token_suffix: String,
    pub format: OutputFormat,
    pub emit_tokens: bool,
    pub verbose: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            indent: 2,
            output_extension: String::from("xml"),
            token_suffix: String::from("T"),
            format: OutputFormat::Xml,
            emit_tokens: false,
            verbose: false,
        }
    }
}

impl Config {
    /// Reads the config file if there is one, then applies environment overrides.
    pub fn load() -> Result<Self, CompilerError> {
        let mut config = Self::load_from(&Self::get_config_path())?;
        config.apply_env();
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self, CompilerError> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let contents = fs::read_to_string(path)?;
        serde_json::from_str(&contents)
            .map_err(|e| CompilerError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn save(&self) -> Result<(), CompilerError> {
        self.save_to(&Self::get_config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), CompilerError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| CompilerError::Config(e.to_string()))?;
        fs::write(path, contents)?;
        Ok(())
    }

    pub fn get_config_path() -> PathBuf {
        if let Ok(custom) = env::var("JACK_CONFIG") {
            return PathBuf::from(custom);
        }

        let home = if cfg!(windows) {
            env::var("USERPROFILE")
        } else {
            env::var("HOME")
        };
        PathBuf::from(home.unwrap_or_else(|_| String::from(".")))
            .join(".jack")
            .join("config.json")
    }

    fn apply_env(&mut self) {
        if let Ok(value) = env::var("JACK_VERBOSE") {
            self.verbose = matches!(value.trim(), "1" | "true" | "yes");
        }
        if let Some(indent) = env::var("JACK_INDENT")
            .ok()
            .and_then(|value| value.trim().parse().ok())
        {
            self.indent = indent;
        }
    }

    pub fn output_path(&self, source: &Path, out_dir: Option<&Path>) -> PathBuf {
        let extension = match self.format {
            OutputFormat::Xml => self.output_extension.as_str(),
            OutputFormat::Json => "json",
        };
        self.sibling_path(source, out_dir, "", extension)
    }

    pub fn token_output_path(&self, source: &Path, out_dir: Option<&Path>) -> PathBuf {
        self.sibling_path(source, out_dir, &self.token_suffix, &self.output_extension)
    }

    fn sibling_path(
        &self,
        source: &Path,
        out_dir: Option<&Path>,
        suffix: &str,
        extension: &str,
    ) -> PathBuf {
        let stem = source
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        let dir = match out_dir {
            Some(dir) => dir.to_path_buf(),
            None => source.parent().map(Path::to_path_buf).unwrap_or_default(),
        };
        dir.join(format!("{}{}.{}", stem, suffix, extension))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let config: Config = serde_json::from_str(r#"{ "indent": 4 }"#).unwrap();
        assert_eq!(config.indent, 4);
        assert_eq!(config.output_extension, "xml");
        assert_eq!(config.format, OutputFormat::Xml);
    }

    #[test]
    fn output_paths_sit_next_to_the_source() {
        let config = Config::default();
        let source = Path::new("project/Main.jack");
        assert_eq!(config.output_path(source, None), PathBuf::from("project/Main.xml"));
        assert_eq!(
            config.token_output_path(source, Some(Path::new("out"))),
            PathBuf::from("out/MainT.xml")
        );
    }

    #[test]
    fn json_format_changes_extension() {
        let config = Config {
            format: OutputFormat::Json,
            ..Config::default()
        };
        assert_eq!(
            config.output_path(Path::new("Main.jack"), None),
            PathBuf::from("Main.json")
        );
    }
}
