use crate::api::DEFAULT_API_BASE_URL;
use crate::error::{ Error, Result };
use crate::export::ExportFormat;
use crate::tree::RenderStyle;
use serde::Deserialize;
use std::fs::File;
use std::io::{ ErrorKind, Read };
use std::path::{ Path, PathBuf };
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub api_base_url: String,
    pub user_agent: String,
    pub indent_unit: String,
    pub branch: String,
    pub format: ExportFormat,
}

impl Default for Config {
    fn default() -> Self {
        let style = RenderStyle::default();
        Config {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            user_agent: concat!("repotree/", env!("CARGO_PKG_VERSION")).to_string(),
            indent_unit: style.indent_unit,
            branch: style.branch,
            format: ExportFormat::default(),
        }
    }
}

impl Config {
    pub fn render_style(&self) -> RenderStyle {
        RenderStyle {
            indent_unit: self.indent_unit.clone(),
            branch: self.branch.clone(),
        }
    }
}

/// `<config dir>/repotree/<file>`, or the file name alone if the platform
/// has no config directory.
pub fn default_path(file: &str) -> PathBuf {
    match dirs::config_dir() {
        Some(dir) => dir.join("repotree").join(file),
        None => PathBuf::from(file),
    }
}

/// Reads a YAML file into `T`, falling back to `T::default()` when the file
/// does not exist.
pub fn load_yaml<T>(path: &Path) -> Result<T> where T: for<'de> Deserialize<'de> + Default {
    let mut file = match File::open(path) {
        Ok(file) => file,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "no file, using defaults");
            return Ok(T::default());
        }
        Err(err) => {
            return Err(err.into());
        }
    };
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;
    if contents.trim().is_empty() {
        return Ok(T::default());
    }

    serde_yaml
        ::from_str(&contents)
        .map_err(|source| Error::Config { path: path.to_path_buf(), source })
}

pub fn load_config(path: &Path) -> Result<Config> {
    load_yaml(path)
}
