use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// File name looked up in the working directory.
pub const LOCAL_CONFIG_NAME: &str = "paperfile.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("no input folders configured; set `input_folders` in paperfile.toml or pass --input")]
    NoInputFolders,
    #[error("failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("failed to write config {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub input_folders: Option<Vec<String>>,
    /// Single-folder form accepted for older configs; used only when
    /// `input_folders` is absent or empty.
    pub input_folder: Option<String>,
    pub output_folder: Option<String>,
    pub processed_folder: Option<String>,
    pub extraction: Option<ExtractionConfig>,
    pub concurrency: Option<ConcurrencyConfig>,
    pub filing: Option<FilingConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionConfig {
    pub max_pages: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConcurrencyConfig {
    pub num_workers: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilingConfig {
    pub move_processed: Option<bool>,
}

impl ConfigFile {
    /// Configured input folders, falling back to the legacy `input_folder` key.
    pub fn inputs(&self) -> Vec<String> {
        match &self.input_folders {
            Some(folders) if !folders.is_empty() => folders.clone(),
            _ => self.input_folder.iter().cloned().collect(),
        }
    }

    /// Rewrite every relative folder path so it is anchored at `base_dir`.
    pub fn resolve_relative_to(mut self, base_dir: &Path) -> Self {
        let anchor = |p: String| -> String {
            if Path::new(&p).is_absolute() {
                p
            } else {
                base_dir.join(&p).to_string_lossy().into_owned()
            }
        };
        self.input_folders = self
            .input_folders
            .map(|folders| folders.into_iter().map(anchor).collect());
        self.input_folder = self.input_folder.map(anchor);
        self.output_folder = self.output_folder.map(anchor);
        self.processed_folder = self.processed_folder.map(anchor);
        self
    }

    /// The sample written by `paperfile init`.
    pub fn sample() -> Self {
        ConfigFile {
            input_folders: Some(vec!["./papers".to_string()]),
            input_folder: None,
            output_folder: Some("./outputs".to_string()),
            processed_folder: Some("./processed_papers".to_string()),
            extraction: Some(ExtractionConfig { max_pages: Some(2) }),
            concurrency: Some(ConcurrencyConfig { num_workers: Some(4) }),
            filing: Some(FilingConfig {
                move_processed: Some(true),
            }),
        }
    }
}

/// Platform config directory path: `<config_dir>/paperfile/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("paperfile").join("config.toml"))
}

/// Load config by cascading CWD `paperfile.toml` over the platform config,
/// then `explicit` (if given) over both. Later layers win.
///
/// Missing platform/CWD files are ignored; a missing explicit file or any
/// file that fails to parse is an error.
pub fn load_config(explicit: Option<&Path>) -> Result<ConfigFile, ConfigError> {
    let platform = match config_path() {
        Some(p) => load_from_path(&p)?,
        None => None,
    };
    let cwd = load_from_path(Path::new(LOCAL_CONFIG_NAME))?;

    let mut merged = match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    };

    if let Some(path) = explicit {
        let file = load_from_path(path)?.ok_or_else(|| ConfigError::Read {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
        })?;
        merged = merge(merged, file);
    }

    Ok(merged)
}

/// Load a config from a specific path, anchoring relative folders at the
/// file's directory. Returns `Ok(None)` if the file doesn't exist.
pub fn load_from_path(path: &Path) -> Result<Option<ConfigFile>, ConfigError> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    let parsed: ConfigFile = toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    let base_dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    tracing::debug!(path = %path.display(), "loaded config file");
    Ok(Some(parsed.resolve_relative_to(&base_dir)))
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    // An overlay that names inputs in either form replaces the base inputs.
    let overlay_inputs = overlay.inputs();
    let (input_folders, input_folder) = if overlay_inputs.is_empty() {
        (base.input_folders, base.input_folder)
    } else {
        (Some(overlay_inputs), None)
    };
    ConfigFile {
        input_folders,
        input_folder,
        output_folder: overlay.output_folder.or(base.output_folder),
        processed_folder: overlay.processed_folder.or(base.processed_folder),
        extraction: Some(ExtractionConfig {
            max_pages: overlay
                .extraction
                .as_ref()
                .and_then(|e| e.max_pages)
                .or_else(|| base.extraction.as_ref().and_then(|e| e.max_pages)),
        }),
        concurrency: Some(ConcurrencyConfig {
            num_workers: overlay
                .concurrency
                .as_ref()
                .and_then(|c| c.num_workers)
                .or_else(|| base.concurrency.as_ref().and_then(|c| c.num_workers)),
        }),
        filing: Some(FilingConfig {
            move_processed: overlay
                .filing
                .as_ref()
                .and_then(|f| f.move_processed)
                .or_else(|| base.filing.as_ref().and_then(|f| f.move_processed)),
        }),
    }
}

/// Write `config` as TOML to `path`, creating parent directories.
/// Refuses to overwrite an existing file.
pub fn save_config(config: &ConfigFile, path: &Path) -> Result<(), ConfigError> {
    if path.exists() {
        return Err(ConfigError::Write {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::AlreadyExists, "file already exists"),
        });
    }
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })?;
    }
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content).map_err(|source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    })
}
