//! smp-project: run configuration format, validation and table ingestion.

pub mod schema;
pub mod tables;
pub mod validate;

pub use schema::*;
pub use tables::{EdgeRow, TableError, TableResult, load_edges, load_initial};
pub use validate::{ValidationError, validate_config};

use std::path::{Path, PathBuf};

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Table error: {0}")]
    Table(#[from] TableError),

    #[error("Failed to read configuration file {}: {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Unsupported configuration format: {}", .path.display())]
    UnsupportedFormat { path: PathBuf },

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn read_config(path: &Path) -> ProjectResult<String> {
    std::fs::read_to_string(path).map_err(|source| ProjectError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })
}

pub fn load_yaml(path: &Path) -> ProjectResult<RunConfig> {
    let content = read_config(path)?;
    let config: RunConfig = serde_yaml::from_str(&content)?;
    validate_config(&config)?;
    Ok(config)
}

pub fn load_json(path: &Path) -> ProjectResult<RunConfig> {
    let content = read_config(path)?;
    let config: RunConfig = serde_json::from_str(&content)?;
    validate_config(&config)?;
    Ok(config)
}

/// Load a configuration, choosing the format from the file extension.
pub fn load_config(path: &Path) -> ProjectResult<RunConfig> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => load_json(path),
        Some("yaml") | Some("yml") | None => load_yaml(path),
        Some(_) => Err(ProjectError::UnsupportedFormat {
            path: path.to_path_buf(),
        }),
    }
}

/// A validated configuration together with both parsed tables.
#[derive(Debug, Clone)]
pub struct ProjectInputs {
    pub config: RunConfig,
    /// Directory relative paths in `config` resolve against.
    pub base_dir: PathBuf,
    pub edges: Vec<EdgeRow>,
    pub initial: Vec<Vec<f64>>,
}

impl ProjectInputs {
    pub fn resolve(&self, path: &Path) -> PathBuf {
        resolve_path(&self.base_dir, path)
    }

    pub fn output_path(&self) -> PathBuf {
        self.resolve(&self.config.output_file)
    }

    pub fn manifest_path(&self) -> Option<PathBuf> {
        self.config.manifest_file.as_deref().map(|p| self.resolve(p))
    }
}

/// Load the configuration at `config_path` and both tables it names.
pub fn load_inputs(config_path: &Path) -> ProjectResult<ProjectInputs> {
    let config = load_config(config_path)?;
    let base_dir = config_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();

    let edges = load_edges(
        &resolve_path(&base_dir, &config.transition_file),
        config.states,
    )?;
    let initial = load_initial(
        &resolve_path(&base_dir, &config.initial_file),
        config.states,
    )?;

    Ok(ProjectInputs {
        config,
        base_dir,
        edges,
        initial,
    })
}
