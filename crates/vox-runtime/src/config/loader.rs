//! Layered configuration loading.

use super::{ConfigError, VoxConfig};
use std::path::Path;
use tracing::debug;

/// Load configuration for a project directory: defaults, then the
/// global file, then the project file, then environment overrides.
///
/// Missing files are skipped; present-but-broken files are errors.
pub fn load(project_dir: &Path) -> Result<VoxConfig, ConfigError> {
    let global = crate::paths::home_dir().map(|home| home.join(".vox").join("config.toml"));
    load_from(global.as_deref(), Some(&project_dir.join("vox.toml")))
}

/// Load from explicit file locations; either may be absent.
pub fn load_from(
    global: Option<&Path>,
    project: Option<&Path>,
) -> Result<VoxConfig, ConfigError> {
    let mut merged = toml::Table::new();

    for path in [global, project].into_iter().flatten() {
        if !path.is_file() {
            continue;
        }
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let layer: toml::Table = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "merged config layer");
        merge_tables(&mut merged, layer);
    }

    let mut config: VoxConfig =
        toml::Value::Table(merged)
            .try_into()
            .map_err(|source| ConfigError::Parse {
                path: project
                    .or(global)
                    .map(Path::to_path_buf)
                    .unwrap_or_default(),
                source,
            })?;

    apply_env(&mut config)?;
    Ok(config)
}

/// Recursive key-wise merge; overlay values win, tables merge deep.
fn merge_tables(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(toml::Value::Table(base_table)), toml::Value::Table(overlay_table)) => {
                merge_tables(base_table, overlay_table);
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

fn apply_env(config: &mut VoxConfig) -> Result<(), ConfigError> {
    if let Ok(value) = std::env::var("VOX_DEBUG") {
        config.debug = matches!(value.as_str(), "1" | "true" | "yes");
    }
    if let Ok(value) = std::env::var("VOX_LANG") {
        if !value.is_empty() {
            config.lang = value;
        }
    }
    if let Ok(value) = std::env::var("VOX_WORKER_PORT") {
        config.worker.port = value.parse().map_err(|_| ConfigError::Env {
            var: "VOX_WORKER_PORT",
            reason: format!("not a port number: {value:?}"),
        })?;
    }
    Ok(())
}
