use std::path::{Path, PathBuf};

use crate::config::ProbeConfig;
use crate::system::SystemInspector;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentReport {
    pub is_wsl: bool,
    pub paths: Vec<PathPresence>,
    pub variables: Vec<EnvReading>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPresence {
    pub path: PathBuf,
    pub exists: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvReading {
    pub name: String,
    /// Empty when unset.
    pub value: String,
}

pub fn probe_environment(system: &dyn SystemInspector, config: &ProbeConfig) -> EnvironmentReport {
    let osrelease = read_text_or_empty(system, &config.osrelease_path);
    let is_wsl = contains_marker(&osrelease, &config.wsl_marker);

    let paths = config
        .device_paths
        .iter()
        .map(|path| {
            let exists = system.path_exists(path);
            log::debug!("{} exists: {}", path.display(), exists);
            PathPresence {
                path: path.clone(),
                exists,
            }
        })
        .collect();

    let variables = config
        .env_vars
        .iter()
        .map(|name| EnvReading {
            name: name.clone(),
            value: system.env_var(name).unwrap_or_default(),
        })
        .collect();

    EnvironmentReport {
        is_wsl,
        paths,
        variables,
    }
}

/// Reads `path`, degrading to "" on any error.
pub fn read_text_or_empty(system: &dyn SystemInspector, path: &Path) -> String {
    match system.read_to_string(path) {
        Ok(text) => {
            log::debug!("read {} ({} bytes)", path.display(), text.len());
            text
        }
        Err(e) => {
            log::debug!("could not read {}: {}", path.display(), e);
            String::new()
        }
    }
}

/// `True`/`False`, as the report spells booleans.
pub fn bool_label(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}

/// Case-insensitive substring match.
pub fn contains_marker(text: &str, marker: &str) -> bool {
    text.to_lowercase().contains(&marker.to_lowercase())
}

pub fn format_environment_human(report: &EnvironmentReport) -> Vec<String> {
    let mut lines = vec![format!("WSL detected: {}", bool_label(report.is_wsl))];
    for presence in &report.paths {
        lines.push(format!(
            "{} exists: {}",
            presence.path.display(),
            bool_label(presence.exists)
        ));
    }
    for var in &report.variables {
        lines.push(format!("{}: {}", var.name, var.value));
    }
    lines
}
