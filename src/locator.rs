use std::path::PathBuf;

use crate::config::ProbeConfig;
use crate::system::SystemInspector;

pub const NOT_FOUND: &str = "not found";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolLocation {
    pub name: String,
    pub path: Option<PathBuf>,
}

impl ToolLocation {
    pub fn is_found(&self) -> bool {
        self.path.is_some()
    }
}

pub fn locate_tools(system: &dyn SystemInspector, config: &ProbeConfig) -> Vec<ToolLocation> {
    config
        .tools
        .iter()
        .map(|tool| {
            let path = system.which(&tool.name);
            log::debug!("which {}: {:?}", tool.name, path);
            ToolLocation {
                name: tool.name.clone(),
                path,
            }
        })
        .collect()
}

pub fn format_locations_human(locations: &[ToolLocation]) -> Vec<String> {
    locations
        .iter()
        .map(|loc| match &loc.path {
            Some(path) => format!("{}: {}", loc.name, path.display()),
            None => format!("{}: {}", loc.name, NOT_FOUND),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{exited, FakeSystem};

    #[test]
    fn missing_tools_report_not_found() {
        let system = FakeSystem::new();
        let locations = locate_tools(&system, &ProbeConfig::default());
        assert_eq!(locations.len(), 4);
        assert!(locations.iter().all(|l| !l.is_found()));
        assert_eq!(
            format_locations_human(&locations),
            [
                "nvidia-smi: not found",
                "glxinfo: not found",
                "vulkaninfo: not found",
                "lspci: not found",
            ]
        );
    }

    #[test]
    fn found_tool_reports_resolved_path() {
        let system = FakeSystem::new().with_tool("glxinfo", exited(0, ""));
        let locations = locate_tools(&system, &ProbeConfig::default());
        assert_eq!(
            locations[1].path.as_deref(),
            Some(std::path::Path::new("/usr/bin/glxinfo"))
        );
        assert_eq!(format_locations_human(&locations)[1], "glxinfo: /usr/bin/glxinfo");
    }

    #[test]
    fn locating_never_runs_tools() {
        let system = FakeSystem::new()
            .with_tool("lspci", exited(0, ""))
            .with_tool("nvidia-smi", exited(0, ""));
        locate_tools(&system, &ProbeConfig::default());
        assert!(system.invocations().is_empty());
    }
}
