use anyhow::Result;

use crate::config::ProbeConfig;
use crate::environment::{format_environment_human, probe_environment, EnvironmentReport};
use crate::locator::{format_locations_human, locate_tools, ToolLocation};
use crate::system::SystemInspector;
use crate::tools::{format_tool_human, run_located_tools, ToolReport};

pub const TITLE: &str = "WSL GPU/WebGL diagnostics";

pub const NOTES: [&str; 5] = [
    "- If /dev/dxg exists but WebGL is still unsupported, WSLg GPU may not be fully enabled.",
    "- Ensure Windows has the official WSL-compatible GPU driver installed.",
    "- Run 'wsl --update' on Windows, then restart WSL.",
    "- If glxinfo shows 'llvmpipe' or 'swiftshader', you are on software rendering.",
    "- If you set LIBGL_ALWAYS_SOFTWARE=1, unset it to allow GPU.",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostics {
    pub environment: EnvironmentReport,
    pub locations: Vec<ToolLocation>,
    pub tools: Vec<ToolReport>,
}

pub fn diagnose(system: &dyn SystemInspector, config: &ProbeConfig) -> Result<Diagnostics> {
    let environment = probe_environment(system, config);
    let locations = locate_tools(system, config);
    let tools = run_located_tools(system, config, &locations)?;
    Ok(Diagnostics {
        environment,
        locations,
        tools,
    })
}

fn section(lines: &mut Vec<String>, title: &str) {
    lines.push(String::new());
    lines.push(format!("== {} ==", title));
}

pub fn format_report_human(diagnostics: &Diagnostics) -> String {
    let mut lines = vec![TITLE.to_string()];

    section(&mut lines, "Environment");
    lines.extend(format_environment_human(&diagnostics.environment));

    section(&mut lines, "GPU tools");
    lines.extend(format_locations_human(&diagnostics.locations));
    for tool in &diagnostics.tools {
        lines.extend(format_tool_human(tool));
    }

    section(&mut lines, "Notes");
    lines.extend(NOTES.iter().map(|note| note.to_string()));

    lines.join("\n")
}
