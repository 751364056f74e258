use anyhow::{Context, Result};
use regex::{Regex, RegexBuilder};

use crate::config::{ProbeConfig, ToolKind, ToolSpec};
use crate::locator::ToolLocation;
use crate::environment::bool_label;
use crate::runner::CommandOutcome;
use crate::system::SystemInspector;

pub const RENDERER_LABEL: &str = "OpenGL renderer string";
pub const VERSION_LABEL: &str = "OpenGL version string";
pub const NO_GPU_LINES: &str = "(no GPU lines)";

const SOFTWARE_RENDERERS: [&str; 3] = ["llvmpipe", "softpipe", "swiftshader"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolReport {
    pub command_line: String,
    pub outcome: CommandOutcome,
    pub findings: Findings,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Findings {
    /// Output is shown as-is.
    Verbatim,
    Glx {
        renderer: Option<String>,
        version: Option<String>,
    },
    Head {
        lines: Vec<String>,
        limit: usize,
    },
    GpuLines {
        lines: Vec<String>,
    },
}

/// Runs every tool that `locations` found, in config order. Tools that were
/// not found are skipped without an invocation.
pub fn run_located_tools(
    system: &dyn SystemInspector,
    config: &ProbeConfig,
    locations: &[ToolLocation],
) -> Result<Vec<ToolReport>> {
    let gpu_pattern = RegexBuilder::new(&config.gpu_line_pattern)
        .case_insensitive(true)
        .build()
        .with_context(|| format!("invalid GPU line pattern {:?}", config.gpu_line_pattern))?;

    let mut reports = Vec::new();
    for tool in &config.tools {
        let found = locations
            .iter()
            .any(|loc| loc.name == tool.name && loc.is_found());
        if !found {
            log::debug!("skipping {}: not on PATH", tool.name);
            continue;
        }
        reports.push(run_tool(system, config, tool, &gpu_pattern));
    }
    Ok(reports)
}

fn run_tool(
    system: &dyn SystemInspector,
    config: &ProbeConfig,
    tool: &ToolSpec,
    gpu_pattern: &Regex,
) -> ToolReport {
    let outcome = system.run(&tool.name, &tool.args, tool.timeout);
    let output = outcome.output();

    let findings = match tool.kind {
        ToolKind::NvidiaSmi => Findings::Verbatim,
        ToolKind::Glxinfo => Findings::Glx {
            renderer: extract_field(output, RENDERER_LABEL),
            version: extract_field(output, VERSION_LABEL),
        },
        ToolKind::Vulkaninfo => Findings::Head {
            lines: head_lines(output, config.vulkan_line_limit),
            limit: config.vulkan_line_limit,
        },
        ToolKind::Lspci => Findings::GpuLines {
            lines: filter_gpu_lines(output, gpu_pattern),
        },
    };

    ToolReport {
        command_line: tool.command_line(),
        outcome,
        findings,
    }
}

/// Value after the first colon on the first line containing `label`.
/// Later lines with the same label are ignored. An empty value counts as
/// not found.
pub fn extract_field(output: &str, label: &str) -> Option<String> {
    let line = output.lines().find(|line| line.contains(label))?;
    let value = match line.split_once(':') {
        Some((_, rest)) => rest.trim(),
        None => line.trim(),
    };
    (!value.is_empty()).then(|| value.to_string())
}

pub fn head_lines(output: &str, limit: usize) -> Vec<String> {
    output.lines().take(limit).map(str::to_string).collect()
}

pub fn filter_gpu_lines(output: &str, pattern: &Regex) -> Vec<String> {
    output
        .lines()
        .filter(|line| pattern.is_match(line))
        .map(str::to_string)
        .collect()
}

pub fn is_software_renderer(renderer: &str) -> bool {
    let renderer = renderer.to_lowercase();
    SOFTWARE_RENDERERS.iter().any(|name| renderer.contains(name))
}

/// The output if there is any, otherwise the exit marker.
fn output_or_marker(outcome: &CommandOutcome) -> String {
    if outcome.output().is_empty() {
        outcome.exit_marker()
    } else {
        outcome.output().to_string()
    }
}

pub fn format_tool_human(report: &ToolReport) -> Vec<String> {
    let mut lines = Vec::new();
    match &report.findings {
        Findings::Verbatim => {
            lines.push(format!("{}:", report.command_line));
            lines.push(output_or_marker(&report.outcome));
        }
        Findings::Glx { renderer, version } => {
            lines.push(format!("{}:", report.command_line));
            lines.push(output_or_marker(&report.outcome));
            if let Some(renderer) = renderer {
                lines.push(format!("Renderer: {}", renderer));
            }
            if let Some(version) = version {
                lines.push(format!("Version: {}", version));
            }
            if let Some(renderer) = renderer {
                lines.push(format!(
                    "Software rendering: {}",
                    bool_label(is_software_renderer(renderer))
                ));
            }
        }
        Findings::Head {
            lines: head,
            limit,
        } => {
            lines.push(format!("{} (first {} lines):", report.command_line, limit));
            if head.is_empty() {
                lines.push(report.outcome.exit_marker());
            } else {
                lines.extend(head.iter().cloned());
            }
        }
        Findings::GpuLines { lines: gpu } => {
            lines.push(format!("{} (GPU lines):", report.command_line));
            if report.outcome.is_failure() {
                lines.push(report.outcome.exit_marker());
            } else if gpu.is_empty() {
                lines.push(NO_GPU_LINES.to_string());
            } else {
                lines.extend(gpu.iter().cloned());
            }
        }
    }
    lines
}
