use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(6);
pub const GPU_TOOL_TIMEOUT: Duration = Duration::from_secs(8);

pub const OSRELEASE_PATH: &str = "/proc/sys/kernel/osrelease";
pub const WSL_KERNEL_MARKER: &str = "microsoft";
pub const DXG_DEVICE_PATH: &str = "/dev/dxg";
pub const WSLG_MOUNT_PATH: &str = "/mnt/wslg";

pub const DISPLAY_ENV_VARS: [&str; 6] = [
    "WAYLAND_DISPLAY",
    "DISPLAY",
    "XDG_SESSION_TYPE",
    "LIBGL_ALWAYS_SOFTWARE",
    "MESA_LOADER_DRIVER_OVERRIDE",
    "GALLIUM_DRIVER",
];

pub const VULKAN_LINE_LIMIT: usize = 30;
pub const GPU_LINE_PATTERN: &str = "vga|3d|display";

/// Which post-processing a tool's output gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    NvidiaSmi,
    Glxinfo,
    Vulkaninfo,
    Lspci,
}

#[derive(Debug, Clone)]
pub struct ToolSpec {
    pub kind: ToolKind,
    pub name: String,
    pub args: Vec<String>,
    pub timeout: Duration,
}

impl ToolSpec {
    pub fn new(kind: ToolKind, name: &str, args: &[&str]) -> Self {
        Self {
            kind,
            name: name.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The invocation as shown in report headers, e.g. `glxinfo -B`.
    pub fn command_line(&self) -> String {
        std::iter::once(self.name.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Everything the probes read from the host. Collection code only ever looks
/// here, so tests can point it at fixtures.
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    pub osrelease_path: PathBuf,
    pub wsl_marker: String,
    pub device_paths: Vec<PathBuf>,
    pub env_vars: Vec<String>,
    pub tools: Vec<ToolSpec>,
    pub vulkan_line_limit: usize,
    pub gpu_line_pattern: String,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            osrelease_path: PathBuf::from(OSRELEASE_PATH),
            wsl_marker: WSL_KERNEL_MARKER.to_string(),
            device_paths: vec![
                PathBuf::from(DXG_DEVICE_PATH),
                PathBuf::from(WSLG_MOUNT_PATH),
            ],
            env_vars: DISPLAY_ENV_VARS.iter().map(|v| v.to_string()).collect(),
            tools: vec![
                ToolSpec::new(ToolKind::NvidiaSmi, "nvidia-smi", &["-L"])
                    .with_timeout(GPU_TOOL_TIMEOUT),
                ToolSpec::new(ToolKind::Glxinfo, "glxinfo", &["-B"])
                    .with_timeout(GPU_TOOL_TIMEOUT),
                ToolSpec::new(ToolKind::Vulkaninfo, "vulkaninfo", &[])
                    .with_timeout(GPU_TOOL_TIMEOUT),
                ToolSpec::new(ToolKind::Lspci, "lspci", &[])
                    .with_timeout(GPU_TOOL_TIMEOUT),
            ],
            vulkan_line_limit: VULKAN_LINE_LIMIT,
            gpu_line_pattern: GPU_LINE_PATTERN.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tools_in_fixed_order() {
        let config = ProbeConfig::default();
        let names: Vec<&str> = config.tools.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["nvidia-smi", "glxinfo", "vulkaninfo", "lspci"]);
    }

    #[test]
    fn gpu_tools_use_longer_timeout() {
        let config = ProbeConfig::default();
        assert!(config.tools.iter().all(|t| t.timeout == GPU_TOOL_TIMEOUT));
        assert!(GPU_TOOL_TIMEOUT > DEFAULT_TIMEOUT);
    }

    #[test]
    fn new_spec_uses_default_timeout() {
        let spec = ToolSpec::new(ToolKind::Lspci, "lspci", &["-nn"]);
        assert_eq!(spec.timeout, DEFAULT_TIMEOUT);
        assert_eq!(spec.with_timeout(GPU_TOOL_TIMEOUT).timeout, GPU_TOOL_TIMEOUT);
    }

    #[test]
    fn command_line_joins_name_and_args() {
        let config = ProbeConfig::default();
        assert_eq!(config.tools[0].command_line(), "nvidia-smi -L");
        assert_eq!(config.tools[1].command_line(), "glxinfo -B");
        assert_eq!(config.tools[2].command_line(), "vulkaninfo");
    }

    #[test]
    fn display_vars_start_with_session_vars() {
        let config = ProbeConfig::default();
        assert_eq!(
            &config.env_vars[..4],
            ["WAYLAND_DISPLAY", "DISPLAY", "XDG_SESSION_TYPE", "LIBGL_ALWAYS_SOFTWARE"]
        );
    }

    #[test]
    fn device_paths_are_dxg_then_wslg() {
        let config = ProbeConfig::default();
        assert_eq!(
            config.device_paths,
            vec![PathBuf::from("/dev/dxg"), PathBuf::from("/mnt/wslg")]
        );
    }
}
