#![cfg(test)]

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::runner::CommandOutcome;
use crate::system::SystemInspector;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub timeout: Duration,
}

/// Canned host state. Tools are "installed" at `/usr/bin/<name>` and answer
/// every run with their preset outcome.
#[derive(Default)]
pub struct FakeSystem {
    files: HashMap<PathBuf, String>,
    existing: HashSet<PathBuf>,
    env: HashMap<String, String>,
    tools: HashMap<String, CommandOutcome>,
    invocations: RefCell<Vec<Invocation>>,
}

impl FakeSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: &str, contents: &str) -> Self {
        self.files.insert(PathBuf::from(path), contents.to_string());
        self.existing.insert(PathBuf::from(path));
        self
    }

    pub fn with_path(mut self, path: &str) -> Self {
        self.existing.insert(PathBuf::from(path));
        self
    }

    pub fn with_env(mut self, name: &str, value: &str) -> Self {
        self.env.insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_tool(mut self, name: &str, outcome: CommandOutcome) -> Self {
        self.tools.insert(name.to_string(), outcome);
        self
    }

    pub fn invocations(&self) -> Vec<Invocation> {
        self.invocations.borrow().clone()
    }
}

impl SystemInspector for FakeSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such fixture file"))
    }

    fn path_exists(&self, path: &Path) -> bool {
        self.existing.contains(path)
    }

    fn env_var(&self, name: &str) -> Option<String> {
        self.env.get(name).cloned()
    }

    fn which(&self, program: &str) -> Option<PathBuf> {
        self.tools
            .contains_key(program)
            .then(|| PathBuf::from("/usr/bin").join(program))
    }

    fn run(&self, program: &str, args: &[String], timeout: Duration) -> CommandOutcome {
        self.invocations.borrow_mut().push(Invocation {
            program: program.to_string(),
            args: args.to_vec(),
            timeout,
        });
        self.tools
            .get(program)
            .cloned()
            .unwrap_or(CommandOutcome::NotFound)
    }
}

pub fn exited(code: i32, output: &str) -> CommandOutcome {
    CommandOutcome::Exited {
        code,
        output: output.to_string(),
    }
}

pub const LLVMPIPE_GLXINFO: &str = "name of display: :0
display: :0  screen: 0
direct rendering: Yes
Extended renderer info (GLX_MESA_query_renderer):
    Vendor: Mesa (0xffffffff)
    Device: llvmpipe (LLVM 15.0.7, 256 bits) (0xffffffff)
OpenGL vendor string: Mesa
OpenGL renderer string: llvmpipe (LLVM 15.0.7, 256 bits)
OpenGL core profile version string: 4.5 (Core Profile) Mesa 23.2.1
OpenGL version string: 4.5 (Compatibility Profile) Mesa 23.2.1";

pub const D3D12_GLXINFO: &str = "direct rendering: Yes
OpenGL vendor string: Microsoft Corporation
OpenGL renderer string: D3D12 (NVIDIA GeForce RTX 3070)
OpenGL version string: 4.2 (Compatibility Profile) Mesa 23.2.1";

/// One VGA controller among nine unrelated devices.
pub const LSPCI_ONE_GPU: &str = "00:00.0 Host bridge: Intel Corporation 8th Gen Core Processor Host Bridge
00:01.0 PCI bridge: Intel Corporation Xeon E3-1200 v5/E3-1500 v5 PCIe Controller
00:02.0 VGA compatible controller: Intel Corporation UHD Graphics 630
00:08.0 System peripheral: Intel Corporation Gaussian Mixture Model
00:12.0 Signal processing controller: Intel Corporation Thermal Controller
00:14.0 USB controller: Intel Corporation Cannon Lake PCH USB 3.1 xHCI Host Controller
00:14.2 RAM memory: Intel Corporation Cannon Lake PCH Shared SRAM
00:16.0 Communication controller: Intel Corporation Cannon Lake PCH HECI Controller
00:17.0 SATA controller: Intel Corporation Cannon Lake Mobile PCH SATA AHCI Controller
00:1f.3 Audio device: Intel Corporation Cannon Lake PCH cAVS";
