use clap::Parser;

#[derive(Parser)]
#[command(
    name = "wsl-gpu-check",
    version,
    about = "Report whether GPU/WebGL acceleration is available under WSL"
)]
pub struct Cli {
    /// Log probe details to stderr
    #[arg(long)]
    pub debug: bool,
}
