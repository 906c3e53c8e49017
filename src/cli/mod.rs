use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "vibebuild", version, about = "AI UI scaffolding: prompt in, multi-file project scaffold out")]
pub struct Args {
    /// Run the HTTP API server instead of a one-shot generation.
    #[arg(long, default_value_t = false)]
    pub serve: bool,

    /// Bind address for --serve (overrides config/env).
    #[arg(long)]
    pub bind: Option<String>,

    /// One-shot mode: the natural-language prompt to scaffold from.
    #[arg(long)]
    pub task: Option<String>,

    /// One-shot mode: write the generated files under this directory.
    #[arg(long)]
    pub out: Option<String>,

    /// Model identifier forwarded to the provider.
    #[arg(long)]
    pub model: Option<String>,

    #[arg(long, default_value_t = false)]
    pub dry_run: bool,

    /// Skip the write confirmation in one-shot mode.
    #[arg(long, default_value_t = false)]
    pub auto_approve: bool,

    #[arg(long, default_value_t = false)]
    pub save_request: bool,

    #[arg(long, default_value_t = false)]
    pub save_response: bool,

    #[arg(long, default_value_t = false)]
    pub debug: bool,

    /// Optional TOML config file; env vars still win.
    #[arg(long)]
    pub config: Option<String>,
}
