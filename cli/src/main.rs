use std::io;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use todo_cli::{Config, UreqTransport};

#[derive(Parser)]
#[command(name = "todo")]
#[command(about = "Log in and manage your todo list")]
#[command(version)]
struct Cli {
    /// Address of the todo service
    #[arg(long, env = "TODO_API_URL", default_value = todo_core::DEFAULT_BASE_URL)]
    base_url: String,

    /// Username for the first login attempt
    #[arg(long, short)]
    username: Option<String>,

    /// Password for the first login attempt
    #[arg(long, env = "TODO_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Log requests and state changes to stderr
    #[arg(long, short)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with_writer(io::stderr)
        .init();

    let config = Config {
        base_url: cli.base_url,
        username: cli.username,
        password: cli.password,
    };
    let transport = UreqTransport::new();
    let mut input = io::stdin().lock();
    let mut out = io::stdout();
    todo_cli::run(&config, &transport, &mut input, &mut out)
}
