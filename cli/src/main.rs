use std::process::ExitCode;

use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;
use utility_cli_core::{CommandRepository, HelpConfig, Invocation};

mod commands;

/// Environment variable naming an optional YAML/JSON help configuration.
const HELP_CONFIG_ENV: &str = "UTILITY_CLI_HELP_CONFIG";

const USAGE_LINE: &str = "utility-cli <command> [options]";

fn main() -> ExitCode {
    init_logging();

    let repo = match build_repository() {
        Ok(repo) => repo,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };

    let argv: Vec<String> = std::env::args().skip(1).collect();
    run(&repo, &argv)
}

/// Installs a stderr subscriber filtered by `RUST_LOG` (default `warn`).
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn build_repository() -> Result<CommandRepository, String> {
    let mut repo = CommandRepository::new();
    commands::register_all(&mut repo)
        .map_err(|err| format!("Failed to register commands: {err}"))?;

    if let Some(path) = std::env::var_os(HELP_CONFIG_ENV) {
        let config = HelpConfig::load(&path).map_err(|err| {
            format!(
                "Failed to load help configuration '{}': {err}",
                path.to_string_lossy()
            )
        })?;
        config.apply(&mut repo);
        debug!(path = %path.to_string_lossy(), "Applied help configuration");
    }
    Ok(repo)
}

/// Resolves one invocation and returns the process exit status.
fn run(repo: &CommandRepository, argv: &[String]) -> ExitCode {
    let invocation = repo.parse(argv);

    if let Some(command) = invocation.command() {
        if !repo.has_command(command) {
            warn!(command, "Unknown command");
            eprintln!("The specified command is not available: {command}");
            print!("{}", repo.render_command_list(USAGE_LINE));
            return ExitCode::SUCCESS;
        }
    }

    match invocation {
        Invocation::Empty => {
            print!("{}", repo.render_command_list(USAGE_LINE));
            ExitCode::SUCCESS
        }
        Invocation::HelpRequested { command } => {
            print!("{}", repo.render_command_help(&command));
            ExitCode::SUCCESS
        }
        Invocation::Parsed { command, values } => {
            repo.dispatch(&command, &values);
            ExitCode::SUCCESS
        }
        Invocation::Failed { command, error } => {
            eprintln!("Parsing failed.  Reason: {error}\n");
            print!("{}", repo.render_command_help(&command));
            ExitCode::FAILURE
        }
    }
}
