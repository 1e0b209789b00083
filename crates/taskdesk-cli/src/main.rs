//! Taskdesk CLI main entry point

use clap::Parser;
use taskdesk_cli::{
    cli::{Cli, Commands},
    commands::{build_client, ProfileCommandRunner, RequestCommand, TasksCommand},
    error::CliResult,
    utils::{init_tracing, ColoredOutput},
};
use tracing::debug;

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("{} {}", ColoredOutput::error("Error:"), e);
            1
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> CliResult<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose)?;

    if cli.no_color {
        colored::control::set_override(false);
    }

    debug!("Taskdesk CLI v{}", env!("CARGO_PKG_VERSION"));

    let client = build_client(&cli)?;

    match cli.command {
        Commands::Request {
            method,
            path,
            data,
            format,
        } => RequestCommand::run(&client, &method, &path, data, format).await,

        Commands::Tasks { action } => TasksCommand::run(client, action).await,

        Commands::Profile { action } => ProfileCommandRunner::run(client, action).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskdesk_cli::cli::{OutputFormat, ProfileCommand, TaskCommand};
    use taskdesk_client::services::TaskFilter;

    #[test]
    fn test_request_parsing() {
        let cli = Cli::try_parse_from([
            "taskdesk",
            "--base-url",
            "http://api.test",
            "request",
            "post",
            "/task/",
            "--data",
            r#"{"title": "x"}"#,
        ])
        .unwrap();

        assert_eq!(cli.base_url.as_deref(), Some("http://api.test"));
        if let Commands::Request {
            method,
            path,
            data,
            format,
        } = cli.command
        {
            assert_eq!(method, "post");
            assert_eq!(path, "/task/");
            assert_eq!(data.as_deref(), Some(r#"{"title": "x"}"#));
            assert_eq!(format, OutputFormat::Pretty);
        } else {
            panic!("Expected Request command");
        }
    }

    #[test]
    fn test_tasks_list_filter_parsing() {
        let cli =
            Cli::try_parse_from(["taskdesk", "tasks", "list", "--filter", "incomplete"]).unwrap();

        if let Commands::Tasks {
            action: TaskCommand::List { filter, format },
        } = cli.command
        {
            assert_eq!(filter, TaskFilter::Incomplete);
            assert_eq!(format, OutputFormat::Table);
        } else {
            panic!("Expected tasks list");
        }

        assert!(Cli::try_parse_from(["taskdesk", "tasks", "list", "--filter", "done"]).is_err());
    }

    #[test]
    fn test_complete_undo_and_profile_parsing() {
        let cli = Cli::try_parse_from(["taskdesk", "tasks", "complete", "t1", "--undo"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Tasks {
                action: TaskCommand::Complete { ref id, undo: true }
            } if id == "t1"
        ));

        let cli = Cli::try_parse_from([
            "taskdesk",
            "profile",
            "update",
            "--first-name",
            "Ada",
            "--last-name",
            "Lovelace",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Profile {
                action: ProfileCommand::Update { .. }
            }
        ));
    }
}
