use std::process::ExitCode;

use clap::{Parser, Subcommand};
use dew_api::v1::{CreateTodo, Patch, Todo, TodoStatus, UpdateTodo};
use dew_front::{
    api::DEFAULT_API_URL,
    view::{ListView, TodoView},
    Api, Data, StatusFilter,
};
use dialoguer::Confirm;

/// Command line client for the dew todo server.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Base url of the server's procedures.
    #[arg(long, env = "DEW_API_URL", default_value = DEFAULT_API_URL)]
    url: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List todos, newest first.
    List {
        #[arg(long, value_enum, default_value_t)]
        filter: StatusFilter,
    },
    /// Show a single todo.
    Show { id: i64 },
    /// Create a todo.
    Add {
        title: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        status: Option<TodoStatus>,
    },
    /// Change some fields of a todo.
    Edit {
        id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long, conflicts_with = "clear_description")]
        description: Option<String>,
        #[arg(long)]
        clear_description: bool,
        #[arg(long)]
        status: Option<TodoStatus>,
    },
    /// Flip a todo between pending and completed.
    Toggle { id: i64 },
    /// Delete a todo, after asking for confirmation.
    Delete {
        id: i64,
        /// Skip the confirmation prompt.
        #[arg(short, long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> eyre::Result<ExitCode> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let api = Api::new(cli.url);

    let mut data = Data::default();
    if !data.handle(api.get_todos().await) {
        return Ok(ExitCode::FAILURE);
    }

    let command = cli.command.unwrap_or(Command::List {
        filter: StatusFilter::All,
    });

    let applied = match command {
        Command::List { filter } => {
            data.filter = filter;
            true
        }
        Command::Show { id } => {
            let Some(todo) = data.get(id) else {
                eyre::bail!("todo {} not found", id);
            };

            print!("{}", TodoView(todo));
            return Ok(ExitCode::SUCCESS);
        }
        Command::Add {
            title,
            description,
            status,
        } => {
            let input = CreateTodo {
                title,
                description,
                status,
            };

            data.handle(api.create_todo(input).await)
        }
        Command::Edit {
            id,
            title,
            description,
            clear_description,
            status,
        } => {
            let input = UpdateTodo {
                id,
                title,
                description: description_patch(description, clear_description),
                status,
            };

            data.handle(api.update_todo(input).await)
        }
        Command::Toggle { id } => {
            let Some(todo) = data.get(id) else {
                eyre::bail!("todo {} not found", id);
            };

            let result = api.toggle_todo(todo).await;
            data.handle(result)
        }
        Command::Delete { id, yes } => {
            let prompt = delete_prompt(data.get(id), id);
            if !yes && !Confirm::new().with_prompt(prompt).default(false).interact()? {
                println!("Cancelled.");
                return Ok(ExitCode::SUCCESS);
            }

            data.handle(api.delete_todo(id).await)
        }
    };

    print!("{}", ListView(&data));

    Ok(match applied {
        true => ExitCode::SUCCESS,
        false => ExitCode::FAILURE,
    })
}

fn delete_prompt(todo: Option<&Todo>, id: i64) -> String {
    let target = match todo {
        Some(todo) => format!("\"{}\"", todo.title),
        None => format!("todo {}", id),
    };

    format!(
        "Are you sure you want to delete {}? This action cannot be undone.",
        target
    )
}

fn description_patch(description: Option<String>, clear: bool) -> Patch<Option<String>> {
    match clear {
        true => Patch::Set(None),
        false => description.map(Some).into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn description_flags() {
        assert_eq!(description_patch(None, false), Patch::Keep);
        assert_eq!(description_patch(None, true), Patch::Set(None));
        assert_eq!(
            description_patch(Some(String::from("x")), false),
            Patch::Set(Some(String::from("x")))
        );
    }

    #[test]
    fn parses_edit() {
        let cli = Cli::try_parse_from([
            "dew",
            "edit",
            "3",
            "--title",
            "New",
            "--status",
            "completed",
            "--clear-description",
        ])
        .unwrap();

        match cli.command {
            Some(Command::Edit {
                id,
                title,
                clear_description,
                status,
                ..
            }) => {
                assert_eq!(id, 3);
                assert_eq!(title.as_deref(), Some("New"));
                assert!(clear_description);
                assert_eq!(status, Some(TodoStatus::Completed));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn description_conflicts_with_clear() {
        let result = Cli::try_parse_from([
            "dew",
            "edit",
            "3",
            "--description",
            "x",
            "--clear-description",
        ]);

        assert!(result.is_err());
    }

    #[test]
    fn delete_asks_unless_yes() {
        let cli = Cli::try_parse_from(["dew", "delete", "7"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Command::Delete { id: 7, yes: false })
        ));

        let cli = Cli::try_parse_from(["dew", "delete", "7", "--yes"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Command::Delete { id: 7, yes: true })
        ));
    }

    #[test]
    fn delete_prompt_names_the_todo() {
        let todo = Todo {
            id: 7,
            title: String::from("Buy milk"),
            description: None,
            status: TodoStatus::Pending,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        };

        assert_eq!(
            delete_prompt(Some(&todo), 7),
            "Are you sure you want to delete \"Buy milk\"? This action cannot be undone."
        );
        assert!(delete_prompt(None, 7).contains("delete todo 7?"));
    }

    #[test]
    fn list_filter() {
        let cli = Cli::try_parse_from(["dew", "list", "--filter", "pending"]).unwrap();

        assert!(matches!(
            cli.command,
            Some(Command::List {
                filter: StatusFilter::Pending
            })
        ));
    }
}
