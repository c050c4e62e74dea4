//! Command-line surface of the `todo` binary

use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use core_config::{FromEnv, env_required};
use eyre::{Result, WrapErr};
use grpc_client::{AuthInterceptor, ChannelConfig, create_channel_with_config};
use rpc::todo::v1::{
    AddTaskRequest, CompleteTaskRequest, ListTasksRequest, Task,
    todo_service_client::TodoServiceClient,
};
use tonic::service::interceptor::InterceptedService;
use tonic::transport::Channel;

use crate::config::AppConfig;

pub const CALL_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Parser)]
#[command(name = "todo", version, about = "Todo service and command-line client")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the gRPC listener and HTTP gateway
    Serve,
    /// Add a task
    Add {
        #[arg(long)]
        title: String,
        #[arg(long = "desc", default_value = "")]
        description: String,
        #[command(flatten)]
        endpoint: Endpoint,
    },
    /// List all tasks
    List {
        #[command(flatten)]
        endpoint: Endpoint,
    },
    /// Mark a task as completed
    Complete {
        #[arg(long)]
        id: i64,
        #[command(flatten)]
        endpoint: Endpoint,
    },
}

#[derive(Debug, Args)]
pub struct Endpoint {
    #[arg(long, default_value = "localhost")]
    pub host: String,
    #[arg(long, default_value_t = crate::config::DEFAULT_GRPC_PORT)]
    pub port: u16,
    /// Bearer token; falls back to AUTH_TOKEN
    #[arg(long)]
    pub token: Option<String>,
}

pub type Client = TodoServiceClient<InterceptedService<Channel, AuthInterceptor>>;

impl Endpoint {
    pub fn uri(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    fn token(&self) -> Result<String> {
        match &self.token {
            Some(token) => Ok(token.clone()),
            None => Ok(env_required("AUTH_TOKEN")?),
        }
    }

    /// Connect with the bearer credential attached to every call
    pub async fn connect(&self) -> Result<Client> {
        let config = ChannelConfig::default().with_request_timeout(CALL_TIMEOUT);
        let channel = create_channel_with_config(self.uri(), config)
            .await
            .wrap_err_with(|| format!("Failed to reach {}", self.uri()))?;
        let interceptor = AuthInterceptor::bearer(self.token()?)?;
        Ok(TodoServiceClient::with_interceptor(channel, interceptor))
    }
}

fn render(task: &Task) -> String {
    let mark = if task.completed { "x" } else { " " };
    if task.description.is_empty() {
        format!("{:>4}. [{mark}] {}", task.id, task.title)
    } else {
        format!("{:>4}. [{mark}] {} - {}", task.id, task.title, task.description)
    }
}

/// Execute one command to completion
pub async fn execute(command: Command) -> Result<()> {
    match command {
        Command::Serve => {
            let config = AppConfig::from_env().wrap_err("Failed to load configuration")?;
            core_config::tracing::init_tracing(&config.environment);
            crate::server::run(config).await
        }
        Command::Add {
            title,
            description,
            endpoint,
        } => {
            let mut client = endpoint.connect().await?;
            let response = client
                .add_task(AddTaskRequest {
                    task: Some(Task {
                        title,
                        description,
                        ..Default::default()
                    }),
                })
                .await?
                .into_inner();
            if let Some(task) = response.task {
                println!("Added task {}", task.id);
            }
            Ok(())
        }
        Command::List { endpoint } => {
            let mut client = endpoint.connect().await?;
            let tasks = client.list_tasks(ListTasksRequest {}).await?.into_inner().tasks;
            if tasks.is_empty() {
                println!("No tasks");
            }
            for task in &tasks {
                println!("{}", render(task));
            }
            Ok(())
        }
        Command::Complete { id, endpoint } => {
            let mut client = endpoint.connect().await?;
            client.complete_task(CompleteTaskRequest { id }).await?;
            println!("Completed task {id}");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_add() {
        let cli = Cli::try_parse_from([
            "todo", "add", "--title", "Buy milk", "--desc", "2L", "--port", "6000",
        ])
        .unwrap();

        match cli.command {
            Command::Add {
                title,
                description,
                endpoint,
            } => {
                assert_eq!(title, "Buy milk");
                assert_eq!(description, "2L");
                assert_eq!(endpoint.uri(), "http://localhost:6000");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_complete_requires_id() {
        assert!(Cli::try_parse_from(["todo", "complete"]).is_err());
    }

    #[test]
    fn test_token_falls_back_to_env() {
        let cli = Cli::try_parse_from(["todo", "list"]).unwrap();
        let Command::List { endpoint } = cli.command else {
            panic!("expected list");
        };

        temp_env::with_var("AUTH_TOKEN", Some("from-env"), || {
            assert_eq!(endpoint.token().unwrap(), "from-env");
        });
        temp_env::with_var("AUTH_TOKEN", None::<&str>, || {
            assert!(endpoint.token().is_err());
        });
    }

    #[test]
    fn test_render() {
        let task = Task {
            id: 1,
            title: "Buy milk".to_string(),
            description: String::new(),
            completed: true,
        };
        assert_eq!(render(&task), "   1. [x] Buy milk");
    }
}
