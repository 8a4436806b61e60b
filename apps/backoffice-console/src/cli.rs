//! Command line definition.

use std::path::PathBuf;

use backoffice_core::{RecordId, ServiceKind};
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "backoffice", about = "Backoffice shell for the users, products, sales and refunds services")]
pub struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, env = "BACKOFFICE_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Print errors as JSON on stderr
    #[arg(long, global = true)]
    pub json_errors: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sign in and persist the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "BACKOFFICE_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the persisted session
    Logout,
    /// Show session and configuration
    Status,
    /// Create an account
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "BACKOFFICE_PASSWORD", hide_env_values = true)]
        password: String,
        /// Extra registration fields as a JSON object
        #[arg(long)]
        data: Option<String>,
    },
    /// Profile of the signed-in user
    Profile,
    /// Check service health
    Health {
        /// Only this service (users, products, sales, refunds)
        service: Option<ServiceKind>,
        /// Check the database endpoint instead of the service itself
        #[arg(long)]
        db: bool,
    },
    /// Resolve a route as the web shell would
    Open { path: String },
    /// Users resource
    #[command(subcommand)]
    Users(CrudCommand),
    /// Products resource
    #[command(subcommand)]
    Products(ProductsCommand),
    /// Sales resource
    #[command(subcommand)]
    Sales(SalesCommand),
    /// Refunds resource
    #[command(subcommand)]
    Refunds(CrudCommand),
}

/// Operations shared by every resource.
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum CrudCommand {
    List,
    Get {
        id: RecordId,
    },
    Create(DataArgs),
    Update {
        id: RecordId,
        #[command(flatten)]
        data: DataArgs,
    },
    Delete {
        id: RecordId,
    },
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct DataArgs {
    /// Record fields as a JSON object
    #[arg(long)]
    pub data: String,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum ProductsCommand {
    #[command(flatten)]
    Crud(CrudCommand),
    /// Products joined with their users
    WithUsers,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum SalesCommand {
    #[command(flatten)]
    Crud(CrudCommand),
    /// Sales enriched with data from the other services
    WithExternal,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("backoffice").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_resource_commands() {
        let cli = parse(&["sales", "update", "12", "--data", r#"{"cantidad":2}"#]);
        assert!(matches!(
            cli.command,
            Command::Sales(SalesCommand::Crud(CrudCommand::Update { ref id, .. }))
                if *id == RecordId::Number(12)
        ));

        let cli = parse(&["products", "with-users"]);
        assert!(matches!(cli.command, Command::Products(ProductsCommand::WithUsers)));

        let cli = parse(&["users", "get", "u-1"]);
        assert!(matches!(
            cli.command,
            Command::Users(CrudCommand::Get { ref id }) if *id == RecordId::from("u-1")
        ));
    }

    #[test]
    fn test_health_service_argument() {
        let cli = parse(&["health", "refunds", "--db"]);
        assert!(matches!(
            cli.command,
            Command::Health {
                service: Some(ServiceKind::Refunds),
                db: true
            }
        ));
        assert!(Cli::try_parse_from(["backoffice", "health", "orders"]).is_err());
    }

    #[test]
    fn test_with_external_only_on_sales() {
        assert!(Cli::try_parse_from(["backoffice", "refunds", "with-external"]).is_err());
        assert!(Cli::try_parse_from(["backoffice", "sales", "with-external"]).is_ok());
    }
}
