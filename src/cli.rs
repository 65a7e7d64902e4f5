use clap::{Parser, Subcommand};

/// Everything else is configured through the environment (see `Config`).
#[derive(Parser, Debug, Clone)]
#[command(name = "inventory-api", version, about = "Inventory REST API")]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Create a new API token for a user and print its key
    IssueToken { username: String },
    /// Deactivate an existing API token
    RevokeToken { key: String },
}

impl Arguments {
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Serve)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_serve() {
        let args = Arguments::parse_from(["inventory-api"]);
        assert_eq!(args.command(), Command::Serve);
    }

    #[test]
    fn parses_issue_token() {
        let args = Arguments::parse_from(["inventory-api", "issue-token", "alice"]);
        assert_eq!(
            args.command(),
            Command::IssueToken {
                username: "alice".to_string()
            }
        );
    }
}
