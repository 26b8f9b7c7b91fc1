use clap::{Parser, Subcommand, ValueEnum};
use newsroom_shared::Role;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum RoleArg {
    Reader,
    Editor,
    Admin,
}

impl From<RoleArg> for Role {
    fn from(value: RoleArg) -> Role {
        match value {
            RoleArg::Reader => Role::Reader,
            RoleArg::Editor => Role::Editor,
            RoleArg::Admin => Role::Admin,
        }
    }
}

#[derive(Parser)]
#[command(name = "nr-cli", version, about = "Newsroom operator CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render the public feed (hero + grid) with optional filtering.
    Feed {
        /// Run against a seeded in-memory backend instead of the remote.
        #[arg(long)]
        demo: bool,
        /// Title search, case-insensitive substring.
        #[arg(long, default_value = "")]
        query: String,
        /// Category filter ("All" disables it).
        #[arg(long)]
        category: Option<String>,
    },
    /// Show one article with its comment thread.
    Article {
        /// Article id; in demo mode defaults to the newest article.
        id: Option<String>,
        #[arg(long)]
        demo: bool,
    },
    /// Evaluate the access gate for a role/required-set pair.
    Gate {
        /// Role of the caller.
        #[arg(long, value_enum, default_value = "reader")]
        role: RoleArg,
        /// Required roles, comma separated.
        #[arg(long, value_enum, value_delimiter = ',', required = true)]
        require: Vec<RoleArg>,
        /// Evaluate as an anonymous visitor.
        #[arg(long)]
        anonymous: bool,
    },
    /// Change a user's role (admin session required).
    SetRole {
        /// Profile id to change.
        #[arg(long)]
        user_id: String,
        #[arg(long, value_enum)]
        role: RoleArg,
    },
    /// Print the admin dashboard counters.
    Stats {
        #[arg(long)]
        demo: bool,
    },
}
