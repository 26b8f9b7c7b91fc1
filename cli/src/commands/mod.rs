pub mod article;
pub mod feed;
pub mod gate;
pub mod set_role;
pub mod stats;

use anyhow::Result;

use crate::cli::{Cli, Commands};

pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Feed {
            demo,
            query,
            category,
        } => feed::run(demo, &query, category.as_deref()).await,
        Commands::Article { id, demo } => article::run(id.as_deref(), demo).await,
        Commands::Gate {
            role,
            require,
            anonymous,
        } => gate::run(role, &require, anonymous),
        Commands::SetRole { user_id, role } => set_role::run(&user_id, role.into()).await,
        Commands::Stats { demo } => stats::run(demo).await,
    }
}
