use anyhow::Result;
use newsroom_shared::{authorize, Decision, Role, RoleSet};

use crate::cli::RoleArg;

pub fn run(role: RoleArg, require: &[RoleArg], anonymous: bool) -> Result<()> {
    let role: Role = role.into();
    let roles: Vec<Role> = require.iter().map(|&arg| arg.into()).collect();
    let required = RoleSet::of(&roles);

    match authorize(role, !anonymous, required) {
        Decision::Allow => tracing::info!(%role, %required, "ALLOW"),
        Decision::Deny(reason) => tracing::info!(%role, %required, ?reason, "DENY"),
    }
    Ok(())
}
