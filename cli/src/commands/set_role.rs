use anyhow::{Context, Result};
use newsroom_access::{Backend, PolicyGate, RemoteBackend};
use newsroom_shared::Role;

pub async fn run(user_id: &str, role: Role) -> Result<()> {
    let backend = RemoteBackend::from_env().context("remote backend configuration")?;
    // The gate re-resolves the session server-side; an expired or
    // non-admin token fails here, not after the write.
    let gated = PolicyGate::new(backend);
    gated
        .set_role(user_id, role)
        .await
        .context("role mutation")?;
    tracing::info!(%user_id, %role, "role updated");
    Ok(())
}
