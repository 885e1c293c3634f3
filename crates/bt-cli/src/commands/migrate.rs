//! Moving anonymous data to a signed-in user.

use std::io::Write;

use anyhow::{Result, bail};
use bt_core::{Owner, StateStore};

use crate::Config;

/// Hands everything recorded before sign-in to the configured user.
///
/// The user's existing slices are replaced by the anonymous copies.
pub fn run<W: Write, S: StateStore>(writer: &mut W, store: &mut S, config: &Config) -> Result<()> {
    let Owner::User(user) = config.owner()? else {
        bail!("no user configured; set `user` in config.toml or BT_USER");
    };

    let moved = store.migrate_anonymous(&user)?;
    tracing::info!(%user, moved, "migrated anonymous data");
    if moved == 0 {
        writeln!(writer, "No anonymous data to migrate.")?;
    } else {
        writeln!(
            writer,
            "Moved {moved} kind{} of anonymous data to {user}.",
            if moved == 1 { "" } else { "s" }
        )?;
    }
    Ok(())
}
