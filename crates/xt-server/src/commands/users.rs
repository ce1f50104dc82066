//! `xt users` subcommands, printing JSON to the writer.

use std::io::Write;

use anyhow::Result;
use xt_core::{Store, directory};

/// Registers a user and prints `{username, _id}`.
pub fn add<W: Write, S: Store + ?Sized>(writer: &mut W, store: &mut S, name: &str) -> Result<()> {
    let user = directory::register(store, name)?;
    writeln!(writer, "{}", serde_json::to_string_pretty(&user)?)?;
    Ok(())
}

/// Prints every user as a JSON array.
pub fn list<W: Write, S: Store + ?Sized>(writer: &mut W, store: &S) -> Result<()> {
    let users = directory::list_all(store)?;
    writeln!(writer, "{}", serde_json::to_string_pretty(&users)?)?;
    Ok(())
}
