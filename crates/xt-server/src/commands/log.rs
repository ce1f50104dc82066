//! `xt log` subcommands, printing JSON to the writer.

use std::io::Write;

use anyhow::Result;
use xt_core::{EntryInput, LogQuery, Store, activity};

/// Adds an exercise and prints the resulting entry.
pub fn add<W: Write, S: Store + ?Sized>(
    writer: &mut W,
    store: &mut S,
    user_id: &str,
    input: &EntryInput,
) -> Result<()> {
    let entry = activity::add_entry(store, user_id, input)?;
    writeln!(writer, "{}", serde_json::to_string_pretty(&entry)?)?;
    Ok(())
}

/// Prints a user's filtered log.
pub fn show<W: Write, S: Store + ?Sized>(
    writer: &mut W,
    store: &S,
    user_id: &str,
    query: &LogQuery,
) -> Result<()> {
    let view = activity::get_logs(store, user_id, query)?;
    writeln!(writer, "{}", serde_json::to_string_pretty(&view)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::Value;
    use xt_core::{MemoryStore, directory};

    #[test]
    fn add_then_show_round_trips() {
        let mut store = MemoryStore::new();
        let user = directory::register(&mut store, "Alice").unwrap();
        let input = EntryInput {
            description: "run".to_string(),
            duration: "30".to_string(),
            date: Some("2024-01-01".to_string()),
        };
        add(&mut Vec::new(), &mut store, user.id.as_str(), &input).unwrap();

        let mut output = Vec::new();
        show(&mut output, &store, user.id.as_str(), &LogQuery::default()).unwrap();

        let view: Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(view["count"], 1);
        assert_eq!(view["log"][0]["date"], "Mon Jan 01 2024");
        assert_eq!(view["log"][0]["duration"], 30);
    }

    #[test]
    fn show_unknown_user_fails() {
        let store = MemoryStore::new();
        let err = show(&mut Vec::new(), &store, "ghost", &LogQuery::default()).unwrap_err();
        assert_eq!(err.to_string(), "User not found");
    }
}
