//! Shared helpers for command handlers.

use stride_core::{Console, Entity, EntityId, EntityState, PageQuery};

use crate::cli::ListArgs;
use crate::error::CliError;

/// Build a `PageQuery` from list args, falling back to the console's
/// configured page size.
pub fn page_query(console: &Console, list: &ListArgs) -> PageQuery {
    let mut query = PageQuery::new(
        list.page,
        list.size.unwrap_or(console.config().page_size),
    );
    if let Some(ref sort) = list.sort {
        query = query.sorted(sort.clone());
    } else {
        query = query.sorted("id,asc");
    }
    query
}

/// Pull the detail record out of a slice state after a successful
/// fetch/create/update, or fail with a not-found error.
pub fn take_entity<E: Entity>(
    state: EntityState<E>,
    resource_type: &str,
    identifier: EntityId,
    list_command: &str,
) -> Result<E, CliError> {
    state.entity.ok_or_else(|| CliError::NotFound {
        resource_type: resource_type.into(),
        identifier: identifier.to_string(),
        list_command: list_command.into(),
    })
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// One-line acknowledgement for a completed write, to stderr so it never
/// pollutes scripted stdout.
pub fn ack(message: &str, quiet: bool) {
    if !quiet {
        eprintln!("{message}");
    }
}
