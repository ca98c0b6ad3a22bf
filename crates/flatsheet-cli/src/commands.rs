//! Command implementations against a local, offline session.
//!
//! The CLI runs the same synchronization core as a connected client, just
//! over the null transport: broadcasts and presence sends are skipped,
//! persistence and capture behave identically.

use std::path::Path;
use std::sync::Arc;

use anyhow::{anyhow, bail, Result};
use dialoguer::Confirm;
use tracing::debug;

use flatsheet_core::{CellAddr, ColumnId, ColumnSpec, MemoryGrid, RowId};
use flatsheet_protocol::{RoomId, SessionContext, UserProfile};
use flatsheet_store::SqliteSheetStore;
use flatsheet_sync::{NullTransport, SyncSession};

use crate::cli::ShowFormat;

const FIRST_RUN_HINT: &str =
    "This workspace is empty. Add a column to get started: flatsheet add-column <NAME>";

/// Open the offline session backing every command
pub async fn open_session(db: &Path) -> Result<SyncSession> {
    let store = SqliteSheetStore::open(db)?;
    let ctx = SessionContext::new(UserProfile::new("local", "#000000"), RoomId::new("local"));
    let session = SyncSession::open(
        Box::new(MemoryGrid::new()),
        Arc::new(store),
        Arc::new(NullTransport),
        ctx,
    )
    .await?;
    Ok(session)
}

/// Ask before a destructive action; `--yes` skips the prompt. Declining
/// is normal control flow, not an error.
fn confirmed(prompt: &str, assume_yes: bool) -> Result<bool> {
    if assume_yes {
        return Ok(true);
    }
    let answer = Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()?;
    if !answer {
        debug!("action declined");
        eprintln!("Aborted.");
    }
    Ok(answer)
}

fn resolve_row(session: &SyncSession, index: usize) -> Result<RowId> {
    let rows = &session.sheet().rows;
    if index == 0 || index > rows.len() {
        bail!("no row {index}; the sheet has {} row(s)", rows.len());
    }
    Ok(rows[index - 1].id)
}

fn resolve_column(session: &SyncSession, name: &str) -> Result<ColumnId> {
    session
        .sheet()
        .column_by_name(name)
        .map(|column| column.id)
        .ok_or_else(|| anyhow!("no column named {name:?}"))
}

pub async fn show(session: &SyncSession, format: ShowFormat) -> Result<()> {
    if session.first_run() {
        eprintln!("{FIRST_RUN_HINT}");
    }
    let rendered = match format {
        ShowFormat::Json => session.export_json()?,
        ShowFormat::Csv => session.export_csv()?,
    };
    println!("{rendered}");
    Ok(())
}

pub async fn add_row(session: &mut SyncSession) -> Result<()> {
    if session.sheet().is_blank() {
        bail!("add a column before adding rows");
    }
    session.add_row().await?;
    println!("Added row {}.", session.sheet().rows.len());
    Ok(())
}

pub async fn add_column(session: &mut SyncSession, name: String) -> Result<()> {
    let column = session.add_column(ColumnSpec::text(name)).await?;
    println!("Added column {:?}.", column.name);
    Ok(())
}

pub async fn set(
    session: &mut SyncSession,
    row: usize,
    column: &str,
    value: String,
) -> Result<()> {
    let cell = CellAddr::new(resolve_row(session, row)?, resolve_column(session, column)?);
    session.edit_cell(cell, value).await?;
    Ok(())
}

pub async fn destroy_row(session: &mut SyncSession, row: usize, assume_yes: bool) -> Result<()> {
    let id = resolve_row(session, row)?;
    if !confirmed(
        "Sure you want to delete this row and its contents?",
        assume_yes,
    )? {
        return Ok(());
    }
    session.destroy_row(id).await?;
    println!("Row deleted.");
    Ok(())
}

pub async fn destroy_column(
    session: &mut SyncSession,
    column: &str,
    assume_yes: bool,
) -> Result<()> {
    let id = resolve_column(session, column)?;
    if !confirmed(
        "Sure you want to delete this column and its contents?",
        assume_yes,
    )? {
        return Ok(());
    }
    session.destroy_column(id).await?;
    println!("Column deleted.");
    Ok(())
}

pub async fn reset(session: &mut SyncSession, assume_yes: bool) -> Result<()> {
    if !confirmed(
        "Are you sure you want to reset this project? You will start over with an empty workspace.",
        assume_yes,
    )? {
        return Ok(());
    }
    session.reset().await?;
    eprintln!("{FIRST_RUN_HINT}");
    Ok(())
}
