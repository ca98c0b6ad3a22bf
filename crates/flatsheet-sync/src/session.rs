//! The synchronization session: one client's view of a shared sheet.
//!
//! [`SyncSession`] owns the grid collaborator and threads every accepted
//! mutation through one capture pipeline: persist the full document, then
//! broadcast the minimal change record unless the session is applying a
//! remote change or inside a drag gesture. Inbound frames are pumped
//! through [`SyncSession::pump`], which decodes, dispatches and drops
//! malformed traffic without tearing anything down.
//!
//! The store is a best-effort mirror: a failed write is logged and
//! surfaced through [`SyncSession::last_write_failed`], but the grid
//! stays authoritative and editable.

use std::sync::Arc;

use tracing::{debug, info, warn};

use flatsheet_core::{
    export, CellAddr, ChangeRecord, Column, ColumnId, ColumnSpec, CoreResult, GridEditor, RowId,
    Sheet,
};
use flatsheet_protocol::{SessionContext, WireMessage};
use flatsheet_store::SheetStore;

use crate::error::{SyncError, SyncResult};
use crate::presence::PresenceTracker;
use crate::reorder::{DragPhase, ReorderCoordinator};
use crate::suppress::SuppressFlag;
use crate::transport::Transport;

/// One client's synchronization session
pub struct SyncSession {
    grid: Box<dyn GridEditor>,
    store: Arc<dyn SheetStore>,
    transport: Arc<dyn Transport>,
    ctx: SessionContext,
    suppress: SuppressFlag,
    reorder: ReorderCoordinator,
    presence: PresenceTracker,
    first_run: bool,
    last_write_failed: bool,
}

impl SyncSession {
    /// Open a session: load the stored document (if any) into the grid
    /// and announce the user to the room.
    ///
    /// Startup is a three-way branch: key absent, or present with zero
    /// columns, both land in a blank document with first-run guidance;
    /// present with at least one column loads it and hides the guidance.
    pub async fn open(
        mut grid: Box<dyn GridEditor>,
        store: Arc<dyn SheetStore>,
        transport: Arc<dyn Transport>,
        ctx: SessionContext,
    ) -> SyncResult<Self> {
        let first_run = match store.load().await? {
            Some(sheet) if !sheet.is_blank() => {
                info!(columns = sheet.columns.len(), rows = sheet.rows.len(), "document loaded");
                grid.import(sheet);
                false
            }
            Some(_) => {
                debug!("stored document has no columns; starting blank");
                grid.clear();
                true
            }
            None => {
                debug!("no stored document; starting blank");
                grid.clear();
                true
            }
        };

        let session = Self {
            grid,
            store,
            transport,
            ctx,
            suppress: SuppressFlag::new(),
            reorder: ReorderCoordinator::new(),
            presence: PresenceTracker::new(),
            first_run,
            last_write_failed: false,
        };
        session.announce().await;
        Ok(session)
    }

    /// Join the room and announce the local user, if connected
    async fn announce(&self) {
        if !self.transport.is_connected() {
            return;
        }
        let join = WireMessage::Room {
            room: self.ctx.room.clone(),
        };
        let hello = WireMessage::User {
            user: self.ctx.user.clone(),
        };
        for message in [join, hello] {
            if let Err(e) = self.transport.send(message).await {
                debug!(error = %e, "announce skipped");
            }
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// The authoritative document
    pub fn sheet(&self) -> &Sheet {
        self.grid.sheet()
    }

    /// Whether first-run guidance should be shown (document has no
    /// columns yet)
    pub fn first_run(&self) -> bool {
        self.first_run
    }

    /// Whether the most recent persistence write was rejected
    pub fn last_write_failed(&self) -> bool {
        self.last_write_failed
    }

    /// Remote presence marks
    pub fn presence(&self) -> &PresenceTracker {
        &self.presence
    }

    /// Render the current rows as pretty-printed JSON
    pub fn export_json(&self) -> CoreResult<String> {
        export::rows_as_json(self.grid.sheet())
    }

    /// Render the current rows as CSV
    pub fn export_csv(&self) -> CoreResult<String> {
        export::rows_as_csv(self.grid.sheet())
    }

    // ------------------------------------------------------------------
    // Local edits
    // ------------------------------------------------------------------

    /// Append a blank row
    pub async fn add_row(&mut self) -> SyncResult<RowId> {
        let record = self.grid.add_row();
        let id = match &record {
            ChangeRecord::RowAdded { row } => *row,
            _ => unreachable!("add_row produced a non-row record"),
        };
        self.record(record).await;
        Ok(id)
    }

    /// Append a column
    pub async fn add_column(&mut self, spec: ColumnSpec) -> SyncResult<Column> {
        let record = self.grid.add_column(spec);
        let column = match &record {
            ChangeRecord::ColumnAdded { column } => column.clone(),
            _ => unreachable!("add_column produced a non-column record"),
        };
        self.record(record).await;
        Ok(column)
    }

    /// Overwrite one cell's text
    pub async fn edit_cell(&mut self, cell: CellAddr, value: String) -> SyncResult<()> {
        let record = self.grid.set_cell(cell, value)?;
        self.record(record).await;
        Ok(())
    }

    /// Remove a row and all its cells
    pub async fn destroy_row(&mut self, id: RowId) -> SyncResult<()> {
        let record = self.grid.destroy_row(id)?;
        self.record(record).await;
        Ok(())
    }

    /// Remove a column and its cell from every row
    pub async fn destroy_column(&mut self, id: ColumnId) -> SyncResult<()> {
        let record = self.grid.destroy_column(id)?;
        self.record(record).await;
        Ok(())
    }

    /// Reset to an empty workspace: clear the grid and delete the stored
    /// document. Local-only; peers are not reset.
    pub async fn reset(&mut self) -> SyncResult<()> {
        self.grid.clear();
        self.first_run = true;
        self.store.remove().await?;
        info!("workspace reset");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Drag gesture
    // ------------------------------------------------------------------

    /// The grid reported a dragstart
    pub fn drag_started(&mut self) {
        self.reorder.begin();
    }

    /// An intermediate drag move/hover event; swallowed
    pub fn drag_moved(&mut self) {
        self.reorder.hover();
    }

    /// The grid reported a drop with the final row order it now shows.
    /// Emits exactly one coalesced rows-reordered change.
    pub async fn drag_dropped(&mut self, order: &[RowId]) -> SyncResult<()> {
        if !self.reorder.commit() {
            return Ok(());
        }
        let applied = self.grid.apply_reorder(order);
        let result = match applied {
            Ok(record) => {
                self.record(record).await;
                Ok(())
            }
            Err(e) => Err(SyncError::from(e)),
        };
        self.reorder.finish();
        result
    }

    // ------------------------------------------------------------------
    // Presence
    // ------------------------------------------------------------------

    /// The local user focused a cell
    pub async fn focus_cell(&self, cell: CellAddr) {
        self.send_presence(WireMessage::CellFocus {
            cell,
            color: self.ctx.user.color.clone(),
        })
        .await;
    }

    /// The local user left a cell
    pub async fn blur_cell(&self, cell: CellAddr) {
        self.send_presence(WireMessage::CellBlur { cell }).await;
    }

    async fn send_presence(&self, message: WireMessage) {
        if !self.transport.is_connected() {
            return;
        }
        if let Err(e) = self.transport.send(message).await {
            debug!(error = %e, "presence send skipped");
        }
    }

    // ------------------------------------------------------------------
    // Inbound traffic
    // ------------------------------------------------------------------

    /// Drain and dispatch all inbound frames; malformed or unappliable
    /// traffic is dropped with a warning. Returns how many frames were
    /// handled successfully.
    pub async fn pump(&mut self) -> usize {
        let mut handled = 0;
        for raw in self.transport.drain() {
            let message = match WireMessage::decode(&raw) {
                Ok(message) => message,
                Err(e) => {
                    warn!(error = %e, "dropping malformed frame");
                    continue;
                }
            };
            match self.handle_message(message).await {
                Ok(()) => handled += 1,
                Err(e) => warn!(error = %e, "dropping inbound message"),
            }
        }
        handled
    }

    /// Dispatch one inbound message
    pub async fn handle_message(&mut self, message: WireMessage) -> SyncResult<()> {
        match message {
            WireMessage::Change { change } => self.apply_remote(change).await,
            WireMessage::CellFocus { cell, color } => {
                let exists = self.grid.contains_cell(&cell);
                self.presence.remote_focus(cell, color, exists);
                Ok(())
            }
            WireMessage::CellBlur { cell } => {
                self.presence.remote_blur(&cell);
                Ok(())
            }
            WireMessage::UpdateUsers { users } => {
                self.presence.set_roster(users);
                Ok(())
            }
            // Join/announce traffic is consumed by the room itself.
            WireMessage::Room { .. } | WireMessage::User { .. } => Ok(()),
        }
    }

    /// Apply a change received from a peer.
    ///
    /// The suppression guard spans the grid mutation and the capture
    /// step, so the applied change persists locally but is never
    /// rebroadcast. The guard's drop releases the mode on every exit
    /// path; a failed apply cannot wedge future local broadcasts.
    pub async fn apply_remote(&mut self, change: ChangeRecord) -> SyncResult<()> {
        let _guard = self.suppress.enter_remote();
        let record = self.apply_to_grid(change).map_err(|e| {
            warn!(error = %e, "unappliable remote change dropped");
            SyncError::remote_apply(e)
        })?;
        self.record(record).await;
        Ok(())
    }

    fn apply_to_grid(&mut self, change: ChangeRecord) -> CoreResult<ChangeRecord> {
        match change {
            ChangeRecord::CellEdit { cell, new, .. } => self.grid.set_cell(cell, new),
            ChangeRecord::RowAdded { row } => self.grid.insert_row(row),
            ChangeRecord::RowRemoved { row } => self.grid.destroy_row(row),
            ChangeRecord::ColumnAdded { column } => self.grid.insert_column(column),
            ChangeRecord::ColumnRemoved { column } => self.grid.destroy_column(column),
            ChangeRecord::RowsReordered { order } => self.grid.apply_reorder(&order),
        }
    }

    // ------------------------------------------------------------------
    // Capture pipeline
    // ------------------------------------------------------------------

    /// One accepted change: refresh the genesis flag, persist the full
    /// document, and broadcast unless suppressed.
    async fn record(&mut self, change: ChangeRecord) {
        self.first_run = self.grid.sheet().is_blank();
        self.persist().await;

        let suppressed =
            self.suppress.is_suppressing() || self.reorder.phase() == DragPhase::Sorting;
        if suppressed {
            debug!(kind = change.kind(), "broadcast suppressed");
            return;
        }
        self.broadcast(change).await;
    }

    /// Write the full document to the store. Failures degrade, they do
    /// not block: the grid stays authoritative.
    async fn persist(&mut self) {
        let sheet = self.grid.sheet().clone();
        match self.store.save(&sheet).await {
            Ok(()) => self.last_write_failed = false,
            Err(e) => {
                warn!(error = %e, "document write failed; in-memory state remains authoritative");
                self.last_write_failed = true;
            }
        }
    }

    async fn broadcast(&self, change: ChangeRecord) {
        if !self.transport.is_connected() {
            return;
        }
        if let Err(e) = self.transport.send(WireMessage::Change { change }).await {
            debug!(error = %e, "broadcast skipped");
        }
    }
}
