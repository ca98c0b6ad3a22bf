//! Property check: for any sequence of local edits, replaying the
//! broadcast change records into a second, freshly started client yields
//! an identical sheet.

use std::sync::Arc;

use proptest::prelude::*;

use flatsheet_core::{CellAddr, ColumnSpec, MemoryGrid};
use flatsheet_protocol::{RoomId, SessionContext, UserProfile};
use flatsheet_store::MemorySheetStore;
use flatsheet_sync::{MemoryHub, SyncSession};

/// One abstract edit; indexes are taken modulo the live row/column
/// counts so every generated sequence is applicable.
#[derive(Debug, Clone)]
enum Op {
    AddRow,
    AddColumn(String),
    EditCell { row: usize, column: usize, value: String },
    RemoveRow(usize),
    RemoveColumn(usize),
    Rotate(usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => Just(Op::AddRow),
        2 => "[a-z]{1,8}".prop_map(Op::AddColumn),
        4 => (any::<usize>(), any::<usize>(), "[ -~]{0,12}").prop_map(|(row, column, value)| {
            Op::EditCell { row, column, value }
        }),
        1 => any::<usize>().prop_map(Op::RemoveRow),
        1 => any::<usize>().prop_map(Op::RemoveColumn),
        1 => any::<usize>().prop_map(Op::Rotate),
    ]
}

async fn apply(session: &mut SyncSession, op: Op) {
    match op {
        Op::AddRow => {
            session.add_row().await.expect("add row");
        }
        Op::AddColumn(name) => {
            session
                .add_column(ColumnSpec::text(name))
                .await
                .expect("add column");
        }
        Op::EditCell { row, column, value } => {
            let sheet = session.sheet();
            if sheet.rows.is_empty() || sheet.columns.is_empty() {
                return;
            }
            let cell = CellAddr::new(
                sheet.rows[row % sheet.rows.len()].id,
                sheet.columns[column % sheet.columns.len()].id,
            );
            session.edit_cell(cell, value).await.expect("edit cell");
        }
        Op::RemoveRow(index) => {
            let rows = &session.sheet().rows;
            if rows.is_empty() {
                return;
            }
            let id = rows[index % rows.len()].id;
            session.destroy_row(id).await.expect("destroy row");
        }
        Op::RemoveColumn(index) => {
            let columns = &session.sheet().columns;
            if columns.is_empty() {
                return;
            }
            let id = columns[index % columns.len()].id;
            session.destroy_column(id).await.expect("destroy column");
        }
        Op::Rotate(by) => {
            let mut order = session.sheet().row_order();
            if order.len() < 2 {
                return;
            }
            let by = by % order.len();
            order.rotate_left(by);
            session.drag_started();
            session.drag_moved();
            session
                .drag_dropped(&order)
                .await
                .expect("commit reorder");
        }
    }
}

async fn run_sequence(ops: Vec<Op>) {
    let hub = MemoryHub::new();
    let sender = hub.connect();
    let receiver = hub.connect();

    let mut a = SyncSession::open(
        Box::new(MemoryGrid::new()),
        Arc::new(MemorySheetStore::new()),
        Arc::new(sender),
        SessionContext::new(UserProfile::new("ada", "#f00"), RoomId::new("prop")),
    )
    .await
    .expect("open a");

    let mut b = SyncSession::open(
        Box::new(MemoryGrid::new()),
        Arc::new(MemorySheetStore::new()),
        Arc::new(receiver.clone()),
        SessionContext::new(UserProfile::new("brin", "#0f0"), RoomId::new("prop")),
    )
    .await
    .expect("open b");

    for op in ops {
        apply(&mut a, op).await;
    }
    b.pump().await;

    assert_eq!(b.sheet(), a.sheet(), "replayed sheet must converge");
    assert_eq!(receiver.sent_change_count(), 0, "receiver must stay silent");
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_replayed_changes_converge(ops in prop::collection::vec(op_strategy(), 0..40)) {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("runtime");
        rt.block_on(run_sequence(ops));
    }
}
