//! Sync ledger: two-phase optimistic updates against the persistence collaborator.
//!
//! DESIGN
//! ======
//! Every committed change is applied to the local store first, then handed
//! to the ledger, which turns it into a `PendingOp` for the host to dispatch.
//! The host reports the outcome back through `resolve`. The ledger tracks a
//! per-element `SyncStatus` so callers can assert on reconciliation instead
//! of timing.
//!
//! Elements created locally have a temporary id until their create is
//! confirmed. Changes made while a create is in flight are coalesced and
//! replayed as one full update (or a delete) against the server id once the
//! create lands.
//!
//! ERROR HANDLING
//! ==============
//! Failures mark the element `Failed` and are not retried automatically.
//! Position/size writes keep local state (best effort); updates registered
//! with a revert patch hand that patch back so the engine can restore it.

#[cfg(test)]
#[path = "sync_test.rs"]
mod sync_test;

use std::collections::HashMap;

use tracing::{info, warn};

use crate::doc::{Element, ElementDraft, ElementId, ElementPatch};
use crate::error::PersistError;

/// Identifier of one dispatched persistence request.
pub type OpId = u64;

/// Per-element reconciliation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStatus {
    /// Exists only in the local store; nothing has been sent.
    Local,
    /// At least one write is in flight.
    Pending,
    /// Every write so far has been acknowledged.
    Confirmed,
    /// A write failed; local state may differ from the server.
    Failed,
}

/// The request the host must send to the persistence collaborator.
#[derive(Debug, Clone, PartialEq)]
pub enum PersistOp {
    Create(ElementDraft),
    Update(ElementPatch),
    Delete,
}

/// A persistence request tagged for later resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingOp {
    pub op_id: OpId,
    pub element_id: ElementId,
    pub op: PersistOp,
}

/// What a successful write returned.
#[derive(Debug, Clone, PartialEq)]
pub enum PersistOutcome {
    /// The collaborator created the element and assigned its id.
    Created(Element),
    /// Update or delete acknowledged.
    Done,
}

/// How to treat local state if an update fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rollback {
    /// Keep the optimistic local value (position, size, rotation).
    #[default]
    BestEffort,
    /// Restore the prior values; for flags where a stale local value would misrepresent storage.
    Revert,
}

/// Work a deferred change still owes once a pending create lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deferred {
    Update,
    Delete,
}

/// What the engine must do after a write resolves.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved {
    /// No in-flight op with that id.
    Unknown,
    /// A create succeeded; re-key `local_id` to `element.id`.
    Created { local_id: ElementId, element: Element, then: Option<Deferred> },
    /// An update or delete succeeded.
    Confirmed { id: ElementId },
    /// A write failed.
    Failed { id: ElementId, error: PersistError, revert: Option<ElementPatch> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OpKind {
    Create,
    Update,
    Delete,
}

#[derive(Debug)]
struct InFlight {
    element_id: ElementId,
    kind: OpKind,
    revert: Option<ElementPatch>,
}

#[derive(Debug, Clone)]
struct Entry {
    status: SyncStatus,
    /// The collaborator knows this element under its current id.
    persisted: bool,
    creating: bool,
    deferred: Option<Deferred>,
    in_flight: u32,
}

impl Entry {
    fn local() -> Self {
        Self { status: SyncStatus::Local, persisted: false, creating: false, deferred: None, in_flight: 0 }
    }

    fn confirmed() -> Self {
        Self { status: SyncStatus::Confirmed, persisted: true, creating: false, deferred: None, in_flight: 0 }
    }
}

#[derive(Debug, Default)]
pub struct SyncLedger {
    next_op: OpId,
    in_flight: HashMap<OpId, InFlight>,
    entries: HashMap<ElementId, Entry>,
}

impl SyncLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget everything and record `ids` as already persisted.
    pub fn reset_confirmed(&mut self, ids: impl IntoIterator<Item = ElementId>) {
        self.in_flight.clear();
        self.entries = ids.into_iter().map(|id| (id, Entry::confirmed())).collect();
    }

    /// Record an element that exists only locally.
    pub fn track_local(&mut self, id: ElementId) {
        self.entries.insert(id, Entry::local());
    }

    #[must_use]
    pub fn status(&self, id: &ElementId) -> Option<SyncStatus> {
        self.entries.get(id).map(|e| e.status)
    }

    /// Whether the collaborator knows this element (create confirmed or loaded).
    #[must_use]
    pub fn is_persisted(&self, id: &ElementId) -> bool {
        self.entries.get(id).is_some_and(|e| e.persisted)
    }

    /// Number of writes awaiting resolution.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Queue a create for a locally built element.
    pub fn create(&mut self, element: &Element) -> PendingOp {
        let entry = self.entries.entry(element.id).or_insert_with(Entry::local);
        entry.creating = true;
        entry.deferred = None;
        entry.status = SyncStatus::Pending;
        entry.in_flight += 1;
        self.issue(element.id, OpKind::Create, None, PersistOp::Create(element.to_draft()))
    }

    /// Whether `id` has never reached the collaborator and no create is in flight.
    #[must_use]
    pub fn needs_create(&self, id: &ElementId) -> bool {
        self.entries.get(id).is_some_and(|e| !e.persisted && !e.creating)
    }

    /// Queue an update. `revert` is handed back if the write fails.
    ///
    /// Returns `None` when no write should be sent now: the element is
    /// local-only, or its create is still in flight (the change is replayed
    /// once the create lands).
    pub fn update(&mut self, id: ElementId, patch: ElementPatch, revert: Option<ElementPatch>) -> Option<PendingOp> {
        let entry = self.entries.get_mut(&id)?;
        if entry.creating {
            if entry.deferred.is_none() {
                entry.deferred = Some(Deferred::Update);
            }
            return None;
        }
        if !entry.persisted {
            return None;
        }
        entry.status = SyncStatus::Pending;
        entry.in_flight += 1;
        Some(self.issue(id, OpKind::Update, revert, PersistOp::Update(patch)))
    }

    /// Queue a delete. Returns `None` when nothing needs to be sent.
    pub fn delete(&mut self, id: ElementId) -> Option<PendingOp> {
        let entry = self.entries.get_mut(&id)?;
        if entry.creating {
            entry.deferred = Some(Deferred::Delete);
            return None;
        }
        if !entry.persisted {
            self.entries.remove(&id);
            return None;
        }
        entry.status = SyncStatus::Pending;
        entry.in_flight += 1;
        Some(self.issue(id, OpKind::Delete, None, PersistOp::Delete))
    }

    /// Apply the collaborator's answer for `op_id`.
    pub fn resolve(&mut self, op_id: OpId, result: Result<PersistOutcome, PersistError>) -> Resolved {
        let Some(op) = self.in_flight.remove(&op_id) else {
            warn!(op_id, "persistence result for unknown op");
            return Resolved::Unknown;
        };
        let id = op.element_id;

        match result {
            Ok(outcome) => self.resolve_ok(op_id, op, outcome),
            Err(error) => {
                warn!(op_id, element_id = %id, error = %error, "element write failed");
                if let Some(entry) = self.entries.get_mut(&id) {
                    entry.in_flight = entry.in_flight.saturating_sub(1);
                    entry.status = SyncStatus::Failed;
                    if op.kind == OpKind::Create {
                        entry.creating = false;
                        entry.persisted = false;
                    }
                }
                Resolved::Failed { id, error, revert: op.revert }
            }
        }
    }

    fn resolve_ok(&mut self, op_id: OpId, op: InFlight, outcome: PersistOutcome) -> Resolved {
        let id = op.element_id;
        match (op.kind, outcome) {
            (OpKind::Create, PersistOutcome::Created(element)) => {
                let mut entry = self.entries.remove(&id).unwrap_or_else(Entry::local);
                entry.in_flight = entry.in_flight.saturating_sub(1);
                entry.creating = false;
                entry.persisted = true;
                let then = entry.deferred.take();
                if entry.status != SyncStatus::Failed && entry.in_flight == 0 {
                    entry.status = SyncStatus::Confirmed;
                }
                info!(op_id, local_id = %id, element_id = %element.id, "element create confirmed");
                self.entries.insert(element.id, entry);
                Resolved::Created { local_id: id, element, then }
            }
            (OpKind::Create, PersistOutcome::Done) => {
                warn!(op_id, element_id = %id, "create acknowledged without an element");
                if let Some(entry) = self.entries.get_mut(&id) {
                    entry.in_flight = entry.in_flight.saturating_sub(1);
                    entry.creating = false;
                    entry.status = SyncStatus::Failed;
                }
                Resolved::Failed { id, error: PersistError::Rejected("create returned no element".into()), revert: None }
            }
            (OpKind::Delete, _) => {
                self.entries.remove(&id);
                Resolved::Confirmed { id }
            }
            (OpKind::Update, _) => {
                if let Some(entry) = self.entries.get_mut(&id) {
                    entry.in_flight = entry.in_flight.saturating_sub(1);
                    if entry.in_flight == 0 && entry.status != SyncStatus::Failed {
                        entry.status = SyncStatus::Confirmed;
                    }
                }
                Resolved::Confirmed { id }
            }
        }
    }

    /// Clear a `Failed` mark before a full resync of `id`.
    pub fn clear_failure(&mut self, id: &ElementId) {
        if let Some(entry) = self.entries.get_mut(id) {
            if entry.status == SyncStatus::Failed {
                entry.status = if entry.persisted { SyncStatus::Confirmed } else { SyncStatus::Local };
            }
        }
    }

    fn issue(&mut self, element_id: ElementId, kind: OpKind, revert: Option<ElementPatch>, op: PersistOp) -> PendingOp {
        self.next_op += 1;
        let op_id = self.next_op;
        self.in_flight.insert(op_id, InFlight { element_id, kind, revert });
        PendingOp { op_id, element_id, op }
    }
}
