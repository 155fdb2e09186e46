//! Element persistence collaborator.
//!
//! The engine never talks to storage directly. It emits `Action::Persist`
//! requests; a host drives them through an `ElementPersistence`
//! implementation and feeds each result back into the engine. `drain` does
//! exactly that for hosts that want the whole loop in one call.

#[cfg(test)]
#[path = "persist_test.rs"]
mod persist_test;

use std::collections::VecDeque;

use tracing::{debug, info};

use crate::doc::{BoardId, Element, ElementDraft, ElementId, ElementPatch};
use crate::engine::{Action, EngineCore};
use crate::error::PersistError;
use crate::sync::{PendingOp, PersistOp, PersistOutcome};

// =============================================================================
// PERSISTENCE TRAIT
// =============================================================================

/// Storage backend for board elements. Enables mocking in tests.
///
/// Futures are not `Send`: browser hosts implement this on top of `fetch`.
#[async_trait::async_trait(?Send)]
pub trait ElementPersistence {
    /// Every element on `board_id`.
    ///
    /// # Errors
    ///
    /// Returns a [`PersistError`] if the board cannot be read.
    async fn list(&self, board_id: BoardId) -> Result<Vec<Element>, PersistError>;

    /// Create an element and return it with its server-assigned id.
    ///
    /// # Errors
    ///
    /// Returns a [`PersistError`] if the write is rejected or the transport fails.
    async fn create(&self, board_id: BoardId, draft: &ElementDraft) -> Result<Element, PersistError>;

    /// Apply a sparse update.
    ///
    /// # Errors
    ///
    /// Returns a [`PersistError`] if the element is unknown or the write fails.
    async fn update(&self, id: ElementId, patch: &ElementPatch) -> Result<(), PersistError>;

    /// Delete an element.
    ///
    /// # Errors
    ///
    /// Returns a [`PersistError`] if the element is unknown or the write fails.
    async fn delete(&self, id: ElementId) -> Result<(), PersistError>;
}

/// Send one pending op to the collaborator.
///
/// # Errors
///
/// Propagates the collaborator's [`PersistError`].
pub async fn dispatch<P>(persistence: &P, op: &PendingOp) -> Result<PersistOutcome, PersistError>
where
    P: ElementPersistence + ?Sized,
{
    debug!(op_id = op.op_id, element_id = %op.element_id, "dispatching element write");
    match &op.op {
        PersistOp::Create(draft) => persistence.create(draft.board_id, draft).await.map(PersistOutcome::Created),
        PersistOp::Update(patch) => persistence.update(op.element_id, patch).await.map(|()| PersistOutcome::Done),
        PersistOp::Delete => persistence.delete(op.element_id).await.map(|()| PersistOutcome::Done),
    }
}

/// Fetch the board's elements and install them as the engine's snapshot.
///
/// # Errors
///
/// Returns the collaborator's [`PersistError`]; the engine is left untouched.
pub async fn load_board<P>(persistence: &P, core: &mut EngineCore) -> Result<Vec<Action>, PersistError>
where
    P: ElementPersistence + ?Sized,
{
    let elements = persistence.list(core.board_id).await?;
    info!(board_id = %core.board_id, count = elements.len(), "board loaded");
    Ok(core.load_snapshot(elements))
}

/// Dispatch every `Action::Persist` in `actions`, resolving each against
/// `core`, until no writes remain. Returns the remaining actions in order.
///
/// Writes run one at a time so a create always lands before the follow-up it
/// unblocks.
pub async fn drain<P>(persistence: &P, core: &mut EngineCore, actions: Vec<Action>) -> Vec<Action>
where
    P: ElementPersistence + ?Sized,
{
    let mut queue: VecDeque<Action> = actions.into();
    let mut rest = Vec::new();
    while let Some(action) = queue.pop_front() {
        match action {
            Action::Persist(op) => {
                let result = dispatch(persistence, &op).await;
                queue.extend(core.resolve_persist(op.op_id, result));
            }
            other => rest.push(other),
        }
    }
    rest
}
