//! Completion tracking for the current viewer.
//!
//! The remote service is the sole durable store; this state lives for one
//! view mount. Mutations are applied only after server acknowledgment, and
//! each acknowledgment carries a per-chapter sequence number so a response
//! for a superseded action can never overwrite a more recent one.

use std::collections::{HashMap, HashSet};

use crate::model::ChapterId;

//
// ─── COMPLETION SET ────────────────────────────────────────────────────────────
//

/// The set of chapter ids the current viewer has marked watched.
///
/// Membership only; no ordering semantics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletionSet {
    ids: HashSet<ChapterId>,
}

impl CompletionSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn contains(&self, id: ChapterId) -> bool {
        self.ids.contains(&id)
    }

    pub fn insert(&mut self, id: ChapterId) -> bool {
        self.ids.insert(id)
    }

    pub fn remove(&mut self, id: ChapterId) -> bool {
        self.ids.remove(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = ChapterId> + '_ {
        self.ids.iter().copied()
    }
}

impl FromIterator<ChapterId> for CompletionSet {
    fn from_iter<I: IntoIterator<Item = ChapterId>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

//
// ─── ACTION SEQUENCING ─────────────────────────────────────────────────────────
//

/// The completion state an action wants the chapter to end up in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Desired {
    Completed,
    NotCompleted,
}

/// Receipt for one issued mark/unmark action.
///
/// Carries the per-chapter sequence number assigned at issue time; only the
/// ticket holding the latest number for its chapter may settle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionTicket {
    chapter: ChapterId,
    seq: u64,
    desired: Desired,
}

impl ActionTicket {
    #[must_use]
    pub fn chapter(&self) -> ChapterId {
        self.chapter
    }

    #[must_use]
    pub fn desired(&self) -> Desired {
        self.desired
    }
}

/// Completion set plus the per-chapter action ledger guarding it.
///
/// `begin` is called when a mutation request is issued; `settle` when its
/// acknowledgment arrives. A stale acknowledgment (one superseded by a later
/// `begin` for the same chapter) is discarded without touching the set, so
/// the applied state always matches call order rather than response arrival
/// order.
#[derive(Debug, Clone, Default)]
pub struct ProgressState {
    completed: CompletionSet,
    latest: HashMap<ChapterId, u64>,
}

impl ProgressState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a ticket for a mark/unmark action, superseding any ticket
    /// previously issued for the same chapter.
    pub fn begin(&mut self, chapter: ChapterId, desired: Desired) -> ActionTicket {
        let seq = self
            .latest
            .entry(chapter)
            .and_modify(|seq| *seq += 1)
            .or_insert(1);
        ActionTicket {
            chapter,
            seq: *seq,
            desired,
        }
    }

    /// Apply an acknowledged action to the completion set.
    ///
    /// Returns `false` (and leaves the set untouched) when the ticket has
    /// been superseded by a later action on the same chapter.
    pub fn settle(&mut self, ticket: ActionTicket) -> bool {
        if self.latest.get(&ticket.chapter) != Some(&ticket.seq) {
            return false;
        }
        match ticket.desired {
            Desired::Completed => {
                self.completed.insert(ticket.chapter);
            }
            Desired::NotCompleted => {
                self.completed.remove(ticket.chapter);
            }
        }
        true
    }

    /// Replace the completion set wholesale, e.g. from a progress fetch.
    pub fn replace(&mut self, completed: CompletionSet) {
        self.completed = completed;
    }

    /// Reset to the anonymous/empty state.
    pub fn clear(&mut self) {
        self.completed = CompletionSet::new();
    }

    #[must_use]
    pub fn is_completed(&self, chapter: ChapterId) -> bool {
        self.completed.contains(chapter)
    }

    #[must_use]
    pub fn snapshot(&self) -> CompletionSet {
        self.completed.clone()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
