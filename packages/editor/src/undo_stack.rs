//! # History
//!
//! Every edit recorded here carries the mutation that reverses it, computed
//! against the page as it was just before the edit. Stepping back replays
//! the reversals newest first; stepping forward replays the edits.
//!
//! A step touches the page only if every mutation in it applies, so a
//! history that has drifted from the page (someone edited it directly)
//! reports an error and keeps the step where it was.
//!
//! ```rust,ignore
//! let mut history = UndoStack::new();
//! history.apply(&Mutation::merge("img-1", AttributeDelta::new().set("width", "60%")), &mut page)?;
//! history.undo(&mut page)?;
//! history.redo(&mut page)?;
//!
//! // Surface edits land in the same history
//! let mut surface = BlockSurface::mount("img-1", &mut history.target(&mut page), config)?;
//! ```

use std::collections::VecDeque;

use pageblocks_model::{find_block, AttributeDelta, ContentBlock, PageContent};

use crate::surface::BlockTarget;
use crate::{Mutation, MutationError};

pub const DEFAULT_UNDO_LIMIT: usize = 100;

/// Edits that undo and redo as one step
#[derive(Debug, Clone, Default)]
pub struct MutationBatch {
    /// Forward edits, oldest first
    pub mutations: Vec<Mutation>,

    /// Reversals, newest edit first
    pub inverses: Vec<Mutation>,

    pub label: Option<String>,
}

impl MutationBatch {
    pub fn labelled(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..Self::default()
        }
    }

    fn record(&mut self, mutation: Mutation, inverse: Mutation) {
        self.mutations.push(mutation);
        self.inverses.insert(0, inverse);
    }

    pub fn len(&self) -> usize {
        self.mutations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mutations.is_empty()
    }
}

#[derive(Debug, Clone, Copy)]
enum Step {
    Back,
    Forward,
}

/// Bounded undo/redo history for one page
#[derive(Debug)]
pub struct UndoStack {
    done: VecDeque<MutationBatch>,
    undone: Vec<MutationBatch>,
    /// Oldest steps fall off past this many; 0 keeps everything
    limit: usize,
    open: Option<MutationBatch>,
}

impl UndoStack {
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_UNDO_LIMIT)
    }

    pub fn with_limit(limit: usize) -> Self {
        Self {
            done: VecDeque::new(),
            undone: Vec::new(),
            limit,
            open: None,
        }
    }

    /// Apply `mutation` to `doc` and record it. A failed mutation records
    /// nothing.
    pub fn apply(&mut self, mutation: &Mutation, doc: &mut PageContent) -> Result<(), MutationError> {
        let inverse = mutation.to_inverse(doc)?;
        mutation.apply(doc)?;

        match &mut self.open {
            Some(batch) => batch.record(mutation.clone(), inverse),
            None => {
                let mut batch = MutationBatch::default();
                batch.record(mutation.clone(), inverse);
                self.push(batch);
            }
        }
        Ok(())
    }

    /// Group the following edits into one step until [`Self::end_batch`]
    pub fn begin_batch(&mut self, label: impl Into<String>) {
        self.open = Some(MutationBatch::labelled(label));
    }

    pub fn end_batch(&mut self) {
        match self.open.take() {
            Some(batch) if !batch.is_empty() => self.push(batch),
            _ => {}
        }
    }

    fn push(&mut self, batch: MutationBatch) {
        self.done.push_back(batch);
        if self.limit > 0 && self.done.len() > self.limit {
            self.done.pop_front();
        }
        self.undone.clear();
    }

    /// Step back once. `Ok(false)` when there is nothing to undo.
    pub fn undo(&mut self, doc: &mut PageContent) -> Result<bool, MutationError> {
        self.step(Step::Back, doc)
    }

    /// Step forward once. `Ok(false)` when there is nothing to redo.
    pub fn redo(&mut self, doc: &mut PageContent) -> Result<bool, MutationError> {
        self.step(Step::Forward, doc)
    }

    fn step(&mut self, step: Step, doc: &mut PageContent) -> Result<bool, MutationError> {
        let batch = match step {
            Step::Back => self.done.pop_back(),
            Step::Forward => self.undone.pop(),
        };
        let Some(batch) = batch else {
            return Ok(false);
        };

        let replay = match step {
            Step::Back => &batch.inverses,
            Step::Forward => &batch.mutations,
        };
        let result = replay_all(replay, doc);
        tracing::debug!(?step, mutations = batch.len(), ok = result.is_ok(), "history step");

        match (step, result) {
            (Step::Back, Ok(())) => self.undone.push(batch),
            (Step::Forward, Ok(())) => self.done.push_back(batch),
            (Step::Back, Err(err)) => {
                self.done.push_back(batch);
                return Err(err);
            }
            (Step::Forward, Err(err)) => {
                self.undone.push(batch);
                return Err(err);
            }
        }
        Ok(true)
    }

    /// Editing handle that records every surface edit here
    pub fn target<'a>(&'a mut self, doc: &'a mut PageContent) -> UndoTarget<'a> {
        UndoTarget { stack: self, doc }
    }

    pub fn undo_depth(&self) -> usize {
        self.done.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.undone.len()
    }

    pub fn undo_label(&self) -> Option<&str> {
        self.done.back().and_then(|batch| batch.label.as_deref())
    }

    pub fn redo_label(&self) -> Option<&str> {
        self.undone.last().and_then(|batch| batch.label.as_deref())
    }

    pub fn clear(&mut self) {
        self.done.clear();
        self.undone.clear();
        self.open = None;
    }
}

/// Replays on a copy and swaps it in only when every mutation applied
fn replay_all(mutations: &[Mutation], doc: &mut PageContent) -> Result<(), MutationError> {
    let mut scratch = doc.clone();
    for mutation in mutations {
        mutation.apply(&mut scratch)?;
    }
    *doc = scratch;
    Ok(())
}

/// [`BlockTarget`] that applies edits through an [`UndoStack`]
pub struct UndoTarget<'a> {
    stack: &'a mut UndoStack,
    doc: &'a mut PageContent,
}

impl BlockTarget for UndoTarget<'_> {
    fn block(&self, id: &str) -> Option<&ContentBlock> {
        find_block(&*self.doc, id)
    }

    fn merge(&mut self, id: &str, delta: &AttributeDelta) -> Result<(), MutationError> {
        self.stack.apply(&Mutation::merge(id, delta.clone()), self.doc)
    }

    fn remove(&mut self, id: &str) -> Result<(), MutationError> {
        self.stack.apply(&Mutation::remove(id), self.doc)
    }
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new()
    }
}
