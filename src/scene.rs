//! Selection set and the committed-shape history log.
//!
//! The history log is append-only: committing pushes a shape, undo pops onto
//! the redo stack, redo pops back. Both stacks are owned exclusively by this
//! controller. The renderable scene is never stored; it is derived on demand
//! by folding the log last-writer-wins per shape id, which lets a style edit
//! append a fresh entry for an existing id without duplicating the visible
//! shape.

#[cfg(test)]
#[path = "scene_test.rs"]
mod scene_test;

use std::collections::HashMap;

use crate::geom::Rect;
use crate::shape::{Shape, ShapeId, ShapeKind};

/// Selection membership plus the history and redo stacks.
#[derive(Debug, Clone, Default)]
pub struct SceneState {
    history: Vec<Shape>,
    redo: Vec<Shape>,
    selection: Vec<ShapeId>,
}

impl SceneState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- History ---

    /// Append a committed shape to the log and invalidate the redo stack.
    ///
    /// `Select` pseudo-shapes are never persisted; committing one is a no-op.
    pub fn commit(&mut self, shape: Shape) {
        if !shape.kind.is_persistable() {
            return;
        }
        tracing::debug!(id = %shape.id, kind = ?shape.kind, "commit shape");
        self.history.push(shape);
        self.redo.clear();
    }

    /// Pop the newest history entry onto the redo stack. No-op when the
    /// history is empty. Returns whether anything changed.
    pub fn undo(&mut self) -> bool {
        let Some(shape) = self.history.pop() else {
            return false;
        };
        tracing::debug!(id = %shape.id, "undo");
        self.redo.push(shape);
        self.prune_selection();
        true
    }

    /// Pop the newest redo entry back onto the history. No-op when the redo
    /// stack is empty. Returns whether anything changed.
    pub fn redo(&mut self) -> bool {
        let Some(shape) = self.redo.pop() else {
            return false;
        };
        tracing::debug!(id = %shape.id, "redo");
        self.history.push(shape);
        self.prune_selection();
        true
    }

    /// Number of entries in the history log (not the folded scene).
    #[must_use]
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    #[must_use]
    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    // --- Scene folding ---

    /// The renderable scene: walk the log in order and keep, for each id,
    /// only the entry appearing last, at that later entry's position.
    #[must_use]
    pub fn fold(&self) -> Vec<&Shape> {
        let mut last_index: HashMap<ShapeId, usize> = HashMap::new();
        for (index, shape) in self.history.iter().enumerate() {
            last_index.insert(shape.id, index);
        }
        self.history
            .iter()
            .enumerate()
            .filter(|(index, shape)| last_index.get(&shape.id) == Some(index))
            .map(|(_, shape)| shape)
            .collect()
    }

    /// The latest committed version of a shape, if present in the scene.
    #[must_use]
    pub fn shape(&self, id: ShapeId) -> Option<&Shape> {
        self.history.iter().rev().find(|s| s.id == id)
    }

    /// Mutable access to the latest committed version of a shape. Used by
    /// transform gestures, which edit geometry in place rather than
    /// appending history.
    pub fn shape_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        self.history.iter_mut().rev().find(|s| s.id == id)
    }

    // --- Selection ---

    /// Add a shape to the selection. Later selections stack on top.
    pub fn select(&mut self, id: ShapeId) {
        if !self.selection.contains(&id) {
            self.selection.push(id);
        }
    }

    /// Remove a shape from the selection.
    pub fn deselect(&mut self, id: ShapeId) {
        self.selection.retain(|s| *s != id);
    }

    /// Replace the whole selection, preserving the given order.
    pub fn set_selection(&mut self, ids: Vec<ShapeId>) {
        self.selection = ids;
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    #[must_use]
    pub fn selection(&self) -> &[ShapeId] {
        &self.selection
    }

    #[must_use]
    pub fn is_selected(&self, id: ShapeId) -> bool {
        self.selection.contains(&id)
    }

    /// Ids of scene shapes with at least one point strictly inside `rect`,
    /// in draw order. Erasers are not selectable.
    #[must_use]
    pub fn shapes_in_rect(&self, rect: &Rect) -> Vec<ShapeId> {
        self.fold()
            .into_iter()
            .filter(|shape| shape.kind != ShapeKind::Eraser)
            .filter(|shape| shape.positions.iter().any(|p| rect.contains_inner(*p)))
            .map(|shape| shape.id)
            .collect()
    }

    /// Drop selected ids that no longer resolve in the folded scene.
    fn prune_selection(&mut self) {
        let folded: Vec<ShapeId> = self.fold().iter().map(|s| s.id).collect();
        self.selection.retain(|id| folded.contains(id));
    }
}
