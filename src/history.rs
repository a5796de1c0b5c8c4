//! Undo/redo over snapshots of the step tree.

/// Default number of snapshots kept before the oldest ones are dropped.
pub const DEFAULT_CAPACITY: usize = 128;

type Comparator<T> = Box<dyn Fn(&T, &T) -> bool>;

/// Past/present/future stacks of immutable snapshots.
///
/// Recording a snapshot equal to the present one (per the comparator) is a no-op, so
/// edits that change nothing never show up as undo steps. Recording after an undo
/// discards the redo stack.
pub struct EditHistory<T> {
    past: Vec<T>,
    present: T,
    future: Vec<T>,
    capacity: usize,
    same: Comparator<T>,
}

impl<T: Clone + PartialEq + 'static> EditHistory<T> {
    /// Starts a history at `initial`, comparing snapshots with `==`.
    pub fn new(initial: T) -> Self {
        Self::with_comparator(initial, |a: &T, b: &T| a == b)
    }
}

impl<T: Clone> EditHistory<T> {
    pub fn with_comparator(initial: T, same: impl Fn(&T, &T) -> bool + 'static) -> Self {
        Self {
            past: Vec::new(),
            present: initial,
            future: Vec::new(),
            capacity: DEFAULT_CAPACITY,
            same: Box::new(same),
        }
    }

    /// Caps how many snapshots are kept, present included. Never below one.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity.max(1);
        self.trim();
        self
    }

    /// Records `snapshot` as the new present. Returns `false` if it equals the present.
    pub fn record(&mut self, snapshot: T) -> bool {
        if (self.same)(&self.present, &snapshot) {
            return false;
        }
        let previous = std::mem::replace(&mut self.present, snapshot);
        self.past.push(previous);
        self.future.clear();
        self.trim();
        true
    }

    /// Steps back one snapshot. `None` when there is nothing to undo.
    pub fn undo(&mut self) -> Option<&T> {
        let previous = self.past.pop()?;
        let current = std::mem::replace(&mut self.present, previous);
        self.future.push(current);
        Some(&self.present)
    }

    /// Steps forward one snapshot. `None` when there is nothing to redo.
    pub fn redo(&mut self) -> Option<&T> {
        let next = self.future.pop()?;
        let current = std::mem::replace(&mut self.present, next);
        self.past.push(current);
        Some(&self.present)
    }

    pub fn present(&self) -> &T {
        &self.present
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    /// Number of snapshots held, present included.
    pub fn len(&self) -> usize {
        self.past.len() + 1 + self.future.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Forgets everything except the present.
    pub fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
    }

    fn trim(&mut self) {
        let held = self.past.len() + 1;
        if held > self.capacity {
            let excess = held - self.capacity;
            self.past.drain(0..excess);
        }
    }
}
