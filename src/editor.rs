use crate::error::{EditError, ImportError};
use crate::graph::{
    LayoutCoordinator, LayoutEngine, LayoutMode, LayoutOutcome, VisualizationGraph, build_graph,
};
use crate::history::{DEFAULT_CAPACITY, EditHistory};
use crate::model::{Integration, IntegrationPatch, IntoIntegration, Step, StepPath};
use crate::selection::{SelectedStep, resolve_selection};
use crate::store::{Store, SubscriberId};
use crate::tree::{IntegrationState, NestedStepIndex, mutator};
use crate::views::{ViewDefinition, ViewProvider};
use log::{debug, warn};
use std::sync::Arc;

type StepComparator = Box<dyn Fn(&Vec<Step>, &Vec<Step>) -> bool>;

/// The editing session: current tree, undo history, selection, views and layout.
///
/// All edits run to completion before returning. Each successful edit replaces the
/// state wholesale, notifies subscribers, and records an undo snapshot of the step
/// tree if it actually changed.
pub struct Editor {
    store: Store<IntegrationState>,
    history: EditHistory<Vec<Step>>,
    selection: Option<SelectedStep>,
    views: Vec<ViewDefinition>,
    view_provider: Option<Box<dyn ViewProvider>>,
    layout: LayoutCoordinator,
}

pub struct EditorBuilder {
    integration: Integration,
    history_capacity: usize,
    layout_mode: LayoutMode,
    view_provider: Option<Box<dyn ViewProvider>>,
    comparator: Option<StepComparator>,
}

impl Default for EditorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorBuilder {
    pub fn new() -> Self {
        Self {
            integration: Integration::default(),
            history_capacity: DEFAULT_CAPACITY,
            layout_mode: LayoutMode::default(),
            view_provider: None,
            comparator: None,
        }
    }

    /// Starts from `integration` instead of the empty one. Identifiers are recomputed.
    pub fn with_integration(mut self, integration: Integration) -> Self {
        self.integration = integration;
        self
    }

    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }

    pub fn with_layout_mode(mut self, mode: LayoutMode) -> Self {
        self.layout_mode = mode;
        self
    }

    pub fn with_view_provider(mut self, provider: impl ViewProvider + 'static) -> Self {
        self.view_provider = Some(Box::new(provider));
        self
    }

    /// Replaces structural equality as the test for "nothing changed" in the history.
    pub fn with_history_comparator(
        mut self,
        comparator: impl Fn(&Vec<Step>, &Vec<Step>) -> bool + 'static,
    ) -> Self {
        self.comparator = Some(Box::new(comparator));
        self
    }

    /// Builds the editor. Fails if the starting integration breaks a branch constraint.
    pub fn build(mut self) -> Result<Editor, EditError> {
        let state = IntegrationState::new(std::mem::take(&mut self.integration))?;
        Ok(self.assemble(state))
    }

    fn assemble(self, state: IntegrationState) -> Editor {
        let initial = state.steps().to_vec();
        let history = match self.comparator {
            Some(same) => EditHistory::with_comparator(initial, same),
            None => EditHistory::new(initial),
        }
        .with_capacity(self.history_capacity);

        let mut editor = Editor {
            store: Store::new(state),
            history,
            selection: None,
            views: Vec::new(),
            view_provider: self.view_provider,
            layout: LayoutCoordinator::new(self.layout_mode),
        };
        editor.refresh_views();
        editor
    }
}

impl Default for Editor {
    fn default() -> Self {
        EditorBuilder::new().assemble(IntegrationState::default())
    }
}

impl Editor {
    pub fn builder() -> EditorBuilder {
        EditorBuilder::new()
    }

    pub fn state(&self) -> Arc<IntegrationState> {
        self.store.get()
    }

    pub fn integration(&self) -> Integration {
        self.store.get().integration().clone()
    }

    pub fn steps(&self) -> Vec<Step> {
        self.store.get().steps().to_vec()
    }

    pub fn nested_steps(&self) -> NestedStepIndex {
        self.store.get().nested_steps().clone()
    }

    /// Projects the current tree onto a graph.
    pub fn graph(&self) -> VisualizationGraph {
        build_graph(self.store.get().steps())
    }

    pub fn subscribe(
        &mut self,
        subscriber: impl FnMut(&Arc<IntegrationState>) + 'static,
    ) -> SubscriberId {
        self.store.subscribe(subscriber)
    }

    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        self.store.unsubscribe(id)
    }

    // --- Edits ---

    pub fn append(&mut self, step: Step) -> Result<(), EditError> {
        self.edit("append", |state| mutator::append(state, step))
    }

    pub fn insert_at(&mut self, step: Step, index: usize) -> Result<(), EditError> {
        self.edit("insert", |state| mutator::insert_at(state, step, index))
    }

    pub fn delete_at(&mut self, index: usize) -> Result<(), EditError> {
        self.edit("delete", |state| mutator::delete_at(state, index))
    }

    pub fn delete_all(&mut self) {
        let previous = self.store.get();
        self.store.set(mutator::delete_all(&previous));
        self.commit_edit("delete all", &previous);
    }

    pub fn replace_at(&mut self, step: Step, index: Option<usize>) -> Result<(), EditError> {
        self.edit("replace", |state| mutator::replace_at(state, step, index))
    }

    pub fn replace_in_branch(&mut self, step: Step, path: &StepPath) -> Result<(), EditError> {
        self.edit("replace in branch", |state| {
            mutator::replace_in_branch(state, step, path)
        })
    }

    pub fn delete_in_branch(
        &mut self,
        replacement_parent: Step,
        parent_index: usize,
    ) -> Result<(), EditError> {
        self.edit("delete in branch", |state| {
            mutator::delete_in_branch(state, replacement_parent, parent_index)
        })
    }

    pub fn bulk_replace(&mut self, patch: IntegrationPatch) -> Result<(), EditError> {
        self.edit("bulk replace", |state| mutator::bulk_replace(state, patch))
    }

    /// Converts an external payload and merges it in.
    pub fn import(&mut self, source: impl IntoIntegration) -> Result<(), ImportError> {
        let patch = source.into_integration()?;
        self.bulk_replace(patch)?;
        Ok(())
    }

    pub fn add_branch(&mut self, identifier: &str) -> Result<(), EditError> {
        self.edit("add branch", |state| mutator::add_branch(state, identifier))
    }

    /// Removes the step with `identifier`, nested or not.
    pub fn remove_step(&mut self, identifier: &str) -> Result<(), EditError> {
        let state = self.store.get();
        if state.nested_steps().contains(identifier) {
            return self.edit("remove nested step", |state| {
                mutator::remove_nested_step(state, identifier)
            });
        }
        let index = state
            .steps()
            .iter()
            .position(|step| step.identifier() == identifier)
            .ok_or_else(|| EditError::UnresolvableIdentifier(identifier.to_string()))?;
        self.delete_at(index)
    }

    // --- History ---

    pub fn undo(&mut self) -> bool {
        match self.history.undo().cloned() {
            Some(steps) => {
                self.restore(steps);
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        match self.history.redo().cloned() {
            Some(steps) => {
                self.restore(steps);
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    // --- Selection ---

    /// Selects the step behind a graph node. A stale identifier clears the selection.
    pub fn select(&mut self, identifier: &str) -> Option<&SelectedStep> {
        match resolve_selection(&self.store.get(), identifier) {
            Ok(selected) => self.selection = Some(selected),
            Err(e) => {
                warn!("{}; clearing selection", e);
                self.selection = None;
            }
        }
        self.selection.as_ref()
    }

    pub fn selection(&self) -> Option<&SelectedStep> {
        self.selection.as_ref()
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    // --- Views ---

    pub fn views(&self) -> &[ViewDefinition] {
        &self.views
    }

    // --- Layout ---

    pub fn layout_mode(&self) -> LayoutMode {
        self.layout.mode()
    }

    pub fn set_layout_mode(&mut self, mode: LayoutMode) {
        self.layout.set_mode(mode);
    }

    /// Lays out the current graph with `engine`. Failures keep the previous rendering.
    pub async fn relayout<E: LayoutEngine>(&mut self, engine: &E) -> LayoutOutcome {
        let graph = self.graph();
        self.layout.run(engine, graph).await
    }

    pub fn layout_coordinator(&mut self) -> &mut LayoutCoordinator {
        &mut self.layout
    }

    pub fn rendered_graph(&self) -> Option<&VisualizationGraph> {
        self.layout.rendered()
    }

    fn edit(
        &mut self,
        name: &str,
        f: impl FnOnce(&IntegrationState) -> Result<IntegrationState, EditError>,
    ) -> Result<(), EditError> {
        let previous = self.store.get();
        self.store.update(f)?;
        self.commit_edit(name, &previous);
        Ok(())
    }

    /// Bookkeeping after a state written by an edit: logging, history, views, selection.
    fn commit_edit(&mut self, name: &str, previous: &IntegrationState) {
        let state = self.store.get();
        debug!(
            "{}: {} steps ({} nested)",
            name,
            state.integration().step_count(),
            state.nested_steps().len()
        );
        if self.history.record(state.steps().to_vec()) {
            debug!("{}: recorded history entry {}", name, self.history.len());
        }
        self.after_change(previous);
    }

    fn restore(&mut self, steps: Vec<Step>) {
        let previous = self.store.get();
        let integration = previous.integration().with_steps(steps);
        self.store.set(IntegrationState::commit(integration));
        self.after_change(&previous);
    }

    fn after_change(&mut self, previous: &IntegrationState) {
        let current = self.store.get();
        if previous.steps() != current.steps() {
            // Layouts still in flight describe a tree that no longer exists.
            self.layout.invalidate();
            self.refresh_views();
        }
        // Identifiers are positional, so the selected step may now be somewhere else.
        if let Some(selected) = &self.selection {
            let still_there = resolve_selection(&current, &selected.identifier)
                .ok()
                .filter(|resolved| resolved.step == selected.step);
            if still_there.is_none() {
                debug!("Selection '{}' no longer resolves", selected.identifier);
            }
            self.selection = still_there;
        }
    }

    fn refresh_views(&mut self) {
        let Some(provider) = &self.view_provider else {
            return;
        };
        match provider.fetch_views(self.store.get().steps()) {
            Ok(views) => self.views = views,
            Err(e) => warn!("{}; keeping {} previous views", e, self.views.len()),
        }
    }
}
