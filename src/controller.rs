//! Interaction controller: per-node UI state, the single active edit form, and
//! the host contract.
//!
//! The controller turns [`Intent`]s raised by the render adapter into either
//! local UI transitions (toggle, open/cancel a form, update a draft) or one
//! [`EditOp`] that is reduced against the current root right away. Edits are
//! single-flight: a commit is fully reduced, and the new root handed to the
//! host, before the next intent is looked at.

use crate::error::{ControlError, EditError};
use crate::node::{NodeKind, resolve};
use crate::reduce::{EditOp, apply, mismatch};
use crate::render::{self, Interaction, RenderTree};
use crate::theme::StyleSource;
use crate::{Path, Segment, Value, statics};
use serde::Deserialize;
use std::collections::HashMap;
use thiserror::Error;

/// Which input of an edit form a draft belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Key,
    Value,
}

/// A user action raised by the render adapter.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    Toggle(Path),
    StartEditValue(Path),
    /// Rename the key of the object entry at this path.
    StartRename(Path),
    /// Open the add form on the container at this path.
    StartAdd(Path),
    Draft { field: Field, text: String },
    Commit,
    Cancel,
    Remove(Path),
}

/// Derived state of one node. Idle leaves report `Expanded`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeState {
    Collapsed,
    Expanded,
    EditingKey,
    EditingValue,
    AddingEntry,
}

/// The one edit form that may be open across the whole tree.
#[derive(Debug, Clone, PartialEq)]
pub enum EditForm {
    Value { path: Path, draft: String },
    Key { path: Path, draft: String },
    /// `key` is `Some` for object parents and `None` for arrays.
    Add {
        parent: Path,
        key: Option<String>,
        value: String,
    },
}

impl EditForm {
    /// The node that owns the form.
    pub fn path(&self) -> &Path {
        match self {
            EditForm::Value { path, .. } | EditForm::Key { path, .. } => path,
            EditForm::Add { parent, .. } => parent,
        }
    }

    fn path_mut(&mut self) -> &mut Path {
        match self {
            EditForm::Value { path, .. } | EditForm::Key { path, .. } => path,
            EditForm::Add { parent, .. } => parent,
        }
    }

    fn node_state(&self) -> NodeState {
        match self {
            EditForm::Value { .. } => NodeState::EditingValue,
            EditForm::Key { .. } => NodeState::EditingKey,
            EditForm::Add { .. } => NodeState::AddingEntry,
        }
    }

    /// Whether the form still fits the shape of `root`.
    fn fits(&self, root: &Value) -> bool {
        match self {
            EditForm::Value { path, .. } => {
                resolve(root, path).is_ok_and(|v| !v.is_container())
            }
            EditForm::Key { path, .. } => {
                matches!(path.last(), Some(Segment::Key(_))) && resolve(root, path).is_ok()
            }
            EditForm::Add { parent, key, .. } => match resolve(root, parent) {
                Ok(Value::Object(_)) => key.is_some(),
                Ok(Value::Array(_)) => key.is_none(),
                _ => false,
            },
        }
    }
}

/// Local, recoverable refusal of a commit. The form stays open.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Rejection {
    #[error("{msg}: {reason}", msg = statics::EN_REJECT_INVALID_LITERAL)]
    InvalidLiteral { reason: String },
    #[error("{msg}", msg = statics::EN_REJECT_NOT_PRIMITIVE)]
    NotPrimitive,
    #[error("{msg}", msg = statics::EN_REJECT_EMPTY_KEY)]
    EmptyKey,
    #[error("{msg}: '{key}'", msg = statics::EN_REJECT_DUPLICATE_KEY)]
    DuplicateKey { key: String },
}

/// Outcome of one intent.
#[derive(Debug, Clone, PartialEq)]
pub enum Reaction {
    /// Nothing happened (e.g. a commit with no open form).
    Ignored,
    /// UI state changed; the root did not.
    Ui,
    Rejected(Rejection),
    /// The root was reduced to `value` by `op`.
    Changed { op: EditOp, value: Value },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ControlOptions {
    /// Containers at this depth or deeper start collapsed. The root never does.
    pub expand_depth: usize,
    /// Commit a value edit when its input loses focus.
    pub commit_on_blur: bool,
    /// Label of the root row.
    pub root_name: String,
}

impl Default for ControlOptions {
    fn default() -> Self {
        Self {
            expand_depth: 1,
            commit_on_blur: true,
            root_name: statics::EN_ROOT_NAME.to_string(),
        }
    }
}

impl ControlOptions {
    pub fn from_json5(text: &str) -> anyhow::Result<Self> {
        Ok(json5::from_str::<ControlOptions>(text)?)
    }
}

#[derive(Debug, Clone)]
struct ActiveForm {
    form: EditForm,
    rejection: Option<Rejection>,
}

impl ActiveForm {
    /// Whether collapsing the container at `path` takes this form off screen.
    /// A rename of the container itself stays on its own row.
    fn hidden_by_collapse(&self, path: &Path) -> bool {
        match &self.form {
            EditForm::Add { parent, .. } => parent.starts_with(path),
            form => form.path() != path && form.path().starts_with(path),
        }
    }
}

/// UI state of one control instance: collapse overrides plus at most one open form.
#[derive(Debug, Clone, Default)]
pub struct TreeState {
    expand_depth: usize,
    collapsed: HashMap<Path, bool>,
    active: Option<ActiveForm>,
}

impl TreeState {
    pub fn new(expand_depth: usize) -> Self {
        Self {
            expand_depth,
            ..Default::default()
        }
    }

    pub fn is_collapsed(&self, path: &Path) -> bool {
        self.collapsed
            .get(path)
            .copied()
            .unwrap_or_else(|| !path.is_root() && path.depth() >= self.expand_depth)
    }

    pub fn node_state(&self, path: &Path, kind: NodeKind) -> NodeState {
        if let Some(active) = &self.active
            && active.form.path() == path
        {
            return active.form.node_state();
        }
        if kind.is_container() && self.is_collapsed(path) {
            NodeState::Collapsed
        } else {
            NodeState::Expanded
        }
    }

    pub fn active_form(&self) -> Option<&EditForm> {
        self.active.as_ref().map(|a| &a.form)
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        self.active.as_ref().and_then(|a| a.rejection.as_ref())
    }

    /// Applies one intent against `root`.
    ///
    /// Structural problems (stale paths, wrong node kinds) are returned as errors and
    /// leave both `root` and the UI state untouched.
    pub fn handle(&mut self, root: &Value, intent: Intent) -> Result<Reaction, ControlError> {
        tracing::debug!("intent: {intent:?}");
        match intent {
            Intent::Toggle(path) => {
                let target = resolve(root, &path)?;
                if !target.is_container() {
                    return Err(mismatch(&path, "a container", target).into());
                }
                let collapsed = !self.is_collapsed(&path);
                if collapsed
                    && let Some(active) = &self.active
                    && active.hidden_by_collapse(&path)
                {
                    tracing::debug!("closed hidden edit at '{}'", active.form.path());
                    self.active = None;
                }
                self.collapsed.insert(path, collapsed);
                Ok(Reaction::Ui)
            }
            Intent::StartEditValue(path) => {
                let target = resolve(root, &path)?;
                if target.is_container() {
                    return Err(mismatch(&path, "a primitive value", target).into());
                }
                let draft = target.to_json5_compact();
                self.open(EditForm::Value { path, draft });
                Ok(Reaction::Ui)
            }
            Intent::StartRename(path) => {
                resolve(root, &path)?;
                let draft = match path.last() {
                    Some(Segment::Key(key)) => key.clone(),
                    _ => return Err(ControlError::NotRenamable { path: path.clone() }),
                };
                self.open(EditForm::Key { path, draft });
                Ok(Reaction::Ui)
            }
            Intent::StartAdd(parent) => {
                let key = match resolve(root, &parent)? {
                    Value::Object(_) => Some(String::new()),
                    Value::Array(_) => None,
                    leaf => return Err(mismatch(&parent, "a container", leaf).into()),
                };
                self.collapsed.insert(parent.clone(), false);
                self.open(EditForm::Add {
                    parent,
                    key,
                    value: String::new(),
                });
                Ok(Reaction::Ui)
            }
            Intent::Draft { field, text } => Ok(self.update_draft(field, text)),
            Intent::Cancel => match self.active.take() {
                Some(active) => {
                    tracing::debug!("cancelled edit at '{}'", active.form.path());
                    Ok(Reaction::Ui)
                }
                None => Ok(Reaction::Ignored),
            },
            Intent::Commit => self.commit(root),
            Intent::Remove(path) => {
                let op = EditOp::RemoveEntry { path };
                self.reduce(root, op)
            }
        }
    }

    fn open(&mut self, form: EditForm) {
        if let Some(previous) = self.active.take()
            && previous.form.path() != form.path()
        {
            tracing::debug!("discarded pending edit at '{}'", previous.form.path());
        }
        self.active = Some(ActiveForm {
            form,
            rejection: None,
        });
    }

    fn update_draft(&mut self, field: Field, text: String) -> Reaction {
        let Some(active) = self.active.as_mut() else {
            return Reaction::Ignored;
        };
        let slot = match (&mut active.form, field) {
            (EditForm::Value { draft, .. }, Field::Value)
            | (EditForm::Key { draft, .. }, Field::Key)
            | (EditForm::Add { value: draft, .. }, Field::Value)
            | (
                EditForm::Add {
                    key: Some(draft), ..
                },
                Field::Key,
            ) => draft,
            _ => return Reaction::Ignored,
        };
        *slot = text;
        active.rejection = None;
        Reaction::Ui
    }

    fn commit(&mut self, root: &Value) -> Result<Reaction, ControlError> {
        let Some(active) = self.active.as_ref() else {
            return Ok(Reaction::Ignored);
        };
        match build_op(root, &active.form)? {
            Ok(op) => self.reduce(root, op),
            Err(rejection) => {
                tracing::warn!("rejected edit at '{}': {rejection}", active.form.path());
                if let Some(active) = self.active.as_mut() {
                    active.rejection = Some(rejection.clone());
                }
                Ok(Reaction::Rejected(rejection))
            }
        }
    }

    fn reduce(&mut self, root: &Value, op: EditOp) -> Result<Reaction, ControlError> {
        let value = apply(root, &op)?;
        if let EditOp::AddEntry { parent, .. } = &op {
            self.collapsed.insert(parent.clone(), false);
        }
        if !matches!(op, EditOp::RemoveEntry { .. }) {
            self.active = None;
        }
        self.reconcile(&op);
        Ok(Reaction::Changed { op, value })
    }

    /// Keeps collapse overrides and the open form attached to the entries they
    /// belong to after `op` moved or dropped them.
    pub fn reconcile(&mut self, op: &EditOp) {
        match op {
            EditOp::RemoveEntry { path } => {
                let Some((parent, last)) = path.split_last() else {
                    return;
                };
                match last {
                    Segment::Index(removed) => {
                        let removed = *removed;
                        self.remap(|p| p.after_removal(&parent, removed));
                    }
                    Segment::Key(_) => {
                        self.remap(|p| (!p.starts_with(path)).then(|| p.clone()));
                    }
                }
            }
            EditOp::RenameKey {
                parent,
                old_key,
                new_key,
            } => {
                let from = parent.child(old_key.as_str());
                let to = parent.child(new_key.as_str());
                self.remap(|p| Some(p.rebase(&from, &to).unwrap_or_else(|| p.clone())));
            }
            EditOp::SetValue { .. } | EditOp::AddEntry { .. } => {}
        }
    }

    fn remap(&mut self, f: impl Fn(&Path) -> Option<Path>) {
        self.collapsed = self
            .collapsed
            .drain()
            .filter_map(|(p, c)| f(&p).map(|p| (p, c)))
            .collect();
        if let Some(mut active) = self.active.take() {
            if let Some(moved) = f(active.form.path()) {
                *active.form.path_mut() = moved;
                self.active = Some(active);
            } else {
                tracing::debug!("dropped edit form for removed entry");
            }
        }
    }

    /// Drops state that no longer matches `root` (used when the host feeds a value back).
    pub fn prune(&mut self, root: &Value) {
        self.collapsed
            .retain(|p, _| resolve(root, p).is_ok_and(Value::is_container));
        if self.active.as_ref().is_some_and(|a| !a.form.fits(root)) {
            self.active = None;
        }
    }
}

/// Validates the drafts of `form` and builds the edit they describe.
///
/// The outer error is structural; the inner one is a local rejection.
fn build_op(root: &Value, form: &EditForm) -> Result<Result<EditOp, Rejection>, ControlError> {
    let op = match form {
        EditForm::Value { path, draft } => {
            let value = match parse_draft(draft) {
                Ok(v) if v.is_container() => return Ok(Err(Rejection::NotPrimitive)),
                Ok(v) => v,
                Err(rejection) => return Ok(Err(rejection)),
            };
            EditOp::SetValue {
                path: path.clone(),
                value,
            }
        }
        EditForm::Key { path, draft } => {
            let (parent, old_key) = match path.split_last() {
                Some((parent, Segment::Key(k))) => (parent, k.clone()),
                _ => return Err(ControlError::NotRenamable { path: path.clone() }),
            };
            if let Err(rejection) = check_key(root, &parent, draft, Some(&old_key))? {
                return Ok(Err(rejection));
            }
            EditOp::RenameKey {
                parent,
                old_key,
                new_key: draft.clone(),
            }
        }
        EditForm::Add { parent, key, value } => {
            if let Some(key) = key
                && let Err(rejection) = check_key(root, parent, key, None)?
            {
                return Ok(Err(rejection));
            }
            let value = if value.trim().is_empty() {
                Value::String(String::new())
            } else {
                match parse_draft(value) {
                    Ok(v) => v,
                    Err(rejection) => return Ok(Err(rejection)),
                }
            };
            EditOp::AddEntry {
                parent: parent.clone(),
                key: key.clone(),
                value,
            }
        }
    };
    Ok(Ok(op))
}

fn check_key(
    root: &Value,
    parent: &Path,
    key: &str,
    current: Option<&str>,
) -> Result<Result<(), Rejection>, EditError> {
    if key.is_empty() {
        return Ok(Err(Rejection::EmptyKey));
    }
    let container = resolve(root, parent)?;
    let Value::Object(map) = container else {
        return Err(mismatch(parent, statics::EN_TYPE_OBJECT, container));
    };
    if current != Some(key) && map.contains_key(key) {
        return Ok(Err(Rejection::DuplicateKey {
            key: key.to_string(),
        }));
    }
    Ok(Ok(()))
}

fn parse_draft(draft: &str) -> Result<Value, Rejection> {
    Value::parse_json5(draft.trim()).map_err(|e| Rejection::InvalidLiteral {
        reason: format!("{e:#}"),
    })
}

/// Receives every new root the control produces.
pub trait OnChange {
    fn on_change(&mut self, value: Value);
}

impl<F: FnMut(Value)> OnChange for F {
    fn on_change(&mut self, value: Value) {
        self(value)
    }
}

impl OnChange for std::sync::mpsc::Sender<Value> {
    fn on_change(&mut self, value: Value) {
        if self.send(value).is_err() {
            tracing::warn!("change receiver dropped; edit not delivered");
        }
    }
}

/// The editable tree control as mounted by a host.
///
/// Holds its own copy of the current root, the UI state and the host callback.
/// Every committed edit calls `on_change` exactly once with the complete new root.
pub struct ObjectControl<C> {
    name: String,
    value: Value,
    options: ControlOptions,
    state: TreeState,
    style: Box<dyn StyleSource>,
    on_change: C,
    pub(crate) hovered: Option<Path>,
}

impl<C: OnChange> ObjectControl<C> {
    pub fn new(
        name: impl Into<String>,
        value: Value,
        theme: impl StyleSource + 'static,
        on_change: C,
    ) -> Self {
        let options = ControlOptions::default();
        Self {
            name: name.into(),
            value,
            state: TreeState::new(options.expand_depth),
            options,
            style: Box::new(theme),
            on_change,
            hovered: None,
        }
    }

    /// Replaces the options; collapse state is reset to the new defaults.
    pub fn with_options(mut self, options: ControlOptions) -> Self {
        self.state = TreeState::new(options.expand_depth);
        self.options = options;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn options(&self) -> &ControlOptions {
        &self.options
    }

    pub fn state(&self) -> &TreeState {
        &self.state
    }

    pub fn set_theme(&mut self, theme: impl StyleSource + 'static) {
        self.style = Box::new(theme);
    }

    /// Adopts a value fed back by the host. UI state that no longer fits is dropped.
    pub fn set_value(&mut self, value: Value) {
        self.state.prune(&value);
        self.value = value;
    }

    pub fn dispatch(&mut self, intent: Intent) -> Result<Reaction, ControlError> {
        let reaction = match self.state.handle(&self.value, intent) {
            Ok(reaction) => reaction,
            Err(e) => {
                tracing::error!("{}: {e}", self.name);
                return Err(e);
            }
        };
        if let Reaction::Changed { op, value } = &reaction {
            tracing::info!("{}: {}", self.name, op.describe());
            self.value = value.clone();
            self.on_change.on_change(value.clone());
        }
        Ok(reaction)
    }

    pub fn render(&self, interaction: &Interaction) -> RenderTree {
        render::render(
            &self.value,
            &self.name,
            &self.state,
            &self.options,
            interaction,
            self.style.as_ref(),
        )
    }
}
