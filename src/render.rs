//! Render adapter: projects the node model plus controller state into a
//! presentation tree that a drawing surface can paint without knowing any rules.
//!
//! Every clickable element carries the [`Intent`] it raises. Nothing here builds
//! an [`crate::EditOp`]; that is the controller's job.

use crate::controller::{ControlOptions, EditForm, Field, Intent, NodeState, TreeState};
use crate::node::{Node, NodeKind, build_tree};
use crate::theme::{Style, StyleRole, StyleSource};
use crate::{Path, Segment, Value, statics};

/// Pointer/keyboard context supplied by the surface for one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Interaction {
    pub hovered: Option<Path>,
    pub focused: Option<Path>,
}

impl Interaction {
    fn is_active(&self, path: &Path) -> bool {
        self.hovered.as_ref() == Some(path) || self.focused.as_ref() == Some(path)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderTree {
    /// Heading shown above the tree.
    pub name: String,
    pub root: RenderNode,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderNode {
    pub path: Path,
    pub kind: NodeKind,
    pub state: NodeState,
    pub key: KeyView,
    pub body: Body,
    /// Context actions; empty unless the row is hovered or focused.
    pub actions: Vec<Action>,
    /// Row background, set while a container row is hovered.
    pub row_style: Option<Style>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    pub text: String,
    pub style: Style,
    pub on_click: Option<Intent>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum KeyView {
    Label(Text),
    Editing(FormView),
}

#[derive(Debug, Clone, PartialEq)]
pub struct InputView {
    pub field: Field,
    pub draft: String,
    pub hint: &'static str,
    pub style: Style,
    pub commit_on_blur: bool,
    /// Select the whole draft when the input gains focus.
    pub select_on_focus: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Button {
    pub label: &'static str,
    pub style: Style,
    pub intent: Intent,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormView {
    pub inputs: Vec<InputView>,
    pub save: Button,
    pub cancel: Button,
    /// Inline edits hide their buttons and rely on Enter/Escape/blur.
    pub show_buttons: bool,
    pub error: Option<Text>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Add,
    Rename,
    Remove,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    pub kind: ActionKind,
    pub glyph: &'static str,
    pub tooltip: &'static str,
    pub intent: Intent,
    pub style: Style,
    pub hover_style: Style,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LeafView {
    Text(Text),
    Editing(FormView),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContainerView {
    pub collapsed: bool,
    pub toggle: Intent,
    pub summary: Text,
    /// Empty while collapsed.
    pub children: Vec<RenderNode>,
    pub adding: Option<FormView>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Leaf(LeafView),
    Container(ContainerView),
}

struct Frame<'a> {
    state: &'a TreeState,
    options: &'a ControlOptions,
    interaction: &'a Interaction,
    style: &'a dyn StyleSource,
}

pub fn render(
    root: &Value,
    name: &str,
    state: &TreeState,
    options: &ControlOptions,
    interaction: &Interaction,
    style: &dyn StyleSource,
) -> RenderTree {
    let frame = Frame {
        state,
        options,
        interaction,
        style,
    };
    RenderTree {
        name: name.to_string(),
        root: frame.node(build_tree(root)),
    }
}

impl Frame<'_> {
    fn node(&self, node: Node<'_>) -> RenderNode {
        let path = node.path().clone();
        let kind = node.kind();
        let state = self.state.node_state(&path, kind);
        let hovered = self.interaction.hovered.as_ref() == Some(&path);

        let toggle = Intent::Toggle(path.clone());
        let body = if node.is_container() {
            let collapsed = self.state.is_collapsed(&path);
            let children = if collapsed {
                Vec::new()
            } else {
                node.children().map(|child| self.node(child)).collect()
            };
            let adding = match self.state.active_form() {
                Some(EditForm::Add { parent, key, value }) if *parent == path => {
                    let mut inputs = Vec::with_capacity(2);
                    if let Some(key) = key {
                        inputs.push(self.input(Field::Key, key, statics::EN_HINT_KEY, false));
                    }
                    inputs.push(self.input(Field::Value, value, statics::EN_HINT_VALUE, false));
                    Some(self.form(inputs, true))
                }
                _ => None,
            };
            Body::Container(ContainerView {
                collapsed,
                toggle: toggle.clone(),
                summary: Text {
                    text: node.summary(),
                    style: self.style.style(StyleRole::Collapsed),
                    on_click: Some(toggle.clone()),
                },
                children,
                adding,
            })
        } else {
            let leaf = match self.state.active_form() {
                Some(EditForm::Value { path: at, draft }) if *at == path => {
                    let input = self.input(
                        Field::Value,
                        draft,
                        statics::EN_HINT_VALUE,
                        self.options.commit_on_blur,
                    );
                    LeafView::Editing(self.form(vec![input], false))
                }
                _ => {
                    let role = if hovered {
                        StyleRole::ValueHover
                    } else {
                        StyleRole::Value
                    };
                    LeafView::Text(Text {
                        text: node.summary(),
                        style: self.style.style(role),
                        on_click: Some(Intent::StartEditValue(path.clone())),
                    })
                }
            };
            Body::Leaf(leaf)
        };

        let key = match self.state.active_form() {
            Some(EditForm::Key { path: at, draft }) if *at == path => {
                let input = self.input(
                    Field::Key,
                    draft,
                    statics::EN_HINT_KEY,
                    self.options.commit_on_blur,
                );
                KeyView::Editing(self.form(vec![input], false))
            }
            _ => KeyView::Label(Text {
                text: self.label(&node),
                style: self.style.style(StyleRole::Name),
                on_click: node.is_container().then_some(toggle),
            }),
        };

        let actions = if self.interaction.is_active(&path) && !self.has_form(&path) {
            self.actions(&node)
        } else {
            Vec::new()
        };

        RenderNode {
            row_style: (hovered && node.is_container())
                .then(|| self.style.style(StyleRole::RowHover)),
            path,
            kind,
            state,
            key,
            body,
            actions,
        }
    }

    fn label(&self, node: &Node<'_>) -> String {
        match node.segment() {
            None => self.options.root_name.clone(),
            Some(Segment::Key(key)) => key.clone(),
            Some(Segment::Index(i)) => i.to_string(),
        }
    }

    fn has_form(&self, path: &Path) -> bool {
        self.state.active_form().is_some_and(|f| f.path() == path)
    }

    fn actions(&self, node: &Node<'_>) -> Vec<Action> {
        let path = node.path();
        let resting = self.style.style(StyleRole::Action);
        let mut actions = Vec::new();
        if node.is_container() {
            actions.push(Action {
                kind: ActionKind::Add,
                glyph: statics::EN_GLYPH_ADD,
                tooltip: statics::EN_TIP_ADD,
                intent: Intent::StartAdd(path.clone()),
                style: resting,
                hover_style: self.style.style(StyleRole::ActionAddHover),
            });
        }
        if node.is_object_entry() {
            actions.push(Action {
                kind: ActionKind::Rename,
                glyph: statics::EN_GLYPH_RENAME,
                tooltip: statics::EN_TIP_RENAME,
                intent: Intent::StartRename(path.clone()),
                style: resting,
                hover_style: self.style.style(StyleRole::ActionAddHover),
            });
        }
        if !path.is_root() {
            actions.push(Action {
                kind: ActionKind::Remove,
                glyph: statics::EN_GLYPH_REMOVE,
                tooltip: statics::EN_TIP_REMOVE,
                intent: Intent::Remove(path.clone()),
                style: resting,
                hover_style: self.style.style(StyleRole::ActionRemoveHover),
            });
        }
        actions
    }

    fn input(
        &self,
        field: Field,
        draft: &str,
        hint: &'static str,
        commit_on_blur: bool,
    ) -> InputView {
        InputView {
            field,
            draft: draft.to_string(),
            hint,
            style: self.style.style(StyleRole::Input),
            commit_on_blur,
            select_on_focus: true,
        }
    }

    fn form(&self, inputs: Vec<InputView>, show_buttons: bool) -> FormView {
        FormView {
            inputs,
            save: Button {
                label: statics::EN_BTN_SAVE,
                style: self.style.style(StyleRole::SaveButton),
                intent: Intent::Commit,
            },
            cancel: Button {
                label: statics::EN_BTN_CANCEL,
                style: self.style.style(StyleRole::CancelButton),
                intent: Intent::Cancel,
            },
            show_buttons,
            error: self.state.rejection().map(|r| Text {
                text: r.to_string(),
                style: self.style.style(StyleRole::Error),
                on_click: None,
            }),
        }
    }
}
