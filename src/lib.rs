//! Editable JSON tree control for property panels.
//! Renders a JSON-compatible value as a collapsible tree, lets the user edit
//! leaves, rename keys, add and remove entries, and hands every resulting root
//! back to the host through a single change callback.

#[macro_use]
mod path;

mod controller;
mod error;
mod gui;
mod node;
mod reduce;
mod render;
pub mod statics;
mod theme;
mod value;

pub use controller::{
    ControlOptions, EditForm, Field, Intent, NodeState, ObjectControl, OnChange, Reaction,
    Rejection, TreeState,
};
pub use error::{ControlError, EditError};
pub use gui::{HostConfig, run_gui};
pub use node::{Children, Node, NodeKind, build_tree, resolve};
pub use path::{Path, Segment};
pub use reduce::{EditOp, apply};
pub use render::{
    Action, ActionKind, Body, Button, ContainerView, FormView, InputView, Interaction, KeyView,
    LeafView, RenderNode, RenderTree, Text, render,
};
pub use theme::{Color, ColorError, Style, StyleRole, StyleSource, Theme};
pub use value::{Number, Value};
