use pretty_assertions::assert_eq;
use std::sync::mpsc;
use treeform::{
    ActionKind, ControlError, ControlOptions, EditError, Field, Intent, Interaction, NodeState,
    ObjectControl, Path, Reaction, Rejection, Theme, Value, path, statics,
};

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

fn v(text: &str) -> Value {
    Value::parse_json5(text).unwrap()
}

fn draft(field: Field, text: &str) -> Intent {
    Intent::Draft {
        field,
        text: text.to_string(),
    }
}

#[test]
fn worked_example_notifies_host_once_per_edit() -> Result<()> {
    let mut seen = Vec::new();
    {
        let mut control = ObjectControl::new(
            "args",
            v(r#"{ "a": 1, "b": [2, 3] }"#),
            Theme::light(),
            |value: Value| seen.push(value),
        );

        control.dispatch(Intent::StartAdd(path!["b"]))?;
        control.dispatch(draft(Field::Value, "4"))?;
        control.dispatch(Intent::Commit)?;
        control.dispatch(Intent::Remove(path!["a"]))?;
        control.dispatch(Intent::StartRename(path!["b"]))?;
        control.dispatch(draft(Field::Key, "c"))?;
        control.dispatch(Intent::Commit)?;

        assert_eq!(control.value(), &v(r#"{ "c": [2, 3, 4] }"#));
    }
    assert_eq!(
        seen,
        vec![
            v(r#"{ "a": 1, "b": [2, 3, 4] }"#),
            v(r#"{ "b": [2, 3, 4] }"#),
            v(r#"{ "c": [2, 3, 4] }"#),
        ]
    );
    Ok(())
}

#[test]
fn toggling_never_reaches_the_host() -> Result<()> {
    let (tx, rx) = mpsc::channel();
    let root = v("{ a: { b: [1, 2] } }");
    let mut control = ObjectControl::new("args", root.clone(), Theme::dark(), tx);

    for _ in 0..3 {
        assert_eq!(control.dispatch(Intent::Toggle(path!["a"]))?, Reaction::Ui);
        control.dispatch(Intent::Toggle(Path::root()))?;
    }
    assert_eq!(control.value(), &root);
    assert_eq!(rx.try_iter().count(), 0);
    Ok(())
}

#[test]
fn switching_forms_discards_the_pending_draft() -> Result<()> {
    let (tx, rx) = mpsc::channel();
    let mut control = ObjectControl::new("args", v("{ x: 1, y: 2 }"), Theme::light(), tx);

    control.dispatch(Intent::StartEditValue(path!["y"]))?;
    control.dispatch(draft(Field::Value, "99"))?;
    control.dispatch(Intent::StartEditValue(path!["x"]))?;

    assert_eq!(rx.try_iter().count(), 0);
    assert_eq!(control.value(), &v("{ x: 1, y: 2 }"));
    let state = control.state();
    assert_eq!(
        state.node_state(&path!["x"], treeform::NodeKind::Number),
        NodeState::EditingValue
    );
    assert_eq!(
        state.node_state(&path!["y"], treeform::NodeKind::Number),
        NodeState::Expanded
    );
    Ok(())
}

#[test]
fn unparsable_draft_keeps_form_open_and_emits_nothing() -> Result<()> {
    let (tx, rx) = mpsc::channel();
    let mut control = ObjectControl::new("args", v("{ n: 1 }"), Theme::light(), tx);

    control.dispatch(Intent::StartEditValue(path!["n"]))?;
    control.dispatch(draft(Field::Value, "{ unclosed"))?;
    let reaction = control.dispatch(Intent::Commit)?;

    assert!(matches!(
        reaction,
        Reaction::Rejected(Rejection::InvalidLiteral { .. })
    ));
    assert!(control.state().active_form().is_some());
    assert_eq!(rx.try_iter().count(), 0);

    control.dispatch(Intent::Cancel)?;
    assert!(control.state().active_form().is_none());
    assert_eq!(control.value(), &v("{ n: 1 }"));
    Ok(())
}

#[test]
fn structural_errors_leave_the_root_alone() {
    let (tx, rx) = mpsc::channel();
    let mut control = ObjectControl::new("args", v("{ a: [1] }"), Theme::light(), tx);

    assert_eq!(
        control.dispatch(Intent::Remove(Path::root())),
        Err(ControlError::Edit(EditError::RootEntry))
    );
    assert_eq!(
        control.dispatch(Intent::Remove(path!["a", 5usize])),
        Err(ControlError::Edit(EditError::PathNotFound {
            path: path!["a", 5usize]
        }))
    );
    assert!(matches!(
        control.dispatch(Intent::StartEditValue(path!["a"])),
        Err(ControlError::Edit(EditError::TypeMismatch { .. }))
    ));
    assert_eq!(control.value(), &v("{ a: [1] }"));
    assert_eq!(rx.try_iter().count(), 0);
}

#[test]
fn remove_then_add_restores_last_entry() -> Result<()> {
    let original = v("{ a: 1, b: 'two' }");
    let mut control = ObjectControl::new("args", original.clone(), Theme::light(), |_: Value| {});

    control.dispatch(Intent::Remove(path!["b"]))?;
    control.dispatch(Intent::StartAdd(Path::root()))?;
    control.dispatch(draft(Field::Key, "b"))?;
    control.dispatch(draft(Field::Value, "'two'"))?;
    control.dispatch(Intent::Commit)?;

    assert_eq!(control.value(), &original);
    let keys: Vec<&String> = control.value().as_object().unwrap().keys().collect();
    assert_eq!(keys, vec!["a", "b"]);
    Ok(())
}

#[test]
fn removing_array_element_keeps_sibling_collapse_state() -> Result<()> {
    let mut control = ObjectControl::new(
        "args",
        v("[{ a: 1 }, { b: 2 }, { c: 3 }]"),
        Theme::light(),
        |_: Value| {},
    );
    control.dispatch(Intent::Toggle(path![2usize]))?;
    assert!(!control.state().is_collapsed(&path![2usize]));

    control.dispatch(Intent::Remove(path![1usize]))?;
    assert!(!control.state().is_collapsed(&path![1usize]));
    assert!(control.state().is_collapsed(&path![0usize]));
    assert_eq!(control.value(), &v("[{ a: 1 }, { c: 3 }]"));
    Ok(())
}

#[test]
fn host_feedback_prunes_stale_forms() -> Result<()> {
    let mut control = ObjectControl::new(
        "args",
        v("{ a: { b: 1 } }"),
        Theme::light(),
        |_: Value| {},
    );
    control.dispatch(Intent::StartEditValue(path!["a", "b"]))?;
    control.set_value(v("{ a: 'flat' }"));
    assert!(control.state().active_form().is_none());

    // A blur-commit arriving after the prune is ignored.
    assert_eq!(control.dispatch(Intent::Commit)?, Reaction::Ignored);
    Ok(())
}

#[test]
fn rendered_actions_raise_controller_intents() -> Result<()> {
    let mut control = ObjectControl::new("args", v("{ list: [] }"), Theme::light(), |_: Value| {});
    let interaction = Interaction {
        hovered: Some(path!["list"]),
        focused: None,
    };
    let tree = control.render(&interaction);
    assert_eq!(tree.name, "args");
    let treeform::Body::Container(root) = &tree.root.body else {
        panic!("root is an object");
    };
    let list = &root.children[0];
    let add = list
        .actions
        .iter()
        .find(|a| a.kind == ActionKind::Add)
        .expect("add action on hovered container");

    control.dispatch(add.intent.clone())?;
    control.dispatch(draft(Field::Value, "true"))?;
    control.dispatch(Intent::Commit)?;
    assert_eq!(control.value(), &v("{ list: [true] }"));
    Ok(())
}

#[test]
fn empty_add_value_defaults_to_empty_string() -> Result<()> {
    let mut control = ObjectControl::new("args", v("{}"), Theme::light(), |_: Value| {});
    control.dispatch(Intent::StartAdd(Path::root()))?;
    control.dispatch(draft(Field::Key, "name"))?;
    control.dispatch(Intent::Commit)?;
    assert_eq!(control.value(), &v("{ name: '' }"));

    control.dispatch(Intent::StartAdd(Path::root()))?;
    assert_eq!(
        control.dispatch(Intent::Commit)?,
        Reaction::Rejected(Rejection::EmptyKey)
    );
    Ok(())
}

#[test]
fn fed_back_values_keep_the_tree_state() -> Result<()> {
    let (tx, rx) = mpsc::channel();
    let mut control = ObjectControl::new("args", v("{ n: 1, list: [1, 2] }"), Theme::dark(), tx);
    control.dispatch(Intent::Toggle(path!["list"]))?;

    control.dispatch(Intent::StartAdd(path!["list"]))?;
    control.dispatch(draft(Field::Value, "3"))?;
    control.dispatch(Intent::Commit)?;
    control.dispatch(Intent::StartEditValue(path!["n"]))?;

    // The host writes the value out and reads it back before handing it over.
    for emitted in rx.try_iter() {
        let reread = Value::parse_json5(&emitted.to_json5_pretty())?;
        assert_eq!(reread, emitted);
        control.set_value(reread);
    }
    assert_eq!(control.value(), &v("{ n: 1, list: [1, 2, 3] }"));
    assert!(!control.state().is_collapsed(&path!["list"]));
    assert!(control.state().active_form().is_some());
    Ok(())
}

#[test]
fn collapsing_hides_and_closes_the_add_form() -> Result<()> {
    let (tx, rx) = mpsc::channel();
    let mut control = ObjectControl::new("args", v("{ o: {} }"), Theme::light(), tx);
    control.dispatch(Intent::StartAdd(path!["o"]))?;
    control.dispatch(draft(Field::Key, "k"))?;
    control.dispatch(Intent::Toggle(path!["o"]))?;

    assert!(control.state().active_form().is_none());
    assert_eq!(control.dispatch(Intent::Commit)?, Reaction::Ignored);
    assert_eq!(rx.try_iter().count(), 0);
    Ok(())
}

#[test]
fn demo_fixture_mounts() -> Result<()> {
    let value = Value::parse_json5(statics::DEMO_VALUE)?;
    let options = ControlOptions::from_json5(statics::DEMO_OPTIONS)?;
    assert_eq!(options.expand_depth, 2);

    let control = ObjectControl::new("demo", value, Theme::dark(), |_: Value| {})
        .with_options(options);
    assert!(!control.state().is_collapsed(&path!["env"]));
    assert!(control.state().is_collapsed(&path!["env", "paths"]));
    Ok(())
}
