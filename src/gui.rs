use crate::controller::{ControlOptions, Intent, ObjectControl, OnChange};
use crate::error::ControlError;
use crate::render::{
    Action, Body, Button, FormView, InputView, Interaction, KeyView, LeafView, RenderNode, Text,
};
use crate::theme::{Color, Theme};
use crate::{Field, Path, Value, statics};
use eframe::egui;
use std::sync::mpsc;

const ROUNDING: f32 = 4.0;
const KEY_INPUT_WIDTH: f32 = 80.0;
const VALUE_INPUT_WIDTH: f32 = 120.0;

fn color32(c: Color) -> egui::Color32 {
    egui::Color32::from_rgba_unmultiplied(c.r, c.g, c.b, c.a)
}

fn rich(text: &str, color: Color, strong: bool) -> egui::RichText {
    let rich = egui::RichText::new(text).color(color32(color));
    if strong { rich.strong() } else { rich }
}

impl<C: OnChange> ObjectControl<C> {
    /// Draws the control and dispatches whatever the user did this frame.
    ///
    /// Returns the first structural error; intents after it are dropped.
    pub fn ui(&mut self, ui: &mut egui::Ui) -> Result<(), ControlError> {
        let interaction = Interaction {
            hovered: self.hovered.clone(),
            focused: self.state().active_form().map(|f| f.path().clone()),
        };
        let tree = self.render(&interaction);

        let mut painter = TreePainter::default();
        ui.heading(&tree.name);
        ui.separator();
        painter.node(ui, &tree.root);
        self.hovered = painter.hovered;

        // Blur/Enter of the open form belong to it, so they run before any
        // click that would open another form.
        for intent in painter.form_intents.into_iter().chain(painter.intents) {
            self.dispatch(intent)?;
        }
        Ok(())
    }
}

#[derive(Default)]
struct TreePainter {
    form_intents: Vec<Intent>,
    intents: Vec<Intent>,
    hovered: Option<Path>,
}

impl TreePainter {
    fn node(&mut self, ui: &mut egui::Ui, node: &RenderNode) {
        ui.push_id(node.path.to_pointer(), |ui| {
            let background = ui.painter().add(egui::Shape::Noop);
            let row = ui.horizontal(|ui| {
                if let Body::Container(c) = &node.body {
                    let glyph = if c.collapsed {
                        statics::EN_GLYPH_COLLAPSED
                    } else {
                        statics::EN_GLYPH_EXPANDED
                    };
                    let toggle = egui::Label::new(egui::RichText::new(glyph).weak())
                        .sense(egui::Sense::click());
                    let resp = ui
                        .add(toggle)
                        .on_hover_cursor(egui::CursorIcon::PointingHand);
                    if resp.clicked() {
                        self.intents.push(c.toggle.clone());
                    }
                }

                match &node.key {
                    KeyView::Label(label) => self.text(ui, label),
                    KeyView::Editing(form) => self.form(ui, form),
                }
                ui.weak(":");

                match &node.body {
                    Body::Leaf(LeafView::Text(value)) => self.text(ui, value),
                    Body::Leaf(LeafView::Editing(form)) => self.form(ui, form),
                    Body::Container(c) if c.collapsed => self.text(ui, &c.summary),
                    Body::Container(_) => {}
                }

                for action in &node.actions {
                    self.action(ui, action);
                }
            });

            let rect = row.response.rect;
            if ui.rect_contains_pointer(rect) {
                self.hovered = Some(node.path.clone());
            }
            if let Some(style) = node.row_style {
                ui.painter().set(
                    background,
                    egui::Shape::rect_filled(rect, ROUNDING, color32(style.background)),
                );
            }

            if let Body::Container(c) = &node.body
                && !c.collapsed
            {
                ui.indent("children", |ui| {
                    for child in &c.children {
                        self.node(ui, child);
                    }
                    if let Some(form) = &c.adding {
                        self.form(ui, form);
                    }
                });
            }
        });
    }

    fn text(&mut self, ui: &mut egui::Ui, text: &Text) {
        let label = egui::Label::new(rich(&text.text, text.style.color, text.style.strong));
        let resp = match &text.on_click {
            Some(Intent::StartEditValue(_)) => ui
                .add(label.sense(egui::Sense::click()))
                .on_hover_cursor(egui::CursorIcon::Text),
            Some(_) => ui
                .add(label.sense(egui::Sense::click()))
                .on_hover_cursor(egui::CursorIcon::PointingHand),
            None => ui.add(label),
        };
        if let Some(border) = text.style.border {
            ui.painter().rect_stroke(
                resp.rect.expand(2.0),
                ROUNDING,
                egui::Stroke::new(1.0, color32(border)),
                egui::StrokeKind::Outside,
            );
        }
        if resp.clicked()
            && let Some(intent) = &text.on_click
        {
            self.intents.push(intent.clone());
        }
    }

    fn action(&mut self, ui: &mut egui::Ui, action: &Action) {
        let row_h = ui.spacing().interact_size.y;
        let (rect, response) =
            ui.allocate_exact_size(egui::vec2(row_h, row_h), egui::Sense::click());
        let response = response
            .on_hover_cursor(egui::CursorIcon::PointingHand)
            .on_hover_text(action.tooltip);

        if ui.is_rect_visible(rect) {
            let style = if response.hovered() {
                action.hover_style
            } else {
                action.style
            };
            let font_id = egui::TextStyle::Button.resolve(ui.style());
            ui.painter().text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                action.glyph,
                font_id,
                color32(style.color),
            );
        }

        if response.clicked() {
            self.intents.push(action.intent.clone());
        }
    }

    fn form(&mut self, ui: &mut egui::Ui, form: &FormView) {
        ui.vertical(|ui| {
            ui.horizontal(|ui| {
                for (i, input) in form.inputs.iter().enumerate() {
                    self.input(ui, input, i == 0);
                }
                if form.show_buttons {
                    self.button(ui, &form.save);
                    self.button(ui, &form.cancel);
                }
            });
            if let Some(error) = &form.error {
                ui.label(rich(&error.text, error.style.color, false));
            }
        });
    }

    fn input(&mut self, ui: &mut egui::Ui, input: &InputView, first: bool) {
        let id = ui.make_persistent_id(("input", input.field));
        let width = match input.field {
            Field::Key => KEY_INPUT_WIDTH,
            Field::Value => VALUE_INPUT_WIDTH,
        };
        let mut draft = input.draft.clone();
        let edit = egui::TextEdit::singleline(&mut draft)
            .id(id)
            .hint_text(input.hint)
            .text_color(color32(input.style.color))
            .desired_width(width);
        let resp = ui.add(edit);
        if let Some(border) = input.style.border {
            ui.painter().rect_stroke(
                resp.rect,
                ROUNDING,
                egui::Stroke::new(1.0, color32(border)),
                egui::StrokeKind::Outside,
            );
        }

        // A freshly opened form grabs the keyboard.
        if first && ui.memory(|m| m.focused().is_none()) {
            resp.request_focus();
        }
        if resp.gained_focus()
            && input.select_on_focus
            && let Some(mut state) = egui::TextEdit::load_state(ui.ctx(), id)
        {
            let end = egui::text::CCursor::new(draft.chars().count());
            let all = egui::text::CCursorRange::two(egui::text::CCursor::new(0), end);
            state.cursor.set_char_range(Some(all));
            state.store(ui.ctx(), id);
        }

        if resp.changed() {
            self.form_intents.push(Intent::Draft {
                field: input.field,
                text: draft,
            });
        }
        if resp.lost_focus() {
            if ui.input(|i| i.key_pressed(egui::Key::Escape)) {
                self.form_intents.push(Intent::Cancel);
            } else if ui.input(|i| i.key_pressed(egui::Key::Enter)) || input.commit_on_blur {
                self.form_intents.push(Intent::Commit);
            }
        }
    }

    fn button(&mut self, ui: &mut egui::Ui, button: &Button) {
        let style = button.style;
        let widget = egui::Button::new(rich(button.label, style.color, style.strong))
            .fill(color32(style.background))
            .corner_radius(ROUNDING);
        if ui.add(widget).clicked() {
            self.form_intents.push(button.intent.clone());
        }
    }
}

/// Startup settings for the demo host.
#[derive(Debug, Clone)]
pub struct HostConfig {
    /// Value mounted in the control at startup.
    pub value: Value,
    pub options: ControlOptions,
    pub dark: bool,
}

pub fn run_gui(config: HostConfig) -> eframe::Result {
    let native = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([960.0, 720.0]),
        ..Default::default()
    };
    let title = format!("{} {}", statics::EN_APP_TITLE, env!("CARGO_PKG_VERSION"));
    eframe::run_native(
        &title,
        native,
        Box::new(move |cc| {
            cc.egui_ctx.set_visuals(if config.dark {
                egui::Visuals::dark()
            } else {
                egui::Visuals::light()
            });
            Ok(Box::new(TreeformApp::new(config)))
        }),
    )
}

/// In-memory host that hands every emitted value straight back to the control.
struct TreeformApp {
    control: ObjectControl<mpsc::Sender<Value>>,
    changes: mpsc::Receiver<Value>,
    /// Latest value the host accepted, shown next to the tree.
    value: Value,
    change_count: usize,
    last_error: Option<String>,
    theme_dark: bool,
}

impl TreeformApp {
    fn new(config: HostConfig) -> Self {
        let (sender, changes) = mpsc::channel();
        let theme = if config.dark {
            Theme::dark()
        } else {
            Theme::light()
        };
        let control = ObjectControl::new(
            statics::EN_HEADING_PROPERTIES,
            config.value.clone(),
            theme,
            sender,
        )
        .with_options(config.options);
        Self {
            control,
            changes,
            value: config.value,
            change_count: 0,
            last_error: None,
            theme_dark: config.dark,
        }
    }

    fn toggle_theme(&mut self, ctx: &egui::Context) {
        self.theme_dark = !self.theme_dark;
        if self.theme_dark {
            ctx.set_visuals(egui::Visuals::dark());
            self.control.set_theme(Theme::dark());
        } else {
            ctx.set_visuals(egui::Visuals::light());
            self.control.set_theme(Theme::light());
        }
    }

    /// Accepts every value the control emitted and hands it back as the new prop.
    fn drain_changes(&mut self) {
        while let Ok(value) = self.changes.try_recv() {
            self.control.set_value(value.clone());
            self.value = value;
            self.change_count += 1;
            self.last_error = None;
        }
    }
}

impl eframe::App for TreeformApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            egui::MenuBar::new().ui(ui, |ui| {
                if ui.button(statics::EN_BTN_TOGGLE_THEME).clicked() {
                    self.toggle_theme(ctx);
                }
                ui.separator();
                ui.label(format!("{}: {}", statics::EN_LABEL_CHANGES_COUNT, self.change_count));
            });
        });

        if let Some(err) = self.last_error.clone() {
            egui::TopBottomPanel::top("error_bar").show(ctx, |ui| {
                ui.colored_label(egui::Color32::RED, err);
            });
        }

        egui::SidePanel::right("host_value")
            .resizable(true)
            .default_width(320.0)
            .show(ctx, |ui| {
                ui.heading(statics::EN_HEADING_HOST_VALUE);
                ui.separator();
                egui::ScrollArea::vertical().show(ui, |ui| {
                    ui.monospace(self.value.to_json5_pretty());
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    if let Err(e) = self.control.ui(ui) {
                        self.last_error = Some(e.to_string());
                    }
                });
        });

        self.drain_changes();
    }
}
