// Central place for UI strings and other non-localized constants.
// Keep these out of gui.rs/render.rs to reduce duplication and make tweaks safer.

// English UI strings (EN_ prefix to make future localization easier)
pub const EN_APP_TITLE: &str = "treeform";

pub const EN_BTN_TOGGLE_THEME: &str = "Theme";

pub const EN_HEADING_PROPERTIES: &str = "Properties";
pub const EN_HEADING_HOST_VALUE: &str = "Host value";

// Edit forms.
pub const EN_BTN_SAVE: &str = "Save";
pub const EN_BTN_CANCEL: &str = "Cancel";
pub const EN_HINT_KEY: &str = "Key";
pub const EN_HINT_VALUE: &str = "Value";

// Action glyphs (plus/minus menus and rename).
pub const EN_GLYPH_ADD: &str = "+";
pub const EN_GLYPH_REMOVE: &str = "-";
pub const EN_GLYPH_RENAME: &str = "~";
pub const EN_GLYPH_COLLAPSED: &str = ">";
pub const EN_GLYPH_EXPANDED: &str = "v";

pub const EN_TIP_ADD: &str = "Add entry";
pub const EN_TIP_REMOVE: &str = "Remove entry";
pub const EN_TIP_RENAME: &str = "Rename key";

// Default label of the root row.
pub const EN_ROOT_NAME: &str = "root";

pub const EN_LABEL_CHANGES_COUNT: &str = "changes";

// Local rejection messages shown under an edit form.
pub const EN_REJECT_EMPTY_KEY: &str = "Key must not be empty";
pub const EN_REJECT_DUPLICATE_KEY: &str = "Key already exists";
pub const EN_REJECT_NOT_PRIMITIVE: &str = "Value must be a string, number, boolean or null";
pub const EN_REJECT_INVALID_LITERAL: &str = "Not a valid literal";

// Line terminator of the pretty writer.
pub const NL_LF: &str = "\n";

pub const EN_TYPE_NULL: &str = "null";
pub const EN_TYPE_BOOL: &str = "bool";
pub const EN_TYPE_NUMBER: &str = "number";
pub const EN_TYPE_STRING: &str = "string";
pub const EN_TYPE_ARRAY: &str = "array";
pub const EN_TYPE_OBJECT: &str = "object";

pub const EN_LITERAL_NULL: &str = "null";

// Environment toggles for the desktop host.
pub const ENV_DEBUG: &str = "TREEFORM_DEBUG";
pub const ENV_LIGHT: &str = "TREEFORM_LIGHT";

// Value mounted by the demo host.
pub const DEMO_VALUE: &str = r#"{
    name: "build",
    enabled: true,
    retries: 3,
    timeout: 2.5,
    target: null,
    args: ["--release", "--locked"],
    env: {
        RUST_LOG: "info",
        paths: { cache: "/tmp/cache", out: "./target" },
    },
}"#;

pub const DEMO_OPTIONS: &str = "{ expand_depth: 2, root_name: 'args' }";
