//! # Section Registry
//!
//! Static mapping from a section type tag to its definition: display
//! metadata, a form editor and a default data shape. The tag space is
//! externally extensible — persisted data may reference types this build
//! does not know — so every lookup is total: absence is a graceful
//! fallback, never an error.

pub mod forms;
pub mod sections;

pub use forms::{ChangeOp, Field, FieldChange, FieldKind, Form, ItemField};

use serde_json::Value;

/// The pure editor each section type provides.
///
/// `form` projects the current payload into an ordered field list;
/// `update` maps the payload plus one `FieldChange` into a replacement
/// payload. Calling `update` is the only way data flows upward — editors
/// never see ids, ordering or persistence.
pub trait SectionEditor: Sync {
    fn form(&self, data: &Value) -> Form;
    fn update(&self, data: &Value, change: &FieldChange) -> Value;
}

/// Registry entry for one section type.
pub struct SectionDef {
    pub kind: &'static str,
    pub label: &'static str,
    pub icon: &'static str,
    pub editor: &'static dyn SectionEditor,
    pub default_data: fn() -> Value,
}

/// Glyph shown for section types with no registered definition.
pub const FALLBACK_ICON: &str = "square";

static REGISTRY: &[SectionDef] = &[
    SectionDef {
        kind: "hero",
        label: "Hero",
        icon: "layout",
        editor: &sections::hero::HeroEditor,
        default_data: sections::hero::default_data,
    },
    SectionDef {
        kind: "feature_grid",
        label: "Feature grid",
        icon: "grid",
        editor: &sections::feature_grid::FeatureGridEditor,
        default_data: sections::feature_grid::default_data,
    },
    SectionDef {
        kind: "steps",
        label: "How it works",
        icon: "list-ordered",
        editor: &sections::steps::StepsEditor,
        default_data: sections::steps::default_data,
    },
    SectionDef {
        kind: "faq",
        label: "FAQ",
        icon: "help-circle",
        editor: &sections::faq::FaqEditor,
        default_data: sections::faq::default_data,
    },
    SectionDef {
        kind: "testimonials",
        label: "Testimonials",
        icon: "quote",
        editor: &sections::testimonials::TestimonialsEditor,
        default_data: sections::testimonials::default_data,
    },
    SectionDef {
        kind: "cta_banner",
        label: "CTA banner",
        icon: "megaphone",
        editor: &sections::cta_banner::CtaBannerEditor,
        default_data: sections::cta_banner::default_data,
    },
];

/// Look up the definition for a type tag.
pub fn get(kind: &str) -> Option<&'static SectionDef> {
    REGISTRY.iter().find(|def| def.kind == kind)
}

/// All registered definitions, in catalogue order.
pub fn all() -> &'static [SectionDef] {
    REGISTRY
}

/// Icon for a type tag, falling back to [`FALLBACK_ICON`].
pub fn icon_for(kind: &str) -> &'static str {
    get(kind).map(|def| def.icon).unwrap_or(FALLBACK_ICON)
}

/// Display label for a type tag, falling back to the tag itself.
pub fn label_for(kind: &str) -> String {
    get(kind)
        .map(|def| def.label.to_string())
        .unwrap_or_else(|| kind.to_string())
}
