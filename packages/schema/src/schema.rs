//! # Section Settings Schema
//!
//! Per-type declaration of the editable fields of a section: their names,
//! value kinds and constraints. Defaults live on the typed settings records
//! in [`crate::settings`]; this module decides whether a stored or edited
//! value fits its field.
//!
//! ## Recovery
//!
//! - Loading (`CoerceMode::Load`): a value with the wrong shape is a
//!   `SchemaMismatch` and the caller substitutes the field default.
//! - Editing (`CoerceMode::Edit`): a value that does not fit is an
//!   `InvalidFieldInput` and the caller keeps the prior value.

use crate::error::{SchemaError, SchemaResult};
use crate::lenient::number_from;
use crate::section_type::SectionType;
use crate::settings;
use serde_json::{Map, Number, Value};
use tracing::warn;

/// Value kind of one settings field
#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    ShortText,
    LongText,
    Boolean,
    Number { min: f64, max: f64, integer: bool },
    Select(&'static [&'static str]),
    /// Ordered list of plain identifiers
    IdList,
    /// Repeated sub-record list, entries identified by position only
    List(&'static ListSpec),
}

impl FieldKind {
    pub fn describe(&self) -> String {
        match self {
            FieldKind::ShortText | FieldKind::LongText => "text".to_string(),
            FieldKind::Boolean => "boolean".to_string(),
            FieldKind::Number { min, max, integer } => {
                let what = if *integer { "integer" } else { "number" };
                format!("{} in {}..={}", what, min, max)
            }
            FieldKind::Select(options) => format!("one of [{}]", options.join(", ")),
            FieldKind::IdList => "list of identifiers".to_string(),
            FieldKind::List(_) => "list of records".to_string(),
        }
    }
}

/// Shape and editing rules of a repeated sub-record list
#[derive(Debug)]
pub struct ListSpec {
    pub entry: &'static [FieldSpec],
    pub entry_default: fn() -> Map<String, Value>,
    /// A bare string entry is normalized to `{ <key>: <string> }`
    pub scalar_key: Option<&'static str>,
    /// Lists shorter than this are padded with default entries
    pub min_len: usize,
    /// Only the first N entries are offered for editing
    pub max_editable: Option<usize>,
    /// Append and remove are offered
    pub appendable: bool,
    /// Adjacent swap is offered
    pub swappable: bool,
}

/// Visibility rule for a field in the editing surface
#[derive(Debug, Clone, Copy)]
pub enum ShownWhen {
    /// Shown while the named select field holds the given option
    Equals(&'static str, &'static str),
    /// Shown unless the named boolean field is explicitly false
    Enabled(&'static str),
}

impl ShownWhen {
    pub fn holds(&self, settings: &Map<String, Value>) -> bool {
        match self {
            ShownWhen::Equals(field, option) => {
                settings.get(*field).and_then(Value::as_str) == Some(*option)
            }
            ShownWhen::Enabled(field) => settings.get(*field) != Some(&Value::Bool(false)),
        }
    }
}

/// One editable field
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub shown_when: Option<ShownWhen>,
}

impl FieldSpec {
    pub const fn new(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            shown_when: None,
        }
    }

    pub const fn shown_when(self, rule: ShownWhen) -> Self {
        FieldSpec {
            shown_when: Some(rule),
            ..self
        }
    }

    pub fn list_spec(&self) -> Option<&'static ListSpec> {
        match self.kind {
            FieldKind::List(spec) => Some(spec),
            _ => None,
        }
    }

    pub fn is_shown(&self, settings: &Map<String, Value>) -> bool {
        self.shown_when.map_or(true, |rule| rule.holds(settings))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoerceMode {
    Load,
    Edit,
}

const ALIGNMENTS: &[&str] = &["left", "center", "right"];
const LIST_LAYOUTS: &[&str] = &["grid", "carousel", "list"];
const IMAGE_LAYOUTS: &[&str] = &["single", "grid", "carousel"];
const FILTER_MODES: &[&str] = &["subcategory", "category"];
const VIDEO_PROVIDERS: &[&str] = &["youtube", "vimeo", "custom"];

const fn text(name: &'static str, label: &'static str) -> FieldSpec {
    FieldSpec::new(name, label, FieldKind::ShortText)
}

const fn long_text(name: &'static str, label: &'static str) -> FieldSpec {
    FieldSpec::new(name, label, FieldKind::LongText)
}

const fn toggle(name: &'static str, label: &'static str) -> FieldSpec {
    FieldSpec::new(name, label, FieldKind::Boolean)
}

const fn integer(name: &'static str, label: &'static str, min: f64, max: f64) -> FieldSpec {
    FieldSpec::new(name, label, FieldKind::Number { min, max, integer: true })
}

const fn select(name: &'static str, label: &'static str, options: &'static [&'static str]) -> FieldSpec {
    FieldSpec::new(name, label, FieldKind::Select(options))
}

const fn list(name: &'static str, label: &'static str, spec: &'static ListSpec) -> FieldSpec {
    FieldSpec::new(name, label, FieldKind::List(spec))
}

static MENU_ITEMS: ListSpec = ListSpec {
    entry: &[text("label", "Label"), text("link", "Link")],
    entry_default: settings::MenuItem::default_entry,
    scalar_key: None,
    min_len: 0,
    max_editable: None,
    appendable: true,
    swappable: false,
};

static COLLECTIONS: ListSpec = ListSpec {
    entry: &[
        text("name", "Collection name"),
        text("subcategoryId", "Subcategory ID")
            .shown_when(ShownWhen::Equals("filterBy", "subcategory")),
        text("categoryId", "Category ID").shown_when(ShownWhen::Equals("filterBy", "category")),
        text("imageUrl", "Collection image URL"),
    ],
    entry_default: settings::CollectionEntry::default_entry,
    scalar_key: None,
    min_len: 0,
    max_editable: None,
    appendable: true,
    swappable: false,
};

static IMAGES: ListSpec = ListSpec {
    entry: &[text("url", "Image URL"), text("caption", "Caption")],
    entry_default: settings::ImageEntry::default_entry,
    scalar_key: Some("url"),
    min_len: 0,
    max_editable: None,
    appendable: true,
    swappable: true,
};

static TRUST_BADGES: ListSpec = ListSpec {
    entry: &[text("icon", "Icon"), text("title", "Title"), text("text", "Description")],
    entry_default: settings::TrustBadge::default_entry,
    scalar_key: None,
    min_len: 2,
    max_editable: Some(2),
    appendable: false,
    swappable: false,
};

static TESTIMONIALS: ListSpec = ListSpec {
    entry: &[
        text("name", "Name"),
        integer("rating", "Rating", 1.0, 5.0),
        long_text("text", "Quote"),
        text("avatar", "Avatar URL"),
    ],
    entry_default: settings::Testimonial::default_entry,
    scalar_key: None,
    min_len: 0,
    max_editable: None,
    appendable: true,
    swappable: false,
};

static FOOTER_LINKS: ListSpec = ListSpec {
    entry: &[text("label", "Label"), text("url", "URL")],
    entry_default: settings::FooterLink::default_entry,
    scalar_key: None,
    min_len: 0,
    max_editable: None,
    appendable: true,
    swappable: false,
};

static FOOTER_COLUMNS: ListSpec = ListSpec {
    entry: &[text("title", "Title"), list("links", "Links", &FOOTER_LINKS)],
    entry_default: settings::FooterColumn::default_entry,
    scalar_key: None,
    min_len: 0,
    max_editable: None,
    appendable: true,
    swappable: false,
};

static SOCIAL_LINKS: ListSpec = ListSpec {
    entry: &[text("platform", "Platform"), text("url", "URL")],
    entry_default: settings::SocialLink::default_entry,
    scalar_key: None,
    min_len: 0,
    max_editable: None,
    appendable: true,
    swappable: false,
};

static ANNOUNCEMENT_BAR_FIELDS: &[FieldSpec] = &[
    text("message", "Message"),
    text("linkLabel", "Link label"),
    text("linkUrl", "Link URL"),
    select("alignment", "Alignment", ALIGNMENTS),
    toggle("showClose", "Show close button"),
];

static HEADER_FIELDS: &[FieldSpec] = &[
    text("logo", "Logo URL"),
    text("storeName", "Store Name"),
    toggle("showSearch", "Show Search"),
    list("menuItems", "Menu items", &MENU_ITEMS),
];

static HERO_FIELDS: &[FieldSpec] = &[
    text("heading", "Heading"),
    long_text("subheading", "Subheading"),
    text("buttonText", "Button Text"),
    text("buttonLink", "Button Link"),
    text("backgroundImage", "Background Image URL"),
    select("alignment", "Content Alignment", ALIGNMENTS),
];

static TEXT_FIELDS: &[FieldSpec] = &[
    text("heading", "Heading"),
    long_text("content", "Content"),
    select("alignment", "Text Alignment", ALIGNMENTS),
];

static NEWSLETTER_FIELDS: &[FieldSpec] = &[
    text("heading", "Heading"),
    long_text("description", "Description"),
    text("buttonText", "Button Text"),
    text("placeholder", "Input Placeholder"),
    text("successMessage", "Success Message"),
];

static PRODUCT_GRID_FIELDS: &[FieldSpec] = &[
    text("heading", "Heading"),
    select("layout", "Layout", LIST_LAYOUTS),
    integer("columns", "Columns", 1.0, 4.0).shown_when(ShownWhen::Equals("layout", "grid")),
    integer("maxProducts", "Max Products", 1.0, 12.0),
    toggle("showAll", "Show all products"),
    FieldSpec::new("productIds", "Products", FieldKind::IdList),
    toggle("showPrice", "Show Pricing"),
    toggle("showAddToCart", "Show Add to Cart"),
];

static PRODUCT_COLLECTION_FIELDS: &[FieldSpec] = &[
    text("heading", "Heading"),
    long_text("description", "Description"),
    select("layout", "Layout", LIST_LAYOUTS),
    select("filterBy", "Filter Products By", FILTER_MODES),
    integer("maxProductsPerCollection", "Max Products Per Collection", 1.0, 12.0),
    toggle("showPrice", "Show Pricing"),
    list("collections", "Collections", &COLLECTIONS),
];

static IMAGE_FIELDS: &[FieldSpec] = &[
    select("layout", "Layout", IMAGE_LAYOUTS),
    integer("gridColumns", "Grid Columns", 2.0, 4.0).shown_when(ShownWhen::Equals("layout", "grid")),
    text("aspectRatio", "Aspect ratio"),
    text("caption", "Caption"),
    list("images", "Images", &IMAGES),
];

static VIDEO_FIELDS: &[FieldSpec] = &[
    text("videoUrl", "Video URL"),
    select("provider", "Provider", VIDEO_PROVIDERS),
    toggle("autoplay", "Autoplay"),
    toggle("controls", "Controls"),
    text("aspectRatio", "Aspect ratio"),
];

static PRODUCT_DETAILS_FIELDS: &[FieldSpec] = &[
    toggle("showBadge", "Show badge"),
    text("badgeText", "Badge text").shown_when(ShownWhen::Enabled("showBadge")),
    text("tagline", "Tagline"),
    toggle("showRating", "Show rating"),
    FieldSpec::new(
        "ratingValue",
        "Rating value",
        FieldKind::Number {
            min: 0.0,
            max: 5.0,
            integer: false,
        },
    )
    .shown_when(ShownWhen::Enabled("showRating")),
    integer("ratingCount", "Rating count", 0.0, 1_000_000.0)
        .shown_when(ShownWhen::Enabled("showRating")),
    toggle("showTrustBadges", "Show trust badges"),
    list("trustBadges", "Trust badges", &TRUST_BADGES)
        .shown_when(ShownWhen::Enabled("showTrustBadges")),
    toggle("showReviews", "Show reviews"),
    toggle("showSizeChart", "Show size chart"),
];

static PRODUCT_RECOMMENDATIONS_FIELDS: &[FieldSpec] = &[
    text("heading", "Heading"),
    long_text("subheading", "Subheading"),
    integer("maxItems", "Products to show", 1.0, 8.0),
    select("layout", "Layout", LIST_LAYOUTS),
];

static TESTIMONIALS_FIELDS: &[FieldSpec] = &[
    text("heading", "Heading"),
    select("layout", "Layout", LIST_LAYOUTS),
    list("testimonials", "Testimonials", &TESTIMONIALS),
];

static FOOTER_FIELDS: &[FieldSpec] = &[
    long_text("copyright", "Footer Text"),
    list("sections", "Link columns", &FOOTER_COLUMNS),
    list("socialLinks", "Social links", &SOCIAL_LINKS),
];

static CUSTOM_HTML_FIELDS: &[FieldSpec] = &[long_text("html", "HTML Content")];

/// Editable fields of a section type; empty for unknown types.
pub fn fields_for(section_type: &SectionType) -> &'static [FieldSpec] {
    match section_type {
        SectionType::AnnouncementBar => ANNOUNCEMENT_BAR_FIELDS,
        SectionType::Header => HEADER_FIELDS,
        SectionType::Hero => HERO_FIELDS,
        SectionType::Text => TEXT_FIELDS,
        SectionType::Newsletter => NEWSLETTER_FIELDS,
        SectionType::ProductGrid => PRODUCT_GRID_FIELDS,
        SectionType::ProductCollection => PRODUCT_COLLECTION_FIELDS,
        SectionType::Image => IMAGE_FIELDS,
        SectionType::Video => VIDEO_FIELDS,
        SectionType::ProductDetails => PRODUCT_DETAILS_FIELDS,
        SectionType::ProductRecommendations => PRODUCT_RECOMMENDATIONS_FIELDS,
        SectionType::Testimonials => TESTIMONIALS_FIELDS,
        SectionType::Footer => FOOTER_FIELDS,
        SectionType::CustomHtml => CUSTOM_HTML_FIELDS,
        SectionType::Unknown(_) => &[],
    }
}

pub fn field_spec(section_type: &SectionType, name: &str) -> Option<&'static FieldSpec> {
    fields_for(section_type).iter().find(|f| f.name == name)
}

fn mismatch(owner: &str, spec: &FieldSpec, mode: CoerceMode, value: &Value) -> SchemaError {
    match mode {
        CoerceMode::Load => SchemaError::SchemaMismatch {
            section_type: owner.to_string(),
            field: spec.name.to_string(),
            expected: spec.kind.describe(),
        },
        CoerceMode::Edit => SchemaError::invalid_input(
            spec.name,
            format!("expected {}, got {}", spec.kind.describe(), value),
        ),
    }
}

/// Check `value` against `spec`, normalizing it where the field allows.
pub fn coerce(owner: &str, spec: &FieldSpec, value: &Value, mode: CoerceMode) -> SchemaResult<Value> {
    match spec.kind {
        FieldKind::ShortText | FieldKind::LongText => match value {
            Value::String(_) => Ok(value.clone()),
            Value::Null if mode == CoerceMode::Edit => Ok(Value::String(String::new())),
            _ => Err(mismatch(owner, spec, mode, value)),
        },

        FieldKind::Boolean => match value {
            Value::Bool(_) => Ok(value.clone()),
            Value::String(s) if mode == CoerceMode::Edit && (s == "true" || s == "false") => {
                Ok(Value::Bool(s == "true"))
            }
            _ => Err(mismatch(owner, spec, mode, value)),
        },

        FieldKind::Number { min, max, integer } => {
            let n = number_from(value).ok_or_else(|| mismatch(owner, spec, mode, value))?;
            if n < min || n > max || (integer && n.fract() != 0.0) {
                return Err(mismatch(owner, spec, mode, value));
            }
            if integer {
                Ok(Value::from(n as i64))
            } else {
                Number::from_f64(n)
                    .map(Value::Number)
                    .ok_or_else(|| mismatch(owner, spec, mode, value))
            }
        }

        FieldKind::Select(options) => match value.as_str() {
            Some(choice) if options.contains(&choice) => Ok(value.clone()),
            _ => Err(mismatch(owner, spec, mode, value)),
        },

        FieldKind::IdList => match value {
            Value::Array(items) => Ok(Value::Array(
                items
                    .iter()
                    .filter(|item| item.is_string())
                    .cloned()
                    .collect(),
            )),
            _ => Err(mismatch(owner, spec, mode, value)),
        },

        FieldKind::List(list_spec) => match value {
            Value::Array(items) => Ok(Value::Array(normalize_list(owner, spec.name, list_spec, items))),
            _ => Err(mismatch(owner, spec, mode, value)),
        },
    }
}

/// Normalize every entry of a sub-record list and pad it to its minimum length.
pub fn normalize_list(owner: &str, field: &str, spec: &ListSpec, items: &[Value]) -> Vec<Value> {
    let mut entries: Vec<Value> = items
        .iter()
        .filter_map(|item| match item {
            Value::Object(partial) => Some(Value::Object(normalize_entry(owner, spec, partial))),
            Value::String(s) => match spec.scalar_key {
                Some(key) => {
                    let mut partial = Map::new();
                    partial.insert(key.to_string(), Value::String(s.clone()));
                    Some(Value::Object(normalize_entry(owner, spec, &partial)))
                }
                None => {
                    warn!(section_type = owner, field, "Dropping list entry with unexpected shape");
                    None
                }
            },
            _ => {
                warn!(section_type = owner, field, "Dropping list entry with unexpected shape");
                None
            }
        })
        .collect();

    while entries.len() < spec.min_len {
        entries.push(Value::Object((spec.entry_default)()));
    }
    entries
}

/// Default entry overlaid with every well-formed field from `partial`.
pub fn normalize_entry(owner: &str, spec: &ListSpec, partial: &Map<String, Value>) -> Map<String, Value> {
    overlay(owner, (spec.entry_default)(), spec.entry, partial)
}

/// Overlay the well-formed fields of `partial` onto `defaults`.
pub fn overlay(
    owner: &str,
    mut defaults: Map<String, Value>,
    fields: &[FieldSpec],
    partial: &Map<String, Value>,
) -> Map<String, Value> {
    for spec in fields {
        let Some(value) = partial.get(spec.name) else {
            continue;
        };
        match coerce(owner, spec, value, CoerceMode::Load) {
            Ok(value) => {
                defaults.insert(spec.name.to_string(), value);
            }
            Err(e) => {
                warn!(error = %e, "Schema mismatch - substituting field default");
            }
        }
    }
    defaults
}
