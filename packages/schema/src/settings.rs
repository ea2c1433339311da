//! Typed settings records, one per section type.
//!
//! [`SectionSettings`] is the tagged union carried by every section. It is
//! always fully defaulted: construction goes through
//! [`SectionSettings::defaulted`], which starts from the record's defaults
//! and overlays only the stored fields that fit the schema.

use crate::error::{SchemaError, SchemaResult};
use crate::list::IndexedList;
use crate::schema::{self, CoerceMode, FieldSpec, ListSpec};
use crate::section_type::SectionType;
use crate::styles::TextAlign;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, error};

fn to_map<T: Serialize>(value: &T) -> Map<String, Value> {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListLayout {
    #[default]
    Grid,
    Carousel,
    List,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageLayout {
    #[default]
    Single,
    Grid,
    Carousel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterBy {
    #[default]
    Subcategory,
    Category,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoProvider {
    #[default]
    Youtube,
    Vimeo,
    Custom,
}

// ---- list entries ----

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MenuItem {
    pub label: String,
    pub link: String,
}

impl MenuItem {
    pub fn new(label: &str, link: &str) -> Self {
        Self {
            label: label.to_string(),
            link: link.to_string(),
        }
    }

    pub fn default_entry() -> Map<String, Value> {
        to_map(&Self::default())
    }
}

/// One product collection. Both filter identifiers are kept so switching
/// `filterBy` never loses the inactive mode's value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CollectionEntry {
    pub name: String,
    pub subcategory_id: String,
    pub category_id: String,
    pub image_url: String,
}

impl CollectionEntry {
    pub fn default_entry() -> Map<String, Value> {
        to_map(&Self::default())
    }

    /// Identifier used for the given filter mode, if one is set
    pub fn filter_id(&self, filter_by: FilterBy) -> Option<&str> {
        let id = match filter_by {
            FilterBy::Subcategory => &self.subcategory_id,
            FilterBy::Category => &self.category_id,
        };
        Some(id.as_str()).filter(|id| !id.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageEntry {
    pub url: String,
    pub caption: String,
}

impl ImageEntry {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            caption: String::new(),
        }
    }

    pub fn default_entry() -> Map<String, Value> {
        to_map(&Self::default())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TrustBadge {
    pub icon: String,
    pub title: String,
    pub text: String,
}

impl Default for TrustBadge {
    fn default() -> Self {
        Self {
            icon: "Truck".to_string(),
            title: String::new(),
            text: String::new(),
        }
    }
}

impl TrustBadge {
    pub fn default_entry() -> Map<String, Value> {
        to_map(&Self::default())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Testimonial {
    pub name: String,
    pub rating: u32,
    pub text: String,
    pub avatar: String,
}

impl Default for Testimonial {
    fn default() -> Self {
        Self {
            name: String::new(),
            rating: 5,
            text: String::new(),
            avatar: String::new(),
        }
    }
}

impl Testimonial {
    pub fn default_entry() -> Map<String, Value> {
        to_map(&Self::default())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FooterLink {
    pub label: String,
    pub url: String,
}

impl FooterLink {
    pub fn new(label: &str, url: &str) -> Self {
        Self {
            label: label.to_string(),
            url: url.to_string(),
        }
    }

    pub fn default_entry() -> Map<String, Value> {
        to_map(&Self::default())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FooterColumn {
    pub title: String,
    pub links: IndexedList<FooterLink>,
}

impl FooterColumn {
    pub fn default_entry() -> Map<String, Value> {
        to_map(&Self::default())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SocialLink {
    pub platform: String,
    pub url: String,
}

impl SocialLink {
    pub fn default_entry() -> Map<String, Value> {
        to_map(&Self::default())
    }
}

// ---- per-type records ----

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnnouncementBarSettings {
    pub message: String,
    pub link_label: String,
    pub link_url: String,
    pub alignment: TextAlign,
    pub show_close: bool,
}

impl Default for AnnouncementBarSettings {
    fn default() -> Self {
        Self {
            message: "Free shipping on orders over $75".to_string(),
            link_label: String::new(),
            link_url: String::new(),
            alignment: TextAlign::Center,
            show_close: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HeaderSettings {
    pub logo: String,
    pub store_name: String,
    pub show_search: bool,
    pub menu_items: IndexedList<MenuItem>,
}

impl Default for HeaderSettings {
    fn default() -> Self {
        Self {
            logo: String::new(),
            store_name: "My Store".to_string(),
            show_search: true,
            menu_items: IndexedList::from(vec![
                MenuItem::new("Home", "/"),
                MenuItem::new("Products", "/products"),
                MenuItem::new("About", "/about"),
            ]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HeroSettings {
    pub heading: String,
    pub subheading: String,
    pub button_text: String,
    pub button_link: String,
    pub background_image: String,
    pub alignment: TextAlign,
}

impl Default for HeroSettings {
    fn default() -> Self {
        Self {
            heading: "Welcome to Our Store".to_string(),
            subheading: "Discover amazing products".to_string(),
            button_text: "Shop Now".to_string(),
            button_link: "#products".to_string(),
            background_image: String::new(),
            alignment: TextAlign::Center,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextSettings {
    pub heading: String,
    pub content: String,
    pub alignment: TextAlign,
}

impl Default for TextSettings {
    fn default() -> Self {
        Self {
            heading: "About Us".to_string(),
            content: "<p>Tell your story here. Add your brand message and connect with customers.</p>"
                .to_string(),
            alignment: TextAlign::Left,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewsletterSettings {
    pub heading: String,
    pub description: String,
    pub button_text: String,
    pub placeholder: String,
    pub success_message: String,
}

impl Default for NewsletterSettings {
    fn default() -> Self {
        Self {
            heading: "Stay Updated".to_string(),
            description: "Subscribe to get special offers and updates".to_string(),
            button_text: "Subscribe".to_string(),
            placeholder: "Enter your email".to_string(),
            success_message: "Thanks for subscribing!".to_string(),
        }
    }
}

/// `columns` is only consulted when `layout` is grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductGridSettings {
    pub heading: String,
    pub layout: ListLayout,
    pub columns: u32,
    pub max_products: u32,
    pub show_all: bool,
    pub product_ids: Vec<String>,
    pub show_price: bool,
    pub show_add_to_cart: bool,
}

impl Default for ProductGridSettings {
    fn default() -> Self {
        Self {
            heading: "Featured Products".to_string(),
            layout: ListLayout::Grid,
            columns: 4,
            max_products: 8,
            show_all: true,
            product_ids: Vec::new(),
            show_price: true,
            show_add_to_cart: true,
        }
    }
}

impl ProductGridSettings {
    /// Column count actually used for the current layout
    pub fn effective_columns(&self) -> u32 {
        match self.layout {
            ListLayout::Grid => self.columns,
            ListLayout::Carousel | ListLayout::List => 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductCollectionSettings {
    pub heading: String,
    pub description: String,
    pub layout: ListLayout,
    pub filter_by: FilterBy,
    pub max_products_per_collection: u32,
    pub show_price: bool,
    pub collections: IndexedList<CollectionEntry>,
}

impl Default for ProductCollectionSettings {
    fn default() -> Self {
        Self {
            heading: "Shop by Collection".to_string(),
            description: "Explore our curated collections".to_string(),
            layout: ListLayout::Grid,
            filter_by: FilterBy::Subcategory,
            max_products_per_collection: 4,
            show_price: true,
            collections: IndexedList::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageSettings {
    pub layout: ImageLayout,
    pub grid_columns: u32,
    pub aspect_ratio: String,
    pub caption: String,
    pub images: IndexedList<ImageEntry>,
}

impl Default for ImageSettings {
    fn default() -> Self {
        Self {
            layout: ImageLayout::Single,
            grid_columns: 3,
            aspect_ratio: "16:9".to_string(),
            caption: String::new(),
            images: IndexedList::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VideoSettings {
    pub video_url: String,
    pub provider: VideoProvider,
    pub autoplay: bool,
    pub controls: bool,
    pub aspect_ratio: String,
}

impl Default for VideoSettings {
    fn default() -> Self {
        Self {
            video_url: String::new(),
            provider: VideoProvider::Youtube,
            autoplay: false,
            controls: true,
            aspect_ratio: "16:9".to_string(),
        }
    }
}

/// Maximum number of trust badges a product page shows
pub const RENDERED_TRUST_BADGES: usize = 2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductDetailsSettings {
    pub show_badge: bool,
    pub badge_text: String,
    pub tagline: String,
    pub show_rating: bool,
    pub rating_value: f64,
    pub rating_count: u32,
    pub show_trust_badges: bool,
    pub trust_badges: IndexedList<TrustBadge>,
    pub show_reviews: bool,
    pub show_size_chart: bool,
}

impl Default for ProductDetailsSettings {
    fn default() -> Self {
        let mut trust_badges = IndexedList::new();
        trust_badges.pad_to(RENDERED_TRUST_BADGES, TrustBadge::default);
        Self {
            show_badge: true,
            badge_text: "Bestseller".to_string(),
            tagline: String::new(),
            show_rating: true,
            rating_value: 4.8,
            rating_count: 120,
            show_trust_badges: true,
            trust_badges,
            show_reviews: true,
            show_size_chart: true,
        }
    }
}

impl ProductDetailsSettings {
    /// Badges that render; anything stored past the second entry is ignored.
    pub fn rendered_trust_badges(&self) -> &[TrustBadge] {
        let badges = self.trust_badges.as_slice();
        &badges[..badges.len().min(RENDERED_TRUST_BADGES)]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductRecommendationsSettings {
    pub heading: String,
    pub subheading: String,
    pub max_items: u32,
    pub layout: ListLayout,
}

impl Default for ProductRecommendationsSettings {
    fn default() -> Self {
        Self {
            heading: "You may also like".to_string(),
            subheading: "Explore more designs that pair perfectly with this product.".to_string(),
            max_items: 4,
            layout: ListLayout::Grid,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TestimonialsSettings {
    pub heading: String,
    pub layout: ListLayout,
    pub testimonials: IndexedList<Testimonial>,
}

impl Default for TestimonialsSettings {
    fn default() -> Self {
        Self {
            heading: "What Our Customers Say".to_string(),
            layout: ListLayout::Carousel,
            testimonials: IndexedList::from(vec![Testimonial {
                name: "John Doe".to_string(),
                rating: 5,
                text: "Amazing products and great service!".to_string(),
                avatar: String::new(),
            }]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FooterSettings {
    pub copyright: String,
    pub sections: IndexedList<FooterColumn>,
    pub social_links: IndexedList<SocialLink>,
}

impl Default for FooterSettings {
    fn default() -> Self {
        Self {
            copyright: "© 2025 Your Store. All rights reserved.".to_string(),
            sections: IndexedList::from(vec![
                FooterColumn {
                    title: "Shop".to_string(),
                    links: IndexedList::from(vec![
                        FooterLink::new("All Products", "/products"),
                        FooterLink::new("New Arrivals", "/new"),
                    ]),
                },
                FooterColumn {
                    title: "Support".to_string(),
                    links: IndexedList::from(vec![
                        FooterLink::new("Contact Us", "/contact"),
                        FooterLink::new("FAQ", "/faq"),
                    ]),
                },
            ]),
            social_links: IndexedList::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomHtmlSettings {
    pub html: String,
}

impl Default for CustomHtmlSettings {
    fn default() -> Self {
        Self {
            html: "<div><p>Add your custom HTML here</p></div>".to_string(),
        }
    }
}

/// Settings of one section, tagged by section type.
#[derive(Debug, Clone, PartialEq)]
pub enum SectionSettings {
    AnnouncementBar(AnnouncementBarSettings),
    Header(HeaderSettings),
    Hero(HeroSettings),
    Text(TextSettings),
    Newsletter(NewsletterSettings),
    ProductGrid(ProductGridSettings),
    ProductCollection(ProductCollectionSettings),
    Image(ImageSettings),
    Video(VideoSettings),
    ProductDetails(ProductDetailsSettings),
    ProductRecommendations(ProductRecommendationsSettings),
    Testimonials(TestimonialsSettings),
    Footer(FooterSettings),
    CustomHtml(CustomHtmlSettings),
    /// Unregistered type: no editable fields. The stored mapping is kept
    /// only so a load/save cycle does not lose it.
    Unknown {
        type_name: String,
        preserved: Map<String, Value>,
    },
}

fn typed<T>(section_type: &SectionType, partial: &Map<String, Value>) -> T
where
    T: Serialize + DeserializeOwned + Default,
{
    let defaults = to_map(&T::default());
    let merged = schema::overlay(
        section_type.as_str(),
        defaults,
        schema::fields_for(section_type),
        partial,
    );
    match serde_json::from_value(Value::Object(merged)) {
        Ok(settings) => settings,
        Err(e) => {
            error!(section_type = %section_type, error = %e, "Defaulted settings failed to decode - using type defaults");
            T::default()
        }
    }
}

/// Fully defaulted settings for `section_type` from a possibly partial mapping.
pub fn defaulted_settings(section_type: &SectionType, partial: &Map<String, Value>) -> SectionSettings {
    SectionSettings::defaulted(section_type, partial)
}

impl SectionSettings {
    pub fn defaulted(section_type: &SectionType, partial: &Map<String, Value>) -> Self {
        match section_type {
            SectionType::AnnouncementBar => {
                SectionSettings::AnnouncementBar(typed(section_type, partial))
            }
            SectionType::Header => SectionSettings::Header(typed(section_type, partial)),
            SectionType::Hero => SectionSettings::Hero(typed(section_type, partial)),
            SectionType::Text => SectionSettings::Text(typed(section_type, partial)),
            SectionType::Newsletter => SectionSettings::Newsletter(typed(section_type, partial)),
            SectionType::ProductGrid => SectionSettings::ProductGrid(typed(section_type, partial)),
            SectionType::ProductCollection => {
                SectionSettings::ProductCollection(typed(section_type, partial))
            }
            SectionType::Image => SectionSettings::Image(typed(section_type, partial)),
            SectionType::Video => SectionSettings::Video(typed(section_type, partial)),
            SectionType::ProductDetails => {
                SectionSettings::ProductDetails(typed(section_type, partial))
            }
            SectionType::ProductRecommendations => {
                SectionSettings::ProductRecommendations(typed(section_type, partial))
            }
            SectionType::Testimonials => SectionSettings::Testimonials(typed(section_type, partial)),
            SectionType::Footer => SectionSettings::Footer(typed(section_type, partial)),
            SectionType::CustomHtml => SectionSettings::CustomHtml(typed(section_type, partial)),
            SectionType::Unknown(name) => SectionSettings::Unknown {
                type_name: name.clone(),
                preserved: partial.clone(),
            },
        }
    }

    /// Type defaults with nothing stored
    pub fn defaults(section_type: &SectionType) -> Self {
        Self::defaulted(section_type, &Map::new())
    }

    pub fn section_type(&self) -> SectionType {
        match self {
            SectionSettings::AnnouncementBar(_) => SectionType::AnnouncementBar,
            SectionSettings::Header(_) => SectionType::Header,
            SectionSettings::Hero(_) => SectionType::Hero,
            SectionSettings::Text(_) => SectionType::Text,
            SectionSettings::Newsletter(_) => SectionType::Newsletter,
            SectionSettings::ProductGrid(_) => SectionType::ProductGrid,
            SectionSettings::ProductCollection(_) => SectionType::ProductCollection,
            SectionSettings::Image(_) => SectionType::Image,
            SectionSettings::Video(_) => SectionType::Video,
            SectionSettings::ProductDetails(_) => SectionType::ProductDetails,
            SectionSettings::ProductRecommendations(_) => SectionType::ProductRecommendations,
            SectionSettings::Testimonials(_) => SectionType::Testimonials,
            SectionSettings::Footer(_) => SectionType::Footer,
            SectionSettings::CustomHtml(_) => SectionType::CustomHtml,
            SectionSettings::Unknown { type_name, .. } => SectionType::Unknown(type_name.clone()),
        }
    }

    /// Document-shaped mapping (camelCase field names)
    pub fn to_map(&self) -> Map<String, Value> {
        match self {
            SectionSettings::AnnouncementBar(s) => to_map(s),
            SectionSettings::Header(s) => to_map(s),
            SectionSettings::Hero(s) => to_map(s),
            SectionSettings::Text(s) => to_map(s),
            SectionSettings::Newsletter(s) => to_map(s),
            SectionSettings::ProductGrid(s) => to_map(s),
            SectionSettings::ProductCollection(s) => to_map(s),
            SectionSettings::Image(s) => to_map(s),
            SectionSettings::Video(s) => to_map(s),
            SectionSettings::ProductDetails(s) => to_map(s),
            SectionSettings::ProductRecommendations(s) => to_map(s),
            SectionSettings::Testimonials(s) => to_map(s),
            SectionSettings::Footer(s) => to_map(s),
            SectionSettings::CustomHtml(s) => to_map(s),
            SectionSettings::Unknown { preserved, .. } => preserved.clone(),
        }
    }

    pub fn fields(&self) -> &'static [FieldSpec] {
        schema::fields_for(&self.section_type())
    }

    /// Fields the editing surface should currently offer
    pub fn editable_fields(&self) -> Vec<&'static FieldSpec> {
        let current = self.to_map();
        self.fields().iter().filter(|f| f.is_shown(&current)).collect()
    }

    pub fn get(&self, field: &str) -> Option<Value> {
        schema::field_spec(&self.section_type(), field)?;
        self.to_map().remove(field)
    }

    fn require_known(&self) -> SchemaResult<SectionType> {
        let section_type = self.section_type();
        if section_type.is_known() {
            Ok(section_type)
        } else {
            Err(SchemaError::UnknownSectionType(section_type.as_str().to_string()))
        }
    }

    fn spec(&self, section_type: &SectionType, field: &str) -> SchemaResult<&'static FieldSpec> {
        schema::field_spec(section_type, field).ok_or_else(|| SchemaError::UnknownField {
            section_type: section_type.as_str().to_string(),
            field: field.to_string(),
        })
    }

    /// Returns a copy with one field replaced; every other field is kept.
    pub fn with_field(&self, field: &str, input: &Value) -> SchemaResult<SectionSettings> {
        let section_type = self.require_known()?;
        let spec = self.spec(&section_type, field)?;
        let value = schema::coerce(section_type.as_str(), spec, input, CoerceMode::Edit)?;

        let mut current = self.to_map();
        current.insert(field.to_string(), value);
        Ok(SectionSettings::defaulted(&section_type, &current))
    }

    /// Shallow merge of several fields. A field that does not fit is skipped
    /// and keeps its prior value; the rest of the patch still applies.
    pub fn merged(&self, patch: &Map<String, Value>) -> SectionSettings {
        let mut next = self.clone();
        for (field, value) in patch {
            match next.with_field(field, value) {
                Ok(updated) => next = updated,
                Err(e) => debug!(field = %field, error = %e, "Rejected settings field"),
            }
        }
        next
    }

    /// Entries of a sub-record list together with the list's rules.
    pub fn list_entries(&self, field: &str) -> SchemaResult<(&'static ListSpec, IndexedList<Value>)> {
        let section_type = self.require_known()?;
        let spec = self.spec(&section_type, field)?;
        let list_spec = spec
            .list_spec()
            .ok_or_else(|| SchemaError::NotAList(field.to_string()))?;

        let entries = match self.to_map().remove(field) {
            Some(Value::Array(items)) => IndexedList::from(items),
            _ => IndexedList::new(),
        };
        Ok((list_spec, entries))
    }

    /// Replace a sub-record list wholesale; entries are normalized on the way in.
    pub fn with_list(&self, field: &str, entries: IndexedList<Value>) -> SchemaResult<SectionSettings> {
        let section_type = self.require_known()?;
        let spec = self.spec(&section_type, field)?;
        if spec.list_spec().is_none() {
            return Err(SchemaError::NotAList(field.to_string()));
        }

        let mut current = self.to_map();
        current.insert(field.to_string(), Value::Array(entries.into_vec()));
        Ok(SectionSettings::defaulted(&section_type, &current))
    }

    /// The `alignment` setting, for the types that have one
    pub fn alignment(&self) -> Option<TextAlign> {
        match self {
            SectionSettings::AnnouncementBar(s) => Some(s.alignment),
            SectionSettings::Hero(s) => Some(s.alignment),
            SectionSettings::Text(s) => Some(s.alignment),
            _ => None,
        }
    }

    pub fn background_image(&self) -> Option<String> {
        match self {
            SectionSettings::Hero(s) if !s.background_image.trim().is_empty() => {
                Some(s.background_image.clone())
            }
            _ => None,
        }
    }
}
