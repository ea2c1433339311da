//! The closed set of section types.

use crate::styles::{PartialSides, SectionStyles, TextAlign};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Section type tag as persisted in the `type` field of a section document.
///
/// Names outside the known set are kept as [`SectionType::Unknown`] so the
/// section survives a load/save cycle even though nothing can edit or render it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SectionType {
    AnnouncementBar,
    Header,
    Hero,
    Text,
    Newsletter,
    ProductGrid,
    ProductCollection,
    Image,
    Video,
    ProductDetails,
    ProductRecommendations,
    Testimonials,
    Footer,
    CustomHtml,
    Unknown(String),
}

/// Grouping used by the authoring host's section picker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionCategory {
    Layout,
    Content,
    Commerce,
    Marketing,
}

impl SectionType {
    /// Every registered section type, in picker order.
    pub const KNOWN: [SectionType; 14] = [
        SectionType::AnnouncementBar,
        SectionType::Header,
        SectionType::Hero,
        SectionType::Text,
        SectionType::Newsletter,
        SectionType::ProductGrid,
        SectionType::ProductCollection,
        SectionType::Image,
        SectionType::Video,
        SectionType::ProductDetails,
        SectionType::ProductRecommendations,
        SectionType::Testimonials,
        SectionType::Footer,
        SectionType::CustomHtml,
    ];

    pub fn parse(name: &str) -> Self {
        match name {
            "announcement-bar" => SectionType::AnnouncementBar,
            "header" => SectionType::Header,
            "hero" => SectionType::Hero,
            "text" => SectionType::Text,
            "newsletter" => SectionType::Newsletter,
            "product-grid" => SectionType::ProductGrid,
            "product-collection" => SectionType::ProductCollection,
            "image" => SectionType::Image,
            "video" => SectionType::Video,
            "product-details" => SectionType::ProductDetails,
            "product-recommendations" => SectionType::ProductRecommendations,
            "testimonials" => SectionType::Testimonials,
            "footer" => SectionType::Footer,
            "custom-html" => SectionType::CustomHtml,
            other => SectionType::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            SectionType::AnnouncementBar => "announcement-bar",
            SectionType::Header => "header",
            SectionType::Hero => "hero",
            SectionType::Text => "text",
            SectionType::Newsletter => "newsletter",
            SectionType::ProductGrid => "product-grid",
            SectionType::ProductCollection => "product-collection",
            SectionType::Image => "image",
            SectionType::Video => "video",
            SectionType::ProductDetails => "product-details",
            SectionType::ProductRecommendations => "product-recommendations",
            SectionType::Testimonials => "testimonials",
            SectionType::Footer => "footer",
            SectionType::CustomHtml => "custom-html",
            SectionType::Unknown(name) => name,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, SectionType::Unknown(_))
    }

    pub fn display_name(&self) -> &str {
        match self {
            SectionType::AnnouncementBar => "Announcement Bar",
            SectionType::Header => "Header",
            SectionType::Hero => "Hero Banner",
            SectionType::Text => "Text Block",
            SectionType::Newsletter => "Newsletter Signup",
            SectionType::ProductGrid => "Product Grid",
            SectionType::ProductCollection => "Product Collection",
            SectionType::Image => "Image Gallery",
            SectionType::Video => "Video Embed",
            SectionType::ProductDetails => "Product Details",
            SectionType::ProductRecommendations => "Product Recommendations",
            SectionType::Testimonials => "Testimonials",
            SectionType::Footer => "Footer",
            SectionType::CustomHtml => "Custom HTML",
            SectionType::Unknown(name) => name,
        }
    }

    pub fn category(&self) -> Option<SectionCategory> {
        let category = match self {
            SectionType::AnnouncementBar | SectionType::Header | SectionType::Footer => {
                SectionCategory::Layout
            }
            SectionType::Hero
            | SectionType::Text
            | SectionType::Image
            | SectionType::Video
            | SectionType::CustomHtml => SectionCategory::Content,
            SectionType::ProductGrid
            | SectionType::ProductCollection
            | SectionType::ProductDetails
            | SectionType::ProductRecommendations => SectionCategory::Commerce,
            SectionType::Newsletter | SectionType::Testimonials => SectionCategory::Marketing,
            SectionType::Unknown(_) => return None,
        };
        Some(category)
    }

    /// Last link of the text-alignment fallback chain.
    pub fn default_text_align(&self) -> TextAlign {
        match self {
            SectionType::AnnouncementBar | SectionType::Hero | SectionType::Newsletter => {
                TextAlign::Center
            }
            _ => TextAlign::Left,
        }
    }

    /// Styles a freshly created section of this type starts with.
    pub fn default_styles(&self) -> SectionStyles {
        let (background, vertical_padding) = match self {
            SectionType::AnnouncementBar => ("#eff6ff", 12.0),
            SectionType::Header => ("#ffffff", 16.0),
            SectionType::Hero => ("#f3f4f6", 80.0),
            SectionType::Text => ("#ffffff", 48.0),
            SectionType::Newsletter => ("#f9fafb", 64.0),
            SectionType::ProductGrid
            | SectionType::ProductCollection
            | SectionType::ProductRecommendations
            | SectionType::Testimonials => ("#ffffff", 64.0),
            SectionType::ProductDetails => ("#ffffff", 48.0),
            SectionType::Video => ("#000000", 48.0),
            SectionType::Footer => ("#1f2937", 48.0),
            SectionType::Image | SectionType::CustomHtml => ("#ffffff", 32.0),
            SectionType::Unknown(_) => return SectionStyles::default(),
        };

        let bottom = match self {
            SectionType::Footer => 32.0,
            _ => vertical_padding,
        };

        let text_align = match self {
            SectionType::Hero | SectionType::Newsletter => Some(TextAlign::Center),
            _ => None,
        };

        SectionStyles {
            background_color: Some(background.to_string()),
            text_align,
            padding: Some(PartialSides::all_sides(vertical_padding, 32.0, bottom, 32.0)),
            ..SectionStyles::default()
        }
    }
}

impl From<String> for SectionType {
    fn from(name: String) -> Self {
        SectionType::parse(&name)
    }
}

impl From<&str> for SectionType {
    fn from(name: &str) -> Self {
        SectionType::parse(name)
    }
}

impl From<SectionType> for String {
    fn from(section_type: SectionType) -> Self {
        section_type.as_str().to_string()
    }
}

impl fmt::Display for SectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_names_round_trip() {
        for section_type in SectionType::KNOWN.iter() {
            assert_eq!(&SectionType::parse(section_type.as_str()), section_type);
        }
    }

    #[test]
    fn test_unknown_name_is_preserved() {
        let parsed = SectionType::parse("countdown-timer");
        assert_eq!(parsed, SectionType::Unknown("countdown-timer".to_string()));
        assert_eq!(parsed.as_str(), "countdown-timer");
        assert!(parsed.category().is_none());
    }

    #[test]
    fn test_default_styles_match_type() {
        let hero = SectionType::Hero.default_styles();
        assert_eq!(hero.background_color.as_deref(), Some("#f3f4f6"));
        assert_eq!(hero.text_align, Some(TextAlign::Center));
        let padding = hero.padding.unwrap();
        assert_eq!(padding.top, Some(80.0));
        assert_eq!(padding.left, Some(32.0));

        let footer = SectionType::Footer.default_styles().padding.unwrap();
        assert_eq!(footer.top, Some(48.0));
        assert_eq!(footer.bottom, Some(32.0));
    }
}
