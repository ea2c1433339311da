use super::{button, grid, heading, paragraph, ViewContext};
use crate::error::{RenderError, RenderResult};
use crate::vdom::VNode;
use storefront_schema::settings::{
    CustomHtmlSettings, HeroSettings, ImageEntry, ImageLayout, ImageSettings, ListLayout,
    NewsletterSettings, TestimonialsSettings, TextSettings, VideoProvider, VideoSettings,
};

pub(crate) fn hero(settings: &HeroSettings, ctx: &ViewContext<'_>) -> RenderResult<Vec<VNode>> {
    let cta = (!settings.button_text.trim().is_empty()).then(|| {
        VNode::element("a")
            .with_attr("href", settings.button_link.clone())
            .with_child(button(&settings.button_text, ctx))
    });

    Ok(vec![VNode::element("div")
        .with_class("hero")
        .with_optional_child(heading("h1", &settings.heading, ctx))
        .with_optional_child(paragraph(&settings.subheading))
        .with_optional_child(cta)])
}

pub(crate) fn text(settings: &TextSettings, ctx: &ViewContext<'_>) -> RenderResult<Vec<VNode>> {
    Ok(vec![VNode::element("div")
        .with_class("rich-text")
        .with_optional_child(heading("h2", &settings.heading, ctx))
        .with_child(VNode::raw(&settings.content))])
}

pub(crate) fn newsletter(settings: &NewsletterSettings, ctx: &ViewContext<'_>) -> RenderResult<Vec<VNode>> {
    let form = VNode::element("form")
        .with_attr("data-success-message", settings.success_message.clone())
        .with_child(
            VNode::element("input")
                .with_attr("type", "email")
                .with_attr("placeholder", settings.placeholder.clone()),
        )
        .with_child(button(&settings.button_text, ctx));

    Ok(vec![VNode::element("div")
        .with_class("newsletter")
        .with_optional_child(heading("h2", &settings.heading, ctx))
        .with_optional_child(paragraph(&settings.description))
        .with_child(form)])
}

fn figure(image: &ImageEntry, aspect_ratio: &str) -> VNode {
    let caption = (!image.caption.is_empty())
        .then(|| VNode::element("figcaption").with_child(VNode::text(image.caption.clone())));

    VNode::element("figure")
        .with_child(
            VNode::element("img")
                .with_attr("src", image.url.clone())
                .with_attr("alt", image.caption.clone())
                .with_style("aspect-ratio", css_ratio(aspect_ratio)),
        )
        .with_optional_child(caption)
}

/// "16:9" becomes "16 / 9"; anything else passes through
fn css_ratio(ratio: &str) -> String {
    match ratio.split_once(':') {
        Some((w, h)) => format!("{} / {}", w.trim(), h.trim()),
        None => ratio.to_string(),
    }
}

pub(crate) fn image(settings: &ImageSettings, _ctx: &ViewContext<'_>) -> RenderResult<Vec<VNode>> {
    let images: Vec<&ImageEntry> = settings.images.iter().filter(|i| !i.url.is_empty()).collect();
    if images.is_empty() {
        return Ok(vec![VNode::element("div")
            .with_class("image-empty")
            .with_child(VNode::text("No images yet"))]);
    }

    let body = match settings.layout {
        ImageLayout::Single => figure(images[0], &settings.aspect_ratio),
        ImageLayout::Grid => grid(settings.grid_columns)
            .with_children(images.iter().map(|i| figure(i, &settings.aspect_ratio)).collect()),
        ImageLayout::Carousel => VNode::element("div")
            .with_class("carousel")
            .with_children(images.iter().map(|i| figure(i, &settings.aspect_ratio)).collect()),
    };

    let caption = (!settings.caption.is_empty())
        .then(|| VNode::element("p").with_class("image-caption").with_child(VNode::text(settings.caption.clone())));

    Ok(vec![body].into_iter().chain(caption).collect())
}

/// Embed address for a video link
fn embed_url(provider: VideoProvider, url: &str) -> RenderResult<String> {
    let invalid = || RenderError::InvalidMedia { url: url.to_string() };
    let trimmed = url.trim();

    match provider {
        VideoProvider::Youtube => {
            let id = trimmed
                .split_once("v=")
                .map(|(_, rest)| rest)
                .or_else(|| trimmed.split_once("youtu.be/").map(|(_, rest)| rest))
                .or_else(|| trimmed.split_once("/embed/").map(|(_, rest)| rest))
                .map(|rest| rest.split(['&', '?', '#']).next().unwrap_or_default())
                .filter(|id| !id.is_empty())
                .ok_or_else(invalid)?;
            Ok(format!("https://www.youtube.com/embed/{}", id))
        }
        VideoProvider::Vimeo => {
            let id = trimmed
                .trim_end_matches('/')
                .rsplit('/')
                .next()
                .filter(|id| !id.is_empty() && id.chars().all(|c| c.is_ascii_digit()))
                .ok_or_else(invalid)?;
            Ok(format!("https://player.vimeo.com/video/{}", id))
        }
        VideoProvider::Custom => {
            if trimmed.starts_with("http://") || trimmed.starts_with("https://") || trimmed.starts_with('/') {
                Ok(trimmed.to_string())
            } else {
                Err(invalid())
            }
        }
    }
}

pub(crate) fn video(settings: &VideoSettings, _ctx: &ViewContext<'_>) -> RenderResult<Vec<VNode>> {
    if settings.video_url.trim().is_empty() {
        return Ok(vec![VNode::element("div")
            .with_class("video-empty")
            .with_child(VNode::text("No video selected"))]);
    }

    let src = embed_url(settings.provider, &settings.video_url)?;
    let player = match settings.provider {
        VideoProvider::Custom => {
            let mut player = VNode::element("video").with_attr("src", src);
            if settings.controls {
                player = player.with_attr("controls", "controls");
            }
            if settings.autoplay {
                player = player.with_attr("autoplay", "autoplay").with_attr("muted", "muted");
            }
            player
        }
        VideoProvider::Youtube | VideoProvider::Vimeo => {
            let mut query = vec![format!("autoplay={}", settings.autoplay as u8)];
            if matches!(settings.provider, VideoProvider::Youtube) {
                query.push(format!("controls={}", settings.controls as u8));
            }
            VNode::element("iframe")
                .with_attr("src", format!("{}?{}", src, query.join("&")))
                .with_attr("allowfullscreen", "true")
        }
    };

    Ok(vec![player
        .with_style("width", "100%")
        .with_style("aspect-ratio", css_ratio(&settings.aspect_ratio))])
}

pub(crate) fn testimonials(settings: &TestimonialsSettings, ctx: &ViewContext<'_>) -> RenderResult<Vec<VNode>> {
    let cards: Vec<VNode> = settings
        .testimonials
        .iter()
        .map(|t| {
            let rating = t.rating.min(5) as usize;
            let avatar = (!t.avatar.is_empty())
                .then(|| VNode::element("img").with_attr("src", t.avatar.clone()).with_attr("alt", t.name.clone()));
            VNode::element("blockquote")
                .with_class("testimonial")
                .with_optional_child(avatar)
                .with_child(
                    VNode::element("div")
                        .with_class("rating")
                        .with_attr("aria-label", format!("{} out of 5", rating))
                        .with_child(VNode::text("★".repeat(rating))),
                )
                .with_child(VNode::element("p").with_child(VNode::text(t.text.clone())))
                .with_child(VNode::element("cite").with_child(VNode::text(t.name.clone())))
        })
        .collect();

    let body = match settings.layout {
        ListLayout::Grid => grid(3).with_children(cards),
        ListLayout::Carousel => VNode::element("div").with_class("carousel").with_children(cards),
        ListLayout::List => VNode::element("div").with_class("list").with_children(cards),
    };

    Ok(vec![heading("h2", &settings.heading, ctx), Some(body)]
        .into_iter()
        .flatten()
        .collect())
}

pub(crate) fn custom_html(settings: &CustomHtmlSettings, _ctx: &ViewContext<'_>) -> RenderResult<Vec<VNode>> {
    Ok(vec![VNode::raw(&settings.html)])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embed_urls() {
        assert_eq!(
            embed_url(VideoProvider::Youtube, "https://www.youtube.com/watch?v=abc123&t=4").unwrap(),
            "https://www.youtube.com/embed/abc123"
        );
        assert_eq!(
            embed_url(VideoProvider::Youtube, "https://youtu.be/xyz").unwrap(),
            "https://www.youtube.com/embed/xyz"
        );
        assert_eq!(
            embed_url(VideoProvider::Vimeo, "https://vimeo.com/76979871/").unwrap(),
            "https://player.vimeo.com/video/76979871"
        );
        assert!(embed_url(VideoProvider::Youtube, "https://example.com/clip").is_err());
        assert!(embed_url(VideoProvider::Custom, "clip.mp4").is_err());
    }

    #[test]
    fn test_css_ratio() {
        assert_eq!(css_ratio("16:9"), "16 / 9");
        assert_eq!(css_ratio("auto"), "auto");
    }
}
