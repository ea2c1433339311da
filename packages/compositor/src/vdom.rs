use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Write;

/// Attribute carrying the id of the section a node was rendered from
pub const SECTION_ID_ATTR: &str = "data-section-id";
pub const SECTION_TYPE_ATTR: &str = "data-section-type";
pub const SELECTED_ATTR: &str = "data-selected";
/// Marks regions the compositor added on its own (store header, product regions)
pub const REGION_ATTR: &str = "data-region";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaceholderKind {
    /// A catalog dependency is still in flight
    Loading,
    /// A dependency failed or the section could not be built
    Unavailable,
}

impl PlaceholderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlaceholderKind::Loading => "loading",
            PlaceholderKind::Unavailable => "unavailable",
        }
    }
}

/// Virtual DOM node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum VNode {
    /// HTML element
    Element {
        tag: String,
        attributes: BTreeMap<String, String>,
        styles: BTreeMap<String, String>,
        children: Vec<VNode>,
        /// Stable key for list items and section wrappers
        #[serde(skip_serializing_if = "Option::is_none")]
        key: Option<String>,
    },

    /// Text node
    Text { content: String },

    /// Merchant-authored markup, already stripped of scripts
    Raw { html: String },

    /// Stand-in for content that cannot be shown yet (or at all)
    Placeholder { kind: PlaceholderKind, message: String },
}

impl VNode {
    pub fn element(tag: impl Into<String>) -> Self {
        VNode::Element {
            tag: tag.into(),
            attributes: BTreeMap::new(),
            styles: BTreeMap::new(),
            children: Vec::new(),
            key: None,
        }
    }

    pub fn text(content: impl Into<String>) -> Self {
        VNode::Text {
            content: content.into(),
        }
    }

    /// Merchant markup inserted as-is apart from `<script>` elements.
    pub fn raw(html: &str) -> Self {
        VNode::Raw {
            html: strip_scripts(html),
        }
    }

    pub fn loading(message: impl Into<String>) -> Self {
        VNode::Placeholder {
            kind: PlaceholderKind::Loading,
            message: message.into(),
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        VNode::Placeholder {
            kind: PlaceholderKind::Unavailable,
            message: message.into(),
        }
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        if let VNode::Element {
            ref mut attributes, ..
        } = self
        {
            attributes.insert(key.into(), value.into());
        }
        self
    }

    pub fn with_class(self, class: &str) -> Self {
        self.with_attr("class", class)
    }

    pub fn with_style(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        if let VNode::Element { ref mut styles, .. } = self {
            styles.insert(key.into(), value.into());
        }
        self
    }

    pub fn with_styles(mut self, new_styles: BTreeMap<String, String>) -> Self {
        if let VNode::Element { ref mut styles, .. } = self {
            styles.extend(new_styles);
        }
        self
    }

    pub fn with_child(mut self, child: VNode) -> Self {
        if let VNode::Element {
            ref mut children, ..
        } = self
        {
            children.push(child);
        }
        self
    }

    pub fn with_children(mut self, new_children: Vec<VNode>) -> Self {
        if let VNode::Element {
            ref mut children, ..
        } = self
        {
            children.extend(new_children);
        }
        self
    }

    /// Add the child only when `child` is `Some`
    pub fn with_optional_child(self, child: Option<VNode>) -> Self {
        match child {
            Some(child) => self.with_child(child),
            None => self,
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        if let VNode::Element {
            key: ref mut node_key,
            ..
        } = self
        {
            *node_key = Some(key.into());
        }
        self
    }

    pub fn tag(&self) -> Option<&str> {
        match self {
            VNode::Element { tag, .. } => Some(tag),
            _ => None,
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        match self {
            VNode::Element { attributes, .. } => attributes.get(name).map(String::as_str),
            _ => None,
        }
    }

    pub fn style(&self, name: &str) -> Option<&str> {
        match self {
            VNode::Element { styles, .. } => styles.get(name).map(String::as_str),
            _ => None,
        }
    }

    pub fn children(&self) -> &[VNode] {
        match self {
            VNode::Element { children, .. } => children,
            _ => &[],
        }
    }

    pub fn is_placeholder(&self, kind: PlaceholderKind) -> bool {
        matches!(self, VNode::Placeholder { kind: k, .. } if *k == kind)
    }

    /// Depth-first search including `self`
    pub fn find(&self, predicate: &dyn Fn(&VNode) -> bool) -> Option<&VNode> {
        if predicate(self) {
            return Some(self);
        }
        self.children().iter().find_map(|child| child.find(predicate))
    }

    pub fn find_all<'a>(&'a self, predicate: &dyn Fn(&VNode) -> bool, found: &mut Vec<&'a VNode>) {
        if predicate(self) {
            found.push(self);
        }
        for child in self.children() {
            child.find_all(predicate, found);
        }
    }

    /// Concatenated text of this subtree
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            VNode::Text { content } => out.push_str(content),
            VNode::Placeholder { message, .. } => out.push_str(message),
            VNode::Raw { .. } => {}
            VNode::Element { children, .. } => {
                for child in children {
                    child.collect_text(out);
                }
            }
        }
    }

    pub fn write_html(&self, out: &mut String) {
        match self {
            VNode::Text { content } => out.push_str(&escape(content)),
            VNode::Raw { html } => out.push_str(html),
            VNode::Placeholder { kind, message } => {
                let _ = write!(
                    out,
                    "<div data-placeholder=\"{}\" role=\"status\">{}</div>",
                    kind.as_str(),
                    escape(message)
                );
            }
            VNode::Element {
                tag,
                attributes,
                styles,
                children,
                ..
            } => {
                out.push('<');
                out.push_str(tag);
                for (name, value) in attributes {
                    let _ = write!(out, " {}=\"{}\"", name, escape(value));
                }
                if !styles.is_empty() {
                    let css: Vec<String> = styles.iter().map(|(k, v)| format!("{}: {}", k, v)).collect();
                    let _ = write!(out, " style=\"{}\"", escape(&css.join("; ")));
                }
                out.push('>');
                if is_void(tag) {
                    return;
                }
                for child in children {
                    child.write_html(out);
                }
                let _ = write!(out, "</{}>", tag);
            }
        }
    }
}

/// Output of one page composition
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RenderTree {
    pub nodes: Vec<VNode>,
}

impl RenderTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, node: VNode) {
        self.nodes.push(node);
    }

    /// Ids of the top-level section nodes, in render order
    pub fn section_ids(&self) -> Vec<&str> {
        self.nodes
            .iter()
            .filter_map(|node| node.attr(SECTION_ID_ATTR))
            .collect()
    }

    pub fn section(&self, id: &str) -> Option<&VNode> {
        self.nodes
            .iter()
            .find(|node| node.attr(SECTION_ID_ATTR) == Some(id))
    }

    /// Top-level nodes rendered for sections of `section_type`
    pub fn sections_of_type(&self, section_type: &str) -> Vec<&VNode> {
        self.nodes
            .iter()
            .filter(|node| node.attr(SECTION_TYPE_ATTR) == Some(section_type))
            .collect()
    }

    pub fn region(&self, name: &str) -> Option<&VNode> {
        self.nodes.iter().find(|node| node.attr(REGION_ATTR) == Some(name))
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for node in &self.nodes {
            node.write_html(&mut out);
        }
        out
    }
}

fn is_void(tag: &str) -> bool {
    matches!(tag, "img" | "input" | "br" | "hr" | "source" | "meta" | "link")
}

pub(crate) fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Remove `<script>` elements and nothing else.
///
/// This is not a sanitizer: inline handlers such as `onclick=` and
/// `javascript:` URLs pass through unchanged. Raw markup is merchant
/// content and is trusted as such.
pub(crate) fn strip_scripts(html: &str) -> String {
    let lower = html.to_ascii_lowercase();
    let mut out = String::with_capacity(html.len());
    let mut cursor = 0;

    while let Some(offset) = lower[cursor..].find("<script") {
        let start = cursor + offset;
        out.push_str(&html[cursor..start]);
        cursor = match lower[start..].find("</script") {
            Some(close) => {
                let close_start = start + close;
                match lower[close_start..].find('>') {
                    Some(end) => close_start + end + 1,
                    None => html.len(),
                }
            }
            None => html.len(),
        };
    }
    out.push_str(&html[cursor..]);
    out
}
