use comrak::Options;
use html5ever::tendril::TendrilSink;
use html5ever::{parse_document, ParseOpts};
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{DocError, DocResult};
use crate::node::{Element, Node};

/// Fixed Markdown dialect, chosen once at startup.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// Emit `id` attributes on headings.
    pub header_ids: bool,
    /// Expand `:shortcode:` emoji.
    pub emoji: bool,
    pub tables: bool,
    pub task_lists: bool,
    /// Treat every newline inside a paragraph as a line break.
    pub hard_line_breaks: bool,
    /// Link bare URLs and `www.` hosts.
    pub autolink: bool,
    pub strikethrough: bool,
    /// `__text__` renders as `<u>` instead of strong emphasis.
    pub underline: bool,
    /// Curly quotes, dashes and ellipses.
    pub smart_punctuation: bool,
    /// Pass raw HTML through instead of replacing it with a placeholder.
    pub raw_html: bool,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            header_ids: false,
            emoji: true,
            tables: true,
            task_lists: true,
            hard_line_breaks: true,
            autolink: true,
            strikethrough: true,
            underline: true,
            smart_punctuation: true,
            raw_html: true,
        }
    }
}

impl RendererConfig {
    fn comrak_options(&self) -> Options {
        let mut options = Options::default();

        options.extension.header_ids = self.header_ids.then(String::new);
        options.extension.shortcodes = self.emoji;
        options.extension.table = self.tables;
        options.extension.tasklist = self.task_lists;
        options.extension.autolink = self.autolink;
        options.extension.strikethrough = self.strikethrough;
        options.extension.underline = self.underline;

        options.parse.smart = self.smart_punctuation;

        options.render.hardbreaks = self.hard_line_breaks;
        options.render.unsafe_ = self.raw_html;

        options
    }
}

/// Markdown to node tree.
#[derive(Clone, Debug, Default)]
pub struct Renderer {
    config: RendererConfig,
}

impl Renderer {
    pub fn new(config: RendererConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// Markdown to HTML markup.
    pub fn render_html(&self, markdown: &str) -> String {
        comrak::markdown_to_html(markdown, &self.config.comrak_options())
    }

    /// Markdown to a tree rooted at the page's `body` element.
    pub fn render(&self, markdown: &str) -> DocResult<Element> {
        let html = self.render_html(markdown);
        debug!(markdown_len = markdown.len(), html_len = html.len(), "rendered document");
        parse_body(&html)
    }
}

/// Parse markup as a full page and return its `body`, the way a browser
/// would after assigning it to `document.body.innerHTML`.
pub fn parse_body(html: &str) -> DocResult<Element> {
    let dom = parse_document(RcDom::default(), ParseOpts::default()).one(html);
    let body = find_element(&dom.document, "body")
        .ok_or_else(|| DocError::MissingRoot("body".into()))?;
    match convert(&body) {
        Some(Node::Element(element)) => Ok(element),
        _ => Err(DocError::MissingRoot("body".into())),
    }
}

fn find_element(handle: &Handle, tag: &str) -> Option<Handle> {
    if let NodeData::Element { name, .. } = &handle.data {
        if &*name.local == tag {
            return Some(handle.clone());
        }
    }
    handle
        .children
        .borrow()
        .iter()
        .find_map(|child| find_element(child, tag))
}

/// Comments, doctypes and processing instructions carry no document content
/// and are skipped.
fn convert(handle: &Handle) -> Option<Node> {
    match &handle.data {
        NodeData::Text { contents } => Some(Node::text(contents.borrow().to_string())),
        NodeData::Element { name, attrs, .. } => {
            let mut element = Element::new(name.local.to_string());
            for attr in attrs.borrow().iter() {
                element
                    .attrs
                    .insert(attr.name.local.to_string(), attr.value.to_string());
            }
            element.children = handle.children.borrow().iter().filter_map(convert).collect();
            if element.tag == "textarea" {
                element.value = Some(element.text_content());
            }
            Some(Node::Element(element))
        }
        _ => None,
    }
}
