//! HTML output for node trees.
//!
//! Used wherever markup must survive verbatim: links whose text holds raw
//! markup, embedded frames, and standalone page export.

use std::fmt;

use pulldown_cmark_escape::{escape_html, escape_html_body_text, FmtWriter, StrWrite};

use crate::node::{Element, Node};

/// Stylesheet linked from exported standalone pages.
pub const DEFAULT_STYLESHEET: &str = "https://l.og.ax/p0jxr6r";

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

fn is_void(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

fn write_node<W: StrWrite>(node: &Node, w: &mut W) -> Result<(), W::Error> {
    match node {
        Node::Text { value } => escape_html_body_text(&mut *w, value),
        Node::Element(element) => write_element(element, w),
        Node::Unknown => Ok(()),
    }
}

fn write_element<W: StrWrite>(element: &Element, w: &mut W) -> Result<(), W::Error> {
    w.write_str("<")?;
    w.write_str(&element.tag)?;
    for (name, value) in &element.attrs {
        w.write_str(" ")?;
        w.write_str(name)?;
        w.write_str("=\"")?;
        escape_html(&mut *w, value)?;
        w.write_str("\"")?;
    }
    w.write_str(">")?;
    if is_void(&element.tag) {
        return Ok(());
    }
    match (&element.tag[..], &element.value) {
        ("textarea", Some(value)) => escape_html_body_text(&mut *w, value)?,
        _ => write_children(element, w)?,
    }
    w.write_str("</")?;
    w.write_str(&element.tag)?;
    w.write_str(">")
}

fn write_children<W: StrWrite>(element: &Element, w: &mut W) -> Result<(), W::Error> {
    for child in &element.children {
        write_node(child, w)?;
    }
    Ok(())
}

/// Run `write` against a fresh string buffer.
fn to_string(write: impl FnOnce(&mut FmtWriter<&mut String>) -> fmt::Result) -> String {
    let mut out = String::new();
    // Writing into a `String` never fails.
    let _ = write(&mut FmtWriter(&mut out));
    out
}

impl Element {
    /// Markup for this element including its own tag.
    pub fn outer_html(&self) -> String {
        to_string(|w| write_element(self, w))
    }

    /// Markup for this element's children only.
    pub fn inner_html(&self) -> String {
        to_string(|w| write_children(self, w))
    }
}

impl Node {
    pub fn to_html(&self) -> String {
        to_string(|w| write_node(self, w))
    }
}

/// Wrap rendered markup in a minimal standalone page.
pub fn standalone_html(inner: &str, stylesheet: &str) -> String {
    let link = format!("<link rel=\"stylesheet\" href=\"{stylesheet}\">");
    [
        "<!DOCTYPE html>",
        "<html>",
        "<head>",
        "<meta charset=\"utf-8\">",
        link.as_str(),
        "</head>",
        "<body>",
        inner.trim(),
        "</body>",
        "</html>",
        "",
    ]
    .join("\n")
}
