//! Node tree to canonical Markdown.
//!
//! The walk is depth-first and post-order: an element's children are
//! serialized first and concatenated into its `contents`, then the element's
//! [`TagRule`] decides what to wrap around them. Blank-line normalization is
//! applied once, to the full output.

use crate::error::{DocError, DocResult};
use crate::node::{Element, Node};

/// How one tag turns its serialized children into Markdown.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TagRule {
    Link,
    Strong,
    Emphasis,
    Strikethrough,
    BlockQuote,
    LineBreak,
    Code,
    /// `div`, `p`.
    Block,
    Heading(usize),
    Image,
    /// `hr`: has no Markdown form that survives every context.
    HorizontalRule,
    /// Emitted as the element's own markup on its own lines (`iframe`).
    OuterHtml,
    /// Metadata-only elements, dropped.
    Drop,
    Underline,
    /// Contributes only its contents (`pre`, `span`, `font`).
    Transparent,
    TextArea,
    List { ordered: bool },
    Checkbox,
    /// Block-level HTML with no Markdown form, kept on its own lines so
    /// the following block is not swallowed into it.
    WrapBlock,
    /// Anything else: `<tag>contents</tag>`.
    Wrap,
}

/// Deepest heading Markdown can express.
const MAX_HEADING_LEVEL: usize = 6;

const BLOCK_WRAPPED_TAGS: &[&str] = &[
    "address", "article", "aside", "details", "dl", "fieldset", "figure", "footer", "form",
    "header", "main", "nav", "section", "table",
];

impl TagRule {
    pub fn for_element(element: &Element) -> Self {
        match element.tag.as_str() {
            "a" => Self::Link,
            "b" | "strong" => Self::Strong,
            "i" | "em" => Self::Emphasis,
            "del" | "s" | "strike" => Self::Strikethrough,
            "blockquote" => Self::BlockQuote,
            "br" => Self::LineBreak,
            "code" => Self::Code,
            "div" | "p" => Self::Block,
            "img" => Self::Image,
            "hr" => Self::HorizontalRule,
            "iframe" => Self::OuterHtml,
            "meta" | "link" | "base" => Self::Drop,
            "u" => Self::Underline,
            "pre" | "span" | "font" => Self::Transparent,
            "textarea" => Self::TextArea,
            "ul" => Self::List { ordered: false },
            "ol" => Self::List { ordered: true },
            "input" if element.attr("type") == Some("checkbox") => Self::Checkbox,
            tag if BLOCK_WRAPPED_TAGS.contains(&tag) => Self::WrapBlock,
            _ => match element.heading_level() {
                Some(level) if (1..=MAX_HEADING_LEVEL).contains(&level) => Self::Heading(level),
                _ => Self::Wrap,
            },
        }
    }
}

/// Serialize the children of a root container (normally `body`) into
/// canonical Markdown.
///
/// The output has no leading blank lines, no run of more than one blank
/// line, and exactly one trailing newline. An empty document serializes to
/// the empty string.
pub fn serialize(root: &Element) -> DocResult<String> {
    let mut path = Vec::new();
    let raw = children_to_markdown(root, &mut path)?;
    Ok(normalize_blank_lines(&raw))
}

/// Serialize a single node without the final blank-line normalization.
pub fn serialize_node(node: &Node) -> DocResult<String> {
    node_to_markdown(node, &mut Vec::new())
}

fn malformed(path: &[usize]) -> DocError {
    let path = if path.is_empty() {
        "/".to_string()
    } else {
        path.iter().map(|i| format!("/{i}")).collect()
    };
    DocError::MalformedNode { path }
}

fn children_to_markdown(element: &Element, path: &mut Vec<usize>) -> DocResult<String> {
    let mut out = String::new();
    for (index, child) in element.children.iter().enumerate() {
        path.push(index);
        out.push_str(&node_to_markdown(child, path)?);
        path.pop();
    }
    Ok(out)
}

fn node_to_markdown(node: &Node, path: &mut Vec<usize>) -> DocResult<String> {
    match node {
        Node::Text { value } => Ok(value.trim_matches('\n').to_string()),
        Node::Element(element) => element_to_markdown(element, path),
        Node::Unknown => Err(malformed(path)),
    }
}

fn element_to_markdown(element: &Element, path: &mut Vec<usize>) -> DocResult<String> {
    let rule = TagRule::for_element(element);
    if let TagRule::List { ordered } = rule {
        return list_to_markdown(element, ordered, path);
    }

    let contents = children_to_markdown(element, path)?;
    let out = match rule {
        TagRule::Link => {
            if contents.contains('<') {
                element.outer_html()
            } else if contents.is_empty() {
                String::new()
            } else {
                let href = element.attr("href").unwrap_or_default();
                format!("[{contents}]({href}{})", title_suffix(element))
            }
        }
        TagRule::Strong => wrap_nonempty(&contents, "**"),
        TagRule::Emphasis => wrap_nonempty(&contents, "*"),
        TagRule::Strikethrough => wrap_nonempty(&contents, "~~"),
        TagRule::BlockQuote => {
            let quoted: Vec<String> = contents
                .trim()
                .split('\n')
                .map(|line| format!("> {line}"))
                .collect();
            format!("{}\n", quoted.join("\n"))
        }
        TagRule::LineBreak => "\n".to_string(),
        TagRule::Code => {
            if contents.contains('\n') {
                fenced_block(&contents, code_language(element))
            } else {
                code_span(&contents)
            }
        }
        TagRule::Block => format!("\n{}\n", contents.trim()),
        TagRule::Heading(level) => format!("\n{} {}\n", "#".repeat(level), contents.trim()),
        TagRule::Image => match element.attr("src") {
            Some(src) if !src.is_empty() => {
                let alt = element.attr("alt").unwrap_or_default();
                format!("![{alt}]({src}{})", title_suffix(element))
            }
            _ => String::new(),
        },
        TagRule::HorizontalRule => "\n<hr/>\n".to_string(),
        TagRule::OuterHtml => format!("\n{}\n", element.outer_html()),
        TagRule::Drop => String::new(),
        TagRule::Underline => format!("<u>{}</u>", contents.replace('_', "\\_")),
        TagRule::Transparent => contents,
        TagRule::TextArea => match element.value.as_deref() {
            Some(value) if !value.is_empty() => value.to_string(),
            _ => contents,
        },
        TagRule::Checkbox => {
            if element.has_attr("checked") {
                "[x]".to_string()
            } else {
                "[ ]".to_string()
            }
        }
        TagRule::WrapBlock => format!("\n<{tag}>{contents}</{tag}>\n", tag = element.tag),
        TagRule::Wrap => format!("<{tag}>{contents}</{tag}>", tag = element.tag),
        TagRule::List { .. } => unreachable!("lists are handled above"),
    };
    Ok(out)
}

fn wrap_nonempty(contents: &str, marker: &str) -> String {
    if contents.is_empty() {
        String::new()
    } else {
        format!("{marker}{contents}{marker}")
    }
}

fn title_suffix(element: &Element) -> String {
    match element.attr("title") {
        Some(title) if !title.is_empty() => format!(" \"{}\"", title.replace('"', "\\\"")),
        _ => String::new(),
    }
}

/// One item per `li` child; continuation lines are indented to the marker
/// width so nested blocks stay inside their item.
fn list_to_markdown(element: &Element, ordered: bool, path: &mut Vec<usize>) -> DocResult<String> {
    let mut number: u64 = element
        .attr("start")
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(1);
    let mut out = String::from("\n");

    for (index, child) in element.children.iter().enumerate() {
        path.push(index);
        match child {
            Node::Element(item) if item.tag == "li" => {
                let contents = children_to_markdown(item, path)?;
                let marker = if ordered {
                    format!("{number}. ")
                } else {
                    "- ".to_string()
                };
                number = number.saturating_add(1);
                let indent = " ".repeat(marker.len());
                for (i, line) in contents.trim().split('\n').enumerate() {
                    if i == 0 {
                        out.push_str(&marker);
                    } else if !line.is_empty() {
                        out.push_str(&indent);
                    }
                    out.push_str(line);
                    out.push('\n');
                }
            }
            other => out.push_str(&node_to_markdown(other, path)?),
        }
        path.pop();
    }
    Ok(out)
}

fn code_language(element: &Element) -> Option<&str> {
    element
        .attr("class")?
        .split_whitespace()
        .find_map(|class| class.strip_prefix("language-"))
}

fn longest_backtick_run(text: &str) -> usize {
    let mut longest = 0;
    let mut current = 0;
    for c in text.chars() {
        if c == '`' {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}

fn fenced_block(contents: &str, language: Option<&str>) -> String {
    let fence = "`".repeat(longest_backtick_run(contents).max(2) + 1);
    format!(
        "\n{fence}{}\n{}\n{fence}\n",
        language.unwrap_or_default(),
        contents.trim()
    )
}

fn code_span(contents: &str) -> String {
    if contents.is_empty() {
        return String::new();
    }
    let fence = "`".repeat(longest_backtick_run(contents) + 1);
    let padded = contents.starts_with('`')
        || contents.ends_with('`')
        || (contents.starts_with(' ') && contents.ends_with(' ') && !contents.trim().is_empty());
    if padded {
        format!("{fence} {contents} {fence}")
    } else {
        format!("{fence}{contents}{fence}")
    }
}

/// Collapse runs of blank lines to one, strip leading blank lines, and end
/// with exactly one newline.
fn normalize_blank_lines(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut newlines = 0;
    for c in raw.chars() {
        if c == '\n' {
            newlines += 1;
            continue;
        }
        if newlines > 0 && !out.is_empty() {
            out.push_str(if newlines == 1 { "\n" } else { "\n\n" });
        }
        newlines = 0;
        out.push(c);
    }
    if !out.is_empty() {
        out.push('\n');
    }
    out
}
