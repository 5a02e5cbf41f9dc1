//! Document model for Hashpad.
//!
//! A document lives in two forms. On disk and on the wire it is canonical
//! Markdown text. While it is being edited it is a tree of [`Node`]s that
//! mirrors the rendered page. This crate converts between the two:
//!
//! - [`Renderer`] turns Markdown into a tree rooted at a `body` [`Element`],
//!   using `comrak` for Markdown and `html5ever` for the resulting markup.
//! - [`serialize`] walks a tree back into Markdown, one rule per tag.
//!
//! Rendering followed by serialization is not byte-for-byte lossless, but
//! it reaches a fixed point after one round trip:
//!
//! ```rust
//! use hashpad_doc::{serialize, Renderer, RendererConfig};
//!
//! let renderer = Renderer::new(RendererConfig::default());
//! let once = serialize(&renderer.render("# Title\n\n\n\nHello **world**").unwrap()).unwrap();
//! assert_eq!(once, "# Title\n\nHello **world**\n");
//! let twice = serialize(&renderer.render(&once).unwrap()).unwrap();
//! assert_eq!(once, twice);
//! ```

pub mod error;
pub mod html;
pub mod node;
pub mod render;
pub mod serialize;

pub use error::{DocError, DocResult};
pub use html::{standalone_html, DEFAULT_STYLESHEET};
pub use node::{Element, Node};
pub use render::{parse_body, Renderer, RendererConfig};
pub use serialize::{serialize, serialize_node, TagRule};
