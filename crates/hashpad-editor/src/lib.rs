//! Editor controller for Hashpad.
//!
//! The controller owns the document tree of one editing session and binds
//! the keyboard shortcuts to operations on it. Everything that touches the
//! host environment (the current location, navigation, fetching the document,
//! prompts, file pickers) goes through the [`Platform`] trait, so the same
//! controller drives a browser shell, a desktop shell, or a test fake.
//!
//! | Shortcut | Action |
//! |----------|--------|
//! | `a` | re-render the tree from its own Markdown |
//! | `d` | store the Markdown and show its download URL |
//! | `h` | store a standalone HTML export and show its URL |
//! | `l` | log the Markdown |
//! | `m` | switch to a raw Markdown text area |
//! | `s` | store the Markdown and push the editor URL for it |
//! | `u` | upload files and open the last one |

pub mod action;
pub mod controller;
pub mod error;
pub mod platform;

pub use action::{EditorAction, KeyEvent, KeyOutcome};
pub use controller::{EditorController, Mode, LOG_TARGET};
pub use error::{EditorError, EditorResult, PlatformError};
pub use platform::{Navigation, Platform, SelectedFile, Viewport};
