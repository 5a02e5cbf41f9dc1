use std::sync::Arc;

use bytes::Bytes;
use tracing::{debug, info};
use url::Url;

use hashpad_doc::{serialize, standalone_html, Element, Renderer, DEFAULT_STYLESHEET};
use hashpad_router::{download_path, editor_url, DEFAULT_DOCUMENT};
use hashpad_store::{BlobMetadata, BlobStore, OCTET_STREAM};
use hashpad_types::ContentHash;

use crate::action::{EditorAction, KeyEvent, KeyOutcome};
use crate::error::{EditorError, EditorResult};
use crate::platform::{Navigation, Platform};

/// `tracing` target the log action writes Markdown to.
pub const LOG_TARGET: &str = "hashpad_editor::log";

/// Whether the tree shows the rendered document or its raw Markdown.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Rendered,
    Raw,
}

/// One editing session.
///
/// Actions take `&mut self`; overlapping actions are serialized by the
/// caller, and whichever finishes last decides the tree and the location.
pub struct EditorController<P: Platform> {
    platform: P,
    store: Arc<dyn BlobStore>,
    renderer: Renderer,
    tree: Element,
    mode: Mode,
}

impl<P: Platform> EditorController<P> {
    /// A controller with an empty `body`. Call [`open`](Self::open) to load
    /// the referenced document.
    pub fn new(platform: P, store: Arc<dyn BlobStore>, renderer: Renderer) -> Self {
        Self {
            platform,
            store,
            renderer,
            tree: Element::new("body"),
            mode: Mode::Rendered,
        }
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn tree(&self) -> &Element {
        &self.tree
    }

    /// Replace the tree with the user's edited snapshot.
    pub fn set_tree(&mut self, tree: Element) {
        self.tree = tree;
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    fn location(&self) -> EditorResult<Url> {
        let reference = self.platform.current_reference();
        Url::parse(&reference).map_err(|e| EditorError::InvalidReference {
            reason: e.to_string(),
            reference,
        })
    }

    fn absolute(&self, path: &str) -> EditorResult<Url> {
        self.location()?
            .join(path)
            .map_err(|e| EditorError::InvalidReference {
                reference: path.to_string(),
                reason: e.to_string(),
            })
    }

    /// URL of the document named by the location's `document` query value,
    /// or of the default document when there is none.
    pub fn document_url(&self) -> EditorResult<Url> {
        let location = self.location()?;
        let document = location
            .query_pairs()
            .find(|(name, _)| name == "document")
            .map(|(_, value)| value.into_owned())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_DOCUMENT.to_string());
        self.absolute(&document)
    }

    /// Fetch and render the referenced document.
    pub async fn open(&mut self) -> EditorResult<()> {
        let url = self.document_url()?;
        let bytes = self.platform.fetch_bytes(&url).await?;
        let markdown = String::from_utf8_lossy(&bytes);
        self.tree = self.renderer.render(&markdown)?;
        self.mode = Mode::Rendered;
        info!(document = %url, len = bytes.len(), "document opened");
        Ok(())
    }

    /// Canonical Markdown for the current tree.
    pub fn markdown(&self) -> EditorResult<String> {
        Ok(serialize(&self.tree)?)
    }

    /// Run the action bound to `event`, if any.
    ///
    /// A bound key is consumed even when its action fails. Hosts that must
    /// suppress the default before awaiting can check [`KeyEvent::action`].
    pub async fn handle_key(&mut self, event: &KeyEvent) -> EditorResult<KeyOutcome> {
        let Some(action) = event.action() else {
            return Ok(KeyOutcome::default());
        };
        debug!(?action, "shortcut");
        self.perform(action).await?;
        Ok(KeyOutcome {
            action: Some(action),
            default_prevented: true,
        })
    }

    pub async fn perform(&mut self, action: EditorAction) -> EditorResult<()> {
        match action {
            EditorAction::Rerender => self.rerender(),
            EditorAction::DownloadLink => self.download_link().await.map(drop),
            EditorAction::ExportHtml => self.export_html().await.map(drop),
            EditorAction::LogMarkdown => self.log_markdown().map(drop),
            EditorAction::RawEdit => self.raw_edit(),
            EditorAction::Save => self.save().await.map(drop),
            EditorAction::Upload => self.upload().await.map(drop),
        }
    }

    /// Serialize and render again, replacing the tree.
    pub fn rerender(&mut self) -> EditorResult<()> {
        let markdown = self.markdown()?;
        self.tree = self.renderer.render(&markdown)?;
        self.mode = Mode::Rendered;
        Ok(())
    }

    async fn persist_markdown(&self) -> EditorResult<ContentHash> {
        let markdown = self.markdown()?;
        let hash = self
            .store
            .put(Bytes::from(markdown), BlobMetadata::markdown())
            .await?;
        info!(hash = %hash.short_hex(), "markdown stored");
        Ok(hash)
    }

    /// Store the Markdown and show its absolute download URL.
    pub async fn download_link(&mut self) -> EditorResult<Url> {
        let hash = self.persist_markdown().await?;
        let url = self.absolute(&download_path(&hash, "md"))?;
        self.platform.prompt_user("Download URL:", url.as_str());
        Ok(url)
    }

    /// Store the rendered tree as a standalone page and show its URL.
    pub async fn export_html(&mut self) -> EditorResult<Url> {
        let page = standalone_html(&self.tree.inner_html(), DEFAULT_STYLESHEET);
        let hash = self.store.put(Bytes::from(page), BlobMetadata::html()).await?;
        info!(hash = %hash.short_hex(), "html export stored");
        let url = self.absolute(&download_path(&hash, "html"))?;
        self.platform.prompt_user("Download link:", url.as_str());
        Ok(url)
    }

    /// Write the Markdown to the log target without storing it.
    pub fn log_markdown(&self) -> EditorResult<String> {
        let markdown = self.markdown()?;
        info!(target: LOG_TARGET, "{markdown}");
        Ok(markdown)
    }

    /// Replace the tree with a text area holding the Markdown.
    pub fn raw_edit(&mut self) -> EditorResult<()> {
        let markdown = self.markdown()?;
        let mut textarea = Element::new("textarea");
        if let Some(viewport) = self.platform.viewport() {
            textarea = textarea.with_attr(
                "style",
                format!("height:{}px;width:{}px;", viewport.height, viewport.width),
            );
        }
        let textarea = textarea.with_text(markdown.clone()).with_value(markdown);
        self.tree = Element::new("body").with_child(textarea);
        self.mode = Mode::Raw;
        Ok(())
    }

    /// Store the Markdown and push the editor URL for it.
    pub async fn save(&mut self) -> EditorResult<ContentHash> {
        let hash = self.persist_markdown().await?;
        let url = self.absolute(&editor_url(&download_path(&hash, "md")))?;
        self.platform.navigate(&url, Navigation::Push)?;
        Ok(hash)
    }

    /// Store each picked file as-is and load the editor for it.
    pub async fn upload(&mut self) -> EditorResult<Vec<ContentHash>> {
        let files = self.platform.select_files().await?;
        let mut hashes = Vec::with_capacity(files.len());
        for file in files {
            let content_type = if file.content_type.is_empty() {
                OCTET_STREAM.to_string()
            } else {
                file.content_type
            };
            let mut metadata = BlobMetadata::new(content_type)
                .with_name(file.name)
                .with_size(file.data.len() as u64);
            if let Some(at) = file.last_modified {
                metadata = metadata.with_last_modified(at);
            }
            if let Some(path) = file.relative_path {
                metadata = metadata.with_relative_path(path);
            }

            let hash = self.store.put(file.data, metadata).await?;
            info!(hash = %hash.short_hex(), "upload stored");
            let url = self.absolute(&editor_url(&download_path(&hash, "md")))?;
            self.platform.navigate(&url, Navigation::Load)?;
            hashes.push(hash);
        }
        Ok(hashes)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use hashpad_store::{
        InMemoryBlobStore, StoreError, StoreResult, StoredBlob, HTML_CONTENT_TYPE,
        MARKDOWN_CONTENT_TYPE,
    };

    use super::*;
    use crate::error::PlatformError;
    use crate::platform::{SelectedFile, Viewport};

    const ORIGIN: &str = "http://pad.test";

    #[derive(Default)]
    struct FakePlatform {
        location: Mutex<String>,
        documents: HashMap<String, Bytes>,
        files: Vec<SelectedFile>,
        viewport: Option<Viewport>,
        navigations: Mutex<Vec<(String, Navigation)>>,
        prompts: Mutex<Vec<(String, String)>>,
    }

    impl FakePlatform {
        fn at(location: &str) -> Self {
            Self {
                location: Mutex::new(location.to_string()),
                ..Self::default()
            }
        }

        fn with_document(mut self, url: &str, markdown: &'static str) -> Self {
            self.documents
                .insert(url.to_string(), Bytes::from_static(markdown.as_bytes()));
            self
        }

        fn navigations(&self) -> Vec<(String, Navigation)> {
            self.navigations.lock().unwrap().clone()
        }

        fn prompts(&self) -> Vec<(String, String)> {
            self.prompts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Platform for FakePlatform {
        fn current_reference(&self) -> String {
            self.location.lock().unwrap().clone()
        }

        async fn fetch_bytes(&self, url: &Url) -> Result<Bytes, PlatformError> {
            self.documents
                .get(url.as_str())
                .cloned()
                .ok_or_else(|| PlatformError::Fetch {
                    url: url.to_string(),
                    reason: "404".into(),
                })
        }

        fn navigate(&self, url: &Url, how: Navigation) -> Result<(), PlatformError> {
            *self.location.lock().unwrap() = url.to_string();
            self.navigations.lock().unwrap().push((url.to_string(), how));
            Ok(())
        }

        fn prompt_user(&self, message: &str, value: &str) {
            self.prompts
                .lock()
                .unwrap()
                .push((message.to_string(), value.to_string()));
        }

        async fn select_files(&self) -> Result<Vec<SelectedFile>, PlatformError> {
            Ok(self.files.clone())
        }

        fn viewport(&self) -> Option<Viewport> {
            self.viewport
        }
    }

    struct FailingStore;

    #[async_trait]
    impl BlobStore for FailingStore {
        async fn get(&self, _hash: &ContentHash) -> StoreResult<Option<StoredBlob>> {
            Ok(None)
        }

        async fn put(&self, _data: Bytes, _metadata: BlobMetadata) -> StoreResult<ContentHash> {
            Err(StoreError::Io(std::io::Error::other("disk full")))
        }
    }

    fn home() -> FakePlatform {
        FakePlatform::at(&format!("{ORIGIN}/editor.html"))
            .with_document("http://pad.test/homepage.md", "# Home\n\nWelcome **here**\n")
    }

    async fn opened(
        platform: FakePlatform,
    ) -> (EditorController<FakePlatform>, Arc<InMemoryBlobStore>) {
        let store = Arc::new(InMemoryBlobStore::new());
        let mut editor = EditorController::new(platform, store.clone(), Renderer::default());
        editor.open().await.unwrap();
        (editor, store)
    }

    #[tokio::test]
    async fn open_defaults_to_homepage() {
        let (editor, _) = opened(home()).await;
        assert_eq!(editor.tree().find("h1").unwrap().text_content(), "Home");
        assert_eq!(editor.markdown().unwrap(), "# Home\n\nWelcome **here**\n");
    }

    #[tokio::test]
    async fn open_follows_document_query() {
        let platform = FakePlatform::at(&format!("{ORIGIN}/editor.html?document=/notes.md"))
            .with_document("http://pad.test/notes.md", "notes");
        let (editor, _) = opened(platform).await;
        assert_eq!(editor.markdown().unwrap(), "notes\n");
    }

    #[tokio::test]
    async fn empty_document_query_uses_default() {
        let platform = FakePlatform::at(&format!("{ORIGIN}/editor.html?document="))
            .with_document("http://pad.test/homepage.md", "home");
        let (editor, _) = opened(platform).await;
        assert_eq!(editor.markdown().unwrap(), "home\n");
    }

    #[tokio::test]
    async fn open_reports_fetch_failure() {
        let store = Arc::new(InMemoryBlobStore::new());
        let platform = FakePlatform::at(&format!("{ORIGIN}/editor.html?document=/missing.md"));
        let mut editor = EditorController::new(platform, store, Renderer::default());
        assert!(matches!(
            editor.open().await,
            Err(EditorError::Platform(PlatformError::Fetch { .. }))
        ));
    }

    #[tokio::test]
    async fn relative_location_is_invalid() {
        let store = Arc::new(InMemoryBlobStore::new());
        let mut editor =
            EditorController::new(FakePlatform::at("editor.html"), store, Renderer::default());
        assert!(matches!(
            editor.open().await,
            Err(EditorError::InvalidReference { .. })
        ));
    }

    #[tokio::test]
    async fn plain_keys_are_ignored() {
        let (mut editor, store) = opened(home()).await;
        let outcome = editor.handle_key(&KeyEvent::plain("s")).await.unwrap();
        assert_eq!(outcome, KeyOutcome::default());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn rerender_normalizes_edited_tree() {
        let (mut editor, _) = opened(home()).await;
        editor.set_tree(
            Element::new("body")
                .with_child(Element::new("div").with_text("\n\nedited\n\n"))
                .with_child(Element::new("b").with_text("bold")),
        );
        let outcome = editor.handle_key(&KeyEvent::ctrl("a")).await.unwrap();
        assert!(outcome.default_prevented);
        assert_eq!(outcome.action, Some(EditorAction::Rerender));
        assert_eq!(editor.markdown().unwrap(), "edited\n**bold**\n");
        assert!(editor.tree().find("strong").is_some());
    }

    #[tokio::test]
    async fn download_link_stores_markdown_and_prompts() {
        let (mut editor, store) = opened(home()).await;
        editor.handle_key(&KeyEvent::ctrl("d")).await.unwrap();

        let hash = ContentHash::digest(b"# Home\n\nWelcome **here**\n");
        let blob = store.get(&hash).await.unwrap().unwrap();
        assert_eq!(blob.content_type(), MARKDOWN_CONTENT_TYPE);
        assert_eq!(
            editor.platform().prompts(),
            vec![(
                "Download URL:".to_string(),
                format!("{ORIGIN}/download/{}.md", hash.to_hex())
            )]
        );
    }

    #[tokio::test]
    async fn export_stores_standalone_page() {
        let (mut editor, store) = opened(home()).await;
        let url = editor.export_html().await.unwrap();
        assert!(url.path().ends_with(".html"));

        let hash = store.all_hashes()[0];
        let blob = store.get(&hash).await.unwrap().unwrap();
        assert_eq!(blob.content_type(), HTML_CONTENT_TYPE);
        let page = String::from_utf8(blob.data.to_vec()).unwrap();
        assert!(page.starts_with("<!DOCTYPE html>\n"));
        assert!(page.contains(DEFAULT_STYLESHEET));
        assert!(page.contains("<h1>Home</h1>"));
        assert_eq!(editor.platform().prompts()[0].0, "Download link:");
    }

    #[tokio::test]
    async fn log_does_not_persist() {
        let (mut editor, store) = opened(home()).await;
        editor.handle_key(&KeyEvent::ctrl("l")).await.unwrap();
        assert!(store.is_empty());
        assert!(editor.platform().navigations().is_empty());
    }

    #[tokio::test]
    async fn raw_edit_then_rerender() {
        let mut platform = home();
        platform.viewport = Some(Viewport {
            width: 800,
            height: 600,
        });
        let (mut editor, _) = opened(platform).await;
        let before = editor.markdown().unwrap();

        editor.handle_key(&KeyEvent::ctrl("m")).await.unwrap();
        assert_eq!(editor.mode(), Mode::Raw);
        let textarea = editor.tree().find("textarea").unwrap();
        assert_eq!(textarea.value.as_deref(), Some(before.as_str()));
        assert_eq!(textarea.attr("style"), Some("height:600px;width:800px;"));
        assert_eq!(editor.markdown().unwrap(), before);

        editor.handle_key(&KeyEvent::ctrl("a")).await.unwrap();
        assert_eq!(editor.mode(), Mode::Rendered);
        assert_eq!(editor.markdown().unwrap(), before);
    }

    #[tokio::test]
    async fn save_pushes_editor_url() {
        let (mut editor, store) = opened(home()).await;
        let hash = editor.save().await.unwrap();
        assert!(store.exists(&hash).await.unwrap());

        let expected = format!("{ORIGIN}/editor.html?document=/download/{}.md", hash.to_hex());
        assert_eq!(
            editor.platform().navigations(),
            vec![(expected.clone(), Navigation::Push)]
        );
        assert_eq!(editor.platform().current_reference(), expected);
        assert_eq!(
            editor.document_url().unwrap().as_str(),
            format!("{ORIGIN}/download/{}.md", hash.to_hex())
        );
    }

    #[tokio::test]
    async fn upload_stores_files_with_metadata() {
        let mut platform = home();
        let modified = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        platform.files = vec![
            SelectedFile {
                name: "a.md".into(),
                data: Bytes::from_static(b"# A\n"),
                content_type: "text/markdown".into(),
                last_modified: Some(modified),
                relative_path: Some("docs/a.md".into()),
            },
            SelectedFile {
                name: "blob".into(),
                data: Bytes::from_static(b"\x00\x01"),
                content_type: String::new(),
                last_modified: None,
                relative_path: None,
            },
        ];
        let (mut editor, store) = opened(platform).await;
        let hashes = editor.upload().await.unwrap();
        assert_eq!(hashes.len(), 2);

        let first = store.get(&hashes[0]).await.unwrap().unwrap();
        assert_eq!(first.metadata.name.as_deref(), Some("a.md"));
        assert_eq!(first.metadata.size, Some(4));
        assert_eq!(first.metadata.last_modified, Some(modified));
        assert_eq!(first.metadata.relative_path.as_deref(), Some("docs/a.md"));
        assert_eq!(first.content_type(), "text/markdown");

        let second = store.get(&hashes[1]).await.unwrap().unwrap();
        assert_eq!(second.content_type(), OCTET_STREAM);

        let navigations = editor.platform().navigations();
        assert_eq!(navigations.len(), 2);
        assert!(navigations.iter().all(|(_, how)| *how == Navigation::Load));
        assert!(navigations[1].0.contains(&hashes[1].to_hex()));
    }

    #[tokio::test]
    async fn dismissed_picker_does_nothing() {
        let (mut editor, store) = opened(home()).await;
        assert!(editor.upload().await.unwrap().is_empty());
        assert!(store.is_empty());
        assert!(editor.platform().navigations().is_empty());
    }

    #[tokio::test]
    async fn store_failure_propagates_without_navigation() {
        let mut editor = EditorController::new(home(), Arc::new(FailingStore), Renderer::default());
        editor.open().await.unwrap();
        let result = editor.handle_key(&KeyEvent::ctrl("s")).await;
        assert!(matches!(result, Err(EditorError::Store(_))));
        assert!(editor.platform().navigations().is_empty());
        assert_eq!(editor.markdown().unwrap(), "# Home\n\nWelcome **here**\n");
    }

    #[tokio::test]
    async fn malformed_tree_aborts_action() {
        let (mut editor, store) = opened(home()).await;
        editor.set_tree(Element::new("body").with_child(hashpad_doc::Node::Unknown));
        assert!(matches!(
            editor.download_link().await,
            Err(EditorError::Doc(_))
        ));
        assert!(store.is_empty());
    }
}
