/// Operations bound to modifier shortcuts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EditorAction {
    Rerender,
    DownloadLink,
    ExportHtml,
    LogMarkdown,
    RawEdit,
    Save,
    Upload,
}

impl EditorAction {
    pub const ALL: [EditorAction; 7] = [
        Self::Rerender,
        Self::DownloadLink,
        Self::ExportHtml,
        Self::LogMarkdown,
        Self::RawEdit,
        Self::Save,
        Self::Upload,
    ];

    /// Action bound to `key`, case-insensitive.
    pub fn from_key(key: &str) -> Option<Self> {
        match key.to_ascii_lowercase().as_str() {
            "a" => Some(Self::Rerender),
            "d" => Some(Self::DownloadLink),
            "h" => Some(Self::ExportHtml),
            "l" => Some(Self::LogMarkdown),
            "m" => Some(Self::RawEdit),
            "s" => Some(Self::Save),
            "u" => Some(Self::Upload),
            _ => None,
        }
    }

    pub fn key(self) -> char {
        match self {
            Self::Rerender => 'a',
            Self::DownloadLink => 'd',
            Self::ExportHtml => 'h',
            Self::LogMarkdown => 'l',
            Self::RawEdit => 'm',
            Self::Save => 's',
            Self::Upload => 'u',
        }
    }
}

/// A key press as delivered by the host.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: String,
    pub ctrl: bool,
    /// Command on macOS.
    pub meta: bool,
}

impl KeyEvent {
    pub fn ctrl(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ctrl: true,
            meta: false,
        }
    }

    pub fn plain(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    /// Bound action, if a modifier is held.
    pub fn action(&self) -> Option<EditorAction> {
        if !(self.ctrl || self.meta) {
            return None;
        }
        EditorAction::from_key(&self.key)
    }
}

/// What the controller did with a key press.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KeyOutcome {
    pub action: Option<EditorAction>,
    /// The host must suppress its own handling of the key.
    pub default_prevented: bool,
}
