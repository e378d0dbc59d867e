use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Clone, Debug, PartialEq, Eq)]
enum FileSource {
    Path(PathBuf),
    Memory(Arc<[u8]>),
}

/// A single image picked by the user, not yet read.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectedFile {
    name: String,
    content_type: String,
    source: FileSource,
}

impl SelectedFile {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            content_type: content_type_for(&path).to_string(),
            name,
            source: FileSource::Path(path),
        }
    }

    pub fn from_bytes(
        name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Arc<[u8]>>,
    ) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            source: FileSource::Memory(bytes.into()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub async fn read(&self) -> std::io::Result<Vec<u8>> {
        match &self.source {
            FileSource::Path(path) => tokio::fs::read(path).await,
            FileSource::Memory(bytes) => Ok(bytes.to_vec()),
        }
    }
}

fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        Some("bmp") => "image/bmp",
        _ => "application/octet-stream",
    }
}

/// Click/drop surface. Holds the one canonical selected file no matter
/// which gesture produced it.
#[derive(Clone, Debug)]
pub struct DropZone {
    selected: Option<SelectedFile>,
    drag_active: bool,
    placeholder_visible: bool,
}

impl Default for DropZone {
    fn default() -> Self {
        Self {
            selected: None,
            drag_active: false,
            placeholder_visible: true,
        }
    }
}

impl DropZone {
    pub fn drag_over(&mut self) {
        self.drag_active = true;
    }

    pub fn drag_leave(&mut self) {
        self.drag_active = false;
    }

    /// Keeps the first file and replaces any earlier selection. Returns the
    /// new selection, or `None` when the list was empty.
    pub fn accept(&mut self, files: Vec<SelectedFile>) -> Option<&SelectedFile> {
        let first = files.into_iter().next()?;
        self.selected = Some(first);
        self.selected.as_ref()
    }

    pub fn selected(&self) -> Option<&SelectedFile> {
        self.selected.as_ref()
    }

    pub fn is_drag_active(&self) -> bool {
        self.drag_active
    }

    pub fn is_placeholder_visible(&self) -> bool {
        self.placeholder_visible
    }

    pub(crate) fn hide_placeholder(&mut self) {
        self.placeholder_visible = false;
    }

    pub fn clear(&mut self) {
        self.selected = None;
        self.drag_active = false;
        self.placeholder_visible = true;
    }
}
