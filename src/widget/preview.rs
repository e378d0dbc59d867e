use base64::{engine::general_purpose, Engine as _};

use super::drop_zone::SelectedFile;

/// Data URI of the selected image, ready to be used as an `<img>` source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreviewSource(String);

impl PreviewSource {
    pub fn from_bytes(content_type: &str, bytes: &[u8]) -> Self {
        let mime = if content_type.is_empty() {
            "application/octet-stream"
        } else {
            content_type
        };
        let encoded = general_purpose::STANDARD.encode(bytes);
        Self(format!("data:{mime};base64,{encoded}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

pub async fn render_preview(file: &SelectedFile) -> std::io::Result<PreviewSource> {
    let bytes = file.read().await?;
    Ok(PreviewSource::from_bytes(file.content_type(), &bytes))
}
