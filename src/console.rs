use std::path::PathBuf;

use tracing::info;

use crate::widget::{SelectedFile, Surface, ViewState, Widget};

/// Terminal stand-in for the browser page. The "file chooser" hands out the
/// path given on the command line; alerts go to stderr.
pub struct ConsoleSurface {
    pending: Option<PathBuf>,
    last_view: ViewState,
}

impl ConsoleSurface {
    pub fn new(path: PathBuf) -> Self {
        Self {
            pending: Some(path),
            last_view: ViewState::Form,
        }
    }
}

impl Surface for ConsoleSurface {
    fn render(&mut self, widget: &Widget) {
        if widget.view == self.last_view {
            return;
        }
        self.last_view = widget.view;
        match widget.view {
            ViewState::Loading => println!("⏳ Generating puzzle pack..."),
            ViewState::Result => {
                if let Some(url) = &widget.download_url {
                    println!("✅ Puzzle pack ready: {url}");
                }
            }
            ViewState::Form => info!("back to upload form"),
        }
    }

    fn alert(&mut self, message: &str) {
        eprintln!("⚠️  {message}");
    }

    fn choose_files(&mut self) -> Vec<SelectedFile> {
        self.pending
            .take()
            .map(SelectedFile::from_path)
            .into_iter()
            .collect()
    }
}
