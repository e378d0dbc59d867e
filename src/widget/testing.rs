use std::cell::RefCell;

use super::controller::{Surface, Widget};
use super::drop_zone::SelectedFile;
use super::form::FormPayload;
use super::transport::{Reply, Transport};
use super::view::ViewState;
use crate::error::WidgetError;

pub fn png(name: &str) -> SelectedFile {
    SelectedFile::from_bytes(name, "image/png", vec![0x89u8, b'P', b'N', b'G'])
}

/// Records alerts and every view transition it is asked to render.
#[derive(Default)]
pub struct FakeSurface {
    pub alerts: Vec<String>,
    transitions: Vec<ViewState>,
    chooser: Vec<SelectedFile>,
}

impl FakeSurface {
    pub fn choosing(files: Vec<SelectedFile>) -> Self {
        Self {
            chooser: files,
            ..Self::default()
        }
    }

    /// View states entered after the initial form, in order.
    pub fn views(&self) -> Vec<ViewState> {
        self.transitions.clone()
    }
}

impl Surface for FakeSurface {
    fn render(&mut self, widget: &Widget) {
        assert_eq!(widget.view.panels().visible_count(), 1);
        let last = self.transitions.last().copied().unwrap_or(ViewState::Form);
        if last != widget.view {
            self.transitions.push(widget.view);
        }
    }

    fn alert(&mut self, message: &str) {
        self.alerts.push(message.to_string());
    }

    fn choose_files(&mut self) -> Vec<SelectedFile> {
        std::mem::take(&mut self.chooser)
    }
}

enum Scripted {
    Reply(Reply),
    Unreachable,
}

/// Answers every post with the same scripted outcome.
pub struct FakeTransport {
    scripted: Scripted,
    sent: RefCell<Vec<FormPayload>>,
}

impl FakeTransport {
    pub fn ok(download_url: &str) -> Self {
        let body = serde_json::json!({ "download_url": download_url }).to_string();
        Self::status(200, &body)
    }

    pub fn status(status: u16, body: &str) -> Self {
        Self {
            scripted: Scripted::Reply(Reply {
                status,
                body: body.as_bytes().to_vec(),
            }),
            sent: RefCell::new(Vec::new()),
        }
    }

    pub fn unreachable() -> Self {
        Self {
            scripted: Scripted::Unreachable,
            sent: RefCell::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.sent.borrow().len()
    }

    pub fn last_payload(&self) -> Option<FormPayload> {
        self.sent.borrow().last().cloned()
    }
}

impl Transport for FakeTransport {
    async fn post_form(&self, payload: FormPayload) -> Result<Reply, WidgetError> {
        self.sent.borrow_mut().push(payload);
        match &self.scripted {
            Scripted::Reply(reply) => Ok(reply.clone()),
            Scripted::Unreachable => Err(WidgetError::Transport("connection refused".into())),
        }
    }
}
