use tracing::{debug, info, warn};

use super::drop_zone::{DropZone, SelectedFile};
use super::form::{FormFields, FormPayload, IMAGE_FIELD};
use super::preview::{render_preview, PreviewSource};
use super::transport::{interpret, Transport};
use super::view::ViewState;
use crate::error::WidgetError;

pub const NO_FILE_ALERT: &str = "Please select an image first.";
pub const GENERIC_ALERT: &str = "Something went wrong while generating the puzzle. Please try again.";
pub const READ_ALERT: &str = "Could not read the selected file.";

/// The host the widget is drawn on: a browser page, a terminal, a test fake.
pub trait Surface {
    /// Called after every state change with the full widget state.
    fn render(&mut self, _widget: &Widget) {}

    fn alert(&mut self, message: &str);

    /// Native file chooser opened by a click on the drop zone.
    fn choose_files(&mut self) -> Vec<SelectedFile> {
        Vec::new()
    }
}

/// Observable state of one widget instance.
#[derive(Clone, Debug, Default)]
pub struct Widget {
    pub view: ViewState,
    pub zone: DropZone,
    pub preview: Option<PreviewSource>,
    pub fields: FormFields,
    pub download_url: Option<String>,
}

pub struct UploadController<T, S> {
    widget: Widget,
    transport: T,
    surface: S,
}

impl<T: Transport, S: Surface> UploadController<T, S> {
    pub fn new(transport: T, surface: S) -> Self {
        Self::with_fields(transport, surface, FormFields::default())
    }

    pub fn with_fields(transport: T, surface: S, fields: FormFields) -> Self {
        Self {
            widget: Widget {
                fields,
                ..Widget::default()
            },
            transport,
            surface,
        }
    }

    pub fn widget(&self) -> &Widget {
        &self.widget
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn fields_mut(&mut self) -> &mut FormFields {
        &mut self.widget.fields
    }

    pub async fn click(&mut self) -> Result<(), WidgetError> {
        let files = self.surface.choose_files();
        self.change(files).await
    }

    pub fn drag_over(&mut self) {
        self.widget.zone.drag_over();
        self.refresh();
    }

    pub fn drag_leave(&mut self) {
        self.widget.zone.drag_leave();
        self.refresh();
    }

    pub async fn drop(&mut self, files: Vec<SelectedFile>) -> Result<(), WidgetError> {
        self.widget.zone.drag_leave();
        self.select_file(files).await
    }

    pub async fn change(&mut self, files: Vec<SelectedFile>) -> Result<(), WidgetError> {
        self.select_file(files).await
    }

    /// Takes the first of `files` as the selection and renders its preview.
    /// An empty list changes nothing.
    pub async fn select_file(&mut self, files: Vec<SelectedFile>) -> Result<(), WidgetError> {
        let Some(file) = self.widget.zone.accept(files).cloned() else {
            self.refresh();
            return Ok(());
        };
        debug!(name = file.name(), "file selected");
        self.widget.preview = None;

        match render_preview(&file).await {
            Ok(preview) => {
                self.widget.preview = Some(preview);
                self.widget.zone.hide_placeholder();
                self.refresh();
                Ok(())
            }
            Err(e) => {
                warn!(name = file.name(), error = %e, "preview failed");
                self.surface.alert(READ_ALERT);
                self.widget.zone.clear();
                self.refresh();
                Err(WidgetError::Read(e))
            }
        }
    }

    pub fn set_state(&mut self, state: ViewState) {
        debug!(view = state.label(), "view changed");
        self.widget.view = state;
        self.refresh();
    }

    /// Back to an empty form: no file, no preview, default fields.
    pub fn reset(&mut self) {
        self.widget.zone.clear();
        self.widget.preview = None;
        self.widget.fields.reset();
        self.widget.download_url = None;
        self.set_state(ViewState::Form);
    }

    /// Posts the selected file. Failures are alerted and reset here; the
    /// returned error only tells the caller what happened.
    pub async fn submit(&mut self) -> Result<String, WidgetError> {
        if self.widget.view == ViewState::Loading {
            return Err(WidgetError::InFlight);
        }
        let Some(file) = self.widget.zone.selected().cloned() else {
            self.surface.alert(NO_FILE_ALERT);
            return Err(WidgetError::NoFileSelected);
        };

        let payload = match self.payload(&file).await {
            Ok(payload) => payload,
            Err(e) => {
                self.surface.alert(READ_ALERT);
                self.reset();
                return Err(e);
            }
        };

        self.set_state(ViewState::Loading);
        info!(name = file.name(), "submitting upload");

        let outcome = match self.transport.post_form(payload).await {
            Ok(reply) => interpret(&reply),
            Err(e) => Err(e),
        };

        match outcome {
            Ok(link) => {
                info!(%link, "puzzle pack ready");
                self.widget.download_url = Some(link.clone());
                self.set_state(ViewState::Result);
                Ok(link)
            }
            Err(WidgetError::Server(message)) => {
                warn!(%message, "server rejected upload");
                self.surface.alert(&message);
                self.reset();
                Err(WidgetError::Server(message))
            }
            Err(e) => {
                warn!(error = %e, "upload failed");
                self.surface.alert(GENERIC_ALERT);
                self.reset();
                Err(e)
            }
        }
    }

    async fn payload(&self, file: &SelectedFile) -> Result<FormPayload, WidgetError> {
        let bytes = file.read().await?;
        Ok(FormPayload {
            fields: self
                .widget
                .fields
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            file_field: IMAGE_FIELD.to_string(),
            file_name: file.name().to_string(),
            content_type: file.content_type().to_string(),
            bytes,
        })
    }

    fn refresh(&mut self) {
        self.surface.render(&self.widget);
    }
}
