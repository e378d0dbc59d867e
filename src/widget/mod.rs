//! Drag-and-drop image upload widget.
//!
//! [`UploadController`] owns the widget state (selected file, preview, the
//! visible panel) and drives it from user events. Rendering, alerts and the
//! native file chooser go through [`Surface`]; the single POST goes through
//! [`Transport`].

mod controller;
mod drop_zone;
mod form;
mod preview;
mod transport;
mod view;

#[cfg(test)]
pub(crate) mod testing;

pub use controller::{
    Surface, UploadController, Widget, GENERIC_ALERT, NO_FILE_ALERT, READ_ALERT,
};
pub use drop_zone::{DropZone, SelectedFile};
pub use form::{FormFields, FormPayload, IMAGE_FIELD, PIECES_FIELD};
pub use preview::{render_preview, PreviewSource};
pub use transport::{interpret, Reply, ReqwestTransport, Transport, GENERATE_PATH};
pub use view::{Panels, ViewState};
