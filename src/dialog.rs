//! Modal workflow around a [`SignaturePad`]: consent, save, modify, dismiss.

use std::path::Path;

use tracing::{debug, info, warn};

use crate::api::{CanvasExport, CanvasRenderingContext2D};
use crate::config::SignatureConfig;
use crate::error::Result;
use crate::geometry::ClientRect;
use crate::pad::SignaturePad;

pub struct SignatureDialog<C> {
    pad: SignaturePad<C>,
    open: bool,
    terms_accepted: bool,
    saved: bool,
    close_on_save: bool,
}

impl<C: CanvasRenderingContext2D> SignatureDialog<C> {
    pub fn new(config: SignatureConfig) -> Self {
        let close_on_save = config.close_on_save;
        Self {
            pad: SignaturePad::new(config),
            open: false,
            terms_accepted: false,
            saved: false,
            close_on_save,
        }
    }

    /// Shows the dialog, mounting a fresh canvas.
    pub fn open(&mut self, canvas: C) -> Result<()> {
        self.pad.mount(canvas)?;
        self.open = true;
        debug!("signature dialog opened");
        Ok(())
    }

    /// Hides the dialog and hands back its canvas. Consent, the saved flag and
    /// the attached-image lock are reset; the pad starts over on next open.
    pub fn close(&mut self) -> Option<C> {
        if !self.open {
            return None;
        }
        self.open = false;
        self.saved = false;
        self.terms_accepted = false;
        self.pad.reopen();
        if let Err(err) = self.pad.clear() {
            warn!(%err, "failed to reset signature pad on close");
        }
        let canvas = self.pad.unmount();
        debug!("signature dialog closed");
        canvas
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn pad(&self) -> &SignaturePad<C> {
        &self.pad
    }

    pub fn pad_mut(&mut self) -> &mut SignaturePad<C> {
        &mut self.pad
    }

    pub fn set_terms_accepted(&mut self, accepted: bool) {
        self.terms_accepted = accepted;
    }

    pub fn terms_accepted(&self) -> bool {
        self.terms_accepted
    }

    pub fn is_saved(&self) -> bool {
        self.saved
    }

    pub fn drawing_disabled(&self) -> bool {
        self.saved || self.pad.has_image()
    }

    pub fn can_undo(&self) -> bool {
        self.pad.can_undo() && !self.drawing_disabled()
    }

    pub fn can_save(&self) -> bool {
        !self.saved && !self.pad.is_empty() && self.terms_accepted
    }

    pub fn undo(&mut self) -> Result<bool> {
        if !self.can_undo() {
            return Ok(false);
        }
        self.pad.undo()
    }

    pub fn clear(&mut self) -> Result<()> {
        if self.drawing_disabled() {
            return Ok(());
        }
        self.pad.clear()
    }

    /// Leaves the saved state so the signature can be redrawn from scratch.
    pub fn modify(&mut self) -> Result<()> {
        self.saved = false;
        self.pad.reopen();
        self.pad.clear()
    }

    /// Attaches uploaded image bytes. Decode failures are logged and treated
    /// as a skipped upload. Refused while a saved signature is on screen;
    /// `modify` first.
    pub fn attach_image_bytes(&mut self, bytes: &[u8]) -> Result<bool> {
        if self.saved {
            return Ok(false);
        }
        match self.pad.attach_image_bytes(bytes) {
            Ok(attached) => Ok(attached),
            Err(err) => {
                warn!(%err, "ignoring unreadable signature image");
                Ok(false)
            }
        }
    }

    pub async fn attach_image_file(&mut self, path: impl AsRef<Path>) -> Result<bool> {
        if self.saved {
            return Ok(false);
        }
        let path = path.as_ref();
        match self.pad.attach_image_file(path).await {
            Ok(attached) => Ok(attached),
            Err(err) => {
                warn!(%err, path = %path.display(), "ignoring unreadable signature image");
                Ok(false)
            }
        }
    }

    /// Escape dismisses the dialog. Returns true when the key closed it.
    pub fn handle_key(&mut self, key: &str) -> bool {
        if key == "Escape" && self.open {
            self.close();
            return true;
        }
        false
    }

    /// Clicks on the backdrop (outside `dialog_rect`) dismiss the dialog.
    pub fn handle_backdrop_click(
        &mut self,
        client_x: f64,
        client_y: f64,
        dialog_rect: ClientRect,
    ) -> bool {
        if self.open && !dialog_rect.contains(client_x, client_y) {
            self.close();
            return true;
        }
        false
    }
}

impl<C: CanvasRenderingContext2D + CanvasExport> SignatureDialog<C> {
    /// Exports and locks the signature once consent is given. Returns the PNG
    /// data URL that should be handed to the confirm callback.
    pub fn save(&mut self) -> Result<Option<String>> {
        if self.saved || !self.terms_accepted {
            return Ok(None);
        }
        let Some(data) = self.pad.export_signature()? else {
            return Ok(None);
        };
        self.saved = true;
        self.pad.finalize();
        info!(len = data.len(), "signature saved");
        if self.close_on_save {
            self.close();
        }
        Ok(Some(data))
    }
}
