//! Rendering surface boundary
//!
//! The surface is the terminal screen a pane renders into. The controller
//! only needs two things from it: fit it to its container and read back the
//! resulting character grid, and append output bytes to it.

use std::io::Write;

use super::types::Dimensions;

/// A terminal rendering surface owned by one pane.
pub trait RenderSurface {
    /// Fits the surface to its container and returns the resulting
    /// character grid. Either dimension may be zero before the first
    /// layout pass.
    fn fit(&mut self) -> Dimensions;

    /// Appends a chunk of session output.
    fn write_output(&mut self, chunk: &[u8]);
}

/// A surface with an externally controlled size that forwards output to a
/// writer. Used for headless sessions.
#[derive(Debug)]
pub struct WriterSurface<W: Write> {
    size: Dimensions,
    writer: W,
}

impl<W: Write> WriterSurface<W> {
    /// Creates a surface of the given size.
    #[must_use]
    pub const fn new(size: Dimensions, writer: W) -> Self {
        Self { size, writer }
    }

    /// Changes the size reported by the next `fit`.
    pub fn set_size(&mut self, size: Dimensions) {
        self.size = size;
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Borrows the underlying writer.
    pub fn get_ref(&self) -> &W {
        &self.writer
    }
}

impl<W: Write> RenderSurface for WriterSurface<W> {
    fn fit(&mut self) -> Dimensions {
        self.size
    }

    fn write_output(&mut self, chunk: &[u8]) {
        if let Err(e) = self.writer.write_all(chunk).and_then(|()| self.writer.flush()) {
            tracing::warn!(%e, "Failed to forward session output");
        }
    }
}
