//! Scoped coordinate frames.

use std::ops::{Deref, DerefMut};

use crate::canvas::Canvas;

/// A translated frame on a canvas.
///
/// Creating the frame saves the canvas state and translates the origin;
/// dropping it restores the state. Nested frames therefore unwind in LIFO
/// order on every exit path, including panics.
pub struct CanvasFrame<'a, C: Canvas + ?Sized> {
    canvas: &'a mut C,
}

impl<'a, C: Canvas + ?Sized> CanvasFrame<'a, C> {
    /// Save the canvas state and move the origin to `(x, y)`.
    pub fn enter(canvas: &'a mut C, x: f64, y: f64) -> Self {
        canvas.save();
        canvas.translate(x, y);
        Self { canvas }
    }
}

impl<C: Canvas + ?Sized> Deref for CanvasFrame<'_, C> {
    type Target = C;

    fn deref(&self) -> &C {
        self.canvas
    }
}

impl<C: Canvas + ?Sized> DerefMut for CanvasFrame<'_, C> {
    fn deref_mut(&mut self) -> &mut C {
        self.canvas
    }
}

impl<C: Canvas + ?Sized> Drop for CanvasFrame<'_, C> {
    fn drop(&mut self) {
        self.canvas.restore();
    }
}
