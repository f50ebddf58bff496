//! Tagged buffer views passed to kernel entry points.
//!
//! Every operand is a typed enum over the three physical layouts instead
//! of an untyped pointer: real slices, interleaved complex slices, and
//! planar re/im slice pairs. Layout mismatches against the descriptor are
//! typed errors, and span checks run before any element access.

use crate::descriptor::{Layout, LayoutError, RowGeom};
use crate::num::{Complex, Float, PlanarMut, PlanarRef};

/// Immutable operand.
#[derive(Debug)]
pub enum BufferRef<'a, T: Float> {
    Real(&'a [T]),
    Interleaved(&'a [Complex<T>]),
    Planar(PlanarRef<'a, T>),
}

/// Mutable operand.
#[derive(Debug)]
pub enum BufferMut<'a, T: Float> {
    Real(&'a mut [T]),
    Interleaved(&'a mut [Complex<T>]),
    Planar(PlanarMut<'a, T>),
}

impl<T: Float> BufferRef<'_, T> {
    pub fn layout(&self) -> Layout {
        match self {
            Self::Real(_) => Layout::Real,
            Self::Interleaved(_) => Layout::Interleaved,
            Self::Planar(_) => Layout::Planar,
        }
    }

    /// Element count (complex elements for complex layouts).
    pub fn len(&self) -> usize {
        match self {
            Self::Real(s) => s.len(),
            Self::Interleaved(s) => s.len(),
            Self::Planar(p) => p.re.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check that the buffer covers `span` innermost elements for every
    /// row the geometry addresses.
    pub fn check_span(
        &self,
        geom: RowGeom,
        span: usize,
        high: usize,
        batch: usize,
    ) -> Result<(), LayoutError> {
        if self.len() < geom.required_len(span, high, batch) {
            return Err(LayoutError::MismatchedLengths);
        }
        Ok(())
    }
}

impl<T: Float> BufferMut<'_, T> {
    pub fn layout(&self) -> Layout {
        match self {
            Self::Real(_) => Layout::Real,
            Self::Interleaved(_) => Layout::Interleaved,
            Self::Planar(_) => Layout::Planar,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Real(s) => s.len(),
            Self::Interleaved(s) => s.len(),
            Self::Planar(p) => p.re.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn check_span(
        &self,
        geom: RowGeom,
        span: usize,
        high: usize,
        batch: usize,
    ) -> Result<(), LayoutError> {
        if self.len() < geom.required_len(span, high, batch) {
            return Err(LayoutError::MismatchedLengths);
        }
        Ok(())
    }
}

/// Operand set of one plan execution. The shape encodes placement: one
/// aliased buffer, an input/output pair, or the three-buffer forms used
/// by the pair kernels.
#[derive(Debug)]
pub enum NodeBuffers<'a, T: Float> {
    InPlace(BufferMut<'a, T>),
    OutOfPlace {
        input: BufferRef<'a, T>,
        output: BufferMut<'a, T>,
    },
    /// Unpack: one packed spectrum in, two spectra out.
    Pair {
        input: BufferRef<'a, T>,
        first: BufferMut<'a, T>,
        second: BufferMut<'a, T>,
    },
    /// Pack: two spectra in, one packed spectrum out.
    PairInput {
        first: BufferRef<'a, T>,
        second: BufferRef<'a, T>,
        output: BufferMut<'a, T>,
    },
}
