//! Real/imaginary pair packing kernels.
//!
//! Two real signals `x` and `y` of length `N` can share one complex
//! transform by packing them as `z = x + i*y`. `complex2pair_unpack`
//! separates the transform `Z = DFT(z)` into the Hermitian halves
//! `X = DFT(x)` and `Y = DFT(y)`, `floor(N/2)+1` bins each.
//! `pair2complex_pack` is the exact algebraic inverse, rebuilding the
//! full-length packed spectrum from the two halves. Both are
//! out-of-place; the aliasing-free split is what makes the one-transform
//! trick safe, and the dispatch layer rejects in-place requests.

use crate::buffer::{BufferMut, BufferRef, NodeBuffers};
use crate::descriptor::{Descriptor, LayoutError, Placement, RowGeom};
use crate::grid::Grid;
use crate::num::{Complex, ComplexSink, ComplexSource, Float};

/// Split the spectrum of a packed pair into the two Hermitian spectra.
/// `buffers` must be [`NodeBuffers::Pair`] with both outputs in the same
/// layout.
pub fn complex2pair_unpack<T: Float>(
    desc: &Descriptor,
    buffers: NodeBuffers<'_, T>,
) -> Result<(), LayoutError> {
    let (input, mut first, mut second) = match buffers {
        NodeBuffers::Pair {
            input,
            first,
            second,
        } => (input, first, second),
        NodeBuffers::InPlace(_) => return Err(LayoutError::UnsupportedPlacement),
        _ => return Err(LayoutError::InvalidValue),
    };
    desc.validate()?;
    if desc.placement != Placement::OutOfPlace {
        return Err(LayoutError::UnsupportedPlacement);
    }
    if first.layout() != second.layout() {
        return Err(LayoutError::UnsupportedLayout);
    }
    let n = desc.length[0];
    let m = n / 2;
    let high = desc.high_dimension();
    let grid = Grid::for_samples(m + 1, high, desc.batch)?;
    let ig = desc.in_geom();
    let og = desc.out_geom();
    input.check_span(ig, n, high, desc.batch)?;
    first.check_span(og, m + 1, high, desc.batch)?;
    second.check_span(og, m + 1, high, desc.batch)?;

    match input {
        BufferRef::Interleaved(src) => {
            unpack_outputs(&grid, n, src, ig, &mut first, &mut second, og)
        }
        BufferRef::Planar(ref p) => unpack_outputs(&grid, n, p, ig, &mut first, &mut second, og),
        BufferRef::Real(_) => Err(LayoutError::UnsupportedLayout),
    }
}

/// Rebuild the packed spectrum from two Hermitian spectra. `buffers`
/// must be [`NodeBuffers::PairInput`] with both inputs in the same
/// layout.
pub fn pair2complex_pack<T: Float>(
    desc: &Descriptor,
    buffers: NodeBuffers<'_, T>,
) -> Result<(), LayoutError> {
    let (first, second, mut output) = match buffers {
        NodeBuffers::PairInput {
            first,
            second,
            output,
        } => (first, second, output),
        NodeBuffers::InPlace(_) => return Err(LayoutError::UnsupportedPlacement),
        _ => return Err(LayoutError::InvalidValue),
    };
    desc.validate()?;
    if desc.placement != Placement::OutOfPlace {
        return Err(LayoutError::UnsupportedPlacement);
    }
    if first.layout() != second.layout() {
        return Err(LayoutError::UnsupportedLayout);
    }
    let n = desc.length[0];
    let m = n / 2;
    let high = desc.high_dimension();
    let grid = Grid::for_samples(m + 1, high, desc.batch)?;
    let ig = desc.in_geom();
    let og = desc.out_geom();
    first.check_span(ig, m + 1, high, desc.batch)?;
    second.check_span(ig, m + 1, high, desc.batch)?;
    output.check_span(og, n, high, desc.batch)?;

    match (first, second) {
        (BufferRef::Interleaved(x), BufferRef::Interleaved(y)) => {
            pack_output(&grid, n, x, y, ig, &mut output, og)
        }
        (BufferRef::Planar(ref x), BufferRef::Planar(ref y)) => {
            pack_output(&grid, n, x, y, ig, &mut output, og)
        }
        _ => Err(LayoutError::UnsupportedLayout),
    }
}

fn unpack_outputs<T: Float, S: ComplexSource<T> + ?Sized>(
    grid: &Grid,
    n: usize,
    src: &S,
    ig: RowGeom,
    first: &mut BufferMut<'_, T>,
    second: &mut BufferMut<'_, T>,
    og: RowGeom,
) -> Result<(), LayoutError> {
    match (first, second) {
        (BufferMut::Interleaved(x), BufferMut::Interleaved(y)) => {
            unpack_rows(grid, n, src, ig, &mut **x, &mut **y, og);
            Ok(())
        }
        (BufferMut::Planar(x), BufferMut::Planar(y)) => {
            unpack_rows(grid, n, src, ig, x, y, og);
            Ok(())
        }
        _ => Err(LayoutError::UnsupportedLayout),
    }
}

fn pack_output<T: Float, S: ComplexSource<T> + ?Sized>(
    grid: &Grid,
    n: usize,
    x: &S,
    y: &S,
    ig: RowGeom,
    output: &mut BufferMut<'_, T>,
    og: RowGeom,
) -> Result<(), LayoutError> {
    match output {
        BufferMut::Interleaved(z) => {
            pack_rows(grid, n, x, y, ig, &mut **z, og);
            Ok(())
        }
        BufferMut::Planar(z) => {
            pack_rows(grid, n, x, y, ig, z, og);
            Ok(())
        }
        BufferMut::Real(_) => Err(LayoutError::UnsupportedLayout),
    }
}

#[allow(clippy::too_many_arguments)]
fn unpack_rows<T: Float, S, X, Y>(
    grid: &Grid,
    n: usize,
    src: &S,
    ig: RowGeom,
    x: &mut X,
    y: &mut Y,
    og: RowGeom,
) where
    S: ComplexSource<T> + ?Sized,
    X: ComplexSink<T> + ?Sized,
    Y: ComplexSink<T> + ?Sized,
{
    let m = n / 2;
    let half = T::from_f32(0.5);
    for (b, h) in grid.tiles() {
        let ib = ig.offset(b, h);
        let ob = og.offset(b, h);
        for r in 0..=m {
            if r == 0 {
                let z0 = src.load(ib);
                x.store(ob, Complex::new(z0.re, T::zero()));
                y.store(ob, Complex::new(z0.im, T::zero()));
            } else {
                let zr = src.load(ib + r * ig.stride0);
                let zq = src.load(ib + (n - r) * ig.stride0);
                // X[r] = (Z[r] + conj(Z[n-r])) / 2
                x.store(
                    ob + r * og.stride0,
                    Complex::new((zr.re + zq.re) * half, (zr.im - zq.im) * half),
                );
                // Y[r] = (Z[r] - conj(Z[n-r])) / 2i
                y.store(
                    ob + r * og.stride0,
                    Complex::new((zr.im + zq.im) * half, (zq.re - zr.re) * half),
                );
            }
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn pack_rows<T: Float, X, Y, D>(
    grid: &Grid,
    n: usize,
    x: &X,
    y: &Y,
    ig: RowGeom,
    dst: &mut D,
    og: RowGeom,
) where
    X: ComplexSource<T> + ?Sized,
    Y: ComplexSource<T> + ?Sized,
    D: ComplexSink<T> + ?Sized,
{
    let m = n / 2;
    for (b, h) in grid.tiles() {
        let ib = ig.offset(b, h);
        let ob = og.offset(b, h);
        for r in 0..=m {
            if r == 0 {
                let x0 = x.load(ib);
                let y0 = y.load(ib);
                dst.store(ob, Complex::new(x0.re, y0.re));
            } else {
                let xr = x.load(ib + r * ig.stride0);
                let yr = y.load(ib + r * ig.stride0);
                // Z[r] = X[r] + i*Y[r]
                dst.store(
                    ob + r * og.stride0,
                    Complex::new(xr.re - yr.im, xr.im + yr.re),
                );
                // Z[n-r] = conj(X[r]) + i*conj(Y[r])
                let q = n - r;
                if q != r {
                    dst.store(
                        ob + q * og.stride0,
                        Complex::new(xr.re + yr.im, yr.re - xr.im),
                    );
                }
            }
        }
    }
}
