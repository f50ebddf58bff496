//! Even-length real FFT pre/post-processing butterflies.
//!
//! An even-length real transform of size `N` runs a complex transform of
//! size `half_n = N/2` over the even/odd-packed signal. `r2c_1d_post`
//! turns that complex spectrum into the first `half_n + 1` bins of the
//! real signal's spectrum; `c2r_1d_pre` is the matching preparation step
//! before an inverse complex transform. Both visit each unordered
//! symmetric pair `(p, q = half_n - p)` exactly once, owned by the
//! iteration with `p <= half_n / 2`; loads complete before stores so the
//! in-place form is safe. Self-paired bins produce identical writes.
//!
//! The forward case never reads the Nyquist slot, so a `half_n`-element
//! input row suffices out-of-place. In-place rows span `half_n + 1` and
//! require unit stride with matching input/output geometry.

use crate::buffer::{BufferMut, BufferRef, NodeBuffers};
use crate::descriptor::{Descriptor, LayoutError, Placement, RowGeom};
use crate::grid::Grid;
use crate::num::{Complex, ComplexSink, ComplexSource, Float};
use crate::twiddle::TwiddleTable;

/// Post-process the complex spectrum of an even/odd-packed real signal
/// into `half_n + 1` Hermitian bins.
pub fn r2c_1d_post<T: Float>(
    desc: &Descriptor,
    buffers: NodeBuffers<'_, T>,
    twiddles: &TwiddleTable<T>,
) -> Result<(), LayoutError> {
    run(desc, buffers, twiddles, true)
}

/// Pre-process `half_n + 1` Hermitian bins into the complex spectrum an
/// inverse transform of size `half_n` consumes.
pub fn c2r_1d_pre<T: Float>(
    desc: &Descriptor,
    buffers: NodeBuffers<'_, T>,
    twiddles: &TwiddleTable<T>,
) -> Result<(), LayoutError> {
    run(desc, buffers, twiddles, false)
}

fn run<T: Float>(
    desc: &Descriptor,
    buffers: NodeBuffers<'_, T>,
    twd: &TwiddleTable<T>,
    forward: bool,
) -> Result<(), LayoutError> {
    desc.validate()?;
    let half_n = desc.length[0];
    let high = desc.high_dimension();
    let grid = Grid::for_samples(half_n / 2 + 1, high, desc.batch)?;
    let ig = desc.in_geom();
    let og = desc.out_geom();

    match buffers {
        NodeBuffers::OutOfPlace { input, mut output } => {
            if desc.placement != Placement::OutOfPlace {
                return Err(LayoutError::UnsupportedPlacement);
            }
            let (in_span, out_span) = if forward {
                (half_n, half_n + 1)
            } else {
                (half_n + 1, half_n)
            };
            input.check_span(ig, in_span, high, desc.batch)?;
            output.check_span(og, out_span, high, desc.batch)?;
            match input {
                BufferRef::Interleaved(src) => {
                    oop_into(&grid, half_n, src, ig, &mut output, og, twd, forward)
                }
                BufferRef::Planar(ref p) => {
                    oop_into(&grid, half_n, p, ig, &mut output, og, twd, forward)
                }
                BufferRef::Real(_) => Err(LayoutError::UnsupportedLayout),
            }
        }
        NodeBuffers::InPlace(mut buf) => {
            if desc.placement != Placement::InPlace {
                return Err(LayoutError::UnsupportedPlacement);
            }
            if !desc.unit_stride() {
                return Err(LayoutError::NonUnitStride);
            }
            if ig != og {
                return Err(LayoutError::InvalidValue);
            }
            buf.check_span(ig, half_n + 1, high, desc.batch)?;
            match buf {
                BufferMut::Interleaved(b) => {
                    ip_rows(&grid, half_n, b, ig, twd, forward);
                    Ok(())
                }
                BufferMut::Planar(ref mut p) => {
                    ip_rows(&grid, half_n, p, ig, twd, forward);
                    Ok(())
                }
                BufferMut::Real(_) => Err(LayoutError::UnsupportedLayout),
            }
        }
        _ => Err(LayoutError::UnsupportedPlacement),
    }
}

#[allow(clippy::too_many_arguments)]
fn oop_into<T: Float, S: ComplexSource<T> + ?Sized>(
    grid: &Grid,
    half_n: usize,
    src: &S,
    ig: RowGeom,
    output: &mut BufferMut<'_, T>,
    og: RowGeom,
    twd: &TwiddleTable<T>,
    forward: bool,
) -> Result<(), LayoutError> {
    match output {
        BufferMut::Interleaved(dst) => {
            oop_rows(grid, half_n, src, ig, &mut **dst, og, twd, forward);
            Ok(())
        }
        BufferMut::Planar(p) => {
            oop_rows(grid, half_n, src, ig, p, og, twd, forward);
            Ok(())
        }
        BufferMut::Real(_) => Err(LayoutError::UnsupportedLayout),
    }
}

#[allow(clippy::too_many_arguments)]
fn oop_rows<T: Float, S: ComplexSource<T> + ?Sized, D: ComplexSink<T> + ?Sized>(
    grid: &Grid,
    half_n: usize,
    src: &S,
    ig: RowGeom,
    dst: &mut D,
    og: RowGeom,
    twd: &TwiddleTable<T>,
    forward: bool,
) {
    for (b, h) in grid.tiles() {
        let ib = ig.offset(b, h);
        let ob = og.offset(b, h);
        for p in 0..=half_n / 2 {
            if p == 0 {
                boundary_bins(src, ib, ig.stride0, dst, ob, og.stride0, half_n, forward);
            } else {
                let q = half_n - p;
                let zp = src.load(ib + p * ig.stride0);
                let zq = src.load(ib + q * ig.stride0);
                let (op, oq) = butterfly(zp, zq, twd.at(p), twd.at(q), forward);
                dst.store(ob + p * og.stride0, op);
                dst.store(ob + q * og.stride0, oq);
            }
        }
    }
}

fn ip_rows<T: Float, B: ComplexSink<T> + ?Sized>(
    grid: &Grid,
    half_n: usize,
    buf: &mut B,
    geom: RowGeom,
    twd: &TwiddleTable<T>,
    forward: bool,
) {
    for (b, h) in grid.tiles() {
        let base = geom.offset(b, h);
        for p in 0..=half_n / 2 {
            if p == 0 {
                if forward {
                    let z = buf.load(base);
                    buf.store(base, Complex::new(z.re + z.im, T::zero()));
                    buf.store(base + half_n, Complex::new(z.re - z.im, T::zero()));
                } else {
                    let lo = buf.load(base);
                    let hi = buf.load(base + half_n);
                    buf.store(base, Complex::new(lo.re + hi.re, lo.re - hi.re));
                }
            } else {
                let q = half_n - p;
                let zp = buf.load(base + p);
                let zq = buf.load(base + q);
                let (op, oq) = butterfly(zp, zq, twd.at(p), twd.at(q), forward);
                buf.store(base + p, op);
                buf.store(base + q, oq);
            }
        }
    }
}

/// DC and Nyquist handling shared by both directions. In the forward
/// case the Nyquist input slot is never read; in the inverse case only
/// bin 0 is written.
fn boundary_bins<T: Float, S: ComplexSource<T> + ?Sized, D: ComplexSink<T> + ?Sized>(
    src: &S,
    ib: usize,
    si: usize,
    dst: &mut D,
    ob: usize,
    so: usize,
    half_n: usize,
    forward: bool,
) {
    if forward {
        let z = src.load(ib);
        dst.store(ob, Complex::new(z.re + z.im, T::zero()));
        dst.store(ob + half_n * so, Complex::new(z.re - z.im, T::zero()));
    } else {
        let lo = src.load(ib);
        let hi = src.load(ib + half_n * si);
        dst.store(ob, Complex::new(lo.re + hi.re, lo.re - hi.re));
    }
}

/// One symmetric pair. Forward halves the even/odd split terms; inverse
/// keeps them unscaled and negates the twiddle real parts.
#[inline(always)]
fn butterfly<T: Float>(
    zp: Complex<T>,
    zq: Complex<T>,
    mut wp: Complex<T>,
    mut wq: Complex<T>,
    forward: bool,
) -> (Complex<T>, Complex<T>) {
    let mut u = Complex::new(zp.re + zq.re, zp.im - zq.im);
    let mut v = Complex::new(zp.re - zq.re, zp.im + zq.im);
    if forward {
        let half = T::from_f32(0.5);
        u = u.scale(half);
        v = v.scale(half);
    } else {
        wp.re = -wp.re;
        wq.re = -wq.re;
    }
    let op = Complex::new(
        u.re + v.re * wp.im + v.im * wp.re,
        u.im + v.im * wp.im - v.re * wp.re,
    );
    let oq = Complex::new(
        u.re - v.re * wq.im + v.im * wq.re,
        -u.im + v.im * wq.im + v.re * wq.re,
    );
    (op, oq)
}
