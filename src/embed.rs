//! Real/complex embedding and Hermitian truncation kernels.
//!
//! `real2complex` widens a real signal into complex storage with exactly
//! zero imaginary parts, the zero-pad step in front of a complex
//! transform of real data. `complex2hermitian` is the companion
//! truncating copy that keeps the first `floor(N/2)+1` bins of a full
//! complex spectrum. Both walk the `(batch, high, tid)` grid with
//! independent input and output geometries, so arbitrary strides and
//! batch distances are supported. With the `parallel` feature the packed
//! interleaved embedding runs its batch axis under rayon.

use crate::buffer::{BufferMut, BufferRef};
use crate::descriptor::{Descriptor, LayoutError, Placement, RowGeom};
use crate::grid::Grid;
use crate::num::{Complex, ComplexSink, ComplexSource, Float};

#[cfg(feature = "parallel")]
const PARALLEL_BATCH_MIN: usize = 8;
#[cfg(feature = "parallel")]
const PARALLEL_MIN_SAMPLES: usize = 32_768;

/// Copy a real signal into complex storage, imaginary parts zero.
/// Out-of-place only; the output may be interleaved or planar.
pub fn real2complex<T: Float>(
    desc: &Descriptor,
    input: BufferRef<'_, T>,
    mut output: BufferMut<'_, T>,
) -> Result<(), LayoutError> {
    desc.validate()?;
    if desc.placement != Placement::OutOfPlace {
        return Err(LayoutError::UnsupportedPlacement);
    }
    let n = desc.length[0];
    let high = desc.high_dimension();
    let grid = Grid::for_samples(n, high, desc.batch)?;
    let ig = desc.in_geom();
    let og = desc.out_geom();
    input.check_span(ig, n, high, desc.batch)?;
    output.check_span(og, n, high, desc.batch)?;

    let src = match input {
        BufferRef::Real(s) => s,
        _ => return Err(LayoutError::UnsupportedLayout),
    };
    match output {
        BufferMut::Interleaved(out) => {
            #[cfg(feature = "parallel")]
            if embed_batches_parallel(desc, n, src, out) {
                return Ok(());
            }
            embed_rows(&grid, n, src, ig, out, og);
        }
        BufferMut::Planar(ref mut p) => embed_rows(&grid, n, src, ig, p, og),
        BufferMut::Real(_) => return Err(LayoutError::UnsupportedLayout),
    }
    Ok(())
}

/// Truncating copy of the first `floor(N/2)+1` complex elements per row.
/// Elements past that bound are neither read nor written.
pub fn complex2hermitian<T: Float>(
    desc: &Descriptor,
    input: BufferRef<'_, T>,
    mut output: BufferMut<'_, T>,
) -> Result<(), LayoutError> {
    desc.validate()?;
    if desc.placement != Placement::OutOfPlace {
        return Err(LayoutError::UnsupportedPlacement);
    }
    let m = desc.hermitian_len();
    let high = desc.high_dimension();
    let grid = Grid::for_samples(m, high, desc.batch)?;
    let ig = desc.in_geom();
    let og = desc.out_geom();
    input.check_span(ig, m, high, desc.batch)?;
    output.check_span(og, m, high, desc.batch)?;

    match input {
        BufferRef::Interleaved(src) => truncate_into(&grid, m, src, ig, &mut output, og),
        BufferRef::Planar(ref p) => truncate_into(&grid, m, p, ig, &mut output, og),
        BufferRef::Real(_) => Err(LayoutError::UnsupportedLayout),
    }
}

fn embed_rows<T: Float, D: ComplexSink<T> + ?Sized>(
    grid: &Grid,
    n: usize,
    src: &[T],
    ig: RowGeom,
    dst: &mut D,
    og: RowGeom,
) {
    for (b, h) in grid.tiles() {
        let ib = ig.offset(b, h);
        let ob = og.offset(b, h);
        for tid in 0..n {
            let v = src[ib + tid * ig.stride0];
            dst.store(ob + tid * og.stride0, Complex::new(v, T::zero()));
        }
    }
}

fn truncate_into<T: Float, S: ComplexSource<T> + ?Sized>(
    grid: &Grid,
    m: usize,
    src: &S,
    ig: RowGeom,
    output: &mut BufferMut<'_, T>,
    og: RowGeom,
) -> Result<(), LayoutError> {
    match output {
        BufferMut::Interleaved(dst) => {
            copy_rows(grid, m, src, ig, &mut **dst, og);
            Ok(())
        }
        BufferMut::Planar(p) => {
            copy_rows(grid, m, src, ig, p, og);
            Ok(())
        }
        BufferMut::Real(_) => Err(LayoutError::UnsupportedLayout),
    }
}

fn copy_rows<T: Float, S: ComplexSource<T> + ?Sized, D: ComplexSink<T> + ?Sized>(
    grid: &Grid,
    m: usize,
    src: &S,
    ig: RowGeom,
    dst: &mut D,
    og: RowGeom,
) {
    for (b, h) in grid.tiles() {
        let ib = ig.offset(b, h);
        let ob = og.offset(b, h);
        for tid in 0..m {
            dst.store(ob + tid * og.stride0, src.load(ib + tid * ig.stride0));
        }
    }
}

/// Batch-parallel path for packed rank-1 interleaved output. Returns
/// `false` when the layout or workload does not qualify.
#[cfg(feature = "parallel")]
fn embed_batches_parallel<T: Float>(
    desc: &Descriptor,
    n: usize,
    src: &[T],
    out: &mut [Complex<T>],
) -> bool {
    use rayon::prelude::*;

    let packed = desc.rank() == 1
        && desc.unit_stride()
        && desc.i_dist >= n
        && desc.o_dist >= n
        && src.len() == desc.batch * desc.i_dist
        && out.len() == desc.batch * desc.o_dist;
    if !packed || desc.batch < PARALLEL_BATCH_MIN || n * desc.batch < PARALLEL_MIN_SAMPLES {
        return false;
    }
    src.par_chunks_exact(desc.i_dist)
        .zip(out.par_chunks_exact_mut(desc.o_dist))
        .for_each(|(irow, orow)| {
            for (o, &v) in orow[..n].iter_mut().zip(&irow[..n]) {
                *o = Complex::new(v, T::zero());
            }
        });
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{ArrayType, Precision};
    use crate::num::{Complex64, PlanarMut, PlanarRef};
    use alloc::vec;
    use alloc::vec::Vec;

    #[test]
    fn ramp_embeds_with_zero_imaginary() {
        let mut desc = Descriptor::new_1d(8, Precision::Double);
        desc.in_type = ArrayType::Real;
        desc.out_type = ArrayType::ComplexInterleaved;
        let input: Vec<f64> = (0..8).map(|k| k as f64).collect();
        let mut output = vec![Complex64::new(-1.0, -1.0); 8];
        real2complex(
            &desc,
            BufferRef::Real(&input),
            BufferMut::Interleaved(&mut output),
        )
        .unwrap();
        for (k, c) in output.iter().enumerate() {
            assert_eq!(*c, Complex64::new(k as f64, 0.0));
        }
    }

    #[test]
    fn strided_batched_embed_targets_planar() {
        // Two batches, input stride 2, planar output with a gap row.
        let mut desc = Descriptor::new_1d(4, Precision::Double);
        desc.in_stride = vec![2];
        desc.i_dist = 8;
        desc.o_dist = 5;
        desc.batch = 2;
        desc.in_type = ArrayType::Real;
        desc.out_type = ArrayType::ComplexPlanar;
        let input: Vec<f64> = (0..16).map(|k| k as f64).collect();
        let mut re = vec![0.0f64; 10];
        let mut im = vec![9.0f64; 10];
        real2complex(
            &desc,
            BufferRef::Real(&input),
            BufferMut::Planar(PlanarMut::new(&mut re, &mut im)),
        )
        .unwrap();
        assert_eq!(&re[..4], &[0.0, 2.0, 4.0, 6.0]);
        assert_eq!(&re[5..9], &[8.0, 10.0, 12.0, 14.0]);
        assert!(im[..4].iter().all(|&v| v == 0.0));
        assert!(im[5..9].iter().all(|&v| v == 0.0));
        // Gap slots untouched.
        assert_eq!(im[4], 9.0);
        assert_eq!(im[9], 9.0);
    }

    #[test]
    fn short_input_is_rejected_before_writing() {
        let mut desc = Descriptor::new_1d(8, Precision::Double);
        desc.in_type = ArrayType::Real;
        desc.out_type = ArrayType::ComplexInterleaved;
        let input = vec![0.0f64; 7];
        let mut output = vec![Complex64::zero(); 8];
        assert_eq!(
            real2complex(
                &desc,
                BufferRef::Real(&input),
                BufferMut::Interleaved(&mut output)
            ),
            Err(LayoutError::MismatchedLengths)
        );
    }

    #[test]
    fn hermitian_truncation_copies_half_plus_one() {
        let mut desc = Descriptor::new_1d(8, Precision::Double);
        desc.o_dist = 5;
        desc.in_type = ArrayType::ComplexInterleaved;
        desc.out_type = ArrayType::HermitianInterleaved;
        let input: Vec<Complex64> = (0..8)
            .map(|k| Complex64::new(k as f64, -(k as f64)))
            .collect();
        let mut output = vec![Complex64::new(7.0, 7.0); 5];
        complex2hermitian(
            &desc,
            BufferRef::Interleaved(&input),
            BufferMut::Interleaved(&mut output),
        )
        .unwrap();
        for k in 0..5 {
            assert_eq!(output[k], input[k]);
        }
    }

    #[test]
    fn hermitian_truncation_planar_to_interleaved() {
        let mut desc = Descriptor::new_1d(6, Precision::Double);
        desc.o_dist = 4;
        desc.in_type = ArrayType::ComplexPlanar;
        desc.out_type = ArrayType::HermitianInterleaved;
        let re: Vec<f64> = (0..6).map(|k| k as f64).collect();
        let im: Vec<f64> = (0..6).map(|k| 10.0 + k as f64).collect();
        let mut output = vec![Complex64::zero(); 4];
        complex2hermitian(
            &desc,
            BufferRef::Planar(PlanarRef::new(&re, &im)),
            BufferMut::Interleaved(&mut output),
        )
        .unwrap();
        for k in 0..4 {
            assert_eq!(output[k], Complex64::new(k as f64, 10.0 + k as f64));
        }
    }

    #[test]
    fn truncation_never_reads_past_hermitian_span() {
        // Input slice holds exactly m elements per batch row; a full-length
        // read would be out of bounds and the span check would reject it.
        let mut desc = Descriptor::new_1d(8, Precision::Double);
        desc.i_dist = 5;
        desc.o_dist = 5;
        desc.batch = 2;
        desc.in_type = ArrayType::ComplexInterleaved;
        desc.out_type = ArrayType::HermitianInterleaved;
        let input = vec![Complex64::new(1.0, 2.0); 10];
        let mut output = vec![Complex64::zero(); 10];
        complex2hermitian(
            &desc,
            BufferRef::Interleaved(&input),
            BufferMut::Interleaved(&mut output),
        )
        .unwrap();
        assert!(output.iter().all(|c| *c == Complex64::new(1.0, 2.0)));
    }

    #[test]
    fn real_output_layout_is_rejected() {
        let mut desc = Descriptor::new_1d(4, Precision::Double);
        desc.in_type = ArrayType::Real;
        desc.out_type = ArrayType::Real;
        let input = vec![0.0f64; 4];
        let mut output = vec![0.0f64; 4];
        assert_eq!(
            real2complex(
                &desc,
                BufferRef::Real(&input),
                BufferMut::Real(&mut output)
            ),
            Err(LayoutError::UnsupportedLayout)
        );
    }
}
