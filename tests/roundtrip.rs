//! End-to-end real FFT boundary pipeline, driven through plans with a
//! naive reference DFT standing in for the complex transform core.

use proptest::prelude::*;
use rcfft::{
    plan_node, ArrayType, BufferMut, BufferRef, Complex64, Descriptor, Direction, NodeBuffers,
    Op, Placement, Precision, TwiddleCache,
};

fn dft(input: &[Complex64], inverse: bool) -> Vec<Complex64> {
    let n = input.len();
    let sign = if inverse { 1.0 } else { -1.0 };
    (0..n)
        .map(|k| {
            let mut acc = Complex64::zero();
            for (j, &z) in input.iter().enumerate() {
                let ang = sign * 2.0 * std::f64::consts::PI * ((j * k) % n) as f64 / n as f64;
                acc = acc + z * Complex64::expi(ang);
            }
            acc
        })
        .collect()
}

/// Forward real transform of even length: even/odd packing, half-size
/// DFT, post-processing into `n/2 + 1` Hermitian bins.
fn real_forward(x: &[f64], cache: &mut TwiddleCache<f64>) -> Vec<Complex64> {
    assert_eq!(x.len() % 2, 0);
    let m = x.len() / 2;
    let packed: Vec<Complex64> = (0..m)
        .map(|j| Complex64::new(x[2 * j], x[2 * j + 1]))
        .collect();
    let z = dft(&packed, false);

    let mut desc = Descriptor::new_1d(m, Precision::Double);
    desc.o_dist = m + 1;
    desc.in_type = ArrayType::ComplexInterleaved;
    desc.out_type = ArrayType::HermitianInterleaved;
    let plan = plan_node(&desc, Op::RealEvenPost, cache).unwrap();
    let mut out = vec![Complex64::zero(); m + 1];
    plan.execute(NodeBuffers::OutOfPlace {
        input: BufferRef::Interleaved(&z),
        output: BufferMut::Interleaved(&mut out),
    })
    .unwrap();
    out
}

/// Inverse: pre-processing, half-size inverse DFT, de-interleave.
/// Unnormalized end to end, so the result carries a factor of `n`.
fn real_inverse(spectrum: &[Complex64], cache: &mut TwiddleCache<f64>) -> Vec<f64> {
    let m = spectrum.len() - 1;
    let mut desc = Descriptor::new_1d(m, Precision::Double);
    desc.i_dist = m + 1;
    desc.direction = Direction::Inverse;
    desc.in_type = ArrayType::HermitianInterleaved;
    desc.out_type = ArrayType::ComplexInterleaved;
    let plan = plan_node(&desc, Op::RealEvenPre, cache).unwrap();
    let mut packed = vec![Complex64::zero(); m];
    plan.execute(NodeBuffers::OutOfPlace {
        input: BufferRef::Interleaved(spectrum),
        output: BufferMut::Interleaved(&mut packed),
    })
    .unwrap();

    let w = dft(&packed, true);
    let mut x = vec![0.0f64; 2 * m];
    for (j, z) in w.iter().enumerate() {
        x[2 * j] = z.re;
        x[2 * j + 1] = z.im;
    }
    x
}

fn sample_signal(n: usize) -> Vec<f64> {
    use rand::{rngs::StdRng, Rng, SeedableRng};
    let mut rng = StdRng::seed_from_u64(n as u64);
    (0..n).map(|_| rng.gen_range(-1.0..1.0)).collect()
}

#[test]
fn forward_matches_full_dft() {
    for n in [8usize, 10, 16, 64] {
        let x = sample_signal(n);
        let mut cache = TwiddleCache::new();
        let got = real_forward(&x, &mut cache);
        let full: Vec<Complex64> = dft(
            &x.iter().map(|&v| Complex64::new(v, 0.0)).collect::<Vec<_>>(),
            false,
        );
        for k in 0..=n / 2 {
            assert!(
                (got[k].re - full[k].re).abs() < 1e-9 && (got[k].im - full[k].im).abs() < 1e-9,
                "n={n} k={k}: got {:?}, want {:?}",
                got[k],
                full[k]
            );
        }
    }
}

#[test]
fn roundtrip_scales_by_length() {
    for n in [8usize, 16, 30, 64] {
        let x = sample_signal(n);
        let mut cache = TwiddleCache::new();
        let spectrum = real_forward(&x, &mut cache);
        let back = real_inverse(&spectrum, &mut cache);
        for k in 0..n {
            assert!(
                (back[k] - n as f64 * x[k]).abs() < 1e-8,
                "n={n} k={k}: got {}, want {}",
                back[k],
                n as f64 * x[k]
            );
        }
    }
}

#[test]
fn dc_and_nyquist_are_purely_real() {
    let n = 32;
    let x = sample_signal(n);
    let mut cache = TwiddleCache::new();
    let spectrum = real_forward(&x, &mut cache);
    assert_eq!(spectrum[0].im, 0.0);
    assert_eq!(spectrum[n / 2].im, 0.0);

    // Constant input concentrates the whole sum at bin 0.
    let ones = vec![1.0f64; n];
    let spectrum = real_forward(&ones, &mut cache);
    assert!((spectrum[0].re - n as f64).abs() < 1e-9);
    for bin in &spectrum[1..] {
        assert!(bin.re.abs() < 1e-9 && bin.im.abs() < 1e-9);
    }
}

#[test]
fn in_place_plan_round_trips() {
    let n = 24;
    let m = n / 2;
    let x = sample_signal(n);
    let mut cache = TwiddleCache::new();
    let want = real_forward(&x, &mut cache);

    let packed: Vec<Complex64> = (0..m)
        .map(|j| Complex64::new(x[2 * j], x[2 * j + 1]))
        .collect();
    let mut buf = dft(&packed, false);
    buf.push(Complex64::zero()); // Nyquist slot

    let mut desc = Descriptor::new_1d(m, Precision::Double);
    desc.placement = Placement::InPlace;
    desc.i_dist = m + 1;
    desc.o_dist = m + 1;
    desc.in_type = ArrayType::ComplexInterleaved;
    desc.out_type = ArrayType::HermitianInterleaved;
    let plan = plan_node(&desc, Op::RealEvenPost, &mut cache).unwrap();
    plan.execute(NodeBuffers::InPlace(BufferMut::Interleaved(&mut buf)))
        .unwrap();

    for k in 0..=m {
        assert!(
            (buf[k].re - want[k].re).abs() < 1e-9 && (buf[k].im - want[k].im).abs() < 1e-9,
            "k={k}"
        );
    }
}

#[test]
fn single_precision_pipeline() {
    use rcfft::Complex32;

    let m = 8usize;
    let packed: Vec<Complex32> = (0..m)
        .map(|j| Complex32::new(j as f32 - 3.5, 0.25 * j as f32))
        .collect();
    // Reference through the f64 path.
    let packed64: Vec<Complex64> = packed
        .iter()
        .map(|z| Complex64::new(z.re as f64, z.im as f64))
        .collect();
    let z64 = dft(&packed64, false);

    let mut desc = Descriptor::new_1d(m, Precision::Single);
    desc.o_dist = m + 1;
    desc.in_type = ArrayType::ComplexInterleaved;
    desc.out_type = ArrayType::HermitianInterleaved;
    let mut cache = TwiddleCache::<f32>::new();
    let plan = plan_node(&desc, Op::RealEvenPost, &mut cache).unwrap();

    let z32: Vec<Complex32> = z64
        .iter()
        .map(|z| Complex32::new(z.re as f32, z.im as f32))
        .collect();
    let mut out32 = vec![Complex32::zero(); m + 1];
    plan.execute(NodeBuffers::OutOfPlace {
        input: BufferRef::Interleaved(&z32),
        output: BufferMut::Interleaved(&mut out32),
    })
    .unwrap();

    let mut cache64 = TwiddleCache::<f64>::new();
    let mut desc64 = desc.clone();
    desc64.precision = Precision::Double;
    let plan64 = plan_node(&desc64, Op::RealEvenPost, &mut cache64).unwrap();
    let mut out64 = vec![Complex64::zero(); m + 1];
    plan64
        .execute(NodeBuffers::OutOfPlace {
            input: BufferRef::Interleaved(&z64),
            output: BufferMut::Interleaved(&mut out64),
        })
        .unwrap();

    for k in 0..=m {
        assert!((out32[k].re as f64 - out64[k].re).abs() < 1e-3);
        assert!((out32[k].im as f64 - out64[k].im).abs() < 1e-3);
    }
}

proptest! {
    #[test]
    fn random_signals_round_trip(
        half in 2usize..40,
        seed in proptest::collection::vec(-1.0f64..1.0, 80),
    ) {
        let n = 2 * half;
        let x: Vec<f64> = seed.iter().cycle().take(n).copied().collect();
        let mut cache = TwiddleCache::new();
        let spectrum = real_forward(&x, &mut cache);
        let back = real_inverse(&spectrum, &mut cache);
        for k in 0..n {
            prop_assert!((back[k] - n as f64 * x[k]).abs() < 1e-8);
        }
    }
}
