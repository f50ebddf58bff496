//! Scalar and complex primitives shared by every kernel.
//!
//! [`Float`] abstracts over `f32`/`f64`, with trigonometry routed through
//! `libm` so the crate builds without `std`. [`Complex`] is a plain
//! re/im pair. [`PlanarRef`]/[`PlanarMut`] view a complex sequence stored
//! as two separate real arrays, and the [`ComplexSource`]/[`ComplexSink`]
//! traits let the kernels address interleaved and planar storage through
//! one code path.

use crate::descriptor::Precision;

/// Minimal float trait for the layout kernels (`no_std`, `libm`-backed).
pub trait Float:
    Copy
    + Clone
    + PartialEq
    + PartialOrd
    + core::fmt::Debug
    + core::ops::Add<Output = Self>
    + core::ops::Sub<Output = Self>
    + core::ops::Mul<Output = Self>
    + core::ops::Div<Output = Self>
    + core::ops::Neg<Output = Self>
    + Send
    + Sync
    + 'static
{
    /// Precision tag matching [`crate::descriptor::Precision`].
    const PRECISION: Precision;

    fn zero() -> Self;
    fn one() -> Self;
    fn from_f32(x: f32) -> Self;
    /// Convert a `usize`, or `None` when it is not exactly representable.
    fn from_usize(x: usize) -> Option<Self>;
    fn sin_cos(self) -> (Self, Self);
    fn pi() -> Self;
}

impl Float for f32 {
    const PRECISION: Precision = Precision::Single;

    fn zero() -> Self {
        0.0
    }
    fn one() -> Self {
        1.0
    }
    fn from_f32(x: f32) -> Self {
        x
    }
    fn from_usize(x: usize) -> Option<Self> {
        const MAX_EXACT: usize = 1 << 24;
        if x <= MAX_EXACT {
            Some(x as f32)
        } else {
            None
        }
    }
    fn sin_cos(self) -> (Self, Self) {
        libm::sincosf(self)
    }
    fn pi() -> Self {
        core::f32::consts::PI
    }
}

impl Float for f64 {
    const PRECISION: Precision = Precision::Double;

    fn zero() -> Self {
        0.0
    }
    fn one() -> Self {
        1.0
    }
    fn from_f32(x: f32) -> Self {
        x as f64
    }
    fn from_usize(x: usize) -> Option<Self> {
        const MAX_EXACT: usize = 1 << 53;
        if x <= MAX_EXACT {
            Some(x as f64)
        } else {
            None
        }
    }
    fn sin_cos(self) -> (Self, Self) {
        libm::sincos(self)
    }
    fn pi() -> Self {
        core::f64::consts::PI
    }
}

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Complex<T: Float> {
    pub re: T,
    pub im: T,
}

impl<T: Float> Complex<T> {
    #[inline(always)]
    pub fn new(re: T, im: T) -> Self {
        Self { re, im }
    }

    #[inline(always)]
    pub fn zero() -> Self {
        Self {
            re: T::zero(),
            im: T::zero(),
        }
    }

    /// `exp(i * theta)` as a point on the unit circle.
    #[inline(always)]
    pub fn expi(theta: T) -> Self {
        let (sin, cos) = theta.sin_cos();
        Self { re: cos, im: sin }
    }

    #[inline(always)]
    pub fn conj(self) -> Self {
        Self {
            re: self.re,
            im: -self.im,
        }
    }

    #[inline(always)]
    pub fn scale(self, s: T) -> Self {
        Self {
            re: self.re * s,
            im: self.im * s,
        }
    }
}

impl<T: Float> core::ops::Add for Complex<T> {
    type Output = Self;
    #[inline(always)]
    fn add(self, other: Self) -> Self {
        Self {
            re: self.re + other.re,
            im: self.im + other.im,
        }
    }
}

impl<T: Float> core::ops::Sub for Complex<T> {
    type Output = Self;
    #[inline(always)]
    fn sub(self, other: Self) -> Self {
        Self {
            re: self.re - other.re,
            im: self.im - other.im,
        }
    }
}

impl<T: Float> core::ops::Mul for Complex<T> {
    type Output = Self;
    #[inline(always)]
    fn mul(self, other: Self) -> Self {
        Self {
            re: self.re * other.re - self.im * other.im,
            im: self.re * other.im + self.im * other.re,
        }
    }
}

impl<T: Float> core::ops::Neg for Complex<T> {
    type Output = Self;
    #[inline(always)]
    fn neg(self) -> Self {
        Self {
            re: -self.re,
            im: -self.im,
        }
    }
}

pub type Complex32 = Complex<f32>;
pub type Complex64 = Complex<f64>;

/// Immutable planar (split re/im) view over a complex sequence.
#[derive(Debug)]
pub struct PlanarRef<'a, T: Float> {
    pub re: &'a [T],
    pub im: &'a [T],
}

impl<'a, T: Float> PlanarRef<'a, T> {
    /// Both halves must have the same length.
    pub fn new(re: &'a [T], im: &'a [T]) -> Self {
        assert_eq!(re.len(), im.len());
        Self { re, im }
    }
}

/// Mutable planar (split re/im) view over a complex sequence.
#[derive(Debug)]
pub struct PlanarMut<'a, T: Float> {
    pub re: &'a mut [T],
    pub im: &'a mut [T],
}

impl<'a, T: Float> PlanarMut<'a, T> {
    /// Both halves must have the same length.
    pub fn new(re: &'a mut [T], im: &'a mut [T]) -> Self {
        assert_eq!(re.len(), im.len());
        Self { re, im }
    }
}

/// Read access to complex elements regardless of storage layout.
pub trait ComplexSource<T: Float> {
    fn load(&self, idx: usize) -> Complex<T>;
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Write access to complex elements regardless of storage layout.
pub trait ComplexSink<T: Float>: ComplexSource<T> {
    fn store(&mut self, idx: usize, value: Complex<T>);
}

impl<T: Float> ComplexSource<T> for [Complex<T>] {
    #[inline(always)]
    fn load(&self, idx: usize) -> Complex<T> {
        self[idx]
    }
    #[inline(always)]
    fn len(&self) -> usize {
        <[Complex<T>]>::len(self)
    }
}

impl<T: Float> ComplexSink<T> for [Complex<T>] {
    #[inline(always)]
    fn store(&mut self, idx: usize, value: Complex<T>) {
        self[idx] = value;
    }
}

impl<T: Float> ComplexSource<T> for PlanarRef<'_, T> {
    #[inline(always)]
    fn load(&self, idx: usize) -> Complex<T> {
        Complex::new(self.re[idx], self.im[idx])
    }
    #[inline(always)]
    fn len(&self) -> usize {
        self.re.len()
    }
}

impl<T: Float> ComplexSource<T> for PlanarMut<'_, T> {
    #[inline(always)]
    fn load(&self, idx: usize) -> Complex<T> {
        Complex::new(self.re[idx], self.im[idx])
    }
    #[inline(always)]
    fn len(&self) -> usize {
        self.re.len()
    }
}

impl<T: Float> ComplexSink<T> for PlanarMut<'_, T> {
    #[inline(always)]
    fn store(&mut self, idx: usize, value: Complex<T>) {
        self.re[idx] = value.re;
        self.im[idx] = value.im;
    }
}
