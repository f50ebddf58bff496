//! Twiddle tables for the real pre/post-processing butterflies.
//!
//! The butterflies over `half_n` consume `twd[k] = exp(-i*pi*k / half_n)`
//! for `k in 0..half_n`. Small lengths get one contiguous table; lengths
//! above [`LARGE_TWIDDLE_THRESHOLD`] are served by a two-level table of
//! coarse and fine factors so the working set stays bounded. Tables are
//! built by a planner cache with LRU eviction and shared via `Arc`.

use alloc::collections::VecDeque;
use alloc::sync::Arc;
use alloc::vec::Vec;

use hashbrown::HashMap;

use crate::descriptor::LayoutError;
use crate::num::{Complex, Float};

/// Maximum number of cached tables before the least recently used entry
/// is evicted.
pub const MAX_CACHE_ENTRIES: usize = 64;

/// Lengths at or above this use the two-level table.
pub const LARGE_TWIDDLE_THRESHOLD: usize = 4096;

/// Fine-table length of the two-level factorization.
pub(crate) const SPLIT_RADIX: usize = 256;

/// A twiddle table for one `half_n`, either contiguous or factored into
/// coarse and fine levels.
#[derive(Debug, Clone)]
pub enum TwiddleTable<T: Float> {
    Direct(Arc<[Complex<T>]>),
    Split {
        /// `exp(-i*pi * (j * SPLIT_RADIX) / half_n)` per coarse step.
        coarse: Arc<[Complex<T>]>,
        /// `exp(-i*pi * k / half_n)` for `k < SPLIT_RADIX`.
        fine: Arc<[Complex<T>]>,
    },
}

impl<T: Float> TwiddleTable<T> {
    /// `exp(-i*pi*k / half_n)`. `k` must be below `half_n`.
    #[inline(always)]
    pub fn at(&self, k: usize) -> Complex<T> {
        match self {
            Self::Direct(table) => table[k],
            Self::Split { coarse, fine } => coarse[k / SPLIT_RADIX] * fine[k % SPLIT_RADIX],
        }
    }

    pub fn is_split(&self) -> bool {
        matches!(self, Self::Split { .. })
    }
}

fn unit_angle<T: Float>(half_n: usize) -> Result<T, LayoutError> {
    let denom = T::from_usize(half_n).ok_or(LayoutError::InvalidValue)?;
    Ok(-T::pi() / denom)
}

fn build_direct<T: Float>(half_n: usize) -> Result<Arc<[Complex<T>]>, LayoutError> {
    let step = unit_angle::<T>(half_n)?;
    let mut table = Vec::with_capacity(half_n);
    for k in 0..half_n {
        let kf = T::from_usize(k).ok_or(LayoutError::InvalidValue)?;
        table.push(Complex::expi(step * kf));
    }
    Ok(table.into())
}

fn build_split<T: Float>(
    half_n: usize,
) -> Result<(Arc<[Complex<T>]>, Arc<[Complex<T>]>), LayoutError> {
    let step = unit_angle::<T>(half_n)?;
    let coarse_len = half_n.div_ceil(SPLIT_RADIX);
    let mut coarse = Vec::with_capacity(coarse_len);
    for j in 0..coarse_len {
        let kf = T::from_usize(j * SPLIT_RADIX).ok_or(LayoutError::InvalidValue)?;
        coarse.push(Complex::expi(step * kf));
    }
    let mut fine = Vec::with_capacity(SPLIT_RADIX);
    for k in 0..SPLIT_RADIX.min(half_n) {
        let kf = T::from_usize(k).ok_or(LayoutError::InvalidValue)?;
        fine.push(Complex::expi(step * kf));
    }
    Ok((coarse.into(), fine.into()))
}

/// Build the table for one `half_n` without caching.
pub fn build_table<T: Float>(half_n: usize) -> Result<TwiddleTable<T>, LayoutError> {
    if half_n == 0 {
        return Err(LayoutError::EmptyLength);
    }
    if half_n >= LARGE_TWIDDLE_THRESHOLD {
        let (coarse, fine) = build_split(half_n)?;
        Ok(TwiddleTable::Split { coarse, fine })
    } else {
        Ok(TwiddleTable::Direct(build_direct(half_n)?))
    }
}

/// Planner cache of twiddle tables keyed by `half_n`, LRU-bounded by
/// [`MAX_CACHE_ENTRIES`].
#[derive(Debug, Default)]
pub struct TwiddleCache<T: Float> {
    tables: HashMap<usize, TwiddleTable<T>>,
    order: VecDeque<usize>,
}

impl<T: Float> TwiddleCache<T> {
    pub fn new() -> Self {
        Self {
            tables: HashMap::new(),
            order: VecDeque::new(),
        }
    }

    /// Fetch or build the table for `half_n`, refreshing its LRU slot.
    pub fn get_table(&mut self, half_n: usize) -> Result<TwiddleTable<T>, LayoutError> {
        if let Some(table) = self.tables.get(&half_n) {
            let table = table.clone();
            self.touch(half_n);
            return Ok(table);
        }
        let table = build_table(half_n)?;
        if self.tables.len() == MAX_CACHE_ENTRIES {
            if let Some(oldest) = self.order.pop_front() {
                self.tables.remove(&oldest);
            }
        }
        self.tables.insert(half_n, table.clone());
        self.order.push_back(half_n);
        Ok(table)
    }

    fn touch(&mut self, half_n: usize) {
        if let Some(pos) = self.order.iter().position(|&k| k == half_n) {
            self.order.remove(pos);
            self.order.push_back(half_n);
        }
    }

    #[cfg(any(test, feature = "internal-tests"))]
    pub fn cached_len(&self) -> usize {
        self.tables.len()
    }

    #[cfg(any(test, feature = "internal-tests"))]
    pub fn contains(&self, half_n: usize) -> bool {
        self.tables.contains_key(&half_n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_twiddle(k: usize, half_n: usize) -> Complex<f64> {
        Complex::expi(-core::f64::consts::PI * k as f64 / half_n as f64)
    }

    #[test]
    fn direct_table_matches_reference() {
        let table = build_table::<f64>(16).unwrap();
        assert!(!table.is_split());
        for k in 0..16 {
            let want = reference_twiddle(k, 16);
            let got = table.at(k);
            assert!((got.re - want.re).abs() < 1e-12, "k={k}");
            assert!((got.im - want.im).abs() < 1e-12, "k={k}");
        }
    }

    #[test]
    fn split_table_matches_direct_values() {
        let half_n = LARGE_TWIDDLE_THRESHOLD;
        let table = build_table::<f64>(half_n).unwrap();
        assert!(table.is_split());
        for &k in &[0, 1, 255, 256, 257, 1023, half_n - 1] {
            let want = reference_twiddle(k, half_n);
            let got = table.at(k);
            assert!((got.re - want.re).abs() < 1e-10, "k={k}");
            assert!((got.im - want.im).abs() < 1e-10, "k={k}");
        }
    }

    #[test]
    fn cache_reuses_allocations() {
        let mut cache = TwiddleCache::<f32>::new();
        let a = cache.get_table(32).unwrap();
        let b = cache.get_table(32).unwrap();
        match (a, b) {
            (TwiddleTable::Direct(x), TwiddleTable::Direct(y)) => {
                assert!(Arc::ptr_eq(&x, &y));
            }
            _ => panic!("expected direct tables"),
        }
        assert_eq!(cache.cached_len(), 1);
    }

    #[test]
    fn cache_evicts_least_recently_used() {
        let mut cache = TwiddleCache::<f32>::new();
        for n in 1..=MAX_CACHE_ENTRIES {
            cache.get_table(2 * n).unwrap();
        }
        assert_eq!(cache.cached_len(), MAX_CACHE_ENTRIES);
        // Refresh the oldest entry, then insert one more.
        cache.get_table(2).unwrap();
        cache.get_table(2 * (MAX_CACHE_ENTRIES + 1)).unwrap();
        assert_eq!(cache.cached_len(), MAX_CACHE_ENTRIES);
        assert!(cache.contains(2));
        assert!(!cache.contains(4));
    }

    #[test]
    fn zero_length_rejected() {
        assert!(matches!(
            build_table::<f32>(0),
            Err(LayoutError::EmptyLength)
        ));
    }
}
