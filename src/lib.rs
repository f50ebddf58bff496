//! # rcfft - Real/complex data-layout kernels for batched FFT pipelines
//!
//! The boundary stages a real-input FFT pipeline runs around its complex
//! transform core: real/complex embedding, Hermitian truncation,
//! even-length real pre/post-processing butterflies, real/imaginary pair
//! packing, and a descriptor-driven dispatch layer that plans them.
//!
//! ## Features
//!
//! - **Descriptor-driven planning**: strides, batch distances, array
//!   types, direction and placement validated up front; kernels never
//!   touch an element of an invalid configuration
//! - **Interleaved and planar storage** on every side, with Hermitian
//!   array types folding onto their complex storage class
//! - **In-place pre/post-processing** with the symmetric-pair ownership
//!   discipline, unit stride enforced
//! - **Pair packing**: two real signals through one complex transform
//! - **Twiddle planner cache** with LRU eviction and a two-level table
//!   for large lengths
//!
//! ## Cargo Features
//!
//! - `std` (default): standard library support
//! - `parallel`: batch-parallel embedding with Rayon
//! - `verbose-logging`: plan-resolution tracing through `log`
//! - `internal-tests`: expose cache introspection helpers
//!
//! ## Example
//!
//! ```
//! use rcfft::{
//!     plan_node, ArrayType, BufferMut, BufferRef, Complex64, Descriptor,
//!     NodeBuffers, Op, Precision, TwiddleCache,
//! };
//!
//! let mut desc = Descriptor::new_1d(4, Precision::Double);
//! desc.in_type = ArrayType::Real;
//! desc.out_type = ArrayType::ComplexInterleaved;
//!
//! let mut cache = TwiddleCache::<f64>::new();
//! let plan = plan_node(&desc, Op::RealToComplex, &mut cache)?;
//!
//! let input = [1.0, 2.0, 3.0, 4.0];
//! let mut output = [Complex64::zero(); 4];
//! plan.execute(NodeBuffers::OutOfPlace {
//!     input: BufferRef::Real(&input),
//!     output: BufferMut::Interleaved(&mut output),
//! })?;
//! assert_eq!(output[2], Complex64::new(3.0, 0.0));
//! # Ok::<(), rcfft::LayoutError>(())
//! ```
//!
//! ## License
//!
//! Licensed under either of
//! - Apache License, Version 2.0
//! - MIT license
//!
//! at your option.

#![no_std]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

/// Tagged buffer views over real, interleaved and planar storage.
pub mod buffer;
/// Transform descriptors, array types and the crate error type.
pub mod descriptor;
/// Descriptor classification, the dispatch table and plan execution.
pub mod dispatch;
/// Real/complex embedding and Hermitian truncation kernels.
pub mod embed;
/// Launch-geometry model and grid limits.
pub mod grid;
/// Float/complex primitives and layout-generic element access.
pub mod num;
/// Real/imaginary pair packing kernels.
pub mod pair;
/// Even-length real FFT pre/post-processing butterflies.
pub mod prepost;
/// Twiddle tables and the planner cache.
pub mod twiddle;

pub use buffer::{BufferMut, BufferRef, NodeBuffers};
pub use descriptor::{
    ArrayType, Descriptor, Direction, Layout, LayoutError, Placement, Precision,
};
pub use dispatch::{
    plan_node, resolve, DispatchKey, LayoutClass, LayoutPlan, Op, StrideClass, Variant,
};
pub use embed::{complex2hermitian, real2complex};
pub use grid::{Grid, BLOCK_SIZE, MAX_GRID_EXTENT};
pub use num::{Complex, Complex32, Complex64, Float, PlanarMut, PlanarRef};
pub use pair::{complex2pair_unpack, pair2complex_pack};
pub use prepost::{c2r_1d_pre, r2c_1d_post};
pub use twiddle::{
    build_table, TwiddleCache, TwiddleTable, LARGE_TWIDDLE_THRESHOLD, MAX_CACHE_ENTRIES,
};
