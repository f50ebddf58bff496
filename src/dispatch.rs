//! Descriptor-driven kernel dispatch.
//!
//! A [`DispatchKey`] classifies a descriptor along the axes that select a
//! kernel variant: placement, innermost stride class, direction, and the
//! physical layout of each side (Hermitian array types fold onto their
//! complex storage class). A static table maps every supported key to
//! exactly one [`Variant`]; anything absent from the table is a typed
//! configuration error rather than a silent fall-through.
//!
//! [`plan_node`] resolves the variant, checks precision, computes the
//! launch grid and pulls twiddle tables from the planner cache once, at
//! plan-build time. The returned [`LayoutPlan`] holds a kernel function
//! reference that [`LayoutPlan::execute`] invokes directly.

use crate::buffer::NodeBuffers;
use crate::descriptor::{
    ArrayType, Descriptor, Direction, Layout, LayoutError, Placement,
};
use crate::grid::Grid;
use crate::num::Float;
use crate::twiddle::{TwiddleCache, TwiddleTable};
use crate::{embed, pair, prepost};

/// The layout operations this crate plans and executes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    /// Widen a real signal into complex storage.
    RealToComplex,
    /// Truncate a full complex spectrum to its Hermitian half.
    ComplexToHermitian,
    /// Even-length real post-processing after a forward half transform.
    RealEvenPost,
    /// Even-length real pre-processing before an inverse half transform.
    RealEvenPre,
    /// Split a packed pair spectrum into two Hermitian spectra.
    PairUnpack,
    /// Rebuild a packed pair spectrum from two Hermitian spectra.
    PairPack,
}

/// Innermost-stride classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrideClass {
    Unit,
    NonUnit,
}

/// Physical storage class of a complex operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayoutClass {
    Interleaved,
    Planar,
}

/// Kernel variant a key resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    OutOfPlaceForward,
    OutOfPlaceInverse,
    InPlaceForward,
    InPlaceInverse,
}

/// Classification axes of one descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DispatchKey {
    pub placement: Placement,
    pub stride: StrideClass,
    pub direction: Direction,
    pub input: LayoutClass,
    pub output: LayoutClass,
}

impl DispatchKey {
    /// Classify a descriptor for `op`. The embedding op has one complex
    /// side; its class fills both layout axes.
    pub fn for_op(desc: &Descriptor, op: Op) -> Result<Self, LayoutError> {
        let stride = if desc.unit_stride() {
            StrideClass::Unit
        } else {
            StrideClass::NonUnit
        };
        let (input, output) = match op {
            Op::RealToComplex => {
                if desc.in_type != ArrayType::Real {
                    return Err(LayoutError::UnsupportedLayout);
                }
                let c = complex_class(desc.out_type)?;
                (c, c)
            }
            _ => (
                complex_class(desc.in_type)?,
                complex_class(desc.out_type)?,
            ),
        };
        Ok(Self {
            placement: desc.placement,
            stride,
            direction: desc.direction,
            input,
            output,
        })
    }
}

fn complex_class(ty: ArrayType) -> Result<LayoutClass, LayoutError> {
    match ty.layout() {
        Some(Layout::Interleaved) => Ok(LayoutClass::Interleaved),
        Some(Layout::Planar) => Ok(LayoutClass::Planar),
        Some(Layout::Real) | None => Err(LayoutError::UnsupportedLayout),
    }
}

const fn entry(
    placement: Placement,
    stride: StrideClass,
    direction: Direction,
    input: LayoutClass,
    output: LayoutClass,
    variant: Variant,
) -> (DispatchKey, Variant) {
    (
        DispatchKey {
            placement,
            stride,
            direction,
            input,
            output,
        },
        variant,
    )
}

use Direction::{Forward, Inverse};
use LayoutClass::{Interleaved, Planar};
use Placement::{InPlace, OutOfPlace};
use StrideClass::{NonUnit, Unit};
use Variant::{InPlaceForward, InPlaceInverse, OutOfPlaceForward, OutOfPlaceInverse};

/// Every supported key, exactly once. Out-of-place covers all
/// stride/direction/layout combinations; in-place covers unit-stride
/// matching-layout combinations only.
static DISPATCH_TABLE: &[(DispatchKey, Variant)] = &[
    entry(OutOfPlace, Unit, Forward, Interleaved, Interleaved, OutOfPlaceForward),
    entry(OutOfPlace, Unit, Forward, Interleaved, Planar, OutOfPlaceForward),
    entry(OutOfPlace, Unit, Forward, Planar, Interleaved, OutOfPlaceForward),
    entry(OutOfPlace, Unit, Forward, Planar, Planar, OutOfPlaceForward),
    entry(OutOfPlace, Unit, Inverse, Interleaved, Interleaved, OutOfPlaceInverse),
    entry(OutOfPlace, Unit, Inverse, Interleaved, Planar, OutOfPlaceInverse),
    entry(OutOfPlace, Unit, Inverse, Planar, Interleaved, OutOfPlaceInverse),
    entry(OutOfPlace, Unit, Inverse, Planar, Planar, OutOfPlaceInverse),
    entry(OutOfPlace, NonUnit, Forward, Interleaved, Interleaved, OutOfPlaceForward),
    entry(OutOfPlace, NonUnit, Forward, Interleaved, Planar, OutOfPlaceForward),
    entry(OutOfPlace, NonUnit, Forward, Planar, Interleaved, OutOfPlaceForward),
    entry(OutOfPlace, NonUnit, Forward, Planar, Planar, OutOfPlaceForward),
    entry(OutOfPlace, NonUnit, Inverse, Interleaved, Interleaved, OutOfPlaceInverse),
    entry(OutOfPlace, NonUnit, Inverse, Interleaved, Planar, OutOfPlaceInverse),
    entry(OutOfPlace, NonUnit, Inverse, Planar, Interleaved, OutOfPlaceInverse),
    entry(OutOfPlace, NonUnit, Inverse, Planar, Planar, OutOfPlaceInverse),
    entry(InPlace, Unit, Forward, Interleaved, Interleaved, InPlaceForward),
    entry(InPlace, Unit, Forward, Planar, Planar, InPlaceForward),
    entry(InPlace, Unit, Inverse, Interleaved, Interleaved, InPlaceInverse),
    entry(InPlace, Unit, Inverse, Planar, Planar, InPlaceInverse),
];

/// Resolve a key against the table. Unsupported in-place strides report
/// `NonUnitStride`; every other miss is `UnsupportedLayout`.
pub fn resolve(key: DispatchKey) -> Result<Variant, LayoutError> {
    let mut found = None;
    for (k, v) in DISPATCH_TABLE {
        if *k == key {
            debug_assert!(found.is_none(), "duplicate dispatch entry");
            found = Some(*v);
        }
    }
    found.ok_or({
        if key.placement == InPlace && key.stride == NonUnit {
            LayoutError::NonUnitStride
        } else {
            LayoutError::UnsupportedLayout
        }
    })
}

type KernelFn<T> = fn(&LayoutPlan<T>, NodeBuffers<'_, T>) -> Result<(), LayoutError>;

/// A resolved, executable layout operation: descriptor, variant, launch
/// grid, and (for the pre/post ops) the twiddle table, all fixed at plan
/// time.
pub struct LayoutPlan<T: Float> {
    desc: Descriptor,
    op: Op,
    variant: Variant,
    grid: Grid,
    twiddles: Option<TwiddleTable<T>>,
    large: bool,
    kernel: KernelFn<T>,
}

impl<T: Float> core::fmt::Debug for LayoutPlan<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LayoutPlan")
            .field("op", &self.op)
            .field("variant", &self.variant)
            .field("grid", &self.grid)
            .field("large", &self.large)
            .finish()
    }
}

fn required_direction(op: Op) -> Direction {
    match op {
        Op::RealToComplex | Op::ComplexToHermitian | Op::RealEvenPost | Op::PairUnpack => Forward,
        Op::RealEvenPre | Op::PairPack => Inverse,
    }
}

fn allows_in_place(op: Op) -> bool {
    matches!(op, Op::RealEvenPost | Op::RealEvenPre)
}

/// Build a plan for `op` over `desc`, pulling twiddle tables from
/// `cache` where the op needs them.
pub fn plan_node<T: Float>(
    desc: &Descriptor,
    op: Op,
    cache: &mut TwiddleCache<T>,
) -> Result<LayoutPlan<T>, LayoutError> {
    desc.validate()?;
    if desc.precision != T::PRECISION {
        return Err(LayoutError::PrecisionMismatch);
    }
    if desc.direction != required_direction(op) {
        return Err(LayoutError::InvalidValue);
    }
    if desc.placement == InPlace && !allows_in_place(op) {
        return Err(LayoutError::UnsupportedPlacement);
    }
    let key = DispatchKey::for_op(desc, op)?;
    let variant = resolve(key)?;
    let samples = match op {
        Op::RealToComplex => desc.length[0],
        _ => desc.length[0] / 2 + 1,
    };
    let grid = Grid::for_samples(samples, desc.high_dimension(), desc.batch)?;
    let twiddles = match op {
        Op::RealEvenPost | Op::RealEvenPre => Some(cache.get_table(desc.length[0])?),
        _ => None,
    };
    let large = twiddles.as_ref().map_or(false, TwiddleTable::is_split);
    #[cfg(feature = "verbose-logging")]
    log::trace!("planned {op:?} as {variant:?}, grid {grid:?}, large={large}");
    Ok(LayoutPlan {
        desc: desc.clone(),
        op,
        variant,
        grid,
        twiddles,
        large,
        kernel: kernel_for(op),
    })
}

impl<T: Float> LayoutPlan<T> {
    /// Run the planned kernel over one operand set.
    pub fn execute(&self, buffers: NodeBuffers<'_, T>) -> Result<(), LayoutError> {
        (self.kernel)(self, buffers)
    }

    pub fn op(&self) -> Op {
        self.op
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    /// Whether the twiddle table uses the two-level large form.
    pub fn is_large(&self) -> bool {
        self.large
    }

    pub fn descriptor(&self) -> &Descriptor {
        &self.desc
    }
}

fn kernel_for<T: Float>(op: Op) -> KernelFn<T> {
    match op {
        Op::RealToComplex => exec_real2complex,
        Op::ComplexToHermitian => exec_complex2hermitian,
        Op::RealEvenPost => exec_post,
        Op::RealEvenPre => exec_pre,
        Op::PairUnpack => exec_unpack,
        Op::PairPack => exec_pack,
    }
}

fn exec_real2complex<T: Float>(
    plan: &LayoutPlan<T>,
    buffers: NodeBuffers<'_, T>,
) -> Result<(), LayoutError> {
    match buffers {
        NodeBuffers::OutOfPlace { input, output } => {
            embed::real2complex(&plan.desc, input, output)
        }
        _ => Err(LayoutError::UnsupportedPlacement),
    }
}

fn exec_complex2hermitian<T: Float>(
    plan: &LayoutPlan<T>,
    buffers: NodeBuffers<'_, T>,
) -> Result<(), LayoutError> {
    match buffers {
        NodeBuffers::OutOfPlace { input, output } => {
            embed::complex2hermitian(&plan.desc, input, output)
        }
        _ => Err(LayoutError::UnsupportedPlacement),
    }
}

fn exec_post<T: Float>(
    plan: &LayoutPlan<T>,
    buffers: NodeBuffers<'_, T>,
) -> Result<(), LayoutError> {
    let twd = plan.twiddles.as_ref().ok_or(LayoutError::InvalidValue)?;
    prepost::r2c_1d_post(&plan.desc, buffers, twd)
}

fn exec_pre<T: Float>(
    plan: &LayoutPlan<T>,
    buffers: NodeBuffers<'_, T>,
) -> Result<(), LayoutError> {
    let twd = plan.twiddles.as_ref().ok_or(LayoutError::InvalidValue)?;
    prepost::c2r_1d_pre(&plan.desc, buffers, twd)
}

fn exec_unpack<T: Float>(
    plan: &LayoutPlan<T>,
    buffers: NodeBuffers<'_, T>,
) -> Result<(), LayoutError> {
    pair::complex2pair_unpack(&plan.desc, buffers)
}

fn exec_pack<T: Float>(
    plan: &LayoutPlan<T>,
    buffers: NodeBuffers<'_, T>,
) -> Result<(), LayoutError> {
    pair::pair2complex_pack(&plan.desc, buffers)
}
