//! Transform descriptors and the crate-wide error type.
//!
//! A [`Descriptor`] carries everything the host side needs to validate a
//! layout operation and derive its iteration geometry: lengths (innermost
//! dimension first), per-dimension strides, batch distances, array types,
//! direction, placement and precision. Validation happens once, up front;
//! kernels never touch an element of an invalid configuration.

use alloc::vec;
use alloc::vec::Vec;

/// Errors reported by descriptor validation, planning and kernel entry
/// points. All configuration problems surface here before any data moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutError {
    /// The length vector is empty or contains a zero entry.
    EmptyLength,
    /// Batch count of zero.
    ZeroBatch,
    /// Stride vectors do not match the rank of the length vector.
    MismatchedDimensions,
    /// A buffer is too short for the span the descriptor addresses.
    MismatchedLengths,
    /// Batch or higher-dimension extent exceeds the grid limit.
    GridLimitExceeded,
    /// The operation requires unit innermost stride.
    NonUnitStride,
    /// The array-type combination has no kernel variant.
    UnsupportedLayout,
    /// The placement is not supported by this operation.
    UnsupportedPlacement,
    /// Descriptor precision disagrees with the buffer element type.
    PrecisionMismatch,
    /// A value is out of range or internally inconsistent.
    InvalidValue,
}

impl core::fmt::Display for LayoutError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let msg = match self {
            Self::EmptyLength => "length vector is empty or has a zero entry",
            Self::ZeroBatch => "batch count is zero",
            Self::MismatchedDimensions => "stride rank does not match length rank",
            Self::MismatchedLengths => "buffer shorter than the addressed span",
            Self::GridLimitExceeded => "batch or higher-dimension extent exceeds the grid limit",
            Self::NonUnitStride => "operation requires unit innermost stride",
            Self::UnsupportedLayout => "array-type combination has no kernel variant",
            Self::UnsupportedPlacement => "placement not supported by this operation",
            Self::PrecisionMismatch => "descriptor precision disagrees with buffer element type",
            Self::InvalidValue => "value out of range or inconsistent",
        };
        f.write_str(msg)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for LayoutError {}

/// Transform direction. `Forward` maps to the sign −1 convention,
/// `Inverse` to +1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Forward,
    Inverse,
}

impl Direction {
    pub fn sign(self) -> i32 {
        match self {
            Self::Forward => -1,
            Self::Inverse => 1,
        }
    }
}

/// Whether the operation reads and writes the same buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placement {
    InPlace,
    OutOfPlace,
}

/// Element precision tag carried by the descriptor and checked against
/// the buffer element type at plan time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Precision {
    Single,
    Double,
}

/// Storage layout of one side of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArrayType {
    Unset,
    Real,
    ComplexInterleaved,
    ComplexPlanar,
    HermitianInterleaved,
    HermitianPlanar,
}

/// Physical layout class an [`ArrayType`] resolves to. Hermitian types
/// fold onto their complex storage counterpart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layout {
    Real,
    Interleaved,
    Planar,
}

impl ArrayType {
    /// Physical layout, or `None` for `Unset`.
    pub fn layout(self) -> Option<Layout> {
        match self {
            Self::Unset => None,
            Self::Real => Some(Layout::Real),
            Self::ComplexInterleaved | Self::HermitianInterleaved => Some(Layout::Interleaved),
            Self::ComplexPlanar | Self::HermitianPlanar => Some(Layout::Planar),
        }
    }

    pub fn is_hermitian(self) -> bool {
        matches!(self, Self::HermitianInterleaved | Self::HermitianPlanar)
    }
}

/// Addressing geometry of one side of an operation: innermost stride,
/// row stride for the higher-dimension axis, and batch distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowGeom {
    pub stride0: usize,
    pub row_stride: usize,
    pub dist: usize,
}

impl RowGeom {
    /// Element offset of row `(b, h)`.
    #[inline(always)]
    pub fn offset(&self, b: usize, h: usize) -> usize {
        b * self.dist + h * self.row_stride
    }

    /// Smallest buffer length that covers `span` innermost elements for
    /// every `(batch, high)` row.
    pub fn required_len(&self, span: usize, high: usize, batch: usize) -> usize {
        debug_assert!(span >= 1 && high >= 1 && batch >= 1);
        (batch - 1) * self.dist + (high - 1) * self.row_stride + (span - 1) * self.stride0 + 1
    }
}

/// Full description of one layout operation over batched data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Descriptor {
    /// Transform lengths, innermost dimension first. Every entry ≥ 1.
    pub length: Vec<usize>,
    /// Input element strides, one per dimension.
    pub in_stride: Vec<usize>,
    /// Output element strides, one per dimension.
    pub out_stride: Vec<usize>,
    /// Element distance between input batch members.
    pub i_dist: usize,
    /// Element distance between output batch members.
    pub o_dist: usize,
    pub batch: usize,
    pub precision: Precision,
    pub in_type: ArrayType,
    pub out_type: ArrayType,
    pub direction: Direction,
    pub placement: Placement,
}

impl Descriptor {
    /// Contiguous 1-D descriptor: unit strides, batch distances equal to
    /// the length, single batch, forward out-of-place, types unset.
    pub fn new_1d(n: usize, precision: Precision) -> Self {
        Self {
            length: vec![n],
            in_stride: vec![1],
            out_stride: vec![1],
            i_dist: n,
            o_dist: n,
            batch: 1,
            precision,
            in_type: ArrayType::Unset,
            out_type: ArrayType::Unset,
            direction: Direction::Forward,
            placement: Placement::OutOfPlace,
        }
    }

    pub fn rank(&self) -> usize {
        self.length.len()
    }

    /// Product of all lengths above the innermost dimension.
    pub fn high_dimension(&self) -> usize {
        self.length[1..].iter().product()
    }

    /// Number of Hermitian-packed complex elements per row.
    pub fn hermitian_len(&self) -> usize {
        self.length[0] / 2 + 1
    }

    /// Stride between consecutive rows of the input. For rank-1 data the
    /// batch distance doubles as the row stride.
    pub fn in_row_stride(&self) -> usize {
        if self.rank() > 1 {
            self.in_stride[1]
        } else {
            self.i_dist
        }
    }

    /// Stride between consecutive rows of the output.
    pub fn out_row_stride(&self) -> usize {
        if self.rank() > 1 {
            self.out_stride[1]
        } else {
            self.o_dist
        }
    }

    pub fn unit_stride(&self) -> bool {
        self.in_stride[0] == 1 && self.out_stride[0] == 1
    }

    pub fn in_geom(&self) -> RowGeom {
        RowGeom {
            stride0: self.in_stride[0],
            row_stride: self.in_row_stride(),
            dist: self.i_dist,
        }
    }

    pub fn out_geom(&self) -> RowGeom {
        RowGeom {
            stride0: self.out_stride[0],
            row_stride: self.out_row_stride(),
            dist: self.o_dist,
        }
    }

    /// Structural validation. Kernel entry points call this before any
    /// element access.
    pub fn validate(&self) -> Result<(), LayoutError> {
        if self.length.is_empty() || self.length.contains(&0) {
            return Err(LayoutError::EmptyLength);
        }
        if self.batch == 0 {
            return Err(LayoutError::ZeroBatch);
        }
        if self.in_stride.len() != self.rank() || self.out_stride.len() != self.rank() {
            return Err(LayoutError::MismatchedDimensions);
        }
        if self.in_stride[0] == 0 || self.out_stride[0] == 0 {
            return Err(LayoutError::InvalidValue);
        }
        if self.batch > 1 && (self.i_dist == 0 || self.o_dist == 0) {
            return Err(LayoutError::InvalidValue);
        }
        if self.rank() > 1
            && (self.in_stride[1..].contains(&0) || self.out_stride[1..].contains(&0))
        {
            return Err(LayoutError::InvalidValue);
        }
        Ok(())
    }
}
