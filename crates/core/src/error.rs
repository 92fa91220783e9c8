use thiserror::Error;

use crate::dimension::DimensionError;
use crate::key::Key;

/// Errors from mapping construction, access, and structural operations.
#[derive(Debug, Error)]
pub enum MappingError {
	/// A key's component count does not match the mapping's dimensionality.
	#[error("expected a key of length {expected}, got {actual}")]
	KeyLength {
		/// The mapping's dimensionality.
		expected: usize,
		/// The supplied key's component count.
		actual: usize,
	},

	/// Lookup or removal of a key the mapping does not contain.
	#[error("key {0} not found")]
	KeyNotFound(Key),

	/// An operation named a dimension that is not part of the mapping.
	#[error("no dimension named '{0}'")]
	UnknownDimension(String),

	/// A dimension insertion position past the end of the dimension list.
	#[error("position {position} is out of range for {ndims} dimensions")]
	PositionOutOfRange {
		/// The requested insertion position.
		position: usize,
		/// The mapping's dimensionality.
		ndims: usize,
	},

	/// A dimension insertion under a name the mapping already has.
	#[error("dimension '{0}' already present")]
	DuplicateDimension(String),

	/// Invalid dimension metadata or a failed key coercion.
	#[error(transparent)]
	Dimension(#[from] DimensionError),
}
