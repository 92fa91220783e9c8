//! Order-preserving, dimensioned mappings for reshaping keyed data.
//!
//! The central type is [`NdMapping`]: an ordered mapping whose keys are
//! fixed-arity tuples of [`DimValue`] components, one per [`Dimension`].
//! Dimensions carry the axis metadata (name, declared type, cyclic flag,
//! display unit) that drives key coercion and formatting; structural
//! operations ([`NdMapping::reindex`], [`NdMapping::add_dimension`])
//! reshape a mapping onto a transformed dimension list without touching
//! the original.

/// Axis metadata: names, declared types, cyclic flags, units.
pub mod dimension;
/// Mapping-level error types.
pub mod error;
/// Key storage and conversion from caller-supplied key shapes.
pub mod key;
/// The ordered mapping engine.
pub mod ndmapping;
/// Scalar key components.
pub mod value;

pub use dimension::{DimType, Dimension, DimensionError, DimensionSpec};
pub use error::MappingError;
pub use key::{IntoKey, Key};
pub use ndmapping::NdMapping;
pub use value::DimValue;
