use std::fmt;
use std::hash::{Hash, Hasher};

use thiserror::Error;

use crate::value::DimValue;

/// Errors from dimension construction and key coercion.
#[derive(Debug, Error)]
pub enum DimensionError {
	/// A dimension name must be a non-empty string.
	#[error("dimension name must not be empty")]
	EmptyName,

	/// A key component could not be converted to the dimension's declared
	/// type.
	#[error("cannot coerce '{value}' to {target} for dimension '{dimension}'")]
	Coerce {
		/// Name of the dimension whose declared type rejected the value.
		dimension: String,
		/// The offending value.
		value: DimValue,
		/// The type the value failed to convert to.
		target: DimType,
	},
}

/// Declared scalar type of a dimension, applied to key components before
/// storage and lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DimType {
	/// Integer coordinates. Floats truncate toward zero, strings parse.
	Int,
	/// Floating-point coordinates. Integers widen, strings parse.
	Float,
	/// String coordinates. Any value renders via its display form.
	Str,
}

impl DimType {
	fn coerce(self, dimension: &str, value: DimValue) -> Result<DimValue, DimensionError> {
		let reject = |value: DimValue| DimensionError::Coerce {
			dimension: dimension.to_owned(),
			value,
			target: self,
		};
		let coerced = match (self, value) {
			(Self::Int, DimValue::Int(v)) => DimValue::Int(v),
			(Self::Int, DimValue::Float(v)) if v.is_finite() => DimValue::Int(v.trunc() as i64),
			(Self::Int, value @ DimValue::Float(_)) => return Err(reject(value)),
			(Self::Int, DimValue::Str(v)) => match v.trim().parse::<i64>() {
				Ok(parsed) => DimValue::Int(parsed),
				Err(_) => return Err(reject(DimValue::Str(v))),
			},
			(Self::Float, DimValue::Float(v)) => DimValue::Float(v),
			(Self::Float, DimValue::Int(v)) => DimValue::Float(v as f64),
			(Self::Float, DimValue::Str(v)) => match v.trim().parse::<f64>() {
				Ok(parsed) => DimValue::Float(parsed),
				Err(_) => return Err(reject(DimValue::Str(v))),
			},
			(Self::Str, DimValue::Str(v)) => DimValue::Str(v),
			(Self::Str, other) => DimValue::Str(other.to_string()),
		};
		Ok(coerced)
	}
}

impl fmt::Display for DimType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::Int => "int",
			Self::Float => "float",
			Self::Str => "str",
		})
	}
}

/// Metadata descriptor for one axis of a compound key.
///
/// A dimension's identity is its name: two dimensions compare equal when
/// their names match, and the declared type, cyclic flag, and unit are
/// carried metadata outside identity. Instances are never mutated; the
/// `renamed`/`with_*` methods derive modified copies, so a dimension can be
/// shared between mappings safely.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Dimension {
	name: String,
	ty: Option<DimType>,
	cyclic: bool,
	unit: Option<String>,
}

impl Dimension {
	/// Creates an untyped, non-cyclic dimension with no unit.
	pub fn new(name: impl Into<String>) -> Result<Self, DimensionError> {
		let name = name.into();
		if name.is_empty() {
			return Err(DimensionError::EmptyName);
		}
		Ok(Self {
			name,
			ty: None,
			cyclic: false,
			unit: None,
		})
	}

	/// The dimension's name.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// The declared coordinate type, if any.
	pub fn ty(&self) -> Option<DimType> {
		self.ty
	}

	/// Whether coordinates along this axis wrap around a range.
	pub fn cyclic(&self) -> bool {
		self.cyclic
	}

	/// The display unit, if any.
	pub fn unit(&self) -> Option<&str> {
		self.unit.as_deref()
	}

	/// Returns a copy of this dimension under a new name.
	pub fn renamed(&self, name: impl Into<String>) -> Result<Self, DimensionError> {
		let name = name.into();
		if name.is_empty() {
			return Err(DimensionError::EmptyName);
		}
		Ok(Self { name, ..self.clone() })
	}

	/// Returns a copy with the given declared type.
	pub fn with_type(&self, ty: DimType) -> Self {
		Self {
			ty: Some(ty),
			..self.clone()
		}
	}

	/// Returns a copy with the cyclic flag set as given.
	pub fn with_cyclic(&self, cyclic: bool) -> Self {
		Self {
			cyclic,
			..self.clone()
		}
	}

	/// Returns a copy with the given display unit.
	pub fn with_unit(&self, unit: impl Into<String>) -> Self {
		Self {
			unit: Some(unit.into()),
			..self.clone()
		}
	}

	/// Coerces a key component to this dimension's declared type.
	///
	/// Untyped dimensions pass values through unchanged.
	pub fn coerce(&self, value: DimValue) -> Result<DimValue, DimensionError> {
		match self.ty {
			Some(ty) => ty.coerce(&self.name, value),
			None => Ok(value),
		}
	}

	/// Formats a value for display as `"<name>: <value>[ <unit>]"`, with
	/// floats rounded to two decimal places.
	pub fn pprint_value(&self, value: &DimValue) -> String {
		self.pprint_value_rounded(value, 2)
	}

	/// Like [`pprint_value`](Self::pprint_value), with a caller-supplied
	/// number of decimal places. Non-numeric values pass through unrounded.
	pub fn pprint_value_rounded(&self, value: &DimValue, rounding: u32) -> String {
		let rendered = match value {
			DimValue::Float(v) => {
				let factor = 10_f64.powi(rounding as i32);
				((v * factor).round() / factor).to_string()
			}
			other => other.to_string(),
		};
		match &self.unit {
			Some(unit) => format!("{}: {rendered} {unit}", self.name),
			None => format!("{}: {rendered}", self.name),
		}
	}
}

impl PartialEq for Dimension {
	fn eq(&self, other: &Self) -> bool {
		self.name == other.name
	}
}

impl Eq for Dimension {}

impl Hash for Dimension {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.name.hash(state);
	}
}

impl PartialEq<str> for Dimension {
	fn eq(&self, other: &str) -> bool {
		self.name == other
	}
}

impl PartialEq<&str> for Dimension {
	fn eq(&self, other: &&str) -> bool {
		self.name == *other
	}
}

impl AsRef<str> for Dimension {
	fn as_ref(&self) -> &str {
		&self.name
	}
}

impl fmt::Display for Dimension {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.name)
	}
}

/// A dimension given either as a bare name or as a full [`Dimension`].
///
/// Construction boundaries accept `impl Into<DimensionSpec>` so callers can
/// mix `"time"` with a configured `Dimension` in one list; every spec is
/// resolved into a `Dimension` before any downstream code runs.
#[derive(Debug, Clone)]
pub enum DimensionSpec {
	/// A bare name, promoted to an untyped dimension on resolution.
	Name(String),
	/// A fully specified dimension, taken as-is.
	Dim(Dimension),
}

impl DimensionSpec {
	/// The name this spec refers to, without resolving it.
	pub fn name(&self) -> &str {
		match self {
			Self::Name(name) => name,
			Self::Dim(dim) => dim.name(),
		}
	}

	/// Resolves the spec into a concrete dimension.
	pub fn into_dimension(self) -> Result<Dimension, DimensionError> {
		match self {
			Self::Name(name) => Dimension::new(name),
			Self::Dim(dim) => Ok(dim),
		}
	}
}

impl From<&str> for DimensionSpec {
	fn from(name: &str) -> Self {
		Self::Name(name.to_owned())
	}
}

impl From<String> for DimensionSpec {
	fn from(name: String) -> Self {
		Self::Name(name)
	}
}

impl From<Dimension> for DimensionSpec {
	fn from(dim: Dimension) -> Self {
		Self::Dim(dim)
	}
}

impl From<&Dimension> for DimensionSpec {
	fn from(dim: &Dimension) -> Self {
		Self::Dim(dim.clone())
	}
}

#[cfg(test)]
mod tests {
	use super::{DimType, Dimension, DimensionError, DimensionSpec};
	use crate::value::DimValue;

	#[test]
	fn empty_name_rejected() {
		assert!(matches!(Dimension::new(""), Err(DimensionError::EmptyName)));
		let dim = Dimension::new("time").unwrap();
		assert!(matches!(dim.renamed(""), Err(DimensionError::EmptyName)));
	}

	#[test]
	fn derivation_leaves_original_untouched() {
		let dim = Dimension::new("angle").unwrap();
		let cyclic = dim.with_cyclic(true);
		assert!(cyclic.cyclic());
		assert!(!dim.cyclic());

		let renamed = dim.renamed("phase").unwrap().with_unit("scovilles");
		assert_eq!(renamed.name(), "phase");
		assert_eq!(renamed.unit(), Some("scovilles"));
		assert_eq!(dim.name(), "angle");
		assert_eq!(dim.unit(), None);
	}

	#[test]
	fn derivation_copies_unmentioned_fields() {
		let dim = Dimension::new("angle")
			.unwrap()
			.with_cyclic(true)
			.with_type(DimType::Float);
		let renamed = dim.renamed("phase").unwrap();
		assert!(renamed.cyclic());
		assert_eq!(renamed.ty(), Some(DimType::Float));
	}

	#[test]
	fn equality_is_by_name() {
		let plain = Dimension::new("time").unwrap();
		let typed = plain.with_type(DimType::Float).with_unit("s");
		assert_eq!(plain, typed);
		assert_eq!(typed, "time");
		assert_ne!(typed, "trial");
	}

	#[test]
	fn pprint_rounds_floats() {
		let dim = Dimension::new("Test dimension")
			.unwrap()
			.with_cyclic(true)
			.with_type(DimType::Float)
			.with_unit("Twilight zones");
		assert_eq!(
			dim.pprint_value(&DimValue::Float(3.2345)),
			"Test dimension: 3.23 Twilight zones"
		);
		assert_eq!(
			dim.pprint_value_rounded(&DimValue::Float(4.2344), 3),
			"Test dimension: 4.234 Twilight zones"
		);
	}

	#[test]
	fn pprint_without_unit() {
		let dim = Dimension::new("trial").unwrap();
		assert_eq!(dim.pprint_value(&DimValue::Int(7)), "trial: 7");
		assert_eq!(dim.pprint_value(&DimValue::Str("warmup".into())), "trial: warmup");
	}

	#[test]
	fn int_coercion_truncates_toward_zero() {
		let dim = Dimension::new("trial").unwrap().with_type(DimType::Int);
		assert_eq!(dim.coerce(DimValue::Float(0.5)).unwrap(), DimValue::Int(0));
		assert_eq!(dim.coerce(DimValue::Float(-1.5)).unwrap(), DimValue::Int(-1));
		assert_eq!(dim.coerce(DimValue::Str(" 3 ".into())).unwrap(), DimValue::Int(3));
	}

	#[test]
	fn int_coercion_rejects_unparseable_and_non_finite() {
		let dim = Dimension::new("trial").unwrap().with_type(DimType::Int);
		assert!(matches!(
			dim.coerce(DimValue::Str("0.5".into())),
			Err(DimensionError::Coerce { .. })
		));
		assert!(matches!(
			dim.coerce(DimValue::Float(f64::NAN)),
			Err(DimensionError::Coerce { .. })
		));
	}

	#[test]
	fn float_and_str_coercion() {
		let fdim = Dimension::new("time").unwrap().with_type(DimType::Float);
		assert_eq!(fdim.coerce(DimValue::Int(1)).unwrap(), DimValue::Float(1.0));
		assert_eq!(
			fdim.coerce(DimValue::Str("0.5".into())).unwrap(),
			DimValue::Float(0.5)
		);

		let sdim = Dimension::new("label").unwrap().with_type(DimType::Str);
		assert_eq!(
			sdim.coerce(DimValue::Float(0.5)).unwrap(),
			DimValue::Str("0.5".into())
		);
	}

	#[test]
	fn untyped_dimension_passes_values_through() {
		let dim = Dimension::new("anything").unwrap();
		assert_eq!(dim.coerce(DimValue::Str("0.5".into())).unwrap(), DimValue::Str("0.5".into()));
	}

	#[test]
	fn spec_resolution() {
		let spec = DimensionSpec::from("floatdim");
		assert_eq!(spec.name(), "floatdim");
		let dim = spec.into_dimension().unwrap();
		assert_eq!(dim.name(), "floatdim");
		assert_eq!(dim.ty(), None);

		assert!(matches!(
			DimensionSpec::from("").into_dimension(),
			Err(DimensionError::EmptyName)
		));
	}
}
