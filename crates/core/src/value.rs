use std::fmt;
use std::hash::{Hash, Hasher};
use std::mem;

/// A scalar key component: one coordinate along a single dimension.
///
/// The variants cover the value shapes keys are built from. `Float` carries
/// an `f64` but still supports `Eq` and `Hash`: comparison and hashing go
/// through a canonical bit pattern, so `-0.0` and `0.0` are one value and a
/// NaN key is equal to itself. That is a map-key semantic, not an arithmetic
/// one.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DimValue {
	/// An integer coordinate.
	Int(i64),
	/// A floating-point coordinate.
	Float(f64),
	/// A string coordinate.
	Str(String),
}

impl DimValue {
	/// Returns a short name for the value's type.
	pub fn type_name(&self) -> &'static str {
		match self {
			Self::Int(_) => "int",
			Self::Float(_) => "float",
			Self::Str(_) => "str",
		}
	}

	/// Returns the integer payload, if this is an `Int`.
	pub fn as_int(&self) -> Option<i64> {
		match self {
			Self::Int(v) => Some(*v),
			_ => None,
		}
	}

	/// Returns the float payload, if this is a `Float`.
	pub fn as_float(&self) -> Option<f64> {
		match self {
			Self::Float(v) => Some(*v),
			_ => None,
		}
	}

	/// Returns the string payload, if this is a `Str`.
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Self::Str(v) => Some(v),
			_ => None,
		}
	}
}

/// Collapses `-0.0` and every NaN to a single bit pattern so floats can
/// participate in key equality and hashing.
fn canonical_bits(value: f64) -> u64 {
	if value.is_nan() {
		f64::NAN.to_bits()
	} else if value == 0.0 {
		0
	} else {
		value.to_bits()
	}
}

impl PartialEq for DimValue {
	fn eq(&self, other: &Self) -> bool {
		match (self, other) {
			(Self::Int(a), Self::Int(b)) => a == b,
			(Self::Float(a), Self::Float(b)) => canonical_bits(*a) == canonical_bits(*b),
			(Self::Str(a), Self::Str(b)) => a == b,
			_ => false,
		}
	}
}

impl Eq for DimValue {}

impl Hash for DimValue {
	fn hash<H: Hasher>(&self, state: &mut H) {
		mem::discriminant(self).hash(state);
		match self {
			Self::Int(v) => v.hash(state),
			Self::Float(v) => canonical_bits(*v).hash(state),
			Self::Str(v) => v.hash(state),
		}
	}
}

impl fmt::Display for DimValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Int(v) => write!(f, "{v}"),
			Self::Float(v) => write!(f, "{v}"),
			Self::Str(v) => f.write_str(v),
		}
	}
}

impl From<i64> for DimValue {
	fn from(value: i64) -> Self {
		Self::Int(value)
	}
}

impl From<i32> for DimValue {
	fn from(value: i32) -> Self {
		Self::Int(value.into())
	}
}

impl From<f64> for DimValue {
	fn from(value: f64) -> Self {
		Self::Float(value)
	}
}

impl From<f32> for DimValue {
	fn from(value: f32) -> Self {
		Self::Float(value.into())
	}
}

impl From<&str> for DimValue {
	fn from(value: &str) -> Self {
		Self::Str(value.to_owned())
	}
}

impl From<String> for DimValue {
	fn from(value: String) -> Self {
		Self::Str(value)
	}
}

#[cfg(test)]
mod tests {
	use std::collections::hash_map::DefaultHasher;
	use std::hash::{Hash, Hasher};

	use super::DimValue;

	fn hash_of(value: &DimValue) -> u64 {
		let mut hasher = DefaultHasher::new();
		value.hash(&mut hasher);
		hasher.finish()
	}

	#[test]
	fn negative_zero_is_positive_zero() {
		let pos = DimValue::Float(0.0);
		let neg = DimValue::Float(-0.0);
		assert_eq!(pos, neg);
		assert_eq!(hash_of(&pos), hash_of(&neg));
	}

	#[test]
	fn nan_equals_itself() {
		let a = DimValue::Float(f64::NAN);
		let b = DimValue::Float(-f64::NAN);
		assert_eq!(a, b);
		assert_eq!(hash_of(&a), hash_of(&b));
	}

	#[test]
	fn variants_are_distinct() {
		assert_ne!(DimValue::Int(1), DimValue::Float(1.0));
		assert_ne!(DimValue::Int(1), DimValue::Str("1".into()));
	}

	#[test]
	fn conversions() {
		assert_eq!(DimValue::from(3_i32), DimValue::Int(3));
		assert_eq!(DimValue::from(0.5_f32), DimValue::Float(0.5));
		assert_eq!(DimValue::from("run"), DimValue::Str("run".into()));
	}

	#[test]
	fn display() {
		assert_eq!(DimValue::Int(-4).to_string(), "-4");
		assert_eq!(DimValue::Float(0.5).to_string(), "0.5");
		assert_eq!(DimValue::Str("trial".into()).to_string(), "trial");
	}
}
