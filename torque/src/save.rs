//! Keyed structured data which components save their state into and restore it from.
//!
//! The physics does not choose a storage format; hosts implement [`DataInput`] and
//! [`DataOutput`] over whatever they persist entities with. [`DataCompound`] is an in-memory
//! implementation of both which can itself be serialized with [`serde`].
//!
//! Reads always supply a default, so a missing or mistyped key is never an error.

use std::collections::BTreeMap;

use crate::identifier::Identifier;
use crate::math::{FreeCoordinate, FreeVector, Rotation};

/// Source of previously saved values.
pub trait DataInput {
    /// Reads a number, or returns `default` if `key` does not hold one.
    fn read_float(&self, key: &str, default: FreeCoordinate) -> FreeCoordinate;

    /// Reads a vector, or returns `default` if `key` does not hold one.
    fn read_vector(&self, key: &str, default: FreeVector) -> FreeVector;

    /// Reads a rotation quaternion, or returns `default` if `key` does not hold one.
    fn read_quaternion(&self, key: &str, default: Rotation) -> Rotation;

    /// Reads an identifier, or returns `default` if `key` does not hold one.
    fn read_identifier(&self, key: &str, default: Option<Identifier>) -> Option<Identifier>;

    /// Returns the nested scope stored under `key`. If there is none, returns an empty scope.
    fn child(&self, key: &str) -> &dyn DataInput;
}

/// Destination for saved values.
pub trait DataOutput {
    /// Writes a number.
    fn write_float(&mut self, key: &str, value: FreeCoordinate);

    /// Writes a vector.
    fn write_vector(&mut self, key: &str, value: FreeVector);

    /// Writes a rotation quaternion.
    fn write_quaternion(&mut self, key: &str, value: Rotation);

    /// Writes an identifier.
    fn write_identifier(&mut self, key: &str, value: &Identifier);

    /// Returns the nested scope stored under `key`, creating it (and replacing any
    /// non-scope value stored there) if necessary.
    fn child_mut(&mut self, key: &str) -> &mut dyn DataOutput;
}

/// One value stored in a [`DataCompound`].
#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum DataValue {
    #[allow(missing_docs)]
    Float(FreeCoordinate),
    #[allow(missing_docs)]
    Vector([FreeCoordinate; 3]),
    /// Quaternion components in the order `[i, j, k, r]`.
    Quaternion([FreeCoordinate; 4]),
    #[allow(missing_docs)]
    Identifier(Identifier),
    #[allow(missing_docs)]
    Compound(DataCompound),
}

/// An in-memory tree of keyed values, implementing both [`DataInput`] and [`DataOutput`].
///
/// ```
/// use torque::math::FreeVector;
/// use torque::save::{DataCompound, DataInput as _, DataOutput as _};
///
/// let mut data = DataCompound::new();
/// data.child_mut("body").write_vector("velocity", FreeVector::new(1.0, 2.0, 3.0));
///
/// assert_eq!(
///     data.child("body").read_vector("velocity", FreeVector::zero()),
///     FreeVector::new(1.0, 2.0, 3.0),
/// );
/// assert_eq!(data.child("absent").read_float("speed", 4.5), 4.5);
/// ```
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(transparent)]
pub struct DataCompound {
    entries: BTreeMap<String, DataValue>,
}

static EMPTY: DataCompound = DataCompound::new();

impl DataCompound {
    /// Constructs an empty compound.
    pub const fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Returns an empty compound that lives forever, for reading from when there is no data.
    pub fn empty() -> &'static Self {
        &EMPTY
    }

    /// Returns the value stored under `key`, if any.
    pub fn get(&self, key: &str) -> Option<&DataValue> {
        self.entries.get(key)
    }

    /// Iterates over the stored keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.keys().map(String::as_str)
    }

    /// Returns whether nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn insert(&mut self, key: &str, value: DataValue) {
        self.entries.insert(key.to_owned(), value);
    }
}

fn mistyped(key: &str, value: &DataValue) {
    log::debug!("ignoring saved value for {key:?} of unexpected type: {value:?}");
}

impl DataInput for DataCompound {
    fn read_float(&self, key: &str, default: FreeCoordinate) -> FreeCoordinate {
        match self.get(key) {
            Some(&DataValue::Float(value)) => value,
            Some(other) => {
                mistyped(key, other);
                default
            }
            None => default,
        }
    }

    fn read_vector(&self, key: &str, default: FreeVector) -> FreeVector {
        match self.get(key) {
            Some(&DataValue::Vector(value)) => value.into(),
            Some(other) => {
                mistyped(key, other);
                default
            }
            None => default,
        }
    }

    fn read_quaternion(&self, key: &str, default: Rotation) -> Rotation {
        match self.get(key) {
            Some(&DataValue::Quaternion([i, j, k, r])) => Rotation::quaternion(i, j, k, r),
            Some(other) => {
                mistyped(key, other);
                default
            }
            None => default,
        }
    }

    fn read_identifier(&self, key: &str, default: Option<Identifier>) -> Option<Identifier> {
        match self.get(key) {
            Some(DataValue::Identifier(value)) => Some(value.clone()),
            Some(other) => {
                mistyped(key, other);
                default
            }
            None => default,
        }
    }

    fn child(&self, key: &str) -> &dyn DataInput {
        match self.get(key) {
            Some(DataValue::Compound(child)) => child,
            _ => Self::empty(),
        }
    }
}

impl DataOutput for DataCompound {
    fn write_float(&mut self, key: &str, value: FreeCoordinate) {
        self.insert(key, DataValue::Float(value));
    }

    fn write_vector(&mut self, key: &str, value: FreeVector) {
        self.insert(key, DataValue::Vector(value.to_array()));
    }

    fn write_quaternion(&mut self, key: &str, value: Rotation) {
        let Rotation { i, j, k, r, .. } = value;
        self.insert(key, DataValue::Quaternion([i, j, k, r]));
    }

    fn write_identifier(&mut self, key: &str, value: &Identifier) {
        self.insert(key, DataValue::Identifier(value.clone()));
    }

    fn child_mut(&mut self, key: &str) -> &mut dyn DataOutput {
        let entry = self
            .entries
            .entry(key.to_owned())
            .or_insert_with(|| DataValue::Compound(DataCompound::new()));
        if !matches!(entry, DataValue::Compound(_)) {
            *entry = DataValue::Compound(DataCompound::new());
        }
        match entry {
            DataValue::Compound(child) => child,
            _ => unreachable!("entry was just made a compound"),
        }
    }
}
