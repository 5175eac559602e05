//! Destination shape classification.
//!
//! A destination type is classified once, from its static [`Destination`]
//! metadata, into a [`TypeShape`]: what kind of value it is and how many
//! repeated layers wrap its innermost record or scalar.
//!
//! ```text
//! i64                      scalar     dimension 0   one row
//! User                     record     dimension 1   one row
//! Vec<i64>                 sequence   dimension 1   one row, one element per column
//! HashMap<String, Value>   map        dimension 1   one row, one entry per column
//! Vec<User>                sequence   dimension 2   one element per row
//! Vec<Vec<Value>>          sequence   dimension 2   one inner sequence per row
//! Sender<User>             channel    dimension 2   one send per row
//! ```

use std::fmt;

use rowscan_result::Result;

use crate::destination::Destination;

/// Kind of a destination value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    /// A single value scanned from one column.
    Scalar,
    /// A record whose fields are matched against column names.
    Record,
    /// An associative container keyed by column name or ordinal.
    Map,
    /// A linear container.
    Sequence,
    /// The sending half of a channel; each row is delivered to a consumer.
    Channel,
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Shape::Scalar => "scalar",
            Shape::Record => "record",
            Shape::Map => "map",
            Shape::Sequence => "sequence",
            Shape::Channel => "channel",
        };
        f.write_str(name)
    }
}

/// Static description of a destination type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeShape {
    pub shape: Shape,
    pub dimension: usize,
    pub custom_scan: bool,
}

impl TypeShape {
    /// Classifies `D`, rejecting shape combinations the binder cannot fill.
    pub fn classify<D: Destination>() -> Result<Self> {
        D::validate()?;
        Ok(Self {
            shape: D::SHAPE,
            dimension: D::DIMENSION,
            custom_scan: D::CUSTOM_SCAN,
        })
    }

    /// True when the destination is filled from exactly one row.
    #[inline]
    pub fn expects_single_row(&self) -> bool {
        self.dimension <= 1
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, HashMap};
    use std::sync::mpsc::Sender;

    use rowscan_result::Error;
    use rowscan_types::Value;

    use super::*;

    crate::record! {
        #[derive(Debug, Default)]
        struct Pair {
            left: i32,
            right: i32,
        }
    }

    #[test]
    fn dimensions_follow_nesting() {
        assert_eq!(TypeShape::classify::<i64>().unwrap().dimension, 0);
        assert_eq!(TypeShape::classify::<Pair>().unwrap().dimension, 1);
        assert_eq!(TypeShape::classify::<Vec<String>>().unwrap().dimension, 1);
        assert_eq!(
            TypeShape::classify::<HashMap<String, Value>>().unwrap().dimension,
            1
        );
        assert_eq!(TypeShape::classify::<Vec<Pair>>().unwrap().dimension, 2);
        assert_eq!(TypeShape::classify::<Vec<Vec<Value>>>().unwrap().dimension, 2);
        assert_eq!(TypeShape::classify::<Sender<Pair>>().unwrap().dimension, 2);
    }

    #[test]
    fn pointers_are_transparent() {
        let boxed = TypeShape::classify::<Box<Pair>>().unwrap();
        assert_eq!(boxed.shape, Shape::Record);
        assert_eq!(boxed.dimension, 1);
        let list = TypeShape::classify::<Vec<Box<Pair>>>().unwrap();
        assert_eq!(list.dimension, 2);
        let optional = TypeShape::classify::<Option<Vec<Pair>>>().unwrap();
        assert_eq!(optional.shape, Shape::Sequence);
    }

    #[test]
    fn single_row_expectation() {
        assert!(TypeShape::classify::<Pair>().unwrap().expects_single_row());
        assert!(TypeShape::classify::<Vec<i32>>().unwrap().expects_single_row());
        assert!(!TypeShape::classify::<Vec<Pair>>().unwrap().expects_single_row());
    }

    #[test]
    fn rejects_maps_of_records() {
        let err = TypeShape::classify::<HashMap<String, Pair>>().unwrap_err();
        assert!(matches!(err, Error::UnsupportedShape { .. }));
    }

    #[test]
    fn rejects_destinations_nested_past_two_levels() {
        assert!(matches!(
            TypeShape::classify::<Vec<Vec<Pair>>>(),
            Err(Error::InvalidDimension { dimension: 3, .. })
        ));
        assert!(matches!(
            TypeShape::classify::<Option<Vec<Vec<Vec<i64>>>>>(),
            Err(Error::InvalidDimension { dimension: 3, .. })
        ));
    }

    #[test]
    fn rejects_scalar_channels() {
        let err = TypeShape::classify::<Sender<i64>>().unwrap_err();
        assert!(matches!(err, Error::UnsupportedShape { .. }));
    }

    #[test]
    fn rejects_unusable_map_keys() {
        let err = TypeShape::classify::<BTreeMap<bool, Value>>().unwrap_err();
        assert!(matches!(err, Error::InvalidKeyType("bool")));
        let nested = TypeShape::classify::<Vec<HashMap<char, Value>>>().unwrap_err();
        assert!(matches!(nested, Error::InvalidKeyType(_)));
    }
}
