use chrono::{DateTime, NaiveDateTime, Offset, TimeZone, Utc};
use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::rc::Rc;
use std::sync::Arc;

use crate::value::{Scalar, Value};

/// Conversion of a Rust value into the walker's [`Value`] model.
///
/// Records are usually implemented through [`hashable_record!`](crate::hashable_record).
pub trait Hashable {
    /// Borrows `self` as a value tree.
    fn to_value(&self) -> Value<'_>;
}

macro_rules! signed {
    ($($t:ty),*) => {
        $(impl Hashable for $t {
            fn to_value(&self) -> Value<'_> {
                Value::Scalar(Scalar::Int(*self as i64))
            }
        })*
    };
}

macro_rules! unsigned {
    ($($t:ty),*) => {
        $(impl Hashable for $t {
            fn to_value(&self) -> Value<'_> {
                Value::Scalar(Scalar::UInt(*self as u64))
            }
        })*
    };
}

signed!(i8, i16, i32, i64, isize);
unsigned!(u8, u16, u32, u64, usize);

impl Hashable for f32 {
    fn to_value(&self) -> Value<'_> {
        Value::Scalar(Scalar::Float32(*self))
    }
}

impl Hashable for f64 {
    fn to_value(&self) -> Value<'_> {
        Value::Scalar(Scalar::Float64(*self))
    }
}

impl Hashable for bool {
    fn to_value(&self) -> Value<'_> {
        Value::Scalar(Scalar::Bool(*self))
    }
}

impl Hashable for char {
    fn to_value(&self) -> Value<'_> {
        Value::Scalar(Scalar::Char(*self))
    }
}

impl Hashable for str {
    fn to_value(&self) -> Value<'_> {
        Value::Scalar(Scalar::Str(Cow::Borrowed(self)))
    }
}

impl Hashable for String {
    fn to_value(&self) -> Value<'_> {
        Value::Scalar(Scalar::Str(Cow::Borrowed(self.as_str())))
    }
}

impl Hashable for Cow<'_, str> {
    fn to_value(&self) -> Value<'_> {
        Value::Scalar(Scalar::Str(Cow::Borrowed(self.as_ref())))
    }
}

impl Hashable for Value<'_> {
    fn to_value(&self) -> Value<'_> {
        self.clone()
    }
}

// Pointers and options are indirections: transparent to the hash.

impl<T: Hashable + ?Sized> Hashable for &T {
    fn to_value(&self) -> Value<'_> {
        Value::indirect((**self).to_value())
    }
}

impl<T: Hashable + ?Sized> Hashable for Box<T> {
    fn to_value(&self) -> Value<'_> {
        Value::indirect((**self).to_value())
    }
}

impl<T: Hashable + ?Sized> Hashable for Rc<T> {
    fn to_value(&self) -> Value<'_> {
        Value::indirect((**self).to_value())
    }
}

impl<T: Hashable + ?Sized> Hashable for Arc<T> {
    fn to_value(&self) -> Value<'_> {
        Value::indirect((**self).to_value())
    }
}

impl<T: Hashable> Hashable for Option<T> {
    fn to_value(&self) -> Value<'_> {
        match self {
            Some(inner) => Value::indirect(inner.to_value()),
            None => Value::Null,
        }
    }
}

impl<T: Hashable> Hashable for [T] {
    fn to_value(&self) -> Value<'_> {
        Value::Sequence(self.iter().map(Hashable::to_value).collect())
    }
}

impl<T: Hashable, const N: usize> Hashable for [T; N] {
    fn to_value(&self) -> Value<'_> {
        self.as_slice().to_value()
    }
}

impl<T: Hashable> Hashable for Vec<T> {
    fn to_value(&self) -> Value<'_> {
        self.as_slice().to_value()
    }
}

impl<T: Hashable> Hashable for VecDeque<T> {
    fn to_value(&self) -> Value<'_> {
        Value::Sequence(self.iter().map(Hashable::to_value).collect())
    }
}

impl<T: Hashable, S> Hashable for HashSet<T, S> {
    fn to_value(&self) -> Value<'_> {
        Value::Sequence(self.iter().map(Hashable::to_value).collect())
    }
}

impl<T: Hashable> Hashable for BTreeSet<T> {
    fn to_value(&self) -> Value<'_> {
        Value::Sequence(self.iter().map(Hashable::to_value).collect())
    }
}

impl<K: Hashable, V: Hashable, S> Hashable for HashMap<K, V, S> {
    fn to_value(&self) -> Value<'_> {
        Value::Mapping(self.iter().map(|(k, v)| (k.to_value(), v.to_value())).collect())
    }
}

impl<K: Hashable, V: Hashable> Hashable for BTreeMap<K, V> {
    fn to_value(&self) -> Value<'_> {
        Value::Mapping(self.iter().map(|(k, v)| (k.to_value(), v.to_value())).collect())
    }
}

impl<Tz: TimeZone> Hashable for DateTime<Tz> {
    fn to_value(&self) -> Value<'_> {
        let offset = self.offset().fix();
        Value::Timestamp(self.with_timezone(&offset))
    }
}

/// Naive date-times are taken to be UTC.
impl Hashable for NaiveDateTime {
    fn to_value(&self) -> Value<'_> {
        Value::Timestamp(Utc.from_utc_datetime(self).with_timezone(&Utc.fix()))
    }
}

macro_rules! tuple {
    ($($name:ident),+) => {
        impl<$($name: Hashable),+> Hashable for ($($name,)+) {
            #[allow(non_snake_case)]
            fn to_value(&self) -> Value<'_> {
                let ($($name,)+) = self;
                Value::Sequence(vec![$($name.to_value()),+])
            }
        }
    };
}

tuple!(A);
tuple!(A, B);
tuple!(A, B, C);
tuple!(A, B, C, D);

/// Implements [`Hashable`] for a struct by listing its fields in declaration order.
///
/// A field may be prefixed with `#[hash(ignore)]` to drop it from the hash, and
/// with `#[private]` to mark it inaccessible. The first non-zero private field
/// ends the record's contribution.
///
/// ```rust
/// use deephash::hashable_record;
///
/// struct Account {
///     owner: String,
///     balance: u64,
///     revision: u32,
///     session: String,
/// }
///
/// hashable_record!(Account {
///     owner,
///     balance,
///     #[hash(ignore)]
///     revision,
///     #[private]
///     session,
/// });
///
/// let a = Account { owner: "ana".into(), balance: 10, revision: 1, session: "x".into() };
/// let b = Account { owner: "ana".into(), balance: 10, revision: 2, session: "y".into() };
/// assert_eq!(deephash::hash(&a)?, deephash::hash(&b)?);
/// # Ok::<(), deephash::HashError>(())
/// ```
#[macro_export]
macro_rules! hashable_record {
    ($ty:ident { $($body:tt)* }) => {
        impl $crate::Hashable for $ty {
            fn to_value(&self) -> $crate::Value<'_> {
                let record = $crate::Record::new(stringify!($ty));
                $crate::hashable_record!(@fields self, record, $($body)*)
            }
        }
    };
    (@fields $self:ident, $rec:ident, ) => {
        $crate::Value::Record($rec)
    };
    (@fields $self:ident, $rec:ident, #[private] #[hash(ignore)] $field:ident $(, $($rest:tt)*)?) => {
        $crate::hashable_record!(@fields $self, $rec, #[hash(ignore)] #[private] $field $(, $($rest)*)?)
    };
    (@fields $self:ident, $rec:ident, #[hash(ignore)] #[private] $field:ident $(, $($rest:tt)*)?) => {{
        let $rec = $rec.with_field(
            stringify!($field),
            $crate::Hashable::to_value(&$self.$field),
            false,
            true,
        );
        $crate::hashable_record!(@fields $self, $rec, $($($rest)*)?)
    }};
    (@fields $self:ident, $rec:ident, #[hash(ignore)] $field:ident $(, $($rest:tt)*)?) => {{
        let $rec = $rec.with_field(
            stringify!($field),
            $crate::Hashable::to_value(&$self.$field),
            true,
            true,
        );
        $crate::hashable_record!(@fields $self, $rec, $($($rest)*)?)
    }};
    (@fields $self:ident, $rec:ident, #[private] $field:ident $(, $($rest:tt)*)?) => {{
        let $rec = $rec.with_field(
            stringify!($field),
            $crate::Hashable::to_value(&$self.$field),
            false,
            false,
        );
        $crate::hashable_record!(@fields $self, $rec, $($($rest)*)?)
    }};
    (@fields $self:ident, $rec:ident, $field:ident $(, $($rest:tt)*)?) => {{
        let $rec = $rec.with_field(
            stringify!($field),
            $crate::Hashable::to_value(&$self.$field),
            true,
            false,
        );
        $crate::hashable_record!(@fields $self, $rec, $($($rest)*)?)
    }};
}
