use chrono::{DateTime, FixedOffset, SecondsFormat};
use std::borrow::Cow;
use std::fmt;

/// Tag key consulted by the walker on record fields.
pub const HASH_TAG: &str = "hash";

/// Tag value that removes a field from the hash unconditionally.
pub const IGNORE: &str = "ignore";

/// A dynamically-shaped value tree handed to the walker.
///
/// Values borrow from the caller wherever possible; the walker never mutates them.
#[derive(Debug, Clone, PartialEq)]
pub enum Value<'a> {
    /// The distinguished empty value.
    Null,
    /// A primitive leaf with a canonical textual form.
    Scalar(Scalar<'a>),
    /// An instant in time, kept in its native offset.
    Timestamp(DateTime<FixedOffset>),
    /// Ordered collection; hashed as a multiset by default.
    Sequence(Vec<Value<'a>>),
    /// Unordered key/value entries with unique keys.
    Mapping(Vec<(Value<'a>, Value<'a>)>),
    /// Labeled aggregate of named fields.
    Record(Record<'a>),
    /// Reference to an inner value; transparent to hashing.
    Indirect(Box<Value<'a>>),
    /// A callable, handle or other kind with no structural content.
    Opaque(Cow<'a, str>),
}

/// Primitive leaves. Each variant keeps the textual class of its source type.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar<'a> {
    /// `true` / `false`.
    Bool(bool),
    /// Signed integer, decimal text.
    Int(i64),
    /// Unsigned integer, decimal text.
    UInt(u64),
    /// Single-precision float, shortest round-trip text.
    Float32(f32),
    /// Double-precision float, shortest round-trip text.
    Float64(f64),
    /// Unicode scalar value, written as UTF-8.
    Char(char),
    /// String, written raw.
    Str(Cow<'a, str>),
    /// Byte string, written as lowercase hex.
    Bytes(Cow<'a, [u8]>),
}

/// A named aggregate with fields in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct Record<'a> {
    /// Type name of the aggregate (diagnostic only; never hashed).
    pub name: Cow<'a, str>,
    /// Fields in declaration order.
    pub fields: Vec<Field<'a>>,
}

/// One field of a [`Record`].
#[derive(Debug, Clone, PartialEq)]
pub struct Field<'a> {
    /// Field name (diagnostic only; never hashed).
    pub name: Cow<'a, str>,
    /// Declaration index within the record.
    pub index: usize,
    /// Whether the field is readable through the public access path.
    pub accessible: bool,
    /// Current value.
    pub value: Value<'a>,
    /// Traversal tags as `(key, value)` pairs.
    pub tags: Vec<(Cow<'a, str>, Cow<'a, str>)>,
}

impl<'a> Value<'a> {
    /// Builds a string scalar.
    pub fn str(s: impl Into<Cow<'a, str>>) -> Self {
        Value::Scalar(Scalar::Str(s.into()))
    }

    /// Wraps a value in one layer of indirection.
    pub fn indirect(inner: Value<'a>) -> Self {
        Value::Indirect(Box::new(inner))
    }

    /// Peels every layer of indirection.
    pub fn resolve(&self) -> &Value<'a> {
        let mut current = self;
        while let Value::Indirect(inner) = current {
            current = inner;
        }
        current
    }

    /// Reports whether this value is the zero value of its kind.
    ///
    /// | Kind | Zero when |
    /// |---|---|
    /// | Null | always |
    /// | Bool | `false` |
    /// | Int / UInt / Char | `0` / `'\0'` |
    /// | Float32 / Float64 | all bits clear (`-0.0` is not zero) |
    /// | Str / Bytes | empty |
    /// | Timestamp | never |
    /// | Sequence / Mapping | no elements |
    /// | Record | every field is zero (see [`Field::is_zero`]), ignored and inaccessible ones included |
    /// | Indirect | referent is zero |
    /// | Opaque | never |
    pub fn is_zero(&self) -> bool {
        match self.resolve() {
            Value::Null => true,
            Value::Scalar(scalar) => scalar.is_zero(),
            Value::Timestamp(_) => false,
            Value::Sequence(items) => items.is_empty(),
            Value::Mapping(entries) => entries.is_empty(),
            Value::Record(record) => record.fields.iter().all(Field::is_zero),
            Value::Opaque(_) => false,
            Value::Indirect(inner) => inner.is_zero(),
        }
    }

    /// Short kind label used in logs and errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Scalar(_) => "scalar",
            Value::Timestamp(_) => "timestamp",
            Value::Sequence(_) => "sequence",
            Value::Mapping(_) => "mapping",
            Value::Record(_) => "record",
            Value::Indirect(_) => "indirect",
            Value::Opaque(_) => "opaque",
        }
    }
}

/// Formats a timestamp as RFC 3339 at second precision in its own offset.
pub fn format_timestamp(ts: &DateTime<FixedOffset>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

impl Scalar<'_> {
    /// See the zero table on [`Value::is_zero`].
    pub fn is_zero(&self) -> bool {
        match self {
            Scalar::Bool(b) => !*b,
            Scalar::Int(i) => *i == 0,
            Scalar::UInt(u) => *u == 0,
            Scalar::Float32(f) => f.to_bits() == 0,
            Scalar::Float64(f) => f.to_bits() == 0,
            Scalar::Char(c) => *c == '\0',
            Scalar::Str(s) => s.is_empty(),
            Scalar::Bytes(b) => b.is_empty(),
        }
    }
}

impl fmt::Display for Scalar<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Int(i) => write!(f, "{}", i),
            Scalar::UInt(u) => write!(f, "{}", u),
            Scalar::Float32(v) => write!(f, "{}", v),
            Scalar::Float64(v) => write!(f, "{}", v),
            Scalar::Char(c) => write!(f, "{}", c),
            Scalar::Str(s) => f.write_str(s),
            Scalar::Bytes(b) => f.write_str(&hex::encode(b)),
        }
    }
}

impl<'a> Record<'a> {
    /// Starts an empty record with the given type name.
    pub fn new(name: impl Into<Cow<'a, str>>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Appends an accessible, untagged field.
    pub fn field(self, name: impl Into<Cow<'a, str>>, value: Value<'a>) -> Self {
        self.with_field(name, value, true, false)
    }

    /// Appends a field tagged `hash=ignore`.
    pub fn ignored_field(self, name: impl Into<Cow<'a, str>>, value: Value<'a>) -> Self {
        self.with_field(name, value, true, true)
    }

    /// Appends a field that cannot be read through the public path.
    pub fn private_field(self, name: impl Into<Cow<'a, str>>, value: Value<'a>) -> Self {
        self.with_field(name, value, false, false)
    }

    /// Appends a field with explicit accessibility and ignore flag.
    pub fn with_field(
        mut self,
        name: impl Into<Cow<'a, str>>,
        value: Value<'a>,
        accessible: bool,
        ignored: bool,
    ) -> Self {
        let tags = if ignored {
            vec![(Cow::Borrowed(HASH_TAG), Cow::Borrowed(IGNORE))]
        } else {
            Vec::new()
        };
        self.fields.push(Field {
            name: name.into(),
            index: self.fields.len(),
            accessible,
            value,
            tags,
        });
        self
    }
}

impl Field<'_> {
    /// Looks up a traversal tag by key.
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_ref())
    }

    /// Zero check for a field slot.
    ///
    /// Same as [`Value::is_zero`] except that a field holding a reference is
    /// zero only when the reference is absent: a present reference counts as
    /// set even if its referent is zero.
    pub fn is_zero(&self) -> bool {
        match &self.value {
            Value::Indirect(inner) => matches!(inner.resolve(), Value::Null),
            value => value.is_zero(),
        }
    }

    /// True when the field carries `hash=ignore`.
    pub fn is_ignored(&self) -> bool {
        self.tag(HASH_TAG) == Some(IGNORE)
    }
}
