use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Utc};
use rust_decimal::Decimal;
use sea_orm::sea_query;
use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;
use uuid::Uuid;

/// Concrete declared type of a property, with any `Option` wrapper removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    Bool,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    Decimal,
    Text,
    Uuid,
    /// Timestamp with a UTC offset.
    DateTimeOffset,
    /// Local timestamp without offset.
    DateTime,
    Date,
    Time,
    Duration,
}

impl ValueType {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::Decimal => "decimal",
            Self::Text => "text",
            Self::Uuid => "uuid",
            Self::DateTimeOffset => "offset timestamp",
            Self::DateTime => "local timestamp",
            Self::Date => "date",
            Self::Time => "time",
            Self::Duration => "duration",
        }
    }

    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(
            self,
            Self::I8
                | Self::I16
                | Self::I32
                | Self::I64
                | Self::U8
                | Self::U16
                | Self::U32
                | Self::U64
                | Self::F32
                | Self::F64
                | Self::Decimal
        )
    }

    #[must_use]
    pub const fn is_temporal(self) -> bool {
        matches!(
            self,
            Self::DateTimeOffset | Self::DateTime | Self::Date | Self::Time | Self::Duration
        )
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A property value read from an entity, or a parsed filter bound.
///
/// Integers of every width widen to `Int`/`UInt` and `f32` widens to `Float`,
/// so a bound parsed for the declared type always lands in the same variant
/// as the values the getter produces.
#[derive(Debug, Clone, PartialEq)]
pub enum Value<'a> {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Decimal(Decimal),
    Text(Cow<'a, str>),
    DateTimeOffset(DateTime<FixedOffset>),
    DateTime(NaiveDateTime),
    Date(NaiveDate),
    Time(NaiveTime),
    Duration(TimeDelta),
    Uuid(Uuid),
}

impl Value<'_> {
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn into_owned(self) -> Value<'static> {
        match self {
            Self::Null => Value::Null,
            Self::Bool(v) => Value::Bool(v),
            Self::Int(v) => Value::Int(v),
            Self::UInt(v) => Value::UInt(v),
            Self::Float(v) => Value::Float(v),
            Self::Decimal(v) => Value::Decimal(v),
            Self::Text(v) => Value::Text(Cow::Owned(v.into_owned())),
            Self::DateTimeOffset(v) => Value::DateTimeOffset(v),
            Self::DateTime(v) => Value::DateTime(v),
            Self::Date(v) => Value::Date(v),
            Self::Time(v) => Value::Time(v),
            Self::Duration(v) => Value::Duration(v),
            Self::Uuid(v) => Value::Uuid(v),
        }
    }

    /// Ordering between two values of the same variant.
    ///
    /// Returns `None` when either side is null or the variants differ, which
    /// makes every ordering comparison against null false.
    #[must_use]
    pub fn compare(&self, other: &Value<'_>) -> Option<Ordering> {
        match (self, other) {
            (Self::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
            (Self::Int(a), Value::Int(b)) => Some(a.cmp(b)),
            (Self::UInt(a), Value::UInt(b)) => Some(a.cmp(b)),
            (Self::Float(a), Value::Float(b)) => a.partial_cmp(b),
            (Self::Decimal(a), Value::Decimal(b)) => Some(a.cmp(b)),
            (Self::Text(a), Value::Text(b)) => Some(a.as_ref().cmp(b.as_ref())),
            (Self::DateTimeOffset(a), Value::DateTimeOffset(b)) => Some(a.cmp(b)),
            (Self::DateTime(a), Value::DateTime(b)) => Some(a.cmp(b)),
            (Self::Date(a), Value::Date(b)) => Some(a.cmp(b)),
            (Self::Time(a), Value::Time(b)) => Some(a.cmp(b)),
            (Self::Duration(a), Value::Duration(b)) => Some(a.cmp(b)),
            (Self::Uuid(a), Value::Uuid(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// Total order used by sorting: nulls first, floats by `total_cmp`.
    #[must_use]
    pub fn sort_cmp(&self, other: &Value<'_>) -> Ordering {
        match (self, other) {
            (Self::Float(a), Value::Float(b)) => a.total_cmp(b),
            _ => self
                .compare(other)
                .unwrap_or_else(|| self.rank().cmp(&other.rank())),
        }
    }

    const fn rank(&self) -> u8 {
        match self {
            Self::Null => 0,
            Self::Bool(_) => 1,
            Self::Int(_) => 2,
            Self::UInt(_) => 3,
            Self::Float(_) => 4,
            Self::Decimal(_) => 5,
            Self::Text(_) => 6,
            Self::DateTimeOffset(_) => 7,
            Self::DateTime(_) => 8,
            Self::Date(_) => 9,
            Self::Time(_) => 10,
            Self::Duration(_) => 11,
            Self::Uuid(_) => 12,
        }
    }

    /// SQL literal for the value. Durations are bound as whole milliseconds.
    pub(crate) fn to_sql(&self) -> sea_query::Value {
        match self {
            Self::Null => Option::<String>::None.into(),
            Self::Bool(v) => (*v).into(),
            Self::Int(v) => (*v).into(),
            Self::UInt(v) => (*v).into(),
            Self::Float(v) => (*v).into(),
            Self::Decimal(v) => (*v).into(),
            Self::Text(v) => v.to_string().into(),
            Self::DateTimeOffset(v) => (*v).into(),
            Self::DateTime(v) => (*v).into(),
            Self::Date(v) => (*v).into(),
            Self::Time(v) => (*v).into(),
            Self::Duration(v) => v.num_milliseconds().into(),
            Self::Uuid(v) => (*v).into(),
        }
    }
}

impl fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::UInt(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Decimal(v) => write!(f, "{v}"),
            Self::Text(v) => f.write_str(v),
            Self::DateTimeOffset(v) => f.write_str(&v.to_rfc3339()),
            Self::DateTime(v) => write!(f, "{}", v.format("%Y-%m-%dT%H:%M:%S%.f")),
            Self::Date(v) => write!(f, "{}", v.format("%Y-%m-%d")),
            Self::Time(v) => write!(f, "{}", v.format("%H:%M:%S%.f")),
            Self::Duration(v) => write!(f, "{v}"),
            Self::Uuid(v) => write!(f, "{v}"),
        }
    }
}

/// Types that can be registered as entity properties.
///
/// The implementation fixes the property's [`ValueType`] once, at
/// registration, and converts a borrowed field into a [`Value`].
pub trait PropertyValue {
    const VALUE_TYPE: ValueType;
    const NULLABLE: bool = false;

    fn to_value(&self) -> Value<'_>;
}

impl PropertyValue for String {
    const VALUE_TYPE: ValueType = ValueType::Text;

    fn to_value(&self) -> Value<'_> {
        Value::Text(Cow::Borrowed(self.as_str()))
    }
}

macro_rules! impl_property_value {
    ($($ty:ty => $value_type:ident, $variant:ident, $widen:expr;)+) => {
        $(
            impl PropertyValue for $ty {
                const VALUE_TYPE: ValueType = ValueType::$value_type;

                fn to_value(&self) -> Value<'_> {
                    Value::$variant($widen(*self))
                }
            }
        )+
    };
}

impl_property_value! {
    bool => Bool, Bool, std::convert::identity;
    i8 => I8, Int, i64::from;
    i16 => I16, Int, i64::from;
    i32 => I32, Int, i64::from;
    i64 => I64, Int, std::convert::identity;
    u8 => U8, UInt, u64::from;
    u16 => U16, UInt, u64::from;
    u32 => U32, UInt, u64::from;
    u64 => U64, UInt, std::convert::identity;
    f32 => F32, Float, f64::from;
    f64 => F64, Float, std::convert::identity;
    Decimal => Decimal, Decimal, std::convert::identity;
    Uuid => Uuid, Uuid, std::convert::identity;
    DateTime<FixedOffset> => DateTimeOffset, DateTimeOffset, std::convert::identity;
    DateTime<Utc> => DateTimeOffset, DateTimeOffset, DateTime::<FixedOffset>::from;
    NaiveDateTime => DateTime, DateTime, std::convert::identity;
    NaiveDate => Date, Date, std::convert::identity;
    NaiveTime => Time, Time, std::convert::identity;
    TimeDelta => Duration, Duration, std::convert::identity;
}

impl<V: PropertyValue> PropertyValue for Option<V> {
    const VALUE_TYPE: ValueType = V::VALUE_TYPE;
    const NULLABLE: bool = true;

    fn to_value(&self) -> Value<'_> {
        self.as_ref().map_or(Value::Null, PropertyValue::to_value)
    }
}
