//! Nullable values for JSON payloads and SQL arguments.
//!
//! [`Null<T>`] is an `Option<T>` that speaks both boundaries: it serializes to
//! JSON `null` and binds as SQL `NULL` when it holds no value, and decodes the
//! other way round.

use bytes::BytesMut;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::error::Error;
use tokio_postgres::types::{FromSql, IsNull, ToSql, Type};

/// A nullable `T`.
///
/// ```ignore
/// #[derive(Serialize, Deserialize)]
/// struct UserPatch {
///     nickname: Null<String>,
/// }
///
/// let mut q = Builder::new();
/// q.writep("UPDATE users SET nickname = {}", params![patch.nickname]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Null<T>(Option<T>);

impl<T> Default for Null<T> {
    fn default() -> Self {
        Self(None)
    }
}

impl<T> Null<T> {
    /// A valid value.
    pub fn new(value: T) -> Self {
        Self(Some(value))
    }

    /// An invalid (NULL) value.
    pub fn null() -> Self {
        Self(None)
    }

    /// Set the value, making it valid.
    pub fn set(&mut self, value: T) {
        self.0 = Some(value);
    }

    /// Make the value NULL, returning what it held.
    pub fn take(&mut self) -> Option<T> {
        self.0.take()
    }

    /// True when a value is present (not SQL `NULL`).
    pub fn is_valid(&self) -> bool {
        self.0.is_some()
    }

    /// A reference to the value if valid.
    pub fn get(&self) -> Option<&T> {
        self.0.as_ref()
    }

    /// A mutable reference to the value if valid.
    pub fn get_mut(&mut self) -> Option<&mut T> {
        self.0.as_mut()
    }

    /// Unwrap into the underlying `Option`.
    pub fn into_option(self) -> Option<T> {
        self.0
    }
}

impl<T> From<Option<T>> for Null<T> {
    fn from(value: Option<T>) -> Self {
        Self(value)
    }
}

impl<T> From<Null<T>> for Option<T> {
    fn from(value: Null<T>) -> Self {
        value.0
    }
}

impl<T: Serialize> Serialize for Null<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match &self.0 {
            Some(value) => value.serialize(serializer),
            None => serializer.serialize_none(),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Null<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<T>::deserialize(deserializer)
            .map(Self)
            .map_err(|e| {
                <D::Error as serde::de::Error>::custom(format!(
                    "bindsql::Null: could not deserialize {}: {e}",
                    std::any::type_name::<T>()
                ))
            })
    }
}

impl<T: ToSql> ToSql for Null<T> {
    fn to_sql(
        &self,
        ty: &Type,
        out: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
        match &self.0 {
            Some(value) => value.to_sql(ty, out),
            None => Ok(IsNull::Yes),
        }
    }

    fn accepts(ty: &Type) -> bool {
        T::accepts(ty)
    }

    tokio_postgres::types::to_sql_checked!();
}

impl<'a, T: FromSql<'a>> FromSql<'a> for Null<T> {
    fn from_sql(ty: &Type, raw: &'a [u8]) -> Result<Self, Box<dyn Error + Sync + Send>> {
        T::from_sql(ty, raw).map(Self::new).map_err(|e| {
            format!(
                "bindsql::Null: converting {ty} to {} is unsupported: {e}",
                std::any::type_name::<T>()
            )
            .into()
        })
    }

    fn from_sql_null(_ty: &Type) -> Result<Self, Box<dyn Error + Sync + Send>> {
        Ok(Self::null())
    }

    fn accepts(ty: &Type) -> bool {
        T::accepts(ty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_and_helpers() {
        let null = Null::<String>::default();
        assert!(!null.is_valid());
        assert_eq!(null.get(), None);

        let mut s = Null::new("Hello, World!".to_string());
        assert!(s.is_valid());
        s.set("Hello!".to_string());
        assert_eq!(s.get().map(String::as_str), Some("Hello!"));

        if let Some(v) = s.get_mut() {
            v.push('!');
        }
        assert_eq!(s.take().as_deref(), Some("Hello!!"));
        assert!(!s.is_valid());

        let n: Null<i32> = Some(3).into();
        let o: Option<i32> = n.into();
        assert_eq!(o, Some(3));
        assert_eq!(Null::<i32>::from(None).into_option(), None);
    }

    #[test]
    fn json_null_round_trip() {
        let null = Null::<String>::null();
        assert_eq!(serde_json::to_string(&null).unwrap(), "null");

        let dest: Null<String> = serde_json::from_str("null").unwrap();
        assert!(!dest.is_valid());

        let dest: Null<String> = serde_json::from_str("\"Hello!\"").unwrap();
        assert_eq!(dest, Null::new("Hello!".to_string()));
        assert_eq!(serde_json::to_string(&dest).unwrap(), "\"Hello!\"");
    }

    #[test]
    fn json_type_mismatch_is_error() {
        let err = serde_json::from_str::<Null<i32>>("\"nope\"").unwrap_err();
        assert!(err.to_string().contains("bindsql::Null"));
    }

    #[test]
    fn json_field_can_be_null() {
        #[derive(Deserialize)]
        struct Patch {
            nickname: Null<String>,
            age: Null<i32>,
        }

        let p: Patch = serde_json::from_str(r#"{"nickname":null,"age":42}"#).unwrap();
        assert!(!p.nickname.is_valid());
        assert_eq!(p.age.into_option(), Some(42));
    }

    #[test]
    fn binds_sql_null_when_invalid() {
        let mut buf = BytesMut::new();
        let is_null = Null::<String>::null().to_sql(&Type::TEXT, &mut buf).unwrap();
        assert!(matches!(is_null, IsNull::Yes));
        assert!(buf.is_empty());

        let is_null = Null::new("Hello!".to_string())
            .to_sql(&Type::TEXT, &mut buf)
            .unwrap();
        assert!(matches!(is_null, IsNull::No));
        assert_eq!(&buf[..], b"Hello!");
    }

    #[test]
    fn accepts_follows_inner_type() {
        assert!(<Null<String> as ToSql>::accepts(&Type::TEXT));
        assert!(!<Null<String> as ToSql>::accepts(&Type::INT4));
        assert!(<Null<i32> as FromSql>::accepts(&Type::INT4));
    }

    #[test]
    fn decodes_sql_null_and_values() {
        let dest = <Null<String> as FromSql>::from_sql_null(&Type::TEXT).unwrap();
        assert!(!dest.is_valid());

        let dest = <Null<String> as FromSql>::from_sql(&Type::TEXT, b"Hello!").unwrap();
        assert_eq!(dest.get().map(String::as_str), Some("Hello!"));

        let dest = <Null<i32> as FromSql>::from_sql(&Type::INT4, &7_i32.to_be_bytes()).unwrap();
        assert_eq!(dest.into_option(), Some(7));
    }

    #[test]
    fn decode_failure_names_the_wrapper() {
        let err = <Null<i32> as FromSql>::from_sql(&Type::INT4, &[0, 1]).unwrap_err();
        assert!(err.to_string().starts_with("bindsql::Null"));
    }

    #[test]
    fn binds_through_builder() {
        let mut b = crate::Builder::new();
        b.writep(
            "UPDATE users SET nickname = {}, age = {}",
            crate::params![Null::<String>::null(), Null::new(42_i32)],
        );
        assert_eq!(b.sql(), "UPDATE users SET nickname = $1, age = $2");
        assert_eq!(b.args().len(), 2);
    }
}
