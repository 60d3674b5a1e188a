use std::sync::Arc;
use tokio_postgres::types::ToSql;

/// A type-erased bound argument, shareable between cloned builders.
pub type Arg = Arc<dyn ToSql + Sync + Send>;

/// A value bound to one placeholder in [`Builder::writep`](crate::Builder::writep).
#[derive(Debug, Clone)]
pub enum Param {
    /// A single argument.
    Scalar(Arg),
    /// Several arguments that expand across consecutive placeholders.
    Values(Values),
}

/// Multiple values forming one logical parameter.
///
/// Bound with `writep`, the first element takes the matching placeholder and
/// the rest take the following placeholders of the same template, without
/// consuming further parameters. Elements the template has no placeholder for
/// are dropped.
///
/// ```ignore
/// let mut b = Builder::new();
/// b.writep("(manager_id = {} OR manager_id = {})", params![Values::new([765, 92])]);
/// assert_eq!(b.sql(), "(manager_id = $1 OR manager_id = $2)");
/// ```
///
/// A plain `Vec<T>` is *not* a bundle: it binds as a single array argument.
#[derive(Debug, Clone, Default)]
pub struct Values(pub(crate) Vec<Arg>);

impl Values {
    /// Collect values into a bundle.
    pub fn new<T>(values: impl IntoIterator<Item = T>) -> Self
    where
        T: ToSql + Sync + Send + 'static,
    {
        Self(values.into_iter().map(|v| Arc::new(v) as Arg).collect())
    }

    /// Build a bundle from already erased arguments, e.g. of mixed types.
    pub fn from_args(args: impl IntoIterator<Item = Arg>) -> Self {
        Self(args.into_iter().collect())
    }

    /// Append one value.
    pub fn push<T>(&mut self, value: T)
    where
        T: ToSql + Sync + Send + 'static,
    {
        self.0.push(Arc::new(value));
    }

    /// Number of arguments the bundle expands into.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True for a bundle with no elements, which cannot be bound.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Conversion into a [`Param`].
///
/// Any `ToSql` value becomes [`Param::Scalar`]; [`Values`] becomes
/// [`Param::Values`].
pub trait IntoParam {
    fn into_param(self) -> Param;
}

impl<T> IntoParam for T
where
    T: ToSql + Sync + Send + 'static,
{
    fn into_param(self) -> Param {
        Param::Scalar(Arc::new(self))
    }
}

impl IntoParam for Values {
    fn into_param(self) -> Param {
        Param::Values(self)
    }
}

impl IntoParam for Param {
    fn into_param(self) -> Param {
        self
    }
}

/// Build a `Vec<Param>` from heterogeneous values.
///
/// ```ignore
/// b.writep("age > {} AND country = {}", params![18, "NL"]);
/// ```
#[macro_export]
macro_rules! params {
    () => {
        ::std::vec::Vec::<$crate::Param>::new()
    };
    ($($value:expr),+ $(,)?) => {
        ::std::vec![$($crate::IntoParam::into_param($value)),+]
    };
}

/// A predicate fragment for [`Builder::writev`](crate::Builder::writev).
///
/// `name` is substituted into the composer's format; `value` is bound to the
/// placeholders of the resulting template. A fragment without a value is
/// written as literal text and must not contain placeholders.
#[derive(Debug, Clone)]
pub struct NamedValue {
    pub name: String,
    pub value: Option<Param>,
}

impl NamedValue {
    /// A fragment with a bound value (scalar or [`Values`]).
    pub fn new(name: impl Into<String>, value: impl IntoParam) -> Self {
        Self {
            name: name.into(),
            value: Some(value.into_param()),
        }
    }

    /// A parameter-free fragment, e.g. `is_active`.
    pub fn literal(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
        }
    }
}
