//! Incremental SQL builder.
//!
//! The builder writes SQL text and collects arguments in one pass, so the
//! placeholder numbering never has to be tracked by hand:
//!
//! ```ignore
//! use bindsql::{NamedValue, Values, params, sql};
//!
//! let mut q = sql("SELECT * FROM users");
//! q.write(" WHERE ").writev("%s", " AND ", [
//!     NamedValue::new("role LIKE {}", "admin%"),
//!     NamedValue::literal("is_active"),
//!     NamedValue::new("(manager_id = {} OR manager_id = {})", Values::new([765, 92])),
//! ]);
//! // SELECT * FROM users WHERE role LIKE $1 AND is_active AND (manager_id = $2 OR manager_id = $3)
//!
//! let users = q.fetch_all(&client).await?;
//! ```
//!
//! Placeholders default to the PostgreSQL `$n` form; see [`placeholder`] for
//! the `?` form used by MySQL and SQLite.

mod builder;
mod exec;
mod param;
pub mod placeholder;


pub use builder::{Builder, NAME_MARKER, PARAM_TOKEN};
pub use param::{Arg, IntoParam, NamedValue, Param, Values};
pub use placeholder::{Dialect, PlaceholderFn, enumerated, positioned};

/// Start a `$n` builder with an initial SQL fragment.
pub fn sql(initial_sql: &str) -> Builder {
    let mut b = Builder::new();
    b.write(initial_sql);
    b
}
