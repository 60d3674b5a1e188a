//! # bindsql
//!
//! Build parameterized SQL incrementally without tracking placeholder numbers
//! by hand.
//!
//! ## Features
//!
//! - **Text and arguments in lockstep**: every `{}` written through
//!   [`Builder::writep`] renders a placeholder and appends its argument
//! - **Dialect-agnostic placeholders**: `$1, $2, ...` by default, `?` for
//!   MySQL/SQLite, or any custom [`PlaceholderFn`]
//! - **Multi-value parameters**: a [`Values`] bundle expands across the
//!   following placeholders of one template (`IN ({}, {})`, `a = {} OR a = {}`)
//! - **Predicate lists**: [`Builder::writev`] joins named fragments, with or
//!   without bound values
//! - **Cheap branching**: clone a partially built statement and continue each
//!   copy independently
//! - **Nullable values**: [`Null<T>`] maps to JSON `null` and SQL `NULL`
//!
//! ```ignore
//! use bindsql::{Builder, NamedValue, Values, params};
//!
//! let mut b = Builder::new();
//! b.write("SELECT * ")
//!     .writef(format_args!("FROM {table} "))
//!     .writep("WHERE id = {}", params![432]);
//!
//! let (query, args) = b.done();
//! assert_eq!(query, "SELECT * FROM users WHERE id = $1");
//!
//! let user = b.fetch_one(&client).await?;
//! ```

pub mod client;
pub mod error;
pub mod null;
pub mod sql;

#[cfg(feature = "tracing")]
pub mod trace;

#[cfg(feature = "pool")]
pub mod pool;

pub use client::GenericClient;
pub use error::{SqlError, SqlResult};
pub use null::Null;
pub use sql::{
    Arg, Builder, Dialect, IntoParam, NamedValue, Param, PlaceholderFn, Values, enumerated,
    positioned, sql,
};

#[cfg(feature = "tracing")]
pub use trace::{TraceConfig, TraceId, TracedClient};

#[cfg(feature = "pool")]
pub use pool::{PoolConfig, Recycling, create_pool, create_pool_with_tls};
