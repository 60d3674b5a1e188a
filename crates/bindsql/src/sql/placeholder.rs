//! Placeholder renderers.
//!
//! A renderer appends the dialect-specific reference for the argument at a
//! zero-based index. Renderers are plain function pointers: stateless, `Copy`,
//! and safe to share between cloned builders.

use serde::{Deserialize, Serialize};

/// Renders the placeholder for the argument at zero-based index `i` into `out`.
pub type PlaceholderFn = fn(out: &mut String, i: usize);

/// Formats the parameter as `$n` (PostgreSQL style). This is the default.
pub fn positioned(out: &mut String, i: usize) {
    // Write a usize as decimal digits without going through fmt.
    let mut n = i + 1;
    if n < 10 {
        out.push('$');
        out.push((b'0' + n as u8) as char);
        return;
    }
    let mut buf = [0u8; 20];
    let mut pos = buf.len();
    while n > 0 {
        pos -= 1;
        buf[pos] = b'0' + (n % 10) as u8;
        n /= 10;
    }
    out.push('$');
    for &digit in &buf[pos..] {
        out.push(digit as char);
    }
}

/// Formats the parameter as `?` (MySQL/SQLite style), ignoring the index.
pub fn enumerated(out: &mut String, _i: usize) {
    out.push('?');
}

/// Placeholder dialect, for selecting a renderer from configuration.
///
/// ```ignore
/// #[derive(Deserialize)]
/// struct AppConfig {
///     dialect: bindsql::Dialect, // "postgres" | "mysql" | "sqlite"
/// }
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// `$1, $2, ...`
    #[default]
    Postgres,
    /// `?`
    #[serde(alias = "mariadb")]
    MySql,
    /// `?`
    Sqlite,
}

impl Dialect {
    /// The renderer used by this dialect.
    pub fn placeholder(self) -> PlaceholderFn {
        match self {
            Self::Postgres => positioned,
            Self::MySql | Self::Sqlite => enumerated,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(f: PlaceholderFn, indices: &[usize]) -> String {
        let mut out = String::new();
        for &i in indices {
            f(&mut out, i);
            out.push(' ');
        }
        out
    }

    #[test]
    fn positioned_is_one_based() {
        assert_eq!(render(positioned, &[0, 1, 8]), "$1 $2 $9 ");
    }

    #[test]
    fn positioned_multi_digit() {
        assert_eq!(render(positioned, &[9, 41, 999]), "$10 $42 $1000 ");
    }

    #[test]
    fn enumerated_ignores_index() {
        assert_eq!(render(enumerated, &[0, 7, 12345]), "? ? ? ");
    }

    #[test]
    fn dialect_picks_renderer() {
        assert_eq!(render(Dialect::Postgres.placeholder(), &[2]), "$3 ");
        assert_eq!(render(Dialect::MySql.placeholder(), &[2]), "? ");
        assert_eq!(render(Dialect::Sqlite.placeholder(), &[2]), "? ");
        assert_eq!(Dialect::default(), Dialect::Postgres);
    }

    #[test]
    fn dialect_deserializes_lowercase() {
        let d: Dialect = serde_json::from_str("\"postgres\"").unwrap();
        assert_eq!(d, Dialect::Postgres);
        let d: Dialect = serde_json::from_str("\"mysql\"").unwrap();
        assert_eq!(d, Dialect::MySql);
        let d: Dialect = serde_json::from_str("\"mariadb\"").unwrap();
        assert_eq!(d, Dialect::MySql);
        let d: Dialect = serde_json::from_str("\"sqlite\"").unwrap();
        assert_eq!(d, Dialect::Sqlite);
        assert!(serde_json::from_str::<Dialect>("\"oracle\"").is_err());
    }
}
