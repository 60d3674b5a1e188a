use super::param::{Arg, IntoParam, NamedValue, Param, Values};
use super::placeholder::{Dialect, PlaceholderFn, positioned};
use std::fmt;
use tokio_postgres::types::ToSql;

/// Placeholder token recognized by [`Builder::writep`].
pub const PARAM_TOKEN: &str = "{}";

/// Marker replaced by the fragment name in [`Builder::writev`] formats.
pub const NAME_MARKER: &str = "%s";

/// An incremental SQL builder.
///
/// `Builder` keeps the SQL text and the bound arguments side by side: every
/// placeholder rendered into the text has its argument appended at the same
/// position, so `done()` always yields a matching pair.
///
/// The builder can be reused after `done()`; further writes extend the same
/// statement. Call [`reset`](Builder::reset) to start an unrelated one, or
/// [`clone`](Clone::clone) it to branch off independent variants of a
/// partially built statement.
#[derive(Clone)]
#[must_use]
pub struct Builder {
    /// Renders the placeholder for the next argument. May be swapped at any
    /// point; it applies from the next rendered placeholder on.
    pub placeholder: PlaceholderFn,
    text: String,
    args: Vec<Arg>,
    dropped: usize,
}

impl Default for Builder {
    fn default() -> Self {
        Self::with_placeholder(positioned)
    }
}

impl fmt::Debug for Builder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Builder")
            .field("text", &self.text)
            .field("args", &self.args)
            .field("dropped", &self.dropped)
            .finish_non_exhaustive()
    }
}

impl Builder {
    /// Create an empty builder rendering `$n` placeholders.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty builder with a custom placeholder renderer.
    pub fn with_placeholder(placeholder: PlaceholderFn) -> Self {
        Self {
            placeholder,
            text: String::new(),
            args: Vec::new(),
            dropped: 0,
        }
    }

    /// Create an empty builder for a dialect.
    pub fn with_dialect(dialect: Dialect) -> Self {
        Self::with_placeholder(dialect.placeholder())
    }

    /// Append raw SQL. Placeholder tokens are not recognized.
    pub fn write(&mut self, sql: &str) -> &mut Self {
        self.text.push_str(sql);
        self
    }

    /// Append formatted SQL, e.g. `b.writef(format_args!("FROM {table} "))`.
    ///
    /// Meant for trusted structural SQL (table and column names), never for
    /// user data. The output is not scanned for placeholder tokens. A
    /// `Display` impl that returns an error truncates the appended text.
    pub fn writef(&mut self, args: fmt::Arguments<'_>) -> &mut Self {
        fmt::Write::write_fmt(&mut self.text, args).ok();
        self
    }

    /// Append `template`, replacing every `{}` with a placeholder bound to the
    /// next parameter.
    ///
    /// A [`Values`] parameter appends all of its elements: its first element
    /// takes the current `{}` and the rest take the following `{}` tokens of
    /// this template without consuming parameters. Elements left without a
    /// token when the template ends are dropped (see [`dropped`](Builder::dropped)).
    /// Expansion never carries over to the next call.
    ///
    /// Parameters remaining after the last token are ignored.
    ///
    /// # Panics
    ///
    /// Panics if the template has more tokens than the parameters can fill,
    /// or if an empty [`Values`] is bound to a token.
    #[track_caller]
    pub fn writep<I>(&mut self, template: &str, params: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: IntoParam,
    {
        let mut params = params.into_iter();
        let mut rest = template;
        let mut inline = 0usize;

        self.text.reserve(template.len());
        while let Some(i) = rest.find(PARAM_TOKEN) {
            if inline > 0 {
                // Bound to an element already appended by a preceding Values.
                self.text.push_str(&rest[..i]);
                (self.placeholder)(&mut self.text, self.args.len() - inline);
                inline -= 1;
                rest = &rest[i + PARAM_TOKEN.len()..];
                continue;
            }

            let Some(param) = params.next() else {
                panic!("bindsql: insufficient parameters for template {template:?}");
            };
            self.text.push_str(&rest[..i]);
            (self.placeholder)(&mut self.text, self.args.len());
            match param.into_param() {
                Param::Scalar(arg) => self.args.push(arg),
                Param::Values(Values(values)) => {
                    assert!(
                        !values.is_empty(),
                        "bindsql: empty Values bound to placeholder in template {template:?}"
                    );
                    inline += values.len() - 1;
                    self.args.extend(values);
                }
            }
            rest = &rest[i + PARAM_TOKEN.len()..];
        }
        self.text.push_str(rest);

        if inline > 0 {
            self.args.truncate(self.args.len() - inline);
            self.dropped += inline;
            #[cfg(feature = "tracing")]
            tracing::debug!(
                target: "bindsql.sql",
                dropped = inline,
                template,
                "dropped Values elements without a placeholder"
            );
        }
        self
    }

    /// Append named fragments joined by `sep`.
    ///
    /// For each fragment the first `%s` in `format` is replaced by its name and
    /// the result is written with [`writep`](Builder::writep), bound to the
    /// fragment's value. Fragments without a value are written as plain text.
    /// An empty `fragments` appends nothing.
    ///
    /// ```ignore
    /// b.write("WHERE ").writev("%s", " AND ", [
    ///     NamedValue::new("role LIKE {}", "admin%"),
    ///     NamedValue::literal("is_active"),
    /// ]);
    /// // WHERE role LIKE $1 AND is_active
    /// ```
    ///
    /// # Panics
    ///
    /// Panics like `writep`, including when a fragment without a value
    /// contains a placeholder token.
    #[track_caller]
    pub fn writev(
        &mut self,
        format: &str,
        sep: &str,
        fragments: impl IntoIterator<Item = NamedValue>,
    ) -> &mut Self {
        for (i, fragment) in fragments.into_iter().enumerate() {
            if i > 0 {
                self.text.push_str(sep);
            }
            let template = format.replacen(NAME_MARKER, &fragment.name, 1);
            match fragment.value {
                Some(value) => self.writep(&template, [value]),
                None => self.writep(&template, std::iter::empty::<Param>()),
            };
        }
        self
    }

    /// The SQL text built so far.
    pub fn sql(&self) -> &str {
        &self.text
    }

    /// The bound arguments, in placeholder order.
    pub fn args(&self) -> &[Arg] {
        &self.args
    }

    /// Argument refs compatible with `tokio-postgres`.
    pub fn args_ref(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.args
            .iter()
            .map(|a| a.as_ref() as &(dyn ToSql + Sync))
            .collect()
    }

    /// Number of [`Values`] elements dropped because their template ran out
    /// of placeholders.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// True when no text and no arguments have been written.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.args.is_empty()
    }

    /// Return the SQL text and its arguments. The builder is left unchanged.
    pub fn done(&self) -> (String, Vec<Arg>) {
        (self.text.clone(), self.args.clone())
    }

    /// Consume the builder, returning the SQL text and its arguments.
    pub fn into_parts(self) -> (String, Vec<Arg>) {
        (self.text, self.args)
    }

    /// Clear text, arguments and the drop counter, keeping the renderer.
    pub fn reset(&mut self) -> &mut Self {
        self.text.clear();
        self.args.clear();
        self.dropped = 0;
        self
    }
}

impl fmt::Display for Builder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl fmt::Write for Builder {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.text.push_str(s);
        Ok(())
    }
}
