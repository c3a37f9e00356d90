use std::fmt;

/// Rendered key under which the type name of an expression is stored.
pub const TYPE_KEY: &str = "@Type";

// ── ParamKey ──────────────────────────────────────────────────────────────

/// Key of a single parameter in a [`ParsedExpression`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParamKey {
    /// The `@Type` sentinel holding the extension's type name.
    TypeName,
    /// 1-based positional argument.
    Positional(usize),
    /// `Name=Value` argument.
    Named(String),
}

impl ParamKey {
    /// Classify a key as written in source (or as rendered by [`Display`]).
    ///
    /// Keys made only of ASCII digits are positional, so a source segment
    /// `2=Foo` lands in the same slot as the second unnamed argument would.
    /// A digit key too large for an index stays `Named` but is reserved.
    ///
    /// [`Display`]: fmt::Display
    pub fn from_source(key: &str) -> Self {
        if key == TYPE_KEY {
            return Self::TypeName;
        }
        if is_digits(key) {
            if let Ok(n) = key.parse::<usize>() {
                return Self::Positional(n);
            }
        }
        Self::Named(key.to_string())
    }

    /// `true` for keys starting with `@` (the type sentinel and any other
    /// tool-reserved key) and for out-of-range digit keys. Reserved keys are
    /// never constructor arguments or property assignments.
    pub fn is_reserved(&self) -> bool {
        match self {
            Self::TypeName => true,
            Self::Positional(_) => false,
            Self::Named(name) => name.starts_with('@') || is_digits(name),
        }
    }
}

impl fmt::Display for ParamKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TypeName => f.write_str(TYPE_KEY),
            Self::Positional(n) => write!(f, "{n}"),
            Self::Named(name) => f.write_str(name),
        }
    }
}

fn is_digits(key: &str) -> bool {
    !key.is_empty() && key.bytes().all(|b| b.is_ascii_digit())
}

// ── Param ─────────────────────────────────────────────────────────────────

/// One `key -> value` entry. `value` is `None` for a dangling `Key=` at the
/// end of an expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub key: ParamKey,
    pub value: Option<String>,
}

// ── ParsedExpression ──────────────────────────────────────────────────────

/// The result of parsing a markup-extension expression such as
/// `{Binding Path, Mode=TwoWay}`.
///
/// Entries keep source order; lookup is by key.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedExpression {
    params: Vec<Param>,
}

impl ParsedExpression {
    pub fn new(type_name: impl Into<String>) -> Self {
        let mut expr = Self::default();
        expr.insert(ParamKey::TypeName, Some(type_name.into()));
        expr
    }

    /// Insert or replace an entry. A replaced entry keeps its original position.
    pub fn insert(&mut self, key: ParamKey, value: Option<String>) {
        match self.params.iter_mut().find(|p| p.key == key) {
            Some(existing) => existing.value = value,
            None => self.params.push(Param { key, value }),
        }
    }

    /// Append an unnamed argument after the highest positional index in use.
    ///
    /// An explicit digit key (`2=X`) therefore never gets overwritten by a
    /// later unnamed argument.
    pub fn push_positional(&mut self, value: Option<String>) {
        let last = self
            .params
            .iter()
            .filter_map(|p| match p.key {
                ParamKey::Positional(n) => Some(n),
                _ => None,
            })
            .max()
            .unwrap_or(0);
        self.insert(ParamKey::Positional(last.saturating_add(1)), value);
    }

    /// The extension's type name as written (e.g. `"x:Type"`).
    pub fn type_name(&self) -> &str {
        self.entry(&ParamKey::TypeName)
            .and_then(|p| p.value.as_deref())
            .unwrap_or("")
    }

    fn entry(&self, key: &ParamKey) -> Option<&Param> {
        self.params.iter().find(|p| &p.key == key)
    }

    /// Look up an entry by its rendered key (`"@Type"`, `"1"`, `"Path"`).
    ///
    /// Returns `None` when the key is absent and `Some(None)` for a key that
    /// was written without a value.
    pub fn get(&self, key: &str) -> Option<Option<&str>> {
        self.entry(&ParamKey::from_source(key))
            .map(|p| p.value.as_deref())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// All entries in source order, including `@Type`.
    pub fn params(&self) -> &[Param] {
        &self.params
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Number of positional entries.
    pub fn positional_count(&self) -> usize {
        self.params
            .iter()
            .filter(|p| matches!(p.key, ParamKey::Positional(_)))
            .count()
    }

    /// Positional values ordered by index (not by source position).
    pub fn positional(&self) -> Vec<Option<&str>> {
        let mut args: Vec<(usize, Option<&str>)> = self
            .params
            .iter()
            .filter_map(|p| match p.key {
                ParamKey::Positional(n) => Some((n, p.value.as_deref())),
                _ => None,
            })
            .collect();
        args.sort_by_key(|(n, _)| *n);
        args.into_iter().map(|(_, v)| v).collect()
    }

    /// Named, non-reserved entries in source order.
    pub fn named(&self) -> impl Iterator<Item = (&str, Option<&str>)> + '_ {
        self.params.iter().filter_map(|p| match &p.key {
            ParamKey::Named(name) if !p.key.is_reserved() => {
                Some((name.as_str(), p.value.as_deref()))
            }
            _ => None,
        })
    }
}

/// Formats back to markup: `{Type a, b, Key=Value}`.
///
/// Values are written verbatim. A key without a value renders as `Key=`.
impl fmt::Display for ParsedExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}", self.type_name())?;
        let mut first = true;
        for p in self.params.iter().filter(|p| p.key != ParamKey::TypeName) {
            f.write_str(if first { " " } else { ", " })?;
            first = false;
            let value = p.value.as_deref().unwrap_or("");
            match &p.key {
                ParamKey::Positional(_) => f.write_str(value)?,
                key => write!(f, "{key}={value}")?,
            }
        }
        f.write_str("}")
    }
}
