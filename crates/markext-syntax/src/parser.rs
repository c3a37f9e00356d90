use crate::ast::{ParamKey, ParsedExpression};

// ── Scanner ───────────────────────────────────────────────────────────────

/// Single left-to-right scan over the parameter list of an expression.
///
/// The scan is tolerant: unbalanced quotes or braces never abort it, the
/// flags simply stay in whatever state the input leaves them.
struct Scanner<'s> {
    src: &'s str,
    /// Byte offset where the current segment starts.
    start: usize,
    in_quotes: bool,
    /// Single-level: a nested `{` inside a nested value is not counted.
    in_braces: bool,
    /// Key captured for the current segment, if an `=` was seen.
    key: Option<String>,
}

impl<'s> Scanner<'s> {
    fn new(src: &'s str) -> Self {
        Self { src, start: 0, in_quotes: false, in_braces: false, key: None }
    }

    fn track(&mut self, ch: char) {
        match ch {
            // quotes inside a nested `{...}` are literal
            '"' if !self.in_braces => self.in_quotes = !self.in_quotes,
            '{' => self.in_braces = true,
            '}' => self.in_braces = false,
            _ => {}
        }
    }

    fn at_top_level(&self) -> bool {
        !self.in_quotes && !self.in_braces
    }

    fn scan_into(mut self, expr: &mut ParsedExpression) {
        for (i, ch) in self.src.char_indices() {
            self.track(ch);
            if !self.at_top_level() {
                continue;
            }
            match ch {
                '=' if self.key.is_none() => {
                    self.key = Some(self.src[self.start..i].trim().to_string());
                    self.start = i + 1;
                }
                ',' => {
                    let value = self.src[self.start..i].trim().to_string();
                    emit(expr, self.key.take(), Some(value));
                    self.start = i + 1;
                }
                _ => {}
            }
        }

        // Trailing segment: an empty unnamed tail is dropped, an empty named
        // tail (`Key=`) is kept as a key without a value.
        let tail = self.src[self.start..].trim();
        let value = (!tail.is_empty()).then(|| tail.to_string());
        if self.key.is_none() && value.is_none() {
            return;
        }
        emit(expr, self.key.take(), value);
    }
}

fn emit(expr: &mut ParsedExpression, key: Option<String>, value: Option<String>) {
    match key {
        None => expr.push_positional(value),
        Some(key) => {
            let key = match ParamKey::from_source(&key) {
                // `@Type=` in source must not clobber the type name
                ParamKey::TypeName => ParamKey::Named(key),
                other => other,
            };
            expr.insert(key, value);
        }
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────

/// Remove one layer of enclosing `{` / `}`. Either side may be missing.
fn strip_outer_braces(src: &str) -> &str {
    let src = src.trim();
    let src = src.strip_prefix('{').unwrap_or(src);
    src.strip_suffix('}').unwrap_or(src)
}

/// Split `inner` at the first whitespace outside quotes and braces.
fn split_type_name(inner: &str) -> (&str, &str) {
    let mut in_quotes = false;
    let mut in_braces = false;
    for (i, ch) in inner.char_indices() {
        match ch {
            '"' if !in_braces => in_quotes = !in_quotes,
            '{' => in_braces = true,
            '}' => in_braces = false,
            c if c.is_whitespace() && !in_quotes && !in_braces => {
                return (inner[..i].trim(), inner[i..].trim());
            }
            _ => {}
        }
    }
    (inner.trim(), "")
}

/// `true` if `text` is written as a markup extension (`{...}`) rather than a
/// literal. A leading `{}` is the escape sequence for a literal brace.
pub fn is_markup_extension(text: &str) -> bool {
    let text = text.trim_start();
    text.starts_with('{') && !text.starts_with("{}")
}

// ── Public parse entry point ──────────────────────────────────────────────

/// Parse a markup-extension expression into a [`ParsedExpression`].
///
/// Never fails; malformed input yields a best-effort partial result.
pub fn parse_str(src: &str) -> ParsedExpression {
    let (type_name, params) = split_type_name(strip_outer_braces(src));
    let mut expr = ParsedExpression::new(type_name);
    if !params.is_empty() {
        Scanner::new(params).scan_into(&mut expr);
    }
    expr
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(src: &str) -> Vec<String> {
        parse_str(src).params().iter().map(|p| p.key.to_string()).collect()
    }

    #[test]
    fn strips_only_one_brace_layer() {
        assert_eq!(strip_outer_braces(" {A {B}} "), "A {B}");
        assert_eq!(strip_outer_braces("{A"), "A");
        assert_eq!(strip_outer_braces("A}"), "A");
    }

    #[test]
    fn type_name_split_ignores_quoted_space() {
        assert_eq!(split_type_name("T A, B"), ("T", "A, B"));
        assert_eq!(split_type_name("T"), ("T", ""));
        assert_eq!(split_type_name("T\n  A"), ("T", "A"));
    }

    #[test]
    fn empty_unnamed_segment_mid_expression_is_kept() {
        let expr = parse_str("{T A,,B}");
        assert_eq!(expr.positional(), vec![Some("A"), Some(""), Some("B")]);
    }

    #[test]
    fn trailing_comma_is_dropped() {
        assert_eq!(keys("{T A, }"), ["@Type", "1"]);
    }

    #[test]
    fn value_may_contain_equals() {
        let expr = parse_str("{T Key=a=b}");
        assert_eq!(expr.get("Key"), Some(Some("a=b")));
    }

    #[test]
    fn quoted_comma_is_not_a_separator() {
        let expr = parse_str(r#"{T Format="a, b", Next=1}"#);
        assert_eq!(expr.get("Format"), Some(Some(r#""a, b""#)));
        assert_eq!(expr.get("Next"), Some(Some("1")));
    }

    #[test]
    fn quote_inside_nested_braces_is_literal() {
        let expr = parse_str(r#"{T Key={N "x}, Other=1}"#);
        assert_eq!(expr.get("Key"), Some(Some(r#"{N "x}"#)));
        assert_eq!(expr.get("Other"), Some(Some("1")));
    }

    #[test]
    fn unterminated_quote_swallows_rest() {
        let expr = parse_str(r#"{T A="x, B=1}"#);
        assert_eq!(expr.get("A"), Some(Some(r#""x, B=1"#)));
        assert!(!expr.contains("B"));
    }

    #[test]
    fn source_type_key_does_not_replace_type_name() {
        let expr = parse_str("{T @Type=Other}");
        assert_eq!(expr.type_name(), "T");
        assert_eq!(expr.named().count(), 0);
    }

    #[test]
    fn digit_named_key_is_positional() {
        let expr = parse_str("{T 1=A}");
        assert_eq!(expr.positional(), vec![Some("A")]);
    }

    #[test]
    fn markup_extension_detection() {
        assert!(is_markup_extension("{Binding}"));
        assert!(is_markup_extension("  {x:Null}"));
        assert!(!is_markup_extension("{}{literal}"));
        assert!(!is_markup_extension("Red"));
    }
}
