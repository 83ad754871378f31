#![forbid(unsafe_code)]

//! `{name}` placeholder substitution.

/// Replace `{key}` tokens in `template` with the matching value from `args`.
///
/// Tokens whose key is not present in `args` are left intact, as is an
/// unterminated `{`. Substituted values are never scanned again, so a value
/// containing `{key}` is emitted literally.
///
/// ```
/// use retrace_i18n::interpolate;
///
/// assert_eq!(interpolate("Undo {action}", &[("action", "Typing")]), "Undo Typing");
/// assert_eq!(interpolate("Undo {action}", &[]), "Undo {action}");
/// ```
#[must_use]
pub fn interpolate(template: &str, args: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let Some(close) = after.find('}') else {
            // Unterminated: emit the remainder verbatim.
            out.push_str(&rest[open..]);
            return out;
        };
        let key = &after[..close];
        match args.iter().find(|(k, _)| *k == key) {
            Some((_, value)) => out.push_str(value),
            None => {
                out.push('{');
                out.push_str(key);
                out.push('}');
            }
        }
        rest = &after[close + 1..];
    }

    out.push_str(rest);
    out
}
