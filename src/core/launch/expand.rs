// ─── Variable Expander ───
// Substitutes `${name}` placeholders from the launch context.

use super::context::LaunchContext;

/// Replace every `${identifier}` in `template` with the matching context
/// variable. Unknown identifiers expand to the empty string; text that is
/// not a well-formed placeholder is copied through untouched.
pub fn expand(template: &str, ctx: &LaunchContext) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];

        match after.find('}') {
            Some(end) if is_identifier(&after[..end]) => {
                out.push_str(ctx.variable(&after[..end]).unwrap_or(""));
                rest = &after[end + 1..];
            }
            Some(_) => {
                // Not a placeholder; keep scanning after the `${`.
                out.push_str("${");
                rest = after;
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }

    out.push_str(rest);
    out
}

/// Expand each element independently, preserving order.
pub fn expand_all<S: AsRef<str>>(templates: &[S], ctx: &LaunchContext) -> Vec<String> {
    templates
        .iter()
        .map(|template| expand(template.as_ref(), ctx))
        .collect()
}

fn is_identifier(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}
