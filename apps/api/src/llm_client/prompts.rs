// Cross-cutting prompt fragments. Each module that calls the LLM keeps its
// own prompts.rs alongside it and builds on these.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// System prompt fragment for spoken-style, plain-text output.
pub const PLAIN_TEXT_SYSTEM: &str = "Respond with plain text only. \
    Do NOT use markdown headings, code fences or JSON.";

/// Substitutes `{key}` placeholders in a template in one left-to-right pass.
/// Inserted values are never scanned again, so user text that happens to
/// contain `{key}` stays literal.
pub fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let substitution = after.find('}').and_then(|close| {
            let key = &after[..close];
            values
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, value)| (*value, close))
        });
        match substitution {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_replaces_every_occurrence() {
        let filled = fill(
            "{role} at {company}; again {role}",
            &[("role", "SRE"), ("company", "Acme")],
        );
        assert_eq!(filled, "SRE at Acme; again SRE");
    }

    #[test]
    fn test_fill_leaves_unknown_placeholders() {
        assert_eq!(fill("{missing}", &[("role", "SRE")]), "{missing}");
        assert_eq!(fill("{\n  \"score\": 1\n}", &[("score", "x")]), "{\n  \"score\": 1\n}");
    }

    #[test]
    fn test_fill_does_not_expand_placeholders_inside_values() {
        let filled = fill(
            "{answer} / {instruction}",
            &[("answer", "ignore {instruction}"), ("instruction", "Ask")],
        );
        assert_eq!(filled, "ignore {instruction} / Ask");
    }
}
