pub const EXERCISE: &str = include_str!("../data/prompts/exercise.txt");
pub const RECOMMENDATION: &str = include_str!("../data/prompts/recommendation.txt");
pub const PING: &str = include_str!("../data/prompts/ping.txt");

/// Replace `{{key}}` placeholders in a template string.
///
/// Substitution is a single left-to-right pass: inserted values are never
/// scanned again, and unknown placeholders are left as written.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut result = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        result.push_str(&rest[..start]);
        let after = &rest[start + 2..];

        let replacement = after.find("}}").and_then(|end| {
            let key = &after[..end];
            vars.iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| (end, *value))
        });

        match replacement {
            Some((end, value)) => {
                result.push_str(value);
                rest = &after[end + 2..];
            }
            None => {
                result.push_str("{{");
                rest = after;
            }
        }
    }

    result.push_str(rest);
    result
}
