use std::collections::HashMap;

/// Replaces `{{name}}` placeholders with values from `vars`
///
/// Whitespace inside the braces is ignored (`{{ name }}` works too).
/// Unknown placeholders are left untouched, as is an unterminated `{{`.
///
/// ```
/// use std::collections::HashMap;
/// use hackathon_api::domain::placeholders::substitute;
///
/// let vars = HashMap::from([("event.name".to_string(), "Spring Hack".to_string())]);
/// assert_eq!(substitute("Welcome to {{ event.name }}!", &vars), "Welcome to Spring Hack!");
/// ```
pub fn substitute(text: &str, vars: &HashMap<String, String>) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find("}}") {
            Some(end) => {
                let name = after[..end].trim();
                match vars.get(name) {
                    Some(value) => out.push_str(value),
                    None => out.push_str(&rest[start..start + 2 + end + 2]),
                }
                rest = &after[end + 2..];
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
