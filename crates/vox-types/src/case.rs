//! String case conversions between skill class names and directory names.

/// Converts a CamelCase skill name to snake_case.
/// Ex. `TimeSkill` -> `time_skill`.
#[must_use]
pub fn to_snake(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, ch) in name.chars().enumerate() {
        if ch.is_uppercase() {
            if i > 0 {
                out.push('_');
            }
            out.extend(ch.to_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

/// Converts a snake_case directory name to CamelCase.
/// Ex. `time_skill` -> `TimeSkill`.
#[must_use]
pub fn to_camel(name: &str) -> String {
    name.split('_')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}
