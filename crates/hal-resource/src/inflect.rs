//! Name inflection for type hints and collection paths.

/// Camel-case a type hint: `"mainframe"` becomes `"Mainframe"`,
/// `"database_credential"` becomes `"DatabaseCredential"` and a `/`
/// separated hint becomes a `::` path.
pub fn camelize(hint: &str) -> String {
    hint.split('/')
        .map(|segment| {
            segment
                .split('_')
                .filter(|word| !word.is_empty())
                .map(capitalize)
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("::")
}

/// Upper-case the first character, leaving the rest untouched.
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Lower-case and pluralize a type name: `"Mainframe"` becomes
/// `"mainframes"`, `"Policy"` becomes `"policies"`.
pub fn pluralize(name: &str) -> String {
    let word = name.to_lowercase();

    if word.ends_with('s')
        || word.ends_with('x')
        || word.ends_with('z')
        || word.ends_with("ch")
        || word.ends_with("sh")
    {
        return format!("{word}es");
    }

    if let Some(stem) = word.strip_suffix('y')
        && !stem.ends_with(['a', 'e', 'i', 'o', 'u'])
        && !stem.is_empty()
    {
        return format!("{stem}ies");
    }

    format!("{word}s")
}
