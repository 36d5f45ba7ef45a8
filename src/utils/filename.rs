use crate::utils::constants::JSON_EXTENSION;

/// Letters outside basic Latin that appear in Danish municipality names,
/// applied after lowercasing.
const TRANSLITERATIONS: [(char, &str); 8] = [
    ('æ', "ae"),
    ('ø', "oe"),
    ('å', "aa"),
    ('ä', "ae"),
    ('ö', "oe"),
    ('ü', "ue"),
    ('é', "e"),
    ('è', "e"),
];

const FALLBACK_STEM: &str = "region";

/// Filename stem for a region: lowercase ASCII letters, digits, `_` and `-` only.
///
/// # Examples
/// ```
/// use windfarm_processor::utils::region_file_stem;
///
/// assert_eq!(region_file_stem("Århus"), "aarhus");
/// assert_eq!(region_file_stem("Høje-Taastrup"), "hoeje-taastrup");
/// ```
pub fn region_file_stem(region: &str) -> String {
    let mut stem = String::with_capacity(region.len());

    for ch in region.trim().to_lowercase().chars() {
        if let Some((_, replacement)) = TRANSLITERATIONS.iter().find(|(from, _)| *from == ch) {
            stem.push_str(replacement);
        } else if ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-' || ch == '_' {
            stem.push(ch);
        } else if ch.is_whitespace() && !stem.ends_with('_') {
            stem.push('_');
        }
    }

    let stem = stem.trim_matches(|c| c == '_' || c == '-');
    if stem.is_empty() {
        FALLBACK_STEM.to_string()
    } else {
        stem.to_string()
    }
}

/// `<stem>.json`
pub fn region_file_name(region: &str) -> String {
    format!("{}.{}", region_file_stem(region), JSON_EXTENSION)
}
