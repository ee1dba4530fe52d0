use anyhow::{Result, anyhow};
use isolang::Language;
use once_cell::sync::Lazy;
use regex::Regex;

/// Language utilities for FreeDict language pair handling
///
/// FreeDict names its dictionaries after ISO 639-3 language pairs such as
/// "eng-deu" or "fra-bre". This module validates that syntax and resolves
/// the codes to human-readable language names for display.
// @const: Language pair syntax, two ISO 639-3 codes joined by a dash
static PAIR_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([a-z]{3})-([a-z]{3})$").unwrap()
});

/// Validate a language pair identifier and split it into its two codes
pub fn split_language_pair(pair: &str) -> Result<(String, String)> {
    let normalized = pair.trim().to_lowercase();
    let captures = PAIR_REGEX
        .captures(&normalized)
        .ok_or_else(|| anyhow!("Invalid language pair: {}", pair))?;

    Ok((captures[1].to_string(), captures[2].to_string()))
}

/// Check whether a string looks like a FreeDict language pair identifier
pub fn is_language_pair(pair: &str) -> bool {
    PAIR_REGEX.is_match(pair.trim().to_lowercase().as_str())
}

/// Get the English language name for an ISO 639-3 code
pub fn get_language_name(code: &str) -> Result<String> {
    let normalized = code.trim().to_lowercase();
    let lang = Language::from_639_3(&normalized)
        .ok_or_else(|| anyhow!("Unknown language code: {}", code))?;

    Ok(lang.to_name().to_string())
}

/// Human-readable display name for a language pair, falling back to the raw
/// codes when a code is not a known ISO 639-3 language
pub fn pair_display_name(pair: &str) -> String {
    match split_language_pair(pair) {
        Ok((source, target)) => {
            let source_name = get_language_name(&source).unwrap_or(source);
            let target_name = get_language_name(&target).unwrap_or(target);
            format!("{} -> {}", source_name, target_name)
        }
        Err(_) => pair.to_string(),
    }
}
