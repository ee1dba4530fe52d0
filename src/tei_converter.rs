use std::collections::HashMap;
use once_cell::sync::Lazy;
use log::{warn, debug};
use roxmltree::{Document, Node};

use crate::dictionary_model::{Definition, Dictionary, Entry, Etymology, Usage};
use crate::errors::ConversionError;

// @module: TEI to normalized dictionary model conversion

/// Name of the source collection, used as the dictionary identifier
pub const DICTIONARY_NAME: &str = "FreeDict";

/// Sentinel part-of-speech tag for entries without grammatical info
pub const UNKNOWN_POS: &str = "un";

// @const: Source part-of-speech tag -> controlled output vocabulary
static POS_MAP: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("art", "det"),  // Articles function as determiners
        ("ger", "n"),    // Gerunds function as nouns
        ("int", "intj"),
        ("vn", "n"),     // Verbal nouns are treated as nouns
        ("ptcl", "part"),
        ("suffix", "suff"),
        ("abbreviation", "abv"),
        ("interjection", "intj"),
        ("pn", "propn"),
        ("letter", "sym"),
        ("prefix", "pref"),
        ("preposition", "prep"),
        ("conjunction", "conj"),
        ("numeral", "num"),
        ("indefinitePronoun", "pron"),
        ("demonstrativePronoun", "pron"),
        ("pronominalAdverb", "adv"),
        ("Adverb", "adv"),
        ("Adjective", "adj"),
        ("Verb", "v"),
        ("particle", "part"),
        ("postposition", "prep"),
    ])
});

/// Normalize a source-specific part-of-speech tag to the controlled vocabulary.
///
/// Unknown tags pass through unchanged rather than failing, so unmapped
/// vocabulary from independently maintained source dictionaries survives
/// verbatim.
pub fn normalize_pos(raw: &str) -> &str {
    POS_MAP.get(raw).copied().unwrap_or(raw)
}

// @struct: Per-entry facts extracted from one TEI entry node
#[derive(Debug, Clone)]
pub struct SourceEntry {
    // @field: Headword text, required
    pub term: String,

    // @field: Pronunciation, empty if absent
    pub pronunciation: String,

    // @field: Raw part-of-speech tag, sentinel "un" if absent
    pub raw_pos: String,

    // @field: Entry-level head description, empty if absent
    pub head_description: String,

    // @field: Senses in document order, empty senses already dropped
    pub senses: Vec<SourceSense>,
}

// @struct: One sense-level grouping of citations
#[derive(Debug, Clone)]
pub struct SourceSense {
    // @field: Sense description, empty if absent
    pub description: String,

    // @field: Citation texts, trimmed with inner line breaks joined by "; "
    pub definitions: Vec<String>,
}

/// Extract per-entry facts from a parsed TEI document, lazily and in
/// document order.
///
/// Each item is either a [`SourceEntry`] or an entry-scoped error for an
/// entry node without a headword; document-level problems are caught
/// earlier, at parse time.
pub fn extract_entries<'a, 'd>(
    document: &'a Document<'d>,
) -> impl Iterator<Item = Result<SourceEntry, ConversionError>> + 'a {
    // TEI files may or may not carry the TEI namespace, so elements are
    // matched on local names throughout.
    let body = document
        .descendants()
        .find(|n| n.tag_name().name() == "body");

    body.into_iter()
        .flat_map(|b| b.descendants())
        .filter(|n| n.is_element() && n.tag_name().name() == "entry")
        .enumerate()
        .map(|(index, node)| extract_entry(index, node))
}

/// Extract one entry node into a [`SourceEntry`]
fn extract_entry(index: usize, node: Node) -> Result<SourceEntry, ConversionError> {
    let term = first_descendant_text(node, "orth")
        .ok_or(ConversionError::MissingTerm { index })?;
    if term.is_empty() {
        return Err(ConversionError::MissingTerm { index });
    }

    let pronunciation = first_descendant_text(node, "pron").unwrap_or_default();

    let raw_pos = node
        .descendants()
        .find(|n| n.tag_name().name() == "gramGrp")
        .and_then(|g| first_descendant_text(g, "pos"))
        .unwrap_or_else(|| UNKNOWN_POS.to_string());

    // The entry's own description lives in a def element outside any sense;
    // sense-level defs are collected separately below.
    let head_description = node
        .descendants()
        .find(|n| {
            n.tag_name().name() == "def"
                && !n
                    .ancestors()
                    .take_while(|a| a.id() != node.id())
                    .any(|a| a.tag_name().name() == "sense")
        })
        .map(collect_text)
        .unwrap_or_default();

    let mut senses = Vec::new();
    for sense_node in node
        .descendants()
        .filter(|n| n.is_element() && n.tag_name().name() == "sense")
    {
        let description = first_descendant_text(sense_node, "def").unwrap_or_default();

        let definitions: Vec<String> = sense_node
            .descendants()
            .filter(|n| n.is_element() && n.tag_name().name() == "cit")
            .map(|cit| collect_text(cit).trim().replace('\n', "; "))
            .collect();

        // A sense without citations contributes nothing
        if !definitions.is_empty() {
            senses.push(SourceSense {
                description,
                definitions,
            });
        }
    }

    Ok(SourceEntry {
        term,
        pronunciation,
        raw_pos,
        head_description,
        senses,
    })
}

/// Text of the first descendant element with the given local name
fn first_descendant_text(node: Node, name: &str) -> Option<String> {
    node.descendants()
        .find(|n| n.is_element() && n.tag_name().name() == name)
        .map(collect_text)
}

/// Concatenated text content of a node and all its descendants
fn collect_text(node: Node) -> String {
    node.descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect()
}

/// Build the normalized dictionary model from a sequence of extracted entries.
///
/// Entries whose every sense is empty are dropped. Duplicate terms are
/// resolved last-write-wins: the later occurrence replaces the earlier one
/// while keeping its first-seen position.
pub fn assemble<I>(source_entries: I) -> Dictionary
where
    I: IntoIterator<Item = SourceEntry>,
{
    let mut dictionary = Dictionary::new(DICTIONARY_NAME);

    for source in source_entries {
        // Part-of-speech is attached to the entry's grammar group, so all
        // senses under one entry share the same normalized tag.
        let pos = normalize_pos(&source.raw_pos).to_string();

        let mut etymology = Etymology::new(source.head_description.clone());
        for sense in &source.senses {
            if sense.definitions.is_empty() {
                continue;
            }
            let definitions = sense
                .definitions
                .iter()
                .map(|d| Definition::new(d.clone()))
                .collect();
            etymology.add_usage(Usage::new(pos.clone(), sense.description.clone(), definitions));
        }

        if etymology.is_empty() {
            // Not malformed input, just an empty entry
            debug!("Dropping entry '{}' with no usable definitions", source.term);
            continue;
        }

        let mut entry = Entry::new(source.term, source.pronunciation);
        entry.add_etymology(etymology);
        dictionary.insert(entry);
    }

    dictionary
}

/// Convert a raw TEI document into the canonical output markup.
///
/// Malformed XML is fatal for the whole conversion; entries without a
/// headword are skipped with a warning.
pub fn convert(raw: &[u8]) -> Result<String, ConversionError> {
    convert_with_progress(raw, |_| {})
}

/// Same as [`convert`], reporting each extracted entry to `progress` with a
/// running count. The callback is purely observational.
pub fn convert_with_progress<F>(raw: &[u8], mut progress: F) -> Result<String, ConversionError>
where
    F: FnMut(usize),
{
    let text = std::str::from_utf8(raw)
        .map_err(|e| ConversionError::Parse(format!("input is not valid UTF-8: {}", e)))?;
    let document = Document::parse(text)?;

    let mut extracted = Vec::new();
    let mut seen = 0usize;
    for result in extract_entries(&document) {
        seen += 1;
        progress(seen);
        match result {
            Ok(source_entry) => extracted.push(source_entry),
            Err(e) => warn!("Skipping entry: {}", e),
        }
    }

    let dictionary = assemble(extracted);
    dictionary.to_xml()
}

/// Build the in-memory model without serializing, for callers that want to
/// inspect the dictionary before rendering it
pub fn convert_to_model(raw: &[u8]) -> Result<Dictionary, ConversionError> {
    let text = std::str::from_utf8(raw)
        .map_err(|e| ConversionError::Parse(format!("input is not valid UTF-8: {}", e)))?;
    let document = Document::parse(text)?;

    let mut extracted = Vec::new();
    for result in extract_entries(&document) {
        match result {
            Ok(source_entry) => extracted.push(source_entry),
            Err(e) => warn!("Skipping entry: {}", e),
        }
    }

    Ok(assemble(extracted))
}
