use std::collections::HashMap;
use std::fmt;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::errors::ConversionError;

// @module: Normalized dictionary document model and XML serialization

/// A single citation/gloss text belonging to a usage
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Definition {
    /// Gloss text, already whitespace-normalized
    pub text: String,
}

impl Definition {
    pub fn new<S: Into<String>>(text: S) -> Self {
        Definition { text: text.into() }
    }
}

/// A group of definitions sharing one part-of-speech and sense description
///
/// Identity is structural: two usages with the same part-of-speech,
/// description and definitions compare equal and hash identically, so
/// set-style containers collapse them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Usage {
    /// Normalized part-of-speech tag
    pub part_of_speech: String,

    /// Sense-level description, possibly empty
    pub description: String,

    /// Definitions under this usage, never empty in an assembled model
    pub definitions: Vec<Definition>,
}

impl Usage {
    pub fn new<S1: Into<String>, S2: Into<String>>(
        part_of_speech: S1,
        description: S2,
        definitions: Vec<Definition>,
    ) -> Self {
        Usage {
            part_of_speech: part_of_speech.into(),
            description: description.into(),
            definitions,
        }
    }
}

/// A grouping of usages sharing one head description within an entry
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Etymology {
    /// Entry-level head description, possibly empty
    pub description: String,

    /// Insertion-ordered value-set of usages
    usages: Vec<Usage>,
}

impl Etymology {
    pub fn new<S: Into<String>>(description: S) -> Self {
        Etymology {
            description: description.into(),
            usages: Vec::new(),
        }
    }

    /// Add a usage, collapsing structural duplicates.
    ///
    /// Insertion order of first encounter is kept so serialization stays
    /// deterministic for a given model instance.
    pub fn add_usage(&mut self, usage: Usage) {
        if !self.usages.contains(&usage) {
            self.usages.push(usage);
        }
    }

    pub fn usages(&self) -> &[Usage] {
        &self.usages
    }

    pub fn is_empty(&self) -> bool {
        self.usages.is_empty()
    }
}

/// One headword's full record in the output model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Headword text, the unique key within a dictionary
    pub term: String,

    /// Pronunciation, possibly empty
    pub pronunciation: String,

    /// Insertion-ordered value-set of etymologies
    etymologies: Vec<Etymology>,
}

impl Entry {
    pub fn new<S1: Into<String>, S2: Into<String>>(term: S1, pronunciation: S2) -> Self {
        Entry {
            term: term.into(),
            pronunciation: pronunciation.into(),
            etymologies: Vec::new(),
        }
    }

    /// Add an etymology, collapsing structural duplicates
    pub fn add_etymology(&mut self, etymology: Etymology) {
        if !self.etymologies.contains(&etymology) {
            self.etymologies.push(etymology);
        }
    }

    pub fn etymologies(&self) -> &[Etymology] {
        &self.etymologies
    }

    /// An entry is emitted only if some etymology carries at least one usage
    pub fn has_content(&self) -> bool {
        self.etymologies.iter().any(|e| !e.is_empty())
    }
}

/// Root dictionary container holding unique entries in first-seen term order
#[derive(Debug)]
pub struct Dictionary {
    /// Identifier for the source collection
    pub name: String,

    /// Entries in key-insertion order
    entries: Vec<Entry>,

    /// Term -> position in `entries`
    index: HashMap<String, usize>,
}

impl Dictionary {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Dictionary {
            name: name.into(),
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Insert an entry keyed by its term.
    ///
    /// A duplicate term overwrites the earlier entry's value but keeps its
    /// original position (last-write-wins, like a term-keyed ordered map).
    pub fn insert(&mut self, entry: Entry) {
        match self.index.get(&entry.term) {
            Some(&pos) => {
                self.entries[pos] = entry;
            }
            None => {
                self.index.insert(entry.term.clone(), self.entries.len());
                self.entries.push(entry);
            }
        }
    }

    pub fn get(&self, term: &str) -> Option<&Entry> {
        self.index.get(term).map(|&pos| &self.entries[pos])
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render the model to the canonical output markup.
    ///
    /// Output is deterministic: identical model input always yields
    /// byte-identical text, with elements in model order.
    pub fn to_xml(&self) -> Result<String, ConversionError> {
        let mut writer = Writer::new(Vec::new());

        let mut root = BytesStart::new("dictionary");
        root.push_attribute(("name", self.name.as_str()));
        write_event(&mut writer, Event::Start(root))?;

        for entry in &self.entries {
            let mut entry_el = BytesStart::new("entry");
            entry_el.push_attribute(("term", entry.term.as_str()));
            write_event(&mut writer, Event::Start(entry_el))?;

            if !entry.pronunciation.is_empty() {
                write_event(&mut writer, Event::Start(BytesStart::new("pronunciation")))?;
                write_event(&mut writer, Event::Text(BytesText::new(&entry.pronunciation)))?;
                write_event(&mut writer, Event::End(BytesEnd::new("pronunciation")))?;
            }

            for etymology in entry.etymologies() {
                let mut ety_el = BytesStart::new("ety");
                ety_el.push_attribute(("description", etymology.description.as_str()));
                write_event(&mut writer, Event::Start(ety_el))?;

                for usage in etymology.usages() {
                    let mut usage_el = BytesStart::new("usage");
                    usage_el.push_attribute(("pos", usage.part_of_speech.as_str()));
                    usage_el.push_attribute(("description", usage.description.as_str()));
                    write_event(&mut writer, Event::Start(usage_el))?;

                    for definition in &usage.definitions {
                        write_event(&mut writer, Event::Start(BytesStart::new("definition")))?;
                        write_event(&mut writer, Event::Text(BytesText::new(&definition.text)))?;
                        write_event(&mut writer, Event::End(BytesEnd::new("definition")))?;
                    }

                    write_event(&mut writer, Event::End(BytesEnd::new("usage")))?;
                }

                write_event(&mut writer, Event::End(BytesEnd::new("ety")))?;
            }

            write_event(&mut writer, Event::End(BytesEnd::new("entry")))?;
        }

        write_event(&mut writer, Event::End(BytesEnd::new("dictionary")))?;

        String::from_utf8(writer.into_inner())
            .map_err(|e| ConversionError::Serialize(e.to_string()))
    }
}

fn write_event(writer: &mut Writer<Vec<u8>>, event: Event) -> Result<(), ConversionError> {
    writer
        .write_event(event)
        .map_err(|e| ConversionError::Serialize(e.to_string()))
}

impl fmt::Display for Dictionary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Dictionary: {}", self.name)?;
        writeln!(f, "Entries: {}", self.entries.len())?;
        Ok(())
    }
}
