use serde::{Deserialize, Serialize};

/// The `TextLine` struct represents one trimmed, non-empty line of a document.
///
/// # Fields
///
/// * `text` - The trimmed text of the line.
/// * `raw_index` - The index of the line in the untrimmed line list, blank lines included.
/// * `char_offset` - The character offset of the raw line's start within the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextLine<'a> {
    pub text: &'a str,
    pub raw_index: usize,
    pub char_offset: usize,
}

/// The `DocumentLines` struct splits a document into lines while keeping
/// track of the blank lines that were dropped, so that rules can look at
/// raw adjacency after scanning only the non-empty lines.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentLines<'a> {
    raw: Vec<&'a str>,
    lines: Vec<TextLine<'a>>,
    char_count: usize,
}

impl<'a> DocumentLines<'a> {
    /// Creates a new `DocumentLines` instance from a newline-delimited text.
    ///
    /// Lines are split on `\n`; a trailing `\r` is removed by trimming.
    pub fn new(text: &'a str) -> DocumentLines<'a> {
        let mut raw = Vec::new();
        let mut lines = Vec::new();
        let mut offset = 0;
        for (raw_index, line) in text.split('\n').enumerate() {
            raw.push(line);
            let trimmed = line.trim();
            if !trimmed.is_empty() {
                lines.push(TextLine {
                    text: trimmed,
                    raw_index: raw_index,
                    char_offset: offset,
                });
            }
            offset += line.chars().count() + 1;
        }
        DocumentLines {
            raw: raw,
            lines: lines,
            char_count: text.chars().count(),
        }
    }

    /// Returns the trimmed, non-empty lines in document order.
    pub fn lines(&self) -> &[TextLine<'a>] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Returns the number of characters in the whole document.
    pub fn char_count(&self) -> usize {
        self.char_count
    }

    /// Returns `true` only if raw line `raw_index` exists and is blank.
    ///
    /// A position before the first or after the last line is not blank.
    pub fn is_blank_raw(&self, raw_index: usize) -> bool {
        self.raw.get(raw_index).map_or(false, |line| line.trim().is_empty())
    }

    /// Returns `true` if the raw lines directly before and after `line` are both blank.
    pub fn is_isolated(&self, line: &TextLine) -> bool {
        line.raw_index > 0
            && self.is_blank_raw(line.raw_index - 1)
            && self.is_blank_raw(line.raw_index + 1)
    }
}

/// A figure or table caption detected on a single line.
///
/// # Fields
///
/// * `id` - The normalized label, e.g. `"Figure 3"` or `"Table 1"`.
/// * `caption` - The remaining text of the caption line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caption {
    pub id: String,
    pub caption: String,
}

/// The `Section` struct represents one detected section of a document.
///
/// # Fields
///
/// * `index` - The order in which the header appeared, starting at 0.
/// * `title` - The literal header text.
/// * `body` - The text of all lines belonging to the section, space-joined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub index: usize,
    pub title: String,
    pub body: String,
}

/// Structured metadata recovered from one document.
///
/// Every field is best-effort. An absent `abstract_text` means no abstract
/// marker was found; `Some("")` means a marker was found with nothing after it.
/// `sections` keeps every occurrence of a header, so a title may repeat.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExtractedMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub authors: Vec<String>,
    pub author_affiliations: Vec<String>,
    #[serde(rename = "abstract", skip_serializing_if = "Option::is_none")]
    pub abstract_text: Option<String>,
    pub keywords: Vec<String>,
    pub sections: Vec<Section>,
    pub references: Vec<String>,
    pub figures: Vec<Caption>,
    pub tables: Vec<Caption>,
    pub equations: Vec<String>,
}

impl ExtractedMetadata {
    /// Returns the first section whose title equals `title`.
    pub fn first_section(&self, title: &str) -> Option<&Section> {
        self.sections.iter().find(|section| section.title == title)
    }

    /// Returns every section whose title equals `title`, in document order.
    pub fn sections_titled(&self, title: &str) -> Vec<&Section> {
        self.sections.iter().filter(|section| section.title == title).collect()
    }

    /// Returns a title-keyed view with one entry per distinct title.
    ///
    /// Entries are ordered by the first appearance of each title and carry
    /// the body of its last occurrence, i.e. a later header with the same
    /// text overwrites the earlier body.
    pub fn section_map(&self) -> Vec<(&str, &str)> {
        let mut map: Vec<(&str, &str)> = Vec::new();
        for section in &self.sections {
            match map.iter_mut().find(|(title, _)| *title == section.title) {
                Some(entry) => entry.1 = section.body.as_str(),
                None => map.push((section.title.as_str(), section.body.as_str())),
            }
        }
        map
    }

    /// Returns the detected title, or `fallback` (e.g. the uploaded file name) if none was found.
    pub fn title_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.title.as_deref().unwrap_or(fallback)
    }

    /// Returns `true` if no field carries anything.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.authors.is_empty()
            && self.author_affiliations.is_empty()
            && self.abstract_text.is_none()
            && self.keywords.is_empty()
            && self.sections.is_empty()
            && self.references.is_empty()
            && self.figures.is_empty()
            && self.tables.is_empty()
            && self.equations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(index: usize, title: &str, body: &str) -> Section {
        Section {
            index: index,
            title: title.to_string(),
            body: body.to_string(),
        }
    }

    #[test]
    fn test_document_lines_offsets() {
        let doc = DocumentLines::new("Title line\n\n  Second  \r\nthird");
        let lines = doc.lines();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].text, "Title line");
        assert_eq!(lines[0].raw_index, 0);
        assert_eq!(lines[0].char_offset, 0);
        assert_eq!(lines[1].text, "Second");
        assert_eq!(lines[1].raw_index, 2);
        assert_eq!(lines[1].char_offset, 12);
        assert_eq!(lines[2].text, "third");
        assert_eq!(lines[2].raw_index, 3);
        assert_eq!(doc.char_count(), 29);
    }

    #[test]
    fn test_document_lines_empty() {
        let doc = DocumentLines::new("");
        assert!(doc.is_empty());
        assert_eq!(doc.char_count(), 0);
        let doc = DocumentLines::new("\n \n\t\n");
        assert!(doc.is_empty());
    }

    #[test]
    fn test_is_isolated() {
        let doc = DocumentLines::new("Methods\n\nResults\n\nfoo\nDiscussion\n");
        let lines = doc.lines();
        // first line has nothing before it
        assert!(!doc.is_isolated(&lines[0]));
        assert!(doc.is_isolated(&lines[1]));
        // "foo" is followed directly by "Discussion"
        assert!(!doc.is_isolated(&lines[2]));
        assert!(!doc.is_isolated(&lines[3]));
    }

    #[test]
    fn test_section_lookups() {
        let metadata = ExtractedMetadata {
            sections: vec![
                section(0, "Discussion", "first"),
                section(1, "Methods", "how"),
                section(2, "Discussion", "second"),
            ],
            ..Default::default()
        };

        assert_eq!(metadata.first_section("Discussion").unwrap().body, "first");
        let all = metadata.sections_titled("Discussion");
        assert_eq!(all.len(), 2);
        assert_eq!(all[1].index, 2);
        assert!(metadata.first_section("Results").is_none());

        assert_eq!(
            metadata.section_map(),
            vec![("Discussion", "second"), ("Methods", "how")]
        );
    }

    #[test]
    fn test_title_or_and_is_empty() {
        let mut metadata = ExtractedMetadata::default();
        assert!(metadata.is_empty());
        assert_eq!(metadata.title_or("upload.pdf"), "upload.pdf");

        metadata.title = Some("A Long Enough Title".to_string());
        assert!(!metadata.is_empty());
        assert_eq!(metadata.title_or("upload.pdf"), "A Long Enough Title");
    }

    #[test]
    fn test_metadata_json_keys() {
        let metadata = ExtractedMetadata {
            title: Some("A Long Enough Title".to_string()),
            author_affiliations: vec!["MIT".to_string()],
            abstract_text: Some(String::new()),
            figures: vec![Caption {
                id: "Figure 1".to_string(),
                caption: "Overview".to_string(),
            }],
            ..Default::default()
        };
        let value = serde_json::to_value(&metadata).unwrap();
        for key in [
            "title",
            "authors",
            "authorAffiliations",
            "abstract",
            "keywords",
            "sections",
            "references",
            "figures",
            "tables",
            "equations",
        ] {
            assert!(value.get(key).is_some(), "missing key {}", key);
        }
        assert_eq!(value["abstract"], "");
        assert_eq!(value["figures"][0]["id"], "Figure 1");

        let empty = serde_json::to_value(ExtractedMetadata::default()).unwrap();
        assert!(empty.get("title").is_none());
        assert!(empty.get("abstract").is_none());

        let parsed: ExtractedMetadata = serde_json::from_str(r#"{"authors": ["Jane Doe"]}"#).unwrap();
        assert_eq!(parsed.authors, vec!["Jane Doe".to_string()]);
        assert!(parsed.title.is_none());
    }
}
