//! Title, author and affiliation detection on the first page.
//!
//! Without layout information the first page is approximated by the first
//! `title_search_fraction` of the document's characters.

use regex::Regex;
use std::sync::LazyLock;

use crate::classifier::is_abstract_start;
use crate::config::ExtractorConfig;
use crate::models::DocumentLines;

static AND_SEPARATOR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\s+and\s+").unwrap());

/// Title, authors and affiliations found at the top of a document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FrontMatter {
    pub title: Option<String>,
    pub authors: Vec<String>,
    pub affiliations: Vec<String>,
}

/// Detects the front matter of a document.
///
/// Authors and affiliations are only looked for when a title was found.
///
/// # Arguments
///
/// * `doc` - The document lines.
/// * `config` - The extractor configuration.
/// * `boilerplate` - Compiled patterns excluding title candidates.
pub fn detect_front_matter(
    doc: &DocumentLines,
    config: &ExtractorConfig,
    boilerplate: &[Regex],
) -> FrontMatter {
    let Some(title_pos) = find_title(doc, config, boilerplate) else {
        return FrontMatter::default();
    };
    let title = doc.lines()[title_pos].text.to_string();
    tracing::debug!("Detected title: {}", title);

    let author_lines = find_author_lines(doc, title_pos, config);
    // line breaks separate names like commas do
    let joined = author_lines
        .iter()
        .map(|pos| doc.lines()[*pos].text)
        .collect::<Vec<&str>>()
        .join(", ");
    let authors = split_authors(&joined);
    let affiliations = match author_lines.first() {
        Some(first) => find_affiliations(doc, *first, config),
        None => Vec::new(),
    };
    tracing::debug!(
        "Detected {} authors and {} affiliations",
        authors.len(),
        affiliations.len()
    );

    FrontMatter {
        title: Some(title),
        authors: authors,
        affiliations: affiliations,
    }
}

/// Finds the title line.
///
/// # Returns
///
/// The position (in `doc.lines()`) of the first line inside the first-page
/// window that is a title candidate, or `None`.
pub fn find_title(doc: &DocumentLines, config: &ExtractorConfig, boilerplate: &[Regex]) -> Option<usize> {
    let window = (doc.char_count() as f64 * config.title_search_fraction).floor() as usize;
    doc.lines()
        .iter()
        .take_while(|line| line.char_offset < window)
        .position(|line| is_title_candidate(line.text, config.min_title_chars, boilerplate))
}

/// Returns `true` if a line is longer than `min_chars` and matches no boilerplate pattern.
pub fn is_title_candidate(text: &str, min_chars: usize, boilerplate: &[Regex]) -> bool {
    text.chars().count() > min_chars && !boilerplate.iter().any(|re| re.is_match(text))
}

fn has_affiliation_keyword(text: &str, keywords: &[String]) -> bool {
    let lower = text.to_lowercase();
    keywords.iter().any(|keyword| lower.contains(&keyword.to_lowercase()))
}

/// Checks if a line may list authors.
///
/// A line qualifies if it contains an email address, or a comma with no
/// colon and no "abstract". Lines naming an institution never qualify.
pub fn is_author_candidate(text: &str, affiliation_keywords: &[String]) -> bool {
    if has_affiliation_keyword(text, affiliation_keywords) {
        return false;
    }
    if text.contains('@') {
        return true;
    }
    text.contains(',') && !text.contains(':') && !text.to_lowercase().contains("abstract")
}

/// Returns the positions of the author candidate lines following the title.
///
/// Scans at most `author_lookahead_lines` lines and stops at an abstract marker.
pub fn find_author_lines(doc: &DocumentLines, title_pos: usize, config: &ExtractorConfig) -> Vec<usize> {
    doc.lines()
        .iter()
        .enumerate()
        .skip(title_pos + 1)
        .take(config.author_lookahead_lines)
        .take_while(|(_, line)| !is_abstract_start(line.text))
        .filter(|(_, line)| is_author_candidate(line.text, &config.affiliation_keywords))
        .map(|(pos, _)| pos)
        .collect()
}

/// Splits a list of names on top-level commas and on the word "and".
///
/// Commas inside parentheses do not split. Pieces that are empty, one
/// character long, or contain an email address are dropped.
pub fn split_authors(text: &str) -> Vec<String> {
    let mut pieces: Vec<&str> = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (idx, c) in text.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                pieces.push(&text[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }
    pieces.push(&text[start..]);

    pieces
        .into_iter()
        .flat_map(|piece| AND_SEPARATOR.split(piece))
        .map(|name| name.trim())
        .filter(|name| name.chars().count() > 1 && !name.contains('@'))
        .map(|name| name.to_string())
        .collect()
}

/// Collects affiliation lines following the first author line.
///
/// Scans at most `affiliation_lookahead_lines` lines, stops at an abstract
/// marker, and keeps every line naming an institution, in order.
pub fn find_affiliations(doc: &DocumentLines, author_pos: usize, config: &ExtractorConfig) -> Vec<String> {
    doc.lines()
        .iter()
        .skip(author_pos + 1)
        .take(config.affiliation_lookahead_lines)
        .take_while(|line| !is_abstract_start(line.text))
        .filter(|line| has_affiliation_keyword(line.text, &config.affiliation_keywords))
        .map(|line| line.text.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boilerplate(config: &ExtractorConfig) -> Vec<Regex> {
        config.compile_boilerplate().unwrap()
    }

    fn detect(text: &str) -> FrontMatter {
        let config = ExtractorConfig::new();
        let doc = DocumentLines::new(text);
        detect_front_matter(&doc, &config, &boilerplate(&config))
    }

    fn padded(front: &str) -> String {
        // keep the front matter inside the first-page window
        format!("{}\n\n{}", front, "Body text of the paper goes on.\n".repeat(40))
    }

    #[test]
    fn test_title_skips_boilerplate() {
        let config = ExtractorConfig::new();
        let patterns = boilerplate(&config);
        assert!(!is_title_candidate("Journal of Machine Learning Research", 10, &patterns));
        assert!(!is_title_candidate("Vol. 12, No. 3", 10, &patterns));
        assert!(!is_title_candidate("Volume 21, Issue 4", 10, &patterns));
        assert!(!is_title_candidate("ISSUE 7 - Spring", 10, &patterns));
        assert!(!is_title_candidate("Short one", 10, &patterns));
        assert!(!is_title_candidate("Ten chars!", 10, &patterns));
        assert!(is_title_candidate("Eleven char", 10, &patterns));
        assert!(is_title_candidate("Volumetric Rendering of Clouds", 10, &patterns));
        assert!(is_title_candidate("Issues in Peer Review", 10, &patterns));
    }

    #[test]
    fn test_find_title_first_match_wins() {
        let front = detect(&padded(
            "Journal of Things, 2020\nVol. 3\nA Practical Title for Testing\nAnother Long Candidate Line",
        ));
        assert_eq!(front.title.as_deref(), Some("A Practical Title for Testing"));
    }

    #[test]
    fn test_find_title_outside_window() {
        // the only long line starts past the first 15% of characters
        let text = format!("{}Too late to be a title line", "x\n".repeat(100));
        assert_eq!(detect(&text), FrontMatter::default());
    }

    #[test]
    fn test_find_title_uses_whole_line() {
        // a title longer than the window is never truncated
        let text = "A Study of Graph Neural Networks for Drug Discovery\n\nshort\nlines\nonly";
        assert_eq!(
            detect(text).title.as_deref(),
            Some("A Study of Graph Neural Networks for Drug Discovery")
        );
    }

    #[test]
    fn test_authors_and_affiliations() {
        let front = detect(&padded(
            "A Study of Graph Neural Networks for Drug Discovery\n\nJane Doe, John Smith\nDepartment of Computer Science, MIT\n\nAbstract\nThis paper presents...",
        ));
        assert_eq!(front.authors, vec!["Jane Doe", "John Smith"]);
        assert_eq!(front.affiliations, vec!["Department of Computer Science, MIT"]);
    }

    #[test]
    fn test_authors_across_lines_with_emails() {
        let front = detect(&padded(
            "Sparse Attention Mechanisms for Long Documents\nMaria Garcia, Tom Lee and Ken Ito\nmaria@uni.edu, tom@uni.edu\nUniversity of Somewhere\nInstitute for Testing\nAbstract",
        ));
        assert_eq!(front.authors, vec!["Maria Garcia", "Tom Lee", "Ken Ito"]);
        assert_eq!(
            front.affiliations,
            vec!["University of Somewhere", "Institute for Testing"]
        );
    }

    #[test]
    fn test_no_author_lines() {
        let front = detect(&padded(
            "A Title Without Any Authors Listed\nThis line has no comma\nNeither: does, this one",
        ));
        assert!(front.title.is_some());
        assert!(front.authors.is_empty());
        assert!(front.affiliations.is_empty());
    }

    #[test]
    fn test_author_lookahead_limit() {
        let front = detect(&padded(
            "A Title Followed By Filler Lines\none\ntwo\nthree\nfour\nfive\nLate Author, Other Author",
        ));
        assert!(front.authors.is_empty());
    }

    #[test]
    fn test_is_author_candidate() {
        let keywords = ExtractorConfig::new().affiliation_keywords;
        assert!(is_author_candidate("Jane Doe, John Smith", &keywords));
        assert!(is_author_candidate("jane@mit.edu", &keywords));
        assert!(!is_author_candidate("Jane Doe and John Smith", &keywords));
        assert!(!is_author_candidate("Note: see below, please", &keywords));
        assert!(!is_author_candidate("Abstract, continued", &keywords));
        assert!(!is_author_candidate("School of Chemistry, University of Leeds", &keywords));
    }

    #[test]
    fn test_split_authors() {
        assert_eq!(
            split_authors("Alice Martin, Bob Chen and Carol White"),
            vec!["Alice Martin", "Bob Chen", "Carol White"]
        );
        assert_eq!(split_authors("A. One, and B. Two"), vec!["A. One", "B. Two"]);
        assert_eq!(
            split_authors("Jane Doe (MIT, USA), John Smith AND Li Wei"),
            vec!["Jane Doe (MIT, USA)", "John Smith", "Li Wei"]
        );
        assert_eq!(split_authors("X, , jane@mit.edu, Sandra Anderson"), vec!["Sandra Anderson"]);
        assert!(split_authors("").is_empty());
    }
}
