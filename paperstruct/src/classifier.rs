//! Line classification module.
//!
//! This module provides functionality for:
//! - Detecting abstract markers, keyword lines and section headers
//! - Detecting reference entries, figure/table captions and equation-like lines
//! - Running the detectors in a fixed priority order ([`RULE_ORDER`])

use regex::Regex;
use std::sync::LazyLock;
use strum::Display;

use crate::models::Caption;

/// Matches "Abstract", "ABSTRACT.", "Abstract text". The marker line never carries abstract text.
static ABSTRACT_START: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^abstract(?:$|[\s.])").unwrap());

/// Matches "Keywords:", "Key words.", "Index Terms—".
static KEYWORDS_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:key\s*words?|index\s+terms)\b[\s:.\x{2013}\x{2014}-]*(.*)$").unwrap()
});

static KEYWORD_SEPARATOR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[,;]").unwrap());

/// "1. Introduction", "I INTRODUCTION"
static INTRODUCTION_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[0-9]+|[IVX]+)[.\s]+(?i:introduction)").unwrap());

static NUMBERED_HEADER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]+[.\s]+[A-Z]").unwrap());

static ROMAN_HEADER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[IVX]+[.\s]+[A-Z]").unwrap());

/// One to four capitalized words, e.g. "Related Work".
static TITLE_CASE_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z][a-z]+(?:\s+[A-Z][a-z]+){0,3}$").unwrap());

/// Patterns that start a new bibliography entry:
/// - "[12] ..."
/// - "12. ..."
/// - "(Smith et al., 2020) ..."
/// - "Smith, J. ..."
static REFERENCE_START_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"^\[[0-9]+\]").unwrap(),
        Regex::new(r"^[0-9]+\.").unwrap(),
        Regex::new(r"^\([A-Za-z]").unwrap(),
        Regex::new(r"^[A-Z][a-z]+,").unwrap(),
    ]
});

const REFERENCES_HEADINGS: &[&str] = &["references", "bibliography", "works cited"];

/// Figure patterns: "Figure 1:", "Fig. 2.", "FIG 3", etc.
static FIGURE_CAPTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^fig(?:ure)?\.?\s*([0-9]+)[.:]?\s*(.*)$").unwrap());

/// Table patterns: "Table 1:", "TABLE 2.", etc.
static TABLE_CAPTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^table\.?\s*([0-9]+)[.:]?\s*(.*)$").unwrap());

static EQUATION_NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\(\s*[0-9]+\s*\)$").unwrap());

const EQUATION_OPERATORS: &[char] = &['=', '+', '-', '∫', '∑', '∏'];

/// The coarse position of the scanner, used to enable or disable rules.
///
/// # Variants
///
/// * `Preamble` - Before any abstract or section, or right after the abstract closed.
/// * `Abstract` - Inside the abstract.
/// * `Section` - Inside an ordinary section.
/// * `References` - Inside a references or bibliography section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ScanMode {
    Preamble,
    Abstract,
    Section,
    References,
}

/// A single line as seen by the classifier.
///
/// # Fields
///
/// * `text` - The trimmed line text.
/// * `isolated` - Whether blank lines directly surround the line (already resolved against the isolated header policy).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineContext<'a> {
    pub text: &'a str,
    pub isolated: bool,
}

impl<'a> LineContext<'a> {
    pub fn new(text: &'a str) -> LineContext<'a> {
        LineContext {
            text: text,
            isolated: false,
        }
    }

    pub fn isolated(text: &'a str) -> LineContext<'a> {
        LineContext {
            text: text,
            isolated: true,
        }
    }
}

/// The result of classifying one line.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum LineClass {
    AbstractStart,
    /// A keywords line, already split into keywords.
    Keywords(Vec<String>),
    /// A line that ends the abstract and must be classified again afterwards.
    AbstractClose,
    ReferenceEntry,
    SectionHeader { starts_references: bool },
    ReferencesStart,
    Figure(Caption),
    Table(Caption),
    Equation,
    Plain,
}

/// A single detection rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Rule {
    AbstractStart,
    Keywords,
    AbstractClose,
    SectionHeader,
    ReferencesStart,
    ReferenceEntry,
    Figure,
    Table,
    Equation,
}

/// The priority order of the rules. The first enabled rule that matches wins.
pub const RULE_ORDER: [Rule; 9] = [
    Rule::AbstractStart,
    Rule::Keywords,
    Rule::AbstractClose,
    Rule::SectionHeader,
    Rule::ReferencesStart,
    Rule::ReferenceEntry,
    Rule::Figure,
    Rule::Table,
    Rule::Equation,
];

impl Rule {
    /// Returns `true` if the rule takes part in classification in `mode`.
    pub fn enabled_in(&self, mode: ScanMode) -> bool {
        match self {
            Rule::AbstractStart | Rule::Keywords => true,
            Rule::AbstractClose => mode == ScanMode::Abstract,
            Rule::ReferenceEntry => mode == ScanMode::References,
            Rule::SectionHeader | Rule::ReferencesStart => mode != ScanMode::Abstract,
            Rule::Figure | Rule::Table | Rule::Equation => {
                matches!(mode, ScanMode::Preamble | ScanMode::Section)
            }
        }
    }

    /// Applies the rule to a line, returning its class on a match.
    pub fn classify(&self, line: &LineContext) -> Option<LineClass> {
        let text = line.text;
        match self {
            Rule::AbstractStart => is_abstract_start(text).then_some(LineClass::AbstractStart),
            Rule::Keywords => parse_keywords_line(text).map(LineClass::Keywords),
            Rule::AbstractClose => closes_abstract(text).then_some(LineClass::AbstractClose),
            Rule::ReferenceEntry => is_reference_start(text).then_some(LineClass::ReferenceEntry),
            Rule::SectionHeader => is_section_header(line).then(|| LineClass::SectionHeader {
                starts_references: names_references(text),
            }),
            Rule::ReferencesStart => {
                is_references_heading(text).then_some(LineClass::ReferencesStart)
            }
            Rule::Figure => parse_figure(text).map(LineClass::Figure),
            Rule::Table => parse_table(text).map(LineClass::Table),
            Rule::Equation => is_equation(text).then_some(LineClass::Equation),
        }
    }
}

/// Classifies a line by running the rules enabled in `mode` in [`RULE_ORDER`].
///
/// # Arguments
///
/// * `line` - The line to classify.
/// * `mode` - The current scanner mode.
///
/// # Returns
///
/// The class of the first matching rule, or `LineClass::Plain`.
pub fn classify(line: &LineContext, mode: ScanMode) -> LineClass {
    RULE_ORDER
        .iter()
        .filter(|rule| rule.enabled_in(mode))
        .find_map(|rule| rule.classify(line))
        .unwrap_or(LineClass::Plain)
}

/// Returns `true` for a line that is "abstract" or starts with "abstract" followed by a space or a period.
pub fn is_abstract_start(text: &str) -> bool {
    ABSTRACT_START.is_match(text)
}

/// Parses a keywords line into its keywords.
///
/// # Returns
///
/// `None` if the line does not start with a keywords marker.
pub fn parse_keywords_line(text: &str) -> Option<Vec<String>> {
    let caps = KEYWORDS_LINE.captures(text)?;
    let rest = caps.get(1).map_or("", |m| m.as_str());
    Some(split_keywords(rest))
}

/// Splits on commas and semicolons, trims, and drops empty entries.
pub fn split_keywords(text: &str) -> Vec<String> {
    KEYWORD_SEPARATOR
        .split(text)
        .map(|keyword| keyword.trim().to_string())
        .filter(|keyword| !keyword.is_empty())
        .collect()
}

/// Returns `true` if the line ends an abstract: an introduction header or any numbered header.
pub fn closes_abstract(text: &str) -> bool {
    INTRODUCTION_HEADER.is_match(text) || NUMBERED_HEADER.is_match(text)
}

pub fn is_reference_start(text: &str) -> bool {
    REFERENCE_START_PATTERNS.iter().any(|re| re.is_match(text))
}

/// Returns `true` for a line written entirely in capitals, e.g. "RELATED WORK".
///
/// The line must contain at least one letter, be longer than 3 characters,
/// and not be a figure or table caption.
pub fn is_uppercase_header(text: &str) -> bool {
    text.chars().count() > 3
        && text.chars().any(|c| c.is_alphabetic())
        && !text.chars().any(|c| c.is_lowercase())
        && !text.contains("FIGURE")
        && !text.contains("TABLE")
}

/// Checks if a line is a section header.
///
/// A header is numbered ("2. Methods"), roman-numbered ("IV. RESULTS"),
/// entirely uppercase, or a short Title-Case line standing alone between blank lines.
pub fn is_section_header(line: &LineContext) -> bool {
    let text = line.text;
    NUMBERED_HEADER.is_match(text)
        || ROMAN_HEADER.is_match(text)
        || is_uppercase_header(text)
        || (line.isolated && TITLE_CASE_HEADER.is_match(text))
}

/// Returns `true` if a header title names a bibliography section.
pub fn names_references(title: &str) -> bool {
    let lower = title.to_lowercase();
    lower.contains("reference") || lower.contains("bibliography")
}

/// Returns `true` for a bare "References", "Bibliography" or "Works Cited" line.
pub fn is_references_heading(text: &str) -> bool {
    REFERENCES_HEADINGS.iter().any(|heading| text.eq_ignore_ascii_case(heading))
}

fn parse_caption(re: &Regex, label: &str, text: &str) -> Option<Caption> {
    let caps = re.captures(text)?;
    let number = caps.get(1)?.as_str();
    let caption = caps.get(2).map_or("", |m| m.as_str()).trim();
    Some(Caption {
        id: format!("{} {}", label, number),
        caption: caption.to_string(),
    })
}

/// Parses a figure caption such as "Fig. 3: Results" into `Figure 3` / `Results`.
pub fn parse_figure(text: &str) -> Option<Caption> {
    parse_caption(&FIGURE_CAPTION, "Figure", text)
}

/// Parses a table caption such as "Table 2. Metrics" into `Table 2` / `Metrics`.
pub fn parse_table(text: &str) -> Option<Caption> {
    parse_caption(&TABLE_CAPTION, "Table", text)
}

/// Checks if a line looks like an equation.
///
/// Matches display math (`$$`), `\begin{equation}`, a line wrapped in `$...$`,
/// or a line ending in an equation number like `(3)` that contains an operator.
pub fn is_equation(text: &str) -> bool {
    if text.contains("$$") || text.contains(r"\begin{equation}") {
        return true;
    }
    if text.len() >= 2 && text.starts_with('$') && text.ends_with('$') {
        return true;
    }
    EQUATION_NUMBER.is_match(text) && text.contains(EQUATION_OPERATORS)
}
