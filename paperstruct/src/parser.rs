use anyhow::Result;
use regex::Regex;
use std::sync::LazyLock;

use crate::classifier::{classify, LineClass, LineContext, ScanMode};
use crate::config::{ExtractorConfig, IsolatedHeaderPolicy, DEFAULT_TITLE_BOILERPLATE};
use crate::frontmatter::detect_front_matter;
use crate::models::{DocumentLines, ExtractedMetadata, Section};

static DEFAULT_BOILERPLATE: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    DEFAULT_TITLE_BOILERPLATE.iter().map(|pattern| Regex::new(pattern).unwrap()).collect()
});

static DEFAULT_EXTRACTOR: LazyLock<Extractor> = LazyLock::new(Extractor::default);

/// Title given to a references section opened by a bare "References" line.
pub const REFERENCES_TITLE: &str = "References";

/// Where the forward pass currently is. Exactly one of these holds at a time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ScanState {
    #[default]
    Preamble,
    InAbstract,
    InSection(String),
    InReferences(String),
}

impl ScanState {
    pub fn mode(&self) -> ScanMode {
        match self {
            ScanState::Preamble => ScanMode::Preamble,
            ScanState::InAbstract => ScanMode::Abstract,
            ScanState::InSection(_) => ScanMode::Section,
            ScanState::InReferences(_) => ScanMode::References,
        }
    }

    pub fn has_open_section(&self) -> bool {
        matches!(self, ScanState::InSection(_) | ScanState::InReferences(_))
    }
}

/// Single forward pass over the lines of one document.
///
/// Lines are fed in order; `body` accumulates the text of the open abstract
/// or section until it is committed.
#[derive(Debug, Default)]
struct Scanner {
    state: ScanState,
    body: String,
    out: ExtractedMetadata,
}

impl Scanner {
    fn new() -> Scanner {
        Scanner::default()
    }

    fn feed(&mut self, line: LineContext) {
        let class = classify(&line, self.state.mode());
        tracing::trace!("[{}] {} <- {}", self.state.mode(), class, line.text);
        self.apply(line, class);
    }

    fn apply(&mut self, line: LineContext, class: LineClass) {
        let text = line.text;
        match class {
            LineClass::AbstractStart => {
                self.commit_section();
                self.body.clear();
                self.state = ScanState::InAbstract;
            }
            LineClass::Keywords(keywords) => {
                if self.state == ScanState::InAbstract {
                    self.close_abstract();
                }
                self.out.keywords = keywords;
            }
            LineClass::AbstractClose => {
                self.close_abstract();
                // the closing line is usually a header: classify it again outside the abstract
                self.feed(line);
            }
            LineClass::SectionHeader { starts_references } => {
                self.commit_section();
                let title = text.to_string();
                tracing::debug!("Opened section: {}", title);
                self.state = match starts_references {
                    true => ScanState::InReferences(title),
                    false => ScanState::InSection(title),
                };
            }
            LineClass::ReferencesStart => {
                self.commit_section();
                tracing::debug!("Opened section: {}", REFERENCES_TITLE);
                self.state = ScanState::InReferences(REFERENCES_TITLE.to_string());
            }
            LineClass::ReferenceEntry => {
                self.out.references.push(text.to_string());
                self.push_body(text);
            }
            LineClass::Figure(caption) => {
                self.out.figures.push(caption);
                self.push_section_body(text);
            }
            LineClass::Table(caption) => {
                self.out.tables.push(caption);
                self.push_section_body(text);
            }
            LineClass::Equation => {
                self.out.equations.push(text.to_string());
                self.push_section_body(text);
            }
            LineClass::Plain => match self.state.mode() {
                ScanMode::Preamble => {}
                ScanMode::Abstract | ScanMode::Section => self.push_body(text),
                ScanMode::References => {
                    if let Some(last) = self.out.references.last_mut() {
                        last.push(' ');
                        last.push_str(text);
                    }
                    self.push_body(text);
                }
            },
        }
    }

    fn push_body(&mut self, text: &str) {
        self.body.push_str(text);
        self.body.push(' ');
    }

    fn push_section_body(&mut self, text: &str) {
        if self.state.has_open_section() {
            self.push_body(text);
        }
    }

    /// Stores the open section, if any, and returns to the preamble state.
    fn commit_section(&mut self) {
        match std::mem::take(&mut self.state) {
            ScanState::InSection(title) | ScanState::InReferences(title) => {
                self.out.sections.push(Section {
                    index: self.out.sections.len(),
                    title: title,
                    body: self.body.trim().to_string(),
                });
                self.body.clear();
            }
            ScanState::Preamble | ScanState::InAbstract => {}
        }
    }

    fn close_abstract(&mut self) {
        self.out.abstract_text = Some(self.body.trim().to_string());
        self.body.clear();
        self.state = ScanState::Preamble;
    }

    fn finish(mut self) -> ExtractedMetadata {
        match self.state {
            ScanState::InAbstract => self.close_abstract(),
            ScanState::InSection(_) | ScanState::InReferences(_) => self.commit_section(),
            ScanState::Preamble => {}
        }
        self.out
    }
}

/// `Extractor` recovers document structure from raw PDF text.
///
/// An `Extractor` holds only its configuration and compiled patterns; it can
/// be cloned freely and shared between threads.
///
/// # Methods
///
/// * `new` - Creates an extractor from a validated configuration.
/// * `extract` - Extracts the metadata of one document.
/// * `extract_batch` - Extracts many documents concurrently.
#[derive(Debug, Clone)]
pub struct Extractor {
    config: ExtractorConfig,
    boilerplate: Vec<Regex>,
}

impl Default for Extractor {
    fn default() -> Self {
        Extractor {
            config: ExtractorConfig::new(),
            boilerplate: DEFAULT_BOILERPLATE.clone(),
        }
    }
}

impl Extractor {
    /// Creates a new `Extractor`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration fails validation.
    pub fn new(config: ExtractorConfig) -> Result<Extractor> {
        config.validate()?;
        let boilerplate = config.compile_boilerplate()?;
        return Ok(Extractor {
            config: config,
            boilerplate: boilerplate,
        });
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Extracts structured metadata from the raw text of one document.
    ///
    /// Never fails: text without recognizable structure yields metadata
    /// with empty or absent fields. The result depends only on `text` and
    /// the configuration.
    ///
    /// # Arguments
    ///
    /// * `text` - The newline-delimited text recovered from a PDF.
    ///
    /// # Returns
    ///
    /// The `ExtractedMetadata` of the document.
    pub fn extract(&self, text: &str) -> ExtractedMetadata {
        let doc = DocumentLines::new(text);
        let front = detect_front_matter(&doc, &self.config, &self.boilerplate);

        let mut scanner = Scanner::new();
        for line in doc.lines() {
            let isolated = self.config.isolated_headers == IsolatedHeaderPolicy::RawAdjacency
                && doc.is_isolated(line);
            scanner.feed(LineContext {
                text: line.text,
                isolated: isolated,
            });
        }

        let mut metadata = scanner.finish();
        metadata.title = front.title;
        metadata.authors = front.authors;
        metadata.author_affiliations = front.affiliations;

        tracing::debug!(
            "Extracted {} sections, {} references, {} figures, {} tables, {} equations from {} lines",
            metadata.sections.len(),
            metadata.references.len(),
            metadata.figures.len(),
            metadata.tables.len(),
            metadata.equations.len(),
            doc.len()
        );
        return metadata;
    }

    /// Extracts many documents concurrently.
    ///
    /// Each document is processed on tokio's blocking pool with at most
    /// `concurrency` extractions in flight.
    ///
    /// # Arguments
    ///
    /// * `texts` - The raw texts, one per document.
    /// * `concurrency` - The maximum number of extractions running at once (at least 1).
    ///
    /// # Returns
    ///
    /// The metadata of every document, in the order of `texts`.
    ///
    /// # Errors
    ///
    /// Returns an error if a worker task panicked or was cancelled.
    pub async fn extract_batch(
        &self,
        texts: Vec<String>,
        concurrency: usize,
    ) -> Result<Vec<ExtractedMetadata>> {
        use futures::stream::{self, StreamExt};

        let total = texts.len();
        let results: Vec<Result<(usize, ExtractedMetadata)>> =
            stream::iter(texts.into_iter().enumerate())
                .map(|(idx, text)| {
                    let extractor = self.clone();
                    async move {
                        tokio::task::spawn_blocking(move || extractor.extract(&text))
                            .await
                            .map(|metadata| (idx, metadata))
                            .map_err(|e| anyhow::anyhow!("Extraction task {} failed: {}", idx, e))
                    }
                })
                .buffer_unordered(concurrency.max(1))
                .collect()
                .await;

        let mut extracted = results.into_iter().collect::<Result<Vec<_>>>()?;
        extracted.sort_by_key(|(idx, _)| *idx);
        tracing::debug!("Extracted {} documents", total);
        return Ok(extracted.into_iter().map(|(_, metadata)| metadata).collect());
    }
}

/// Extracts structured metadata from raw text with the default configuration.
pub fn extract(text: &str) -> ExtractedMetadata {
    DEFAULT_EXTRACTOR.extract(text)
}

/// Converts metadata to JSON.
///
/// # Arguments
///
/// * `metadata` - The metadata to serialize.
/// * `pretty` - Whether to pretty-print the output.
pub fn metadata2json(metadata: &ExtractedMetadata, pretty: bool) -> Result<String> {
    let json = match pretty {
        true => serde_json::to_string_pretty(metadata)?,
        false => serde_json::to_string(metadata)?,
    };
    return Ok(json);
}
