//! # Paper Structure Extractor (paperstruct)
//!
//! The `paperstruct` library recovers the structure of a research paper from
//! the raw text extracted out of a PDF: title, authors, affiliations, abstract,
//! keywords, sections, references, figure and table captions, and equations.
//!
//! Extraction is heuristic and never fails. Text without recognizable
//! structure yields metadata with empty fields.
//!
//! ## Quick Start
//!
//! ### Installation
//! To start using the `paperstruct` library, add it to your project's dependencies in the `Cargo.toml` file:
//!
//! ```bash
//! cargo add paperstruct
//! ```
//!
//! ## Examples
//!
//! Here is a simple example of how to use the extractor:
//!
//! ```rust
//! use paperstruct::{extract, metadata2json};
//!
//! let text = "A Study of Graph Neural Networks for Drug Discovery\n\n\
//!             Jane Doe, John Smith\n\
//!             Department of Computer Science, MIT\n\n\
//!             Abstract\n\
//!             This paper presents...\n\
//!             1. Introduction\n\
//!             Graph neural networks have become...";
//! let metadata = extract(text);
//! assert_eq!(metadata.authors, vec!["Jane Doe", "John Smith"]);
//! assert_eq!(metadata.sections[0].title, "1. Introduction");
//! let json = metadata2json(&metadata, true).unwrap();
//! ```
//!
//! A configured [`Extractor`] can be shared and used for batches:
//!
//! ```rust
//! # use paperstruct::{Extractor, ExtractorConfig};
//! # async fn try_main() -> anyhow::Result<()> {
//! let mut config = ExtractorConfig::new();
//! config.title_search_fraction = 0.2;
//! let extractor = Extractor::new(config)?;
//! let texts = vec!["References\n[1] Doe, J. (2020). A paper.".to_string()];
//! let results = extractor.extract_batch(texts, 4).await?;
//! assert_eq!(results[0].references.len(), 1);
//! # Ok(())
//! # }
//! # #[tokio::main]
//! # async fn main() {
//! #    try_main().await.unwrap();
//! # }
//! ```
//!
//! ## Tests
//!
//! The library includes a set of tests to ensure its functionality. To run the tests, use the following command:
//!
//! ```sh
//! cargo test
//! ```

pub mod classifier;
pub mod config;
pub mod frontmatter;
pub mod models;
pub mod parser;
pub mod source;
pub mod test_utils;

pub use config::{ExtractorConfig, IsolatedHeaderPolicy};
pub use models::{Caption, ExtractedMetadata, Section};
pub use parser::{extract, metadata2json, Extractor};
pub use source::RawDocumentText;
