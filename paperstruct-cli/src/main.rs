mod loggers;

use crate::loggers::init_logger;
use anyhow::{bail, Context, Result};
use clap::Parser;
use glob::glob;
use indicatif::ProgressBar;
use paperstruct::{metadata2json, ExtractedMetadata, Extractor, ExtractorConfig, RawDocumentText};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(version, about, long_about=None)]
struct Args {
    /// Text files or glob patterns holding text recovered from PDFs
    #[arg(short, long, num_args = 1.., required = true)]
    input: Vec<String>,

    #[arg(short, long, default_value = "output.json")]
    out: String,

    /// JSON file overriding the default extractor configuration
    #[arg(short, long)]
    config: Option<String>,

    #[arg(short, long, default_value_t = 4)]
    jobs: usize,

    #[arg(long, default_value_t = false)]
    pretty: bool,

    #[arg(long, default_value_t = false)]
    json_logs: bool,

    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

/// One entry of the output array when several inputs are given.
#[derive(Serialize, Debug)]
struct SourcedMetadata {
    source: String,
    metadata: ExtractedMetadata,
}

/// Expands every input into file paths, keeping the order of the arguments.
///
/// Plain paths are kept as they are; anything else is treated as a glob pattern.
fn resolve_inputs(inputs: &[String]) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for input in inputs {
        if Path::new(input).is_file() {
            paths.push(PathBuf::from(input));
            continue;
        }
        let mut matched = 0;
        for entry in glob(input).with_context(|| format!("Invalid glob pattern: {}", input))? {
            let path = entry?;
            if path.is_file() {
                paths.push(path);
                matched += 1;
            }
        }
        if matched == 0 {
            tracing::warn!("No file matches {}", input);
        }
    }
    if paths.is_empty() {
        bail!("File not found: {}", inputs.join(", "));
    }
    return Ok(paths);
}

fn load_config(path: Option<&str>) -> Result<ExtractorConfig> {
    let config = match path {
        Some(path) => ExtractorConfig::from_json_file(path)?,
        None => ExtractorConfig::new(),
    };
    let config = config.with_env_overrides();
    config.validate()?;
    return Ok(config);
}

fn read_inputs(paths: &[PathBuf], verbose: bool) -> Result<Vec<String>> {
    let pb: Option<ProgressBar> = if verbose {
        let bar = ProgressBar::new(paths.len() as u64);
        bar.set_style(
            indicatif::ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.green/blue} {pos:>7}/{len:7} {msg}")?
                .progress_chars("█▓▒░"),
        );
        Some(bar)
    } else {
        None
    };

    let mut texts = Vec::with_capacity(paths.len());
    for path in paths {
        let raw = RawDocumentText::from_file(path)?;
        if raw.is_low_content() {
            tracing::warn!("Little or no text recovered from {}", path.display());
        }
        texts.push(raw.as_str().to_string());
        if let Some(pb) = &pb {
            pb.inc(1);
        }
    }
    if let Some(pb) = pb {
        pb.finish_with_message("read");
    }
    return Ok(texts);
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logger(args.json_logs, args.verbose)?;

    if !args.out.ends_with(".json") {
        bail!("Output file must be a JSON file: {}", args.out);
    }

    let config = load_config(args.config.as_deref())?;
    let extractor = Extractor::new(config)?;
    let paths = resolve_inputs(&args.input)?;
    let texts = read_inputs(&paths, args.verbose)?;

    let json = if paths.len() == 1 {
        let metadata = extractor.extract(&texts[0]);
        let fallback = paths[0].display().to_string();
        tracing::info!("Extracted {}", metadata.title_or(&fallback));
        metadata2json(&metadata, args.pretty)?
    } else {
        let results = extractor.extract_batch(texts, args.jobs).await?;
        let entries: Vec<SourcedMetadata> = paths
            .iter()
            .zip(results.into_iter())
            .map(|(path, metadata)| SourcedMetadata {
                source: path.display().to_string(),
                metadata: metadata,
            })
            .collect();
        tracing::info!("Extracted {} documents", entries.len());
        match args.pretty {
            true => serde_json::to_string_pretty(&entries)?,
            false => serde_json::to_string(&entries)?,
        }
    };

    std::fs::write(&args.out, json).with_context(|| format!("Failed to write {}", args.out))?;
    tracing::info!("Saved to {}", args.out);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(name: &str) -> PathBuf {
        let mut dir = std::env::temp_dir();
        dir.push(format!("paperstruct_cli_{}_{}", name, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_resolve_inputs() {
        let dir = temp_dir("resolve");
        std::fs::write(dir.join("b.txt"), "b").unwrap();
        std::fs::write(dir.join("a.txt"), "a").unwrap();
        std::fs::write(dir.join("c.md"), "c").unwrap();

        let explicit = dir.join("c.md").display().to_string();
        let pattern = dir.join("*.txt").display().to_string();
        let paths = resolve_inputs(&[explicit, pattern]).unwrap();
        let names: Vec<String> = paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["c.md", "a.txt", "b.txt"]);

        let missing = dir.join("*.pdf").display().to_string();
        assert!(resolve_inputs(&[missing]).is_err());
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_load_config() {
        assert_eq!(load_config(None).unwrap().min_title_chars, 10);

        let dir = temp_dir("config");
        let path = dir.join("config.json");
        std::fs::write(&path, r#"{"min_title_chars": 20}"#).unwrap();
        let config = load_config(Some(path.to_str().unwrap())).unwrap();
        assert_eq!(config.min_title_chars, 20);
        assert_eq!(config.author_lookahead_lines, 5);

        assert!(load_config(Some("/nonexistent/config.json")).is_err());
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_args() {
        let args = Args::try_parse_from(["paperstruct", "--input", "a.txt", "b/*.txt", "-j", "2"]).unwrap();
        assert_eq!(args.input, vec!["a.txt", "b/*.txt"]);
        assert_eq!(args.out, "output.json");
        assert_eq!(args.jobs, 2);
        assert!(!args.pretty);

        assert!(Args::try_parse_from(["paperstruct"]).is_err());
    }
}
