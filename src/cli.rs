//! Command-line front-end: `docvec build | search | info`

use crate::client::DocIndexClient;
use crate::config::Config;
use crate::types::{BuildReport, IndexInfo, SearchResponse};
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("GIT_COMMIT_HASH"),
    ", built ",
    env!("BUILD_TIMESTAMP"),
    ")"
);

/// Build and query an embedding index over a directory of text files
#[derive(Debug, Parser)]
#[command(name = "docvec", version = VERSION, about)]
pub struct Cli {
    /// Config file (defaults to ./docvec.toml, then the user config directory)
    #[arg(long, global = true, env = "DOCVEC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log debug output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Embed every document in the data directory and write the index
    Build(BuildArgs),
    /// Find the documents closest to a query
    Search(SearchArgs),
    /// Show what a persisted index contains
    Info(InfoArgs),
}

/// Where the index and document record live
#[derive(Debug, Args, Default)]
pub struct ArtifactArgs {
    /// Vector index file
    #[arg(long)]
    pub index_path: Option<PathBuf>,

    /// Texts/metadatas file
    #[arg(long)]
    pub docs_path: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct BuildArgs {
    /// Directory containing the documents
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// File name glob, e.g. "*.txt"
    #[arg(long)]
    pub pattern: Option<String>,

    /// Embedding model name
    #[arg(long)]
    pub model: Option<String>,

    /// Documents per embedding call
    #[arg(long)]
    pub batch_size: Option<usize>,

    #[command(flatten)]
    pub artifacts: ArtifactArgs,

    /// Print the build report as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Text to search for
    pub query: String,

    /// Maximum number of results
    #[arg(short = 'k', long)]
    pub limit: Option<usize>,

    /// Drop results scoring below this
    #[arg(long, allow_hyphen_values = true)]
    pub min_score: Option<f32>,

    /// Embedding model name; must match the one used to build
    #[arg(long)]
    pub model: Option<String>,

    #[command(flatten)]
    pub artifacts: ArtifactArgs,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct InfoArgs {
    #[command(flatten)]
    pub artifacts: ArtifactArgs,

    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Resolve configuration: file, then environment, then flags. The result
    /// is validated once, after every layer has been applied.
    pub fn load_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => Config::load_or_default().context("Failed to load configuration")?,
        };
        config.apply_env_overrides();
        self.apply_flags(&mut config);

        config.validate()?;
        Ok(config)
    }

    fn apply_flags(&self, config: &mut Config) {
        match &self.command {
            Command::Build(args) => {
                if let Some(dir) = &args.data_dir {
                    config.input.data_dir = dir.clone();
                }
                if let Some(pattern) = &args.pattern {
                    config.input.pattern = pattern.clone();
                }
                if let Some(model) = &args.model {
                    config.embedding.model_name = model.clone();
                }
                if let Some(batch_size) = args.batch_size {
                    config.embedding.batch_size = batch_size;
                }
                args.artifacts.apply(config);
            }
            Command::Search(args) => {
                if let Some(model) = &args.model {
                    config.embedding.model_name = model.clone();
                }
                if let Some(limit) = args.limit {
                    config.search.limit = limit;
                }
                if let Some(min_score) = args.min_score {
                    config.search.min_score = min_score;
                }
                args.artifacts.apply(config);
            }
            Command::Info(args) => args.artifacts.apply(config),
        }
    }

    /// Whether the subcommand prints JSON to stdout
    pub fn json_output(&self) -> bool {
        match &self.command {
            Command::Build(args) => args.json,
            Command::Search(args) => args.json,
            Command::Info(args) => args.json,
        }
    }

    /// Process exit status for a failed run: 2 for problems the user can fix
    /// (missing or empty input directory, invalid configuration, unknown
    /// model), 1 for everything else
    pub fn exit_status(err: &anyhow::Error) -> u8 {
        if crate::error::is_user_error(err) { 2 } else { 1 }
    }

    pub fn run(&self) -> Result<()> {
        let config = self.load_config()?;
        let client = DocIndexClient::with_config(config)?;

        match &self.command {
            Command::Build(args) => {
                let report = client.build()?;
                if args.json {
                    println!("{}", serde_json::to_string_pretty(&report)?);
                } else {
                    print_build(&report);
                }
            }
            Command::Search(args) => {
                let response = client.search(&args.query, None, None)?;
                if args.json {
                    println!("{}", serde_json::to_string_pretty(&response)?);
                } else {
                    print_search(&response);
                }
            }
            Command::Info(args) => {
                let info = client.info()?;
                if args.json {
                    println!("{}", serde_json::to_string_pretty(&info)?);
                } else {
                    print_info(&info);
                }
            }
        }
        Ok(())
    }
}

impl ArtifactArgs {
    fn apply(&self, config: &mut Config) {
        if let Some(path) = &self.index_path {
            config.output.index_path = path.clone();
        }
        if let Some(path) = &self.docs_path {
            config.output.docs_path = path.clone();
        }
    }
}

fn print_build(report: &BuildReport) {
    println!(
        "Indexed {} documents ({} dims, {}) in {} ms",
        report.documents_indexed, report.dimension, report.model_name, report.duration_ms
    );
    if report.zero_vectors > 0 {
        println!("{} document(s) produced a zero vector", report.zero_vectors);
    }
    println!("  index: {}", report.index_path.display());
    println!("  docs:  {}", report.docs_path.display());
}

fn print_search(response: &SearchResponse) {
    if response.results.is_empty() {
        println!("No results for \"{}\"", response.query);
        return;
    }
    for (rank, hit) in response.results.iter().enumerate() {
        println!(
            "{}. [{:.4}] {} (#{})",
            rank + 1,
            hit.score,
            hit.source,
            hit.position
        );
        println!("   {}", preview(&hit.text, 160));
    }
}

fn print_info(info: &IndexInfo) {
    println!("index:     {}", info.index_path.display());
    println!("docs:      {}", info.docs_path.display());
    println!("vectors:   {}", info.vectors);
    println!("dimension: {}", info.dimension);
    println!("documents: {}", info.documents);
    for source in &info.sources {
        println!("  - {}", source);
    }
}

/// First `max_chars` characters of `text` on one line
fn preview(text: &str, max_chars: usize) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max_chars {
        return flat;
    }
    let cut: String = flat.chars().take(max_chars).collect();
    format!("{}...", cut.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_build() {
        let cli = Cli::try_parse_from([
            "docvec",
            "build",
            "--data-dir",
            "notes",
            "--batch-size",
            "8",
            "--index-path",
            "out.index",
        ])
        .unwrap();

        match cli.command {
            Command::Build(args) => {
                assert_eq!(args.data_dir, Some(PathBuf::from("notes")));
                assert_eq!(args.batch_size, Some(8));
                assert_eq!(args.artifacts.index_path, Some(PathBuf::from("out.index")));
                assert!(args.artifacts.docs_path.is_none());
            }
            other => panic!("expected build, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_search() {
        let cli = Cli::try_parse_from([
            "docvec",
            "search",
            "what should I study",
            "-k",
            "3",
            "--min-score",
            "-0.2",
            "--json",
        ])
        .unwrap();

        match cli.command {
            Command::Search(args) => {
                assert_eq!(args.query, "what should I study");
                assert_eq!(args.limit, Some(3));
                assert_eq!(args.min_score, Some(-0.2));
                assert!(args.json);
            }
            other => panic!("expected search, got {:?}", other),
        }
    }

    #[test]
    fn test_json_output_flag() {
        let plain = Cli::try_parse_from(["docvec", "info"]).unwrap();
        assert!(!plain.json_output());

        let json = Cli::try_parse_from(["docvec", "build", "--json"]).unwrap();
        assert!(json.json_output());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["docvec", "info", "--verbose", "--config", "x.toml"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("x.toml")));
    }

    #[test]
    fn test_search_requires_query() {
        assert!(Cli::try_parse_from(["docvec", "search"]).is_err());
    }

    #[test]
    fn test_artifact_args_apply() {
        let args = ArtifactArgs {
            index_path: Some(PathBuf::from("a.index")),
            docs_path: None,
        };
        let mut config = Config::default();
        args.apply(&mut config);
        assert_eq!(config.output.index_path, PathBuf::from("a.index"));
        assert_eq!(config.output.docs_path, PathBuf::from("vector_docs.json"));
    }

    #[test]
    fn test_flags_override_invalid_config_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("docvec.toml");
        std::fs::write(&path, "[embedding]\nbatch_size = 0\n").unwrap();
        let path_arg = path.display().to_string();

        let cli = Cli::try_parse_from([
            "docvec",
            "--config",
            path_arg.as_str(),
            "build",
            "--batch-size",
            "8",
        ])
        .unwrap();
        let config = cli.load_config().unwrap();
        assert_eq!(config.embedding.batch_size, 8);

        std::fs::write(&path, "[search]\nlimit = 0\n").unwrap();
        let cli = Cli::try_parse_from(["docvec", "--config", path_arg.as_str(), "build"]).unwrap();
        assert!(cli.load_config().is_err());

        let cli = Cli::try_parse_from([
            "docvec",
            "--config",
            path_arg.as_str(),
            "search",
            "query",
            "-k",
            "3",
        ])
        .unwrap();
        assert_eq!(cli.load_config().unwrap().search.limit, 3);
    }

    #[test]
    fn test_exit_status_for_missing_input() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut config = Config::default();
        config.input.data_dir = dir.path().join("missing");
        config.output.index_path = dir.path().join("vector_index.index");
        config.output.docs_path = dir.path().join("vector_docs.json");

        let client = DocIndexClient::with_config(config).unwrap();
        let err = client.build().unwrap_err();
        assert_eq!(Cli::exit_status(&err), 2);
    }

    #[test]
    fn test_exit_status_for_corrupt_index() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut config = Config::default();
        config.output.index_path = dir.path().join("vector_index.index");
        config.output.docs_path = dir.path().join("vector_docs.json");
        std::fs::write(&config.output.index_path, b"DVIP garbage").unwrap();

        let client = DocIndexClient::with_config(config).unwrap();
        let err = client.info().unwrap_err();
        assert_eq!(Cli::exit_status(&err), 1);
    }

    #[test]
    fn test_preview() {
        assert_eq!(preview("short\n text", 20), "short text");
        assert_eq!(preview("abcdefghij", 4), "abcd...");
    }
}
