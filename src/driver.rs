use crate::config::{Config, OutputFormat};
use crate::emitter::{write_token_stream, XmlWriter};
use crate::error::CompilerError;
use crate::lexer::Tokenizer;
use crate::parser::Parser;
use crate::syntax::TreeBuilder;
use std::fs;
use std::path::{Path, PathBuf};

pub const SOURCE_EXTENSION: &str = "jack";

/// A single `.jack` file, or every `.jack` file directly inside a directory,
/// in name order.
pub fn get_jack_files(path: &Path) -> Result<Vec<PathBuf>, CompilerError> {
    if !path.exists() {
        return Err(CompilerError::FileNotFound(format!(
            "{} does not exist",
            path.display()
        )));
    }

    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }

    let entries = fs::read_dir(path).map_err(|e| {
        CompilerError::FileNotFound(format!(
            "Cannot access directory: {}\nError: {}",
            path.display(),
            e
        ))
    })?;

    let mut found: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path.extension().and_then(|ext| ext.to_str()) == Some(SOURCE_EXTENSION)
        })
        .collect();

    if found.is_empty() {
        return Err(CompilerError::FileNotFound(format!(
            "No .{} files found in: {}",
            SOURCE_EXTENSION,
            path.display()
        )));
    }

    found.sort();
    Ok(found)
}

/// Parses one unit and renders it in the configured format.
pub fn render_unit(source: &str, path: &Path, config: &Config) -> Result<Vec<u8>, CompilerError> {
    let tokenizer = Tokenizer::with_path(source, path);
    match config.format {
        OutputFormat::Xml => {
            let mut parser = Parser::new(tokenizer, XmlWriter::new(Vec::new(), config.indent));
            parser.compile_class()?;
            Ok(parser.into_sink().into_inner())
        }
        OutputFormat::Json => {
            let mut parser = Parser::new(tokenizer, TreeBuilder::new());
            parser.compile_class()?;
            let tree = parser.into_sink().finish().ok_or_else(|| {
                CompilerError::Config(format!("{}: incomplete syntax tree", path.display()))
            })?;
            serde_json::to_vec_pretty(&tree).map_err(|e| CompilerError::Config(e.to_string()))
        }
    }
}

pub fn render_tokens(source: &str, path: &Path, config: &Config) -> Result<Vec<u8>, CompilerError> {
    let mut tokenizer = Tokenizer::with_path(source, path);
    write_token_stream(&mut tokenizer, Vec::new(), config.indent)
}

/// Analyzes one file and writes its outputs, returning the paths written.
///
/// Nothing is written for a unit that fails.
pub fn process_jack_file(
    path: &Path,
    out_dir: Option<&Path>,
    config: &Config,
) -> Result<Vec<PathBuf>, CompilerError> {
    let source = fs::read_to_string(path)?;

    let rendered = render_unit(&source, path, config)?;
    let tokens = if config.emit_tokens {
        Some(render_tokens(&source, path, config)?)
    } else {
        None
    };

    if let Some(dir) = out_dir {
        fs::create_dir_all(dir)?;
    }

    let mut written = Vec::new();
    let output = config.output_path(path, out_dir);
    fs::write(&output, rendered)?;
    written.push(output);

    if let Some(tokens) = tokens {
        let output = config.token_output_path(path, out_dir);
        fs::write(&output, tokens)?;
        written.push(output);
    }

    Ok(written)
}

#[derive(Debug, Default)]
pub struct Summary {
    pub written: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, CompilerError)>,
}

/// Processes every unit under `path`. A failing unit is recorded and skipped.
pub fn analyze_path(
    path: &Path,
    out_dir: Option<&Path>,
    config: &Config,
) -> Result<Summary, CompilerError> {
    let mut summary = Summary::default();
    for file in get_jack_files(path)? {
        if config.verbose {
            eprintln!("Analyzing {}", file.display());
        }
        match process_jack_file(&file, out_dir, config) {
            Ok(written) => summary.written.extend(written),
            Err(e) => summary.failed.push((file, e)),
        }
    }
    Ok(summary)
}
