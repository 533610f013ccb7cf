//! Error types for pxrscrape-build.

use miette::{Diagnostic, NamedSource, SourceSpan};
use std::path::PathBuf;
use thiserror::Error;

/// Result type for pxrscrape-build operations.
pub type Result<T> = std::result::Result<T, ScrapeError>;

/// Errors that can occur while scraping targets or generating the recipe block.
#[derive(Error, Debug, Diagnostic)]
pub enum ScrapeError {
    /// Failed to open or read an input file.
    #[error("Failed to read {}: {source}", .path.display())]
    #[diagnostic(code(pxrscrape::read))]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Generic I/O failure on an already opened stream.
    #[error("I/O error: {0}")]
    #[diagnostic(code(pxrscrape::io))]
    Io(#[from] std::io::Error),

    /// Failed to parse TOML configuration.
    #[error("Failed to parse TOML config: {0}")]
    #[diagnostic(code(pxrscrape::config))]
    ParseToml(#[from] toml::de::Error),

    /// Failed to serialize the target map.
    #[error("Failed to serialize JSON: {0}")]
    #[diagnostic(code(pxrscrape::json))]
    Json(#[from] serde_json::Error),

    /// A target maps to a library identifier outside the allow-list.
    #[error("Unknown lib: {library} (target `{target}`)")]
    #[diagnostic(
        code(pxrscrape::unknown_library),
        help("add the library to the known list once the new component has been reviewed")
    )]
    UnknownLibrary { target: String, library: String },

    /// A `libosd*` link entry that is neither the CPU nor the GPU library.
    #[error("Unrecognized libosd library: {lib} (line {line})")]
    #[diagnostic(
        code(pxrscrape::unrecognized_osd),
        help("only libosdCPU and libosdGPU are mapped to opensubdiv components")
    )]
    UnrecognizedSubdivLib {
        lib: String,
        line: usize,
        #[source_code]
        src: NamedSource<String>,
        #[label("unrecognized OpenSubdiv library")]
        span: SourceSpan,
    },

    /// No pxrTargets.cmake below the given directory.
    #[error("No {file_name} found under {}", .root.display())]
    #[diagnostic(
        code(pxrscrape::targets_not_found),
        help("pxrTargets.cmake is written to the 'cmake' folder of an OpenUSD install")
    )]
    TargetsFileNotFound { root: PathBuf, file_name: String },

    /// The recipe has no method to compare against.
    #[error("No `def {method}(self):` block found in {}", .path.display())]
    #[diagnostic(code(pxrscrape::recipe_block))]
    RecipeBlockNotFound { path: PathBuf, method: String },

    /// The generated block differs from the one in the recipe.
    #[error("Recipe is out of date at block line {line}: expected `{expected}`, found `{found}`")]
    #[diagnostic(
        code(pxrscrape::recipe_mismatch),
        help("re-run pxrscrape without --compare and paste the output into the recipe")
    )]
    RecipeMismatch {
        line: usize,
        expected: String,
        found: String,
    },
}
