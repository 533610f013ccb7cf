//! Component scraping for the OpenUSD Conan recipe.
//!
//! This crate provides:
//! - pxrTargets.cmake parsing into per-target link metadata
//! - Normalization of CMake link entries to Conan requirements
//! - Generation of the recipe's `_auto_info` component block
//! - Recipe configuration (`pxrscrape.toml`)
//!
//! # Example
//!
//! ```
//! use pxrscrape_build::{Emitter, RecipeConfig, TargetMap};
//!
//! let cmake = r#"
//! add_library(gf SHARED IMPORTED)
//! set_target_properties(gf PROPERTIES
//!   INTERFACE_LINK_LIBRARIES "arch;tf"
//! )
//! "#;
//!
//! let config = RecipeConfig::default();
//! let targets = TargetMap::parse(cmake, &config).unwrap();
//! let block = Emitter::new(&config).emit(&targets).unwrap();
//! assert!(block.contains("components[\"gf\"].requires = ['arch', 'tf']"));
//! ```

mod config;
mod emit;
mod error;
pub mod normalize;
mod recipe;
mod targets;

pub use config::{GroupConfig, LibraryConfig, MaterialxConfig, RecipeConfig};
pub use emit::{py_list, Emitter, TAB};
pub use error::{Result, ScrapeError};
pub use recipe::{compare_with_recipe, find_method_block};
pub use targets::{locate_targets_file, LinkInfo, TargetMap, TargetRecord, TARGETS_FILE_NAME};
