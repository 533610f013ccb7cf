//! Recipe configuration (pxrscrape.toml format).
//!
//! Every field defaults to the values for the current OpenUSD release, so an
//! empty file (or no file at all) reproduces the stock `_auto_info` block.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Root recipe configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeConfig {
    /// Name of the generated recipe method.
    #[serde(default = "default_method")]
    pub method: String,

    /// USD library naming and curation.
    #[serde(default)]
    pub library: LibraryConfig,

    /// MaterialX gating.
    #[serde(default)]
    pub materialx: MaterialxConfig,

    /// Recipe attributes holding aggregate dependency groups.
    #[serde(default)]
    pub groups: GroupConfig,
}

/// Library naming, allow-list and exclusions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryConfig {
    /// Prefix turning a component name into its library file name.
    #[serde(default = "default_prefix")]
    pub prefix: String,

    /// Allow-list of library identifiers that may be emitted.
    #[serde(default = "default_known")]
    pub known: Vec<String>,

    /// Targets that are never exposed as components.
    #[serde(default = "default_skip")]
    pub skip: Vec<String>,
}

/// Components that only exist when the recipe enables MaterialX.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialxConfig {
    /// Recipe option name (`self.options.<option>`).
    #[serde(default = "default_materialx_option")]
    pub option: String,

    /// Components wrapped entirely in the option conditional.
    #[serde(default = "default_gated")]
    pub gated: Vec<String>,
}

/// Expressions appended to the requirement list for aggregate groups.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupConfig {
    #[serde(default = "default_tbb_group")]
    pub tbb: String,

    #[serde(default = "default_boost_python_group")]
    pub boost_python: String,
}

// Command-line tools with Python entrypoints. Their C libraries are used via
// the tool, never linked directly.
const SKIP_LIBS: &[&str] = &["usdBakeMtlx", "usdviewq"];

const MATERIALX_GATED: &[&str] = &["usdMtlx", "hdMtlx"];

const KNOWN_LIBS: &[&str] = &[
    "usd_arch",
    "usd_tf",
    "usd_gf",
    "usd_js",
    "usd_trace",
    "usd_work",
    "usd_plug",
    "usd_vt",
    "usd_ar",
    "usd_kind",
    "usd_sdf",
    "usd_ndr",
    "usd_sdr",
    "usd_pcp",
    "usd_usd",
    "usd_usdGeom",
    "usd_usdVol",
    "usd_usdMedia",
    "usd_usdShade",
    "usd_usdLux",
    "usd_usdProc",
    "usd_usdRender",
    "usd_usdHydra",
    "usd_usdRi",
    "usd_usdSkel",
    "usd_usdUI",
    "usd_usdUtils",
    "usd_usdPhysics",
    "usd_usdMtlx",
    "usd_garch",
    "usd_hf",
    "usd_hio",
    "usd_cameraUtil",
    "usd_pxOsd",
    "usd_geomUtil",
    "usd_glf",
    "usd_hgi",
    "usd_hgiGL",
    "usd_hgiInterop",
    "usd_hd",
    "usd_hdar",
    "usd_hdGp",
    "usd_hdsi",
    "usd_hdMtlx",
    "usd_hdSt",
    "usd_hdx",
    "usd_usdImaging",
    "usd_usdImagingGL",
    "usd_usdProcImaging",
    "usd_usdRiPxrImaging",
    "usd_usdSkelImaging",
    "usd_usdVolImaging",
    "usd_usdAppUtils",
    "usd_usdBakeMtlx",
];

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn default_method() -> String {
    "_auto_info".to_string()
}

fn default_prefix() -> String {
    "usd_".to_string()
}

fn default_known() -> Vec<String> {
    to_strings(KNOWN_LIBS)
}

fn default_skip() -> Vec<String> {
    to_strings(SKIP_LIBS)
}

fn default_materialx_option() -> String {
    "materialx".to_string()
}

fn default_gated() -> Vec<String> {
    to_strings(MATERIALX_GATED)
}

fn default_tbb_group() -> String {
    "self.tbb_libs".to_string()
}

fn default_boost_python_group() -> String {
    "self.boost_python_libs".to_string()
}

impl Default for RecipeConfig {
    fn default() -> Self {
        Self {
            method: default_method(),
            library: LibraryConfig::default(),
            materialx: MaterialxConfig::default(),
            groups: GroupConfig::default(),
        }
    }
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            known: default_known(),
            skip: default_skip(),
        }
    }
}

impl Default for MaterialxConfig {
    fn default() -> Self {
        Self {
            option: default_materialx_option(),
            gated: default_gated(),
        }
    }
}

impl Default for GroupConfig {
    fn default() -> Self {
        Self {
            tbb: default_tbb_group(),
            boost_python: default_boost_python_group(),
        }
    }
}

impl RecipeConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| crate::ScrapeError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: RecipeConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Component name for a declared target: the library prefix is stripped
    /// when the build already declares prefixed names.
    pub fn component_name<'a>(&self, target: &'a str) -> &'a str {
        match target.strip_prefix(self.library.prefix.as_str()) {
            Some(rest) if !rest.is_empty() => rest,
            _ => target,
        }
    }

    /// Library identifier for a component (`tf` -> `usd_tf`).
    pub fn library_id(&self, component: &str) -> String {
        format!("{}{}", self.library.prefix, component)
    }

    pub fn is_known(&self, library: &str) -> bool {
        self.library.known.iter().any(|k| k == library)
    }

    /// Whether a declared target is excluded from the component list.
    pub fn is_skipped(&self, target: &str) -> bool {
        let component = self.component_name(target);
        self.library.skip.iter().any(|s| s == component)
    }

    pub fn is_materialx_gated(&self, component: &str) -> bool {
        self.materialx.gated.iter().any(|g| g == component)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RecipeConfig::default();

        assert_eq!(config.method, "_auto_info");
        assert_eq!(config.library.prefix, "usd_");
        assert_eq!(config.library.known.len(), 54);
        assert!(config.is_known("usd_tf"));
        assert!(!config.is_known("usd_usdviewq"));
        assert!(config.is_skipped("usdviewq"));
        assert!(config.is_materialx_gated("hdMtlx"));
        assert!(!config.is_materialx_gated("hdSt"));
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let toml = r#"
[library]
skip = ["usdviewq"]

[materialx]
option = "with_materialx"
        "#;

        let config: RecipeConfig = toml::from_str(toml).unwrap();

        assert_eq!(config.library.skip, vec!["usdviewq"]);
        assert_eq!(config.library.prefix, "usd_");
        assert_eq!(config.library.known.len(), 54);
        assert_eq!(config.materialx.option, "with_materialx");
        assert_eq!(config.materialx.gated, vec!["usdMtlx", "hdMtlx"]);
        assert_eq!(config.groups.tbb, "self.tbb_libs");
    }

    #[test]
    fn test_empty_config_is_default() {
        let config: RecipeConfig = toml::from_str("").unwrap();
        assert_eq!(config.method, RecipeConfig::default().method);
        assert_eq!(config.library.known, RecipeConfig::default().library.known);
    }

    #[test]
    fn test_component_name() {
        let config = RecipeConfig::default();

        assert_eq!(config.component_name("tf"), "tf");
        assert_eq!(config.component_name("usd_tf"), "tf");
        assert_eq!(config.component_name("usdGeom"), "usdGeom");
        assert_eq!(config.component_name("usd_"), "usd_");
        assert_eq!(config.library_id("hdMtlx"), "usd_hdMtlx");
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pxrscrape.toml");
        std::fs::write(&path, "method = \"_generated_info\"\n").unwrap();

        let config = RecipeConfig::from_file(&path).unwrap();
        assert_eq!(config.method, "_generated_info");

        let missing = RecipeConfig::from_file(&dir.path().join("missing.toml"));
        assert!(matches!(missing, Err(crate::ScrapeError::Read { .. })));
    }
}
