//! pxrTargets.cmake parsing.
//!
//! An OpenUSD install exports every library as an imported CMake target:
//!
//! ```cmake
//! # Create imported target tf
//! add_library(tf SHARED IMPORTED)
//!
//! set_target_properties(tf PROPERTIES
//!   INTERFACE_INCLUDE_DIRECTORIES "${_IMPORT_PREFIX}/include"
//!   INTERFACE_LINK_LIBRARIES "arch;/usr/lib/libboost_python310.so;/usr/lib/libtbb.so"
//!   INTERFACE_SYSTEM_INCLUDE_DIRECTORIES "/usr/include/python3.10"
//! )
//! ```
//!
//! The file is scanned line by line; property lines belong to the most
//! recently declared target.

use crate::config::RecipeConfig;
use crate::normalize::{is_materialx, normalize};
use crate::{Result, ScrapeError};
use indexmap::IndexMap;
use miette::{NamedSource, SourceSpan};
use serde::Serialize;
use std::borrow::Cow;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// File name CMake uses for the exported target set.
pub const TARGETS_FILE_NAME: &str = "pxrTargets.cmake";

const TARGET_MARKER: &str = "add_library(";
const INCLUDE_MARKER: &str = "INTERFACE_INCLUDE_DIRECTORIES ";
const SYSTEM_INCLUDE_MARKER: &str = "INTERFACE_SYSTEM_INCLUDE_DIRECTORIES ";
const LINK_MARKER: &str = "INTERFACE_LINK_LIBRARIES ";
const IMPORT_PREFIX: &str = "${_IMPORT_PREFIX}/";

const OSD_CPU: &str = "opensubdiv::osdcpu";
const OSD_GPU: &str = "opensubdiv::osdgpu";

/// Everything scraped for one imported target.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TargetRecord {
    #[serde(skip)]
    pub name: String,

    /// `INTERFACE_INCLUDE_DIRECTORIES`, relative to the install prefix.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub include: Vec<String>,

    /// Link metadata, absent for targets without `INTERFACE_LINK_LIBRARIES`.
    #[serde(flatten)]
    pub link: Option<LinkInfo>,

    /// `INTERFACE_SYSTEM_INCLUDE_DIRECTORIES`.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sys_include: Vec<String>,
}

/// Classified `INTERFACE_LINK_LIBRARIES` of a target.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LinkInfo {
    /// Normalized requirements, in link order.
    pub link_libs: Vec<String>,
    pub needs_tbb: bool,
    pub needs_boost_python: bool,
    /// MaterialX requirements, only valid when the recipe enables MaterialX.
    pub materialx_libs: Vec<String>,
}

impl TargetRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Include and system include directories, in that order.
    pub fn include_dirs(&self) -> Vec<&str> {
        self.include
            .iter()
            .chain(&self.sys_include)
            .map(String::as_str)
            .collect()
    }
}

/// How a single link entry contributes to a target.
#[derive(Debug, PartialEq, Eq)]
enum LinkEntry<'a> {
    BoostPython,
    Tbb,
    Subdiv(&'static str),
    UnknownSubdiv,
    Materialx(Option<Cow<'a, str>>),
    Library(Option<Cow<'a, str>>),
}

fn classify(raw: &str) -> LinkEntry<'_> {
    let lower = raw.to_ascii_lowercase();

    if lower.contains("libboost_python") || lower.starts_with("boost::python") {
        LinkEntry::BoostPython
    } else if lower.contains("libtbb") || raw == "TBB::tbb" {
        LinkEntry::Tbb
    } else if lower.contains("libosd") {
        if raw.contains("libosdCPU") {
            LinkEntry::Subdiv(OSD_CPU)
        } else if raw.contains("libosdGPU") {
            LinkEntry::Subdiv(OSD_GPU)
        } else {
            LinkEntry::UnknownSubdiv
        }
    } else if is_materialx(raw) {
        LinkEntry::Materialx(normalize(raw))
    } else {
        LinkEntry::Library(normalize(raw))
    }
}

/// Split a `"a;b;c"` property value into its entries.
fn split_list(value: &str) -> Vec<String> {
    value
        .replace('"', "")
        .split(';')
        .map(|item| item.trim().replace(IMPORT_PREFIX, ""))
        .filter(|item| !item.is_empty())
        .collect()
}

fn marker_value<'l>(line: &'l str, marker: &str) -> Option<&'l str> {
    line.split_once(marker).map(|(_, value)| value)
}

fn declared_target(line: &str) -> Option<&str> {
    let rest = marker_value(line, TARGET_MARKER)?;
    let end = rest
        .find(|c: char| c.is_whitespace() || c == ')')
        .unwrap_or(rest.len());
    Some(&rest[..end])
}

fn has_property_marker(line: &str) -> bool {
    [INCLUDE_MARKER, SYSTEM_INCLUDE_MARKER, LINK_MARKER]
        .iter()
        .any(|marker| line.contains(marker))
}

/// A line of input, kept for diagnostics.
struct Line<'a> {
    source: &'a str,
    number: usize,
    text: &'a str,
}

impl Line<'_> {
    fn unrecognized_subdiv(&self, lib: &str) -> ScrapeError {
        let span = match self.text.find(lib) {
            Some(offset) => SourceSpan::new(offset.into(), lib.len()),
            None => SourceSpan::new(0.into(), self.text.len()),
        };
        ScrapeError::UnrecognizedSubdivLib {
            lib: lib.to_string(),
            line: self.number,
            src: NamedSource::new(
                format!("{}:{}", self.source, self.number),
                self.text.to_string(),
            ),
            span,
        }
    }
}

fn parse_link_libs(value: &str, line: &Line<'_>) -> Result<LinkInfo> {
    let mut info = LinkInfo::default();

    for lib in split_list(value) {
        match classify(&lib) {
            LinkEntry::BoostPython => info.needs_boost_python = true,
            LinkEntry::Tbb => info.needs_tbb = true,
            LinkEntry::Subdiv(component) => info.link_libs.push(component.to_string()),
            LinkEntry::UnknownSubdiv => return Err(line.unrecognized_subdiv(&lib)),
            LinkEntry::Materialx(Some(req)) => info.materialx_libs.push(req.into_owned()),
            LinkEntry::Library(Some(req)) => info.link_libs.push(req.into_owned()),
            LinkEntry::Materialx(None) | LinkEntry::Library(None) => {
                tracing::debug!(lib = %lib, line = line.number, "dropped link entry");
            }
        }
    }

    Ok(info)
}

enum ScanState {
    Idle,
    Skipping,
    Building(TargetRecord),
}

struct Scanner<'a> {
    config: &'a RecipeConfig,
    source: &'a str,
    state: ScanState,
    targets: IndexMap<String, TargetRecord>,
}

impl<'a> Scanner<'a> {
    fn new(config: &'a RecipeConfig, source: &'a str) -> Self {
        Self {
            config,
            source,
            state: ScanState::Idle,
            targets: IndexMap::new(),
        }
    }

    fn feed(&mut self, number: usize, text: &str) -> Result<()> {
        if let Some(name) = declared_target(text) {
            self.commit();
            if self.config.is_skipped(name) {
                tracing::debug!(target_name = name, "skipping excluded target");
                self.state = ScanState::Skipping;
            } else {
                tracing::debug!(target_name = name, line = number, "declared target");
                self.state = ScanState::Building(TargetRecord::new(name));
            }
            return Ok(());
        }

        let record = match &mut self.state {
            ScanState::Building(record) => record,
            ScanState::Skipping => return Ok(()),
            ScanState::Idle => {
                if has_property_marker(text) {
                    tracing::warn!(line = number, "property line outside of any target, ignored");
                }
                return Ok(());
            }
        };

        if let Some(value) = marker_value(text, INCLUDE_MARKER) {
            record.include = split_list(value);
        }
        if let Some(value) = marker_value(text, LINK_MARKER) {
            let line = Line {
                source: self.source,
                number,
                text,
            };
            record.link = Some(parse_link_libs(value, &line)?);
        }
        if let Some(value) = marker_value(text, SYSTEM_INCLUDE_MARKER) {
            record.sys_include = split_list(value);
        }

        Ok(())
    }

    fn commit(&mut self) {
        if let ScanState::Building(record) = std::mem::replace(&mut self.state, ScanState::Idle) {
            self.targets.insert(record.name.clone(), record);
        }
    }

    fn finish(mut self) -> TargetMap {
        self.commit();
        TargetMap {
            targets: self.targets,
        }
    }
}

/// Targets of a pxrTargets.cmake file, in declaration order.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct TargetMap {
    targets: IndexMap<String, TargetRecord>,
}

impl TargetMap {
    /// Parse targets from a pxrTargets.cmake file.
    pub fn from_file(path: &Path, config: &RecipeConfig) -> Result<Self> {
        let file = File::open(path).map_err(|source| ScrapeError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(BufReader::new(file), &path.display().to_string(), config)
    }

    /// Parse targets from a line-oriented reader. `source` names the input in
    /// diagnostics.
    pub fn from_reader<R: BufRead>(reader: R, source: &str, config: &RecipeConfig) -> Result<Self> {
        let mut scanner = Scanner::new(config, source);
        for (index, line) in reader.lines().enumerate() {
            scanner.feed(index + 1, &line?)?;
        }
        let map = scanner.finish();
        tracing::info!(targets = map.len(), source, "scraped targets");
        Ok(map)
    }

    /// Parse targets from in-memory text.
    pub fn parse(text: &str, config: &RecipeConfig) -> Result<Self> {
        Self::from_reader(text.as_bytes(), "<input>", config)
    }

    pub fn get(&self, name: &str) -> Option<&TargetRecord> {
        self.targets.get(name)
    }

    /// Targets in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &TargetRecord> {
        self.targets.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.targets.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Pretty JSON of the whole map, for `-v`.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Resolve the targets file from either the file itself or an OpenUSD
/// build/install directory containing it.
pub fn locate_targets_file(path: &Path) -> Result<PathBuf> {
    if !path.is_dir() {
        return Ok(path.to_path_buf());
    }

    WalkDir::new(path)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .find(|entry| entry.file_type().is_file() && entry.file_name() == TARGETS_FILE_NAME)
        .map(|entry| {
            tracing::info!(path = %entry.path().display(), "found targets file");
            entry.into_path()
        })
        .ok_or_else(|| ScrapeError::TargetsFileNotFound {
            root: path.to_path_buf(),
            file_name: TARGETS_FILE_NAME.to_string(),
        })
}
