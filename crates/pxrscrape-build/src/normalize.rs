//! Link library normalization.
//!
//! CMake link entries come in three shapes: bare target names of other USD
//! libraries (`arch`), imported targets of third-party packages
//! (`TBB::tbbmalloc`) and absolute library paths. Conan components only know
//! the first two, and only under the Conan package's own naming.

use std::borrow::Cow;

/// System libraries that are declared on the recipe side, not per component.
pub const SYSTEM_LIBS: &[&str] = &["dl"];

/// Imported CMake targets with a known Conan counterpart.
pub const PACKAGE_REWRITES: &[(&str, &str)] = &[
    ("OpenColorIO::OpenColorIO", "opencolorio::opencolorio"),
    ("TBB::tbb", "onetbb::libtbb"),
    ("TBB::tbbmalloc", "onetbb::tbbmalloc"),
    ("TBB::tbbmalloc_proxy", "onetbb::tbbmalloc_proxy"),
];

// Not provided through the Python dependency of the recipe.
const PYTHON_RUNTIME: &str = "Python3::Python";

const MATERIALX_PACKAGE: &str = "materialx";

/// Normalize a raw link entry.
///
/// Returns `None` when the entry must be dropped, a borrowed value when it is
/// passed through unchanged and an owned value when it was rewritten.
pub fn normalize(raw: &str) -> Option<Cow<'_, str>> {
    if SYSTEM_LIBS.contains(&raw) {
        return None;
    }
    if raw.contains('/') {
        return None;
    }
    if raw.contains(PYTHON_RUNTIME) {
        return None;
    }

    if let Some((_, canonical)) = PACKAGE_REWRITES.iter().find(|(from, _)| *from == raw) {
        return Some(Cow::Owned(canonical.to_string()));
    }

    if is_materialx(raw) {
        let component = raw.split("::").nth(1).unwrap_or(raw);
        return Some(Cow::Owned(format!("{MATERIALX_PACKAGE}::{component}")));
    }

    Some(Cow::Borrowed(raw))
}

/// Whether an entry refers to a MaterialX library, in any spelling.
pub fn is_materialx(raw: &str) -> bool {
    raw.to_ascii_lowercase().contains(MATERIALX_PACKAGE)
}
