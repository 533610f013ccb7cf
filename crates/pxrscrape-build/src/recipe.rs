//! Checking a generated block against an existing conanfile.py.

use crate::{Result, ScrapeError};
use std::path::Path;

/// Lines of the `def <method>(self):` block in a recipe, header included.
///
/// The block ends at the first non-blank line indented no deeper than the
/// header. Trailing blank lines are not part of it.
pub fn find_method_block<'r>(recipe: &'r str, method: &str) -> Option<Vec<&'r str>> {
    let header = format!("def {method}(self):");
    let mut lines = recipe.lines();
    let first = lines.by_ref().find(|line| line.trim() == header)?;
    let indent = indentation(first);

    let mut block = vec![first];
    for line in lines {
        if !line.trim().is_empty() && indentation(line) <= indent {
            break;
        }
        block.push(line);
    }
    while block.last().is_some_and(|line| line.trim().is_empty()) {
        block.pop();
    }

    Some(block)
}

fn indentation(line: &str) -> usize {
    line.len() - line.trim_start().len()
}

/// Compare a generated block with the one in the recipe at `path`.
pub fn compare_with_recipe(generated: &str, path: &Path, method: &str) -> Result<()> {
    let recipe = std::fs::read_to_string(path).map_err(|source| ScrapeError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let existing =
        find_method_block(&recipe, method).ok_or_else(|| ScrapeError::RecipeBlockNotFound {
            path: path.to_path_buf(),
            method: method.to_string(),
        })?;

    compare_lines(generated, &existing)
}

fn compare_lines(generated: &str, existing: &[&str]) -> Result<()> {
    let generated: Vec<&str> = generated.lines().collect();
    let len = generated.len().max(existing.len());

    for index in 0..len {
        let expected = generated.get(index).copied().unwrap_or("<end of block>");
        let found = existing.get(index).copied().unwrap_or("<end of block>");
        if expected.trim_end() != found.trim_end() {
            return Err(ScrapeError::RecipeMismatch {
                line: index + 1,
                expected: expected.trim().to_string(),
                found: found.trim().to_string(),
            });
        }
    }

    tracing::info!(lines = len, "recipe block is up to date");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECIPE: &str = r#"class OpenUSDConan(ConanFile):
    def package_info(self):
        self._auto_info()

    # this method was automatically generated
    def _auto_info(self):
        # arch
        self.cpp_info.components["arch"].requires = []
        self.cpp_info.components["arch"].libs = ['usd_arch']

    def _other(self):
        pass
"#;

    #[test]
    fn test_find_method_block() {
        let block = find_method_block(RECIPE, "_auto_info").unwrap();
        assert_eq!(block.len(), 4);
        assert_eq!(block[0], "    def _auto_info(self):");
        assert_eq!(
            block[3],
            "        self.cpp_info.components[\"arch\"].libs = ['usd_arch']"
        );

        assert!(find_method_block(RECIPE, "_missing").is_none());
    }

    #[test]
    fn test_block_at_end_of_file() {
        let block = find_method_block(RECIPE, "_other").unwrap();
        assert_eq!(block, vec!["    def _other(self):", "        pass"]);
    }

    #[test]
    fn test_compare_lines() {
        let existing = find_method_block(RECIPE, "_auto_info").unwrap();
        let generated = "    def _auto_info(self):\n        # arch\n        self.cpp_info.components[\"arch\"].requires = []\n        self.cpp_info.components[\"arch\"].libs = ['usd_arch']\n";
        assert!(compare_lines(generated, &existing).is_ok());

        let stale = generated.replace("['usd_arch']", "[]");
        match compare_lines(&stale, &existing).unwrap_err() {
            ScrapeError::RecipeMismatch { line, expected, found } => {
                assert_eq!(line, 4);
                assert_eq!(expected, "self.cpp_info.components[\"arch\"].libs = []");
                assert_eq!(found, "self.cpp_info.components[\"arch\"].libs = ['usd_arch']");
            }
            other => panic!("unexpected error: {other}"),
        }

        let longer = format!("{generated}        # tf\n");
        assert!(matches!(
            compare_lines(&longer, &existing),
            Err(ScrapeError::RecipeMismatch { line: 5, .. })
        ));
    }

    #[test]
    fn test_compare_with_recipe_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("conanfile.py");
        std::fs::write(&path, RECIPE).unwrap();

        assert!(matches!(
            compare_with_recipe("", &path, "_generated"),
            Err(ScrapeError::RecipeBlockNotFound { .. })
        ));
    }
}
