//! Generation of the recipe's component block.
//!
//! The output is Python source meant to be pasted into `conanfile.py` as a
//! method body, so lists are rendered exactly the way Python prints them.

use crate::config::RecipeConfig;
use crate::targets::{TargetMap, TargetRecord};
use crate::{Result, ScrapeError};

/// One indentation level of the generated Python.
pub const TAB: &str = "    ";

/// Render a list of strings the way Python's `repr` does.
pub fn py_list<S: AsRef<str>>(items: &[S]) -> String {
    let items: Vec<String> = items.iter().map(|s| py_str(s.as_ref())).collect();
    format!("[{}]", items.join(", "))
}

fn py_str(s: &str) -> String {
    let quote = if s.contains('\'') && !s.contains('"') {
        '"'
    } else {
        '\''
    };
    let mut out = String::with_capacity(s.len() + 2);
    out.push(quote);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}

/// Builds the `_auto_info` method from scraped targets.
pub struct Emitter<'a> {
    config: &'a RecipeConfig,
}

impl<'a> Emitter<'a> {
    pub fn new(config: &'a RecipeConfig) -> Self {
        Self { config }
    }

    /// The method header opening the block.
    pub fn header(&self) -> String {
        format!("{TAB}def {}(self):", self.config.method)
    }

    /// Render the whole method. Fails without partial output when any target
    /// maps to an unknown library.
    pub fn emit(&self, targets: &TargetMap) -> Result<String> {
        let mut out = self.header();
        out.push('\n');

        let body_indent = TAB.repeat(2);
        for target in targets.iter() {
            out.push_str(&body_indent);
            out.push_str("# ");
            out.push_str(&target.name);
            out.push('\n');

            let lines = match self.component(target)? {
                Some(lines) => lines,
                None => vec!["# skipped".to_string()],
            };
            for line in lines {
                out.push_str(&body_indent);
                out.push_str(&line);
                out.push('\n');
            }
        }

        Ok(out)
    }

    /// Library list of a component, validated against the allow-list.
    fn libs(&self, target: &str, component: &str) -> Result<Vec<String>> {
        if component.contains("::") {
            return Ok(Vec::new());
        }
        let library = self.config.library_id(component);
        if !self.config.is_known(&library) {
            return Err(ScrapeError::UnknownLibrary {
                target: target.to_string(),
                library,
            });
        }
        Ok(vec![library])
    }

    /// Declaration lines for one target, unindented. `None` when the target has
    /// no link metadata.
    pub fn component(&self, target: &TargetRecord) -> Result<Option<Vec<String>>> {
        let Some(link) = &target.link else {
            tracing::warn!(target_name = %target.name, "no INTERFACE_LINK_LIBRARIES, skipped");
            return Ok(None);
        };

        let component = self.config.component_name(&target.name);
        let libs = py_list(&self.libs(&target.name, component)?);
        tracing::debug!(
            component,
            includes = target.include_dirs().len(),
            requires = link.link_libs.len(),
            "emitting component"
        );

        let mut requires = py_list(&link.link_libs);
        if link.needs_boost_python {
            requires.push_str(" + ");
            requires.push_str(&self.config.groups.boost_python);
        }
        if link.needs_tbb {
            requires.push_str(" + ");
            requires.push_str(&self.config.groups.tbb);
        }

        let info = format!("self.cpp_info.components[\"{component}\"]");
        let option = format!("if self.options.{}:", self.config.materialx.option);
        let mut out = Vec::new();

        if self.config.is_materialx_gated(component) {
            requires.push_str(" + ");
            requires.push_str(&py_list(&link.materialx_libs));
            out.push(option);
            out.push(format!("{TAB}{info}.requires = {requires}"));
            out.push(format!("{TAB}{info}.libs = {libs}"));
            out.push("else:".to_string());
            out.push(format!("{TAB}{info}.requires = []"));
            out.push(format!("{TAB}{info}.libs = []"));
        } else {
            out.push(format!("{info}.requires = {requires}"));
            if !link.materialx_libs.is_empty() {
                out.push(option);
                out.push(format!(
                    "{TAB}{info}.requires += {}",
                    py_list(&link.materialx_libs)
                ));
            }
            out.push(format!("{info}.libs = {libs}"));
        }

        Ok(Some(out))
    }
}
