//! Java test discovery on top of tree-sitter.

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};

use tracing::trace;
use tree_sitter::{Node, ParseOptions, ParseState, Parser, Point, Tree};

use super::Extractor;
use crate::config::DEFAULT_TEST_ANNOTATIONS;
use crate::error::ExtractionError;
use crate::index::TestMethod;

const TYPE_DECLARATIONS: &[&str] = &[
    "class_declaration",
    "interface_declaration",
    "enum_declaration",
    "record_declaration",
];

#[derive(Debug, Clone)]
pub struct JavaExtractorConfig {
    /// Simple annotation names that mark a test method.
    pub annotations: HashSet<String>,
    /// Upper bound on parsing a single file.
    pub timeout: Option<Duration>,
}

impl Default for JavaExtractorConfig {
    fn default() -> Self {
        Self {
            annotations: DEFAULT_TEST_ANNOTATIONS
                .iter()
                .map(|name| name.to_string())
                .collect(),
            timeout: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct JavaExtractor {
    config: JavaExtractorConfig,
}

impl JavaExtractor {
    pub fn new(config: JavaExtractorConfig) -> Self {
        Self { config }
    }

    pub fn extract_source(
        &self,
        path: &Path,
        source: &str,
    ) -> Result<Vec<TestMethod>, ExtractionError> {
        let tree = self.parse(path, source)?;
        let root = tree.root_node();
        if root.has_error() {
            let broken = first_error(root).unwrap_or(root);
            let position = broken.start_position();
            return Err(ExtractionError::syntax(
                path,
                position.row + 1,
                position.column + 1,
            ));
        }

        let source = source.as_bytes();
        let package = package_name(root, source);
        let mut tests = Vec::new();
        self.collect_types(root, package.as_deref(), source, &mut tests);

        trace!(path = %path.display(), tests = tests.len(), "extracted java tests");
        Ok(tests)
    }

    fn parse(&self, path: &Path, source: &str) -> Result<Tree, ExtractionError> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_java::LANGUAGE.into())
            .map_err(|_| ExtractionError::language_setup_failed("java"))?;

        let bytes = source.as_bytes();
        let mut read = move |offset: usize, _: Point| bytes.get(offset..).unwrap_or_default();

        let Some(timeout) = self.config.timeout else {
            return parser
                .parse_with_options(&mut read, None, None)
                .ok_or_else(|| ExtractionError::parse_failed(path));
        };

        // Returning true from the progress callback cancels the parse.
        let started = Instant::now();
        let mut expired = |_: &ParseState| started.elapsed() >= timeout;
        let options = ParseOptions::new().progress_callback(&mut expired);
        parser
            .parse_with_options(&mut read, None, Some(options))
            .ok_or_else(|| {
                let millis = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
                ExtractionError::timeout(path, millis)
            })
    }

    /// Visit the type declarations directly inside the compilation unit.
    fn collect_types(
        &self,
        unit: Node<'_>,
        package: Option<&str>,
        source: &[u8],
        tests: &mut Vec<TestMethod>,
    ) {
        let mut cursor = unit.walk();
        for child in unit.named_children(&mut cursor) {
            if TYPE_DECLARATIONS.contains(&child.kind()) {
                self.collect_type(child, package, source, tests);
            }
        }
    }

    fn collect_type(
        &self,
        declaration: Node<'_>,
        enclosing: Option<&str>,
        source: &[u8],
        tests: &mut Vec<TestMethod>,
    ) {
        let Some(name) = declaration
            .child_by_field_name("name")
            .and_then(|n| n.utf8_text(source).ok())
        else {
            return;
        };
        let class_path = match enclosing {
            Some(outer) => format!("{outer}.{name}"),
            None => name.to_string(),
        };
        if let Some(body) = declaration.child_by_field_name("body") {
            self.collect_members(body, &class_path, source, tests);
        }
    }

    fn collect_members(
        &self,
        body: Node<'_>,
        class_path: &str,
        source: &[u8],
        tests: &mut Vec<TestMethod>,
    ) {
        let mut cursor = body.walk();
        for member in body.named_children(&mut cursor) {
            match member.kind() {
                "method_declaration" => {
                    if !self.is_test_method(member, source) {
                        continue;
                    }
                    if let Some(name) = member
                        .child_by_field_name("name")
                        .and_then(|n| n.utf8_text(source).ok())
                    {
                        tests.push(TestMethod::new(class_path, name));
                    }
                }
                // enum constants come first, members live in a nested node
                "enum_body_declarations" => {
                    self.collect_members(member, class_path, source, tests);
                }
                kind if TYPE_DECLARATIONS.contains(&kind) => {
                    self.collect_type(member, Some(class_path), source, tests);
                }
                _ => {}
            }
        }
    }

    fn is_test_method(&self, method: Node<'_>, source: &[u8]) -> bool {
        let mut cursor = method.walk();
        let Some(modifiers) = method
            .named_children(&mut cursor)
            .find(|child| child.kind() == "modifiers")
        else {
            return false;
        };

        let mut cursor = modifiers.walk();
        let annotated = modifiers
            .named_children(&mut cursor)
            .filter(|m| matches!(m.kind(), "marker_annotation" | "annotation"))
            .filter_map(|annotation| annotation.child_by_field_name("name"))
            .filter_map(|name| name.utf8_text(source).ok())
            .any(|name| self.config.annotations.contains(simple_name(name)));
        annotated
    }
}

impl Extractor for JavaExtractor {
    fn extract(&self, path: &Path) -> Result<Vec<TestMethod>, ExtractionError> {
        let source =
            fs::read_to_string(path).map_err(|e| ExtractionError::read_failed(path, e))?;
        self.extract_source(path, &source)
    }
}

/// `org.junit.jupiter.api.Test` -> `Test`
fn simple_name(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name).trim()
}

/// The package of the compilation unit, joined with `.` and no whitespace.
fn package_name(root: Node<'_>, source: &[u8]) -> Option<String> {
    let mut cursor = root.walk();
    let declaration = root
        .named_children(&mut cursor)
        .find(|child| child.kind() == "package_declaration")?;

    let mut cursor = declaration.walk();
    let name = declaration
        .named_children(&mut cursor)
        .find(|child| matches!(child.kind(), "scoped_identifier" | "identifier"))?;
    let text = name.utf8_text(source).ok()?;
    Some(text.chars().filter(|c| !c.is_whitespace()).collect())
}

fn first_error(node: Node<'_>) -> Option<Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    let children: Vec<_> = node.children(&mut cursor).collect();
    children.into_iter().find_map(first_error)
}
