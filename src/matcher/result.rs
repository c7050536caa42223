use std::fmt;
use indexmap::IndexMap;
use serde::Serialize;

/// Nested results. Only failing children are ever stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Children {
    #[default]
    None,
    Single(Box<MatchResult>),
    Fields(IndexMap<String, MatchResult>),
}

impl Children {
    pub fn is_empty(&self) -> bool {
        match self {
            Children::None => true,
            Children::Single(_) => false,
            Children::Fields(map) => map.is_empty(),
        }
    }
}

/// Outcome of checking one value against one description.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    label: String,
    error_messages: Vec<String>,
    #[serde(skip_serializing_if = "Children::is_empty")]
    children: Children,
    has_errors: bool,
}

impl MatchResult {
    pub fn new(label: impl Into<String>, error_messages: Vec<String>, children: Children) -> Self {
        let children = match children {
            Children::Single(child) if !child.has_errors => Children::None,
            Children::Fields(mut map) => {
                map.retain(|_, child| child.has_errors);
                if map.is_empty() { Children::None } else { Children::Fields(map) }
            }
            other => other,
        };
        let has_errors = !error_messages.is_empty() || !children.is_empty();
        Self { label: label.into(), error_messages, children, has_errors }
    }

    pub fn pass(label: impl Into<String>) -> Self {
        Self::new(label, Vec::new(), Children::None)
    }

    pub fn fail(label: impl Into<String>, error_messages: Vec<String>) -> Self {
        Self::new(label, error_messages, Children::None)
    }

    pub fn label(&self) -> &str { &self.label }
    pub fn error_messages(&self) -> &[String] { &self.error_messages }
    pub fn children(&self) -> &Children { &self.children }
    pub fn has_errors(&self) -> bool { self.has_errors }

    /// Named child of a record, union or list (`"first error"`).
    pub fn child(&self, name: &str) -> Option<&MatchResult> {
        match &self.children {
            Children::Fields(map) => map.get(name),
            _ => None,
        }
    }

    /// Keys walked from this node down to the first failing leaf, always
    /// taking the first failing child. Single children add no key.
    pub fn first_error_path(&self) -> Vec<&str> {
        let mut path = Vec::new();
        let mut node = self;
        loop {
            if !node.error_messages.is_empty() && node.children.is_empty() {
                break;
            }
            match &node.children {
                Children::None => break,
                Children::Single(child) => node = child,
                Children::Fields(map) => match map.first() {
                    Some((key, child)) => {
                        path.push(key.as_str());
                        node = child;
                    }
                    None => break,
                },
            }
        }
        path
    }

    /// `Err` with a rendered diagnostic when anything failed.
    pub fn into_result(self) -> Result<(), Mismatch> {
        if self.has_errors { Err(Mismatch(self)) } else { Ok(()) }
    }

    /// Indented tree of the failing nodes.
    pub fn pretty(&self) -> String {
        let mut lines = Vec::new();
        self.render(0, &mut lines);
        lines.join("\n")
    }

    fn render(&self, indent: usize, lines: &mut Vec<String>) {
        let pad = " ".repeat(indent);
        lines.push(format!("{pad}[{}]", self.label));
        for message in &self.error_messages {
            lines.push(format!("{pad}  * {message}"));
        }
        match &self.children {
            Children::None => {}
            Children::Single(child) => child.render(indent + 2, lines),
            Children::Fields(map) => {
                lines.push(format!("{pad}  {{"));
                for (key, child) in map {
                    lines.push(format!("{pad}    {key}:"));
                    child.render(indent + 6, lines);
                }
                lines.push(format!("{pad}  }}"));
            }
        }
    }
}

impl fmt::Display for MatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pretty())
    }
}

/// A failed [`MatchResult`], displayed with its full diagnostic.
#[derive(Debug, Clone, PartialEq)]
pub struct Mismatch(pub MatchResult);

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "type mismatch\n{}", self.0.pretty())
    }
}

impl std::error::Error for Mismatch {}
