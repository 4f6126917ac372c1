//! Path templates with `{name}` placeholders.
//!
//! A template such as `greeting/{name}` compiles into an anchored regex in
//! which every placeholder captures one non-empty path segment (`[^/]+`)
//! and every literal run is matched byte-for-byte. Placeholders may share a
//! segment with literal text (`files/{stem}.json`) but may not sit directly
//! next to each other, since the split between them would be ambiguous.
//!
//! One leading `/` is ignored on both templates and paths, so
//! `/greeting/{name}` and `greeting/{name}` are the same template.

use regex::Regex;

use crate::error::RegistryError;

/// One piece of a compiled template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Capture(String),
}

/// A compiled path template.
#[derive(Debug, Clone)]
pub struct PathPattern {
    template: String,
    segments: Vec<Segment>,
    names: Vec<String>,
    regex: Regex,
}

impl PathPattern {
    /// Compile a template, rejecting unbalanced braces, empty or
    /// non-identifier names, repeated names and adjacent placeholders.
    pub fn compile(template: &str) -> Result<Self, RegistryError> {
        let invalid = |reason: String| RegistryError::InvalidPattern {
            template: template.to_string(),
            reason,
        };

        let body = normalize(template);
        let mut segments = Vec::new();
        let mut names: Vec<String> = Vec::new();
        let mut literal = String::new();
        let mut chars = body.chars();

        while let Some(c) = chars.next() {
            match c {
                '{' => {
                    let mut name = String::new();
                    loop {
                        match chars.next() {
                            Some('}') => break,
                            Some('{') => return Err(invalid("nested '{'".into())),
                            Some(ch) => name.push(ch),
                            None => return Err(invalid("unclosed '{'".into())),
                        }
                    }
                    if !is_identifier(&name) {
                        return Err(invalid(format!("invalid placeholder name {name:?}")));
                    }
                    if names.contains(&name) {
                        return Err(invalid(format!("placeholder {name:?} repeats")));
                    }
                    if literal.is_empty() && matches!(segments.last(), Some(Segment::Capture(_))) {
                        return Err(invalid("adjacent placeholders".into()));
                    }
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    names.push(name.clone());
                    segments.push(Segment::Capture(name));
                }
                '}' => return Err(invalid("unmatched '}'".into())),
                ch => literal.push(ch),
            }
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        let mut source = String::from("^");
        for segment in &segments {
            match segment {
                Segment::Literal(text) => source.push_str(&regex::escape(text)),
                Segment::Capture(_) => source.push_str("([^/]+)"),
            }
        }
        source.push('$');
        let regex = Regex::new(&source).map_err(|e| invalid(e.to_string()))?;

        Ok(Self {
            template: template.to_string(),
            segments,
            names,
            regex,
        })
    }

    /// Match a concrete path end-to-end. Returns the captured segment values
    /// in placeholder declaration order.
    pub fn matches(&self, path: &str) -> Option<Vec<String>> {
        let caps = self.regex.captures(normalize(path))?;
        Some(
            caps.iter()
                .skip(1)
                .map(|m| m.map(|m| m.as_str().to_string()).unwrap_or_default())
                .collect(),
        )
    }

    /// The template exactly as registered.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Placeholder names in declaration order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Two patterns are the same dispatch key when their normalized
    /// templates are equal.
    pub fn key(&self) -> &str {
        normalize(&self.template)
    }
}

fn normalize(path: &str) -> &str {
    path.strip_prefix('/').unwrap_or(path)
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
