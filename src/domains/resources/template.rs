//! URI templates for parameterised resources.
//!
//! A template such as `greeting://{name}` is split into literal segments and
//! named placeholders. Matching walks the segments left to right: literals
//! must appear verbatim, and each placeholder captures the (non-empty) text up
//! to the next literal, or up to the end of the URI for a trailing
//! placeholder.

use std::collections::BTreeMap;
use std::fmt;

use super::error::ResourceError;

/// Placeholder values extracted from a matched URI.
pub type Bindings = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder(String),
}

/// A parsed URI template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UriTemplate {
    raw: String,
    segments: Vec<Segment>,
}

impl UriTemplate {
    /// Parse a template.
    ///
    /// Placeholder names must be non-empty, unique, and two placeholders may
    /// not be adjacent.
    pub fn parse(raw: &str) -> Result<Self, ResourceError> {
        let mut segments = Vec::new();
        let mut rest = raw;

        while let Some(open) = rest.find('{') {
            if open > 0 {
                let literal = &rest[..open];
                if literal.contains('}') {
                    return Err(ResourceError::invalid_template(raw, "unmatched '}'"));
                }
                segments.push(Segment::Literal(literal.to_string()));
            }

            let after = &rest[open + 1..];
            let close = after
                .find('}')
                .ok_or_else(|| ResourceError::invalid_template(raw, "unclosed '{'"))?;
            let name = &after[..close];

            if name.is_empty() || name.contains('{') {
                return Err(ResourceError::invalid_template(raw, "invalid placeholder name"));
            }
            if matches!(segments.last(), Some(Segment::Placeholder(_))) {
                return Err(ResourceError::invalid_template(raw, "adjacent placeholders"));
            }
            if segments
                .iter()
                .any(|s| matches!(s, Segment::Placeholder(n) if n == name))
            {
                return Err(ResourceError::invalid_template(raw, "duplicate placeholder"));
            }

            segments.push(Segment::Placeholder(name.to_string()));
            rest = &after[close + 1..];
        }

        if !rest.is_empty() {
            if rest.contains('}') {
                return Err(ResourceError::invalid_template(raw, "unmatched '}'"));
            }
            segments.push(Segment::Literal(rest.to_string()));
        }

        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    /// Whether the string contains template syntax.
    pub fn is_template(raw: &str) -> bool {
        raw.contains('{')
    }

    /// The template as written.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Placeholder names in order of appearance.
    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Placeholder(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Match `uri` against the template, returning the placeholder bindings.
    pub fn matches(&self, uri: &str) -> Option<Bindings> {
        let mut bindings = Bindings::new();
        let mut rest = uri;
        let mut segments = self.segments.iter().peekable();

        while let Some(segment) = segments.next() {
            match segment {
                Segment::Literal(literal) => {
                    rest = rest.strip_prefix(literal.as_str())?;
                }
                Segment::Placeholder(name) => {
                    let value = match segments.peek() {
                        Some(Segment::Literal(next)) => {
                            let end = rest.find(next.as_str())?;
                            &rest[..end]
                        }
                        _ => rest,
                    };
                    if value.is_empty() {
                        return None;
                    }
                    bindings.insert(name.clone(), value.to_string());
                    rest = &rest[value.len()..];
                }
            }
        }

        rest.is_empty().then_some(bindings)
    }
}

impl fmt::Display for UriTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_trailing_placeholder() {
        let template = UriTemplate::parse("greeting://{name}").unwrap();
        assert_eq!(template.placeholders().collect::<Vec<_>>(), vec!["name"]);

        for name in ["Alice", "김철수", "a b c", "with/slash", "{braces}", "greeting://"] {
            let uri = format!("greeting://{}", name);
            let bindings = template.matches(&uri).unwrap();
            assert_eq!(bindings.get("name").map(String::as_str), Some(name));
        }
    }

    #[test]
    fn test_empty_binding_does_not_match() {
        let template = UriTemplate::parse("greeting://{name}").unwrap();
        assert!(template.matches("greeting://").is_none());
    }

    #[test]
    fn test_literal_prefix_must_match() {
        let template = UriTemplate::parse("greeting://{name}").unwrap();
        assert!(template.matches("farewell://bob").is_none());
        assert!(template.matches("greeting:/bob").is_none());
    }

    #[test]
    fn test_multiple_placeholders() {
        let template = UriTemplate::parse("config://{section}/{key}.json").unwrap();
        let bindings = template.matches("config://server/port.json").unwrap();
        assert_eq!(bindings["section"], "server");
        assert_eq!(bindings["key"], "port");

        assert!(template.matches("config://server/port.yaml").is_none());
        assert!(template.matches("config://server.json").is_none());
    }

    #[test]
    fn test_literal_template_matches_exactly() {
        let template = UriTemplate::parse("info://server").unwrap();
        assert!(template.matches("info://server").is_some());
        assert!(template.matches("info://server/extra").is_none());
        assert!(!UriTemplate::is_template("info://server"));
    }

    #[test]
    fn test_invalid_templates() {
        for raw in [
            "greeting://{name",
            "greeting://{}",
            "greeting://{a}{b}",
            "greeting://{a}/{a}",
            "greeting://name}",
            "greeting://{a}/x}",
        ] {
            assert!(
                matches!(
                    UriTemplate::parse(raw),
                    Err(ResourceError::InvalidTemplate { .. })
                ),
                "{} should be rejected",
                raw
            );
        }
    }
}
