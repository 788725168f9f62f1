//! Filename templates: compilation, matching and formatting.
//!
//! A template is literal text mixed with fixed-width numeric fields and
//! single-character wildcards:
//!
//! ```text
//! inst_{year:04d}_{day:03d}_v{version:02d}.dat
//! inst_??_???_{year:04d}_{day:03d}.dat
//! ```
//!
//! Templates are compiled once into an ordered token list plus an anchored
//! regex, and reused for every filename in a scan.

use crate::error::{CatalogError, Result};
use crate::timestamp;
use crate::types::{FieldKind, FieldValues, FileEntry};
use regex::Regex;
use std::fmt;

/// Widest field we accept; nine digits always fits in a `u32`.
const MAX_FIELD_WIDTH: usize = 9;

/// One piece of a compiled template
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TemplateToken {
    Literal(String),
    /// `?`, matches exactly one character
    Wildcard,
    Field { kind: FieldKind, width: usize },
}

/// A compiled filename template
#[derive(Debug, Clone)]
pub struct FilenameTemplate {
    raw: String,
    tokens: Vec<TemplateToken>,
    matcher: Regex,
}

impl FilenameTemplate {
    /// Compile a template string, validating that it can yield a timestamp.
    pub fn compile(template: &str) -> Result<Self> {
        let tokens = tokenize(template)?;
        validate_fields(template, &tokens)?;

        let mut pattern = String::with_capacity(template.len() * 2 + 2);
        pattern.push('^');
        for token in &tokens {
            match token {
                TemplateToken::Literal(text) => pattern.push_str(&regex::escape(text)),
                TemplateToken::Wildcard => pattern.push('.'),
                TemplateToken::Field { kind, width } => {
                    pattern.push_str(&format!("(?P<{}>[0-9]{{{}}})", kind.as_str(), width));
                }
            }
        }
        pattern.push('$');

        let matcher = Regex::new(&pattern)
            .map_err(|e| CatalogError::template(template, format!("failed to build matcher: {}", e)))?;

        Ok(Self {
            raw: template.to_string(),
            tokens,
            matcher,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Fields in template order, with their widths
    pub fn fields(&self) -> impl Iterator<Item = (FieldKind, usize)> + '_ {
        self.tokens.iter().filter_map(|t| match t {
            TemplateToken::Field { kind, width } => Some((*kind, *width)),
            _ => None,
        })
    }

    pub fn has_field(&self, kind: FieldKind) -> bool {
        self.fields().any(|(k, _)| k == kind)
    }

    /// True if the template carries `version` or `revision`
    pub fn has_version_fields(&self) -> bool {
        self.fields().any(|(k, _)| k.is_version())
    }

    pub fn has_wildcards(&self) -> bool {
        self.tokens.iter().any(|t| matches!(t, TemplateToken::Wildcard))
    }

    /// Extract field values from a filename; `None` if it does not match.
    pub fn parse(&self, filename: &str) -> Option<FieldValues> {
        let caps = self.matcher.captures(filename)?;
        let mut values = FieldValues::default();
        for (kind, _) in self.fields() {
            // Captures are 1..=9 ASCII digits, so this cannot overflow.
            let value = caps.name(kind.as_str())?.as_str().parse::<u32>().ok()?;
            values.set(kind, value);
        }
        Some(values)
    }

    pub fn matches(&self, filename: &str) -> bool {
        self.matcher.is_match(filename)
    }

    /// Parse a filename all the way to a catalog entry.
    ///
    /// Returns `Ok(None)` when the name does not match, and an
    /// `InvalidDate` error when it matches but names an impossible date.
    pub fn entry_for(&self, filename: &str) -> Result<Option<FileEntry>> {
        let Some(values) = self.parse(filename) else {
            return Ok(None);
        };
        let timestamp = timestamp::resolve(&values).map_err(|e| match e {
            CatalogError::InvalidDate { message, .. } => CatalogError::invalid_date(filename, message),
            other => other,
        })?;
        Ok(Some(FileEntry {
            timestamp,
            filename: filename.to_string(),
            version: values.version,
            revision: values.revision,
        }))
    }

    /// Render field values into a concrete filename.
    pub fn format(&self, values: &FieldValues) -> Result<String> {
        let mut out = String::with_capacity(self.raw.len());
        for token in &self.tokens {
            match token {
                TemplateToken::Literal(text) => out.push_str(text),
                TemplateToken::Wildcard => {
                    return Err(CatalogError::template(
                        &self.raw,
                        "templates with '?' wildcards cannot be formatted",
                    ));
                }
                TemplateToken::Field { kind, width } => {
                    let value = values.get(*kind).ok_or_else(|| {
                        CatalogError::template(&self.raw, format!("no value for field '{}'", kind))
                    })?;
                    let rendered = format!("{:0width$}", value, width = *width);
                    if rendered.len() > *width {
                        return Err(CatalogError::template(
                            &self.raw,
                            format!("{} = {} does not fit in {} digits", kind, value, width),
                        ));
                    }
                    out.push_str(&rendered);
                }
            }
        }
        Ok(out)
    }
}

impl fmt::Display for FilenameTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl PartialEq for FilenameTemplate {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl Eq for FilenameTemplate {}

fn tokenize(template: &str) -> Result<Vec<TemplateToken>> {
    let mut tokens = Vec::new();
    let mut literal = String::new();
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                literal.push('{');
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                literal.push('}');
            }
            '{' => {
                let mut inner = String::new();
                let mut closed = false;
                for c in chars.by_ref() {
                    if c == '}' {
                        closed = true;
                        break;
                    }
                    inner.push(c);
                }
                if !closed {
                    return Err(CatalogError::template(template, "unclosed '{'"));
                }
                if !literal.is_empty() {
                    tokens.push(TemplateToken::Literal(std::mem::take(&mut literal)));
                }
                tokens.push(parse_field(template, &inner)?);
            }
            '}' => return Err(CatalogError::template(template, "unmatched '}'")),
            '?' => {
                if !literal.is_empty() {
                    tokens.push(TemplateToken::Literal(std::mem::take(&mut literal)));
                }
                tokens.push(TemplateToken::Wildcard);
            }
            other => literal.push(other),
        }
    }
    if !literal.is_empty() {
        tokens.push(TemplateToken::Literal(literal));
    }
    Ok(tokens)
}

/// Parse the inside of `{name:0Nd}`
fn parse_field(template: &str, inner: &str) -> Result<TemplateToken> {
    let (name, spec) = match inner.split_once(':') {
        Some((name, spec)) => (name.trim(), spec.trim()),
        None => {
            return Err(CatalogError::template(
                template,
                format!("field '{{{}}}' needs a fixed width, e.g. {{{}:02d}}", inner, inner),
            ));
        }
    };

    let kind = FieldKind::parse(name)
        .ok_or_else(|| CatalogError::template(template, format!("unknown field '{}'", name)))?;

    let digits = spec
        .strip_suffix('d')
        .ok_or_else(|| CatalogError::template(template, format!("field '{}' must be a 'd' integer field", name)))?;
    let digits = digits.strip_prefix('0').unwrap_or(digits);
    let width: usize = digits
        .parse()
        .map_err(|_| CatalogError::template(template, format!("field '{}' has invalid width '{}'", name, spec)))?;
    if width == 0 || width > MAX_FIELD_WIDTH {
        return Err(CatalogError::template(
            template,
            format!("field '{}' width must be 1..={}", name, MAX_FIELD_WIDTH),
        ));
    }

    Ok(TemplateToken::Field { kind, width })
}

fn validate_fields(template: &str, tokens: &[TemplateToken]) -> Result<()> {
    let mut seen: Vec<FieldKind> = Vec::new();
    for token in tokens {
        if let TemplateToken::Field { kind, .. } = token {
            if seen.contains(kind) {
                return Err(CatalogError::template(template, format!("field '{}' appears twice", kind)));
            }
            seen.push(*kind);
        }
    }

    if !seen.contains(&FieldKind::Year) {
        return Err(CatalogError::template(template, "a 'year' field is required"));
    }
    if !seen.contains(&FieldKind::Day) && !seen.contains(&FieldKind::Month) {
        return Err(CatalogError::template(
            template,
            "a 'day' (day-of-year) or 'month' field is required",
        ));
    }
    Ok(())
}
