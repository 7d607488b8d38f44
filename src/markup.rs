//! Lenient tag scanner for catalog markup documents
//!
//! Splits a tag-based document into open, close and text tokens. The scanner
//! never fails: anything it cannot read is reported as a warning and skipped,
//! and scanning resumes at the next tag.

use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

use crate::models::Warning;

/// An opening (or self-closing) tag with its attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
    pub attrs: HashMap<String, String>,
    pub self_closing: bool,
}

impl Tag {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(|v| v.as_str())
    }

    /// Read a `0`/`1` style boolean attribute. Missing or unrecognized values
    /// read as `false`.
    pub fn flag(&self, name: &str) -> bool {
        matches!(
            self.attr(name).map(|v| v.trim().to_ascii_lowercase()).as_deref(),
            Some("1") | Some("true") | Some("yes")
        )
    }

    /// Like [`Tag::flag`] but distinguishes a missing attribute.
    pub fn opt_flag(&self, name: &str) -> Option<bool> {
        self.attr(name).map(|_| self.flag(name))
    }
}

/// A token produced by [`scan`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Open(Tag),
    Close(String),
    /// Non-whitespace text between tags, entity-decoded and trimmed
    Text(String),
}

fn tag_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r#"^<\s*(/)?\s*([A-Za-z_][\w:.\-]*)((?:\s+[^\s=/>]+\s*=\s*(?:"[^"]*"|'[^']*'))*)\s*(/)?\s*>"#,
        )
        .expect("tag pattern compiles")
    })
}

fn attr_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"([^\s=/>]+)\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("attribute pattern compiles")
    })
}

/// Scan a markup document into tokens.
///
/// Comments, processing instructions and doctype declarations are skipped.
/// CDATA sections are returned as text.
///
/// # Examples
///
/// ```
/// use figurekit::markup::{scan, Token};
///
/// let (tokens, warnings) = scan(r#"<palette id="1"><color id="7"/></palette>"#);
/// assert_eq!(tokens.len(), 3);
/// assert!(matches!(&tokens[1], Token::Open(tag) if tag.attr("id") == Some("7")));
/// assert!(warnings.is_empty());
/// ```
pub fn scan(input: &str) -> (Vec<Token>, Vec<Warning>) {
    let mut tokens = Vec::new();
    let mut warnings = Vec::new();
    let mut pos = 0;

    while pos < input.len() {
        let rest = &input[pos..];
        let Some(lt) = rest.find('<') else {
            push_text(&mut tokens, rest);
            break;
        };
        push_text(&mut tokens, &rest[..lt]);
        pos += lt;
        let rest = &input[pos..];

        if let Some((consumed, cdata)) = skip_declaration(rest, pos, &mut warnings) {
            if let Some(text) = cdata {
                push_text(&mut tokens, text);
            }
            pos += consumed;
            continue;
        }

        match tag_pattern().captures(rest) {
            Some(caps) => {
                let len = caps.get(0).map_or(1, |m| m.end());
                let name = caps[2].to_string();
                if caps.get(1).is_some() {
                    tokens.push(Token::Close(name));
                } else {
                    let attrs = parse_attrs(caps.get(3).map_or("", |m| m.as_str()));
                    let self_closing = caps.get(4).is_some();
                    tokens.push(Token::Open(Tag { name, attrs, self_closing }));
                }
                pos += len;
            }
            None => {
                // Resume at the next tag start or just past the next '>'
                let next_lt = rest[1..].find('<').map(|i| i + 1);
                let next_gt = rest.find('>').map(|i| i + 1);
                let end = match (next_lt, next_gt) {
                    (Some(a), Some(b)) => a.min(b),
                    (Some(a), None) => a,
                    (None, Some(b)) => b,
                    (None, None) => rest.len(),
                };
                warnings.push(Warning::new(format!(
                    "Malformed tag at byte {}: '{}'",
                    pos,
                    excerpt(&rest[..end])
                )));
                pos += end;
            }
        }
    }

    (tokens, warnings)
}

/// Skip `<!-- -->`, `<? ?>`, `<!...>` and CDATA sections.
///
/// Returns the number of bytes consumed and, for CDATA, its content.
fn skip_declaration<'a>(
    rest: &'a str,
    pos: usize,
    warnings: &mut Vec<Warning>,
) -> Option<(usize, Option<&'a str>)> {
    let (open, close) = if rest.starts_with("<!--") {
        ("<!--", "-->")
    } else if rest.starts_with("<![CDATA[") {
        ("<![CDATA[", "]]>")
    } else if rest.starts_with("<?") {
        ("<?", "?>")
    } else if rest.starts_with("<!") {
        ("<!", ">")
    } else {
        return None;
    };

    match rest[open.len()..].find(close) {
        Some(i) => {
            let body = &rest[open.len()..open.len() + i];
            let cdata = (open == "<![CDATA[").then_some(body);
            Some((open.len() + i + close.len(), cdata))
        }
        None => {
            warnings.push(Warning::new(format!("Unterminated '{}' at byte {}", open, pos)));
            Some((rest.len(), None))
        }
    }
}

fn parse_attrs(raw: &str) -> HashMap<String, String> {
    attr_pattern()
        .captures_iter(raw)
        .map(|caps| {
            let value = caps.get(2).or_else(|| caps.get(3)).map_or("", |m| m.as_str());
            (caps[1].to_string(), decode_entities(value))
        })
        .collect()
}

fn push_text(tokens: &mut Vec<Token>, raw: &str) {
    let trimmed = raw.trim();
    if !trimmed.is_empty() {
        tokens.push(Token::Text(decode_entities(trimmed)));
    }
}

fn decode_entities(value: &str) -> String {
    if !value.contains('&') {
        return value.to_string();
    }
    value
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

fn excerpt(s: &str) -> String {
    const MAX: usize = 40;
    match s.char_indices().nth(MAX) {
        Some((i, _)) => format!("{}...", &s[..i]),
        None => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open(token: &Token) -> &Tag {
        match token {
            Token::Open(tag) => tag,
            other => panic!("expected open tag, got {:?}", other),
        }
    }

    #[test]
    fn test_self_closing_with_attributes() {
        let (tokens, warnings) = scan(r#"<part id="180" type='hd' colorable="1"/>"#);
        assert!(warnings.is_empty());
        assert_eq!(tokens.len(), 1);
        let tag = open(&tokens[0]);
        assert_eq!(tag.name, "part");
        assert!(tag.self_closing);
        assert_eq!(tag.attr("id"), Some("180"));
        assert_eq!(tag.attr("type"), Some("hd"));
        assert!(tag.flag("colorable"));
        assert!(!tag.flag("sellable"));
        assert_eq!(tag.opt_flag("sellable"), None);
    }

    #[test]
    fn test_nested_tags_and_text() {
        let (tokens, warnings) =
            scan("<palette id=\"1\">\n  <color id=\"1\" index=\"1\">FFCB98</color>\n</palette>");
        assert!(warnings.is_empty());
        assert_eq!(tokens.len(), 5);
        assert_eq!(open(&tokens[0]).name, "palette");
        assert_eq!(open(&tokens[1]).name, "color");
        assert_eq!(tokens[2], Token::Text("FFCB98".to_string()));
        assert_eq!(tokens[3], Token::Close("color".to_string()));
        assert_eq!(tokens[4], Token::Close("palette".to_string()));
    }

    #[test]
    fn test_declarations_and_comments_skipped() {
        let input = "<?xml version=\"1.0\"?><!DOCTYPE x><!-- note <set> --><sets/>";
        let (tokens, warnings) = scan(input);
        assert!(warnings.is_empty());
        assert_eq!(tokens.len(), 1);
        assert_eq!(open(&tokens[0]).name, "sets");
    }

    #[test]
    fn test_cdata_becomes_text() {
        let (tokens, _) = scan("<color><![CDATA[ABCDEF]]></color>");
        assert_eq!(tokens[1], Token::Text("ABCDEF".to_string()));
    }

    #[test]
    fn test_malformed_tag_warns_and_continues() {
        let (tokens, warnings) = scan(r#"<set id="1" <part id="2"/></set>"#);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.contains("Malformed tag"));
        assert!(tokens.iter().any(|t| matches!(t, Token::Open(tag) if tag.name == "part")));
        assert_eq!(tokens.last(), Some(&Token::Close("set".to_string())));
    }

    #[test]
    fn test_unterminated_comment() {
        let (tokens, warnings) = scan("<a/><!-- never closed <b/>");
        assert_eq!(tokens.len(), 1);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.contains("Unterminated"));
    }

    #[test]
    fn test_entities_decoded() {
        let (tokens, _) = scan(r#"<x name="Tom &amp; Jerry">a &lt; b</x>"#);
        assert_eq!(open(&tokens[0]).attr("name"), Some("Tom & Jerry"));
        assert_eq!(tokens[1], Token::Text("a < b".to_string()));
    }

    #[test]
    fn test_empty_input() {
        let (tokens, warnings) = scan("");
        assert!(tokens.is_empty());
        assert!(warnings.is_empty());
    }
}
