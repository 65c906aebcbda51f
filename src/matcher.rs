//! Selector groups of the form `tag#id.class.class, ...`.
//!
//! Only compound selectors are understood: an optional tag name (or `*`), at
//! most one id and any number of classes. Combinators, attribute selectors and
//! pseudo-classes are rejected as malformed.

use std::str::FromStr;

use cssparser::{Delimiter, ParseError, ParseErrorKind, Parser, ParserInput, Token};
use html5ever::LocalName;
use tracing::debug;

use crate::dom_tree::{Element, Node, NodeData};
use crate::error::{Error, Result};

type GroupError<'i> = ParseError<'i, &'static str>;

/// One selector group. Every predicate present must hold.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompoundSelector {
    tag: Option<LocalName>,
    id: Option<String>,
    classes: Vec<String>,
}

impl CompoundSelector {
    /// Matches elements named `name`, or every element for `*`.
    pub fn tag(name: &str) -> Self {
        let tag = match name {
            "*" => None,
            name => Some(LocalName::from(name.to_ascii_lowercase())),
        };
        CompoundSelector {
            tag,
            ..Default::default()
        }
    }

    pub fn id(id: &str) -> Self {
        CompoundSelector {
            id: Some(id.to_owned()),
            ..Default::default()
        }
    }

    /// Matches elements carrying every whitespace separated class in `names`.
    pub fn classes(names: &str) -> Self {
        CompoundSelector {
            classes: names.split_whitespace().map(str::to_owned).collect(),
            ..Default::default()
        }
    }

    pub fn matches(&self, element: &Element) -> bool {
        if let Some(ref tag) = self.tag {
            if !element.name.local.eq_ignore_ascii_case(tag) {
                return false;
            }
        }

        if let Some(ref id) = self.id {
            if element.attr("id").map_or(true, |value| **value != **id) {
                return false;
            }
        }

        self.classes.iter().all(|class| element.has_class(class))
    }
}

/// A parsed selector string: the union of its comma separated groups.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Matcher {
    groups: Vec<CompoundSelector>,
}

impl Matcher {
    /// Parses a selector, failing on the first malformed group.
    pub fn new(selector: &str) -> Result<Self> {
        let groups = parse_groups(selector)
            .into_iter()
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|reason| Error::InvalidSelector {
                selector: selector.to_owned(),
                reason,
            })?;

        Ok(Matcher { groups })
    }

    /// Parses a selector, keeping the well-formed groups. Malformed groups match nothing.
    pub fn lenient(selector: &str) -> Self {
        let groups = parse_groups(selector)
            .into_iter()
            .filter_map(|group| match group {
                Ok(group) => Some(group),
                Err(reason) => {
                    debug!(selector, reason = %reason, "dropping malformed selector group");
                    None
                }
            })
            .collect();

        Matcher { groups }
    }

    pub(crate) fn from_groups(groups: Vec<CompoundSelector>) -> Self {
        Matcher { groups }
    }

    pub fn groups(&self) -> &[CompoundSelector] {
        &self.groups
    }

    /// Whether `node` is an element satisfying any group.
    pub fn matches(&self, node: &Node) -> bool {
        node.query(|data| match data {
            NodeData::Element(element) => self.groups.iter().any(|group| group.matches(element)),
            _ => false,
        })
    }

    /// Every matching descendant of `root`, in document order.
    pub fn match_all<'a>(&self, root: &Node<'a>) -> Vec<Node<'a>> {
        if self.groups.is_empty() {
            return Vec::new();
        }
        root.descendants().filter(|node| self.matches(node)).collect()
    }

    /// The first matching descendant of `root` in document order.
    pub fn match_first<'a>(&self, root: &Node<'a>) -> Option<Node<'a>> {
        if self.groups.is_empty() {
            return None;
        }
        root.descendants().find(|node| self.matches(node))
    }
}

impl FromStr for Matcher {
    type Err = Error;

    fn from_str(selector: &str) -> Result<Self> {
        Matcher::new(selector)
    }
}

fn parse_groups(selector: &str) -> Vec<std::result::Result<CompoundSelector, String>> {
    let mut input = ParserInput::new(selector);
    let mut parser = Parser::new(&mut input);
    let mut groups = Vec::new();

    loop {
        let group = parser.parse_until_before(Delimiter::Comma, parse_compound);
        groups.push(group.map_err(|err| describe(&err)));

        match parser.next() {
            Ok(&Token::Comma) => continue,
            _ => break,
        }
    }

    groups
}

fn parse_compound<'i, 't>(
    parser: &mut Parser<'i, 't>,
) -> std::result::Result<CompoundSelector, GroupError<'i>> {
    parser.skip_whitespace();

    let mut compound = CompoundSelector::default();
    let mut empty = true;

    loop {
        let token = match parser.next_including_whitespace() {
            Ok(token) => token.clone(),
            Err(_) => break,
        };

        match token {
            Token::Ident(ref name) if empty => {
                compound.tag = Some(LocalName::from(name.to_ascii_lowercase()));
            }
            Token::Delim('*') if empty => {}
            Token::IDHash(ref id) => {
                if compound.id.is_some() {
                    return Err(parser.new_custom_error("more than one id"));
                }
                compound.id = Some(String::from(&**id));
            }
            Token::Delim('.') => {
                let class = match parser.next_including_whitespace() {
                    Ok(Token::Ident(class)) => Some(String::from(&**class)),
                    _ => None,
                };
                match class {
                    Some(class) => compound.classes.push(class),
                    None => return Err(parser.new_custom_error("expected a class name after '.'")),
                }
            }
            Token::WhiteSpace(_) => {
                if parser.is_exhausted() {
                    break;
                }
                return Err(parser.new_custom_error("combinators are not supported"));
            }
            _ => return Err(parser.new_custom_error("unsupported selector syntax")),
        }

        empty = false;
    }

    if empty {
        return Err(parser.new_custom_error("empty selector"));
    }

    Ok(compound)
}

fn describe(err: &GroupError<'_>) -> String {
    match err.kind {
        ParseErrorKind::Custom(reason) => reason.to_owned(),
        ParseErrorKind::Basic(ref kind) => format!("{:?}", kind),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_compound_groups() {
        let matcher = Matcher::new("p#main.a.b, .c").unwrap();
        assert_eq!(
            matcher.groups(),
            &[
                CompoundSelector {
                    tag: Some(LocalName::from("p")),
                    id: Some("main".to_owned()),
                    classes: vec!["a".to_owned(), "b".to_owned()],
                },
                CompoundSelector::classes("c"),
            ][..]
        );
    }

    #[test]
    fn test_tag_is_lowercased() {
        let matcher = Matcher::new("DIV").unwrap();
        assert_eq!(matcher.groups(), &[CompoundSelector::tag("div")][..]);
    }

    #[test]
    fn test_wildcard() {
        let matcher = Matcher::new(" * ").unwrap();
        assert_eq!(matcher.groups(), &[CompoundSelector::default()][..]);
        assert_eq!(CompoundSelector::tag("*"), CompoundSelector::default());
    }

    #[test]
    fn test_rejects_unsupported_syntax() {
        for selector in &["div p", "div > p", "a[href]", "p:first-child", "#a#b", ". a", "", "p,,a"] {
            assert!(Matcher::new(selector).is_err(), "{:?} should not parse", selector);
        }
    }

    #[test]
    fn test_lenient_drops_bad_groups() {
        let matcher = Matcher::lenient("div p, .ok, a:hover");
        assert_eq!(matcher.groups(), &[CompoundSelector::classes("ok")][..]);

        assert!(Matcher::lenient("").groups().is_empty());
    }

    #[test]
    fn test_error_names_selector() {
        let err = "p >".parse::<Matcher>().unwrap_err();
        assert!(err.to_string().contains("\"p >\""));
    }
}
