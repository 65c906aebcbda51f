use std::collections::HashSet;

use crate::dom_tree::Node;
use crate::matcher::{CompoundSelector, Matcher};
use crate::Document;
use crate::Selection;

impl Document {
    /// Finds every element of the document matching the selector.
    /// Malformed selector groups match nothing.
    pub fn select(&self, sel: &str) -> Selection<'_> {
        self.root().select(sel)
    }

    pub fn select_with_matcher(&self, matcher: &Matcher) -> Selection<'_> {
        self.root().select_with_matcher(matcher)
    }

    pub fn query_selector(&self, sel: &str) -> Option<Node<'_>> {
        self.root().query_selector(sel)
    }

    pub fn get_element_by_id(&self, id: &str) -> Option<Node<'_>> {
        self.root().get_element_by_id(id)
    }

    pub fn get_elements_by_class_name(&self, names: &str) -> Selection<'_> {
        self.root().get_elements_by_class_name(names)
    }

    pub fn get_elements_by_tag_name(&self, tag: &str) -> Selection<'_> {
        self.root().get_elements_by_tag_name(tag)
    }

    pub fn get_all_nodes_with_tag(&self, tags: &[&str]) -> Selection<'_> {
        self.root().get_all_nodes_with_tag(tags)
    }
}

impl<'a> Node<'a> {
    /// Descendants matching any group of the selector, in document order.
    pub fn select(&self, sel: &str) -> Selection<'a> {
        self.select_with_matcher(&Matcher::lenient(sel))
    }

    pub fn select_with_matcher(&self, matcher: &Matcher) -> Selection<'a> {
        Selection {
            nodes: matcher.match_all(self),
        }
    }

    /// The first descendant matching the selector.
    pub fn query_selector(&self, sel: &str) -> Option<Node<'a>> {
        Matcher::lenient(sel).match_first(self)
    }

    /// The first descendant whose `id` is exactly `id`.
    pub fn get_element_by_id(&self, id: &str) -> Option<Node<'a>> {
        if id.is_empty() {
            return None;
        }
        Matcher::from_groups(vec![CompoundSelector::id(id)]).match_first(self)
    }

    /// Descendants carrying every class of the whitespace separated list.
    pub fn get_elements_by_class_name(&self, names: &str) -> Selection<'a> {
        if names.trim().is_empty() {
            return Selection::default();
        }
        self.select_with_matcher(&Matcher::from_groups(vec![CompoundSelector::classes(names)]))
    }

    /// Descendants named `tag`; `*` returns every descendant element.
    pub fn get_elements_by_tag_name(&self, tag: &str) -> Selection<'a> {
        self.select_with_matcher(&Matcher::from_groups(vec![CompoundSelector::tag(tag)]))
    }

    /// Descendants named after any of `tags`, each listed once.
    pub fn get_all_nodes_with_tag(&self, tags: &[&str]) -> Selection<'a> {
        let groups = tags.iter().map(|tag| CompoundSelector::tag(tag)).collect();
        self.select_with_matcher(&Matcher::from_groups(groups))
    }
}

impl<'a> Selection<'a> {
    /// Descendants of every node in the selection matching `sel`, without duplicates.
    pub fn select(&self, sel: &str) -> Selection<'a> {
        let matcher = Matcher::lenient(sel);
        let mut seen = HashSet::new();
        let nodes = self
            .nodes()
            .iter()
            .flat_map(|node| matcher.match_all(node))
            .filter(|node| seen.insert(node.id))
            .collect();

        Selection { nodes }
    }

    /// Checks the current matched set of elements against a selector and
    /// returns true if at least one of these elements matches.
    pub fn is(&self, sel: &str) -> bool {
        self.is_matcher(&Matcher::lenient(sel))
    }

    /// Checks the current matched set of elements against a matcher and
    /// returns true if at least one of these elements matches.
    pub fn is_matcher(&self, matcher: &Matcher) -> bool {
        self.nodes().iter().any(|node| matcher.matches(node))
    }

    /// Whether the two selections share at least one node.
    pub fn is_selection(&self, sel: &Selection<'a>) -> bool {
        sel.nodes().iter().any(|node| self.contains(node))
    }
}
