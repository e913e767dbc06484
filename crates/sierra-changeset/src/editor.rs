//! Template editor capability surface
//!
//! The criteria engine never touches the template document format itself. It
//! only needs the operations of [`TemplateEditor`]; [`ElementTree`] is an
//! in-memory implementation used for previews and tests.

use crate::change::ChangeSet;
use crate::path::{Anchor, ElementPath};
use indexmap::IndexMap;

/// Operations the criteria engine needs from a template document
pub trait TemplateEditor {
    /// Check whether `path` resolves to an element
    fn find(&self, path: &ElementPath) -> bool;

    /// Read attribute `attr` of the first element matching `path`
    fn attr_get(&self, path: &ElementPath, attr: &str) -> Option<String>;

    /// Set attribute `attr` of the first element matching `path`
    ///
    /// # Errors
    /// Returns error if `path` does not resolve
    fn attr_set(&mut self, path: &ElementPath, attr: &str, value: &str) -> Result<(), EditError>;

    /// Rename child `tag` of the element at `path`
    ///
    /// # Errors
    /// Returns error if `path` or the child does not resolve
    fn tag_rename(&mut self, path: &ElementPath, tag: &str, new_tag: &str) -> Result<(), EditError>;

    /// Remove child `tag` of the element at `path`
    ///
    /// # Errors
    /// Returns error if `path` or the child does not resolve
    fn tag_remove(&mut self, path: &ElementPath, tag: &str) -> Result<(), EditError>;

    /// Append child `tag` with `attrs` under the element at `path`
    ///
    /// # Errors
    /// Returns error if `path` does not resolve
    fn tag_add(
        &mut self,
        path: &ElementPath,
        tag: &str,
        attrs: IndexMap<String, String>,
    ) -> Result<(), EditError>;
}

/// Apply every change in `changes`, in set order
///
/// # Errors
/// Stops at the first change whose path does not resolve
pub fn apply_changes<E: TemplateEditor + ?Sized>(
    editor: &mut E,
    changes: &ChangeSet,
) -> Result<usize, EditError> {
    let mut applied = 0;
    for change in changes {
        editor.attr_set(change.path(), change.attr(), change.value())?;
        applied += 1;
    }
    tracing::debug!(applied, "applied parameter changes");
    Ok(applied)
}

/// Errors raised by template edits
#[derive(Debug, thiserror::Error)]
pub enum EditError {
    /// Path matched no element
    #[error("no element matches {0}")]
    NotFound(ElementPath),

    /// Child tag missing under a resolved element
    #[error("element {path} has no child <{tag}>")]
    NoSuchChild {
        /// Parent element
        path: ElementPath,
        /// Missing child tag
        tag: String,
    },
}

/// In-memory element of a template document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Tag name
    pub tag: String,
    /// Attributes, in insertion order
    pub attrs: IndexMap<String, String>,
    /// Child elements
    pub children: Vec<Element>,
}

impl Element {
    /// Create element without attributes or children
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: IndexMap::new(),
            children: Vec::new(),
        }
    }

    /// Add an attribute
    #[must_use]
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    /// Add a child
    #[must_use]
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }
}

/// In-memory template document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementTree {
    root: Element,
}

impl ElementTree {
    /// Wrap a root element
    #[must_use]
    pub fn new(root: Element) -> Self {
        Self { root }
    }

    /// Root element
    #[must_use]
    pub fn root(&self) -> &Element {
        &self.root
    }

    /// Resolve a path to child indices from the root
    fn locate(&self, path: &ElementPath) -> Option<Vec<usize>> {
        let segments = path.segments();
        if segments.is_empty() {
            return Some(Vec::new());
        }
        match path.anchor() {
            Anchor::Child => match_below(&self.root, segments),
            Anchor::Descendant => search_descendants(&self.root, segments),
        }
    }

    fn element(&self, indices: &[usize]) -> &Element {
        indices.iter().fold(&self.root, |elem, &i| &elem.children[i])
    }

    fn element_mut(&mut self, indices: &[usize]) -> &mut Element {
        indices
            .iter()
            .fold(&mut self.root, |elem, &i| &mut elem.children[i])
    }

    fn resolve_mut(&mut self, path: &ElementPath) -> Result<&mut Element, EditError> {
        let indices = self
            .locate(path)
            .ok_or_else(|| EditError::NotFound(path.clone()))?;
        Ok(self.element_mut(&indices))
    }
}

/// Match `segments` as a chain of direct children below `elem`
fn match_below(elem: &Element, segments: &[String]) -> Option<Vec<usize>> {
    let Some((first, rest)) = segments.split_first() else {
        return Some(Vec::new());
    };
    elem.children
        .iter()
        .enumerate()
        .filter(|(_, child)| &child.tag == first)
        .find_map(|(i, child)| {
            match_below(child, rest).map(|mut tail| {
                tail.insert(0, i);
                tail
            })
        })
}

/// Try `match_below` at `elem` and then at every descendant, preorder
fn search_descendants(elem: &Element, segments: &[String]) -> Option<Vec<usize>> {
    if let Some(found) = match_below(elem, segments) {
        return Some(found);
    }
    elem.children.iter().enumerate().find_map(|(i, child)| {
        search_descendants(child, segments).map(|mut tail| {
            tail.insert(0, i);
            tail
        })
    })
}

impl TemplateEditor for ElementTree {
    fn find(&self, path: &ElementPath) -> bool {
        self.locate(path).is_some()
    }

    fn attr_get(&self, path: &ElementPath, attr: &str) -> Option<String> {
        let indices = self.locate(path)?;
        self.element(&indices).attrs.get(attr).cloned()
    }

    fn attr_set(&mut self, path: &ElementPath, attr: &str, value: &str) -> Result<(), EditError> {
        let elem = self.resolve_mut(path)?;
        elem.attrs.insert(attr.to_string(), value.to_string());
        Ok(())
    }

    fn tag_rename(
        &mut self,
        path: &ElementPath,
        tag: &str,
        new_tag: &str,
    ) -> Result<(), EditError> {
        let elem = self.resolve_mut(path)?;
        let child = elem
            .children
            .iter_mut()
            .find(|c| c.tag == tag)
            .ok_or_else(|| EditError::NoSuchChild {
                path: path.clone(),
                tag: tag.to_string(),
            })?;
        child.tag = new_tag.to_string();
        Ok(())
    }

    fn tag_remove(&mut self, path: &ElementPath, tag: &str) -> Result<(), EditError> {
        let elem = self.resolve_mut(path)?;
        let pos = elem
            .children
            .iter()
            .position(|c| c.tag == tag)
            .ok_or_else(|| EditError::NoSuchChild {
                path: path.clone(),
                tag: tag.to_string(),
            })?;
        elem.children.remove(pos);
        Ok(())
    }

    fn tag_add(
        &mut self,
        path: &ElementPath,
        tag: &str,
        attrs: IndexMap<String, String>,
    ) -> Result<(), EditError> {
        let elem = self.resolve_mut(path)?;
        elem.children.push(Element {
            tag: tag.to_string(),
            attrs,
            children: Vec::new(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::change::ChangeSetBuilder;

    fn template() -> ElementTree {
        ElementTree::new(
            Element::new("argos-configuration")
                .with_child(
                    Element::new("arena").with_attr("size", "16, 8, 2").with_child(
                        Element::new("distribute")
                            .with_child(Element::new("entity").with_attr("quantity", "1")),
                    ),
                )
                .with_child(Element::new("controllers")),
        )
    }

    #[test]
    fn descendant_path_resolves_nested_element() {
        let tree = template();
        let path = ElementPath::descendant(&["distribute", "entity"]);
        assert!(tree.find(&path));
        assert_eq!(tree.attr_get(&path, "quantity").as_deref(), Some("1"));
    }

    #[test]
    fn child_path_requires_direct_child() {
        let tree = template();
        assert!(tree.find(&"./arena/distribute".parse().unwrap()));
        assert!(!tree.find(&"./distribute".parse().unwrap()));
    }

    #[test]
    fn apply_changes_sets_attributes() {
        let mut tree = template();
        let entity = ElementPath::descendant(&["arena", "distribute", "entity"]);
        let arena = ElementPath::descendant(&["arena"]);
        let changes = ChangeSetBuilder::new()
            .set(&entity, "quantity", 8)
            .set(&arena, "size", "32, 16, 2")
            .build();

        assert_eq!(apply_changes(&mut tree, &changes).unwrap(), 2);
        assert_eq!(tree.attr_get(&entity, "quantity").as_deref(), Some("8"));
        assert_eq!(tree.attr_get(&arena, "size").as_deref(), Some("32, 16, 2"));
    }

    #[test]
    fn apply_changes_fails_on_missing_element() {
        let mut tree = template();
        let changes = ChangeSetBuilder::new()
            .set(&ElementPath::descendant(&["nest"]), "pos", "1, 1")
            .build();
        assert!(matches!(
            apply_changes(&mut tree, &changes),
            Err(EditError::NotFound(_))
        ));
    }

    #[test]
    fn tag_operations() {
        let mut tree = template();
        let root = ElementPath::root();
        tree.tag_add(&root, "loop_functions", IndexMap::new()).unwrap();
        assert!(tree.find(&"./loop_functions".parse().unwrap()));

        tree.tag_rename(&root, "loop_functions", "lf").unwrap();
        assert!(tree.find(&"./lf".parse().unwrap()));

        tree.tag_remove(&root, "lf").unwrap();
        assert!(!tree.find(&"./lf".parse().unwrap()));
        assert!(matches!(
            tree.tag_remove(&root, "lf"),
            Err(EditError::NoSuchChild { .. })
        ));
    }
}
