//! Category tree resolution.
//!
//! A [`CategoryTree`] is built from a full snapshot of the category table and answers
//! child, descendant, ancestor and terminal-node queries in memory. Nothing is cached:
//! every request loads a fresh snapshot with [`load_category_tree`].
//!
//! All walks carry a visited set, so malformed data containing a parent cycle still
//! terminates.

use crate::{
    entities::{Category, category, product},
    errors::Result,
};
use sea_orm::{ConnectionTrait, EntityTrait, QueryOrder};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};

/// A category together with its distance from the queried node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeEntry {
    /// The category row
    #[serde(flatten)]
    pub category: category::Model,
    /// Number of edges between this category and the queried node
    pub depth: u32,
}

/// One line of the indented classifier listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassifierLine {
    /// Line number in output order, starting at 1
    pub id: usize,
    /// Id of the category or product on this line
    pub entity_id: i64,
    /// Category or product name
    pub name: String,
    /// Indentation level, roots at 0
    pub level: usize,
    /// Whether the line is a product rather than a category
    pub is_product: bool,
}

/// In-memory view of the category table.
#[derive(Debug, Clone, Default)]
pub struct CategoryTree {
    nodes: BTreeMap<i64, category::Model>,
    children: HashMap<Option<i64>, Vec<i64>>,
}

impl CategoryTree {
    /// Builds the tree; children lists follow id order.
    pub fn new(categories: impl IntoIterator<Item = category::Model>) -> Self {
        let nodes: BTreeMap<i64, category::Model> =
            categories.into_iter().map(|c| (c.id, c)).collect();
        let mut children: HashMap<Option<i64>, Vec<i64>> = HashMap::new();
        for node in nodes.values() {
            children.entry(node.parent_id).or_default().push(node.id);
        }
        Self { nodes, children }
    }

    /// Number of categories in the snapshot.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the snapshot is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Looks up a category.
    #[must_use]
    pub fn get(&self, id: i64) -> Option<&category::Model> {
        self.nodes.get(&id)
    }

    fn child_ids(&self, parent: Option<i64>) -> &[i64] {
        self.children.get(&parent).map_or(&[], Vec::as_slice)
    }

    /// Direct children of a category.
    #[must_use]
    pub fn children(&self, id: i64) -> Vec<&category::Model> {
        self.child_ids(Some(id))
            .iter()
            .filter_map(|child| self.nodes.get(child))
            .collect()
    }

    /// Every category below `id`, in preorder, excluding `id` itself.
    #[must_use]
    pub fn descendants(&self, id: i64) -> Vec<&category::Model> {
        let mut result = Vec::new();
        let mut visited = HashSet::from([id]);
        let mut stack: Vec<i64> = self.child_ids(Some(id)).iter().rev().copied().collect();

        while let Some(current) = stack.pop() {
            if !visited.insert(current) {
                continue;
            }
            if let Some(node) = self.nodes.get(&current) {
                result.push(node);
            }
            stack.extend(self.child_ids(Some(current)).iter().rev());
        }
        result
    }

    /// Ids of `id` and all of its descendants.
    #[must_use]
    pub fn subtree_ids(&self, id: i64) -> Vec<i64> {
        std::iter::once(id)
            .chain(self.descendants(id).into_iter().map(|c| c.id))
            .collect()
    }

    /// The parent chain of `id`, root first, excluding `id` itself.
    ///
    /// Depth counts upwards from `id`: the direct parent has depth 1.
    #[must_use]
    pub fn ancestors(&self, id: i64) -> Vec<TreeEntry> {
        let mut chain = Vec::new();
        let mut visited = HashSet::from([id]);
        let mut current = self.nodes.get(&id).and_then(|node| node.parent_id);
        let mut depth = 1;

        while let Some(parent_id) = current {
            if !visited.insert(parent_id) {
                break;
            }
            let Some(parent) = self.nodes.get(&parent_id) else {
                break;
            };
            chain.push(TreeEntry {
                category: parent.clone(),
                depth,
            });
            current = parent.parent_id;
            depth += 1;
        }

        chain.reverse();
        chain
    }

    /// Leaf categories under `id`, each tagged with its depth below `id`.
    ///
    /// A category without children is its own terminal at depth 0.
    #[must_use]
    pub fn terminals(&self, id: i64) -> Vec<TreeEntry> {
        let mut result = Vec::new();
        let mut visited = HashSet::new();
        self.collect_terminals(id, 0, &mut visited, &mut result);
        result
    }

    fn collect_terminals(
        &self,
        id: i64,
        depth: u32,
        visited: &mut HashSet<i64>,
        out: &mut Vec<TreeEntry>,
    ) {
        if !visited.insert(id) {
            return;
        }
        let children = self.child_ids(Some(id));
        if children.is_empty() {
            if let Some(node) = self.nodes.get(&id) {
                out.push(TreeEntry {
                    category: node.clone(),
                    depth,
                });
            }
            return;
        }
        for &child in children {
            self.collect_terminals(child, depth + 1, visited, out);
        }
    }

    /// The taxonomy as an indented listing.
    ///
    /// Only non-enum categories appear. Siblings are sorted by name; each category is
    /// followed by its products (sorted by name, one level deeper) and then by its
    /// subcategories.
    #[must_use]
    pub fn classifier(&self, products: &[product::Model]) -> Vec<ClassifierLine> {
        let mut products_by_category: HashMap<i64, Vec<&product::Model>> = HashMap::new();
        for product in products {
            products_by_category
                .entry(product.category_id)
                .or_default()
                .push(product);
        }
        for list in products_by_category.values_mut() {
            list.sort_by(|a, b| a.name.cmp(&b.name));
        }

        let mut lines = Vec::new();
        let mut visited = HashSet::new();
        self.classifier_level(None, 0, &products_by_category, &mut visited, &mut lines);
        lines
    }

    fn classifier_level(
        &self,
        parent: Option<i64>,
        level: usize,
        products: &HashMap<i64, Vec<&product::Model>>,
        visited: &mut HashSet<i64>,
        lines: &mut Vec<ClassifierLine>,
    ) {
        let mut siblings: Vec<&category::Model> = self
            .child_ids(parent)
            .iter()
            .filter_map(|id| self.nodes.get(id))
            .filter(|c| !c.is_enum)
            .collect();
        siblings.sort_by(|a, b| a.name.cmp(&b.name));

        for category in siblings {
            if !visited.insert(category.id) {
                continue;
            }
            lines.push(ClassifierLine {
                id: lines.len() + 1,
                entity_id: category.id,
                name: category.name.clone(),
                level,
                is_product: false,
            });
            for product in products.get(&category.id).into_iter().flatten() {
                lines.push(ClassifierLine {
                    id: lines.len() + 1,
                    entity_id: product.id,
                    name: product.name.clone(),
                    level: level + 1,
                    is_product: true,
                });
            }
            self.classifier_level(Some(category.id), level + 1, products, visited, lines);
        }
    }
}

/// Loads a fresh snapshot of the whole category table.
pub async fn load_category_tree<C: ConnectionTrait>(db: &C) -> Result<CategoryTree> {
    let categories = Category::find()
        .order_by_asc(category::Column::Id)
        .all(db)
        .await?;
    Ok(CategoryTree::new(categories))
}
