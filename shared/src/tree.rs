//! Rebuilds the reply forest of a post from its flat comment list.
//!
//! The walk is iterative and places each comment ID at most once, so
//! corrupt data (duplicate IDs, parent cycles) can't make it loop. Comments
//! that no root reaches are left out.

use std::collections::{HashMap, HashSet};

use crate::entity::Comment;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentNode {
    pub comment: Comment,
    /// 0 for a root comment, used for indentation only.
    pub depth: usize,
    pub children: Vec<CommentNode>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentTree {
    roots: Vec<CommentNode>,
    placed: usize,
    excluded: usize,
}

impl CommentTree {
    /// Build the forest. Roots and siblings keep the order of `comments`.
    pub fn build(comments: &[Comment]) -> Self {
        let mut root_candidates = Vec::new();
        let mut by_parent: HashMap<&str, Vec<usize>> = HashMap::new();
        for (i, c) in comments.iter().enumerate() {
            if c.is_root() {
                root_candidates.push(i);
            } else if let Some(parent) = c.parent_id.as_deref() {
                by_parent.entry(parent).or_default().push(i);
            }
        }

        let mut visited: HashSet<&str> = HashSet::new();
        let mut order = Vec::with_capacity(comments.len());
        let mut depth = vec![0usize; comments.len()];
        let mut kids: Vec<Vec<usize>> = vec![Vec::new(); comments.len()];
        let mut roots = Vec::new();

        // (index, depth, parent index)
        let mut stack: Vec<(usize, usize, Option<usize>)> = root_candidates
            .iter()
            .rev()
            .map(|&i| (i, 0, None))
            .collect();

        while let Some((i, d, parent)) = stack.pop() {
            let id = comments[i].id.as_str();
            if !visited.insert(id) {
                continue;
            }
            order.push(i);
            depth[i] = d;
            match parent {
                Some(p) => kids[p].push(i),
                None => roots.push(i),
            }
            if let Some(children) = by_parent.get(id) {
                stack.extend(children.iter().rev().map(|&c| (c, d + 1, Some(i))));
            }
        }

        // Children come after their parent in `order`, so walking it
        // backwards finishes every subtree before it is attached.
        let mut slots: Vec<Option<CommentNode>> = vec![None; comments.len()];
        for &i in order.iter().rev() {
            let children = kids[i]
                .iter()
                .filter_map(|&k| slots[k].take())
                .collect();
            slots[i] = Some(CommentNode {
                comment: comments[i].clone(),
                depth: depth[i],
                children,
            });
        }
        let roots: Vec<CommentNode> = roots.iter().filter_map(|&i| slots[i].take()).collect();

        let placed = order.len();
        let excluded = comments.len() - placed;
        if excluded > 0 {
            tracing::debug!(excluded, "comments unreachable from any root were left out");
        }

        Self {
            roots,
            placed,
            excluded,
        }
    }

    pub fn roots(&self) -> &[CommentNode] {
        &self.roots
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Number of comments placed in the tree.
    pub fn len(&self) -> usize {
        self.placed
    }

    /// Number of input comments left out (dangling parent, duplicate ID, cycle).
    pub fn excluded(&self) -> usize {
        self.excluded
    }

    /// `(depth, comment)` in display order: each comment followed by its replies.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            stack: self.roots.iter().rev().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a CommentTree {
    type Item = (usize, &'a Comment);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

pub struct Iter<'a> {
    stack: Vec<&'a CommentNode>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (usize, &'a Comment);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some((node.depth, &node.comment))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn c(id: &str, parent: Option<&str>) -> Comment {
        Comment {
            id: id.into(),
            content: format!("comment {id}"),
            name: "Ada".into(),
            avatar: String::new(),
            parent_id: parent.map(String::from),
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    fn ids(nodes: &[CommentNode]) -> Vec<&str> {
        nodes.iter().map(|n| n.comment.id.as_str()).collect()
    }

    fn check_parent_links(nodes: &[CommentNode], parent: Option<&str>) {
        for n in nodes {
            assert_eq!(n.comment.parent_id.as_deref(), parent);
            check_parent_links(&n.children, Some(n.comment.id.as_str()));
        }
    }

    #[test]
    fn nested_scenario() {
        let tree = CommentTree::build(&[
            c("1", None),
            c("2", Some("1")),
            c("3", Some("2")),
            c("4", None),
        ]);
        assert_eq!(ids(tree.roots()), ["1", "4"]);
        let one = &tree.roots()[0];
        assert_eq!(ids(&one.children), ["2"]);
        assert_eq!(ids(&one.children[0].children), ["3"]);
        assert_eq!(one.children[0].children[0].depth, 2);
        assert!(tree.roots()[1].children.is_empty());
        assert_eq!(tree.len(), 4);
        check_parent_links(tree.roots(), None);
    }

    #[test]
    fn empty_input_has_no_roots() {
        let tree = CommentTree::build(&[]);
        assert!(tree.is_empty());
        assert_eq!(tree.iter().count(), 0);
    }

    #[test]
    fn dangling_parent_is_excluded_with_its_replies() {
        let tree = CommentTree::build(&[
            c("1", None),
            c("2", Some("gone")),
            c("3", Some("2")),
        ]);
        assert_eq!(ids(tree.roots()), ["1"]);
        assert!(tree.roots()[0].children.is_empty());
        assert_eq!(tree.excluded(), 2);
        assert!(tree.iter().all(|(_, c)| c.id == "1"));
    }

    #[test]
    fn siblings_keep_input_order() {
        let tree = CommentTree::build(&[
            c("r", None),
            c("z", Some("r")),
            c("a", Some("r")),
            c("m", Some("r")),
        ]);
        assert_eq!(ids(&tree.roots()[0].children), ["z", "a", "m"]);
    }

    #[test]
    fn child_listed_before_parent_is_still_placed() {
        let tree = CommentTree::build(&[c("2", Some("1")), c("1", None)]);
        assert_eq!(ids(tree.roots()), ["1"]);
        assert_eq!(ids(&tree.roots()[0].children), ["2"]);
    }

    #[test]
    fn cycle_is_excluded_without_hanging() {
        let tree = CommentTree::build(&[
            c("root", None),
            c("a", Some("b")),
            c("b", Some("a")),
        ]);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.excluded(), 2);
    }

    #[test]
    fn duplicate_id_is_placed_once() {
        // The second "1" hangs under "2", which would loop back to "1".
        let tree = CommentTree::build(&[
            c("1", None),
            c("2", Some("1")),
            c("1", Some("2")),
        ]);
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.excluded(), 1);
        assert!(tree.roots()[0].children[0].children.is_empty());
    }

    #[test]
    fn iter_is_preorder_with_depth() {
        let tree = CommentTree::build(&[
            c("1", None),
            c("4", None),
            c("2", Some("1")),
            c("5", Some("4")),
            c("3", Some("2")),
        ]);
        let walked: Vec<(usize, &str)> = tree.iter().map(|(d, c)| (d, c.id.as_str())).collect();
        assert_eq!(walked, [(0, "1"), (1, "2"), (2, "3"), (0, "4"), (1, "5")]);
    }

    #[test]
    fn deep_chain_does_not_recurse() {
        let mut comments = vec![c("0", None)];
        for i in 1..5_000 {
            comments.push(c(&i.to_string(), Some(&(i - 1).to_string())));
        }
        let tree = CommentTree::build(&comments);
        assert_eq!(tree.len(), 5_000);
        assert_eq!(tree.iter().last().map(|(d, _)| d), Some(4_999));
        // Dismantle iteratively so the test's own drop stays shallow.
        let mut next = tree.roots;
        while let Some(node) = next.pop() {
            next.extend(node.children);
        }
    }
}
