use crate::models::{ Directory, Entry, EntryKind, Node };
use tracing::trace;

/// Glyphs used when drawing the outline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderStyle {
    pub indent_unit: String,
    pub branch: String,
}

impl Default for RenderStyle {
    fn default() -> Self {
        RenderStyle {
            indent_unit: "│   ".to_string(),
            branch: "├── ".to_string(),
        }
    }
}

/// Builds the nested structure from a flat listing.
///
/// Conflicting kinds at the same key are not rejected: the later entry wins,
/// and a replaced key keeps its original position among its siblings.
pub fn build<I>(entries: I) -> Directory where I: IntoIterator<Item = Entry> {
    let mut root = Directory::new();
    for entry in entries {
        insert_entry(&mut root, &entry);
    }
    root
}

fn insert_entry(root: &mut Directory, entry: &Entry) {
    let parts: Vec<&str> = entry.path
        .split('/')
        .filter(|part| !part.is_empty())
        .collect();
    let Some((last, parents)) = parts.split_last() else {
        trace!(path = %entry.path, "skipping entry with empty path");
        return;
    };

    let mut current = root;
    for part in parents {
        current = current.directory_mut(part);
    }
    match entry.kind {
        EntryKind::File => current.insert(last, Node::Leaf),
        EntryKind::Tree => {
            current.directory_mut(last);
        }
    }
}

/// Draws `root` as a branch outline, one line per node in pre-order.
pub fn render(root: &Directory, style: &RenderStyle) -> String {
    let mut out = String::new();
    render_into(root, style, "", &mut out);
    out
}

fn render_into(dir: &Directory, style: &RenderStyle, prefix: &str, out: &mut String) {
    for (name, node) in dir.iter() {
        out.push_str(prefix);
        out.push_str(&style.branch);
        out.push_str(name);
        out.push('\n');
        if let Node::Directory(child) = node {
            let nested = format!("{}{}", prefix, style.indent_unit);
            render_into(child, style, &nested, out);
        }
    }
}

/// Keeps leaves whose name contains `term` (ignoring case), directories whose
/// own name matches along with everything under them, and any directory
/// that still has a surviving descendant.
pub fn filter(root: &Directory, term: &str) -> Directory {
    let needle = term.to_lowercase();
    if needle.is_empty() {
        return root.clone();
    }
    filter_dir(root, &needle)
}

fn filter_dir(dir: &Directory, needle: &str) -> Directory {
    let mut kept = Directory::new();
    for (name, node) in dir.iter() {
        let matches = name.to_lowercase().contains(needle);
        match node {
            Node::Leaf => {
                if matches {
                    kept.insert(name, Node::Leaf);
                }
            }
            Node::Directory(child) => {
                if matches {
                    kept.insert(name, Node::Directory(child.clone()));
                    continue;
                }
                let survivors = filter_dir(child, needle);
                if !survivors.is_empty() {
                    kept.insert(name, Node::Directory(survivors));
                }
            }
        }
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(dir: &Directory) -> Vec<&str> {
        dir.iter()
            .map(|(name, _)| name)
            .collect()
    }

    #[test]
    fn builds_nested_directories() {
        let root = build(vec![Entry::file("a/b.txt"), Entry::file("a/c/d.txt")]);

        assert_eq!(names(&root), vec!["a"]);
        let a = root.subdirectory(&["a"]).unwrap();
        assert_eq!(names(a), vec!["b.txt", "c"]);
        assert_eq!(a.get("b.txt"), Some(&Node::Leaf));
        let c = root.subdirectory(&["a", "c"]).unwrap();
        assert_eq!(c.get("d.txt"), Some(&Node::Leaf));
    }

    #[test]
    fn renders_outline() {
        let root = build(vec![Entry::file("a/b.txt"), Entry::file("a/c/d.txt")]);
        let expected = "├── a\n│   ├── b.txt\n│   ├── c\n│   │   ├── d.txt\n";
        assert_eq!(render(&root, &RenderStyle::default()), expected);
    }

    #[test]
    fn every_ancestor_exists() {
        let entries = vec![
            Entry::file("deep/er/still/file.rs"),
            Entry::file("other/x.md"),
            Entry::tree("lonely/dir")
        ];
        let root = build(entries.clone());

        for entry in &entries {
            let parts: Vec<&str> = entry.path.split('/').collect();
            for depth in 1..parts.len() {
                assert!(
                    root.subdirectory(&parts[..depth]).is_some(),
                    "missing ancestor {:?} of {}",
                    &parts[..depth],
                    entry.path
                );
            }
        }
    }

    #[test]
    fn empty_root_renders_empty_string() {
        assert_eq!(render(&build(Vec::new()), &RenderStyle::default()), "");
    }

    #[test]
    fn render_is_deterministic() {
        let entries = vec![
            Entry::file("z.txt"),
            Entry::tree("m"),
            Entry::file("m/n.txt"),
            Entry::file("a.txt")
        ];
        let style = RenderStyle::default();
        let first = render(&build(entries.clone()), &style);
        let second = render(&build(entries), &style);
        assert_eq!(first, second);
        assert_eq!(first, "├── z.txt\n├── m\n│   ├── n.txt\n├── a.txt\n");
    }

    #[test]
    fn later_entry_overwrites_leaf_with_directory() {
        let root = build(vec![Entry::file("x"), Entry::file("x/y")]);

        let x = root.get("x").unwrap();
        assert!(x.is_directory());
        assert_eq!(x.as_directory().unwrap().get("y"), Some(&Node::Leaf));
    }

    #[test]
    fn later_file_overwrites_directory() {
        let root = build(vec![Entry::file("x/y"), Entry::file("w"), Entry::file("x")]);

        assert_eq!(root.get("x"), Some(&Node::Leaf));
        assert_eq!(names(&root), vec!["x", "w"]);
    }

    #[test]
    fn tree_entry_keeps_existing_children() {
        let root = build(vec![Entry::file("src/main.rs"), Entry::tree("src")]);
        let src = root.subdirectory(&["src"]).unwrap();
        assert_eq!(names(src), vec!["main.rs"]);
    }

    #[test]
    fn skips_empty_segments() {
        let root = build(vec![Entry::file("/a//b.txt"), Entry::file(""), Entry::tree("/")]);
        assert_eq!(names(&root), vec!["a"]);
        assert_eq!(names(root.subdirectory(&["a"]).unwrap()), vec!["b.txt"]);
    }

    #[test]
    fn builds_wide_flat_directory() {
        let entries: Vec<Entry> = (0..100_000).map(|n| Entry::file(format!("data/f{:06}.csv", n))).collect();
        let root = build(entries);

        let data = root.subdirectory(&["data"]).unwrap();
        assert_eq!(data.len(), 100_000);
        assert_eq!(data.iter().nth(42).map(|(name, _)| name), Some("f000042.csv"));
    }

    #[test]
    fn custom_style() {
        let root = build(vec![Entry::file("a/b")]);
        let style = RenderStyle { indent_unit: "  ".to_string(), branch: "- ".to_string() };
        assert_eq!(render(&root, &style), "- a\n  - b\n");
    }

    #[test]
    fn filter_keeps_matching_leaf_only() {
        let root = build(vec![Entry::file("README.md"), Entry::file("src/main.ts")]);
        let filtered = filter(&root, "readme");

        assert_eq!(names(&filtered), vec!["README.md"]);
        assert!(filtered.get("src").is_none());
    }

    #[test]
    fn filter_keeps_ancestors_of_match() {
        let root = build(
            vec![Entry::file("docs/guide/Intro.md"), Entry::file("docs/guide/setup.md"), Entry::file("lib.rs")]
        );
        let filtered = filter(&root, "INTRO");

        assert_eq!(render(&filtered, &RenderStyle::default()), "├── docs\n│   ├── guide\n│   │   ├── Intro.md\n");
    }

    #[test]
    fn filter_keeps_subtree_of_matching_directory() {
        let root = build(
            vec![Entry::file("tests/unit/a.rs"), Entry::file("tests/b.rs"), Entry::file("src/c.rs")]
        );
        let filtered = filter(&root, "test");

        let tests = filtered.subdirectory(&["tests"]).unwrap();
        assert_eq!(names(tests), vec!["unit", "b.rs"]);
        assert!(filtered.get("src").is_none());
    }

    #[test]
    fn filter_drops_empty_directories_and_leaves_input_untouched() {
        let root = build(vec![Entry::tree("empty"), Entry::file("keep.txt")]);
        let before = root.clone();
        let filtered = filter(&root, "keep");

        assert_eq!(names(&filtered), vec!["keep.txt"]);
        assert_eq!(root, before);
    }

    #[test]
    fn empty_term_keeps_everything() {
        let root = build(vec![Entry::file("a/b"), Entry::tree("c")]);
        assert_eq!(filter(&root, ""), root);
    }
}
