use serde::de::{ self, MapAccess, Visitor };
use serde::ser::SerializeMap;
use serde::{ Deserialize, Deserializer, Serialize, Serializer };
use std::collections::HashMap;
use std::fmt;

/// Whether a listed path is a file or a directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Tree,
}

impl From<&str> for EntryKind {
    /// Maps the hosting API's `type` field. Only `"tree"` is a directory;
    /// blobs and submodule commits are both shown as files.
    fn from(kind: &str) -> Self {
        match kind {
            "tree" => EntryKind::Tree,
            _ => EntryKind::File,
        }
    }
}

/// One record of the flat listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub path: String,
    pub kind: EntryKind,
}

impl Entry {
    pub fn file(path: impl Into<String>) -> Self {
        Entry { path: path.into(), kind: EntryKind::File }
    }

    pub fn tree(path: impl Into<String>) -> Self {
        Entry { path: path.into(), kind: EntryKind::Tree }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Directory(Directory),
    Leaf,
}

impl Node {
    pub fn as_directory(&self) -> Option<&Directory> {
        match self {
            Node::Directory(dir) => Some(dir),
            Node::Leaf => None,
        }
    }

    pub fn is_directory(&self) -> bool {
        matches!(self, Node::Directory(_))
    }
}

/// Insertion-ordered mapping from child name to node.
///
/// Replacing an existing key keeps its position; new keys are appended.
/// `index` maps each name to its slot in `children`.
#[derive(Debug, Clone, Default)]
pub struct Directory {
    children: Vec<(String, Node)>,
    index: HashMap<String, usize>,
}

impl PartialEq for Directory {
    fn eq(&self, other: &Self) -> bool {
        self.children == other.children
    }
}

impl Eq for Directory {}

impl Directory {
    pub fn new() -> Self {
        Directory { children: Vec::new(), index: HashMap::new() }
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn get(&self, name: &str) -> Option<&Node> {
        self.index.get(name).map(|&slot| &self.children[slot].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.children.iter().map(|(name, node)| (name.as_str(), node))
    }

    pub fn insert(&mut self, name: &str, node: Node) {
        match self.index.get(name) {
            Some(&slot) => {
                self.children[slot].1 = node;
            }
            None => {
                self.push(name, node);
            }
        }
    }

    fn push(&mut self, name: &str, node: Node) -> usize {
        let slot = self.children.len();
        self.children.push((name.to_string(), node));
        self.index.insert(name.to_string(), slot);
        slot
    }

    /// Returns the directory stored at `name`, creating it if absent and
    /// replacing a leaf if one is stored there.
    pub fn directory_mut(&mut self, name: &str) -> &mut Directory {
        let slot = match self.index.get(name) {
            Some(&slot) => {
                if !self.children[slot].1.is_directory() {
                    self.children[slot].1 = Node::Directory(Directory::new());
                }
                slot
            }
            None => self.push(name, Node::Directory(Directory::new())),
        };
        match &mut self.children[slot].1 {
            Node::Directory(dir) => dir,
            Node::Leaf => unreachable!("slot was just made a directory"),
        }
    }

    /// Follows `parts` down from this directory. Returns `None` as soon as a
    /// segment is missing or is a leaf.
    pub fn subdirectory<S: AsRef<str>>(&self, parts: &[S]) -> Option<&Directory> {
        let mut current = self;
        for part in parts {
            current = current.get(part.as_ref())?.as_directory()?;
        }
        Some(current)
    }
}

impl Serialize for Directory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.children.len()))?;
        for (name, node) in &self.children {
            map.serialize_entry(name, node)?;
        }
        map.end()
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Node::Directory(dir) => dir.serialize(serializer),
            Node::Leaf => serializer.serialize_unit(),
        }
    }
}

struct NodeVisitor;

impl<'de> Visitor<'de> for NodeVisitor {
    type Value = Node;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("null, a string, or a map of child nodes")
    }

    fn visit_unit<E: de::Error>(self) -> Result<Node, E> {
        Ok(Node::Leaf)
    }

    fn visit_none<E: de::Error>(self) -> Result<Node, E> {
        Ok(Node::Leaf)
    }

    // file contents are not kept
    fn visit_str<E: de::Error>(self, _value: &str) -> Result<Node, E> {
        Ok(Node::Leaf)
    }

    fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<Node, A::Error> {
        DirectoryVisitor.visit_map(map).map(Node::Directory)
    }
}

struct DirectoryVisitor;

impl<'de> Visitor<'de> for DirectoryVisitor {
    type Value = Directory;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map of child nodes")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Directory, A::Error> {
        let mut dir = Directory::new();
        while let Some((name, node)) = map.next_entry::<String, Node>()? {
            dir.insert(&name, node);
        }
        Ok(dir)
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(NodeVisitor)
    }
}

impl<'de> Deserialize<'de> for Directory {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(DirectoryVisitor)
    }
}

/// `GET /repos/{owner}/{repo}/git/trees/{ref}?recursive=1`
#[derive(Serialize, Deserialize, Debug)]
pub struct TreeResponse {
    #[serde(default)]
    pub sha: String,
    pub tree: Vec<TreeObject>,
    #[serde(default)]
    pub truncated: bool,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct TreeObject {
    pub path: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl From<TreeObject> for Entry {
    fn from(object: TreeObject) -> Self {
        let kind = EntryKind::from(object.kind.as_str());
        Entry { path: object.path, kind }
    }
}

/// `GET /repos/{owner}/{repo}`, only the fields we read.
#[derive(Deserialize, Debug)]
pub struct RepositoryInfo {
    pub default_branch: String,
}
