use crate::vfs::VirtualFS;
use colored::Colorize;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt::Write;
use std::path::{Path, PathBuf};
use std::rc::Rc;

type NodeRef = Rc<RefCell<TreeNode>>;

/// A planned directory or file, with the entries planned inside it.
#[derive(Debug)]
struct TreeNode {
    name: String,
    children: Vec<NodeRef>,
    is_file: bool,
}
impl TreeNode {
    fn new(name: String, is_file: bool) -> NodeRef {
        Rc::new(RefCell::new(Self {
            name,
            children: Vec::new(),
            is_file,
        }))
    }
}

/// Links every planned entry under its parent. The returned node stands for `destination`.
fn build_tree(vfs: &VirtualFS, destination: &Path) -> NodeRef {
    let root_name = destination
        .file_name()
        .map(|os| os.to_string_lossy().to_string())
        .unwrap_or_else(|| destination.display().to_string());
    let root = TreeNode::new(root_name, false);

    // keyed by the path relative to the output location; "" is the output location itself
    let mut nodes: HashMap<PathBuf, NodeRef> = HashMap::new();
    nodes.insert(PathBuf::new(), Rc::clone(&root));

    for entry in &vfs.entries {
        if nodes.contains_key(&entry.destination) {
            continue;
        }

        let parent_path = entry.destination.parent().unwrap_or_else(|| Path::new(""));
        let Some(parent) = nodes.get(parent_path).map(Rc::clone) else {
            log::debug!(
                "no planned directory '{}' to hold '{}'",
                parent_path.display(),
                entry.destination.display()
            );
            continue;
        };

        let name = entry
            .destination
            .file_name()
            .map(|os| os.to_string_lossy().to_string())
            .unwrap_or_else(|| entry.destination.display().to_string());
        let node = TreeNode::new(name, entry.is_file);

        parent.borrow_mut().children.push(Rc::clone(&node));
        nodes.insert(entry.destination.clone(), node);
    }

    root
}

/// Appends `node` and its descendants to `out`, one line per entry, with box-drawing
/// connectors. Directories are blue and files green.
fn write_tree(out: &mut String, node: &NodeRef, prefix: &str, is_last: bool) {
    let node = node.borrow();

    let connector = if is_last { "└── " } else { "├── " };
    let name = if node.is_file {
        node.name.green()
    } else {
        node.name.blue()
    };
    let _ = writeln!(out, "{}{}{}", prefix.yellow(), connector.yellow(), name);

    let child_prefix = if is_last {
        format!("{prefix}    ")
    } else {
        format!("{prefix}│   ")
    };

    let count = node.children.len();
    for (i, child) in node.children.iter().enumerate() {
        write_tree(out, child, &child_prefix, i + 1 == count);
    }
}

/// Renders the planned entries as a tree rooted at `destination`.
pub fn render_tree(vfs: &VirtualFS, destination: &Path) -> String {
    let tree_root = build_tree(vfs, destination);

    let mut out = String::new();
    write_tree(&mut out, &tree_root, "", true);

    out
}

/// Prints the dry-run report: legend, tree and a note that the disk was left untouched.
pub fn preview_as_tree(vfs: &VirtualFS, destination: &Path) {
    println!(
        "Legend: {} = (directory), {} = (file)",
        "blue".blue(),
        "green".green()
    );

    println!(
        "{} {}\n",
        "┌─".bold().bright_blue(),
        "Planned entries".bold().bright_blue(),
    );

    print!("{}", render_tree(vfs, destination));

    println!(
        "\n{} {}\n",
        "└─".bold().bright_blue(),
        "Dry run, nothing was written".bright_green()
    );
}
