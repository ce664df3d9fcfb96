//! Generates a tree diagram from an existing directory.
//!
//! The output uses the same connectors and four-column levels the parser
//! understands, so a rendered tree can be fed straight back into a build.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// A utility struct for rendering directories as tree text.
///
/// This struct is stateless and provides methods as associated functions.
pub struct TreeGenerator;

impl TreeGenerator {
    /// Renders `root` and everything below it.
    ///
    /// The first line is the root's own name with a trailing `/`. Within each
    /// directory, subdirectories come before files and names are sorted.
    /// Symbolic links are listed but not followed.
    pub fn render_directory(root: &Path) -> Result<String, walkdir::Error> {
        let mut tree_map: HashMap<PathBuf, Vec<TreeNode>> = HashMap::new();

        for entry in WalkDir::new(root).min_depth(1).follow_links(false) {
            let entry = entry?;
            let Some(parent) = entry.path().parent() else {
                continue;
            };
            tree_map
                .entry(parent.to_path_buf())
                .or_default()
                .push(TreeNode {
                    path: entry.path().to_path_buf(),
                    name: entry.file_name().to_string_lossy().to_string(),
                    is_directory: entry.file_type().is_dir(),
                });
        }

        let root_name = root
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| root.display().to_string());

        let mut result = format!("{}/\n", root_name.trim_end_matches('/'));
        Self::render_children(&tree_map, root, &mut result, "");
        Ok(result)
    }

    /// Renders the children of `dir` with the given line prefix.
    fn render_children(
        tree_map: &HashMap<PathBuf, Vec<TreeNode>>,
        dir: &Path,
        result: &mut String,
        prefix: &str,
    ) {
        let Some(children) = tree_map.get(dir) else {
            return;
        };

        let mut sorted_children: Vec<&TreeNode> = children.iter().collect();
        sorted_children.sort_by(|a, b| {
            // Directories first, then files
            b.is_directory
                .cmp(&a.is_directory)
                .then_with(|| a.name.cmp(&b.name))
        });

        for (i, node) in sorted_children.iter().enumerate() {
            let is_last = i == sorted_children.len() - 1;
            let connector = if is_last { "└── " } else { "├── " };
            let marker = if node.is_directory { "/" } else { "" };

            result.push_str(&format!("{prefix}{connector}{}{marker}\n", node.name));

            if node.is_directory {
                let new_prefix = if is_last {
                    format!("{prefix}    ")
                } else {
                    format!("{prefix}│   ")
                };
                Self::render_children(tree_map, &node.path, result, &new_prefix);
            }
        }
    }
}

/// A transient node used for building the tree text.
#[derive(Debug, Clone)]
struct TreeNode {
    path: PathBuf,
    name: String,
    is_directory: bool,
}
