//! Depth-indexed ancestry used to find the parent directory of each entry.

use std::path::{Path, PathBuf};

/// Maps each nesting depth to the directory that parents entries at that depth.
///
/// `stack[0]` is always the output root. Owned by a single run and never shared.
#[derive(Debug, Clone)]
pub struct PathStack {
    paths: Vec<PathBuf>,
}

/// Result of resolving a depth against the stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub parent: PathBuf,
    /// How many levels had to be synthesized because the entry jumped deeper
    /// than the known ancestry. Each one is reported as an indentation anomaly.
    pub synthesized_levels: usize,
}

impl PathStack {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            paths: vec![root.into()],
        }
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn root(&self) -> &Path {
        &self.paths[0]
    }

    pub fn get(&self, depth: usize) -> Option<&Path> {
        self.paths.get(depth).map(PathBuf::as_path)
    }

    /// Resolves the parent for an entry at `depth` and drops any deeper
    /// levels left over from earlier sibling subtrees.
    ///
    /// When `depth` is past the end of the stack, the last known directory is
    /// repeated until it fits, so the entry lands under the deepest known parent.
    pub fn resolve(&mut self, depth: usize) -> Resolution {
        let mut synthesized_levels = 0;
        while depth >= self.paths.len() {
            let last = self.paths[self.paths.len() - 1].clone();
            self.paths.push(last);
            synthesized_levels += 1;
        }

        self.paths.truncate(depth + 1);
        Resolution {
            parent: self.paths[depth].clone(),
            synthesized_levels,
        }
    }

    /// Makes `dir` the parent for entries one level below the last resolved depth.
    pub fn push_directory(&mut self, dir: PathBuf) {
        self.paths.push(dir);
    }
}
