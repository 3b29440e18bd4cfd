use std::collections::HashMap;
use std::fs::OpenOptions;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use crate::error::PassError;

pub const INDEX_FILE_NAME: &str = "README.md";

const INDEX_HEADING: &str = "# Recipes Index";
const LINK_DELIMITER: &str = ", ";

/// Keyword to recipe relative paths, in the order recipes were recorded.
///
/// Sorting happens only at render time. Paths are not deduplicated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordIndex {
    recipes_by_keyword: HashMap<String, Vec<PathBuf>>,
}

impl KeywordIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, keyword: &str, recipe: &Path) {
        self.recipes_by_keyword
            .entry(keyword.to_owned())
            .or_default()
            .push(recipe.to_path_buf());
    }

    /// Keywords in ascending lexicographic order.
    pub fn keywords(&self) -> Vec<&str> {
        let mut keywords = self
            .recipes_by_keyword
            .keys()
            .map(String::as_str)
            .collect::<Vec<_>>();
        keywords.sort_unstable();
        keywords
    }

    pub fn recipes(&self, keyword: &str) -> &[PathBuf] {
        self.recipes_by_keyword
            .get(keyword)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.recipes_by_keyword.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes_by_keyword.is_empty()
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(INDEX_HEADING);
        out.push('\n');

        for keyword in self.keywords() {
            out.push_str(&format!("* {keyword} - \n"));
            let links = self
                .recipes(keyword)
                .iter()
                .map(|recipe| {
                    let target = link_path(recipe);
                    format!("[{target}]({target})")
                })
                .collect::<Vec<_>>()
                .join(LINK_DELIMITER);
            out.push_str(&links);
            out.push('\n');
        }

        out
    }

    pub fn write_to(&self, destination_root: &Path) -> Result<PathBuf, PassError> {
        std::fs::create_dir_all(destination_root)
            .map_err(|err| PassError::persist(destination_root, err))?;

        let index_path = destination_root.join(INDEX_FILE_NAME);
        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&index_path)
            .map_err(|err| PassError::persist(&index_path, err))?;
        file.write_all(self.render().as_bytes())
            .map_err(|err| PassError::persist(&index_path, err))?;
        file.flush()
            .map_err(|err| PassError::persist(&index_path, err))?;

        tracing::info!(
            path = %index_path.display(),
            keywords = self.len(),
            "wrote recipes index"
        );
        Ok(index_path)
    }
}

/// Always `/`-separated. The source root itself renders as an empty link.
pub fn link_path(path: &Path) -> String {
    path.components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
