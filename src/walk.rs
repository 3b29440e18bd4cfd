use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use crate::error::PassError;

/// Marker file that turns a directory into a recipe.
pub const RECIPE_METADATA_FILE: &str = "recipe_metadata.toml";

const EXCLUDED_DIR_NAMES: &[&str] = &["build", ".gradle", ".idea", ".git"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeLocation {
    pub path: PathBuf,
    /// Path relative to the source root. Empty when the root itself is a recipe.
    pub relative: PathBuf,
}

pub fn is_recipe_dir(dir: &Path) -> bool {
    dir.join(RECIPE_METADATA_FILE).is_file()
}

pub(crate) fn is_excluded_dir_name(name: &OsStr) -> bool {
    let name = name.to_string_lossy();
    name.starts_with('.') || EXCLUDED_DIR_NAMES.contains(&name.as_ref())
}

fn is_walkable(entry: &DirEntry) -> bool {
    entry.depth() == 0 || !entry.file_type().is_dir() || !is_excluded_dir_name(entry.file_name())
}

/// Lazy pre-order walk over every recipe directory under a source root.
///
/// Children are visited in file-name order, so a recipe is always yielded
/// before any recipe nested inside it. The walk stops after the first
/// read error.
pub struct RecipeWalker {
    root: PathBuf,
    entries: walkdir::FilterEntry<walkdir::IntoIter, fn(&DirEntry) -> bool>,
    failed: bool,
}

impl RecipeWalker {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, PassError> {
        let root = root.into();
        if !root.is_dir() {
            return Err(PassError::not_found(root));
        }

        let entries = WalkDir::new(&root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(is_walkable as fn(&DirEntry) -> bool);

        Ok(Self {
            root,
            entries,
            failed: false,
        })
    }
}

impl Iterator for RecipeWalker {
    type Item = Result<RecipeLocation, PassError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        loop {
            let entry = match self.entries.next()? {
                Ok(entry) => entry,
                Err(err) => {
                    self.failed = true;
                    return Some(Err(PassError::traversal(&self.root, err)));
                }
            };
            if !entry.file_type().is_dir() || !is_recipe_dir(entry.path()) {
                continue;
            }

            let path = entry.into_path();
            let relative = path
                .strip_prefix(&self.root)
                .map(Path::to_path_buf)
                .unwrap_or_else(|_| path.clone());
            tracing::debug!(recipe = %relative.display(), "found recipe");
            return Some(Ok(RecipeLocation { path, relative }));
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn recipe(root: &Path, relative: &str) -> anyhow::Result<()> {
        let dir = root.join(relative);
        fs::create_dir_all(&dir)?;
        fs::write(dir.join(RECIPE_METADATA_FILE), "[recipe]\ntitle = \"t\"\n")?;
        Ok(())
    }

    fn walk(root: &Path) -> anyhow::Result<Vec<String>> {
        let mut found = Vec::new();
        for location in RecipeWalker::new(root)? {
            found.push(location?.relative.to_string_lossy().replace('\\', "/"));
        }
        Ok(found)
    }

    #[test]
    fn walks_recipes_pre_order_by_name() -> anyhow::Result<()> {
        let temp = tempfile::TempDir::new()?;
        recipe(temp.path(), "zeta")?;
        recipe(temp.path(), "alpha")?;
        recipe(temp.path(), "alpha/nested")?;
        recipe(temp.path(), "group/beta")?;
        fs::create_dir_all(temp.path().join("group/not-a-recipe/src"))?;

        assert_eq!(
            walk(temp.path())?,
            vec!["alpha", "alpha/nested", "group/beta", "zeta"]
        );
        Ok(())
    }

    #[test]
    fn skips_build_outputs_and_hidden_dirs() -> anyhow::Result<()> {
        let temp = tempfile::TempDir::new()?;
        recipe(temp.path(), "app")?;
        recipe(temp.path(), "app/build/generated")?;
        recipe(temp.path(), ".gradle/cached")?;
        recipe(temp.path(), ".hidden")?;

        assert_eq!(walk(temp.path())?, vec!["app"]);
        Ok(())
    }

    #[test]
    fn root_recipe_has_empty_relative_path() -> anyhow::Result<()> {
        let temp = tempfile::TempDir::new()?;
        recipe(temp.path(), "")?;

        let locations = RecipeWalker::new(temp.path())?.collect::<Result<Vec<_>, _>>()?;
        assert_eq!(locations.len(), 1);
        assert_eq!(locations[0].relative, PathBuf::new());
        Ok(())
    }

    #[test]
    fn missing_root_is_not_found() -> anyhow::Result<()> {
        let temp = tempfile::TempDir::new()?;
        let missing = temp.path().join("missing");

        let err = RecipeWalker::new(&missing).err();
        assert!(matches!(err, Some(PassError::NotFound { path }) if path == missing));
        Ok(())
    }
}
