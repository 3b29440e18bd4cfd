use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use recipe_convert::walk::RECIPE_METADATA_FILE;
use recipe_convert::{ConversionFailure, ConversionOutcome, ConvertedRecipe, RecipeConverter};

/// Converter scripted by recipe directory name. Never writes to disk.
#[allow(dead_code)]
#[derive(Default)]
pub struct FakeConverter {
    keywords: HashMap<String, Vec<String>>,
    pub calls: RefCell<Vec<(PathBuf, PathBuf)>>,
}

#[allow(dead_code)]
impl FakeConverter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn succeeds(mut self, recipe: &str, keywords: &[&str]) -> Self {
        self.keywords.insert(
            recipe.to_owned(),
            keywords.iter().map(|k| (*k).to_owned()).collect(),
        );
        self
    }
}

impl RecipeConverter for FakeConverter {
    fn convert(&self, source: &Path, destination: &Path) -> ConversionOutcome {
        self.calls
            .borrow_mut()
            .push((source.to_path_buf(), destination.to_path_buf()));
        let name = source
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();
        let keywords = self
            .keywords
            .get(&name)
            .cloned()
            .ok_or_else(|| ConversionFailure::new(format!("no script for {name}")))?;
        Ok(ConvertedRecipe {
            keywords,
            destination: destination.to_path_buf(),
        })
    }
}

/// Create a recipe directory with a metadata file declaring `keywords`.
pub fn write_recipe(root: &Path, relative: &str, keywords: &[&str]) -> anyhow::Result<PathBuf> {
    let dir = root.join(relative);
    fs::create_dir_all(&dir)?;
    let keywords = keywords
        .iter()
        .map(|k| format!("{k:?}"))
        .collect::<Vec<_>>()
        .join(", ");
    fs::write(
        dir.join(RECIPE_METADATA_FILE),
        format!("[recipe]\ntitle = \"{relative}\"\nkeywords = [{keywords}]\n"),
    )?;
    Ok(dir)
}
