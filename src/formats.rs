use std::collections::HashSet;
use std::path::Path;

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::walk::RECIPE_METADATA_FILE;

/// Contents of `recipe_metadata.toml`. Unknown tables are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeMetadata {
    pub recipe: RecipeSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeSection {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl RecipeMetadata {
    pub fn read(recipe_dir: &Path) -> anyhow::Result<Self> {
        let path = recipe_dir.join(RECIPE_METADATA_FILE);
        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("read recipe metadata: {}", path.display()))?;
        Self::parse(&contents).with_context(|| format!("parse recipe metadata: {}", path.display()))
    }

    pub fn parse(contents: &str) -> anyhow::Result<Self> {
        let metadata: Self = toml::from_str(contents).context("deserialize recipe metadata")?;
        if metadata.recipe.title.trim().is_empty() {
            anyhow::bail!("recipe title must not be empty");
        }
        Ok(metadata)
    }

    /// Declared keywords, trimmed, blanks dropped, first occurrence wins.
    pub fn keywords(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.recipe
            .keywords
            .iter()
            .map(|keyword| keyword.trim())
            .filter(|keyword| !keyword.is_empty())
            .filter(|keyword| seen.insert(*keyword))
            .map(str::to_owned)
            .collect()
    }
}
