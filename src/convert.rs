use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use walkdir::WalkDir;

use crate::cli::ConvertArgs;
use crate::error::ConversionFailure;
use crate::formats::RecipeMetadata;
use crate::walk::{is_excluded_dir_name, is_recipe_dir};

const SUBSTITUTED_EXTENSIONS: &[&str] = &["kts", "gradle", "properties", "toml"];

const GRADLE_WRAPPER_PROPERTIES: &str = "gradle-wrapper.properties";
const DISTRIBUTION_URL_KEY: &str = "distributionUrl=";

pub type ConversionOutcome = Result<ConvertedRecipe, ConversionFailure>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertedRecipe {
    /// Ordered keyword set declared by the recipe.
    pub keywords: Vec<String>,
    pub destination: PathBuf,
}

/// Converts one recipe directory into its release representation.
pub trait RecipeConverter {
    fn convert(&self, source: &Path, destination: &Path) -> ConversionOutcome;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Mode {
    /// Copy the authoring files verbatim.
    Source,
    /// Fill in version and repository placeholders.
    #[default]
    Release,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConverterConfig {
    pub mode: Mode,
    pub agp_version: Option<String>,
    pub gradle_version: Option<String>,
    pub gradle_path: Option<String>,
    pub repo_location: Option<String>,
    pub overwrite: bool,
}

impl ConverterConfig {
    fn placeholders(&self) -> [(&'static str, Option<&str>); 3] {
        [
            ("$AGP_VERSION", self.agp_version.as_deref()),
            ("$GRADLE_VERSION", self.gradle_version.as_deref()),
            ("$REPO_LOCATION", self.repo_location.as_deref()),
        ]
    }
}

/// Copies a recipe into the destination, rewriting build files for release.
#[derive(Debug, Clone)]
pub struct FsRecipeConverter {
    config: ConverterConfig,
}

impl FsRecipeConverter {
    pub fn new(config: ConverterConfig) -> Self {
        Self { config }
    }

    fn try_convert(&self, source: &Path, destination: &Path) -> anyhow::Result<ConvertedRecipe> {
        let metadata = RecipeMetadata::read(source)?;

        if destination.exists() {
            if !self.config.overwrite {
                anyhow::bail!("destination already exists: {}", destination.display());
            }
            fs::remove_dir_all(destination)
                .with_context(|| format!("remove destination: {}", destination.display()))?;
        }

        let files = self.copy_recipe(source, destination)?;
        tracing::debug!(
            source = %source.display(),
            destination = %destination.display(),
            files,
            mode = ?self.config.mode,
            "copied recipe"
        );

        Ok(ConvertedRecipe {
            keywords: metadata.keywords(),
            destination: destination.to_path_buf(),
        })
    }

    fn copy_recipe(&self, source: &Path, destination: &Path) -> anyhow::Result<usize> {
        // Nested recipes are converted on their own.
        let entries = WalkDir::new(source)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                entry.depth() == 0
                    || !entry.file_type().is_dir()
                    || !(is_excluded_dir_name(entry.file_name()) || is_recipe_dir(entry.path()))
            });

        let mut files = 0_usize;
        for entry in entries {
            let entry = entry.with_context(|| format!("walk recipe: {}", source.display()))?;
            let relative = entry
                .path()
                .strip_prefix(source)
                .with_context(|| format!("relativize: {}", entry.path().display()))?;
            let target = destination.join(relative);

            if entry.file_type().is_dir() {
                fs::create_dir_all(&target)
                    .with_context(|| format!("create dir: {}", target.display()))?;
            } else if entry.file_type().is_file() {
                self.copy_file(entry.path(), &target, relative)?;
                files += 1;
            }
        }

        Ok(files)
    }

    fn copy_file(&self, from: &Path, to: &Path, relative: &Path) -> anyhow::Result<()> {
        if self.config.mode == Mode::Source || !is_substituted(from) {
            fs::copy(from, to)
                .with_context(|| format!("copy {} -> {}", from.display(), to.display()))?;
            return Ok(());
        }

        let contents =
            fs::read_to_string(from).with_context(|| format!("read: {}", from.display()))?;
        // The wrapper URL is replaced before placeholders are checked.
        let is_wrapper =
            from.file_name().and_then(|name| name.to_str()) == Some(GRADLE_WRAPPER_PROPERTIES);
        let contents = match self.config.gradle_path.as_deref() {
            Some(gradle_path) if is_wrapper => rewrite_distribution_url(&contents, gradle_path),
            _ => contents,
        };
        let rewritten = self.substitute(&contents, relative)?;
        fs::write(to, rewritten).with_context(|| format!("write: {}", to.display()))?;
        Ok(())
    }

    fn substitute(&self, contents: &str, relative: &Path) -> anyhow::Result<String> {
        let mut out = contents.to_owned();
        for (placeholder, value) in self.config.placeholders() {
            if !out.contains(placeholder) {
                continue;
            }
            let Some(value) = value else {
                anyhow::bail!(
                    "{} uses {placeholder} but no value was configured",
                    relative.display()
                );
            };
            out = out.replace(placeholder, value);
        }
        Ok(out)
    }
}

impl RecipeConverter for FsRecipeConverter {
    fn convert(&self, source: &Path, destination: &Path) -> ConversionOutcome {
        self.try_convert(source, destination).map_err(ConversionFailure::from)
    }
}

/// Reads keywords without writing anything. Backs the index preview.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetadataConverter;

impl RecipeConverter for MetadataConverter {
    fn convert(&self, source: &Path, destination: &Path) -> ConversionOutcome {
        let metadata = RecipeMetadata::read(source)?;
        Ok(ConvertedRecipe {
            keywords: metadata.keywords(),
            destination: destination.to_path_buf(),
        })
    }
}

fn is_substituted(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SUBSTITUTED_EXTENSIONS.contains(&ext))
}

fn rewrite_distribution_url(contents: &str, gradle_path: &str) -> String {
    let mut out = String::with_capacity(contents.len());
    for line in contents.lines() {
        if line.trim_start().starts_with(DISTRIBUTION_URL_KEY) {
            out.push_str(DISTRIBUTION_URL_KEY);
            out.push_str(gradle_path);
        } else {
            out.push_str(line);
        }
        out.push('\n');
    }
    out
}

pub fn run(args: ConvertArgs) -> anyhow::Result<()> {
    let source = PathBuf::from(&args.source);
    let destination = PathBuf::from(&args.destination);
    if !is_recipe_dir(&source) {
        anyhow::bail!("not a recipe directory: {}", source.display());
    }

    let converter = FsRecipeConverter::new(args.converter.to_config(args.mode));
    tracing::info!(
        source = %source.display(),
        destination = %destination.display(),
        mode = ?args.mode,
        "convert recipe"
    );
    let converted = converter
        .convert(&source, &destination)
        .with_context(|| format!("convert recipe: {}", source.display()))?;

    println!("{}", converted.keywords.join(", "));
    Ok(())
}
