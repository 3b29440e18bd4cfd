use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::Serialize;

use crate::cli::{ConvertAllArgs, IndexArgs};
use crate::convert::{FsRecipeConverter, MetadataConverter, Mode, RecipeConverter};
use crate::error::PassError;
use crate::index::{KeywordIndex, link_path};
use crate::walk::{RecipeLocation, RecipeWalker};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedRecipe {
    pub recipe: PathBuf,
    pub reason: String,
}

#[derive(Debug, Clone, Default)]
pub struct Aggregation {
    pub index: KeywordIndex,
    pub converted: Vec<PathBuf>,
    pub failed: Vec<FailedRecipe>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PassSummary {
    pub converted: usize,
    pub failed: Vec<FailedRecipe>,
    pub keywords: usize,
    pub index_path: PathBuf,
}

impl PassSummary {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Convert each location in order and collect keywords of the successful ones.
///
/// A conversion failure is recorded and skipped. Any `Err` from `locations`
/// aborts the aggregation and is returned as-is.
pub fn aggregate<I, C>(
    locations: I,
    destination_root: &Path,
    converter: &C,
) -> Result<Aggregation, PassError>
where
    I: IntoIterator<Item = Result<RecipeLocation, PassError>>,
    C: RecipeConverter + ?Sized,
{
    let mut aggregation = Aggregation::default();

    for location in locations {
        let location = location?;
        let destination = destination_root.join(&location.relative);

        match converter.convert(&location.path, &destination) {
            Ok(converted) => {
                tracing::info!(
                    recipe = %link_path(&location.relative),
                    keywords = converted.keywords.len(),
                    "converted recipe"
                );
                for keyword in &converted.keywords {
                    aggregation.index.record(keyword, &location.relative);
                }
                aggregation.converted.push(location.relative);
            }
            Err(failure) => {
                tracing::warn!(
                    recipe = %link_path(&location.relative),
                    reason = %failure,
                    "recipe conversion failed"
                );
                aggregation.failed.push(FailedRecipe {
                    recipe: location.relative,
                    reason: failure.reason,
                });
            }
        }
    }

    Ok(aggregation)
}

/// Recipes converted before a later fatal error stay on disk.
pub fn convert_all_recipes<C>(
    source_root: &Path,
    destination_root: &Path,
    converter: &C,
) -> Result<PassSummary, PassError>
where
    C: RecipeConverter + ?Sized,
{
    let walker = RecipeWalker::new(source_root)?;
    let aggregation = aggregate(walker, destination_root, converter)?;
    let index_path = aggregation.index.write_to(destination_root)?;

    Ok(PassSummary {
        converted: aggregation.converted.len(),
        failed: aggregation.failed,
        keywords: aggregation.index.len(),
        index_path,
    })
}

pub fn run(args: ConvertAllArgs) -> anyhow::Result<()> {
    let source_root = PathBuf::from(&args.source);
    let destination_root = PathBuf::from(&args.destination);
    let converter = FsRecipeConverter::new(args.converter.to_config(Mode::Release));

    tracing::info!(
        source = %source_root.display(),
        destination = %destination_root.display(),
        "convert all recipes"
    );
    let summary = convert_all_recipes(&source_root, &destination_root, &converter)
        .context("convert all recipes")?;

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&summary).context("serialize pass summary")?
        );
    } else {
        println!(
            "converted {} recipe(s), {} failed, {} keyword(s); index: {}",
            summary.converted,
            summary.failed.len(),
            summary.keywords,
            summary.index_path.display()
        );
    }

    if !summary.is_clean() {
        let failed = summary
            .failed
            .iter()
            .map(|failed| format!("{}: {}", link_path(&failed.recipe), failed.reason))
            .collect::<Vec<_>>()
            .join("; ");
        anyhow::bail!(
            "{} recipe(s) failed conversion: {failed}",
            summary.failed.len()
        );
    }

    Ok(())
}

pub fn preview(args: IndexArgs) -> anyhow::Result<()> {
    let source_root = PathBuf::from(&args.source);
    let walker = RecipeWalker::new(&source_root).context("walk recipes")?;
    let aggregation =
        aggregate(walker, Path::new(""), &MetadataConverter).context("read recipe keywords")?;

    for failed in &aggregation.failed {
        tracing::warn!(recipe = %link_path(&failed.recipe), "skipped: {}", failed.reason);
    }
    print!("{}", aggregation.index.render());
    Ok(())
}
