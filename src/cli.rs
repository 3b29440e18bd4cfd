use clap::{Args, Parser, Subcommand};

use crate::convert::{ConverterConfig, Mode};

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Convert every recipe under a source tree and write the recipes index.
    ConvertAll(ConvertAllArgs),
    /// Convert a single recipe.
    Convert(ConvertArgs),
    /// Print the recipes index for a source tree without converting anything.
    Index(IndexArgs),
}

#[derive(Debug, Args)]
pub struct ConvertAllArgs {
    /// Root of the recipe source tree.
    #[arg(long)]
    pub source: String,

    /// Output directory for released recipes and `README.md`.
    #[arg(long)]
    pub destination: String,

    /// Print the pass summary as JSON on stdout.
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub converter: ConverterArgs,
}

#[derive(Debug, Args)]
pub struct ConvertArgs {
    /// Recipe directory (must contain `recipe_metadata.toml`).
    #[arg(long)]
    pub source: String,

    /// Output directory for the converted recipe.
    #[arg(long)]
    pub destination: String,

    #[arg(long, value_enum, default_value_t = Mode::Release)]
    pub mode: Mode,

    #[command(flatten)]
    pub converter: ConverterArgs,
}

#[derive(Debug, Args)]
pub struct IndexArgs {
    /// Root of the recipe source tree.
    #[arg(long)]
    pub source: String,
}

/// Settings passed through to the recipe converter.
#[derive(Debug, Clone, Default, Args)]
pub struct ConverterArgs {
    /// Value for `$AGP_VERSION` in build files.
    #[arg(long)]
    pub agp_version: Option<String>,

    /// Value for `$GRADLE_VERSION` in build files.
    #[arg(long)]
    pub gradle_version: Option<String>,

    /// Gradle distribution written to `gradle-wrapper.properties`.
    #[arg(long)]
    pub gradle_path: Option<String>,

    /// Value for `$REPO_LOCATION` in build files.
    #[arg(long)]
    pub repo_location: Option<String>,

    /// Replace existing recipe output directories.
    #[arg(long)]
    pub overwrite: bool,
}

impl ConverterArgs {
    pub fn to_config(&self, mode: Mode) -> ConverterConfig {
        ConverterConfig {
            mode,
            agp_version: self.agp_version.clone(),
            gradle_version: self.gradle_version.clone(),
            gradle_path: self.gradle_path.clone(),
            repo_location: self.repo_location.clone(),
            overwrite: self.overwrite,
        }
    }
}
