#![forbid(unsafe_code)]

pub mod cli;
pub mod convert;
pub mod error;
pub mod formats;
pub mod index;
pub mod logging;
pub mod pass;
pub mod walk;

pub use convert::{ConversionOutcome, ConvertedRecipe, ConverterConfig, Mode, RecipeConverter};
pub use error::{ConversionFailure, PassError};
pub use index::{INDEX_FILE_NAME, KeywordIndex};
pub use pass::{PassSummary, convert_all_recipes};
pub use walk::{RecipeLocation, RecipeWalker};
