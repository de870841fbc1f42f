pub mod collision;
pub mod door;
pub mod feature;
pub mod filter;
pub mod floors;
pub mod generate;

use std::path::Path;

pub(crate) const RULE: &str = "--------------------------------------------------";

pub(crate) fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
