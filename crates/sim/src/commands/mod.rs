mod list;
mod run;

pub use list::List;
pub use run::Run;

use std::path::PathBuf;

/// Content directory bundled with battle-content.
pub(crate) fn default_data_dir() -> PathBuf {
    PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/../battle/content/data"))
}
