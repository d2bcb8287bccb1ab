//! Content renderers, one per navigation level.

mod diff;
mod lists;

pub use diff::render_diff;
pub use lists::{render_file_list, render_stash_list};
