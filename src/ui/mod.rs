/// UI building blocks
///
/// This module holds the widget construction that is more involved than a
/// one-liner:
/// - `grid.rs` - row chunking and the image grid itself

pub mod grid;
