pub mod edits;
pub mod patch;
