//! Parsers for package metadata files

pub mod control;
pub mod paragraph;

pub use control::{read_control, ControlInfo, CONTROL_FILE};
pub use paragraph::{parse_paragraphs, Paragraph};
