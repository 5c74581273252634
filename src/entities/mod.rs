//! Immutable BOM value objects.
//!
//! A [`BomHeader`] is one version of one assembly's parts list; it owns an
//! ordered sequence of [`BomLine`]s. Both are validated at construction, so
//! an invalid header or line cannot exist.

pub mod bom_header;
pub mod bom_line;

pub use bom_header::BomHeader;
pub use bom_line::BomLine;
