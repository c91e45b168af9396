//! Printers
//!
//! Both directions of translation end here: [`gibberish`] renders an AST as a
//! C or C++ declaration and [`english`] renders it as pseudo-English. Neither
//! printer checks anything; they assume the checker has accepted the AST.

pub mod english;
pub mod gibberish;

pub use english::EnglishPrinter;
pub use gibberish::GibberishPrinter;

/// Printed in place of a placeholder node.
pub const ELLIPSIS: &str = "…";
