//! File and directory classification.
//!
//! Free functions here consult [`LanguageTable::builtin`]; code that wants
//! an injected table calls the methods on [`LanguageTable`] directly.

pub mod table;

pub use table::LanguageTable;

pub fn classify(filename: &str) -> Option<&'static str> {
    LanguageTable::builtin().classify(filename)
}

pub fn is_ignored_directory(name: &str) -> bool {
    LanguageTable::builtin().is_ignored_directory(name)
}

pub fn is_ignored_file(name: &str) -> bool {
    LanguageTable::builtin().is_ignored_file(name)
}
