//! Default output paths derived from the input path.
//!
//! The derived name keeps the input's directory and extension, even though the
//! output is always RDF/XML.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// `dir/name.ext` → `dir/name<suffix>.ext`.
fn with_stem_suffix(input: &Path, suffix: &str) -> PathBuf {
    let mut name: OsString = input.file_stem().map(OsString::from).unwrap_or_default();
    name.push(suffix);
    if let Some(ext) = input.extension() {
        name.push(".");
        name.push(ext);
    }
    input.with_file_name(name)
}

/// `thesaurus.rdf` → `thesaurus_reduced.rdf`.
pub fn hierarchy_output(input: &Path) -> PathBuf {
    with_stem_suffix(input, "_reduced")
}

/// `thesaurus.rdf` + `[en, fr]` → `thesaurus_en_fr.rdf`, or
/// `thesaurus_en_fr_only.rdf` when other-language literals are stripped.
///
/// Languages appear in the order they were requested.
pub fn language_output<S: AsRef<str>>(
    input: &Path,
    languages: &[S],
    keep_other_languages: bool,
) -> PathBuf {
    let mut suffix = String::new();
    for lang in languages {
        suffix.push('_');
        suffix.push_str(lang.as_ref());
    }
    if !keep_other_languages {
        suffix.push_str("_only");
    }
    with_stem_suffix(input, &suffix)
}
