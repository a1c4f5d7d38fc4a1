//! Line-set symmetric difference, for comparing two serialized outputs.

use std::collections::{BTreeSet, HashSet};
use std::path::Path;

use crate::error::{SkosError, SkosResult};

/// Lines present in exactly one of the two texts, sorted.
pub fn unique_lines(first: &str, second: &str) -> BTreeSet<String> {
    let a: HashSet<&str> = first.lines().collect();
    let b: HashSet<&str> = second.lines().collect();
    a.symmetric_difference(&b).map(|l| l.to_string()).collect()
}

/// Write the lines unique to either file to `output`, one per line.
/// Returns the number of lines written.
pub fn write_unique_lines(first: &Path, second: &Path, output: &Path) -> SkosResult<usize> {
    let read = |path: &Path| std::fs::read_to_string(path).map_err(|e| SkosError::io(path, e));
    let lines = unique_lines(&read(first)?, &read(second)?);

    let mut text = String::new();
    for line in &lines {
        text.push_str(line);
        text.push('\n');
    }
    std::fs::write(output, text).map_err(|e| SkosError::io(output, e))?;

    tracing::info!(
        first = %first.display(),
        second = %second.display(),
        output = %output.display(),
        lines = lines.len(),
        "unique lines written"
    );
    Ok(lines.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symmetric_difference_of_lines() {
        let a = "one\ntwo\nthree\n";
        let b = "two\nfour\r\nthree";
        let diff = unique_lines(a, b);
        assert_eq!(
            diff.into_iter().collect::<Vec<_>>(),
            vec!["four".to_string(), "one".to_string()]
        );
    }

    #[test]
    fn duplicate_lines_collapse() {
        let diff = unique_lines("x\nx\nx\n", "");
        assert_eq!(diff.len(), 1);
    }

    #[test]
    fn identical_files_give_empty_output() {
        let dir = tempfile::TempDir::new().unwrap();
        let a = dir.path().join("a.rdf");
        let b = dir.path().join("b.rdf");
        let out = dir.path().join("diff.txt");
        std::fs::write(&a, "<x/>\n<y/>\n").unwrap();
        std::fs::write(&b, "<y/>\n<x/>\n").unwrap();

        assert_eq!(write_unique_lines(&a, &b, &out).unwrap(), 0);
        assert_eq!(std::fs::read_to_string(&out).unwrap(), "");
    }

    #[test]
    fn writes_one_line_per_difference() {
        let dir = tempfile::TempDir::new().unwrap();
        let a = dir.path().join("a.txt");
        let b = dir.path().join("b.txt");
        let out = dir.path().join("diff.txt");
        std::fs::write(&a, "keep\nleft\n").unwrap();
        std::fs::write(&b, "keep\nright\n").unwrap();

        assert_eq!(write_unique_lines(&a, &b, &out).unwrap(), 2);
        assert_eq!(std::fs::read_to_string(&out).unwrap(), "left\nright\n");
    }

    #[test]
    fn missing_input_is_io_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let out = dir.path().join("diff.txt");
        let err = write_unique_lines(&dir.path().join("nope"), &dir.path().join("nope2"), &out)
            .unwrap_err();
        assert!(matches!(err, SkosError::Io { .. }));
        assert!(!out.exists());
    }
}
