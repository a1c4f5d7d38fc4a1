//! Rich diagnostic error types for skos-prune.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]` derives,
//! providing error codes and help text so a failed run says what went wrong
//! and how to fix it.

use miette::Diagnostic;
use thiserror::Error;

/// Top-level error type for skos-prune.
///
/// Each variant wraps a subsystem-specific error, preserving the full diagnostic
/// chain through to the terminal.
#[derive(Debug, Error, Diagnostic)]
pub enum SkosError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Rdf(#[from] RdfError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error("I/O error on {path}: {source}")]
    #[diagnostic(
        code(skos::io),
        help(
            "A filesystem operation failed. Check that the path exists \
             and is accessible."
        )
    )]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

// ---------------------------------------------------------------------------
// RDF errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum RdfError {
    #[error("unsupported RDF format: \"{format}\"")]
    #[diagnostic(
        code(skos::rdf::unsupported_format),
        help(
            "Only RDF/XML and Turtle are supported. Use one of: \
             xml, rdf, rdfxml, ttl, turtle."
        )
    )]
    UnsupportedFormat { format: String },

    #[error("failed to parse {path} as {format}: {message}")]
    #[diagnostic(
        code(skos::rdf::parse),
        help(
            "The input is not valid for the selected serialization. \
             Check that --format matches the file contents. If the document \
             uses relative IRIs, supply --base-iri."
        )
    )]
    Parse {
        path: String,
        format: String,
        message: String,
    },

    #[error("failed to serialize graph as RDF/XML: {message}")]
    #[diagnostic(
        code(skos::rdf::serialize),
        help(
            "RDF/XML can only express predicates whose IRI ends in a valid XML \
             local name. Inspect the offending predicate in the input graph."
        )
    )]
    Serialize { message: String },

    #[error("invalid IRI <{iri}>: {message}")]
    #[diagnostic(
        code(skos::rdf::invalid_iri),
        help("Pass a full absolute IRI, e.g. http://example.org/concept/1.")
    )]
    InvalidIri { iri: String, message: String },

    #[error("invalid literal \"{value}\": {message}")]
    #[diagnostic(
        code(skos::rdf::invalid_literal),
        help("Language tags must be well-formed BCP 47 tags such as `en` or `pt-br`.")
    )]
    InvalidLiteral { value: String, message: String },
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    #[diagnostic(
        code(skos::config::read),
        help("Check that the file given to --config exists and is readable.")
    )]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {message}")]
    #[diagnostic(
        code(skos::config::parse),
        help(
            "The config file must be TOML. Known keys: format, base_iri, \
             [hierarchy] schemes, [language] keep_other_languages."
        )
    )]
    Parse { path: String, message: String },
}

/// Convenience alias for functions returning skos-prune results.
pub type SkosResult<T> = std::result::Result<T, SkosError>;

impl SkosError {
    /// Wrap an I/O error with the path it occurred on.
    pub fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rdf_error_converts_to_skos_error() {
        let err = RdfError::UnsupportedFormat {
            format: "json-ld".into(),
        };
        let top: SkosError = err.into();
        assert!(matches!(
            top,
            SkosError::Rdf(RdfError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn config_error_converts_to_skos_error() {
        let err = ConfigError::Parse {
            path: "filters.toml".into(),
            message: "expected table".into(),
        };
        let top: SkosError = err.into();
        assert!(matches!(top, SkosError::Config(ConfigError::Parse { .. })));
    }

    #[test]
    fn error_display_messages_are_descriptive() {
        let err = RdfError::Parse {
            path: "thesaurus.rdf".into(),
            format: "RDF/XML".into(),
            message: "unexpected end of file".into(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("thesaurus.rdf"));
        assert!(msg.contains("RDF/XML"));
        assert!(msg.contains("unexpected end of file"));
    }

    #[test]
    fn io_helper_records_path() {
        let err = SkosError::io(
            std::path::Path::new("/nowhere/in.ttl"),
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(format!("{err}").contains("/nowhere/in.ttl"));
    }
}
