//! Separator presets
//!
//! A language is only a separator list handed to the one splitter type.
//! Lists run from the most structural boundary (class or section headers) down
//! to single characters, so the splitter always prefers the largest boundary
//! that still fits.

use crate::error::ChunkingError;
use std::str::FromStr;

/// Separators used when none are given: paragraphs, lines, words, characters
pub const DEFAULT_SEPARATORS: &[&str] = &["\n\n", "\n", " ", ""];

const MARKDOWN: &[&str] = &[
    "\n## ",
    "\n### ",
    "\n#### ",
    "\n##### ",
    "\n###### ",
    "```\n\n",
    "\n\n***\n\n",
    "\n\n---\n\n",
    "\n\n___\n\n",
    "\n\n",
    "\n",
    " ",
    "",
];

const PYTHON: &[&str] = &["\nclass ", "\ndef ", "\n\tdef ", "\n\n", "\n", " ", ""];

const RUST: &[&str] = &[
    "\nfn ", "\nconst ", "\nlet ", "\nif ", "\nwhile ", "\nfor ", "\nloop ", "\nmatch ", "\n\n",
    "\n", " ", "",
];

const JAVASCRIPT: &[&str] = &[
    "\nfunction ",
    "\nconst ",
    "\nlet ",
    "\nvar ",
    "\nclass ",
    "\nif ",
    "\nfor ",
    "\nwhile ",
    "\nswitch ",
    "\ncase ",
    "\ndefault ",
    "\n\n",
    "\n",
    " ",
    "",
];

const TYPESCRIPT: &[&str] = &[
    "\nenum ",
    "\ninterface ",
    "\nnamespace ",
    "\ntype ",
    "\nclass ",
    "\nfunction ",
    "\nconst ",
    "\nlet ",
    "\nvar ",
    "\nif ",
    "\nfor ",
    "\nwhile ",
    "\nswitch ",
    "\ncase ",
    "\ndefault ",
    "\n\n",
    "\n",
    " ",
    "",
];

const GO: &[&str] = &[
    "\nfunc ", "\nvar ", "\nconst ", "\ntype ", "\nif ", "\nfor ", "\nswitch ", "\ncase ", "\n\n",
    "\n", " ", "",
];

const JAVA: &[&str] = &[
    "\nclass ",
    "\npublic ",
    "\nprotected ",
    "\nprivate ",
    "\nstatic ",
    "\nif ",
    "\nfor ",
    "\nwhile ",
    "\nswitch ",
    "\ncase ",
    "\n\n",
    "\n",
    " ",
    "",
];

const CPP: &[&str] = &[
    "\nclass ", "\nvoid ", "\nint ", "\nfloat ", "\ndouble ", "\nif ", "\nfor ", "\nwhile ",
    "\nswitch ", "\ncase ", "\n\n", "\n", " ", "",
];

const HTML: &[&str] = &[
    "<body", "<div", "<p", "<br", "<li", "<h1", "<h2", "<h3", "<h4", "<h5", "<h6", "<span",
    "<table", "<tr", "<td", "<th", "<ul", "<ol", "<header", "<footer", "<nav", "<head",
    "<style", "<script", "<meta", "<title", " ", "",
];

const LATEX: &[&str] = &[
    "\n\\chapter{",
    "\n\\section{",
    "\n\\subsection{",
    "\n\\subsubsection{",
    "\n\\begin{enumerate}",
    "\n\\begin{itemize}",
    "\n\\begin{description}",
    "\n\\begin{list}",
    "\n\\begin{quote}",
    "\n\\begin{quotation}",
    "\n\\begin{verse}",
    "\n\\begin{verbatim}",
    "\n\\begin{align}",
    "$$",
    "$",
    "\n\n",
    "\n",
    " ",
    "",
];

/// Languages with a separator preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    PlainText,
    Markdown,
    Python,
    Rust,
    JavaScript,
    TypeScript,
    Go,
    Java,
    Cpp,
    Html,
    Latex,
}

impl Language {
    pub const ALL: [Self; 11] = [
        Self::PlainText,
        Self::Markdown,
        Self::Python,
        Self::Rust,
        Self::JavaScript,
        Self::TypeScript,
        Self::Go,
        Self::Java,
        Self::Cpp,
        Self::Html,
        Self::Latex,
    ];

    /// Identifier accepted by [`FromStr`]
    pub const fn id(self) -> &'static str {
        match self {
            Self::PlainText => "text",
            Self::Markdown => "markdown",
            Self::Python => "python",
            Self::Rust => "rust",
            Self::JavaScript => "javascript",
            Self::TypeScript => "typescript",
            Self::Go => "go",
            Self::Java => "java",
            Self::Cpp => "cpp",
            Self::Html => "html",
            Self::Latex => "latex",
        }
    }

    /// File extensions mapped to this language
    pub const fn extensions(self) -> &'static [&'static str] {
        match self {
            Self::PlainText => &["txt", "text"],
            Self::Markdown => &["md", "mdx", "markdown"],
            Self::Python => &["py", "pyi"],
            Self::Rust => &["rs"],
            Self::JavaScript => &["js", "mjs", "cjs", "jsx"],
            Self::TypeScript => &["ts", "mts", "cts", "tsx"],
            Self::Go => &["go"],
            Self::Java => &["java"],
            Self::Cpp => &["c", "h", "cpp", "cxx", "cc", "hpp", "hxx", "hh"],
            Self::Html => &["html", "htm"],
            Self::Latex => &["tex", "latex"],
        }
    }

    /// Separator list, highest priority first
    pub const fn separators(self) -> &'static [&'static str] {
        match self {
            Self::PlainText => DEFAULT_SEPARATORS,
            Self::Markdown => MARKDOWN,
            Self::Python => PYTHON,
            Self::Rust => RUST,
            Self::JavaScript => JAVASCRIPT,
            Self::TypeScript => TYPESCRIPT,
            Self::Go => GO,
            Self::Java => JAVA,
            Self::Cpp => CPP,
            Self::Html => HTML,
            Self::Latex => LATEX,
        }
    }

    /// Look up a language by file extension (without the dot, any case)
    pub fn from_extension(extension: &str) -> Option<Self> {
        let extension = extension.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|language| language.extensions().contains(&extension.as_str()))
    }
}

impl FromStr for Language {
    type Err = ChunkingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        let alias = match wanted.as_str() {
            "plain" | "plaintext" | "txt" => "text",
            "md" => "markdown",
            "js" => "javascript",
            "ts" => "typescript",
            "c" | "c++" => "cpp",
            "tex" => "latex",
            other => other,
        };
        Self::ALL
            .into_iter()
            .find(|language| language.id() == alias)
            .ok_or_else(|| ChunkingError::LanguageUnsupported(s.to_string()))
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_preset_ends_with_character_fallback() {
        for language in Language::ALL {
            assert_eq!(
                language.separators().last(),
                Some(&""),
                "{language} should fall back to characters"
            );
        }
    }

    #[test]
    fn test_extension_mapping() {
        assert_eq!(Language::from_extension("rs"), Some(Language::Rust));
        assert_eq!(Language::from_extension("MD"), Some(Language::Markdown));
        assert_eq!(Language::from_extension("tsx"), Some(Language::TypeScript));
        assert_eq!(Language::from_extension("xyz"), None);
    }

    #[test]
    fn test_extension_uniqueness() {
        let mut seen = std::collections::HashSet::new();
        for language in Language::ALL {
            for extension in language.extensions() {
                assert!(seen.insert(*extension), "Duplicate extension: {extension}");
            }
        }
    }

    #[test]
    fn test_parse_ids_and_aliases() {
        for language in Language::ALL {
            assert_eq!(language.id().parse::<Language>().ok(), Some(language));
        }
        assert_eq!("JS".parse::<Language>().ok(), Some(Language::JavaScript));
        assert!(matches!(
            "cobol".parse::<Language>(),
            Err(ChunkingError::LanguageUnsupported(_))
        ));
    }
}
