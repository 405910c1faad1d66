// crates/domain/src/language/table.rs
use std::{
    collections::{HashMap, HashSet},
    sync::LazyLock,
};

/// Ordered label → extensions table.
///
/// Order is significant: an extension listed under two labels resolves to
/// the first one. Current collisions:
/// - `.m`  → MATLAB (also listed under Objective-C)
/// - `.mm` → Objective-C (also listed under Objective-C++)
const LANGUAGE_EXTENSIONS: &[(&str, &[&str])] = &[
    // web
    ("JavaScript", &[".js", ".jsx", ".mjs", ".cjs"]),
    ("TypeScript", &[".ts", ".tsx"]),
    ("HTML", &[".html", ".htm", ".xhtml"]),
    ("CSS", &[".css", ".scss", ".sass", ".less", ".styl"]),
    ("Vue", &[".vue"]),
    ("Svelte", &[".svelte"]),
    // general purpose
    ("Python", &[".py", ".pyw", ".pyi"]),
    ("Java", &[".java"]),
    ("C", &[".c", ".h"]),
    ("C++", &[".cpp", ".cc", ".cxx", ".hpp", ".hxx", ".h++"]),
    ("C#", &[".cs"]),
    ("Go", &[".go"]),
    ("Rust", &[".rs"]),
    ("Swift", &[".swift"]),
    ("Kotlin", &[".kt", ".kts"]),
    ("Scala", &[".scala", ".sc"]),
    ("Ruby", &[".rb", ".rbw"]),
    ("PHP", &[".php", ".phtml", ".php3", ".php4", ".php5", ".phps"]),
    ("Perl", &[".pl", ".pm", ".t", ".pod"]),
    ("R", &[".r", ".R"]),
    ("MATLAB", &[".m"]),
    ("Lua", &[".lua"]),
    ("Dart", &[".dart"]),
    ("Elixir", &[".ex", ".exs"]),
    ("Erlang", &[".erl", ".hrl"]),
    ("Haskell", &[".hs", ".lhs"]),
    ("OCaml", &[".ml", ".mli"]),
    ("F#", &[".fs", ".fsi", ".fsx"]),
    ("Clojure", &[".clj", ".cljs", ".cljc"]),
    ("Nim", &[".nim", ".nims"]),
    ("Crystal", &[".cr"]),
    ("Zig", &[".zig"]),
    // shell
    ("Shell", &[".sh", ".bash", ".zsh", ".fish", ".ksh", ".csh"]),
    ("PowerShell", &[".ps1", ".psm1", ".psd1"]),
    ("Batch", &[".bat", ".cmd"]),
    // database
    ("SQL", &[".sql"]),
    ("PLpgSQL", &[".pgsql"]),
    // mobile
    ("Objective-C", &[".m", ".mm"]),
    ("Objective-C++", &[".mm"]),
    // lisp family
    ("Scheme", &[".scm", ".ss"]),
    ("Common Lisp", &[".lisp", ".lsp", ".l", ".cl"]),
    ("Racket", &[".rkt", ".rktl"]),
    // hardware / low level
    ("Assembly", &[".asm", ".s", ".S"]),
    ("Verilog", &[".v", ".vh"]),
    ("VHDL", &[".vhd", ".vhdl"]),
    // config and data
    ("JSON", &[".json"]),
    ("YAML", &[".yml", ".yaml"]),
    ("TOML", &[".toml"]),
    ("XML", &[".xml", ".xsd", ".xsl", ".xslt"]),
    ("Markdown", &[".md", ".markdown", ".mdown", ".mkd"]),
    ("Text", &[".txt"]),
    ("Dockerfile", &[".dockerfile"]),
    ("Makefile", &[".mk"]),
    // other
    ("TeX", &[".tex"]),
    ("LaTeX", &[".latex"]),
    ("GraphQL", &[".graphql", ".gql"]),
    ("Solidity", &[".sol"]),
    ("CMake", &[".cmake"]),
    ("Gradle", &[".gradle"]),
    ("Maven", &[".pom"]),
];

/// Binary, media, archive, lock and generated files. Compared case-folded
/// against the text from the last `.`, so the multi-dot and bare-name entries
/// (`.min.js`, `thumbs.db`) never match an extension.
const IGNORED_EXTENSIONS: &[&str] = &[
    ".exe", ".dll", ".so", ".dylib", ".a", ".lib", ".o", ".obj", //
    ".png", ".jpg", ".jpeg", ".gif", ".bmp", ".svg", ".ico", ".webp", //
    ".mp3", ".mp4", ".avi", ".mov", ".wmv", ".flv", ".webm", //
    ".pdf", ".doc", ".docx", ".xls", ".xlsx", ".ppt", ".pptx", //
    ".zip", ".tar", ".gz", ".rar", ".7z", ".bz2", //
    ".jar", ".war", ".ear", ".class", //
    ".pyc", ".pyo", ".pyd", //
    ".lock", ".tmp", ".temp", ".log", //
    ".git", ".gitignore", ".gitkeep", //
    ".min.js", ".min.css", //
    ".ds_store", "thumbs.db",
];

const IGNORED_DIRECTORIES: &[&str] = &[
    "node_modules", ".git", ".svn", ".hg", ".bzr", //
    "dist", "build", "out", "target", "bin", "obj", //
    ".next", ".nuxt", ".vscode", ".idea", //
    "__pycache__", ".pytest_cache", ".mypy_cache", //
    "vendor", "packages", "libs", //
    ".env", ".venv", "venv", "env", //
    "coverage", ".nyc_output",
];

static BUILTIN: LazyLock<LanguageTable> = LazyLock::new(LanguageTable::build);

/// Read-only lookup tables for file and directory classification.
///
/// Built once from the static lists above; there is no way to mutate a
/// table after construction.
#[derive(Debug)]
pub struct LanguageTable {
    by_extension: HashMap<String, &'static str>,
    ignored_extensions: HashSet<&'static str>,
    ignored_directories: HashSet<&'static str>,
}

impl LanguageTable {
    /// Process-wide built-in table.
    pub fn builtin() -> &'static Self {
        &BUILTIN
    }

    fn build() -> Self {
        let mut by_extension = HashMap::new();
        for (label, extensions) in LANGUAGE_EXTENSIONS {
            for ext in *extensions {
                // first registration wins
                by_extension.entry(ext.to_lowercase()).or_insert(*label);
            }
        }
        Self {
            by_extension,
            ignored_extensions: IGNORED_EXTENSIONS.iter().copied().collect(),
            ignored_directories: IGNORED_DIRECTORIES.iter().copied().collect(),
        }
    }

    /// Language label for `filename`, or `None` when the file must not be
    /// counted at all.
    pub fn classify(&self, filename: &str) -> Option<&'static str> {
        let lower = filename.to_lowercase();

        if lower.contains("dockerfile") {
            return Some("Dockerfile");
        }
        if lower == "makefile" || lower == "gnumakefile" {
            return Some("Makefile");
        }
        if lower == "cmakelists.txt" {
            return Some("CMake");
        }

        let extension = extension_of(&lower)?;
        if self.ignored_extensions.contains(extension) {
            return None;
        }
        self.by_extension.get(extension).copied()
    }

    pub fn is_ignored_directory(&self, name: &str) -> bool {
        self.ignored_directories.contains(name.to_lowercase().as_str())
    }

    /// A name without any `.` is looked up whole.
    pub fn is_ignored_file(&self, name: &str) -> bool {
        let lower = name.to_lowercase();
        let key = extension_of(&lower).unwrap_or(&lower);
        self.ignored_extensions.contains(key)
    }

    /// All labels of the extension table, sorted and de-duplicated.
    pub fn supported_languages(&self) -> Vec<&'static str> {
        let mut labels: Vec<&'static str> = LANGUAGE_EXTENSIONS.iter().map(|(label, _)| *label).collect();
        labels.sort_unstable();
        labels.dedup();
        labels
    }
}

/// Substring from the last `.` to the end, dot included.
fn extension_of(lower_name: &str) -> Option<&str> {
    lower_name.rfind('.').map(|idx| &lower_name[idx..])
}
