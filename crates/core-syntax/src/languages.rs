//! Built-in language table and filename matching.

use std::path::Path;
use std::sync::Arc;

use bitflags::bitflags;
use core_text::Highlight;
use tracing::debug;

bitflags! {
    /// Token classes a language opts into.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct SyntaxFlags: u8 {
        const NUMBERS = 1 << 0;
        const STRINGS = 1 << 1;
    }
}

/// Static description of one language.
#[derive(Debug)]
pub struct SyntaxDefinition {
    pub name: &'static str,
    /// Extensions (with leading dot) or plain substrings matched against the
    /// file name.
    pub file_match: &'static [&'static str],
    pub keywords: &'static [&'static str],
    /// Second keyword class, tagged as types.
    pub types: &'static [&'static str],
    pub single_line_comment: Option<&'static str>,
    pub multi_line_comment: Option<(&'static str, &'static str)>,
    pub flags: SyntaxFlags,
}

impl SyntaxDefinition {
    /// Whether `file_name` selects this language. Entries starting with `.`
    /// must equal the extension; others may appear anywhere in the name.
    pub fn matches(&self, file_name: &str) -> bool {
        let ext = file_name.rfind('.').map(|i| &file_name[i..]);
        self.file_match.iter().any(|pat| {
            if pat.starts_with('.') {
                ext == Some(*pat)
            } else {
                file_name.contains(pat)
            }
        })
    }
}

pub static SYNTAX_DB: &[SyntaxDefinition] = &[
    SyntaxDefinition {
        name: "c",
        file_match: &[".c", ".h", ".cpp", ".hpp", ".cc"],
        keywords: &[
            "switch", "if", "while", "for", "break", "continue", "return", "else", "struct",
            "union", "typedef", "static", "enum", "class", "case", "default", "do", "goto",
            "sizeof", "const", "volatile", "extern", "namespace", "template", "public",
            "private", "protected", "new", "delete", "#include", "#define", "#ifdef", "#ifndef",
            "#endif",
        ],
        types: &[
            "int", "long", "double", "float", "char", "unsigned", "signed", "void", "short",
            "bool", "size_t", "auto",
        ],
        single_line_comment: Some("//"),
        multi_line_comment: Some(("/*", "*/")),
        flags: SyntaxFlags::NUMBERS.union(SyntaxFlags::STRINGS),
    },
    SyntaxDefinition {
        name: "rust",
        file_match: &[".rs"],
        keywords: &[
            "as", "break", "const", "continue", "crate", "else", "enum", "extern", "fn", "for",
            "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut", "pub", "ref",
            "return", "self", "Self", "static", "struct", "super", "trait", "type", "unsafe",
            "use", "where", "while", "async", "await", "dyn",
        ],
        types: &[
            "i8", "i16", "i32", "i64", "i128", "isize", "u8", "u16", "u32", "u64", "u128",
            "usize", "f32", "f64", "bool", "char", "str", "String", "Vec", "Option", "Result",
            "Box", "true", "false",
        ],
        single_line_comment: Some("//"),
        multi_line_comment: Some(("/*", "*/")),
        flags: SyntaxFlags::NUMBERS.union(SyntaxFlags::STRINGS),
    },
    SyntaxDefinition {
        name: "python",
        file_match: &[".py"],
        keywords: &[
            "and", "as", "assert", "break", "class", "continue", "def", "del", "elif", "else",
            "except", "finally", "for", "from", "global", "if", "import", "in", "is", "lambda",
            "nonlocal", "not", "or", "pass", "raise", "return", "try", "while", "with", "yield",
        ],
        types: &[
            "int", "float", "str", "bool", "list", "dict", "tuple", "set", "bytes", "None",
            "True", "False", "self",
        ],
        single_line_comment: Some("#"),
        multi_line_comment: Some(("\"\"\"", "\"\"\"")),
        flags: SyntaxFlags::NUMBERS.union(SyntaxFlags::STRINGS),
    },
    SyntaxDefinition {
        name: "sh",
        file_match: &[".sh", ".bash"],
        keywords: &[
            "if", "then", "else", "elif", "fi", "for", "while", "until", "do", "done", "case",
            "esac", "in", "function", "return", "exit", "local", "export",
        ],
        types: &["echo", "cd", "test", "read", "set", "unset", "source", "shift"],
        single_line_comment: Some("#"),
        multi_line_comment: None,
        flags: SyntaxFlags::NUMBERS.union(SyntaxFlags::STRINGS),
    },
    SyntaxDefinition {
        name: "toml",
        file_match: &[".toml"],
        keywords: &["true", "false"],
        types: &[],
        single_line_comment: Some("#"),
        multi_line_comment: None,
        flags: SyntaxFlags::NUMBERS.union(SyntaxFlags::STRINGS),
    },
];

impl Highlight for SyntaxDefinition {
    fn name(&self) -> &str {
        self.name
    }

    fn highlight(&self, render: &str, prev_open_comment: bool) -> core_text::HighlightResult {
        crate::scan::highlight_line(self, render, prev_open_comment)
    }
}

/// Pick the language for `path` by its file name; `None` for plain text.
pub fn find_syntax(path: &Path) -> Option<Arc<dyn Highlight>> {
    let file_name = path.file_name()?.to_str()?;
    let def = SYNTAX_DB.iter().find(|def| def.matches(file_name))?;
    debug!(target: "syntax", file = file_name, syntax = def.name, "syntax_selected");
    Some(Arc::new(StaticSyntax(def)))
}

/// Shared handle to a static table entry.
struct StaticSyntax(&'static SyntaxDefinition);

impl Highlight for StaticSyntax {
    fn name(&self) -> &str {
        self.0.name
    }

    fn highlight(&self, render: &str, prev_open_comment: bool) -> core_text::HighlightResult {
        self.0.highlight(render, prev_open_comment)
    }
}
