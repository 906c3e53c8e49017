use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::wire::{GeneratedFile, ModelFileSet};

/// Best-effort recovery of a file set from free-form model output.
///
/// Strategies are ranked and tried in order; the first that yields a usable
/// result wins. Extending the ladder means adding a variant and a line to
/// `LADDER`.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    /// The reply carried the JSON file-set contract; files taken verbatim.
    FileSet(Vec<GeneratedFile>),
    /// No JSON, but fenced code blocks were present (in order of appearance).
    CodeBlocks(Vec<String>),
    /// Nothing usable; scaffold from defaults.
    Empty,
}

#[derive(Debug, Clone, Copy)]
pub enum Strategy {
    JsonFileSet,
    CodeBlocks,
    Fallback,
}

pub const LADDER: &[Strategy] = &[Strategy::JsonFileSet, Strategy::CodeBlocks, Strategy::Fallback];

impl Strategy {
    fn attempt(&self, reply: &str) -> Option<Extraction> {
        match self {
            Strategy::JsonFileSet => json_file_set(reply).map(Extraction::FileSet),
            Strategy::CodeBlocks => {
                let blocks = code_blocks(reply);
                if blocks.is_empty() {
                    None
                } else {
                    Some(Extraction::CodeBlocks(blocks))
                }
            }
            Strategy::Fallback => Some(Extraction::Empty),
        }
    }
}

/// Run the ladder over a raw reply. Never fails: the terminal strategy
/// always matches.
pub fn run_ladder(reply: &str) -> Extraction {
    for strategy in LADDER {
        if let Some(extraction) = strategy.attempt(reply) {
            debug!(strategy = ?strategy, "extraction strategy matched");
            return extraction;
        }
    }
    Extraction::Empty
}

/// Find the first balanced JSON object containing a "files" key and parse
/// it against the file-set contract. An object that parses but carries an
/// empty `files` array is treated as a miss so the ladder can keep going.
fn json_file_set(reply: &str) -> Option<Vec<GeneratedFile>> {
    if !reply.contains("\"files\"") {
        return None;
    }

    let mut search = 0usize;
    while search < reply.len() {
        let Some(rel) = reply[search..].find('{') else {
            return None;
        };
        let start = search + rel;
        if let Some(obj) = balanced_object(&reply[start..]) {
            if obj.contains("\"files\"") {
                if let Ok(parsed) = serde_json::from_str::<ModelFileSet>(obj) {
                    if !parsed.files.is_empty() {
                        debug!(
                            description = ?parsed.description,
                            setup = ?parsed.setup_instructions,
                            "model file-set parsed"
                        );
                        return Some(parsed.files);
                    }
                }
            }
        }
        search = start + 1;
    }
    None
}

/// Extract the first balanced `{...}` region, honoring JSON string
/// literals so braces inside `content` fields don't skew the depth count.
fn balanced_object(s: &str) -> Option<&str> {
    let bytes = s.as_bytes();
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                if depth == 0 {
                    return None;
                }
                depth -= 1;
                if depth == 0 {
                    return Some(&s[..=i]);
                }
            }
            _ => {}
        }
    }
    None
}

static FENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    // Any language tag (or none) counts; only the inner text matters.
    Regex::new(r"(?s)```[^\n]*\n(.+?)\n```").expect("fence regex is valid")
});

/// Collect the inner text of every fenced code block, in order.
fn code_blocks(reply: &str) -> Vec<String> {
    FENCE_RE
        .captures_iter(reply)
        .map(|c| c[1].to_string())
        .collect()
}
