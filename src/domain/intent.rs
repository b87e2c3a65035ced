//! Intent Construction Detection
//!
//! Finds `new Intent(...)` call sites in component source text and sorts them
//! into explicit (target class named), implicit (platform action constant)
//! or unrecognized shapes. This is a textual match, not a parse.

use regex::Regex;

use crate::error::{ArchError, Result};

/// Classification of one intent construction site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntentKind {
    /// `new Intent(this, Target.class)`; `receiver` is the simple class name.
    Explicit { receiver: String },
    /// `new Intent(Intent.ACTION_X)`, possibly with the qualified type.
    Implicit { action: String },
    /// Any other argument list.
    Unrecognized,
}

/// A detected constructor call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntentSite {
    pub kind: IntentKind,
    /// 1-based line of the `new` keyword
    pub line: usize,
    /// The call text as written, whitespace collapsed
    pub snippet: String,
}

/// Detector for one message type (e.g. `Intent` / `android.content.Intent`).
pub struct IntentClassifier {
    call: Regex,
    explicit: Regex,
    implicit: Regex,
}

impl IntentClassifier {
    pub fn new(message_type: &str, qualified_message_type: &str) -> Result<Self> {
        let types = format!(
            "(?:{}|{})",
            regex::escape(qualified_message_type),
            regex::escape(message_type)
        );
        let build = |pattern: String| {
            Regex::new(&pattern).map_err(|e| ArchError::Config {
                message: format!("bad intent pattern: {}", e),
            })
        };

        Ok(Self {
            call: build(format!(r"\bnew\s+{}\s*\(", types))?,
            explicit: build(
                r"^(?:this|[A-Za-z_][\w.]*\.this|getApplicationContext\(\)|[A-Za-z_]\w*)\s*,\s*([A-Za-z_][\w.]*)\.class$"
                    .to_string(),
            )?,
            implicit: build(format!(r"^{}\.([A-Z][A-Z0-9_]*)$", types))?,
        })
    }

    /// All construction sites in `source`, in textual order.
    pub fn scan(&self, source: &str) -> Vec<IntentSite> {
        let mut sites = Vec::new();
        let mut line = 1;
        let mut counted = 0;

        for m in self.call.find_iter(source) {
            line += source[counted..m.start()].matches('\n').count();
            counted = m.start();
            let (kind, end) = match balanced_args(&source[m.end()..]) {
                Some(args) => (self.classify_args(args), m.end() + args.len() + 1),
                None => (IntentKind::Unrecognized, source.len()),
            };
            let snippet = source[m.start()..end]
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ");

            sites.push(IntentSite { kind, line, snippet });
        }

        sites
    }

    /// Classify the text between the constructor's parentheses.
    pub fn classify_args(&self, args: &str) -> IntentKind {
        let args = args.trim();

        if let Some(caps) = self.explicit.captures(args) {
            let class_ref = &caps[1];
            let receiver = class_ref.rsplit('.').next().unwrap_or(class_ref);
            return IntentKind::Explicit {
                receiver: receiver.to_string(),
            };
        }

        if let Some(caps) = self.implicit.captures(args) {
            return IntentKind::Implicit {
                action: caps[1].to_string(),
            };
        }

        IntentKind::Unrecognized
    }
}

/// Text up to (not including) the `)` closing an already-open parenthesis.
fn balanced_args(rest: &str) -> Option<&str> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, ch) in rest.char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '(' => depth += 1,
            ')' if depth == 0 => return Some(&rest[..i]),
            ')' => depth -= 1,
            _ => {}
        }
    }
    None
}
