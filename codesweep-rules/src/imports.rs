//! Builtin import services for Rust sources.
//!
//! Both operations are deliberately line-oriented and conservative: a
//! `use` item is only removed when every name it binds is provably absent
//! from the rest of the file, and anything the scanner cannot fully
//! account for (globs, nested groups, multi-line items) is left alone.
//! Both operations are idempotent.

use std::collections::HashSet;

/// Remove single-line `use` items whose bound names never occur outside
/// the import block. `pub use` re-exports are never touched.
pub fn remove_unused_rust_imports(text: &str) -> String {
    let lines: Vec<&str> = text.split('\n').collect();

    let mut candidates: Vec<(usize, Vec<String>)> = Vec::new();
    for (i, line) in lines.iter().enumerate() {
        let trimmed = line.trim();
        if trimmed.starts_with("use ")
            && trimmed.ends_with(';')
            && let Some(names) = use_bound_names(trimmed)
            && !names.is_empty()
            && names.iter().all(|n| !n.is_empty())
        {
            candidates.push((i, names));
        }
    }
    if candidates.is_empty() {
        return text.to_string();
    }

    // Usage is checked against everything that is not itself an import
    // candidate, so removal order cannot influence the outcome.
    let candidate_lines: HashSet<usize> = candidates.iter().map(|(i, _)| *i).collect();
    let body: String = lines
        .iter()
        .enumerate()
        .filter(|(i, _)| !candidate_lines.contains(i))
        .map(|(_, l)| *l)
        .collect::<Vec<_>>()
        .join("\n");

    let removed: HashSet<usize> = candidates
        .iter()
        .filter(|(_, names)| names.iter().all(|n| !ident_used(&body, n)))
        .map(|(i, _)| *i)
        .collect();
    if removed.is_empty() {
        return text.to_string();
    }

    lines
        .iter()
        .enumerate()
        .filter(|(i, _)| !removed.contains(i))
        .map(|(_, l)| *l)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Sort each contiguous run of single-line `use` items alphabetically.
/// Runs are bounded by any non-import line, so grouping comments and
/// blank separators keep their structure.
pub fn sort_rust_imports(text: &str) -> String {
    let mut lines: Vec<&str> = text.split('\n').collect();
    let len = lines.len();

    let sortable = |line: &str| {
        let trimmed = line.trim();
        (trimmed.starts_with("use ") || trimmed.starts_with("pub use ")) && trimmed.ends_with(';')
    };

    let mut i = 0;
    while i < len {
        if sortable(lines[i]) {
            let mut j = i + 1;
            while j < len && sortable(lines[j]) {
                j += 1;
            }
            lines[i..j].sort_by(|a, b| a.trim().cmp(b.trim()));
            i = j;
        } else {
            i += 1;
        }
    }

    lines.join("\n")
}

/// Names bound by one `use` item (without `use ` / `;`), or `None` when
/// the item is out of scope for removal (glob, nested group).
fn use_bound_names(stmt: &str) -> Option<Vec<String>> {
    let inner = stmt.strip_prefix("use ")?.strip_suffix(';')?.trim();
    if inner.contains('*') {
        return None;
    }

    if let Some(brace) = inner.find('{') {
        if !inner.ends_with('}') {
            return None;
        }
        let prefix = &inner[..brace];
        let group = &inner[brace + 1..inner.len() - 1];
        if group.contains('{') {
            return None;
        }

        let mut names = Vec::new();
        for item in group.split(',') {
            let item = item.trim();
            if item.is_empty() {
                continue;
            }
            if item == "self" {
                // `a::b::{self, ..}` binds `b`.
                names.push(bound_name(prefix.trim_end_matches("::")));
            } else {
                names.push(bound_name(item));
            }
        }
        Some(names)
    } else {
        Some(vec![bound_name(inner)])
    }
}

fn bound_name(item: &str) -> String {
    let item = match item.rsplit_once(" as ") {
        Some((_, alias)) => alias,
        None => item,
    };
    item.rsplit("::").next().unwrap_or(item).trim().to_string()
}

fn ident_used(body: &str, name: &str) -> bool {
    let bytes = body.as_bytes();
    for (pos, _) in body.match_indices(name) {
        let before_ok = pos == 0 || {
            let c = bytes[pos - 1];
            !c.is_ascii_alphanumeric() && c != b'_'
        };
        let end = pos + name.len();
        let after_ok = end >= bytes.len() || {
            let c = bytes[end];
            !c.is_ascii_alphanumeric() && c != b'_'
        };
        if before_ok && after_ok {
            return true;
        }
    }
    false
}
