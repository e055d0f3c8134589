//! Normalisation of the single-line records returned by DOI content negotiation.

/// A single `@type{key, name = value, ...}` record split into its parts.
/// Values keep their delimiters (`{...}`, `"..."` or a bare token).
#[derive(Debug, Clone, PartialEq, Eq)]
struct RawEntry {
    entry_type: String,
    key: String,
    fields: Vec<(String, String)>,
}

/// Re-emit a single BibTeX record one field per line.
///
/// Field order and value text are preserved, except that field names and
/// the entry type are lowercased and Unicode dashes in `pages` become `--`.
/// Anything that is not exactly one valid entry is returned trimmed.
pub fn tidy(raw: &str) -> String {
    let trimmed = raw.trim();
    if !is_single_valid_entry(trimmed) {
        tracing::debug!("record did not validate as a single entry; leaving as-is");
        return trimmed.to_string();
    }
    let Some(entry) = split_entry(trimmed) else {
        return trimmed.to_string();
    };

    let mut out = format!("@{}{{{},\n", entry.entry_type.to_lowercase(), entry.key);
    let last = entry.fields.len().saturating_sub(1);
    for (i, (name, value)) in entry.fields.iter().enumerate() {
        let name = name.to_lowercase();
        let value = if name == "pages" {
            value.replace(['\u{2013}', '\u{2014}'], "--")
        } else {
            value.clone()
        };
        out.push_str("  ");
        out.push_str(&name);
        out.push_str(" = ");
        out.push_str(&value);
        if i != last {
            out.push(',');
        }
        out.push('\n');
    }
    out.push('}');
    out
}

/// Citation key of the first record in `raw`, if it can be read.
pub fn entry_key(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let rest = trimmed.strip_prefix('@')?;
    let open = rest.find(['{', '('])?;
    let after = &rest[open + 1..];
    let end = after.find([',', '}', ')'])?;
    let key = after[..end].trim();
    (!key.is_empty()).then(|| key.to_string())
}

fn is_single_valid_entry(text: &str) -> bool {
    match biblatex::Bibliography::parse(text) {
        Ok(bib) => bib.len() == 1,
        Err(_) => false,
    }
}

/// Brace- and quote-aware split of one record. Returns `None` if anything
/// other than whitespace follows the closing brace.
fn split_entry(text: &str) -> Option<RawEntry> {
    let rest = text.strip_prefix('@')?;
    let open = rest.find('{')?;
    let entry_type = rest[..open].trim().to_string();
    let body = &rest[open + 1..];

    let key_end = body.find(',')?;
    let key = body[..key_end].trim().to_string();
    if entry_type.is_empty() || key.is_empty() || key.contains(['{', '}']) {
        return None;
    }

    let chars: Vec<(usize, char)> = body.char_indices().collect();
    let mut pos = chars.iter().position(|&(i, _)| i == key_end)? + 1;
    let mut fields = Vec::new();

    loop {
        while pos < chars.len() && (chars[pos].1.is_whitespace() || chars[pos].1 == ',') {
            pos += 1;
        }
        if pos >= chars.len() {
            return None;
        }
        if chars[pos].1 == '}' {
            let tail = &body[chars[pos].0 + 1..];
            return tail.trim().is_empty().then_some(RawEntry {
                entry_type,
                key,
                fields,
            });
        }

        let name_start = chars[pos].0;
        while pos < chars.len() && chars[pos].1 != '=' {
            pos += 1;
        }
        if pos >= chars.len() {
            return None;
        }
        let name = body[name_start..chars[pos].0].trim().to_string();
        pos += 1;

        let value_start = chars.get(pos).map(|c| c.0).unwrap_or(body.len());
        let mut depth = 0usize;
        let mut in_quote = false;
        while pos < chars.len() {
            match chars[pos].1 {
                '{' => depth += 1,
                '}' if depth == 0 && !in_quote => break,
                '}' => depth -= 1,
                '"' if depth == 0 => in_quote = !in_quote,
                ',' if depth == 0 && !in_quote => break,
                _ => {}
            }
            pos += 1;
        }
        let value_end = chars.get(pos).map(|c| c.0).unwrap_or(body.len());
        let value = body[value_start..value_end].trim().to_string();
        if name.is_empty() || value.is_empty() {
            return None;
        }
        fields.push((name, value));
    }
}
