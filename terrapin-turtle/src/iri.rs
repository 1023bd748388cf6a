//! Relative IRI resolution (RFC 3986 §5).
//!
//! The parser resolves every relative reference against the current base
//! before any term reaches a sink, so downstream tables only ever hold
//! absolute IRIs.

use crate::error::{ParseError, Result};

/// True if the reference carries a scheme (`scheme ':' ...`).
pub(crate) fn is_absolute(iri: &str) -> bool {
    let mut chars = iri.char_indices();
    match chars.next() {
        Some((_, c)) if c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    for (_, c) in chars {
        match c {
            ':' => return true,
            c if c.is_ascii_alphanumeric() || c == '+' || c == '-' || c == '.' => {}
            _ => return false,
        }
    }
    false
}

/// Resolve `reference` against `base` per RFC 3986 §5.3.
///
/// `base` must be absolute; a relative reference with no base in scope is an
/// error.
pub(crate) fn resolve(base: Option<&str>, reference: &str) -> Result<String> {
    if is_absolute(reference) {
        return Ok(strip_dot_segments_in_path(reference));
    }

    let base = match base {
        Some(b) => b,
        None => {
            return Err(ParseError::iri(
                reference,
                "relative reference with no base IRI in scope",
            ))
        }
    };
    if !is_absolute(base) {
        return Err(ParseError::iri(
            reference,
            format!("base IRI '{}' is not absolute", base),
        ));
    }

    let b = Components::of(base);

    // RFC 3986 §5.3: transform the reference using the base's components
    let (scheme, authority, path, query) = if let Some(rest) = reference.strip_prefix("//") {
        // network-path reference: keep only the base scheme
        let (auth, path_q) = split_authority(rest);
        let (path, query) = split_query(path_q);
        (b.scheme, Some(auth), remove_dot_segments(path), query)
    } else if reference.is_empty() {
        (b.scheme, b.authority, b.path.to_string(), b.query)
    } else if let Some(q) = reference.strip_prefix('?') {
        (b.scheme, b.authority, b.path.to_string(), Some(q))
    } else if let Some(frag) = reference.strip_prefix('#') {
        let mut out = recompose(b.scheme, b.authority, b.path, b.query);
        out.push('#');
        out.push_str(frag);
        return Ok(out);
    } else if reference.starts_with('/') {
        let (path, query) = split_query(reference);
        (b.scheme, b.authority, remove_dot_segments(path), query)
    } else {
        let (path, query) = split_query(reference);
        let merged = merge_paths(b.authority.is_some(), b.path, path);
        (b.scheme, b.authority, remove_dot_segments(&merged), query)
    };

    let (path, fragment) = split_fragment_owned(path);
    let mut out = recompose(scheme, authority, &path, query);
    if let Some(frag) = fragment {
        out.push('#');
        out.push_str(&frag);
    }
    Ok(out)
}

/// Normalize dot segments in an already-absolute IRI's path.
fn strip_dot_segments_in_path(iri: &str) -> String {
    // split the fragment off first; Components drops it (base semantics)
    let (body, fragment) = match iri.split_once('#') {
        Some((body, frag)) => (body, Some(frag)),
        None => (iri, None),
    };
    let c = Components::of(body);
    let path = remove_dot_segments(c.path);
    let mut out = recompose(c.scheme, c.authority, &path, c.query);
    if let Some(frag) = fragment {
        out.push('#');
        out.push_str(frag);
    }
    out
}

/// Decomposed absolute IRI, borrowed from the source string.
struct Components<'a> {
    scheme: &'a str,
    authority: Option<&'a str>,
    path: &'a str,
    query: Option<&'a str>,
}

impl<'a> Components<'a> {
    fn of(iri: &'a str) -> Self {
        let colon = iri.find(':').unwrap_or(iri.len());
        let scheme = &iri[..colon];
        let rest = iri.get(colon + 1..).unwrap_or("");

        // fragments in the base are dropped per §5.3
        let rest = rest.split('#').next().unwrap_or(rest);

        let (authority, path_q) = match rest.strip_prefix("//") {
            Some(after) => {
                let (auth, path_q) = split_authority(after);
                (Some(auth), path_q)
            }
            None => (None, rest),
        };
        let (path, query) = split_query(path_q);
        Self {
            scheme,
            authority,
            path,
            query,
        }
    }
}

fn recompose(scheme: &str, authority: Option<&str>, path: &str, query: Option<&str>) -> String {
    let mut out = String::with_capacity(
        scheme.len() + path.len() + authority.map_or(0, |a| a.len() + 2) + 8,
    );
    out.push_str(scheme);
    out.push(':');
    if let Some(auth) = authority {
        out.push_str("//");
        out.push_str(auth);
    }
    out.push_str(path);
    if let Some(q) = query {
        out.push('?');
        out.push_str(q);
    }
    out
}

/// Split `authority [path [query]]` after a `//`.
fn split_authority(rest: &str) -> (&str, &str) {
    match rest.find(['/', '?', '#']) {
        Some(i) if rest.as_bytes()[i] == b'/' => rest.split_at(i),
        Some(i) => rest.split_at(i),
        None => (rest, ""),
    }
}

fn split_query(path_q: &str) -> (&str, Option<&str>) {
    match path_q.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (path_q, None),
    }
}

fn split_fragment_owned(path: String) -> (String, Option<String>) {
    match path.split_once('#') {
        Some((p, frag)) => (p.to_string(), Some(frag.to_string())),
        None => (path, None),
    }
}

/// RFC 3986 §5.3 path merge.
fn merge_paths(base_has_authority: bool, base_path: &str, ref_path: &str) -> String {
    if base_has_authority && base_path.is_empty() {
        return format!("/{}", ref_path);
    }
    match base_path.rfind('/') {
        Some(i) => format!("{}{}", &base_path[..=i], ref_path),
        None => ref_path.to_string(),
    }
}

/// RFC 3986 §5.2.4 remove_dot_segments.
fn remove_dot_segments(path: &str) -> String {
    let mut input = path;
    let mut output = String::with_capacity(path.len());
    while !input.is_empty() {
        if let Some(rest) = input.strip_prefix("../") {
            input = rest;
        } else if let Some(rest) = input.strip_prefix("./") {
            input = rest;
        } else if input.starts_with("/./") {
            // keep the trailing slash to anchor the next segment
            input = &input[2..];
        } else if input == "/." {
            input = "/";
        } else if input.starts_with("/../") {
            input = &input[3..];
            pop_segment(&mut output);
        } else if input == "/.." {
            input = "/";
            pop_segment(&mut output);
        } else if input == "." || input == ".." {
            input = "";
        } else {
            let start = if input.starts_with('/') { 1 } else { 0 };
            let end = input[start..]
                .find('/')
                .map(|i| i + start)
                .unwrap_or(input.len());
            output.push_str(&input[..end]);
            input = &input[end..];
        }
    }
    output
}

fn pop_segment(output: &mut String) {
    if let Some(i) = output.rfind('/') {
        output.truncate(i);
    } else {
        output.clear();
    }
}
