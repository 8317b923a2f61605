//! Path and URL helpers for base-URL normalization and href/src assembly.

pub(crate) struct JoinOptions {
    pub leading_slash: bool,
    pub trailing_slash: bool,
}

/// Lexical posix-style path normalization: collapses `.`, `..` and duplicate
/// slashes without touching the filesystem. A leading slash and a trailing
/// slash are preserved; the empty result is `.` (or `./` with a trailing
/// slash).
pub(crate) fn normalize_path(path: &str) -> String {
    if path.is_empty() {
        return ".".to_owned();
    }
    let absolute = path.starts_with('/');
    let trailing = path.ends_with('/');

    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if segments.last().is_some_and(|last| *last != "..") {
                    segments.pop();
                } else if !absolute {
                    segments.push("..");
                }
            }
            other => segments.push(other),
        }
    }

    let mut normalized = segments.join("/");
    if absolute {
        normalized.insert(0, '/');
    } else if normalized.is_empty() {
        normalized.push('.');
    }
    if trailing && !normalized.ends_with('/') {
        normalized.push('/');
    }
    normalized
}

/// Ensure a base URL is absolute: normalized, with one leading and one
/// trailing slash. Corrects for redundancy in user options like `././`.
pub(crate) fn normalize_absolute_url(url: &str) -> String {
    let mut url = normalize_path(url);
    if !url.starts_with('/') {
        url.insert(0, '/');
    }
    join_url(
        &[url.as_str()],
        &JoinOptions {
            leading_slash: true,
            trailing_slash: true,
        },
    )
}

/// Ensure a base URL is relative: no leading slash, normalized, with a
/// trailing slash. The degenerate normalized value `.` becomes `./`.
pub(crate) fn normalize_relative_url(url: &str) -> String {
    let stripped = url.trim_start_matches('/');
    let prefixed = if stripped.starts_with("./") {
        stripped.to_owned()
    } else {
        format!("./{stripped}")
    };
    let mut url = normalize_path(&prefixed);
    if url == "." {
        url = "./".to_owned();
    }
    join_url(
        &[url.as_str()],
        &JoinOptions {
            leading_slash: false,
            trailing_slash: true,
        },
    )
}

/// Join URL parts with single slashes under a leading/trailing slash policy.
/// Empty parts are skipped, duplicate slashes collapse, and a part starting
/// with `?` or `#` glues onto the path without a separating slash.
pub(crate) fn join_url(parts: &[&str], options: &JoinOptions) -> String {
    let mut url = parts
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("/");

    url = collapse_slashes(&url);
    url = url.replace("/?", "?").replace("/#", "#");

    if options.leading_slash {
        if !url.starts_with('/') {
            url.insert(0, '/');
        }
    } else {
        url = url.trim_start_matches('/').to_owned();
    }

    if options.trailing_slash {
        if !url.ends_with('/') {
            url.push('/');
        }
    } else {
        while url.len() > 1 && url.ends_with('/') {
            url.pop();
        }
    }
    url
}

fn collapse_slashes(url: &str) -> String {
    let mut collapsed = String::with_capacity(url.len());
    let mut previous_slash = false;
    for c in url.chars() {
        if c == '/' && previous_slash {
            continue;
        }
        previous_slash = c == '/';
        collapsed.push(c);
    }
    collapsed
}
