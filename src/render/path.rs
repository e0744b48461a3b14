//! Relative references between output files.
//!
//! Locations are `/`-separated paths relative to the output root, e.g.
//! `sub1/sub2/f.html`. The last segment is the file, everything before
//! it is its directory. Nothing here touches the file system, so links
//! stay valid when the whole output tree is moved.

/// Compute the reference from the file `from` to the file `to`.
///
/// # Examples
///
/// ```
/// use robogen::render::relative_path;
///
/// assert_eq!(relative_path("sub1/sub2/sub3/f.html", "sub1/sub2/g.html"), "../g.html");
/// assert_eq!(relative_path("sub1/f.html", "sub1/sub2/g.html"), "./sub2/g.html");
/// assert_eq!(relative_path("sub1/f.html", "sub1/g.html"), "./g.html");
/// assert_eq!(relative_path("sub1/f.html", "sub1/f.html"), "");
/// ```
pub fn relative_path(from: &str, to: &str) -> String {
    let from_segs = segments(from);
    let to_segs = segments(to);
    if from_segs == to_segs {
        return String::new();
    }

    let from_dir = &from_segs[..from_segs.len().saturating_sub(1)];
    let to_dir = &to_segs[..to_segs.len().saturating_sub(1)];
    let common = from_dir
        .iter()
        .zip(to_dir)
        .take_while(|(a, b)| a == b)
        .count();

    let ups = from_dir.len() - common;
    let rest = to_segs[common..].join("/");
    if ups == 0 {
        format!("./{rest}")
    } else {
        format!("{}{rest}", "../".repeat(ups))
    }
}

/// Resolve a reference produced by [`relative_path`] against `from`.
///
/// An empty reference addresses `from` itself.
pub fn resolve(from: &str, reference: &str) -> String {
    if reference.is_empty() {
        return segments(from).join("/");
    }
    let from_segs = segments(from);
    let mut stack: Vec<&str> = from_segs[..from_segs.len().saturating_sub(1)].to_vec();
    for seg in reference.split('/') {
        match seg {
            "" | "." => {}
            ".." => {
                stack.pop();
            }
            _ => stack.push(seg),
        }
    }
    stack.join("/")
}

fn segments(path: &str) -> Vec<&str> {
    path.split('/')
        .filter(|s| !s.is_empty() && *s != ".")
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_path_deeper_to_shallower() {
        assert_eq!(
            relative_path("sub1/sub2/sub3/f.html", "sub1/sub2/g.html"),
            "../g.html"
        );
    }

    #[test]
    fn test_relative_path_into_child() {
        assert_eq!(relative_path("sub1/f.html", "sub1/sub2/g.html"), "./sub2/g.html");
        assert_eq!(relative_path("index.html", "lib/a.html"), "./lib/a.html");
    }

    #[test]
    fn test_relative_path_siblings() {
        assert_eq!(relative_path("sub1/f.html", "sub1/g.html"), "./g.html");
        assert_eq!(relative_path("f.html", "g.html"), "./g.html");
    }

    #[test]
    fn test_relative_path_cousins() {
        assert_eq!(
            relative_path("sub1/doc3/doc1/tt.html", "sub1/doc5/doc2/qq.html"),
            "../../doc5/doc2/qq.html"
        );
    }

    #[test]
    fn test_relative_path_compares_whole_segments() {
        assert_eq!(
            relative_path("doc3/a.html", "doc30/b.html"),
            "../doc30/b.html"
        );
    }

    #[test]
    fn test_relative_path_same_file() {
        assert_eq!(relative_path("a/b.html", "a/b.html"), "");
        assert_eq!(relative_path("./a/b.html", "a//b.html"), "");
    }

    #[test]
    fn test_resolve() {
        assert_eq!(resolve("sub1/sub2/sub3/f.html", "../g.html"), "sub1/sub2/g.html");
        assert_eq!(resolve("sub1/f.html", "./sub2/g.html"), "sub1/sub2/g.html");
        assert_eq!(resolve("sub1/f.html", ""), "sub1/f.html");
    }

    #[test]
    fn test_round_trip_symmetry() {
        let locations = [
            "f.html",
            "g.html",
            "sub1/f.html",
            "sub1/g.html",
            "sub1/sub2/g.html",
            "sub1/sub2/sub3/f.html",
            "sub1/doc3/doc1/tt.html",
            "sub1/doc5/doc2/qq.html",
            "other/x.html",
        ];
        for a in locations {
            for b in locations {
                assert_eq!(resolve(a, &relative_path(a, b)), b, "{a} -> {b}");
                assert_eq!(resolve(b, &relative_path(b, a)), a, "{b} -> {a}");
            }
        }
    }
}
