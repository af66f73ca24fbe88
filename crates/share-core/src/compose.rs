//! Outbound body composition.
//!
//! The remote copy always gets a level-1 heading and, when the note is
//! tagged, a tag line right under it. Composition order is fixed: the
//! heading is normalized first because tag injection anchors on it.

use crate::note::Tag;

/// Prepend `# {title}` unless the (trimmed) body already starts with a
/// level-1 heading.
pub fn normalize_heading(title: &str, body: &str) -> String {
    if body.trim_start().starts_with("# ") {
        body.to_string()
    } else {
        format!("# {title}\n{body}")
    }
}

/// Insert a `###### tags: ...` line directly after the first heading line.
/// Identity for empty tag lists and for bodies without a heading.
pub fn inject_tags(body: &str, tags: &[Tag]) -> String {
    if tags.is_empty() {
        return body.to_string();
    }

    let mut tag_line = String::from("###### tags:");
    for tag in tags {
        tag_line.push_str(&format!(" `{}`", tag.title));
    }

    let mut lines = Vec::new();
    let mut injected = false;
    for line in body.split('\n') {
        lines.push(line.to_string());
        if !injected && line.starts_with('#') {
            lines.push(String::new());
            lines.push(tag_line.clone());
            lines.push(String::new());
            injected = true;
        }
    }
    lines.join("\n")
}

/// Full composition for an outbound payload: heading first, tags second.
pub fn compose(title: &str, body: &str, tags: &[Tag]) -> String {
    inject_tags(&normalize_heading(title, body), tags)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(titles: &[&str]) -> Vec<Tag> {
        titles
            .iter()
            .map(|title| Tag {
                title: title.to_string(),
            })
            .collect()
    }

    #[test]
    fn heading_added_when_missing() {
        assert_eq!(normalize_heading("Design", "Hello"), "# Design\nHello");
    }

    #[test]
    fn heading_kept_when_present() {
        let body = "# Already here\n\nHello";
        assert_eq!(normalize_heading("Design", body), body);
    }

    #[test]
    fn leading_whitespace_does_not_hide_heading() {
        let body = "\n\n# Heading\nHello";
        assert_eq!(normalize_heading("Design", body), body);
    }

    #[test]
    fn inject_tags_is_identity_for_empty_list() {
        let body = "# Title\n\nHello";
        assert_eq!(inject_tags(body, &[]), body);
    }

    #[test]
    fn tags_land_directly_under_the_first_heading() {
        let out = inject_tags("# Title\nHello", &tags(&["a", "b"]));
        let lines: Vec<&str> = out.split('\n').collect();
        assert_eq!(lines[0], "# Title");
        assert_eq!(lines[1], "");
        assert_eq!(lines[2], "###### tags: `a` `b`");
        assert_eq!(lines[3], "");
        assert_eq!(lines[4], "Hello");
    }

    #[test]
    fn only_the_first_heading_is_used() {
        let out = inject_tags("# One\n## Two\nHello", &tags(&["t"]));
        assert_eq!(out.matches("###### tags:").count(), 1);
        assert!(out.starts_with("# One\n\n###### tags: `t`"));
    }

    #[test]
    fn no_heading_means_no_injection() {
        let body = "just text\nno heading";
        assert_eq!(inject_tags(body, &tags(&["t"])), body);
    }

    #[test]
    fn compose_normalizes_then_injects() {
        let out = compose("Design", "Hello", &tags(&["draft"]));
        assert!(out.starts_with("# Design"));
        let lines: Vec<&str> = out.split('\n').collect();
        assert_eq!(lines[2], "###### tags: `draft`");
        assert_eq!(lines[4], "Hello");
    }
}
