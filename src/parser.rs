use crate::types::{Section, SectionKind};

// Real elog classes are at most five characters; the cap keeps shouted prose
// from opening sections.
const MAX_TAG_LEN: usize = 16;

/// Split a marker line into `(tag, stage)`.
///
/// A marker is `TAG: stage` with TAG in uppercase ASCII and no further colon
/// in the stage, matching the two-field convention of the elog format. URLs
/// and timestamps in body text therefore never split a section.
fn split_marker(line: &str) -> Option<(&str, &str)> {
    let (tag, stage) = line.split_once(':')?;
    if tag.is_empty() || tag.len() > MAX_TAG_LEN {
        return None;
    }
    if !tag.chars().next().is_some_and(|c| c.is_ascii_uppercase()) {
        return None;
    }
    if !tag
        .chars()
        .all(|c| c.is_ascii_uppercase() || c == '_' || c == '-')
    {
        return None;
    }
    if stage.contains(':') {
        return None;
    }
    Some((tag, stage.trim()))
}

/// Drop leading and trailing blank lines; internal blanks stay.
fn trim_blank<'a, 'b>(lines: &'b [&'a str]) -> &'b [&'a str] {
    let Some(start) = lines.iter().position(|l| !l.trim().is_empty()) else {
        return &[];
    };
    let end = lines
        .iter()
        .rposition(|l| !l.trim().is_empty())
        .unwrap_or(start);
    &lines[start..=end]
}

fn close_section(
    sections: &mut Vec<Section>,
    open: Option<(SectionKind, String, String)>,
    body: &[&str],
) {
    let body = trim_blank(body);
    match open {
        Some((kind, tag, stage)) => sections.push(Section {
            kind,
            tag,
            stage,
            body: body.join("\n"),
        }),
        // Content before the first marker (or a file with no markers at
        // all) is kept as a plain log section so nothing is dropped.
        None if !body.is_empty() => sections.push(Section {
            kind: SectionKind::Log,
            tag: String::new(),
            stage: String::new(),
            body: body.join("\n"),
        }),
        None => {}
    }
}

/// Split one file's text into its ordered sections. Single linear pass; an
/// empty or whitespace-only input yields no sections.
#[must_use]
pub fn parse_sections(content: &str) -> Vec<Section> {
    let mut sections = Vec::new();
    let mut open: Option<(SectionKind, String, String)> = None;
    let mut body: Vec<&str> = Vec::new();

    for line in content.lines() {
        if let Some((tag, stage)) = split_marker(line) {
            close_section(&mut sections, open.take(), &body);
            body.clear();
            open = Some((
                SectionKind::from_tag(tag),
                tag.to_string(),
                stage.to_string(),
            ));
        } else {
            body.push(line);
        }
    }
    close_section(&mut sections, open, &body);

    sections
}

/// Most severe known class present; defaults to info. Sections with an
/// unrecognized tag do not count.
#[must_use]
pub fn highest_class(sections: &[Section]) -> SectionKind {
    sections
        .iter()
        .map(|s| s.kind)
        .filter(|k| *k != SectionKind::Other)
        .max_by_key(|k| k.severity())
        .unwrap_or(SectionKind::Info)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(sections: &[Section]) -> Vec<SectionKind> {
        sections.iter().map(|s| s.kind).collect()
    }

    #[test]
    fn test_two_sections() {
        let sections = parse_sections("WARN:\nfoo bar\n\nINFO:\nbaz\n");

        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].kind, SectionKind::Warning);
        assert_eq!(sections[0].body, "foo bar");
        assert_eq!(sections[1].kind, SectionKind::Info);
        assert_eq!(sections[1].body, "baz");
    }

    #[test]
    fn test_marker_with_stage() {
        let sections = parse_sections("LOG: postinst\nAll done.\n");

        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].kind, SectionKind::Log);
        assert_eq!(sections[0].tag, "LOG");
        assert_eq!(sections[0].stage, "postinst");
        assert_eq!(sections[0].body, "All done.");
    }

    #[test]
    fn test_no_markers_yields_single_log_section() {
        let content = "just some text\nacross two lines";
        let sections = parse_sections(content);

        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].kind, SectionKind::Log);
        assert_eq!(sections[0].tag, "");
        assert_eq!(sections[0].body, content);
    }

    #[test]
    fn test_empty_input_yields_no_sections() {
        assert!(parse_sections("").is_empty());
        assert!(parse_sections("\n  \n\n").is_empty());
    }

    #[test]
    fn test_preamble_before_first_marker_is_kept() {
        let sections = parse_sections("orphan line\nERROR: setup\nboom\n");

        assert_eq!(
            kinds(&sections),
            vec![SectionKind::Log, SectionKind::Error]
        );
        assert_eq!(sections[0].body, "orphan line");
        assert_eq!(sections[1].body, "boom");
    }

    #[test]
    fn test_unrecognized_marker_kept_with_literal_tag() {
        let sections = parse_sections("NOTICE: compile\nsomething odd\n");

        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].kind, SectionKind::Other);
        assert_eq!(sections[0].tag, "NOTICE");
        assert_eq!(sections[0].stage, "compile");
        assert_eq!(sections[0].body, "something odd");
    }

    #[test]
    fn test_colon_lines_in_body_do_not_split() {
        let sections = parse_sections(
            "INFO: postinst\nSee: https://example.org/doc\nNote: lowercase tag\n",
        );

        assert_eq!(sections.len(), 1);
        assert_eq!(
            sections[0].body,
            "See: https://example.org/doc\nNote: lowercase tag"
        );
    }

    #[test]
    fn test_body_blank_lines_trimmed_outside_kept_inside() {
        let sections = parse_sections("WARN: setup\n\nfirst\n\nsecond\n\n\nINFO:\nx\n");

        assert_eq!(sections[0].body, "first\n\nsecond");
        assert_eq!(sections[1].body, "x");
    }

    #[test]
    fn test_round_trip_bodies() {
        let content = "WARN: setup\nline one\nline two\n\nline three\nERROR: postinst\nfailed hard\n";
        let sections = parse_sections(content);

        // Concatenating bodies in order reproduces the input minus marker
        // lines and trimmed blanks.
        let joined: Vec<&str> = sections.iter().map(|s| s.body.as_str()).collect();
        assert_eq!(
            joined.join("\n"),
            "line one\nline two\n\nline three\nfailed hard"
        );
    }

    #[test]
    fn test_empty_stage_and_empty_body_section() {
        let sections = parse_sections("QA:\nQA note\nLOG:\n");

        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].kind, SectionKind::Qa);
        assert_eq!(sections[1].kind, SectionKind::Log);
        assert_eq!(sections[1].body, "");
    }

    #[test]
    fn test_highest_class_ordering() {
        let ranked = parse_sections("QA:\na\nINFO:\nb\nWARN:\nc\n");
        assert_eq!(highest_class(&ranked), SectionKind::Warning);

        let with_error = parse_sections("ERROR:\na\nWARN:\nb\n");
        assert_eq!(highest_class(&with_error), SectionKind::Error);
    }

    #[test]
    fn test_highest_class_defaults_to_info() {
        assert_eq!(highest_class(&[]), SectionKind::Info);

        // Unrecognized tags alone do not raise the class either.
        let other_only = parse_sections("NOTICE:\nodd\n");
        assert_eq!(highest_class(&other_only), SectionKind::Info);
    }
}
