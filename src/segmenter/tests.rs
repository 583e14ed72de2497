use super::*;
use crate::section::normalized;

fn texts(sections: &[Section]) -> Vec<&str> {
    sections.iter().map(|s| s.text.as_str()).collect()
}

#[test]
fn test_heading_lines_start_sections() {
    let doc = "# Intro\nwelcome text\n\n## Details\nmore text here";
    let sections = segment(doc);

    assert_eq!(
        texts(&sections),
        vec!["# Intro\nwelcome text", "## Details\nmore text here"]
    );
}

#[test]
fn test_bold_wrapped_title_starts_section() {
    let doc = "# First\nbody one\n**Second Part**\nbody two";
    let sections = segment(doc);

    assert_eq!(sections.len(), 2);
    assert!(sections[1].text.starts_with("**Second Part**"));
    assert!(sections[1].text.contains("body two"));
}

#[test]
fn test_all_caps_line_starts_section() {
    let doc = "# First\nbody one\nCLOSING REMARKS\nfinal body";
    let sections = segment(doc);

    assert_eq!(sections.len(), 2);
    assert!(sections[1].text.starts_with("CLOSING REMARKS"));
}

#[test]
fn test_mixed_case_and_numeric_lines_are_not_boundaries() {
    let doc = "# Only\nNot A Boundary Line\n1234\nstill the same section";
    let sections = segment(doc);

    assert_eq!(sections.len(), 1);
}

#[test]
fn test_hash_without_space_is_not_a_heading() {
    let doc = "# Real\nbody with #hashtag inline\n#nospace tag line";
    let sections = segment(doc);

    assert_eq!(sections.len(), 1);
}

#[test]
fn test_preamble_before_first_boundary_kept() {
    let doc = "intro paragraph before any heading\n\n# Section\nbody";
    let sections = segment(doc);

    assert_eq!(
        texts(&sections),
        vec!["intro paragraph before any heading", "# Section\nbody"]
    );
}

#[test]
fn test_no_boundaries_yields_single_trimmed_section() {
    let doc = "\n\njust a plain paragraph\nacross two lines\n\n";
    let sections = segment(doc);

    assert_eq!(
        texts(&sections),
        vec!["just a plain paragraph\nacross two lines"]
    );
}

#[test]
fn test_empty_document_yields_no_sections() {
    assert!(segment("").is_empty());
    assert!(segment("  \n\n  ").is_empty());
}

#[test]
fn test_blank_runs_between_boundaries_discarded() {
    let doc = "# A\n\n\n\n# B\nbody";
    let sections = segment(doc);

    assert_eq!(texts(&sections), vec!["# A", "# B\nbody"]);
}

#[test]
fn test_content_preserved_modulo_whitespace() {
    let doc = "preamble words\n\n# One\nfirst body\n**Two**\nsecond body\nTHREE\nthird body\n";
    let sections = segment(doc);

    let joined = sections
        .iter()
        .map(|s| s.text.as_str())
        .collect::<Vec<_>>()
        .join("\n");
    assert_eq!(normalized(&joined), normalized(doc));
}

#[test]
fn test_resegmenting_joined_sections_is_stable() {
    let doc = "# One\nfirst body\n\n## Two\nsecond body\nTHREE\nthird body";
    let first_pass = segment(doc);

    let rejoined = first_pass
        .iter()
        .map(|s| s.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n");
    let second_pass = segment(&rejoined);

    assert_eq!(texts(&first_pass), texts(&second_pass));
}

#[test]
fn test_sentences_split_on_terminators() {
    let fragments = split_sentences("First one. Second one! Third one? Fourth");
    assert_eq!(
        fragments,
        vec!["First one.", "Second one!", "Third one?", "Fourth"]
    );
}

#[test]
fn test_decimals_do_not_split() {
    let fragments = split_sentences("Pi is 3.14159 roughly. Euler's is 2.71828.");
    assert_eq!(
        fragments,
        vec!["Pi is 3.14159 roughly.", "Euler's is 2.71828."]
    );
}

#[test]
fn test_newlines_split_fragments() {
    let fragments = split_sentences("# Heading\nBody sentence. Another\n\nlast line");
    assert_eq!(
        fragments,
        vec!["# Heading", "Body sentence.", "Another", "last line"]
    );
}

#[test]
fn test_blank_input_yields_no_fragments() {
    assert!(split_sentences("   \n  ").is_empty());
}
