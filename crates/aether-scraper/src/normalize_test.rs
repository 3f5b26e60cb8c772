use super::*;

#[test]
fn clean_input_is_returned_trimmed() {
    let text = "Acme ships a new analytics suite today";
    assert_eq!(normalize_text(text, 5000), text);
    assert_eq!(normalize_text(&format!("  {text}  "), 5000), text);
}

#[test]
fn output_never_exceeds_max_chars() {
    let inputs = vec![
        String::new(),
        "short".to_string(),
        "<p>one</p><p>two</p><p>three</p>".to_string(),
        "ünïcödé ✓ ✓ ✓ ✓ ✓ ✓ ✓ ✓ ✓ ✓ ✓ ✓".to_string(),
        "word ".repeat(2_000),
    ];
    for input in &inputs {
        for cap in [0, 1, 7, 100, 3000, 5000] {
            let out = normalize_text(input, cap);
            assert!(
                out.chars().count() <= cap,
                "normalize_text({input:?}, {cap}) produced {} chars",
                out.chars().count()
            );
        }
    }
}

#[test]
fn script_and_style_blocks_are_removed_entirely() {
    let out = normalize_text(
        "<script>alert(1)</script>Hello<style>.a{}</style>World",
        5000,
    );
    assert!(out.contains("Hello"));
    assert!(out.contains("World"));
    assert!(!out.contains("alert"));
    assert!(!out.contains(".a{}"));
}

#[test]
fn script_blocks_spanning_lines_and_mixed_case_are_removed() {
    let html = "<SCRIPT type=\"text/javascript\">\nvar x = 1;\nconsole.log(x);\n</Script>\n<p>Pricing</p>";
    assert_eq!(normalize_text(html, 5000), "Pricing");
}

#[test]
fn tags_become_single_spaces() {
    let html = "<div><h1>New</h1><p>pricing:\n\n $99/mo</p></div>";
    assert_eq!(normalize_text(html, 5000), "New pricing: $99/mo");
}

#[test]
fn truncation_respects_code_points() {
    let out = normalize_text("héllo wörld", 4);
    assert_eq!(out, "héll");
    assert_eq!(truncate_chars("✓✓✓", 2), "✓✓");
    assert_eq!(truncate_chars("abc", 10), "abc");
    assert_eq!(truncate_chars("abc", 0), "");
}

#[test]
fn control_characters_become_whitespace() {
    let out = normalize_text("\u{0}New\u{0}\u{7}pricing\u{1b} $99/mo\u{0}", 5000);
    assert_eq!(out, "New pricing $99/mo");
    assert!(!out.contains('\0'));
}
