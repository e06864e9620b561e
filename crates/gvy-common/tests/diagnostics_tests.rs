use crate::diagnostics::{
    DIAGNOSTIC_MESSAGES, get_diagnostic_category, get_message_template,
};
use crate::{Diagnostic, DiagnosticCategory, Span, diagnostic_codes, format_message, render_message};

#[test]
fn format_message_replaces_numbered_placeholders() {
    let text = format_message("The {0} [{1}] is declared final but is reassigned", &["parameter", "x"]);
    assert_eq!(text, "The parameter [x] is declared final but is reassigned");
}

#[test]
fn every_code_has_a_single_table_entry() {
    for message in DIAGNOSTIC_MESSAGES {
        let count = DIAGNOSTIC_MESSAGES
            .iter()
            .filter(|m| m.code == message.code)
            .count();
        assert_eq!(count, 1, "code {} is registered {} times", message.code, count);
    }
}

#[test]
fn generic_interface_clash_is_a_warning() {
    assert_eq!(
        get_diagnostic_category(diagnostic_codes::INTERFACE_IMPLEMENTED_WITH_DIFFERENT_ARGUMENTS),
        Some(DiagnosticCategory::Warning)
    );
    assert_eq!(
        get_diagnostic_category(diagnostic_codes::DUPLICATE_INTERFACES_IN_IMPLEMENTS_LIST),
        Some(DiagnosticCategory::Error)
    );
}

#[test]
fn supertype_constructor_message_keeps_its_three_lines() {
    let text = render_message(
        diagnostic_codes::CANNOT_REFERENCE_BEFORE_SUPERTYPE_CONSTRUCTOR,
        &["name"],
    );
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(
        lines[0],
        "Cannot reference 'name' before supertype constructor has been called. Possible causes:"
    );
}

#[test]
fn unknown_code_keeps_arguments() {
    assert!(get_message_template(42).is_none());
    assert_eq!(render_message(42, &["a", "b"]), "a b");
}

#[test]
fn diagnostics_serialize_without_empty_related_information() {
    let diagnostic = Diagnostic::error("Foo.groovy", Span::new(3, 5), "boom", 1001);
    let json = serde_json::to_value(&diagnostic).expect("serialize");
    assert_eq!(json["line"], 3);
    assert_eq!(json["column"], 5);
    assert!(json.get("related_information").is_none());

    let with_related = diagnostic.with_related("Foo.groovy", Span::new(1, 1), "first declared here");
    let json = serde_json::to_value(&with_related).expect("serialize");
    assert_eq!(json["related_information"][0]["message_text"], "first declared here");
}

#[test]
fn span_without_line_falls_back() {
    let fallback = Span::new(7, 2);
    assert!(!Span::NONE.has_position());
    assert_eq!(Span::NONE.or(fallback), fallback);
    assert_eq!(Span::new(1, 1).or(fallback), Span::new(1, 1));
}

#[test]
fn from_code_takes_category_from_the_table() {
    let warning = Diagnostic::from_code(
        "Pair.groovy",
        Span::new(2, 1),
        diagnostic_codes::INTERFACE_IMPLEMENTED_WITH_DIFFERENT_ARGUMENTS,
        &["java.lang.Comparable", "java.lang.Comparable<A>", "java.lang.Comparable<B>"],
    );
    assert_eq!(warning.category, DiagnosticCategory::Warning);
    assert!(!warning.is_error());
    assert!(warning.message_text.starts_with("The interface java.lang.Comparable cannot"));

    let unknown = Diagnostic::from_code("Pair.groovy", Span::NONE, 42, &["boom"]);
    assert!(unknown.is_error(), "codes outside the table are errors");
    assert_eq!(unknown.message_text, "boom");
}
