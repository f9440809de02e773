//! Program-text synthesis.
//!
//! An expression like `a > 3 && children_size == 0` references names that
//! only exist on the object it will run against. Synthesis welds the two
//! together: it emits a `var` preamble reading exactly the referenced
//! properties and relationship cardinalities off the bound object, then
//! wraps the expression in a `test()` function and invokes it. The result
//! is plain source text; compiling and running it is someone else's job,
//! which keeps this step a pure, interpreter-free function.

use std::collections::HashSet;

/// Synthesizes a complete program around `expression`.
///
/// Reference detection splits the expression on non-word characters, so
/// names inside string literals count as references too. Over-matching
/// only produces a harmless extra binding; identifiers the object does
/// not declare are left unbound and fail at execution time, not here.
///
/// Bindings are emitted in the object's declaration order, properties
/// before relationship sizes, so generated text is reproducible. The
/// bindings never reference each other, so the order carries no semantic
/// weight.
pub fn synthesize(
    property_names: &[String],
    relationship_names: &[String],
    expression: &str,
) -> String {
    let referenced: HashSet<&str> = expression
        .split(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .filter(|token| !token.is_empty())
        .collect();

    let mut source = String::new();
    for property in property_names {
        if referenced.contains(property.as_str()) {
            source.push_str(&format!("var {property} = obj.get{property}();\n"));
        }
    }
    for relationship in relationship_names {
        let size_name = format!("{relationship}_size");
        if referenced.contains(size_name.as_str()) {
            source.push_str(&format!(
                "var {size_name} = obj.getLinkedObjects(\"{relationship}\").size();\n"
            ));
        }
    }
    source.push_str(&format!("function test(){{return {expression};}}\ntest();"));
    source
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_binds_only_referenced_properties() {
        let source = synthesize(&names(&["a", "b"]), &names(&["children"]), "(a > 3)==true");

        assert!(source.contains("var a = obj.geta();"));
        assert!(!source.contains("var b"));
        assert!(!source.contains("getLinkedObjects"));
    }

    #[test]
    fn test_binds_relationship_size_when_referenced() {
        let source = synthesize(&[], &names(&["children"]), "children_size == 3");

        assert!(source.contains("var children_size = obj.getLinkedObjects(\"children\").size();"));
    }

    #[test]
    fn test_relationship_name_alone_is_not_bound() {
        let source = synthesize(&[], &names(&["children"]), "children == 3");

        assert!(!source.contains("getLinkedObjects"));
    }

    #[test]
    fn test_substring_of_a_name_is_not_a_reference() {
        let source = synthesize(&names(&["a"]), &[], "ab > 3");

        assert!(!source.contains("var a "));
    }

    #[test]
    fn test_no_references_emits_no_bindings() {
        let source = synthesize(&names(&["a"]), &names(&["kids"]), "1 == 1");

        assert_eq!(source, "function test(){return 1 == 1;}\ntest();");
    }

    #[test]
    fn test_generated_text_shape() {
        let source = synthesize(
            &names(&["a", "b"]),
            &names(&["kids"]),
            "a + b > kids_size",
        );

        assert_eq!(
            source,
            "var a = obj.geta();\n\
             var b = obj.getb();\n\
             var kids_size = obj.getLinkedObjects(\"kids\").size();\n\
             function test(){return a + b > kids_size;}\n\
             test();"
        );
    }

    #[test]
    fn test_split_on_operators_without_spaces() {
        let source = synthesize(&names(&["a", "b_2"]), &[], "a>3&&b_2==1");

        assert!(source.contains("var a = obj.geta();"));
        assert!(source.contains("var b_2 = obj.getb_2();"));
    }
}
