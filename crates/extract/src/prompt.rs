use crate::schema::Schema;

/// Bracketed, comma-separated column list as it appears in the prompt.
pub fn format_column_list(schema: &Schema) -> String {
    format!("[{}]", schema.columns().join(", "))
}

/// Assemble the extraction prompt from the template body, the subject name,
/// the biography text and the formatted column list.
///
/// No validation happens here; an empty biography or column list is passed
/// through and surfaces later at parse or validation time.
pub fn build_extraction_prompt(
    body: &str,
    name: &str,
    biography: &str,
    column_list: &str,
) -> String {
    format!(
        r#"I will provide a biographical text of {}.

Please return their biographical details as a csv-formatted table using these columns: {}.

Do not include information that does not fit in this schema. Only return the CSV.

{}

biography:
{}"#,
        name, column_list, body, biography
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_contains_all_parts() {
        let schema = Schema::new(vec!["attribute".to_string(), "value".to_string()]);
        let columns = format_column_list(&schema);
        let prompt = build_extraction_prompt(
            "Dates should be ISO formatted.",
            "Ada Lovelace",
            "Born in 1815 in London.",
            &columns,
        );

        assert!(prompt.contains("Ada Lovelace"));
        assert!(prompt.contains("[attribute, value]"));
        assert!(prompt.contains("Dates should be ISO formatted."));
        assert!(prompt.contains("Born in 1815 in London."));
        assert!(prompt.contains("Only return the CSV."));
    }

    #[test]
    fn test_empty_inputs_pass_through() {
        let prompt = build_extraction_prompt("", "Unknown", "", "[]");

        assert!(prompt.contains("Unknown"));
        assert!(prompt.contains("columns: []."));
    }
}
