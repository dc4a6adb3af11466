//! Terminal rendering of interpretation results

use comando_common::TokenizedCommand;
use owo_colors::OwoColorize;

const FIELD_WIDTH: usize = 18;

fn quoted_list(items: &[String]) -> String {
    let quoted: Vec<String> = items.iter().map(|s| format!("'{}'", s)).collect();
    format!("[{}]", quoted.join(", "))
}

fn optional(value: &Option<String>) -> String {
    value.clone().unwrap_or_else(|| "None".to_string())
}

/// (field, value) rows in display order
pub fn rows(result: &TokenizedCommand) -> Vec<(&'static str, String)> {
    let classified: Vec<String> = result
        .classified_tokens
        .iter()
        .map(|ct| format!("('{}', '{}')", ct.token, ct.label))
        .collect();

    let mut metadata = format!(
        "processing_time_ms={}, tokens_removed={}, classification_method={}",
        result.metadata.processing_time_ms,
        quoted_list(&result.metadata.tokens_removed),
        result.metadata.classification_method
    );
    for d in &result.metadata.discoveries {
        metadata.push_str(&format!(
            ", learned '{}' as {} via {:?} ({})",
            d.token,
            d.outcome.category(),
            d.source,
            if d.evidence.is_empty() { "-" } else { d.evidence.as_str() }
        ));
    }

    vec![
        ("original_text", result.original_text.clone()),
        ("normalized_text", result.normalized_text.clone()),
        ("tokens", quoted_list(&result.tokens)),
        ("classified_tokens", format!("[{}]", classified.join(", "))),
        ("action", optional(&result.action)),
        ("target", optional(&result.target)),
        ("context", optional(&result.context)),
        ("confidence", format!("{:.2}", result.confidence)),
        ("metadata", metadata),
    ]
}

/// Print the result as a two-column table
pub fn print_result(result: &TokenizedCommand) {
    println!();
    println!("  {}", "TokenizedCommand".bright_white().bold());
    println!("  {:<width$} {}", "Campo".bold(), "Valor".bold(), width = FIELD_WIDTH);
    for (field, value) in rows(result) {
        println!("  {:<width$} {}", field.cyan().bold(), value, width = FIELD_WIDTH);
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use comando_common::category_store::{CategoryStore, CategoryTable};
    use comando_common::{Autotokenizer, Classifier, StopwordSet};

    #[test]
    fn test_rows_render_every_field() {
        let store = CategoryStore::in_memory(
            CategoryTable::from_pairs([("OPEN", vec!["abrir"])]),
            CategoryTable::from_pairs([("APPLICATIONS", vec!["chrome"])]),
            CategoryTable::new(),
        );
        let mut pipeline =
            Autotokenizer::new(StopwordSet::default(), Classifier::static_only(store));
        let result = pipeline.autotokenize("Abrir o Chrome");

        let rows = rows(&result);
        let fields: Vec<&str> = rows.iter().map(|(f, _)| *f).collect();
        assert_eq!(
            fields,
            vec![
                "original_text",
                "normalized_text",
                "tokens",
                "classified_tokens",
                "action",
                "target",
                "context",
                "confidence",
                "metadata"
            ]
        );
        assert_eq!(rows[2].1, "['abrir', 'chrome']");
        assert_eq!(
            rows[3].1,
            "[('abrir', 'ACTION_OPEN'), ('chrome', 'TARGET_APPLICATION')]"
        );
        assert_eq!(rows[6].1, "None");
        assert_eq!(rows[7].1, "0.80");
        assert!(rows[8].1.contains("tokens_removed=['o']"));
    }
}
