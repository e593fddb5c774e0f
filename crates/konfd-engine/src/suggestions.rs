//! Fuzzy matching for template errors
//!
//! Templates only have two functions, so most mistakes are misspellings of
//! `configmap` or `secret`, or an attempt to use Go template syntax.

/// Maximum Levenshtein distance to consider for suggestions
const MAX_SUGGESTION_DISTANCE: usize = 3;

/// All functions callable from a template
pub const AVAILABLE_FUNCTIONS: &[&str] = &["configmap", "secret"];

/// Suggestion result with its edit distance
#[derive(Debug, Clone)]
pub struct Suggestion {
    /// The suggested correction
    pub text: String,
    /// Levenshtein distance (lower = better match)
    pub distance: usize,
}

/// Find closest matches from a list of candidates
pub fn find_closest_matches(input: &str, candidates: &[&str], max_results: usize) -> Vec<Suggestion> {
    let mut suggestions: Vec<Suggestion> = candidates
        .iter()
        .filter_map(|&candidate| {
            let distance = strsim::levenshtein(input, candidate);
            (distance <= MAX_SUGGESTION_DISTANCE && distance > 0).then(|| Suggestion {
                text: candidate.to_string(),
                distance,
            })
        })
        .collect();

    suggestions.sort_by_key(|s| s.distance);
    suggestions.truncate(max_results);
    suggestions
}

/// Suggest corrections for an unknown function
pub fn suggest_unknown_function(func_name: &str) -> String {
    let matches = find_closest_matches(func_name, AVAILABLE_FUNCTIONS, 1);

    match matches.first() {
        Some(m) => format!("Did you mean `{}`?", m.text),
        None => format!(
            "Unknown function `{}`. Available functions: {}",
            func_name,
            AVAILABLE_FUNCTIONS.join(", ")
        ),
    }
}

/// Help for syntax errors, with a hint for Go template style calls
pub fn suggest_syntax_fix(template_source: &str) -> String {
    let go_style = AVAILABLE_FUNCTIONS
        .iter()
        .any(|f| template_source.contains(&format!("{{{{ {} \"", f)));

    if go_style {
        "Functions take parenthesized arguments: `{{ configmap(\"name\", \"key\") }}`".to_string()
    } else {
        "Check bracket matching: `{{ }}` for expressions, `{% %}` for statements, `{# #}` for comments"
            .to_string()
    }
}

/// Extract the function name from an "unknown function" message
///
/// MiniJinja reports `unknown function: name is unknown`.
pub fn extract_function_name(msg: &str) -> Option<String> {
    let rest = msg.split("unknown function:").nth(1)?.trim_start();
    let name: String = rest
        .chars()
        .take_while(|c| c.is_alphanumeric() || *c == '_')
        .collect();
    (!name.is_empty()).then_some(name)
}
