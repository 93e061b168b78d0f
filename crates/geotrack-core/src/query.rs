//! Query builder: turns operator text into the ordered query list sent with a run.

use serde::{Deserialize, Serialize};

/// Category assigned to every query typed or pasted by the operator.
pub const CUSTOM_CATEGORY: &str = "custom";

/// One natural-language question submitted to the providers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    pub question: String,
    #[serde(default)]
    pub category: Option<String>,
    pub prompt_id: String,
}

/// Parses free text into queries, one per non-blank line.
///
/// Lines are trimmed and blank lines dropped. Ids are `q_1`, `q_2`, ... in
/// order of appearance. Re-parsing edited text produces a fresh list; no
/// identity is carried over from a previous parse.
#[must_use]
pub fn parse_queries(text: &str) -> Vec<Query> {
    queries_from_questions(text.lines())
}

/// Builds queries from already-split questions (sheet imports, generated
/// lists, sample sets) with the same normalization as [`parse_queries`].
#[must_use]
pub fn queries_from_questions<I, S>(questions: I) -> Vec<Query>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    questions
        .into_iter()
        .filter_map(|q| {
            let trimmed = q.as_ref().trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        })
        .enumerate()
        .map(|(index, question)| Query {
            question,
            category: Some(CUSTOM_CATEGORY.to_string()),
            prompt_id: format!("q_{}", index + 1),
        })
        .collect()
}

/// Maps an ISO market code to the country name the query generator expects.
///
/// Unknown codes are passed through unchanged.
#[must_use]
pub fn market_display_name(code: &str) -> &str {
    match code.to_ascii_uppercase().as_str() {
        "DE" => "Germany",
        "US" => "United States",
        "GB" | "UK" => "United Kingdom",
        "FR" => "France",
        "ES" => "Spain",
        "IT" => "Italy",
        "AT" => "Austria",
        "CH" => "Switzerland",
        "NL" => "Netherlands",
        "BE" => "Belgium",
        "PL" => "Poland",
        "SE" => "Sweden",
        "DK" => "Denmark",
        "NO" => "Norway",
        "FI" => "Finland",
        "PT" => "Portugal",
        "AU" => "Australia",
        "CA" => "Canada",
        "IN" => "India",
        "JP" => "Japan",
        "BR" => "Brazil",
        "MX" => "Mexico",
        "KR" => "South Korea",
        "CN" => "China",
        "SG" => "Singapore",
        "AE" => "United Arab Emirates",
        "SA" => "Saudi Arabia",
        "ZA" => "South Africa",
        _ => code,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(question: &str, id: &str) -> Query {
        Query {
            question: question.to_string(),
            category: Some(CUSTOM_CATEGORY.to_string()),
            prompt_id: id.to_string(),
        }
    }

    #[test]
    fn empty_input_yields_no_queries() {
        assert!(parse_queries("").is_empty());
        assert!(parse_queries("   \n\n").is_empty());
    }

    #[test]
    fn blank_lines_dropped_and_ids_sequential() {
        let parsed = parse_queries("a\n\nb\n  c  \n");
        assert_eq!(parsed, vec![q("a", "q_1"), q("b", "q_2"), q("c", "q_3")]);
    }

    #[test]
    fn crlf_line_endings_are_trimmed() {
        let parsed = parse_queries("best vitamin d?\r\nbest magnesium?\r\n");
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].question, "best vitamin d?");
        assert_eq!(parsed[1].question, "best magnesium?");
    }

    #[test]
    fn reparse_is_value_equal() {
        let text = "one\ntwo\n\nthree";
        assert_eq!(parse_queries(text), parse_queries(text));
    }

    #[test]
    fn queries_from_questions_skips_blank_entries() {
        let parsed = queries_from_questions(["  first ", "", "second"]);
        assert_eq!(parsed, vec![q("first", "q_1"), q("second", "q_2")]);
    }

    #[test]
    fn market_display_name_known_and_unknown() {
        assert_eq!(market_display_name("DE"), "Germany");
        assert_eq!(market_display_name("uk"), "United Kingdom");
        assert_eq!(market_display_name("XX"), "XX");
    }
}
