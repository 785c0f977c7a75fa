const PREAMBLE: &str = "\nYou are a study assistant.\n\nGiven the following webpage titled \"";

const INSTRUCTIONS: &str = r#"", generate ALL of the following in JSON:

1. A short, crisp summary in 4-6 sentences ONLY (max 100 words).
2. Possible interview-style open-ended questions based fully on the webpage content.
3. 20 multiple-choice questions (MCQs), each with:
   - question
   - 4 options (A,B,C,D)
   - correct_option
   - explanation for the correct option
4. 15 flashcards with:
   - front (term / question)
   - back (explanation)

Return ONLY valid JSON in this exact structure:

{
  "summary": "....",
  "interview_questions": ["...", "..."],
  "mcqs": [
    {
      "question": "...",
      "options": [...],
      "correct_option": "A",
      "explanation": "Reason why the correct answer is correct."
      }
  ],
  "flashcards": [
    { "front": "...", "back": "..." }
  ]
}

CONTENT:
--------------------
"#;

const CLOSING: &str = "\n--------------------\n";

/// Builds the study-material instruction for one page.
///
/// `title` and `content` are interpolated literally; nothing is escaped or
/// truncated, and the output depends on nothing but the two inputs.
pub fn build_prompt(title: &str, content: &str) -> String {
    let mut result = String::with_capacity(
        PREAMBLE.len() + title.len() + INSTRUCTIONS.len() + content.len() + CLOSING.len(),
    );
    result.push_str(PREAMBLE);
    result.push_str(title);
    result.push_str(INSTRUCTIONS);
    result.push_str(content);
    result.push_str(CLOSING);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interpolates_title_and_content_verbatim() {
        let prompt = build_prompt("Ownership in Rust", "Each value has a single owner.\n{ not json }");
        assert!(prompt.contains("webpage titled \"Ownership in Rust\", generate ALL"));
        assert!(prompt.contains(
            "--------------------\nEach value has a single owner.\n{ not json }\n--------------------\n"
        ));
    }

    #[test]
    fn requests_the_four_top_level_keys() {
        let prompt = build_prompt("", "x");
        for key in ["\"summary\"", "\"interview_questions\"", "\"mcqs\"", "\"flashcards\""] {
            assert!(prompt.contains(key), "missing {key}");
        }
        assert!(prompt.contains("Return ONLY valid JSON in this exact structure:"));
        assert!(prompt.contains("20 multiple-choice questions (MCQs)"));
        assert!(prompt.contains("15 flashcards with:"));
        assert!(prompt.contains("(max 100 words)"));
    }

    #[test]
    fn empty_title_is_accepted() {
        let prompt = build_prompt("", "body");
        assert!(prompt.starts_with("\nYou are a study assistant.\n"));
        assert!(prompt.contains("webpage titled \"\", generate ALL"));
    }

    #[test]
    fn is_deterministic() {
        let a = build_prompt("t", "some content");
        let b = build_prompt("t", "some content");
        assert_eq!(a, b);
        assert!(a.ends_with("some content\n--------------------\n"));
    }
}
