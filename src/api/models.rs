use serde::{Deserialize, Deserializer, Serialize};

#[derive(Deserialize, Debug, Default)]
pub struct GenerationRequest {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

/// An explicit `null` title reads the same as an absent one.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// The shape the prompt asks the model for. Replies are not checked against it
/// before being returned.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct StudyMaterial {
    pub summary: String,
    pub interview_questions: Vec<String>,
    pub mcqs: Vec<Mcq>,
    pub flashcards: Vec<Flashcard>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Mcq {
    pub question: String,
    pub options: Vec<String>,
    pub correct_option: OptionLetter,
    pub explanation: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionLetter {
    A,
    B,
    C,
    D,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Flashcard {
    pub front: String,
    pub back: String,
}
