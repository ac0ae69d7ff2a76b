use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::answer::{answers_match, normalize};
use crate::model::ids::{ExerciseId, LessonId};

//
// ─── EXERCISE ──────────────────────────────────────────────────────────────────
//

/// One answer choice of a multiple-choice exercise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseOption {
    pub key: String,
    pub text: String,
}

impl ExerciseOption {
    #[must_use]
    pub fn new(key: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            text: text.into(),
        }
    }
}

/// A practice question from a lesson's exercise pool.
///
/// `options` is present for multiple-choice exercises and absent for free
/// text. `answer` holds the expected option key or the expected text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exercise {
    pub id: ExerciseId,
    #[serde(default = "default_exercise_type")]
    pub exercise_type: String,
    pub question: String,
    #[serde(default, deserialize_with = "deserialize_options")]
    pub options: Option<Vec<ExerciseOption>>,
    pub answer: String,
}

fn default_exercise_type() -> String {
    "multiple_choice".to_owned()
}

impl Exercise {
    #[must_use]
    pub fn free_text(id: ExerciseId, question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            id,
            exercise_type: "text".to_owned(),
            question: question.into(),
            options: None,
            answer: answer.into(),
        }
    }

    #[must_use]
    pub fn multiple_choice(
        id: ExerciseId,
        question: impl Into<String>,
        options: Vec<ExerciseOption>,
        answer_key: impl Into<String>,
    ) -> Self {
        Self {
            id,
            exercise_type: default_exercise_type(),
            question: question.into(),
            options: Some(options),
            answer: answer_key.into(),
        }
    }

    #[must_use]
    pub fn is_multiple_choice(&self) -> bool {
        self.options.as_ref().is_some_and(|opts| !opts.is_empty())
    }

    /// The option whose key is the expected answer, if any.
    #[must_use]
    pub fn correct_option(&self) -> Option<&ExerciseOption> {
        let expected = normalize(&self.answer);
        self.options
            .as_deref()?
            .iter()
            .find(|opt| normalize(&opt.key) == expected)
    }

    /// Returns true when `given` matches the expected answer (trimmed,
    /// case-insensitive). For multiple choice the answer is the option key.
    #[must_use]
    pub fn accepts(&self, given: &str) -> bool {
        answers_match(given, &self.answer)
    }
}

/// Options arrive either as `[{key, text}]` or as a `{key: text}` object;
/// both keep their wire order.
fn deserialize_options<'de, D>(deserializer: D) -> Result<Option<Vec<ExerciseOption>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Wire {
        List(Vec<ExerciseOption>),
        Map(serde_json::Map<String, serde_json::Value>),
    }

    let wire = Option::<Wire>::deserialize(deserializer)?;
    Ok(wire.map(|wire| match wire {
        Wire::List(list) => list,
        Wire::Map(map) => map
            .into_iter()
            .map(|(key, value)| {
                let text = match value {
                    serde_json::Value::String(s) => s,
                    other => other.to_string(),
                };
                ExerciseOption { key, text }
            })
            .collect(),
    }))
}

//
// ─── ADMIN DRAFT ───────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ExerciseDraftError {
    #[error("question cannot be empty")]
    EmptyQuestion,
    #[error("answer cannot be empty")]
    EmptyAnswer,
    #[error("options are required")]
    MissingOptions,
}

/// Payload for creating or editing an exercise from the admin panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExerciseDraft {
    pub lesson_id: LessonId,
    pub question: String,
    pub options: Vec<ExerciseOption>,
    pub answer: String,
    pub exercise_type: String,
}

impl ExerciseDraft {
    /// Trim and check the draft before it is sent.
    ///
    /// # Errors
    ///
    /// Returns `ExerciseDraftError` when the question or answer is blank, or
    /// when a multiple-choice draft has no options.
    pub fn validate(mut self) -> Result<Self, ExerciseDraftError> {
        self.question = self.question.trim().to_owned();
        self.answer = self.answer.trim().to_owned();
        if self.question.is_empty() {
            return Err(ExerciseDraftError::EmptyQuestion);
        }
        if self.answer.is_empty() {
            return Err(ExerciseDraftError::EmptyAnswer);
        }
        if self.exercise_type == "multiple_choice" && self.options.is_empty() {
            return Err(ExerciseDraftError::MissingOptions);
        }
        Ok(self)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn loops_question() -> Exercise {
        Exercise::multiple_choice(
            ExerciseId::new(1),
            "Which keyword starts a loop?",
            vec![
                ExerciseOption::new("a", "if"),
                ExerciseOption::new("b", "for"),
            ],
            "B",
        )
    }

    #[test]
    fn multiple_choice_accepts_only_the_key() {
        let ex = loops_question();
        assert!(ex.accepts("b"));
        assert!(ex.accepts(" B "));
        assert!(!ex.accepts("a"));
        assert!(!ex.accepts("for"));
        assert_eq!(ex.correct_option().map(|o| o.text.as_str()), Some("for"));
    }

    #[test]
    fn free_text_accepts_normalized_answer() {
        let ex = Exercise::free_text(ExerciseId::new(2), "Print keyword?", "print");
        assert!(ex.accepts("PRINT  "));
        assert!(!ex.is_multiple_choice());
    }

    #[test]
    fn options_deserialize_from_list_or_map() {
        let list: Exercise = serde_json::from_str(
            r#"{"id":1,"question":"q","options":[{"key":"a","text":"x"}],"answer":"a"}"#,
        )
        .unwrap();
        assert_eq!(list.options.unwrap()[0].text, "x");

        let map: Exercise = serde_json::from_str(
            r#"{"id":1,"exercise_type":"multiple_choice","question":"q","options":{"b":"y","a":"x"},"answer":"a"}"#,
        )
        .unwrap();
        assert_eq!(
            map.options.unwrap(),
            vec![ExerciseOption::new("b", "y"), ExerciseOption::new("a", "x")]
        );
    }

    #[test]
    fn missing_options_is_free_text() {
        let ex: Exercise =
            serde_json::from_str(r#"{"id":3,"question":"q","options":null,"answer":"x"}"#).unwrap();
        assert!(ex.options.is_none());
    }

    #[test]
    fn draft_requires_question_and_answer() {
        let draft = ExerciseDraft {
            lesson_id: LessonId::new(1),
            question: "  ".into(),
            options: vec![],
            answer: "a".into(),
            exercise_type: "text".into(),
        };
        assert_eq!(draft.validate().unwrap_err(), ExerciseDraftError::EmptyQuestion);
    }

    #[test]
    fn multiple_choice_draft_requires_options() {
        let draft = ExerciseDraft {
            lesson_id: LessonId::new(1),
            question: "q".into(),
            options: vec![],
            answer: "a".into(),
            exercise_type: "multiple_choice".into(),
        };
        assert_eq!(draft.validate().unwrap_err(), ExerciseDraftError::MissingOptions);
    }
}
