//! Chat handlers.

mod answer_question;

pub use answer_question::{AnswerQuestionCommand, AnswerQuestionHandler};
