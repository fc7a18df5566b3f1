pub mod answer;
pub mod handler;
pub mod unlock;

pub use answer::AnswerField;
pub use handler::{InputContext, InputHandler, KeyAction};
pub use unlock::{KEY_REPEAT_GAP, LongPress, SecretCode};
