pub mod frontend;
pub mod r#loop;

pub use frontend::{FrontendAdapter, LookbackEdit, UserInputEvent};
pub use r#loop::Runtime;
