pub mod manager;
pub mod slot;
pub mod upload;

pub use manager::{DeletionPlan, ScriptFileManager};
pub use slot::{ScriptSlot, SlotState};
pub use upload::ScriptUpload;
