pub mod bridge;
pub mod commands;
pub mod config;
pub mod error;
pub mod input;
pub mod selection;
pub mod session;
pub mod shortcuts;
pub mod style;
pub mod tools;

pub use bridge::{ColorMode, ElementInfo, HostBridge, NoopBridge, SelectionSummary};
pub use config::EditorConfig;
pub use error::{EditorError, LoadError};
pub use input::{InputEvent, Modifiers};
pub use session::{LoadReport, ParsedDocument, PendingLoad, Session};
pub use tools::ToolKind;
