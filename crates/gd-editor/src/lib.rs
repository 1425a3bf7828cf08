pub mod config;
pub mod drag;
pub mod editor;
pub mod history;
pub mod selection;
pub mod shortcuts;
pub mod storage;
pub mod view;

pub use config::EditorConfig;
pub use editor::Editor;
pub use history::History;
pub use selection::{ControlValues, PointerTarget, Selection};
pub use shortcuts::{Direction, Focus, ShortcutAction, ShortcutMap};
pub use storage::{ExportFile, LayoutStore, MemoryStore, Notice, PersistError};
pub use view::InstanceView;
