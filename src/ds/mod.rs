pub mod entry_arena;

pub use entry_arena::{EntryArena, EntryId};
