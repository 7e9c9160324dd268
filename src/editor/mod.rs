/// Undo/redo history of grid mutations
pub mod history;
/// Session context owning the grid, cursor and history
pub mod session;
