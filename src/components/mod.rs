pub mod backup;
pub mod color_picker;
pub mod dialogs;
pub mod header;
pub mod hooks;
pub mod note_card;
pub mod note_creator;
pub mod note_editor;
pub mod note_grid;
pub mod quick_search;
pub mod selection_toolbar;
pub mod sidebar;
pub mod toast_view;
pub mod ui;
