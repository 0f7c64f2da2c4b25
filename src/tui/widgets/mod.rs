pub mod badges;
pub mod color;
pub mod confirm_delete;
pub mod daily_focus;
pub mod habit_list;
pub mod help;
pub mod input_modal;
pub mod overview;
pub mod popup;
pub mod status_bar;
pub mod tabs;
pub mod weekly;
