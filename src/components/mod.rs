//! UI Components
//!
//! Board-level Leptos components.

mod board_header;
mod board_column;
mod task_card;
mod task_form;
mod add_member_form;
mod failure_banner;
mod delete_confirm_button;

pub use board_header::BoardHeader;
pub use board_column::BoardColumn;
pub use task_card::TaskCard;
pub use task_form::TaskForm;
pub use add_member_form::AddMemberForm;
pub use failure_banner::FailureBanner;
pub use delete_confirm_button::DeleteConfirmButton;
