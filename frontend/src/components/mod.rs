pub mod admin_nav;
pub mod admin_transactions_table;
pub mod error_banner;
pub mod loading_spinner;
pub mod manual_copy_dialog;
pub mod pagination;
pub mod version_update_button;
