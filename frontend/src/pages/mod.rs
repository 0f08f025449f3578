pub mod admin_auth_files;
pub mod admin_auth_flow;
pub mod admin_dashboard;
pub mod admin_provider_import;
pub mod not_found;
