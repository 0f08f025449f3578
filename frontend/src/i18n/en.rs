pub mod common {
    pub const LOADING: &str = "Loading...";
    pub const COPIED: &str = "Copied";
}

pub mod loading_spinner {
    pub const ARIA_LABEL: &str = "Loading";
}

pub mod pagination {
    pub const ARIA_NAV: &str = "Pagination";
    pub const ARIA_PREV: &str = "Previous page";
    pub const ARIA_NEXT: &str = "Next page";
    pub const PAGE_OF_TEMPLATE: &str = "Page {} of {}";
}

pub mod error_banner {
    pub const TITLE: &str = "Something went wrong";
    pub const NOTICE_TITLE: &str = "Notice";
    pub const CLOSE_ARIA: &str = "Dismiss message";
}

pub mod manual_copy {
    pub const TITLE: &str = "Copy switched to manual mode";
    pub const CLOSE: &str = "Close";
    pub const SHORTCUT_HINT: &str = "Press Ctrl/Cmd+C to copy";
    pub const RETRY: &str = "Retry auto copy";
}

pub mod version_update {
    pub const NEW_VERSION: &str = "New version available";
}

pub mod nav {
    pub const BRAND_NAME: &str = "cpab";
    pub const DASHBOARD: &str = "Dashboard";
    pub const AUTH_FILES: &str = "Auth Files";
    pub const NAV_ARIA: &str = "Admin navigation";
}

pub mod transactions {
    pub const TITLE: &str = "Recent Transactions";
    pub const EMPTY: &str = "No transactions yet";
    pub const REQUEST_LOG: &str = "Request log";
    pub const CLOSE: &str = "Close";
    pub const REQUEST: &str = "Request";
    pub const RESPONSE: &str = "Response";
    pub const COL_USERNAME: &str = "Username";
    pub const COL_STATUS: &str = "Status";
    pub const COL_TIMESTAMP: &str = "Timestamp";
    pub const COL_PROVIDER: &str = "Provider";
    pub const COL_MODEL: &str = "Model";
    pub const COL_REQUEST_TIME: &str = "Request Time";
    pub const COL_INPUT: &str = "Input";
    pub const COL_CACHED: &str = "Cached";
    pub const COL_OUTPUT: &str = "Output";
    pub const COL_COST: &str = "Cost";
    pub const ROWS_PER_PAGE: &str = "Rows per page";
    pub const SHOWING_TEMPLATE: &str = "Showing {} to {} of {} transactions";
}

pub mod dashboard {
    pub const TITLE: &str = "Dashboard";
    pub const SUBTITLE: &str = "Traffic routed through the proxy, newest first.";
}

pub mod auth_files {
    pub const TITLE: &str = "Auth Files";
    pub const SUBTITLE: &str = "Sign in to upstream providers or import existing credentials.";
    pub const IMPORT_BUTTON: &str = "Import (Provider)";
    pub const LAST_IMPORT_TEMPLATE: &str = "Imported {} auth files in this session";
    pub const FLOW_TITLE: &str = "New sign-in";
    pub const PROVIDER: &str = "Provider";
    pub const NO_PROVIDERS: &str = "No providers available";
    pub const START: &str = "Start sign-in";
    pub const STARTING: &str = "Starting...";
    pub const CANCEL: &str = "Cancel";
    pub const OPEN_URL_HINT: &str = "Open this URL to sign in:";
    pub const OPEN: &str = "Open";
    pub const COPY_URL: &str = "Copy URL";
    pub const DEVICE_CODE_HINT: &str = "Enter this code on the verification page:";
    pub const VERIFICATION_URL: &str = "Verification URL";
    pub const USER_CODE: &str = "User code";
    pub const COPY_CODE: &str = "Copy code";
    pub const WAITING: &str = "Waiting for authorization...";
    pub const COMPLETED: &str = "Authentication successful";
}

pub mod provider_import {
    pub const TITLE: &str = "Import Auth Files (Provider)";
    pub const CLOSE_ARIA: &str = "Close";
    pub const PROVIDER: &str = "Provider";
    pub const AUTH_GROUP: &str = "Auth Group";
    pub const DEFAULT_GROUP: &str = "Default";
    pub const TAB_FILE: &str = "File Import";
    pub const TAB_TEXT: &str = "Text Import";
    pub const TAB_EXAMPLE: &str = "Provider Example";
    pub const DROP_HINT: &str = "Drag and drop JSON files here";
    pub const BROWSE: &str = "Browse files";
    pub const NO_FILES: &str = "No files selected yet.";
    pub const REMOVE_FILE_ARIA: &str = "Remove file";
    pub const TEXT_PLACEHOLDER: &str = "Paste JSON object or array here";
    pub const FORMAT_JSON: &str = "Format JSON";
    pub const CLEAR: &str = "Clear";
    pub const FILL_TO_TEXT: &str = "Fill to Text Import";
    pub const COPY_EXAMPLE: &str = "Copy Example";
    pub const CANCEL: &str = "Cancel";
    pub const IMPORT: &str = "Import";
    pub const IMPORTING: &str = "Importing...";
    pub const ERR_NO_FILES: &str = "Please select at least one JSON file.";
    pub const ERR_EXAMPLE_TAB: &str = "Please switch to file or text tab to import.";
    pub const ERR_NO_ENTRIES: &str = "No valid entries to import.";
    pub const ERR_JSON_ONLY: &str = "Only JSON files are supported.";
    pub const ERR_IMPORT_FAILED: &str = "Failed to import auth files.";
    pub const IMPORTED_TEMPLATE: &str = "Imported {} auth files";
    pub const SOME_FAILED: &str = "Some entries failed to import.";
}

pub mod not_found {
    pub const TITLE: &str = "404 - Page not found";
    pub const BODY: &str = "The page you are looking for does not exist.";
    pub const BACK: &str = "Back to dashboard";
}
