/// Application name
pub const APP_NAME: &str = "plugdeps";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Subject used when a `Core` header is parsed as a constraint
pub const CORE_SUBJECT: &str = "Core";

/// Host action that triggers a cascade
pub const ACTION_DEACTIVATE: &str = "deactivate";

/// Host action that triggers a conflict check
pub const ACTION_ACTIVATE: &str = "activate";

/// Notice heading for cascaded deactivations
pub const CASCADE_NOTICE: &str = "The following plugins have also been deactivated:";

/// Notice heading for conflict deactivations
pub const CONFLICTING_NOTICE: &str =
    "The following plugins have been deactivated due to dependency conflicts:";
