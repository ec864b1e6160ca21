// Security module for plugin path validation
//
// Plugin uploads and deletions name files by client-supplied strings. This
// module confines them to the plugin directory.

pub mod path_validator;

pub use path_validator::{
    is_within_root, resolve_plugin_path, validate_file_name, PathSecurityError,
};
