//! Response header helpers

/// `attachment; filename="<file_name>"`
///
/// `file_name` comes from [`BuiltBook::file_name`](crate::pipeline::BuiltBook::file_name),
/// which already strips quotes, backslashes and control characters.
pub fn content_disposition(file_name: &str) -> String {
    format!("attachment; filename=\"{file_name}\"")
}
