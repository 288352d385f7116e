//! Windows drive-letter compatibility.
//!
//! The engine treats paths as case-sensitive, so a lowercase drive
//! letter in `codeFilename` makes it miss configuration it discovered
//! under the uppercase spelling. Until that is fixed upstream, paths
//! handed to the engine on Windows get their drive letter upper-cased.
//! Delete this module once the engine compares drive letters
//! case-insensitively.

/// Upper-cases a leading `x:` drive prefix; all other paths pass
/// through unchanged.
pub fn normalize_drive_letter(path: &str) -> String {
    let mut chars = path.chars();
    match (chars.next(), chars.next()) {
        (Some(drive), Some(':')) if drive.is_ascii_lowercase() => {
            let mut normalized = String::with_capacity(path.len());
            normalized.push(drive.to_ascii_uppercase());
            normalized.push_str(&path[1..]);
            normalized
        }
        _ => path.to_string(),
    }
}
