//! Small helpers shared by the csv and excel readers.

/// The file name without directories or extension, used to prefix the record
/// identifiers.
pub fn simplify_file_name(path: &str) -> String {
    let name = match path.rsplit(['/', '\\']).next() {
        Some(n) => n,
        None => path,
    };
    match name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem.to_string(),
        _ => name.to_string(),
    }
}

/// Guesses the input type from the file extension.
pub fn infer_input_type(path: &str) -> Option<&'static str> {
    let lowered = path.to_lowercase();
    if lowered.ends_with(".csv") {
        Some("csv")
    } else if lowered.ends_with(".xlsx") || lowered.ends_with(".xls") {
        Some("xlsx")
    } else {
        None
    }
}
