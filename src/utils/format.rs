// file: src/utils/format.rs
// description: human readable sizes and scores for terminal output

const SIZE_UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

/// `0 Bytes`, `512 Bytes`, `1.5 KB`, `1 MB`; capped at GB.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = format!("{:.2}", value);
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, SIZE_UNITS[unit])
}

pub fn format_relevance(score: f64) -> String {
    format!("{:.1}%", score * 100.0)
}
