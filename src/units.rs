/// formats a byte count using binary units.
///
/// the value is scaled by 1024 until it drops below 1024 or reaches terabytes. there are no
/// units past terabytes, so larger values keep growing the leading number instead.
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }

    match unit {
        0 => format!("{bytes} {}", UNITS[0]),
        _ => format!("{size:.1} {}", UNITS[unit]),
    }
}
