use chrono::Local;

/// Wall-clock time for log lines, `HH:MM:SS`.
pub fn timestamp() -> String {
    Local::now().format("%H:%M:%S").to_string()
}
