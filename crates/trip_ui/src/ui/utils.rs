//! Formatting helpers for the viewer panels.

pub fn format_hms_from_ms(ms: u64) -> String {
    let total_secs = ms / 1000;
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{:02}:{:02}", minutes, seconds)
    }
}

pub fn format_distance_km(km: f64) -> String {
    if km < 1.0 {
        format!("{:.0} m", km * 1000.0)
    } else {
        format!("{:.2} km", km)
    }
}

pub fn format_progress_percent(t: f64) -> String {
    format!("{:.0}%", (t * 100.0).clamp(0.0, 100.0))
}
