/// Format a playback position in seconds as `m:ss`.
///
/// Minutes carry no leading zero and are not folded into hours, so an hour
/// long video ends at `60:00`. Unknown or invalid inputs (NaN, infinities,
/// negatives) render as `0:00`.
pub fn format_duration(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return "0:00".to_string();
    }

    let total_secs = seconds.floor() as u64;
    let minutes = total_secs / 60;
    let secs = total_secs % 60;

    format!("{}:{:02}", minutes, secs)
}
