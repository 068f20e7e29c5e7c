//! Text rendering for the windowed-average report.

use std::time::Duration;

use crate::data::WindowAverage;

const WINDOW_WIDTH: usize = 11;
const LOAD_WIDTH: usize = 5;

/// Parse humantime window strings ("30s", "5m", "1h 30m").
pub fn parse_windows(windows: &[String]) -> Result<Vec<Duration>, humantime::DurationError> {
    windows.iter().map(|w| humantime::parse_duration(w)).collect()
}

/// Render the report: a header carrying `now_label`, padded with `=` to the
/// width of the first row, then one row per window.
pub fn render(now_label: &str, rows: &[WindowAverage]) -> Vec<String> {
    let lines: Vec<String> = rows.iter().map(render_row).collect();

    let width = lines.first().map(String::len).unwrap_or(now_label.len());
    let border = "=".repeat(width.saturating_sub(now_label.len()));

    std::iter::once(format!("{}{}", now_label, border))
        .chain(lines)
        .collect()
}

fn render_row(row: &WindowAverage) -> String {
    format!(
        "{} - cpu_load: {} | gpu_load: {} | vram_load: {}",
        format_window(row.window),
        format_load(row.cpu_load),
        format_load(row.gpu_load),
        format_load(row.vram_load),
    )
}

fn format_window(window: Duration) -> String {
    format!(
        "{:>width$}",
        humantime::format_duration(window).to_string(),
        width = WINDOW_WIDTH
    )
}

fn format_load(load: Option<f64>) -> String {
    match load {
        Some(value) => format!("{:>width$.2}", value, width = LOAD_WIDTH),
        None => format!("{:>width$}", "n/a", width = LOAD_WIDTH),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn row(secs: u64, cpu: Option<f64>, gpu: Option<f64>, vram: Option<f64>) -> WindowAverage {
        WindowAverage {
            window: Duration::from_secs(secs),
            sample_count: 1,
            cpu_load: cpu,
            gpu_load: gpu,
            vram_load: vram,
            average_gpu: None,
            mem_used: None,
            mem_available: None,
        }
    }

    #[test]
    fn test_render_report() {
        let rows = [
            row(60, Some(0.5), Some(12.0), Some(3.25)),
            row(3600, Some(1.234), None, None),
        ];

        let lines = render("20240101 120000 ", &rows);

        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[1],
            "         1m - cpu_load:  0.50 | gpu_load: 12.00 | vram_load:  3.25"
        );
        assert_eq!(
            lines[2],
            "         1h - cpu_load:  1.23 | gpu_load:   n/a | vram_load:   n/a"
        );
        assert_eq!(lines[0].len(), lines[1].len());
        assert!(lines[0].starts_with("20240101 120000 ==="));
    }

    #[test]
    fn test_render_without_rows() {
        assert_eq!(render("now ", &[]), vec!["now ".to_string()]);
    }

    #[test]
    fn test_parse_windows() {
        let windows = parse_windows(&["1m".to_string(), "1h 30m".to_string()]).unwrap();
        assert_eq!(
            windows,
            vec![Duration::from_secs(60), Duration::from_secs(5400)]
        );
        assert!(parse_windows(&["soon".to_string()]).is_err());
    }
}
