use chrono::Local;
use weather_widget_core::WeatherWidget;

/// Lines printed after every settle: the result line, then an optional note.
pub fn widget_lines(widget: &WeatherWidget) -> Vec<String> {
    let mut lines = vec![widget.render_line()];

    if let Some(status) = widget.status_line() {
        lines.push(format!("  ({status})"));
    }

    // The temperature shown may belong to an earlier city.
    if let Some(reading) = widget.reading() {
        if reading.city != widget.active_city() {
            let at = reading.fetched_at.with_timezone(&Local).format("%H:%M:%S");
            lines.push(format!("  (temperature is from {} at {at})", reading.city));
        }
    }

    lines
}

pub fn print_widget(widget: &WeatherWidget) {
    for line in widget_lines(widget) {
        println!("{line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weather_widget_core::{Action, RequestId, Temperature};

    #[test]
    fn fresh_widget_prints_only_result_line() {
        let widget = WeatherWidget::default();
        assert_eq!(widget_lines(&widget), vec!["The temp in Auckland is ".to_string()]);
    }

    #[test]
    fn failed_lookup_explains_stale_temperature() {
        let mut widget = WeatherWidget::default();
        widget.update(Action::Mount);
        widget.update(Action::FetchDidLoad {
            id: RequestId(1),
            temperature: Temperature::from_celsius(18.5),
        });
        widget.update(Action::InputChanged("Wellington".into()));
        widget.update(Action::Submit);
        widget.update(Action::FetchDidError { id: RequestId(2), reason: "offline".into() });

        let lines = widget_lines(&widget);
        assert_eq!(lines[0], "The temp in Wellington is 18.5");
        assert_eq!(lines[1], "  (lookup failed: offline)");
        assert!(lines[2].starts_with("  (temperature is from Auckland at "));
    }
}
