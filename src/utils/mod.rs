// 工具模块 - 日志初始化、评级分档、显示格式化

pub mod logger;
pub mod rating;

pub use logger::{init_logger, LogLevel};
pub use rating::{rate_for_display, rating, RatingCategory, RatingDisplay, RatingStrategy};

// 金额显示，千位分隔
pub fn format_currency(amount: f64) -> String {
    let negative = amount < 0.0;
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let fraction = cents % 100;

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{}€{}.{:02}", if negative { "-" } else { "" }, grouped, fraction)
}

pub fn format_percent(ratio: f64) -> String {
    format!("{:.1}%", ratio * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(0.0), "€0.00");
        assert_eq!(format_currency(1234567.891), "€1,234,567.89");
        assert_eq!(format_currency(-999.5), "-€999.50");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(0.256), "25.6%");
    }
}
