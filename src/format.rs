use chrono::{Datelike, NaiveDateTime};

const MONTHS: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

const MONTHS_SHORT: [&str; 12] = [
    "ene", "feb", "mar", "abr", "may", "jun", "jul", "ago", "sept", "oct", "nov", "dic",
];

const WEEKDAYS: [&str; 7] = [
    "lunes",
    "martes",
    "miércoles",
    "jueves",
    "viernes",
    "sábado",
    "domingo",
];

/// `15 mar 2025, 20:00`
pub fn kickoff_short(dt: &NaiveDateTime) -> String {
    format!(
        "{} {} {}, {}",
        dt.day(),
        MONTHS_SHORT[dt.month0() as usize],
        dt.year(),
        dt.format("%H:%M")
    )
}

/// `sábado, 15 de marzo de 2025, 20:00`
pub fn kickoff_long(dt: &NaiveDateTime) -> String {
    format!(
        "{}, {} de {} de {}, {}",
        WEEKDAYS[dt.weekday().num_days_from_monday() as usize],
        dt.day(),
        MONTHS[dt.month0() as usize],
        dt.year(),
        dt.format("%H:%M")
    )
}

/// Probability as a whole percentage, rounded to nearest.
pub fn percent_label(probability: f64) -> String {
    format!("{}%", (probability * 100.0).round() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn formats_spanish_dates() {
        let dt = at(2025, 3, 15, 20, 0);
        assert_eq!(kickoff_short(&dt), "15 mar 2025, 20:00");
        assert_eq!(kickoff_long(&dt), "sábado, 15 de marzo de 2025, 20:00");

        let dt = at(2024, 9, 2, 9, 5);
        assert_eq!(kickoff_short(&dt), "2 sept 2024, 09:05");
        assert_eq!(kickoff_long(&dt), "lunes, 2 de septiembre de 2024, 09:05");
    }

    #[test]
    fn rounds_percentages_to_nearest() {
        assert_eq!(percent_label(0.55), "55%");
        assert_eq!(percent_label(0.25), "25%");
        assert_eq!(percent_label(0.20), "20%");
        assert_eq!(percent_label(0.29), "29%");
        assert_eq!(percent_label(0.336), "34%");
        assert_eq!(percent_label(0.0), "0%");
        assert_eq!(percent_label(1.0), "100%");
    }
}
