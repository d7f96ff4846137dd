use chrono::NaiveDate;

/// `HH:MM` on a 24 hour clock
pub fn is_valid_time(time: &str) -> bool {
    let Some((hours, minutes)) = time.split_once(':') else {
        return false;
    };
    if hours.len() != 2 || minutes.len() != 2 {
        return false;
    }
    matches!(
        (hours.parse::<u8>(), minutes.parse::<u8>()),
        (Ok(h), Ok(m)) if h < 24 && m < 60
    )
}

/// Parses comma-separated measurement values. A single value is a plain
/// measurement, several values form a time course.
pub fn parse_values(values: &str) -> Result<Vec<f64>, String> {
    values
        .split(',')
        .map(str::trim)
        .map(|value| {
            value
                .parse::<f64>()
                .ok()
                .filter(|number| number.is_finite())
                .ok_or_else(|| format!("'{value}' is not a number"))
        })
        .collect()
}

pub fn experiment_label(date: NaiveDate, feeding_state: &str) -> String {
    format!("{date}-{feeding_state}")
}

/// Age of the animal on the day of the experiment
pub fn age_at(experiment_date: NaiveDate, born: Option<NaiveDate>) -> Option<i64> {
    born.map(|born| (experiment_date - born).num_days())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("08:30", true)]
    #[case("00:00", true)]
    #[case("23:59", true)]
    #[case("24:00", false)]
    #[case("12:60", false)]
    #[case("8:30", false)]
    #[case("0830", false)]
    #[case("ab:cd", false)]
    fn test_is_valid_time(#[case] time: &str, #[case] expected: bool) {
        assert_eq!(is_valid_time(time), expected);
    }

    #[test]
    fn test_parse_values() {
        assert_eq!(parse_values("24.5"), Ok(vec![24.5]));
        assert_eq!(parse_values("120, 250,180 ,95"), Ok(vec![120.0, 250.0, 180.0, 95.0]));
        assert!(parse_values("12,,14").is_err());
        assert!(parse_values("high").is_err());
        assert!(parse_values("NaN").is_err());
    }

    #[test]
    fn test_age_at() {
        let day = |d| NaiveDate::from_ymd_opt(2024, 3, d).unwrap();
        assert_eq!(age_at(day(21), Some(day(1))), Some(20));
        assert_eq!(age_at(day(21), None), None);
        assert_eq!(experiment_label(day(21), "fasted"), "2024-03-21-fasted");
    }
}
