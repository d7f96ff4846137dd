use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;

/// Cage numbers listed in a breeding's comma-separated `cage` field.
/// Entries that are not numbers are skipped.
pub fn parse_cage_numbers(cage: &str) -> Vec<i32> {
    cage.split(',')
        .filter_map(|part| part.trim().parse().ok())
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum MaleLocation {
    /// The male lives in one of the breeding cages
    Resident,
    NonResident,
    Unknown,
}

pub fn male_location(breeding_cage: Option<&str>, male_cage: Option<i32>) -> MaleLocation {
    let (Some(breeding_cage), Some(male_cage)) = (breeding_cage, male_cage) else {
        return MaleLocation::Unknown;
    };
    let cages = parse_cage_numbers(breeding_cage);
    if cages.is_empty() {
        MaleLocation::Unknown
    } else if cages.contains(&male_cage) {
        MaleLocation::Resident
    } else {
        MaleLocation::NonResident
    }
}

pub fn breeding_label(strain: &str, cage: Option<&str>, start_date: Option<NaiveDate>) -> String {
    let cage = cage.map(str::trim).filter(|cage| !cage.is_empty()).unwrap_or("?");
    let start = start_date.map_or_else(|| "?".to_string(), |date| date.to_string());
    format!("{strain} Breeding Cage: {cage} starting on {start}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("12", vec![12])]
    #[case("12, 14,15", vec![12, 14, 15])]
    #[case("12,a,13", vec![12, 13])]
    #[case("", vec![])]
    fn test_parse_cage_numbers(#[case] cage: &str, #[case] expected: Vec<i32>) {
        assert_eq!(parse_cage_numbers(cage), expected);
    }

    #[rstest]
    #[case(Some("101,102"), Some(102), MaleLocation::Resident)]
    #[case(Some("101"), Some(101), MaleLocation::Resident)]
    #[case(Some("101,102"), Some(7), MaleLocation::NonResident)]
    #[case(None, Some(7), MaleLocation::Unknown)]
    #[case(Some("101"), None, MaleLocation::Unknown)]
    #[case(Some("pending"), Some(7), MaleLocation::Unknown)]
    fn test_male_location(
        #[case] breeding_cage: Option<&str>,
        #[case] male_cage: Option<i32>,
        #[case] expected: MaleLocation,
    ) {
        assert_eq!(male_location(breeding_cage, male_cage), expected);
    }

    #[test]
    fn test_breeding_label() {
        let start = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        assert_eq!(
            breeding_label("Ob/Ob", Some("101,102"), Some(start)),
            "Ob/Ob Breeding Cage: 101,102 starting on 2024-03-04"
        );
        assert_eq!(
            breeding_label("Ob/Ob", None, None),
            "Ob/Ob Breeding Cage: ? starting on ?"
        );
    }
}
