use chrono::NaiveDate;
use uuid::Uuid;

/// `N.D.` (not determined) or anything still carrying a `?`
pub fn is_genotype_undetermined(genotype: &str) -> bool {
    let genotype = genotype.trim();
    genotype.is_empty() || genotype == "N.D." || genotype.contains('?')
}

/// A recorded death always wins over the stored flag.
pub fn derive_alive(death: Option<NaiveDate>, alive: bool) -> bool {
    death.is_none() && alive
}

/// Days from birth to death, or to `today` for living animals.
pub fn age_in_days(born: Option<NaiveDate>, death: Option<NaiveDate>, today: NaiveDate) -> Option<i64> {
    let born = born?;
    Some((death.unwrap_or(today) - born).num_days())
}

/// `"<strain>-EarTag #<tag>"`, falling back to the internal id and finally
/// to `MOUSE` for records that are not stored yet. Ear tag 0 counts as unset.
pub fn animal_label(strain: &str, ear_tag: Option<i32>, id: Option<Uuid>) -> String {
    match (ear_tag, id) {
        (Some(tag), _) if tag != 0 => format!("{strain}-EarTag #{tag}"),
        (_, Some(id)) => format!("{strain} ({id})"),
        (_, None) => "MOUSE".to_string(),
    }
}

/// Date checks applied before an animal is stored. Returns the offending
/// field and message.
pub fn validate_dates(
    born: Option<NaiveDate>,
    weaned: Option<NaiveDate>,
    death: Option<NaiveDate>,
) -> Result<(), (&'static str, &'static str)> {
    let Some(born) = born else {
        return Ok(());
    };
    if weaned.is_some_and(|weaned| weaned < born) {
        return Err(("weaned", "cannot precede the birth date"));
    }
    if death.is_some_and(|death| death < born) {
        return Err(("death", "cannot precede the birth date"));
    }
    Ok(())
}

pub fn validate_parents(
    id: Uuid,
    father_id: Option<Uuid>,
    mother_id: Option<Uuid>,
) -> Result<(), (&'static str, &'static str)> {
    if father_id == Some(id) {
        return Err(("father_id", "cannot be the animal itself"));
    }
    if mother_id == Some(id) {
        return Err(("mother_id", "cannot be the animal itself"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[rstest]
    #[case("N.D.", true)]
    #[case("-/-?", true)]
    #[case("?", true)]
    #[case("", true)]
    #[case("+/+", false)]
    #[case("-/+", false)]
    #[case("fl/fl; Cre+", false)]
    fn test_genotype_undetermined(#[case] genotype: &str, #[case] expected: bool) {
        assert_eq!(is_genotype_undetermined(genotype), expected);
    }

    #[rstest]
    #[case(None, true, true)]
    #[case(None, false, false)]
    #[case(Some(date(2024, 5, 1)), true, false)]
    #[case(Some(date(2024, 5, 1)), false, false)]
    fn test_derive_alive(#[case] death: Option<NaiveDate>, #[case] alive: bool, #[case] expected: bool) {
        assert_eq!(derive_alive(death, alive), expected);
    }

    #[test]
    fn test_age_counts_to_today_while_alive() {
        let today = date(2024, 3, 1);
        assert_eq!(age_in_days(Some(date(2024, 2, 1)), None, today), Some(29));
    }

    #[test]
    fn test_age_stops_at_death() {
        let today = date(2025, 1, 1);
        assert_eq!(
            age_in_days(Some(date(2024, 1, 1)), Some(date(2024, 1, 31)), today),
            Some(30)
        );
    }

    #[test]
    fn test_age_unknown_without_birth_date() {
        assert_eq!(age_in_days(None, Some(date(2024, 1, 31)), date(2024, 2, 1)), None);
    }

    #[test]
    fn test_label_variants() {
        let id = Uuid::new_v4();
        assert_eq!(animal_label("Ob/Ob", Some(1234), Some(id)), "Ob/Ob-EarTag #1234");
        assert_eq!(animal_label("Ob/Ob", None, Some(id)), format!("Ob/Ob ({id})"));
        assert_eq!(animal_label("Ob/Ob", None, None), "MOUSE");
    }

    #[test]
    fn test_label_treats_ear_tag_zero_as_unset() {
        let id = Uuid::new_v4();
        assert_eq!(animal_label("Ob/Ob", Some(0), Some(id)), format!("Ob/Ob ({id})"));
        assert_eq!(animal_label("Ob/Ob", Some(0), None), "MOUSE");
    }

    #[rstest]
    #[case(Some(date(2024, 1, 10)), Some(date(2024, 1, 31)), None, Ok(()))]
    #[case(Some(date(2024, 1, 10)), Some(date(2024, 1, 9)), None, Err("weaned"))]
    #[case(Some(date(2024, 1, 10)), None, Some(date(2024, 1, 1)), Err("death"))]
    #[case(None, Some(date(2024, 1, 9)), Some(date(2024, 1, 1)), Ok(()))]
    fn test_validate_dates(
        #[case] born: Option<NaiveDate>,
        #[case] weaned: Option<NaiveDate>,
        #[case] death: Option<NaiveDate>,
        #[case] expected: Result<(), &str>,
    ) {
        assert_eq!(
            validate_dates(born, weaned, death).map_err(|(field, _)| field),
            expected
        );
    }

    #[test]
    fn test_animal_cannot_be_its_own_parent() {
        let id = Uuid::new_v4();
        let other = Uuid::new_v4();
        assert!(validate_parents(id, Some(other), Some(Uuid::new_v4())).is_ok());
        assert_eq!(validate_parents(id, Some(id), None).unwrap_err().0, "father_id");
        assert_eq!(validate_parents(id, None, Some(id)).unwrap_err().0, "mother_id");
    }
}
