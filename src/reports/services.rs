use super::models::{
    BreedingKind, CageOccupancy, ColonySummary, StrainCount, StrainOverview, TodoList, TodoLists,
    Totals, YearCount,
};
use crate::animals::models::{self as animals, Animal, Background, display_all, today};
use crate::breedings::models::{self as breedings, Breeding, CrossType, describe_all};
use crate::config::Config;
use crate::strains::models::{self as strains, Strain};
use chrono::{Datelike, Duration, NaiveDate};
use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
};
use std::collections::{BTreeMap, HashMap};
use uuid::Uuid;

/// Animals born before this date are older than `days`
pub fn cutoff(today: NaiveDate, days: i64) -> NaiveDate {
    today - Duration::days(days)
}

/// Birth counts per year from the oldest recorded birth up to `current_year`,
/// years without births included.
pub fn births_per_year(births: &[NaiveDate], current_year: i32) -> Vec<YearCount> {
    let Some(first) = births.iter().map(Datelike::year).min() else {
        return vec![];
    };
    let mut counts: BTreeMap<i32, u64> = (first..=current_year.max(first)).map(|y| (y, 0)).collect();
    for born in births {
        *counts.entry(born.year()).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|(year, count)| YearCount { year, count })
        .collect()
}

/// `[start, end)` of a calendar year
pub fn year_range(year: i32) -> Option<(NaiveDate, NaiveDate)> {
    Some((
        NaiveDate::from_ymd_opt(year, 1, 1)?,
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?,
    ))
}

/// `[start, end)` of a month, `None` for a month outside 1..=12
pub fn month_range(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let start = NaiveDate::from_ymd_opt(year, month, 1)?;
    let end = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((start, end))
}

type CageKey = (i32, Option<String>, &'static str, Option<String>, Option<String>);

/// Groups housed animals by cage number, strain, background and rack.
pub fn group_cages(housed: &[Animal]) -> Vec<CageOccupancy> {
    let mut groups: BTreeMap<CageKey, (Background, u64)> = BTreeMap::new();
    for animal in housed {
        let Some(cage) = animal.cage else { continue };
        let key = (
            cage,
            animal.strain_name.clone(),
            animal.background.as_str(),
            animal.rack.clone(),
            animal.rack_position.clone(),
        );
        groups.entry(key).or_insert((animal.background, 0)).1 += 1;
    }
    groups
        .into_iter()
        .map(|((cage, strain, _, rack, rack_position), (background, animals))| CageOccupancy {
            cage,
            strain,
            background,
            rack,
            rack_position,
            animals,
        })
        .collect()
}

async fn distinct_count<C: ConnectionTrait, T>(db: &C, column: animals::Column, alive_only: bool) -> Result<u64, DbErr>
where
    T: sea_orm::TryGetableMany + Send + Sync + 'static,
{
    let mut query = animals::Entity::find()
        .select_only()
        .column(column)
        .distinct()
        .filter(column.is_not_null());
    if alive_only {
        query = query.filter(animals::Column::Alive.eq(true));
    }
    Ok(query.into_tuple::<T>().all(db).await?.len() as u64)
}

pub async fn summary<C: ConnectionTrait>(db: &C) -> Result<ColonySummary, DbErr> {
    let animals_total = Totals {
        all: animals::Entity::find().count(db).await?,
        current: animals::Entity::find()
            .filter(animals::Column::Alive.eq(true))
            .count(db)
            .await?,
    };
    let strains_total = Totals {
        all: strains::Entity::find().count(db).await?,
        current: distinct_count::<_, Uuid>(db, animals::Column::StrainId, true).await?,
    };
    let cages_total = Totals {
        all: distinct_count::<_, i32>(db, animals::Column::Cage, false).await?,
        current: distinct_count::<_, i32>(db, animals::Column::Cage, true).await?,
    };
    Ok(ColonySummary {
        animals: animals_total,
        strains: strains_total,
        cages: cages_total,
    })
}

/// Alive animals that belong on `list`, using the age thresholds of `config`
pub async fn todo<C: ConnectionTrait>(db: &C, config: &Config, list: TodoList) -> Result<Vec<Animal>, DbErr> {
    let today = today();
    let alive = animals::Entity::find().filter(animals::Column::Alive.eq(true));
    let query = match list {
        TodoList::Eartag => alive
            .filter(animals::Column::EarTag.is_null())
            .filter(animals::Column::Born.lt(cutoff(today, config.wean_age_days))),
        TodoList::Genotype => alive
            .filter(
                Condition::any()
                    .add(animals::Column::Genotype.eq("N.D."))
                    .add(animals::Column::Genotype.eq(""))
                    .add(animals::Column::Genotype.contains("?")),
            )
            .filter(animals::Column::Born.lt(cutoff(today, config.genotype_age_days))),
        TodoList::Wean => alive
            .filter(animals::Column::Weaned.is_null())
            .filter(animals::Column::Born.lt(cutoff(today, config.wean_age_days)))
            .order_by_asc(animals::Column::StrainId)
            .order_by_asc(animals::Column::Background)
            .order_by_asc(animals::Column::Rack)
            .order_by_asc(animals::Column::Cage),
        TodoList::NoCage => alive.filter(animals::Column::Cage.is_null()),
        TodoList::NoRack => alive.filter(
            Condition::any()
                .add(animals::Column::Rack.is_null())
                .add(animals::Column::Rack.eq("")),
        ),
    };
    let models = query
        .order_by_asc(animals::Column::StrainId)
        .order_by_asc(animals::Column::EarTag)
        .order_by_asc(animals::Column::Id)
        .all(db)
        .await?;
    display_all(db, models).await
}

pub async fn todo_lists<C: ConnectionTrait>(db: &C, config: &Config) -> Result<TodoLists, DbErr> {
    Ok(TodoLists {
        eartag: todo(db, config, TodoList::Eartag).await?,
        genotype: todo(db, config, TodoList::Genotype).await?,
        wean: todo(db, config, TodoList::Wean).await?,
        no_cage: todo(db, config, TodoList::NoCage).await?,
        no_rack: todo(db, config, TodoList::NoRack).await?,
    })
}

pub async fn birth_archive<C: ConnectionTrait>(db: &C) -> Result<Vec<YearCount>, DbErr> {
    let births: Vec<NaiveDate> = animals::Entity::find()
        .select_only()
        .column(animals::Column::Born)
        .filter(animals::Column::Born.is_not_null())
        .into_tuple()
        .all(db)
        .await?;
    Ok(births_per_year(&births, today().year()))
}

/// Animals born in `[start, end)`, oldest first
pub async fn born_between<C: ConnectionTrait>(
    db: &C,
    (start, end): (NaiveDate, NaiveDate),
) -> Result<Vec<Animal>, DbErr> {
    let models = animals::Entity::find()
        .filter(animals::Column::Born.gte(start))
        .filter(animals::Column::Born.lt(end))
        .order_by_asc(animals::Column::Born)
        .order_by_asc(animals::Column::Id)
        .all(db)
        .await?;
    display_all(db, models).await
}

/// Every strain with its number of alive animals
pub async fn strain_counts<C: ConnectionTrait>(db: &C) -> Result<Vec<StrainCount>, DbErr> {
    let alive: Vec<Uuid> = animals::Entity::find()
        .select_only()
        .column(animals::Column::StrainId)
        .filter(animals::Column::Alive.eq(true))
        .into_tuple()
        .all(db)
        .await?;
    let mut per_strain: HashMap<Uuid, u64> = HashMap::new();
    for strain_id in alive {
        *per_strain.entry(strain_id).or_default() += 1;
    }

    Ok(strains::Entity::find()
        .order_by_asc(strains::Column::Name)
        .all(db)
        .await?
        .into_iter()
        .map(|strain| StrainCount {
            alive: per_strain.get(&strain.id).copied().unwrap_or(0),
            id: strain.id,
            name: strain.name,
            slug: strain.slug,
        })
        .collect())
}

pub async fn strain_overview<C: ConnectionTrait>(db: &C, slug: &str, all: bool) -> Result<StrainOverview, DbErr> {
    let strain = strains::find_by_slug(db, slug).await?;

    let mut breeding_query = breedings::Entity::find().filter(breedings::Column::StrainId.eq(strain.id));
    if !all {
        breeding_query = breeding_query.filter(breedings::Column::Active.eq(true));
    }
    let breeding_models = breeding_query
        .order_by_desc(breedings::Column::StartDate)
        .order_by_asc(breedings::Column::Id)
        .all(db)
        .await?;

    let mut animal_query = animals::Entity::find().filter(animals::Column::StrainId.eq(strain.id));
    if !all {
        animal_query = animal_query.filter(animals::Column::Alive.eq(true));
    }
    let animal_models = animal_query
        .order_by_asc(animals::Column::Background)
        .order_by_asc(animals::Column::Genotype)
        .order_by_asc(animals::Column::EarTag)
        .order_by_asc(animals::Column::Id)
        .all(db)
        .await?;

    let animals = display_all(db, animal_models).await?;
    Ok(StrainOverview {
        cages: group_cages(&animals),
        breedings: describe_all(db, breeding_models).await?,
        animals,
        strain: Strain::from(strain),
    })
}

/// Animals of the strain bred in cages of the given cross type
pub async fn cross_progeny<C: ConnectionTrait>(db: &C, slug: &str, cross: CrossType) -> Result<Vec<Animal>, DbErr> {
    let strain = strains::find_by_slug(db, slug).await?;
    let breeding_ids: Vec<Uuid> = breedings::Entity::find()
        .select_only()
        .column(breedings::Column::Id)
        .filter(breedings::Column::CrossType.eq(cross))
        .into_tuple()
        .all(db)
        .await?;
    if breeding_ids.is_empty() {
        return Ok(vec![]);
    }

    let models = animals::Entity::find()
        .filter(animals::Column::StrainId.eq(strain.id))
        .filter(animals::Column::BreedingId.is_in(breeding_ids))
        .order_by_asc(animals::Column::Born)
        .order_by_asc(animals::Column::EarTag)
        .order_by_asc(animals::Column::Id)
        .all(db)
        .await?;
    display_all(db, models).await
}

/// Occupied cages, restricted to alive animals unless `all`
pub async fn cages<C: ConnectionTrait>(db: &C, all: bool) -> Result<Vec<CageOccupancy>, DbErr> {
    let mut query = animals::Entity::find().filter(animals::Column::Cage.is_not_null());
    if !all {
        query = query.filter(animals::Column::Alive.eq(true));
    }
    let animals = display_all(db, query.all(db).await?).await?;
    Ok(group_cages(&animals))
}

pub async fn cage_animals<C: ConnectionTrait>(db: &C, cage: i32) -> Result<Vec<Animal>, DbErr> {
    let models = animals::Entity::find()
        .filter(animals::Column::Cage.eq(cage))
        .order_by_desc(animals::Column::Alive)
        .order_by_asc(animals::Column::EarTag)
        .order_by_asc(animals::Column::Id)
        .all(db)
        .await?;
    display_all(db, models).await
}

/// Breeding cages whose cage field contains `query`; nothing for a blank query
pub async fn search_breedings<C: ConnectionTrait>(db: &C, query: &str) -> Result<Vec<Breeding>, DbErr> {
    let query = query.trim();
    if query.is_empty() {
        return Ok(vec![]);
    }
    let models = breedings::Entity::find()
        .filter(breedings::Column::Cage.contains(query))
        .order_by_desc(breedings::Column::Active)
        .order_by_desc(breedings::Column::StartDate)
        .order_by_asc(breedings::Column::Id)
        .all(db)
        .await?;
    describe_all(db, models).await
}

pub async fn breedings_of_kind<C: ConnectionTrait>(db: &C, kind: BreedingKind) -> Result<Vec<Breeding>, DbErr> {
    let query = match kind {
        BreedingKind::Active => breedings::Entity::find().filter(breedings::Column::Active.eq(true)),
        BreedingKind::All => breedings::Entity::find(),
        BreedingKind::TimedMating => {
            breedings::Entity::find().filter(breedings::Column::TimedMating.eq(true))
        }
    };
    let models = query
        .order_by_desc(breedings::Column::StartDate)
        .order_by_asc(breedings::Column::Id)
        .all(db)
        .await?;
    describe_all(db, models).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_cutoff() {
        assert_eq!(cutoff(date(2024, 3, 22), 21), date(2024, 3, 1));
    }

    #[test]
    fn test_births_per_year_fills_gaps() {
        let births = [date(2021, 5, 1), date(2021, 6, 1), date(2023, 1, 9)];
        assert_eq!(
            births_per_year(&births, 2024),
            vec![
                YearCount { year: 2021, count: 2 },
                YearCount { year: 2022, count: 0 },
                YearCount { year: 2023, count: 1 },
                YearCount { year: 2024, count: 0 },
            ]
        );
    }

    #[test]
    fn test_births_per_year_empty() {
        assert!(births_per_year(&[], 2024).is_empty());
    }

    #[rstest]
    #[case(2024, 1, Some((date(2024, 1, 1), date(2024, 2, 1))))]
    #[case(2024, 12, Some((date(2024, 12, 1), date(2025, 1, 1))))]
    #[case(2024, 0, None)]
    #[case(2024, 13, None)]
    fn test_month_range(
        #[case] year: i32,
        #[case] month: u32,
        #[case] expected: Option<(NaiveDate, NaiveDate)>,
    ) {
        assert_eq!(month_range(year, month), expected);
    }

    #[test]
    fn test_year_range() {
        assert_eq!(year_range(2023), Some((date(2023, 1, 1), date(2024, 1, 1))));
    }

    #[rstest]
    #[case("eartag", Some(TodoList::Eartag))]
    #[case("no_rack", Some(TodoList::NoRack))]
    #[case("feeding", None)]
    fn test_todo_list_names(#[case] name: &str, #[case] expected: Option<TodoList>) {
        assert_eq!(TodoList::from_name(name), expected);
    }
}
