use crate::animals::models::{Animal, Background};
use crate::breedings::models::Breeding;
use crate::strains::models::Strain;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Debug, Serialize, ToSchema, PartialEq, Eq)]
pub struct Totals {
    pub all: u64,
    /// Restricted to alive animals
    pub current: u64,
}

#[derive(Serialize, ToSchema)]
pub struct ColonySummary {
    pub animals: Totals,
    pub strains: Totals,
    pub cages: Totals,
}

/// Husbandry lists of alive animals needing attention
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TodoList {
    /// Old enough to be weaned but no ear tag yet
    Eartag,
    Genotype,
    Wean,
    NoCage,
    NoRack,
}

impl TodoList {
    pub const ALL: [TodoList; 5] = [
        TodoList::Eartag,
        TodoList::Genotype,
        TodoList::Wean,
        TodoList::NoCage,
        TodoList::NoRack,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TodoList::Eartag => "eartag",
            TodoList::Genotype => "genotype",
            TodoList::Wean => "wean",
            TodoList::NoCage => "no_cage",
            TodoList::NoRack => "no_rack",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|list| list.name() == name)
    }
}

#[derive(Serialize, ToSchema)]
pub struct TodoLists {
    pub eartag: Vec<Animal>,
    pub genotype: Vec<Animal>,
    pub wean: Vec<Animal>,
    pub no_cage: Vec<Animal>,
    pub no_rack: Vec<Animal>,
}

#[derive(Debug, Serialize, ToSchema, PartialEq, Eq)]
pub struct YearCount {
    pub year: i32,
    pub count: u64,
}

#[derive(Serialize, ToSchema)]
pub struct StrainCount {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub alive: u64,
}

#[derive(Serialize, ToSchema)]
pub struct StrainOverview {
    pub strain: Strain,
    pub breedings: Vec<Breeding>,
    /// Ordered by background, then genotype
    pub animals: Vec<Animal>,
    pub cages: Vec<CageOccupancy>,
}

/// One cage number as seen from the animals housed in it
#[derive(Debug, Serialize, ToSchema, PartialEq, Eq)]
pub struct CageOccupancy {
    pub cage: i32,
    pub strain: Option<String>,
    pub background: Background,
    pub rack: Option<String>,
    pub rack_position: Option<String>,
    pub animals: u64,
}

#[derive(Deserialize, IntoParams)]
pub struct ShowAll {
    /// Include dead animals and inactive breeding cages
    #[serde(default)]
    pub all: bool,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BreedingKind {
    #[default]
    Active,
    All,
    TimedMating,
}

#[derive(Deserialize, IntoParams)]
pub struct BreedingFilter {
    #[serde(default)]
    pub kind: BreedingKind,
}

#[derive(Deserialize, IntoParams)]
pub struct BreedingSearch {
    /// Part of a breeding cage number
    #[serde(default)]
    pub q: String,
}
