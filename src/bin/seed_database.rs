//! MouseDB Database Seeder
//!
//! A terminal application that fills a running MouseDB API with a realistic
//! colony: strains, researchers, husbandry parameters, breeding cages with
//! litters, experiments with body weight measurements and a few veterinary
//! records.
//!
//! Usage:
//!   `cargo run --bin seed_database -- --url http://localhost:3000 --token YOUR_JWT_TOKEN`

use chrono::{Duration as ChronoDuration, NaiveDate, Utc};
use clap::{Arg, Command};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use rand::Rng;
use rand::seq::IndexedRandom;
use reqwest::{Client, Method};
use serde_json::{Value, json};
use tokio::time::Duration;

type SeedResult<T> = Result<T, Box<dyn std::error::Error>>;

const STRAINS: [(&str, &str); 4] = [
    ("C57BL/6J", "Jackson Laboratory"),
    ("Leptin Knockout", "Jackson Laboratory"),
    ("Leptin Receptor Knockout", "Jackson Laboratory"),
    ("Raptor Muscle Knockout", "Bred in house"),
];
const GENOTYPES: [&str; 4] = ["+/+", "+/-", "-/-", "N.D."];
const BACKGROUNDS: [&str; 3] = ["C57BL/6-BA", "C57BL/6-LY5.2", "Mixed"];
const CROSS_TYPES: [&str; 3] = ["WT vs HET", "HET vs HET", "KO vs HET"];

#[derive(Debug, Default)]
pub struct CreatedObjects {
    pub strains: Vec<Value>,
    pub researchers: Vec<Value>,
    pub diets: Vec<Value>,
    pub breedings: Vec<Value>,
    pub animals: Vec<Value>,
    pub experiments: Vec<Value>,
    pub measurements: Vec<Value>,
    pub medical_records: Vec<Value>,
}

pub struct DatabaseSeeder {
    base_url: String,
    jwt_token: String,
    client: Client,
    created_objects: CreatedObjects,
}

fn progress_bar(len: usize) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);
    if let Ok(bar_style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos:>7}/{len:7} {msg}")
    {
        pb.set_style(bar_style.progress_chars("##-"));
    }
    pb
}

fn id_of(record: &Value) -> SeedResult<String> {
    record["id"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| format!("Record without id: {record}").into())
}

/// Birth date between `min_days` and `max_days` ago
fn random_birth(rng: &mut impl Rng, min_days: i64, max_days: i64) -> NaiveDate {
    Utc::now().date_naive() - ChronoDuration::days(rng.random_range(min_days..=max_days))
}

impl DatabaseSeeder {
    pub fn new(base_url: String, jwt_token: String) -> SeedResult<Self> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            jwt_token,
            client,
            created_objects: CreatedObjects::default(),
        })
    }

    async fn request(&self, method: Method, endpoint: &str, data: Option<Value>) -> SeedResult<Value> {
        let url = format!("{}/api{}", self.base_url, endpoint);
        let mut request = self
            .client
            .request(method, &url)
            .header("authorization", format!("Bearer {}", self.jwt_token));
        if let Some(json_data) = data {
            request = request.json(&json_data);
        }
        let response = request.send().await?;

        if response.status().is_success() {
            Ok(response.json::<Value>().await?)
        } else {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            Err(format!("HTTP {status} {endpoint}: {error_text}").into())
        }
    }

    async fn post(&self, endpoint: &str, data: Value) -> SeedResult<Value> {
        self.request(Method::POST, endpoint, Some(data)).await
    }

    pub async fn test_connection(&self) -> SeedResult<()> {
        let response = self
            .client
            .get(format!("{}/healthz", self.base_url))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(format!("API health check returned {}", response.status()).into());
        }
        Ok(())
    }

    pub async fn create_strains(&mut self) -> SeedResult<()> {
        println!("{} Creating strains...", style("[1/6]").bold().dim());
        let pb = progress_bar(STRAINS.len());
        for (name, source) in STRAINS {
            pb.set_message(format!("Creating: {name}"));
            let strain = self
                .post("/strains", json!({"name": name, "source": source}))
                .await?;
            self.created_objects.strains.push(strain);
            pb.inc(1);
        }
        pb.finish_with_message("Strains created!");
        Ok(())
    }

    pub async fn create_parameters(&mut self) -> SeedResult<()> {
        println!(
            "{} Creating researchers and husbandry parameters...",
            style("[2/6]").bold().dim()
        );
        for (first_name, last_name) in [("Erin", "Stephenson"), ("Innocence", "Harvey"), ("Dave", "Bridges")] {
            let researcher = self
                .post(
                    "/researchers",
                    json!({
                        "first_name": first_name,
                        "last_name": last_name,
                        "email": format!("{}@example.org", first_name.to_lowercase()),
                    }),
                )
                .await?;
            self.created_objects.researchers.push(researcher);
        }

        let vendor = self
            .post(
                "/vendors",
                json!({"name": "Research Diets", "website": "https://www.researchdiets.com"}),
            )
            .await?;
        let vendor_id = id_of(&vendor)?;
        for (description, product_id, fat) in [("Normal Chow", "5L0D", 13), ("High Fat Diet", "D12492", 60)] {
            let diet = self
                .post(
                    "/diets",
                    json!({
                        "vendor_id": vendor_id,
                        "description": description,
                        "product_id": product_id,
                        "fat_content": fat,
                        "irradiated": false,
                    }),
                )
                .await?;
            self.created_objects.diets.push(diet);
        }
        println!(
            "{} Created {} researchers and {} diets",
            style("✓").green(),
            self.created_objects.researchers.len(),
            self.created_objects.diets.len()
        );
        Ok(())
    }

    /// Founder animals in batches, then one breeding cage per strain with a litter
    pub async fn create_colony(&mut self, animals_per_strain: u32) -> SeedResult<()> {
        println!("{} Creating the colony...", style("[3/6]").bold().dim());
        let strains = self.created_objects.strains.clone();
        let pb = progress_bar(strains.len());
        let mut cage = 100;

        for strain in &strains {
            let strain_id = id_of(strain)?;
            pb.set_message(format!("Strain: {}", strain["name"].as_str().unwrap_or_default()));
            let (background, genotype, founder_birth, cross_type) = {
                let mut rng = rand::rng();
                (
                    BACKGROUNDS.choose(&mut rng).copied().unwrap_or("Mixed"),
                    GENOTYPES.choose(&mut rng).copied().unwrap_or("N.D."),
                    random_birth(&mut rng, 90, 400),
                    CROSS_TYPES.choose(&mut rng).copied().unwrap_or("HET vs HET"),
                )
            };

            let mut female_ids = Vec::new();
            let mut male_ids = Vec::new();
            for gender in ["F", "M"] {
                cage += 1;
                let batch = self
                    .post(
                        "/animals/batch",
                        json!({
                            "count": animals_per_strain.div_ceil(2),
                            "animal": {
                                "strain_id": strain_id,
                                "background": background,
                                "genotype": genotype,
                                "gender": gender,
                                "born": founder_birth,
                                "weaned": founder_birth + ChronoDuration::days(21),
                                "cage": cage,
                                "rack": "A",
                            },
                        }),
                    )
                    .await?;
                if let Some(animals) = batch.as_array() {
                    // The first animal of each batch becomes a breeder
                    if let Some(breeder) = animals.first() {
                        let ids = if gender == "F" { &mut female_ids } else { &mut male_ids };
                        ids.push(id_of(breeder)?);
                    }
                    self.created_objects.animals.extend(animals.iter().cloned());
                }
            }

            cage += 1;
            let breeding = self
                .post(
                    "/breedings",
                    json!({
                        "strain_id": strain_id,
                        "cage": cage.to_string(),
                        "rack": "B",
                        "start_date": founder_birth + ChronoDuration::days(60),
                        "cross_type": cross_type,
                        "background": background,
                        "genotype": genotype,
                        "timed_mating": false,
                        "female_ids": female_ids,
                        "male_ids": male_ids,
                    }),
                )
                .await?;

            let litter_size = rand::rng().random_range(4..=9);
            let pups = self
                .post(
                    &format!("/breedings/{}/pups", id_of(&breeding)?),
                    json!({
                        "count": litter_size,
                        "gender": "N.D.",
                        "born": Utc::now().date_naive() - ChronoDuration::days(10),
                    }),
                )
                .await?;
            if let Some(pups) = pups.as_array() {
                self.created_objects.animals.extend(pups.iter().cloned());
            }
            self.created_objects.breedings.push(breeding);
            pb.inc(1);
        }
        pb.finish_with_message("Colony created!");
        Ok(())
    }

    pub async fn create_experiments(&mut self) -> SeedResult<()> {
        println!(
            "{} Creating experiments and body weights...",
            style("[4/6]").bold().dim()
        );
        let assay = self
            .post(
                "/assays",
                json!({"name": "Body Weight", "measurement_units": "g"}),
            )
            .await?;
        let assay_id = id_of(&assay)?;
        let researcher_ids: Vec<String> = self
            .created_objects
            .researchers
            .iter()
            .take(1)
            .filter_map(|r| id_of(r).ok())
            .collect();
        let adults: Vec<String> = self
            .created_objects
            .animals
            .iter()
            .filter(|animal| !animal["weaned"].is_null())
            .filter_map(|animal| id_of(animal).ok())
            .collect();

        let weeks = 4;
        let pb = progress_bar(weeks);
        for week in 0..weeks {
            let date = Utc::now().date_naive() - ChronoDuration::weeks(i64::try_from(weeks - week)?);
            let experiment = self
                .post(
                    "/experiments",
                    json!({
                        "date": date,
                        "time": "09:00",
                        "feeding_state": "fed",
                        "researcher_ids": researcher_ids,
                    }),
                )
                .await?;
            let measurements: Vec<Value> = {
                let mut rng = rand::rng();
                adults
                    .iter()
                    .map(|animal_id| {
                        json!({
                            "animal_id": animal_id,
                            "assay_id": assay_id,
                            "values": format!("{:.1}", rng.random_range(18.0..45.0)),
                        })
                    })
                    .collect()
            };
            let created = self
                .post(
                    &format!("/experiments/{}/measurements", id_of(&experiment)?),
                    json!({"measurements": measurements}),
                )
                .await?;
            if let Some(created) = created.as_array() {
                self.created_objects.measurements.extend(created.iter().cloned());
            }
            self.created_objects.experiments.push(experiment);
            pb.inc(1);
        }
        pb.finish_with_message("Experiments created!");
        Ok(())
    }

    pub async fn create_study(&mut self) -> SeedResult<()> {
        println!("{} Creating a study...", style("[5/6]").bold().dim());
        let strain_ids: Vec<String> = self
            .created_objects
            .strains
            .iter()
            .filter_map(|s| id_of(s).ok())
            .collect();
        self.post(
            "/studies",
            json!({
                "description": "High fat diet induced insulin resistance",
                "start_date": Utc::now().date_naive() - ChronoDuration::weeks(4),
                "strain_ids": strain_ids,
            }),
        )
        .await?;
        Ok(())
    }

    pub async fn create_medical_records(&mut self) -> SeedResult<()> {
        println!("{} Creating veterinary records...", style("[6/6]").bold().dim());
        let condition = self
            .post(
                "/medical_conditions",
                json!({"name": "Malocclusion", "notes": "Overgrown incisors"}),
            )
            .await?;
        let treatment = self
            .post("/medical_treatments", json!({"name": "Teeth trimming"}))
            .await?;
        if let Some(animal) = self.created_objects.animals.first() {
            let issue = self
                .post(
                    "/medical_issues",
                    json!({
                        "animal_id": id_of(animal)?,
                        "condition_id": id_of(&condition)?,
                        "treatment_id": id_of(&treatment)?,
                        "diagnosis": Utc::now().date_naive() - ChronoDuration::days(3),
                    }),
                )
                .await?;
            self.created_objects.medical_records.push(issue);
        }
        Ok(())
    }

    pub async fn seed_database(&mut self, animals_per_strain: u32) -> SeedResult<()> {
        println!();
        println!("{}", style("MouseDB Database Seeder").bold().blue());
        println!("{}", style("Creating a realistic mouse colony...").dim());
        println!();

        self.test_connection().await?;
        self.create_strains().await?;
        self.create_parameters().await?;
        self.create_colony(animals_per_strain).await?;
        self.create_experiments().await?;
        self.create_study().await?;
        self.create_medical_records().await?;

        self.display_summary();
        Ok(())
    }

    fn display_summary(&self) {
        println!();
        println!("{}", style("Database Seeding Complete!").bold().green());
        println!("{}", style("═".repeat(50)).dim());

        let summary_data = [
            ("Strains", self.created_objects.strains.len()),
            ("Researchers", self.created_objects.researchers.len()),
            ("Diets", self.created_objects.diets.len()),
            ("Breeding cages", self.created_objects.breedings.len()),
            ("Animals", self.created_objects.animals.len()),
            ("Experiments", self.created_objects.experiments.len()),
            ("Measurements", self.created_objects.measurements.len()),
            ("Medical issues", self.created_objects.medical_records.len()),
        ];
        for (name, count) in summary_data {
            if count > 0 {
                println!("{:.<20} {}", style(name).cyan(), style(count).bold().green());
            }
        }
        println!();
    }
}

#[tokio::main]
async fn main() -> SeedResult<()> {
    let matches = Command::new("MouseDB Database Seeder")
        .version("1.0")
        .about("Seeds the MouseDB API with a realistic mouse colony")
        .arg(
            Arg::new("url")
                .short('u')
                .long("url")
                .value_name("URL")
                .help("API base URL")
                .default_value("http://localhost:3000"),
        )
        .arg(
            Arg::new("token")
                .short('t')
                .long("token")
                .value_name("JWT_TOKEN")
                .help("JWT authentication token")
                .required(true),
        )
        .arg(
            Arg::new("animals")
                .short('n')
                .long("animals")
                .value_name("COUNT")
                .help("Founder animals per strain")
                .value_parser(clap::value_parser!(u32).range(2..=100))
                .default_value("10"),
        )
        .get_matches();

    let base_url = matches
        .get_one::<String>("url")
        .cloned()
        .unwrap_or_default();
    let jwt_token = matches
        .get_one::<String>("token")
        .cloned()
        .unwrap_or_default();
    let animals_per_strain = matches.get_one::<u32>("animals").copied().unwrap_or(10);

    println!("{}", style("MouseDB Database Seeder v1.0").bold());
    println!("{}", style("━".repeat(40)).dim());
    println!("API URL: {}", style(&base_url).cyan());
    println!(
        "Token:   {}...{}",
        style("*".repeat(8)).dim(),
        style(&jwt_token[jwt_token.len().saturating_sub(8)..]).dim()
    );

    let mut seeder = DatabaseSeeder::new(base_url, jwt_token)?;
    seeder.seed_database(animals_per_strain).await?;

    Ok(())
}
