//! Shared jobs/countries/sources data set.
#![allow(dead_code)]

use modelsql::model::{DataRow, Dataset, Join, JoinType, ModelConfiguration};
use modelsql::store::SqliteStore;

fn job(
    id: i64,
    title: &str,
    country_code: &str,
    language: &str,
    seniority: &str,
    total_jobs: i64,
    source_id: i64,
) -> DataRow {
    DataRow::new()
        .with("id", id)
        .with("title", title)
        .with("country_code", country_code)
        .with("language", language)
        .with("seniority", seniority)
        .with("total_jobs", total_jobs)
        .with("source_id", source_id)
}

pub fn dataset() -> Dataset {
    Dataset::new()
        .with_table(
            "jobs",
            vec![
                job(1, "Engineer", "US", "en", "junior", 10, 1),
                job(2, "Analyst", "US", "en", "senior", 5, 2),
                job(3, "Engineer", "FR", "fr", "senior", 7, 1),
                job(4, "Designer", "DE", "de", "junior", 3, 2),
                job(5, "O'Neil Dev", "US", "en", "senior", 2, 1),
            ],
        )
        .with_table(
            "countries",
            vec![
                DataRow::new()
                    .with("country_code", "US")
                    .with("country_name", "United States"),
                DataRow::new()
                    .with("country_code", "FR")
                    .with("country_name", "France"),
                DataRow::new()
                    .with("country_code", "DE")
                    .with("country_name", "Germany"),
            ],
        )
        .with_table(
            "sources",
            vec![
                DataRow::new().with("id", 1i64).with("source_name", "LinkedIn"),
                DataRow::new().with("id", 2i64).with("source_name", "Indeed"),
            ],
        )
}

pub async fn seeded_store() -> SqliteStore {
    let store = SqliteStore::open_in_memory().unwrap();
    store.reset_and_load(&dataset()).await.unwrap();
    store
}

pub fn jobs_fields() -> Vec<&'static str> {
    vec!["id", "title", "country_code", "language", "seniority", "total_jobs", "source_id"]
}

pub fn jobs_and_countries() -> ModelConfiguration {
    ModelConfiguration::new()
        .with_table("jobs", jobs_fields())
        .with_table("countries", ["country_code", "country_name"])
}

pub fn country_join() -> Join {
    Join::new(
        "jobs",
        "countries",
        JoinType::Left,
        ("country_code", "country_code"),
    )
}

pub fn source_join() -> Join {
    Join::new("jobs", "sources", JoinType::Left, ("source_id", "id"))
}
