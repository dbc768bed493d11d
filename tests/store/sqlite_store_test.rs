#[cfg(test)]
mod tests {
    use modelsql::model::{DataRow, Dataset, DiscoveredTable, Value};
    use modelsql::store::{RelationalStore, SqliteStore, StoreError, SAMPLE_VALUE_LIMIT};

    fn countries() -> Vec<DataRow> {
        vec![
            DataRow::new()
                .with("country_code", "US")
                .with("country_name", "United States"),
            DataRow::new()
                .with("country_code", "FR")
                .with("country_name", "France"),
        ]
    }

    #[tokio::test]
    async fn test_discover_tables_in_creation_order() {
        let store = SqliteStore::open_in_memory().unwrap();
        let dataset = Dataset::new()
            .with_table("jobs", vec![DataRow::new().with("id", 1i64).with("title", "Engineer")])
            .with_table("countries", countries());
        store.reset_and_load(&dataset).await.unwrap();

        assert_eq!(
            store.discover_tables().await.unwrap(),
            vec![
                DiscoveredTable::new("jobs", ["id", "title"]),
                DiscoveredTable::new("countries", ["country_code", "country_name"]),
            ]
        );
    }

    #[tokio::test]
    async fn test_reset_and_load_replaces_existing_tables() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.load_table("old", &countries()).await.unwrap();

        let dataset = Dataset::new()
            .with_table("countries", countries())
            .with_table("empty", Vec::new());
        store.reset_and_load(&dataset).await.unwrap();

        let names: Vec<String> = store
            .discover_tables()
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(names, vec!["countries".to_string()]);
    }

    #[tokio::test]
    async fn test_rows_keep_result_column_order() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.load_table("countries", &countries()).await.unwrap();

        let rows = store
            .execute_query("SELECT country_name, country_code FROM countries ORDER BY country_code")
            .await
            .unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[0].columns().collect::<Vec<_>>(),
            vec!["country_name", "country_code"]
        );
        assert_eq!(rows[0].get("country_name"), Some(&Value::from("France")));
        assert_eq!(
            serde_json::to_string(&rows[1]).unwrap(),
            r#"{"country_name":"United States","country_code":"US"}"#
        );
    }

    #[tokio::test]
    async fn test_numeric_columns_compare_numerically() {
        let store = SqliteStore::open_in_memory().unwrap();
        let rows = [9i64, 10, 100]
            .into_iter()
            .map(|n| DataRow::new().with("n", n))
            .collect::<Vec<_>>();
        store.load_table("numbers", &rows).await.unwrap();

        let found = store
            .execute_query("SELECT n FROM numbers WHERE n > 50")
            .await
            .unwrap();
        assert_eq!(found, vec![DataRow::new().with("n", 100i64)]);
    }

    #[tokio::test]
    async fn test_engine_errors_carry_the_message() {
        let store = SqliteStore::open_in_memory().unwrap();
        let err = store.execute_query("SELECT * FROM missing").await.unwrap_err();

        assert!(matches!(err, StoreError::Sqlite(_)));
        assert!(err.to_string().contains("no such table: missing"), "{}", err);
    }

    #[tokio::test]
    async fn test_sample_values_are_distinct_non_null_and_capped() {
        let store = SqliteStore::open_in_memory().unwrap();
        let mut rows: Vec<DataRow> = (0..60)
            .map(|i| DataRow::new().with("city", format!("city {}", i)))
            .collect();
        rows.push(DataRow::new().with("city", Value::Null));
        rows.push(DataRow::new().with("city", "city 0"));
        store.load_table("places", &rows).await.unwrap();

        let samples = store.fetch_sample_values("places", "city").await.unwrap();
        assert_eq!(samples.len(), SAMPLE_VALUE_LIMIT);
        assert!(samples.iter().all(|s| s.starts_with("city ")));

        let mut unique = samples.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), samples.len());
    }

    #[tokio::test]
    async fn test_sample_values_render_numbers_as_strings() {
        let store = SqliteStore::open_in_memory().unwrap();
        let rows = vec![
            DataRow::new().with("score", 1.5),
            DataRow::new().with("score", 1.5),
            DataRow::new().with("score", 2.0),
        ];
        store.load_table("scores", &rows).await.unwrap();

        let mut samples = store.fetch_sample_values("scores", "score").await.unwrap();
        samples.sort();
        assert_eq!(samples, vec!["1.5".to_string(), "2".to_string()]);
    }

    #[tokio::test]
    async fn test_file_backed_store_persists() {
        let path = std::env::temp_dir().join(format!("modelsql-{}.db", uuid::Uuid::new_v4()));

        {
            let store = SqliteStore::open(&path).unwrap();
            store.load_table("countries", &countries()).await.unwrap();
        }

        let reopened = SqliteStore::open(&path).unwrap();
        let tables = reopened.discover_tables().await.unwrap();
        assert_eq!(tables.len(), 1);
        assert!(tables[0].has_field("country_name"));

        drop(reopened);
        std::fs::remove_file(&path).unwrap();
    }
}
