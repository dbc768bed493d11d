mod fixtures;

#[cfg(test)]
mod tests {
    use super::fixtures::{country_join, jobs_and_countries, jobs_fields, seeded_store, source_join};
    use modelsql::compiler::{generate_query, QueryCompiler, QueryRequest};
    use modelsql::model::{
        Aggregation, DiscoveredTable, FieldAliases, Filter, FilterOperator, ModelConfiguration,
        PivotConfig, PivotValue, Value,
    };
    use modelsql::sql::Dialect;
    use modelsql::store::{RelationalStore, SqliteStore};

    fn store() -> SqliteStore {
        SqliteStore::open_in_memory().unwrap()
    }

    #[tokio::test]
    async fn test_grouped_by_row_with_named_sum() {
        let request = QueryRequest::new(jobs_and_countries())
            .with_joins(vec![country_join()])
            .with_pivot(
                PivotConfig::new()
                    .with_rows(["country_name"])
                    .with_value(PivotValue::new("total_jobs", Aggregation::Sum).named("Total Jobs")),
            );

        let sql = generate_query(&request, &store()).await.unwrap().unwrap();
        insta::assert_snapshot!(sql, @r#"SELECT "countries"."country_name" AS "country_name", SUM("jobs"."total_jobs") AS "Total Jobs" FROM "jobs" LEFT JOIN "countries" ON "jobs"."country_code" = "countries"."country_code" GROUP BY "countries"."country_name""#);
    }

    #[tokio::test]
    async fn test_filter_sits_between_from_and_group_by() {
        let request = QueryRequest::new(jobs_and_countries())
            .with_joins(vec![country_join()])
            .with_pivot(PivotConfig::new().with_rows(["country_name"]))
            .with_filters(vec![Filter::new("language", FilterOperator::Equals, "en")]);

        let sql = generate_query(&request, &store()).await.unwrap().unwrap();
        assert_eq!(
            sql,
            concat!(
                r#"SELECT "countries"."country_name" AS "country_name" "#,
                r#"FROM "jobs" LEFT JOIN "countries" ON "jobs"."country_code" = "countries"."country_code" "#,
                r#"WHERE "jobs"."language" = 'en' "#,
                r#"GROUP BY "countries"."country_name""#
            )
        );
    }

    #[tokio::test]
    async fn test_columns_without_values_is_not_a_pivot() {
        let request = QueryRequest::new(jobs_and_countries())
            .with_joins(vec![country_join()])
            .with_pivot(
                PivotConfig::new()
                    .with_rows(["country_name"])
                    .with_columns(["seniority"]),
            );

        // The store is empty, so a distinct-value lookup would fail.
        let sql = generate_query(&request, &store()).await.unwrap().unwrap();
        assert!(!sql.contains("seniority"), "{}", sql);
        assert!(sql.ends_with(r#"GROUP BY "countries"."country_name""#));
    }

    #[tokio::test]
    async fn test_ambiguous_field_resolves_to_first_table() {
        let model = ModelConfiguration::new()
            .with_table("jobs", jobs_fields())
            .with_table("sources", ["id", "source_name"]);
        let catalog = vec![
            DiscoveredTable::new("sources", ["id", "source_name"]),
            DiscoveredTable::new("jobs", jobs_fields()),
        ];
        let request = QueryRequest::new(model)
            .with_joins(vec![source_join()])
            .with_catalog(catalog)
            .with_pivot(PivotConfig::new().with_value(PivotValue::new("id", Aggregation::Count)));

        let sql = generate_query(&request, &store()).await.unwrap().unwrap();
        assert!(
            sql.starts_with(r#"SELECT COUNT("jobs"."id") AS "COUNT_of_id" FROM "jobs""#),
            "{}",
            sql
        );
    }

    #[tokio::test]
    async fn test_multi_join_keeps_declaration_and_request_order() {
        let model = jobs_and_countries().with_table("sources", ["id", "source_name"]);
        let request = QueryRequest::new(model)
            .with_joins(vec![country_join(), source_join()])
            .with_pivot(
                PivotConfig::new()
                    .with_rows(["source_name", "country_name"])
                    .with_value(PivotValue::new("total_jobs", Aggregation::Sum)),
            );

        let sql = generate_query(&request, &store()).await.unwrap().unwrap();
        insta::assert_snapshot!(sql, @r#"SELECT "sources"."source_name" AS "source_name", "countries"."country_name" AS "country_name", SUM("jobs"."total_jobs") AS "SUM_of_total_jobs" FROM "jobs" LEFT JOIN "countries" ON "jobs"."country_code" = "countries"."country_code" LEFT JOIN "sources" ON "jobs"."source_id" = "sources"."id" GROUP BY "sources"."source_name", "countries"."country_name""#);
    }

    #[tokio::test]
    async fn test_flat_selection_explicit_empty_vs_unspecified() {
        let model = ModelConfiguration::new().with_table("countries", ["country_code", "country_name"]);

        let explicit = QueryRequest::new(model.clone()).with_selected_fields(Vec::<String>::new());
        assert_eq!(generate_query(&explicit, &store()).await.unwrap(), None);

        let unspecified = QueryRequest::new(model);
        assert_eq!(
            generate_query(&unspecified, &store()).await.unwrap().as_deref(),
            Some(
                r#"SELECT "countries"."country_code" AS "country_code", "countries"."country_name" AS "country_name" FROM "countries""#
            )
        );
    }

    #[tokio::test]
    async fn test_flat_selection_filters_to_model_and_applies_aliases() {
        let request = QueryRequest::new(jobs_and_countries())
            .with_joins(vec![country_join()])
            .with_selected_fields(["country_name", "salary", "title"])
            .with_aliases(FieldAliases::new().with_alias("jobs", "title", "Job Title"));

        let sql = generate_query(&request, &store()).await.unwrap().unwrap();
        assert!(
            sql.starts_with(
                r#"SELECT "countries"."country_name" AS "country_name", "jobs"."title" AS "Job Title" FROM"#
            ),
            "{}",
            sql
        );

        let nothing_left = QueryRequest::new(jobs_and_countries()).with_selected_fields(["salary"]);
        assert_eq!(generate_query(&nothing_left, &store()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_flat_uses_first_table_for_shared_field() {
        let request = QueryRequest::new(jobs_and_countries()).with_joins(vec![country_join()]);
        let sql = generate_query(&request, &store()).await.unwrap().unwrap();

        assert_eq!(sql.matches("country_code\" AS").count(), 1);
        assert!(sql.contains(r#""jobs"."country_code" AS "country_code""#));
    }

    #[tokio::test]
    async fn test_deselected_fields_are_ignored() {
        let model = ModelConfiguration::new().with_table("jobs", ["title", "total_jobs"]);
        let catalog = vec![DiscoveredTable::new("jobs", jobs_fields())];
        let request = QueryRequest::new(model)
            .with_catalog(catalog)
            .with_pivot(PivotConfig::new().with_rows(["title", "language"]))
            .with_filters(vec![Filter::new("language", FilterOperator::Equals, "en")]);

        let sql = generate_query(&request, &store()).await.unwrap().unwrap();
        assert_eq!(
            sql,
            r#"SELECT "jobs"."title" AS "title" FROM "jobs" GROUP BY "jobs"."title""#
        );
    }

    #[tokio::test]
    async fn test_empty_model_is_nothing_to_render() {
        let request = QueryRequest::new(ModelConfiguration::new())
            .with_pivot(PivotConfig::new().with_rows(["title"]));
        assert_eq!(generate_query(&request, &store()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_mysql_quoting() {
        let request = QueryRequest::new(ModelConfiguration::new().with_table("jobs", ["title"]))
            .with_filters(vec![Filter::new("title", FilterOperator::Contains, "it's")]);

        let sql = QueryCompiler::new(Dialect::MySql)
            .generate_query(&request, &store())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            sql,
            "SELECT `jobs`.`title` AS `title` FROM `jobs` WHERE `jobs`.`title` LIKE '%it''s%'"
        );
    }

    #[tokio::test]
    async fn test_compiled_sql_runs_against_store() {
        let store = seeded_store().await;
        let request = QueryRequest::new(jobs_and_countries())
            .with_joins(vec![country_join()])
            .with_pivot(
                PivotConfig::new()
                    .with_rows(["country_name"])
                    .with_value(PivotValue::new("total_jobs", Aggregation::Sum).named("Total Jobs")),
            )
            .with_filters(vec![Filter::new("total_jobs", FilterOperator::GreaterThan, 2i64)]);

        let sql = generate_query(&request, &store).await.unwrap().unwrap();
        let rows = store.execute_query(&sql).await.unwrap();

        let total = |country: &str| {
            rows.iter()
                .find(|r| r.get("country_name") == Some(&Value::from(country)))
                .and_then(|r| r.get("Total Jobs").cloned())
        };
        assert_eq!(rows.len(), 3);
        assert_eq!(total("United States"), Some(Value::Integer(15)));
        assert_eq!(total("France"), Some(Value::Integer(7)));
        assert_eq!(total("Germany"), Some(Value::Integer(3)));
    }

    #[tokio::test]
    async fn test_contains_matches_quoted_values() {
        let store = seeded_store().await;
        let request = QueryRequest::new(ModelConfiguration::new().with_table("jobs", ["title"]))
            .with_filters(vec![Filter::new("title", FilterOperator::Contains, "O'Neil")]);

        let sql = generate_query(&request, &store).await.unwrap().unwrap();
        let rows = store.execute_query(&sql).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("title"), Some(&Value::from("O'Neil Dev")));
    }
}
