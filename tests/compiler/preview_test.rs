mod fixtures;

#[cfg(test)]
mod tests {
    use super::fixtures::{country_join, jobs_and_countries, seeded_store, source_join};
    use modelsql::compiler::{generate_preview_query, QueryCompiler, QueryRequest, PREVIEW_PLACEHOLDER};
    use modelsql::model::{FieldAliases, ModelConfiguration};
    use modelsql::sql::Dialect;
    use modelsql::store::RelationalStore;

    #[test]
    fn test_placeholder_when_no_tables() {
        let request = QueryRequest::new(ModelConfiguration::new()).with_joins(vec![country_join()]);
        let preview = generate_preview_query(&request);

        assert_eq!(preview, PREVIEW_PLACEHOLDER);
        assert!(preview.starts_with("--"));
    }

    #[test]
    fn test_projects_every_table_field_in_order() {
        let model = ModelConfiguration::new()
            .with_table("countries", ["country_name"])
            .with_table("jobs", ["title", "country_code"]);
        let request = QueryRequest::new(model)
            .with_joins(vec![country_join()])
            .with_aliases(FieldAliases::new().with_alias("countries", "country_name", "Country"));

        insta::assert_snapshot!(generate_preview_query(&request), @r#"SELECT "countries"."country_name" AS "Country", "jobs"."title", "jobs"."country_code" FROM "countries" LEFT JOIN "jobs" ON "jobs"."country_code" = "countries"."country_code""#);
    }

    #[test]
    fn test_duplicate_field_names_are_all_projected() {
        let request = QueryRequest::new(jobs_and_countries()).with_joins(vec![country_join()]);
        let preview = generate_preview_query(&request);

        assert!(preview.contains(r#""jobs"."country_code""#));
        assert!(preview.contains(r#""countries"."country_code""#));
    }

    #[test]
    fn test_unjoined_table_fields_are_projected_but_not_joined() {
        let model = ModelConfiguration::new()
            .with_table("jobs", ["title"])
            .with_table("sources", ["source_name"]);
        let request = QueryRequest::new(model);

        assert_eq!(
            generate_preview_query(&request),
            r#"SELECT "jobs"."title", "sources"."source_name" FROM "jobs""#
        );
    }

    #[test]
    fn test_dialect_quoting() {
        let request = QueryRequest::new(ModelConfiguration::new().with_table("jobs", ["title"]));
        assert_eq!(
            QueryCompiler::new(Dialect::MySql).generate_preview_query(&request),
            "SELECT `jobs`.`title` FROM `jobs`"
        );
    }

    #[tokio::test]
    async fn test_preview_runs_against_store() {
        let store = seeded_store().await;
        let model = jobs_and_countries().with_table("sources", ["source_name"]);
        let request = QueryRequest::new(model).with_joins(vec![country_join(), source_join()]);

        let rows = store
            .execute_query(&generate_preview_query(&request))
            .await
            .unwrap();
        assert_eq!(rows.len(), 5);
    }
}
