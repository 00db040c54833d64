// Census API endpoint functions.
// Provides typed table downloads from the ACS data API.

use reqwest::StatusCode;
use tracing::{info, warn};

use crate::error::Result;

use super::client::CensusClient;
use super::types::{RawTable, TableRequest};

impl CensusClient {
    /// Download NAME plus every variable of the request for all areas of its geography.
    /// A 204 response means no area matched and yields an empty table.
    pub async fn get_table(&self, request: &TableRequest) -> Result<RawTable> {
        let mut get = vec!["NAME"];
        get.extend(request.codes());

        let params = [
            ("get", get.join(",")),
            ("for", format!("{}:*", request.geography.api_name())),
        ];
        let response = self.get_with_params(&params).await?;

        if response.status() == StatusCode::NO_CONTENT || response.content_length() == Some(0) {
            warn!(request = %request.cache_key(), "census returned no content");
            return Ok(RawTable::default());
        }

        let table = RawTable::from_json(response.json::<serde_json::Value>().await?)?;
        if table.is_empty() {
            warn!(request = %request.cache_key(), "census returned a header without rows");
        }
        info!(
            request = %request.cache_key(),
            rows = table.len(),
            "downloaded census table"
        );
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::census::client::test_server::{query_pairs, serve_once};
    use crate::census::{Geography, VariableGroup};
    use crate::error::CensusError;

    fn population(geography: Geography) -> TableRequest {
        TableRequest::new(geography, &[VariableGroup::TotalPopulation])
    }

    fn client_for(base_url: String) -> CensusClient {
        CensusClient::new("acs5", 2019, None)
            .unwrap()
            .with_base_url(base_url)
    }

    #[tokio::test]
    async fn test_get_table_parses_rows() {
        let (base_url, server) = serve_once(
            "200 OK",
            r#"[["NAME","B01003_001E","state"],["Alabama","4876250","01"],["Alaska",null,"02"]]"#,
        )
        .await;
        let client = client_for(base_url);

        let table = client.get_table(&population(Geography::State)).await.unwrap();
        assert_eq!(table.header, vec!["NAME", "B01003_001E", "state"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[0][1].as_deref(), Some("4876250"));
        assert_eq!(table.rows[1][1], None);

        let target = server.await.unwrap();
        assert_eq!(
            query_pairs(&target),
            vec![
                ("get".to_string(), "NAME,B01003_001E".to_string()),
                ("for".to_string(), "state:*".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_get_table_no_content_is_empty() {
        let (base_url, server) = serve_once("204 No Content", "").await;
        let client = client_for(base_url);

        let table = client
            .get_table(&population(Geography::TribalArea))
            .await
            .unwrap();
        assert_eq!(table, RawTable::default());
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_get_table_empty_body_is_empty() {
        let (base_url, server) = serve_once("200 OK", "").await;
        let client = client_for(base_url);

        let table = client.get_table(&population(Geography::State)).await.unwrap();
        assert!(table.header.is_empty());
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_get_table_tribal_for_clause() {
        let (base_url, server) = serve_once("200 OK", "[]").await;
        let client = client_for(base_url);

        client
            .get_table(&population(Geography::TribalArea))
            .await
            .unwrap();
        let target = server.await.unwrap();
        // Spaces and slashes in the geography name must be encoded on the wire.
        assert!(!target.contains(' '), "{target}");
        assert!(!target.contains("area/alaska"), "{target}");

        let pairs = query_pairs(&target);
        let for_clause = pairs.iter().find(|(k, _)| k == "for").map(|(_, v)| v.as_str());
        assert_eq!(
            for_clause,
            Some("american indian area/alaska native area/hawaiian home land:*")
        );
    }

    #[tokio::test]
    async fn test_get_table_rejects_non_array_body() {
        let (base_url, server) = serve_once("200 OK", r#"{"error":"bad"}"#).await;
        let client = client_for(base_url);

        let err = client
            .get_table(&population(Geography::State))
            .await
            .unwrap_err();
        assert!(matches!(err, CensusError::MalformedResponse(_)));
        server.await.unwrap();
    }
}
