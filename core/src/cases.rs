//! Case retrieval and enumeration.
//!
//! # Design
//! `CasesService` is the capability callers depend on; `CasesServiceOp` is
//! the one implementation, borrowing a `Client` for request building and
//! execution.
//!
//! `list` pages through `/api/case` sequentially. A page shorter than the
//! configured page size ends the enumeration; a full page always triggers
//! another request, so a collection whose size is a multiple of the page
//! size costs one extra request that comes back empty. Any failure discards
//! everything fetched so far.

use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::client::Client;
use crate::context::Context;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpResponse};
use crate::routes;
use crate::transport::Transport;
use crate::types::Case;

#[async_trait]
pub trait CasesService {
    /// Fetch one case by id. The id is forwarded without validation.
    async fn get(&self, ctx: &Context, id: &str) -> Result<(Case, HttpResponse), ApiError>;

    /// Fetch every case, returning them in server order along with the
    /// response of the last page.
    async fn list(&self, ctx: &Context) -> Result<(Vec<Case>, HttpResponse), ApiError>;
}

pub struct CasesServiceOp<'a, T> {
    client: &'a Client<T>,
}

impl<'a, T: Transport> CasesServiceOp<'a, T> {
    pub fn new(client: &'a Client<T>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl<T: Transport> CasesService for CasesServiceOp<'_, T> {
    #[instrument(skip(self, ctx))]
    async fn get(&self, ctx: &Context, id: &str) -> Result<(Case, HttpResponse), ApiError> {
        let request = self
            .client
            .new_request(HttpMethod::Get, &routes::case_route(id))?;
        self.client.execute(ctx, request).await
    }

    #[instrument(skip_all)]
    async fn list(&self, ctx: &Context) -> Result<(Vec<Case>, HttpResponse), ApiError> {
        let page_size = self.client.page_size();
        debug!(page_size, "Listing cases");
        if page_size <= 0 {
            debug!("Paging disabled, fetching all cases at once");
            let request = self.client.new_request(HttpMethod::Get, routes::CASE_MAIN)?;
            return self.client.execute(ctx, request).await;
        }

        let mut cases = Vec::new();
        let mut start = 0;
        loop {
            let request = self
                .client
                .new_request(HttpMethod::Get, &routes::case_page(start, page_size))?;
            let (page, response): (Vec<Case>, _) = self.client.execute(ctx, request).await?;
            debug!(start, len = page.len(), "Fetched case page");

            let short = i64::try_from(page.len()).is_ok_and(|len| len < page_size);
            cases.extend(page);
            if short {
                return Ok((cases, response));
            }
            start += page_size;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::{json, Value};

    use super::*;
    use crate::transport::testing::ScriptedTransport;

    fn case(id: &str) -> Value {
        json!({
            "_id": id,
            "_type": "case",
            "caseId": 1,
            "createdAt": 0,
            "createdBy": "admin",
            "id": id,
            "severity": 2,
            "status": "Open",
            "tlp": 2,
            "title": format!("case {id}"),
        })
    }

    fn page(ids: &[&str]) -> Value {
        Value::Array(ids.iter().map(|id| case(id)).collect())
    }

    fn client(page_size: i64, transport: &Arc<ScriptedTransport>) -> Client<Arc<ScriptedTransport>> {
        Client::new("http://hive:9000", page_size, transport.clone())
    }

    fn ids(cases: &[Case]) -> Vec<&str> {
        cases.iter().map(|c| c.id.as_str()).collect()
    }

    fn urls(transport: &ScriptedTransport) -> Vec<String> {
        transport.requests().into_iter().map(|r| r.url).collect()
    }

    #[tokio::test]
    async fn get_issues_one_request_to_case_route() {
        let transport = Arc::new(ScriptedTransport::new().reply(200, case("~42")));
        let c = client(2, &transport);

        let (found, resp) = c.cases().get(&Context::background(), "~42").await.unwrap();

        assert_eq!(found.id, "~42");
        assert_eq!(resp.status, 200);
        assert_eq!(urls(&transport), vec!["http://hive:9000/api/case/~42"]);
    }

    #[tokio::test]
    async fn get_forwards_empty_id_and_surfaces_server_error() {
        let transport = Arc::new(ScriptedTransport::new().reply_raw(405, "method not allowed"));
        let c = client(2, &transport);

        let err = c.cases().get(&Context::background(), "").await.unwrap_err();

        assert_eq!(err.response().unwrap().status, 405);
        assert_eq!(urls(&transport), vec!["http://hive:9000/api/case/"]);
    }

    #[tokio::test]
    async fn list_stops_on_short_page() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .reply(200, page(&["A", "B"]))
                .reply(200, page(&["C", "D"]))
                .reply(200, page(&["E"])),
        );
        let c = client(2, &transport);

        let (cases, _) = c.cases().list(&Context::background()).await.unwrap();

        assert_eq!(ids(&cases), vec!["A", "B", "C", "D", "E"]);
        assert_eq!(
            urls(&transport),
            vec![
                "http://hive:9000/api/case?range=0-2",
                "http://hive:9000/api/case?range=2-4",
                "http://hive:9000/api/case?range=4-6",
            ]
        );
    }

    #[tokio::test]
    async fn list_tolerates_trailing_empty_page() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .reply(200, page(&["A", "B"]))
                .reply(200, page(&["C", "D"]))
                .reply(200, page(&[])),
        );
        let c = client(2, &transport);

        let (cases, resp) = c.cases().list(&Context::background()).await.unwrap();

        assert_eq!(ids(&cases), vec!["A", "B", "C", "D"]);
        assert_eq!(resp.body, "[]");
        assert_eq!(transport.requests().len(), 3);
    }

    #[tokio::test]
    async fn list_empty_collection_takes_one_request() {
        let transport = Arc::new(ScriptedTransport::new().reply(200, page(&[])));
        let c = client(2, &transport);

        let (cases, _) = c.cases().list(&Context::background()).await.unwrap();

        assert!(cases.is_empty());
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test]
    async fn list_failure_discards_earlier_pages() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .reply(200, page(&["A", "B"]))
                .fail("connection reset by peer"),
        );
        let c = client(2, &transport);

        let err = c.cases().list(&Context::background()).await.unwrap_err();

        assert!(matches!(err, ApiError::Transport { .. }));
        assert_eq!(transport.requests().len(), 2);
    }

    #[tokio::test]
    async fn list_server_error_mid_enumeration_is_an_error() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .reply(200, page(&["A", "B"]))
                .reply_raw(500, "boom"),
        );
        let c = client(2, &transport);

        let err = c.cases().list(&Context::background()).await.unwrap_err();

        assert!(matches!(&err, ApiError::Status { response } if response.status == 500));
        assert_eq!(err.response().unwrap().body, "boom");
        assert_eq!(transport.requests().len(), 2);
    }

    #[tokio::test]
    async fn list_accepts_sparse_records() {
        let transport = Arc::new(ScriptedTransport::new().reply(
            200,
            json!([
                case("A"),
                {"_id": "B", "_type": "case", "id": "B", "tags": null, "metrics": null},
            ]),
        ));
        let c = client(5, &transport);

        let (cases, _) = c.cases().list(&Context::background()).await.unwrap();

        assert_eq!(ids(&cases), vec!["A", "B"]);
        assert!(cases[1].tags.is_empty());
        assert_eq!(cases[1].case_id, 0);
    }

    #[tokio::test]
    async fn list_decode_failure_mid_enumeration_is_an_error() {
        let transport = Arc::new(
            ScriptedTransport::new()
                .reply(200, page(&["A", "B"]))
                .reply(200, json!({"unexpected": "object"})),
        );
        let c = client(2, &transport);

        let err = c.cases().list(&Context::background()).await.unwrap_err();

        assert!(matches!(err, ApiError::Deserialization { .. }));
        assert!(err.response().unwrap().body.contains("unexpected"));
    }

    #[tokio::test]
    async fn non_positive_page_size_fetches_once_unpaged() {
        for page_size in [0, -5] {
            let transport = Arc::new(ScriptedTransport::new().reply(200, page(&["A", "B", "C"])));
            let c = client(page_size, &transport);

            let (cases, _) = c.cases().list(&Context::background()).await.unwrap();

            assert_eq!(ids(&cases), vec!["A", "B", "C"]);
            assert_eq!(urls(&transport), vec!["http://hive:9000/api/case"]);
        }
    }

    #[tokio::test]
    async fn list_with_bad_base_url_makes_no_request() {
        let transport = Arc::new(ScriptedTransport::new());
        let c = Client::new("::", 2, transport.clone());

        let err = c.cases().list(&Context::background()).await.unwrap_err();

        assert!(matches!(err, ApiError::InvalidRequest(_)));
        assert!(transport.requests().is_empty());
    }
}
