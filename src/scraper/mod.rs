pub mod cleaner;
pub mod http_client;

use crate::config::ApiConfig;
use crate::models::{SearchPage, Vacancy, detail_skills};
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};
use url::Url;

use self::http_client::HttpClient;

// ── Source trait ──────────────────────────────────────────────────────────────

/// The two hh.ru calls the pipeline makes.
#[async_trait]
pub trait VacancySource: Send + Sync {
    /// One page of search results, 0-based.
    async fn fetch_page(&self, page: u32) -> Result<SearchPage>;
    /// The full record of one vacancy.
    async fn fetch_detail(&self, id: &str) -> Result<Value>;
}

// ── hh.ru client ──────────────────────────────────────────────────────────────

pub struct HhScraper {
    client: HttpClient,
    base_url: Url,
    search_text: String,
    area: u32,
    per_page: u32,
    detail_timeout: Duration,
}

impl HhScraper {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let base = format!("{}/", config.base_url.trim_end_matches('/'));
        let base_url = Url::parse(&base).with_context(|| format!("Invalid base URL {}", config.base_url))?;

        Ok(Self {
            client: HttpClient::new(config)?,
            base_url,
            search_text: config.search_text.clone(),
            area: config.area,
            per_page: config.per_page,
            detail_timeout: Duration::from_secs(config.detail_timeout_secs),
        })
    }

    /// `/vacancies?text=..&area=..&per_page=..&page=..`
    fn search_url(&self, page: u32) -> Result<Url> {
        let endpoint = self.base_url.join("vacancies")?;
        let params = [
            ("text", self.search_text.clone()),
            ("area", self.area.to_string()),
            ("per_page", self.per_page.to_string()),
            ("page", page.to_string()),
        ];
        Ok(Url::parse_with_params(endpoint.as_str(), &params)?)
    }

    /// `/vacancies/{id}`
    fn detail_url(&self, id: &str) -> Result<Url> {
        Ok(self.base_url.join(&format!("vacancies/{}", id))?)
    }
}

#[async_trait]
impl VacancySource for HhScraper {
    async fn fetch_page(&self, page: u32) -> Result<SearchPage> {
        let url = self.search_url(page)?;
        self.client.get_json(&url, None).await
    }

    async fn fetch_detail(&self, id: &str) -> Result<Value> {
        let url = self.detail_url(id)?;
        self.client.get_json(&url, Some(self.detail_timeout)).await
    }
}

// ── Stages ────────────────────────────────────────────────────────────────────

/// What the search loop gathered. `aborted` holds the failure that ended the
/// loop early; the vacancies collected before it are still usable.
#[derive(Debug, Default)]
pub struct Harvest {
    pub vacancies: Vec<Vacancy>,
    pub found: Option<u64>,
    pub aborted: Option<anyhow::Error>,
}

/// Walk search pages `0..max_pages`, sleeping `delay` before each request.
/// Stops on the last page the API reports, or on the first failure.
pub async fn collect_vacancies<S: VacancySource + ?Sized>(
    source: &S,
    max_pages: u32,
    delay: Duration,
) -> Harvest {
    let mut harvest = Harvest::default();

    for page in 0..max_pages {
        info!("Fetching page {}...", page + 1);
        sleep(delay).await;

        let result = match source.fetch_page(page).await {
            Ok(result) => result,
            Err(e) => {
                warn!("Search aborted on page {}: {:#}", page + 1, e);
                harvest.aborted = Some(e);
                break;
            }
        };

        info!("Vacancies found: {}", result.found);
        harvest.found = Some(result.found);
        harvest
            .vacancies
            .extend(result.items.into_iter().map(Vacancy::new));

        let Some(pages) = result.pages else {
            warn!("Page {} has no page count, search stopped", page + 1);
            harvest.aborted = Some(anyhow!("page {} carried no usable `pages` count", page + 1));
            break;
        };
        if page + 1 >= pages {
            debug!("Last page reached ({} of {})", page + 1, pages);
            break;
        }
    }

    info!("Vacancies collected: {}", harvest.vacancies.len());
    harvest
}

/// Skill names from the vacancy's detail record. Every failure degrades to
/// an empty list.
pub async fn fetch_detail_skills<S: VacancySource + ?Sized>(source: &S, vacancy: &Vacancy) -> Vec<String> {
    let Some(id) = vacancy.id() else {
        debug!("Vacancy without id, no detail fetch");
        return Vec::new();
    };

    match source.fetch_detail(&id).await {
        Ok(detail) => detail_skills(&detail).unwrap_or_else(|| {
            debug!("{}: malformed key_skills in detail record", id);
            Vec::new()
        }),
        Err(e) => {
            debug!("{}: detail fetch failed: {:#}", id, e);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    /// Serves canned search pages and detail records, recording every call.
    #[derive(Default)]
    struct FakeSource {
        pages: Vec<Result<SearchPage, String>>,
        details: Vec<(String, Value)>,
        calls: Mutex<Vec<String>>,
    }

    fn page(pages: u32, ids: &[&str]) -> Result<SearchPage, String> {
        Ok(SearchPage {
            found: 120,
            pages: Some(pages),
            items: ids.iter().map(|id| json!({"id": id, "name": "Аналитик"})).collect(),
        })
    }

    #[async_trait]
    impl VacancySource for FakeSource {
        async fn fetch_page(&self, page: u32) -> Result<SearchPage> {
            self.calls.lock().unwrap().push(format!("page:{}", page));
            match self.pages.get(page as usize) {
                Some(Ok(p)) => Ok(p.clone()),
                Some(Err(e)) => Err(anyhow::anyhow!("{}", e)),
                None => Err(anyhow::anyhow!("no such page")),
            }
        }

        async fn fetch_detail(&self, id: &str) -> Result<Value> {
            self.calls.lock().unwrap().push(format!("detail:{}", id));
            self.details
                .iter()
                .find(|(k, _)| k == id)
                .map(|(_, v)| v.clone())
                .ok_or_else(|| anyhow::anyhow!("404"))
        }
    }

    impl FakeSource {
        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[tokio::test]
    async fn single_page_means_single_request() {
        let source = FakeSource {
            pages: vec![page(1, &["1", "2"]), page(1, &["3"])],
            ..Default::default()
        };

        let harvest = collect_vacancies(&source, 1, Duration::ZERO).await;

        assert_eq!(source.calls(), vec!["page:0"]);
        assert_eq!(harvest.vacancies.len(), 2);
        assert!(harvest.aborted.is_none());
    }

    #[tokio::test]
    async fn missing_page_count_keeps_items_and_stops() {
        let countless = SearchPage {
            found: 120,
            pages: None,
            items: vec![json!({"id": "1"}), json!({"id": "2"})],
        };
        let source = FakeSource {
            pages: vec![Ok(countless), page(4, &["3"])],
            ..Default::default()
        };

        let harvest = collect_vacancies(&source, 4, Duration::ZERO).await;

        assert_eq!(source.calls(), vec!["page:0"]);
        assert_eq!(harvest.vacancies.len(), 2);
        assert!(harvest.aborted.is_some());
    }

    #[tokio::test]
    async fn stops_when_api_runs_out_of_pages() {
        let source = FakeSource {
            pages: vec![page(2, &["1"]), page(2, &["2"]), page(2, &["3"])],
            ..Default::default()
        };

        let harvest = collect_vacancies(&source, 4, Duration::ZERO).await;

        assert_eq!(source.calls(), vec!["page:0", "page:1"]);
        assert_eq!(harvest.vacancies.len(), 2);
        assert_eq!(harvest.found, Some(120));
    }

    #[tokio::test]
    async fn failure_keeps_what_was_collected() {
        let source = FakeSource {
            pages: vec![page(5, &["1", "2"]), Err("connection reset".into()), page(5, &["3"])],
            ..Default::default()
        };

        let harvest = collect_vacancies(&source, 4, Duration::ZERO).await;

        assert_eq!(source.calls(), vec!["page:0", "page:1"]);
        assert_eq!(harvest.vacancies.len(), 2);
        assert!(harvest.aborted.is_some());
    }

    async fn skills_for(source: &FakeSource, id: Value) -> Vec<String> {
        fetch_detail_skills(source, &Vacancy::new(json!({"id": id}))).await
    }

    #[test]
    fn detail_failures_degrade_to_no_skills() {
        let source = FakeSource {
            details: vec![
                ("1".into(), json!({"key_skills": [{"name": "SQL"}, {"name": "Power BI"}]})),
                ("2".into(), json!({"key_skills": "SQL"})),
            ],
            ..Default::default()
        };

        tokio_test::block_on(async {
            assert_eq!(skills_for(&source, json!("1")).await, vec!["SQL", "Power BI"]);
            assert!(skills_for(&source, json!("2")).await.is_empty());
            assert!(skills_for(&source, json!(3)).await.is_empty());
            assert!(fetch_detail_skills(&source, &Vacancy::new(json!({}))).await.is_empty());
        });

        assert_eq!(source.calls(), vec!["detail:1", "detail:2", "detail:3"]);
    }

    #[test]
    fn urls_carry_query_and_id() {
        let scraper = HhScraper::new(&ApiConfig::default()).unwrap();

        let search = scraper.search_url(2).unwrap();
        assert_eq!(search.path(), "/vacancies");
        let query: Vec<(String, String)> = search.query_pairs().into_owned().collect();
        assert!(query.contains(&("area".into(), "113".into())));
        assert!(query.contains(&("per_page".into(), "50".into())));
        assert!(query.contains(&("page".into(), "2".into())));
        assert!(query.iter().any(|(k, v)| k == "text" && v.contains("data analyst")));

        assert_eq!(scraper.detail_url("93353").unwrap().as_str(), "https://api.hh.ru/vacancies/93353");
    }
}
