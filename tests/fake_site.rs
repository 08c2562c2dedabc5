use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use comicsource::model::{Page, SeriesDetail, SeriesSummary};
use predicates::prelude::*;

const LISTING_HTML: &str = include_str!("fixtures/listing.html");
const SERIES_HTML: &str = include_str!("fixtures/series.html");
const CHAPTER_HTML: &str = include_str!("fixtures/chapter.html");

const SEARCH_HTML: &str = r#"<!doctype html>
<html>
  <body>
    <ul class="results">
      <li><a href="/manga/night-shift">Night Shift</a></li>
    </ul>
  </body>
</html>
"#;

struct FakeSite {
    base_url: String,
    shutdown_tx: mpsc::Sender<()>,
    handle: thread::JoinHandle<Vec<String>>,
}

impl FakeSite {
    fn spawn() -> Self {
        let server = tiny_http::Server::http("127.0.0.1:0").expect("start tiny_http server");
        let addr = server.server_addr();
        let base_url = format!("http://{addr}");

        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();

        let handle = thread::spawn(move || {
            let mut requested = Vec::new();
            loop {
                if shutdown_rx.try_recv().is_ok() {
                    break;
                }

                let request = match server.recv_timeout(Duration::from_millis(50)) {
                    Ok(Some(req)) => req,
                    Ok(None) => continue,
                    Err(_) => break,
                };

                let url = request.url().to_string();
                requested.push(url.clone());

                let (status, body) = match url.as_str() {
                    "/comics?sort=popular&page=2" => (200, LISTING_HTML),
                    "/search?keyword=night+shift&page=1" => (200, SEARCH_HTML),
                    "/comic/solo-climber" => (200, SERIES_HTML),
                    "/comic/solo-climber/chapter-1" => (200, CHAPTER_HTML),
                    _ => (404, "not found"),
                };

                let mut response = tiny_http::Response::from_string(body).with_status_code(status);
                if status == 200 {
                    let header = tiny_http::Header::from_bytes(
                        &b"Content-Type"[..],
                        &b"text/html; charset=utf-8"[..],
                    )
                    .expect("build header");
                    response = response.with_header(header);
                }

                let _ = request.respond(response);
            }
            requested
        });

        Self {
            base_url,
            shutdown_tx,
            handle,
        }
    }

    fn shutdown(self) -> Vec<String> {
        let _ = self.shutdown_tx.send(());
        self.handle.join().expect("join fake site thread")
    }
}

fn run(base_url: &str, args: &[&str]) -> assert_cmd::assert::Assert {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("comicsource");
    cmd.args(["--domain", base_url]).args(args).assert()
}

fn json_lines<T: serde::de::DeserializeOwned>(stdout: &[u8]) -> anyhow::Result<Vec<T>> {
    std::str::from_utf8(stdout)?
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| -> anyhow::Result<T> { Ok(serde_json::from_str(line)?) })
        .collect()
}

#[test]
fn fetch_and_extract_every_url_category() -> anyhow::Result<()> {
    let site = FakeSite::spawn();
    let base_url = site.base_url.clone();

    let listing = run(&base_url, &["list", "--sort", "popularity", "--page", "2"]).success();
    let summaries: Vec<SeriesSummary> = json_lines(&listing.get_output().stdout)?;
    assert_eq!(summaries.len(), 3);
    assert_eq!(summaries[0].absolute_url, format!("{base_url}/comic/solo-climber"));
    assert_eq!(
        summaries[0].cover_url.as_deref(),
        Some(format!("{base_url}/covers/solo.webp").as_str())
    );

    let search = run(&base_url, &["search", "--query", "night shift"]).success();
    let results: Vec<SeriesSummary> = json_lines(&search.get_output().stdout)?;
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].title, "Night Shift");
    assert_eq!(results[0].relative_url, "/manga/night-shift");

    let series = run(&base_url, &["series", "--url", "/comic/solo-climber"]).success();
    let detail: SeriesDetail = serde_json::from_slice(&series.get_output().stdout)?;
    assert_eq!(detail.summary.id, summaries[0].id);
    assert_eq!(
        detail.summary.cover_url.as_deref(),
        Some(format!("{base_url}/covers/solo-large.webp").as_str())
    );
    assert_eq!(detail.chapters.len(), 2);

    let chapter_url = detail.chapters[1].url.clone();
    let pages = run(&base_url, &["pages", "--url", &chapter_url]).success();
    let pages: Vec<Page> = json_lines(&pages.get_output().stdout)?;
    assert_eq!(pages.len(), 3);
    assert_eq!(pages[0].index, 0);

    let requested = site.shutdown();
    assert_eq!(
        requested,
        vec![
            "/comics?sort=popular&page=2".to_owned(),
            "/search?keyword=night+shift&page=1".to_owned(),
            "/comic/solo-climber".to_owned(),
            "/comic/solo-climber/chapter-1".to_owned(),
        ]
    );
    Ok(())
}

#[test]
fn http_errors_are_reported_with_the_url() {
    let site = FakeSite::spawn();
    let base_url = site.base_url.clone();

    run(&base_url, &["series", "--url", "/comic/missing"])
        .failure()
        .stderr(predicate::str::contains("/comic/missing"))
        .stderr(predicate::str::contains("404"));

    site.shutdown();
}
