use std::sync::Arc;
use std::time::Duration;

use axum::{routing::get, Router};
use chrono::NaiveDate;
use mockito::{Matcher, Mock, Server, ServerGuard};
use qa_vacancies::{
    config::FailurePolicy,
    error::Error,
    services::{
        hh_client::HhClient,
        vacancy_service::{VacancyService, VacancyServiceOptions},
    },
    utils::time::FixedClock,
};
use serde_json::json;
use tokio::net::TcpListener;

fn frozen_today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 5, 10).unwrap()
}

fn service(base_url: &str, options: VacancyServiceOptions) -> VacancyService {
    let client = HhClient::new(base_url, "qa-vacancies-test", Duration::from_secs(5)).unwrap();
    VacancyService::new(client, Arc::new(FixedClock(frozen_today())), options)
}

fn detail_body(id: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": format!("QA Engineer {id}"),
        "description": "<p>Hello <b>world</b></p>",
        "published_at": "2023-05-10T14:30:00+0300",
        "salary": null,
        "key_skills": [],
        "employer": { "id": "1", "name": "Acme" },
        "area": { "id": "1", "name": "Москва" },
        "alternate_url": format!("https://hh.ru/vacancy/{id}"),
    })
}

async fn mock_search(server: &mut ServerGuard, ids: &[&str]) -> Mock {
    let items: Vec<_> = ids.iter().map(|id| json!({ "id": id })).collect();
    server
        .mock("GET", "/vacancies")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("text".into(), "qa".into()),
            Matcher::UrlEncoded("order_by".into(), "publication_time".into()),
            Matcher::UrlEncoded("search_field".into(), "name".into()),
            Matcher::UrlEncoded("date_from".into(), "2023-01-01".into()),
            Matcher::UrlEncoded("date_to".into(), "2023-05-09".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({ "items": items, "found": ids.len() }).to_string())
        .create_async()
        .await
}

async fn mock_detail(server: &mut ServerGuard, id: &str, body: serde_json::Value) -> Mock {
    server
        .mock("GET", format!("/vacancies/{id}").as_str())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .create_async()
        .await
}

#[tokio::test]
async fn returns_first_ten_in_search_order() {
    let mut server = Server::new_async().await;
    let ids: Vec<String> = (1..=12).map(|n| (100 + n).to_string()).collect();
    let id_refs: Vec<&str> = ids.iter().map(String::as_str).collect();
    let search = mock_search(&mut server, &id_refs).await;

    let mut fetched = Vec::new();
    for id in &ids[..10] {
        let mock = server
            .mock("GET", format!("/vacancies/{id}").as_str())
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(detail_body(id).to_string())
            .expect(1)
            .create_async()
            .await;
        fetched.push(mock);
    }
    let mut skipped = Vec::new();
    for id in &ids[10..] {
        let mock = server
            .mock("GET", format!("/vacancies/{id}").as_str())
            .expect(0)
            .create_async()
            .await;
        skipped.push(mock);
    }

    let records = service(&server.url(), VacancyServiceOptions::default())
        .fetch_recent_vacancies()
        .await
        .unwrap();

    assert_eq!(records.len(), 10);
    let names: Vec<_> = records.iter().map(|r| r.name.clone()).collect();
    let expected: Vec<_> = ids[..10]
        .iter()
        .map(|id| format!("QA Engineer {id}"))
        .collect();
    assert_eq!(names, expected);

    search.assert_async().await;
    for mock in fetched.iter().chain(skipped.iter()) {
        mock.assert_async().await;
    }
}

#[tokio::test]
async fn normalizes_detail_fields() {
    let mut server = Server::new_async().await;
    let _search = mock_search(&mut server, &["7"]).await;
    let mut body = detail_body("7");
    body["salary"] = json!({ "from": 50000, "to": 80000, "currency": "RUR", "gross": false });
    body["key_skills"] = json!([{ "name": "Python" }, { "name": "SQL" }]);
    let _detail_7 = mock_detail(&mut server, "7", body).await;

    let records = service(&server.url(), VacancyServiceOptions::default())
        .fetch_recent_vacancies()
        .await
        .unwrap();

    let record = &records[0];
    assert_eq!(record.name, "QA Engineer 7");
    assert_eq!(record.key_skills, "Python, SQL");
    assert_eq!(record.employer_name, "Acme");
    assert_eq!(record.area, "Москва");
    assert_eq!(record.link, "https://hh.ru/vacancy/7");
    assert_eq!(record.date, "10/05/2023, 14:30");
    assert_eq!(record.description, "Hello world");
    assert_eq!(record.salary, "80000 RUR");
}

#[tokio::test]
async fn lower_bound_used_when_upper_missing() {
    let mut server = Server::new_async().await;
    let _search = mock_search(&mut server, &["8"]).await;
    let mut body = detail_body("8");
    body["salary"] = json!({ "from": 50000, "to": null, "currency": "RUR" });
    let _detail_8 = mock_detail(&mut server, "8", body).await;

    let records = service(&server.url(), VacancyServiceOptions::default())
        .fetch_recent_vacancies()
        .await
        .unwrap();

    assert_eq!(records[0].salary, "50000 RUR");
    assert_eq!(records[0].key_skills, "");
}

#[tokio::test]
async fn empty_search_yields_no_records() {
    let mut server = Server::new_async().await;
    let _search = mock_search(&mut server, &[]).await;

    let records = service(&server.url(), VacancyServiceOptions::default())
        .fetch_recent_vacancies()
        .await
        .unwrap();

    assert!(records.is_empty());
}

#[tokio::test]
async fn failing_detail_aborts_whole_fetch() {
    let mut server = Server::new_async().await;
    let _search = mock_search(&mut server, &["1", "2", "3"]).await;
    let _detail_1 = mock_detail(&mut server, "1", detail_body("1")).await;
    let _failing = server
        .mock("GET", "/vacancies/2")
        .with_status(500)
        .with_body("boom")
        .create_async()
        .await;
    let _detail_3 = mock_detail(&mut server, "3", detail_body("3")).await;

    let err = service(&server.url(), VacancyServiceOptions::default())
        .fetch_recent_vacancies()
        .await
        .unwrap_err();

    match err {
        Error::UpstreamStatus { url, status } => {
            assert_eq!(status, 500);
            assert!(url.ends_with("/vacancies/2"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn skip_policy_drops_only_the_bad_item() {
    let mut server = Server::new_async().await;
    let _search = mock_search(&mut server, &["1", "2", "3"]).await;
    let _detail_1 = mock_detail(&mut server, "1", detail_body("1")).await;
    let mut broken = detail_body("2");
    broken["published_at"] = json!("not a timestamp");
    let _detail_2 = mock_detail(&mut server, "2", broken).await;
    let _detail_3 = mock_detail(&mut server, "3", detail_body("3")).await;

    let options = VacancyServiceOptions {
        failure_policy: FailurePolicy::Skip,
        ..VacancyServiceOptions::default()
    };
    let records = service(&server.url(), options)
        .fetch_recent_vacancies()
        .await
        .unwrap();

    let links: Vec<_> = records.iter().map(|r| r.link.as_str()).collect();
    assert_eq!(
        links,
        ["https://hh.ru/vacancy/1", "https://hh.ru/vacancy/3"]
    );
}

#[tokio::test]
async fn missing_field_reports_vacancy_and_field() {
    let mut server = Server::new_async().await;
    let _search = mock_search(&mut server, &["55"]).await;
    let mut body = detail_body("55");
    body.as_object_mut().unwrap().remove("employer");
    let _detail_55 = mock_detail(&mut server, "55", body).await;

    let err = service(&server.url(), VacancyServiceOptions::default())
        .fetch_recent_vacancies()
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::MalformedRecord { ref id, field: "employer.name" } if id == "55"
    ));
}

#[tokio::test]
async fn search_errors_are_typed() {
    let mut server = Server::new_async().await;
    let _truncated = server
        .mock("GET", "/vacancies")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"items": "#)
        .create_async()
        .await;

    let err = service(&server.url(), VacancyServiceOptions::default())
        .fetch_recent_vacancies()
        .await
        .unwrap_err();
    assert!(matches!(err, Error::MalformedPayload { .. }));

    let mut server = Server::new_async().await;
    let _forbidden = server
        .mock("GET", "/vacancies")
        .match_query(Matcher::Any)
        .with_status(403)
        .create_async()
        .await;

    let err = service(&server.url(), VacancyServiceOptions::default())
        .fetch_recent_vacancies()
        .await
        .unwrap_err();
    assert!(matches!(err, Error::UpstreamStatus { status: 403, .. }));
}

#[tokio::test]
async fn unreachable_api_is_a_fetch_failure() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = service(&format!("http://{addr}"), VacancyServiceOptions::default())
        .fetch_recent_vacancies()
        .await
        .unwrap_err();

    assert!(matches!(err, Error::FetchFailed { .. }));
}

#[tokio::test]
async fn slow_api_hits_aggregate_timeout() {
    let app = Router::new().route(
        "/vacancies",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            axum::Json(json!({ "items": [] }))
        }),
    );
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let options = VacancyServiceOptions {
        fetch_timeout: Duration::from_millis(200),
        ..VacancyServiceOptions::default()
    };
    let err = service(&format!("http://{addr}"), options)
        .fetch_recent_vacancies()
        .await
        .unwrap_err();

    assert!(matches!(err, Error::FetchTimedOut(limit) if limit == Duration::from_millis(200)));
}
