use crate::database::CaseStore;
use crate::services::AggregationService;
use crate::tests::unit_sqlite_case_store::{report, setup_test_store};
use std::sync::Arc;

#[tokio::test]
async fn test_top_countries_scenario() {
    let store = setup_test_store().await;
    store
        .bulk_insert(&[
            report("X", "2020-01-01", 5, 1),
            report("X", "2020-01-02", 9, 2),
            report("Y", "2020-01-01", 3, 0),
        ])
        .await
        .unwrap();
    let service = AggregationService::new(Arc::new(store));

    let summary = service.top_countries_by_severity(10).await.unwrap();

    let rows: Vec<_> = summary
        .iter()
        .map(|s| (s.country.as_str(), s.total_cases, s.total_deaths))
        .collect();
    assert_eq!(rows, vec![("X", 9, 2), ("Y", 3, 0)]);
}

#[tokio::test]
async fn test_top_countries_respects_limit_and_order() {
    let store = setup_test_store().await;
    let records: Vec<_> = (0..15u64)
        .flat_map(|i| {
            let country = format!("Country {:02}", i);
            // an early higher-looking row would win a sum, but not a max
            vec![
                report(&country, "2020-01-01", i * 10, i),
                report(&country, "2020-02-01", i * 100, i * 2),
            ]
        })
        .collect();
    store.bulk_insert(&records).await.unwrap();
    let service = AggregationService::new(Arc::new(store));

    let summary = service.top_countries_by_severity(10).await.unwrap();

    assert_eq!(summary.len(), 10);
    assert_eq!(summary[0].country, "Country 14");
    assert_eq!(summary[0].total_cases, 1_400);
    assert_eq!(summary[0].total_deaths, 28);
    assert!(
        summary
            .windows(2)
            .all(|pair| pair[0].total_cases >= pair[1].total_cases)
    );

    assert_eq!(service.top_countries_by_severity(3).await.unwrap().len(), 3);
    assert!(service.top_countries_by_severity(0).await.unwrap().is_empty());
}

// equal case counts fall back to country name ascending
#[tokio::test]
async fn test_top_countries_tie_break_by_name() {
    let store = setup_test_store().await;
    store
        .bulk_insert(&[
            report("Zambia", "2020-01-01", 50, 1),
            report("Angola", "2020-01-01", 50, 2),
            report("Mali", "2020-01-01", 50, 3),
            report("Chad", "2020-01-01", 70, 0),
        ])
        .await
        .unwrap();
    let service = AggregationService::new(Arc::new(store));

    let summary = service.top_countries_by_severity(10).await.unwrap();

    let countries: Vec<_> = summary.iter().map(|s| s.country.as_str()).collect();
    assert_eq!(countries, vec!["Chad", "Angola", "Mali", "Zambia"]);
}

#[tokio::test]
async fn test_top_countries_empty_store() {
    let store = setup_test_store().await;
    let service = AggregationService::new(Arc::new(store));

    assert!(service.top_countries_by_severity(10).await.unwrap().is_empty());
}
