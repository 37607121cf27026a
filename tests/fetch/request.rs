use envdash::FetchRequest;

#[test]
fn cache_key_is_independent_of_param_order() {
    let a = FetchRequest::new("api/chart/co2")
        .param("hours", 24)
        .param("avg", "5m");
    let b = FetchRequest::new("api/chart/co2")
        .param("avg", "5m")
        .param("hours", 24);

    assert_eq!(a.cache_key(), b.cache_key());
    assert_eq!(a.cache_key(), "api/chart/co2?avg=5m&hours=24");
}

#[test]
fn cache_key_distinguishes_windows() {
    let day = FetchRequest::new("api/chart/co2").param("hours", 24);
    let week = FetchRequest::new("api/chart/co2").param("hours", 168);
    assert_ne!(day.cache_key(), week.cache_key());
}

#[test]
fn bare_endpoint_is_its_own_key() {
    let req = FetchRequest::new("api/environment");
    assert_eq!(req.cache_key(), "api/environment");
    assert!(req.params().is_empty());
}

#[test]
fn grace_window_defaults_to_five_ttls() {
    let client = envdash::EnvClient::builder()
        .cache_ttl(std::time::Duration::from_secs(3))
        .build()
        .unwrap();
    assert_eq!(client.stale_grace(), std::time::Duration::from_secs(15));
}

#[test]
fn huge_ttl_saturates_grace_window() {
    let client = envdash::EnvClient::builder()
        .cache_ttl(std::time::Duration::MAX)
        .build()
        .unwrap();
    assert_eq!(client.stale_grace(), std::time::Duration::MAX);
    assert_eq!(client.cache_ttl(), std::time::Duration::MAX);
}
