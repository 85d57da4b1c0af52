mod common;

use ocserv_log::channel_log;
use ocserv_log::config::Config;
use ocserv_log::telemetry::{
    BODY_CAPACITY, ClientSession, Encoding, LOG_LEVEL_INFO, LOG_LEVEL_SENSITIVE, Priority,
    ProcessContext, SecurityModuleContext, Severity, Vhost, WorkerContext,
};

use common::recording_sink;

#[test]
fn test_info_threshold_filters_http_debug() {
    let (sink, lines) = recording_sink();
    let ctx = WorkerContext::new(LOG_LEVEL_INFO).with_remote_address("192.0.2.1");

    channel_log!(sink.worker(), &ctx, Priority::HttpDebug, "GET /auth");
    assert!(lines.lock().unwrap().is_empty());

    channel_log!(sink.worker(), &ctx, Priority::Info, "user authenticated");
    let lines = lines.lock().unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].0, Severity::Info);
    assert!(lines[0].1.contains("user authenticated"));
}

#[test]
fn test_unknown_priority_writes_twice_at_any_threshold() {
    for threshold in [i32::MIN, 0, LOG_LEVEL_SENSITIVE] {
        let (sink, lines) = recording_sink();
        let ctx = ProcessContext::new(threshold, false);

        channel_log!(sink.main(), &ctx, Priority::from_code(999), "still delivered");

        let lines = lines.lock().unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], (Severity::Debug, "main: unknown log level 999".to_string()));
        assert_eq!(lines[1], (Severity::Debug, "main: still delivered".to_string()));
    }
}

#[test]
fn test_unknown_priority_binary_payload_warns_once() {
    let (sink, lines) = recording_sink();
    let ctx = SecurityModuleContext::new(0);

    sink.sec_mod()
        .log_hex(&ctx, Priority::from_code(999), "k:", &[1, 2], Encoding::Hex);

    let lines = lines.lock().unwrap();
    assert_eq!(
        *lines,
        vec![
            (Severity::Debug, "sec-mod: unknown log level 999".to_string()),
            (Severity::Debug, "sec-mod: k: 0102".to_string()),
        ]
    );
}

#[test]
fn test_identity_shapes_per_channel() {
    let (sink, lines) = recording_sink();

    let tenant = WorkerContext::new(LOG_LEVEL_INFO)
        .with_multi_tenancy(true)
        .with_username("alice")
        .with_vhost(Vhost::named("corp"))
        .with_remote_address("10.0.0.1");
    let default_tenant = WorkerContext::new(LOG_LEVEL_INFO)
        .with_multi_tenancy(true)
        .with_username("alice")
        .with_vhost(Vhost::default_named("corp"))
        .with_remote_address("10.0.0.1");
    let anonymous = ProcessContext::new(LOG_LEVEL_INFO, true).with_client(
        ClientSession::new()
            .with_vhost(Vhost::named("corp"))
            .with_remote_address("10.0.0.2"),
    );
    let single = ProcessContext::new(LOG_LEVEL_INFO, false).with_client(
        ClientSession::new()
            .with_username("bob")
            .with_vhost(Vhost::named("corp"))
            .with_remote_address("10.0.0.3"),
    );

    channel_log!(sink.worker(), &tenant, Priority::Notice, "a");
    channel_log!(sink.worker(), &default_tenant, Priority::Notice, "b");
    channel_log!(sink.main(), &anonymous, Priority::Notice, "c");
    channel_log!(sink.main(), &single, Priority::Notice, "d");

    let lines: Vec<String> = lines.lock().unwrap().iter().map(|(_, l)| l.clone()).collect();
    assert_eq!(
        lines,
        vec![
            "worker[corp:alice]: 10.0.0.1 a",
            "worker[alice]: 10.0.0.1 b",
            "main[vhost:corp]:10.0.0.2 c",
            "main[bob]:10.0.0.3 d",
        ]
    );
}

#[test]
fn test_long_body_truncated() {
    let (sink, lines) = recording_sink();
    let ctx = SecurityModuleContext::new(0);
    let payload = "z".repeat(4096);

    channel_log!(sink.sec_mod(), &ctx, Priority::Warning, "{payload}");

    let lines = lines.lock().unwrap();
    let body = lines[0].1.strip_prefix("sec-mod: ").unwrap();
    assert_eq!(body.len(), BODY_CAPACITY - 1);
    assert!(body.chars().all(|c| c == 'z'));
}

#[test]
fn test_binary_payloads_through_config_contexts() {
    let config: Config = toml::from_str(
        r#"
        [log]
        level = 2

        [vhosts.corp]
        level = 5
        "#,
    )
    .unwrap();

    let (sink, lines) = recording_sink();
    let secret = [0x01, 0x23, 0x45, 0x67, 0x89, 0xab, 0xcd, 0xef];

    // Global level 2 hides sensitive material from the security module...
    sink.sec_mod().log_hex(
        &config.sec_mod_context(),
        Priority::Sensitive,
        "master key:",
        &secret,
        Encoding::Hex,
    );
    assert!(lines.lock().unwrap().is_empty());

    // ...while workers on the verbose vhost log it.
    let worker = config
        .worker_context(Some("corp"))
        .unwrap()
        .with_username("alice")
        .with_remote_address("10.9.8.7");
    sink.worker().log_hex(
        &worker,
        Priority::Sensitive,
        "session key:",
        &secret,
        Encoding::Base64,
    );

    let lines = lines.lock().unwrap();
    assert_eq!(
        *lines,
        vec![(
            Severity::Debug,
            "worker[corp:alice]: 10.9.8.7 session key: ASNFZ4mrze8=".to_string()
        )]
    );
}

#[test]
fn test_oversized_payload_is_dropped_silently() {
    let (sink, lines) = recording_sink();
    let ctx = SecurityModuleContext::new(LOG_LEVEL_SENSITIVE);

    sink.sec_mod()
        .log_hex(&ctx, Priority::Notice, "blob:", &[0u8; 1024], Encoding::Base64);
    sink.sec_mod()
        .log_hex(&ctx, Priority::Notice, "blob:", &[0u8; 256], Encoding::Hex);

    assert!(lines.lock().unwrap().is_empty());
}
