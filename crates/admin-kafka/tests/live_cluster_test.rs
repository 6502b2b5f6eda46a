//! Integration tests against a live Kafka cluster.
//!
//! These need a reachable broker and are skipped otherwise. Run with
//! `KAFKA_BROKERS=localhost:9092 cargo test -p lagwatch-admin-kafka`.

use std::time::Duration;

use lagwatch_admin::{GroupAdmin, GroupId};
use lagwatch_admin_kafka::{Error, KafkaAdminOptions, KafkaGroupAdmin};

fn brokers_from_env() -> Option<Vec<String>> {
    std::env::var("KAFKA_BROKERS")
        .ok()
        .map(|brokers| brokers.split(',').map(str::to_string).collect())
}

#[tokio::test]
async fn test_ping_and_scoped_reads() {
    let Some(brokers) = brokers_from_env() else {
        eprintln!("KAFKA_BROKERS not set, skipping live cluster test");
        return;
    };

    let group = GroupId::from("lagwatch-live-test");
    let options = KafkaAdminOptions::new(brokers, group.clone())
        .with_request_timeout(Duration::from_secs(10));
    let admin = KafkaGroupAdmin::connect(&options).unwrap();

    admin.ping().await.unwrap();

    // The test group has no live members, so the reads exercise the empty
    // paths rather than any particular cluster contents.
    admin.committed_offsets(&group).await.unwrap();
    let ends = admin.end_offsets(&[]).await.unwrap();
    assert!(ends.is_empty());

    let other = GroupId::from("some-other-group");
    assert!(matches!(
        admin.committed_offsets(&other).await,
        Err(Error::WrongGroup { .. })
    ));

    admin.close().await;
}
