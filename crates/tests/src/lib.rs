//! # Integration Tests
//!
//! Cross-crate end-to-end tests over the in-memory backend.
//!
//! Covers:
//! - control message -> distributor -> derived channels -> archiver -> rows
//! - cooperative re-invocation until the incoming channel drains
//! - legacy subscription-enumeration directory end to end

#[cfg(test)]
mod contract_tests {
    #[test]
    fn test_contracts_compile() {
        let _ = contracts::ConfigVersion::V1;
    }
}

#[cfg(test)]
mod transcoder_tests {
    use std::sync::{Arc, Mutex};

    use contracts::ContractError;
    use transcoder::{FormGateway, Transcoder};

    const FORM_XML: &str = r#"<?xml version="1.0"?>
<h:html xmlns="http://www.w3.org/2002/xforms"
        xmlns:h="http://www.w3.org/1999/xhtml"
        xmlns:odk="http://www.opendatakit.org/xforms">
  <h:head>
    <model>
      <instance>
        <d_test id="d_test" odk:delimiter=";" odk:prefix="d_test">
          <yesno odk:tag="yn"/>
          <howmany odk:tag="hm"/>
        </d_test>
      </instance>
    </model>
  </h:head>
</h:html>"#;

    #[derive(Default, Clone)]
    struct RecordingGateway {
        submissions: Arc<Mutex<Vec<(String, serde_json::Value)>>>,
    }

    impl FormGateway for RecordingGateway {
        async fn fetch_form_xml(&self, _form_id: &str) -> Result<String, ContractError> {
            Ok(FORM_XML.to_string())
        }

        async fn submit(
            &self,
            form_id: &str,
            data: &serde_json::Map<String, serde_json::Value>,
        ) -> Result<(), ContractError> {
            self.submissions
                .lock()
                .unwrap()
                .push((form_id.to_string(), serde_json::Value::Object(data.clone())));
            Ok(())
        }
    }

    /// The transcoder is an independent HTTP-triggered collaborator; it is
    /// not fed by the distributor, so it only shares the contracts layer.
    #[tokio::test]
    async fn test_e2e_raw_gateway_payload_transcoded() {
        let gateway = RecordingGateway::default();
        let mut transcoder = Transcoder::new(gateway.clone());

        let body = "{'msisdn':'358123123123','messageId':'16000002645683B9','text':'d_test;yn;no;hm;123;','type':'text','keyword':'D_TEST'}";
        let outcome = transcoder
            .process_raw(body)
            .await
            .unwrap()
            .expect("expected completed submission");
        assert_eq!(outcome.form_id, "d_test");
        assert_eq!(outcome.field_count, 2);

        let submissions = gateway.submissions.lock().unwrap();
        let (form_id, data) = &submissions[0];
        assert_eq!(form_id, "d_test");
        // Short tags remapped to the form's canonical field names
        assert_eq!(data["yesno"], "no");
        assert_eq!(data["howmany"], "123");
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::sync::Arc;

    use backends::{MemoryChannelService, MemoryTopicService, StaticFleetClient};
    use bytes::Bytes;
    use config_loader::{ConfigFormat, ConfigLoader};
    use contracts::{
        ChannelName, ChannelService, DirectoryStrategy, Notification, SubscriberId, Subscription,
    };
    use directory::AnyDirectory;
    use distributor::{parse_control, Distributor, DistributorConfig};
    use observability::DistributionStats;

    use archiver::{Archiver, ArchiverConfig, MemoryRowStore};

    const DEPLOYMENT_TOML: &str = r#"
[deployment]
label = "highlands"

[channels]
incoming = "field-data"
dead_letter = "field-data-dlq"
batch_size = 2
"#;

    fn upload(instance: &str, count: u32) -> Bytes {
        Bytes::from(format!(
            r#"{{"formId": "census", "data": {{"meta/instanceID": "uuid:{instance}", "count": "{count}"}}}}"#
        ))
    }

    /// End-to-end: incoming channel -> Distributor -> derived channels ->
    /// Archiver -> row store, driven by the cooperative re-invocation signal.
    #[tokio::test]
    async fn test_e2e_distribute_then_archive() {
        let blueprint = ConfigLoader::load_from_str(DEPLOYMENT_TOML, ConfigFormat::Toml).unwrap();
        let channels = Arc::new(MemoryChannelService::new());
        let topics = Arc::new(MemoryTopicService::new());

        let fleet =
            StaticFleetClient::new().with_fleet("highlands", vec![SubscriberId::new("i-1")]);
        let directory =
            AnyDirectory::from_blueprint(&blueprint, fleet, Arc::clone(&topics));
        let distributor = Distributor::new(
            Arc::clone(&channels),
            Arc::clone(&topics),
            directory,
            DistributorConfig::from_blueprint(&blueprint),
        );

        // Upstream collector wrote three entries
        let control = parse_control(
            r#"{"queue": "field-data", "dead-letter-queue": "field-data-dlq"}"#,
        )
        .unwrap();
        channels.ensure(&control.queue).await.unwrap();
        for (instance, count) in [("a", 1), ("b", 2), ("c", 3)] {
            channels
                .send(&control.queue, upload(instance, count))
                .await
                .unwrap();
        }

        // Re-invoke while the distributor reports more work pending
        let mut stats = DistributionStats::new();
        let mut runs = 0;
        loop {
            let outcome = distributor.run(&control).await.unwrap();
            stats.record_batch(outcome.processed);
            runs += 1;
            if !outcome.call_again {
                break;
            }
        }
        assert_eq!(runs, 2, "batch of 2 over 3 entries needs two invocations");

        // Every subscriber channel holds every entry
        let fleet_channel = ChannelName::new("field-data-i-1");
        let archival_channel = ChannelName::new("field-data-persistent-database-writer");
        assert_eq!(channels.depth(&fleet_channel), 3);
        assert_eq!(channels.depth(&archival_channel), 3);
        for body in channels.bodies(&archival_channel) {
            stats.record_copy(archival_channel.as_str());
            assert!(!body.is_empty());
        }

        // One notification per entry, carrying the archival pair
        let published = topics.published("outgoing-topic-highlands");
        assert_eq!(published.len(), 3);
        let notification: Notification = serde_json::from_str(&published[0]).unwrap();
        assert_eq!(notification.queue, archival_channel);

        // The archival sink drains its channel into the row store
        let store = Arc::new(MemoryRowStore::new());
        let archiver = Archiver::new(
            Arc::clone(&channels),
            Arc::clone(&store),
            ArchiverConfig::from_blueprint(&blueprint),
        );
        let outcome = archiver.run().await.unwrap();
        assert_eq!(outcome.stored, 3);
        assert_eq!(store.row_count("census"), 3);
        assert_eq!(channels.depth(&archival_channel), 0);

        // Incoming channel is fully acknowledged
        assert_eq!(channels.depth(&control.queue), 0);
        assert_eq!(channels.in_flight(&control.queue), 0);

        let summary = stats.summary();
        assert_eq!(summary.total_entries, 3);
        assert_eq!(summary.copies_per_channel[archival_channel.as_str()], 3);
    }

    /// End-to-end over the legacy directory: subscribers enumerated from the
    /// output topic's paginated subscription listing.
    #[tokio::test]
    async fn test_e2e_legacy_subscription_directory() {
        let toml = format!("{DEPLOYMENT_TOML}\n[directory]\nstrategy = \"subscriptions\"\n");
        let blueprint = ConfigLoader::load_from_str(&toml, ConfigFormat::Toml).unwrap();
        assert_eq!(blueprint.directory.strategy, DirectoryStrategy::Subscriptions);

        let channels = Arc::new(MemoryChannelService::new());
        let topics = Arc::new(MemoryTopicService::with_page_size(1));
        topics.set_subscriptions(
            "outgoing-topic-highlands",
            vec![
                Subscription {
                    arn: "arn:mem:outgoing-topic-highlands:sub-1".into(),
                    protocol: "sqs".into(),
                    endpoint: "endpoint-1".into(),
                },
                Subscription {
                    arn: "arn:mem:outgoing-topic-highlands:sub-2".into(),
                    protocol: "sqs".into(),
                    endpoint: "endpoint-2".into(),
                },
            ],
        );

        let directory = AnyDirectory::from_blueprint(
            &blueprint,
            StaticFleetClient::new(),
            Arc::clone(&topics),
        );
        let distributor = Distributor::new(
            Arc::clone(&channels),
            Arc::clone(&topics),
            directory,
            DistributorConfig::from_blueprint(&blueprint),
        );

        let control = blueprint.control_message();
        channels.ensure(&control.queue).await.unwrap();
        channels
            .send(&control.queue, upload("a", 1))
            .await
            .unwrap();

        let outcome = distributor.run(&control).await.unwrap();
        assert_eq!(outcome.processed, 1);

        // Two enumerated subscribers plus the archival subscriber
        for channel in [
            "field-data-sub-1",
            "field-data-sub-2",
            "field-data-persistent-database-writer",
        ] {
            assert_eq!(channels.depth(&ChannelName::new(channel)), 1, "{channel}");
        }
    }
}
