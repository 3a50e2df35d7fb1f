//! Tests for `AlertManagerService`.

use std::path::Path;
use std::sync::Arc;

use tempfile::TempDir;

use super::{AlertManagerService, DispatchError, UpdateError};
use crate::config::{ConfigError, ServiceConfig};
use crate::event::{AlertEvent, EventData, EventState, Level};
use crate::spool::FileRetryStore;
use crate::spool::mock::MockRetryStore;
use crate::transport::HttpError;
use crate::transport::mock::{MockClient, Outcome};
use crate::wire::{decode_payload, translate};

const URL: &str = "http://alertmanager.local:9093/api/v1/alerts";

type MockService = AlertManagerService<Arc<MockClient>, Arc<MockRetryStore>>;

fn enabled_config(folder: &Path) -> ServiceConfig {
    ServiceConfig::new(true, URL, folder)
}

fn service(
    config: ServiceConfig,
    client: MockClient,
) -> (MockService, Arc<MockClient>, Arc<MockRetryStore>) {
    let client = Arc::new(client);
    let store = Arc::new(MockRetryStore::new());
    let service = AlertManagerService::new(config, Arc::clone(&client)).with_store(Arc::clone(&store));
    (service, client, store)
}

fn sample_event() -> AlertEvent {
    AlertEvent {
        topic: "main:disk".to_string(),
        state: EventState {
            id: "disk/host=db01".to_string(),
            message: "disk usage 91%".to_string(),
            level: Level::Warning,
        },
        data: EventData {
            name: "disk".to_string(),
            task_name: "disk_alert".to_string(),
            category: "storage".to_string(),
            recoverable: true,
            ..EventData::default()
        }
        .with_tag("host", "db01")
        .with_field("summary", "disk filling up"),
    }
}

fn file_count(dir: &TempDir) -> usize {
    std::fs::read_dir(dir.path()).unwrap().count()
}

mod disabled {
    use super::*;

    #[tokio::test]
    async fn returns_disabled_without_io() {
        let dir = TempDir::new().unwrap();
        let config = ServiceConfig::new(false, URL, dir.path());
        let (service, client, store) = service(config, MockClient::refused());

        let result = service.alert(URL, dir.path(), &sample_event()).await;

        assert!(matches!(result, Err(DispatchError::Disabled)));
        assert_eq!(client.calls(), 0);
        assert!(store.persisted().is_empty());
    }

    #[tokio::test]
    async fn leaves_real_retry_folder_empty() {
        let dir = TempDir::new().unwrap();
        let client = Arc::new(MockClient::refused());
        let service = AlertManagerService::new(
            ServiceConfig::new(false, URL, dir.path()),
            Arc::clone(&client),
        );

        let err = service
            .alert(URL, dir.path(), &sample_event())
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "service is not enabled");
        assert_eq!(client.calls(), 0);
        assert_eq!(file_count(&dir), 0);
    }
}

mod delivery {
    use super::*;

    #[tokio::test]
    async fn success_returns_ok_without_retry_file() {
        let dir = TempDir::new().unwrap();
        let (service, client, store) = service(enabled_config(dir.path()), MockClient::ok());

        service
            .alert(URL, dir.path(), &sample_event())
            .await
            .unwrap();

        assert_eq!(client.calls(), 1);
        assert!(store.persisted().is_empty());
    }

    #[tokio::test]
    async fn posts_json_array_to_given_url() {
        let dir = TempDir::new().unwrap();
        let (service, client, _) = service(enabled_config(dir.path()), MockClient::ok());
        let target = "http://other.local:9093/api/v1/alerts";

        service
            .alert(target, dir.path(), &sample_event())
            .await
            .unwrap();

        let requests = client.captured_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, http::Method::POST);
        assert_eq!(requests[0].url.as_str(), target);
        assert_eq!(
            requests[0].headers.get(http::header::CONTENT_TYPE).unwrap(),
            "application/json"
        );

        let body = requests[0].body.as_deref().unwrap();
        let events = decode_payload(body).unwrap();
        assert_eq!(events, vec![translate(&sample_event()).unwrap()]);
    }

    #[tokio::test]
    async fn non_200_success_status_is_an_error() {
        let dir = TempDir::new().unwrap();
        let (service, _, store) = service(enabled_config(dir.path()), MockClient::status(202));

        let result = service.alert(URL, dir.path(), &sample_event()).await;

        assert!(matches!(
            result,
            Err(DispatchError::UnexpectedStatus { status }) if status.as_u16() == 202
        ));
        assert!(store.persisted().is_empty());
    }

    #[tokio::test]
    async fn server_error_mentions_status_and_is_not_persisted() {
        let dir = TempDir::new().unwrap();
        let (service, _, store) = service(enabled_config(dir.path()), MockClient::status(500));

        let err = service
            .alert(URL, dir.path(), &sample_event())
            .await
            .unwrap_err();

        assert!(err.to_string().contains("500"));
        assert!(!err.is_transport());
        assert!(store.persisted().is_empty());
    }
}

mod transport_failure {
    use super::*;

    #[tokio::test]
    async fn refused_connection_persists_payload() {
        let dir = TempDir::new().unwrap();
        let (service, client, store) = service(enabled_config(dir.path()), MockClient::refused());

        let err = service
            .alert(URL, dir.path(), &sample_event())
            .await
            .unwrap_err();

        assert!(err.is_transport());
        assert!(matches!(
            err,
            DispatchError::Transport(HttpError::Connection(_))
        ));

        let persisted = store.persisted();
        assert_eq!(persisted.len(), 1);
        assert_eq!(persisted[0].0, dir.path());
        // Same bytes that were sent.
        let sent = client.captured_requests()[0].body.clone().unwrap();
        assert_eq!(persisted[0].1, sent);
    }

    #[tokio::test]
    async fn timeout_persists_payload() {
        let dir = TempDir::new().unwrap();
        let (service, _, store) = service(
            enabled_config(dir.path()),
            MockClient::new(Outcome::Timeout),
        );

        let result = service.alert(URL, dir.path(), &sample_event()).await;

        assert!(matches!(
            result,
            Err(DispatchError::Transport(HttpError::Timeout))
        ));
        assert_eq!(store.persisted().len(), 1);
    }

    #[tokio::test]
    async fn uses_per_call_retry_folder() {
        let config_dir = TempDir::new().unwrap();
        let handler_dir = TempDir::new().unwrap();
        let (service, _, store) = service(enabled_config(config_dir.path()), MockClient::refused());

        let _ = service.alert(URL, handler_dir.path(), &sample_event()).await;

        assert_eq!(store.persisted()[0].0, handler_dir.path());
    }

    #[tokio::test]
    async fn persistence_failure_keeps_transport_error() {
        let dir = TempDir::new().unwrap();
        let service = AlertManagerService::new(enabled_config(dir.path()), MockClient::refused())
            .with_store(MockRetryStore::failing());

        let result = service.alert(URL, dir.path(), &sample_event()).await;

        assert!(matches!(
            result,
            Err(DispatchError::Transport(HttpError::Connection(_)))
        ));
    }

    #[tokio::test]
    async fn unparseable_url_is_treated_as_transport_failure() {
        let dir = TempDir::new().unwrap();
        let (service, client, store) = service(enabled_config(dir.path()), MockClient::ok());

        let result = service.alert("no scheme here", dir.path(), &sample_event()).await;

        assert!(matches!(
            result,
            Err(DispatchError::Transport(HttpError::InvalidUrl(_)))
        ));
        assert_eq!(client.calls(), 0);
        assert_eq!(store.persisted().len(), 1);
    }

    #[tokio::test]
    async fn file_store_writes_one_decodable_file() {
        let dir = TempDir::new().unwrap();
        let service = AlertManagerService::new(enabled_config(dir.path()), MockClient::refused());

        let _ = service.alert(URL, dir.path(), &sample_event()).await;

        let entries: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect();
        assert_eq!(entries.len(), 1);

        let events = decode_payload(&std::fs::read(&entries[0]).unwrap()).unwrap();
        assert_eq!(events, vec![translate(&sample_event()).unwrap()]);
    }
}

mod translation_failure {
    use super::*;

    #[tokio::test]
    async fn non_string_field_fails_before_sending() {
        let dir = TempDir::new().unwrap();
        let (service, client, store) = service(enabled_config(dir.path()), MockClient::ok());
        let mut event = sample_event();
        event.data = event.data.with_field("used_percent", 91.5);

        let result = service.alert(URL, dir.path(), &event).await;

        assert!(matches!(result, Err(DispatchError::Translate(_))));
        assert_eq!(client.calls(), 0);
        assert!(store.persisted().is_empty());
    }
}

mod hot_reload {
    use super::*;

    #[test]
    fn update_replaces_config() {
        let dir = TempDir::new().unwrap();
        let (service, _, _) = service(ServiceConfig::new(false, "", dir.path()), MockClient::ok());

        service.update(vec![enabled_config(dir.path())]).unwrap();

        assert_eq!(*service.config(), enabled_config(dir.path()));
    }

    #[test]
    fn update_rejects_zero_or_many() {
        let dir = TempDir::new().unwrap();
        let (service, _, _) = service(enabled_config(dir.path()), MockClient::ok());

        assert!(matches!(
            service.update(vec![]),
            Err(UpdateError::WrongCount(0))
        ));
        assert!(matches!(
            service.update(vec![enabled_config(dir.path()), enabled_config(dir.path())]),
            Err(UpdateError::WrongCount(2))
        ));
    }

    #[test]
    fn update_rejects_invalid_config_and_keeps_old() {
        let dir = TempDir::new().unwrap();
        let (service, _, _) = service(enabled_config(dir.path()), MockClient::ok());

        let result = service.update(vec![ServiceConfig::new(true, "", dir.path())]);

        assert!(matches!(
            result,
            Err(UpdateError::Invalid(ConfigError::MissingRequired { .. }))
        ));
        assert_eq!(*service.config(), enabled_config(dir.path()));
    }

    #[tokio::test]
    async fn disabling_takes_effect_on_next_call() {
        let dir = TempDir::new().unwrap();
        let (service, client, _) = service(enabled_config(dir.path()), MockClient::ok());

        service.alert(URL, dir.path(), &sample_event()).await.unwrap();
        service
            .update(vec![ServiceConfig::new(false, URL, dir.path())])
            .unwrap();
        let result = service.alert(URL, dir.path(), &sample_event()).await;

        assert!(matches!(result, Err(DispatchError::Disabled)));
        assert_eq!(client.calls(), 1);
    }

    #[test]
    fn snapshot_is_unaffected_by_later_update() {
        let dir = TempDir::new().unwrap();
        let (service, _, _) = service(enabled_config(dir.path()), MockClient::ok());

        let before = service.config();
        service
            .update(vec![ServiceConfig::new(false, "", dir.path())])
            .unwrap();

        assert!(before.enabled);
        assert!(!service.config().enabled);
    }
}

mod seeded_options {
    use super::*;

    #[test]
    fn default_handler_config_follows_service_config() {
        let dir = TempDir::new().unwrap();
        let (service, _, _) = service(enabled_config(dir.path()), MockClient::ok());

        let config = service.default_handler_config();

        assert_eq!(config.url, URL);
        assert_eq!(config.retry_folder, dir.path());
    }

    #[test]
    fn test_options_carry_fixed_message() {
        let dir = TempDir::new().unwrap();
        let (service, _, _) = service(enabled_config(dir.path()), MockClient::ok());

        let options = service.test_options();

        assert_eq!(options.url, URL);
        assert_eq!(options.retry_folder, dir.path());
        assert_eq!(options.message, "test alertmanager message");
    }
}

mod self_test {
    use super::*;

    #[tokio::test]
    async fn sends_zero_valued_event_to_option_url() {
        let dir = TempDir::new().unwrap();
        let (service, client, _) = service(enabled_config(dir.path()), MockClient::ok());
        let mut options = service.test_options();
        options.url = "http://test-target.local/api".to_string();
        options.message = "ignored".to_string();

        service.test(&options).await.unwrap();

        let requests = client.captured_requests();
        assert_eq!(requests[0].url.as_str(), "http://test-target.local/api");
        let body = requests[0].body.as_deref().unwrap();
        assert_eq!(
            decode_payload(body).unwrap(),
            vec![translate(&AlertEvent::default()).unwrap()]
        );
        assert!(!String::from_utf8_lossy(body).contains("ignored"));
    }

    #[tokio::test]
    async fn surfaces_dispatch_error() {
        let dir = TempDir::new().unwrap();
        let (service, _, _) = service(enabled_config(dir.path()), MockClient::status(400));

        let result = service.test(&service.test_options()).await;

        assert!(matches!(
            result,
            Err(DispatchError::UnexpectedStatus { .. })
        ));
    }
}

mod concurrency {
    use super::*;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_failures_produce_distinct_files() {
        let dir = TempDir::new().unwrap();
        let service = Arc::new(
            AlertManagerService::new(enabled_config(dir.path()), MockClient::refused())
                .with_store(FileRetryStore::new()),
        );

        let tasks: Vec<_> = (0..16)
            .map(|_| {
                let service = Arc::clone(&service);
                let folder = dir.path().to_path_buf();
                tokio::spawn(async move { service.alert(URL, &folder, &sample_event()).await })
            })
            .collect();

        for task in tasks {
            assert!(task.await.unwrap().unwrap_err().is_transport());
        }

        assert_eq!(file_count(&dir), 16);
    }
}
