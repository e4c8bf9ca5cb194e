//! Process-wide getters
//!
//! The getters share global state, so everything is checked in one test to
//! keep the order of `set` and `get` calls deterministic.

use rust_log_bridge::di::{
    Container, LoggerGetter, LoggingConfig, LoggingExtension, ServiceLocator, ServiceRef,
    StaticLoggerGetter,
};
use rust_log_bridge::handlers::TestHandler;
use rust_log_bridge::{Channel, LogContext, Logger, LoggerError};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;

#[test]
fn test_getters_fail_until_set_then_return_logger() {
    for (getter, err) in [
        ("LoggerGetter", LoggerGetter::get().err()),
        ("StaticLoggerGetter", StaticLoggerGetter::get().err()),
    ] {
        let err = err.unwrap();
        assert!(matches!(err, LoggerError::InvalidState(_)));
        assert_eq!(
            err.to_string(),
            format!(
                "Context: Trying to get logger from {}.\n\
                 Problem: Logger is not set.\n\
                 Solution: Enable getter via 'staticGetter' option of LoggingExtension.",
                getter
            )
        );
    }

    let direct = Arc::new(TestHandler::new());
    let channel = Channel::new("direct");
    channel.push_handler(direct.clone());
    LoggerGetter::set(Arc::new(channel));
    LoggerGetter::get()
        .unwrap()
        .info("through getter", &LogContext::new())
        .unwrap();
    assert_eq!(direct.messages(), vec!["through getter"]);

    let container = Arc::new(Container::new());
    let sink = Arc::new(TestHandler::new());
    let created = Arc::new(AtomicUsize::new(0));
    {
        let sink = sink.clone();
        let created = created.clone();
        container.register("app.memory", move |_| {
            created.fetch_add(1, Ordering::SeqCst);
            Ok(ServiceRef::handler(sink.clone()))
        });
    }
    let config = LoggingConfig::from_json_str(
        r#"{
            "debug": true,
            "handlers": {"memory": {"service": "app.memory"}},
            "channels": {"main": {}, "legacy": {}},
            "staticGetter": "legacy"
        }"#,
    )
    .unwrap();
    LoggingExtension::new("log", config)
        .load(&container, None)
        .unwrap();
    assert_eq!(created.load(Ordering::SeqCst), 0);

    let logger = StaticLoggerGetter::get().unwrap();
    assert!(container.is_created("log.channel.legacy"));
    assert!(!container.is_created("log.channel.main"));
    logger.warning("from legacy code", &LogContext::new()).unwrap();
    StaticLoggerGetter::get()
        .unwrap()
        .error("again", &LogContext::new())
        .unwrap();

    assert_eq!(created.load(Ordering::SeqCst), 1);
    let records = sink.records();
    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|r| r.channel == "legacy"));

    // the global state stays usable while a factory is still running
    let slow = Arc::new(Container::new());
    let (entered_tx, entered_rx) = mpsc::channel();
    let (release_tx, release_rx) = mpsc::channel::<()>();
    {
        let entered_tx = Mutex::new(entered_tx);
        let release_rx = Mutex::new(release_rx);
        slow.register("app.slow", move |_| {
            entered_tx.lock().send(()).unwrap();
            release_rx.lock().recv().unwrap();
            Ok(ServiceRef::logger(Arc::new(Channel::new("slow"))))
        });
    }
    StaticLoggerGetter::set("app.slow", slow.clone());

    let resolving = thread::spawn(StaticLoggerGetter::get);
    entered_rx.recv().unwrap();
    StaticLoggerGetter::set("app.slow", slow.clone());
    assert!(LoggerGetter::get().is_ok());
    release_tx.send(()).unwrap();

    assert!(resolving.join().unwrap().is_ok());
    assert!(StaticLoggerGetter::get().is_ok());
}
