//! Stress tests for concurrent use of channels and the container
//!
//! These tests verify:
//! - No record is lost or duplicated when many threads log through one channel
//! - Concurrent first resolution of a service runs its factory once
//! - Resetting channels while other threads log never deadlocks

use rust_log_bridge::di::{Container, LoggingConfig, LoggingExtension, ServiceLocator, ServiceRef};
use rust_log_bridge::handlers::TestHandler;
use rust_log_bridge::{Channel, HandlerAdapter, Level, UidProcessor};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

const THREADS: usize = 8;
const PER_THREAD: usize = 500;

/// Every record reaches every bubbling handler exactly once
#[test]
fn test_concurrent_logging_delivers_every_record() {
    let warnings = Arc::new(TestHandler::new());
    let everything = Arc::new(TestHandler::new());
    let channel = Arc::new(Channel::new("stress"));
    channel.push_handler(Arc::new(HandlerAdapter::new(
        warnings.clone(),
        Level::Warning,
        true,
        Vec::new(),
    )));
    channel.push_handler(Arc::new(HandlerAdapter::new(
        everything.clone(),
        Level::Debug,
        true,
        Vec::new(),
    )));
    channel.push_processor(Arc::new(UidProcessor::default()));

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let channel = channel.clone();
            thread::spawn(move || {
                for i in 0..PER_THREAD {
                    let level = if i % 2 == 0 { Level::Info } else { Level::Error };
                    channel
                        .log(level, format!("thread {} message {}", t, i), Default::default())
                        .unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(everything.records().len(), THREADS * PER_THREAD);
    assert_eq!(warnings.records().len(), THREADS * PER_THREAD / 2);
    assert!(warnings.records().iter().all(|r| r.level == Level::Error));
    assert_eq!(channel.metrics().total_logged(), (THREADS * PER_THREAD) as u64);
}

/// Concurrent first resolution creates a single instance
#[test]
fn test_concurrent_resolution_runs_factory_once() {
    let container = Arc::new(Container::new());
    let created = Arc::new(AtomicUsize::new(0));
    {
        let created = created.clone();
        container.register("app.channel", move |_| {
            created.fetch_add(1, Ordering::SeqCst);
            thread::yield_now();
            Ok(ServiceRef::logger(Arc::new(Channel::new("shared"))))
        });
    }
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let container = container.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                container
                    .resolve("app.channel")
                    .unwrap()
                    .downcast::<Channel>()
                    .unwrap()
            })
        })
        .collect();
    let channels: Vec<Arc<Channel>> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(created.load(Ordering::SeqCst), 1);
    assert!(channels.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
}

/// Flushing from one thread while others log through assembled channels
#[test]
fn test_reset_while_logging() {
    let container = Arc::new(Container::new());
    let sink = Arc::new(TestHandler::new());
    container.register_instance("app.memory", ServiceRef::handler(sink.clone()));

    let config = LoggingConfig::from_json_str(
        r#"{"debug": true, "handlers": {"memory": {"service": "app.memory"}}, "channels": {"main": {"autowired": true}}}"#,
    )
    .unwrap();
    let extension = LoggingExtension::new("log", config);
    extension.load(&container, None).unwrap();
    let main = extension.autowired_channel(container.as_ref()).unwrap();

    let writers: Vec<_> = (0..THREADS)
        .map(|t| {
            let main = main.clone();
            thread::spawn(move || {
                for i in 0..PER_THREAD {
                    main.info(format!("{} {}", t, i)).unwrap();
                }
            })
        })
        .collect();

    let flusher = {
        let container = container.clone();
        thread::spawn(move || {
            for _ in 0..50 {
                container
                    .resolve("log.logFlusher")
                    .unwrap()
                    .downcast::<rust_log_bridge::di::LogFlusher>()
                    .unwrap()
                    .reset()
                    .unwrap();
                thread::yield_now();
            }
        })
    };

    for handle in writers {
        handle.join().unwrap();
    }
    flusher.join().unwrap();

    assert!(sink.records().len() <= THREADS * PER_THREAD);
    main.reset().unwrap();
    assert!(sink.records().is_empty());
}
