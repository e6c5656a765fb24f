//! # Broker Integration Flows
//!
//! End-to-end exercises of the publish/subscribe contracts across crate
//! boundaries: the worked examples from the interface contract, the shared
//! process-wide instance lifecycle, and concurrency behavior under
//! multi-threaded publishers.

#[cfg(test)]
mod tests {
    use sensor_bus::{
        shared, shutdown_shared, CustomHandler, MessageBroker, MessageHandler, ANGLE_TYPE,
        DIRECTION_TYPE,
    };
    use serde_json::json;
    use shared_types::Payload;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::thread;

    fn payload(value: serde_json::Value) -> Payload {
        value.as_object().expect("object payload").clone()
    }

    // =========================================================================
    // WORKED EXAMPLES
    // =========================================================================

    /// Publishing a valid direction with zero subscribers succeeds with a
    /// zero notification count.
    #[test]
    fn test_direction_publish_without_subscribers() {
        let broker = MessageBroker::new();
        let result = broker.publish(
            DIRECTION_TYPE,
            payload(json!({"command": "forward", "timestamp": "2024-01-01T00:00:00"})),
        );

        assert!(result.success);
        assert_eq!(result.subscribers_notified, 0);
        assert!(result.errors.is_empty());
    }

    /// An out-of-range angle is rejected with a non-empty error list.
    #[test]
    fn test_angle_out_of_range_rejected() {
        let broker = MessageBroker::new();
        let result = broker.publish(ANGLE_TYPE, payload(json!({"angle": 999})));

        assert!(!result.success);
        assert!(!result.errors.is_empty());
        assert!(result.errors[0].contains("out of range"));
    }

    /// Two subscribers to one type both fire exactly once, in subscription
    /// order, for a single publish.
    #[test]
    fn test_double_subscription_fires_in_order() {
        let broker = MessageBroker::new();
        let calls = Arc::new(Mutex::new(Vec::new()));

        for tag in ["a", "b"] {
            let calls = calls.clone();
            broker
                .subscribe_fn(DIRECTION_TYPE, move |msg| {
                    calls.lock().unwrap().push((tag, msg.message_id.clone()));
                })
                .unwrap();
        }

        let result = broker.publish(DIRECTION_TYPE, payload(json!({"command": "backward"})));
        assert!(result.success);
        assert_eq!(result.subscribers_notified, 2);

        let calls = calls.lock().unwrap();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].0, "a");
        assert_eq!(calls[1].0, "b");
        // Both observed the same message.
        assert_eq!(calls[0].1, calls[1].1);
        assert_eq!(Some(calls[0].1.clone()), result.message_id);
    }

    // =========================================================================
    // SHARED INSTANCE LIFECYCLE
    // =========================================================================

    /// All shared-instance assertions live in one test: the global slot is
    /// process-wide state and parallel test threads must not interleave on it.
    #[test]
    fn test_shared_instance_lifecycle() {
        shutdown_shared();

        // Consistency: two gets between init and shutdown see one broker.
        let first = shared();
        let second = shared();
        assert!(Arc::ptr_eq(&first, &second));

        let seen = Arc::new(AtomicUsize::new(0));
        let counter = seen.clone();
        first
            .subscribe_fn(DIRECTION_TYPE, move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();

        let result = second.publish(DIRECTION_TYPE, payload(json!({"command": "forward"})));
        assert!(result.success);
        assert_eq!(seen.load(Ordering::SeqCst), 1);

        // Shutdown releases the slot; held handles fail fast.
        shutdown_shared();
        let stale = first.publish(DIRECTION_TYPE, payload(json!({"command": "forward"})));
        assert!(!stale.success);

        // A later get re-initializes a clean broker.
        let fresh = shared();
        assert!(!Arc::ptr_eq(&first, &fresh));
        assert!(fresh.is_running());
        assert_eq!(fresh.subscriber_count(None), 0);
        let result = fresh.publish(DIRECTION_TYPE, payload(json!({"command": "forward"})));
        assert!(result.success);

        shutdown_shared();
    }

    // =========================================================================
    // RUNTIME EXTENSIBILITY
    // =========================================================================

    /// A type registered at runtime behaves like a built-in, and its
    /// registration leaves pre-existing types untouched.
    #[test]
    fn test_runtime_type_registration_end_to_end() {
        let broker = MessageBroker::new();
        let input = payload(json!({"command": "turn_right", "timestamp": 1700000000.0}));
        let before = broker.publish(DIRECTION_TYPE, input.clone());

        broker
            .register_message_type(MessageHandler::Custom(CustomHandler::new(
                "proximity_alarm",
                vec!["distance_m".into()],
            )))
            .unwrap();

        let received = Arc::new(AtomicUsize::new(0));
        let counter = received.clone();
        broker
            .subscribe_fn("proximity_alarm", move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();

        let rejected = broker.publish("proximity_alarm", payload(json!({})));
        assert!(!rejected.success);
        assert_eq!(received.load(Ordering::SeqCst), 0);

        let accepted = broker.publish("proximity_alarm", payload(json!({"distance_m": 1.5})));
        assert!(accepted.success);
        assert_eq!(received.load(Ordering::SeqCst), 1);

        let after = broker.publish(DIRECTION_TYPE, input);
        assert_eq!(before.success, after.success);
        assert_eq!(before.subscribers_notified, after.subscribers_notified);
        assert_eq!(before.errors, after.errors);
    }

    // =========================================================================
    // CONCURRENCY
    // =========================================================================

    /// Messages from one publisher thread arrive in publish order at every
    /// subscriber, even while other threads publish the same type.
    #[test]
    fn test_per_thread_ordering_under_contention() {
        let broker = Arc::new(MessageBroker::new());
        let seen: Arc<Mutex<Vec<(u64, u64)>>> = Arc::new(Mutex::new(Vec::new()));

        let sink = seen.clone();
        broker
            .subscribe_fn(ANGLE_TYPE, move |msg| {
                let publisher = msg.data.get("publisher").and_then(|v| v.as_u64()).unwrap();
                let seq = msg.data.get("seq").and_then(|v| v.as_u64()).unwrap();
                sink.lock().unwrap().push((publisher, seq));
            })
            .unwrap();

        let mut handles = Vec::new();
        for publisher in 0..4u64 {
            let broker = broker.clone();
            handles.push(thread::spawn(move || {
                for seq in 0..50u64 {
                    let result = broker.publish(
                        ANGLE_TYPE,
                        payload(json!({
                            "angle": (seq % 360) as f64,
                            "publisher": publisher,
                            "seq": seq,
                        })),
                    );
                    assert!(result.success);
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 200);
        for publisher in 0..4u64 {
            let sequence: Vec<u64> = seen
                .iter()
                .filter(|(p, _)| *p == publisher)
                .map(|(_, s)| *s)
                .collect();
            let mut sorted = sequence.clone();
            sorted.sort_unstable();
            assert_eq!(sequence, sorted, "publisher {publisher} reordered");
        }
    }

    /// Concurrent registration of new types never disturbs in-flight
    /// publishes of existing types.
    #[test]
    fn test_concurrent_registration_and_publish() {
        let broker = Arc::new(MessageBroker::new());

        let registrar = {
            let broker = broker.clone();
            thread::spawn(move || {
                for i in 0..100 {
                    broker
                        .register_message_type(MessageHandler::Custom(CustomHandler::new(
                            format!("custom_{i}"),
                            vec!["value".into()],
                        )))
                        .unwrap();
                }
            })
        };

        let publisher = {
            let broker = broker.clone();
            thread::spawn(move || {
                for _ in 0..100 {
                    let result =
                        broker.publish(DIRECTION_TYPE, payload(json!({"command": "stationary"})));
                    assert!(result.success);
                }
            })
        };

        registrar.join().unwrap();
        publisher.join().unwrap();

        // 3 built-ins plus 100 customs.
        assert_eq!(broker.list_types().len(), 103);
        assert_eq!(broker.get_stats().messages_published, 100);
    }
}
