use retries::{constant_delay, execute, options, BoxError, FlakyTask, RetryError, Task};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio_test::{assert_err, assert_ok};

#[tokio::test(start_paused = true)]
async fn test_starter_scenario() {
    // Fails ten times, then succeeds.
    let task = FlakyTask::new("starter", 10);
    let waits: Arc<Mutex<Vec<(u32, Duration)>>> = Arc::new(Mutex::new(Vec::new()));
    let recorder = waits.clone();

    let result = execute(
        task.clone(),
        vec![
            options::attempts(20),
            options::delay(Duration::from_millis(200)),
            options::max_delay(Duration::from_secs(5)),
            options::delay_strategy(constant_delay),
            options::on_retry(move |attempt, wait, _| {
                recorder.lock().unwrap().push((attempt, wait));
            }),
        ],
    )
    .await;

    assert_ok!(result);
    assert_eq!(task.calls(), 11);

    let waits = waits.lock().unwrap();
    assert_eq!(waits.len(), 10);
    for (i, (attempt, wait)) in waits.iter().enumerate() {
        assert_eq!(*attempt, i as u32 + 1);
        assert_eq!(*wait, Duration::from_millis(200));
    }
}

#[tokio::test(start_paused = true)]
async fn test_success_on_kth_attempt() {
    for k in 1..=5 {
        let task = FlakyTask::new("flaky", k - 1);
        let result = execute(
            task.clone(),
            vec![options::attempts(5), options::delay_strategy(constant_delay)],
        )
        .await;

        assert_ok!(result);
        assert_eq!(task.calls(), k);
    }
}

#[tokio::test(start_paused = true)]
async fn test_always_failing_uses_exactly_n_attempts() {
    for n in [1i64, 2, 3, 7] {
        let task = FlakyTask::always_failing("broken");
        let result = execute(task.clone(), vec![options::attempts(n)]).await;

        assert!(matches!(result, Err(RetryError::AttemptsExhausted)));
        assert_eq!(task.calls() as i64, n);
    }
}

#[tokio::test(start_paused = true)]
async fn test_default_limit_is_three() {
    let task = FlakyTask::always_failing("broken");
    let err = assert_err!(execute(task.clone(), Vec::new()).await);

    assert_eq!(err.to_string(), "finished all attempts");
    assert_eq!(task.calls(), 3);
}

#[tokio::test]
async fn test_rejected_error_is_returned_verbatim() {
    #[derive(Debug)]
    struct PermissionDenied;

    impl std::fmt::Display for PermissionDenied {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "permission denied")
        }
    }

    impl std::error::Error for PermissionDenied {}

    let calls = Arc::new(AtomicUsize::new(0));
    let waits = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let wait_counter = waits.clone();

    let task = move || {
        let counter = counter.clone();
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Err::<(), BoxError>(Box::new(PermissionDenied))
        }
    };

    let result = execute(
        task,
        vec![
            options::retry_if(|err| !err.is::<PermissionDenied>()),
            options::on_retry(move |_, _, _| {
                wait_counter.fetch_add(1, Ordering::SeqCst);
            }),
        ],
    )
    .await;

    let task_err = result.unwrap_err().into_task_error().unwrap();
    assert!(task_err.is::<PermissionDenied>());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(waits.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn test_predicate_sees_each_error() {
    let task = FlakyTask::always_failing("flaky");
    let result = execute(
        task.clone(),
        vec![
            options::attempts(0),
            options::retry_if(|err| !err.to_string().ends_with("call 4")),
        ],
    )
    .await;

    assert_eq!(result.unwrap_err().to_string(), "flaky failed on call 4");
    assert_eq!(task.calls(), 4);
}

#[tokio::test]
async fn test_callback_not_called_on_success() {
    let called = Arc::new(AtomicUsize::new(0));
    let counter = called.clone();
    let task = FlakyTask::new("ok", 0);

    let result = execute(
        task.clone(),
        vec![options::on_retry(move |_, _, _| {
            counter.fetch_add(1, Ordering::SeqCst);
        })],
    )
    .await;

    assert_ok!(result);
    assert_eq!(called.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_tasks_are_not_run_concurrently() {
    struct Guarded {
        running: Arc<AtomicUsize>,
        overlaps: Arc<AtomicUsize>,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait::async_trait]
    impl Task for Guarded {
        async fn execute(&self) -> Result<(), BoxError> {
            if self.running.fetch_add(1, Ordering::SeqCst) > 0 {
                self.overlaps.fetch_add(1, Ordering::SeqCst);
            }
            tokio::time::sleep(Duration::from_millis(2)).await;
            self.running.fetch_sub(1, Ordering::SeqCst);

            if self.calls.fetch_add(1, Ordering::SeqCst) < 3 {
                Err("not yet".into())
            } else {
                Ok(())
            }
        }
    }

    let overlaps = Arc::new(AtomicUsize::new(0));
    let task = Guarded {
        running: Arc::new(AtomicUsize::new(0)),
        overlaps: overlaps.clone(),
        calls: Arc::new(AtomicUsize::new(0)),
    };

    let result = execute(
        task,
        vec![
            options::attempts(5),
            options::delay(Duration::from_millis(1)),
            options::delay_strategy(constant_delay),
        ],
    )
    .await;

    assert_ok!(result);
    assert_eq!(overlaps.load(Ordering::SeqCst), 0);
}
