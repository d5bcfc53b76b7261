use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use ascolto::application::ports::{BackendLoadError, BackendState};
use ascolto::infrastructure::asr::ModelSlot;
use futures::future::join_all;

use crate::helpers::whisper_descriptor;

#[tokio::test]
async fn given_empty_slot_when_inspecting_then_unloaded() {
    let slot: ModelSlot<u32> = ModelSlot::new();

    assert_eq!(slot.state(), BackendState::Unloaded);
    assert!(slot.snapshot().is_none());
    assert!(slot.descriptor().is_none());
}

#[tokio::test]
async fn given_concurrent_loads_of_same_model_when_loading_then_runs_loader_once() {
    let slot: ModelSlot<u32> = ModelSlot::new();
    let descriptor = whisper_descriptor("base");
    let loads = Arc::new(AtomicUsize::new(0));

    let results = join_all((0..8).map(|_| {
        let loads = Arc::clone(&loads);
        slot.load_with(&descriptor, false, move |_| async move {
            loads.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            Ok(7)
        })
    }))
    .await;

    assert_eq!(loads.load(Ordering::SeqCst), 1);
    let performed: Vec<bool> = results.into_iter().map(Result::unwrap).collect();
    assert_eq!(performed.iter().filter(|loaded| **loaded).count(), 1);
    assert_eq!(slot.state(), BackendState::Ready(descriptor));
}

#[tokio::test]
async fn given_ready_model_when_loading_same_descriptor_then_skips_loader() {
    let slot: ModelSlot<u32> = ModelSlot::new();
    let descriptor = whisper_descriptor("base");
    slot.load_with(&descriptor, false, |_| async { Ok(1) })
        .await
        .unwrap();

    let loaded = slot
        .load_with(&descriptor, false, |_| async { Ok(2) })
        .await
        .unwrap();

    assert!(!loaded);
    assert_eq!(*slot.snapshot().unwrap().model, 1);
}

#[tokio::test]
async fn given_force_when_loading_same_descriptor_then_reloads() {
    let slot: ModelSlot<u32> = ModelSlot::new();
    let descriptor = whisper_descriptor("base");
    slot.load_with(&descriptor, false, |_| async { Ok(1) })
        .await
        .unwrap();

    let loaded = slot
        .load_with(&descriptor, true, |_| async { Ok(2) })
        .await
        .unwrap();

    assert!(loaded);
    assert_eq!(*slot.snapshot().unwrap().model, 2);
}

#[tokio::test]
async fn given_failed_replacement_when_loading_then_previous_model_stays_ready() {
    let slot: ModelSlot<u32> = ModelSlot::new();
    let base = whisper_descriptor("base");
    let small = whisper_descriptor("small");
    slot.load_with(&base, false, |_| async { Ok(1) })
        .await
        .unwrap();

    let result = slot
        .load_with(&small, false, |d| async move {
            Err(BackendLoadError::Fetch {
                model: d.key,
                reason: "offline".to_string(),
            })
        })
        .await;

    assert!(matches!(result, Err(BackendLoadError::Fetch { .. })));
    assert_eq!(slot.state(), BackendState::Ready(base.clone()));
    assert_eq!(slot.descriptor(), Some(base));
}

#[tokio::test]
async fn given_load_in_flight_when_dropped_then_loading_state_is_cleared() {
    let slot: ModelSlot<u32> = ModelSlot::new();
    let descriptor = whisper_descriptor("small");

    let mut load = Box::pin(slot.load_with(&descriptor, false, |_| async {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok(1)
    }));
    assert!(futures::poll!(load.as_mut()).is_pending());
    assert_eq!(slot.state(), BackendState::Loading(descriptor.clone()));

    drop(load);

    assert_eq!(slot.state(), BackendState::Unloaded);
}

#[tokio::test]
async fn given_ready_model_when_acquiring_same_descriptor_then_returns_it_without_loading() {
    let slot: ModelSlot<u32> = ModelSlot::new();
    let base = whisper_descriptor("base");
    slot.load_with(&base, false, |_| async { Ok(1) })
        .await
        .unwrap();

    let handle = slot
        .acquire(&base, |d| async move {
            Err(BackendLoadError::Fetch {
                model: d.key,
                reason: "should not load".to_string(),
            })
        })
        .await
        .unwrap();

    assert_eq!(handle.descriptor, base);
    assert_eq!(*handle.model, 1);
}

#[tokio::test]
async fn given_slot_replaced_when_acquiring_earlier_descriptor_then_reloads_it() {
    let slot: ModelSlot<u32> = ModelSlot::new();
    let base = whisper_descriptor("base");
    let small = whisper_descriptor("small");
    slot.load_with(&base, false, |_| async { Ok(1) })
        .await
        .unwrap();
    let small_handle = slot.acquire(&small, |_| async { Ok(2) }).await.unwrap();

    let base_handle = slot.acquire(&base, |_| async { Ok(3) }).await.unwrap();

    assert_eq!(base_handle.descriptor, base);
    assert_eq!(*base_handle.model, 3);
    assert_eq!(*small_handle.model, 2);
    assert_eq!(slot.state(), BackendState::Ready(base));
}
